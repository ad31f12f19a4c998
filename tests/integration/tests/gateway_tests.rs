//! End-to-end tests for the presence gateway
//!
//! Each test starts its own gateway on an ephemeral port and drives it with
//! real WebSocket clients.

use std::time::Duration;

use anyhow::Result;
use integration_tests::TestServer;
use presence_core::UserId;
use reqwest::StatusCode;
use serde_json::json;

/// Window in which a frame that should not arrive is waited for
const QUIET: Duration = Duration::from_millis(300);

#[tokio::test]
async fn test_health_check() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.http_get("/health").await?;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.text().await?, "OK");

    Ok(())
}

#[tokio::test]
async fn test_unknown_route_is_not_found() -> Result<()> {
    let server = TestServer::start().await?;

    let response = server.http_get("/nowhere").await?;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    Ok(())
}

#[tokio::test]
async fn test_hello_advertises_liveness_policy() -> Result<()> {
    let server = TestServer::start().await?;
    let mut client = server.connect_raw().await?;

    let hello = client.recv_event("hello").await?;
    assert_eq!(hello["heartbeatTimeout"], 45_000);
    assert_eq!(hello["heartbeatInterval"], 15_000);

    Ok(())
}

#[tokio::test]
async fn test_agent_online_is_broadcast_and_listed() -> Result<()> {
    let server = TestServer::start().await?;
    let mut watcher = server.connect().await?;
    let mut agent = server.connect().await?;

    agent.online(999, "agent", "Test Agent").await?;

    for client in [&mut watcher, &mut agent] {
        let change = client.recv_event("userStatusChanged").await?;
        assert_eq!(change["userId"], 999);
        assert_eq!(change["status"], "online");
        assert!(change["lastSeen"].is_string());
    }

    let users = watcher.online_users().await?;
    assert_eq!(
        users,
        json!([{ "userId": 999, "userName": "Test Agent", "status": "online" }])
    );

    Ok(())
}

#[tokio::test]
async fn test_online_users_are_ordered_by_id() -> Result<()> {
    let server = TestServer::start().await?;
    let mut watcher = server.connect().await?;

    let mut agents = Vec::new();
    for (id, name) in [(42, "Zed"), (3, "Ann"), (17, "Bob")] {
        let mut agent = server.connect().await?;
        agent.online(id, "agent", name).await?;
        watcher.recv_event("userStatusChanged").await?;
        agents.push(agent);
    }

    let users = watcher.online_users().await?;
    let ids: Vec<i64> = users
        .as_array()
        .map(|list| list.iter().filter_map(|u| u["userId"].as_i64()).collect())
        .unwrap_or_default();
    assert_eq!(ids, vec![3, 17, 42]);

    Ok(())
}

#[tokio::test]
async fn test_second_tab_is_silent_until_last_tab_leaves() -> Result<()> {
    let server = TestServer::start().await?;
    let mut watcher = server.connect().await?;
    let mut first = server.connect().await?;
    let mut second = server.connect().await?;

    first.online(7, "agent", "Alice").await?;
    assert_eq!(watcher.recv_event("userStatusChanged").await?["status"], "online");

    second.online(7, "agent", "Alice").await?;
    assert!(watcher.recv_within(QUIET).await?.is_none());

    first.close().await?;
    assert!(watcher.recv_within(QUIET).await?.is_none());
    assert!(server.state.store().is_online(UserId::new(7)));

    second.offline(7).await?;
    let change = watcher.recv_event("userStatusChanged").await?;
    assert_eq!(change["userId"], 7);
    assert_eq!(change["status"], "offline");

    assert_eq!(watcher.online_users().await?, json!([]));

    Ok(())
}

#[tokio::test]
async fn test_disconnect_takes_user_offline() -> Result<()> {
    let server = TestServer::start().await?;
    let mut watcher = server.connect().await?;
    let mut agent = server.connect().await?;

    agent.online(5, "agent", "Eve").await?;
    watcher.recv_event("userStatusChanged").await?;

    agent.close().await?;

    let change = watcher.recv_event("userStatusChanged").await?;
    assert_eq!(change["userId"], 5);
    assert_eq!(change["status"], "offline");
    assert_eq!(server.state.store().connection_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_malformed_frames_are_ignored() -> Result<()> {
    let server = TestServer::start().await?;
    let mut client = server.connect().await?;

    client.send_text("not json").await?;
    client.send_text(r#"{"event":"dropTables","data":{}}"#).await?;
    client.send_text(r#"{"event":"userOnline","data":{"userId":"abc"}}"#).await?;
    client.send_text(r#"{"event":"userOnline","data":{"userName":"No Id"}}"#).await?;
    client
        .send_text(r#"{"event":"userStatusChanged","data":{"userId":1,"status":"online"}}"#)
        .await?;
    client.send_binary(vec![1, 2, 3]).await?;

    // Socket is still open and nothing was registered
    assert_eq!(client.online_users().await?, json!([]));
    assert_eq!(server.state.store().connection_count(), 0);

    Ok(())
}

#[tokio::test]
async fn test_mismatched_user_is_ignored() -> Result<()> {
    let server = TestServer::start().await?;
    let mut watcher = server.connect().await?;
    let mut agent = server.connect().await?;

    agent.online(1, "agent", "One").await?;
    watcher.recv_event("userStatusChanged").await?;

    agent.offline(2).await?;
    assert!(watcher.recv_within(QUIET).await?.is_none());
    assert!(server.state.store().is_online(UserId::new(1)));

    Ok(())
}

#[tokio::test]
async fn test_silent_connection_expires() -> Result<()> {
    let server =
        TestServer::start_with_policy(Duration::from_millis(50), Duration::from_millis(200))
            .await?;
    let mut watcher = server.connect().await?;
    let mut agent = server.connect().await?;

    agent.online(3, "agent", "Sam").await?;
    assert_eq!(watcher.recv_event("userStatusChanged").await?["status"], "online");

    // No heartbeats: the monitor expires the connection
    let change = watcher.recv_event("userStatusChanged").await?;
    assert_eq!(change["userId"], 3);
    assert_eq!(change["status"], "offline");
    assert!(!server.state.store().is_online(UserId::new(3)));

    // A late heartbeat re-registers from the remembered metadata
    agent.heartbeat(3).await?;
    let change = watcher.recv_event("userStatusChanged").await?;
    assert_eq!(change["status"], "online");
    assert_eq!(
        watcher.online_users().await?,
        json!([{ "userId": 3, "userName": "Sam", "status": "online" }])
    );

    Ok(())
}

#[tokio::test]
async fn test_heartbeats_keep_connection_alive() -> Result<()> {
    let server =
        TestServer::start_with_policy(Duration::from_millis(50), Duration::from_millis(300))
            .await?;
    let mut watcher = server.connect().await?;
    let mut agent = server.connect().await?;

    agent.online(8, "agent", "Kim").await?;
    watcher.recv_event("userStatusChanged").await?;

    for _ in 0..10 {
        tokio::time::sleep(Duration::from_millis(60)).await;
        agent.heartbeat(8).await?;
    }

    assert!(watcher.recv_within(Duration::from_millis(100)).await?.is_none());
    assert!(server.state.store().is_online(UserId::new(8)));

    Ok(())
}
