//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers and driving WebSocket
//! clients against them.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::{anyhow, bail, Result};
use futures_util::{SinkExt, StreamExt};
use presence_common::{AppConfig, PresenceConfig};
use presence_gateway::{create_app, create_gateway_state, GatewayState};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// How long to wait for an expected frame
pub const RECV_TIMEOUT: Duration = Duration::from_secs(3);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub state: GatewayState,
    handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server with the default liveness policy
    pub async fn start() -> Result<Self> {
        Self::start_with_config(AppConfig::default()).await
    }

    /// Start a test server with a shortened liveness policy
    pub async fn start_with_policy(
        sweep_interval: Duration,
        heartbeat_timeout: Duration,
    ) -> Result<Self> {
        let presence = PresenceConfig {
            sweep_interval,
            heartbeat_timeout,
            ..PresenceConfig::default()
        };
        presence.validate()?;

        Self::start_with_config(AppConfig {
            presence,
            ..AppConfig::default()
        })
        .await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let state = create_gateway_state(config);
        let app = create_app(state.clone());

        // Ephemeral port
        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;

        // Spawn server task
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        Ok(Self {
            addr,
            state,
            handle,
        })
    }

    /// WebSocket URL of the presence endpoint
    pub fn ws_url(&self) -> String {
        format!("ws://{}/presence", self.addr)
    }

    /// Connect a client and consume its `hello`
    pub async fn connect(&self) -> Result<TestClient> {
        let mut client = self.connect_raw().await?;
        let hello = client.recv().await?;
        if hello["event"] != "hello" {
            bail!("expected hello, got {hello}");
        }
        Ok(client)
    }

    /// Connect a client without consuming anything
    pub async fn connect_raw(&self) -> Result<TestClient> {
        let (stream, _) = connect_async(self.ws_url()).await?;
        Ok(TestClient { stream })
    }

    /// Base HTTP URL of the server
    pub fn http_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// HTTP GET against the server
    pub async fn http_get(&self, path: &str) -> Result<reqwest::Response> {
        Ok(reqwest::get(format!("{}{path}", self.http_url())).await?)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.state.monitor().stop();
        self.handle.abort();
    }
}

/// WebSocket client speaking the presence protocol
pub struct TestClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl TestClient {
    /// Send `{"event": event, "data": data}`
    pub async fn send_event(&mut self, event: &str, data: Value) -> Result<()> {
        let frame = json!({ "event": event, "data": data });
        self.send_text(&frame.to_string()).await
    }

    /// Send an event without a data field
    pub async fn send_bare(&mut self, event: &str) -> Result<()> {
        self.send_text(&json!({ "event": event }).to_string()).await
    }

    /// Send a raw text frame
    pub async fn send_text(&mut self, text: &str) -> Result<()> {
        self.stream.send(Message::Text(text.to_string())).await?;
        Ok(())
    }

    /// Send a raw binary frame
    pub async fn send_binary(&mut self, bytes: Vec<u8>) -> Result<()> {
        self.stream.send(Message::Binary(bytes)).await?;
        Ok(())
    }

    /// `userOnline` shorthand
    pub async fn online(&mut self, user_id: i64, user_type: &str, user_name: &str) -> Result<()> {
        self.send_event(
            "userOnline",
            json!({ "userId": user_id, "userType": user_type, "userName": user_name }),
        )
        .await
    }

    /// `userHeartbeat` shorthand
    pub async fn heartbeat(&mut self, user_id: i64) -> Result<()> {
        self.send_event("userHeartbeat", json!({ "userId": user_id })).await
    }

    /// `userOffline` shorthand
    pub async fn offline(&mut self, user_id: i64) -> Result<()> {
        self.send_event("userOffline", json!({ "userId": user_id })).await
    }

    /// Receive the next JSON text frame
    pub async fn recv(&mut self) -> Result<Value> {
        self.recv_within(RECV_TIMEOUT)
            .await?
            .ok_or_else(|| anyhow!("no frame within {RECV_TIMEOUT:?}"))
    }

    /// Receive the next frame with the given event name, failing on anything else
    pub async fn recv_event(&mut self, event: &str) -> Result<Value> {
        let frame = self.recv().await?;
        if frame["event"] != event {
            bail!("expected {event}, got {frame}");
        }
        Ok(frame["data"].clone())
    }

    /// Receive a text frame if one arrives within `wait`
    pub async fn recv_within(&mut self, wait: Duration) -> Result<Option<Value>> {
        let deadline = tokio::time::Instant::now() + wait;
        loop {
            let next = match tokio::time::timeout_at(deadline, self.stream.next()).await {
                Ok(next) => next,
                Err(_) => return Ok(None),
            };
            match next {
                Some(Ok(Message::Text(text))) => return Ok(Some(serde_json::from_str(&text)?)),
                Some(Ok(Message::Close(_))) | None => bail!("connection closed"),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e.into()),
            }
        }
    }

    /// Ask for and return the online users list
    pub async fn online_users(&mut self) -> Result<Value> {
        self.send_bare("getOnlineUsers").await?;
        self.recv_event("onlineUsersList").await
    }

    /// Close the connection
    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }
}
