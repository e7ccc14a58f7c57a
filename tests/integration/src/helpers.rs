//! Test helpers for integration tests
//!
//! Provides utilities for spawning a relay server on an ephemeral port and
//! attaching HTTP and WebSocket clients to it.

use std::net::SocketAddr;
use std::time::Duration;

use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use relay_common::{AppConfig, ServerConfig, StaticConfig};
use relay_gateway::server::{create_app, create_state};
use reqwest::{Client, Response};
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::tungstenite::protocol::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

/// How long receive helpers wait before deciding a message is not coming
pub const RECV_TIMEOUT: Duration = Duration::from_secs(2);

/// How long silence checks listen before declaring silence
pub const SILENCE_WINDOW: Duration = Duration::from_millis(300);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a new test server with the default test config
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        // Bind an ephemeral port
        let listener = TcpListener::bind(("127.0.0.1", 0)).await?;
        let addr = listener.local_addr()?;

        let state = create_state(config);
        let app = create_app(state);

        // Spawn server task
        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        // Wait for server to be ready
        tokio::time::sleep(Duration::from_millis(50)).await;

        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            addr,
            client,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let response = self
            .client
            .get(format!("{}{path}", self.base_url()))
            .send()
            .await?;
        Ok(response)
    }

    /// Open a relay WebSocket connection to this server
    pub async fn connect(&self) -> Result<RelayClient> {
        let (stream, _response) = connect_async(format!("ws://{}/", self.addr)).await?;

        // Give the server a beat to register the connection before the test
        // starts broadcasting
        tokio::time::sleep(Duration::from_millis(50)).await;

        Ok(RelayClient { stream })
    }
}

/// One connected relay client
pub struct RelayClient {
    stream: WebSocketStream<MaybeTlsStream<TcpStream>>,
}

impl RelayClient {
    /// Send a text payload
    pub async fn send_text(&mut self, payload: &str) -> Result<()> {
        self.stream.send(Message::Text(payload.to_string())).await?;
        Ok(())
    }

    /// Send a binary payload
    pub async fn send_binary(&mut self, payload: Vec<u8>) -> Result<()> {
        self.stream.send(Message::Binary(payload)).await?;
        Ok(())
    }

    /// Receive the next text payload, skipping transport keepalive frames
    ///
    /// Returns `None` if nothing arrives within `RECV_TIMEOUT`.
    pub async fn recv_text(&mut self) -> Option<String> {
        self.recv_text_within(RECV_TIMEOUT).await
    }

    /// Receive the next binary payload, skipping keepalive frames
    pub async fn recv_binary(&mut self) -> Option<Vec<u8>> {
        let fut = async {
            while let Some(msg) = self.stream.next().await {
                match msg {
                    Ok(Message::Binary(data)) => return Some(data),
                    Ok(_) => continue,
                    Err(_) => return None,
                }
            }
            None
        };
        tokio::time::timeout(RECV_TIMEOUT, fut).await.ok().flatten()
    }

    /// Assert that no payload arrives within the silence window
    pub async fn expect_silence(&mut self) {
        let received = self.recv_text_within(SILENCE_WINDOW).await;
        assert_eq!(received, None, "expected no relayed payload");
    }

    /// Close the connection
    pub async fn close(mut self) -> Result<()> {
        self.stream.close(None).await?;
        Ok(())
    }

    async fn recv_text_within(&mut self, timeout: Duration) -> Option<String> {
        let fut = async {
            while let Some(msg) = self.stream.next().await {
                match msg {
                    Ok(Message::Text(text)) => return Some(text),
                    Ok(_) => continue,
                    Err(_) => return None,
                }
            }
            None
        };
        tokio::time::timeout(timeout, fut).await.ok().flatten()
    }
}

/// Config for tests: ephemeral port, workspace static dir
pub fn test_config() -> AppConfig {
    AppConfig {
        server: ServerConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
        },
        static_pages: StaticConfig {
            dir: format!("{}/../../static", env!("CARGO_MANIFEST_DIR")),
        },
        ..AppConfig::default()
    }
}
