//! Test helpers for integration tests
//!
//! Provides a test server wrapper, HTTP shortcuts, and WebSocket readers.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use futures_util::StreamExt;
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::net::{TcpListener, TcpStream};
use tokio::task::JoinHandle;
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};

use reactor_common::{AppConfig, AppError};
use reactor_db::{MemoryOutcomeRepository, MemoryPolicyRepository, MemorySettingsRepository};
use reactor_gateway::{Gateway, Stores};
use reactor_service::{EventBus, ReactionPipeline, ShutdownTrigger};

use crate::fixtures::ScriptedClient;

pub type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// How long a test waits for one pushed message
pub const PUSH_TIMEOUT: Duration = Duration::from_secs(5);

/// Running gateway with handles on its in-memory stores
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    pub policies: Arc<MemoryPolicyRepository>,
    pub outcomes: Arc<MemoryOutcomeRepository>,
    pub settings: Arc<MemorySettingsRepository>,
    pub platform: Arc<ScriptedClient>,
    pipeline: ReactionPipeline,
    events: EventBus,
    shutdown: Arc<ShutdownTrigger>,
    handle: JoinHandle<Result<(), AppError>>,
}

impl TestServer {
    /// Start a new test server
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config()?).await
    }

    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let policies = Arc::new(MemoryPolicyRepository::new());
        let outcomes = Arc::new(MemoryOutcomeRepository::new());
        let settings = Arc::new(MemorySettingsRepository::new());
        let platform = Arc::new(ScriptedClient::new());

        let stores = Stores {
            policies: policies.clone(),
            outcomes: outcomes.clone(),
            settings: settings.clone(),
            database: None,
        };
        let gateway = Gateway::new(config, stores, platform.clone(), None)?;

        let pipeline = gateway.pipeline().clone();
        let events = gateway.state().services().events().clone();
        let shutdown = gateway.shutdown_handle();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let handle = tokio::spawn(gateway.serve(listener));

        // Wait for server to be ready
        tokio::time::sleep(Duration::from_millis(100)).await;

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            policies,
            outcomes,
            settings,
            platform,
            pipeline,
            events,
            shutdown,
            handle,
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn pipeline(&self) -> &ReactionPipeline {
        &self.pipeline
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Open a dashboard socket
    pub async fn connect_ws(&self) -> Result<WsStream> {
        let (ws, _) = connect_async(self.ws_url()).await?;
        Ok(ws)
    }

    /// Trigger shutdown and wait for the server to return
    pub async fn shutdown(self) -> Result<()> {
        self.shutdown.trigger();
        tokio::time::timeout(Duration::from_secs(5), self.handle)
            .await
            .context("gateway did not stop")??
            .map_err(|e| anyhow::anyhow!("gateway error: {e}"))
    }
}

/// Configuration for a local, in-memory gateway
pub fn test_config() -> Result<AppConfig> {
    AppConfig::from_lookup(|name| {
        let value = match name {
            "GATEWAY_HOST" => "127.0.0.1",
            "GATEWAY_PORT" => "0",
            "BROADCAST_INTERVAL_SECS" => "1",
            "RETRY_BASE_DELAY_SECS" => "0.01",
            _ => return None,
        };
        Some(value.to_string())
    })
    .map_err(|e| anyhow::anyhow!("Config error: {e}"))
}

/// Next pushed JSON message; control frames are skipped
pub async fn next_push(ws: &mut WsStream) -> Result<Value> {
    loop {
        let frame = tokio::time::timeout(PUSH_TIMEOUT, ws.next())
            .await
            .context("timed out waiting for push")?
            .context("socket closed")??;
        match frame {
            Message::Text(text) => return Ok(serde_json::from_str(&text)?),
            Message::Close(_) => anyhow::bail!("socket closed by server"),
            _ => {}
        }
    }
}

/// Next pushed message of type `kind`, skipping others
pub async fn next_push_of(ws: &mut WsStream, kind: &str) -> Result<Value> {
    loop {
        let message = next_push(ws).await?;
        if message["type"] == kind {
            return Ok(message);
        }
    }
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!("Expected status {expected_status}, got {status}. Body: {body}");
    }
    Ok(response.json().await?)
}

/// Assert an error response and return its `error.code`
pub async fn assert_error(response: Response, expected_status: StatusCode) -> Result<String> {
    let body: Value = assert_json(response, expected_status).await?;
    body["error"]["code"]
        .as_str()
        .map(str::to_string)
        .context("missing error code")
}
