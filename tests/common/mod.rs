use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use messagely_api::auth::JwtKeys;
use messagely_api::config::{AppConfig, StorageBackend};
use messagely_api::database::models::UserSummary;
use messagely_api::database::MemoryMessageStore;
use messagely_api::{app, AppState};
use reqwest::StatusCode;
use serde_json::Value;

pub const JWT_SECRET: &str = "integration-test-secret";

pub struct TestServer {
    pub base_url: String,
    pub keys: JwtKeys,
    pub client: reqwest::Client,
}

fn user(username: &str, first_name: &str) -> UserSummary {
    UserSummary {
        username: username.to_string(),
        first_name: first_name.to_string(),
        last_name: "Tester".to_string(),
        phone: "+15550001111".to_string(),
    }
}

impl TestServer {
    /// Serve the real router over the in-memory store on a free port.
    ///
    /// Each test gets its own server: a tokio test runtime is torn down with
    /// the test, taking any spawned server with it.
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(|_| {}).await
    }

    /// Like [`TestServer::spawn`], with a chance to adjust the config first
    pub async fn spawn_with(configure: impl FnOnce(&mut AppConfig)) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let mut config = AppConfig::from_env();
        config.database.storage = StorageBackend::Memory;
        config.api.enable_request_logging = false;
        configure(&mut config);

        let store = MemoryMessageStore::with_users([
            user("alice", "Alice"),
            user("bob", "Bob"),
            user("carol", "Carol"),
        ]);
        let keys = JwtKeys::new(JWT_SECRET, 1)?;
        let router = app(AppState::new(Arc::new(store), keys.clone()), &config);

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        let server = Self {
            base_url,
            keys,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = tokio::time::Instant::now() + timeout;
        while tokio::time::Instant::now() < deadline {
            if let Ok(resp) = self.client.get(self.url("/health")).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn token(&self, username: &str) -> String {
        self.keys.issue(username).expect("token")
    }

    pub async fn get_as(&self, username: &str, path: &str) -> Result<(StatusCode, Value)> {
        let res = self
            .client
            .get(self.url(path))
            .bearer_auth(self.token(username))
            .send()
            .await?;
        Ok((res.status(), res.json().await?))
    }

    pub async fn post_as(&self, username: &str, path: &str, body: Option<Value>) -> Result<(StatusCode, Value)> {
        let mut req = self.client.post(self.url(path)).bearer_auth(self.token(username));
        if let Some(body) = body {
            req = req.json(&body);
        }
        let res = req.send().await?;
        Ok((res.status(), res.json().await?))
    }

    /// Send a message and return its id
    pub async fn send(&self, from: &str, to: &str, body: &str) -> Result<i64> {
        let (status, json) = self
            .post_as(from, "/messages", Some(serde_json::json!({ "to_username": to, "body": body })))
            .await?;
        anyhow::ensure!(status == StatusCode::OK, "send failed: {} {}", status, json);
        json["message"]["id"].as_i64().context("missing message id")
    }
}
