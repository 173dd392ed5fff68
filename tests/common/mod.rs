#![allow(dead_code)]

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use reqwest::{Method, StatusCode};
use serde_json::{json, Value};

use starwars_api::config::AppConfig;
use starwars_api::state::AppState;
use starwars_api::{database, router};

/// A real server on a free port, backed by its own in-memory database.
pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    client: reqwest::Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        Self::spawn_with(AppConfig::testing()).await
    }

    pub async fn spawn_with(config: AppConfig) -> Result<Self> {
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        let pool = database::connect(&config.database).await?;
        database::ensure_schema(&pool).await?;

        let listener = tokio::net::TcpListener::bind(("127.0.0.1", port))
            .await
            .with_context(|| format!("failed to bind {}", base_url))?;
        let app = router::app(AppState::new(pool, config));
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        let server = Self {
            port,
            base_url,
            client: reqwest::Client::new(),
        };
        server.wait_ready(Duration::from_secs(5)).await?;
        Ok(server)
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let deadline = Instant::now() + timeout;
        while Instant::now() < deadline {
            if let Ok(resp) = self.client.get(format!("{}/health", self.base_url)).send().await {
                if resp.status() == StatusCode::OK {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(50)).await;
        }
        anyhow::bail!("server did not become ready on {} within {:?}", self.base_url, timeout)
    }

    /// Send a request and decode the JSON response body.
    pub async fn send(
        &self,
        method: Method,
        path: &str,
        body: Option<Value>,
        token: Option<&str>,
    ) -> Result<(StatusCode, Value)> {
        let mut request = self.client.request(method, format!("{}{}", self.base_url, path));
        if let Some(body) = body {
            request = request.json(&body);
        }
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let resp = request.send().await?;
        let status = resp.status();
        let body = resp.json::<Value>().await.unwrap_or(Value::Null);
        Ok((status, body))
    }

    pub async fn get(&self, path: &str) -> Result<(StatusCode, Value)> {
        self.send(Method::GET, path, None, None).await
    }

    pub async fn post(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::POST, path, Some(body), None).await
    }

    pub async fn put(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::PUT, path, Some(body), None).await
    }

    pub async fn delete(&self, path: &str, body: Value) -> Result<(StatusCode, Value)> {
        self.send(Method::DELETE, path, Some(body), None).await
    }

    /// Register `email` with password `p` and log in, returning `(user_id, token)`.
    pub async fn register_and_login(&self, email: &str, name: &str) -> Result<(i64, String)> {
        let (status, body) = self
            .post(
                "/register",
                json!({"email": email, "name": name, "password": "p", "is_active": true}),
            )
            .await?;
        anyhow::ensure!(status == StatusCode::CREATED, "register failed: {} {}", status, body);

        let (status, body) = self.post("/login", json!({"email": email, "password": "p"})).await?;
        anyhow::ensure!(status == StatusCode::OK, "login failed: {} {}", status, body);

        let user_id = body["user_id"].as_i64().context("login response missing user_id")?;
        let token = body["token"].as_str().context("login response missing token")?.to_string();
        Ok((user_id, token))
    }

    /// Create a catalog row and return its id.
    pub async fn create(&self, collection: &str, fields: Value) -> Result<i64> {
        let (status, body) = self.post(&format!("/{}", collection), fields).await?;
        anyhow::ensure!(status == StatusCode::CREATED, "create failed: {} {}", status, body);
        body["id"].as_i64().context("create response missing id")
    }
}
