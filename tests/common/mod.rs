#![allow(dead_code)]

use std::sync::Arc;

use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use serde_json::{json, Value};

use reel_api::auth::ManualClock;
use reel_api::config::AppConfig;
use reel_api::database::Database;
use reel_api::routes::app;
use reel_api::state::AppState;

pub const SECRET: &str = "integration-secret-at-least-32-bytes-long";
pub const ADMIN_USER: &str = "root";
pub const ADMIN_PASSWORD: &str = "root-password";

/// One server per test: fresh in-memory database, manual clock, seeded administrator
pub struct TestServer {
    pub base_url: String,
    pub state: AppState,
    pub clock: Arc<ManualClock>,
    pub client: Client,
}

impl TestServer {
    pub async fn spawn() -> Result<Self> {
        let config = AppConfig::with_secret(SECRET)?;
        let db = Database::in_memory().await?;
        let clock = Arc::new(ManualClock::starting_now());
        let state = AppState::new(config, db, clock.clone())?;
        state.accounts.create_admin(ADMIN_USER, ADMIN_PASSWORD).await?;

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("failed to bind ephemeral port")?;
        let base_url = format!("http://{}", listener.local_addr()?);

        let router = app(state.clone());
        tokio::spawn(async move {
            let _ = axum::serve(listener, router).await;
        });

        Ok(Self {
            base_url,
            state,
            clock,
            client: Client::new(),
        })
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub async fn login(&self, user: &str, pswd: &str) -> Result<Response> {
        Ok(self
            .client
            .post(self.url("/login"))
            .json(&json!({ "user": user, "pswd": pswd }))
            .send()
            .await?)
    }

    pub async fn token(&self, user: &str, pswd: &str) -> Result<String> {
        let res = self.login(user, pswd).await?;
        anyhow::ensure!(res.status() == StatusCode::OK, "login failed: {}", res.status());
        let body = data(res).await?;
        body["token"].as_str().map(str::to_string).context("no token in login response")
    }

    pub async fn admin_token(&self) -> Result<String> {
        self.token(ADMIN_USER, ADMIN_PASSWORD).await
    }

    /// Registers `user` and returns (id, token)
    pub async fn user_with_token(&self, user: &str, pswd: &str) -> Result<(i64, String)> {
        let res = self
            .client
            .post(self.url("/users"))
            .json(&json!({ "user": user, "pswd": pswd }))
            .send()
            .await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "register failed: {}", res.status());
        let id = data(res).await?["id"].as_i64().context("no id in register response")?;
        Ok((id, self.token(user, pswd).await?))
    }

    pub async fn create_movie(&self, admin_token: &str, body: Value) -> Result<i64> {
        let res = self.post("/movies", admin_token, body).await?;
        anyhow::ensure!(res.status() == StatusCode::CREATED, "create movie failed: {}", res.status());
        data(res).await?["id"].as_i64().context("no id in movie response")
    }

    pub async fn get(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.get(self.url(path)).header("Authorization", token).send().await?)
    }

    pub async fn post(&self, path: &str, token: &str, body: Value) -> Result<Response> {
        Ok(self
            .client
            .post(self.url(path))
            .header("Authorization", token)
            .json(&body)
            .send()
            .await?)
    }

    pub async fn put(&self, path: &str, token: &str, body: Value) -> Result<Response> {
        Ok(self
            .client
            .put(self.url(path))
            .header("Authorization", token)
            .json(&body)
            .send()
            .await?)
    }

    pub async fn delete(&self, path: &str, token: &str) -> Result<Response> {
        Ok(self.client.delete(self.url(path)).header("Authorization", token).send().await?)
    }
}

/// The `data` member of a success envelope
pub async fn data(res: Response) -> Result<Value> {
    let body = res.json::<Value>().await?;
    anyhow::ensure!(body["success"] == true, "not a success envelope: {}", body);
    Ok(body["data"].clone())
}

/// The `error` message of an error body
pub async fn error_message(res: Response) -> Result<String> {
    let body = res.json::<Value>().await?;
    anyhow::ensure!(body["success"] == false, "not an error body: {}", body);
    body["error"].as_str().map(str::to_string).context("no error message")
}
