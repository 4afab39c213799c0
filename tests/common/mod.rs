#![allow(dead_code)]

use anyhow::{Context, Result};
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use drycraft_api::config::AppConfig;
use drycraft_api::{app, AppState};

pub const PASSWORD: &str = "secret-password";

/// One server per test: its own in-memory store on an ephemeral port
pub struct TestServer {
    pub base_url: String,
    pub client: Client,
}

pub async fn spawn_server() -> Result<TestServer> {
    let state = AppState::new(AppConfig::for_tests());
    let listener = TcpListener::bind("127.0.0.1:0").await.context("failed to bind test port")?;
    let addr = listener.local_addr()?;

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app(state)).await {
            eprintln!("test server stopped: {e}");
        }
    });

    Ok(TestServer {
        base_url: format!("http://{}", addr),
        client: Client::new(),
    })
}

/// A registered user and their bearer token
pub struct TestUser {
    pub id: String,
    pub username: String,
    pub token: String,
}

impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str) -> RequestBuilder {
        self.client.get(self.url(path))
    }

    pub fn post(&self, path: &str) -> RequestBuilder {
        self.client.post(self.url(path))
    }

    pub fn put(&self, path: &str) -> RequestBuilder {
        self.client.put(self.url(path))
    }

    pub fn delete(&self, path: &str) -> RequestBuilder {
        self.client.delete(self.url(path))
    }

    pub async fn register(&self, username: &str) -> Result<TestUser> {
        let res = self
            .post("/auth/register")
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": PASSWORD,
                "firstName": username,
            }))
            .send()
            .await?;
        let body = expect_status(res, StatusCode::CREATED).await?;

        Ok(TestUser {
            id: body["user"]["id"].as_str().context("user id missing")?.to_string(),
            username: username.to_string(),
            token: body["token"].as_str().context("token missing")?.to_string(),
        })
    }

    /// Number of items a public list endpoint returns
    pub async fn count(&self, path: &str) -> Result<usize> {
        let body = expect_status(self.get(path).send().await?, StatusCode::OK).await?;
        Ok(body.as_array().context("expected an array")?.len())
    }
}

/// Assert the status and return the JSON body (Null for empty bodies)
pub async fn expect_status(res: Response, expected: StatusCode) -> Result<Value> {
    let status = res.status();
    let text = res.text().await?;
    anyhow::ensure!(status == expected, "expected {}, got {}: {}", expected, status, text);

    if text.is_empty() {
        Ok(Value::Null)
    } else {
        serde_json::from_str(&text).with_context(|| format!("body was not JSON: {}", text))
    }
}
