use std::time::Duration;

use reqwest::{Client, Method, RequestBuilder, Response, StatusCode};
use serde::{de::DeserializeOwned, Deserialize};
use serde_json::{json, Value};
use url::Url;
use uuid::Uuid;

use crate::models::{Message, Notification, Post, Product, PublicUser, Tutorial};

use super::{ClientError, Result, RetryPolicy};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

/// Token plus the signed-in user, as returned by login and register
#[derive(Debug, Clone, Deserialize)]
pub struct AuthSession {
    pub token: String,
    pub user: PublicUser,
}

#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base: Url,
    token: Option<String>,
    media_retry: RetryPolicy,
}

impl ApiClient {
    pub fn new(base_url: &str) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self> {
        // A trailing slash keeps Url::join from dropping the last path segment
        let mut base = Url::parse(base_url)?;
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base,
            token: None,
            media_retry: RetryPolicy::default(),
        })
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    pub fn with_media_retry(mut self, policy: RetryPolicy) -> Self {
        self.media_retry = policy;
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base
    }

    pub fn token(&self) -> Option<&str> {
        self.token.as_deref()
    }

    pub fn set_token(&mut self, token: Option<String>) {
        self.token = token;
    }

    fn url(&self, path: &str) -> Result<Url> {
        Ok(self.base.join(path.trim_start_matches('/'))?)
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let builder = self.http.request(method, self.url(path)?);
        Ok(match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        if self.token.is_none() {
            return Err(ClientError::NotAuthenticated);
        }
        self.request(method, path)
    }

    async fn json<T: DeserializeOwned>(builder: RequestBuilder) -> Result<T> {
        let response = check(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }

    // Health

    pub async fn health(&self) -> Result<Value> {
        let response = self.request(Method::GET, "health")?.send().await?;
        // 503 still carries the health body
        if response.status() == StatusCode::SERVICE_UNAVAILABLE {
            return Ok(response.json().await?);
        }
        Ok(check(response).await?.json().await?)
    }

    // Auth

    pub async fn login(&self, username: &str, password: &str) -> Result<AuthSession> {
        let body = json!({ "username": username, "password": password });
        Self::json(self.request(Method::POST, "auth/login")?.json(&body)).await
    }

    pub async fn register(&self, username: &str, email: &str, password: &str) -> Result<AuthSession> {
        let body = json!({ "username": username, "email": email, "password": password });
        Self::json(self.request(Method::POST, "auth/register")?.json(&body)).await
    }

    // Posts

    pub async fn posts(&self) -> Result<Vec<Post>> {
        Self::json(self.request(Method::GET, "posts")?).await
    }

    pub async fn create_post(&self, content: &str, image_urls: &[String], video_url: Option<&str>) -> Result<Post> {
        let body = json!({ "content": content, "imageUrls": image_urls, "videoUrl": video_url });
        Self::json(self.authed(Method::POST, "posts")?.json(&body)).await
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<()> {
        check(self.authed(Method::DELETE, &format!("posts/{}", id))?.send().await?).await?;
        Ok(())
    }

    // Products

    pub async fn products(&self) -> Result<Vec<Product>> {
        Self::json(self.request(Method::GET, "products")?).await
    }

    pub async fn product(&self, id: Uuid) -> Result<Product> {
        Self::json(self.request(Method::GET, &format!("products/{}", id))?).await
    }

    // Tutorials

    pub async fn tutorials(&self) -> Result<Vec<Tutorial>> {
        Self::json(self.request(Method::GET, "tutorials")?).await
    }

    pub async fn tutorial(&self, id: Uuid) -> Result<Tutorial> {
        Self::json(self.request(Method::GET, &format!("tutorials/{}", id))?).await
    }

    /// `body` uses the API's field names (title, description, steps, ...)
    pub async fn create_tutorial(&self, body: &Value) -> Result<Tutorial> {
        Self::json(self.authed(Method::POST, "tutorials")?.json(body)).await
    }

    // Messages and notifications

    pub async fn unread_messages(&self, user_id: Uuid) -> Result<Vec<Message>> {
        Self::json(self.authed(Method::GET, &format!("messages/unread/{}", user_id))?).await
    }

    pub async fn unread_notifications(&self) -> Result<Vec<Notification>> {
        Self::json(self.authed(Method::GET, "notifications/unread")?).await
    }

    // Media. Transfers go to external URLs and use the retry policy.

    pub async fn fetch_media(&self, url: &str) -> Result<Vec<u8>> {
        let url = Url::parse(url)?;
        self.media_retry
            .run("media fetch", || {
                let request = self.http.get(url.clone());
                async move {
                    let response = check(request.send().await?).await?;
                    Ok::<Vec<u8>, ClientError>(response.bytes().await?.to_vec())
                }
            })
            .await
    }

    pub async fn upload_media(&self, url: &str, bytes: Vec<u8>, content_type: &str) -> Result<Value> {
        let url = Url::parse(url)?;
        self.media_retry
            .run("media upload", || {
                let mut request = self
                    .http
                    .put(url.clone())
                    .header(reqwest::header::CONTENT_TYPE, content_type)
                    .body(bytes.clone());
                if let Some(token) = &self.token {
                    request = request.bearer_auth(token);
                }
                async move {
                    let response = check(request.send().await?).await?;
                    let text = response.text().await?;
                    let value = serde_json::from_str::<Value>(&text).unwrap_or(Value::String(text));
                    Ok::<Value, ClientError>(value)
                }
            })
            .await
    }
}

/// Turn a non-success response into `ClientError::Api`, keeping the
/// server's message when the body has one
async fn check(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let text = response.text().await.unwrap_or_default();
    Err(ClientError::Api {
        status: status.as_u16(),
        message: error_message(status, &text),
    })
}

fn error_message(status: StatusCode, body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|v| {
            v.get("message")
                .or_else(|| v.get("error"))
                .and_then(Value::as_str)
                .map(str::to_string)
        })
        .unwrap_or_else(|| format!("Request failed with status {}", status.as_u16()))
}
