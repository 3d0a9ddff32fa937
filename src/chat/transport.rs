use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Request};
use std::time::Duration;

use super::types::{ChatRequest, HttpReply};
use crate::utils::Result;

/// Sends a chat request and hands back the raw reply
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// POST `body` as JSON to `url`, with the raw token as `Authorization`
    async fn post_json(&self, url: &str, token: &str, body: &ChatRequest) -> Result<HttpReply>;
}

/// reqwest-backed transport
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
        })
    }

    /// The request `post_json` sends: raw token as `Authorization`, JSON body
    fn build_request(&self, url: &str, token: &str, body: &ChatRequest) -> Result<Request> {
        Ok(self
            .client
            .post(url)
            .header(AUTHORIZATION, token)
            .header(CONTENT_TYPE, "application/json")
            .body(serde_json::to_string(body)?)
            .build()?)
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn post_json(&self, url: &str, token: &str, body: &ChatRequest) -> Result<HttpReply> {
        let request = self.build_request(url, token, body)?;
        let response = self.client.execute(request).await?;

        let status = response.status().as_u16();
        let body = response.text().await?;
        tracing::debug!(status, bytes = body.len(), "chat endpoint replied");

        Ok(HttpReply { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use reqwest::Method;
    use serde_json::{json, Value};

    fn request() -> ChatRequest {
        ChatRequest {
            message: "hello".to_string(),
            llm: "titan-text-express-v1".to_string(),
            session_id: "42".to_string(),
        }
    }

    #[test]
    fn test_request_carries_raw_token_and_json_body() {
        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        let built = transport
            .build_request("https://chat.example.net/chat/42", "eyJraWQ.tok", &request())
            .unwrap();

        assert_eq!(built.method(), &Method::POST);
        assert_eq!(built.url().as_str(), "https://chat.example.net/chat/42");

        // No "Bearer " prefix
        let headers = built.headers();
        assert_eq!(headers.get(AUTHORIZATION).unwrap(), "eyJraWQ.tok");
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");

        let bytes = built.body().and_then(|b| b.as_bytes()).unwrap();
        let body: Value = serde_json::from_slice(bytes).unwrap();
        assert_eq!(
            body,
            json!({ "message": "hello", "llm": "titan-text-express-v1", "sessionId": "42" })
        );
    }

    #[test]
    fn test_invalid_url_is_an_error() {
        let transport = HttpTransport::new(Duration::from_secs(5)).unwrap();
        assert!(transport.build_request("not a url", "tok", &request()).is_err());
    }
}
