use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

use super::transport::ChatTransport;
use super::types::{ChatRequest, HttpReply, SendOutcome};
use crate::constants::{
    MAX_MESSAGE_CHARS, MSG_CHAT_FAILED, MSG_EMPTY_MESSAGE, MSG_RATE_LIMITED,
};
use crate::storage::TokenStore;
use crate::utils::{ChatbotError, Result};
use crate::view::Page;

/// What the server made of one request
#[derive(Debug, PartialEq, Eq)]
enum Exchange {
    Reply(String),
    RateLimited,
}

/// Relays messages from the page to the chat endpoint
pub struct ChatRelay {
    transport: Arc<dyn ChatTransport>,
    tokens: Arc<dyn TokenStore>,
    endpoint: String,
}

impl ChatRelay {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        tokens: Arc<dyn TokenStore>,
        endpoint: impl Into<String>,
    ) -> Self {
        Self {
            transport,
            tokens,
            endpoint: endpoint.into(),
        }
    }

    /// Send `page.message` with `page.llm` and render the outcome on the page.
    ///
    /// Never returns an error: every failure ends up in `page.chat_error`.
    pub async fn send(&self, page: &mut Page) -> SendOutcome {
        let message = page.message.clone();

        if message.is_empty() {
            page.chat_error = MSG_EMPTY_MESSAGE.to_string();
            return SendOutcome::Rejected;
        }
        if message.chars().count() > MAX_MESSAGE_CHARS {
            page.chat_error = format!("Message must be less than {} characters", MAX_MESSAGE_CHARS);
            return SendOutcome::Rejected;
        }

        match self.exchange(&message, &page.llm).await {
            Ok(Exchange::Reply(reply)) => {
                page.append_transcript(format!("You: {}", message));
                page.append_transcript(format!("Bot: {}", reply));
                page.message.clear();
                page.chat_error.clear();
                SendOutcome::Delivered { reply }
            }
            Ok(Exchange::RateLimited) => {
                warn!("chat endpoint rate limited the request");
                page.chat_error = MSG_RATE_LIMITED.to_string();
                SendOutcome::RateLimited
            }
            Err(e) => {
                debug!("chat request failed: {:?}", e);
                page.chat_error = format!("Error: {}", e);
                SendOutcome::Failed(e.to_string())
            }
        }
    }

    async fn exchange(&self, message: &str, llm: &str) -> Result<Exchange> {
        let token = self
            .tokens
            .get()?
            .filter(|t| !t.is_empty())
            .ok_or(ChatbotError::NotSignedIn)?;

        let session_id = new_session_id();
        let url = chat_url(&self.endpoint, &session_id);
        let request = ChatRequest {
            message: message.to_string(),
            llm: llm.to_string(),
            session_id,
        };

        info!(llm, url = %url, "sending chat message");
        let reply = self.transport.post_json(&url, &token, &request).await?;
        interpret(reply)
    }
}

/// Per-message id: millisecond Unix epoch as a string
fn new_session_id() -> String {
    chrono::Utc::now().timestamp_millis().to_string()
}

fn chat_url(endpoint: &str, session_id: &str) -> String {
    format!("{}/chat/{}", endpoint.trim_end_matches('/'), session_id)
}

fn interpret(reply: HttpReply) -> Result<Exchange> {
    // 429 is answered before the body is looked at
    if reply.is_rate_limited() {
        return Ok(Exchange::RateLimited);
    }

    let body: Value = serde_json::from_str(&reply.body)?;

    if !reply.is_success() {
        // An empty `error` falls back to the generic message
        let message = text_field(&body, "error")
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| MSG_CHAT_FAILED.to_string());
        return Err(ChatbotError::ApiError(message));
    }

    // An empty `response` is still a reply
    text_field(&body, "response")
        .map(Exchange::Reply)
        .ok_or_else(|| ChatbotError::ParseError("reply has no `response` field".to_string()))
}

/// String value of `key`, or the JSON text of a non-string value
fn text_field(body: &Value, key: &str) -> Option<String> {
    match body.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::transport::MockChatTransport;
    use crate::storage::MemoryTokenStore;
    use pretty_assertions::assert_eq;

    const ENDPOINT: &str = "https://chat.example.net";

    fn relay_with(transport: MockChatTransport, tokens: MemoryTokenStore) -> ChatRelay {
        ChatRelay::new(Arc::new(transport), Arc::new(tokens), ENDPOINT)
    }

    fn page_with(message: &str) -> Page {
        let mut page = Page::new("titan-text-express-v1");
        page.message = message.to_string();
        page
    }

    fn replying(status: u16, body: &'static str) -> MockChatTransport {
        let mut transport = MockChatTransport::new();
        transport.expect_post_json().times(1).returning(move |_, _, _| {
            Ok(HttpReply {
                status,
                body: body.to_string(),
            })
        });
        transport
    }

    #[tokio::test]
    async fn test_successful_send_appends_two_entries() {
        let mut transport = MockChatTransport::new();
        transport
            .expect_post_json()
            .withf(|url, token, body| {
                token.to_string() == "tok-123"
                    && body.message == "hello"
                    && body.llm == "titan-text-express-v1"
                    && url.to_string() == format!("{}/chat/{}", ENDPOINT, body.session_id)
            })
            .times(1)
            .returning(|_, _, _| {
                Ok(HttpReply {
                    status: 200,
                    body: r#"{"response":"hi","sessionId":"1"}"#.to_string(),
                })
            });

        let relay = relay_with(transport, MemoryTokenStore::with_token("tok-123"));
        let mut page = page_with("hello");
        page.chat_error = "stale".to_string();

        let outcome = relay.send(&mut page).await;

        assert_eq!(outcome, SendOutcome::Delivered { reply: "hi".to_string() });
        assert_eq!(page.transcript(), ["You: hello".to_string(), "Bot: hi".to_string()]);
        assert_eq!(page.message, "");
        assert_eq!(page.chat_error, "");
    }

    #[tokio::test]
    async fn test_empty_message_makes_no_call() {
        let mut transport = MockChatTransport::new();
        transport.expect_post_json().never();

        let relay = relay_with(transport, MemoryTokenStore::with_token("tok"));
        let mut page = page_with("");

        assert_eq!(relay.send(&mut page).await, SendOutcome::Rejected);
        assert_eq!(page.chat_error, "Please enter a message");
        assert!(page.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_overlong_message_makes_no_call() {
        let mut transport = MockChatTransport::new();
        transport.expect_post_json().never();

        let relay = relay_with(transport, MemoryTokenStore::with_token("tok"));
        let mut page = page_with(&"x".repeat(MAX_MESSAGE_CHARS + 1));

        assert_eq!(relay.send(&mut page).await, SendOutcome::Rejected);
        assert_eq!(page.chat_error, "Message must be less than 1000 characters");
    }

    #[tokio::test]
    async fn test_rate_limited_leaves_transcript_alone() {
        // Body is not JSON: a 429 must not be parsed
        let relay = relay_with(
            replying(429, "<html>slow down</html>"),
            MemoryTokenStore::with_token("tok"),
        );
        let mut page = page_with("hello");

        assert_eq!(relay.send(&mut page).await, SendOutcome::RateLimited);
        assert_eq!(page.chat_error, "Too many requests, please wait.");
        assert!(page.transcript().is_empty());
        assert_eq!(page.message, "hello");
    }

    #[tokio::test]
    async fn test_server_error_uses_body_error() {
        let relay = relay_with(replying(500, r#"{"error":"boom"}"#), MemoryTokenStore::with_token("tok"));
        let mut page = page_with("hello");

        assert_eq!(relay.send(&mut page).await, SendOutcome::Failed("boom".to_string()));
        assert_eq!(page.chat_error, "Error: boom");
        assert!(page.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_empty_reply_is_rendered() {
        let relay = relay_with(
            replying(200, r#"{"response":"","sessionId":"1"}"#),
            MemoryTokenStore::with_token("tok"),
        );
        let mut page = page_with("hello");

        let outcome = relay.send(&mut page).await;

        assert_eq!(outcome, SendOutcome::Delivered { reply: String::new() });
        assert_eq!(page.transcript(), ["You: hello".to_string(), "Bot: ".to_string()]);
        assert_eq!(page.chat_error, "");
    }

    #[tokio::test]
    async fn test_server_error_with_empty_error_field() {
        let relay = relay_with(replying(502, r#"{"error":""}"#), MemoryTokenStore::with_token("tok"));
        let mut page = page_with("hello");

        relay.send(&mut page).await;
        assert_eq!(page.chat_error, "Error: Chat request failed");
    }

    #[tokio::test]
    async fn test_server_error_without_error_field() {
        let relay = relay_with(replying(500, "{}"), MemoryTokenStore::with_token("tok"));
        let mut page = page_with("hello");

        relay.send(&mut page).await;
        assert_eq!(page.chat_error, "Error: Chat request failed");
        assert!(page.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_malformed_json_is_reported() {
        let relay = relay_with(replying(200, "not json"), MemoryTokenStore::with_token("tok"));
        let mut page = page_with("hello");

        assert!(matches!(relay.send(&mut page).await, SendOutcome::Failed(_)));
        assert!(page.chat_error.starts_with("Error: "));
        assert!(page.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_success_without_response_field_fails() {
        let relay = relay_with(replying(200, r#"{"sessionId":"1"}"#), MemoryTokenStore::with_token("tok"));
        let mut page = page_with("hello");

        assert!(matches!(relay.send(&mut page).await, SendOutcome::Failed(_)));
        assert!(page.transcript().is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported() {
        let mut transport = MockChatTransport::new();
        transport
            .expect_post_json()
            .times(1)
            .returning(|_, _, _| Err(ChatbotError::NetworkError("connection refused".to_string())));

        let relay = relay_with(transport, MemoryTokenStore::with_token("tok"));
        let mut page = page_with("hello");

        relay.send(&mut page).await;
        assert_eq!(page.chat_error, "Error: connection refused");
    }

    #[tokio::test]
    async fn test_missing_token_makes_no_call() {
        let mut transport = MockChatTransport::new();
        transport.expect_post_json().never();

        let relay = relay_with(transport, MemoryTokenStore::new());
        let mut page = page_with("hello");

        assert!(matches!(relay.send(&mut page).await, SendOutcome::Failed(_)));
        assert_eq!(page.chat_error, "Error: Not signed in");
    }

    #[test]
    fn test_chat_url_trims_trailing_slash() {
        assert_eq!(chat_url("https://h.net/", "42"), "https://h.net/chat/42");
        assert_eq!(chat_url("https://h.net", "42"), "https://h.net/chat/42");
    }

    #[test]
    fn test_session_id_is_epoch_millis() {
        let id: i64 = new_session_id().parse().unwrap();
        assert!(id > 1_600_000_000_000);
    }
}
