use serde::Serialize;

/// Body of `POST /chat/{sessionId}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatRequest {
    pub message: String,
    /// Model selector
    pub llm: String,
    /// Millisecond epoch at send time; also the last path segment
    #[serde(rename = "sessionId")]
    pub session_id: String,
}

/// Raw HTTP reply, before any interpretation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpReply {
    pub status: u16,
    pub body: String,
}

impl HttpReply {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    pub fn is_rate_limited(&self) -> bool {
        self.status == 429
    }
}

/// Result of one `send`, mirrored on the page
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendOutcome {
    /// Reply appended to the transcript
    Delivered { reply: String },
    /// Rejected locally; no network call was made
    Rejected,
    /// Server answered 429
    RateLimited,
    /// Transport, parse or application failure
    Failed(String),
}

impl SendOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, SendOutcome::Delivered { .. })
    }
}
