use thiserror::Error;

/// Main error type for the chatbot client
#[derive(Error, Debug)]
pub enum ChatbotError {
    /// The server answered with an application error; the payload is the
    /// server's own message (or the generic fallback).
    #[error("{0}")]
    ApiError(String),

    #[error("{0}")]
    NetworkError(String),

    #[error("{0}")]
    ParseError(String),

    /// Identity provider rejected the call (bad credentials, unknown user, ...)
    #[error("{0}")]
    IdentityError(String),

    #[error("Not signed in")]
    NotSignedIn,

    #[error("Parameter store error: {0}")]
    ParameterError(String),

    #[error("Storage error: {0}")]
    StorageError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

impl From<reqwest::Error> for ChatbotError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ChatbotError::ParseError(err.to_string())
        } else {
            ChatbotError::NetworkError(err.to_string())
        }
    }
}

impl From<serde_json::Error> for ChatbotError {
    fn from(err: serde_json::Error) -> Self {
        ChatbotError::ParseError(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, ChatbotError>;
