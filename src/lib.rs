pub mod app;
pub mod auth;
pub mod chat;
pub mod cli;
pub mod constants;
pub mod params;
pub mod runtime;
pub mod storage;
pub mod utils;
pub mod view;

pub use app::{load_config, Config, IdentitySettings};
pub use auth::{IdentityProvider, SessionManager};
pub use chat::{ChatRelay, ChatTransport, SendOutcome};
pub use params::{ConfigFetcher, ParameterStore};
pub use storage::TokenStore;
pub use utils::ChatbotError;
