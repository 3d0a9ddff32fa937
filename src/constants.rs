/// Constants module to avoid magic numbers in the codebase

// AWS
pub const DEFAULT_AWS_REGION: &str = "us-west-2";
pub const DEFAULT_PARAMETER_PREFIX: &str = "/chatbot-mvp";
pub const PARAM_IDENTITY_POOL_ID: &str = "cognito-identity-pool-id";
pub const PARAM_USER_POOL_ID: &str = "cognito-user-pool-id";
pub const PARAM_CLIENT_ID: &str = "cognito-client-id";

// Network Configuration
pub const DEFAULT_CHAT_ENDPOINT: &str = "https://chat.pandoracloud.net";
pub const HTTP_REQUEST_TIMEOUT_SECS: u64 = 120;

// Client-local storage
pub const TOKEN_STORAGE_KEY: &str = "idToken";
pub const SESSION_FILE_NAME: &str = "session.json";
pub const IDENTITY_FILE_NAME: &str = "identity.toml";
pub const CONFIG_FILE_NAME: &str = "config.toml";
pub const LOCAL_CONFIG_PATH: &str = ".chatbot/config.toml";
pub const ENV_PREFIX: &str = "CHATBOT_";

// Chat
pub const DEFAULT_LLM: &str = "titan-text-express-v1";
pub const KNOWN_LLMS: &[&str] = &["titan-text-express-v1"];
pub const MAX_MESSAGE_CHARS: usize = 1000;

// User-visible messages
pub const MSG_EMPTY_MESSAGE: &str = "Please enter a message";
pub const MSG_RATE_LIMITED: &str = "Too many requests, please wait.";
pub const MSG_CHAT_FAILED: &str = "Chat request failed";
pub const MSG_NOT_SIGNED_IN: &str = "Not signed in";
