use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::{
    app::{load_config, load_config_from, session_file, Config},
    auth::SessionManager,
    chat::{ChatRelay, HttpTransport},
    storage::{FileTokenStore, TokenStore},
};

/// Wires configuration, storage and the two network components together
pub struct ChatClient {
    config: Config,
    tokens: Arc<dyn TokenStore>,
    token_path: Option<PathBuf>,
}

impl ChatClient {
    pub fn new(config: Config, tokens: Arc<dyn TokenStore>) -> Self {
        Self {
            config,
            tokens,
            token_path: None,
        }
    }

    /// Load configuration (explicit file or standard sources) and open the
    /// token file in the data directory
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        let config = match config_path {
            Some(path) => load_config_from(path)?,
            None => load_config()?,
        };
        let path = session_file()?;
        let tokens = Arc::new(FileTokenStore::new(path.clone()));
        Ok(Self {
            config,
            tokens,
            token_path: Some(path),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.tokens
    }

    pub fn token_path(&self) -> Option<&PathBuf> {
        self.token_path.as_ref()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.chat.timeout_secs)
    }

    /// Session manager bound to the configured user pool
    pub fn session_manager(&self) -> Result<SessionManager> {
        let settings = self.config.identity_settings()?;
        SessionManager::from_settings(&settings, self.tokens.clone(), self.timeout())
            .context("Failed to create identity provider client")
    }

    /// Chat relay bound to the configured endpoint
    pub fn relay(&self) -> Result<ChatRelay> {
        let transport = HttpTransport::new(self.timeout()).context("Failed to create HTTP client")?;
        Ok(ChatRelay::new(
            Arc::new(transport),
            self.tokens.clone(),
            self.config.chat.endpoint.clone(),
        ))
    }

    /// `llm` if given, else the configured default
    pub fn model_selector(&self, llm: Option<String>) -> String {
        llm.unwrap_or_else(|| self.config.chat.default_llm.clone())
    }
}
