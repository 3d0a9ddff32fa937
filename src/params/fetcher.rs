use clap::ValueEnum;
use serde::Serialize;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use super::store::ParameterStore;
use crate::app::IdentityConfig;
use crate::constants::{PARAM_CLIENT_ID, PARAM_IDENTITY_POOL_ID, PARAM_USER_POOL_ID};
use crate::utils::{log_info, ChatbotError, Result};

/// Format of the generated configuration file
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ConfigFormat {
    /// `[identity]` table merged by the config loader
    Toml,
    /// Browser script with `window.REACT_APP_*` globals
    Js,
}

/// The three Cognito ids kept in the parameter store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedIdentity {
    pub identity_pool_id: String,
    pub user_pool_id: String,
    pub client_id: String,
}

impl From<FetchedIdentity> for IdentityConfig {
    fn from(fetched: FetchedIdentity) -> Self {
        IdentityConfig {
            identity_pool_id: Some(fetched.identity_pool_id),
            user_pool_id: Some(fetched.user_pool_id),
            client_id: Some(fetched.client_id),
        }
    }
}

#[derive(Serialize)]
struct GeneratedToml {
    identity: IdentityConfig,
}

/// Copies the Cognito ids from the parameter store into a generated file
pub struct ConfigFetcher {
    store: Arc<dyn ParameterStore>,
    prefix: String,
}

impl ConfigFetcher {
    pub fn new(store: Arc<dyn ParameterStore>, prefix: impl Into<String>) -> Self {
        Self {
            store,
            prefix: prefix.into(),
        }
    }

    /// Full parameter paths, in identity-pool, user-pool, client order
    pub fn parameter_names(&self) -> Vec<String> {
        let prefix = self.prefix.trim_end_matches('/');
        [PARAM_IDENTITY_POOL_ID, PARAM_USER_POOL_ID, PARAM_CLIENT_ID]
            .iter()
            .map(|name| format!("{}/{}", prefix, name))
            .collect()
    }

    /// Read all three ids; any missing one fails the whole fetch
    pub async fn fetch(&self) -> Result<FetchedIdentity> {
        let names = self.parameter_names();
        let params = self.store.get_parameters(&names, true).await?;

        let mut values: HashMap<String, String> = params
            .into_iter()
            .map(|p| (p.key().to_string(), p.value))
            .collect();

        let mut take = |key: &str| values.remove(key).filter(|v| !v.is_empty());
        let identity_pool_id = take(PARAM_IDENTITY_POOL_ID);
        let user_pool_id = take(PARAM_USER_POOL_ID);
        let client_id = take(PARAM_CLIENT_ID);

        match (identity_pool_id, user_pool_id, client_id) {
            (Some(identity_pool_id), Some(user_pool_id), Some(client_id)) => Ok(FetchedIdentity {
                identity_pool_id,
                user_pool_id,
                client_id,
            }),
            (a, b, c) => {
                let missing: Vec<&str> = [
                    (a.is_none(), names[0].as_str()),
                    (b.is_none(), names[1].as_str()),
                    (c.is_none(), names[2].as_str()),
                ]
                .iter()
                .filter(|(absent, _)| *absent)
                .map(|(_, name)| *name)
                .collect();
                Err(ChatbotError::ParameterError(format!(
                    "missing parameters: {}",
                    missing.join(", ")
                )))
            }
        }
    }

    /// Fetch and write the generated file. Nothing is written on failure.
    pub async fn fetch_to_file(&self, path: &Path, format: ConfigFormat) -> Result<FetchedIdentity> {
        let identity = self.fetch().await?;
        let content = render(&identity, format)?;

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, content)?;

        log_info("config", format!("{} updated with parameter store values", path.display()));
        Ok(identity)
    }
}

/// Render the generated file contents
pub fn render(identity: &FetchedIdentity, format: ConfigFormat) -> Result<String> {
    match format {
        ConfigFormat::Toml => {
            let generated = GeneratedToml {
                identity: identity.clone().into(),
            };
            let body = toml::to_string_pretty(&generated)
                .map_err(|e| ChatbotError::ConfigError(e.to_string()))?;
            Ok(format!("# Generated by `chatbot fetch-config`. Do not edit.\n{}", body))
        }
        ConfigFormat::Js => Ok(format!(
            "window.REACT_APP_IDENTITY_POOL_ID = {};\nwindow.REACT_APP_USER_POOL_ID = {};\nwindow.REACT_APP_CLIENT_ID = {};\n",
            serde_json::to_string(&identity.identity_pool_id)?,
            serde_json::to_string(&identity.user_pool_id)?,
            serde_json::to_string(&identity.client_id)?,
        )),
    }
}
