use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_AWS_REGION, DEFAULT_CHAT_ENDPOINT, DEFAULT_LLM,
    DEFAULT_PARAMETER_PREFIX, ENV_PREFIX, HTTP_REQUEST_TIMEOUT_SECS, IDENTITY_FILE_NAME,
    LOCAL_CONFIG_PATH, SESSION_FILE_NAME,
};
use crate::utils::ChatbotError;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// AWS account settings (region, parameter store layout)
    #[serde(default)]
    pub aws: AwsConfig,

    /// Identity provider ids, normally written by `fetch-config`
    #[serde(default)]
    pub identity: IdentityConfig,

    /// Chat endpoint configuration
    #[serde(default)]
    pub chat: ChatConfig,
}

/// AWS configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AwsConfig {
    /// Region for both the parameter store and the user pool
    pub region: String,
    /// Path prefix under which the Cognito ids are stored
    pub parameter_prefix: String,
}

impl Default for AwsConfig {
    fn default() -> Self {
        Self {
            region: DEFAULT_AWS_REGION.to_string(),
            parameter_prefix: DEFAULT_PARAMETER_PREFIX.to_string(),
        }
    }
}

/// Cognito ids. All optional until `fetch-config` has run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdentityConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identity_pool_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_pool_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,
}

/// Chat configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatConfig {
    /// Base URL; requests go to `{endpoint}/chat/{sessionId}`
    pub endpoint: String,
    /// Model selector sent as `llm` when none is given
    pub default_llm: String,
    /// Request timeout in seconds for every HTTP call
    pub timeout_secs: u64,
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_CHAT_ENDPOINT.to_string(),
            default_llm: DEFAULT_LLM.to_string(),
            timeout_secs: HTTP_REQUEST_TIMEOUT_SECS,
        }
    }
}

/// Validated identity provider settings handed to the session manager
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentitySettings {
    pub region: String,
    pub user_pool_id: String,
    pub client_id: String,
    pub identity_pool_id: String,
}

impl Config {
    /// Resolve the identity settings, failing if any id is missing
    pub fn identity_settings(&self) -> Result<IdentitySettings, ChatbotError> {
        let missing: Vec<&str> = [
            ("identity_pool_id", &self.identity.identity_pool_id),
            ("user_pool_id", &self.identity.user_pool_id),
            ("client_id", &self.identity.client_id),
        ]
        .iter()
        .filter(|(_, value)| value.as_deref().map_or(true, str::is_empty))
        .map(|(name, _)| *name)
        .collect();

        if !missing.is_empty() {
            return Err(ChatbotError::ConfigError(format!(
                "identity settings missing ({}); run `chatbot fetch-config` first",
                missing.join(", ")
            )));
        }

        Ok(IdentitySettings {
            region: self.aws.region.clone(),
            user_pool_id: self.identity.user_pool_id.clone().unwrap_or_default(),
            client_id: self.identity.client_id.clone().unwrap_or_default(),
            identity_pool_id: self.identity.identity_pool_id.clone().unwrap_or_default(),
        })
    }
}

/// Files merged by `load_config`, lowest precedence first
#[derive(Debug, Clone)]
pub struct ConfigSources {
    pub global: PathBuf,
    pub identity: PathBuf,
    pub local: PathBuf,
}

impl ConfigSources {
    /// The standard locations: config dir, generated identity file, project override
    pub fn standard() -> Result<Self> {
        let config_dir = get_config_dir()?;
        Ok(Self {
            global: config_dir.join(CONFIG_FILE_NAME),
            identity: config_dir.join(IDENTITY_FILE_NAME),
            local: PathBuf::from(LOCAL_CONFIG_PATH),
        })
    }

    /// Build the figment for these sources
    pub fn figment(&self) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));

        for path in [&self.global, &self.identity, &self.local] {
            if path.exists() {
                figment = figment.merge(Toml::file(path));
            }
        }

        // Environment variables (CHATBOT_ prefix, `__` for nesting)
        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }
}

/// Load configuration from multiple sources
pub fn load_config() -> Result<Config> {
    let sources = ConfigSources::standard()?;
    sources
        .figment()
        .extract()
        .context("Failed to load configuration")
}

/// Load configuration from one explicit file (plus environment overrides)
pub fn load_config_from(path: &Path) -> Result<Config> {
    if !path.exists() {
        anyhow::bail!("Config file not found: {}", path.display());
    }
    Figment::from(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed(ENV_PREFIX).split("__"))
        .extract()
        .with_context(|| format!("Failed to load configuration from {}", path.display()))
}

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("net", "pandoracloud", "chatbot")
}

/// Get the configuration directory
pub fn get_config_dir() -> Result<PathBuf> {
    let config_dir = if let Some(proj_dirs) = project_dirs() {
        proj_dirs.config_dir().to_path_buf()
    } else {
        // Fallback to home directory
        let home = std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .context("Could not determine home directory")?;
        PathBuf::from(home).join(".config").join("chatbot")
    };
    std::fs::create_dir_all(&config_dir)?;
    Ok(config_dir)
}

/// Get the data directory holding client-local storage
pub fn get_data_dir() -> Result<PathBuf> {
    let data_dir = match project_dirs() {
        Some(proj_dirs) => proj_dirs.data_local_dir().to_path_buf(),
        None => get_config_dir()?,
    };
    std::fs::create_dir_all(&data_dir)?;
    Ok(data_dir)
}

/// Path of the single-key session token file
pub fn session_file() -> Result<PathBuf> {
    Ok(get_data_dir()?.join(SESSION_FILE_NAME))
}

/// Default destination of the generated identity settings
pub fn identity_file() -> Result<PathBuf> {
    Ok(get_config_dir()?.join(IDENTITY_FILE_NAME))
}

/// Save configuration to file
pub fn save_config(config: &Config, path: Option<PathBuf>) -> Result<()> {
    let path = if let Some(p) = path {
        p
    } else {
        get_config_dir()?.join(CONFIG_FILE_NAME)
    };

    let toml_string = toml::to_string_pretty(config)?;
    std::fs::write(&path, toml_string)
        .with_context(|| format!("Failed to write config to {}", path.display()))?;

    Ok(())
}

/// Create a default configuration file if it doesn't exist
pub fn init_config() -> Result<PathBuf> {
    let config_file = get_config_dir()?.join(CONFIG_FILE_NAME);

    if !config_file.exists() {
        save_config(&Config::default(), Some(config_file.clone()))?;
        tracing::info!("Created default configuration at {}", config_file.display());
    }

    // Create example local config
    let local_example = PathBuf::from(format!("{}.example", LOCAL_CONFIG_PATH));
    if !local_example.exists() {
        if let Some(parent) = local_example.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let example_config = r#"# Chatbot project configuration
# This file overrides global settings for this directory

[aws]
region = "us-west-2"
parameter_prefix = "/chatbot-mvp"

[chat]
endpoint = "https://chat.pandoracloud.net"
default_llm = "titan-text-express-v1"
timeout_secs = 120
"#;
        std::fs::write(&local_example, example_config)?;
    }

    Ok(config_file)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sources_in(dir: &TempDir) -> ConfigSources {
        ConfigSources {
            global: dir.path().join("config.toml"),
            identity: dir.path().join("identity.toml"),
            local: dir.path().join("local.toml"),
        }
    }

    #[test]
    fn test_defaults_without_files() {
        let dir = TempDir::new().unwrap();
        let config: Config = sources_in(&dir).figment().extract().unwrap();

        assert_eq!(config.aws.region, "us-west-2");
        assert_eq!(config.aws.parameter_prefix, "/chatbot-mvp");
        assert_eq!(config.chat.endpoint, "https://chat.pandoracloud.net");
        assert_eq!(config.identity, IdentityConfig::default());
    }

    #[test]
    fn test_identity_file_is_merged() {
        let dir = TempDir::new().unwrap();
        let sources = sources_in(&dir);
        std::fs::write(
            &sources.identity,
            "[identity]\nidentity_pool_id = \"us-west-2:pool\"\nuser_pool_id = \"us-west-2_abc\"\nclient_id = \"client123\"\n",
        )
        .unwrap();

        let config: Config = sources.figment().extract().unwrap();
        let settings = config.identity_settings().unwrap();

        assert_eq!(
            settings,
            IdentitySettings {
                region: "us-west-2".to_string(),
                user_pool_id: "us-west-2_abc".to_string(),
                client_id: "client123".to_string(),
                identity_pool_id: "us-west-2:pool".to_string(),
            }
        );
    }

    #[test]
    fn test_local_overrides_global() {
        let dir = TempDir::new().unwrap();
        let sources = sources_in(&dir);
        std::fs::write(&sources.global, "[chat]\nendpoint = \"https://global.example\"\ndefault_llm = \"a\"\ntimeout_secs = 5\n").unwrap();
        std::fs::write(&sources.local, "[chat]\nendpoint = \"https://local.example\"\n").unwrap();

        let config: Config = sources.figment().extract().unwrap();
        assert_eq!(config.chat.endpoint, "https://local.example");
        assert_eq!(config.chat.default_llm, "a");
        assert_eq!(config.chat.timeout_secs, 5);
    }

    #[test]
    fn test_missing_identity_names_fields() {
        let mut config = Config::default();
        config.identity.client_id = Some("client123".to_string());

        let err = config.identity_settings().unwrap_err().to_string();
        assert!(err.contains("identity_pool_id"));
        assert!(err.contains("user_pool_id"));
        assert!(!err.contains("client_id"));
    }

    #[test]
    fn test_load_config_from_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(load_config_from(&dir.path().join("nope.toml")).is_err());
    }
}
