use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::params::ConfigFormat;

#[derive(Parser, Debug)]
#[command(name = "chatbot")]
#[command(version)]
#[command(about = "Command-line client for the Pandora Cloud chatbot", long_about = None)]
pub struct Cli {
    /// Path to configuration file (replaces the standard config files)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Login form
#[derive(Args, Debug, Clone)]
pub struct Credentials {
    /// Account email
    #[arg(long, env = "CHATBOT_EMAIL")]
    pub email: String,

    /// Account password
    #[arg(long, env = "CHATBOT_PASSWORD", hide_env_values = true)]
    pub password: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Write a default configuration file
    Init,
    /// Copy the Cognito ids from the parameter store into a generated file
    FetchConfig {
        /// Output format
        #[arg(long, value_enum, default_value_t = ConfigFormat::Toml)]
        format: ConfigFormat,
        /// Destination (defaults to the config directory for TOML, ./js/env.js for JS)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Sign in and store the session token
    Login(Credentials),
    /// Sign out and remove the stored token
    Logout,
    /// Register a new account
    Register(Credentials),
    /// Start a password reset
    ResetPassword {
        #[arg(long, env = "CHATBOT_EMAIL")]
        email: String,
    },
    /// Change the account password
    ChangePassword {
        #[command(flatten)]
        credentials: Credentials,
        /// New password
        #[arg(long, env = "CHATBOT_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },
    /// Send one message and print the reply
    Send {
        /// Message text
        message: String,
        /// Model selector (defaults to chat.default_llm)
        #[arg(short, long)]
        llm: Option<String>,
    },
    /// Interactive chat session
    Chat {
        /// Model selector (defaults to chat.default_llm)
        #[arg(short, long)]
        llm: Option<String>,
    },
    /// List known model selectors
    Models,
    /// Show configuration and session status
    Status,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_parses_message_and_llm() {
        let cli = Cli::try_parse_from(["chatbot", "send", "hello there", "--llm", "titan"]).unwrap();
        match cli.command {
            Commands::Send { message, llm } => {
                assert_eq!(message, "hello there");
                assert_eq!(llm.as_deref(), Some("titan"));
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_fetch_config_defaults_to_toml() {
        let cli = Cli::try_parse_from(["chatbot", "fetch-config"]).unwrap();
        match cli.command {
            Commands::FetchConfig { format, output } => {
                assert_eq!(format, ConfigFormat::Toml);
                assert!(output.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_login_takes_flags() {
        let cli = Cli::try_parse_from([
            "chatbot", "--verbose", "login", "--email", "a@b.c", "--password", "pw",
        ])
        .unwrap();
        assert!(cli.verbose);
        match cli.command {
            Commands::Login(creds) => {
                assert_eq!(creds.email, "a@b.c");
                assert_eq!(creds.password, "pw");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }
}
