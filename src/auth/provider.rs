use async_trait::async_trait;

use crate::utils::Result;

/// Tokens issued by a successful sign-in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// The bearer token sent with every chat request
    pub id_token: String,
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<u64>,
}

/// Capability set of the hosted identity provider
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// Authenticate with username (email) and password
    async fn sign_in(&self, username: &str, password: &str) -> Result<AuthSession>;

    /// End the current session
    async fn sign_out(&self) -> Result<()>;

    /// Register a new user; the account still needs confirmation
    async fn sign_up(&self, username: &str, password: &str) -> Result<()>;

    /// Start the forgot-password flow (sends a code to the user)
    async fn forgot_password(&self, username: &str) -> Result<()>;

    /// Change the password of the user owning `access_token`
    async fn change_password(&self, access_token: &str, previous: &str, proposed: &str) -> Result<()>;
}
