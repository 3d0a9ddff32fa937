use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

use super::cognito::CognitoProvider;
use super::provider::IdentityProvider;
use crate::app::IdentitySettings;
use crate::storage::TokenStore;
use crate::utils::Result;
use crate::view::{Page, Route};

/// Signs the user in and out, owning the stored bearer token
pub struct SessionManager {
    provider: Arc<dyn IdentityProvider>,
    tokens: Arc<dyn TokenStore>,
}

impl SessionManager {
    pub fn new(provider: Arc<dyn IdentityProvider>, tokens: Arc<dyn TokenStore>) -> Self {
        Self { provider, tokens }
    }

    /// Build a manager talking to the configured Cognito user pool
    pub fn from_settings(
        settings: &IdentitySettings,
        tokens: Arc<dyn TokenStore>,
        timeout: Duration,
    ) -> Result<Self> {
        let provider = CognitoProvider::new(settings, timeout)?;
        Ok(Self::new(Arc::new(provider), tokens))
    }

    /// Sign in with the page's email and password.
    ///
    /// On success the id token is stored and the page moves to the chat view.
    /// Failures only show up in `page.login_error`.
    pub async fn sign_in(&self, page: &mut Page) -> bool {
        let result = async {
            let session = self.provider.sign_in(&page.email, &page.password).await?;
            self.tokens.set(&session.id_token)?;
            Ok::<_, crate::utils::ChatbotError>(())
        }
        .await;

        match result {
            Ok(()) => {
                page.login_error.clear();
                page.navigate(Route::Chat);
                true
            }
            Err(e) => {
                warn!("sign-in failed: {}", e);
                page.login_error = format!("Login failed: {}", e);
                false
            }
        }
    }

    /// Sign out and drop the stored token, whatever it was
    pub async fn sign_out(&self, page: &mut Page) -> bool {
        let result = async {
            self.provider.sign_out().await?;
            self.tokens.clear()
        }
        .await;

        match result {
            Ok(()) => {
                info!("signed out");
                page.navigate(Route::Landing);
                true
            }
            Err(e) => {
                warn!("sign-out failed: {}", e);
                page.chat_error = format!("Logout failed: {}", e);
                false
            }
        }
    }

    /// Register the page's email/password as a new user
    pub async fn register(&self, page: &mut Page) -> bool {
        match self.provider.sign_up(&page.email, &page.password).await {
            Ok(()) => {
                page.login_error.clear();
                page.notice = "User registered, confirmation needed".to_string();
                true
            }
            Err(e) => {
                page.login_error = format!("Registration failed: {}", e);
                false
            }
        }
    }

    /// Start a password reset for the page's email
    pub async fn reset_password(&self, page: &mut Page) -> bool {
        match self.provider.forgot_password(&page.email).await {
            Ok(()) => {
                page.login_error.clear();
                page.notice = "Password reset initiated".to_string();
                true
            }
            Err(e) => {
                page.login_error = format!("Password reset failed: {}", e);
                false
            }
        }
    }

    /// Replace the page's current password with `new_password`.
    ///
    /// Signs in first to obtain an access token; the stored bearer token is
    /// left untouched.
    pub async fn change_password(&self, page: &mut Page, new_password: &str) -> bool {
        let result = async {
            let session = self.provider.sign_in(&page.email, &page.password).await?;
            self.provider
                .change_password(&session.access_token, &page.password, new_password)
                .await
        }
        .await;

        match result {
            Ok(()) => {
                page.login_error.clear();
                page.password = new_password.to_string();
                page.notice = "Password updated".to_string();
                true
            }
            Err(e) => {
                page.login_error = format!("Password update failed: {}", e);
                false
            }
        }
    }
}
