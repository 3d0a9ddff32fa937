// Gateway module for auth - follows the Train Station Pattern
// All external access must go through this gateway

mod cognito;
mod provider;
mod session;

pub use cognito::CognitoProvider;
pub use provider::{AuthSession, IdentityProvider};
pub use session::SessionManager;
