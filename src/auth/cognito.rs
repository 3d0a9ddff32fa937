use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, info};

use super::provider::{AuthSession, IdentityProvider};
use crate::app::IdentitySettings;
use crate::utils::{ChatbotError, Result};

const AMZ_JSON: &str = "application/x-amz-json-1.1";
const TARGET_PREFIX: &str = "AWSCognitoIdentityProviderService";

/// Cognito user-pool client speaking the public JSON API.
///
/// The operations used here are unauthenticated (they take a client id or an
/// access token), so no request signing is involved.
pub struct CognitoProvider {
    client: Client,
    endpoint: String,
    client_id: String,
    user_pool_id: String,
}

impl CognitoProvider {
    pub fn new(settings: &IdentitySettings, timeout: Duration) -> Result<Self> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: format!("https://cognito-idp.{}.amazonaws.com/", settings.region),
            client_id: settings.client_id.clone(),
            user_pool_id: settings.user_pool_id.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    async fn call<T: DeserializeOwned>(&self, operation: &str, body: Value) -> Result<T> {
        debug!(operation, pool = %self.user_pool_id, "calling identity provider");

        let response = self
            .client
            .post(&self.endpoint)
            .header("X-Amz-Target", target(operation))
            .header(CONTENT_TYPE, AMZ_JSON)
            .body(body.to_string())
            .send()
            .await?;

        let status = response.status().as_u16();
        let text = response.text().await?;

        if !(200..300).contains(&status) {
            return Err(service_error(status, &text));
        }
        // Some operations answer with an empty body
        let text = if text.trim().is_empty() { "{}" } else { text.as_str() };
        Ok(serde_json::from_str(text)?)
    }
}

#[async_trait]
impl IdentityProvider for CognitoProvider {
    async fn sign_in(&self, username: &str, password: &str) -> Result<AuthSession> {
        let response: InitiateAuthResponse = self
            .call("InitiateAuth", initiate_auth_body(&self.client_id, username, password))
            .await?;
        let session = response.into_session()?;
        info!("signed in as {}", username);
        Ok(session)
    }

    /// Local sign-out: tokens already issued stay valid until they expire
    async fn sign_out(&self) -> Result<()> {
        debug!("local sign-out; identity provider not contacted");
        Ok(())
    }

    async fn sign_up(&self, username: &str, password: &str) -> Result<()> {
        let _: Value = self
            .call("SignUp", sign_up_body(&self.client_id, username, password))
            .await?;
        info!("registered {}", username);
        Ok(())
    }

    async fn forgot_password(&self, username: &str) -> Result<()> {
        let _: Value = self
            .call(
                "ForgotPassword",
                json!({ "ClientId": self.client_id, "Username": username }),
            )
            .await?;
        info!("password reset initiated for {}", username);
        Ok(())
    }

    async fn change_password(&self, access_token: &str, previous: &str, proposed: &str) -> Result<()> {
        let _: Value = self
            .call(
                "ChangePassword",
                json!({
                    "PreviousPassword": previous,
                    "ProposedPassword": proposed,
                    "AccessToken": access_token,
                }),
            )
            .await?;
        info!("password updated");
        Ok(())
    }
}

fn target(operation: &str) -> String {
    format!("{}.{}", TARGET_PREFIX, operation)
}

fn initiate_auth_body(client_id: &str, username: &str, password: &str) -> Value {
    json!({
        "AuthFlow": "USER_PASSWORD_AUTH",
        "ClientId": client_id,
        "AuthParameters": {
            "USERNAME": username,
            "PASSWORD": password,
        },
    })
}

fn sign_up_body(client_id: &str, username: &str, password: &str) -> Value {
    json!({
        "ClientId": client_id,
        "Username": username,
        "Password": password,
        "UserAttributes": [{ "Name": "email", "Value": username }],
    })
}

/// Cognito error payload: `{"__type": "...", "message": "..."}`
#[derive(Debug, Deserialize)]
struct ServiceError {
    #[serde(rename = "__type")]
    kind: Option<String>,
    #[serde(alias = "Message")]
    message: Option<String>,
}

fn service_error(status: u16, body: &str) -> ChatbotError {
    let parsed: Option<ServiceError> = serde_json::from_str(body).ok();
    let message = match parsed {
        Some(ServiceError { message: Some(m), .. }) if !m.is_empty() => m,
        Some(ServiceError { kind: Some(k), .. }) => {
            // "com.amazonaws...#NotAuthorizedException" -> "NotAuthorizedException"
            k.rsplit('#').next().unwrap_or(k.as_str()).to_string()
        }
        _ => format!("identity provider returned HTTP {}", status),
    };
    ChatbotError::IdentityError(message)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct InitiateAuthResponse {
    authentication_result: Option<AuthenticationResult>,
    challenge_name: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AuthenticationResult {
    id_token: String,
    access_token: String,
    refresh_token: Option<String>,
    expires_in: Option<u64>,
}

impl InitiateAuthResponse {
    fn into_session(self) -> Result<AuthSession> {
        match self.authentication_result {
            Some(result) => Ok(AuthSession {
                id_token: result.id_token,
                access_token: result.access_token,
                refresh_token: result.refresh_token,
                expires_in: result.expires_in,
            }),
            None => Err(ChatbotError::IdentityError(format!(
                "sign-in requires an unsupported challenge: {}",
                self.challenge_name.as_deref().unwrap_or("unknown")
            ))),
        }
    }
}
