//! Provider authentication
//!
//! Exchanges the configured credentials for a one-hour [`AuthToken`]. There is
//! no refresh and no shared cache: every call makes a fresh provider request,
//! and callers authenticate again after expiry or after any authentication
//! error.

use chrono::Utc;
use std::sync::Arc;

use crate::config::Credentials;
use crate::error::{Error, ErrorCode, Result};
use crate::provider::EfileProvider;
use crate::types::AuthToken;

/// Issues provider tokens for one set of credentials
#[derive(Clone)]
pub struct Authenticator {
    provider: Arc<dyn EfileProvider>,
    credentials: Credentials,
}

impl Authenticator {
    /// Bind credentials to a provider
    pub fn new(provider: Arc<dyn EfileProvider>, credentials: Credentials) -> Self {
        Self {
            provider,
            credentials,
        }
    }

    /// Authenticate against the provider
    ///
    /// # Errors
    ///
    /// - `Authentication` with code `missing_credentials` when the username or
    ///   password is empty after cleanup; no request is made
    /// - `Authentication` when the provider rejects the login or omits the token
    /// - any other classified error from the provider call
    pub async fn authenticate(&self) -> Result<AuthToken> {
        let username = clean_credential(&self.credentials.username);
        let password = clean_credential(&self.credentials.password);

        if username.is_empty() || password.is_empty() {
            tracing::error!(
                has_username = !username.is_empty(),
                has_password = !password.is_empty(),
                "e-filing credentials are not configured"
            );
            return Err(Error::Authentication {
                code: ErrorCode::Local("missing_credentials"),
                message: "e-filing username and password must be configured".to_string(),
            });
        }

        tracing::debug!(username = %username, "authenticating with e-filing provider");

        match self.provider.authenticate(&username, &password).await {
            Ok(value) => {
                let token = AuthToken::issued(value, Utc::now());
                tracing::info!(
                    username = %username,
                    expires_at = %token.expires_at,
                    "authenticated with e-filing provider"
                );
                Ok(token)
            }
            Err(e) => {
                tracing::warn!(username = %username, error = %e, "e-filing authentication failed");
                Err(e)
            }
        }
    }
}

/// Trim whitespace and control characters leaked from environment files
///
/// Only the ends are trimmed (a trailing `\r\n` from a CRLF `.env`, a stray
/// tab). Characters inside the value are kept as typed.
pub fn clean_credential(value: &str) -> String {
    value
        .trim_matches(|c: char| c.is_whitespace() || c.is_control())
        .to_string()
}
