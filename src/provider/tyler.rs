//! Tyler/uslegalpro REST client

use async_trait::async_trait;
use serde::de::DeserializeOwned;

use super::traits::{EfileProvider, FilingRequest, FilingResponse};
use super::wire::{
    AccountItem, AuthItem, AuthenticateBody, Data, FilingBody, FilingItem, interpret,
};
use crate::classify::{ErrorKind, classify_transport, classify_unsafe_transport};
use crate::config::ProviderConfig;
use crate::error::{Error, ErrorCode, Result};
use crate::types::PaymentAccount;

/// Header carrying the application's client token on authentication
const CLIENT_TOKEN_HEADER: &str = "clienttoken";

/// Header carrying the user's auth token on every other call
const AUTH_TOKEN_HEADER: &str = "authtoken";

/// Provider client over `reqwest`
///
/// Holds one connection pool for the process. Cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TylerClient {
    http: reqwest::Client,
    provider: ProviderConfig,
}

impl TylerClient {
    /// Create a client for the configured provider
    ///
    /// Every request is bounded by `provider.request_timeout`.
    pub fn new(provider: ProviderConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(provider.request_timeout)
            .build()
            .map_err(|e| Error::Config {
                message: format!("failed to create HTTP client: {}", e),
                key: None,
            })?;

        Ok(Self { http, provider })
    }

    /// Provider settings this client was built with
    pub fn provider(&self) -> &ProviderConfig {
        &self.provider
    }

    async fn read<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        url: &str,
        on_transport: fn(&reqwest::Error, &str) -> Error,
    ) -> Result<Option<T>> {
        let response = request.send().await.map_err(|e| on_transport(&e, url))?;

        let status = response.status().as_u16();
        let body = response.text().await.map_err(|e| on_transport(&e, url))?;

        tracing::debug!(url = %url, status = status, body_len = body.len(), "provider response");
        interpret(status, &body, url)
    }
}

#[async_trait]
impl EfileProvider for TylerClient {
    async fn authenticate(&self, username: &str, password: &str) -> Result<String> {
        let url = self.provider.endpoint("user/authenticate");
        let request = self
            .http
            .post(&url)
            .header(CLIENT_TOKEN_HEADER, &self.provider.client_token)
            .json(&Data {
                data: AuthenticateBody { username, password },
            });

        let item: Option<AuthItem> = self
            .read(request, &url, classify_transport)
            .await
            .map_err(|e| match e {
                // A rejected login without a provider code is still an authentication failure
                Error::Unexpected {
                    code: ErrorCode::Http(status),
                    message,
                } => Error::Authentication {
                    code: ErrorCode::Http(status),
                    message,
                },
                other => other,
            })?;

        item.and_then(|i| i.auth_token)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| Error::Authentication {
                code: ErrorCode::Local("missing_token"),
                message: "provider response did not include an auth token".to_string(),
            })
    }

    async fn payment_accounts(&self, token: &str) -> Result<Vec<PaymentAccount>> {
        let url = self.provider.endpoint("payment-accounts");
        let request = self.http.get(&url).header(AUTH_TOKEN_HEADER, token);

        let items: Option<Vec<AccountItem>> =
            self.read(request, &url, classify_transport).await?;
        Ok(items
            .unwrap_or_default()
            .into_iter()
            .map(PaymentAccount::from)
            .collect())
    }

    async fn submit_filing(&self, token: &str, request: &FilingRequest) -> Result<FilingResponse> {
        let url = self.provider.endpoint("efile");
        let body = Data {
            data: FilingBody::from_request(request),
        };
        let http_request = self
            .http
            .post(&url)
            .header(AUTH_TOKEN_HEADER, token)
            .json(&body);

        // A lost response may still have created the filing
        let item: Option<FilingItem> = self
            .read(http_request, &url, classify_unsafe_transport)
            .await?;
        let response: FilingResponse = item
            .map(FilingResponse::from)
            .filter(|r| !r.filings.is_empty())
            .ok_or_else(|| {
                Error::from_kind(
                    ErrorKind::Unexpected,
                    ErrorCode::Local("missing_filings"),
                    "provider accepted the submission but returned no filing ids",
                )
            })?;

        Ok(response)
    }
}
