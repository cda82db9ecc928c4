//! Payment account resolution
//!
//! Resolving accounts never fails: when the provider cannot be reached or
//! rejects the call, the resolver substitutes the single fallback demo account
//! so the filing UI stays usable, and reports the underlying error alongside.

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

use crate::error::Error;
use crate::provider::EfileProvider;
use crate::types::{AuthToken, PaymentAccount};

/// Accounts available to the filer
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct PaymentAccounts {
    /// Accounts in provider order, or exactly the fallback account
    pub accounts: Vec<PaymentAccount>,
    /// True when `accounts` is the fallback rather than provider data
    pub fallback: bool,
    /// Why the fallback was used
    #[serde(skip)]
    pub error: Option<Error>,
}

impl PaymentAccounts {
    /// The degraded-mode list
    pub fn fallback(error: Error) -> Self {
        Self {
            accounts: vec![PaymentAccount::fallback()],
            fallback: true,
            error: Some(error),
        }
    }

    /// Look up an account by id
    pub fn find(&self, id: &str) -> Option<&PaymentAccount> {
        self.accounts.iter().find(|a| a.id == id)
    }
}

/// Fetches payment accounts with a degraded-mode fallback
#[derive(Clone)]
pub struct PaymentAccountResolver {
    provider: Arc<dyn EfileProvider>,
}

impl PaymentAccountResolver {
    /// Create a resolver for a provider
    pub fn new(provider: Arc<dyn EfileProvider>) -> Self {
        Self { provider }
    }

    /// Fetch accounts for `token`, falling back on any failure
    pub async fn resolve(&self, token: &AuthToken) -> PaymentAccounts {
        match self.provider.payment_accounts(&token.value).await {
            Ok(accounts) => {
                tracing::debug!(count = accounts.len(), "payment accounts fetched");
                PaymentAccounts {
                    accounts,
                    fallback: false,
                    error: None,
                }
            }
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    kind = %e.kind(),
                    "payment accounts unavailable, using fallback account"
                );
                PaymentAccounts::fallback(e)
            }
        }
    }
}
