//! Traits and types for provider access

use async_trait::async_trait;

use crate::attachments::EncodedAttachment;
use crate::types::{CaseFiling, FilingReceipt, PaymentAccount};

/// Everything the provider needs to create filings
#[derive(Debug, Clone)]
pub struct FilingRequest {
    /// Case metadata
    pub case: CaseFiling,
    /// Account to charge
    pub payment_account_id: String,
    /// Validated, encoded documents in filing order
    pub documents: Vec<EncodedAttachment>,
}

/// Provider answer to an accepted submission
#[must_use]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilingResponse {
    /// Envelope id, when returned
    pub envelope_id: Option<String>,
    /// One receipt per filing, in provider order
    pub filings: Vec<FilingReceipt>,
}

/// Trait for e-filing provider calls
///
/// Each method is one request. Implementations do not retry; retry policy
/// belongs to the caller and is driven by the error classification.
#[async_trait]
pub trait EfileProvider: Send + Sync {
    /// Exchange credentials for a token value
    ///
    /// Callers pass credentials that are already trimmed and non-empty.
    async fn authenticate(&self, username: &str, password: &str) -> crate::Result<String>;

    /// List the payment accounts available to the token's user, in provider order
    async fn payment_accounts(&self, token: &str) -> crate::Result<Vec<PaymentAccount>>;

    /// Create filings; every call creates new provider-side filings
    async fn submit_filing(
        &self,
        token: &str,
        request: &FilingRequest,
    ) -> crate::Result<FilingResponse>;
}
