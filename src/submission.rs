//! Submission orchestration
//!
//! [`SubmissionService`] sequences one filing end to end:
//!
//! 1. authenticate (retrying only retryable failures)
//! 2. validate every attachment, then encode them
//! 3. resolve payment accounts and pick the one to charge
//! 4. submit the filing (retrying only failures the provider reported or
//!    that happened before the request was sent)
//!
//! Each call authenticates on its own; no token is shared between
//! submissions.

use chrono::Utc;
use std::sync::Arc;

use crate::attachments::{Attachment, encode_all};
use crate::auth::Authenticator;
use crate::config::{AttachmentLimits, Config, RetryConfig, SubmissionConfig};
use crate::error::{Error, ErrorCode, Result};
use crate::payments::{PaymentAccountResolver, PaymentAccounts};
use crate::provider::{EfileProvider, FilingRequest, TylerClient};
use crate::retry::with_retry;
use crate::types::{AuthToken, CaseFiling, PaymentAccount, SubmissionResult};

/// Runs the authenticate → encode → account → submit workflow
#[derive(Clone)]
pub struct SubmissionService {
    provider: Arc<dyn EfileProvider>,
    authenticator: Authenticator,
    resolver: PaymentAccountResolver,
    limits: AttachmentLimits,
    retry: RetryConfig,
    submission: SubmissionConfig,
}

impl SubmissionService {
    /// Build a service around any provider implementation
    pub fn new(provider: Arc<dyn EfileProvider>, config: &Config) -> Self {
        Self {
            authenticator: Authenticator::new(provider.clone(), config.credentials.clone()),
            resolver: PaymentAccountResolver::new(provider.clone()),
            provider,
            limits: config.attachments.clone(),
            retry: config.retry.clone(),
            submission: config.submission.clone(),
        }
    }

    /// Build a service talking to the configured Tyler endpoint
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        let client = TylerClient::new(config.provider.clone())?;
        Ok(Self::new(Arc::new(client), config))
    }

    /// Authenticate, retrying transient failures
    pub async fn authenticate(&self) -> Result<AuthToken> {
        with_retry(&self.retry, || self.authenticator.authenticate()).await
    }

    /// Authenticate and fetch payment accounts
    ///
    /// Never fails: an authentication failure yields the fallback account just
    /// like a failed account lookup does.
    pub async fn payment_accounts(&self) -> PaymentAccounts {
        match self.authenticate().await {
            Ok(token) => self.resolver.resolve(&token).await,
            Err(e) => {
                tracing::warn!(error = %e, "cannot list payment accounts without a token");
                PaymentAccounts::fallback(e)
            }
        }
    }

    /// Submit a filing with its documents
    ///
    /// # Errors
    ///
    /// Authentication and provider failures are returned classified. An
    /// invalid attachment fails with `Submission` before the provider sees
    /// the filing. Account selection failures are `Payment` errors with
    /// codes `payment_unavailable`, `unknown_payment_account` or
    /// `no_payment_accounts`.
    pub async fn submit(
        &self,
        case: &CaseFiling,
        attachments: Vec<Attachment>,
    ) -> Result<SubmissionResult> {
        tracing::info!(
            case_number = ?case.case_number,
            court_location = %case.court_location,
            filing_code = %case.filing_code,
            documents = attachments.len(),
            "starting e-filing submission"
        );

        let token = self.authenticate().await?;
        let documents = encode_all(&attachments, &self.limits).await?;
        drop(attachments);

        let accounts = self.resolver.resolve(&token).await;
        let payment_account = select_account(
            case,
            accounts,
            self.submission.allow_fallback_account,
        )?;

        let request = FilingRequest {
            case: case.clone(),
            payment_account_id: payment_account.id.clone(),
            documents,
        };

        let response = with_retry(&self.retry, || {
            self.provider.submit_filing(&token.value, &request)
        })
        .await
        .inspect_err(|e| {
            tracing::error!(
                error = %e,
                kind = %e.kind(),
                court_location = %case.court_location,
                "e-filing submission failed"
            );
        })?;

        let result = SubmissionResult {
            envelope_id: response.envelope_id,
            filings: response.filings,
            payment_account,
            submitted_at: Utc::now(),
        };

        tracing::info!(
            envelope_id = ?result.envelope_id,
            filing_ids = ?result.filing_ids(),
            payment_account = %result.payment_account.id,
            "e-filing submission accepted"
        );

        Ok(result)
    }
}

/// Pick the account to charge for `case`
///
/// The case's requested account must be in the list; without a request the
/// first account is used. The fallback account is only accepted when
/// `allow_fallback` is set.
pub fn select_account(
    case: &CaseFiling,
    accounts: PaymentAccounts,
    allow_fallback: bool,
) -> Result<PaymentAccount> {
    if accounts.fallback {
        if !allow_fallback {
            let cause = accounts
                .error
                .as_ref()
                .map(|e| e.to_string())
                .unwrap_or_else(|| "unknown error".to_string());
            return Err(payment_error(
                "payment_unavailable",
                format!("payment accounts are unavailable: {}", cause),
            ));
        }
        tracing::warn!("submitting against the fallback demo account");
        return Ok(PaymentAccount::fallback());
    }

    match &case.payment_account_id {
        Some(id) => accounts.find(id).cloned().ok_or_else(|| {
            payment_error(
                "unknown_payment_account",
                format!("payment account '{}' is not available to this filer", id),
            )
        }),
        None => accounts.accounts.into_iter().next().ok_or_else(|| {
            payment_error(
                "no_payment_accounts",
                "the filer has no payment accounts configured",
            )
        }),
    }
}

fn payment_error(code: &'static str, message: impl Into<String>) -> Error {
    Error::Payment {
        code: ErrorCode::Local(code),
        message: message.into(),
    }
}
