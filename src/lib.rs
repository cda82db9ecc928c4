//! # evict-efile
//!
//! E-filing client for eviction case management against the Tyler/uslegalpro
//! provider.
//!
//! ## Workflow
//!
//! A submission runs four steps, each in its own module:
//! - **Authenticate** ([`auth`]) - exchange credentials for a one-hour token
//! - **Encode** ([`attachments`]) - validate PDF/DOCX documents and base64 them
//! - **Pay** ([`payments`]) - resolve the payment account, with a demo fallback
//! - **Submit** ([`submission`]) - send the filing, retrying transient failures
//!
//! Provider failures are classified into a fixed taxonomy ([`classify`]) that
//! also decides what is retried ([`retry`]).
//!
//! ## Quick Start
//!
//! ```no_run
//! use evict_efile::{Attachment, CaseFiling, Config, SubmissionService};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env()?;
//!     let service = SubmissionService::from_config(&config)?;
//!
//!     let case: CaseFiling = serde_json::from_str(
//!         r#"{"court_location": "cook:cd1", "case_type": "eviction", "filing_code": "complaint"}"#,
//!     )?;
//!     let complaint = Attachment::from_path("complaint.pdf", None).await?;
//!
//!     let result = service.submit(&case, vec![complaint]).await?;
//!     println!("filed: {:?}", result.filing_ids());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::unwrap_used)]
#![warn(clippy::expect_used)]

/// HTTP facade
pub mod api;
/// Attachment validation and encoding
pub mod attachments;
/// Provider authentication
pub mod auth;
/// Provider error taxonomy
pub mod classify;
/// Configuration types
pub mod config;
/// Error types
pub mod error;
/// Payment account resolution
pub mod payments;
/// Provider transport
pub mod provider;
/// Retry logic with exponential backoff
pub mod retry;
/// Submission workflow
pub mod submission;
/// Core types
pub mod types;

// Re-export commonly used types
pub use attachments::{Attachment, EncodedAttachment, Validation};
pub use auth::Authenticator;
pub use classify::{Classification, ErrorKind};
pub use config::{Config, Credentials, ProviderConfig};
pub use error::{ApiError, Error, ErrorCode, Result, ToHttpStatus};
pub use payments::{PaymentAccountResolver, PaymentAccounts};
pub use provider::{EfileProvider, TylerClient};
pub use submission::SubmissionService;
pub use types::{AuthToken, CaseFiling, Party, PartyRole, PaymentAccount, SubmissionResult};

/// Run the HTTP facade until a termination signal arrives.
///
/// Builds a [`SubmissionService`] from `config`, serves the API on
/// `config.api.bind_address`, and shuts down gracefully on a signal.
///
/// - **Unix:** listens for SIGTERM and SIGINT, with fallbacks if signal registration fails.
/// - **Windows/other:** listens for Ctrl+C via `tokio::signal::ctrl_c()`.
///
/// # Example
///
/// ```no_run
/// use evict_efile::{Config, serve_with_shutdown};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     serve_with_shutdown(Config::from_env()?).await?;
///     Ok(())
/// }
/// ```
pub async fn serve_with_shutdown(config: Config) -> Result<()> {
    let service = std::sync::Arc::new(SubmissionService::from_config(&config)?);
    let config = std::sync::Arc::new(config);
    api::start_api_server_with_shutdown(service, config, wait_for_signal()).await
}

#[cfg(unix)]
async fn wait_for_signal() {
    use tokio::signal::unix::{SignalKind, signal};

    // Signal registration can fail in restricted environments (containers, tests)
    let sigterm_result = signal(SignalKind::terminate());
    let sigint_result = signal(SignalKind::interrupt());

    match (sigterm_result, sigint_result) {
        (Ok(mut sigterm), Ok(mut sigint)) => {
            tokio::select! {
                _ = sigterm.recv() => {
                    tracing::info!("Received SIGTERM signal");
                }
                _ = sigint.recv() => {
                    tracing::info!("Received SIGINT signal (Ctrl+C)");
                }
            }
        }
        (Err(e), _) => {
            tracing::warn!(error = %e, "Could not register SIGTERM handler, waiting for SIGINT only");
            if let Ok(mut sigint) = signal(SignalKind::interrupt()) {
                sigint.recv().await;
                tracing::info!("Received SIGINT signal (Ctrl+C)");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
        (_, Err(e)) => {
            tracing::warn!(error = %e, "Could not register SIGINT handler, waiting for SIGTERM only");
            if let Ok(mut sigterm) = signal(SignalKind::terminate()) {
                sigterm.recv().await;
                tracing::info!("Received SIGTERM signal");
            } else {
                tracing::error!("Could not register any signal handlers, using ctrl_c fallback");
                tokio::signal::ctrl_c().await.ok();
            }
        }
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => {
            tracing::info!("Received Ctrl+C signal");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C signal");
        }
    }
}
