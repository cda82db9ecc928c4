//! Application state for the API server

use crate::{Config, SubmissionService};
use std::sync::Arc;

/// Shared application state accessible to all route handlers
///
/// Cloned per request (cheap Arc clones).
#[derive(Clone)]
pub struct AppState {
    /// Submission workflow, also used for authentication and account lookup
    pub service: Arc<SubmissionService>,

    /// Configuration, read-only
    pub config: Arc<Config>,
}

impl AppState {
    /// Create a new AppState
    pub fn new(service: Arc<SubmissionService>, config: Arc<Config>) -> Self {
        Self { service, config }
    }
}
