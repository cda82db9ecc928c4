//! Route handlers for the REST API
//!
//! - [`tyler`] - Authentication, payment accounts, submission
//! - [`system`] - Health and OpenAPI

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

mod system;
mod tyler;

pub use system::*;
pub use tyler::*;

/// Response for POST /api/tyler/authenticate
#[derive(Debug, Deserialize, Serialize, utoipa::ToSchema)]
pub struct AuthenticateResponse {
    /// Always true; failures use the error body
    pub success: bool,
    /// Provider auth token
    pub token: String,
    /// When the token stops being valid
    pub expires: DateTime<Utc>,
}
