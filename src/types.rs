//! Core types for evict-efile

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Lifetime of a provider auth token, in seconds
pub const TOKEN_LIFETIME_SECS: i64 = 3600;

/// Id of the synthetic account substituted when the real list is unavailable
pub const FALLBACK_ACCOUNT_ID: &str = "demo";

/// Display name of the synthetic fallback account
pub const FALLBACK_ACCOUNT_NAME: &str = "Demo Account (Fallback)";

/// Bearer token issued by the provider
///
/// Expiry is advisory: nothing refreshes the token, callers authenticate again
/// once it has expired or after any authentication error.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct AuthToken {
    /// Token value sent in the `authtoken` header
    pub value: String,
    /// When the token was issued
    pub issued_at: DateTime<Utc>,
    /// `issued_at` plus one hour
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    /// Token issued at `issued_at`, expiring one hour later
    pub fn issued(value: impl Into<String>, issued_at: DateTime<Utc>) -> Self {
        Self {
            value: value.into(),
            issued_at,
            expires_at: issued_at + Duration::seconds(TOKEN_LIFETIME_SECS),
        }
    }

    /// Whether the token has expired at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }

    /// Whether the token has expired now
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }
}

impl std::fmt::Debug for AuthToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let prefix: String = self.value.chars().take(4).collect();
        f.debug_struct("AuthToken")
            .field("value", &format_args!("{}…", prefix))
            .field("issued_at", &self.issued_at)
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Payment account available to the filer
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PaymentAccount {
    /// Provider account id
    pub id: String,
    /// Display name
    pub name: String,
}

impl PaymentAccount {
    /// The synthetic account used in degraded mode
    pub fn fallback() -> Self {
        Self {
            id: FALLBACK_ACCOUNT_ID.to_string(),
            name: FALLBACK_ACCOUNT_NAME.to_string(),
        }
    }

    /// Whether this is the synthetic fallback account
    pub fn is_fallback(&self) -> bool {
        self.id == FALLBACK_ACCOUNT_ID
    }
}

/// Role of a party in the case
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum PartyRole {
    /// Landlord / filer side
    Plaintiff,
    /// Tenant side
    Defendant,
    /// Unknown occupants and other parties
    Other,
}

/// Postal address
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Address {
    /// Street line
    pub line1: String,
    /// Unit, suite, etc.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    /// City
    pub city: String,
    /// Two-letter state code
    pub state: String,
    /// ZIP code
    pub zip: String,
}

/// A party to the case
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Party {
    /// Role in the case
    pub role: PartyRole,
    /// First name (individuals)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    /// Last name (individuals)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    /// Business name (companies)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    /// Mailing address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<Address>,
}

/// Case metadata accompanying a submission
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct CaseFiling {
    /// Existing case number for subsequent filings; None opens a new case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_number: Option<String>,
    /// Provider court location code
    pub court_location: String,
    /// Provider case category code
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub case_category: Option<String>,
    /// Provider case type code
    pub case_type: String,
    /// Provider filing code applied to the attached documents
    pub filing_code: String,
    /// Filing description; defaults to the document name per filing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filing_description: Option<String>,
    /// Firm-internal matter reference
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_matter_number: Option<String>,
    /// Payment account to charge; defaults to the first available account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payment_account_id: Option<String>,
    /// Parties to the case
    #[serde(default)]
    pub parties: Vec<Party>,
}

/// Provider-issued identifier and status of one filing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct FilingReceipt {
    /// Filing id
    pub id: String,
    /// Provider status (e.g. "submitting", "submitted")
    pub status: String,
}

/// Outcome of a successful submission
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SubmissionResult {
    /// Envelope id, when the provider returns one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub envelope_id: Option<String>,
    /// One receipt per filing, in provider order
    pub filings: Vec<FilingReceipt>,
    /// Account the filing fees were charged to
    pub payment_account: PaymentAccount,
    /// When the provider accepted the submission
    pub submitted_at: DateTime<Utc>,
}

impl SubmissionResult {
    /// Filing ids in provider order
    pub fn filing_ids(&self) -> Vec<&str> {
        self.filings.iter().map(|f| f.id.as_str()).collect()
    }
}
