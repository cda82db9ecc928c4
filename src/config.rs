//! Configuration types for evict-efile
//!
//! [`Config`] is built once at startup, either explicitly or from the
//! `VITE_EFILE_*` environment variables the web front end already uses, and is
//! then passed by reference into every component. Nothing in the crate reads
//! the environment after that.

use serde::{Deserialize, Serialize};
use std::{fmt, net::SocketAddr, time::Duration};
use utoipa::ToSchema;

use crate::error::{Error, Result};

/// Environment variable holding the provider username
pub const ENV_USERNAME: &str = "VITE_EFILE_USERNAME";
/// Environment variable holding the provider password
pub const ENV_PASSWORD: &str = "VITE_EFILE_PASSWORD";
/// Environment variable holding the provider client token
pub const ENV_CLIENT_TOKEN: &str = "VITE_EFILE_CLIENT_TOKEN";
/// Environment variable holding the provider base URL
pub const ENV_BASE_URL: &str = "VITE_EFILE_BASE_URL";

/// Provider account credentials
///
/// The password is never serialized and is redacted from `Debug` output.
/// Values are kept as given; the [`Authenticator`](crate::auth::Authenticator)
/// strips stray whitespace before use.
#[derive(Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct Credentials {
    /// Provider username (usually an email address)
    #[serde(default)]
    pub username: String,

    /// Provider password
    #[serde(default, skip_serializing)]
    pub password: String,
}

impl Credentials {
    /// Create credentials from a username and password
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

/// Provider endpoint configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ProviderConfig {
    /// Base URL of the provider API (default: "https://api.uslegalpro.com/v4")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Client token sent in the `clienttoken` header (default: "EVICT87")
    #[serde(default = "default_client_token")]
    pub client_token: String,

    /// Jurisdiction path segment (default: "il")
    #[serde(default = "default_jurisdiction")]
    pub jurisdiction: String,

    /// Timeout applied to every provider request (default: 30 seconds)
    #[serde(default = "default_request_timeout", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub request_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            client_token: default_client_token(),
            jurisdiction: default_jurisdiction(),
            request_timeout: default_request_timeout(),
        }
    }
}

impl ProviderConfig {
    /// Full URL for a path below the jurisdiction (e.g. "user/authenticate")
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.base_url.trim_end_matches('/'),
            self.jurisdiction,
            path.trim_start_matches('/')
        )
    }
}

/// Attachment validation and encoding limits
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct AttachmentLimits {
    /// Largest accepted attachment in bytes (default: 10 MiB)
    #[serde(default = "default_max_size_bytes")]
    pub max_size_bytes: u64,

    /// Time budget for encoding one attachment (default: 30 seconds)
    #[serde(default = "default_encode_timeout", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub encode_timeout: Duration,
}

impl Default for AttachmentLimits {
    fn default() -> Self {
        Self {
            max_size_bytes: default_max_size_bytes(),
            encode_timeout: default_encode_timeout(),
        }
    }
}

/// Retry behavior for classified-retryable provider failures
///
/// The classifier additionally caps retries per error kind, so `max_attempts`
/// can only lower the effective limit.
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct RetryConfig {
    /// Maximum number of retry attempts (default: 3)
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Initial delay before first retry (default: 1 second)
    #[serde(default = "default_initial_delay", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub initial_delay: Duration,

    /// Maximum delay between retries (default: 30 seconds)
    #[serde(default = "default_max_delay", with = "duration_serde")]
    #[schema(value_type = u64)]
    pub max_delay: Duration,

    /// Multiplier for exponential backoff (default: 2.0)
    #[serde(default = "default_backoff_multiplier")]
    pub backoff_multiplier: f64,

    /// Add random jitter to delays (default: true)
    #[serde(default = "default_true")]
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            initial_delay: default_initial_delay(),
            max_delay: default_max_delay(),
            backoff_multiplier: default_backoff_multiplier(),
            jitter: true,
        }
    }
}

/// Submission workflow settings
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct SubmissionConfig {
    /// Submit against the fallback demo account when the real account list is
    /// unavailable (default: false; only for demo deployments)
    #[serde(default)]
    pub allow_fallback_account: bool,
}

/// HTTP facade configuration
#[derive(Clone, Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiConfig {
    /// Address to bind to (default: 127.0.0.1:6790)
    #[serde(default = "default_bind_address")]
    #[schema(value_type = String)]
    pub bind_address: SocketAddr,

    /// Enable CORS for browser access (default: true)
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// Allowed CORS origins (default: ["*"])
    #[serde(default = "default_cors_origins")]
    pub cors_origins: Vec<String>,

    /// Enable Swagger UI at /swagger-ui (default: true)
    #[serde(default = "default_true")]
    pub swagger_ui: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            cors_enabled: true,
            cors_origins: default_cors_origins(),
            swagger_ui: true,
        }
    }
}

/// Main configuration for the e-filing client and facade
#[derive(Clone, Debug, Default, Serialize, Deserialize, ToSchema)]
pub struct Config {
    /// Provider account credentials
    #[serde(default)]
    pub credentials: Credentials,

    /// Provider endpoint settings
    #[serde(default)]
    pub provider: ProviderConfig,

    /// Attachment limits
    #[serde(default)]
    pub attachments: AttachmentLimits,

    /// Retry behavior
    #[serde(default)]
    pub retry: RetryConfig,

    /// Submission workflow settings
    #[serde(default)]
    pub submission: SubmissionConfig,

    /// HTTP facade settings
    #[serde(default)]
    pub api: ApiConfig,
}

impl Config {
    /// Load configuration from the process environment
    ///
    /// See [`Config::from_lookup`] for the variables read.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    ///
    /// Reads `VITE_EFILE_USERNAME`, `VITE_EFILE_PASSWORD`,
    /// `VITE_EFILE_CLIENT_TOKEN` (default "EVICT87") and `VITE_EFILE_BASE_URL`
    /// (default "https://api.uslegalpro.com/v4"). Missing credentials are not an
    /// error here; authentication reports them. Blank optional values fall
    /// back to their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let mut config = Config {
            credentials: Credentials {
                username: lookup(ENV_USERNAME).unwrap_or_default(),
                password: lookup(ENV_PASSWORD).unwrap_or_default(),
            },
            ..Default::default()
        };

        if let Some(token) = non_blank(ENV_CLIENT_TOKEN) {
            config.provider.client_token = token.trim().to_string();
        }
        if let Some(url) = non_blank(ENV_BASE_URL) {
            config.provider.base_url = url.trim().to_string();
        }

        config.validate()?;
        Ok(config)
    }

    /// Check settings that would otherwise fail on first use
    pub fn validate(&self) -> Result<()> {
        let url = url::Url::parse(&self.provider.base_url).map_err(|e| Error::Config {
            message: format!("invalid provider base URL '{}': {}", self.provider.base_url, e),
            key: Some(ENV_BASE_URL.to_string()),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::Config {
                message: format!(
                    "provider base URL must use http or https, got '{}'",
                    url.scheme()
                ),
                key: Some(ENV_BASE_URL.to_string()),
            });
        }

        if self.provider.client_token.trim().is_empty() {
            return Err(Error::Config {
                message: "client token must not be empty".to_string(),
                key: Some(ENV_CLIENT_TOKEN.to_string()),
            });
        }

        if self.attachments.max_size_bytes == 0 {
            return Err(Error::Config {
                message: "attachment size limit must be positive".to_string(),
                key: Some("attachments.max_size_bytes".to_string()),
            });
        }

        // NaN and infinity would panic when scaling the delay
        let multiplier = self.retry.backoff_multiplier;
        if !multiplier.is_finite() || multiplier < 1.0 {
            return Err(Error::Config {
                message: format!(
                    "backoff multiplier must be a finite number of at least 1.0, got {}",
                    multiplier
                ),
                key: Some("retry.backoff_multiplier".to_string()),
            });
        }

        Ok(())
    }
}

fn default_base_url() -> String {
    "https://api.uslegalpro.com/v4".to_string()
}

fn default_client_token() -> String {
    "EVICT87".to_string()
}

fn default_jurisdiction() -> String {
    "il".to_string()
}

fn default_request_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_max_size_bytes() -> u64 {
    10 * 1024 * 1024
}

fn default_encode_timeout() -> Duration {
    Duration::from_secs(30)
}

fn default_true() -> bool {
    true
}

fn default_max_attempts() -> u32 {
    3
}

fn default_initial_delay() -> Duration {
    Duration::from_secs(1)
}

fn default_max_delay() -> Duration {
    Duration::from_secs(30)
}

fn default_backoff_multiplier() -> f64 {
    2.0
}

fn default_bind_address() -> SocketAddr {
    SocketAddr::from(([127, 0, 0, 1], 6790))
}

fn default_cors_origins() -> Vec<String> {
    vec!["*".to_string()]
}

// Duration serialization helper (whole seconds)
mod duration_serde {
    use serde::{Deserialize, Deserializer, Serializer};
    use std::time::Duration;

    pub fn serialize<S>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u64(duration.as_secs())
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let secs = u64::deserialize(deserializer)?;
        Ok(Duration::from_secs(secs))
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.provider.base_url, "https://api.uslegalpro.com/v4");
        assert_eq!(config.provider.client_token, "EVICT87");
        assert_eq!(config.attachments.max_size_bytes, 10 * 1024 * 1024);
        assert_eq!(config.attachments.encode_timeout, Duration::from_secs(30));
        assert_eq!(config.retry.max_attempts, 3);
        assert!(!config.submission.allow_fallback_account);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_lookup_reads_all_variables() {
        let config = Config::from_lookup(lookup_from(&[
            (ENV_USERNAME, "filer@example.com"),
            (ENV_PASSWORD, "hunter2"),
            (ENV_CLIENT_TOKEN, "CLIENT1"),
            (ENV_BASE_URL, "https://sandbox.example.com/v4"),
        ]))
        .unwrap();

        assert_eq!(config.credentials.username, "filer@example.com");
        assert_eq!(config.credentials.password, "hunter2");
        assert_eq!(config.provider.client_token, "CLIENT1");
        assert_eq!(config.provider.base_url, "https://sandbox.example.com/v4");
    }

    #[test]
    fn test_from_lookup_applies_defaults_for_missing_and_blank_values() {
        let config = Config::from_lookup(lookup_from(&[(ENV_CLIENT_TOKEN, "  ")])).unwrap();

        assert_eq!(config.provider.client_token, "EVICT87");
        assert_eq!(config.provider.base_url, "https://api.uslegalpro.com/v4");
        // Missing credentials are reported by the authenticator, not at load time
        assert!(config.credentials.username.is_empty());
        assert!(config.credentials.password.is_empty());
    }

    #[test]
    fn test_from_lookup_rejects_invalid_base_url() {
        let err = Config::from_lookup(lookup_from(&[(ENV_BASE_URL, "not a url")])).unwrap_err();
        match err {
            Error::Config { key, .. } => assert_eq!(key.as_deref(), Some(ENV_BASE_URL)),
            other => panic!("expected Config error, got {:?}", other),
        }

        let err =
            Config::from_lookup(lookup_from(&[(ENV_BASE_URL, "ftp://example.com")])).unwrap_err();
        assert!(err.to_string().contains("http or https"));
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let mut provider = ProviderConfig::default();
        assert_eq!(
            provider.endpoint("user/authenticate"),
            "https://api.uslegalpro.com/v4/il/user/authenticate"
        );

        provider.base_url = "http://localhost:8080/v4/".to_string();
        assert_eq!(
            provider.endpoint("/payment-accounts"),
            "http://localhost:8080/v4/il/payment-accounts"
        );
    }

    #[test]
    fn test_credentials_debug_redacts_password() {
        let creds = Credentials::new("filer", "s3cret");
        let debug = format!("{:?}", creds);
        assert!(debug.contains("filer"));
        assert!(!debug.contains("s3cret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn test_validate_rejects_bad_backoff_multiplier() {
        for multiplier in [0.5, f64::NAN, f64::INFINITY] {
            let mut config = Config {
                credentials: Credentials::new("filer", "pw"),
                ..Default::default()
            };
            config.retry.backoff_multiplier = multiplier;
            let err = config.validate().unwrap_err();
            assert!(
                matches!(&err, Error::Config { key: Some(k), .. } if k == "retry.backoff_multiplier"),
                "multiplier {} gave {:?}",
                multiplier,
                err
            );
        }
    }

    #[test]
    fn test_password_is_never_serialized() {
        let config = Config {
            credentials: Credentials::new("filer", "s3cret"),
            ..Default::default()
        };
        let json = serde_json::to_string(&config).unwrap();
        assert!(!json.contains("s3cret"));

        let parsed: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.credentials.username, "filer");
        assert!(parsed.credentials.password.is_empty());
        assert_eq!(parsed.attachments.encode_timeout, Duration::from_secs(30));
    }
}
