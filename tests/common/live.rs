//! Live provider configuration loaded from .env

use evict_efile::Config;
use evict_efile::config::{ENV_PASSWORD, ENV_USERNAME};

/// True when `.env` or the environment provides provider credentials
pub fn has_live_credentials() -> bool {
    dotenvy::dotenv().ok();
    [ENV_USERNAME, ENV_PASSWORD]
        .iter()
        .all(|key| std::env::var(key).is_ok_and(|v| !v.trim().is_empty()))
}

/// Config for the real provider
///
/// Reads `VITE_EFILE_USERNAME`, `VITE_EFILE_PASSWORD` and optionally
/// `VITE_EFILE_CLIENT_TOKEN` / `VITE_EFILE_BASE_URL` (point the latter at the
/// provider's staging environment).
pub fn live_config() -> Config {
    dotenvy::dotenv().ok();
    Config::from_env().unwrap()
}

/// Live config with a password the provider will reject
pub fn live_config_bad_password() -> Config {
    let mut config = live_config();
    config.credentials.password = "invalid_password_12345".to_string();
    config
}
