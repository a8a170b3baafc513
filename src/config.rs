use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};

use crate::{
    constants::{DEFAULT_CALLOUT_TIMEOUT, PRODUCTION_VERIFY_RECEIPT_URL, SANDBOX_VERIFY_RECEIPT_URL},
    errors::ConfigError,
};

const ENV_PRODUCTION: &str = "IAP_PRODUCTION";
const ENV_SHARED_SECRET: &str = "IAP_SHARED_SECRET";
const ENV_TIMEOUT_SECS: &str = "IAP_TIMEOUT_SECS";

/// Receipt verification settings. Fixed once the verifier is built.
#[derive(Debug, Clone)]
pub struct ReceiptVerifierConfig {
    /// Whether the service runs in production. Non-production clients re-send
    /// sandbox receipts (status 21007) to the sandbox endpoint.
    pub(crate) is_production: bool,
    pub(crate) production_url: String,
    pub(crate) sandbox_url: String,
    /// Timeout applied to each callout by the default HTTP client.
    pub(crate) timeout: Duration,
    /// App-specific shared secret, sent as `password`.
    pub(crate) shared_secret: Option<SecretString>,
}

impl ReceiptVerifierConfig {
    pub fn new(is_production: bool) -> Self {
        Self {
            is_production,
            production_url: PRODUCTION_VERIFY_RECEIPT_URL.to_string(),
            sandbox_url: SANDBOX_VERIFY_RECEIPT_URL.to_string(),
            timeout: DEFAULT_CALLOUT_TIMEOUT,
            shared_secret: None,
        }
    }

    /// Create configuration from environment variables.
    ///
    /// Reads:
    /// - `IAP_PRODUCTION` (optional, "true" or "1"; defaults to false)
    /// - `IAP_SHARED_SECRET` (optional)
    /// - `IAP_TIMEOUT_SECS` (optional, defaults to 10)
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let is_production = match lookup(ENV_PRODUCTION) {
            None => false,
            Some(v) => match v.trim().to_ascii_lowercase().as_str() {
                "true" | "1" => true,
                "false" | "0" | "" => false,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: ENV_PRODUCTION,
                        value: v,
                    })
                }
            },
        };
        let mut config = Self::new(is_production);
        if let Some(secret) = lookup(ENV_SHARED_SECRET).filter(|s| !s.is_empty()) {
            config = config.with_shared_secret(secret);
        }
        if let Some(v) = lookup(ENV_TIMEOUT_SECS) {
            let secs = v
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .ok_or(ConfigError::InvalidValue {
                    key: ENV_TIMEOUT_SECS,
                    value: v.clone(),
                })?;
            config = config.with_timeout(Duration::from_secs(secs));
        }
        Ok(config)
    }

    pub fn with_shared_secret(mut self, secret: impl Into<String>) -> Self {
        self.shared_secret = Some(SecretString::new(secret.into()));
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Override the production endpoint (for testing).
    pub fn with_production_url(mut self, url: impl Into<String>) -> Self {
        self.production_url = url.into();
        self
    }

    /// Override the sandbox endpoint (for testing).
    pub fn with_sandbox_url(mut self, url: impl Into<String>) -> Self {
        self.sandbox_url = url.into();
        self
    }

    pub fn is_production(&self) -> bool {
        self.is_production
    }

    pub(crate) fn shared_secret(&self) -> Option<&str> {
        self.shared_secret.as_ref().map(|s| s.expose_secret().as_str())
    }
}
