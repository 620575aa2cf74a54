use crate::error::LedgerError;
use crate::utils::{DEFAULT_CONFIRMATION_DELAY_MS, DEFAULT_ID_PREFIX};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const ENV_CONFIRMATION_DELAY_MS: &str = "NEXIMPACT_CONFIRMATION_DELAY_MS";
pub const ENV_VERIFIED_ON_RECORD: &str = "NEXIMPACT_VERIFIED_ON_RECORD";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerConfig {
    pub confirmation_delay_ms: u64,
    /// Whether new transactions start out verified. When false they stay
    /// pending (and out of the balance) until confirmed.
    pub verified_on_record: bool,
    pub id_prefix: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            confirmation_delay_ms: DEFAULT_CONFIRMATION_DELAY_MS,
            verified_on_record: true,
            id_prefix: DEFAULT_ID_PREFIX.to_string(),
        }
    }
}

impl LedgerConfig {
    pub fn from_env() -> Result<Self, LedgerError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, LedgerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(raw) = lookup(ENV_CONFIRMATION_DELAY_MS) {
            config.confirmation_delay_ms = raw.trim().parse().map_err(|_| {
                LedgerError::InvalidConfig(format!(
                    "{} must be a whole number of milliseconds, got '{}'",
                    ENV_CONFIRMATION_DELAY_MS, raw
                ))
            })?;
        }

        if let Some(raw) = lookup(ENV_VERIFIED_ON_RECORD) {
            config.verified_on_record = match raw.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "yes" => true,
                "0" | "false" | "no" => false,
                _ => {
                    return Err(LedgerError::InvalidConfig(format!(
                        "{} must be true or false, got '{}'",
                        ENV_VERIFIED_ON_RECORD, raw
                    )))
                }
            };
        }

        Ok(config)
    }

    pub fn confirmation_delay(&self) -> Duration {
        Duration::from_millis(self.confirmation_delay_ms)
    }
}
