//! Configuration errors

use thiserror::Error;

use super::{ConfigKey, RawConfig};

/// Required configuration keys are missing.
///
/// Every missing key is reported at once, in the order the required keys are
/// declared in.
#[derive(Debug, Error)]
#[error("invalid SMTP adapter configuration: {}", describe(.missing))]
pub struct ConfigurationError {
    missing: Vec<ConfigKey>,
    raw: RawConfig,
}

impl ConfigurationError {
    /// Creates the error for `missing` keys of `raw`
    pub fn new(missing: Vec<ConfigKey>, raw: RawConfig) -> Self {
        Self { missing, raw }
    }

    /// The keys that were missing
    pub fn missing(&self) -> &[ConfigKey] {
        &self.missing
    }

    /// The configuration that failed to resolve
    pub fn raw(&self) -> &RawConfig {
        &self.raw
    }

    /// One `Key <key> is required` message per missing key
    pub fn messages(&self) -> Vec<String> {
        messages(&self.missing)
    }
}

fn messages(missing: &[ConfigKey]) -> Vec<String> {
    missing
        .iter()
        .map(|key| format!("Key {} is required", key))
        .collect()
}

fn describe(missing: &[ConfigKey]) -> String {
    messages(missing).join(", ")
}
