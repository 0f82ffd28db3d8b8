use std::collections::HashMap;
use std::time::Duration;

use crate::challenge::{ProviderError, ProviderResult};

/// Source of provider configuration values.
///
/// Providers read their settings through this instead of touching the
/// process environment directly, so tests can construct them from a map.
pub trait EnvSource {
    fn get(&self, key: &str) -> Option<String>;

    /// Trimmed value, empty when the variable is unset.
    fn string(&self, key: &str) -> String {
        self.get(key)
            .map(|value| value.trim().to_owned())
            .unwrap_or_default()
    }

    /// Whole seconds, `default` when unset or blank.
    fn seconds(&self, key: &str, default: Duration) -> ProviderResult<Duration> {
        let value = self.string(key);
        if value.is_empty() {
            return Ok(default);
        }

        let secs = value.parse::<u64>().map_err(|err| {
            ProviderError::Configuration(format!(
                "`{key}` must be whole seconds, got `{value}`: {err}"
            ))
        })?;

        Ok(Duration::from_secs(secs))
    }
}

/// The environment of the running process.
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn get(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

impl EnvSource for HashMap<String, String> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).cloned()
    }
}

impl EnvSource for HashMap<&str, &str> {
    fn get(&self, key: &str) -> Option<String> {
        HashMap::get(self, key).map(|value| (*value).to_owned())
    }
}
