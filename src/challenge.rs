//! DNS-01 challenge provider capability.
//!
//! Every provider, wrapped or not, exposes the same two operations so the
//! certificate client can swap one for another without knowing which it got.

use std::fmt::Debug;
use std::time::Duration;

pub use self::record::Dns01Record;

pub mod record;

pub type ProviderResult<T = ()> = Result<T, ProviderError>;

#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    /// Missing, empty or self-referential provider configuration.
    #[error("invalid provider configuration: {0}")]
    Configuration(String),

    #[error("unknown challenge provider `{0}`")]
    UnknownProvider(String),

    #[error("`{program} {action}` exited with {status}")]
    Exec {
        program: String,
        action: &'static str,
        status: std::process::ExitStatus,
    },

    #[error("failed to run `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("input closed before the challenge record was confirmed")]
    InputClosed,

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// How long the certificate client should wait for a presented record to
/// propagate, and how often it should check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PropagationTimeout {
    pub timeout: Duration,
    pub interval: Duration,
}

impl PropagationTimeout {
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);
    pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(2);

    pub fn new(timeout: Duration, interval: Duration) -> Self {
        Self { timeout, interval }
    }
}

impl Default for PropagationTimeout {
    fn default() -> Self {
        Self::new(Self::DEFAULT_TIMEOUT, Self::DEFAULT_INTERVAL)
    }
}

/// Creates and removes the DNS-01 validation record for a
/// domain/token/key-authorization triple.
#[async_trait::async_trait]
pub trait ChallengeProvider: Send + Sync + Debug {
    /// Name the provider is registered under.
    fn name(&self) -> &'static str;

    async fn present(&self, domain: &str, token: &str, key_auth: &str) -> ProviderResult;

    async fn clean_up(&self, domain: &str, token: &str, key_auth: &str) -> ProviderResult;

    /// Propagation timing advertised to the certificate client, `None` when
    /// the client defaults apply.
    fn timeout(&self) -> Option<PropagationTimeout> {
        None
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_propagation_timeout() {
        let timeout = PropagationTimeout::default();

        assert_eq!(timeout.timeout, Duration::from_secs(60));
        assert_eq!(timeout.interval, Duration::from_secs(2));
    }

    #[test]
    fn error_messages() {
        let err = ProviderError::UnknownProvider("route53".into());
        assert_eq!(err.to_string(), "unknown challenge provider `route53`");

        let err = ProviderError::Configuration("EXEC_PATH is empty".into());
        assert!(err.to_string().contains("EXEC_PATH"));

        let err = ProviderError::from(anyhow::anyhow!("zone not found"));
        assert_eq!(err.to_string(), "zone not found");
    }
}
