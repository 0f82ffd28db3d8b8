//! DNS-01 challenge providers for ACME certificate issuance, centred on the
//! `transform` provider: a wrapper that validates every domain through a
//! dedicated validation domain by delegating to another provider with the
//! challenge domain rewritten to `<domain>.<suffix>`.

pub mod challenge;
pub mod config;
pub mod provider;

pub use self::challenge::{
    ChallengeProvider, Dns01Record, PropagationTimeout, ProviderError, ProviderResult,
};
pub use self::config::{EnvSource, ProcessEnv};
pub use self::provider::provider_by_name;
pub use self::provider::transform::{TransformConfig, TransformProvider};
