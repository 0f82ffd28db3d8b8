use self::exec::ExecProvider;
use self::manual::ManualProvider;
use self::transform::{TransformConfig, TransformProvider};
use crate::challenge::{ChallengeProvider, ProviderError, ProviderResult};
use crate::config::EnvSource;

pub mod exec;
pub mod manual;
pub mod transform;

pub const PROVIDER_NAMES: &[&str] = &[
    ExecProvider::NAME,
    ManualProvider::NAME,
    TransformProvider::NAME,
];

/// Builds the provider registered under `name`, reading its settings from
/// `env`.
pub fn provider_by_name(
    name: &str,
    env: &dyn EnvSource,
) -> ProviderResult<Box<dyn ChallengeProvider>> {
    let provider: Box<dyn ChallengeProvider> = match name {
        ExecProvider::NAME => Box::new(ExecProvider::from_env(env)?),
        ManualProvider::NAME => Box::new(ManualProvider::new()),
        TransformProvider::NAME => {
            let config = TransformConfig::from_env(env);
            Box::new(TransformProvider::new(config, |inner| provider_by_name(inner, env))?)
        }
        other => return Err(ProviderError::UnknownProvider(other.to_owned())),
    };

    tracing::debug!("resolved challenge provider {name}");

    Ok(provider)
}
