//! Provider that validates through a dedicated validation domain.
//!
//! Each target domain gets a CNAME from `_acme-challenge.<domain>` to
//! `_acme-challenge.<domain>.<suffix>`, and the inner provider only ever
//! manages records under `<suffix>`. With `TRANSFORM_DOMAIN=exvalidate.com`
//! and `TRANSFORM_PROVIDER=exec`, a challenge for `example.com` is presented
//! by the exec provider as `example.com.exvalidate.com`.

use crate::challenge::{ChallengeProvider, PropagationTimeout, ProviderError, ProviderResult};
use crate::config::EnvSource;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransformConfig {
    /// Name of the provider that manages the validation domain.
    pub provider: String,
    /// Validation domain appended to every challenge domain.
    pub domain: String,
}

impl TransformConfig {
    pub const PROVIDER_VAR: &str = "TRANSFORM_PROVIDER";
    pub const DOMAIN_VAR: &str = "TRANSFORM_DOMAIN";

    pub fn new(provider: impl Into<String>, domain: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            domain: domain.into(),
        }
    }

    pub fn from_env(env: &dyn EnvSource) -> Self {
        Self::new(env.string(Self::PROVIDER_VAR), env.string(Self::DOMAIN_VAR))
    }

    fn validate(&self) -> ProviderResult {
        let reason = if self.provider.is_empty() {
            format!("`{}` is empty or not set", Self::PROVIDER_VAR)
        } else if self.provider == TransformProvider::NAME {
            format!(
                "`{}` must name another provider, not `{}`",
                Self::PROVIDER_VAR,
                TransformProvider::NAME
            )
        } else if self.domain.is_empty() {
            format!("`{}` is empty or not set", Self::DOMAIN_VAR)
        } else {
            return Ok(());
        };

        Err(ProviderError::Configuration(format!(
            "transform provider requires {} and {}: {reason}",
            Self::PROVIDER_VAR,
            Self::DOMAIN_VAR
        )))
    }
}

#[derive(Debug)]
pub struct TransformProvider {
    suffix: String,
    inner: Box<dyn ChallengeProvider>,
}

impl TransformProvider {
    pub const NAME: &str = "transform";

    /// Resolves the inner provider through `resolve`, which is handed in by
    /// the registry so this module never has to name it.
    pub fn new<F>(config: TransformConfig, resolve: F) -> ProviderResult<Self>
    where
        F: FnOnce(&str) -> ProviderResult<Box<dyn ChallengeProvider>>,
    {
        config.validate()?;

        let inner = resolve(&config.provider)?;

        tracing::debug!(
            inner = inner.name(),
            suffix = %config.domain,
            "created transform provider"
        );

        Ok(Self {
            suffix: config.domain,
            inner,
        })
    }

    pub fn suffix(&self) -> &str {
        &self.suffix
    }

    pub fn inner(&self) -> &dyn ChallengeProvider {
        self.inner.as_ref()
    }

    fn transform(&self, domain: &str) -> String {
        format!("{domain}.{}", self.suffix)
    }
}

#[async_trait::async_trait]
impl ChallengeProvider for TransformProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn present(&self, domain: &str, token: &str, key_auth: &str) -> ProviderResult {
        let target = self.transform(domain);
        tracing::info!("presenting challenge for {domain} as {target} via {}", self.inner.name());

        self.inner.present(&target, token, key_auth).await
    }

    async fn clean_up(&self, domain: &str, token: &str, key_auth: &str) -> ProviderResult {
        let target = self.transform(domain);
        tracing::info!("cleaning up challenge for {domain} as {target} via {}", self.inner.name());

        self.inner.clean_up(&target, token, key_auth).await
    }

    fn timeout(&self) -> Option<PropagationTimeout> {
        self.inner.timeout()
    }
}
