//! Provider that hands challenge records to an external program.
//!
//! The program is invoked as `<path> present|cleanup <fqdn> <value>`, or with
//! `EXEC_MODE=RAW` as `<path> present|cleanup -- <domain> <token> <key-auth>`.

use std::ffi::OsString;
use std::path::PathBuf;

use tokio::process::Command;

use crate::challenge::{
    ChallengeProvider, Dns01Record, PropagationTimeout, ProviderError, ProviderResult,
};
use crate::config::EnvSource;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExecMode {
    /// Pass the computed record name and value.
    #[default]
    Record,
    /// Pass the challenge triple untouched.
    Raw,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecConfig {
    pub program: PathBuf,
    pub mode: ExecMode,
    pub timeout: PropagationTimeout,
}

impl ExecConfig {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            mode: ExecMode::default(),
            timeout: PropagationTimeout::default(),
        }
    }

    pub fn from_env(env: &dyn EnvSource) -> ProviderResult<Self> {
        let program = env.string("EXEC_PATH");
        if program.is_empty() {
            return Err(ProviderError::Configuration(
                "exec provider requires `EXEC_PATH`".to_owned(),
            ));
        }

        let mode = match env.string("EXEC_MODE").as_str() {
            "" => ExecMode::Record,
            mode if mode.eq_ignore_ascii_case("raw") => ExecMode::Raw,
            other => {
                return Err(ProviderError::Configuration(format!(
                    "unsupported `EXEC_MODE` `{other}`, expected `RAW` or nothing"
                )));
            }
        };

        let timeout = PropagationTimeout::new(
            env.seconds("EXEC_PROPAGATION_TIMEOUT", PropagationTimeout::DEFAULT_TIMEOUT)?,
            env.seconds("EXEC_POLLING_INTERVAL", PropagationTimeout::DEFAULT_INTERVAL)?,
        );

        Ok(Self {
            program: program.into(),
            mode,
            timeout,
        })
    }
}

#[derive(Debug)]
pub struct ExecProvider {
    config: ExecConfig,
}

impl ExecProvider {
    pub const NAME: &str = "exec";

    pub fn new(config: ExecConfig) -> Self {
        Self { config }
    }

    pub fn from_env(env: &dyn EnvSource) -> ProviderResult<Self> {
        ExecConfig::from_env(env).map(Self::new)
    }

    fn args(&self, action: &str, domain: &str, token: &str, key_auth: &str) -> Vec<OsString> {
        let mut args = vec![OsString::from(action)];

        match self.config.mode {
            ExecMode::Record => {
                let record = Dns01Record::new(domain, key_auth);
                args.extend([record.fqdn.into(), record.value.into()]);
            }
            ExecMode::Raw => {
                // tokens are base64url and may start with `-`
                args.extend(["--".into(), domain.into(), token.into(), key_auth.into()]);
            }
        }

        args
    }

    async fn run(&self, action: &'static str, args: Vec<OsString>) -> ProviderResult {
        let program = &self.config.program;

        tracing::debug!(program = %program.display(), action, "running exec provider");

        let status = Command::new(program)
            .args(&args)
            .kill_on_drop(true)
            .status()
            .await
            .map_err(|source| ProviderError::Spawn {
                program: program.display().to_string(),
                source,
            })?;

        if !status.success() {
            return Err(ProviderError::Exec {
                program: program.display().to_string(),
                action,
                status,
            });
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl ChallengeProvider for ExecProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn present(&self, domain: &str, token: &str, key_auth: &str) -> ProviderResult {
        let args = self.args("present", domain, token, key_auth);
        self.run("present", args).await
    }

    async fn clean_up(&self, domain: &str, token: &str, key_auth: &str) -> ProviderResult {
        let args = self.args("cleanup", domain, token, key_auth);
        self.run("cleanup", args).await
    }

    fn timeout(&self) -> Option<PropagationTimeout> {
        Some(self.config.timeout)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::time::Duration;

    use super::*;

    fn provider(program: &str, mode: ExecMode) -> ExecProvider {
        ExecProvider::new(ExecConfig {
            mode,
            ..ExecConfig::new(program)
        })
    }

    #[test]
    fn record_mode_passes_fqdn_and_value() {
        let provider = provider("/usr/local/bin/dns-hook", ExecMode::Record);

        let args = provider.args("present", "example.com", "tok", "tok.thumbprint");
        assert_eq!(
            args,
            [
                "present",
                "_acme-challenge.example.com.",
                "yKCudOCZgG8qQwi5ThOINd5az0OzxPY3veFsqLGDCA0"
            ]
        );
    }

    #[test]
    fn raw_mode_passes_triple() {
        let provider = provider("/usr/local/bin/dns-hook", ExecMode::Raw);

        let args = provider.args("cleanup", "example.com.exvalidate.com", "tok", "key");
        assert_eq!(
            args,
            ["cleanup", "--", "example.com.exvalidate.com", "tok", "key"]
        );
    }

    #[test]
    fn raw_mode_keeps_dash_prefixed_token_positional() {
        let provider = provider("/usr/local/bin/dns-hook", ExecMode::Raw);

        let args = provider.args("present", "example.com", "-Xtok", "-Xtok.thumb");
        assert_eq!(args, ["present", "--", "example.com", "-Xtok", "-Xtok.thumb"]);
    }

    #[test]
    fn config_from_env() {
        let env = HashMap::from([
            ("EXEC_PATH", "/usr/local/bin/dns-hook"),
            ("EXEC_MODE", "RAW"),
            ("EXEC_PROPAGATION_TIMEOUT", "300"),
        ]);

        let config = ExecConfig::from_env(&env).unwrap();

        assert_eq!(config.program, PathBuf::from("/usr/local/bin/dns-hook"));
        assert_eq!(config.mode, ExecMode::Raw);
        assert_eq!(config.timeout.timeout, Duration::from_secs(300));
        assert_eq!(config.timeout.interval, PropagationTimeout::DEFAULT_INTERVAL);
    }

    #[test]
    fn config_requires_path() {
        let env = HashMap::from([("EXEC_MODE", "RAW")]);

        let err = ExecConfig::from_env(&env).unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(msg) if msg.contains("EXEC_PATH")));
    }

    #[test]
    fn config_rejects_unknown_mode() {
        let env = HashMap::from([("EXEC_PATH", "hook"), ("EXEC_MODE", "json")]);

        let err = ExecConfig::from_env(&env).unwrap_err();
        assert!(matches!(err, ProviderError::Configuration(msg) if msg.contains("json")));
    }

    #[test]
    fn timeout_is_advertised() {
        let provider = provider("hook", ExecMode::Record);

        assert_eq!(provider.timeout(), Some(PropagationTimeout::default()));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn successful_program_presents() {
        let provider = provider("true", ExecMode::Record);

        provider.present("example.com", "tok", "key").await.unwrap();
        provider.clean_up("example.com", "tok", "key").await.unwrap();
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn failing_program_is_reported() {
        let provider = provider("false", ExecMode::Raw);

        let err = provider.present("example.com", "tok", "key").await.unwrap_err();
        match err {
            ProviderError::Exec { program, action, status } => {
                assert_eq!(program, "false");
                assert_eq!(action, "present");
                assert!(!status.success());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn missing_program_names_the_path() {
        let provider = provider("/nonexistent/acme-transform-hook", ExecMode::Record);

        let err = provider.clean_up("example.com", "tok", "key").await.unwrap_err();
        assert!(err.to_string().contains("/nonexistent/acme-transform-hook"));
        match err {
            ProviderError::Spawn { program, source } => {
                assert_eq!(program, "/nonexistent/acme-transform-hook");
                assert_eq!(source.kind(), std::io::ErrorKind::NotFound);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
