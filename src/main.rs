use acme_transform::provider::{PROVIDER_NAMES, provider_by_name};
use acme_transform::{ChallengeProvider, ProcessEnv, TransformProvider};
use anyhow::Context;
use clap::{Parser, Subcommand};

/// Present or clean up a single DNS-01 challenge record.
#[derive(Parser, Debug)]
#[command(name = "acme-transform", version, about)]
struct Args {
    /// Challenge provider to use.
    #[arg(long, env = "DNS_PROVIDER", default_value = TransformProvider::NAME)]
    dns: String,

    /// Log level, used when `RUST_LOG` is not set.
    #[arg(short, long, default_value = "info")]
    log_level: String,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Create the challenge record.
    Present(Challenge),
    /// Remove the challenge record.
    Cleanup(Challenge),
}

#[derive(clap::Args, Debug)]
struct Challenge {
    domain: String,
    token: String,
    key_auth: String,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt().with_env_filter(filter).init();

    let provider = provider_by_name(&args.dns, &ProcessEnv).with_context(|| {
        format!(
            "failed to create `{}` provider, known providers: {}",
            args.dns,
            PROVIDER_NAMES.join(", ")
        )
    })?;

    if let Some(timeout) = provider.timeout() {
        tracing::debug!(
            timeout = ?timeout.timeout,
            interval = ?timeout.interval,
            "provider propagation timeout"
        );
    }

    run(provider.as_ref(), args.action).await
}

async fn run(provider: &dyn ChallengeProvider, action: Action) -> anyhow::Result<()> {
    match action {
        Action::Present(c) => provider
            .present(&c.domain, &c.token, &c.key_auth)
            .await
            .with_context(|| format!("failed to present challenge for {}", c.domain))?,
        Action::Cleanup(c) => provider
            .clean_up(&c.domain, &c.token, &c.key_auth)
            .await
            .with_context(|| format!("failed to clean up challenge for {}", c.domain))?,
    }

    tracing::info!("done");

    Ok(())
}
