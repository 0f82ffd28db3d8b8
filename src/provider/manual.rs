use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::Mutex;

use crate::challenge::{ChallengeProvider, Dns01Record, ProviderError, ProviderResult};

type Input = Box<dyn AsyncBufRead + Send + Unpin>;
type Output = Box<dyn AsyncWrite + Send + Unpin>;

/// Operator terminal. Prompt and confirmation share one lock so concurrent
/// challenges do not interleave.
struct Console {
    input: Input,
    output: Output,
}

impl Console {
    async fn say(&mut self, message: &str) -> ProviderResult {
        self.output.write_all(message.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await?;

        Ok(())
    }
}

/// Asks an operator to create the record and waits for confirmation.
pub struct ManualProvider {
    console: Mutex<Console>,
}

impl ManualProvider {
    pub const NAME: &str = "manual";
    pub const TTL: u32 = 120;

    /// Prompts on stderr and reads confirmations from stdin.
    pub fn new() -> Self {
        Self::with_io(BufReader::new(tokio::io::stdin()), tokio::io::stderr())
    }

    pub fn with_io(
        input: impl AsyncBufRead + Send + Unpin + 'static,
        output: impl AsyncWrite + Send + Unpin + 'static,
    ) -> Self {
        Self {
            console: Mutex::new(Console {
                input: Box::new(input),
                output: Box::new(output),
            }),
        }
    }
}

impl Default for ManualProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for ManualProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ManualProvider").finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl ChallengeProvider for ManualProvider {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    async fn present(&self, domain: &str, _token: &str, key_auth: &str) -> ProviderResult {
        let record = Dns01Record::new(domain, key_auth);
        tracing::debug!(fqdn = %record.fqdn, "waiting for manual TXT record");

        let mut console = self.console.lock().await;

        console
            .say(&format!(
                "Please create the following TXT record for {domain}:\n{} {} IN TXT \"{}\"\n\
                 Press 'Enter' when you are done.",
                record.fqdn,
                Self::TTL,
                record.value
            ))
            .await?;

        let mut line = String::new();
        if console.input.read_line(&mut line).await? == 0 {
            return Err(ProviderError::InputClosed);
        }

        Ok(())
    }

    async fn clean_up(&self, domain: &str, _token: &str, key_auth: &str) -> ProviderResult {
        let record = Dns01Record::new(domain, key_auth);
        tracing::debug!(fqdn = %record.fqdn, "manual TXT record no longer needed");

        let mut console = self.console.lock().await;
        console
            .say(&format!("You can now remove the TXT record {} for {domain}.", record.fqdn))
            .await
    }
}
