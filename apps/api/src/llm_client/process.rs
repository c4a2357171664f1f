//! Process-per-call generator: spawns `<bin> run <model>`, pipes the prompt to
//! stdin, and collects stdout until the process exits.

use std::process::Stdio;
use std::sync::Arc;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::process::{Child, Command};
use tokio::sync::Semaphore;
use tracing::{debug, warn};

use super::{GenerationError, Generator};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(120);
const DEFAULT_MAX_CONCURRENT: usize = 4;

/// Runs one external model process per `generate` call.
///
/// Concurrent calls are bounded by a semaphore so a burst of requests cannot
/// fan out into an unbounded number of model processes. The timeout covers both
/// the wait for a permit and the process itself; on expiry the child is killed
/// and reaped before `Timeout` is returned.
#[derive(Clone)]
pub struct ProcessGenerator {
    program: String,
    args: Vec<String>,
    model: String,
    timeout: Duration,
    permits: Arc<Semaphore>,
}

impl std::fmt::Debug for ProcessGenerator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProcessGenerator")
            .field("program", &self.program)
            .field("args", &self.args)
            .field("timeout", &self.timeout)
            .field("available_permits", &self.permits.available_permits())
            .finish()
    }
}

impl ProcessGenerator {
    /// Generator invoking `<program> run <model>`.
    pub fn new(program: impl Into<String>, model: impl Into<String>) -> Self {
        let model = model.into();
        Self {
            program: program.into(),
            args: vec!["run".to_string(), model.clone()],
            model,
            timeout: DEFAULT_TIMEOUT,
            permits: Arc::new(Semaphore::new(DEFAULT_MAX_CONCURRENT)),
        }
    }

    /// Replace the argument list passed to the program.
    pub fn with_args(mut self, args: Vec<String>) -> Self {
        self.args = args;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_concurrent(mut self, max_concurrent: usize) -> Self {
        self.permits = Arc::new(Semaphore::new(max_concurrent.max(1)));
        self
    }

    fn spawn(&self) -> Result<Child, GenerationError> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::null())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| GenerationError::Spawn {
                program: self.program.clone(),
                source,
            })
    }
}

#[async_trait]
impl Generator for ProcessGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        let started = Instant::now();

        let _permit = tokio::time::timeout(self.timeout, self.permits.acquire())
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))?
            .map_err(|_| GenerationError::AbnormalExit {
                status: "generator pool closed".to_string(),
            })?;

        let remaining = self.timeout.saturating_sub(started.elapsed());
        let mut child = self.spawn()?;
        debug!(
            "Spawned generator '{}' (pid {:?}, prompt {} bytes)",
            self.program,
            child.id(),
            prompt.len()
        );

        let outcome = tokio::time::timeout(remaining, communicate(&mut child, prompt)).await;

        let (status, stdout) = match outcome {
            Ok(result) => result?,
            Err(_) => {
                warn!(
                    "Generator '{}' exceeded {}s, killing pid {:?}",
                    self.program,
                    self.timeout.as_secs(),
                    child.id()
                );
                if let Err(e) = child.start_kill() {
                    warn!("Failed to kill generator process: {e}");
                }
                // Reap so the killed child does not linger as a zombie.
                let _ = child.wait().await;
                return Err(GenerationError::Timeout(self.timeout));
            }
        };

        if !status.success() {
            return Err(GenerationError::AbnormalExit {
                status: status.to_string(),
            });
        }

        let text = decode_ignoring_invalid(&stdout);
        debug!(
            "Generator finished in {}ms with {} bytes of output",
            started.elapsed().as_millis(),
            text.len()
        );

        Ok(text.trim().to_string())
    }

    fn model(&self) -> &str {
        &self.model
    }
}

/// Writes the prompt, closes stdin, and drains stdout concurrently so a large
/// prompt cannot deadlock against a full output pipe.
async fn communicate(
    child: &mut Child,
    prompt: &str,
) -> Result<(std::process::ExitStatus, Vec<u8>), GenerationError> {
    let stdin = child.stdin.take();
    let stdout = child.stdout.take();

    let write = async move {
        if let Some(mut stdin) = stdin {
            match stdin.write_all(prompt.as_bytes()).await {
                Ok(()) => {}
                // The process stopped reading; its exit status tells the rest.
                Err(e) if e.kind() == std::io::ErrorKind::BrokenPipe => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    };

    let read = async move {
        let mut buf = Vec::new();
        if let Some(mut stdout) = stdout {
            stdout.read_to_end(&mut buf).await?;
        }
        Ok::<_, std::io::Error>(buf)
    };

    let ((), buf) = tokio::try_join!(write, read)?;
    let status = child.wait().await?;
    Ok((status, buf))
}

/// UTF-8 decode that drops invalid byte sequences instead of substituting them.
fn decode_ignoring_invalid(bytes: &[u8]) -> String {
    bytes.utf8_chunks().map(|chunk| chunk.valid()).collect()
}
