/// LLM Client — the single point of entry for every text generation in the analyzer.
///
/// ARCHITECTURAL RULE: No other module may spawn the model process or call the
/// model server directly. All generations MUST go through a `Generator`.
///
/// Backends:
/// - `ProcessGenerator`: one `ollama run <model>` subprocess per call (default)
/// - `OllamaHttpGenerator`: Ollama's `/api/generate` endpoint
use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

pub mod http;
pub mod process;

pub use http::OllamaHttpGenerator;
pub use process::ProcessGenerator;

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("failed to start generator process '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("generator I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("generator exited abnormally ({status})")]
    AbnormalExit { status: String },

    #[error("generator HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("generator API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
}

impl GenerationError {
    pub fn is_timeout(&self) -> bool {
        matches!(self, GenerationError::Timeout(_))
    }
}

/// The generator trait. Implement this to swap backends without touching the
/// parser, safety filter, handler, or orchestrator.
///
/// Carried in `AppState` (via the orchestrator) as `Arc<dyn Generator>`.
///
/// An empty string is a valid result meaning "the model produced nothing".
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Model identifier, for health output and logs.
    fn model(&self) -> &str;
}
