//! One request → one analysis: compose, generate, validate, parse.
//!
//! The orchestrator holds no per-request state. The prompt table and the
//! generator are injected once at startup and shared read-only.

use std::sync::Arc;

use indexmap::IndexMap;
use tracing::{debug, info, instrument};

use crate::analysis::composer::compose;
use crate::analysis::models::{
    AnalysisRequest, AnalysisResponse, DEFAULT_MISTAKE_TYPE, DEFAULT_REASONING_PATTERN,
};
use crate::analysis::parser::parse;
use crate::analysis::prompts::{PromptTable, NO_RESPONSE_MESSAGE, SAFETY_VIOLATION_MESSAGE};
use crate::analysis::safety::{mentions_reasoning, validate_output, OutputVerdict};
use crate::errors::AppError;
use crate::llm_client::Generator;

pub const SAFETY_VIOLATION_TYPE: &str = "Safety Violation";
pub const SAFETY_VIOLATION_PATTERN: &str = "Attempted to solve";

#[derive(Clone)]
pub struct Orchestrator {
    prompts: Arc<PromptTable>,
    generator: Arc<dyn Generator>,
}

impl Orchestrator {
    pub fn new(prompts: Arc<PromptTable>, generator: Arc<dyn Generator>) -> Self {
        Self { prompts, generator }
    }

    pub fn model(&self) -> &str {
        self.generator.model()
    }

    /// Only generator transport failures become errors. Empty and unsafe
    /// generations are returned as regular analyses.
    #[instrument(skip_all, fields(mode = %request.mode().as_str()))]
    pub async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResponse, AppError> {
        let system_prompt = self.prompts.get(request.mode());
        let prompt = compose(system_prompt, &request.problem, &request.reasoning);

        let raw = self.generator.generate(&prompt).await?;
        debug!(
            "Generation returned {} bytes (reasoning vocabulary: {})",
            raw.len(),
            mentions_reasoning(&raw)
        );

        let response = match validate_output(&raw) {
            OutputVerdict::Empty => {
                info!("Generator produced no text");
                AnalysisResponse {
                    raw_response: Some(raw),
                    ..AnalysisResponse::with_explanation(NO_RESPONSE_MESSAGE)
                }
            }
            OutputVerdict::Unsafe => AnalysisResponse {
                mistake_type: SAFETY_VIOLATION_TYPE.to_string(),
                reasoning_pattern: SAFETY_VIOLATION_PATTERN.to_string(),
                explanation: SAFETY_VIOLATION_MESSAGE.to_string(),
                raw_response: Some(raw),
                additional_fields: IndexMap::new(),
            },
            OutputVerdict::Accepted => {
                let parsed = parse(&raw);
                if parsed.mistake_type == DEFAULT_MISTAKE_TYPE
                    && parsed.reasoning_pattern == DEFAULT_REASONING_PATTERN
                {
                    debug!("No classification headers recognized; returning defaults");
                }
                AnalysisResponse {
                    raw_response: Some(raw),
                    ..parsed
                }
            }
        };

        Ok(response)
    }
}
