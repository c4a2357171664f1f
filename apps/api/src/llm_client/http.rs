//! Ollama HTTP backend — same contract as the process backend, over `/api/generate`.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::{GenerationError, Generator};

const MAX_RETRIES: u32 = 3;

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

/// Calls a running Ollama server instead of spawning a process per request.
/// Retries on connection failures and 5xx responses with exponential backoff.
/// Timeouts are never retried, and the deadline covers every attempt and backoff.
#[derive(Clone)]
pub struct OllamaHttpGenerator {
    client: Client,
    endpoint: String,
    model: String,
    timeout: Duration,
}

impl OllamaHttpGenerator {
    pub fn new(
        base_url: &str,
        model: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        Ok(Self {
            client: Client::builder().timeout(timeout).build()?,
            endpoint: generate_endpoint(base_url),
            model: model.into(),
            timeout,
        })
    }
}

#[async_trait]
impl Generator for OllamaHttpGenerator {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        tokio::time::timeout(self.timeout, self.generate_with_retries(prompt))
            .await
            .map_err(|_| GenerationError::Timeout(self.timeout))?
    }

    fn model(&self) -> &str {
        &self.model
    }
}

impl OllamaHttpGenerator {
    async fn generate_with_retries(&self, prompt: &str) -> Result<String, GenerationError> {
        let request_body = GenerateRequest {
            model: &self.model,
            prompt,
            stream: false,
        };

        let mut last_error: Option<GenerationError> = None;

        for attempt in 0..MAX_RETRIES {
            if attempt > 0 {
                // Exponential backoff: 1s, 2s
                let delay = Duration::from_millis(1000 * (1 << (attempt - 1)));
                warn!(
                    "Generation attempt {} failed, retrying after {}ms...",
                    attempt,
                    delay.as_millis()
                );
                tokio::time::sleep(delay).await;
            }

            let response = match self
                .client
                .post(&self.endpoint)
                .json(&request_body)
                .send()
                .await
            {
                Ok(r) => r,
                Err(e) if e.is_timeout() => return Err(GenerationError::Timeout(self.timeout)),
                Err(e) => {
                    last_error = Some(GenerationError::Http(e));
                    continue;
                }
            };

            let status = response.status();

            if status.is_server_error() {
                let body = response.text().await.unwrap_or_default();
                warn!("Ollama returned {}: {}", status, body);
                last_error = Some(GenerationError::Api {
                    status: status.as_u16(),
                    message: body,
                });
                continue;
            }

            if !status.is_success() {
                let body = response.text().await.unwrap_or_default();
                let message = serde_json::from_str::<OllamaError>(&body)
                    .map(|e| e.error)
                    .unwrap_or(body);
                return Err(GenerationError::Api {
                    status: status.as_u16(),
                    message,
                });
            }

            let generated: GenerateResponse = match response.json().await {
                Ok(g) => g,
                Err(e) if e.is_timeout() => return Err(GenerationError::Timeout(self.timeout)),
                Err(e) => return Err(GenerationError::Http(e)),
            };

            debug!(
                "Generation succeeded: prompt_tokens={:?}, output_tokens={:?}",
                generated.prompt_eval_count, generated.eval_count
            );

            return Ok(generated.response.trim().to_string());
        }

        Err(last_error.unwrap_or(GenerationError::Api {
            status: 503,
            message: format!("no response after {MAX_RETRIES} attempts"),
        }))
    }
}

fn generate_endpoint(base_url: &str) -> String {
    format!("{}/api/generate", base_url.trim_end_matches('/'))
}
