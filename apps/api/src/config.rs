use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context, Result};

/// Which generator backend serves `/analyze`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GeneratorBackend {
    /// One `<bin> run <model>` subprocess per request.
    Process,
    /// Ollama's HTTP `/api/generate` endpoint.
    Http,
}

/// Application configuration loaded from environment variables.
/// Every variable has a default; only malformed values fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub model_name: String,
    pub generator_backend: GeneratorBackend,
    pub generator_bin: String,
    /// Overrides the default `run <model>` argument list when set.
    pub generator_args: Option<Vec<String>>,
    pub ollama_url: String,
    pub prompts_dir: PathBuf,
    pub generation_timeout: Duration,
    pub max_concurrent_generations: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        let generator_backend = match env_or("GENERATOR_BACKEND", "process")
            .to_lowercase()
            .as_str()
        {
            "process" => GeneratorBackend::Process,
            "http" => GeneratorBackend::Http,
            other => bail!("GENERATOR_BACKEND must be 'process' or 'http', got '{other}'"),
        };

        let generation_timeout = parse_timeout_secs(&env_or("GENERATION_TIMEOUT_SECS", "120"))?;

        let max_concurrent_generations = env_or("MAX_CONCURRENT_GENERATIONS", "4")
            .parse::<usize>()
            .context("MAX_CONCURRENT_GENERATIONS must be a positive integer")?;
        if max_concurrent_generations == 0 {
            bail!("MAX_CONCURRENT_GENERATIONS must be at least 1");
        }

        Ok(Config {
            port: env_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            model_name: env_or("MODEL_NAME", "llama3"),
            generator_backend,
            generator_bin: env_or("GENERATOR_BIN", "ollama"),
            generator_args: std::env::var("GENERATOR_ARGS")
                .ok()
                .map(|args| args.split_whitespace().map(str::to_string).collect()),
            ollama_url: env_or("OLLAMA_URL", "http://localhost:11434"),
            prompts_dir: PathBuf::from(env_or("PROMPTS_DIR", "prompts")),
            generation_timeout,
            max_concurrent_generations,
        })
    }
}

/// A zero timeout would fail every generation, so it is rejected at startup.
fn parse_timeout_secs(raw: &str) -> Result<Duration> {
    let secs = raw
        .parse::<u64>()
        .context("GENERATION_TIMEOUT_SECS must be a whole number of seconds")?;
    if secs == 0 {
        bail!("GENERATION_TIMEOUT_SECS must be at least 1");
    }
    Ok(Duration::from_secs(secs))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_timeout_secs_accepts_positive() {
        assert_eq!(parse_timeout_secs("120").unwrap(), Duration::from_secs(120));
    }

    #[test]
    fn test_parse_timeout_secs_rejects_zero() {
        let err = parse_timeout_secs("0").unwrap_err();
        assert!(err.to_string().contains("at least 1"));
    }

    #[test]
    fn test_parse_timeout_secs_rejects_garbage() {
        assert!(parse_timeout_secs("soon").is_err());
        assert!(parse_timeout_secs("-5").is_err());
    }
}
