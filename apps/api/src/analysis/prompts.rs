// Prompt constants and the per-mode system prompt table.
// The table is built once at startup and shared read-only afterwards.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::analysis::models::Mode;

/// Shared system prompt used for every mode when a prompt file is missing.
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are an AI tutor helping students understand their mistakes.";

/// Trailing instruction appended after the question/answer block.
pub const ANALYZE_INSTRUCTION: &str =
    "Analyze the reasoning mistake without solving or calculating.";

/// Explanation returned when the generator produced no text.
pub const NO_RESPONSE_MESSAGE: &str = "No response generated. Try rephrasing.";

/// Explanation returned when the safety filter blocks a generation.
pub const SAFETY_VIOLATION_MESSAGE: &str = "The response crossed into solving territory.\n\
    The system is designed to explain mistakes only.";

/// File name of the system prompt for each mode, relative to the prompts directory.
pub fn prompt_file_name(mode: Mode) -> &'static str {
    match mode {
        Mode::Education => "system_prompt.txt",
        Mode::Interview => "system_prompt_interview.txt",
        Mode::Research => "system_prompt_research.txt",
    }
}

/// Immutable mode → system prompt lookup.
#[derive(Debug, Clone)]
pub struct PromptTable {
    prompts: HashMap<Mode, String>,
}

impl PromptTable {
    /// Every mode gets the same prompt.
    pub fn uniform(prompt: impl Into<String>) -> Self {
        let prompt = prompt.into();
        Self {
            prompts: Mode::ALL.iter().map(|&m| (m, prompt.clone())).collect(),
        }
    }

    pub fn from_prompts(education: String, interview: String, research: String) -> Self {
        Self {
            prompts: HashMap::from([
                (Mode::Education, education),
                (Mode::Interview, interview),
                (Mode::Research, research),
            ]),
        }
    }

    /// Reads the three prompt files from `dir`. If any of them cannot be read,
    /// all modes fall back to `DEFAULT_SYSTEM_PROMPT`.
    pub fn load(dir: &Path) -> Self {
        match Self::read_dir(dir) {
            Ok(table) => {
                info!("Loaded system prompts from {}", dir.display());
                table
            }
            Err(e) => {
                warn!("{e:#}; using default prompt for all modes");
                Self::default()
            }
        }
    }

    fn read_dir(dir: &Path) -> Result<Self> {
        let read = |mode: Mode| -> Result<String> {
            let path = dir.join(prompt_file_name(mode));
            std::fs::read_to_string(&path)
                .with_context(|| format!("Prompt file {} unreadable", path.display()))
        };

        Ok(Self::from_prompts(
            read(Mode::Education)?,
            read(Mode::Interview)?,
            read(Mode::Research)?,
        ))
    }

    pub fn get(&self, mode: Mode) -> &str {
        self.prompts
            .get(&mode)
            .map(String::as_str)
            .unwrap_or(DEFAULT_SYSTEM_PROMPT)
    }
}

impl Default for PromptTable {
    fn default() -> Self {
        Self::uniform(DEFAULT_SYSTEM_PROMPT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_all_prompts(dir: &Path) {
        std::fs::write(dir.join("system_prompt.txt"), "EDU").unwrap();
        std::fs::write(dir.join("system_prompt_interview.txt"), "INT").unwrap();
        std::fs::write(dir.join("system_prompt_research.txt"), "RES").unwrap();
    }

    #[test]
    fn test_load_reads_each_mode_file() {
        let dir = tempfile::tempdir().unwrap();
        write_all_prompts(dir.path());

        let table = PromptTable::load(dir.path());
        assert_eq!(table.get(Mode::Education), "EDU");
        assert_eq!(table.get(Mode::Interview), "INT");
        assert_eq!(table.get(Mode::Research), "RES");
    }

    #[test]
    fn test_load_missing_file_falls_back_for_all_modes() {
        let dir = tempfile::tempdir().unwrap();
        write_all_prompts(dir.path());
        std::fs::remove_file(dir.path().join("system_prompt_research.txt")).unwrap();

        let table = PromptTable::load(dir.path());
        for mode in Mode::ALL {
            assert_eq!(table.get(mode), DEFAULT_SYSTEM_PROMPT);
        }
    }

    #[test]
    fn test_load_nonexistent_dir_falls_back() {
        let table = PromptTable::load(Path::new("/nonexistent/prompts/dir"));
        assert_eq!(table.get(Mode::Interview), DEFAULT_SYSTEM_PROMPT);
    }

    #[test]
    fn test_from_prompts_keeps_modes_apart() {
        let table =
            PromptTable::from_prompts("a".to_string(), "b".to_string(), "c".to_string());
        assert_eq!(table.get(Mode::Education), "a");
        assert_eq!(table.get(Mode::Interview), "b");
        assert_eq!(table.get(Mode::Research), "c");
    }

    #[test]
    fn test_safety_message_is_two_lines() {
        assert_eq!(SAFETY_VIOLATION_MESSAGE.lines().count(), 2);
        assert!(SAFETY_VIOLATION_MESSAGE.starts_with("The response crossed into solving territory."));
    }
}
