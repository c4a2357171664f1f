//! Builds the full prompt handed to the generator.

use crate::analysis::cleaner::clean;
use crate::analysis::prompts::ANALYZE_INSTRUCTION;

/// Formats the cleaned question/answer block followed by the analysis instruction.
pub fn format_user_section(problem: &str, reasoning: &str) -> String {
    format!(
        "\nQuestion:\n{}\n\nUser Answer:\n{}\n\n{ANALYZE_INSTRUCTION}\n",
        clean(problem),
        clean(reasoning)
    )
}

/// `system_prompt`, a blank line, then the user section.
pub fn compose(system_prompt: &str, problem: &str, reasoning: &str) -> String {
    format!(
        "{system_prompt}\n\n{}",
        format_user_section(problem, reasoning)
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_exact_layout() {
        let prompt = compose("SYSTEM", "2+2", "It is 5");
        assert_eq!(
            prompt,
            "SYSTEM\n\n\nQuestion:\n2 plus 2\n\nUser Answer:\nIt is 5\n\n\
             Analyze the reasoning mistake without solving or calculating.\n"
        );
    }

    #[test]
    fn test_compose_cleans_both_fields() {
        let prompt = compose("S", "x = 3*4", "x = 7");
        assert!(prompt.contains("x  equals  3 times 4"));
        assert!(prompt.contains("User Answer:\nx  equals  7"));
        assert!(!prompt.contains('='));
    }

    #[test]
    fn test_compose_is_deterministic() {
        assert_eq!(compose("S", "p", "r"), compose("S", "p", "r"));
    }

    #[test]
    fn test_user_text_with_placeholder_is_not_expanded() {
        let prompt = compose("S", "what is {answer}?", "my {problem}");
        assert!(prompt.contains("Question:\nwhat is {answer}?"));
        assert!(prompt.contains("User Answer:\nmy {problem}"));
    }

    #[test]
    fn test_compose_empty_fields() {
        let prompt = compose("S", "", "");
        assert!(prompt.contains("Question:\n\n\nUser Answer:\n\n\nAnalyze"));
    }
}
