//! Lexical guard against generations that disclose a solved answer.
//!
//! The check is a substring scan, not semantic analysis. A solved answer phrased
//! without a trigger phrase passes, and legitimate prose containing "equals" is
//! blocked. Both are accepted tradeoffs and are pinned by the tests below.

use tracing::info;

/// Lower-case phrases that mark an attempt to hand over the answer.
const FORBIDDEN_PATTERNS: &[&str] = &[
    "the answer is",
    "the correct answer is",
    "equals",
    " = ",
    "solution is",
    "final answer",
];

/// Vocabulary suggesting the text is about thinking rather than solving.
/// Informational only: it never changes the `is_safe` verdict.
const REASONING_INDICATORS: &[&str] = &[
    "assumed",
    "intuition",
    "verification",
    "reasoning",
    "thinking",
    "confidence",
    "mistake",
    "error",
    "overconfidence",
];

/// Outcome of validating a raw generation before parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputVerdict {
    /// Empty or whitespace-only.
    Empty,
    /// Matched a forbidden pattern.
    Unsafe,
    Accepted,
}

/// `false` for empty text or any forbidden pattern; `true` otherwise.
pub fn is_safe(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    forbidden_pattern(text).is_none()
}

/// The first forbidden pattern found in `text`, case-insensitively.
pub fn forbidden_pattern(text: &str) -> Option<&'static str> {
    let lowered = text.to_lowercase();
    FORBIDDEN_PATTERNS
        .iter()
        .copied()
        .find(|p| lowered.contains(p))
}

pub fn mentions_reasoning(text: &str) -> bool {
    let lowered = text.to_lowercase();
    REASONING_INDICATORS.iter().any(|w| lowered.contains(w))
}

/// Classifies a raw generation. Emptiness wins over the safety check.
pub fn validate_output(text: &str) -> OutputVerdict {
    if text.trim().is_empty() {
        return OutputVerdict::Empty;
    }
    if !is_safe(text) {
        if let Some(pattern) = forbidden_pattern(text) {
            info!("Generation blocked by safety filter (matched {pattern:?})");
        }
        return OutputVerdict::Unsafe;
    }
    OutputVerdict::Accepted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_is_unsafe() {
        assert!(!is_safe(""));
    }

    #[test]
    fn test_each_forbidden_pattern_blocks() {
        let samples = [
            "So the answer is clear.",
            "The correct answer is 12.",
            "x equals four",
            "x = 4",
            "The solution is to divide.",
            "Final answer: 7",
        ];
        for sample in samples {
            assert!(!is_safe(sample), "should block: {sample}");
        }
    }

    #[test]
    fn test_match_is_case_insensitive() {
        assert!(!is_safe("THE ANSWER IS 42"));
        assert!(!is_safe("Mistake Type: Slip\nThe answer is 42"));
    }

    #[test]
    fn test_plain_reasoning_feedback_is_safe() {
        assert!(is_safe(
            "Mistake Type: Percentage misinterpretation\nWhat Went Wrong: treated 50% as absolute"
        ));
    }

    #[test]
    fn test_text_without_reasoning_vocabulary_is_still_safe() {
        let text = "Look again at how the speed changes.";
        assert!(!mentions_reasoning(text));
        assert!(is_safe(text));
    }

    #[test]
    fn test_reasoning_vocabulary_does_not_override_forbidden_pattern() {
        let text = "Your reasoning shows overconfidence; the answer is 90.";
        assert!(mentions_reasoning(text));
        assert!(!is_safe(text));
    }

    // Accepted tradeoff: a disclosed result without trigger phrases passes.
    #[test]
    fn test_false_negative_solved_answer_without_trigger_phrase() {
        assert!(is_safe("You should have gotten 1.5 hours, not 1.1 hours."));
    }

    // Accepted tradeoff: legitimate discussion using "equals" is blocked.
    #[test]
    fn test_false_positive_legitimate_equals_is_blocked() {
        assert!(!is_safe(
            "What Went Wrong: you assumed 'faster' equals adding a fixed amount"
        ));
    }

    #[test]
    fn test_bare_equals_sign_without_spaces_is_not_a_pattern() {
        assert!(is_safe("Pattern tag: a=b confusion"));
    }

    #[test]
    fn test_validate_output_verdicts() {
        assert_eq!(validate_output(""), OutputVerdict::Empty);
        assert_eq!(validate_output("  \n\t "), OutputVerdict::Empty);
        assert_eq!(validate_output("The answer is 42"), OutputVerdict::Unsafe);
        assert_eq!(
            validate_output("Mistake Type: Sign Error"),
            OutputVerdict::Accepted
        );
    }
}
