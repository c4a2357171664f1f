use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MISTAKE_TYPE: &str = "Unknown";
pub const DEFAULT_REASONING_PATTERN: &str = "Analysis failed";

/// Instructional framing given to the generator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Education,
    Interview,
    Research,
}

impl Mode {
    pub const ALL: [Mode; 3] = [Mode::Education, Mode::Interview, Mode::Research];

    /// Case-insensitive lookup. Anything unrecognized is `Education`.
    pub fn resolve(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "interview" => Mode::Interview,
            "research" => Mode::Research,
            _ => Mode::Education,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Education => "education",
            Mode::Interview => "interview",
            Mode::Research => "research",
        }
    }
}

/// Body of `POST /analyze`. `mode` stays a free string so unknown values
/// fall back instead of failing deserialization.
#[derive(Debug, Clone, Deserialize)]
pub struct AnalysisRequest {
    pub problem: String,
    pub reasoning: String,
    #[serde(default = "default_mode")]
    pub mode: String,
}

fn default_mode() -> String {
    Mode::Education.as_str().to_string()
}

impl AnalysisRequest {
    pub fn mode(&self) -> Mode {
        Mode::resolve(&self.mode)
    }
}

/// Structured diagnosis returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResponse {
    pub mistake_type: String,
    pub reasoning_pattern: String,
    pub explanation: String,
    pub raw_response: Option<String>,
    pub additional_fields: IndexMap<String, String>,
}

impl AnalysisResponse {
    /// Neutral classification fields with the given explanation.
    pub fn with_explanation(explanation: impl Into<String>) -> Self {
        Self {
            mistake_type: DEFAULT_MISTAKE_TYPE.to_string(),
            reasoning_pattern: DEFAULT_REASONING_PATTERN.to_string(),
            explanation: explanation.into(),
            raw_response: None,
            additional_fields: IndexMap::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_resolve_is_case_insensitive() {
        assert_eq!(Mode::resolve("Research"), Mode::Research);
        assert_eq!(Mode::resolve("INTERVIEW"), Mode::Interview);
        assert_eq!(Mode::resolve("education"), Mode::Education);
    }

    #[test]
    fn test_mode_resolve_unknown_falls_back_to_education() {
        assert_eq!(Mode::resolve("tutoring"), Mode::Education);
        assert_eq!(Mode::resolve(""), Mode::Education);
    }

    #[test]
    fn test_request_without_mode_defaults_to_education() {
        let req: AnalysisRequest =
            serde_json::from_str(r#"{"problem": "2+2", "reasoning": "5"}"#).unwrap();
        assert_eq!(req.mode, "education");
        assert_eq!(req.mode(), Mode::Education);
    }

    #[test]
    fn test_request_with_unknown_mode_still_deserializes() {
        let req: AnalysisRequest =
            serde_json::from_str(r#"{"problem": "p", "reasoning": "r", "mode": "debate"}"#)
                .unwrap();
        assert_eq!(req.mode(), Mode::Education);
    }

    #[test]
    fn test_response_serializes_schema_fields() {
        let mut resp = AnalysisResponse::with_explanation("why");
        resp.raw_response = Some("raw".to_string());
        resp.additional_fields
            .insert("Confidence Level".to_string(), "High".to_string());

        let json = serde_json::to_value(&resp).unwrap();
        assert_eq!(json["mistake_type"], "Unknown");
        assert_eq!(json["reasoning_pattern"], "Analysis failed");
        assert_eq!(json["explanation"], "why");
        assert_eq!(json["raw_response"], "raw");
        assert_eq!(json["additional_fields"]["Confidence Level"], "High");
    }
}
