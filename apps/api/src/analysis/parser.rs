//! Response Parser — turns the model's free-text reply into the fixed schema.
//!
//! Two passes:
//! 1. `split_sections`: one forward scan, one open section at a time, producing
//!    an ordered `label → body` map. A repeated label overwrites its body.
//! 2. `parse`: remaps known labels onto `AnalysisResponse` fields; everything
//!    else is kept verbatim in `additional_fields`.
//!
//! Header detection is heuristic by nature. A body line that begins with a known
//! label and a colon opens a new section, and any short colon-terminated line is
//! treated as a header. Both behaviors are relied upon by callers.

use indexmap::IndexMap;

use crate::analysis::models::AnalysisResponse;

/// Section labels across education, research and interview prompts.
/// Matched case-sensitively as `"{label}:"` at the start of a trimmed line.
pub const KNOWN_HEADERS: &[&str] = &[
    // Education
    "Mistake Type",
    "Error Pattern Tag",
    "Confidence Level",
    "Consistency Check",
    "What Went Wrong",
    "Why This Happens",
    "How To Rethink",
    "What Would Have Prevented This",
    "What Would Have Prevented",
    "Reflection Question",
    // Research
    "Reasoning Error Category",
    "Cognitive Pattern",
    "Confidence in Classification",
    "Agreement with User Analysis",
    "Research Interpretation",
    "Why This Pattern Occurs",
    "Broader Implications",
    "Related Cognitive Biases",
    // Interview
    "Interviewer Assessment",
    "Risk Signals",
];

/// Line boundaries, matching the separators of a universal-newlines split.
const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Unknown headers must be shorter than this many characters (colon included).
const MAX_FALLBACK_HEADER_CHARS: usize = 50;

/// Schema field a section label is mapped onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    MistakeType,
    ReasoningPattern,
    Explanation,
}

fn field_for(label: &str) -> Option<Field> {
    match label {
        "Mistake Type" | "Reasoning Error Category" => Some(Field::MistakeType),
        "Error Pattern Tag" | "Cognitive Pattern" => Some(Field::ReasoningPattern),
        "What Went Wrong" | "Research Interpretation" => Some(Field::Explanation),
        _ => None,
    }
}

/// Ordered header → body mapping.
pub type ParsedSections = IndexMap<String, String>;

/// A header line: its label and any inline content after the colon.
#[derive(Debug, PartialEq)]
struct Header<'a> {
    label: &'a str,
    inline: &'a str,
}

fn strip_bullet(text: &str) -> &str {
    text.strip_prefix("- ").unwrap_or(text)
}

/// `line` is already trimmed and non-empty.
fn detect_header(line: &str) -> Option<Header<'_>> {
    for &label in KNOWN_HEADERS {
        if let Some(rest) = line
            .strip_prefix(label)
            .and_then(|rest| rest.strip_prefix(':'))
        {
            return Some(Header {
                label,
                inline: strip_bullet(rest.trim()).trim(),
            });
        }
    }

    if line.ends_with(':')
        && !line.starts_with('-')
        && line.chars().count() < MAX_FALLBACK_HEADER_CHARS
    {
        return Some(Header {
            label: &line[..line.len() - 1],
            inline: "",
        });
    }

    None
}

/// Splits raw model output into labelled sections.
///
/// Blank lines are skipped. Content seen before the first header is dropped.
pub fn split_sections(raw: &str) -> ParsedSections {
    let mut sections = ParsedSections::new();
    let mut current: Option<(&str, Vec<&str>)> = None;

    // Splitting CRLF on both characters only adds blank lines, which are skipped anyway.
    for line in raw.split(LINE_BREAKS) {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        match detect_header(line) {
            Some(header) => {
                if let Some((label, content)) = current.take() {
                    close_section(&mut sections, label, &content);
                }
                let content = if header.inline.is_empty() {
                    Vec::new()
                } else {
                    vec![header.inline]
                };
                current = Some((header.label, content));
            }
            None => {
                if let Some((_, content)) = current.as_mut() {
                    content.push(strip_bullet(line));
                }
            }
        }
    }

    if let Some((label, content)) = current {
        close_section(&mut sections, label, &content);
    }

    sections
}

fn close_section(sections: &mut ParsedSections, label: &str, content: &[&str]) {
    sections.insert(label.to_string(), content.join("\n").trim().to_string());
}

/// Parses raw model output into an `AnalysisResponse`.
///
/// `raw_response` is left unset; the orchestrator attaches the untouched text.
/// With no mapped sections the response keeps its defaults and the whole raw
/// text becomes the explanation.
pub fn parse(raw: &str) -> AnalysisResponse {
    let mut response = AnalysisResponse::with_explanation(raw);
    let mut explanation_set = false;

    for (label, value) in split_sections(raw) {
        match field_for(&label) {
            Some(Field::MistakeType) => response.mistake_type = value,
            Some(Field::ReasoningPattern) => response.reasoning_pattern = value,
            Some(Field::Explanation) if explanation_set => {
                response
                    .explanation
                    .push_str(&format!("\n\n**{label}**:\n{value}"));
            }
            Some(Field::Explanation) => {
                response.explanation = value;
                explanation_set = true;
            }
            None => {
                response.additional_fields.insert(label, value);
            }
        }
    }

    response
}
