//! Cleanup and parsing of raw provider output.

use std::sync::OnceLock;

use regex::Regex;

use crate::idea::ProjectIdea;

/// Outcome of parsing a provider's raw text as a project idea.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedIdea {
    Parsed(ProjectIdea),
    /// The text after sanitization, kept for logging.
    Malformed(String),
}

fn fence_pattern() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"```[A-Za-z0-9_+-]*[ \t]*\r?\n?").unwrap())
}

/// Removes markdown code fences (with or without a language tag) and
/// surrounding whitespace.
pub fn strip_code_fences(raw: &str) -> String {
    fence_pattern().replace_all(raw, "").trim().to_string()
}

/// Parses provider output into a [`ProjectIdea`].
///
/// Fences are stripped first. Ideas with blank fields count as malformed.
pub fn parse_idea(raw: &str) -> ParsedIdea {
    let cleaned = strip_code_fences(raw);
    match serde_json::from_str::<ProjectIdea>(&cleaned) {
        Ok(idea) if idea.is_complete() => ParsedIdea::Parsed(idea),
        _ => ParsedIdea::Malformed(cleaned),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::idea::Difficulty;

    const IDEA_JSON: &str = r#"{"title":"Log Lens","description":"Tail and cluster logs.","techStack":"Rust, ratatui","difficulty":"Medium"}"#;

    #[test]
    fn test_strip_json_fence() {
        let raw = format!("```json\n{}\n```", IDEA_JSON);
        assert_eq!(strip_code_fences(&raw), IDEA_JSON);
    }

    #[test]
    fn test_strip_bare_fence_and_whitespace() {
        let raw = format!("\n  ```\n{}\n```  \n", IDEA_JSON);
        assert_eq!(strip_code_fences(&raw), IDEA_JSON);
    }

    #[test]
    fn test_strip_leaves_unfenced_text_alone() {
        assert_eq!(strip_code_fences("  {\"a\": 1}  "), "{\"a\": 1}");
    }

    #[test]
    fn test_strip_fence_with_crlf() {
        let raw = format!("```JSON\r\n{}\r\n```", IDEA_JSON);
        assert_eq!(strip_code_fences(&raw), IDEA_JSON);
    }

    #[test]
    fn test_parse_fenced_idea() {
        let raw = format!("```json\n{}\n```", IDEA_JSON);
        match parse_idea(&raw) {
            ParsedIdea::Parsed(idea) => {
                assert_eq!(idea.title, "Log Lens");
                assert_eq!(idea.difficulty, Difficulty::Medium);
            }
            other => panic!("expected parsed idea, got {:?}", other),
        }
    }

    #[test]
    fn test_prose_wrapper_is_malformed() {
        let raw = format!("Sure! Here is an idea:\n{}", IDEA_JSON);
        assert!(matches!(parse_idea(&raw), ParsedIdea::Malformed(_)));
    }

    #[test]
    fn test_blank_title_is_malformed() {
        let raw = r#"{"title":" ","description":"d","techStack":"s","difficulty":"Easy"}"#;
        assert_eq!(parse_idea(raw), ParsedIdea::Malformed(raw.to_string()));
    }
}
