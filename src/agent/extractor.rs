//! Completion detection for assistant turns.
//!
//! Models often wrap their final JSON object in commentary, so the detector
//! scans the whole turn and keeps the last balanced top-level `{...}` span.
//! A turn counts as final only when that span parses as a JSON object; an
//! unbalanced or unparseable candidate is simply "not final" and sends the
//! loop back to the model.

use serde_json::{Map, Value};

/// Find the last top-level `{...}` span in `text`.
///
/// Scans left to right tracking brace nesting depth; each time the depth
/// returns to zero after having opened, the span becomes the new candidate.
/// Braces that close without a matching open are ignored.
pub fn last_top_level_object(text: &str) -> Option<&str> {
    let mut depth: u32 = 0;
    let mut start = None;
    let mut last = None;

    for (i, ch) in text.char_indices() {
        match ch {
            '{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            '}' => {
                if depth > 0 {
                    depth -= 1;
                    if depth == 0 {
                        if let Some(s) = start {
                            last = Some(&text[s..=i]);
                        }
                    }
                }
            }
            _ => {}
        }
    }

    last.map(str::trim)
}

/// The single structured object that terminates a run successfully.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalAnswer {
    object: Map<String, Value>,
}

impl FinalAnswer {
    /// Try to read a final answer out of raw assistant text.
    ///
    /// Returns `None` when no balanced top-level object exists or when the
    /// candidate span does not parse as a JSON object. Top-level keys are
    /// normalized by lower-casing their first character, so a model that
    /// emits `"Toiletries"` still produces `"toiletries"`.
    pub fn parse(text: &str) -> Option<Self> {
        let span = last_top_level_object(text)?;
        let value: Value = serde_json::from_str(span).ok()?;
        match value {
            Value::Object(map) => Some(FinalAnswer {
                object: normalize_keys(map),
            }),
            _ => None,
        }
    }

    /// Look up a top-level field by (normalized) key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.object.get(key)
    }

    /// Top-level keys in their original order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.object.keys().map(|k| k.as_str())
    }

    /// Render the answer as pretty-printed JSON.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(&Value::Object(self.object.clone()))
            .unwrap_or_else(|_| "{}".to_string())
    }
}

impl std::fmt::Display for FinalAnswer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_json_string())
    }
}

/// Lower-case the first character of every top-level key.
fn normalize_keys(map: Map<String, Value>) -> Map<String, Value> {
    map.into_iter()
        .map(|(key, value)| {
            let mut chars = key.chars();
            let normalized = match chars.next() {
                Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
                None => key,
            };
            (normalized, value)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_single_object() {
        assert_eq!(last_top_level_object(r#"{"a":1}"#), Some(r#"{"a":1}"#));
    }

    #[test]
    fn skips_leading_commentary() {
        let text = "Here is your packing list:\n{\"mustHave\":[]}";
        assert_eq!(last_top_level_object(text), Some("{\"mustHave\":[]}"));
    }

    #[test]
    fn picks_last_top_level_span() {
        let text = r#"{"draft":true} some words {"final":true}"#;
        assert_eq!(last_top_level_object(text), Some(r#"{"final":true}"#));
    }

    #[test]
    fn handles_nested_objects() {
        let text = r#"{"outer":{"inner":1}}"#;
        assert_eq!(last_top_level_object(text), Some(text));
    }

    #[test]
    fn unbalanced_braces_yield_nothing() {
        assert_eq!(last_top_level_object(r#"{"a": 1"#), None);
        assert_eq!(last_top_level_object("no braces here"), None);
    }

    #[test]
    fn stray_close_brace_is_ignored() {
        assert_eq!(last_top_level_object(r#"} {"a":1}"#), Some(r#"{"a":1}"#));
    }

    #[test]
    fn extraction_is_idempotent() {
        let text = "chatter {\"a\":1} more {\"b\":2}";
        let first = last_top_level_object(text);
        let second = last_top_level_object(text);
        assert_eq!(first, second);
        assert_eq!(FinalAnswer::parse(text), FinalAnswer::parse(text));
    }

    #[test]
    fn parse_rejects_unparseable_candidate() {
        assert!(FinalAnswer::parse("{not json}").is_none());
        assert!(FinalAnswer::parse("").is_none());
    }

    #[test]
    fn parse_normalizes_key_case() {
        let answer = FinalAnswer::parse(r#"{"Toiletries":["soap"],"mustHave":[]}"#).unwrap();
        assert!(answer.get("toiletries").is_some());
        assert!(answer.get("Toiletries").is_none());
        assert!(answer.get("mustHave").is_some());
    }

    #[test]
    fn normalization_keeps_camel_case_tail() {
        let answer = FinalAnswer::parse(r#"{"MustHave":["passport"]}"#).unwrap();
        assert_eq!(answer.keys().collect::<Vec<_>>(), vec!["mustHave"]);
    }

    #[test]
    fn rendered_answer_round_trips() {
        let answer = FinalAnswer::parse(r#"{"tips":["pack light"]}"#).unwrap();
        let rendered = answer.to_json_string();
        assert_eq!(FinalAnswer::parse(&rendered).unwrap(), answer);
    }
}
