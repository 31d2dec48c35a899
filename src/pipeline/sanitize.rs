// src/pipeline/sanitize.rs
//! Cleans raw completion text before JSON parsing. Models frequently wrap
//! JSON in markdown code fences or surround it with prose.

use serde_json::Value;

/// Strip a leading code fence (with or without a language tag) and the
/// matching trailing fence. Idempotent: already-clean JSON passes through.
pub fn sanitize(raw: &str) -> String {
    let mut text = raw.trim();

    if let Some(rest) = text.strip_prefix("```") {
        // Drop the language tag up to the end of the fence line.
        let body = match rest.find('\n') {
            Some(newline) => &rest[newline + 1..],
            None => rest,
        };
        text = match body.rfind("```") {
            Some(end) => &body[..end],
            None => body,
        };
        text = text.trim();
    }

    text.to_string()
}

/// Parse sanitized text as a JSON object. Direct parse first; on failure,
/// the greedy outer brace span (first `{` to last `}`) gets one more try.
pub fn parse_object(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        if value.is_object() {
            return Some(value);
        }
    }

    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }

    serde_json::from_str::<Value>(&text[start..=end])
        .ok()
        .filter(Value::is_object)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_sanitize_plain_json_is_noop() {
        let input = r#"{"key": "value"}"#;
        assert_eq!(sanitize(input), input);
    }

    #[test]
    fn test_sanitize_strips_fence_with_language_tag() {
        let input = "```json\n{\"key\": \"value\"}\n```";
        assert_eq!(sanitize(input), r#"{"key": "value"}"#);
    }

    #[test]
    fn test_sanitize_strips_bare_fence() {
        let input = "```\n{\"a\": 1}\n```";
        assert_eq!(sanitize(input), r#"{"a": 1}"#);
    }

    #[test]
    fn test_sanitize_is_idempotent() {
        let input = "```json\n{\"key\": [1, 2]}\n```";
        let once = sanitize(input);
        let twice = sanitize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_fenced_json_parses_to_same_object() {
        let unfenced = r#"{"skills": ["Rust"], "level": "senior-level"}"#;
        let fenced = format!("```json\n{}\n```", unfenced);
        assert_eq!(
            parse_object(&sanitize(&fenced)),
            parse_object(unfenced)
        );
    }

    #[test]
    fn test_parse_object_with_surrounding_prose() {
        let input = "Here is the analysis: {\"industry\": \"Technology\"} hope it helps";
        assert_eq!(
            parse_object(input),
            Some(json!({"industry": "Technology"}))
        );
    }

    #[test]
    fn test_parse_object_rejects_garbage() {
        assert!(parse_object("no json here").is_none());
        assert!(parse_object("{ broken").is_none());
        assert!(parse_object("[1, 2, 3]").is_none());
    }
}
