//! Verdict extraction from raw model text.
//!
//! The model is asked for a JSON object but may wrap it in a fenced block,
//! surround it with prose, use different key spellings, or ignore the format
//! entirely. Extraction runs an ordered chain of candidate finders, parses the
//! first candidate strictly, reads recognized fields leniently, and falls back
//! to a degraded verdict when nothing parses. It never fails.

use std::sync::OnceLock;

use regex::Regex;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::domain::models::{ExtractedVerdict, NEUTRAL_SCORE};

/// `additional_context` of a degraded verdict.
pub const PARSE_FAILURE_CONTEXT: &str = "Error parsing structured data from the response.";

const SUMMARY_PREVIEW_CHARS: usize = 100;

const SUMMARY_KEYS: &[&str] = &["summary"];
const DETECTED_KEYS: &[&str] = &["misinformationDetected", "misinformation_detected"];
const SCORE_KEYS: &[&str] = &["misinformationScore", "misinformation_score"];
const REPORT_KEYS: &[&str] = &["report"];
const CONTEXT_KEYS: &[&str] = &["additionalContext", "additional_context"];
const SOURCES_KEYS: &[&str] = &["sources"];

/// A candidate finder: returns the slice of `text` to parse, if it applies.
pub type CandidateFinder = fn(&str) -> Option<&str>;

/// Candidate finders in priority order. The last one always matches.
pub const CANDIDATE_CHAIN: [(&str, CandidateFinder); 3] = [
    ("fenced_json_block", fenced_json_block),
    ("balanced_object_span", balanced_object_span),
    ("whole_text", whole_text),
];

fn fenced_block_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?is)```json\b(.*?)```").expect("fenced block pattern is valid")
    })
}

/// Interior of the first fenced block tagged `json`.
pub fn fenced_json_block(text: &str) -> Option<&str> {
    fenced_block_pattern()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// First balanced `{ ... }` span. Braces inside JSON string literals are not
/// counted. When an opening brace never closes, the scan restarts at the
/// next `{` after it, so a stray brace in a preamble does not hide a later
/// object.
pub fn balanced_object_span(text: &str) -> Option<&str> {
    let mut from = 0;
    while let Some(offset) = text[from..].find('{') {
        let start = from + offset;
        if let Some(end) = closing_brace(&text[start..]) {
            return Some(&text[start..=start + end]);
        }
        from = start + 1;
    }
    None
}

/// Byte offset of the brace closing the `{` at the start of `text`.
fn closing_brace(text: &str) -> Option<usize> {
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text.char_indices() {
        if in_string {
            if escaped {
                escaped = false;
            } else if ch == '\\' {
                escaped = true;
            } else if ch == '"' {
                in_string = false;
            }
            continue;
        }

        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(offset);
                }
            }
            _ => {}
        }
    }

    None
}

/// The whole reply, as a last resort.
pub const fn whole_text(text: &str) -> Option<&str> {
    Some(text)
}

/// Run the candidate chain; returns the winning finder's name and its slice.
pub fn select_candidate(raw: &str) -> (&'static str, &str) {
    CANDIDATE_CHAIN
        .iter()
        .find_map(|(name, finder)| finder(raw).map(|candidate| (*name, candidate)))
        .unwrap_or(("whole_text", raw))
}

/// Extract a verdict from raw model text.
pub fn extract_verdict(raw: &str) -> ExtractedVerdict {
    let (strategy, candidate) = select_candidate(raw);
    let candidate = candidate.trim();

    match serde_json::from_str::<Value>(candidate) {
        Ok(Value::Object(map)) => {
            debug!(strategy, keys = map.len(), "parsed structured verdict");
            read_verdict(&map)
        }
        Ok(other) => {
            warn!(
                strategy,
                kind = json_kind(&other),
                "model reply is valid JSON but not an object; using degraded verdict"
            );
            degraded_verdict(raw)
        }
        Err(e) => {
            warn!(strategy, error = %e, "failed to parse model reply; using degraded verdict");
            degraded_verdict(raw)
        }
    }
}

/// Fallback verdict for replies that could not be parsed.
pub fn degraded_verdict(raw: &str) -> ExtractedVerdict {
    ExtractedVerdict {
        summary: Some(preview(raw, SUMMARY_PREVIEW_CHARS)),
        misinformation_detected: None,
        misinformation_score: Some(NEUTRAL_SCORE),
        report: Some(raw.to_string()),
        additional_context: Some(PARSE_FAILURE_CONTEXT.to_string()),
        sources: Some(Vec::new()),
        degraded: true,
    }
}

fn read_verdict(map: &Map<String, Value>) -> ExtractedVerdict {
    ExtractedVerdict {
        summary: lookup(map, SUMMARY_KEYS).and_then(read_text),
        misinformation_detected: lookup(map, DETECTED_KEYS).and_then(read_flag),
        misinformation_score: lookup(map, SCORE_KEYS).and_then(read_score),
        report: lookup(map, REPORT_KEYS).and_then(read_text),
        additional_context: lookup(map, CONTEXT_KEYS).and_then(read_text),
        sources: lookup(map, SOURCES_KEYS).and_then(read_sources),
        degraded: false,
    }
}

/// First non-null value among the accepted spellings of a key.
fn lookup<'a>(map: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| map.get(*key))
        .find(|value| !value.is_null())
}

fn read_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn read_flag(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(b) => Some(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

// Out-of-range scores pass through untouched.
fn read_score(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
        _ => None,
    }
}

fn read_sources(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::Array(items) => Some(items.iter().filter_map(read_source_entry).collect()),
        Value::String(s) => Some(vec![s.clone()]),
        _ => None,
    }
}

fn read_source_entry(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(obj) => obj
            .get("url")
            .or_else(|| obj.get("uri"))
            .and_then(Value::as_str)
            .map(str::to_string),
        _ => None,
    }
}

fn preview(text: &str, max_chars: usize) -> String {
    let mut chars = text.chars();
    let head: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{head}...")
    } else {
        head
    }
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fenced_block_wins_over_braces() {
        let raw = "Note {not json}\n```json\n{\"summary\": \"fenced\"}\n```\n";
        let (strategy, candidate) = select_candidate(raw);
        assert_eq!(strategy, "fenced_json_block");
        assert_eq!(candidate.trim(), "{\"summary\": \"fenced\"}");
    }

    #[test]
    fn test_fenced_block_tag_is_case_insensitive() {
        let raw = "```JSON\n{\"summary\": \"upper\"}\n```";
        assert_eq!(fenced_json_block(raw).map(str::trim), Some("{\"summary\": \"upper\"}"));
    }

    #[test]
    fn test_untagged_fence_is_not_a_json_block() {
        assert_eq!(fenced_json_block("```\n{\"a\": 1}\n```"), None);
        assert_eq!(fenced_json_block("```jsonc\n{\"a\": 1}\n```"), None);
    }

    #[test]
    fn test_unterminated_fence_falls_through() {
        let raw = "```json\n{\"summary\": \"open\"}";
        let (strategy, candidate) = select_candidate(raw);
        assert_eq!(strategy, "balanced_object_span");
        assert_eq!(candidate, "{\"summary\": \"open\"}");
    }

    #[test]
    fn test_balanced_span_handles_nesting_and_strings() {
        let raw = r#"pre {"a": {"b": "}"}, "c": "\"{"} post }"#;
        assert_eq!(
            balanced_object_span(raw),
            Some(r#"{"a": {"b": "}"}, "c": "\"{"}"#)
        );
    }

    #[test]
    fn test_balanced_span_unclosed() {
        assert_eq!(balanced_object_span("start { never closed"), None);
        assert_eq!(balanced_object_span("no braces here"), None);
    }

    #[test]
    fn test_stray_open_brace_before_object() {
        let raw = r#"Scale {0 to 10. Verdict: {"summary": "ok", "misinformationScore": 2}"#;
        assert_eq!(
            balanced_object_span(raw),
            Some(r#"{"summary": "ok", "misinformationScore": 2}"#)
        );

        let verdict = extract_verdict(raw);
        assert!(!verdict.degraded);
        assert_eq!(verdict.summary.as_deref(), Some("ok"));
        assert_eq!(verdict.misinformation_score, Some(2.0));
    }

    #[test]
    fn test_whole_text_is_last_resort() {
        assert_eq!(select_candidate("plain prose"), ("whole_text", "plain prose"));
        assert_eq!(select_candidate(""), ("whole_text", ""));
    }

    #[test]
    fn test_preamble_and_trailing_text() {
        let raw = r#"Some preamble text {"summary":"ok","misinformationScore":3} trailing"#;
        let verdict = extract_verdict(raw);
        assert!(!verdict.degraded);
        assert_eq!(verdict.summary.as_deref(), Some("ok"));
        assert_eq!(verdict.misinformation_score, Some(3.0));
        assert_eq!(verdict.misinformation_detected, None);
        assert_eq!(verdict.report, None);
        assert_eq!(verdict.additional_context, None);
        assert_eq!(verdict.sources, None);
    }

    #[test]
    fn test_fenced_score_is_not_clamped() {
        let raw = "Here you go:\n```json\n{\"misinformationScore\": 7}\n```";
        assert_eq!(extract_verdict(raw).misinformation_score, Some(7.0));

        let raw = "```json\n{\"misinformation_score\": 14.5}\n```";
        assert_eq!(extract_verdict(raw).misinformation_score, Some(14.5));
    }

    #[test]
    fn test_snake_case_keys_are_accepted() {
        let raw = r#"{
            "summary": "Claims about vaccines",
            "misinformation_detected": true,
            "misinformation_score": 8,
            "report": "Contradicted by WHO data",
            "additional_context": "Ongoing debate",
            "sources": ["https://who.int", "https://cdc.gov"]
        }"#;
        let verdict = extract_verdict(raw);
        assert_eq!(verdict.misinformation_detected, Some(true));
        assert_eq!(verdict.misinformation_score, Some(8.0));
        assert_eq!(verdict.additional_context.as_deref(), Some("Ongoing debate"));
        assert_eq!(
            verdict.sources,
            Some(vec!["https://who.int".to_string(), "https://cdc.gov".to_string()])
        );
    }

    #[test]
    fn test_lenient_field_types() {
        let raw = r#"{
            "misinformationDetected": "FALSE",
            "misinformationScore": " 2.5 ",
            "summary": 42,
            "report": ["not", "text"],
            "sources": [{"url": "https://a.example"}, 5, "https://b.example", {"uri": "https://c.example"}]
        }"#;
        let verdict = extract_verdict(raw);
        assert_eq!(verdict.misinformation_detected, Some(false));
        assert_eq!(verdict.misinformation_score, Some(2.5));
        assert_eq!(verdict.summary.as_deref(), Some("42"));
        assert_eq!(verdict.report, None);
        assert_eq!(
            verdict.sources,
            Some(vec![
                "https://a.example".to_string(),
                "https://b.example".to_string(),
                "https://c.example".to_string(),
            ])
        );
    }

    #[test]
    fn test_unparseable_score_is_absent() {
        let verdict = extract_verdict(r#"{"misinformationScore": "high"}"#);
        assert_eq!(verdict.misinformation_score, None);
        assert!(!verdict.degraded);
    }

    #[test]
    fn test_null_camel_key_falls_back_to_snake_key() {
        let verdict = extract_verdict(r#"{"misinformationScore": null, "misinformation_score": 1}"#);
        assert_eq!(verdict.misinformation_score, Some(1.0));
    }

    #[test]
    fn test_empty_reply_degrades() {
        let verdict = extract_verdict("");
        assert!(verdict.degraded);
        assert_eq!(verdict.summary.as_deref(), Some(""));
        assert_eq!(verdict.misinformation_score, Some(NEUTRAL_SCORE));
        assert_eq!(verdict.misinformation_detected, None);
        assert_eq!(verdict.sources, Some(vec![]));
        assert_eq!(verdict.additional_context.as_deref(), Some(PARSE_FAILURE_CONTEXT));
    }

    #[test]
    fn test_malformed_json_degrades_with_full_report() {
        let raw = "```json\n{\"summary\": \"cut off\", \"misinformationScore\": \n```";
        let verdict = extract_verdict(raw);
        assert!(verdict.degraded);
        assert_eq!(verdict.report.as_deref(), Some(raw));
    }

    #[test]
    fn test_non_object_json_degrades() {
        assert!(extract_verdict("[1, 2, 3]").degraded);
        assert!(extract_verdict("42").degraded);
        assert!(extract_verdict("\"just a string\"").degraded);
    }

    #[test]
    fn test_degraded_summary_is_truncated_by_characters() {
        let raw = "é".repeat(150);
        let verdict = extract_verdict(&raw);
        let summary = verdict.summary.unwrap();
        assert!(summary.ends_with("..."));
        assert_eq!(summary.chars().count(), 103);

        let short = "a".repeat(100);
        assert_eq!(extract_verdict(&short).summary.as_deref(), Some(short.as_str()));
    }
}
