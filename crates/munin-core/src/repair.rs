//! Lenient structured-data repair for generator responses.
//!
//! Generators wrap JSON in prose, markdown fences, comments, trailing commas,
//! control characters, and raw newlines inside string values. This module
//! recovers a parseable literal from that noise instead of failing the stage.
//! Each pass is deliberately narrow; together they cover the malformation
//! classes seen in practice.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::error::RepairError;

static LINE_COMMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)//[^\n]*$").expect("line comment regex"));
static BLOCK_COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)/\*.*?\*/").expect("block comment regex"));
static TRAILING_COMMA: Lazy<Regex> =
    Lazy::new(|| Regex::new(r",(\s*[}\]])").expect("trailing comma regex"));
static STRING_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#""[^"]*""#).expect("string literal regex"));

/// Recover a JSON array from a noisy response. Returns the parsed elements;
/// non-object entries are the caller's concern.
pub fn repair_json_array(raw: &str) -> Result<Vec<Value>, RepairError> {
    let text = strip_fences(raw);
    let text = isolate(&text, '[', ']').ok_or(RepairError::NoArray)?;
    let text = scrub(&text);
    match serde_json::from_str::<Value>(&text)? {
        Value::Array(items) => Ok(items),
        other => Ok(vec![other]),
    }
}

/// Recover a single JSON object from a noisy response.
pub fn repair_json_object(raw: &str) -> Result<Value, RepairError> {
    let text = strip_fences(raw);
    let text = isolate(&text, '{', '}').ok_or(RepairError::NoObject)?;
    let text = scrub(&text);
    Ok(serde_json::from_str(&text)?)
}

/// Drop surrounding prose and markdown fences, keeping the fenced body.
fn strip_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    if !trimmed.contains("```") {
        return trimmed.to_string();
    }
    let parts: Vec<&str> = trimmed.split("```").collect();
    if parts.len() < 2 {
        return trimmed.to_string();
    }
    let mut body = parts[1].trim_start();
    if let Some(rest) = body.strip_prefix("json") {
        body = rest;
    }
    body.trim().to_string()
}

/// Isolate the outermost `open..close` substring.
fn isolate(text: &str, open: char, close: char) -> Option<String> {
    let start = text.find(open)?;
    let end = text.rfind(close)?;
    if end < start {
        return None;
    }
    Some(text[start..=end].to_string())
}

/// Comment removal, in-string newline escaping, control-character removal,
/// trailing-comma repair — in that order, so string content survives.
fn scrub(text: &str) -> String {
    let text = LINE_COMMENT.replace_all(text, "");
    let text = BLOCK_COMMENT.replace_all(&text, "");
    let text = escape_newlines_in_strings(&text);
    let text: String = text
        .chars()
        .map(|c| if is_stray_control(c) { ' ' } else { c })
        .collect();
    TRAILING_COMMA.replace_all(&text, "$1").trim().to_string()
}

fn is_stray_control(c: char) -> bool {
    matches!(c, '\u{00}'..='\u{08}' | '\u{0B}' | '\u{0C}' | '\u{0E}'..='\u{1F}' | '\u{7F}'..='\u{9F}')
}

/// Generators frequently emit real newlines/tabs inside string values, which
/// strict JSON rejects. Escape them in place.
fn escape_newlines_in_strings(text: &str) -> String {
    STRING_LITERAL
        .replace_all(text, |caps: &regex::Captures<'_>| {
            caps[0]
                .replace('\n', "\\n")
                .replace('\r', "\\r")
                .replace('\t', "\\t")
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_array_parses() {
        let items = repair_json_array(r#"[{"a": 1}, {"a": 2}]"#).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn markdown_fence_with_trailing_comma() {
        let raw = "```json\n[{\"fact_type\":\"metric\",\"content\":\"$3.5M raised\",\"source_quote\":\"we raised $3.5M\",},]\n```";
        let items = repair_json_array(raw).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0]["content"], "$3.5M raised");
    }

    #[test]
    fn surrounding_prose_is_stripped() {
        let raw = "Sure! Here is the array you asked for:\n[{\"a\": 1}]\nLet me know if you need more.";
        let items = repair_json_array(raw).unwrap();
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn comments_are_removed() {
        let raw = "[\n  {\"a\": 1}, // first item\n  /* second\n     item */ {\"a\": 2}\n]";
        let items = repair_json_array(raw).unwrap();
        assert_eq!(items.len(), 2);
    }

    #[test]
    fn control_characters_are_removed() {
        let raw = "[{\"a\": \"x\u{0007}y\"}]";
        let items = repair_json_array(raw).unwrap();
        assert_eq!(items[0]["a"], "x y");
    }

    #[test]
    fn unescaped_newlines_in_object_strings() {
        let raw = "{\"subject\": \"Follow-Up\", \"body\": \"Line one\nLine two\"}";
        let obj = repair_json_object(raw).unwrap();
        assert_eq!(obj["body"], "Line one\nLine two");
    }

    #[test]
    fn empty_array_is_fine() {
        assert!(repair_json_array("[]").unwrap().is_empty());
    }

    #[test]
    fn missing_array_is_an_error() {
        assert!(matches!(
            repair_json_array("no structured data here"),
            Err(RepairError::NoArray)
        ));
    }

    #[test]
    fn hopeless_garbage_is_an_error() {
        assert!(repair_json_array("[{{{{ nonsense").is_err());
    }
}
