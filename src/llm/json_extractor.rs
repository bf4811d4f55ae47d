//! Recovery of JSON objects from free-form generator output
//!
//! Generator responses are supposed to be JSON but may arrive wrapped in
//! markdown fences, encoded as a string literal (sometimes more than once),
//! truncated mid-object or sprinkled with raw newlines and trailing commas.
//! Extraction never fails loudly: it returns `None` when nothing usable
//! can be recovered.

use log::{debug, warn};
use regex::Regex;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::OnceLock;

/// Nesting limit for string-literal and fence unwrapping
const MAX_DEPTH: usize = 8;

fn fence_regex() -> &'static Regex {
    static FENCE: OnceLock<Regex> = OnceLock::new();
    FENCE.get_or_init(|| Regex::new(r"(?s)```(?:json)?\s*(.*?)\s*```").expect("Invalid fence regex"))
}

/// Recover a JSON object (or array) from generator text
pub fn extract_json(text: &str) -> Option<Value> {
    let recovered = extract_at_depth(text, 0);
    if recovered.is_none() {
        warn!("Could not recover JSON from generator output ({} chars)", text.len());
    }
    recovered
}

/// Like [`extract_json`], for responses that are already JSON values.
/// Objects and arrays pass through unchanged; strings are searched.
pub fn extract_json_value(value: &Value) -> Option<Value> {
    match value {
        Value::Object(_) | Value::Array(_) => Some(value.clone()),
        Value::String(text) => extract_json(text),
        _ => None,
    }
}

/// Recover JSON and deserialize it into `T`
pub fn extract_json_as<T: DeserializeOwned>(text: &str) -> Option<T> {
    let value = extract_json(text)?;
    match serde_json::from_value(value) {
        Ok(parsed) => Some(parsed),
        Err(e) => {
            debug!("Recovered JSON does not match the expected shape: {}", e);
            None
        }
    }
}

fn extract_at_depth(text: &str, depth: usize) -> Option<Value> {
    if depth > MAX_DEPTH {
        return None;
    }

    let mut working = normalize(text);

    // Direct parse
    match serde_json::from_str::<Value>(&working) {
        Ok(value @ (Value::Object(_) | Value::Array(_))) => return Some(value),
        Ok(Value::String(inner)) => {
            debug!("Response is a JSON string, unwrapping");
            return extract_at_depth(&inner, depth + 1);
        }
        _ => {}
    }

    // Fenced block
    if let Some(inner) = fenced_block(&working) {
        debug!("Found fenced block ({} chars)", inner.len());
        if let Some(value) = extract_at_depth(&inner, depth + 1) {
            return Some(value);
        }
        working = inner;
    }

    let candidate = object_candidate(&working)?;
    let repaired = repair(candidate);

    parse_structured(&repaired).or_else(|| {
        debug!("Repaired candidate did not parse, stripping control characters");
        parse_structured(&strip_control_chars(&repaired))
    })
}

/// Trim and peel off triple-quote wrapping or one layer of string encoding
fn normalize(text: &str) -> String {
    let mut text = text.trim().to_string();

    if text.len() >= 6 && text.starts_with("\"\"\"") && text.ends_with("\"\"\"") {
        text = text[3..text.len() - 3].trim().to_string();
    }

    if text.len() >= 2 && text.starts_with('"') && text.ends_with('"') && text.contains('{') {
        text = match serde_json::from_str::<Value>(&text) {
            Ok(Value::String(inner)) => inner.trim().to_string(),
            Ok(_) => text,
            Err(_) => text[1..text.len() - 1].trim().to_string(),
        };
    }

    text
}

fn fenced_block(text: &str) -> Option<String> {
    fence_regex()
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
}

/// From the first `{` to the last `}`. Without a closing brace after the
/// opening one the whole tail is taken and left to the balancer.
fn object_candidate(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    match text.rfind('}') {
        Some(end) if end > start => Some(&text[start..=end]),
        _ => Some(&text[start..]),
    }
}

/// Single pass over the candidate: escapes raw line breaks and tabs inside
/// strings, drops trailing commas, then closes whatever is still open.
fn repair(candidate: &str) -> String {
    let mut out = String::with_capacity(candidate.len() + 8);
    let mut closers: Vec<char> = Vec::new();
    let mut in_string = false;
    let mut escaped = false;
    // Start of an object key that has not been followed by a colon yet
    let mut pending_key: Option<usize> = None;

    for c in candidate.chars() {
        if in_string {
            if escaped {
                escaped = false;
                out.push(c);
                continue;
            }
            match c {
                '\\' => {
                    escaped = true;
                    out.push(c);
                }
                '"' => {
                    in_string = false;
                    out.push(c);
                }
                '\n' => out.push_str("\\n"),
                '\r' => out.push_str("\\r"),
                '\t' => out.push_str("\\t"),
                _ => out.push(c),
            }
            continue;
        }

        match c {
            '"' => {
                let after = out.trim_end().chars().next_back();
                if closers.last() == Some(&'}') && matches!(after, Some('{') | Some(',')) {
                    pending_key = Some(out.len());
                }
                in_string = true;
                out.push(c);
            }
            ':' => {
                pending_key = None;
                out.push(c);
            }
            '{' => {
                closers.push('}');
                out.push(c);
            }
            '[' => {
                closers.push(']');
                out.push(c);
            }
            '}' | ']' => {
                pending_key = None;
                drop_trailing_comma(&mut out);
                if closers.last() == Some(&c) {
                    closers.pop();
                }
                out.push(c);
            }
            _ => out.push(c),
        }
    }

    if closers.is_empty() && !in_string {
        return out;
    }

    // Truncated input. A key without its value is dropped entirely.
    if let Some(start) = pending_key {
        out.truncate(start);
    } else if in_string {
        if escaped {
            out.pop();
        }
        out.push('"');
    }

    let kept = out.trim_end().len();
    out.truncate(kept);
    if out.ends_with(',') {
        out.pop();
    } else if out.ends_with(':') {
        out.push_str(" null");
    }

    while let Some(closer) = closers.pop() {
        out.push(closer);
    }

    out
}

/// Remove a comma separated from the end of `out` only by whitespace
fn drop_trailing_comma(out: &mut String) {
    let trimmed = out.trim_end();
    if trimmed.ends_with(',') {
        let comma = trimmed.len() - 1;
        out.remove(comma);
    }
}

/// Remove control characters other than newline, carriage return and tab
fn strip_control_chars(text: &str) -> String {
    text.chars()
        .filter(|c| {
            let code = *c as u32;
            let control = code <= 0x1F || (0x7F..=0x9F).contains(&code);
            !control || matches!(c, '\n' | '\r' | '\t')
        })
        .collect()
}

fn parse_structured(text: &str) -> Option<Value> {
    serde_json::from_str::<Value>(text)
        .ok()
        .filter(|v| v.is_object() || v.is_array())
}
