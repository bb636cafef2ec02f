//! Total readers over loosely-typed JSON.
//!
//! Backend payloads wrap lists inconsistently and spell the same field in
//! several ways. The helpers here never fail: every reader takes an ordered
//! list of dot-separated paths and a fallback, and returns the fallback when
//! no path yields a usable value.
//!
//! # Example
//!
//! ```
//! use barbershop_core::json::{extract_record_list, read_number, read_string};
//! use serde_json::json;
//!
//! let payload = json!({ "items": [{ "nome": " Zé ", "preço": "35,5" }, 42] });
//! let records = extract_record_list(&payload);
//! assert_eq!(records.len(), 1);
//! assert_eq!(read_string(records[0], &["name", "nome"], ""), "Zé");
//! assert_eq!(read_number(records[0], &["price", "preço"], 0.0), 35.5);
//! ```

use serde_json::{Map, Number, Value};
use tracing::trace;

/// A JSON object as returned by the backend.
pub type Record = Map<String, Value>;

/// Keys under which list endpoints nest their payload, in priority order.
pub const WRAPPER_KEYS: &[&str] = &["items", "results", "content"];

const AFFIRMATIVE: &[&str] = &["true", "1", "available", "disponivel"];
const NEGATIVE: &[&str] = &["false", "0", "unavailable", "indisponivel", "blocked"];

/// Largest integer an `f64` represents exactly.
const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Extracts the list of records from a response body.
///
/// Arrays are used directly. Objects are searched for a list under
/// [`WRAPPER_KEYS`] first, then under any of their own keys in map order.
/// Non-object elements are dropped; anything else yields an empty list.
pub fn extract_record_list(value: &Value) -> Vec<&Record> {
    let items = match value {
        Value::Array(items) => items.as_slice(),
        Value::Object(map) => match find_wrapped_list(map) {
            Some(items) => items,
            None => {
                trace!("response object holds no list");
                return Vec::new();
            }
        },
        _ => return Vec::new(),
    };

    let records: Vec<&Record> = items.iter().filter_map(Value::as_object).collect();
    if records.len() != items.len() {
        trace!(
            dropped = items.len() - records.len(),
            "dropped non-object list elements"
        );
    }
    records
}

fn find_wrapped_list(map: &Record) -> Option<&[Value]> {
    WRAPPER_KEYS
        .iter()
        .find_map(|key| map.get(*key).and_then(Value::as_array))
        .or_else(|| map.values().find_map(Value::as_array))
        .map(Vec::as_slice)
}

/// Returns the first present, non-null value reached by any of `paths`.
///
/// Paths are tried in order and the first hit wins, even if a later path
/// holds a "better" value.
pub fn read_from_paths<'a>(source: &'a Record, paths: &[&str]) -> Option<&'a Value> {
    paths.iter().find_map(|path| walk(source, path))
}

fn walk<'a>(source: &'a Record, path: &str) -> Option<&'a Value> {
    let mut segments = path.split('.');
    let mut current = source.get(segments.next()?)?;
    for segment in segments {
        current = current.as_object()?.get(segment)?;
    }
    (!current.is_null()).then_some(current)
}

/// Reads a text field: strings are trimmed, numbers are stringified.
pub fn read_string(source: &Record, paths: &[&str], fallback: &str) -> String {
    read_from_paths(source, paths)
        .and_then(text_of)
        .unwrap_or_else(|| {
            trace!(?paths, fallback, "no text value, using fallback");
            fallback.to_string()
        })
}

/// Reads a text field, treating missing and blank values as absent.
pub fn read_optional_string(source: &Record, paths: &[&str]) -> Option<String> {
    read_from_paths(source, paths)
        .and_then(text_of)
        .filter(|text| !text.is_empty())
}

/// Reads a numeric field.
///
/// Text is parsed with a comma accepted as the decimal separator, so `"1,5"`
/// reads as `1.5`. Unparseable and non-finite values yield `fallback`.
pub fn read_number(source: &Record, paths: &[&str], fallback: f64) -> f64 {
    let parsed = match read_from_paths(source, paths) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(text)) => text.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };

    match parsed {
        Some(value) if value.is_finite() => value,
        _ => {
            trace!(?paths, fallback, "no numeric value, using fallback");
            fallback
        }
    }
}

/// Reads an availability-style flag.
///
/// Accepts booleans, numbers (zero is false) and a small case-insensitive
/// vocabulary of English and Portuguese words.
pub fn read_boolean(source: &Record, paths: &[&str], fallback: bool) -> bool {
    match read_from_paths(source, paths) {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::Number(n)) => n.as_f64().map_or(fallback, |value| value != 0.0),
        Some(Value::String(text)) => {
            let word = text.trim().to_lowercase();
            if AFFIRMATIVE.contains(&word.as_str()) {
                true
            } else if NEGATIVE.contains(&word.as_str()) {
                false
            } else {
                trace!(?paths, value = %text, "unrecognized flag, using fallback");
                fallback
            }
        }
        _ => fallback,
    }
}

/// Reads a list of short texts.
///
/// Arrays keep their text and numeric elements; a single string is split on
/// commas. Blank entries are dropped and an empty result is absent.
pub fn read_string_list(source: &Record, paths: &[&str]) -> Option<Vec<String>> {
    let entries: Vec<String> = match read_from_paths(source, paths)? {
        Value::Array(items) => items.iter().filter_map(text_of).collect(),
        Value::String(text) => text.split(',').map(|part| part.trim().to_string()).collect(),
        _ => return None,
    };

    let entries: Vec<String> = entries.into_iter().filter(|e| !e.is_empty()).collect();
    (!entries.is_empty()).then_some(entries)
}

fn text_of(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.trim().to_string()),
        Value::Number(n) => Some(number_text(n)),
        _ => None,
    }
}

/// Integral floats print without a fractional part so `7.0` and `7` agree.
fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(value) if n.is_f64() && value.fract() == 0.0 && value.abs() < MAX_SAFE_INTEGER => {
            format!("{}", value as i64)
        }
        _ => n.to_string(),
    }
}
