//! Decoder implementations

use super::types::RecordDecoder;
use crate::error::{Error, Result};
use serde_json::Value;

// ============================================================================
// JSON Decoder
// ============================================================================

/// JSON decoder with optional record path extraction
#[derive(Debug, Clone, Default)]
pub struct JsonDecoder {
    /// JSONPath to extract records
    record_path: Option<String>,
}

impl JsonDecoder {
    /// Create a new JSON decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a JSON decoder with a record path
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            record_path: Some(path.into()),
        }
    }

    /// The configured record path, if any
    pub fn record_path(&self) -> Option<&str> {
        self.record_path.as_deref()
    }
}

impl RecordDecoder for JsonDecoder {
    fn decode(&self, body: &str) -> Result<Vec<Value>> {
        let value: Value = serde_json::from_str(body).map_err(|e| Error::Decode {
            message: format!("Failed to parse JSON: {e}"),
        })?;
        self.extract(&value)
    }

    fn extract(&self, value: &Value) -> Result<Vec<Value>> {
        let Some(path) = &self.record_path else {
            // No path - treat entire response as records
            return match value {
                Value::Array(arr) => Ok(arr.clone()),
                _ => Ok(vec![value.clone()]),
            };
        };

        if is_simple_path(path) {
            match extract_simple_path(value, path) {
                Some(Value::Array(arr)) => Ok(arr),
                Some(Value::Null) | None => Ok(vec![]),
                Some(v) => Ok(vec![v]),
            }
        } else {
            extract_with_jsonpath(value, path)
        }
    }
}

/// Whether the path only uses dotted keys and simple brackets
/// (`[*]`, `[n]`, `[a:b]`), which are walked without jsonpath-rust.
fn is_simple_path(path: &str) -> bool {
    !path.contains("..") && !path.contains('?') && !path.contains('\'') && !path.contains(',')
}

/// Walk a dotted path such as `$.learning_paths[0:]` or `data.items[*]`
fn extract_simple_path(value: &Value, path: &str) -> Option<Value> {
    let path = path.strip_prefix('$').unwrap_or(path);
    let path = path.strip_prefix('.').unwrap_or(path);
    if path.is_empty() {
        return Some(value.clone());
    }

    let mut current = value.clone();
    for part in path.split('.') {
        let (name, selector) = match part.find('[') {
            Some(pos) if part.ends_with(']') => {
                (&part[..pos], Some(&part[pos + 1..part.len() - 1]))
            }
            Some(_) => return None,
            None => (part, None),
        };

        if !name.is_empty() {
            current = current.get(name)?.clone();
        }

        if let Some(selector) = selector {
            current = apply_selector(current, selector)?;
        }
    }

    Some(current)
}

/// Apply a bracket selector to an array
fn apply_selector(current: Value, selector: &str) -> Option<Value> {
    let Value::Array(arr) = current else {
        return None;
    };

    let selector = selector.trim();
    if selector == "*" {
        return Some(Value::Array(arr));
    }

    #[allow(clippy::cast_possible_wrap)]
    let len = arr.len() as i64;
    #[allow(clippy::cast_possible_truncation)]
    let resolve = |index: i64| -> usize {
        let idx = if index < 0 { len + index } else { index };
        idx.clamp(0, len) as usize
    };

    if let Some((start, end)) = selector.split_once(':') {
        let start = parse_bound(start)?.map_or(0, resolve);
        let end = parse_bound(end)?.map_or(arr.len(), resolve);
        let slice = if start < end { arr[start..end].to_vec() } else { vec![] };
        return Some(Value::Array(slice));
    }

    let index: i64 = selector.parse().ok()?;
    if index >= len || index < -len {
        return None;
    }
    arr.into_iter().nth(resolve(index))
}

/// Parse an optional slice bound; `Some(None)` means "open"
fn parse_bound(raw: &str) -> Option<Option<i64>> {
    let raw = raw.trim();
    if raw.is_empty() {
        Some(None)
    } else {
        raw.parse().ok().map(Some)
    }
}

/// Extract records using jsonpath-rust
fn extract_with_jsonpath(value: &Value, path: &str) -> Result<Vec<Value>> {
    use jsonpath_rust::JsonPath;

    let jp = JsonPath::try_from(path)
        .map_err(|e| Error::json_path(format!("Invalid JSONPath '{path}': {e}")))?;

    match jp.find(value) {
        Value::Array(arr) => Ok(arr),
        Value::Null => Ok(vec![]),
        other => Ok(vec![other]),
    }
}
