//! Decoder types and traits

use crate::error::Result;
use serde_json::Value;

/// Trait for decoding response bodies into records
pub trait RecordDecoder: Send + Sync {
    /// Decode the response body into a list of records
    fn decode(&self, body: &str) -> Result<Vec<Value>>;

    /// Extract records from an already parsed body
    fn extract(&self, value: &Value) -> Result<Vec<Value>>;
}
