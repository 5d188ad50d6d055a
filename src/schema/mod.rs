//! Declared stream schemas
//!
//! Every stream carries an ordered list of typed properties. The schema is
//! published in discovery as JSON Schema and is used to conform raw API
//! objects into [`Record`](crate::types::Record)s.
//!
//! # Conformance
//!
//! - Undeclared fields are dropped, missing fields stay absent
//! - Numeric strings become integers/numbers, `"true"`/`"false"` and 0/1 booleans
//! - Date-time strings are normalised to RFC 3339 UTC
//! - Values that cannot be coerced become null

mod coerce;
mod types;

pub use coerce::{coerce_value, normalize_datetime};
pub use types::{JsonType, Property, PropertyType, Schema};
