//! Unified stream
//!
//! # Overview
//!
//! The unified stream is synthetic: it has no endpoint of its own. Each pass
//! pulls fresh records from its source streams in declaration order and
//! projects every record onto one fixed shape ([`UNIFIED_FIELDS`]), tagging it
//! with the name of the stream it came from.

mod unifier;

pub use unifier::{merge, unified_schema, Unifier, UNIFIED_FIELDS, UNIFIED_STREAM};
