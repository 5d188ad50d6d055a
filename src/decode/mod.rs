//! Response decoder module
//!
//! # Overview
//!
//! LearnUpon answers with a JSON object holding the page's records under a
//! resource-named key (`{"courses": [...]}`). The decoder parses the body and
//! pulls the record array out at a configured JSON path.

mod decoders;
mod types;

pub use decoders::JsonDecoder;
pub use types::RecordDecoder;
