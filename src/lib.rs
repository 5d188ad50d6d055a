// Allow common clippy pedantic lints that aren't critical for this codebase
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_lossless)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::ref_option)]
#![allow(clippy::unused_self)]
#![allow(clippy::struct_excessive_bools)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::unnecessary_wraps)]
#![allow(clippy::match_same_arms)]
#![allow(clippy::match_wildcard_for_single_variants)]
#![allow(clippy::needless_pass_by_value)]
#![allow(clippy::unused_async)]

//! # tap-learnupon
//!
//! Extracts learning paths, courses and course modules from the LearnUpon
//! REST API, plus a `unified` stream that merges all three into one shape.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use futures::TryStreamExt;
//! use tap_learnupon::{Connector, LearnUponTap, StreamSelection, TapConfig};
//!
//! #[tokio::main]
//! async fn main() -> tap_learnupon::Result<()> {
//!     let config = TapConfig::new("learnupon.com", "api-user", "secret").with_domain("acme");
//!     let tap = LearnUponTap::new(&config)?;
//!
//!     let status = tap.check().await?;
//!     let catalog = tap.discover().await?;
//!
//!     let mut messages = tap.read(&StreamSelection::Default).await?;
//!     while let Some(msg) = messages.try_next().await? {
//!         // SCHEMA, then RECORD messages
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                     Connector Interface                         │
//! │  spec() → ConnectorSpec  check() → Status  discover() → Catalog │
//! │  read(selection) → Stream<Message>                              │
//! └─────────────────────────────────────────────────────────────────┘
//!                                │
//!              ┌─────────────────┴─────────────────┐
//!              │   Unifier (learning_paths,        │
//!              │   courses, modules → unified)     │
//!              └─────────────────┬─────────────────┘
//!                                │
//! ┌──────────┬───────────┬───────┴───────┬───────────┬─────────────┐
//! │   Auth   │   HTTP    │   Paginate    │ Partition │   Decode    │
//! ├──────────┼───────────┼───────────────┼───────────┼─────────────┤
//! │ Basic    │ GET       │ LU-Has-Next-  │ Parent    │ JSON path   │
//! │          │ Retry     │ Page headers  │ context   │ Schema      │
//! │          │ Throttle  │               │           │ conformance │
//! └──────────┴───────────┴───────────────┴───────────┴─────────────┘
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types for the tap
pub mod error;

/// Common types and type aliases
pub mod types;

/// Tap configuration
pub mod config;

/// Authentication implementations
pub mod auth;

/// HTTP client with retry and rate limiting
pub mod http;

/// Header-driven pagination
pub mod pagination;

/// Path template interpolation
pub mod template;

/// Request parameters and paths
pub mod request;

/// Parent-child context propagation
pub mod partition;

/// Response decoders
pub mod decode;

/// Declared schemas and record conformance
pub mod schema;

/// REST streams and the stream registry
pub mod streams;

/// Unified stream
pub mod unify;

/// Connector trait and the LearnUpon tap
pub mod connector;

/// Message output engine
pub mod engine;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::TapConfig;
pub use connector::{Catalog, Connector, LearnUponTap, StreamSelection};
pub use error::{Error, Result};
pub use types::*;

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");
