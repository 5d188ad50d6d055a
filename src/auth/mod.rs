//! Authentication module
//!
//! LearnUpon authenticates API calls with HTTP Basic credentials. The
//! `Authenticator` derives the `Authorization` header once from static
//! configuration and is shared read-only by every stream.

mod authenticator;
mod types;

pub use authenticator::Authenticator;
pub use types::AuthConfig;
