//! Pagination types and traits

use reqwest::header::HeaderMap;

pub use crate::types::PageToken;

/// Core trait for pagination strategies
pub trait Paginator: Send + Sync {
    /// Compute the token for the next page from the response just received.
    ///
    /// `previous` is the token that produced that response (`None` for the
    /// first page). Returns `None` when there are no further pages. Must not
    /// fail: malformed pagination data ends the loop instead.
    fn next_token(&self, headers: &HeaderMap, previous: Option<PageToken>) -> Option<PageToken>;
}
