//! Pagination strategy implementations

use super::types::{PageToken, Paginator};
use reqwest::header::HeaderMap;
use tracing::{debug, warn};

/// Default header carrying the "more pages follow" flag
pub const HAS_NEXT_PAGE_HEADER: &str = "LU-Has-Next-Page";

/// Default header carrying the number of the page just served
pub const CURRENT_PAGE_HEADER: &str = "LU-Current-Page";

// ============================================================================
// Header Pagination
// ============================================================================

/// Header-driven page-number pagination
///
/// Reads `LU-Has-Next-Page: true` and `LU-Current-Page: N` and asks for page
/// `N + 1`. A missing or non-numeric current page counts as `0`.
#[derive(Debug, Clone)]
pub struct HeaderPaginator {
    /// Header holding the has-next-page flag
    pub has_next_header: String,
    /// Header holding the current page number
    pub current_page_header: String,
}

impl Default for HeaderPaginator {
    fn default() -> Self {
        Self::new(HAS_NEXT_PAGE_HEADER, CURRENT_PAGE_HEADER)
    }
}

impl HeaderPaginator {
    /// Create a paginator reading custom header names
    pub fn new(has_next_header: impl Into<String>, current_page_header: impl Into<String>) -> Self {
        Self {
            has_next_header: has_next_header.into(),
            current_page_header: current_page_header.into(),
        }
    }

    /// Whether the response announces another page
    pub fn has_next_page(&self, headers: &HeaderMap) -> bool {
        let Some(raw) = headers.get(self.has_next_header.as_str()) else {
            return false;
        };

        match raw.to_str() {
            Ok(value) => value.trim().eq_ignore_ascii_case("true"),
            Err(_) => {
                warn!(
                    header = %self.has_next_header,
                    "Unreadable pagination header, treating as last page"
                );
                false
            }
        }
    }

    /// The page number the response reports, `0` when missing or malformed
    pub fn current_page(&self, headers: &HeaderMap) -> PageToken {
        let Some(raw) = headers.get(self.current_page_header.as_str()) else {
            debug!(header = %self.current_page_header, "Current page header missing, using 0");
            return 0;
        };

        match raw.to_str().ok().and_then(|v| v.trim().parse::<PageToken>().ok()) {
            Some(page) => page,
            None => {
                warn!(
                    header = %self.current_page_header,
                    value = ?raw,
                    "Non-numeric current page header, using 0"
                );
                0
            }
        }
    }
}

impl Paginator for HeaderPaginator {
    fn next_token(&self, headers: &HeaderMap, previous: Option<PageToken>) -> Option<PageToken> {
        if !self.has_next_page(headers) {
            return None;
        }

        let next = self.current_page(headers).saturating_add(1);

        // Tokens only ever move forward; anything else would refetch a page.
        if previous.is_some_and(|prev| next <= prev) {
            warn!(
                previous = previous.unwrap_or_default(),
                next, "Page token did not advance, stopping pagination"
            );
            return None;
        }

        Some(next)
    }
}

// ============================================================================
// Single Page
// ============================================================================

/// Endpoint served in a single response
#[derive(Debug, Clone, Copy, Default)]
pub struct SinglePagePaginator;

impl Paginator for SinglePagePaginator {
    fn next_token(&self, _headers: &HeaderMap, _previous: Option<PageToken>) -> Option<PageToken> {
        None
    }
}
