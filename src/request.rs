//! Request construction
//!
//! Turns a page token and an optional parent context into the path and
//! query parameters of the next request.

use crate::error::Result;
use crate::template;
use crate::types::{Context, PageToken};
use std::collections::BTreeMap;

/// Query parameter carrying the page number
pub const PAGE_PARAM: &str = "page";

/// Query parameters for the given page token.
///
/// An absent token and a token of `0` both mean "no page parameter".
pub fn request_params(token: Option<PageToken>) -> BTreeMap<String, String> {
    let mut params = BTreeMap::new();
    if let Some(page) = token.filter(|page| *page > 0) {
        params.insert(PAGE_PARAM.to_string(), page.to_string());
    }
    params
}

/// Everything needed to issue one page request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestPlan {
    /// Rendered endpoint path, relative to the API base URL
    pub path: String,
    /// Query parameters
    pub params: BTreeMap<String, String>,
}

impl RequestPlan {
    /// Build the plan for one page of a stream
    pub fn build(
        path_template: &str,
        context: Option<&Context>,
        token: Option<PageToken>,
    ) -> Result<Self> {
        let path = match context {
            Some(ctx) => template::render(path_template, ctx)?,
            None => template::render(path_template, &Context::new())?,
        };

        Ok(Self {
            path,
            params: request_params(token),
        })
    }
}
