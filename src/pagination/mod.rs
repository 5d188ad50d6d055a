//! Pagination module
//!
//! # Overview
//!
//! LearnUpon signals pagination through response headers: a boolean
//! "has next page" flag and the number of the page just served. A
//! [`Paginator`] turns the previous response into the next [`PageToken`],
//! or `None` once the collection is exhausted.

mod strategies;
mod types;

pub use strategies::{HeaderPaginator, SinglePagePaginator};
pub use types::{PageToken, Paginator};

#[cfg(test)]
mod tests;
