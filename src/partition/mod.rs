//! Parent-child context propagation
//!
//! # Overview
//!
//! Child streams such as course modules are scoped by a parent record: the
//! child endpoint is `/courses/{course_id}/modules`, and `course_id` comes from
//! the `id` field of each course. A [`ParentLink`] declares those bindings and
//! turns one parent record into the [`Context`](crate::types::Context) for one
//! child loop.

mod types;

pub use types::{extract_field, KeyBinding, ParentLink};
