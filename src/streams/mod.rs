//! REST streams
//!
//! # Overview
//!
//! A stream is a [`StreamDescriptor`] (name, endpoint, record path, schema,
//! optional parent) driven by one generic engine, [`RestStream`]. The engine
//! walks the pages of an endpoint lazily; the [`StreamRegistry`] resolves
//! stream names and fans child streams out over their parent's records.
//!
//! The LearnUpon streams themselves are declared in [`learnupon`].

mod descriptor;
pub mod learnupon;
mod registry;
mod rest;

pub use descriptor::StreamDescriptor;
pub use registry::StreamRegistry;
pub use rest::{Page, RecordStream, RestStream};
