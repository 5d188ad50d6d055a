//! LearnUpon stream declarations

use super::descriptor::StreamDescriptor;
use super::registry::StreamRegistry;
use super::rest::RestStream;
use crate::http::HttpClient;
use crate::partition::ParentLink;
use crate::schema::{PropertyType as P, Schema};
use std::sync::Arc;

pub const LEARNING_PATHS: &str = "learning_paths";
pub const COURSES: &str = "courses";
pub const MODULES: &str = "modules";

/// Learning path records
pub fn learning_paths_schema() -> Schema {
    Schema::from_fields(&[
        ("id", P::Integer),
        ("name", P::String),
        ("sellable", P::Boolean),
        ("cataloged", P::Boolean),
        ("keywords", P::String),
        ("due_days_after_enrollment", P::Integer),
        ("send_due_date_reminders", P::Boolean),
        ("due_date_reminder_days", P::Integer),
        ("due_date_reminder_days_2", P::Integer),
        ("minute_length", P::Number),
        ("path_length_unit", P::String),
        ("price", P::Integer),
        ("published_status_id", P::String),
        ("difficulty_level", P::String),
        ("description_html", P::String),
        ("description_text", P::String),
        ("thumbnail_image_url", P::String),
        ("credits_to_be_awarded", P::String),
        ("created_at", P::DateTime),
        ("date_published", P::DateTime),
        ("due_date_after_enrollment", P::DateTime),
    ])
}

/// Course records
pub fn courses_schema() -> Schema {
    Schema::from_fields(&[
        ("id", P::Integer),
        ("name", P::String),
        ("version", P::String),
        ("source_id", P::Integer),
        ("reference_code", P::String),
        ("created_at", P::DateTime),
        ("updated_at", P::DateTime),
        ("date_published", P::DateTime),
        ("published_status_id", P::String),
        ("sellable", P::Boolean),
        ("cataloged", P::Boolean),
        ("price", P::Number),
        ("keywords", P::String),
        ("difficulty_level", P::String),
        ("description_html", P::String),
        ("description_text", P::String),
        ("thumbnail_image_url", P::String),
        ("credits_to_be_awarded", P::String),
        ("number_of_modules", P::Integer),
    ])
}

/// Course module records
pub fn modules_schema() -> Schema {
    Schema::from_fields(&[
        ("id", P::Integer),
        ("name", P::String),
        ("course_id", P::Integer),
        ("component_type", P::String),
        ("sort_order", P::Integer),
        ("created_at", P::DateTime),
        ("updated_at", P::DateTime),
        ("description_text", P::String),
        ("thumbnail_image_url", P::String),
    ])
}

/// Descriptors of every LearnUpon REST stream, parents first
pub fn descriptors() -> Vec<StreamDescriptor> {
    vec![
        StreamDescriptor::new(LEARNING_PATHS, "/learning_paths")
            .with_schema(learning_paths_schema()),
        StreamDescriptor::new(COURSES, "/courses").with_schema(courses_schema()),
        StreamDescriptor::new(MODULES, "/courses/{course_id}/modules")
            .with_parent(ParentLink::new(COURSES, "id", "course_id"))
            .with_schema(modules_schema()),
    ]
}

/// Registry of the LearnUpon streams sharing one client
pub fn registry(client: Arc<HttpClient>) -> StreamRegistry {
    descriptors()
        .into_iter()
        .fold(StreamRegistry::new(), |registry, descriptor| {
            registry.with_stream(RestStream::new(descriptor, Arc::clone(&client)))
        })
}
