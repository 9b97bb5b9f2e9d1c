//! Catalog search: query building, engine boundary, response shaping.

pub mod engine;
pub mod envelope;
pub mod query;
