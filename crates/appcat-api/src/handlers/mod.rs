//! HTTP handlers.

pub mod apps;
pub mod requests;
pub mod search;
