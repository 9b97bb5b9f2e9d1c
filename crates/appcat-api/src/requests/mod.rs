//! App-request lifecycle: persistence boundary and transition logic.

pub mod store;
pub mod workflow;
