//! Core domain types for the appcat marketplace catalog.
#![deny(warnings, clippy::all, clippy::pedantic)]
#![warn(missing_docs)]

pub mod authz;
pub mod identity;
pub mod request;
