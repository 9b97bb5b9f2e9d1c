//! Marketplace catalog API library.
#![deny(warnings, clippy::all, clippy::pedantic)]
#![warn(missing_docs)]

use std::future::Future;
use std::pin::Pin;

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
/// Identity extraction from gateway headers.
pub mod identity;
pub mod models;
pub mod notify;
pub mod requests;
pub mod router;
pub mod search;

/// Boxed future returned by dyn-compatible async trait methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;
