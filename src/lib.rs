//! Bookshelf application library
//!
//! The books module plus the bootstrap that wires it to a store and the HTTP
//! server.

pub mod app;
pub mod modules;

pub use app::{build_registry, run};
