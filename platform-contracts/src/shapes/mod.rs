//! Shapes are grouped by service. Each is a lazily built `Arc<Shape>` so it
//! can be referenced from other shapes without being copied.
//!
//! Where an endpoint answers differently depending on the verb, each variant
//! gets its own shape, even when they look alike.

pub mod auth;
pub mod common;
pub mod importer;
pub mod search;
pub mod suggestions;
pub mod teams;
