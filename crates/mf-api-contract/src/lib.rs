//! medflow REST API contract types and validation
//!
//! This crate defines the request payloads sent to the multi-tenant healthcare
//! API, helpers for reading the `data` envelope of its responses, and the demo
//! fixtures used by the smoke workflow. These types are shared between the
//! REST client, its mock transport and the CLI runner.

pub mod fixtures;
pub mod types;

pub use fixtures::*;
pub use types::*;
