//! Workflow client for the medflow healthcare REST API
//!
//! This crate wraps the multi-tenant healthcare API in a [`WorkflowClient`]
//! that holds the session (tenant id and bearer token), exposes one method per
//! remote operation and can run the complete onboarding-to-booking workflow.
//! Requests go through the [`HttpTransport`] seam; [`ReqwestTransport`] is the
//! production implementation.

pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod transport;
pub mod workflow;

pub use auth::*;
pub use client::*;
pub use config::*;
pub use error::*;
pub use transport::*;
pub use workflow::*;

pub use mf_api_contract as contract;
pub use reqwest::header::HeaderMap;
pub use reqwest::{Method, StatusCode};
