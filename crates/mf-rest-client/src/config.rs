//! Connection settings for an HTTP-backed workflow client

use url::Url;

use crate::error::RestClientResult;
use crate::transport::{parse_base_url, USER_AGENT};

/// Where and as whom a [`WorkflowClient`](crate::WorkflowClient) connects
///
/// Request paths are absolute (`/api/...`), so `base_url` must not carry a
/// path: building a client from a config whose base URL has one fails with
/// [`InvalidBaseUrl`](crate::RestClientError::InvalidBaseUrl).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub base_url: Url,
    pub tenant_id: String,
    pub user_agent: String,
}

impl ClientConfig {
    pub fn new(base_url: Url, tenant_id: impl Into<String>) -> Self {
        Self {
            base_url,
            tenant_id: tenant_id.into(),
            user_agent: USER_AGENT.to_string(),
        }
    }

    /// Parse the base URL from a string
    pub fn from_url(base_url: &str, tenant_id: impl Into<String>) -> RestClientResult<Self> {
        Ok(Self::new(parse_base_url(base_url)?, tenant_id))
    }

    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }
}
