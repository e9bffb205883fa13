//! Session state and authentication headers

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, ACCEPT, AUTHORIZATION};

use crate::error::{RestClientError, RestClientResult};

/// Header naming the tenant a request is scoped to
pub const TENANT_HEADER: HeaderName = HeaderName::from_static("x-tenant-id");

/// Tenant and bearer token held by one workflow client
///
/// The token starts unset and is only ever replaced by a login.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Session {
    tenant_id: String,
    bearer_token: Option<String>,
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("tenant_id", &self.tenant_id)
            .field("authenticated", &self.bearer_token.is_some())
            .finish()
    }
}

impl Session {
    /// Create an unauthenticated session for a tenant
    pub fn new(tenant_id: impl Into<String>) -> Self {
        Self {
            tenant_id: tenant_id.into(),
            bearer_token: None,
        }
    }

    pub fn tenant_id(&self) -> &str {
        &self.tenant_id
    }

    pub fn set_tenant_id(&mut self, tenant_id: impl Into<String>) {
        self.tenant_id = tenant_id.into();
    }

    pub fn bearer_token(&self) -> Option<&str> {
        self.bearer_token.as_deref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.bearer_token.is_some()
    }

    pub(crate) fn set_bearer_token(&mut self, token: Option<String>) {
        self.bearer_token = token;
    }

    /// Headers for a request that does not need a token (login)
    pub fn anonymous_headers(&self) -> RestClientResult<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(TENANT_HEADER, header_value(&self.tenant_id)?);
        Ok(headers)
    }

    /// Headers for an authenticated request
    ///
    /// Fails with [`RestClientError::Unauthenticated`] when no token has been
    /// issued yet.
    pub fn authorized_headers(&self) -> RestClientResult<HeaderMap> {
        let token = self
            .bearer_token
            .as_deref()
            .ok_or(RestClientError::Unauthenticated)?;

        let mut headers = self.anonymous_headers()?;
        headers.insert(AUTHORIZATION, header_value(&format!("Bearer {}", token))?);
        Ok(headers)
    }
}

fn header_value(value: &str) -> RestClientResult<HeaderValue> {
    HeaderValue::from_str(value).map_err(|e| RestClientError::InvalidHeader(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anonymous_headers_carry_tenant() {
        let session = Session::new("acme");
        let headers = session.anonymous_headers().unwrap();

        assert_eq!(headers.get("x-tenant-id").unwrap(), "acme");
        assert_eq!(headers.get("accept").unwrap(), "application/json");
        assert!(headers.get("authorization").is_none());
    }

    #[test]
    fn test_authorized_headers_require_token() {
        let session = Session::new("acme");

        assert!(matches!(
            session.authorized_headers(),
            Err(RestClientError::Unauthenticated)
        ));
    }

    #[test]
    fn test_bearer_headers() {
        let mut session = Session::new("acme");
        session.set_bearer_token(Some("jwt-token".into()));
        let headers = session.authorized_headers().unwrap();

        assert_eq!(headers.get("authorization").unwrap(), "Bearer jwt-token");
        assert_eq!(headers.get("x-tenant-id").unwrap(), "acme");
    }

    #[test]
    fn test_tenant_with_newline_is_rejected() {
        let session = Session::new("acme\nevil");

        assert!(matches!(
            session.anonymous_headers(),
            Err(RestClientError::InvalidHeader(_))
        ));
    }

    #[test]
    fn test_debug_hides_token() {
        let mut session = Session::new("acme");
        session.set_bearer_token(Some("secret-jwt".into()));
        let rendered = format!("{:?}", session);

        assert!(rendered.contains("authenticated: true"));
        assert!(!rendered.contains("secret-jwt"));
    }
}
