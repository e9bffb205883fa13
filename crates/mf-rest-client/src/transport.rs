//! HTTP transport seam used by the workflow client

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::{Client as HttpClient, Method, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;
use url::Url;

use crate::error::{RestClientError, RestClientResult};

/// User agent sent by [`ReqwestTransport`]
pub const USER_AGENT: &str = concat!("medflow/", env!("CARGO_PKG_VERSION"));

/// One request as issued by the workflow client
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    /// Path relative to the API root, including any query string
    pub path_and_query: String,
    pub headers: HeaderMap,
    pub body: Option<Value>,
}

impl ApiRequest {
    /// Path without the query string
    pub fn path(&self) -> &str {
        self.path_and_query
            .split_once('?')
            .map_or(self.path_and_query.as_str(), |(path, _)| path)
    }

    /// Raw query string, if any
    pub fn query(&self) -> Option<&str> {
        self.path_and_query.split_once('?').map(|(_, query)| query)
    }
}

/// Status and raw body of a response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    pub status: StatusCode,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Response with a JSON body
    pub fn json(status: StatusCode, body: &Value) -> Self {
        Self::new(status, body.to_string())
    }

    /// 2xx status
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Canonical reason phrase of the status, empty for unknown codes
    pub fn status_text(&self) -> &'static str {
        self.status.canonical_reason().unwrap_or("")
    }

    /// Parse the body as JSON
    pub fn parse<T: DeserializeOwned>(&self) -> RestClientResult<T> {
        serde_json::from_str(&self.body).map_err(RestClientError::MalformedResponse)
    }
}

/// Issues requests on behalf of the workflow client
///
/// Implementations report transport-level failures only; status handling is
/// left to the caller.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> RestClientResult<ApiResponse>;
}

/// [`HttpTransport`] backed by a shared `reqwest` client
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    http_client: HttpClient,
    base_url: Url,
}

impl ReqwestTransport {
    pub fn new(base_url: Url) -> RestClientResult<Self> {
        Self::with_user_agent(base_url, USER_AGENT)
    }

    pub fn with_user_agent(base_url: Url, user_agent: &str) -> RestClientResult<Self> {
        check_base_url(&base_url)?;
        let http_client = HttpClient::builder().user_agent(user_agent).build()?;

        Ok(Self {
            http_client,
            base_url,
        })
    }

    /// Create a transport from a base URL string
    pub fn from_url(base_url: &str) -> RestClientResult<Self> {
        Self::new(parse_base_url(base_url)?)
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }
}

/// Reject base URLs whose path or query the absolute `/api/...` request paths
/// would silently replace
pub fn check_base_url(base_url: &Url) -> RestClientResult<()> {
    if base_url.cannot_be_a_base() || base_url.path() != "/" || base_url.query().is_some() {
        return Err(RestClientError::InvalidBaseUrl(base_url.to_string()));
    }
    Ok(())
}

/// Parse and check a base URL
pub fn parse_base_url(base_url: &str) -> RestClientResult<Url> {
    let url = Url::parse(base_url)?;
    check_base_url(&url)?;
    Ok(url)
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: ApiRequest) -> RestClientResult<ApiResponse> {
        let url = self.base_url.join(&request.path_and_query)?;
        debug!(method = %request.method, url = %url, "sending request");

        let mut builder = self
            .http_client
            .request(request.method, url)
            .headers(request.headers);
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;
        debug!(status = status.as_u16(), "received response");

        Ok(ApiResponse { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_request_path_and_query_split() {
        let request = ApiRequest {
            method: Method::GET,
            path_and_query: "/api/patients?page=0&size=10".into(),
            headers: HeaderMap::new(),
            body: None,
        };

        assert_eq!(request.path(), "/api/patients");
        assert_eq!(request.query(), Some("page=0&size=10"));
    }

    #[test]
    fn test_request_without_query() {
        let request = ApiRequest {
            method: Method::POST,
            path_and_query: "/api/patients".into(),
            headers: HeaderMap::new(),
            body: None,
        };

        assert_eq!(request.path(), "/api/patients");
        assert_eq!(request.query(), None);
    }

    #[test]
    fn test_response_status_helpers() {
        let ok = ApiResponse::json(StatusCode::CREATED, &json!({ "data": {} }));
        assert!(ok.is_success());
        assert_eq!(ok.status_text(), "Created");

        let denied = ApiResponse::new(StatusCode::UNAUTHORIZED, "");
        assert!(!denied.is_success());
        assert_eq!(denied.status_text(), "Unauthorized");
    }

    #[test]
    fn test_response_parse_failure_is_malformed() {
        let response = ApiResponse::new(StatusCode::OK, "<html>oops</html>");
        let result: RestClientResult<Value> = response.parse();

        assert!(matches!(result, Err(RestClientError::MalformedResponse(_))));
    }

    #[test]
    fn test_transport_from_url() {
        let transport = ReqwestTransport::from_url("http://localhost:8080").unwrap();
        assert_eq!(transport.base_url().as_str(), "http://localhost:8080/");

        assert!(matches!(
            ReqwestTransport::from_url("not a url"),
            Err(RestClientError::Url(_))
        ));
    }

    #[test]
    fn test_base_url_must_not_carry_a_path() {
        for base_url in ["http://localhost:8080/backend", "http://localhost:8080/backend/"] {
            assert!(matches!(
                ReqwestTransport::from_url(base_url),
                Err(RestClientError::InvalidBaseUrl(_))
            ));
        }
        assert!(matches!(
            parse_base_url("http://localhost:8080/?tenant=acme"),
            Err(RestClientError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            parse_base_url("mailto:admin@acme.example"),
            Err(RestClientError::InvalidBaseUrl(_))
        ));

        let root = Url::parse("https://api.example.com/").unwrap();
        assert!(ReqwestTransport::new(root).is_ok());
    }
}
