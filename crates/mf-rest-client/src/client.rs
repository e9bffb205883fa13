//! Workflow client for the healthcare REST API

use mf_api_contract::*;
use reqwest::header::HeaderMap;
use reqwest::Method;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use url::Url;
use validator::Validate;

use crate::auth::Session;
use crate::config::ClientConfig;
use crate::error::{RestClientError, RestClientResult};
use crate::transport::{ApiRequest, HttpTransport, ReqwestTransport};

/// Client for one tenant of the healthcare API
///
/// Holds the session (tenant id and bearer token) and translates each
/// business operation into a single HTTP call. Every operation except
/// [`login`](Self::login) needs a token from a prior successful login and
/// fails with [`RestClientError::Unauthenticated`] without touching the
/// network otherwise.
#[derive(Debug, Clone)]
pub struct WorkflowClient<T = ReqwestTransport> {
    transport: T,
    session: Session,
}

impl WorkflowClient<ReqwestTransport> {
    /// Create a client talking to `base_url` over HTTP
    pub fn new(base_url: Url, tenant_id: impl Into<String>) -> RestClientResult<Self> {
        Ok(Self::with_transport(ReqwestTransport::new(base_url)?, tenant_id))
    }

    /// Create a client from a base URL string
    pub fn from_url(base_url: &str, tenant_id: impl Into<String>) -> RestClientResult<Self> {
        let base_url = Url::parse(base_url)?;
        Self::new(base_url, tenant_id)
    }

    pub fn from_config(config: &ClientConfig) -> RestClientResult<Self> {
        let transport =
            ReqwestTransport::with_user_agent(config.base_url.clone(), &config.user_agent)?;
        Ok(Self::with_transport(transport, config.tenant_id.clone()))
    }
}

impl<T: HttpTransport> WorkflowClient<T> {
    /// Create an unauthenticated client over an arbitrary transport
    pub fn with_transport(transport: T, tenant_id: impl Into<String>) -> Self {
        Self {
            transport,
            session: Session::new(tenant_id),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn tenant_id(&self) -> &str {
        self.session.tenant_id()
    }

    /// Switch tenants; takes effect for the next login
    pub fn set_tenant_id(&mut self, tenant_id: impl Into<String>) {
        self.session.set_tenant_id(tenant_id);
    }

    /// Token issued by the last successful login
    pub fn bearer_token(&self) -> Option<&str> {
        self.session.bearer_token()
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    /// Log in to the current tenant
    ///
    /// On success the token at `data.accessToken` becomes the session token;
    /// when the response carries none the session is left unauthenticated.
    /// A rejected login leaves the session untouched.
    pub async fn login(&mut self, credentials: &Credentials) -> RestClientResult<Value> {
        let request = LoginRequest::new(credentials, self.session.tenant_id());

        let headers = self.session.anonymous_headers()?;
        let response = self
            .dispatch(Method::POST, "/api/auth/login".into(), headers, Some(&request))
            .await?;

        let token = access_token(&response);
        if token.is_none() {
            warn!(tenant = %self.session.tenant_id(), "login succeeded without an access token");
        } else {
            info!(tenant = %self.session.tenant_id(), "logged in");
        }
        self.session.set_bearer_token(token);

        Ok(response)
    }

    /// Register a patient
    pub async fn create_patient(&self, patient: &PatientRequest) -> RestClientResult<Value> {
        self.post("/api/patients".into(), patient).await
    }

    /// Register the demo patient
    pub async fn create_demo_patient(&self) -> RestClientResult<Value> {
        self.create_patient(&demo_patient()).await
    }

    /// Register a provider
    pub async fn add_provider(&self, provider: &ProviderRequest) -> RestClientResult<Value> {
        self.post("/api/providers".into(), provider).await
    }

    /// Register the demo provider
    pub async fn add_demo_provider(&self) -> RestClientResult<Value> {
        self.add_provider(&demo_provider()).await
    }

    /// Publish an availability window for a provider
    pub async fn set_availability(
        &self,
        provider_id: &str,
        availability: &AvailabilityRequest,
    ) -> RestClientResult<Value> {
        self.post(availability_path(provider_id), availability).await
    }

    /// Publish the demo schedule for a provider
    pub async fn set_demo_availability(&self, provider_id: &str) -> RestClientResult<Value> {
        self.set_availability(provider_id, &demo_availability()).await
    }

    /// Book an appointment
    pub async fn book_appointment(
        &self,
        appointment: &AppointmentRequest,
    ) -> RestClientResult<Value> {
        self.post("/api/appointments".into(), appointment).await
    }

    /// Book the demo appointment between a patient and a provider
    pub async fn book_demo_appointment(
        &self,
        patient_id: &str,
        provider_id: &str,
    ) -> RestClientResult<Value> {
        self.book_appointment(&demo_appointment(patient_id, provider_id))
            .await
    }

    /// List providers, one page at a time
    pub async fn get_providers(&self, page: u32, size: u32) -> RestClientResult<Value> {
        let query = PageQuery::new(page, size);
        self.get(format!("/api/providers?{}", query.to_query_string()))
            .await
    }

    /// List patients, optionally filtered by a search term
    pub async fn get_patients(
        &self,
        page: u32,
        size: u32,
        search: Option<&str>,
    ) -> RestClientResult<Value> {
        let mut query = PageQuery::new(page, size);
        if let Some(search) = search {
            query = query.with_search(search);
        }
        self.get(format!("/api/patients?{}", query.to_query_string()))
            .await
    }

    /// Read back the availability configured for a provider
    pub async fn get_availability_settings(&self, provider_id: &str) -> RestClientResult<Value> {
        self.get(availability_path(provider_id)).await
    }

    // Private helper methods

    async fn get(&self, path: String) -> RestClientResult<Value> {
        let headers = self.session.authorized_headers()?;
        self.dispatch::<()>(Method::GET, path, headers, None).await
    }

    async fn post<B: Serialize + Validate>(
        &self,
        path: String,
        body: &B,
    ) -> RestClientResult<Value> {
        let headers = self.session.authorized_headers()?;
        body.validate()?;
        self.dispatch(Method::POST, path, headers, Some(body)).await
    }

    async fn dispatch<B: Serialize>(
        &self,
        method: Method,
        path_and_query: String,
        headers: HeaderMap,
        body: Option<&B>,
    ) -> RestClientResult<Value> {
        let body = body.map(serde_json::to_value).transpose()?;
        let request = ApiRequest {
            method,
            path_and_query,
            headers,
            body,
        };
        debug!(method = %request.method, path = %request.path(), "dispatching request");

        let response = self.transport.send(request).await?;
        if !response.is_success() {
            return Err(RestClientError::RequestFailed {
                status: response.status(),
                status_text: response.status_text().to_string(),
            });
        }
        response.parse()
    }
}

fn availability_path(provider_id: &str) -> String {
    format!(
        "/api/providers/{}/availability",
        urlencoding::encode(provider_id)
    )
}
