//! Mock transport backed by scripted routes
//!
//! [`MockTransport`] answers requests from an in-memory route table and
//! records every request it receives, so tests can assert on exactly what the
//! workflow client sent (or that it sent nothing).

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use mf_api_contract::*;
use mf_rest_client::{ApiRequest, ApiResponse, HttpTransport, Method, RestClientResult, StatusCode};
use serde_json::{json, Value};
use tracing::debug;

/// Token issued by [`MockTransport::healthy_api`]
pub const MOCK_ACCESS_TOKEN: &str = "mock-access-token";
/// Patient id assigned by [`MockTransport::healthy_api`]
pub const MOCK_PATIENT_ID: &str = "pat-001";
/// Provider id assigned by [`MockTransport::healthy_api`]
pub const MOCK_PROVIDER_ID: &str = "prov-001";

#[derive(Debug, Clone)]
struct Route {
    method: Method,
    path: String,
    response: ApiResponse,
}

#[derive(Debug)]
struct MockState {
    routes: Vec<Route>,
    requests: Vec<ApiRequest>,
    fallback: ApiResponse,
}

impl Default for MockState {
    fn default() -> Self {
        Self {
            routes: Vec::new(),
            requests: Vec::new(),
            fallback: ApiResponse::json(
                StatusCode::NOT_FOUND,
                &json!({ "message": "no route configured" }),
            ),
        }
    }
}

/// In-memory [`HttpTransport`]
///
/// Clones share the same routes and request log, so a test can keep a handle
/// while the client owns another.
#[derive(Debug, Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer `method path` (query ignored) with `response`
    ///
    /// Later routes take precedence over earlier ones for the same request.
    pub fn respond(&self, method: Method, path: impl Into<String>, response: ApiResponse) {
        self.lock().routes.push(Route {
            method,
            path: path.into(),
            response,
        });
    }

    /// Answer `method path` with a JSON body
    pub fn respond_json(
        &self,
        method: Method,
        path: impl Into<String>,
        status: StatusCode,
        body: Value,
    ) {
        self.respond(method, path, ApiResponse::json(status, &body));
    }

    /// Response for requests no route matches
    pub fn set_fallback(&self, response: ApiResponse) {
        self.lock().fallback = response;
    }

    /// Requests received so far, oldest first
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.lock().requests.clone()
    }

    pub fn request_count(&self) -> usize {
        self.lock().requests.len()
    }

    /// A transport that plays a well-behaved API for the complete workflow
    pub fn healthy_api() -> Self {
        let transport = Self::new();
        let availability_path = format!("/api/providers/{}/availability", MOCK_PROVIDER_ID);

        transport.respond_json(
            Method::POST,
            "/api/auth/login",
            StatusCode::OK,
            json!({ "data": { "accessToken": MOCK_ACCESS_TOKEN, "tokenType": "Bearer" } }),
        );
        transport.respond_json(
            Method::POST,
            "/api/patients",
            StatusCode::CREATED,
            json!({ "data": patient_record() }),
        );
        transport.respond_json(
            Method::POST,
            "/api/providers",
            StatusCode::CREATED,
            json!({ "data": provider_record() }),
        );
        transport.respond_json(
            Method::POST,
            availability_path.clone(),
            StatusCode::CREATED,
            json!({ "data": availability_record() }),
        );
        transport.respond_json(
            Method::POST,
            "/api/appointments",
            StatusCode::CREATED,
            json!({ "data": {
                "id": "apt-001",
                "patientId": MOCK_PATIENT_ID,
                "providerId": MOCK_PROVIDER_ID,
                "appointmentDate": DEMO_APPOINTMENT_DATE,
                "appointmentTime": DEMO_APPOINTMENT_TIME,
                "reason": DEMO_APPOINTMENT_REASON,
                "duration": DEMO_APPOINTMENT_DURATION_MINUTES,
                "status": "SCHEDULED"
            } }),
        );
        transport.respond_json(
            Method::GET,
            "/api/providers",
            StatusCode::OK,
            json!({ "data": [provider_record()], "page": 0, "totalElements": 1 }),
        );
        transport.respond_json(
            Method::GET,
            "/api/patients",
            StatusCode::OK,
            json!({ "data": [patient_record()], "page": 0, "totalElements": 1 }),
        );
        transport.respond_json(
            Method::GET,
            availability_path,
            StatusCode::OK,
            json!({ "data": [availability_record()] }),
        );

        transport
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl HttpTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> RestClientResult<ApiResponse> {
        let mut state = self.lock();
        let response = state
            .routes
            .iter()
            .rev()
            .find(|route| route.method == request.method && route.path == request.path())
            .map(|route| route.response.clone())
            .unwrap_or_else(|| state.fallback.clone());

        debug!(
            method = %request.method,
            path = %request.path_and_query,
            status = response.status.as_u16(),
            "mock transport answered"
        );
        state.requests.push(request);
        Ok(response)
    }
}

fn patient_record() -> Value {
    json!({
        "id": MOCK_PATIENT_ID,
        "firstName": DEMO_PATIENT_FIRST_NAME,
        "lastName": DEMO_PATIENT_LAST_NAME,
        "email": DEMO_PATIENT_EMAIL,
        "dateOfBirth": DEMO_PATIENT_DATE_OF_BIRTH
    })
}

fn provider_record() -> Value {
    json!({
        "id": MOCK_PROVIDER_ID,
        "firstName": DEMO_PROVIDER_FIRST_NAME,
        "lastName": DEMO_PROVIDER_LAST_NAME,
        "specialization": DEMO_PROVIDER_SPECIALIZATION,
        "role": DEMO_PROVIDER_ROLE
    })
}

fn availability_record() -> Value {
    json!({
        "providerId": MOCK_PROVIDER_ID,
        "dayOfWeek": DEMO_AVAILABILITY_DAY,
        "startTime": DEMO_AVAILABILITY_START,
        "endTime": DEMO_AVAILABILITY_END,
        "isAvailable": true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use mf_rest_client::HeaderMap;

    fn request(method: Method, path_and_query: &str) -> ApiRequest {
        ApiRequest {
            method,
            path_and_query: path_and_query.into(),
            headers: HeaderMap::new(),
            body: None,
        }
    }

    #[test]
    fn test_unrouted_request_gets_fallback() {
        let transport = MockTransport::new();
        let response =
            tokio_test::block_on(transport.send(request(Method::GET, "/nowhere"))).unwrap();

        assert_eq!(response.status, StatusCode::NOT_FOUND);
        assert_eq!(transport.request_count(), 1);
    }

    #[test]
    fn test_routes_ignore_query_and_latest_wins() {
        let transport = MockTransport::new();
        transport.respond(Method::GET, "/api/providers", ApiResponse::new(StatusCode::OK, "{}"));
        transport.respond(
            Method::GET,
            "/api/providers",
            ApiResponse::new(StatusCode::SERVICE_UNAVAILABLE, ""),
        );

        let response = tokio_test::block_on(
            transport.send(request(Method::GET, "/api/providers?page=0&size=10")),
        )
        .unwrap();

        assert_eq!(response.status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(transport.requests()[0].query(), Some("page=0&size=10"));
    }

    #[test]
    fn test_fallback_can_be_replaced() {
        let transport = MockTransport::healthy_api();
        transport.set_fallback(ApiResponse::new(StatusCode::BAD_GATEWAY, ""));

        let unrouted =
            tokio_test::block_on(transport.send(request(Method::GET, "/api/unknown"))).unwrap();
        let routed =
            tokio_test::block_on(transport.send(request(Method::GET, "/api/patients"))).unwrap();

        assert_eq!(unrouted.status, StatusCode::BAD_GATEWAY);
        assert_eq!(routed.status, StatusCode::OK);
    }

    #[test]
    fn test_routes_are_not_consumed() {
        let transport = MockTransport::healthy_api();
        for _ in 0..3 {
            let response =
                tokio_test::block_on(transport.send(request(Method::GET, "/api/providers")))
                    .unwrap();
            assert_eq!(response.status, StatusCode::OK);
        }

        assert_eq!(transport.request_count(), 3);
    }

    #[test]
    fn test_method_must_match() {
        let transport = MockTransport::healthy_api();
        let response =
            tokio_test::block_on(transport.send(request(Method::DELETE, "/api/patients"))).unwrap();

        assert_eq!(response.status, StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_clones_share_request_log() {
        let transport = MockTransport::healthy_api();
        let handle = transport.clone();
        tokio_test::block_on(transport.send(request(Method::GET, "/api/patients"))).unwrap();

        assert_eq!(handle.request_count(), 1);
    }
}
