//! API contract types for the healthcare REST service

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt;
use validator::{Validate, ValidationError};

/// Wire format for calendar dates (`dateOfBirth`, `appointmentDate`)
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Wire format for clock times (`startTime`, `endTime`, `appointmentTime`)
pub const CLOCK_TIME_FORMAT: &str = "%H:%M";

/// Longest appointment the API accepts, in minutes
pub const MAX_APPOINTMENT_MINUTES: u32 = 480;

/// Credentials supplied by the caller for a login
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login request body
///
/// Not validated locally: whether the credentials are acceptable is for the
/// server to decide.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub tenant_id: String,
}

impl LoginRequest {
    pub fn new(credentials: &Credentials, tenant_id: impl Into<String>) -> Self {
        Self {
            email: credentials.email.clone(),
            password: credentials.password.clone(),
            tenant_id: tenant_id.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .field("tenant_id", &self.tenant_id)
            .finish()
    }
}

/// Postal address of a patient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[validate(length(min = 1))]
    pub street: String,
    #[validate(length(min = 1))]
    pub city: String,
    #[validate(length(min = 1))]
    pub state: String,
    #[validate(length(min = 1))]
    pub zip_code: String,
}

/// Patient creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PatientRequest {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(custom(function = "validate_date"))]
    pub date_of_birth: String,
    #[validate(length(min = 1))]
    pub gender: String,
    #[validate(nested)]
    pub address: Address,
}

/// Provider creation request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProviderRequest {
    #[validate(length(min = 1, message = "First name cannot be empty"))]
    pub first_name: String,
    #[validate(length(min = 1, message = "Last name cannot be empty"))]
    pub last_name: String,
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 1))]
    pub phone: String,
    #[validate(length(min = 1))]
    pub specialization: String,
    #[validate(length(min = 1))]
    pub license_number: String,
    #[validate(length(min = 1))]
    pub role: String,
}

/// Weekly availability window of a provider
///
/// The provider is addressed by the request path, so the body carries only
/// the window itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_availability_window"))]
pub struct AvailabilityRequest {
    #[validate(length(min = 1))]
    pub day_of_week: String,
    #[validate(custom(function = "validate_clock_time"))]
    pub start_time: String,
    #[validate(custom(function = "validate_clock_time"))]
    pub end_time: String,
    pub is_available: bool,
}

/// Appointment booking request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentRequest {
    #[validate(length(min = 1, message = "Patient id cannot be empty"))]
    pub patient_id: String,
    #[validate(length(min = 1, message = "Provider id cannot be empty"))]
    pub provider_id: String,
    #[validate(custom(function = "validate_date"))]
    pub appointment_date: String,
    #[validate(custom(function = "validate_clock_time"))]
    pub appointment_time: String,
    #[validate(length(min = 1))]
    pub reason: String,
    /// Length of the appointment in minutes
    #[validate(range(min = 1, max = 480))]
    pub duration: u32,
}

/// Pagination and search parameters for list endpoints
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageQuery {
    pub page: u32,
    pub size: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: Self::DEFAULT_PAGE,
            size: Self::DEFAULT_SIZE,
            search: None,
        }
    }
}

impl PageQuery {
    pub const DEFAULT_PAGE: u32 = 0;
    pub const DEFAULT_SIZE: u32 = 10;

    pub fn new(page: u32, size: u32) -> Self {
        Self {
            page,
            size,
            search: None,
        }
    }

    /// Attach a free-text search term
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Render as a query string (without the leading `?`)
    ///
    /// `page` and `size` are emitted verbatim; the search term is
    /// percent-encoded and omitted when empty.
    pub fn to_query_string(&self) -> String {
        let mut query = format!("page={}&size={}", self.page, self.size);
        if let Some(search) = self.search.as_deref().filter(|s| !s.is_empty()) {
            query.push_str("&search=");
            query.push_str(&urlencoding::encode(search));
        }
        query
    }
}

/// Payload under the `data` key of a response envelope
pub fn data_payload(response: &Value) -> Option<&Value> {
    response.get("data")
}

/// Whether the response carries a non-empty `data` payload
pub fn has_payload(response: &Value) -> bool {
    match data_payload(response) {
        None | Some(Value::Null) => false,
        Some(Value::Object(map)) => !map.is_empty(),
        Some(Value::Array(items)) => !items.is_empty(),
        Some(Value::String(s)) => !s.is_empty(),
        Some(_) => true,
    }
}

/// Access token issued by a login response (`data.accessToken`)
pub fn access_token(response: &Value) -> Option<String> {
    response
        .pointer("/data/accessToken")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .map(str::to_owned)
}

/// Opaque identifier at a JSON pointer
///
/// Strings are returned verbatim; numeric ids are rendered in decimal form.
pub fn opaque_id(response: &Value, pointer: &str) -> Option<String> {
    match response.pointer(pointer)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Identifier of a created resource (`data.id`)
pub fn resource_id(response: &Value) -> Option<String> {
    opaque_id(response, "/data/id")
}

fn validate_date(value: &str) -> Result<(), ValidationError> {
    NaiveDate::parse_from_str(value, DATE_FORMAT)
        .map(|_| ())
        .map_err(|_| invalid("date", "Expected a YYYY-MM-DD date"))
}

fn validate_clock_time(value: &str) -> Result<(), ValidationError> {
    parse_clock_time(value)
        .map(|_| ())
        .ok_or_else(|| invalid("clock_time", "Expected an HH:MM clock time"))
}

fn validate_availability_window(request: &AvailabilityRequest) -> Result<(), ValidationError> {
    match (
        parse_clock_time(&request.start_time),
        parse_clock_time(&request.end_time),
    ) {
        (Some(start), Some(end)) if end <= start => Err(invalid(
            "availability_window",
            "End time must be after start time",
        )),
        // Malformed times are reported by the field validators.
        _ => Ok(()),
    }
}

fn parse_clock_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, CLOCK_TIME_FORMAT).ok()
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}
