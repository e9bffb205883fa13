//! The complete onboarding-to-booking workflow

use std::fmt;

use mf_api_contract::*;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tracing::info;

use crate::client::WorkflowClient;
use crate::error::RestClientError;
use crate::transport::HttpTransport;

/// Steps of the complete workflow, in execution order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    Login,
    CreatePatient,
    AddProvider,
    SetAvailability,
    BookAppointment,
    GetProviders,
    GetPatients,
    GetAvailabilitySettings,
}

impl WorkflowStep {
    pub const ALL: [WorkflowStep; 8] = [
        WorkflowStep::Login,
        WorkflowStep::CreatePatient,
        WorkflowStep::AddProvider,
        WorkflowStep::SetAvailability,
        WorkflowStep::BookAppointment,
        WorkflowStep::GetProviders,
        WorkflowStep::GetPatients,
        WorkflowStep::GetAvailabilitySettings,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WorkflowStep::Login => "login",
            WorkflowStep::CreatePatient => "create_patient",
            WorkflowStep::AddProvider => "add_provider",
            WorkflowStep::SetAvailability => "set_availability",
            WorkflowStep::BookAppointment => "book_appointment",
            WorkflowStep::GetProviders => "get_providers",
            WorkflowStep::GetPatients => "get_patients",
            WorkflowStep::GetAvailabilitySettings => "get_availability_settings",
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A workflow step failed; later steps were not attempted
///
/// Resources created by earlier steps are left in place.
#[derive(Debug, Error)]
#[error("workflow step `{step}` failed: {source}")]
pub struct WorkflowError {
    pub step: WorkflowStep,
    #[source]
    pub source: RestClientError,
}

impl WorkflowError {
    pub fn new(step: WorkflowStep, source: RestClientError) -> Self {
        Self { step, source }
    }

    fn at(step: WorkflowStep) -> impl FnOnce(RestClientError) -> Self {
        move |source| Self::new(step, source)
    }
}

/// Every response collected by a complete workflow run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowReport {
    pub patient_id: String,
    pub provider_id: String,
    pub login: Value,
    pub patient: Value,
    pub provider: Value,
    pub availability: Value,
    pub appointment: Value,
    pub providers: Value,
    pub patients: Value,
    pub availability_settings: Value,
}

/// An end-to-end assertion that did not hold
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VerificationError {
    #[error("step `{step}` returned no data")]
    EmptyPayload { step: WorkflowStep },

    #[error("created patient is {actual:?}, expected {expected:?}")]
    PatientMismatch { expected: String, actual: String },

    #[error("appointment {field} is {actual:?}, expected {expected:?}")]
    AppointmentMismatch {
        field: &'static str,
        expected: String,
        actual: Option<String>,
    },
}

impl WorkflowReport {
    /// Response of each step, in execution order
    pub fn responses(&self) -> [(WorkflowStep, &Value); 8] {
        [
            (WorkflowStep::Login, &self.login),
            (WorkflowStep::CreatePatient, &self.patient),
            (WorkflowStep::AddProvider, &self.provider),
            (WorkflowStep::SetAvailability, &self.availability),
            (WorkflowStep::BookAppointment, &self.appointment),
            (WorkflowStep::GetProviders, &self.providers),
            (WorkflowStep::GetPatients, &self.patients),
            (WorkflowStep::GetAvailabilitySettings, &self.availability_settings),
        ]
    }

    /// Check the end-to-end assertions against the fixtures the run used
    pub fn verify(&self, fixtures: &Fixtures) -> Result<(), VerificationError> {
        for (step, response) in self.responses() {
            if !has_payload(response) {
                return Err(VerificationError::EmptyPayload { step });
            }
        }

        let name_at = |pointer: &str| {
            self.patient
                .pointer(pointer)
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string()
        };
        let expected = format!(
            "{} {}",
            fixtures.patient.first_name, fixtures.patient.last_name
        );
        let actual = format!("{} {}", name_at("/data/firstName"), name_at("/data/lastName"));
        if actual != expected {
            return Err(VerificationError::PatientMismatch { expected, actual });
        }

        for (field, expected) in [
            ("patientId", &self.patient_id),
            ("providerId", &self.provider_id),
        ] {
            let actual = opaque_id(&self.appointment, &format!("/data/{}", field));
            if actual.as_deref() != Some(expected.as_str()) {
                return Err(VerificationError::AppointmentMismatch {
                    field,
                    expected: expected.clone(),
                    actual,
                });
            }
        }

        Ok(())
    }
}

impl<T: HttpTransport> WorkflowClient<T> {
    /// Run the complete workflow, one step after another
    ///
    /// Logs in, creates a patient and a provider, publishes the provider's
    /// availability, books an appointment between them and reads providers,
    /// patients and the availability back. The first failure aborts the run.
    pub async fn execute_complete_workflow(
        &mut self,
        credentials: &Credentials,
        fixtures: &Fixtures,
    ) -> Result<WorkflowReport, WorkflowError> {
        announce(WorkflowStep::Login);
        let login = self
            .login(credentials)
            .await
            .map_err(WorkflowError::at(WorkflowStep::Login))?;

        announce(WorkflowStep::CreatePatient);
        let patient = self
            .create_patient(&fixtures.patient)
            .await
            .map_err(WorkflowError::at(WorkflowStep::CreatePatient))?;
        let patient_id = created_id(&patient, WorkflowStep::CreatePatient)?;

        announce(WorkflowStep::AddProvider);
        let provider = self
            .add_provider(&fixtures.provider)
            .await
            .map_err(WorkflowError::at(WorkflowStep::AddProvider))?;
        let provider_id = created_id(&provider, WorkflowStep::AddProvider)?;

        announce(WorkflowStep::SetAvailability);
        let availability = self
            .set_availability(&provider_id, &fixtures.availability)
            .await
            .map_err(WorkflowError::at(WorkflowStep::SetAvailability))?;

        announce(WorkflowStep::BookAppointment);
        let appointment = self
            .book_appointment(&fixtures.appointment.for_pair(&patient_id, &provider_id))
            .await
            .map_err(WorkflowError::at(WorkflowStep::BookAppointment))?;

        announce(WorkflowStep::GetProviders);
        let providers = self
            .get_providers(PageQuery::DEFAULT_PAGE, PageQuery::DEFAULT_SIZE)
            .await
            .map_err(WorkflowError::at(WorkflowStep::GetProviders))?;

        announce(WorkflowStep::GetPatients);
        let patients = self
            .get_patients(PageQuery::DEFAULT_PAGE, PageQuery::DEFAULT_SIZE, None)
            .await
            .map_err(WorkflowError::at(WorkflowStep::GetPatients))?;

        announce(WorkflowStep::GetAvailabilitySettings);
        let availability_settings = self
            .get_availability_settings(&provider_id)
            .await
            .map_err(WorkflowError::at(WorkflowStep::GetAvailabilitySettings))?;

        info!(%patient_id, %provider_id, "workflow completed");

        Ok(WorkflowReport {
            patient_id,
            provider_id,
            login,
            patient,
            provider,
            availability,
            appointment,
            providers,
            patients,
            availability_settings,
        })
    }
}

fn announce(step: WorkflowStep) {
    info!(%step, "running workflow step");
}

fn created_id(response: &Value, step: WorkflowStep) -> Result<String, WorkflowError> {
    resource_id(response)
        .ok_or_else(|| WorkflowError::new(step, RestClientError::MissingField("data.id".into())))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report() -> WorkflowReport {
        WorkflowReport {
            patient_id: "pat-1".into(),
            provider_id: "7".into(),
            login: json!({ "data": { "accessToken": "jwt" } }),
            patient: json!({
                "data": { "id": "pat-1", "firstName": "Samuel", "lastName": "Peterson" }
            }),
            provider: json!({ "data": { "id": 7 } }),
            availability: json!({ "data": { "dayOfWeek": "MONDAY" } }),
            appointment: json!({
                "data": { "id": "apt-1", "patientId": "pat-1", "providerId": 7 }
            }),
            providers: json!({ "data": [{ "id": 7 }] }),
            patients: json!({ "data": [{ "id": "pat-1" }] }),
            availability_settings: json!({ "data": [{ "dayOfWeek": "MONDAY" }] }),
        }
    }

    #[test]
    fn test_verify_accepts_consistent_report() {
        assert_eq!(report().verify(&Fixtures::default()), Ok(()));
    }

    #[test]
    fn test_verify_flags_empty_payload() {
        let mut report = report();
        report.patients = json!({ "data": [] });

        assert_eq!(
            report.verify(&Fixtures::default()),
            Err(VerificationError::EmptyPayload {
                step: WorkflowStep::GetPatients
            })
        );
    }

    #[test]
    fn test_verify_flags_wrong_patient() {
        let mut report = report();
        report.patient = json!({
            "data": { "id": "pat-1", "firstName": "Sam", "lastName": "Peterson" }
        });

        assert!(matches!(
            report.verify(&Fixtures::default()),
            Err(VerificationError::PatientMismatch { .. })
        ));
    }

    #[test]
    fn test_verify_flags_appointment_mismatch() {
        let mut report = report();
        report.appointment = json!({ "data": { "patientId": "pat-1", "providerId": "8" } });

        assert_eq!(
            report.verify(&Fixtures::default()),
            Err(VerificationError::AppointmentMismatch {
                field: "providerId",
                expected: "7".into(),
                actual: Some("8".into()),
            })
        );
    }

    #[test]
    fn test_steps_are_ordered() {
        let names: Vec<_> = report().responses().iter().map(|(s, _)| *s).collect();
        assert_eq!(names, WorkflowStep::ALL.to_vec());
        assert_eq!(WorkflowStep::GetAvailabilitySettings.to_string(), "get_availability_settings");
    }

    #[test]
    fn test_workflow_error_names_step() {
        let error = WorkflowError::new(WorkflowStep::AddProvider, RestClientError::Unauthenticated);
        assert!(error.to_string().starts_with("workflow step `add_provider` failed"));
    }
}
