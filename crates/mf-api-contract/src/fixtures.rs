//! Demo payloads for the smoke workflow

use crate::types::*;
use serde::{Deserialize, Serialize};

pub const DEMO_PATIENT_FIRST_NAME: &str = "Samuel";
pub const DEMO_PATIENT_LAST_NAME: &str = "Peterson";
pub const DEMO_PATIENT_EMAIL: &str = "samuel.peterson@example.com";
pub const DEMO_PATIENT_PHONE: &str = "+1-555-0142";
pub const DEMO_PATIENT_DATE_OF_BIRTH: &str = "1985-04-12";
pub const DEMO_PATIENT_GENDER: &str = "MALE";
pub const DEMO_PATIENT_STREET: &str = "123 Main Street";
pub const DEMO_PATIENT_CITY: &str = "Springfield";
pub const DEMO_PATIENT_STATE: &str = "IL";
pub const DEMO_PATIENT_ZIP_CODE: &str = "62701";

pub const DEMO_PROVIDER_FIRST_NAME: &str = "Emily";
pub const DEMO_PROVIDER_LAST_NAME: &str = "Carter";
pub const DEMO_PROVIDER_EMAIL: &str = "emily.carter@example.com";
pub const DEMO_PROVIDER_PHONE: &str = "+1-555-0187";
pub const DEMO_PROVIDER_SPECIALIZATION: &str = "Cardiology";
pub const DEMO_PROVIDER_LICENSE_NUMBER: &str = "MD-448812";
pub const DEMO_PROVIDER_ROLE: &str = "PROVIDER";

pub const DEMO_AVAILABILITY_DAY: &str = "MONDAY";
pub const DEMO_AVAILABILITY_START: &str = "09:00";
pub const DEMO_AVAILABILITY_END: &str = "17:00";

pub const DEMO_APPOINTMENT_DATE: &str = "2025-12-01";
pub const DEMO_APPOINTMENT_TIME: &str = "10:00";
pub const DEMO_APPOINTMENT_REASON: &str = "Annual cardiology checkup";
pub const DEMO_APPOINTMENT_DURATION_MINUTES: u32 = 30;

pub fn demo_patient() -> PatientRequest {
    PatientRequest {
        first_name: DEMO_PATIENT_FIRST_NAME.into(),
        last_name: DEMO_PATIENT_LAST_NAME.into(),
        email: DEMO_PATIENT_EMAIL.into(),
        phone: DEMO_PATIENT_PHONE.into(),
        date_of_birth: DEMO_PATIENT_DATE_OF_BIRTH.into(),
        gender: DEMO_PATIENT_GENDER.into(),
        address: Address {
            street: DEMO_PATIENT_STREET.into(),
            city: DEMO_PATIENT_CITY.into(),
            state: DEMO_PATIENT_STATE.into(),
            zip_code: DEMO_PATIENT_ZIP_CODE.into(),
        },
    }
}

pub fn demo_provider() -> ProviderRequest {
    ProviderRequest {
        first_name: DEMO_PROVIDER_FIRST_NAME.into(),
        last_name: DEMO_PROVIDER_LAST_NAME.into(),
        email: DEMO_PROVIDER_EMAIL.into(),
        phone: DEMO_PROVIDER_PHONE.into(),
        specialization: DEMO_PROVIDER_SPECIALIZATION.into(),
        license_number: DEMO_PROVIDER_LICENSE_NUMBER.into(),
        role: DEMO_PROVIDER_ROLE.into(),
    }
}

pub fn demo_availability() -> AvailabilityRequest {
    AvailabilityRequest {
        day_of_week: DEMO_AVAILABILITY_DAY.into(),
        start_time: DEMO_AVAILABILITY_START.into(),
        end_time: DEMO_AVAILABILITY_END.into(),
        is_available: true,
    }
}

pub fn demo_appointment(
    patient_id: impl Into<String>,
    provider_id: impl Into<String>,
) -> AppointmentRequest {
    AppointmentTemplate::default().for_pair(patient_id, provider_id)
}

/// Appointment details minus the patient/provider pair, which is only known
/// once both have been created
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppointmentTemplate {
    pub appointment_date: String,
    pub appointment_time: String,
    pub reason: String,
    pub duration: u32,
}

impl Default for AppointmentTemplate {
    fn default() -> Self {
        Self {
            appointment_date: DEMO_APPOINTMENT_DATE.into(),
            appointment_time: DEMO_APPOINTMENT_TIME.into(),
            reason: DEMO_APPOINTMENT_REASON.into(),
            duration: DEMO_APPOINTMENT_DURATION_MINUTES,
        }
    }
}

impl AppointmentTemplate {
    pub fn for_pair(
        &self,
        patient_id: impl Into<String>,
        provider_id: impl Into<String>,
    ) -> AppointmentRequest {
        AppointmentRequest {
            patient_id: patient_id.into(),
            provider_id: provider_id.into(),
            appointment_date: self.appointment_date.clone(),
            appointment_time: self.appointment_time.clone(),
            reason: self.reason.clone(),
            duration: self.duration,
        }
    }
}

/// Payload set for one run of the complete workflow
///
/// `Fixtures::default()` is the demo scenario; individual payloads can be
/// swapped to reuse the workflow with other data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Fixtures {
    pub patient: PatientRequest,
    pub provider: ProviderRequest,
    pub availability: AvailabilityRequest,
    pub appointment: AppointmentTemplate,
}

impl Default for Fixtures {
    fn default() -> Self {
        Self {
            patient: demo_patient(),
            provider: demo_provider(),
            availability: demo_availability(),
            appointment: AppointmentTemplate::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn test_demo_payloads_are_valid() {
        assert!(demo_patient().validate().is_ok());
        assert!(demo_provider().validate().is_ok());
        assert!(demo_availability().validate().is_ok());
        assert!(demo_appointment("pat-1", "prov-1").validate().is_ok());
    }

    #[test]
    fn test_demo_patient_wire_shape() {
        let value = serde_json::to_value(demo_patient()).unwrap();

        assert_eq!(value["firstName"], "Samuel");
        assert_eq!(value["lastName"], "Peterson");
        assert_eq!(value["dateOfBirth"], DEMO_PATIENT_DATE_OF_BIRTH);
        assert_eq!(value["address"]["zipCode"], DEMO_PATIENT_ZIP_CODE);
    }

    #[test]
    fn test_template_keeps_ids_verbatim() {
        let appointment = AppointmentTemplate::default().for_pair("pat 7", "0042");
        let value = serde_json::to_value(&appointment).unwrap();

        assert_eq!(value["patientId"], "pat 7");
        assert_eq!(value["providerId"], "0042");
        assert_eq!(value["duration"], DEMO_APPOINTMENT_DURATION_MINUTES);
    }

    #[test]
    fn test_default_fixtures_use_demo_payloads() {
        let fixtures = Fixtures::default();

        assert_eq!(fixtures.patient, demo_patient());
        assert_eq!(fixtures.provider.role, DEMO_PROVIDER_ROLE);
        assert!(fixtures.availability.is_available);
    }
}
