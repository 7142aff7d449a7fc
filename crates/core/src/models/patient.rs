//! Patient records and request payloads.

use crate::models::visit::Visit;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A patient as returned by the list endpoint.
///
/// `date_of_birth` is kept as the backend sent it; depending on the backend it is either
/// a plain date or a full ISO timestamp. See [`crate::format`] for display helpers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Patient {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub phone_number: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Patient {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

/// A patient together with their visits, as returned by `GET /patients/{id}`.
///
/// Every visit is expected to carry this patient's id. That is trusted from the backend,
/// not re-checked here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatientDetail {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub phone_number: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(default)]
    pub visits: Vec<Visit>,
}

impl PatientDetail {
    /// Split into the patient record and its visits.
    pub fn into_parts(self) -> (Patient, Vec<Visit>) {
        let patient = Patient {
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            date_of_birth: self.date_of_birth,
            phone_number: self.phone_number,
            email: self.email,
            created_at: self.created_at,
            updated_at: self.updated_at,
        };
        (patient, self.visits)
    }

    /// The patient record without visits.
    pub fn patient(&self) -> Patient {
        self.clone().into_parts().0
    }
}

/// Body of `POST /patients`. All fields are required.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePatientPayload {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: String,
    pub phone_number: String,
    pub email: String,
}

/// Body of `PUT /patients/{id}`.
///
/// Only fields that are `Some` are sent. The backend leaves the others untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePatientPayload {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_of_birth: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl UpdatePatientPayload {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

impl From<CreatePatientPayload> for UpdatePatientPayload {
    fn from(full: CreatePatientPayload) -> Self {
        Self {
            first_name: Some(full.first_name),
            last_name: Some(full.last_name),
            date_of_birth: Some(full.date_of_birth),
            phone_number: Some(full.phone_number),
            email: Some(full.email),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn detail_without_visits_defaults_to_empty() {
        let detail: PatientDetail = serde_json::from_value(json!({
            "id": "p-1",
            "firstName": "Анна",
            "lastName": "Иванова",
            "dateOfBirth": "1990-04-12T00:00:00.000Z",
            "phoneNumber": "+79000000000",
            "email": "anna@example.com",
            "createdAt": "2024-01-05T10:00:00.000Z",
            "updatedAt": "2024-01-06T10:00:00.000Z"
        }))
        .unwrap();

        assert!(detail.visits.is_empty());
        let (patient, visits) = detail.into_parts();
        assert_eq!(patient.full_name(), "Анна Иванова");
        assert!(visits.is_empty());
    }

    #[test]
    fn partial_update_only_serialises_present_fields() {
        let changes = UpdatePatientPayload {
            phone_number: Some("+7 900 123".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&changes).unwrap(),
            json!({ "phoneNumber": "+7 900 123" })
        );
        assert!(UpdatePatientPayload::default().is_empty());
        assert!(!changes.is_empty());
    }
}
