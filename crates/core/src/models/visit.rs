//! Visit records and request payloads.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle state of a visit. The set is closed: any other value is rejected on decode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VisitStatus {
    #[default]
    Scheduled,
    Completed,
    Canceled,
}

impl VisitStatus {
    pub const ALL: [VisitStatus; 3] = [
        VisitStatus::Scheduled,
        VisitStatus::Completed,
        VisitStatus::Canceled,
    ];

    /// Wire name, e.g. `SCHEDULED`.
    pub fn as_str(self) -> &'static str {
        match self {
            VisitStatus::Scheduled => "SCHEDULED",
            VisitStatus::Completed => "COMPLETED",
            VisitStatus::Canceled => "CANCELED",
        }
    }

    /// Label shown to staff.
    pub fn label(self) -> &'static str {
        match self {
            VisitStatus::Scheduled => "Запланирован",
            VisitStatus::Completed => "Завершён",
            VisitStatus::Canceled => "Отменён",
        }
    }
}

impl std::fmt::Display for VisitStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown visit status {0:?} (expected SCHEDULED, COMPLETED or CANCELED)")]
pub struct UnknownVisitStatus(pub String);

impl std::str::FromStr for VisitStatus {
    type Err = UnknownVisitStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        VisitStatus::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| UnknownVisitStatus(s.to_owned()))
    }
}

/// A visit as returned by the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Visit {
    pub id: String,
    pub patient_id: String,
    pub visit_date: DateTime<Utc>,
    pub diagnosis: String,
    pub status: VisitStatus,
    pub treatment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `POST /visits`. Carries the owning patient's id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewVisit {
    pub patient_id: String,
    pub visit_date: DateTime<Utc>,
    pub diagnosis: String,
    pub status: VisitStatus,
    pub treatment: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body of `PUT /visits/{id}`.
///
/// The visit id travels in the path only. Absent fields are not sent.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitChanges {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visit_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diagnosis: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<VisitStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub treatment: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl VisitChanges {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn status_uses_upper_case_wire_names() {
        assert_eq!(
            serde_json::to_value(VisitStatus::Canceled).unwrap(),
            json!("CANCELED")
        );
        assert!(serde_json::from_value::<VisitStatus>(json!("MISSED")).is_err());
        assert_eq!("completed".parse::<VisitStatus>(), Ok(VisitStatus::Completed));
        assert!("done".parse::<VisitStatus>().is_err());
    }

    #[test]
    fn visit_decodes_backend_shape() {
        let visit: Visit = serde_json::from_value(json!({
            "id": "v-1",
            "patientId": "p-1",
            "visitDate": "2024-03-01T09:30:00.000Z",
            "diagnosis": "ОРВИ",
            "status": "SCHEDULED",
            "treatment": "Покой"
        }))
        .unwrap();
        assert_eq!(visit.status, VisitStatus::Scheduled);
        assert_eq!(visit.notes, None);
    }

    #[test]
    fn visit_changes_never_carry_an_id() {
        let changes = VisitChanges {
            status: Some(VisitStatus::Completed),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_value(&changes).unwrap(),
            json!({ "status": "COMPLETED" })
        );
    }
}
