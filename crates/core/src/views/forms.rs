//! Form models for the patient and visit dialogs.
//!
//! Fields hold raw input text. Conversion into request payloads is where validation happens,
//! so an invalid form never produces a payload.

use crate::error::FormError;
use crate::format::{
    format_date_to_yyyy_mm_dd, format_date_to_yyyy_mm_dd_in, parse_datetime_local,
    to_datetime_local, to_datetime_local_in, DATETIME_LOCAL_FORMAT,
};
use crate::models::{
    CreatePatientPayload, NewVisit, Patient, UpdatePatientPayload, Visit, VisitChanges,
    VisitStatus,
};
use crate::validation::{
    check_visit_time, check_visit_time_input, required, required_email, wall_clock_to_utc,
};
use chrono::{Local, NaiveDateTime, TimeZone};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientForm {
    pub first_name: String,
    pub last_name: String,
    /// `YYYY-MM-DD`, as produced by a date input.
    pub date_of_birth: String,
    pub phone_number: String,
    pub email: String,
}

impl PatientForm {
    /// Pre-fill the edit dialog from an existing patient.
    pub fn from_patient(patient: &Patient) -> Self {
        Self::with_date_of_birth(patient, format_date_to_yyyy_mm_dd(&patient.date_of_birth))
    }

    pub fn from_patient_in<Tz: TimeZone>(patient: &Patient, tz: &Tz) -> Self {
        Self::with_date_of_birth(patient, format_date_to_yyyy_mm_dd_in(&patient.date_of_birth, tz))
    }

    fn with_date_of_birth(patient: &Patient, date_of_birth: String) -> Self {
        Self {
            first_name: patient.first_name.clone(),
            last_name: patient.last_name.clone(),
            date_of_birth,
            phone_number: patient.phone_number.clone(),
            email: patient.email.clone(),
        }
    }

    /// Validate every field. The first violation wins.
    pub fn to_create_payload(&self) -> Result<CreatePatientPayload, FormError> {
        Ok(CreatePatientPayload {
            first_name: required("firstName", &self.first_name)?,
            last_name: required("lastName", &self.last_name)?,
            date_of_birth: required("dateOfBirth", &self.date_of_birth)?,
            phone_number: required("phoneNumber", &self.phone_number)?,
            email: required_email("email", &self.email)?,
        })
    }

    /// The edit dialog submits the whole form, so every field is validated and sent.
    pub fn to_update_payload(&self) -> Result<UpdatePatientPayload, FormError> {
        self.to_create_payload().map(UpdatePatientPayload::from)
    }
}

/// The add/edit visit dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisitForm {
    /// `datetime-local` value, wall-clock time.
    pub visit_date: String,
    pub diagnosis: String,
    pub status: VisitStatus,
    pub treatment: String,
    pub notes: String,
    local_error: Option<String>,
}

impl VisitForm {
    /// An empty form whose date defaults to `now`.
    pub fn for_new_visit(now: NaiveDateTime) -> Self {
        Self {
            visit_date: now.format(DATETIME_LOCAL_FORMAT).to_string(),
            diagnosis: String::new(),
            status: VisitStatus::default(),
            treatment: String::new(),
            notes: String::new(),
            local_error: None,
        }
    }

    pub fn from_visit(visit: &Visit) -> Self {
        Self::with_visit_date(visit, to_datetime_local(&visit.visit_date))
    }

    pub fn from_visit_in<Tz: TimeZone>(visit: &Visit, tz: &Tz) -> Self
    where
        Tz::Offset: std::fmt::Display,
    {
        Self::with_visit_date(visit, to_datetime_local_in(&visit.visit_date, tz))
    }

    fn with_visit_date(visit: &Visit, visit_date: String) -> Self {
        Self {
            visit_date,
            diagnosis: visit.diagnosis.clone(),
            status: visit.status,
            treatment: visit.treatment.clone(),
            notes: visit.notes.clone().unwrap_or_default(),
            local_error: None,
        }
    }

    /// Date input changed. The value is kept either way; a past time is flagged.
    pub fn set_visit_date(
        &mut self,
        value: impl Into<String>,
        now: NaiveDateTime,
    ) -> Result<(), FormError> {
        self.visit_date = value.into();
        let checked = match parse_datetime_local(&self.visit_date) {
            Some(selected) => check_visit_time(selected, now),
            None => Ok(()),
        };
        self.local_error = checked.as_ref().err().map(ToString::to_string);
        checked
    }

    /// The inline error shown under the date input.
    pub fn local_error(&self) -> Option<&str> {
        self.local_error.as_deref()
    }

    pub fn to_new_visit(
        &self,
        patient_id: &str,
        now: NaiveDateTime,
    ) -> Result<NewVisit, FormError> {
        self.to_new_visit_in(patient_id, now, &Local)
    }

    /// Build the create payload, re-checking that the visit is not in the past.
    pub fn to_new_visit_in<Tz: TimeZone>(
        &self,
        patient_id: &str,
        now: NaiveDateTime,
        tz: &Tz,
    ) -> Result<NewVisit, FormError> {
        let selected = check_visit_time_input(&self.visit_date, now)?;
        Ok(NewVisit {
            patient_id: patient_id.to_owned(),
            visit_date: wall_clock_to_utc(selected, tz)?,
            diagnosis: required("diagnosis", &self.diagnosis)?,
            status: self.status,
            treatment: required("treatment", &self.treatment)?,
            notes: self.notes_value(),
        })
    }

    pub fn to_changes(&self) -> Result<VisitChanges, FormError> {
        self.to_changes_in(&Local)
    }

    /// Build the update payload. Editing an existing visit does not re-check its time.
    ///
    /// Notes are always sent, so clearing them in the dialog clears them on the backend.
    pub fn to_changes_in<Tz: TimeZone>(&self, tz: &Tz) -> Result<VisitChanges, FormError> {
        let selected = parse_datetime_local(&self.visit_date)
            .ok_or_else(|| FormError::InvalidDateTime(self.visit_date.clone()))?;
        Ok(VisitChanges {
            visit_date: Some(wall_clock_to_utc(selected, tz)?),
            diagnosis: Some(required("diagnosis", &self.diagnosis)?),
            status: Some(self.status),
            treatment: Some(required("treatment", &self.treatment)?),
            notes: Some(self.notes.trim().to_owned()),
        })
    }

    fn notes_value(&self) -> Option<String> {
        let notes = self.notes.trim();
        (!notes.is_empty()).then(|| notes.to_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate, Utc};

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 1)
            .unwrap()
            .and_hms_opt(9, 30, 12)
            .unwrap()
    }

    fn filled_visit() -> VisitForm {
        let mut form = VisitForm::for_new_visit(now() + Duration::hours(1));
        form.diagnosis = "ОРВИ".into();
        form.treatment = "Покой".into();
        form
    }

    fn patient() -> Patient {
        Patient {
            id: "p-1".into(),
            first_name: "Анна".into(),
            last_name: "Иванова".into(),
            date_of_birth: "1990-04-12T00:00:00.000Z".into(),
            phone_number: "+79000000000".into(),
            email: "anna@example.com".into(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn new_visit_form_defaults() {
        let form = VisitForm::for_new_visit(now());
        assert_eq!(form.visit_date, "2024-03-01T09:30");
        assert_eq!(form.status, VisitStatus::Scheduled);
        assert_eq!(form.local_error(), None);
    }

    #[test]
    fn past_date_on_input_sets_inline_error() {
        let mut form = filled_visit();
        let yesterday = (now() - Duration::days(1)).format(DATETIME_LOCAL_FORMAT).to_string();

        assert_eq!(form.set_visit_date(yesterday.clone(), now()), Err(FormError::VisitInPast));
        assert_eq!(form.visit_date, yesterday);
        assert_eq!(
            form.local_error(),
            Some("Время визита не может быть в прошлом. Выберите будущее время.")
        );

        assert_eq!(form.set_visit_date("2024-03-02T10:00", now()), Ok(()));
        assert_eq!(form.local_error(), None);
    }

    #[test]
    fn submission_rechecks_time() {
        let mut form = filled_visit();
        form.visit_date = "2024-02-29T09:30".into();
        assert_eq!(
            form.to_new_visit_in("p-1", now(), &Utc),
            Err(FormError::VisitInPast)
        );
    }

    #[test]
    fn new_visit_payload_carries_patient_and_utc_date() {
        let mut form = filled_visit();
        form.notes = "  ".into();
        let visit = form.to_new_visit_in("p-1", now(), &Utc).unwrap();

        assert_eq!(visit.patient_id, "p-1");
        assert_eq!(visit.visit_date.to_rfc3339(), "2024-03-01T10:30:00+00:00");
        assert_eq!(visit.notes, None);
    }

    #[test]
    fn blank_diagnosis_is_required() {
        let mut form = filled_visit();
        form.diagnosis = " ".into();
        assert_eq!(
            form.to_new_visit_in("p-1", now(), &Utc),
            Err(FormError::Required { field: "diagnosis" })
        );
    }

    #[test]
    fn edit_does_not_check_futurity() {
        let visit = Visit {
            id: "v-1".into(),
            patient_id: "p-1".into(),
            visit_date: "2020-01-01T08:00:00Z".parse().unwrap(),
            diagnosis: "Грипп".into(),
            status: VisitStatus::Completed,
            treatment: "Отдых".into(),
            notes: Some("повторный".into()),
        };
        let form = VisitForm::from_visit_in(&visit, &Utc);
        assert_eq!(form.visit_date, "2020-01-01T08:00");

        let changes = form.to_changes_in(&Utc).unwrap();
        assert_eq!(changes.visit_date, Some(visit.visit_date));
        assert_eq!(changes.status, Some(VisitStatus::Completed));
        assert_eq!(changes.notes.as_deref(), Some("повторный"));
    }

    #[test]
    fn cleared_notes_are_sent_as_empty() {
        let mut form = filled_visit();
        form.notes = "старая заметка".into();
        form.notes.clear();

        let changes = form.to_changes_in(&Utc).unwrap();
        assert_eq!(changes.notes.as_deref(), Some(""));
        assert_eq!(serde_json::to_value(&changes).unwrap()["notes"], "");
    }

    #[test]
    fn patient_form_round_trips_existing_record() {
        let form = PatientForm::from_patient_in(&patient(), &Utc);
        assert_eq!(form.date_of_birth, "1990-04-12");

        let payload = form.to_update_payload().unwrap();
        assert_eq!(payload.first_name.as_deref(), Some("Анна"));
        assert_eq!(payload.date_of_birth.as_deref(), Some("1990-04-12"));
    }

    #[test]
    fn patient_form_rejects_blank_and_bad_email() {
        let mut form = PatientForm::from_patient_in(&patient(), &Utc);
        form.last_name.clear();
        assert_eq!(
            form.to_create_payload(),
            Err(FormError::Required { field: "lastName" })
        );

        let mut form = PatientForm::from_patient_in(&patient(), &Utc);
        form.email = "anna.example.com".into();
        assert_eq!(form.to_create_payload(), Err(FormError::InvalidEmail));
    }
}
