//! In-memory tables and the rules the backend enforces on them.

use crate::error::{MockError, MockResult};
use crate::model::{
    ListPatientsQuery, Patient, PatientPage, PatientReq, PatientWithVisits, Visit, VisitReq,
    VisitStatus,
};
use chrono::{DateTime, Utc};

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_LIMIT: u32 = 10;

/// Patients and visits, in insertion order.
#[derive(Debug, Default)]
pub struct Db {
    patients: Vec<Patient>,
    visits: Vec<Visit>,
}

impl Db {
    pub fn patients(&self) -> &[Patient] {
        &self.patients
    }

    pub fn visits(&self) -> &[Visit] {
        &self.visits
    }

    /// One page of patients matching `query.search`.
    ///
    /// The echoed page is clamped into the range the filtered result actually has.
    pub fn list_patients(&self, query: &ListPatientsQuery) -> PatientPage {
        let limit = query.limit.filter(|l| *l > 0).unwrap_or(DEFAULT_LIMIT);
        let needle = query
            .search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase);

        let matching: Vec<&Patient> = self
            .patients
            .iter()
            .filter(|p| match &needle {
                Some(n) => {
                    p.first_name.to_lowercase().contains(n.as_str())
                        || p.last_name.to_lowercase().contains(n.as_str())
                }
                None => true,
            })
            .collect();

        let total = matching.len() as u64;
        let total_pages = total.div_ceil(u64::from(limit)) as u32;
        let page = query
            .page
            .unwrap_or(DEFAULT_PAGE)
            .clamp(1, total_pages.max(1));

        let data = matching
            .into_iter()
            .skip(((page - 1) * limit) as usize)
            .take(limit as usize)
            .cloned()
            .collect();

        PatientPage {
            data,
            total,
            page,
            limit,
            total_pages,
        }
    }

    pub fn get_patient(&self, id: &str) -> MockResult<PatientWithVisits> {
        let patient = self.find_patient(id)?.clone();
        let visits = self.visits_of(id)?;
        Ok(PatientWithVisits { patient, visits })
    }

    pub fn create_patient(&mut self, req: PatientReq) -> MockResult<Patient> {
        let mut problems = Vec::new();
        let first_name = required("firstName", req.first_name, &mut problems);
        let last_name = required("lastName", req.last_name, &mut problems);
        let date_of_birth = required("dateOfBirth", req.date_of_birth, &mut problems);
        let phone_number = required("phoneNumber", req.phone_number, &mut problems);
        let email = required("email", req.email, &mut problems);
        if !email.is_empty() {
            check_email(&email, &mut problems);
        }
        if !problems.is_empty() {
            return Err(MockError::Validation(problems));
        }

        let now = Utc::now();
        let patient = Patient {
            id: uuid::Uuid::new_v4().to_string(),
            first_name,
            last_name,
            date_of_birth,
            phone_number,
            email,
            created_at: now,
            updated_at: now,
        };
        self.patients.push(patient.clone());
        Ok(patient)
    }

    /// Apply the fields present in `req`. Present fields must not be blank.
    pub fn update_patient(&mut self, id: &str, req: PatientReq) -> MockResult<Patient> {
        let mut problems = Vec::new();
        let first_name = present("firstName", req.first_name, &mut problems);
        let last_name = present("lastName", req.last_name, &mut problems);
        let date_of_birth = present("dateOfBirth", req.date_of_birth, &mut problems);
        let phone_number = present("phoneNumber", req.phone_number, &mut problems);
        let email = present("email", req.email, &mut problems);
        if let Some(email) = &email {
            check_email(email, &mut problems);
        }

        let patient = self
            .patients
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| MockError::patient_not_found(id))?;
        if !problems.is_empty() {
            return Err(MockError::Validation(problems));
        }

        set_if_some(&mut patient.first_name, first_name);
        set_if_some(&mut patient.last_name, last_name);
        set_if_some(&mut patient.date_of_birth, date_of_birth);
        set_if_some(&mut patient.phone_number, phone_number);
        set_if_some(&mut patient.email, email);
        patient.updated_at = Utc::now();
        Ok(patient.clone())
    }

    /// Remove a patient together with all of their visits.
    pub fn delete_patient(&mut self, id: &str) -> MockResult<()> {
        self.find_patient(id)?;
        self.patients.retain(|p| p.id != id);
        self.visits.retain(|v| v.patient_id != id);
        Ok(())
    }

    pub fn visits_of(&self, patient_id: &str) -> MockResult<Vec<Visit>> {
        self.find_patient(patient_id)?;
        Ok(self
            .visits
            .iter()
            .filter(|v| v.patient_id == patient_id)
            .cloned()
            .collect())
    }

    pub fn create_visit(&mut self, req: VisitReq) -> MockResult<Visit> {
        let mut problems = Vec::new();
        let patient_id = required("patientId", req.patient_id, &mut problems);
        let visit_date = required("visitDate", req.visit_date, &mut problems);
        let diagnosis = required("diagnosis", req.diagnosis, &mut problems);
        let treatment = required("treatment", req.treatment, &mut problems);
        let parsed_date = if visit_date.is_empty() {
            None
        } else {
            parse_date("visitDate", &visit_date, &mut problems)
        };

        let (Some(visit_date), true) = (parsed_date, problems.is_empty()) else {
            return Err(MockError::Validation(problems));
        };
        self.find_patient(&patient_id)?;

        let visit = Visit {
            id: uuid::Uuid::new_v4().to_string(),
            patient_id,
            visit_date,
            diagnosis,
            status: req.status.unwrap_or(VisitStatus::Scheduled),
            treatment,
            notes: req.notes.filter(|n| !n.trim().is_empty()),
        };
        self.visits.push(visit.clone());
        Ok(visit)
    }

    /// Apply the fields present in `req`. The owning patient cannot be changed.
    pub fn update_visit(&mut self, id: &str, req: VisitReq) -> MockResult<Visit> {
        let mut problems = Vec::new();
        let diagnosis = present("diagnosis", req.diagnosis, &mut problems);
        let treatment = present("treatment", req.treatment, &mut problems);
        let visit_date = present("visitDate", req.visit_date, &mut problems)
            .and_then(|raw| parse_date("visitDate", &raw, &mut problems));

        let visit = self
            .visits
            .iter_mut()
            .find(|v| v.id == id)
            .ok_or_else(|| MockError::visit_not_found(id))?;
        if !problems.is_empty() {
            return Err(MockError::Validation(problems));
        }

        set_if_some(&mut visit.visit_date, visit_date);
        set_if_some(&mut visit.diagnosis, diagnosis);
        set_if_some(&mut visit.treatment, treatment);
        set_if_some(&mut visit.status, req.status);
        if let Some(notes) = req.notes {
            visit.notes = Some(notes).filter(|n| !n.trim().is_empty());
        }
        Ok(visit.clone())
    }

    pub fn delete_visit(&mut self, id: &str) -> MockResult<()> {
        let before = self.visits.len();
        self.visits.retain(|v| v.id != id);
        if self.visits.len() == before {
            return Err(MockError::visit_not_found(id));
        }
        Ok(())
    }

    fn find_patient(&self, id: &str) -> MockResult<&Patient> {
        self.patients
            .iter()
            .find(|p| p.id == id)
            .ok_or_else(|| MockError::patient_not_found(id))
    }
}

fn required(field: &str, value: Option<String>, problems: &mut Vec<String>) -> String {
    let value = value.map(|v| v.trim().to_owned()).unwrap_or_default();
    if value.is_empty() {
        problems.push(format!("{field} should not be empty"));
    }
    value
}

fn present(field: &str, value: Option<String>, problems: &mut Vec<String>) -> Option<String> {
    let value = value?.trim().to_owned();
    if value.is_empty() {
        problems.push(format!("{field} should not be empty"));
    }
    Some(value)
}

fn check_email(email: &str, problems: &mut Vec<String>) {
    let valid = !email.chars().any(char::is_whitespace)
        && email.split_once('@').is_some_and(|(local, domain)| {
            !local.is_empty()
                && !domain.contains('@')
                && domain.split('.').count() > 1
                && domain.split('.').all(|label| !label.is_empty())
        });
    if !valid {
        problems.push("email must be an email".to_owned());
    }
}

fn parse_date(field: &str, raw: &str, problems: &mut Vec<String>) -> Option<DateTime<Utc>> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Some(dt.with_timezone(&Utc)),
        Err(_) => {
            problems.push(format!("{field} must be a valid ISO 8601 date string"));
            None
        }
    }
}

fn set_if_some<T>(slot: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *slot = value;
    }
}
