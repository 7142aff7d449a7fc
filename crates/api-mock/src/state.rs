//! Shared server state: the tables, a log of received requests and injected failures.

use crate::db::Db;
use crate::model::{Patient, PatientReq, Visit, VisitReq, VisitStatus};
use axum::extract::Query;
use axum::http::{StatusCode, Uri};
use chrono::{Duration, Utc};
use std::sync::{Arc, Mutex, MutexGuard};

/// A request as the server received it.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<serde_json::Value>,
}

impl RecordedRequest {
    /// Decoded query pairs, in order.
    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let Some(query) = self.query.as_deref() else {
            return Vec::new();
        };
        format!("{}?{}", self.path, query)
            .parse::<Uri>()
            .ok()
            .and_then(|uri| Query::<Vec<(String, String)>>::try_from_uri(&uri).ok())
            .map(|Query(pairs)| pairs)
            .unwrap_or_default()
    }

    /// Value of the query parameter `key`, if sent.
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.query_pairs()
            .into_iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }
}

/// A canned response returned instead of running the next handler.
#[derive(Debug, Clone)]
pub struct InjectedFailure {
    pub status: StatusCode,
    pub body: serde_json::Value,
}

#[derive(Clone, Default)]
pub struct MockState {
    db: Arc<Mutex<Db>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
    failures: Arc<Mutex<Vec<InjectedFailure>>>,
}

impl MockState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn db(&self) -> MutexGuard<'_, Db> {
        lock(&self.db)
    }

    /// Every API request received so far, oldest first.
    pub fn requests(&self) -> Vec<RecordedRequest> {
        lock(&self.requests).clone()
    }

    pub fn clear_requests(&self) {
        lock(&self.requests).clear();
    }

    pub(crate) fn record(&self, request: RecordedRequest) {
        lock(&self.requests).push(request);
    }

    /// Answer the next API request with `status` and `body`. Queued failures are used in order.
    pub fn fail_next(&self, status: StatusCode, body: serde_json::Value) {
        lock(&self.failures).push(InjectedFailure { status, body });
    }

    pub(crate) fn take_failure(&self) -> Option<InjectedFailure> {
        let mut failures = lock(&self.failures);
        (!failures.is_empty()).then(|| failures.remove(0))
    }

    /// Insert `count` patients named `Patient{i} Test{i}`.
    pub fn seed_patients(&self, count: usize) -> Vec<Patient> {
        let mut db = self.db();
        (0..count)
            .filter_map(|i| {
                db.create_patient(PatientReq {
                    first_name: Some(format!("Patient{i}")),
                    last_name: Some(format!("Test{i}")),
                    date_of_birth: Some("1980-01-01".into()),
                    phone_number: Some(format!("+7900000{i:04}")),
                    email: Some(format!("patient{i}@example.com")),
                })
                .ok()
            })
            .collect()
    }

    /// A handful of realistic patients with past and upcoming visits.
    pub fn seed_demo(&self) {
        let people = [
            ("Анна", "Иванова", "1990-04-12", "+79161234567", "anna.ivanova@example.com"),
            ("Иван", "Петров", "1985-11-03", "+79031112233", "ivan.petrov@example.com"),
            ("Мария", "Смирнова", "1972-06-25", "+79265554433", "maria.smirnova@example.com"),
            ("Дмитрий", "Кузнецов", "2001-02-17", "+79857778899", "d.kuznetsov@example.com"),
            ("Елена", "Попова", "1968-09-30", "+79094445566", "elena.popova@example.com"),
            ("Алексей", "Соколов", "1995-12-08", "+79153332211", "a.sokolov@example.com"),
        ];

        let mut db = self.db();
        let now = Utc::now();
        for (i, (first, last, dob, phone, email)) in people.into_iter().enumerate() {
            let Ok(patient) = db.create_patient(PatientReq {
                first_name: Some(first.into()),
                last_name: Some(last.into()),
                date_of_birth: Some(dob.into()),
                phone_number: Some(phone.into()),
                email: Some(email.into()),
            }) else {
                continue;
            };

            let offset = i64::try_from(i).unwrap_or_default();
            let visits = [
                (
                    now - Duration::days(30 + offset),
                    VisitStatus::Completed,
                    "ОРВИ",
                    "Покой, обильное питьё",
                ),
                (
                    now + Duration::days(7 + offset),
                    VisitStatus::Scheduled,
                    "Плановый осмотр",
                    "Осмотр терапевта",
                ),
            ];
            for (date, status, diagnosis, treatment) in visits {
                let created = db.create_visit(VisitReq {
                    patient_id: Some(patient.id.clone()),
                    visit_date: Some(date.to_rfc3339()),
                    diagnosis: Some(diagnosis.into()),
                    status: Some(status),
                    treatment: Some(treatment.into()),
                    notes: None,
                });
                if let Err(err) = created {
                    tracing::warn!("failed to seed visit: {:?}", err);
                }
            }
        }
    }

    pub fn visits(&self) -> Vec<Visit> {
        self.db().visits().to_vec()
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}
