//! Wire types exchanged with the REST backend.
//!
//! Field names follow the backend's camelCase JSON. Server-assigned values (ids,
//! timestamps) only appear on read types, never on request payloads.

pub mod pagination;
pub mod patient;
pub mod visit;

pub use pagination::{Paginated, PatientQuery};
pub use patient::{CreatePatientPayload, Patient, PatientDetail, UpdatePatientPayload};
pub use visit::{NewVisit, Visit, VisitChanges, VisitStatus};
