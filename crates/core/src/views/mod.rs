//! Screen controllers.
//!
//! Each view owns the transient UI state of one screen (open forms, error banners, in-flight
//! flags) and drives the store and the API client. Rendering is left to the front end; views
//! only expose snapshots and change notifications.

pub mod forms;
pub mod patient_detail;
pub mod patient_list;
pub mod visit_list;

pub use forms::{PatientForm, VisitForm};
pub use patient_detail::{PatientDetailState, PatientDetailView, Screen};
pub use patient_list::{PageItem, PatientColumn, PatientListView, PatientListViewState};
pub use visit_list::{StatusFilter, VisitListState, VisitListView};

/// Blocking user interaction: confirmations and notices.
///
/// Deletions ask through [`Prompter::confirm`] and send nothing unless it returns `true`.
pub trait Prompter: Send + Sync {
    fn confirm(&self, question: &str) -> bool;

    /// Show a one-off message, e.g. after a successful save.
    fn notify(&self, message: &str);
}
