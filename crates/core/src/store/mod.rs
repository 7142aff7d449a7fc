//! Application store.
//!
//! Two slices, patients and visits, combined into one explicitly constructed container.
//! There is no global instance: build an [`AppStore`] at startup and hand clones to whatever
//! needs it.

pub mod patients;
pub mod visits;

pub use patients::{PatientListState, PatientListStore};
pub use visits::{VisitStore, VisitStoreState};

use crate::client::ApiClient;

/// Combined view of every slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    pub patients: PatientListState,
    pub visits: VisitStoreState,
}

#[derive(Clone, Debug)]
pub struct AppStore {
    client: ApiClient,
    pub patients: PatientListStore,
    pub visits: VisitStore,
}

impl AppStore {
    pub fn new(client: ApiClient) -> Self {
        Self {
            patients: PatientListStore::new(client.clone()),
            visits: VisitStore::new(),
            client,
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn snapshot(&self) -> AppState {
        AppState {
            patients: self.patients.snapshot(),
            visits: self.visits.snapshot(),
        }
    }
}
