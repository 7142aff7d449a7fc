//! Patient list slice: the paginated, searchable patient collection.

use crate::client::ApiClient;
use crate::constants::{DEFAULT_ITEMS_PER_PAGE, FIRST_PAGE};
use crate::error::{ActionError, ActionResult};
use crate::messages;
use crate::models::{Patient, PatientQuery};
use crate::search::SearchSink;
use std::sync::Arc;
use tokio::sync::watch;

/// Everything the patient table renders from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientListState {
    pub patients: Vec<Patient>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// 1-based.
    pub current_page: u32,
    pub items_per_page: u32,
    pub total_patients: u64,
    pub total_pages: u32,
    pub search_query: String,
}

impl Default for PatientListState {
    fn default() -> Self {
        Self {
            patients: Vec::new(),
            is_loading: false,
            error: None,
            current_page: FIRST_PAGE,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
            total_patients: 0,
            total_pages: 0,
            search_query: String::new(),
        }
    }
}

/// Holds [`PatientListState`] and the operations that change it.
///
/// Cloning gives another handle to the same state. Observers call [`subscribe`] and are
/// woken on every change.
///
/// [`subscribe`]: PatientListStore::subscribe
#[derive(Clone, Debug)]
pub struct PatientListStore {
    client: ApiClient,
    state: Arc<watch::Sender<PatientListState>>,
}

impl PatientListStore {
    pub fn new(client: ApiClient) -> Self {
        let (state, _) = watch::channel(PatientListState::default());
        Self {
            client,
            state: Arc::new(state),
        }
    }

    pub fn snapshot(&self) -> PatientListState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PatientListState> {
        self.state.subscribe()
    }

    /// Fetch a page of patients.
    ///
    /// Any argument left as `None` reuses the value currently in state, so callers can ask for
    /// "page 3" without resupplying the limit and search. On success the whole list tuple is
    /// replaced at once with what the backend echoed; the search term is the one that was
    /// requested. On failure the previous list stays and `error` holds the resolved message.
    /// `is_loading` is cleared in every case.
    pub async fn fetch_patients(
        &self,
        page: Option<u32>,
        limit: Option<u32>,
        search: Option<String>,
    ) -> ActionResult<()> {
        let (page, limit, search) = {
            let current = self.state.borrow();
            (
                page.unwrap_or(current.current_page),
                limit.unwrap_or(current.items_per_page),
                search.unwrap_or_else(|| current.search_query.clone()),
            )
        };

        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        let query = PatientQuery::new(Some(page), Some(limit), Some(search.clone()));
        let result = match self.client.list_patients(&query).await {
            Ok(response) => {
                self.state.send_modify(|s| {
                    s.patients = response.data;
                    s.total_patients = response.total;
                    s.current_page = response.page;
                    s.items_per_page = response.limit;
                    s.total_pages = response.total_pages;
                    s.search_query = search;
                });
                Ok(())
            }
            Err(err) => {
                tracing::error!(error = %err, page, limit, "failed to fetch patients");
                let action = ActionError::from_api(&err, messages::PATIENTS_LOAD_FAILED);
                self.state
                    .send_modify(|s| s.error = Some(action.message.clone()));
                Err(action)
            }
        };

        self.state.send_modify(|s| s.is_loading = false);
        result
    }

    /// Move to `page`, keeping the stored limit and search.
    pub async fn set_current_page(&self, page: u32) -> ActionResult<()> {
        self.state.send_modify(|s| s.current_page = page);
        self.fetch_patients(Some(page), None, None).await
    }

    /// Apply a new search term. The page always resets to the first one so the request can
    /// never ask for a page the new filter does not have.
    pub async fn set_search_query(&self, query: String) -> ActionResult<()> {
        self.state.send_modify(|s| {
            s.search_query = query.clone();
            s.current_page = FIRST_PAGE;
        });
        self.fetch_patients(Some(FIRST_PAGE), None, Some(query)).await
    }
}

impl SearchSink for PatientListStore {
    async fn apply_search(&self, query: String) {
        // The failure is already recorded in state for the table to show.
        let _ = self.set_search_query(query).await;
    }
}
