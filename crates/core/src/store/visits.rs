//! Visit slice.
//!
//! A placeholder kept for parity with the patient slice. It is not wired to the backend:
//! which visits it should hold (one patient's? all of them?) has never been decided, so
//! `fetch_visits` only simulates a round trip and yields nothing. Screens that show visits
//! use [`crate::views::VisitListView`] instead.

use crate::constants::VISIT_STORE_STUB_DELAY;
use crate::models::Visit;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitStoreState {
    pub visits: Vec<Visit>,
    pub is_loading: bool,
    pub error: Option<String>,
}

#[derive(Clone, Debug)]
pub struct VisitStore {
    state: Arc<watch::Sender<VisitStoreState>>,
}

impl VisitStore {
    pub fn new() -> Self {
        let (state, _) = watch::channel(VisitStoreState::default());
        Self {
            state: Arc::new(state),
        }
    }

    pub fn snapshot(&self) -> VisitStoreState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<VisitStoreState> {
        self.state.subscribe()
    }

    pub async fn fetch_visits(&self) {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        tracing::debug!("visit store is not connected to the backend, returning no visits");
        tokio::time::sleep(VISIT_STORE_STUB_DELAY).await;
        self.state.send_modify(|s| s.visits = Vec::new());

        self.state.send_modify(|s| s.is_loading = false);
    }
}

impl Default for VisitStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn stub_fetch_loads_then_yields_nothing() {
        let store = VisitStore::new();
        let mut rx = store.subscribe();

        let fetch = tokio::spawn({
            let store = store.clone();
            async move { store.fetch_visits().await }
        });

        rx.changed().await.unwrap();
        assert!(rx.borrow_and_update().is_loading);

        fetch.await.unwrap();
        let state = store.snapshot();
        assert!(!state.is_loading);
        assert!(state.visits.is_empty());
        assert_eq!(state.error, None);
    }
}
