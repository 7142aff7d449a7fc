//! Debounced search input.
//!
//! The text buffer follows every keystroke immediately. The search itself is applied only
//! once the user has stopped typing for [`SEARCH_DEBOUNCE`]; every keystroke cancels and
//! restarts the pending timer.

use crate::constants::SEARCH_DEBOUNCE;
use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;
use tokio::task::JoinHandle;

/// Something that reacts to a settled search term.
pub trait SearchSink: Clone + Send + Sync + 'static {
    fn apply_search(&self, query: String) -> impl Future<Output = ()> + Send;
}

/// A cancellable trailing-edge timer.
///
/// Must be used from within a tokio runtime.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Mutex<Option<JoinHandle<()>>>,
}

impl Debouncer {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: Mutex::new(None),
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Run `action` once `delay` has elapsed without another call.
    ///
    /// A previously scheduled action that has not started yet is dropped. An action that
    /// already started keeps running; only the wait can be cancelled.
    pub fn call<F>(&self, action: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let delay = self.delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            tokio::spawn(action);
        });

        if let Some(previous) = self.lock().replace(timer) {
            previous.abort();
        }
    }

    /// Drop the pending action, if any.
    pub fn cancel(&self) {
        if let Some(pending) = self.lock().take() {
            pending.abort();
        }
    }

    pub fn is_pending(&self) -> bool {
        self.lock()
            .as_ref()
            .is_some_and(|pending| !pending.is_finished())
    }

    fn lock(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.pending
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

/// The search box above the patient table.
#[derive(Debug)]
pub struct SearchInput<S> {
    buffer: String,
    sink: S,
    debouncer: Debouncer,
}

impl<S: SearchSink> SearchInput<S> {
    pub fn new(sink: S, initial: impl Into<String>) -> Self {
        Self::with_delay(sink, initial, SEARCH_DEBOUNCE)
    }

    pub fn with_delay(sink: S, initial: impl Into<String>, delay: Duration) -> Self {
        Self {
            buffer: initial.into(),
            sink,
            debouncer: Debouncer::new(delay),
        }
    }

    /// What the text field shows right now.
    pub fn value(&self) -> &str {
        &self.buffer
    }

    /// A keystroke: update the buffer now, apply the search later.
    pub fn on_input(&mut self, text: impl Into<String>) {
        self.buffer = text.into();

        let sink = self.sink.clone();
        let query = self.buffer.clone();
        self.debouncer
            .call(async move { sink.apply_search(query).await });
    }

    /// Mirror a search term that changed elsewhere, without triggering a search.
    pub fn sync(&mut self, query: &str) {
        if self.buffer != query {
            self.buffer = query.to_owned();
        }
    }

    pub fn has_pending_search(&self) -> bool {
        self.debouncer.is_pending()
    }

    pub fn cancel(&self) {
        self.debouncer.cancel();
    }
}
