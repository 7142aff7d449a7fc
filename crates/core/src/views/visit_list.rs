//! Visit history of one patient: filters plus add, edit and delete.

use crate::client::ApiClient;
use crate::error::{ActionError, ActionResult};
use crate::messages;
use crate::models::{Visit, VisitStatus};
use crate::validation::local_now;
use crate::views::forms::VisitForm;
use crate::views::Prompter;
use chrono::{Local, NaiveDateTime, TimeZone};
use std::collections::HashSet;
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::watch;

/// Status filter of the visit table.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Only(VisitStatus),
}

impl StatusFilter {
    pub fn matches(self, status: VisitStatus) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Only(wanted) => wanted == status,
        }
    }
}

impl FromStr for StatusFilter {
    type Err = crate::models::visit::UnknownVisitStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(StatusFilter::All);
        }
        s.parse().map(StatusFilter::Only)
    }
}

/// Visits matching both filters, newest first.
///
/// `date` is a `YYYY-MM-DD` string compared with the calendar date of the stored UTC
/// timestamp; an empty `date` matches everything.
pub fn filter_visits(visits: &[Visit], status: StatusFilter, date: &str) -> Vec<Visit> {
    let date = date.trim();
    let mut shown: Vec<Visit> = visits
        .iter()
        .filter(|v| status.matches(v.status))
        .filter(|v| {
            date.is_empty() || v.visit_date.date_naive().format("%Y-%m-%d").to_string() == date
        })
        .cloned()
        .collect();
    shown.sort_by(|a, b| b.visit_date.cmp(&a.visit_date));
    shown
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisitListState {
    pub visits: Vec<Visit>,
    pub is_adding: bool,
    /// Visits with a delete request in flight.
    pub deleting: HashSet<String>,
    pub add_error: Option<String>,
    pub edit_error: Option<String>,
    pub status_filter: StatusFilter,
    pub date_filter: String,
}

impl VisitListState {
    pub fn displayed_visits(&self) -> Vec<Visit> {
        filter_visits(&self.visits, self.status_filter, &self.date_filter)
    }

    pub fn has_active_filter(&self) -> bool {
        self.status_filter != StatusFilter::All || !self.date_filter.trim().is_empty()
    }

    /// Text for an empty table, if nothing is displayed.
    pub fn empty_message(&self) -> Option<&'static str> {
        if !self.displayed_visits().is_empty() {
            return None;
        }
        if self.has_active_filter() {
            Some(messages::NO_VISITS_FOR_FILTER)
        } else {
            Some(messages::NO_VISITS_YET)
        }
    }
}

/// Controller for a patient's visit table.
#[derive(Clone)]
pub struct VisitListView {
    patient_id: String,
    client: ApiClient,
    prompter: Arc<dyn Prompter>,
    state: Arc<watch::Sender<VisitListState>>,
}

impl VisitListView {
    pub fn new(
        client: ApiClient,
        prompter: Arc<dyn Prompter>,
        patient_id: impl Into<String>,
        visits: Vec<Visit>,
    ) -> Self {
        let (state, _) = watch::channel(VisitListState {
            visits,
            ..VisitListState::default()
        });
        Self {
            patient_id: patient_id.into(),
            client,
            prompter,
            state: Arc::new(state),
        }
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn snapshot(&self) -> VisitListState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<VisitListState> {
        self.state.subscribe()
    }

    pub fn displayed_visits(&self) -> Vec<Visit> {
        self.state.borrow().displayed_visits()
    }

    pub fn empty_message(&self) -> Option<&'static str> {
        self.state.borrow().empty_message()
    }

    pub fn is_deleting(&self, visit_id: &str) -> bool {
        self.state.borrow().deleting.contains(visit_id)
    }

    pub fn set_status_filter(&self, filter: StatusFilter) {
        self.state.send_modify(|s| s.status_filter = filter);
    }

    pub fn set_date_filter(&self, date: impl Into<String>) {
        let date = date.into();
        self.state.send_modify(|s| s.date_filter = date);
    }

    pub(crate) fn replace_visits(&self, visits: Vec<Visit>) {
        self.state.send_modify(|s| s.visits = visits);
    }

    /// Reload the visits from the backend. Failures keep the current list and are only logged.
    pub async fn refresh(&self) {
        match self.client.list_visits_by_patient(&self.patient_id).await {
            Ok(visits) => self.replace_visits(visits),
            Err(err) => {
                tracing::warn!(patient_id = %self.patient_id, "failed to refresh visits: {:?}", err)
            }
        }
    }

    /// Submit the add-visit dialog, checked against the current local time.
    pub async fn add_visit(&self, form: &VisitForm) -> ActionResult<Visit> {
        self.add_visit_at(form, local_now(), &Local).await
    }

    /// Submit the add-visit dialog with an explicit clock and timezone.
    ///
    /// A visit in the past is rejected before any request is made.
    pub async fn add_visit_at<Tz: TimeZone>(
        &self,
        form: &VisitForm,
        now: NaiveDateTime,
        tz: &Tz,
    ) -> ActionResult<Visit> {
        self.state.send_modify(|s| {
            s.add_error = None;
            s.is_adding = true;
        });

        let result = match form.to_new_visit_in(&self.patient_id, now, tz) {
            Ok(payload) => self.client.create_visit(&payload).await.map_err(|err| {
                tracing::error!(patient_id = %self.patient_id, "failed to add visit: {:?}", err);
                ActionError::from_api(&err, messages::UNKNOWN_ERROR)
            }),
            Err(invalid) => Err(invalid.into()),
        };

        if result.is_ok() {
            self.refresh().await;
            self.prompter.notify(messages::VISIT_ADDED);
        }

        self.state.send_modify(|s| {
            s.is_adding = false;
            if let Err(err) = &result {
                s.add_error = Some(err.message.clone());
            }
        });
        result
    }

    /// Save an edited visit. The time is not re-checked against the clock.
    pub async fn update_visit(&self, visit_id: &str, form: &VisitForm) -> ActionResult<Visit> {
        self.state.send_modify(|s| s.edit_error = None);

        let result = self.try_update(visit_id, form).await;
        if let Err(err) = &result {
            self.state
                .send_modify(|s| s.edit_error = Some(err.message.clone()));
        }
        result
    }

    async fn try_update(&self, visit_id: &str, form: &VisitForm) -> ActionResult<Visit> {
        if visit_id.trim().is_empty() {
            return Err(ActionError::validation(messages::VISIT_ID_MISSING));
        }
        let changes = form.to_changes()?;

        let visit = self
            .client
            .update_visit(visit_id, &changes)
            .await
            .map_err(|err| {
                tracing::error!(visit_id, "failed to update visit: {:?}", err);
                ActionError::from_api(&err, messages::UNKNOWN_ERROR)
            })?;

        self.prompter.notify(messages::VISIT_UPDATED);
        self.refresh().await;
        Ok(visit)
    }

    /// Delete a visit after confirmation. Returns `Ok(false)` when the user declined.
    ///
    /// Several deletes may run at once; each visit's in-flight flag is tracked separately.
    pub async fn delete_visit(&self, visit_id: &str) -> ActionResult<bool> {
        if !self.prompter.confirm(messages::CONFIRM_DELETE_VISIT) {
            return Ok(false);
        }

        self.state.send_modify(|s| {
            s.deleting.insert(visit_id.to_owned());
        });

        let result = match self.client.delete_visit(visit_id).await {
            Ok(()) => {
                self.refresh().await;
                Ok(true)
            }
            Err(err) => {
                tracing::error!(visit_id, "failed to delete visit: {:?}", err);
                let action = ActionError::from_api(&err, messages::UNKNOWN_ERROR);
                self.prompter.notify(&format!(
                    "{}: {}",
                    messages::VISIT_DELETE_FAILED_PREFIX,
                    action.message
                ));
                Err(action)
            }
        };

        self.state.send_modify(|s| {
            s.deleting.remove(visit_id);
        });
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn visit(id: &str, date: &str, status: VisitStatus) -> Visit {
        Visit {
            id: id.into(),
            patient_id: "p-1".into(),
            visit_date: date.parse().unwrap(),
            diagnosis: "ОРВИ".into(),
            status,
            treatment: "Покой".into(),
            notes: None,
        }
    }

    fn sample() -> Vec<Visit> {
        vec![
            visit("a", "2024-01-05T10:00:00Z", VisitStatus::Completed),
            visit("b", "2024-03-01T09:30:00Z", VisitStatus::Scheduled),
            visit("c", "2024-01-05T23:30:00Z", VisitStatus::Canceled),
        ]
    }

    fn ids(visits: &[Visit]) -> Vec<&str> {
        visits.iter().map(|v| v.id.as_str()).collect()
    }

    #[test]
    fn unfiltered_is_newest_first() {
        let shown = filter_visits(&sample(), StatusFilter::All, "");
        assert_eq!(ids(&shown), ["b", "c", "a"]);
    }

    #[test]
    fn date_filter_uses_utc_calendar_day() {
        let shown = filter_visits(&sample(), StatusFilter::All, "2024-01-05");
        assert_eq!(ids(&shown), ["c", "a"]);
        assert!(filter_visits(&sample(), StatusFilter::All, "2024-01-06").is_empty());
    }

    #[test]
    fn status_and_date_combine() {
        let only_completed = StatusFilter::Only(VisitStatus::Completed);
        let shown = filter_visits(&sample(), only_completed, "2024-01-05");
        assert_eq!(ids(&shown), ["a"]);
    }

    #[test]
    fn status_filter_parses() {
        assert_eq!("all".parse::<StatusFilter>().ok(), Some(StatusFilter::All));
        assert_eq!(
            "CANCELED".parse::<StatusFilter>().ok(),
            Some(StatusFilter::Only(VisitStatus::Canceled))
        );
        assert!("missed".parse::<StatusFilter>().is_err());
    }

    #[test]
    fn empty_messages() {
        let mut state = VisitListState::default();
        assert_eq!(state.empty_message(), Some("У этого пациента пока нет визитов."));

        state.visits = sample();
        assert_eq!(state.empty_message(), None);

        state.date_filter = "1999-01-01".into();
        assert_eq!(
            state.empty_message(),
            Some("Нет визитов с выбранными критериями фильтрации.")
        );
    }

    fn arb_status() -> impl Strategy<Value = VisitStatus> {
        prop::sample::select(VisitStatus::ALL.to_vec())
    }

    proptest! {
        #[test]
        fn filtered_is_sorted_subset(
            entries in prop::collection::vec((0i64..2_000_000_000, arb_status()), 0..30),
            wanted in prop::option::of(arb_status()),
        ) {
            let visits: Vec<Visit> = entries
                .iter()
                .enumerate()
                .map(|(i, (secs, status))| Visit {
                    id: i.to_string(),
                    patient_id: "p".into(),
                    visit_date: chrono::DateTime::from_timestamp(*secs, 0).unwrap(),
                    diagnosis: String::new(),
                    status: *status,
                    treatment: String::new(),
                    notes: None,
                })
                .collect();
            let filter = wanted.map_or(StatusFilter::All, StatusFilter::Only);

            let shown = filter_visits(&visits, filter, "");

            prop_assert!(shown.windows(2).all(|w| w[0].visit_date >= w[1].visit_date));
            prop_assert!(shown.iter().all(|v| filter.matches(v.status)));
            let expected = visits.iter().filter(|v| filter.matches(v.status)).count();
            prop_assert_eq!(shown.len(), expected);
        }
    }
}
