//! The patient table screen: search box, paginated table, add and delete.

use crate::client::ApiClient;
use crate::constants::{FIRST_PAGE, MAX_VISIBLE_PAGES, TRUNCATED_ID_LEN};
use crate::error::{ActionError, ActionResult};
use crate::format::format_short_date_in;
use crate::messages;
use crate::models::Patient;
use crate::routes::Route;
use crate::search::SearchInput;
use crate::store::{AppStore, PatientListStore};
use crate::validation::page_in_range;
use crate::views::forms::PatientForm;
use crate::views::Prompter;
use chrono::{DateTime, Datelike, Local, TimeZone, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;

/// One entry of the pager.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageItem {
    Page { number: u32, active: bool },
    Ellipsis,
}

/// Pager entries for `current` out of `total_pages`.
///
/// At most [`MAX_VISIBLE_PAGES`] consecutive pages are listed, centred on `current` where
/// possible. When the window does not reach an end, a link to that end is added, with an
/// ellipsis if pages are skipped in between.
pub fn page_window(current: u32, total_pages: u32) -> Vec<PageItem> {
    let max = i64::from(MAX_VISIBLE_PAGES);
    let total = i64::from(total_pages);
    let current = i64::from(current);

    let mut start = (current - max / 2).max(1);
    let end = (start + max - 1).min(total);
    if end - start + 1 < max {
        start = (end - max + 1).max(1);
    }

    let page = |n: i64| PageItem::Page {
        number: n as u32,
        active: n == current,
    };

    let mut items = Vec::new();
    if start > 1 {
        items.push(page(1));
        if start > 2 {
            items.push(PageItem::Ellipsis);
        }
    }
    items.extend((start..=end).map(page));
    if end < total {
        if end < total - 1 {
            items.push(PageItem::Ellipsis);
        }
        items.push(page(total));
    }
    items
}

/// A column of the patient table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PatientColumn {
    Id,
    FirstName,
    LastName,
    DateOfBirth,
    PhoneNumber,
    Email,
    CreatedAt,
    UpdatedAt,
    Actions,
}

impl PatientColumn {
    /// Columns shown when there are no rows to take them from.
    pub const DEFAULT: [PatientColumn; 6] = [
        PatientColumn::Id,
        PatientColumn::FirstName,
        PatientColumn::LastName,
        PatientColumn::Email,
        PatientColumn::PhoneNumber,
        PatientColumn::Actions,
    ];

    /// Every column, in record field order.
    pub const ALL: [PatientColumn; 9] = [
        PatientColumn::Id,
        PatientColumn::FirstName,
        PatientColumn::LastName,
        PatientColumn::DateOfBirth,
        PatientColumn::PhoneNumber,
        PatientColumn::Email,
        PatientColumn::CreatedAt,
        PatientColumn::UpdatedAt,
        PatientColumn::Actions,
    ];

    pub fn key(self) -> &'static str {
        match self {
            PatientColumn::Id => "id",
            PatientColumn::FirstName => "firstName",
            PatientColumn::LastName => "lastName",
            PatientColumn::DateOfBirth => "dateOfBirth",
            PatientColumn::PhoneNumber => "phoneNumber",
            PatientColumn::Email => "email",
            PatientColumn::CreatedAt => "createdAt",
            PatientColumn::UpdatedAt => "updatedAt",
            PatientColumn::Actions => "actions",
        }
    }

    pub fn header(self) -> &'static str {
        match self {
            PatientColumn::Id => "ID",
            PatientColumn::FirstName => "Имя",
            PatientColumn::LastName => "Фамилия",
            PatientColumn::DateOfBirth => "Дата рождения",
            PatientColumn::PhoneNumber => "Телефон",
            PatientColumn::Email => "Email",
            PatientColumn::CreatedAt => "Создано",
            PatientColumn::UpdatedAt => "Обновлено",
            PatientColumn::Actions => "Действия",
        }
    }
}

/// Columns for the current rows: every record field once there is data, a short default
/// set otherwise. The actions column is always last.
pub fn column_keys(patients: &[Patient]) -> Vec<PatientColumn> {
    if patients.is_empty() {
        PatientColumn::DEFAULT.to_vec()
    } else {
        PatientColumn::ALL.to_vec()
    }
}

pub fn format_cell_value(column: PatientColumn, patient: &Patient) -> String {
    format_cell_value_in(column, patient, &Local)
}

/// Text of one table cell. The actions column has no text.
pub fn format_cell_value_in<Tz: TimeZone>(
    column: PatientColumn,
    patient: &Patient,
    tz: &Tz,
) -> String {
    let short = |dt: &DateTime<Utc>| {
        let local = dt.with_timezone(tz);
        format!("{:02}.{:02}.{:04}", local.day(), local.month(), local.year())
    };

    match column {
        PatientColumn::Id => {
            let head: String = patient.id.chars().take(TRUNCATED_ID_LEN).collect();
            format!("{head}...")
        }
        PatientColumn::FirstName => patient.first_name.clone(),
        PatientColumn::LastName => patient.last_name.clone(),
        PatientColumn::DateOfBirth => format_short_date_in(&patient.date_of_birth, tz),
        PatientColumn::PhoneNumber => patient.phone_number.clone(),
        PatientColumn::Email => patient.email.clone(),
        PatientColumn::CreatedAt => short(&patient.created_at),
        PatientColumn::UpdatedAt => short(&patient.updated_at),
        PatientColumn::Actions => String::new(),
    }
}

/// Screen-local state that does not belong in the shared store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PatientListViewState {
    /// Error shown inside the add-patient dialog.
    pub modal_error: Option<String>,
    /// Error shown above the table after a failed delete.
    pub delete_error: Option<String>,
    pub is_submitting: bool,
    /// Patients with a delete request in flight.
    pub deleting: HashSet<String>,
}

/// Controller for the patient table.
#[derive(Clone)]
pub struct PatientListView {
    store: PatientListStore,
    client: ApiClient,
    prompter: Arc<dyn Prompter>,
    state: Arc<watch::Sender<PatientListViewState>>,
}

impl PatientListView {
    pub fn new(app: &AppStore, prompter: Arc<dyn Prompter>) -> Self {
        let (state, _) = watch::channel(PatientListViewState::default());
        Self {
            store: app.patients.clone(),
            client: app.client().clone(),
            prompter,
            state: Arc::new(state),
        }
    }

    pub fn store(&self) -> &PatientListStore {
        &self.store
    }

    pub fn snapshot(&self) -> PatientListViewState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PatientListViewState> {
        self.state.subscribe()
    }

    /// Initial load: the page, limit and search already in the store.
    pub async fn load(&self) -> ActionResult<()> {
        self.store.fetch_patients(None, None, None).await
    }

    /// A search box bound to this table, showing the current search term.
    pub fn search_input(&self) -> SearchInput<PatientListStore> {
        let current = self.store.snapshot().search_query;
        SearchInput::new(self.store.clone(), current)
    }

    /// Go to `page`. Pages outside the known range are ignored.
    pub async fn change_page(&self, page: u32) -> ActionResult<()> {
        let total_pages = self.store.snapshot().total_pages;
        if !page_in_range(page, total_pages) {
            tracing::debug!(page, total_pages, "ignoring out-of-range page");
            return Ok(());
        }
        self.store.set_current_page(page).await
    }

    pub fn pagination_items(&self) -> Vec<PageItem> {
        let state = self.store.snapshot();
        page_window(state.current_page, state.total_pages)
    }

    pub fn column_keys(&self) -> Vec<PatientColumn> {
        column_keys(&self.store.snapshot().patients)
    }

    /// Text for an empty table, if the table is empty and not loading.
    pub fn empty_message(&self) -> Option<&'static str> {
        let state = self.store.snapshot();
        if state.is_loading || !state.patients.is_empty() || state.search_query.is_empty() {
            return None;
        }
        Some(messages::NO_PATIENTS_FOR_QUERY)
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        self.state.borrow().deleting.contains(id)
    }

    pub fn open_patient(&self, id: &str) -> Route {
        Route::PatientDetail(id.to_owned())
    }

    /// Submit the add-patient dialog.
    ///
    /// On success the table reloads from the first page under the current search.
    pub async fn create_patient(&self, form: &PatientForm) -> ActionResult<Patient> {
        self.state.send_modify(|s| {
            s.modal_error = None;
            s.is_submitting = true;
        });

        let result = self.try_create(form).await;
        self.state.send_modify(|s| {
            s.is_submitting = false;
            if let Err(err) = &result {
                s.modal_error = Some(err.message.clone());
            }
        });
        result
    }

    async fn try_create(&self, form: &PatientForm) -> ActionResult<Patient> {
        let payload = form.to_create_payload()?;
        let patient = self.client.create_patient(&payload).await.map_err(|err| {
            tracing::error!("failed to create patient: {:?}", err);
            ActionError::from_api(&err, messages::UNKNOWN_ERROR)
        })?;

        self.reload_first_page().await;
        self.prompter.notify(messages::PATIENT_ADDED);
        Ok(patient)
    }

    /// Delete a patient after confirmation.
    ///
    /// Returns `Ok(false)` when the user declined; nothing is sent in that case.
    pub async fn delete_patient(&self, id: &str) -> ActionResult<bool> {
        self.state.send_modify(|s| s.delete_error = None);
        if !self.prompter.confirm(messages::CONFIRM_DELETE_PATIENT) {
            return Ok(false);
        }

        self.state.send_modify(|s| {
            s.deleting.insert(id.to_owned());
        });
        let result = self.client.delete_patient(id).await;
        self.state.send_modify(|s| {
            s.deleting.remove(id);
        });

        if let Err(err) = result {
            tracing::error!(patient_id = id, "failed to delete patient: {:?}", err);
            let action = ActionError::from_api(&err, messages::PATIENT_DELETE_FAILED);
            self.state
                .send_modify(|s| s.delete_error = Some(action.message.clone()));
            return Err(action);
        }

        self.reload_first_page().await;
        self.prompter.notify(messages::PATIENT_DELETED);
        Ok(true)
    }

    pub fn dismiss_errors(&self) {
        self.state.send_modify(|s| {
            s.modal_error = None;
            s.delete_error = None;
        });
    }

    async fn reload_first_page(&self) {
        let state = self.store.snapshot();
        // A failed reload is already recorded in the store's error.
        let _ = self
            .store
            .fetch_patients(
                Some(FIRST_PAGE),
                Some(state.items_per_page),
                Some(state.search_query),
            )
            .await;
    }
}
