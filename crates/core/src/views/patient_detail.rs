//! Patient card with the visit history below it.

use crate::client::ApiClient;
use crate::error::{ActionError, ActionResult};
use crate::messages;
use crate::models::Patient;
use crate::views::forms::PatientForm;
use crate::views::visit_list::VisitListView;
use crate::views::Prompter;
use std::sync::Arc;
use tokio::sync::watch;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatientDetailState {
    pub patient: Option<Patient>,
    pub is_loading: bool,
    pub error: Option<String>,
    /// Error shown inside the edit dialog.
    pub edit_error: Option<String>,
}

impl Default for PatientDetailState {
    fn default() -> Self {
        // The screen starts out loading; it has nothing to show until the first fetch.
        Self {
            patient: None,
            is_loading: true,
            error: None,
            edit_error: None,
        }
    }
}

/// What the detail screen should display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
    Loading,
    Failed(String),
    NotFound,
    Ready(Patient),
}

impl PatientDetailState {
    pub fn screen(&self) -> Screen {
        if self.is_loading {
            return Screen::Loading;
        }
        if let Some(message) = &self.error {
            return Screen::Failed(message.clone());
        }
        match &self.patient {
            Some(patient) => Screen::Ready(patient.clone()),
            None => Screen::NotFound,
        }
    }
}

#[derive(Clone)]
pub struct PatientDetailView {
    patient_id: String,
    client: ApiClient,
    prompter: Arc<dyn Prompter>,
    state: Arc<watch::Sender<PatientDetailState>>,
    visits: VisitListView,
}

impl PatientDetailView {
    pub fn new(
        client: ApiClient,
        prompter: Arc<dyn Prompter>,
        patient_id: impl Into<String>,
    ) -> Self {
        let patient_id = patient_id.into();
        let (state, _) = watch::channel(PatientDetailState::default());
        let visits = VisitListView::new(
            client.clone(),
            prompter.clone(),
            patient_id.clone(),
            Vec::new(),
        );
        Self {
            patient_id,
            client,
            prompter,
            state: Arc::new(state),
            visits,
        }
    }

    pub fn patient_id(&self) -> &str {
        &self.patient_id
    }

    pub fn snapshot(&self) -> PatientDetailState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<PatientDetailState> {
        self.state.subscribe()
    }

    pub fn screen(&self) -> Screen {
        self.state.borrow().screen()
    }

    /// The visit table of this patient.
    pub fn visits(&self) -> &VisitListView {
        &self.visits
    }

    /// Fetch the patient with their visits and reset the visit table to them.
    pub async fn load(&self) -> ActionResult<()> {
        self.state.send_modify(|s| {
            s.is_loading = true;
            s.error = None;
        });

        if self.patient_id.is_empty() {
            self.state.send_modify(|s| s.is_loading = false);
            return Ok(());
        }

        let result = match self.client.get_patient(&self.patient_id).await {
            Ok(detail) => {
                let (patient, visits) = detail.into_parts();
                self.visits.replace_visits(visits);
                self.state.send_modify(|s| s.patient = Some(patient));
                Ok(())
            }
            Err(err) => {
                tracing::error!(patient_id = %self.patient_id, "failed to load patient: {:?}", err);
                let action = ActionError::from_api(&err, messages::PATIENT_LOAD_FAILED);
                self.state
                    .send_modify(|s| s.error = Some(action.message.clone()));
                Err(action)
            }
        };

        self.state.send_modify(|s| s.is_loading = false);
        result
    }

    /// The edit dialog, pre-filled from the loaded patient.
    pub fn edit_form(&self) -> Option<PatientForm> {
        self.state
            .borrow()
            .patient
            .as_ref()
            .map(PatientForm::from_patient)
    }

    /// Save the edit dialog and reload the card.
    pub async fn update_patient(&self, form: &PatientForm) -> ActionResult<Patient> {
        self.state.send_modify(|s| s.edit_error = None);

        let result = self.try_update(form).await;
        if let Err(err) = &result {
            self.state
                .send_modify(|s| s.edit_error = Some(err.message.clone()));
        }
        result
    }

    async fn try_update(&self, form: &PatientForm) -> ActionResult<Patient> {
        let changes = form.to_update_payload()?;
        let updated = self
            .client
            .update_patient(&self.patient_id, &changes)
            .await
            .map_err(|err| {
                tracing::error!(
                    patient_id = %self.patient_id,
                    "failed to update patient: {:?}",
                    err
                );
                ActionError::from_api(&err, messages::UNKNOWN_ERROR)
            })?;

        // A failed reload shows on the card itself.
        let _ = self.load().await;
        self.prompter.notify(messages::PATIENT_UPDATED);
        Ok(updated)
    }
}
