mod common;

use clinic_core::error::ErrorKind;
use clinic_core::messages;
use clinic_core::models::UpdatePatientPayload;
use clinic_core::views::{PageItem, PatientForm, PatientListView, PatientListViewState};
use clinic_core::{Prompter, Route, SearchInput};
use common::{Backend, TestPrompter};
use reqwest::StatusCode;
use serde_json::json;
use std::collections::HashSet;
use std::sync::{Arc, Mutex, OnceLock};
use std::time::Duration;
use tokio::sync::watch;

fn anna() -> PatientForm {
    PatientForm {
        first_name: "Anna".into(),
        last_name: "Smith".into(),
        date_of_birth: "1990-04-12".into(),
        phone_number: "+79000000000".into(),
        email: "anna@example.com".into(),
    }
}

#[tokio::test]
async fn forty_two_patients_make_five_pages() {
    let backend = Backend::start().await;
    backend.state().seed_patients(42);
    let store = backend.app_store().patients;

    store.fetch_patients(Some(1), Some(10), None).await.unwrap();
    let state = store.snapshot();
    assert_eq!(state.total_patients, 42);
    assert_eq!(state.total_pages, 5);
    assert_eq!(state.current_page, 1);
    assert_eq!(state.patients.len(), 10);
    assert!(!state.is_loading);
    assert_eq!(state.error, None);

    store.set_current_page(5).await.unwrap();
    let state = store.snapshot();
    assert_eq!(state.current_page, 5);
    assert_eq!(state.patients.len(), 2);

    let last = backend.state().requests().pop().unwrap();
    assert_eq!(last.query_param("page").as_deref(), Some("5"));
    assert_eq!(last.query_param("limit").as_deref(), Some("10"));
}

#[tokio::test]
async fn new_search_resets_to_first_page() {
    let backend = Backend::start().await;
    backend.state().seed_patients(42);
    let store = backend.app_store().patients;

    store.set_current_page(3).await.unwrap();
    backend.state().clear_requests();

    store.set_search_query("an".into()).await.unwrap();

    let requests = backend.state().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query_param("page").as_deref(), Some("1"));
    assert_eq!(requests[0].query_param("search").as_deref(), Some("an"));

    let state = store.snapshot();
    assert_eq!(state.current_page, 1);
    assert_eq!(state.search_query, "an");
}

#[tokio::test]
async fn omitted_arguments_reuse_stored_values() {
    let backend = Backend::start().await;
    backend.state().seed_patients(30);
    let store = backend.app_store().patients;

    store.fetch_patients(Some(2), Some(5), Some("Patient1".into())).await.unwrap();
    backend.state().clear_requests();
    store.fetch_patients(None, None, None).await.unwrap();

    let request = backend.state().requests().pop().unwrap();
    assert_eq!(request.query_param("page").as_deref(), Some("2"));
    assert_eq!(request.query_param("limit").as_deref(), Some("5"));
    assert_eq!(request.query_param("search").as_deref(), Some("Patient1"));
}

#[tokio::test]
async fn failed_fetch_keeps_previous_list() {
    let backend = Backend::start().await;
    backend.state().seed_patients(15);
    let store = backend.app_store().patients;
    store.fetch_patients(None, None, None).await.unwrap();
    let before = store.snapshot();

    backend
        .state()
        .fail_next(StatusCode::INTERNAL_SERVER_ERROR, json!({}));
    let err = store.fetch_patients(Some(2), None, None).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Unknown);
    let after = store.snapshot();
    assert_eq!(after.patients, before.patients);
    assert_eq!(after.current_page, 1);
    assert_eq!(after.error.as_deref(), Some("Request failed with status code 500"));
    assert!(!after.is_loading);
}

#[tokio::test]
async fn structured_error_message_is_preferred() {
    let backend = Backend::start().await;
    let store = backend.app_store().patients;

    backend.state().fail_next(
        StatusCode::BAD_REQUEST,
        json!({ "message": ["limit must be positive", "page must be positive"] }),
    );
    let err = store.fetch_patients(None, None, None).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(err.message, "limit must be positive. page must be positive");
    assert_eq!(err.details.map(|d| d.len()), Some(2));
}

#[tokio::test]
async fn declined_delete_sends_nothing() {
    let backend = Backend::start().await;
    let seeded = backend.state().seed_patients(3);
    let prompter = TestPrompter::declining();
    let view = PatientListView::new(&backend.app_store(), prompter.clone());

    let deleted = view.delete_patient(&seeded[0].id).await.unwrap();

    assert!(!deleted);
    assert_eq!(prompter.questions(), [messages::CONFIRM_DELETE_PATIENT]);
    assert!(backend.requests_with_method("DELETE").is_empty());
    assert_eq!(backend.state().db().patients().len(), 3);
}

#[tokio::test]
async fn confirmed_delete_sends_once_and_reloads_first_page() {
    let backend = Backend::start().await;
    let seeded = backend.state().seed_patients(25);
    let prompter = TestPrompter::accepting();
    let view = PatientListView::new(&backend.app_store(), prompter.clone());
    view.change_page(1).await.unwrap();
    view.store().set_current_page(3).await.unwrap();
    backend.state().clear_requests();

    assert!(view.delete_patient(&seeded[24].id).await.unwrap());

    let deletes = backend.requests_with_method("DELETE");
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].path, format!("/api/v1/patients/{}", seeded[24].id));

    let reload = backend.requests_with_method("GET").pop().unwrap();
    assert_eq!(reload.query_param("page").as_deref(), Some("1"));
    assert_eq!(view.store().snapshot().total_patients, 24);
    assert_eq!(prompter.notices(), [messages::PATIENT_DELETED]);
    assert!(view.snapshot().deleting.is_empty());
    assert!(!view.is_deleting(&seeded[24].id));
}

/// Confirms every delete and records which patients were already being deleted at that moment.
#[derive(Default)]
struct InFlightRecorder {
    view_state: OnceLock<watch::Receiver<PatientListViewState>>,
    in_flight: Mutex<Vec<HashSet<String>>>,
}

impl Prompter for InFlightRecorder {
    fn confirm(&self, _question: &str) -> bool {
        if let Some(state) = self.view_state.get() {
            let deleting = state.borrow().deleting.clone();
            self.in_flight.lock().unwrap().push(deleting);
        }
        true
    }

    fn notify(&self, _message: &str) {}
}

#[tokio::test]
async fn overlapping_deletes_track_each_patient() {
    let backend = Backend::start().await;
    let seeded = backend.state().seed_patients(3);
    let recorder = Arc::new(InFlightRecorder::default());
    let view = PatientListView::new(&backend.app_store(), recorder.clone());
    recorder.view_state.set(view.subscribe()).unwrap();
    view.load().await.unwrap();

    let (first, second) = tokio::join!(
        view.delete_patient(&seeded[0].id),
        view.delete_patient("missing"),
    );

    assert!(first.unwrap());
    assert!(second.is_err());
    let in_flight = recorder.in_flight.lock().unwrap().clone();
    assert_eq!(in_flight.len(), 2);
    assert!(in_flight[0].is_empty());
    assert_eq!(in_flight[1], HashSet::from([seeded[0].id.clone()]));
    assert!(view.snapshot().deleting.is_empty());
    assert_eq!(backend.requests_with_method("DELETE").len(), 2);
}

#[tokio::test]
async fn failed_delete_shows_backend_message() {
    let backend = Backend::start().await;
    let view = PatientListView::new(&backend.app_store(), TestPrompter::accepting());

    let err = view.delete_patient("missing").await.unwrap_err();

    assert_eq!(err.message, "Patient with ID \"missing\" not found");
    assert_eq!(view.snapshot().delete_error, Some(err.message));
}

#[tokio::test]
async fn failed_delete_keeps_patient_list() {
    let backend = Backend::start().await;
    let seeded = backend.state().seed_patients(12);
    let view = PatientListView::new(&backend.app_store(), TestPrompter::accepting());
    view.load().await.unwrap();
    let before = view.store().snapshot();

    backend
        .state()
        .fail_next(StatusCode::INTERNAL_SERVER_ERROR, json!({ "message": "" }));
    let err = view.delete_patient(&seeded[0].id).await.unwrap_err();

    assert_eq!(err.message, "Request failed with status code 500");
    assert_eq!(view.store().snapshot(), before);
    assert!(view.snapshot().deleting.is_empty());
    assert_eq!(backend.state().db().patients().len(), 12);
}

#[tokio::test]
async fn rejected_create_keeps_patient_list() {
    let backend = Backend::start().await;
    backend.state().seed_patients(12);
    let prompter = TestPrompter::accepting();
    let view = PatientListView::new(&backend.app_store(), prompter.clone());
    view.load().await.unwrap();
    view.change_page(2).await.unwrap();
    let before = view.store().snapshot();

    backend.state().fail_next(
        StatusCode::BAD_REQUEST,
        json!({ "message": ["email must be an email"], "error": "Bad Request" }),
    );
    let err = view.create_patient(&anna()).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(view.snapshot().modal_error.as_deref(), Some("email must be an email"));
    assert!(!view.snapshot().is_submitting);
    assert_eq!(view.store().snapshot(), before);
    assert!(prompter.notices().is_empty());
    assert_eq!(backend.state().db().patients().len(), 12);
}

#[tokio::test]
async fn invalid_form_never_reaches_backend() {
    let backend = Backend::start().await;
    let view = PatientListView::new(&backend.app_store(), TestPrompter::accepting());
    let mut form = anna();
    form.email = "anna-at-example".into();

    let err = view.create_patient(&form).await.unwrap_err();

    assert_eq!(err.kind, ErrorKind::Validation);
    assert_eq!(view.snapshot().modal_error, Some(messages::INVALID_EMAIL.to_owned()));
    assert!(backend.requests_with_method("POST").is_empty());
}

#[tokio::test]
async fn created_patient_shows_on_first_page() {
    let backend = Backend::start().await;
    backend.state().seed_patients(12);
    let prompter = TestPrompter::accepting();
    let view = PatientListView::new(&backend.app_store(), prompter.clone());
    view.load().await.unwrap();
    view.change_page(2).await.unwrap();

    let created = view.create_patient(&anna()).await.unwrap();

    let state = view.store().snapshot();
    assert_eq!(state.current_page, 1);
    assert_eq!(state.total_patients, 13);
    assert_eq!(prompter.notices(), [messages::PATIENT_ADDED]);
    assert!(!view.snapshot().is_submitting);
    assert_eq!(view.open_patient(&created.id), Route::PatientDetail(created.id.clone()));
}

#[tokio::test]
async fn out_of_range_pages_are_ignored() {
    let backend = Backend::start().await;
    backend.state().seed_patients(12);
    let view = PatientListView::new(&backend.app_store(), TestPrompter::accepting());
    view.load().await.unwrap();
    backend.state().clear_requests();

    view.change_page(0).await.unwrap();
    view.change_page(3).await.unwrap();

    assert!(backend.state().requests().is_empty());
    assert_eq!(
        view.pagination_items(),
        [
            PageItem::Page { number: 1, active: true },
            PageItem::Page { number: 2, active: false },
        ]
    );
}

#[tokio::test]
async fn empty_search_result_has_message() {
    let backend = Backend::start().await;
    backend.state().seed_patients(3);
    let view = PatientListView::new(&backend.app_store(), TestPrompter::accepting());

    view.load().await.unwrap();
    assert_eq!(view.empty_message(), None);

    view.store().set_search_query("nobody".into()).await.unwrap();
    assert_eq!(view.empty_message(), Some(messages::NO_PATIENTS_FOR_QUERY));
}

#[tokio::test]
async fn debounced_typing_searches_once() {
    let backend = Backend::start().await;
    backend.state().seed_patients(3);
    let view = PatientListView::new(&backend.app_store(), TestPrompter::accepting());
    let mut input = SearchInput::with_delay(view.store().clone(), "", Duration::from_millis(100));
    let mut changes = view.store().subscribe();

    for text in ["P", "Pa", "Pat", "Patient2"] {
        input.on_input(text);
    }

    tokio::time::timeout(
        Duration::from_secs(5),
        changes.wait_for(|s| s.search_query == "Patient2" && !s.is_loading),
    )
    .await
    .expect("search should settle")
    .unwrap();

    let requests = backend.state().requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].query_param("search").as_deref(), Some("Patient2"));
    assert_eq!(view.store().snapshot().total_patients, 1);
}

#[tokio::test]
async fn partial_update_sends_only_given_fields() {
    let backend = Backend::start().await;
    let seeded = backend.state().seed_patients(1);

    let changes = UpdatePatientPayload {
        phone_number: Some("+70000000001".into()),
        ..UpdatePatientPayload::default()
    };
    let updated = backend
        .client
        .update_patient(&seeded[0].id, &changes)
        .await
        .unwrap();

    assert_eq!(updated.phone_number, "+70000000001");
    assert_eq!(updated.first_name, seeded[0].first_name);
    let put = backend.requests_with_method("PUT").pop().unwrap();
    assert_eq!(put.body, Some(json!({ "phoneNumber": "+70000000001" })));
}
