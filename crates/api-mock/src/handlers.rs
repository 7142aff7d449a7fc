//! HTTP handlers for `/api/v1`.

use crate::error::{MockError, MockResult};
use crate::model::{
    ErrorRes, ListPatientsQuery, Patient, PatientPage, PatientReq, PatientWithVisits, Visit,
    VisitReq,
};
use crate::state::MockState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

#[utoipa::path(
    get,
    path = "/api/v1/patients",
    params(ListPatientsQuery),
    responses(
        (status = 200, description = "One page of patients", body = PatientPage)
    )
)]
/// List patients, paginated and optionally filtered by name.
#[axum::debug_handler]
pub async fn list_patients(
    State(state): State<MockState>,
    Query(query): Query<ListPatientsQuery>,
) -> Json<PatientPage> {
    Json(state.db().list_patients(&query))
}

#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient with visits", body = PatientWithVisits),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn get_patient(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> MockResult<Json<PatientWithVisits>> {
    state.db().get_patient(&id).map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/patients",
    request_body = PatientReq,
    responses(
        (status = 201, description = "Patient created", body = Patient),
        (status = 400, description = "Missing or invalid fields", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn create_patient(
    State(state): State<MockState>,
    Json(req): Json<PatientReq>,
) -> MockResult<(StatusCode, Json<Patient>)> {
    let patient = state.db().create_patient(req)?;
    tracing::info!(patient_id = %patient.id, "patient created");
    Ok((StatusCode::CREATED, Json(patient)))
}

#[utoipa::path(
    put,
    path = "/api/v1/patients/{id}",
    params(("id" = String, Path, description = "Patient id")),
    request_body = PatientReq,
    responses(
        (status = 200, description = "Patient updated", body = Patient),
        (status = 400, description = "Invalid fields", body = ErrorRes),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
/// Partial update: fields missing from the body stay as they are.
#[axum::debug_handler]
pub async fn update_patient(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(req): Json<PatientReq>,
) -> MockResult<Json<Patient>> {
    state.db().update_patient(&id, req).map(Json)
}

#[utoipa::path(
    delete,
    path = "/api/v1/patients/{id}",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "Patient and their visits deleted"),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn delete_patient(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> MockResult<StatusCode> {
    state.db().delete_patient(&id)?;
    tracing::info!(patient_id = %id, "patient deleted");
    Ok(StatusCode::OK)
}

#[utoipa::path(
    get,
    path = "/api/v1/patients/{id}/visits",
    params(("id" = String, Path, description = "Patient id")),
    responses(
        (status = 200, description = "All visits of the patient", body = [Visit]),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn list_visits(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> MockResult<Json<Vec<Visit>>> {
    state.db().visits_of(&id).map(Json)
}

#[utoipa::path(
    post,
    path = "/api/v1/visits",
    request_body = VisitReq,
    responses(
        (status = 201, description = "Visit created", body = Visit),
        (status = 400, description = "Missing or invalid fields", body = ErrorRes),
        (status = 404, description = "Unknown patient", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn create_visit(
    State(state): State<MockState>,
    Json(req): Json<VisitReq>,
) -> MockResult<(StatusCode, Json<Visit>)> {
    let visit = state.db().create_visit(req)?;
    Ok((StatusCode::CREATED, Json(visit)))
}

#[utoipa::path(
    put,
    path = "/api/v1/visits/{id}",
    params(("id" = String, Path, description = "Visit id")),
    request_body = VisitReq,
    responses(
        (status = 200, description = "Visit updated", body = Visit),
        (status = 400, description = "Invalid fields", body = ErrorRes),
        (status = 404, description = "Unknown visit", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn update_visit(
    State(state): State<MockState>,
    Path(id): Path<String>,
    Json(req): Json<VisitReq>,
) -> MockResult<Json<Visit>> {
    state.db().update_visit(&id, req).map(Json)
}

#[utoipa::path(
    delete,
    path = "/api/v1/visits/{id}",
    params(("id" = String, Path, description = "Visit id")),
    responses(
        (status = 200, description = "Visit deleted"),
        (status = 404, description = "Unknown visit", body = ErrorRes)
    )
)]
#[axum::debug_handler]
pub async fn delete_visit(
    State(state): State<MockState>,
    Path(id): Path<String>,
) -> MockResult<StatusCode> {
    state.db().delete_visit(&id).map(|()| StatusCode::OK)
}

pub(crate) fn not_found_route() -> MockError {
    MockError::NotFound("Cannot resolve route".to_owned())
}
