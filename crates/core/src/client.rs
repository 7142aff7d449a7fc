//! REST client for the clinic backend.
//!
//! One method per backend operation. Methods build the request, send it once and decode the
//! answer: no retry, no caching, no timeout beyond the transport default. Failures are
//! returned to the caller untouched; deciding what to show a user is the caller's job.

use crate::config::ClientConfig;
use crate::constants::{PATIENTS_PATH, VISITS_PATH};
use crate::error::{ApiError, ApiResult, ErrorBody};
use crate::models::{
    CreatePatientPayload, NewVisit, Paginated, Patient, PatientDetail, PatientQuery,
    UpdatePatientPayload, Visit, VisitChanges,
};
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use std::sync::Arc;

/// Handle to the backend. Cheap to clone.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    cfg: Arc<ClientConfig>,
}

impl ApiClient {
    pub fn new(cfg: Arc<ClientConfig>) -> Self {
        Self::with_http_client(cfg, reqwest::Client::new())
    }

    /// Use a preconfigured `reqwest::Client` (proxies, custom TLS roots).
    pub fn with_http_client(cfg: Arc<ClientConfig>, http: reqwest::Client) -> Self {
        Self { http, cfg }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.cfg
    }

    /// `GET /patients` with optional `page`, `limit` and `search`.
    pub async fn list_patients(&self, query: &PatientQuery) -> ApiResult<Paginated<Patient>> {
        let url = self.cfg.endpoint(&[PATIENTS_PATH]);
        let pairs = query.to_pairs();
        tracing::debug!(%url, ?pairs, "listing patients");
        self.send_json(self.http.get(url).query(&pairs)).await
    }

    /// `GET /patients/{id}`: the patient and all of their visits.
    pub async fn get_patient(&self, id: &str) -> ApiResult<PatientDetail> {
        let url = self.cfg.endpoint(&[PATIENTS_PATH, id]);
        tracing::debug!(%url, "fetching patient");
        self.send_json(self.http.get(url)).await
    }

    pub async fn create_patient(&self, payload: &CreatePatientPayload) -> ApiResult<Patient> {
        let url = self.cfg.endpoint(&[PATIENTS_PATH]);
        tracing::debug!(%url, "creating patient");
        self.send_json(self.http.post(url).json(payload)).await
    }

    /// `PUT /patients/{id}` with only the fields present in `changes`.
    pub async fn update_patient(
        &self,
        id: &str,
        changes: &UpdatePatientPayload,
    ) -> ApiResult<Patient> {
        let url = self.cfg.endpoint(&[PATIENTS_PATH, id]);
        tracing::debug!(%url, "updating patient");
        self.send_json(self.http.put(url).json(changes)).await
    }

    /// `DELETE /patients/{id}`. The backend removes the patient's visits as well.
    pub async fn delete_patient(&self, id: &str) -> ApiResult<()> {
        let url = self.cfg.endpoint(&[PATIENTS_PATH, id]);
        tracing::debug!(%url, "deleting patient");
        self.send_empty(self.http.delete(url)).await
    }

    pub async fn list_visits_by_patient(&self, patient_id: &str) -> ApiResult<Vec<Visit>> {
        let url = self.cfg.endpoint(&[PATIENTS_PATH, patient_id, VISITS_PATH]);
        tracing::debug!(%url, "listing visits");
        self.send_json(self.http.get(url)).await
    }

    pub async fn create_visit(&self, visit: &NewVisit) -> ApiResult<Visit> {
        let url = self.cfg.endpoint(&[VISITS_PATH]);
        tracing::debug!(%url, patient_id = %visit.patient_id, "creating visit");
        self.send_json(self.http.post(url).json(visit)).await
    }

    /// `PUT /visits/{id}`. The id is routing information only and never part of the body.
    pub async fn update_visit(&self, id: &str, changes: &VisitChanges) -> ApiResult<Visit> {
        let url = self.cfg.endpoint(&[VISITS_PATH, id]);
        tracing::debug!(%url, "updating visit");
        self.send_json(self.http.put(url).json(changes)).await
    }

    pub async fn delete_visit(&self, id: &str) -> ApiResult<()> {
        let url = self.cfg.endpoint(&[VISITS_PATH, id]);
        tracing::debug!(%url, "deleting visit");
        self.send_empty(self.http.delete(url)).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> ApiResult<T> {
        let response = Self::send(request).await?;
        response.json::<T>().await.map_err(ApiError::Decode)
    }

    async fn send_empty(&self, request: RequestBuilder) -> ApiResult<()> {
        Self::send(request).await.map(|_| ())
    }

    async fn send(request: RequestBuilder) -> ApiResult<Response> {
        let response = request.send().await.map_err(ApiError::Transport)?;

        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response
            .bytes()
            .await
            .ok()
            .and_then(|bytes| ErrorBody::from_slice(&bytes));
        Err(ApiError::Status { status, body })
    }
}
