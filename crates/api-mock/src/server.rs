//! Router assembly and an in-process server handle.

use crate::handlers;
use crate::model::{
    ErrorRes, Patient, PatientPage, PatientReq, PatientWithVisits, Visit, VisitReq, VisitStatus,
};
use crate::state::{MockState, RecordedRequest};
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use std::net::SocketAddr;
use tokio::task::JoinHandle;
use tower_http::cors::CorsLayer;
use utoipa::OpenApi;

/// Largest request body the request log will buffer.
const MAX_LOGGED_BODY: usize = 1024 * 1024;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::list_patients,
        handlers::get_patient,
        handlers::create_patient,
        handlers::update_patient,
        handlers::delete_patient,
        handlers::list_visits,
        handlers::create_visit,
        handlers::update_visit,
        handlers::delete_visit,
    ),
    components(schemas(
        Patient,
        PatientPage,
        PatientReq,
        PatientWithVisits,
        Visit,
        VisitReq,
        VisitStatus,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// The full application: `/api/v1` routes, the OpenAPI document and permissive CORS.
pub fn router(state: MockState) -> Router {
    let api = Router::new()
        .route(
            "/patients",
            get(handlers::list_patients).post(handlers::create_patient),
        )
        .route(
            "/patients/:id",
            get(handlers::get_patient)
                .put(handlers::update_patient)
                .delete(handlers::delete_patient),
        )
        .route("/patients/:id/visits", get(handlers::list_visits))
        .route("/visits", axum::routing::post(handlers::create_visit))
        .route(
            "/visits/:id",
            axum::routing::put(handlers::update_visit).delete(handlers::delete_visit),
        )
        .fallback(|| async { handlers::not_found_route() })
        .layer(middleware::from_fn_with_state(state.clone(), record_and_inject));

    Router::new()
        .nest("/api/v1", api)
        .route("/api-docs/openapi.json", get(openapi_json))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

/// Log every API request, then either run it or answer with a queued failure.
async fn record_and_inject(
    State(state): State<MockState>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_LOGGED_BODY).await {
        Ok(bytes) => bytes,
        Err(err) => {
            tracing::error!("failed to buffer request body: {:?}", err);
            return axum::http::StatusCode::PAYLOAD_TOO_LARGE.into_response();
        }
    };

    let recorded = RecordedRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_owned(),
        query: parts.uri.query().map(str::to_owned),
        body: serde_json::from_slice(&bytes).ok(),
    };
    tracing::debug!(
        method = %recorded.method,
        path = %recorded.path,
        query = ?recorded.query,
        "request"
    );
    state.record(recorded);

    if let Some(failure) = state.take_failure() {
        tracing::info!(status = %failure.status, "answering with injected failure");
        return (failure.status, Json(failure.body)).into_response();
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// A mock backend running on a background task.
pub struct MockServer {
    addr: SocketAddr,
    state: MockState,
    task: JoinHandle<()>,
}

impl MockServer {
    /// Serve `state` on an ephemeral localhost port.
    pub async fn spawn(state: MockState) -> anyhow::Result<Self> {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        let app = router(state.clone());

        let task = tokio::spawn(async move {
            if let Err(err) = axum::serve(listener, app).await {
                tracing::error!("mock backend stopped: {:?}", err);
            }
        });

        tracing::debug!(%addr, "mock backend listening");
        Ok(Self { addr, state, task })
    }

    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    /// Backend root, without the `/api/v1` prefix.
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    pub fn state(&self) -> &MockState {
        &self.state
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
