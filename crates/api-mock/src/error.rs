//! Error responses in the shape the real backend sends them.

use crate::model::ErrorRes;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockError {
    /// 400 with one message per violated rule.
    Validation(Vec<String>),
    /// 404 with a single message.
    NotFound(String),
}

pub type MockResult<T> = Result<T, MockError>;

impl MockError {
    pub fn patient_not_found(id: &str) -> Self {
        MockError::NotFound(format!("Patient with ID \"{id}\" not found"))
    }

    pub fn visit_not_found(id: &str) -> Self {
        MockError::NotFound(format!("Visit with ID \"{id}\" not found"))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            MockError::Validation(_) => StatusCode::BAD_REQUEST,
            MockError::NotFound(_) => StatusCode::NOT_FOUND,
        }
    }

    pub fn body(&self) -> ErrorRes {
        let status = self.status();
        let message = match self {
            MockError::Validation(messages) => json!(messages),
            MockError::NotFound(message) => json!(message),
        };
        ErrorRes {
            message,
            error: status.canonical_reason().unwrap_or_default().to_owned(),
            status_code: status.as_u16(),
        }
    }
}

impl IntoResponse for MockError {
    fn into_response(self) -> Response {
        (self.status(), Json(self.body())).into_response()
    }
}
