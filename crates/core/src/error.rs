//! Error types for the clinic client.
//!
//! Three layers:
//! - [`ApiError`] is what the REST client returns. It is never caught inside the client.
//! - [`FormError`] is a local validation failure. It never reaches the network.
//! - [`ActionError`] is the single tagged failure every view operation returns. It carries
//!   the user-facing message resolved from either of the above.

use crate::messages;
use reqwest::StatusCode;

/// Configuration could not be resolved at startup.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid backend url {url:?}: {reason}")]
    InvalidBackendUrl { url: String, reason: String },
    #[error("{0} cannot be empty")]
    EmptySegment(&'static str),
}

/// The `message` field of a structured backend error body.
///
/// Validation pipelines on the backend report either one message or a list of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorMessage {
    One(String),
    Many(Vec<String>),
}

/// Structured error body returned alongside a non-success status.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ErrorBody {
    pub message: Option<ErrorMessage>,
    pub error: Option<String>,
}

impl ErrorBody {
    /// Parse an error body, tolerating anything that is not the expected shape.
    ///
    /// Returns `None` when the payload is not a JSON object. Array entries that are not
    /// strings are rendered as JSON text rather than dropped.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let value: serde_json::Value = serde_json::from_slice(bytes).ok()?;
        let object = value.as_object()?;

        let message = match object.get("message") {
            Some(serde_json::Value::String(s)) => Some(ErrorMessage::One(s.clone())),
            Some(serde_json::Value::Array(items)) => Some(ErrorMessage::Many(
                items
                    .iter()
                    .map(|item| match item {
                        serde_json::Value::String(s) => s.clone(),
                        other => other.to_string(),
                    })
                    .collect(),
            )),
            _ => None,
        };
        let error = object
            .get("error")
            .and_then(|e| e.as_str())
            .map(str::to_owned);

        Some(Self { message, error })
    }
}

/// Failure of a single REST call.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The request never produced an HTTP response (connection refused, DNS, timeout).
    #[error("{0}")]
    Transport(#[source] reqwest::Error),
    /// The backend answered with a non-success status.
    #[error("Request failed with status code {}", status.as_u16())]
    Status {
        status: StatusCode,
        body: Option<ErrorBody>,
    },
    /// The response body could not be decoded into the expected type.
    #[error("failed to decode response body: {0}")]
    Decode(#[source] reqwest::Error),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;

impl ApiError {
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            ApiError::Status { status, .. } => Some(*status),
            ApiError::Transport(e) | ApiError::Decode(e) => e.status(),
        }
    }

    /// Structured backend message, if the backend sent one.
    pub fn structured_message(&self) -> Option<&ErrorMessage> {
        match self {
            ApiError::Status {
                body: Some(body), ..
            } => body.message.as_ref(),
            _ => None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Transport(_) => ErrorKind::Network,
            ApiError::Status { status, .. } => match *status {
                StatusCode::BAD_REQUEST
                | StatusCode::CONFLICT
                | StatusCode::UNPROCESSABLE_ENTITY => ErrorKind::Validation,
                _ => ErrorKind::Unknown,
            },
            ApiError::Decode(_) => ErrorKind::Unknown,
        }
    }

    /// Message to show a user for this failure.
    pub fn user_message(&self, fallback: &str) -> String {
        resolve_message(self.structured_message(), &self.to_string(), fallback)
    }
}

/// Pick the user-facing message for a failure.
///
/// Precedence, first non-empty wins:
/// 1. a list of backend messages, joined with `". "` (empty entries are skipped)
/// 2. a single backend message
/// 3. the error's own message
/// 4. `fallback`
pub fn resolve_message(structured: Option<&ErrorMessage>, own: &str, fallback: &str) -> String {
    match structured {
        Some(ErrorMessage::Many(items)) => {
            let joined = items
                .iter()
                .map(String::as_str)
                .filter(|m| !m.is_empty())
                .collect::<Vec<_>>()
                .join(". ");
            if !joined.is_empty() {
                return joined;
            }
        }
        Some(ErrorMessage::One(message)) if !message.is_empty() => return message.clone(),
        _ => {}
    }

    if !own.is_empty() {
        return own.to_owned();
    }

    fallback.to_owned()
}

/// Local input validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("{field}: {}", messages::REQUIRED_FIELD)]
    Required { field: &'static str },
    #[error("{}", messages::INVALID_EMAIL)]
    InvalidEmail,
    #[error("{}", messages::INVALID_DATETIME)]
    InvalidDateTime(String),
    #[error("{}", messages::VISIT_IN_PAST)]
    VisitInPast,
}

/// Coarse classification of an [`ActionError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Network,
    Validation,
    Unknown,
}

/// Failure of a user-triggered operation, with its message already resolved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ActionError {
    pub kind: ErrorKind,
    pub message: String,
    /// Individual backend messages when the backend reported more than one.
    pub details: Option<Vec<String>>,
}

pub type ActionResult<T> = std::result::Result<T, ActionError>;

impl ActionError {
    pub fn from_api(err: &ApiError, fallback: &str) -> Self {
        let details = match err.structured_message() {
            Some(ErrorMessage::Many(items)) => Some(items.clone()),
            _ => None,
        };

        Self {
            kind: err.kind(),
            message: err.user_message(fallback),
            details,
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self {
            kind: ErrorKind::Validation,
            message: message.into(),
            details: None,
        }
    }
}

impl From<FormError> for ActionError {
    fn from(err: FormError) -> Self {
        ActionError::validation(err.to_string())
    }
}
