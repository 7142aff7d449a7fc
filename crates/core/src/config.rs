//! Client runtime configuration.
//!
//! Configuration is resolved once at process startup and then passed into the API client.
//! Nothing in this crate reads environment variables while handling a request.

use crate::constants::{API_PREFIX, API_VERSION_1, DEFAULT_BACKEND_URL};
use crate::error::ConfigError;
use reqwest::Url;

/// Where the REST backend lives.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    backend_url: Url,
    api_base: Url,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// The resulting API base is `{backend_url}/{api_prefix}/{api_version}`.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the backend URL does not parse, is not http(s), or if the prefix
    /// or version is blank.
    pub fn new(
        backend_url: &str,
        api_prefix: &str,
        api_version: &str,
    ) -> Result<Self, ConfigError> {
        let invalid = |reason: &str| ConfigError::InvalidBackendUrl {
            url: backend_url.to_owned(),
            reason: reason.to_owned(),
        };

        if api_prefix.trim().is_empty() {
            return Err(ConfigError::EmptySegment("api prefix"));
        }
        if api_version.trim().is_empty() {
            return Err(ConfigError::EmptySegment("api version"));
        }

        let backend_url = Url::parse(backend_url.trim()).map_err(|e| invalid(&e.to_string()))?;
        if !matches!(backend_url.scheme(), "http" | "https") {
            return Err(invalid("scheme must be http or https"));
        }

        let mut api_base = backend_url.clone();
        api_base
            .path_segments_mut()
            .map_err(|_| invalid("url cannot be a base"))?
            .pop_if_empty()
            .push(api_prefix.trim())
            .push(api_version.trim());

        Ok(Self {
            backend_url,
            api_base,
        })
    }

    /// Configuration for a backend at `backend_url` using the default `api/v1` prefix.
    pub fn for_backend(backend_url: &str) -> Result<Self, ConfigError> {
        Self::new(backend_url, API_PREFIX, API_VERSION_1)
    }

    pub fn backend_url(&self) -> &Url {
        &self.backend_url
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    /// Build the URL for a route under the API base.
    ///
    /// Each segment is percent-encoded, so opaque ids cannot escape their path position.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.api_base.clone();
        // `new` rejects cannot-be-a-base URLs, so this branch always runs.
        if let Ok(mut path) = url.path_segments_mut() {
            path.extend(segments);
        }
        url
    }
}

/// Pick the backend URL from an optional environment value.
///
/// If `value` is `None` or empty/whitespace, returns the default local backend.
pub fn backend_url_from_env_value(value: Option<String>) -> String {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| DEFAULT_BACKEND_URL.to_string())
}
