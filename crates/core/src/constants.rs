//! Constants used throughout the clinic core crate.
//!
//! Endpoint segments, pagination defaults and timing windows live here so the
//! client, stores and views agree on them.

use std::time::Duration;

/// Backend origin used when no explicit URL is configured.
pub const DEFAULT_BACKEND_URL: &str = "http://localhost:3001";

/// Path prefix in front of every REST route.
pub const API_PREFIX: &str = "api";

/// REST API version segment.
pub const API_VERSION_1: &str = "v1";

/// Environment variable holding the backend origin.
pub const BACKEND_URL_ENV: &str = "CLINIC_BACKEND_URL";

/// Collection segment for patient routes.
pub const PATIENTS_PATH: &str = "patients";

/// Collection segment for visit routes.
pub const VISITS_PATH: &str = "visits";

/// First page of any paginated listing. Pages are 1-based.
pub const FIRST_PAGE: u32 = 1;

/// Items per page before the backend has echoed a value.
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 10;

/// Quiet period after the last keystroke before a search is applied.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(500);

/// Simulated latency of the placeholder visit store.
pub const VISIT_STORE_STUB_DELAY: Duration = Duration::from_millis(500);

/// Number of numbered page links shown around the current page.
pub const MAX_VISIBLE_PAGES: u32 = 5;

/// Characters of a patient id shown in the list table.
pub const TRUNCATED_ID_LEN: usize = 8;
