//! # Clinic Core
//!
//! Client-side logic of the clinic administration tool.
//!
//! This crate contains everything between a front end and the clinic REST backend:
//! - [`client::ApiClient`], one async method per backend operation
//! - [`store::AppStore`], the shared patient list state with pagination and search
//! - [`views`], per-screen controllers for the patient table, patient card and visit history
//! - input validation, date formatting and the client route table
//!
//! **No rendering**: views expose state snapshots and change notifications only. Drawing them
//! is up to the front end (see the `clinic-cli` crate for a terminal one).

pub mod client;
pub mod config;
pub mod constants;
pub mod error;
pub mod format;
pub mod messages;
pub mod models;
pub mod routes;
pub mod search;
pub mod store;
pub mod validation;
pub mod views;

pub use client::ApiClient;
pub use config::ClientConfig;
pub use error::{ActionError, ActionResult, ApiError, ApiResult, ErrorKind, FormError};
pub use routes::Route;
pub use search::{Debouncer, SearchInput, SearchSink};
pub use store::{AppStore, PatientListStore, VisitStore};
pub use views::{PatientDetailView, PatientListView, Prompter, VisitListView};
