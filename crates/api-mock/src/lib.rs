//! # API Mock
//!
//! An in-memory stand-in for the clinic REST backend.
//!
//! Serves the nine `/api/v1` patient and visit operations with the same JSON shapes, status
//! codes and error bodies as the real service, plus `/api-docs/openapi.json`. Every request is
//! recorded and failures can be injected, so client code can be tested end to end without a
//! database.

#![warn(rust_2018_idioms)]

pub mod db;
pub mod error;
pub mod handlers;
pub mod model;
pub mod server;
pub mod state;

pub use error::MockError;
pub use server::{router, ApiDoc, MockServer};
pub use state::{MockState, RecordedRequest};
