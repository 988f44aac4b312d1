//! HTTP request handlers for all API endpoints.
//!
//! # Handler Modules
//!
//! - [`diagnostics`]: Connectivity probe against the media service
//! - [`pictures`]: Picture listing
//! - [`status`]: Liveness message
//! - [`uploads`]: Image upload pipeline
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`] which converts to the matching HTTP status code
//! and a `{"error": ...}` JSON body.

pub mod diagnostics;
pub mod pictures;
pub mod status;
pub mod uploads;
