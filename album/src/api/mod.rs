//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers for all API endpoints
//! - **[`models`]**: Response data structures
//!
//! # API Structure
//!
//! - `GET /` - liveness message
//! - `POST /api/upload` - store an image and return its delivery URLs
//! - `GET /api/pictures` - picture listing (no catalog yet, always empty)
//! - `GET /api/test-cloudinary` - end-to-end credential and connectivity check
//!
//! All endpoints are documented with `utoipa` annotations; the rendered documentation is
//! served at `/docs` when the server is running.

pub mod handlers;
pub mod models;
