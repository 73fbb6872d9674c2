//! HTTP route handlers for the DateiLupe API.
//!
//! - `analyze`: directory scan reports, extension summaries and pagination
//! - `files`: single-file metadata and raw content streaming
//! - `health`: health check, metrics and build info endpoints

pub mod analyze;
pub mod files;
pub mod health;
