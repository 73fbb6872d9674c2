//! # DateiLupe Backend Library
//!
//! This is the core library for DateiLupe, an HTTP service that analyzes the
//! contents of a directory tree and serves both structured statistics reports
//! and raw file content.
//!
//! ## Architecture
//!
//! The application is built using:
//! - **Axum**: Modern web framework for HTTP server and routing
//! - **Tokio**: Async runtime; blocking tree walks run on the blocking pool
//! - **Walkdir**: Recursive directory traversal
//! - **Serde**: Serialization/deserialization for JSON APIs
//!
//! ## Core Components
//!
//! - [`analyzer`]: Single-pass directory scan and aggregation engine
//! - [`config`]: Application configuration management
//! - [`error`]: Centralized error handling and HTTP error responses
//! - [`humanize`]: Byte-size formatting for responses and log lines
//! - [`metrics`]: Application performance and usage metrics
//! - [`routes`]: HTTP API endpoint handlers
//! - [`state`]: Shared application state
//! - [`types`]: Data transfer objects, report building and pagination
//!
//! ## Features
//!
//! - Per-request directory analysis with per-extension rollups and a bounded
//!   largest-files list, tolerant of unreadable entries
//! - Optional case-insensitive extension filtering
//! - Paginated, size-ordered file inventories
//! - Chunked file streaming with content-type detection and inline/attachment
//!   disposition
//! - Structured error responses and request tracing

pub mod analyzer;
pub mod config;
pub mod error;
pub mod humanize;
pub mod metrics;
pub mod routes;
pub mod state;
pub mod types;

#[cfg(test)]
mod tests;
