//! Integration and unit tests for the DateiLupe application.
//!
//! ## Test Modules
//!
//! - **analyzer_tests**: Tests for the scan/aggregation engine
//! - **api_tests**: HTTP endpoint tests driven through the router
//! - **error_tests**: Error handling and validation tests
//! - **config_tests**: Configuration loading and validation tests
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod api_tests;
