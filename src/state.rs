use std::sync::Arc;

use crate::config::AppConfig;
use crate::metrics::Metrics;

/// The shared application state.
///
/// Holds everything the request handlers need across the application. Scan
/// results themselves are never stored here: every analyze request builds its
/// report from live filesystem state and discards it with the response.
#[derive(Clone)]
pub struct AppState {
    /// The application configuration.
    pub config: Arc<AppConfig>,
    /// The application metrics.
    ///
    /// Tracks counters for completed scans, files processed and streamed
    /// bytes across the process lifetime.
    pub metrics: Metrics,
}

impl AppState {
    /// Creates a new `AppState` from the loaded configuration.
    pub fn new(config: AppConfig) -> Self {
        Self { config: Arc::new(config), metrics: Metrics::new() }
    }
}
