use crate::state::AppState;
use axum::{
    extract::State,
    http::{header, StatusCode},
    response::IntoResponse,
    Json,
};

// Welcome route
pub async fn root() -> impl IntoResponse {
    Json(serde_json::json!({
        "message": "Welcome to the DateiLupe file statistics API. See /version for build info."
    }))
}

// Health check endpoint - lightweight
pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "ok")
}

// Metrics endpoint: returns JSON snapshot
pub async fn metrics(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.metrics.get_snapshot();
    Json(snapshot)
}

// Prometheus-compatible text exposition format
pub async fn metrics_prometheus(State(state): State<AppState>) -> impl IntoResponse {
    let m = state.metrics.get_snapshot();
    let body = format!(
        "# HELP dateilupe_scans_completed Total scans completed\n# TYPE dateilupe_scans_completed counter\ndateilupe_scans_completed {}\n\
# HELP dateilupe_files_processed Files processed\n# TYPE dateilupe_files_processed counter\ndateilupe_files_processed {}\n\
# HELP dateilupe_bytes_scanned Bytes scanned\n# TYPE dateilupe_bytes_scanned counter\ndateilupe_bytes_scanned {}\n\
# HELP dateilupe_streams_served File streams served\n# TYPE dateilupe_streams_served counter\ndateilupe_streams_served {}\n\
# HELP dateilupe_bytes_streamed Bytes streamed\n# TYPE dateilupe_bytes_streamed counter\ndateilupe_bytes_streamed {}\n\
# HELP dateilupe_uptime_seconds Uptime seconds\n# TYPE dateilupe_uptime_seconds gauge\ndateilupe_uptime_seconds {}\n",
        m.scans_completed,
        m.files_processed,
        m.bytes_scanned,
        m.streams_served,
        m.bytes_streamed,
        m.uptime_seconds,
    );
    ([(header::CONTENT_TYPE, "text/plain; version=0.0.4")], body)
}

// Version/Build info endpoint (JSON)
pub async fn version() -> impl IntoResponse {
    let body = serde_json::json!({
        "name": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "package": {
            "description": env!("CARGO_PKG_DESCRIPTION"),
            "authors": env!("CARGO_PKG_AUTHORS"),
            "license": env!("CARGO_PKG_LICENSE"),
        },
        "build": {
            "profile": if cfg!(debug_assertions) { "debug" } else { "release" },
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
        }
    });
    (StatusCode::OK, Json(body))
}
