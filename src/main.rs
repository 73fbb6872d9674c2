use std::net::SocketAddr;

use axum::extract::DefaultBodyLimit;
use axum::http::header::ACCEPT_RANGES;
use axum::{routing::get, Router};
use tower_http::compression::predicate::{DefaultPredicate, Predicate};
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod analyzer;
mod config;
mod error;
mod humanize;
mod metrics;
mod routes;
mod state;
mod types;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logging (stdout + tägliche Datei-Rotation unter ./logs)
    std::fs::create_dir_all("logs").ok();
    let (stdout_nb, stdout_guard) = tracing_appender::non_blocking(std::io::stdout());
    let file_appender = tracing_appender::rolling::daily("logs", "dateilupe.log");
    let (file_nb, file_guard) = tracing_appender::non_blocking(file_appender);
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=info".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(stdout_nb))
        .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(file_nb))
        .init();
    // Guards am Leben halten (nicht fallen lassen), damit Non-Blocking Writer korrekt flushen
    let _log_guards = (stdout_guard, file_guard);

    // Load configuration (embedded defaults -> dateilupe.toml -> env/.env)
    let app_cfg = config::load()?;

    // App state
    let state = AppState::new(app_cfg.clone());

    // Router
    // Build compression layer but exclude raw file streams (they advertise
    // Accept-Ranges and must keep their exact Content-Length).
    #[derive(Clone)]
    struct NoRawStreamDefault(DefaultPredicate);
    impl Predicate for NoRawStreamDefault {
        fn should_compress<B: axum::body::HttpBody>(&self, res: &axum::http::Response<B>) -> bool {
            if res.headers().contains_key(ACCEPT_RANGES) {
                return false;
            }
            self.0.should_compress(res)
        }
    }
    let compression = CompressionLayer::new().compress_when(NoRawStreamDefault(DefaultPredicate::new()));

    let app = Router::new()
        .route("/", get(routes::health::root))
        .route("/healthz", get(routes::health::healthz))
        .route("/metrics", get(routes::health::metrics))
        .route("/metrics/prometheus", get(routes::health::metrics_prometheus))
        .route("/version", get(routes::health::version))
        .route("/analyze", get(routes::analyze::analyze_directory))
        .route("/analyze/extensions", get(routes::analyze::get_available_extensions))
        .route("/analyze/files", get(routes::analyze::get_paginated_files))
        .route("/file-info", get(routes::files::get_file_info))
        .route("/stream", get(routes::files::stream_file))
        .with_state(state)
        // Globales Body-Limit (1 MB) – die API ist reine Query-Parameter-Kost
        .layer(DefaultBodyLimit::max(1024 * 1024))
        .layer(compression)
        .layer(TraceLayer::new_for_http());

    // CORS: in Debug permissiv (für lokale Entwicklung mit separater UI), in Release nicht nötig (same-origin)
    let app = if cfg!(debug_assertions) { app.layer(CorsLayer::permissive()) } else { app };

    // Server listen addr (from config)
    let port: u16 = app_cfg.server.port;
    let host: String = app_cfg.server.host.clone();
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .map_err(|e| anyhow::anyhow!("invalid listen addr {}:{} - {}", host, port, e))?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    info!("DateiLupe listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).with_graceful_shutdown(shutdown_signal()).await?;

    Ok(())
}

async fn shutdown_signal() {
    #[cfg(unix)]
    {
        let mut term = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
    info!("Shutdown signal received. Stopping server...");
}
