use std::path::{Path, PathBuf};

use anyhow::anyhow;
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tokio::task::spawn_blocking;

use crate::{
    analyzer,
    error::{validation, AppError, AppResult},
    state::AppState,
    types::{ExtensionListResponse, PaginatedFiles, Report},
};

#[derive(Debug, Deserialize)]
pub struct AnalyzeQuery {
    pub path: String,
    /// Filter by file extension (e.g. ".py", ".txt").
    pub extension: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ExtensionsQuery {
    pub path: String,
}

#[derive(Debug, Deserialize)]
pub struct FilesQuery {
    pub path: String,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
    pub extension: Option<String>,
}

/// `GET /analyze` - full analysis of all files under a directory.
pub async fn analyze_directory(
    State(state): State<AppState>,
    Query(q): Query<AnalyzeQuery>,
) -> AppResult<Json<Report>> {
    let root = validate_directory(&q.path)?;
    tracing::info!("Analyzing directory: {}", validation::sanitize_for_logging(&q.path));
    let report = run_scan(root, q.extension).await?;
    state.metrics.record_scan(report.file_count, report.total_size);
    Ok(Json(report))
}

/// `GET /analyze/extensions` - all file extensions present in a directory,
/// most frequent first.
pub async fn get_available_extensions(
    State(state): State<AppState>,
    Query(q): Query<ExtensionsQuery>,
) -> AppResult<Json<ExtensionListResponse>> {
    let root = validate_directory(&q.path)?;
    tracing::info!("Getting available extensions in: {}", validation::sanitize_for_logging(&q.path));
    let report = run_scan(root, None).await?;
    state.metrics.record_scan(report.file_count, report.total_size);

    Ok(Json(ExtensionListResponse {
        path: q.path,
        total_files: report.file_count,
        extensions: report.extensions_by_count(),
    }))
}

/// `GET /analyze/files` - size-ordered file inventory, paginated.
pub async fn get_paginated_files(
    State(state): State<AppState>,
    Query(q): Query<FilesQuery>,
) -> AppResult<Json<PaginatedFiles>> {
    let limit = q.limit.unwrap_or(10);
    let offset = q.offset.unwrap_or(0);
    validation::validate_limit(limit)?;
    validation::validate_offset(offset)?;

    let root = validate_directory(&q.path)?;
    tracing::info!(
        "Paginating files in: {}, offset={}, limit={}",
        validation::sanitize_for_logging(&q.path),
        offset,
        limit
    );
    let report = run_scan(root, q.extension).await?;
    state.metrics.record_scan(report.file_count, report.total_size);

    Ok(Json(report.paginate(limit as usize, offset as usize)))
}

/// Runs the blocking tree walk off the async executor.
///
/// An empty or whitespace-only extension parameter means no filter.
async fn run_scan(root: PathBuf, extension: Option<String>) -> AppResult<Report> {
    let extension = extension.map(|e| e.trim().to_string()).filter(|e| !e.is_empty());
    spawn_blocking(move || analyzer::collect_file_stats(&root, extension.as_deref()))
        .await
        .map_err(|e| AppError::Internal(anyhow!("scan task join error: {}", e)))?
}

/// Rejects paths that do not name an existing directory before any scan work
/// begins.
fn validate_directory(raw: &str) -> AppResult<PathBuf> {
    validation::validate_path(raw)?;
    let path = Path::new(raw);
    if !path.is_dir() {
        tracing::error!("Invalid path requested: {}", validation::sanitize_for_logging(raw));
        return Err(AppError::BadRequest("Invalid directory path".to_string()));
    }
    Ok(path.to_path_buf())
}
