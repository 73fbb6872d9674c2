use std::fs;
use std::path::Path;

use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, HeaderValue},
    response::Response,
    Json,
};
use serde::Deserialize;
use tokio_util::io::ReaderStream;

use crate::{
    analyzer,
    error::{validation::sanitize_for_logging, AppError, AppResult},
    humanize::format_size,
    state::AppState,
    types::FileInfoResponse,
};

#[derive(Debug, Deserialize)]
pub struct FileInfoQuery {
    /// Full path to the file.
    pub file_path: String,
}

#[derive(Debug, Deserialize)]
pub struct StreamQuery {
    /// Full path to the file to stream.
    pub file_path: String,
    /// Force download instead of inline display.
    #[serde(default)]
    pub download: bool,
}

/// `GET /file-info` - metadata for a specific file without streaming its
/// content, plus the derived streaming URLs.
pub async fn get_file_info(
    Query(q): Query<FileInfoQuery>,
) -> AppResult<Json<FileInfoResponse>> {
    ensure_safe_path(&q.file_path)?;
    tracing::info!("Getting info for file: {}", sanitize_for_logging(&q.file_path));

    // The link itself is described, not its target.
    let entry = analyzer::extract_entry(Path::new(&q.file_path))
        .map_err(|e| AppError::IoError(format!("Error getting file info: {}", e)))?;
    let content_type = content_type_for(&entry.name);

    Ok(Json(FileInfoResponse {
        stream_url: format!("/stream?file_path={}", q.file_path),
        download_url: format!("/stream?file_path={}&download=true", q.file_path),
        path: entry.path,
        name: entry.name,
        extension: entry.extension,
        size: entry.size,
        size_human: entry.size_human,
        content_type: content_type.to_string(),
        modified_time: entry.modified_time.to_rfc3339(),
        created_time: entry.created_time.to_rfc3339(),
        accessed_time: entry.accessed_time.to_rfc3339(),
        is_symlink: entry.is_symlink,
        inode: entry.inode,
        mode: entry.mode,
        owner_uid: entry.owner_uid,
        group_gid: entry.group_gid,
    }))
}

/// `GET /stream` - raw byte stream of a file in fixed-size chunks.
///
/// `Accept-Ranges: bytes` is advertised but range requests are not honored;
/// the full content is always streamed.
pub async fn stream_file(
    State(state): State<AppState>,
    Query(q): Query<StreamQuery>,
) -> AppResult<Response> {
    ensure_safe_path(&q.file_path)?;

    let meta = tokio::fs::metadata(&q.file_path)
        .await
        .map_err(|e| AppError::IoError(format!("Error streaming file: {}", e)))?;
    let file_size = meta.len();
    let filename = Path::new(&q.file_path)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| q.file_path.clone());
    let content_type = content_type_for(&filename);

    tracing::info!(
        "Streaming file: {} ({})",
        sanitize_for_logging(&q.file_path),
        format_size(file_size)
    );

    let file = tokio::fs::File::open(&q.file_path)
        .await
        .map_err(|e| AppError::IoError(format!("Error streaming file: {}", e)))?;
    state.metrics.record_stream(file_size);

    // The stream owns the file handle; dropping the response body on client
    // abort or read error closes it.
    let stream = ReaderStream::with_capacity(file, state.config.stream.chunk_size);
    let mut response = Response::new(Body::from_stream(stream));

    let headers = response.headers_mut();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    headers.insert(header::CONTENT_LENGTH, HeaderValue::from(file_size));
    headers.insert(header::ACCEPT_RANGES, HeaderValue::from_static("bytes"));
    let disposition = if q.download { "attachment" } else { "inline" };
    if let Ok(value) = HeaderValue::from_str(&format!("{}; filename=\"{}\"", disposition, filename)) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }

    Ok(response)
}

/// A path is safe only if it resolves (symlinks and relative segments
/// included) to an existing regular file. Resolution is not confined to any
/// root directory; any file readable by the server process can be named.
///
/// Callers keep working with the raw path afterwards: `/file-info` describes
/// a symlink itself rather than its target.
fn ensure_safe_path(raw: &str) -> AppResult<()> {
    let invalid =
        || AppError::BadRequest("Invalid file path or file does not exist".to_string());

    if raw.trim().is_empty() || raw.contains('\0') {
        tracing::error!("Invalid or unsafe file path requested: {}", sanitize_for_logging(raw));
        return Err(invalid());
    }
    let resolved = fs::canonicalize(raw).map_err(|_| {
        tracing::error!("Invalid or unsafe file path requested: {}", sanitize_for_logging(raw));
        invalid()
    })?;
    let meta = fs::metadata(&resolved).map_err(|_| invalid())?;
    if !meta.is_file() {
        tracing::error!("Invalid or unsafe file path requested: {}", sanitize_for_logging(raw));
        return Err(invalid());
    }
    Ok(())
}

/// Guesses the MIME content type from the file name, falling back to
/// `application/octet-stream`.
pub fn content_type_for(name: &str) -> &'static str {
    match analyzer::extension_of(name).as_str() {
        ".txt" | ".log" | ".md" => "text/plain",
        ".html" | ".htm" => "text/html",
        ".css" => "text/css",
        ".csv" => "text/csv",
        ".js" | ".mjs" => "text/javascript",
        ".json" => "application/json",
        ".xml" => "application/xml",
        ".pdf" => "application/pdf",
        ".zip" => "application/zip",
        ".gz" => "application/gzip",
        ".tar" => "application/x-tar",
        ".png" => "image/png",
        ".jpg" | ".jpeg" => "image/jpeg",
        ".gif" => "image/gif",
        ".svg" => "image/svg+xml",
        ".webp" => "image/webp",
        ".ico" => "image/vnd.microsoft.icon",
        ".mp3" => "audio/mpeg",
        ".wav" => "audio/wav",
        ".ogg" => "audio/ogg",
        ".mp4" => "video/mp4",
        ".webm" => "video/webm",
        ".woff" => "font/woff",
        ".woff2" => "font/woff2",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::content_type_for;

    #[test]
    fn guesses_common_types_by_extension() {
        assert_eq!(content_type_for("notes.txt"), "text/plain");
        assert_eq!(content_type_for("INDEX.HTML"), "text/html");
        assert_eq!(content_type_for("photo.jpeg"), "image/jpeg");
        assert_eq!(content_type_for("data.json"), "application/json");
    }

    #[test]
    fn unknown_and_missing_extensions_fall_back() {
        assert_eq!(content_type_for("binary.qqq"), "application/octet-stream");
        assert_eq!(content_type_for("Makefile"), "application/octet-stream");
        assert_eq!(content_type_for(".bashrc"), "application/octet-stream");
    }
}
