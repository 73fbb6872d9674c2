//! Directory scan and aggregation engine.
//!
//! One request triggers one full tree walk. A single pass feeds every
//! successfully stat'd file into the running aggregates (count, total size,
//! per-extension rollups, full inventory); the [`Report`](crate::types::Report)
//! built from that state derives the largest-files view and pagination without
//! touching the filesystem again.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::Context;
use chrono::{DateTime, Utc};
use walkdir::WalkDir;

use crate::error::{validation::sanitize_for_logging, AppError, AppResult};
use crate::humanize::format_size;
use crate::types::{ExtensionStats, FileEntry, Report};

/// Per-extension accumulator, vivified on first touch of an extension key.
#[derive(Debug, Default)]
struct ExtAccum {
    count: u64,
    size: u64,
}

/// Walks `root` and folds every retained file into one [`Report`].
///
/// `root` must already be validated as an existing directory by the caller.
/// An optional extension filter is matched case-insensitively against the
/// lowercased extension (leading dot included); filtered-out files contribute
/// to no statistic. Individual entry failures are logged and skipped - a
/// single bad file never aborts the scan.
pub fn collect_file_stats(root: &Path, extension_filter: Option<&str>) -> AppResult<Report> {
    let filter = extension_filter.map(|f| f.trim().to_lowercase());

    let mut file_count: u64 = 0;
    let mut total_size: u64 = 0;
    let mut by_extension: HashMap<String, ExtAccum> = HashMap::new();
    let mut all_files: Vec<FileEntry> = Vec::new();

    for entry in WalkDir::new(root).follow_links(false) {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                tracing::warn!("Failed to read entry under {}: {}", root.display(), e);
                continue;
            }
        };
        let file_type = entry.file_type();
        if file_type.is_dir() {
            continue;
        }
        // Symlinks that resolve to directories behave like directories: they
        // are neither descended into nor inventoried as files. File and
        // broken symlinks are described as the link itself.
        if file_type.is_symlink()
            && fs::metadata(entry.path()).map(|m| m.is_dir()).unwrap_or(false)
        {
            continue;
        }

        let record = match extract_entry(entry.path()) {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!(
                    "Failed to process {}: {}",
                    sanitize_for_logging(&entry.path().to_string_lossy()),
                    e
                );
                continue;
            }
        };

        if let Some(wanted) = &filter {
            if record.extension != *wanted {
                continue;
            }
        }

        file_count += 1;
        total_size = total_size.saturating_add(record.size);
        let acc = by_extension.entry(record.extension.clone()).or_default();
        acc.count += 1;
        acc.size = acc.size.saturating_add(record.size);
        all_files.push(record);
    }

    let extensions: HashMap<String, ExtensionStats> = by_extension
        .into_iter()
        .map(|(ext, acc)| (ext, ExtensionStats::new(acc.count, acc.size)))
        .collect();

    match &filter {
        Some(f) => tracing::info!(
            "Scanned {} files (filtered by extension: {}), total size {}",
            file_count,
            f,
            format_size(total_size)
        ),
        None => {
            tracing::info!("Scanned {} files, total size {}", file_count, format_size(total_size))
        }
    }

    Report::new(file_count, total_size, extensions, all_files).map_err(AppError::Internal)
}

/// Produces the normalized metadata record for one file path.
///
/// Identity and status come from `symlink_metadata`, so the link itself is
/// described rather than its target. Failures (permission denied, the file
/// vanishing between listing and stating) bubble up to the walk loop, which
/// logs and skips the entry.
pub fn extract_entry(path: &Path) -> anyhow::Result<FileEntry> {
    let meta = fs::symlink_metadata(path)
        .with_context(|| format!("stat failed for {}", path.display()))?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| anyhow::anyhow!("path has no file name: {}", path.display()))?;
    let extension = extension_of(&name);
    let absolute = std::path::absolute(path)
        .with_context(|| format!("cannot absolutize {}", path.display()))?;

    let modified = meta.modified().map(DateTime::<Utc>::from).unwrap_or_else(|_| Utc::now());
    // Creation and access times are not available on every filesystem.
    let created = meta.created().map(DateTime::<Utc>::from).unwrap_or(modified);
    let accessed = meta.accessed().map(DateTime::<Utc>::from).unwrap_or(modified);

    let size = meta.len();
    let (inode, mode, owner_uid, group_gid) = file_identity(&meta);

    Ok(FileEntry {
        size,
        size_human: format_size(size),
        path: absolute.to_string_lossy().to_string(),
        name,
        extension,
        modified_time: modified,
        created_time: created,
        accessed_time: accessed,
        is_symlink: meta.file_type().is_symlink(),
        inode,
        mode,
        owner_uid,
        group_gid,
    })
}

/// Lowercase extension of a base name, including the leading dot.
///
/// The separator must follow at least one non-dot character, so dotfiles
/// like `.bashrc` and names made of dots have no extension, while
/// `archive.tar.gz` yields `.gz`.
pub fn extension_of(name: &str) -> String {
    let leading_dots = name.len() - name.trim_start_matches('.').len();
    match name.rfind('.') {
        Some(idx) if idx >= leading_dots && idx > 0 => name[idx..].to_lowercase(),
        _ => String::new(),
    }
}

#[cfg(unix)]
fn file_identity(meta: &fs::Metadata) -> (u64, u32, u32, u32) {
    use std::os::unix::fs::MetadataExt;
    (meta.ino(), meta.mode(), meta.uid(), meta.gid())
}

#[cfg(not(unix))]
fn file_identity(_meta: &fs::Metadata) -> (u64, u32, u32, u32) {
    // No inode/mode/ownership semantics to report on this platform.
    (0, 0, 0, 0)
}
