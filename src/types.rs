use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::humanize::format_size;

/// Number of entries exposed in `Report::largest_files`.
pub const LARGEST_FILES_COUNT: usize = 10;
/// Hard cap validated on `Report` construction. Not expected to trigger with
/// the fixed top-10 selection; it exists to catch future code paths that
/// bypass the sort-and-truncate step.
pub const LARGEST_FILES_CAP: usize = 50;

/// Detailed information about a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    /// File size in bytes.
    pub size: u64,
    /// Human-readable size representation.
    pub size_human: String,
    /// Absolute path to the file.
    pub path: String,
    /// File name with extension.
    pub name: String,
    /// Lowercase file extension including the leading dot (e.g. ".txt"),
    /// or an empty string for extensionless files.
    pub extension: String,
    /// Last modification time.
    pub modified_time: DateTime<Utc>,
    /// File creation time.
    pub created_time: DateTime<Utc>,
    /// Last access time.
    pub accessed_time: DateTime<Utc>,
    /// Whether the path is a symbolic link (the link itself is described).
    pub is_symlink: bool,
    /// File inode number (0 on platforms without inodes).
    pub inode: u64,
    /// File mode/permission bits.
    pub mode: u32,
    /// Owner user ID.
    pub owner_uid: u32,
    /// Owner group ID.
    pub group_gid: u32,
}

/// Statistics for a specific file extension.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionStats {
    /// Number of files with this extension.
    pub count: u64,
    /// Total size of all files with this extension in bytes.
    pub size: u64,
    /// Human-readable size representation.
    pub size_human: String,
}

impl ExtensionStats {
    pub fn new(count: u64, size: u64) -> Self {
        Self { count, size, size_human: format_size(size) }
    }
}

/// Complete file analysis report for one directory scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// Total number of files analyzed.
    pub file_count: u64,
    /// Total size of all files in bytes.
    pub total_size: u64,
    /// Human-readable total size representation.
    pub total_size_human: String,
    /// Statistics grouped by file extension.
    pub extensions: HashMap<String, ExtensionStats>,
    /// The up-to-10 largest files, sorted by size descending.
    pub largest_files: Vec<FileEntry>,
    /// Complete list of all analyzed files, sorted by size descending.
    pub all_files: Vec<FileEntry>,
}

impl Report {
    /// Builds a report from the aggregator's output.
    ///
    /// Sorts the inventory descending by size (stable, so equal sizes keep
    /// their traversal encounter order), takes the first
    /// [`LARGEST_FILES_COUNT`] entries as `largest_files` and validates the
    /// structural invariants on the result.
    pub fn new(
        file_count: u64,
        total_size: u64,
        extensions: HashMap<String, ExtensionStats>,
        mut all_files: Vec<FileEntry>,
    ) -> anyhow::Result<Self> {
        all_files.sort_by(|a, b| b.size.cmp(&a.size));
        let largest_files: Vec<FileEntry> =
            all_files.iter().take(LARGEST_FILES_COUNT).cloned().collect();
        Self::validate_largest_files(&largest_files)?;
        Ok(Self {
            file_count,
            total_size,
            total_size_human: format_size(total_size),
            extensions,
            largest_files,
            all_files,
        })
    }

    /// Ensures `largest_files` is sorted by size descending and within the cap.
    pub(crate) fn validate_largest_files(largest: &[FileEntry]) -> anyhow::Result<()> {
        if largest.len() > LARGEST_FILES_CAP {
            anyhow::bail!(
                "largest_files holds {} entries, exceeding the cap of {}",
                largest.len(),
                LARGEST_FILES_CAP
            );
        }
        for pair in largest.windows(2) {
            if pair[0].size < pair[1].size {
                anyhow::bail!("largest_files must be sorted by size in descending order");
            }
        }
        Ok(())
    }

    /// Extension statistics sorted by descending count, for the
    /// "list available extensions" response. Ties are broken by extension
    /// name so the output is deterministic across runs.
    pub fn extensions_by_count(&self) -> Vec<ExtensionInfo> {
        let mut infos: Vec<ExtensionInfo> = self
            .extensions
            .iter()
            .map(|(ext, stats)| ExtensionInfo {
                extension: ext.clone(),
                count: stats.count,
                size: stats.size,
                size_human: stats.size_human.clone(),
            })
            .collect();
        infos.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.extension.cmp(&b.extension)));
        infos
    }

    /// Slices the size-ordered inventory into one page.
    ///
    /// Purely positional over `all_files`; no re-scan and no re-sort. Bounds
    /// on `limit` and `offset` are validated before this runs.
    pub fn paginate(&self, limit: usize, offset: usize) -> PaginatedFiles {
        let total = self.all_files.len();
        let results = if offset >= total {
            Vec::new()
        } else {
            self.all_files[offset..(offset + limit).min(total)].to_vec()
        };
        PaginatedFiles::new(total, limit, offset, results)
    }
}

/// Paginated response for file listings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedFiles {
    /// Total number of files available.
    pub total: usize,
    /// Maximum number of files returned.
    pub limit: usize,
    /// Number of files skipped.
    pub offset: usize,
    /// Files for the current page.
    pub results: Vec<FileEntry>,
    /// Whether there are more files after this page.
    pub has_next: bool,
    /// Whether there are files before this page.
    pub has_previous: bool,
}

impl PaginatedFiles {
    pub fn new(total: usize, limit: usize, offset: usize, results: Vec<FileEntry>) -> Self {
        Self {
            total,
            limit,
            offset,
            results,
            has_next: offset + limit < total,
            has_previous: offset > 0,
        }
    }
}

/// Information about a single file extension, for the extension list view.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionInfo {
    pub extension: String,
    pub count: u64,
    pub size: u64,
    pub size_human: String,
}

/// Response containing all available extensions in a directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtensionListResponse {
    /// Directory path that was analyzed.
    pub path: String,
    /// Total number of files in the directory.
    pub total_files: u64,
    /// List of extensions sorted by frequency.
    pub extensions: Vec<ExtensionInfo>,
}

/// Detailed information about a specific file with streaming URLs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileInfoResponse {
    pub path: String,
    pub name: String,
    pub extension: String,
    pub size: u64,
    pub size_human: String,
    /// MIME content type guessed from the file name.
    pub content_type: String,
    /// Last modification time (ISO format).
    pub modified_time: String,
    /// File creation time (ISO format).
    pub created_time: String,
    /// Last access time (ISO format).
    pub accessed_time: String,
    pub is_symlink: bool,
    pub inode: u64,
    pub mode: u32,
    pub owner_uid: u32,
    pub group_gid: u32,
    /// URL to stream the file content inline.
    pub stream_url: String,
    /// URL to download the file as an attachment.
    pub download_url: String,
}
