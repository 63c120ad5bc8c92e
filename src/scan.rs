use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use chrono::{DateTime, Utc};
use tracing::{debug, info, warn};
use walkdir::{DirEntry, WalkDir};

use crate::classify::classify;
use crate::config::{ExcludeSet, MetricsConfig};
use crate::errors::{MetricsError, Result};
use crate::types::{count_lines, DirectoryReport, EntryMeta, FileRecord};

/// A record whose children are only known once the walk has finished.
enum Pending {
    File(FileRecord),
    Directory(EntryMeta, PathBuf),
}

/// Filesystem access used while walking.
///
/// The walk itself is done by walkdir; these calls are the per-entry reads
/// whose failures are skipped rather than fatal.
pub trait EntryReader {
    /// Reads a regular file's bytes.
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Checks that a nested directory can be listed before descending.
    fn open_dir(&self, path: &Path) -> io::Result<()>;
}

/// Reads straight from disk.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiskReader;

impl EntryReader for DiskReader {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        fs::read(path)
    }

    fn open_dir(&self, path: &Path) -> io::Result<()> {
        fs::read_dir(path).map(|_| ())
    }
}

/// Scans `root` recursively and folds the result into a [`DirectoryReport`].
///
/// Fails only when the root itself is missing, not a directory, or cannot be
/// listed. Nested entries that cannot be read are logged and skipped.
pub fn scan(root: &Path, config: &MetricsConfig) -> Result<DirectoryReport> {
    scan_with(root, config, &DiskReader)
}

/// [`scan`] with a custom [`EntryReader`].
pub fn scan_with(
    root: &Path,
    config: &MetricsConfig,
    reader: &dyn EntryReader,
) -> Result<DirectoryReport> {
    let start = Instant::now();
    let canonical = canonical_root(root)?;
    let records = walk_canonical(&canonical, &ExcludeSet::new(config), reader);
    let report = DirectoryReport::from_records(canonical.to_string_lossy().to_string(), records);

    info!(
        root = %report.root_path,
        files = report.total_files,
        lines = report.total_lines,
        directories = report.directories.len(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "scan complete"
    );
    Ok(report)
}

/// Walks `root` and returns file and directory records in discovery order.
///
/// Directory records carry the paths of their non-excluded immediate
/// children. The root itself is not part of the result.
pub fn walk_tree(root: &Path, config: &MetricsConfig) -> Result<Vec<FileRecord>> {
    let canonical = canonical_root(root)?;
    Ok(walk_canonical(&canonical, &ExcludeSet::new(config), &DiskReader))
}

fn canonical_root(root: &Path) -> Result<PathBuf> {
    let scan_error = |message: String| MetricsError::Scan {
        path: root.display().to_string(),
        message,
    };

    let canonical = root
        .canonicalize()
        .map_err(|e| scan_error(format!("cannot resolve root: {}", e)))?;
    let metadata = fs::metadata(&canonical)
        .map_err(|e| scan_error(format!("cannot stat root: {}", e)))?;
    if !metadata.is_dir() {
        return Err(scan_error("root is not a directory".to_string()));
    }
    // Probe the listing up front so an unreadable root fails the whole scan.
    fs::read_dir(&canonical).map_err(|e| scan_error(format!("cannot list root: {}", e)))?;

    Ok(canonical)
}

fn walk_canonical(
    root: &Path,
    excludes: &ExcludeSet,
    reader: &dyn EntryReader,
) -> Vec<FileRecord> {
    let mut pending = Vec::new();
    let mut children: HashMap<PathBuf, Vec<String>> = HashMap::new();

    let mut walker = WalkDir::new(root)
        .min_depth(1)
        .follow_links(false)
        .into_iter()
        .filter_entry(|e| is_visible(e, root, excludes));

    while let Some(entry) = walker.next() {
        let entry = match entry {
            Ok(e) => e,
            Err(e) => {
                warn!(
                    path = ?e.path(),
                    error = %e,
                    "skipping unreadable entry"
                );
                continue;
            }
        };

        let path = entry.path();
        let meta = match entry_meta(&entry) {
            Ok(m) => m,
            Err(e) => {
                warn!(path = %path.display(), error = %e, "skipping entry that failed to stat");
                if entry.file_type().is_dir() {
                    walker.skip_current_dir();
                }
                continue;
            }
        };

        let record = if entry.file_type().is_dir() {
            if let Err(e) = reader.open_dir(path) {
                warn!(path = %path.display(), error = %e, "skipping directory that failed to list");
                walker.skip_current_dir();
                continue;
            }
            Pending::Directory(meta, path.to_path_buf())
        } else if entry.file_type().is_file() {
            match reader.read_file(path) {
                Ok(bytes) => {
                    let lines = count_lines(&String::from_utf8_lossy(&bytes));
                    Pending::File(FileRecord::file(meta, lines))
                }
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "skipping file that failed to read");
                    continue;
                }
            }
        } else {
            debug!(path = %path.display(), "non-regular file, not counting lines");
            Pending::File(FileRecord::file(meta, 0))
        };

        if let Some(parent) = path.parent() {
            children
                .entry(parent.to_path_buf())
                .or_default()
                .push(path.to_string_lossy().to_string());
        }
        pending.push(record);
    }

    pending
        .into_iter()
        .map(|p| match p {
            Pending::File(record) => record,
            Pending::Directory(meta, path) => {
                let kids = children.remove(&path).unwrap_or_default();
                FileRecord::directory(meta, kids)
            }
        })
        .collect()
}

/// Hidden entries and entries matching an exclude glob are not yielded and,
/// for directories, not descended into.
fn is_visible(entry: &DirEntry, root: &Path, excludes: &ExcludeSet) -> bool {
    if entry.depth() == 0 {
        return true;
    }
    if entry.file_name().to_string_lossy().starts_with('.') {
        return false;
    }
    match entry.path().strip_prefix(root) {
        Ok(relative) => {
            let rel = relative.to_string_lossy().replace('\\', "/");
            !excludes.matches(&rel)
        }
        Err(_) => true,
    }
}

fn entry_meta(entry: &DirEntry) -> Result<EntryMeta> {
    let metadata = entry.metadata().map_err(|e| MetricsError::FileUnreadable {
        path: entry.path().display().to_string(),
        message: e.to_string(),
    })?;
    let modified = metadata.modified()?;
    let path = entry.path();

    Ok(EntryMeta {
        path: path.to_string_lossy().to_string(),
        name: entry.file_name().to_string_lossy().to_string(),
        extension: dotted_extension(path),
        language: classify(path),
        size_bytes: metadata.len(),
        last_modified: DateTime::<Utc>::from(modified),
    })
}

/// Extension with its leading dot, or an empty string.
pub(crate) fn dotted_extension(path: &Path) -> String {
    path.extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default()
}
