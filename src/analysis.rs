use std::fs;
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::Serialize;
use tracing::debug;

use crate::classify::classify;
use crate::complexity;
use crate::config::MetricsConfig;
use crate::errors::{MetricsError, Result};
use crate::scan::scan;
use crate::types::{count_lines, DirectoryReport, FileAnalysis, LanguageTag};

/// Result of analyzing a path: a directory report or a single-file analysis.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum AnalysisPayload {
    Directory(DirectoryReport),
    File(FileAnalysis),
}

/// Resolves a request path against the configured root.
///
/// Absolute paths are kept as is. Empty strings and strings containing NUL
/// bytes are not valid filesystem paths.
pub fn resolve_request_path(root: &Path, raw: &str) -> Result<PathBuf> {
    if raw.trim().is_empty() {
        return Err(MetricsError::InvalidPath {
            path: raw.to_string(),
            message: "path is empty".to_string(),
        });
    }
    if raw.contains('\0') {
        return Err(MetricsError::InvalidPath {
            path: raw.escape_default().to_string(),
            message: "path contains a NUL byte".to_string(),
        });
    }
    Ok(root.join(raw))
}

/// Analyzes whatever lives at `raw` (relative to the root unless absolute).
///
/// The kind of the target is looked up at call time: directories are
/// scanned, regular files analyzed, anything else is unreadable.
pub fn analyze_path(config: &MetricsConfig, raw: &str) -> Result<AnalysisPayload> {
    let path = resolve_request_path(config.root(), raw)?;
    let metadata = fs::metadata(&path).map_err(|e| MetricsError::FileUnreadable {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    if metadata.is_dir() {
        debug!(path = %path.display(), "analyzing directory");
        Ok(AnalysisPayload::Directory(scan(&path, config)?))
    } else if metadata.is_file() {
        debug!(path = %path.display(), "analyzing file");
        Ok(AnalysisPayload::File(analyze_file(&path)?))
    } else {
        Err(MetricsError::FileUnreadable {
            path: path.display().to_string(),
            message: "not a regular file or directory".to_string(),
        })
    }
}

/// Reads one file and computes its metrics.
pub fn analyze_file(path: &Path) -> Result<FileAnalysis> {
    let bytes = fs::read(path).map_err(|e| MetricsError::FileUnreadable {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;
    let text = String::from_utf8_lossy(&bytes);
    let language = classify(path);
    Ok(analyze_text(path, language, &text))
}

/// Computes file metrics for already-loaded text.
pub fn analyze_text(path: &Path, language: LanguageTag, text: &str) -> FileAnalysis {
    let (score, level) = complexity::assess(text);
    let (blank_lines, comment_lines) = line_breakdown(text, language);

    FileAnalysis {
        path: path.to_string_lossy().to_string(),
        language,
        line_count: count_lines(text),
        character_count: text.chars().count(),
        blank_lines,
        comment_lines,
        complexity_score: score,
        complexity_level: level,
        analyzed_at: Utc::now(),
    }
}

/// Counts whitespace-only lines and lines starting with the language's
/// comment prefix.
fn line_breakdown(text: &str, language: LanguageTag) -> (usize, usize) {
    let prefix = language.comment_prefix();
    let mut blank = 0;
    let mut comment = 0;
    for line in text.lines() {
        let trimmed = line.trim_start();
        if trimmed.is_empty() {
            blank += 1;
        } else if prefix.is_some_and(|p| trimmed.starts_with(p)) {
            comment += 1;
        }
    }
    (blank, comment)
}
