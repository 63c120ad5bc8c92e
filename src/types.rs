use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Coarse classification of a file by extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LanguageTag {
    TypeScript,
    JavaScript,
    Json,
    Markdown,
    Config,
    Stylesheet,
    Python,
    Java,
    Native,
    Unknown,
}

impl LanguageTag {
    /// Returns the string representation of this language tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            LanguageTag::TypeScript => "typescript",
            LanguageTag::JavaScript => "javascript",
            LanguageTag::Json => "json",
            LanguageTag::Markdown => "markdown",
            LanguageTag::Config => "config",
            LanguageTag::Stylesheet => "stylesheet",
            LanguageTag::Python => "python",
            LanguageTag::Java => "java",
            LanguageTag::Native => "native",
            LanguageTag::Unknown => "unknown",
        }
    }

    /// Single-line comment prefix, if the language has one.
    pub fn comment_prefix(&self) -> Option<&'static str> {
        match self {
            LanguageTag::TypeScript
            | LanguageTag::JavaScript
            | LanguageTag::Java
            | LanguageTag::Native => Some("//"),
            LanguageTag::Python | LanguageTag::Config => Some("#"),
            LanguageTag::Stylesheet => Some("/*"),
            LanguageTag::Json | LanguageTag::Markdown | LanguageTag::Unknown => None,
        }
    }
}

impl fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One filesystem entry discovered by a scan.
///
/// `line_count` is set only for files and `children` only for directories;
/// use [`FileRecord::file`] and [`FileRecord::directory`] to build records.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileRecord {
    pub path: String,
    pub name: String,
    pub extension: String,
    pub language: LanguageTag,
    pub size_bytes: u64,
    pub last_modified: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_count: Option<usize>,
    pub is_directory: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<String>>,
}

/// Stat data shared by file and directory records.
#[derive(Debug, Clone, PartialEq)]
pub struct EntryMeta {
    pub path: String,
    pub name: String,
    pub extension: String,
    pub language: LanguageTag,
    pub size_bytes: u64,
    pub last_modified: DateTime<Utc>,
}

impl FileRecord {
    /// Builds a record for a non-directory entry.
    pub fn file(meta: EntryMeta, line_count: usize) -> Self {
        Self {
            path: meta.path,
            name: meta.name,
            extension: meta.extension,
            language: meta.language,
            size_bytes: meta.size_bytes,
            last_modified: meta.last_modified,
            line_count: Some(line_count),
            is_directory: false,
            children: None,
        }
    }

    /// Builds a record for a directory with its ordered child paths.
    pub fn directory(meta: EntryMeta, children: Vec<String>) -> Self {
        Self {
            path: meta.path,
            name: meta.name,
            extension: meta.extension,
            language: meta.language,
            size_bytes: meta.size_bytes,
            last_modified: meta.last_modified,
            line_count: None,
            is_directory: true,
            children: Some(children),
        }
    }

    /// Lines in this entry; zero for directories.
    pub fn lines(&self) -> usize {
        self.line_count.unwrap_or(0)
    }
}

/// Aggregate statistics over a directory scan.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DirectoryReport {
    pub root_path: String,
    pub total_files: usize,
    pub total_lines: usize,
    pub languages: HashMap<LanguageTag, usize>,
    pub directories: Vec<String>,
    pub files: Vec<FileRecord>,
    pub generated_at: DateTime<Utc>,
}

impl DirectoryReport {
    /// Folds scanned records into a report.
    ///
    /// Directory records contribute their path to `directories`; every other
    /// record lands in `files` and is counted in the totals and histogram.
    pub fn from_records(root_path: String, records: Vec<FileRecord>) -> Self {
        let mut directories = Vec::new();
        let mut files = Vec::new();
        for record in records {
            if record.is_directory {
                directories.push(record.path);
            } else {
                files.push(record);
            }
        }

        let mut languages: HashMap<LanguageTag, usize> = HashMap::new();
        for file in &files {
            *languages.entry(file.language).or_insert(0) += 1;
        }

        Self {
            root_path,
            total_files: files.len(),
            total_lines: files.iter().map(FileRecord::lines).sum(),
            languages,
            directories,
            files,
            generated_at: Utc::now(),
        }
    }

    /// Language histogram sorted by descending count, ties broken by name.
    pub fn sorted_languages(&self) -> Vec<(LanguageTag, usize)> {
        let mut sorted: Vec<(LanguageTag, usize)> =
            self.languages.iter().map(|(k, v)| (*k, *v)).collect();
        sorted.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.as_str().cmp(b.0.as_str())));
        sorted
    }
}

/// Severity band for a complexity score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComplexityLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl ComplexityLevel {
    /// Maps a score to its band: `<=5` low, `<=10` medium, `<=20` high, else critical.
    pub fn from_score(score: u32) -> Self {
        match score {
            0..=5 => ComplexityLevel::Low,
            6..=10 => ComplexityLevel::Medium,
            11..=20 => ComplexityLevel::High,
            _ => ComplexityLevel::Critical,
        }
    }
}

/// Metrics for a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileAnalysis {
    pub path: String,
    pub language: LanguageTag,
    pub line_count: usize,
    pub character_count: usize,
    pub blank_lines: usize,
    pub comment_lines: usize,
    pub complexity_score: u32,
    pub complexity_level: ComplexityLevel,
    pub analyzed_at: DateTime<Utc>,
}

/// Output format for generated documentation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Markdown,
    Json,
}

#[allow(clippy::should_implement_trait)]
impl OutputFormat {
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "markdown" => Some(Self::Markdown),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Counts lines the way editors do: every `\n` ends a line, and trailing
/// text without a terminator is one more line.
pub fn count_lines(text: &str) -> usize {
    let terminated = text.matches('\n').count();
    if text.is_empty() || text.ends_with('\n') {
        terminated
    } else {
        terminated + 1
    }
}
