use std::fs;
use std::path::{Path, PathBuf};

use glob::Pattern;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::errors::{MetricsError, Result};

/// Name of the configuration file stored inside the `.codemetrics` directory.
pub const CONFIG_FILENAME: &str = "config.json";

/// Name of the hidden directory used to store codemetrics settings.
pub const CODEMETRICS_DIR: &str = ".codemetrics";

/// Default cap on the number of files listed in a generated file tree.
pub const DEFAULT_MAX_TREE_ENTRIES: usize = 50;

/// Globs (relative to the root) that every scan skips, whatever the config
/// file says.
pub const DEFAULT_EXCLUDES: &[&str] = &[
    "**/.git",
    "**/.svn",
    "**/.hg",
    "**/node_modules",
    "**/dist",
    "**/build",
    "**/target",
    "**/coverage",
    "**/*.log",
];

/// Configuration for a codemetrics server.
///
/// Built once at startup and shared read-only with every request handler.
/// Fields missing from the config file take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MetricsConfig {
    /// Schema version of the configuration.
    pub version: u32,
    /// Root directory all relative request paths resolve against.
    pub root_dir: String,
    /// Extra glob patterns skipped while scanning, on top of
    /// [`DEFAULT_EXCLUDES`].
    #[serde(alias = "exclude")]
    pub extra_exclude: Vec<String>,
    /// Maximum number of files listed in the generated documentation tree.
    pub max_tree_entries: usize,
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            version: 1,
            root_dir: String::new(),
            extra_exclude: Vec::new(),
            max_tree_entries: DEFAULT_MAX_TREE_ENTRIES,
        }
    }
}

impl MetricsConfig {
    /// Builds a default configuration rooted at `project_root`.
    pub fn for_root(project_root: &Path) -> Self {
        Self {
            root_dir: project_root.to_string_lossy().to_string(),
            ..Self::default()
        }
    }

    /// Returns the configured root as a path.
    pub fn root(&self) -> &Path {
        Path::new(&self.root_dir)
    }
}

/// Returns the path to the `.codemetrics` directory within the given project root.
pub fn get_codemetrics_dir(project_root: &Path) -> PathBuf {
    project_root.join(CODEMETRICS_DIR)
}

/// Returns the path to the configuration file within the `.codemetrics` directory.
pub fn get_config_path(project_root: &Path) -> PathBuf {
    get_codemetrics_dir(project_root).join(CONFIG_FILENAME)
}

/// Loads the configuration from disk.
///
/// If the configuration file does not exist, returns a default configuration
/// with `root_dir` set to the given project root. The root recorded in the
/// file is ignored; the server always serves the root it was started in.
pub fn load_config(project_root: &Path) -> Result<MetricsConfig> {
    let config_path = get_config_path(project_root);

    if !config_path.exists() {
        return Ok(MetricsConfig::for_root(project_root));
    }

    let contents = fs::read_to_string(&config_path).map_err(|e| MetricsError::Config {
        message: format!(
            "failed to read config file '{}': {}",
            config_path.display(),
            e
        ),
    })?;

    let mut config: MetricsConfig =
        serde_json::from_str(&contents).map_err(|e| MetricsError::Config {
            message: format!(
                "failed to parse config file '{}': {}",
                config_path.display(),
                e
            ),
        })?;
    config.root_dir = project_root.to_string_lossy().to_string();

    Ok(config)
}

/// Saves the configuration to disk using an atomic write.
///
/// Writes to a temporary file first and then renames it into place.
pub fn save_config(project_root: &Path, config: &MetricsConfig) -> Result<()> {
    let dir = get_codemetrics_dir(project_root);
    fs::create_dir_all(&dir).map_err(|e| MetricsError::Config {
        message: format!("failed to create directory '{}': {}", dir.display(), e),
    })?;

    let config_path = get_config_path(project_root);
    let tmp_path = config_path.with_extension("tmp");

    let json = serde_json::to_string_pretty(config).map_err(|e| MetricsError::Config {
        message: format!("failed to serialize config: {}", e),
    })?;

    fs::write(&tmp_path, &json).map_err(|e| MetricsError::Config {
        message: format!(
            "failed to write temporary config file '{}': {}",
            tmp_path.display(),
            e
        ),
    })?;

    fs::rename(&tmp_path, &config_path).map_err(|e| MetricsError::Config {
        message: format!(
            "failed to rename '{}' to '{}': {}",
            tmp_path.display(),
            config_path.display(),
            e
        ),
    })?;

    Ok(())
}

/// Compiled exclusion globs: the defaults plus the config's extras.
///
/// Build one per scan and reuse it for every entry.
#[derive(Debug, Clone)]
pub struct ExcludeSet {
    patterns: Vec<Pattern>,
}

impl ExcludeSet {
    /// Compiles the patterns for `config`. Invalid patterns are logged and
    /// ignored.
    pub fn new(config: &MetricsConfig) -> Self {
        let patterns = DEFAULT_EXCLUDES
            .iter()
            .copied()
            .chain(config.extra_exclude.iter().map(String::as_str))
            .filter_map(|raw| match Pattern::new(raw) {
                Ok(pattern) => Some(pattern),
                Err(e) => {
                    warn!(pattern = raw, error = %e, "ignoring invalid exclude pattern");
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    /// Returns `true` if a root-relative path matches any pattern.
    ///
    /// Paths use `/` separators regardless of platform.
    pub fn matches(&self, relative_path: &str) -> bool {
        let match_opts = glob::MatchOptions {
            case_sensitive: true,
            require_literal_separator: false,
            require_literal_leading_dot: false,
        };
        self.patterns
            .iter()
            .any(|pattern| pattern.matches_with(relative_path, match_opts))
    }
}

/// Returns `true` if a root-relative path is excluded under `config`.
pub fn should_exclude(relative_path: &str, config: &MetricsConfig) -> bool {
    ExcludeSet::new(config).matches(relative_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_excludes_vcs_and_dependency_dirs() {
        let config = MetricsConfig::default();
        assert!(should_exclude(".git", &config));
        assert!(should_exclude("node_modules", &config));
        assert!(should_exclude("web/node_modules", &config));
        assert!(should_exclude("target", &config));
        assert!(should_exclude("logs/server.log", &config));
        assert!(should_exclude("debug.log", &config));
    }

    #[test]
    fn test_keeps_source_files() {
        let config = MetricsConfig::default();
        assert!(!should_exclude("src/main.rs", &config));
        assert!(!should_exclude("README.md", &config));
        assert!(!should_exclude("src/builder.rs", &config));
    }

    #[test]
    fn test_invalid_pattern_is_ignored() {
        let config = MetricsConfig {
            extra_exclude: vec!["[".to_string()],
            ..MetricsConfig::default()
        };
        assert!(!should_exclude("src/lib.rs", &config));
        assert!(should_exclude("node_modules", &config));
    }

    #[test]
    fn test_extra_patterns_add_to_defaults() {
        let config = MetricsConfig {
            extra_exclude: vec!["**/generated".to_string()],
            ..MetricsConfig::default()
        };
        let set = ExcludeSet::new(&config);
        assert!(set.matches("src/generated"));
        assert!(set.matches("node_modules"));
        assert!(!set.matches("src/main.rs"));
    }
}
