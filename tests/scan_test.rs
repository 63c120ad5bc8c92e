use codemetrics::config::{load_config, MetricsConfig};
use codemetrics::errors::MetricsError;
use codemetrics::scan::*;
use codemetrics::types::LanguageTag;
use std::fs;
use std::io;
use std::path::Path;
use tempfile::TempDir;

fn make_project() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("src/nested")).unwrap();
    fs::write(root.join("src/main.ts"), "const a = 1;\nconst b = 2;\n").unwrap();
    fs::write(root.join("src/nested/util.py"), "def f():\n    return 1").unwrap();
    fs::write(root.join("README.md"), "# Title\n").unwrap();
    fs::write(root.join("empty.txt"), "").unwrap();
    dir
}

#[test]
fn test_totals_match_files() {
    let dir = make_project();
    let report = scan(dir.path(), &MetricsConfig::default()).unwrap();

    assert_eq!(report.total_files, 4);
    assert_eq!(report.total_files, report.files.len());
    let sum: usize = report.files.iter().map(|f| f.line_count.unwrap()).sum();
    assert_eq!(report.total_lines, sum);
    assert_eq!(report.total_lines, 2 + 2 + 1);
}

#[test]
fn test_language_histogram() {
    let dir = make_project();
    let report = scan(dir.path(), &MetricsConfig::default()).unwrap();

    assert_eq!(report.languages.get(&LanguageTag::TypeScript), Some(&1));
    assert_eq!(report.languages.get(&LanguageTag::Python), Some(&1));
    assert_eq!(report.languages.get(&LanguageTag::Markdown), Some(&1));
    assert_eq!(report.languages.get(&LanguageTag::Unknown), Some(&1));
}

#[test]
fn test_each_file_appears_once() {
    let dir = make_project();
    let report = scan(dir.path(), &MetricsConfig::default()).unwrap();

    for suffix in ["main.ts", "util.py", "README.md", "empty.txt"] {
        let hits = report.files.iter().filter(|f| f.path.ends_with(suffix)).count();
        assert_eq!(hits, 1, "{} should appear exactly once", suffix);
    }
    assert_eq!(report.directories.len(), 2);
    assert!(report.files.iter().all(|f| !f.is_directory && f.children.is_none()));
}

#[test]
fn test_paths_are_absolute() {
    let dir = make_project();
    let report = scan(dir.path(), &MetricsConfig::default()).unwrap();
    assert!(Path::new(&report.root_path).is_absolute());
    for file in &report.files {
        assert!(Path::new(&file.path).is_absolute());
        assert!(file.path.starts_with(&report.root_path));
    }
}

#[test]
fn test_only_vcs_directory_yields_zero_files() {
    let dir = TempDir::new().unwrap();
    fs::create_dir_all(dir.path().join(".git/objects")).unwrap();
    fs::write(dir.path().join(".git/HEAD"), "ref: refs/heads/main\n").unwrap();

    let report = scan(dir.path(), &MetricsConfig::default()).unwrap();
    assert_eq!(report.total_files, 0);
    assert_eq!(report.total_lines, 0);
    assert!(report.directories.is_empty());
}

#[test]
fn test_excluded_globs_and_hidden_entries() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("node_modules/pkg")).unwrap();
    fs::write(root.join("node_modules/pkg/index.js"), "x\n").unwrap();
    fs::create_dir_all(root.join("build")).unwrap();
    fs::write(root.join("build/out.js"), "x\n").unwrap();
    fs::write(root.join("server.log"), "line\n").unwrap();
    fs::write(root.join(".env"), "SECRET=1\n").unwrap();
    fs::write(root.join("index.js"), "x\n").unwrap();

    let report = scan(root, &MetricsConfig::default()).unwrap();
    assert_eq!(report.total_files, 1);
    assert!(report.files[0].path.ends_with("index.js"));
}

#[test]
fn test_custom_exclude_pattern() {
    let dir = make_project();
    let config = MetricsConfig {
        extra_exclude: vec!["**/nested".to_string()],
        ..MetricsConfig::default()
    };
    let report = scan(dir.path(), &config).unwrap();
    assert_eq!(report.total_files, 3);
    assert!(!report.files.iter().any(|f| f.path.ends_with("util.py")));
}

#[test]
fn test_missing_root_is_scan_error() {
    let dir = TempDir::new().unwrap();
    let err = scan(&dir.path().join("missing"), &MetricsConfig::default()).unwrap_err();
    assert!(matches!(err, MetricsError::Scan { .. }));
}

#[test]
fn test_walk_tree_includes_directory_records() {
    let dir = make_project();
    let records = walk_tree(dir.path(), &MetricsConfig::default()).unwrap();

    let dirs: Vec<_> = records.iter().filter(|r| r.is_directory).collect();
    assert_eq!(dirs.len(), 2);
    for d in dirs {
        assert!(d.line_count.is_none());
        assert!(d.children.is_some());
    }
    let src = records.iter().find(|r| r.is_directory && r.name == "src").unwrap();
    let kids = src.children.as_ref().unwrap();
    assert_eq!(kids.len(), 2);
    assert!(kids.iter().any(|k| k.ends_with("main.ts")));
    assert!(kids.iter().any(|k| k.ends_with("nested")));
}

#[test]
fn test_configured_exclude_keeps_default_ignores() {
    let dir = TempDir::new().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("node_modules/dep")).unwrap();
    fs::write(root.join("node_modules/dep/index.js"), "x\n").unwrap();
    fs::create_dir_all(root.join("generated")).unwrap();
    fs::write(root.join("generated/api.ts"), "x\n").unwrap();
    fs::write(root.join("main.ts"), "x\n").unwrap();
    fs::create_dir_all(root.join(".codemetrics")).unwrap();
    fs::write(
        root.join(".codemetrics/config.json"),
        r#"{"version":1,"root_dir":"","exclude":["**/generated"]}"#,
    )
    .unwrap();

    let config = load_config(root).unwrap();
    let report = scan(root, &config).unwrap();
    assert_eq!(report.total_files, 1);
    assert!(report.files[0].path.ends_with("main.ts"));
}

/// Reads from disk except for paths whose file name is in `broken`.
struct BrokenEntries {
    broken: &'static [&'static str],
}

impl BrokenEntries {
    fn check(&self, path: &Path) -> io::Result<()> {
        let name = path.file_name().and_then(|n| n.to_str()).unwrap_or_default();
        if self.broken.contains(&name) {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "permission denied"))
        } else {
            Ok(())
        }
    }
}

impl EntryReader for BrokenEntries {
    fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        self.check(path)?;
        DiskReader.read_file(path)
    }

    fn open_dir(&self, path: &Path) -> io::Result<()> {
        self.check(path)?;
        DiskReader.open_dir(path)
    }
}

#[test]
fn test_unreadable_file_is_skipped() {
    let dir = make_project();
    let reader = BrokenEntries { broken: &["main.ts"] };

    let report = scan_with(dir.path(), &MetricsConfig::default(), &reader).unwrap();
    assert_eq!(report.total_files, 3);
    assert_eq!(report.total_lines, 2 + 1);
    assert!(!report.files.iter().any(|f| f.path.ends_with("main.ts")));
    assert_eq!(report.languages.get(&LanguageTag::TypeScript), None);
}

#[test]
fn test_unreadable_nested_directory_is_skipped() {
    let dir = make_project();
    let reader = BrokenEntries { broken: &["nested"] };

    let report = scan_with(dir.path(), &MetricsConfig::default(), &reader).unwrap();
    assert_eq!(report.total_files, 3);
    assert!(!report.files.iter().any(|f| f.path.ends_with("util.py")));
    assert_eq!(report.directories.len(), 1);
    assert!(report.directories[0].ends_with("src"));
    assert_eq!(report.total_files, report.files.len());
}

#[test]
fn test_every_entry_unreadable_still_succeeds() {
    let dir = make_project();
    let reader = BrokenEntries {
        broken: &["src", "README.md", "empty.txt"],
    };

    let report = scan_with(dir.path(), &MetricsConfig::default(), &reader).unwrap();
    assert_eq!(report.total_files, 0);
    assert_eq!(report.total_lines, 0);
    assert!(report.directories.is_empty());
}
