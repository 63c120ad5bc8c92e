use codemetrics::config::*;
use tempfile::TempDir;

#[test]
fn test_default_config_excludes_vcs_and_dependencies() {
    assert!(DEFAULT_EXCLUDES.contains(&"**/.git"));
    assert!(DEFAULT_EXCLUDES.contains(&"**/node_modules"));

    let config = MetricsConfig::default();
    assert!(config.extra_exclude.is_empty());
    assert_eq!(config.max_tree_entries, DEFAULT_MAX_TREE_ENTRIES);
}

#[test]
fn test_save_and_load_config() {
    let dir = TempDir::new().unwrap();
    let mut config = MetricsConfig::for_root(dir.path());
    config.max_tree_entries = 7;
    save_config(dir.path(), &config).unwrap();

    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded, config);
    assert!(!get_config_path(dir.path()).with_extension("tmp").exists());
}

#[test]
fn test_load_missing_config_uses_defaults() {
    let dir = TempDir::new().unwrap();
    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded, MetricsConfig::for_root(dir.path()));
}

#[test]
fn test_load_ignores_recorded_root() {
    let dir = TempDir::new().unwrap();
    let mut config = MetricsConfig::for_root(dir.path());
    config.root_dir = "/somewhere/else".to_string();
    save_config(dir.path(), &config).unwrap();

    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded.root(), dir.path());
}

fn write_raw_config(root: &std::path::Path, contents: &str) {
    std::fs::create_dir_all(get_codemetrics_dir(root)).unwrap();
    std::fs::write(get_config_path(root), contents).unwrap();
}

#[test]
fn test_partial_config_fills_defaults() {
    let dir = TempDir::new().unwrap();
    write_raw_config(dir.path(), r#"{"max_tree_entries": 10}"#);

    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded.max_tree_entries, 10);
    assert_eq!(loaded.version, 1);
    assert!(loaded.extra_exclude.is_empty());
    assert_eq!(loaded.root(), dir.path());
}

#[test]
fn test_empty_object_config_is_default() {
    let dir = TempDir::new().unwrap();
    write_raw_config(dir.path(), "{}");

    let loaded = load_config(dir.path()).unwrap();
    assert_eq!(loaded, MetricsConfig::for_root(dir.path()));
}

#[test]
fn test_configured_excludes_extend_defaults() {
    let dir = TempDir::new().unwrap();
    write_raw_config(
        dir.path(),
        r#"{"version": 1, "root_dir": "", "exclude": ["**/generated"]}"#,
    );

    let config = load_config(dir.path()).unwrap();
    assert_eq!(config.extra_exclude, vec!["**/generated".to_string()]);
    assert!(should_exclude("src/generated", &config));
    assert!(should_exclude("node_modules", &config));
    assert!(should_exclude("dist", &config));
    assert!(should_exclude("logs/app.log", &config));
    assert!(!should_exclude("src/main.ts", &config));
}

#[test]
fn test_empty_exclude_list_keeps_defaults() {
    let dir = TempDir::new().unwrap();
    write_raw_config(dir.path(), r#"{"extra_exclude": []}"#);

    let config = load_config(dir.path()).unwrap();
    assert!(should_exclude("node_modules", &config));
    assert!(should_exclude("target", &config));
}

#[test]
fn test_corrupt_config_is_config_error() {
    let dir = TempDir::new().unwrap();
    write_raw_config(dir.path(), "{ nope");

    let err = load_config(dir.path()).unwrap_err();
    assert!(matches!(err, codemetrics::errors::MetricsError::Config { .. }));
}

#[test]
fn test_should_exclude() {
    let config = MetricsConfig::default();
    assert!(should_exclude("node_modules", &config));
    assert!(should_exclude("packages/web/node_modules", &config));
    assert!(should_exclude("logs/server.log", &config));
    assert!(!should_exclude("src/main.ts", &config));
    assert!(!should_exclude("src/builder.ts", &config));
}

#[test]
fn test_codemetrics_dir_location() {
    let dir = TempDir::new().unwrap();
    let cm_dir = get_codemetrics_dir(dir.path());
    assert!(cm_dir.ends_with(".codemetrics"));
    assert!(get_config_path(dir.path()).ends_with(".codemetrics/config.json"));
}
