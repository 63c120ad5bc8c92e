use std::path::Path;

use crate::types::LanguageTag;

/// Maps a path to its language tag by extension, case-insensitively.
///
/// Files without an extension, or with one not in the table, are `Unknown`.
pub fn classify(path: &Path) -> LanguageTag {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => classify_extension(ext),
        None => LanguageTag::Unknown,
    }
}

/// Maps a bare extension (without the leading dot) to a language tag.
pub fn classify_extension(ext: &str) -> LanguageTag {
    match ext.to_ascii_lowercase().as_str() {
        "ts" | "tsx" | "mts" | "cts" => LanguageTag::TypeScript,
        "js" | "jsx" | "mjs" | "cjs" => LanguageTag::JavaScript,
        "json" | "jsonc" => LanguageTag::Json,
        "md" | "markdown" | "mdx" => LanguageTag::Markdown,
        "yaml" | "yml" | "toml" | "ini" | "cfg" | "conf" => LanguageTag::Config,
        "css" | "scss" | "sass" | "less" => LanguageTag::Stylesheet,
        "py" | "pyi" => LanguageTag::Python,
        "java" => LanguageTag::Java,
        "rs" | "c" | "h" | "cpp" | "cc" | "hpp" | "go" => LanguageTag::Native,
        _ => LanguageTag::Unknown,
    }
}
