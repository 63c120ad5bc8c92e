use std::path::Path;

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::errors::Result;
use crate::types::{DirectoryReport, OutputFormat};

/// JSON form of the generated documentation.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentationEnvelope<'a> {
    pub project: &'a str,
    pub structure: &'a DirectoryReport,
    pub generated_at: DateTime<Utc>,
}

/// Wraps a report in the `{project, structure, generatedAt}` envelope.
pub fn documentation_envelope<'a>(
    project: &'a str,
    report: &'a DirectoryReport,
) -> DocumentationEnvelope<'a> {
    DocumentationEnvelope {
        project,
        structure: report,
        generated_at: report.generated_at,
    }
}

/// Renders documentation for `report` in the requested format.
pub fn render_documentation(
    project: &str,
    report: &DirectoryReport,
    format: OutputFormat,
    max_tree_entries: usize,
) -> Result<String> {
    match format {
        OutputFormat::Markdown => Ok(format_documentation_as_markdown(
            project,
            report,
            max_tree_entries,
        )),
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&documentation_envelope(
            project, report,
        ))?),
    }
}

/// Formats a `DirectoryReport` as a README-style Markdown document.
///
/// Sections: title, overview counts, file structure (first
/// `max_tree_entries` files, root-relative), language table sorted by
/// descending count, and a generation timestamp footer.
pub fn format_documentation_as_markdown(
    project: &str,
    report: &DirectoryReport,
    max_tree_entries: usize,
) -> String {
    let mut out = String::new();

    out.push_str(&format!("# {}\n\n", project));

    out.push_str("## Overview\n\n");
    out.push_str(&format!("- **Total Files:** {}\n", report.total_files));
    out.push_str(&format!("- **Total Lines:** {}\n", report.total_lines));
    out.push_str(&format!("- **Languages:** {}\n\n", report.languages.len()));

    out.push_str("## File Structure\n\n");
    if report.files.is_empty() {
        out.push_str("_No files found._\n\n");
    } else {
        let root = Path::new(&report.root_path);
        out.push_str("```\n");
        for file in report.files.iter().take(max_tree_entries) {
            let display = Path::new(&file.path)
                .strip_prefix(root)
                .map(|p| p.to_string_lossy().replace('\\', "/"))
                .unwrap_or_else(|_| file.path.clone());
            out.push_str(&format!("{} ({} lines)\n", display, file.lines()));
        }
        if report.files.len() > max_tree_entries {
            out.push_str(&format!(
                "... and {} more files\n",
                report.files.len() - max_tree_entries
            ));
        }
        out.push_str("```\n\n");
    }

    out.push_str("## Languages\n\n");
    let languages = report.sorted_languages();
    if languages.is_empty() {
        out.push_str("_No languages detected._\n\n");
    } else {
        out.push_str("| Language | Files |\n");
        out.push_str("|----------|-------|\n");
        for (language, count) in &languages {
            out.push_str(&format!("| {} | {} |\n", language, count));
        }
        out.push('\n');
    }

    out.push_str("---\n");
    out.push_str(&format!(
        "_Generated on {}_\n",
        report.generated_at.to_rfc3339()
    ));

    out
}

/// Builds the `code_review` prompt text summarizing a scan.
pub fn format_review_prompt(report: &DirectoryReport) -> String {
    let languages: Vec<String> = report
        .sorted_languages()
        .iter()
        .map(|(language, count)| format!("{} ({})", language, count))
        .collect();
    let language_list = if languages.is_empty() {
        "none detected".to_string()
    } else {
        languages.join(", ")
    };

    format!(
        "Please review the codebase at {}.\n\n\
         It contains {} files with {} total lines across {} languages: {}.\n\n\
         Focus on overall structure, complexity hotspots, and maintainability. \
         Point out the files most likely to need refactoring and explain why.",
        report.root_path,
        report.total_files,
        report.total_lines,
        report.languages.len(),
        language_list,
    )
}
