//! Handlers behind the registry: one function per resource, tool and prompt.

use serde_json::{json, Value};

use crate::analysis::analyze_path;
use crate::config::MetricsConfig;
use crate::errors::{MetricsError, Result};
use crate::report::{format_review_prompt, render_documentation};
use crate::scan::scan;
use crate::types::OutputFormat;

use super::registry::{PromptName, ResourceUri, ToolName};

/// Wraps text in the single `text` content block tool results carry.
fn text_content(text: String) -> Value {
    json!({
        "content": [{ "type": "text", "text": text }]
    })
}

fn required_str<'a>(args: &'a Value, name: &str) -> Result<&'a str> {
    args.get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| {
            MetricsError::invalid_params(format!("missing required parameter: {}", name))
        })
}

/// Title used when documentation is generated without an explicit name.
fn default_project_name(config: &MetricsConfig) -> String {
    config
        .root()
        .canonicalize()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().to_string()))
        .unwrap_or_else(|| "Project".to_string())
}

/// Dispatches a tool call to its handler.
pub fn handle_tool_call(config: &MetricsConfig, tool: ToolName, args: &Value) -> Result<Value> {
    match tool {
        ToolName::AnalyzePath => handle_analyze_path(config, args),
        ToolName::GenerateDocumentation => handle_generate_documentation(config, args),
    }
}

/// Handles `analyze_path` tool calls.
fn handle_analyze_path(config: &MetricsConfig, args: &Value) -> Result<Value> {
    let path = required_str(args, "path")?;
    let payload = analyze_path(config, path)?;
    let output = serde_json::to_string_pretty(&payload)?;
    Ok(text_content(output))
}

/// Handles `generate_documentation` tool calls.
fn handle_generate_documentation(config: &MetricsConfig, args: &Value) -> Result<Value> {
    let project = required_str(args, "projectName")?;

    let format = match args.get("format") {
        None | Some(Value::Null) => OutputFormat::default(),
        Some(v) => v
            .as_str()
            .and_then(OutputFormat::from_str)
            .ok_or_else(|| {
                MetricsError::invalid_params(format!(
                    "unsupported format: {} (expected \"markdown\" or \"json\")",
                    v
                ))
            })?,
    };

    let report = scan(config.root(), config)?;
    let output = render_documentation(project, &report, format, config.max_tree_entries)?;
    Ok(text_content(output))
}

/// Reads one resource, scanning the root fresh.
pub fn read_resource(config: &MetricsConfig, resource: ResourceUri) -> Result<Value> {
    let descriptor = resource.descriptor();
    let report = scan(config.root(), config)?;

    let text = match resource {
        ResourceUri::ProjectStructure => serde_json::to_string_pretty(&report)?,
        ResourceUri::GeneratedReadme => render_documentation(
            &default_project_name(config),
            &report,
            OutputFormat::Markdown,
            config.max_tree_entries,
        )?,
    };

    Ok(json!({
        "contents": [{
            "uri": descriptor.identifier,
            "mimeType": descriptor.mime_type,
            "text": text,
        }]
    }))
}

/// Builds one prompt from a fresh scan.
pub fn get_prompt(config: &MetricsConfig, prompt: PromptName) -> Result<Value> {
    match prompt {
        PromptName::CodeReview => {
            let report = scan(config.root(), config)?;
            Ok(json!({
                "description": prompt.descriptor().description,
                "messages": [{
                    "role": "user",
                    "content": { "type": "text", "text": format_review_prompt(&report) }
                }]
            }))
        }
    }
}
