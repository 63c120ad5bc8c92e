//! Static capability registry: the resources, tools and prompts this server
//! exposes.
//!
//! Identifiers are parsed into closed enums so that every capability has
//! exactly one handler and an unknown identifier is a typed error.

use serde_json::{json, Map, Value};

use crate::errors::{MetricsError, Result};

/// One string field of a tool's input contract.
#[derive(Debug, Clone, Copy)]
pub struct InputField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
    /// Allowed values; empty means unrestricted.
    pub allowed: &'static [&'static str],
    pub default: Option<&'static str>,
}

/// Static metadata for one resource, tool or prompt.
#[derive(Debug, Clone, Copy)]
pub struct CapabilityDescriptor {
    pub identifier: &'static str,
    pub display_name: &'static str,
    pub description: &'static str,
    pub mime_type: Option<&'static str>,
    pub inputs: &'static [InputField],
}

impl CapabilityDescriptor {
    /// JSON Schema for the input contract.
    pub fn input_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();
        for field in self.inputs {
            let mut prop = Map::new();
            prop.insert("type".to_string(), json!("string"));
            prop.insert("description".to_string(), json!(field.description));
            if !field.allowed.is_empty() {
                prop.insert("enum".to_string(), json!(field.allowed));
            }
            if let Some(default) = field.default {
                prop.insert("default".to_string(), json!(default));
            }
            properties.insert(field.name.to_string(), Value::Object(prop));
            if field.required {
                required.push(field.name);
            }
        }
        json!({
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }

    /// Entry for `resources/list`.
    pub fn as_resource(&self) -> Value {
        json!({
            "uri": self.identifier,
            "name": self.display_name,
            "description": self.description,
            "mimeType": self.mime_type,
        })
    }

    /// Entry for `tools/list`.
    pub fn as_tool(&self) -> Value {
        json!({
            "name": self.identifier,
            "title": self.display_name,
            "description": self.description,
            "inputSchema": self.input_schema(),
        })
    }

    /// Entry for `prompts/list`.
    pub fn as_prompt(&self) -> Value {
        let arguments: Vec<Value> = self
            .inputs
            .iter()
            .map(|f| {
                json!({
                    "name": f.name,
                    "description": f.description,
                    "required": f.required,
                })
            })
            .collect();
        json!({
            "name": self.identifier,
            "title": self.display_name,
            "description": self.description,
            "arguments": arguments,
        })
    }
}

const PROJECT_STRUCTURE: CapabilityDescriptor = CapabilityDescriptor {
    identifier: "codebase://project/structure",
    display_name: "Project Structure",
    description: "Directory report of the configured project root: files, line counts and language histogram.",
    mime_type: Some("application/json"),
    inputs: &[],
};

const GENERATED_README: CapabilityDescriptor = CapabilityDescriptor {
    identifier: "docs://generated/readme",
    display_name: "Generated README",
    description: "Markdown overview of the project generated from a fresh scan.",
    mime_type: Some("text/markdown"),
    inputs: &[],
};

const ANALYZE_PATH: CapabilityDescriptor = CapabilityDescriptor {
    identifier: "analyze_path",
    display_name: "Analyze Path",
    description: "Analyze a file or directory. Directories return a directory report (files, lines, languages); files return line counts and a naive cyclomatic complexity score with a low/medium/high/critical level.",
    mime_type: None,
    inputs: &[InputField {
        name: "path",
        required: true,
        description: "File or directory path, relative to the project root unless absolute",
        allowed: &[],
        default: None,
    }],
};

const GENERATE_DOCUMENTATION: CapabilityDescriptor = CapabilityDescriptor {
    identifier: "generate_documentation",
    display_name: "Generate Documentation",
    description: "Scan the project root and generate README-style documentation as Markdown or a JSON envelope.",
    mime_type: None,
    inputs: &[
        InputField {
            name: "projectName",
                required: true,
            description: "Project name used as the document title",
            allowed: &[],
            default: None,
        },
        InputField {
            name: "format",
                required: false,
            description: "Output format (default: markdown)",
            allowed: &["markdown", "json"],
            default: Some("markdown"),
        },
    ],
};

const CODE_REVIEW: CapabilityDescriptor = CapabilityDescriptor {
    identifier: "code_review",
    display_name: "Code Review",
    description: "Ask for a review of the project, summarizing its files, lines and languages.",
    mime_type: None,
    inputs: &[],
};

/// Resources readable through `resources/read`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceUri {
    ProjectStructure,
    GeneratedReadme,
}

impl ResourceUri {
    pub const ALL: [ResourceUri; 2] = [ResourceUri::ProjectStructure, ResourceUri::GeneratedReadme];

    pub fn descriptor(&self) -> &'static CapabilityDescriptor {
        match self {
            ResourceUri::ProjectStructure => &PROJECT_STRUCTURE,
            ResourceUri::GeneratedReadme => &GENERATED_README,
        }
    }

    /// Exact match against the known URIs.
    pub fn parse(uri: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|r| r.descriptor().identifier == uri)
            .ok_or_else(|| MetricsError::UnknownResource {
                uri: uri.to_string(),
            })
    }
}

/// Tools callable through `tools/call`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolName {
    AnalyzePath,
    GenerateDocumentation,
}

impl ToolName {
    pub const ALL: [ToolName; 2] = [ToolName::AnalyzePath, ToolName::GenerateDocumentation];

    pub fn descriptor(&self) -> &'static CapabilityDescriptor {
        match self {
            ToolName::AnalyzePath => &ANALYZE_PATH,
            ToolName::GenerateDocumentation => &GENERATE_DOCUMENTATION,
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|t| t.descriptor().identifier == name)
            .ok_or_else(|| MetricsError::UnknownTool {
                name: name.to_string(),
            })
    }
}

/// Prompts available through `prompts/get`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptName {
    CodeReview,
}

impl PromptName {
    pub const ALL: [PromptName; 1] = [PromptName::CodeReview];

    pub fn descriptor(&self) -> &'static CapabilityDescriptor {
        match self {
            PromptName::CodeReview => &CODE_REVIEW,
        }
    }

    pub fn parse(name: &str) -> Result<Self> {
        Self::ALL
            .into_iter()
            .find(|p| p.descriptor().identifier == name)
            .ok_or_else(|| MetricsError::UnknownPrompt {
                name: name.to_string(),
            })
    }
}

/// Returns the `resources/list` entries.
pub fn list_resources() -> Vec<Value> {
    ResourceUri::ALL.iter().map(|r| r.descriptor().as_resource()).collect()
}

/// Returns the `tools/list` entries.
pub fn list_tools() -> Vec<Value> {
    ToolName::ALL.iter().map(|t| t.descriptor().as_tool()).collect()
}

/// Returns the `prompts/list` entries.
pub fn list_prompts() -> Vec<Value> {
    PromptName::ALL.iter().map(|p| p.descriptor().as_prompt()).collect()
}
