/// Renders scan results as Markdown documents, JSON envelopes and prompt text.
pub mod formatter;

pub use formatter::{
    documentation_envelope, format_documentation_as_markdown, format_review_prompt,
    render_documentation, DocumentationEnvelope,
};
