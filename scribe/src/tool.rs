//! Tool declarations exposed to the model.
//!
//! The `write_document` declaration is the fixed contract of this agent: one
//! string parameter `document` holding the full replacement text. It is built
//! once at process start and never mutated. `confirm_changes` is never declared
//! to the model; it only appears in synthetic assistant messages after a
//! successful write, signalling that a confirmation affordance should be shown.

use once_cell::sync::Lazy;
use serde_json::{json, Value};

/// Name of the document-writing tool.
pub const TOOL_WRITE_DOCUMENT: &str = "write_document";

/// Name of the zero-argument confirmation invocation synthesized after a write.
pub const TOOL_CONFIRM_CHANGES: &str = "confirm_changes";

/// Tool specification: name, description, and a JSON Schema for arguments.
///
/// **Interaction**: passed to `LlmClient::invoke` per call; the caller's own
/// registry (`AgentState::actions`) uses the same shape.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct ToolSpec {
    /// Tool name as sent in the function declaration.
    pub name: String,
    /// Human-readable description for the model.
    pub description: Option<String>,
    /// JSON Schema for arguments.
    pub input_schema: Value,
}

static WRITE_DOCUMENT: Lazy<ToolSpec> = Lazy::new(|| ToolSpec {
    name: TOOL_WRITE_DOCUMENT.to_string(),
    description: Some(
        "Write a document. Use markdown formatting to format the document. \
         It's good to format the document extensively so it's easy to read. \
         You can use all kinds of markdown. However, do not use italic or \
         strike-through formatting, it's reserved for another purpose. You \
         MUST write the full document, even when changing only a few words. \
         When making edits to the document, try to make them minimal - do not \
         change every word."
            .to_string(),
    ),
    input_schema: json!({
        "type": "object",
        "properties": {
            "document": {
                "type": "string",
                "description": "The document to edit"
            }
        }
    }),
});

/// Returns the process-wide `write_document` declaration.
pub fn write_document_tool() -> &'static ToolSpec {
    &WRITE_DOCUMENT
}
