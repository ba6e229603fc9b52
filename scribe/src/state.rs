//! Shared state for the document agent graph.
//!
//! One state struct flows through the graph (state-in, state-out): the
//! conversation transcript, the single shared document, and the caller's own
//! tool registry. Nodes return a new state; the runner replaces the previous
//! one wholesale.

use serde::{Deserialize, Serialize};

use crate::message::Message;
use crate::tool::ToolSpec;

/// State for the document agent graph: `start → chat`.
///
/// The document is owned here as a whole value. It is only ever replaced in
/// full, exactly when the model invokes `write_document`; before the first
/// write it is absent. `actions` are additional tool declarations supplied by
/// the caller (e.g. frontend actions) and are exposed to the model alongside
/// the built-in `write_document` tool.
///
/// Satisfies `Clone + Send + Sync + Debug + 'static` for use with `Node<AgentState>`
/// and `StateGraph<AgentState>`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AgentState {
    /// Conversation transcript; append-only within one invocation.
    pub messages: Vec<Message>,
    /// The single shared document. Replaced wholesale by `write_document`.
    #[serde(default)]
    pub document: Option<String>,
    /// Caller-supplied tool declarations, offered to the model in addition to
    /// the built-in `write_document` tool.
    #[serde(default)]
    pub actions: Vec<ToolSpec>,
}

impl AgentState {
    /// Returns the content of the chronologically last Assistant message, if any.
    ///
    /// An assistant turn carrying only tool_calls has empty content and returns
    /// `Some("")`; `None` means no assistant message exists at all.
    pub fn last_assistant_reply(&self) -> Option<String> {
        self.messages.iter().rev().find_map(|m| match m {
            Message::Assistant { content, .. } => Some(content.clone()),
            _ => None,
        })
    }
}
