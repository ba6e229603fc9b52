//! The document agent: a linear two-node graph over `AgentState`.
//!
//! `start` routes into `chat`; `chat` runs one conversation step and ends the
//! turn. Build with [`build_document_graph`], then `invoke` or `stream` the
//! compiled graph per user turn.

pub mod chat_node;
pub mod prompt;
pub mod start_node;

use std::sync::Arc;

pub use chat_node::ChatNode;
pub use prompt::system_prompt;
pub use start_node::StartNode;

use crate::graph::{CompilationError, CompiledStateGraph, StateGraph, END, START};
use crate::llm::LlmClient;
use crate::state::AgentState;

/// Wires `START → start → chat → END` and compiles the graph.
pub fn build_document_graph(
    llm: Arc<dyn LlmClient>,
) -> Result<CompiledStateGraph<AgentState>, CompilationError> {
    let mut graph = StateGraph::<AgentState>::new();
    graph.add_node("start", Arc::new(StartNode));
    graph.add_node("chat", Arc::new(ChatNode::new(llm)));
    graph.add_edge(START, "start");
    graph.add_edge("start", "chat");
    graph.add_edge("chat", END);
    graph.compile()
}
