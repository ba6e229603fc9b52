//! # Scribe
//!
//! A conversational document-writing agent on a minimal, graph-based agent
//! framework. One shared state type flows through nodes with a simple
//! **state-in, state-out** design: each turn, the user's transcript goes in,
//! the updated transcript and document come out.
//!
//! ## Design principles
//!
//! - **Single state type**: The document graph uses one state struct,
//!   [`AgentState`], that all nodes read from and write to.
//! - **One step per run**: Each node implements a single step — receive state,
//!   return updated state plus a routing decision.
//! - **Minimal core API with optional streaming**: [`CompiledStateGraph::invoke`]
//!   stays state-in/state-out; use [`CompiledStateGraph::stream`] for
//!   incremental output when you need it.
//! - **Predictive state**: While the model is still composing the
//!   `write_document` tool call, the partial `document` argument streams out as
//!   [`StreamEvent::StateDelta`] events so a UI can render the draft live.
//!
//! ## The document agent
//!
//! [`build_document_graph`] wires a linear graph (`START → start → chat → END`).
//! The chat node sends the transcript to the model with the `write_document`
//! tool declared. A plain reply just extends the transcript; a `write_document`
//! call commits the argument to [`AgentState::document`] verbatim, acknowledges
//! the call with a tool record, and appends a synthetic `confirm_changes`
//! assistant record so the frontend can render a confirmation step.
//!
//! ## Main modules
//!
//! - [`graph`]: [`StateGraph`], [`CompiledStateGraph`], [`Node`], [`Next`],
//!   [`RunContext`] — build and run state graphs.
//! - [`agent`]: [`StartNode`], [`ChatNode`], [`build_document_graph`] — the
//!   document agent itself.
//! - [`state`]: [`AgentState`] — transcript, document, frontend actions.
//! - [`message`]: [`Message`] (System / User / Assistant / Tool) and
//!   [`ToolCall`].
//! - [`tool`]: [`ToolSpec`] and the built-in `write_document` declaration.
//! - [`llm`]: [`LlmClient`] trait, [`MockLlm`], OpenAI-compatible [`ChatOpenAI`].
//! - [`stream`]: [`StreamMode`], [`StreamEvent`], predictive-state extraction.
//! - [`protocol`]: wire protocol bridge ([`ProtocolEvent`], [`Envelope`],
//!   [`stream_event_to_protocol_value`]).
//!
//! Key types are re-exported at crate root:
//! `use scribe::{build_document_graph, AgentState, Message, StreamMode};`.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use scribe::{build_document_graph, AgentState, Message, MockLlm};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let llm = Arc::new(MockLlm::with_write_document_call("# Hello\n**world**"));
//! let graph = build_document_graph(llm)?;
//!
//! let mut state = AgentState::default();
//! state.messages.push(Message::user("Bold the second word."));
//!
//! let out = graph.invoke(state, None).await?;
//! println!("{}", out.document.unwrap_or_default());
//! # Ok(())
//! # }
//! ```
//!
//! Run the streaming example:
//! `cargo run -p scribe-examples --example document_mock`

pub mod agent;
pub mod error;
pub mod graph;
pub mod llm;
pub mod message;
pub mod protocol;
pub mod state;
pub mod stream;
pub mod tool;

pub use agent::{build_document_graph, system_prompt, ChatNode, StartNode};
pub use error::AgentError;
pub use graph::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    CompilationError, CompiledStateGraph, Next, Node, RunContext, RunnableConfig, StateGraph, END,
    START,
};
pub use llm::{
    ChatOpenAI, LlmClient, LlmResponse, MockLlm, ToolCallDelta, ToolChoiceMode,
};
pub use message::{Message, ToolCall};
pub use protocol::{
    stream_event_to_protocol_event, stream_event_to_protocol_value, Envelope, EnvelopeState,
    ProtocolEvent,
};
pub use state::AgentState;
pub use stream::{
    partial_string_arg, ChunkToStreamSender, MessageChunk, PredictStateConfig, StreamEvent,
    StreamMetadata, StreamMode,
};
pub use tool::{write_document_tool, ToolSpec, TOOL_CONFIRM_CHANGES, TOOL_WRITE_DOCUMENT};
