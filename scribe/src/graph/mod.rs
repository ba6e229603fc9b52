//! Graph construction and execution.
//!
//! Build a `StateGraph<S>` from nodes and explicit edges, `compile()` it into
//! a `CompiledStateGraph<S>`, then `invoke()` for a final state or `stream()`
//! for channel-backed events.

pub mod compile_error;
pub mod compiled;
pub mod config;
pub mod logging;
pub mod next;
pub mod node;
pub mod run_context;
pub mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::CompiledStateGraph;
pub use config::RunnableConfig;
pub use logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_node_state,
};
pub use next::Next;
pub use node::Node;
pub use run_context::RunContext;
pub use state_graph::{StateGraph, END, START};
