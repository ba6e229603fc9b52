//! Agent execution error types.
//!
//! Used by graph nodes and the LLM clients.

use thiserror::Error;

/// Agent execution error.
///
/// Returned by `Node::run` when a step fails. Provider failures are not retried
/// here; they propagate to the caller as a hard failure of the step.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. LLM call failed, graph misuse).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// The model invoked a tool with a payload that does not match its declared
    /// schema (e.g. `write_document` without a string `document` argument).
    /// Fail-fast policy: the step is failed rather than substituting a default.
    #[error("malformed {tool} call: {reason}")]
    MalformedToolCall { tool: String, reason: String },
}
