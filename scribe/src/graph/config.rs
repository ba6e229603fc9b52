//! Per-run configuration for graph invocation.

use serde::{Deserialize, Serialize};

/// Config for one graph run.
///
/// `thread_id` identifies the conversation/session; the protocol bridge uses it
/// as the envelope `session_id` when streaming to a frontend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunnableConfig {
    /// Unique id for this conversation/thread.
    pub thread_id: Option<String>,
}
