//! Run context passed into nodes for streaming-aware execution.
//!
//! Holds runnable config, optional stream sender, and selected stream modes.

use std::collections::HashSet;
use std::fmt::Debug;

use tokio::sync::mpsc;

use crate::stream::{StreamEvent, StreamMode};

use super::RunnableConfig;

/// Run context passed into nodes for streaming-aware execution.
///
/// Holds runnable config, optional stream sender, and the set of enabled
/// stream modes. When `stream_tx` is `None`, nodes run without emitting events.
#[derive(Clone)]
pub struct RunContext<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Config for the current run (thread_id).
    pub config: RunnableConfig,
    /// Optional sender for streaming events.
    pub stream_tx: Option<mpsc::Sender<StreamEvent<S>>>,
    /// Enabled stream modes (Values, Updates, Messages, Tools, Predict, ...).
    pub stream_mode: HashSet<StreamMode>,
}

impl<S> RunContext<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Creates a new RunContext with no streaming.
    pub fn new(config: RunnableConfig) -> Self {
        Self {
            config,
            stream_tx: None,
            stream_mode: HashSet::new(),
        }
    }

    /// Checks if a specific stream mode is enabled.
    pub fn is_streaming_mode(&self, mode: StreamMode) -> bool {
        self.stream_mode.contains(&mode)
    }

    /// Sends an event when a sender is attached, ignoring a closed receiver.
    pub async fn emit(&self, event: StreamEvent<S>) {
        if let Some(tx) = &self.stream_tx {
            let _ = tx.send(event).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AgentState;

    /// **Scenario**: A fresh RunContext has no sender and no enabled modes.
    #[test]
    fn new_context_has_no_streaming() {
        let ctx = RunContext::<AgentState>::new(RunnableConfig::default());
        assert!(ctx.stream_tx.is_none());
        assert!(!ctx.is_streaming_mode(StreamMode::Messages));
    }

    /// **Scenario**: emit on a context without a sender is a no-op.
    #[tokio::test]
    async fn emit_without_sender_is_noop() {
        let ctx = RunContext::<AgentState>::new(RunnableConfig::default());
        ctx.emit(StreamEvent::Done).await;
    }
}
