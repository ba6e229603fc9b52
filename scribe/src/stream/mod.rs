//! Streaming types for graph runs.
//!
//! Defines stream modes and events for value, update, message, tool-call, and
//! predictive-state streaming. Used by `CompiledStateGraph::stream` and nodes
//! that emit incremental results.
//!
//! # Predictive state
//!
//! While a tool call is still being streamed by the model, a node can surface
//! the partially accumulated value of one of its arguments as
//! `StreamEvent::StateDelta`, letting a frontend render the in-progress value
//! before the call completes. See [`predict`] for the argument extractor.

pub mod predict;

use serde_json::Value;
use std::fmt::Debug;
use tokio::sync::mpsc;

pub use predict::{partial_string_arg, PredictStateConfig};

/// Stream mode selector: which kinds of events to emit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StreamMode {
    /// Emit full state after each node completes.
    Values,
    /// Emit incremental updates with node id and state.
    Updates,
    /// Emit message chunks (LLM streaming).
    Messages,
    /// Emit tool-call events (argument chunks while streaming, full call on completion).
    Tools,
    /// Emit predictive state deltas while a tool argument is still streaming.
    Predict,
    /// Emit task start/end events for each node execution.
    Tasks,
    /// Emit everything task-related (debug mode).
    Debug,
}

/// Metadata attached to streamed messages.
#[derive(Clone, Debug)]
pub struct StreamMetadata {
    /// Graph node id that produced the message.
    pub scribe_node: String,
}

/// One chunk of streamed message content.
#[derive(Clone, Debug)]
pub struct MessageChunk {
    pub content: String,
}

/// Streamed event emitted while running a graph.
#[derive(Clone, Debug)]
pub enum StreamEvent<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Full state snapshot after a node finishes.
    Values(S),
    /// Incremental update with the node id and state after that node.
    Updates { node_id: String, state: S },
    /// Message chunk emitted by a node streaming LLM output.
    Messages {
        chunk: MessageChunk,
        metadata: StreamMetadata,
    },
    /// One chunk of a tool call's streamed arguments.
    ToolCallChunk {
        /// Provider call id, when known.
        call_id: Option<String>,
        /// Tool name, present on the first chunk of a call.
        name: Option<String>,
        /// Raw fragment of the JSON arguments string.
        arguments_delta: String,
    },
    /// A completed tool call with fully parsed arguments.
    ToolCall {
        call_id: Option<String>,
        name: String,
        arguments: Value,
    },
    /// Predicted value of one state key, derived from partially streamed
    /// tool arguments. Emitted repeatedly as the argument grows.
    StateDelta { key: String, value: Value },
    /// Task start event emitted when a node begins execution.
    TaskStart {
        /// Node ID that is starting execution.
        node_id: String,
    },
    /// Task end event emitted when a node finishes execution.
    TaskEnd {
        /// Node ID that finished execution.
        node_id: String,
        /// Result of the task: Ok(()) for success, Err(message) for failure.
        result: Result<(), String>,
    },
    /// The node finished its turn; no further events for this turn follow.
    Done,
}

/// Adapter that converts `MessageChunk` into `StreamEvent::Messages` and sends to `stream_tx`.
///
/// Used by ChatNode to avoid manual channel setup and forward loops.
/// Call `channel()` to get (chunk_tx, chunk_rx), pass `chunk_tx` to `invoke_stream`, then
/// `forward(chunk_rx)` alongside it with `tokio::join!` so all chunks are forwarded before return.
pub struct ChunkToStreamSender<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    stream_tx: mpsc::Sender<StreamEvent<S>>,
    node_id: String,
}

impl<S> ChunkToStreamSender<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    pub fn new(stream_tx: mpsc::Sender<StreamEvent<S>>, node_id: impl Into<String>) -> Self {
        Self {
            stream_tx,
            node_id: node_id.into(),
        }
    }

    /// Returns (chunk_tx, chunk_rx). Pass chunk_tx to `invoke_stream`, then await
    /// `forward(chunk_rx)` together with invoke_stream via `tokio::join!` so forwarding
    /// completes before the caller returns.
    pub fn channel(&self) -> (mpsc::Sender<MessageChunk>, mpsc::Receiver<MessageChunk>) {
        mpsc::channel::<MessageChunk>(128)
    }

    /// Forwards chunks from `chunk_rx` to `stream_tx` as `StreamEvent::Messages`,
    /// returning the number forwarded. Completes when `chunk_rx` is closed
    /// (e.g. when invoke_stream drops its sender).
    pub async fn forward(&self, mut chunk_rx: mpsc::Receiver<MessageChunk>) -> usize {
        let stream_tx = self.stream_tx.clone();
        let node_id = self.node_id.clone();
        let mut forwarded = 0;
        while let Some(chunk) = chunk_rx.recv().await {
            let event = StreamEvent::Messages {
                chunk,
                metadata: StreamMetadata {
                    scribe_node: node_id.clone(),
                },
            };
            if stream_tx.send(event).await.is_ok() {
                forwarded += 1;
            }
        }
        forwarded
    }
}
