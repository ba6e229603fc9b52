//! Wire protocol bridge.
//!
//! Event serialization as **type + payload**, plus optional **envelope**
//! (session_id, node_id, event_id). [`Envelope`] and [`EnvelopeState`] live in
//! the `scribe-stream` crate; this module re-exports them and provides the
//! bridge from [`StreamEvent<S>`](crate::stream::StreamEvent) to
//! [`ProtocolEvent`].

pub use scribe_stream::{to_json as stream_event_to_json, Envelope, EnvelopeState, ProtocolEvent};

use crate::stream::{MessageChunk, StreamEvent, StreamMetadata};
use serde::Serialize;
use serde_json::{json, Value};
use std::fmt::Debug;

/// Converts a `StreamEvent<S>` into a `ProtocolEvent` (state-carrying variants serialize `S` to `Value`).
/// Callers then use [`scribe_stream::to_json`] with [`EnvelopeState`] to produce the final JSON.
pub fn stream_event_to_protocol_event<S>(
    ev: &StreamEvent<S>,
) -> Result<ProtocolEvent, serde_json::Error>
where
    S: Serialize + Clone + Send + Sync + Debug + 'static,
{
    let pe = match ev {
        StreamEvent::TaskStart { node_id } => ProtocolEvent::NodeEnter {
            id: node_id.clone(),
        },
        StreamEvent::TaskEnd { node_id, result } => {
            let result_json = match result {
                Ok(()) => json!("Ok"),
                Err(e) => json!({ "Err": e }),
            };
            ProtocolEvent::NodeExit {
                id: node_id.clone(),
                result: result_json,
            }
        }
        StreamEvent::Messages {
            chunk: MessageChunk { content },
            metadata: StreamMetadata { scribe_node },
        } => ProtocolEvent::MessageChunk {
            content: content.clone(),
            id: scribe_node.clone(),
        },
        StreamEvent::ToolCallChunk {
            call_id,
            name,
            arguments_delta,
        } => ProtocolEvent::ToolCallChunk {
            call_id: call_id.clone(),
            name: name.clone(),
            arguments_delta: arguments_delta.clone(),
        },
        StreamEvent::ToolCall {
            call_id,
            name,
            arguments,
        } => ProtocolEvent::ToolCall {
            call_id: call_id.clone(),
            name: name.clone(),
            arguments: arguments.clone(),
        },
        StreamEvent::StateDelta { key, value } => ProtocolEvent::StateDelta {
            key: key.clone(),
            value: value.clone(),
        },
        StreamEvent::Values(state) => ProtocolEvent::Values {
            state: serde_json::to_value(state)?,
        },
        StreamEvent::Updates { node_id, state } => ProtocolEvent::Updates {
            id: node_id.clone(),
            state: serde_json::to_value(state)?,
        },
        StreamEvent::Done => ProtocolEvent::Done,
    };
    Ok(pe)
}

/// Converts a `StreamEvent<S>` to protocol JSON with envelope injected (session_id, node_id, event_id).
/// This is the main API for servers: one call yields the final `Value` for the wire.
pub fn stream_event_to_protocol_value<S>(
    ev: &StreamEvent<S>,
    state: &mut EnvelopeState,
) -> Result<Value, serde_json::Error>
where
    S: Serialize + Clone + Send + Sync + Debug + 'static,
{
    let protocol_ev = stream_event_to_protocol_event(ev)?;
    scribe_stream::to_json(&protocol_ev, state)
}
