//! Protocol-level event types (type + payload).
//! State-carrying variants use `serde_json::Value`; the bridge in scribe serializes `S` into that.

use serde::Serialize;
use serde_json::Value;

/// Protocol event: wire shape for one stream event (type + payload).
/// The envelope (session_id, node_id, event_id) is applied separately.
///
/// Note on naming:
/// - `id` in a payload means node name (e.g. "start", "chat")
/// - `node_id` in the envelope means node-run span id
/// - `state_delta` carries a state key (e.g. "document") and the in-progress value
#[derive(Clone, Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ProtocolEvent {
    NodeEnter { id: String },
    NodeExit {
        id: String,
        result: Value,
    },
    MessageChunk { content: String, id: String },
    /// One fragment of a tool call's streamed arguments.
    ToolCallChunk {
        call_id: Option<String>,
        name: Option<String>,
        arguments_delta: String,
    },
    /// A complete tool invocation produced by the model.
    ToolCall {
        call_id: Option<String>,
        name: String,
        arguments: Value,
    },
    /// Predictive intermediate state: the partial value of one state key while the
    /// model is still composing the tool arguments that will produce it.
    StateDelta { key: String, value: Value },
    Values { state: Value },
    Updates { id: String, state: Value },
    /// Step completion signal: the streaming channel for this run is finished.
    Done,
}

impl ProtocolEvent {
    /// Serializes this event to a JSON object (type + payload only; no envelope).
    ///
    /// Use crate-level [`crate::to_json`] when you need envelope fields injected.
    pub fn to_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::to_value(self)
    }
}

#[cfg(test)]
mod tests {
    use super::ProtocolEvent;
    use serde_json::json;

    #[test]
    fn state_delta_serializes_key_and_value() {
        let event = ProtocolEvent::StateDelta {
            key: "document".to_string(),
            value: json!("# Hello"),
        };
        let value = event.to_value().unwrap();

        assert_eq!(value["type"], "state_delta");
        assert_eq!(value["key"], "document");
        assert_eq!(value["value"], "# Hello");
    }

    #[test]
    fn updates_uses_payload_id_field() {
        let event = ProtocolEvent::Updates {
            id: "chat".to_string(),
            state: json!({"document": "x"}),
        };
        let value = event.to_value().unwrap();

        assert_eq!(value["type"], "updates");
        assert_eq!(value["id"], "chat");
        assert!(value.get("node_id").is_none());
    }

    #[test]
    fn done_has_no_payload_fields() {
        let value = ProtocolEvent::Done.to_value().unwrap();
        assert_eq!(value["type"], "done");
        assert_eq!(value.as_object().unwrap().len(), 1);
    }
}
