//! Message and tool-call types for the conversation transcript.
//!
//! Message roles: System (usually first in the list), User, Assistant, Tool.
//! Assistant messages optionally carry the tool invocations the model requested;
//! Tool messages acknowledge one invocation by `call_id`. The transcript is
//! append-only within one graph invocation.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// A single tool invocation produced by the model.
///
/// `arguments` is canonically a JSON-encoded string. Provider payloads are not
/// uniform: some emit the arguments as a string, others as a structured object.
/// Deserialization normalizes both shapes at the boundary so internal logic
/// only ever sees the string form; use [`ToolCall::args_value`] to parse it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ToolCall {
    /// Tool name as declared to the model (e.g. `write_document`).
    pub name: String,
    /// Arguments as a JSON-encoded string.
    #[serde(deserialize_with = "arguments_string_or_object")]
    pub arguments: String,
    /// Provider-generated call id; used to correlate the tool-result message.
    pub id: Option<String>,
}

impl ToolCall {
    /// Parses the arguments into a JSON value.
    pub fn args_value(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.arguments)
    }
}

/// Accepts `arguments` either as a JSON-encoded string or as a structured
/// object, normalizing to the string form.
fn arguments_string_or_object<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    match value {
        Value::String(s) => Ok(s),
        other => serde_json::to_string(&other).map_err(serde::de::Error::custom),
    }
}

/// A single message in the conversation.
///
/// Roles: system prompt, user input, assistant reply (optionally with tool
/// invocations), and tool result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Message {
    /// System prompt; typically placed first in the message list.
    System(String),
    /// User input.
    User(String),
    /// Model reply; `tool_calls` is empty for plain text turns.
    Assistant {
        content: String,
        #[serde(default)]
        tool_calls: Vec<ToolCall>,
    },
    /// Result of one tool invocation, correlated by `call_id`.
    Tool { content: String, call_id: String },
}

impl Message {
    /// Creates a system message.
    pub fn system(content: impl Into<String>) -> Self {
        Self::System(content.into())
    }

    /// Creates a user message.
    pub fn user(content: impl Into<String>) -> Self {
        Self::User(content.into())
    }

    /// Creates a plain assistant message with no tool calls.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_calls: vec![],
        }
    }

    /// Creates an assistant message carrying tool invocations.
    pub fn assistant_with_tool_calls(
        content: impl Into<String>,
        tool_calls: Vec<ToolCall>,
    ) -> Self {
        Self::Assistant {
            content: content.into(),
            tool_calls,
        }
    }

    /// Creates a tool-result message for the invocation with `call_id`.
    pub fn tool(content: impl Into<String>, call_id: impl Into<String>) -> Self {
        Self::Tool {
            content: content.into(),
            call_id: call_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: constructors produce the correct variant with content.
    #[test]
    fn message_constructors() {
        let sys = Message::system("s");
        assert!(matches!(&sys, Message::System(c) if c == "s"));
        let usr = Message::user("u");
        assert!(matches!(&usr, Message::User(c) if c == "u"));
        let ast = Message::assistant("a");
        assert!(
            matches!(&ast, Message::Assistant { content, tool_calls } if content == "a" && tool_calls.is_empty())
        );
        let tool = Message::tool("done", "call-1");
        assert!(
            matches!(&tool, Message::Tool { content, call_id } if content == "done" && call_id == "call-1")
        );
    }

    /// **Scenario**: Each Message variant round-trips through serde, including tool_calls.
    #[test]
    fn message_serialize_deserialize_roundtrip() {
        let msg = Message::assistant_with_tool_calls(
            "",
            vec![ToolCall {
                name: "write_document".into(),
                arguments: "{\"document\":\"x\"}".into(),
                id: Some("call-1".into()),
            }],
        );
        let json = serde_json::to_string(&msg).expect("serialize");
        let back: Message = serde_json::from_str(&json).expect("deserialize");
        match back {
            Message::Assistant { content, tool_calls } => {
                assert_eq!(content, "");
                assert_eq!(tool_calls.len(), 1);
                assert_eq!(tool_calls[0].name, "write_document");
            }
            other => panic!("variant mismatch: {:?}", other),
        }
    }

    /// **Scenario**: ToolCall deserializes arguments given as a string.
    #[test]
    fn tool_call_arguments_from_string() {
        let tc: ToolCall =
            serde_json::from_str(r#"{"name":"write_document","arguments":"{\"document\":\"d\"}","id":"c1"}"#)
                .unwrap();
        assert_eq!(tc.arguments, r#"{"document":"d"}"#);
        assert_eq!(tc.args_value().unwrap()["document"], "d");
    }

    /// **Scenario**: ToolCall deserializes arguments given as a structured object,
    /// normalizing to the JSON-encoded string shape.
    #[test]
    fn tool_call_arguments_from_object() {
        let tc: ToolCall =
            serde_json::from_str(r#"{"name":"write_document","arguments":{"document":"d"},"id":null}"#)
                .unwrap();
        assert_eq!(tc.args_value().unwrap()["document"], "d");
        assert!(tc.id.is_none());
    }
}
