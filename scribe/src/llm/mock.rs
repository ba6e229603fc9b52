//! Mock LLM for tests and examples.
//!
//! Returns fixed assistant text and optional fixed tool_calls (e.g. a
//! write_document call), so the graph can exercise the document handshake or
//! the plain-reply path without a network.
//!
//! # Streaming Support
//!
//! `MockLlm` implements `invoke_stream()` with configurable streaming behavior:
//! - Default: sends content as a single chunk (efficient for most tests)
//! - Character-by-character: splits content into individual character chunks
//!
//! `invoke_stream_with_tool_delta()` replays each scripted tool call as a
//! sequence of small argument fragments, the way providers stream them.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::error::AgentError;
use crate::llm::{LlmClient, LlmResponse, ToolCallDelta};
use crate::message::{Message, ToolCall};
use crate::stream::MessageChunk;
use crate::tool::{ToolSpec, TOOL_WRITE_DOCUMENT};

/// How many bytes of a tool's arguments go into each streamed delta.
const ARGS_DELTA_LEN: usize = 8;

/// Mock LLM: fixed assistant text and optional tool_calls.
///
/// Configurable to return one fixed write_document call or no tool_calls, so
/// the graph can run the document handshake or end after a plain reply.
///
/// # Streaming
///
/// By default, `invoke_stream()` sends the content as a single chunk. Enable
/// `stream_by_char` to send each character as a separate chunk (useful for testing).
pub struct MockLlm {
    /// Assistant message content to return.
    content: String,
    /// Tool calls to return.
    tool_calls: Vec<ToolCall>,
    /// When true, invoke_stream sends each character as a separate chunk.
    stream_by_char: AtomicBool,
}

impl MockLlm {
    /// Creates a mock that calls write_document with the given document text.
    pub fn with_write_document_call(document: impl Into<String>) -> Self {
        let arguments = serde_json::json!({ "document": document.into() }).to_string();
        Self {
            content: String::new(),
            tool_calls: vec![ToolCall {
                name: TOOL_WRITE_DOCUMENT.to_string(),
                arguments,
                id: Some("call-1".to_string()),
            }],
            stream_by_char: AtomicBool::new(false),
        }
    }

    /// Creates a mock that returns assistant text and no tool_calls (plain reply).
    pub fn with_no_tool_calls(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            tool_calls: vec![],
            stream_by_char: AtomicBool::new(false),
        }
    }

    /// Creates a mock with custom content and tool_calls.
    pub fn new(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            content: content.into(),
            tool_calls,
            stream_by_char: AtomicBool::new(false),
        }
    }

    /// Enable character-by-character streaming for `invoke_stream()`.
    pub fn with_stream_by_char(self) -> Self {
        self.stream_by_char.store(true, Ordering::SeqCst);
        self
    }

    fn split_args(arguments: &str) -> Vec<String> {
        let mut parts = Vec::new();
        let mut current = String::new();
        for c in arguments.chars() {
            current.push(c);
            if current.len() >= ARGS_DELTA_LEN {
                parts.push(std::mem::take(&mut current));
            }
        }
        if !current.is_empty() {
            parts.push(current);
        }
        parts
    }
}

#[async_trait]
impl LlmClient for MockLlm {
    async fn invoke(
        &self,
        _messages: &[Message],
        _tools: &[ToolSpec],
    ) -> Result<LlmResponse, AgentError> {
        Ok(LlmResponse {
            content: self.content.clone(),
            tool_calls: self.tool_calls.clone(),
        })
    }

    /// Streaming variant: sends content chunks through the channel.
    ///
    /// Behavior depends on `stream_by_char`:
    /// - false (default): sends entire content as one chunk
    /// - true: sends each character as a separate chunk (for testing)
    async fn invoke_stream(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
        chunk_tx: Option<mpsc::Sender<MessageChunk>>,
    ) -> Result<LlmResponse, AgentError> {
        let response = self.invoke(messages, tools).await?;

        if let Some(tx) = chunk_tx {
            if !response.content.is_empty() {
                if self.stream_by_char.load(Ordering::SeqCst) {
                    for c in response.content.chars() {
                        let _ = tx
                            .send(MessageChunk {
                                content: c.to_string(),
                            })
                            .await;
                    }
                } else {
                    let _ = tx
                        .send(MessageChunk {
                            content: response.content.clone(),
                        })
                        .await;
                }
            }
        }

        Ok(response)
    }

    /// Replays each scripted tool call as streamed argument fragments.
    ///
    /// The first delta of a call carries the tool name; every delta carries the
    /// call id and a small slice of the arguments string, mimicking provider
    /// streaming.
    async fn invoke_stream_with_tool_delta(
        &self,
        messages: &[Message],
        tools: &[ToolSpec],
        chunk_tx: Option<mpsc::Sender<MessageChunk>>,
        tool_delta_tx: Option<mpsc::Sender<ToolCallDelta>>,
    ) -> Result<LlmResponse, AgentError> {
        let response = self.invoke_stream(messages, tools, chunk_tx).await?;

        if let Some(tx) = tool_delta_tx {
            for tc in &response.tool_calls {
                for (i, part) in Self::split_args(&tc.arguments).into_iter().enumerate() {
                    let _ = tx
                        .send(ToolCallDelta {
                            call_id: tc.id.clone(),
                            name: if i == 0 { Some(tc.name.clone()) } else { None },
                            arguments_delta: part,
                        })
                        .await;
                }
            }
        }

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// **Scenario**: with_write_document_call returns one write_document call
    /// whose arguments carry the document verbatim.
    #[tokio::test]
    async fn write_document_mock_returns_one_call() {
        let llm = MockLlm::with_write_document_call("# Hello");
        let resp = llm.invoke(&[], &[]).await.unwrap();
        assert_eq!(resp.tool_calls.len(), 1);
        assert_eq!(resp.tool_calls[0].name, TOOL_WRITE_DOCUMENT);
        let args = resp.tool_calls[0].args_value().unwrap();
        assert_eq!(args["document"], "# Hello");
    }

    /// **Scenario**: stream_by_char sends one chunk per character.
    #[tokio::test]
    async fn stream_by_char_sends_per_character_chunks() {
        let llm = MockLlm::with_no_tool_calls("abc").with_stream_by_char();
        let (tx, mut rx) = mpsc::channel(8);
        let resp = llm.invoke_stream(&[], &[], Some(tx)).await.unwrap();
        assert_eq!(resp.content, "abc");

        let mut collected = String::new();
        while let Ok(chunk) = rx.try_recv() {
            assert_eq!(chunk.content.chars().count(), 1);
            collected.push_str(&chunk.content);
        }
        assert_eq!(collected, "abc");
    }

    /// **Scenario**: tool deltas replay the full arguments string, with the
    /// tool name only on the first fragment.
    #[tokio::test]
    async fn tool_deltas_reassemble_to_arguments() {
        let llm = MockLlm::with_write_document_call("a longer document body");
        let (tx, mut rx) = mpsc::channel(64);
        let resp = llm
            .invoke_stream_with_tool_delta(&[], &[], None, Some(tx))
            .await
            .unwrap();

        let mut reassembled = String::new();
        let mut first = true;
        while let Ok(delta) = rx.try_recv() {
            assert_eq!(delta.call_id.as_deref(), Some("call-1"));
            if first {
                assert_eq!(delta.name.as_deref(), Some(TOOL_WRITE_DOCUMENT));
                first = false;
            } else {
                assert!(delta.name.is_none());
            }
            reassembled.push_str(&delta.arguments_delta);
        }
        assert_eq!(reassembled, resp.tool_calls[0].arguments);
    }
}
