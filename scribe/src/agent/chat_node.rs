//! Chat node: one conversation step of the document agent.
//!
//! Calls the LLM with the document-aware system instruction and the
//! transcript, appends the reply, and runs the write_document handshake when
//! the model calls the tool: tool ack, synthetic confirm_changes record, and
//! wholesale document replacement.
//!
//! # Predictive streaming
//!
//! While the model is still composing write_document arguments, the partial
//! value of the `document` argument is emitted as `StreamEvent::StateDelta`
//! (Predict mode), so a frontend can render the in-progress document before
//! the call completes.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::AgentError;
use crate::graph::{Next, Node, RunContext};
use crate::llm::{LlmClient, ToolCallDelta};
use crate::message::{Message, ToolCall};
use crate::state::AgentState;
use crate::stream::predict::partial_string_arg;
use crate::stream::{
    ChunkToStreamSender, MessageChunk, PredictStateConfig, StreamEvent, StreamMetadata, StreamMode,
};
use crate::tool::{write_document_tool, ToolSpec, TOOL_CONFIRM_CHANGES, TOOL_WRITE_DOCUMENT};

use super::prompt::system_prompt;

pub struct ChatNode {
    llm: Arc<dyn LlmClient>,
    predict: PredictStateConfig,
}

impl ChatNode {
    pub fn new(llm: Arc<dyn LlmClient>) -> Self {
        Self {
            llm,
            predict: PredictStateConfig::default(),
        }
    }

    /// Override the predictive-state mapping (defaults to write_document's
    /// `document` argument onto the `document` state key).
    pub fn with_predict(mut self, predict: PredictStateConfig) -> Self {
        self.predict = predict;
        self
    }

    /// Tools for this turn: caller-supplied actions plus write_document.
    fn turn_tools(state: &AgentState) -> Vec<ToolSpec> {
        let mut tools = state.actions.clone();
        tools.push(write_document_tool().clone());
        tools
    }

    /// System instruction (with the current document embedded) followed by
    /// the transcript.
    fn call_messages(state: &AgentState) -> Vec<Message> {
        let mut messages = Vec::with_capacity(state.messages.len() + 1);
        messages.push(Message::system(system_prompt(state.document.as_deref())));
        messages.extend(state.messages.iter().cloned());
        messages
    }
}

/// Applies one model reply to the state.
///
/// Appends the assistant record; if the first tool call is write_document,
/// appends the tool ack and a synthetic confirm_changes record and replaces
/// the document. Any further calls in the same turn are recorded on the
/// assistant message but not processed.
fn apply_chat_response(
    mut state: AgentState,
    content: String,
    tool_calls: Vec<ToolCall>,
) -> Result<AgentState, AgentError> {
    state.messages.push(Message::Assistant {
        content,
        tool_calls: tool_calls.clone(),
    });

    let Some(tc) = tool_calls.into_iter().next() else {
        return Ok(state);
    };
    if tc.name != TOOL_WRITE_DOCUMENT {
        return Ok(state);
    }

    let args = tc.args_value().map_err(|e| AgentError::MalformedToolCall {
        tool: TOOL_WRITE_DOCUMENT.to_string(),
        reason: format!("arguments are not valid JSON: {}", e),
    })?;
    let document = args
        .get("document")
        .and_then(Value::as_str)
        .ok_or_else(|| AgentError::MalformedToolCall {
            tool: TOOL_WRITE_DOCUMENT.to_string(),
            reason: "missing string argument `document`".to_string(),
        })?
        .to_string();

    state.messages.push(Message::tool(
        "Document written.",
        tc.id.clone().unwrap_or_default(),
    ));
    state.messages.push(Message::assistant_with_tool_calls(
        "",
        vec![ToolCall {
            name: TOOL_CONFIRM_CHANGES.to_string(),
            arguments: "{}".to_string(),
            id: Some(Uuid::new_v4().to_string()),
        }],
    ));
    state.document = Some(document);
    Ok(state)
}

#[async_trait]
impl Node<AgentState> for ChatNode {
    fn id(&self) -> &str {
        "chat"
    }

    async fn run(&self, state: AgentState) -> Result<(AgentState, Next), AgentError> {
        let tools = Self::turn_tools(&state);
        let messages = Self::call_messages(&state);
        let response = self.llm.invoke(&messages, &tools).await?;
        let new_state = apply_chat_response(state, response.content, response.tool_calls)?;
        Ok((new_state, Next::End))
    }

    async fn run_with_context(
        &self,
        state: AgentState,
        ctx: &RunContext<AgentState>,
    ) -> Result<(AgentState, Next), AgentError> {
        let should_stream =
            ctx.stream_mode.contains(&StreamMode::Messages) && ctx.stream_tx.is_some();
        let should_stream_tools = (ctx.stream_mode.contains(&StreamMode::Tools)
            || ctx.stream_mode.contains(&StreamMode::Debug))
            && ctx.stream_tx.is_some();
        let should_predict =
            ctx.stream_mode.contains(&StreamMode::Predict) && ctx.stream_tx.is_some();

        let tools = Self::turn_tools(&state);
        let messages = Self::call_messages(&state);
        let doc_before = state.document.clone();

        let streaming_tx = if should_stream || should_stream_tools || should_predict {
            ctx.stream_tx.clone()
        } else {
            None
        };
        let (response, streamed_chunks) = if let Some(stream_tx) = streaming_tx {
            let (chunk_tx, chunk_rx) = if should_stream {
                let adapter = ChunkToStreamSender::new(stream_tx.clone(), self.id());
                let (tx, rx) = adapter.channel();
                (Some(tx), Some((adapter, rx)))
            } else {
                (None, None)
            };

            let (tool_delta_tx, tool_delta_rx) = if should_stream_tools || should_predict {
                let (tx, rx) = mpsc::channel::<ToolCallDelta>(64);
                (Some(tx), Some(rx))
            } else {
                (None, None)
            };

            // Forwards argument fragments as ToolCallChunk events and, for the
            // first call to the predicted tool, emits the growing partial
            // value of the watched argument as StateDelta.
            let delta_forward = async {
                let Some(mut rx) = tool_delta_rx else { return };
                let mut tracked_id: Option<Option<String>> = None;
                let mut name_acc = String::new();
                let mut args_buffer = String::new();
                let mut last_emitted: Option<Value> = None;

                while let Some(delta) = rx.recv().await {
                    if should_stream_tools {
                        let _ = stream_tx
                            .send(StreamEvent::ToolCallChunk {
                                call_id: delta.call_id.clone(),
                                name: delta.name.clone(),
                                arguments_delta: delta.arguments_delta.clone(),
                            })
                            .await;
                    }
                    if !should_predict {
                        continue;
                    }
                    match &tracked_id {
                        None => tracked_id = Some(delta.call_id.clone()),
                        // Only the first call is honored downstream.
                        Some(id) if *id != delta.call_id => continue,
                        _ => {}
                    }
                    if let Some(ref n) = delta.name {
                        name_acc.push_str(n);
                    }
                    args_buffer.push_str(&delta.arguments_delta);
                    if name_acc != self.predict.tool {
                        continue;
                    }
                    if let Some(partial) =
                        partial_string_arg(&args_buffer, &self.predict.tool_argument)
                    {
                        let value = Value::String(partial);
                        if last_emitted.as_ref() != Some(&value) {
                            let _ = stream_tx
                                .send(StreamEvent::StateDelta {
                                    key: self.predict.state_key.clone(),
                                    value: value.clone(),
                                })
                                .await;
                            last_emitted = Some(value);
                        }
                    }
                }
            };

            let msg_forward = async {
                if let Some((adapter, rx)) = chunk_rx {
                    adapter.forward(rx).await
                } else {
                    0
                }
            };

            let (result, forwarded_chunks, _) = tokio::join!(
                self.llm
                    .invoke_stream_with_tool_delta(&messages, &tools, chunk_tx, tool_delta_tx),
                msg_forward,
                delta_forward,
            );
            (result?, forwarded_chunks)
        } else {
            (self.llm.invoke(&messages, &tools).await?, 0)
        };

        // Some providers return content only in the final payload; make sure
        // the messages stream still carries the assistant text.
        if should_stream && streamed_chunks == 0 && !response.content.is_empty() {
            if let Some(ref tx) = ctx.stream_tx {
                let _ = tx
                    .send(StreamEvent::Messages {
                        chunk: MessageChunk {
                            content: response.content.clone(),
                        },
                        metadata: StreamMetadata {
                            scribe_node: self.id().to_string(),
                        },
                    })
                    .await;
            }
        }

        // Emit complete tool_call events before applying state
        if should_stream_tools && !response.tool_calls.is_empty() {
            if let Some(ref tx) = ctx.stream_tx {
                for tc in &response.tool_calls {
                    let args = tc
                        .args_value()
                        .unwrap_or_else(|_| Value::String(tc.arguments.clone()));
                    let _ = tx
                        .send(StreamEvent::ToolCall {
                            call_id: tc.id.clone(),
                            name: tc.name.clone(),
                            arguments: args,
                        })
                        .await;
                }
            }
        }

        let new_state = apply_chat_response(state, response.content, response.tool_calls)?;

        // Final prediction matches the committed document exactly.
        if should_predict && new_state.document != doc_before {
            if let (Some(tx), Some(doc)) = (ctx.stream_tx.as_ref(), new_state.document.as_deref()) {
                let _ = tx
                    .send(StreamEvent::StateDelta {
                        key: self.predict.state_key.clone(),
                        value: Value::String(doc.to_string()),
                    })
                    .await;
            }
        }

        ctx.emit(StreamEvent::Done).await;

        Ok((new_state, Next::End))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::MockLlm;

    fn state_with_user(text: &str) -> AgentState {
        AgentState {
            messages: vec![Message::user(text)],
            document: None,
            actions: vec![],
        }
    }

    /// **Scenario**: a plain reply appends exactly one assistant message and
    /// leaves the document untouched.
    #[tokio::test]
    async fn plain_reply_leaves_document_unchanged() {
        let node = ChatNode::new(Arc::new(MockLlm::with_no_tool_calls("Happy to help.")));
        let state = state_with_user("hello");
        let (out, next) = node.run(state).await.unwrap();

        assert!(matches!(next, Next::End));
        assert_eq!(out.messages.len(), 2);
        assert!(out.document.is_none());
        assert_eq!(out.last_assistant_reply().as_deref(), Some("Happy to help."));
    }

    /// **Scenario**: a write_document call appends three records in order
    /// (assistant tool-call, tool ack, confirm_changes) and commits the
    /// document verbatim.
    #[tokio::test]
    async fn write_document_runs_the_full_handshake() {
        let node = ChatNode::new(Arc::new(MockLlm::with_write_document_call(
            "# Hello\n**world**",
        )));
        let state = state_with_user("bold the word");
        let (out, _) = node.run(state).await.unwrap();

        assert_eq!(out.document.as_deref(), Some("# Hello\n**world**"));
        assert_eq!(out.messages.len(), 4);

        match &out.messages[1] {
            Message::Assistant { tool_calls, .. } => {
                assert_eq!(tool_calls.len(), 1);
                assert_eq!(tool_calls[0].name, TOOL_WRITE_DOCUMENT);
            }
            other => panic!("expected assistant tool-call record, got {:?}", other),
        }
        match &out.messages[2] {
            Message::Tool { content, call_id } => {
                assert_eq!(content, "Document written.");
                assert_eq!(call_id, "call-1");
            }
            other => panic!("expected tool ack, got {:?}", other),
        }
        match &out.messages[3] {
            Message::Assistant { content, tool_calls } => {
                assert!(content.is_empty());
                assert_eq!(tool_calls.len(), 1);
                assert_eq!(tool_calls[0].name, TOOL_CONFIRM_CHANGES);
                assert_eq!(tool_calls[0].arguments, "{}");
                assert!(tool_calls[0].id.is_some(), "confirmation carries a fresh id");
            }
            other => panic!("expected confirm_changes record, got {:?}", other),
        }
    }

    /// **Scenario**: a call to some other tool is recorded but not processed.
    #[tokio::test]
    async fn other_tool_call_is_recorded_not_processed() {
        let llm = MockLlm::new(
            "",
            vec![ToolCall {
                name: "fetch_weather".into(),
                arguments: "{}".into(),
                id: Some("call-9".into()),
            }],
        );
        let node = ChatNode::new(Arc::new(llm));
        let (out, _) = node.run(state_with_user("weather?")).await.unwrap();

        assert!(out.document.is_none());
        assert_eq!(out.messages.len(), 2);
    }

    /// **Scenario**: two tool calls in one turn; only the first is processed.
    #[tokio::test]
    async fn only_first_of_two_tool_calls_is_processed() {
        let llm = MockLlm::new(
            "",
            vec![
                ToolCall {
                    name: TOOL_WRITE_DOCUMENT.into(),
                    arguments: "{\"document\": \"first\"}".into(),
                    id: Some("call-1".into()),
                },
                ToolCall {
                    name: TOOL_WRITE_DOCUMENT.into(),
                    arguments: "{\"document\": \"second\"}".into(),
                    id: Some("call-2".into()),
                },
            ],
        );
        let node = ChatNode::new(Arc::new(llm));
        let (out, _) = node.run(state_with_user("write")).await.unwrap();

        assert_eq!(out.document.as_deref(), Some("first"));
        // assistant record + one ack + one confirmation, nothing for call-2
        assert_eq!(out.messages.len(), 4);
    }

    /// **Scenario**: write_document without a string `document` argument fails
    /// fast instead of committing an empty document.
    #[tokio::test]
    async fn missing_document_argument_is_malformed() {
        let llm = MockLlm::new(
            "",
            vec![ToolCall {
                name: TOOL_WRITE_DOCUMENT.into(),
                arguments: "{}".into(),
                id: Some("call-1".into()),
            }],
        );
        let node = ChatNode::new(Arc::new(llm));
        let err = node.run(state_with_user("write")).await.unwrap_err();
        match err {
            AgentError::MalformedToolCall { tool, reason } => {
                assert_eq!(tool, TOOL_WRITE_DOCUMENT);
                assert!(reason.contains("document"), "{}", reason);
            }
            other => panic!("expected MalformedToolCall, got {:?}", other),
        }
    }

    /// **Scenario**: object-shaped arguments (not a JSON string) are accepted
    /// through the normalized payload boundary.
    #[tokio::test]
    async fn object_arguments_are_normalized() {
        let raw = serde_json::json!({
            "name": TOOL_WRITE_DOCUMENT,
            "arguments": {"document": "from object"},
            "id": "call-7"
        });
        let tc: ToolCall = serde_json::from_value(raw).unwrap();
        let node = ChatNode::new(Arc::new(MockLlm::new("", vec![tc])));
        let (out, _) = node.run(state_with_user("write")).await.unwrap();
        assert_eq!(out.document.as_deref(), Some("from object"));
    }
}
