//! Compiled state graph: immutable, supports invoke and stream.
//!
//! Built by `StateGraph::compile`. Holds nodes and edge order derived from the
//! explicit edges at compile time.

use std::collections::{HashMap, HashSet};
use std::fmt::Debug;
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

use crate::error::AgentError;
use crate::stream::{StreamEvent, StreamMode};

use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_node_state,
};
use super::state_graph::END;
use super::{Next, Node, RunContext, RunnableConfig};

/// Compiled graph: immutable structure, supports invoke and stream.
///
/// Created by `StateGraph::compile()`. Runs from the first node; uses each
/// node's returned `Next` to choose the next node. Node output replaces the
/// previous state wholesale.
#[derive(Clone)]
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    /// First node to run (from START).
    pub(super) first_node_id: String,
    /// Linear order of nodes (used for Next::Continue).
    pub(super) edge_order: Vec<String>,
    /// Map from node id to its unconditional successor.
    pub(super) next_map: HashMap<String, String>,
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + Debug + 'static,
{
    /// Shared run loop used by invoke() and stream(): steps through nodes until completion.
    async fn run_loop_inner(
        &self,
        state: &mut S,
        current_id: &mut String,
        run_ctx: &RunContext<S>,
    ) -> Result<(), AgentError> {
        log_graph_start();

        let emit_tasks = run_ctx.is_streaming_mode(StreamMode::Tasks)
            || run_ctx.is_streaming_mode(StreamMode::Debug);

        loop {
            let node = match self.nodes.get(current_id) {
                Some(node) => node.clone(),
                None => {
                    let e = AgentError::ExecutionFailed(format!("unknown node: {current_id}"));
                    log_graph_error(&e);
                    return Err(e);
                }
            };
            let current_state = state.clone();

            log_node_start(current_id);
            log_node_state(current_id, &current_state);

            if emit_tasks {
                run_ctx
                    .emit(StreamEvent::TaskStart {
                        node_id: current_id.clone(),
                    })
                    .await;
            }

            let result = if run_ctx.stream_tx.is_some() {
                node.run_with_context(current_state, run_ctx).await
            } else {
                node.run(current_state).await
            };

            let (new_state, next) = match result {
                Ok(output) => output,
                Err(e) => {
                    if emit_tasks {
                        run_ctx
                            .emit(StreamEvent::TaskEnd {
                                node_id: current_id.clone(),
                                result: Err(e.to_string()),
                            })
                            .await;
                    }
                    log_graph_error(&e);
                    return Err(e);
                }
            };

            if emit_tasks {
                run_ctx
                    .emit(StreamEvent::TaskEnd {
                        node_id: current_id.clone(),
                        result: Ok(()),
                    })
                    .await;
            }

            log_node_complete(current_id, &next);

            *state = new_state;

            if run_ctx.is_streaming_mode(StreamMode::Values) {
                run_ctx.emit(StreamEvent::Values(state.clone())).await;
            }
            if run_ctx.is_streaming_mode(StreamMode::Updates) {
                run_ctx
                    .emit(StreamEvent::Updates {
                        node_id: current_id.clone(),
                        state: state.clone(),
                    })
                    .await;
            }

            let next_id: Option<String> = match next {
                Next::End => None,
                Next::Node(id) => Some(id),
                Next::Continue => self.next_map.get(current_id).cloned().or_else(|| {
                    let pos = self.edge_order.iter().position(|x| x == current_id)?;
                    self.edge_order.get(pos + 1).cloned()
                }),
            };

            let should_end = next_id.is_none() || next_id.as_deref() == Some(END);
            if should_end {
                log_graph_complete();
                return Ok(());
            }
            if let Some(id) = next_id {
                *current_id = id;
            }
        }
    }

    /// Runs the graph with the given state. Starts at the first node in edge order;
    /// after each node, uses the returned `Next` to continue linear order, jump
    /// to a node, or end.
    ///
    /// - `Next::Continue`: run the next node in edge_order, or end if last.
    /// - `Next::Node(id)`: run the node with that id next.
    /// - `Next::End`: stop and return current state.
    pub async fn invoke(&self, state: S, config: Option<RunnableConfig>) -> Result<S, AgentError> {
        if self.nodes.is_empty() || !self.nodes.contains_key(&self.first_node_id) {
            return Err(AgentError::ExecutionFailed("empty graph".into()));
        }
        let run_ctx = RunContext::new(config.unwrap_or_default());
        let mut state = state;
        let mut current_id = self.first_node_id.clone();

        self.run_loop_inner(&mut state, &mut current_id, &run_ctx)
            .await?;

        Ok(state)
    }

    /// Streams graph execution, emitting events via a channel-backed Stream.
    ///
    /// The run happens on a spawned task; the returned stream ends when the run
    /// finishes and the sender is dropped. Errors inside the run terminate the
    /// stream; callers needing the final state should use `invoke`.
    pub fn stream(
        &self,
        state: S,
        config: Option<RunnableConfig>,
        stream_mode: impl Into<HashSet<StreamMode>>,
    ) -> ReceiverStream<StreamEvent<S>> {
        let (tx, rx) = mpsc::channel(128);
        let graph = self.clone();
        let mode_set: HashSet<StreamMode> = stream_mode.into();

        tokio::spawn(async move {
            let mut state = state;
            let mut current_id = match graph.edge_order.first().cloned() {
                Some(id) => id,
                None => return,
            };
            let mut run_ctx = RunContext::new(config.unwrap_or_default());
            run_ctx.stream_tx = Some(tx);
            run_ctx.stream_mode = mode_set;

            let _ = graph
                .run_loop_inner(&mut state, &mut current_id, &run_ctx)
                .await;
        });

        ReceiverStream::new(rx)
    }
}
