//! Flow entry node: routes into the chat node without touching state.

use async_trait::async_trait;

use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::state::AgentState;

/// Entry node of the document graph. No validation, no side effects; exists so
/// the graph has a distinguished entry point ahead of the chat step.
pub struct StartNode;

#[async_trait]
impl Node<AgentState> for StartNode {
    fn id(&self) -> &str {
        "start"
    }

    async fn run(&self, state: AgentState) -> Result<(AgentState, Next), AgentError> {
        Ok((state, Next::Continue))
    }
}
