//! Example: document graph with predictive streaming, no network.
//!
//! Streams the document graph against a mock LLM scripted to call
//! write_document. Prints each predicted document prefix as it grows, then the
//! committed document.
//!
//! Run: `cargo run -p scribe-examples --example document_mock`

use std::sync::Arc;

use tokio_stream::StreamExt;

use scribe::{
    build_document_graph, AgentState, Message, MockLlm, StreamEvent, StreamMode,
};

#[tokio::main]
async fn main() {
    let document = "# Trip notes\n\n- pack light\n- charge everything\n- offline maps";
    let llm = Arc::new(MockLlm::with_write_document_call(document));
    let graph = build_document_graph(llm).expect("valid graph");

    let mut state = AgentState::default();
    state
        .messages
        .push(Message::user("Write me a packing checklist."));

    let mut stream = graph.stream(state, None, [StreamMode::Predict, StreamMode::Values]);

    while let Some(ev) = stream.next().await {
        match ev {
            StreamEvent::StateDelta { key, value } => {
                println!("[{key}] {}", value.as_str().unwrap_or_default());
            }
            StreamEvent::Values(state) => {
                println!("--- committed document ---");
                println!("{}", state.document.unwrap_or_default());
            }
            StreamEvent::Done => println!("--- done ---"),
            _ => {}
        }
    }
}
