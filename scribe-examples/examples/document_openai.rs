//! Example: document graph against the real OpenAI API.
//!
//! Requires `OPENAI_API_KEY` (a `.env` file works). Sends one user turn, prints
//! the assistant reply and, when the model chose to write, the document.
//!
//! Run: `cargo run -p scribe-examples --example document_openai -- "Write a haiku about autumn as a document."`

use std::env;
use std::sync::Arc;

use scribe::{build_document_graph, AgentState, ChatOpenAI, Message};

#[tokio::main]
async fn main() {
    dotenv::dotenv().ok();

    let input = env::args()
        .nth(1)
        .unwrap_or_else(|| "Write a short document about the seasons.".to_string());

    let llm = Arc::new(ChatOpenAI::new("gpt-4o"));
    let graph = build_document_graph(llm).expect("valid graph");

    let mut state = AgentState::default();
    state.messages.push(Message::user(input));

    match graph.invoke(state, None).await {
        Ok(out) => {
            if let Some(reply) = out.last_assistant_reply() {
                if !reply.is_empty() {
                    println!("assistant: {reply}");
                }
            }
            if let Some(doc) = out.document {
                println!("--- document ---");
                println!("{doc}");
            }
        }
        Err(e) => eprintln!("error: {e}"),
    }
}
