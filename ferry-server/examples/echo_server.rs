//! AG-UI server backed by a runtime that streams the user's last message back.
//!
//! Run with:
//! ```sh
//! cargo run -p ferry-server --example echo_server
//! ```
//!
//! Test with curl:
//! ```sh
//! curl -X POST http://localhost:3000/api/agui \
//!   -H "Content-Type: application/json" \
//!   -d '{"messages": [{"role": "user", "id": "m-1", "content": "Hello there!"}]}' \
//!   -N
//! ```

use async_trait::async_trait;
use ferry_core::{
    AgentRuntime, FerryAgent, Message, RunInput, RuntimeError, RuntimeEvent, RuntimeEventStream,
};
use ferry_server::FerryRouter;

/// Echoes the last user message word by word, then sends the consolidated final.
struct EchoRuntime;

#[async_trait]
impl AgentRuntime for EchoRuntime {
    async fn run(&self, input: &RunInput) -> Result<RuntimeEventStream, RuntimeError> {
        let text = input
            .messages
            .iter()
            .rev()
            .find_map(|m| match m {
                Message::User { content, .. } => Some(content.clone()),
                _ => None,
            })
            .ok_or_else(|| RuntimeError::Start("no user message to echo".to_string()))?;

        let mut events: Vec<Result<RuntimeEvent, RuntimeError>> = text
            .split_inclusive(' ')
            .map(|word| Ok(RuntimeEvent::new().with_text(word).partial(true)))
            .collect();
        events.push(Ok(RuntimeEvent::new().with_text(text).final_response()));

        Ok(Box::pin(futures::stream::iter(events)))
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let agent = FerryAgent::builder(EchoRuntime)
        .emit_messages_snapshot(true)
        .build();

    let app = FerryRouter::new(agent)
        .with_agui("/api/agui")
        .permissive_cors()
        .build()?;

    let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
    println!("Server running at http://localhost:3000");
    println!("AG-UI endpoint: POST http://localhost:3000/api/agui");

    axum::serve(listener, app).await?;

    Ok(())
}
