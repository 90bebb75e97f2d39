use super::*;
use crate::messages::Message;
use crate::protocol::{AGENT_ERROR, PREDICT_STATE};
use crate::runtime::{FunctionCall, FunctionResponse};
use crate::test_utils::{collect_events, event_types, MockRuntime};
use crate::PredictStateMapping;
use serde_json::json;

fn input() -> RunInput {
    RunInput::new("thread-1", "run-1")
}

async fn run(runtime: MockRuntime) -> Vec<AguiEvent> {
    let agent = FerryAgent::builder(runtime).build();
    collect_events(agent.run(input())).await
}

#[tokio::test]
async fn test_run_is_bracketed_by_lifecycle_events() {
    let runtime = MockRuntime::new().with_event(RuntimeEvent::new().with_text("Hi").final_response());

    let events = run(runtime).await;

    assert_eq!(
        event_types(&events),
        vec![
            "RUN_STARTED",
            "TEXT_MESSAGE_START",
            "TEXT_MESSAGE_CONTENT",
            "TEXT_MESSAGE_END",
            "RUN_FINISHED"
        ]
    );
    assert_eq!(
        events[0],
        AguiEvent::RunStarted {
            thread_id: "thread-1".to_string(),
            run_id: "run-1".to_string(),
        }
    );
    assert_eq!(
        events[4],
        AguiEvent::RunFinished {
            thread_id: "thread-1".to_string(),
            run_id: "run-1".to_string(),
        }
    );
}

#[tokio::test]
async fn test_empty_run() {
    let events = run(MockRuntime::new()).await;
    assert_eq!(event_types(&events), vec!["RUN_STARTED", "RUN_FINISHED"]);
}

#[tokio::test]
async fn test_open_text_is_closed_before_run_finished() {
    let runtime = MockRuntime::new().with_events([
        RuntimeEvent::new().with_text("Hel").partial(true),
        RuntimeEvent::new().with_text("lo").partial(true),
    ]);

    let events = run(runtime).await;

    assert_eq!(
        event_types(&events),
        vec![
            "RUN_STARTED",
            "TEXT_MESSAGE_START",
            "TEXT_MESSAGE_CONTENT",
            "TEXT_MESSAGE_CONTENT",
            "TEXT_MESSAGE_END",
            "RUN_FINISHED"
        ]
    );
}

#[tokio::test]
async fn test_thinking_is_closed_before_text() {
    let runtime = MockRuntime::new().with_event(
        RuntimeEvent::new()
            .with_thought("pondering")
            .with_text("answer")
            .partial(true),
    );

    let events = run(runtime).await;
    let types = event_types(&events);

    let thinking_end = types.iter().position(|t| *t == "THINKING_END").unwrap();
    let text_end = types.iter().position(|t| *t == "TEXT_MESSAGE_END").unwrap();
    assert!(thinking_end < text_end);
    assert_eq!(types.last(), Some(&"RUN_FINISHED"));
}

#[tokio::test]
async fn test_start_failure_emits_agent_error() {
    let events = run(MockRuntime::failing("no model")).await;

    assert_eq!(event_types(&events), vec!["RUN_STARTED", "RUN_ERROR"]);
    match &events[1] {
        AguiEvent::RunError { message, code } => {
            assert!(message.starts_with("Agent execution failed"));
            assert!(message.contains("no model"));
            assert_eq!(code.as_deref(), Some(AGENT_ERROR));
        }
        other => panic!("expected RUN_ERROR, got {:?}", other),
    }
}

#[tokio::test]
async fn test_stream_failure_closes_open_text_first() {
    let runtime = MockRuntime::new()
        .with_event(RuntimeEvent::new().with_text("partial answer").partial(true))
        .with_stream_error("connection reset")
        .with_event(RuntimeEvent::new().with_text("never seen"));

    let events = run(runtime).await;

    assert_eq!(
        event_types(&events),
        vec![
            "RUN_STARTED",
            "TEXT_MESSAGE_START",
            "TEXT_MESSAGE_CONTENT",
            "TEXT_MESSAGE_END",
            "RUN_ERROR"
        ]
    );
}

#[tokio::test]
async fn test_long_running_call_is_emitted_once() {
    let call = FunctionCall::new("fc-1", "approve_plan", json!({"steps": 3}));
    let runtime = MockRuntime::new().with_events([
        RuntimeEvent::new()
            .with_function_call(call.clone())
            .long_running("fc-1")
            .partial(true),
        RuntimeEvent::new()
            .with_function_call(call)
            .long_running("fc-1"),
        RuntimeEvent::new().with_function_response(FunctionResponse::new("fc-1", json!("ok"))),
    ]);

    let events = run(runtime).await;

    assert_eq!(
        event_types(&events),
        vec![
            "RUN_STARTED",
            "TOOL_CALL_START",
            "TOOL_CALL_ARGS",
            "TOOL_CALL_END",
            "RUN_FINISHED"
        ]
    );
}

#[tokio::test]
async fn test_regular_tool_round_trip() {
    let runtime = MockRuntime::new().with_events([
        RuntimeEvent::new().with_function_call(FunctionCall::new("fc-1", "search", json!({}))),
        RuntimeEvent::new().with_function_response(FunctionResponse::new("fc-1", json!([1, 2]))),
    ]);

    let events = run(runtime).await;

    assert_eq!(
        event_types(&events),
        vec![
            "RUN_STARTED",
            "TOOL_CALL_START",
            "TOOL_CALL_ARGS",
            "TOOL_CALL_END",
            "TOOL_CALL_RESULT",
            "RUN_FINISHED"
        ]
    );
}

#[tokio::test]
async fn test_translator_config_is_applied() {
    let runtime = MockRuntime::new().with_event(
        RuntimeEvent::new()
            .with_function_call(FunctionCall::new("fc-1", "write_doc", json!({"body": "x"}))),
    );
    let config = TranslatorConfig::new().with_predict_state(PredictStateMapping::new(
        "document",
        "write_doc",
        "body",
    ));
    let agent = FerryAgent::builder(runtime)
        .with_translator_config(config)
        .build();

    let events = collect_events(agent.run(input())).await;

    assert!(matches!(&events[1], AguiEvent::Custom { name, .. } if name == PREDICT_STATE));
}

#[tokio::test]
async fn test_messages_snapshot_is_off_by_default() {
    let runtime = MockRuntime::new().with_event(RuntimeEvent::new().with_text("Hi").final_response());

    let events = run(runtime).await;

    assert!(!event_types(&events).contains(&"MESSAGES_SNAPSHOT"));
}

#[tokio::test]
async fn test_messages_snapshot_precedes_run_finished() {
    let runtime = MockRuntime::new().with_events([
        RuntimeEvent::new().with_text("Hel").partial(true),
        RuntimeEvent::new().with_text("Hello").final_response(),
    ]);
    let agent = FerryAgent::builder(runtime)
        .emit_messages_snapshot(true)
        .build();
    let input = input().with_message(Message::user("Say hello"));

    let events = collect_events(agent.run(input)).await;
    let types = event_types(&events);

    assert_eq!(types[types.len() - 2], "MESSAGES_SNAPSHOT");
    match &events[events.len() - 2] {
        AguiEvent::MessagesSnapshot { messages } => {
            assert_eq!(messages.len(), 2);
            assert!(matches!(&messages[0], Message::User { content, .. } if content == "Say hello"));
            assert!(matches!(
                &messages[1],
                Message::Assistant { content: Some(c), .. } if c == "Hello"
            ));
        }
        other => panic!("expected MESSAGES_SNAPSHOT, got {:?}", other),
    }
}

#[tokio::test]
async fn test_runtime_receives_input() {
    let runtime = MockRuntime::new();
    let agent = FerryAgent::builder(runtime.clone()).build();

    collect_events(agent.run(input())).await;

    assert_eq!(runtime.run_count(), 1);
    assert_eq!(runtime.runs()[0].thread_id, "thread-1");
    assert_eq!(runtime.runs()[0].run_id, "run-1");
}

#[tokio::test]
async fn test_runs_do_not_share_translator_state() {
    let runtime =
        MockRuntime::new().with_event(RuntimeEvent::new().with_text("Same answer").final_response());
    let agent = FerryAgent::builder(runtime).build();

    let first = collect_events(agent.run(input())).await;
    let second = collect_events(agent.run(RunInput::new("thread-1", "run-2"))).await;

    assert_eq!(event_types(&first), event_types(&second));
    assert!(event_types(&second).contains(&"TEXT_MESSAGE_CONTENT"));
}

#[test]
fn test_run_input_wire_format() {
    let input: RunInput = serde_json::from_value(json!({
        "threadId": "t",
        "runId": "r"
    }))
    .unwrap();

    assert_eq!(input.thread_id, "t");
    assert!(input.messages.is_empty());
    assert!(input.state.is_null());
}
