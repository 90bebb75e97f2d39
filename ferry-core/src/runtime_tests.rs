//! Tests for runtime event defaults and derived accessors.

use super::*;
use serde_json::json;

#[test]
fn test_missing_flags_default_to_false() {
    let event: RuntimeEvent = serde_json::from_value(json!({})).unwrap();

    assert!(!event.is_partial());
    assert!(!event.is_turn_complete());
    assert!(!event.has_finish_reason());
    assert!(!event.is_final_response());
    assert!(!event.is_user());
    assert!(event.parts().is_empty());
    assert!(event.answer_text().is_none());
}

#[test]
fn test_null_flags_default_to_false() {
    let event: RuntimeEvent = serde_json::from_value(json!({
        "partial": null,
        "turn_complete": null,
        "author": null,
        "content": null
    }))
    .unwrap();

    assert!(!event.is_partial());
    assert!(!event.is_turn_complete());
    assert!(!event.is_user());
}

#[test]
fn test_empty_finish_reason_does_not_end_turn() {
    let event = RuntimeEvent::new().finish_reason("");
    assert!(!event.has_finish_reason());
    assert!(!event.ends_turn());

    let event = RuntimeEvent::new().finish_reason("STOP");
    assert!(event.ends_turn());
}

#[test]
fn test_only_user_author_is_user() {
    assert!(RuntimeEvent::new().author("user").is_user());
    assert!(!RuntimeEvent::new().author("model").is_user());
    assert!(!RuntimeEvent::new().is_user());
}

#[test]
fn test_answer_text_skips_empty_and_thought_parts() {
    let event = RuntimeEvent::new()
        .with_text("")
        .with_text("Valid text")
        .with_thought("hmm")
        .with_part(Part::default())
        .with_text("");

    assert_eq!(event.answer_text().as_deref(), Some("Valid text"));
    assert_eq!(event.thought_text().as_deref(), Some("hmm"));
}

#[test]
fn test_whitespace_text_is_content() {
    let event = RuntimeEvent::new().with_text("   ");
    assert_eq!(event.answer_text().as_deref(), Some("   "));
}

#[test]
fn test_function_accessors_follow_part_order() {
    let event = RuntimeEvent::new()
        .with_function_call(FunctionCall::new("a", "first", json!({})))
        .with_text("between")
        .with_function_call(FunctionCall::new("b", "second", json!({})))
        .with_function_response(FunctionResponse::new("z", json!({"ok": true})));

    let names: Vec<_> = event.function_calls().map(|c| c.name.as_str()).collect();
    assert_eq!(names, vec!["first", "second"]);

    let ids: Vec<_> = event
        .function_responses()
        .map(|r| r.id.as_deref())
        .collect();
    assert_eq!(ids, vec![Some("z")]);
}

#[test]
fn test_function_call_deserializes_without_id_or_args() {
    let call: FunctionCall = serde_json::from_value(json!({"name": "ping"})).unwrap();

    assert!(call.id.is_none());
    assert_eq!(call.args, json!({}));
}

#[test]
fn test_new_assigns_unique_ids() {
    assert_ne!(RuntimeEvent::new().id, RuntimeEvent::new().id);
}
