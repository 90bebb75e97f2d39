//! Start/content/end framing shared by text and thinking messages.

use std::marker::PhantomData;

use log::debug;

use crate::protocol::{AguiEvent, MessageRole};

/// Event constructors for one kind of framed message.
pub trait Framing {
    /// Kind name used in log output.
    const KIND: &'static str;

    /// Events that open a span.
    fn start(message_id: &str) -> Vec<AguiEvent>;

    /// One content event.
    fn content(message_id: &str, delta: &str) -> AguiEvent;

    /// Events that close a span.
    fn end(message_id: &str) -> Vec<AguiEvent>;
}

/// Framing for assistant answer text.
#[derive(Debug)]
pub struct TextFrames;

impl Framing for TextFrames {
    const KIND: &'static str = "text";

    fn start(message_id: &str) -> Vec<AguiEvent> {
        vec![AguiEvent::TextMessageStart {
            message_id: message_id.to_string(),
            role: MessageRole::Assistant,
        }]
    }

    fn content(message_id: &str, delta: &str) -> AguiEvent {
        AguiEvent::TextMessageContent {
            message_id: message_id.to_string(),
            delta: delta.to_string(),
        }
    }

    fn end(message_id: &str) -> Vec<AguiEvent> {
        vec![AguiEvent::TextMessageEnd {
            message_id: message_id.to_string(),
        }]
    }
}

/// Framing for reasoning text. A thinking segment wraps its text message.
#[derive(Debug)]
pub struct ThinkingFrames;

impl Framing for ThinkingFrames {
    const KIND: &'static str = "thinking";

    fn start(message_id: &str) -> Vec<AguiEvent> {
        vec![
            AguiEvent::ThinkingStart { title: None },
            AguiEvent::ThinkingTextMessageStart {
                message_id: message_id.to_string(),
            },
        ]
    }

    fn content(message_id: &str, delta: &str) -> AguiEvent {
        AguiEvent::ThinkingTextMessageContent {
            message_id: message_id.to_string(),
            delta: delta.to_string(),
        }
    }

    fn end(message_id: &str) -> Vec<AguiEvent> {
        vec![
            AguiEvent::ThinkingTextMessageEnd {
                message_id: message_id.to_string(),
            },
            AguiEvent::ThinkingEnd,
        ]
    }
}

/// A message span that is always well-bracketed.
///
/// While open, `current` holds every delta emitted into the span. On close it
/// moves to `last`, which outlives the span so that a later final-response
/// restatement can be recognised.
#[derive(Debug)]
pub struct FramedSpan<F> {
    message_id: Option<String>,
    current: Streamed,
    last: Streamed,
    _framing: PhantomData<F>,
}

/// Text streamed into one span, plus the most recent delta on its own.
#[derive(Debug, Default)]
struct Streamed {
    text: String,
    last_delta: String,
}

impl Streamed {
    fn push(&mut self, delta: &str) {
        self.text.push_str(delta);
        self.last_delta.clear();
        self.last_delta.push_str(delta);
    }

    fn clear(&mut self) {
        self.text.clear();
        self.last_delta.clear();
    }

    /// True if `text` restates this stream: equal to all of it, or to its
    /// last delta.
    ///
    /// The delta case covers producers that send accumulated snapshots
    /// instead of deltas, where the last chunk already is the full text.
    fn is_restated_by(&self, text: &str) -> bool {
        !text.is_empty() && (self.text == text || self.last_delta == text)
    }
}

impl<F> Default for FramedSpan<F> {
    fn default() -> Self {
        Self {
            message_id: None,
            current: Streamed::default(),
            last: Streamed::default(),
            _framing: PhantomData,
        }
    }
}

impl<F: Framing> FramedSpan<F> {
    /// True while a start has been emitted without its end.
    pub fn is_open(&self) -> bool {
        self.message_id.is_some()
    }

    /// Id of the open span.
    pub fn message_id(&self) -> Option<&str> {
        self.message_id.as_deref()
    }

    /// Text emitted into the open span so far.
    pub fn current_text(&self) -> &str {
        &self.current.text
    }

    /// Text of the most recently closed span.
    pub fn last_text(&self) -> &str {
        &self.last.text
    }

    /// Emit `delta` as content, opening the span first if needed.
    ///
    /// Empty deltas are dropped.
    pub fn push(&mut self, delta: &str, out: &mut Vec<AguiEvent>) {
        if delta.is_empty() {
            return;
        }
        let message_id = match &self.message_id {
            Some(id) => id.clone(),
            None => {
                let id = uuid::Uuid::new_v4().to_string();
                out.extend(F::start(&id));
                self.current.clear();
                self.message_id = Some(id.clone());
                id
            }
        };
        out.push(F::content(&message_id, delta));
        self.current.push(delta);
    }

    /// Close the span if open. Idempotent.
    pub fn close(&mut self, out: &mut Vec<AguiEvent>) {
        if let Some(message_id) = self.message_id.take() {
            out.extend(F::end(&message_id));
            self.last = std::mem::take(&mut self.current);
        }
    }

    /// Handle the authoritative final text of a turn.
    ///
    /// A restatement of what was already streamed only closes the span. A
    /// strict extension of the open span emits the missing tail. Anything
    /// else is emitted as a complete message of its own.
    pub fn finish(&mut self, text: &str, out: &mut Vec<AguiEvent>) {
        if self.is_open() {
            if self.current.is_restated_by(text) || self.last.is_restated_by(text) {
                debug!("{} final response repeats streamed content, closing", F::KIND);
                self.close(out);
            } else if let Some(tail) = text
                .strip_prefix(self.current.text.as_str())
                .filter(|tail| !tail.is_empty())
            {
                debug!("{} final response extends streamed content", F::KIND);
                self.push(tail, out);
                self.close(out);
            } else {
                self.close(out);
                self.one_shot(text, out);
            }
        } else if self.last.is_restated_by(text) {
            debug!("{} final response repeats closed span, skipping", F::KIND);
        } else {
            self.one_shot(text, out);
        }
        self.last.clear();
    }

    fn one_shot(&mut self, text: &str, out: &mut Vec<AguiEvent>) {
        self.push(text, out);
        self.close(out);
    }
}

#[cfg(test)]
#[path = "span_tests.rs"]
mod tests;
