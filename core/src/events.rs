//! Event emission.
//!
//! Parsing surfaces structure as a flat sequence of events rather than a
//! constructed tree (tree construction is an explicit non-goal). The FFI
//! contract describes this as a single function pointer
//! plus an opaque user-data pointer; the safe Rust-native surface here is
//! the same shape expressed as one closure, so a consumer wires up exactly
//! one callback regardless of how many event variants exist.

use crate::context::Value;
use crate::error::ErrorCode;
use crate::position::Position;

#[derive(Debug, Clone, PartialEq)]
pub enum Event<'a> {
    StartDocument,
    EndDocument,
    StartElement { name: &'a str, position: Position },
    EndElement { name: &'a str, position: Position },
    Value { value: Value, position: Position },
    Error { code: ErrorCode, message: String, position: Position },
}

/// A single-callback sink, mirroring the FFI contract's one-function shape:
/// every event variant funnels through one `FnMut`, so a consumer need not
/// implement a multi-method visitor trait.
pub struct EventSink<F: FnMut(Event<'_>)> {
    callback: F,
}

impl<F: FnMut(Event<'_>)> EventSink<F> {
    pub fn new(callback: F) -> Self {
        Self { callback }
    }

    pub fn emit(&mut self, event: Event<'_>) {
        (self.callback)(event);
    }
}

/// Accumulates events into a `Vec` instead of dispatching to a callback;
/// convenient for tests and for consumers who want the whole sequence at
/// once rather than incremental delivery.
#[derive(Debug, Default)]
pub struct EventLog {
    events: Vec<OwnedEvent>,
}

/// An owned counterpart of [`Event`], for storage past the borrow of the
/// token text / element name that produced it.
#[derive(Debug, Clone, PartialEq)]
pub enum OwnedEvent {
    StartDocument,
    EndDocument,
    StartElement { name: String, position: Position },
    EndElement { name: String, position: Position },
    Value { value: Value, position: Position },
    Error { code: ErrorCode, message: String, position: Position },
}

impl From<Event<'_>> for OwnedEvent {
    fn from(e: Event<'_>) -> Self {
        match e {
            Event::StartDocument => OwnedEvent::StartDocument,
            Event::EndDocument => OwnedEvent::EndDocument,
            Event::StartElement { name, position } => OwnedEvent::StartElement {
                name: name.to_string(),
                position,
            },
            Event::EndElement { name, position } => OwnedEvent::EndElement {
                name: name.to_string(),
                position,
            },
            Event::Value { value, position } => OwnedEvent::Value { value, position },
            Event::Error { code, message, position } => OwnedEvent::Error { code, message, position },
        }
    }
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, event: Event<'_>) {
        self.events.push(event.into());
    }

    pub fn events(&self) -> &[OwnedEvent] {
        &self.events
    }

    pub fn into_events(self) -> Vec<OwnedEvent> {
        self.events
    }
}
