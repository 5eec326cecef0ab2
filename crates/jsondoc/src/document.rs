//! The document builder: a stack machine turning an event stream into a
//! [`Value`] tree.
//!
//! A [`DocumentBuilder`] consumes [`Event`]s one at a time, keeps a stack of
//! in-progress containers, and produces exactly one root value when the
//! stream ends with a balanced stack. An observer is notified synchronously
//! as values finalize, which lets a streaming consumer react before the
//! whole document is known.

use alloc::{string::String, vec::Vec};

use crate::{
    error::Error,
    event::Event,
    scanner::Scanner,
    value::{Array, Map, Value},
};

/// Hooks invoked synchronously as values finalize during a build.
///
/// All four hooks default to no-ops, so an implementor overrides only the
/// notifications it cares about. For each closing container the completion
/// hook fires first, then the hook reporting where the snapshot landed in
/// its parent; this order is part of the contract and is never batched or
/// reordered.
pub trait DocumentObserver {
    /// An object finished and was snapshotted.
    fn object_completed(&mut self, object: &Map) {
        let _ = object;
    }

    /// An array finished and was snapshotted.
    fn array_completed(&mut self, array: &Array) {
        let _ = array;
    }

    /// A finished value was appended to the innermost open array.
    fn appended_to_array(&mut self, value: &Value, array: &Array) {
        let _ = (value, array);
    }

    /// A finished value was assigned under `key` in the innermost open
    /// object.
    fn set_for_key(&mut self, key: &str, value: &Value, object: &Map) {
        let _ = (key, value, object);
    }
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl DocumentObserver for NoopObserver {}

/// Where a parse currently stands. Transitions are forward-only: a
/// completed document never regresses to an error.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ParseStatus {
    #[default]
    NotStarted,
    Complete,
    Failed(Error),
}

impl ParseStatus {
    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self, Self::Complete)
    }

    /// The recorded error, if the parse failed.
    #[must_use]
    pub fn error(&self) -> Option<&Error> {
        match self {
            Self::Failed(e) => Some(e),
            _ => None,
        }
    }
}

/// An in-progress container on the build stack.
///
/// The pending key of an object lives inside its frame, so the stack of
/// pending keys is simply the stack of frames: closing a frame restores the
/// enclosing object's pending key with no separate bookkeeping to keep in
/// sync.
#[derive(Debug)]
enum Frame {
    Array(Array),
    Object { map: Map, pending: Option<String> },
}

/// Single-use stack machine assembling one JSON document from events.
///
/// The "current container" is always the top of the build stack; no
/// separately owned alias of it exists. Values handed to the observer are
/// immutable snapshots — once a frame closes and attaches to its parent the
/// builder never touches it again.
///
/// Duplicate keys within one object follow last-write-wins semantics, as
/// JSON itself permits duplicates and the final assignment is the one a
/// sequential reader observes.
#[derive(Debug)]
pub struct DocumentBuilder<O: DocumentObserver = NoopObserver> {
    stack: Vec<Frame>,
    root: Option<Value>,
    status: ParseStatus,
    observer: O,
}

impl DocumentBuilder<NoopObserver> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_observer(NoopObserver)
    }
}

impl Default for DocumentBuilder<NoopObserver> {
    fn default() -> Self {
        Self::new()
    }
}

impl<O: DocumentObserver> DocumentBuilder<O> {
    #[must_use]
    pub fn with_observer(observer: O) -> Self {
        Self {
            stack: Vec::new(),
            root: None,
            status: ParseStatus::NotStarted,
            observer,
        }
    }

    /// Current parse status.
    #[must_use]
    pub fn status(&self) -> &ParseStatus {
        &self.status
    }

    /// Whether the document is complete: the stack is empty and a root has
    /// been set.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.status.is_complete()
    }

    /// The finished root value, if the document completed.
    #[must_use]
    pub fn root(&self) -> Option<&Value> {
        if self.is_complete() { self.root.as_ref() } else { None }
    }

    /// Consumes the builder, returning the finished root value.
    #[must_use]
    pub fn into_root(self) -> Option<Value> {
        if self.status.is_complete() { self.root } else { None }
    }

    /// A reference to the observer, for reclaiming accumulated state.
    #[must_use]
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Consumes the observer.
    #[must_use]
    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Applies one event.
    ///
    /// After a failure every further call returns the recorded error; after
    /// completion any event is a protocol violation, but the status stays
    /// `Complete`.
    pub fn apply(&mut self, event: Event) -> Result<(), Error> {
        match &self.status {
            ParseStatus::Failed(e) => return Err(e.clone()),
            ParseStatus::Complete => {
                return Err(Error::BuilderProtocolViolation(
                    "event delivered after document completion",
                ));
            }
            ParseStatus::NotStarted => {}
        }
        match self.apply_inner(event) {
            Ok(()) => Ok(()),
            Err(e) => {
                self.status = ParseStatus::Failed(e.clone());
                Err(e)
            }
        }
    }

    /// Drives this builder with every event `scanner` produces, stopping at
    /// clean end of input, at completion of the document, or at the first
    /// error.
    ///
    /// A scanner error is recorded in the builder's [`status`] before being
    /// returned, so a partially-populated root is never mistaken for a
    /// completed document.
    ///
    /// [`status`]: DocumentBuilder::status
    pub fn consume(&mut self, scanner: &mut Scanner<'_>) -> Result<(), Error> {
        while !self.is_complete() {
            match scanner.next_event() {
                Ok(Some(event)) => self.apply(event)?,
                Ok(None) => break,
                Err(e) => {
                    self.status = ParseStatus::Failed(e.clone());
                    return Err(e);
                }
            }
        }
        Ok(())
    }

    /// Closes every open frame, producing a root from a truncated event
    /// stream. A pending key still awaiting its value is dropped.
    ///
    /// Intended for use together with
    /// [`ScannerOptions::allow_partial_input`](crate::ScannerOptions::allow_partial_input);
    /// on a well-terminated stream this is a no-op.
    pub fn finish_partial(&mut self) -> Result<(), Error> {
        if let ParseStatus::Failed(e) = &self.status {
            return Err(e.clone());
        }
        while let Some(frame) = self.stack.pop() {
            let result = match frame {
                Frame::Object { map, pending: _ } => {
                    self.observer.object_completed(&map);
                    self.attach(Value::Object(map))
                }
                Frame::Array(items) => {
                    self.observer.array_completed(&items);
                    self.attach(Value::Array(items))
                }
            };
            if let Err(e) = result {
                self.status = ParseStatus::Failed(e.clone());
                return Err(e);
            }
        }
        Ok(())
    }

    fn apply_inner(&mut self, event: Event) -> Result<(), Error> {
        match event {
            Event::Null => self.attach(Value::Null),
            Event::Bool(b) => self.attach(Value::Bool(b)),
            Event::Int(i) => self.attach(Value::Int(i)),
            Event::Double(d) => self.attach(Value::Double(d)),
            Event::String(s) => self.attach(Value::String(s)),
            Event::MapStart => {
                self.stack.push(Frame::Object {
                    map: Map::new(),
                    pending: None,
                });
                Ok(())
            }
            Event::MapKey(key) => match self.stack.last_mut() {
                Some(Frame::Object { pending, .. }) => {
                    if pending.is_some() {
                        return Err(Error::BuilderProtocolViolation(
                            "key delivered while a key was already pending",
                        ));
                    }
                    *pending = Some(key);
                    Ok(())
                }
                _ => Err(Error::BuilderProtocolViolation(
                    "map key outside of an open object",
                )),
            },
            Event::MapEnd => match self.stack.pop() {
                Some(Frame::Object { map, pending }) => {
                    if pending.is_some() {
                        return Err(Error::BuilderProtocolViolation(
                            "object closed while awaiting a value for a key",
                        ));
                    }
                    self.observer.object_completed(&map);
                    self.attach(Value::Object(map))
                }
                Some(frame @ Frame::Array(_)) => {
                    self.stack.push(frame);
                    Err(Error::BuilderProtocolViolation(
                        "object close while an array is open",
                    ))
                }
                None => Err(Error::BuilderProtocolViolation(
                    "container close with no open container",
                )),
            },
            Event::ArrayStart => {
                self.stack.push(Frame::Array(Array::new()));
                Ok(())
            }
            Event::ArrayEnd => match self.stack.pop() {
                Some(Frame::Array(items)) => {
                    self.observer.array_completed(&items);
                    self.attach(Value::Array(items))
                }
                Some(frame @ Frame::Object { .. }) => {
                    self.stack.push(frame);
                    Err(Error::BuilderProtocolViolation(
                        "array close while an object is open",
                    ))
                }
                None => Err(Error::BuilderProtocolViolation(
                    "container close with no open container",
                )),
            },
        }
    }

    /// Routes a finished value to the current container, or makes it the
    /// root when no container is open.
    fn attach(&mut self, value: Value) -> Result<(), Error> {
        let Self {
            stack,
            root,
            status,
            observer,
        } = self;
        match stack.last_mut() {
            None => {
                *root = Some(value);
                *status = ParseStatus::Complete;
                Ok(())
            }
            Some(Frame::Array(items)) => {
                items.push(value);
                let items = &*items;
                if let Some(last) = items.last() {
                    observer.appended_to_array(last, items);
                }
                Ok(())
            }
            Some(Frame::Object { map, pending }) => {
                let Some(key) = pending.take() else {
                    return Err(Error::BuilderProtocolViolation(
                        "value delivered to an object with no pending key",
                    ));
                };
                map.insert(key.clone(), value);
                if let Some(inserted) = map.get(&key) {
                    observer.set_for_key(&key, inserted, map);
                }
                Ok(())
            }
        }
    }
}
