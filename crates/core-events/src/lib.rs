//! Core event types and channel helpers for sift.
//!
//! Every state change of a finder session is driven by exactly one [`Event`]
//! consumed by a single dispatch function per turn. Producers (terminal input,
//! resize polling, list streaming) run as independent [`AsyncEventSource`]s and
//! only ever talk to the session through the bounded channel.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use tokio::sync::mpsc::Sender;
use tokio::task::JoinHandle;

// -------------------------------------------------------------------------------------------------
// Channel Policy
// -------------------------------------------------------------------------------------------------
// The event loop uses a bounded mpsc channel sized by `EVENT_CHANNEL_CAP`. Producers await
// `send` and therefore park when the consumer falls behind instead of dropping keys. List
// updates are throttled at their source so a fast producer cannot flood the queue.
// -------------------------------------------------------------------------------------------------
pub const EVENT_CHANNEL_CAP: usize = 1024;

pub static CHANNEL_SEND_FAILURES: AtomicU64 = AtomicU64::new(0);
pub static KEYPRESS_TOTAL: AtomicU64 = AtomicU64::new(0);
pub static LIST_UPDATES_SENT: AtomicU64 = AtomicU64::new(0);
pub static RESIZE_DETECTED: AtomicU64 = AtomicU64::new(0);

/// Top-level event enum consumed by the central event loop.
#[derive(Debug, Clone)]
pub enum Event {
    Input(InputEvent),
    /// Wholesale replacement of the source list.
    ListUpdate(Arc<[String]>),
    /// Final replacement of a streamed source list. Arms the select-one latch.
    ListSettled(Arc<[String]>),
    /// Items appended after the current ones; earlier indices are untouched.
    ListAppend(Arc<[String]>),
    /// The appending producer has finished. Arms the select-one latch.
    ListEnd,
    Shutdown,
}

impl Event {
    pub fn key(code: KeyCode, mods: KeyModifiers) -> Self {
        Event::Input(InputEvent::Key(KeyEvent { code, mods }))
    }

    pub fn list_update<I, S>(items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Event::ListUpdate(items.into_iter().map(Into::into).collect())
    }

    /// Short label used in logs (never includes payloads).
    pub fn kind(&self) -> &'static str {
        match self {
            Event::Input(InputEvent::Key(_)) => "key",
            Event::Input(InputEvent::Resize(..)) => "resize",
            Event::ListUpdate(_) => "list_update",
            Event::ListSettled(_) => "list_settled",
            Event::ListAppend(_) => "list_append",
            Event::ListEnd => "list_end",
            Event::Shutdown => "shutdown",
        }
    }
}

// -------------------------------------------------------------------------------------------------
// Async Event Sources
// -------------------------------------------------------------------------------------------------

/// Trait implemented by any async event producer. Implementors usually hold configuration and
/// spawn one background task that pushes `Event`s into the shared channel.
///
/// Each source owns its task lifecycle and must stop promptly once `tx.send(..)` fails, which
/// happens as soon as the session drops its receiver.
pub trait AsyncEventSource: Send + 'static {
    /// Human-readable stable identifier (used for logging / diagnostics).
    fn name(&self) -> &'static str;
    /// Consume self and spawn the background task, returning a JoinHandle.
    fn spawn(self: Box<Self>, tx: Sender<Event>) -> JoinHandle<()>;
}

/// Registry of event sources spawned together at session start.
pub struct EventSourceRegistry {
    sources: Vec<Box<dyn AsyncEventSource>>,
}

impl Default for EventSourceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl EventSourceRegistry {
    pub fn new() -> Self {
        Self {
            sources: Vec::new(),
        }
    }

    pub fn register<S: AsyncEventSource>(&mut self, src: S) {
        self.sources.push(Box::new(src));
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    /// Spawn all registered sources, returning their JoinHandles. Each source receives its own
    /// clone of `tx`; the caller keeps ownership of the original and should drop it before
    /// awaiting the handles during shutdown.
    pub fn spawn_all(&mut self, tx: &Sender<Event>) -> Vec<JoinHandle<()>> {
        let mut out = Vec::with_capacity(self.sources.len());
        for src in self.sources.drain(..) {
            let name = src.name();
            tracing::info!(target: "runtime.source", source = name, "spawning event source");
            out.push(src.spawn(tx.clone()));
        }
        out
    }
}

// -------------------------------------------------------------------------------------------------
// Input events
// -------------------------------------------------------------------------------------------------

/// Normalized input events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyEvent),
    /// Terminal resize (columns, rows).
    Resize(u16, u16),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct KeyEvent {
    pub code: KeyCode,
    pub mods: KeyModifiers,
}

impl KeyEvent {
    pub fn new(code: KeyCode, mods: KeyModifiers) -> Self {
        Self { code, mods }
    }

    pub fn plain(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::empty())
    }

    pub fn ctrl(c: char) -> Self {
        Self::new(KeyCode::Char(c), KeyModifiers::CTRL)
    }

    pub fn alt(code: KeyCode) -> Self {
        Self::new(code, KeyModifiers::ALT)
    }

    /// Printable character event. Uppercase letters carry the SHIFT modifier the way terminals
    /// report them.
    pub fn char(c: char) -> Self {
        let mods = if c.is_uppercase() {
            KeyModifiers::SHIFT
        } else {
            KeyModifiers::empty()
        };
        Self::new(KeyCode::Char(c), mods)
    }
}

/// KeyCode enumerates normalized logical key representations consumed by higher layers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    Char(char),
    /// Return (carriage return / Ctrl-m).
    Enter,
    Esc,
    Backspace,
    Tab,
    Up,
    Down,
    Left,
    Right,
    Home,
    End,
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct KeyModifiers: u8 {
        const CTRL = 0b0000_0001;
        const ALT  = 0b0000_0010;
        const SHIFT= 0b0000_0100;
    }
}

impl fmt::Display for KeyEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}{:?}", self.code, self.mods)
    }
}
