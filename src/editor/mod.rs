//! Embedded SQL editor widget.
//!
//! The editor is consumed through two capabilities: an [`EditorFactory`] that
//! builds an instance against a mount point from a set of creation options,
//! and the [`EditorInstance`] it returns, which exposes event subscriptions and
//! hint display. [`TerminalEditor`] is the ratatui implementation.

pub mod buffer;
pub mod hint;
pub mod keymap;
pub mod mode;
pub mod options;
pub mod popup;
pub mod sql_hint;
pub mod terminal;
pub mod theme;

pub use buffer::{Position, TextBuffer};
pub use hint::{helper, register_helper, CursorContext, HelperKind, HintResult, HintSource};
pub use options::{EditorOptions, HintOptions};
pub use terminal::{TerminalEditor, TerminalFactory};

use crate::error::Result;
use ratatui::layout::Rect;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

/// The screen region an editor instance is constructed against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct MountPoint {
    /// Area the editor draws into until the host lays it out again.
    pub area: Rect,
}

impl MountPoint {
    pub fn new(area: Rect) -> Self {
        Self { area }
    }
}

/// Process-unique identity of an editor instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InstanceId(u64);

impl InstanceId {
    /// Allocates the next instance id.
    pub fn next() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Handle returned by [`EditorInstance::on`], used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// Events an instance can be subscribed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    /// Fired after every cursor movement, including movement caused by edits.
    CursorActivity,
    /// Fired after every content edit.
    Change,
}

impl EventKind {
    /// Returns the event name as used in key maps and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::CursorActivity => "cursorActivity",
            Self::Change => "change",
        }
    }
}

/// What caused a change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeOrigin {
    /// Typed text, including newlines and tabs.
    Input,
    /// Backspace, delete or line removal.
    Delete,
    /// A picked completion.
    Complete,
    /// Indentation commands.
    Indent,
}

/// A single edit: `removed` (the text between `from` and `to`) was replaced
/// by `text`. Both are split into lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    pub from: Position,
    pub to: Position,
    pub text: Vec<String>,
    pub removed: Vec<String>,
    pub origin: ChangeOrigin,
}

/// An event delivered to listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorEvent {
    CursorActivity { cursor: Position },
    Change(ChangeEvent),
}

impl EditorEvent {
    pub fn kind(&self) -> EventKind {
        match self {
            Self::CursorActivity { .. } => EventKind::CursorActivity,
            Self::Change(_) => EventKind::Change,
        }
    }
}

/// Event callback. Receives the instance that fired the event so it can act
/// on it, e.g. by calling [`EditorInstance::show_hint`].
pub type Listener = Box<dyn FnMut(&mut dyn EditorInstance, &EditorEvent)>;

/// A live editor created by an [`EditorFactory`].
pub trait EditorInstance {
    fn id(&self) -> InstanceId;

    /// Subscribes `listener` to events of `kind`.
    fn on(&mut self, kind: EventKind, listener: Listener) -> SubscriptionId;

    /// Removes a subscription. Returns false if it was not registered.
    fn off(&mut self, subscription: SubscriptionId) -> bool;

    /// Number of registered listeners.
    fn listener_count(&self) -> usize;

    /// Current document text.
    fn value(&self) -> String;

    fn cursor(&self) -> Position;

    /// Asks the configured hint source for candidates at the cursor and shows them.
    fn show_hint(&mut self);

    fn close_hint(&mut self);

    /// Releases the instance. Calling it again has no effect.
    fn destroy(&mut self);

    fn is_destroyed(&self) -> bool;
}

/// Builds editor instances.
pub trait EditorFactory {
    type Instance: EditorInstance;

    /// Constructs an instance against `mount`. Fails if `options` name an
    /// unknown mode, theme, key or command.
    fn create(&mut self, mount: &MountPoint, options: EditorOptions) -> Result<Self::Instance>;
}
