//! Session model
//!
//! The [`Session`] owns everything the synchronization core mutates: the
//! buffer snapshot, the current node lookup and markup, highlight state and
//! render bookkeeping. Only `update` writes to it.

pub mod document;
pub mod position;
pub mod status_bar;

use std::sync::Arc;

pub use document::{Document, DEFAULT_SAMPLE};
pub use position::{Position, TextRange};
pub use status_bar::{status_text, sync_status_bar, StatusBar, TransientMessage};

use crate::config::SyncConfig;
use crate::decoration::HighlightState;
use crate::translator::NodeLookup;

/// Where the session is in the render cycle
///
/// `Empty` only before the first render is issued. A failed render moves to
/// `Error` while the last good markup and lookup stay in place.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SyncState {
    #[default]
    Empty,
    Rendering,
    Synced,
    Error,
}

/// Render Scheduler bookkeeping
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderState {
    /// Revision of the most recently issued render; only its result applies
    pub last_issued: Option<u64>,
    /// Revision currently being rendered by the worker
    pub in_flight: Option<u64>,
    /// Newest revision that became ready while another render was in flight
    pub pending: Option<u64>,
}

impl RenderState {
    pub fn is_busy(&self) -> bool {
        self.in_flight.is_some() || self.pending.is_some()
    }
}

/// Explicit session object shared by the event router
#[derive(Debug, Clone)]
pub struct Session {
    pub document: Document,
    /// Lookup of the most recently applied render
    pub lookup: Arc<NodeLookup>,
    /// Markup of the most recently applied render
    pub markup: String,
    pub highlight: HighlightState,
    pub sync_state: SyncState,
    pub render: RenderState,
    /// Last cursor position reported by the editor
    pub cursor: Position,
    /// Selected text at the last cursor report
    pub selection: String,
    pub status_bar: StatusBar,
    pub status_message: Option<TransientMessage>,
    /// Set once persisting failed; the session then lives in memory only
    pub persistence_degraded: bool,
    pub debounce_ms: u64,
}

impl Session {
    pub fn new(text: impl Into<String>, config: &SyncConfig) -> Self {
        let mut session = Self {
            document: Document::new(text),
            lookup: Arc::new(NodeLookup::default()),
            markup: String::new(),
            highlight: HighlightState::default(),
            sync_state: SyncState::Empty,
            render: RenderState::default(),
            cursor: Position::origin(),
            selection: String::new(),
            status_bar: StatusBar::new(),
            status_message: None,
            persistence_degraded: false,
            debounce_ms: config.debounce_ms,
        };
        sync_status_bar(&mut session);
        session
    }

    /// Show a transient notice in the status line
    pub fn set_status_message(&mut self, text: impl Into<String>) {
        self.status_message = Some(TransientMessage::new(
            text,
            status_bar::STATUS_MESSAGE_DURATION,
        ));
    }

    /// Current status line text
    pub fn status_line(&self) -> String {
        self.status_bar.render_line()
    }
}
