//! Status line model - segments and the cursor/node projection
//!
//! The status line is rebuilt from the session after every update. Its
//! cursor part is a pure function of position, selection and node.

use std::time::{Duration, Instant};

use super::{Position, Session, SyncState};
use crate::translator::NodeId;

/// How long parse errors and other notices stay visible
pub const STATUS_MESSAGE_DURATION: Duration = Duration::from_secs(5);

/// Separator placed between visible segments
pub const SEGMENT_SEPARATOR: &str = " | ";

/// Identifier for status line segments
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SegmentId {
    /// Cursor projection (e.g., "Ln 1, Col 5 | 4 selected | node cst-3")
    Cursor,
    /// Render pipeline state (e.g., "rendering…")
    SyncState,
    /// Transient notices (parse errors, storage problems)
    StatusMessage,
}

/// Content of a segment
#[derive(Debug, Clone, PartialEq)]
pub enum SegmentContent {
    Empty,
    Text(String),
}

impl SegmentContent {
    pub fn display_text(&self) -> &str {
        match self {
            SegmentContent::Empty => "",
            SegmentContent::Text(s) => s,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.display_text().is_empty()
    }
}

/// A single segment in the status line
#[derive(Debug, Clone)]
pub struct StatusSegment {
    pub id: SegmentId,
    pub content: SegmentContent,
}

/// A status notice that auto-expires
#[derive(Debug, Clone)]
pub struct TransientMessage {
    pub text: String,
    pub expires_at: Instant,
}

impl TransientMessage {
    pub fn new(text: impl Into<String>, duration: Duration) -> Self {
        Self {
            text: text.into(),
            expires_at: Instant::now() + duration,
        }
    }

    pub fn is_expired(&self) -> bool {
        Instant::now() >= self.expires_at
    }
}

/// Ordered segments of the status line
#[derive(Debug, Clone)]
pub struct StatusBar {
    segments: Vec<StatusSegment>,
}

impl StatusBar {
    pub fn new() -> Self {
        let segment = |id| StatusSegment {
            id,
            content: SegmentContent::Empty,
        };
        Self {
            segments: vec![
                segment(SegmentId::Cursor),
                segment(SegmentId::SyncState),
                segment(SegmentId::StatusMessage),
            ],
        }
    }

    pub fn update_segment(&mut self, id: SegmentId, content: SegmentContent) {
        if let Some(segment) = self.segments.iter_mut().find(|s| s.id == id) {
            segment.content = content;
        }
    }

    pub fn visible_segments(&self) -> impl Iterator<Item = &StatusSegment> {
        self.segments.iter().filter(|s| !s.content.is_empty())
    }

    /// Visible segments joined into one display line
    pub fn render_line(&self) -> String {
        self.visible_segments()
            .map(|s| s.content.display_text())
            .collect::<Vec<_>>()
            .join(SEGMENT_SEPARATOR)
    }
}

impl Default for StatusBar {
    fn default() -> Self {
        Self::new()
    }
}

/// Human-readable cursor projection: position, selection length, node
///
/// `Ln 1, Col 5 | 4 selected | node cst-3`; the selection and node parts
/// are left out when empty or unresolved.
pub fn status_text(position: Position, selection: &str, node: Option<NodeId>) -> String {
    let mut parts = vec![cursor_text(position)];
    if let Some(selection) = selection_text(selection) {
        parts.push(selection);
    }
    if let Some(node) = node {
        parts.push(node_text(node));
    }
    parts.join(SEGMENT_SEPARATOR)
}

fn cursor_text(position: Position) -> String {
    format!("Ln {}, Col {}", position.line, position.column)
}

fn selection_text(selection: &str) -> Option<String> {
    match selection.chars().count() {
        0 => None,
        n => Some(format!("{} selected", n)),
    }
}

fn node_text(node: NodeId) -> String {
    format!("node {}", node)
}

/// Synchronize status segments with current session state
pub fn sync_status_bar(session: &mut Session) {
    let cursor = status_text(session.cursor, &session.selection, session.highlight.node());
    session
        .status_bar
        .update_segment(SegmentId::Cursor, SegmentContent::Text(cursor));

    let sync = match session.sync_state {
        SyncState::Rendering => SegmentContent::Text("rendering…".into()),
        SyncState::Error => SegmentContent::Text("parse error".into()),
        SyncState::Empty | SyncState::Synced => SegmentContent::Empty,
    };
    session
        .status_bar
        .update_segment(SegmentId::SyncState, sync);

    if session
        .status_message
        .as_ref()
        .is_some_and(|m| m.is_expired())
    {
        session.status_message = None;
    }
    let message = session
        .status_message
        .as_ref()
        .map(|m| SegmentContent::Text(m.text.clone()))
        .unwrap_or(SegmentContent::Empty);
    session
        .status_bar
        .update_segment(SegmentId::StatusMessage, message);
}
