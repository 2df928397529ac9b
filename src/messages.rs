//! Message types for the Elm-style architecture
//!
//! Every input to the synchronization core flows through these types.

use crate::model::Position;
use crate::render::{RenderError, RenderOutput};

/// Editor widget messages
#[derive(Debug, Clone)]
pub enum EditorMsg {
    /// Buffer text changed (full text as reported by the widget)
    ContentChanged { text: String },
    /// Cursor moved; `selection` is the selected text, empty if none
    CursorMoved { position: Position, selection: String },
}

/// Rendered tree messages
#[derive(Debug, Clone)]
pub enum TreeMsg {
    /// A node element was clicked in the rendered markup
    NodeClicked { element_id: String },
}

/// Render scheduling messages
#[derive(Debug, Clone)]
pub enum RenderMsg {
    /// Debounce window for `revision` elapsed
    Ready { revision: u64 },
    /// Worker finished rendering `revision`
    Completed {
        revision: u64,
        result: Result<RenderOutput, RenderError>,
    },
}

/// Session persistence messages
#[derive(Debug, Clone)]
pub enum SessionMsg {
    /// Writing the buffer to storage failed
    PersistFailed { reason: String },
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    Editor(EditorMsg),
    Tree(TreeMsg),
    Render(RenderMsg),
    Session(SessionMsg),
}
