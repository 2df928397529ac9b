//! Collaborator interfaces: the text editing widget and the tree panel
//!
//! Both are owned by the runtime. They report user input by sending
//! messages into the app channel instead of invoking callbacks, so events
//! are handled one at a time in arrival order.

mod memory;

use std::sync::mpsc::Sender;

pub use memory::{AppliedDecoration, MemoryPanel, MemoryWidget};

use crate::messages::Msg;
use crate::model::{Position, TextRange};
use crate::translator::NodeId;

/// Handle to one decoration applied by the editing widget
pub trait DecorationHandle {
    /// Remove the decoration from the widget
    fn clear(self: Box<Self>);
}

/// Text editing widget
pub trait EditorWidget {
    /// Report content changes and cursor moves as `Msg::Editor` on `events`
    fn connect(&mut self, events: Sender<Msg>);

    fn get_text(&self) -> String;

    fn set_text(&mut self, text: &str);

    fn cursor_position(&self) -> Position;

    fn selection_text(&self) -> String;

    fn apply_decoration(
        &mut self,
        range: TextRange,
        style_class: &str,
    ) -> Box<dyn DecorationHandle>;

    /// Scroll so that `range` is visible
    fn reveal_range(&mut self, _range: TextRange) {}
}

/// Container the rendered CST markup is shown in, plus the status area
pub trait TreePanel {
    /// Report node clicks as `Msg::Tree` on `events`
    fn connect(&mut self, events: Sender<Msg>);

    /// Replace the whole markup; any node marks are dropped with it
    fn replace_markup(&mut self, markup: &str);

    fn mark_node(&mut self, id: NodeId, style_class: &str);

    fn unmark_node(&mut self, id: NodeId, style_class: &str);

    /// Scroll so that the node's element is visible
    fn scroll_to_node(&mut self, _id: NodeId) {}

    fn show_status(&mut self, text: &str);
}
