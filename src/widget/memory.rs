//! In-memory collaborators for headless runs and tests

use std::cell::RefCell;
use std::rc::Rc;
use std::sync::mpsc::Sender;

use ropey::Rope;

use super::{DecorationHandle, EditorWidget, TreePanel};
use crate::messages::{EditorMsg, Msg, TreeMsg};
use crate::model::{Position, TextRange};
use crate::translator::NodeId;

/// A decoration currently shown by a [`MemoryWidget`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedDecoration {
    pub id: u64,
    pub range: TextRange,
    pub style_class: String,
}

type DecorationSet = Rc<RefCell<Vec<AppliedDecoration>>>;

struct MemoryDecorationHandle {
    id: u64,
    set: DecorationSet,
}

impl DecorationHandle for MemoryDecorationHandle {
    fn clear(self: Box<Self>) {
        self.set.borrow_mut().retain(|d| d.id != self.id);
    }
}

/// Rope-backed editor with a single cursor and optional selection anchor
pub struct MemoryWidget {
    buffer: Rope,
    cursor: Position,
    anchor: Option<Position>,
    events: Option<Sender<Msg>>,
    decorations: DecorationSet,
    next_decoration_id: u64,
    revealed: Option<TextRange>,
}

impl MemoryWidget {
    pub fn new(text: &str) -> Self {
        Self {
            buffer: Rope::from_str(text),
            cursor: Position::origin(),
            anchor: None,
            events: None,
            decorations: Rc::new(RefCell::new(Vec::new())),
            next_decoration_id: 0,
            revealed: None,
        }
    }

    /// Decorations currently visible
    pub fn decorations(&self) -> Vec<AppliedDecoration> {
        self.decorations.borrow().clone()
    }

    /// Last range scrolled into view
    pub fn revealed(&self) -> Option<TextRange> {
        self.revealed
    }

    /// Move the cursor, collapsing any selection
    pub fn move_cursor(&mut self, position: Position) {
        self.cursor = self.clamp(position);
        self.anchor = None;
        self.emit_cursor_moved();
    }

    /// Select `range`, leaving the cursor at its end
    pub fn select(&mut self, range: TextRange) {
        self.anchor = Some(self.clamp(range.start));
        self.cursor = self.clamp(range.end);
        self.emit_cursor_moved();
    }

    /// Insert text at the cursor, replacing the selection if there is one
    pub fn type_text(&mut self, text: &str) {
        let (start, end) = self.selection_offsets();
        self.buffer.remove(start..end);
        self.buffer.insert(start, text);
        let cursor = start + text.chars().count();
        self.cursor = self.position_of(cursor);
        self.anchor = None;
        self.emit_content_changed();
        self.emit_cursor_moved();
    }

    fn emit(&self, msg: Msg) {
        if let Some(tx) = &self.events {
            // A closed channel means the app is gone; input is dropped.
            let _ = tx.send(msg);
        }
    }

    fn emit_content_changed(&self) {
        if self.events.is_some() {
            self.emit(Msg::Editor(EditorMsg::ContentChanged {
                text: self.get_text(),
            }));
        }
    }

    fn emit_cursor_moved(&self) {
        if self.events.is_some() {
            self.emit(Msg::Editor(EditorMsg::CursorMoved {
                position: self.cursor_position(),
                selection: self.selection_text(),
            }));
        }
    }

    fn selection_offsets(&self) -> (usize, usize) {
        let cursor = self.offset_of(self.cursor);
        let anchor = self.anchor.map(|a| self.offset_of(a)).unwrap_or(cursor);
        (cursor.min(anchor), cursor.max(anchor))
    }

    fn clamp(&self, position: Position) -> Position {
        self.position_of(self.offset_of(position))
    }

    /// Char offset of a 1-indexed position, clamped to the buffer
    fn offset_of(&self, position: Position) -> usize {
        let line_idx = position.line.saturating_sub(1);
        if line_idx >= self.buffer.len_lines() {
            return self.buffer.len_chars();
        }
        let line = self.buffer.line(line_idx);
        let mut line_len = line.len_chars();
        if line_len > 0 && line.char(line_len - 1) == '\n' {
            line_len -= 1;
        }
        self.buffer.line_to_char(line_idx) + position.column.saturating_sub(1).min(line_len)
    }

    fn position_of(&self, offset: usize) -> Position {
        let offset = offset.min(self.buffer.len_chars());
        let line_idx = self.buffer.char_to_line(offset);
        let column = offset - self.buffer.line_to_char(line_idx);
        Position::new(line_idx + 1, column + 1)
    }
}

impl EditorWidget for MemoryWidget {
    fn connect(&mut self, events: Sender<Msg>) {
        self.events = Some(events);
    }

    fn get_text(&self) -> String {
        self.buffer.to_string()
    }

    fn set_text(&mut self, text: &str) {
        let before = (self.cursor, self.anchor);
        self.buffer = Rope::from_str(text);
        self.cursor = self.clamp(self.cursor);
        self.anchor = None;
        self.emit_content_changed();
        if (self.cursor, self.anchor) != before {
            self.emit_cursor_moved();
        }
    }

    fn cursor_position(&self) -> Position {
        self.cursor
    }

    fn selection_text(&self) -> String {
        let (start, end) = self.selection_offsets();
        self.buffer.slice(start..end).to_string()
    }

    fn apply_decoration(
        &mut self,
        range: TextRange,
        style_class: &str,
    ) -> Box<dyn DecorationHandle> {
        let id = self.next_decoration_id;
        self.next_decoration_id += 1;
        self.decorations.borrow_mut().push(AppliedDecoration {
            id,
            range,
            style_class: style_class.to_string(),
        });
        Box::new(MemoryDecorationHandle {
            id,
            set: Rc::clone(&self.decorations),
        })
    }

    fn reveal_range(&mut self, range: TextRange) {
        self.revealed = Some(range);
    }
}

/// Tree panel that keeps markup, marks and status text in memory
#[derive(Default)]
pub struct MemoryPanel {
    markup: String,
    marked: Vec<(NodeId, String)>,
    scrolled_to: Option<NodeId>,
    status: String,
    markup_replacements: usize,
    events: Option<Sender<Msg>>,
}

impl MemoryPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    /// Nodes currently marked, with their style class
    pub fn marked(&self) -> &[(NodeId, String)] {
        &self.marked
    }

    pub fn scrolled_to(&self) -> Option<NodeId> {
        self.scrolled_to
    }

    pub fn status(&self) -> &str {
        &self.status
    }

    /// How many times the markup was replaced
    pub fn markup_replacements(&self) -> usize {
        self.markup_replacements
    }

    /// Simulate a click on an element of the rendered markup
    pub fn click(&self, element_id: &str) {
        if let Some(tx) = &self.events {
            let _ = tx.send(Msg::Tree(TreeMsg::NodeClicked {
                element_id: element_id.to_string(),
            }));
        }
    }
}

impl TreePanel for MemoryPanel {
    fn connect(&mut self, events: Sender<Msg>) {
        self.events = Some(events);
    }

    fn replace_markup(&mut self, markup: &str) {
        self.markup = markup.to_string();
        self.marked.clear();
        self.markup_replacements += 1;
    }

    fn mark_node(&mut self, id: NodeId, style_class: &str) {
        self.marked.push((id, style_class.to_string()));
    }

    fn unmark_node(&mut self, id: NodeId, style_class: &str) {
        self.marked
            .retain(|(marked, class)| !(*marked == id && class == style_class));
    }

    fn scroll_to_node(&mut self, id: NodeId) {
        self.scrolled_to = Some(id);
    }

    fn show_status(&mut self, text: &str) {
        self.status = text.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;

    #[test]
    fn test_type_text_moves_cursor_and_emits() {
        let (tx, rx) = mpsc::channel();
        let mut widget = MemoryWidget::new("ab\ncd");
        widget.connect(tx);
        widget.move_cursor(Position::new(2, 2));
        widget.type_text("X");

        assert_eq!(widget.get_text(), "ab\ncXd");
        assert_eq!(widget.cursor_position(), Position::new(2, 3));
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 3);
        assert!(matches!(
            &events[1],
            Msg::Editor(EditorMsg::ContentChanged { text }) if text == "ab\ncXd"
        ));
        assert!(matches!(
            &events[2],
            Msg::Editor(EditorMsg::CursorMoved { position, .. }) if *position == Position::new(2, 3)
        ));
    }

    #[test]
    fn test_set_text_reports_clamped_cursor() {
        let (tx, rx) = mpsc::channel();
        let mut widget = MemoryWidget::new("first line\nsecond line");
        widget.move_cursor(Position::new(2, 8));
        widget.connect(tx);

        widget.set_text("x");
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 2);
        assert!(matches!(
            &events[1],
            Msg::Editor(EditorMsg::CursorMoved { position, .. }) if *position == Position::new(1, 2)
        ));

        // Cursor still fits: only the content event
        widget.set_text("xyz");
        let events: Vec<_> = rx.try_iter().collect();
        assert_eq!(events.len(), 1);
    }

    #[test]
    fn test_cursor_is_clamped_to_line_end() {
        let mut widget = MemoryWidget::new("abc\nd");
        widget.move_cursor(Position::new(1, 99));
        assert_eq!(widget.cursor_position(), Position::new(1, 4));
        widget.move_cursor(Position::new(9, 1));
        assert_eq!(widget.cursor_position(), Position::new(2, 2));
    }

    #[test]
    fn test_selection_text() {
        let mut widget = MemoryWidget::new("def main():");
        widget.select(TextRange::new(Position::new(1, 5), Position::new(1, 9)));
        assert_eq!(widget.selection_text(), "main");
    }

    #[test]
    fn test_decoration_handle_clears_only_its_decoration() {
        let mut widget = MemoryWidget::new("abc");
        let range = TextRange::new(Position::new(1, 1), Position::new(1, 2));
        let first = widget.apply_decoration(range, "a");
        let _second = widget.apply_decoration(range, "b");
        first.clear();

        let left = widget.decorations();
        assert_eq!(left.len(), 1);
        assert_eq!(left[0].style_class, "b");
    }

    #[test]
    fn test_panel_replace_drops_marks() {
        let mut panel = MemoryPanel::new();
        panel.mark_node(NodeId(1), "active");
        panel.replace_markup("<div></div>");
        assert!(panel.marked().is_empty());
        assert_eq!(panel.markup_replacements(), 1);
    }
}
