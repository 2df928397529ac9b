//! Highlight state and the controller that mirrors it onto the views
//!
//! [`HighlightState`] lives in the session and is the single source of
//! truth: at most one text range and at most one tree node. The runtime's
//! [`DecorationController`] owns the matching widget decoration and panel
//! mark and brings them in line with the state after every update.

use crate::model::TextRange;
use crate::translator::NodeId;
use crate::widget::{DecorationHandle, EditorWidget, TreePanel};

/// Desired highlights
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HighlightState {
    range: Option<TextRange>,
    node: Option<NodeId>,
}

impl HighlightState {
    pub fn range(&self) -> Option<TextRange> {
        self.range
    }

    pub fn node(&self) -> Option<NodeId> {
        self.node
    }

    /// Replace the tree-node highlight; `None` clears it
    ///
    /// Returns whether the state changed.
    pub fn highlight_node(&mut self, node: Option<NodeId>) -> bool {
        std::mem::replace(&mut self.node, node) != node
    }

    /// Replace the text-range highlight; `None` clears it
    pub fn highlight_range(&mut self, range: Option<TextRange>) -> bool {
        std::mem::replace(&mut self.range, range) != range
    }
}

/// Applies [`HighlightState`] to the editing widget and the tree panel
pub struct DecorationController {
    range_class: String,
    node_class: String,
    range: Option<(TextRange, Box<dyn DecorationHandle>)>,
    node: Option<NodeId>,
}

impl DecorationController {
    pub fn new(range_class: impl Into<String>, node_class: impl Into<String>) -> Self {
        Self {
            range_class: range_class.into(),
            node_class: node_class.into(),
            range: None,
            node: None,
        }
    }

    /// Range currently decorated in the widget
    pub fn applied_range(&self) -> Option<TextRange> {
        self.range.as_ref().map(|(range, _)| *range)
    }

    /// Forget the panel mark after the markup it lived in was replaced
    pub fn markup_replaced(&mut self) {
        self.node = None;
    }

    /// Bring both views in line with `state`
    ///
    /// Each kind is swapped in a single step: the old decoration is cleared
    /// and the new one applied before control returns to the event loop.
    pub fn sync(
        &mut self,
        state: &HighlightState,
        widget: &mut dyn EditorWidget,
        panel: &mut dyn TreePanel,
    ) {
        if self.applied_range() != state.range() {
            if let Some((_, handle)) = self.range.take() {
                handle.clear();
            }
            if let Some(range) = state.range() {
                let handle = widget.apply_decoration(range, &self.range_class);
                widget.reveal_range(range);
                self.range = Some((range, handle));
            }
        }

        if self.node != state.node() {
            if let Some(old) = self.node.take() {
                panel.unmark_node(old, &self.node_class);
            }
            if let Some(node) = state.node() {
                panel.mark_node(node, &self.node_class);
                panel.scroll_to_node(node);
                self.node = Some(node);
            }
        }
    }
}
