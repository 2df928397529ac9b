//! Position translation between buffer coordinates and CST node identities
//!
//! A [`NodeLookup`] is produced by one render pass and describes every
//! non-empty node of that pass. It is never edited after construction; a
//! completed render replaces it wholesale.

use std::collections::HashMap;
use std::fmt;

use crate::model::{Position, TextRange};

/// Prefix of the element id each rendered node carries in the markup
pub const ELEMENT_ID_PREFIX: &str = "cst-";

/// Identity assigned to a CST node by one render pass
///
/// Only unique within the pass that produced it. A later render may hand
/// the same number to a different node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Addressable element id used in the rendered markup (e.g. `cst-12`)
    pub fn element_id(&self) -> String {
        format!("{}{}", ELEMENT_ID_PREFIX, self.0)
    }

    /// Parse an element id back into a node identity
    pub fn from_element_id(element_id: &str) -> Option<Self> {
        element_id
            .strip_prefix(ELEMENT_ID_PREFIX)?
            .parse()
            .ok()
            .map(NodeId)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.element_id())
    }
}

/// One node of a rendered CST
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeEntry {
    pub id: NodeId,
    /// Grammar kind (e.g. `function_definition`)
    pub kind: String,
    pub range: TextRange,
    /// Distance from the root (root = 0)
    pub depth: usize,
}

/// Mapping Position → NodeId and NodeId → TextRange for one render
#[derive(Debug, Clone, Default)]
pub struct NodeLookup {
    entries: Vec<NodeEntry>,
    index: HashMap<NodeId, usize>,
}

impl NodeLookup {
    /// Build a lookup from rendered entries
    ///
    /// Zero-width entries are dropped: nothing can be positioned inside them.
    /// A repeated id keeps its first entry.
    pub fn new(entries: impl IntoIterator<Item = NodeEntry>) -> Self {
        let mut lookup = Self::default();
        for entry in entries {
            if entry.range.is_empty() || lookup.index.contains_key(&entry.id) {
                continue;
            }
            lookup.index.insert(entry.id, lookup.entries.len());
            lookup.entries.push(entry);
        }
        lookup
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[NodeEntry] {
        &self.entries
    }

    pub fn get(&self, id: NodeId) -> Option<&NodeEntry> {
        self.index.get(&id).map(|&idx| &self.entries[idx])
    }

    /// Innermost node containing `position`
    ///
    /// Ties on range go to the deeper node, so a single-child wrapper
    /// resolves to the child. Positions outside every node give `None`.
    pub fn node_at(&self, position: Position) -> Option<NodeId> {
        self.entries
            .iter()
            .filter(|e| e.range.contains(position))
            .min_by(|a, b| {
                b.range
                    .encloses(&a.range)
                    .cmp(&a.range.encloses(&b.range))
                    .reverse()
                    .then(b.depth.cmp(&a.depth))
            })
            .map(|e| e.id)
    }

    /// Text range covered by `id` in this render
    pub fn range_of(&self, id: NodeId) -> Option<TextRange> {
        self.get(id).map(|e| e.range)
    }

    /// Sorted, de-duplicated ranges covered by this render
    ///
    /// Two renders of the same text cover the same ranges even when their
    /// identities differ.
    pub fn covered_ranges(&self) -> Vec<TextRange> {
        let mut ranges: Vec<TextRange> = self.entries.iter().map(|e| e.range).collect();
        ranges.sort();
        ranges.dedup();
        ranges
    }
}
