//! Python CST renderer backed by tree-sitter
//!
//! Parses the whole buffer on every call. Nodes are numbered in pre-order,
//! anonymous tokens included, so the rendered tree keeps every piece of
//! concrete syntax. The text between tokens is emitted as trivia, so the
//! panel reads back as the exact source.

use tree_sitter::{Node, Parser, Tree};

use super::{CstRenderer, MarkupBuilder, RenderError, RenderOutput};
use crate::model::{Position, TextRange};
use crate::translator::{NodeEntry, NodeId, NodeLookup};

/// Byte offsets at which each line of a source text starts
struct LineIndex<'a> {
    source: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(source: &'a str) -> Self {
        let mut starts = vec![0];
        starts.extend(source.match_indices('\n').map(|(i, _)| i + 1));
        Self { source, starts }
    }

    /// 1-indexed char position of a byte offset
    fn position(&self, byte: usize) -> Position {
        // starts[0] == 0, so the partition point is at least 1
        let line = self.starts.partition_point(|&start| start <= byte) - 1;
        let line_start = self.starts[line];
        let column = self
            .source
            .get(line_start..byte)
            .map(|prefix| prefix.chars().count())
            .unwrap_or(byte - line_start);
        Position::new(line + 1, column + 1)
    }

    fn range(&self, start: usize, end: usize) -> TextRange {
        TextRange::new(self.position(start), self.position(end))
    }
}

/// A node in pre-order with the bytes it covers in the lookup
struct Visit<'t> {
    node: Node<'t>,
    depth: usize,
    parent: Option<usize>,
    start: usize,
    end: usize,
}

fn is_blank(source: &str, start: usize, end: usize) -> bool {
    source
        .get(start..end)
        .is_some_and(|gap| gap.chars().all(char::is_whitespace))
}

/// Pre-order visits with extents trimmed to the tokens they contain
///
/// tree-sitter lets the module node run to EOF, so trailing blank lines
/// would otherwise resolve to it. A node loses whitespace that lies outside
/// its first and last child; other uncovered text is kept.
fn collect_visits<'t>(tree: &'t Tree, source: &str) -> Vec<Visit<'t>> {
    let mut visits: Vec<Visit<'t>> = Vec::new();
    let mut path: Vec<usize> = Vec::new();
    let mut cursor = tree.walk();
    let mut depth = 0usize;

    'walk: loop {
        let node = cursor.node();
        path.truncate(depth);
        visits.push(Visit {
            node,
            depth,
            parent: path.last().copied(),
            start: node.start_byte(),
            end: node.end_byte(),
        });
        path.push(visits.len() - 1);

        if cursor.goto_first_child() {
            depth += 1;
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                continue 'walk;
            }
            if !cursor.goto_parent() {
                break 'walk;
            }
            depth -= 1;
        }
    }

    // Descendants come after their ancestors, so walking backwards sees
    // every child extent before the parent is trimmed
    let mut children: Vec<Option<(usize, usize)>> = vec![None; visits.len()];
    for i in (0..visits.len()).rev() {
        if let Some((first, last)) = children[i] {
            let visit = &mut visits[i];
            if is_blank(source, visit.start, first) {
                visit.start = first;
            }
            if is_blank(source, last, visit.end) {
                visit.end = last;
            }
        }
        let visit = &visits[i];
        if visit.end <= visit.start {
            continue;
        }
        if let Some(parent) = visit.parent {
            let span = children[parent].get_or_insert((visit.start, visit.end));
            span.0 = span.0.min(visit.start);
            span.1 = span.1.max(visit.end);
        }
    }
    visits
}

/// Highlight class of a leaf token
fn token_class(node: &Node<'_>) -> &'static str {
    match node.kind() {
        "comment" => "comment",
        "identifier" => "name",
        "integer" | "float" => "number",
        "true" | "false" | "none" => "constant",
        "string_start" | "string_content" | "string_end" | "escape_sequence" => "string",
        kind if !node.is_named() && kind.chars().all(|c| c.is_ascii_alphabetic()) => "keyword",
        _ if !node.is_named() => "punctuation",
        _ => "text",
    }
}

/// Renders Python source into HTML CST markup
pub struct TreeSitterRenderer {
    parser: Parser,
    last_lookup: Option<NodeLookup>,
}

impl TreeSitterRenderer {
    pub fn new() -> Result<Self, RenderError> {
        let mut parser = Parser::new();
        parser
            .set_language(&tree_sitter_python::LANGUAGE.into())
            .map_err(|e| RenderError::Backend(format!("Failed to load Python grammar: {}", e)))?;
        Ok(Self {
            parser,
            last_lookup: None,
        })
    }

    fn parse(&mut self, source: &str) -> Result<Tree, RenderError> {
        self.parser
            .parse(source, None)
            .ok_or_else(|| RenderError::Backend("Parser returned no tree".to_string()))
    }
}

impl CstRenderer for TreeSitterRenderer {
    fn render(&mut self, source: &str) -> Result<RenderOutput, RenderError> {
        let tree = self.parse(source)?;
        let lines = LineIndex::new(source);

        let mut builder = MarkupBuilder::new();
        let mut entries = Vec::new();
        let mut first_error: Option<(Position, String)> = None;
        let mut open = 0usize;
        // Source up to here has been written into the markup
        let mut written = 0usize;

        for (index, visit) in collect_visits(&tree, source).iter().enumerate() {
            let node = &visit.node;
            let id = NodeId(index as u32);
            let range = lines.range(visit.start, visit.end);

            if first_error.is_none() && (node.is_error() || node.is_missing()) {
                let message = if node.is_missing() {
                    format!("missing {}", node.kind())
                } else {
                    "unexpected input".to_string()
                };
                first_error = Some((range.start, message));
            }

            while open > visit.depth {
                builder.close();
                open -= 1;
            }

            let is_leaf = node.child_count() == 0;
            if is_leaf && node.start_byte() >= written {
                builder.trivia(source.get(written..node.start_byte()).unwrap_or_default());
            }
            builder.open(id, node.kind(), range);
            open += 1;
            if is_leaf && node.start_byte() >= written {
                builder.text(
                    source.get(node.byte_range()).unwrap_or_default(),
                    token_class(node),
                );
                written = node.end_byte();
            }

            entries.push(NodeEntry {
                id,
                kind: node.kind().to_string(),
                range,
                depth: visit.depth,
            });
        }

        if tree.root_node().has_error() {
            let (position, message) = first_error
                .map(|(p, m)| (Some(p), m))
                .unwrap_or((None, "invalid syntax".to_string()));
            tracing::debug!("Rejecting unparseable source: {} at {:?}", message, position);
            return Err(RenderError::Parse { message, position });
        }

        while open > 0 {
            builder.close();
            open -= 1;
        }
        builder.trivia(source.get(written..).unwrap_or_default());

        let lookup = NodeLookup::new(entries);
        tracing::debug!(
            "Rendered {} CST nodes from {} bytes",
            lookup.len(),
            source.len()
        );
        self.last_lookup = Some(lookup.clone());
        Ok(RenderOutput {
            markup: builder.finish(),
            lookup,
        })
    }

    fn locate(&self, line: usize, column: usize) -> Option<NodeId> {
        self.last_lookup
            .as_ref()?
            .node_at(Position::new(line, column))
    }
}
