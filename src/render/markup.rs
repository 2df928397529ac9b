//! HTML markup for a rendered CST
//!
//! Every node becomes a `div` whose `id` is the node's element id, which is
//! what makes tree clicks resolvable back to text ranges. Token text and the
//! trivia between tokens are `cst-text` elements; read in document order
//! they spell out the rendered source.

use crate::model::TextRange;
use crate::translator::NodeId;

/// Escape text for use in HTML element content and attribute values
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Incremental writer for nested node markup
pub struct MarkupBuilder {
    out: String,
    open: usize,
}

impl MarkupBuilder {
    pub fn new() -> Self {
        Self {
            out: String::from("<div class=\"cst-tree\">"),
            open: 0,
        }
    }

    /// Open a node element; must be balanced by [`close`](Self::close)
    pub fn open(&mut self, id: NodeId, kind: &str, range: TextRange) {
        self.out.push_str(&format!(
            "<div class=\"cst-node\" id=\"{}\" data-range=\"{}\"><span class=\"cst-kind\">{}</span>",
            id.element_id(),
            range,
            escape_html(kind)
        ));
        self.open += 1;
    }

    /// Source text of a leaf node, tagged with its highlight class
    pub fn text(&mut self, text: &str, token_class: &str) {
        self.out.push_str(&format!(
            "<code class=\"cst-text tok-{}\">{}</code>",
            escape_html(token_class),
            escape_html(text)
        ));
    }

    /// Whitespace or other source text that belongs to no token
    pub fn trivia(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        self.out.push_str("<code class=\"cst-text cst-trivia\">");
        self.out.push_str(&escape_html(text));
        self.out.push_str("</code>");
    }

    pub fn close(&mut self) {
        if self.open > 0 {
            self.out.push_str("</div>");
            self.open -= 1;
        }
    }

    /// Close anything left open and return the markup
    pub fn finish(mut self) -> String {
        while self.open > 0 {
            self.close();
        }
        self.out.push_str("</div>");
        self.out
    }
}

impl Default for MarkupBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Concatenated `cst-text` content of rendered markup, unescaped
#[cfg(test)]
pub(crate) fn source_text(markup: &str) -> String {
    let mut text = String::new();
    let mut rest = markup;
    while let Some(at) = rest.find("<code class=\"cst-text") {
        rest = &rest[at..];
        let Some(open_end) = rest.find('>') else { break };
        rest = &rest[open_end + 1..];
        let Some(close) = rest.find("</code>") else { break };
        text.push_str(
            &rest[..close]
                .replace("&lt;", "<")
                .replace("&gt;", ">")
                .replace("&quot;", "\"")
                .replace("&#39;", "'")
                .replace("&amp;", "&"),
        );
        rest = &rest[close..];
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Position;

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"if a < b and c > "d" & 'e':"#),
            "if a &lt; b and c &gt; &quot;d&quot; &amp; &#39;e&#39;:"
        );
    }

    #[test]
    fn test_builder_nests_and_balances() {
        let range = TextRange::new(Position::new(1, 1), Position::new(1, 3));
        let mut builder = MarkupBuilder::new();
        builder.open(NodeId(0), "module", range);
        builder.open(NodeId(1), "integer", range);
        builder.text("42", "number");
        builder.close();
        let html = builder.finish();

        assert!(html.contains("id=\"cst-0\""));
        assert!(html.contains("id=\"cst-1\" data-range=\"1:1-1:3\""));
        assert!(html.contains("<code class=\"cst-text tok-number\">42</code>"));
        assert_eq!(html.matches("<div").count(), html.matches("</div>").count());
    }

    #[test]
    fn test_source_text_reads_tokens_and_trivia_in_order() {
        let range = TextRange::new(Position::new(1, 1), Position::new(1, 2));
        let mut builder = MarkupBuilder::new();
        builder.open(NodeId(0), "comparison", range);
        builder.text("a", "name");
        builder.trivia(" ");
        builder.text("<", "punctuation");
        builder.close();
        builder.trivia("\n");
        let html = builder.finish();

        assert_eq!(source_text(&html), "a <\n");
    }
}
