//! CST rendering client
//!
//! The parser/renderer is an external collaborator reached through the
//! narrow [`CstRenderer`] interface. Rendering runs on a dedicated worker
//! thread; results come back to the app channel tagged with the document
//! revision they were requested for.
//!
//! ## Architecture
//!
//! ```text
//! Content change → Cmd::DebouncedRender → (debounce timer)
//!                → Msg::Render(Ready) → Cmd::RunRender
//!                → (worker thread) → Msg::Render(Completed) → Cmd::ReplaceMarkup
//! ```

mod markup;
mod python;
mod worker;

use std::fmt;

pub use markup::{escape_html, MarkupBuilder};
pub use python::TreeSitterRenderer;
pub use worker::{RenderJob, RenderWorker};

use crate::model::Position;
use crate::translator::{NodeId, NodeLookup};

/// Markup plus the lookup established by the same render pass
#[derive(Debug, Clone)]
pub struct RenderOutput {
    pub markup: String,
    pub lookup: NodeLookup,
}

/// Why a render produced no usable output
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// The source text does not parse
    Parse {
        message: String,
        position: Option<Position>,
    },
    /// The renderer itself failed (could not start, produced nothing)
    Backend(String),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderError::Parse {
                message,
                position: Some(position),
            } => write!(f, "Parse error at {}: {}", position, message),
            RenderError::Parse {
                message,
                position: None,
            } => write!(f, "Parse error: {}", message),
            RenderError::Backend(message) => write!(f, "Renderer failed: {}", message),
        }
    }
}

impl std::error::Error for RenderError {}

/// External parser/renderer
pub trait CstRenderer: Send {
    /// Parse `source` and render its CST
    fn render(&mut self, source: &str) -> Result<RenderOutput, RenderError>;

    /// Node at a 1-indexed position in the last successful render
    ///
    /// Part of the renderer contract for hosts that query it directly. The
    /// update loop resolves positions against the session's own
    /// [`NodeLookup`](crate::translator::NodeLookup) instead, which is
    /// swapped in one piece with the markup that produced it.
    fn locate(&self, line: usize, column: usize) -> Option<NodeId>;
}
