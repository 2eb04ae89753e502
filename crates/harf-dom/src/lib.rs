//! Owned, mutable HTML document model.
//!
//! Pages are parsed with `scraper` and re-owned into an `ego_tree::Tree` so
//! the engine can stamp attributes and inline styles, append dynamically
//! inserted fragments, and measure element widths against a viewport —
//! the operations a content script would perform against the live DOM.

mod document;
mod html;
mod metrics;
mod node;

pub use document::Document;
pub use ego_tree::NodeId;
pub use metrics::{Viewport, measured_width};
pub use node::{DomNode, Element};

use thiserror::Error;

/// Failures raised by document access. The engine treats every one of these
/// as "skip this element"; none of them escape a public engine entry point.
#[derive(Debug, Error)]
pub enum DomError {
    #[error("node is not part of this document")]
    Detached,
    #[error("node is not an element")]
    NotAnElement,
    #[error("failed to parse HTML: {0}")]
    Parse(String),
    #[error("element width cannot be measured")]
    Unmeasurable,
}
