//! Approximate width measurement.
//!
//! There is no layout engine here; widths are resolved from inline `width`
//! declarations and block/inline defaults, which is enough for the "does
//! this element span most of the viewport" safety test. The rules:
//!
//! - an explicit inline `width` in `px` wins;
//! - a `%` width resolves against the containing block;
//! - block-level tags with no explicit width fill their containing block;
//! - inline tags shrink to a content estimate, capped at the containing
//!   block. The containing block is the nearest ancestor with an explicit
//!   width, or the viewport.

use ego_tree::{NodeId, NodeRef};

use crate::document::Document;
use crate::node::DomNode;
use crate::DomError;

/// Nominal advance per character used for inline content estimates.
const GLYPH_ADVANCE_PX: f64 = 8.0;

const BLOCK_TAGS: &[&str] = &[
    "html",
    "body",
    "div",
    "p",
    "section",
    "article",
    "main",
    "aside",
    "header",
    "footer",
    "nav",
    "ul",
    "ol",
    "li",
    "table",
    "form",
    "blockquote",
    "pre",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
];

/// The page viewport the document is laid out against.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
}

impl Default for Viewport {
    fn default() -> Self {
        Self { width: 1280.0 }
    }
}

/// Rendered width of an element in pixels. Fails for detached nodes and
/// non-elements; callers decide how to degrade.
pub fn measured_width(doc: &Document, id: NodeId) -> Result<f64, DomError> {
    let node = doc.node_ref(id).ok_or(DomError::Detached)?;
    if node.value().as_element().is_none() {
        return Err(DomError::NotAnElement);
    }
    let width = resolve_width(doc, node);
    if width.is_finite() && width >= 0.0 {
        Ok(width)
    } else {
        Err(DomError::Unmeasurable)
    }
}

fn resolve_width(doc: &Document, node: NodeRef<'_, DomNode>) -> f64 {
    let Some(el) = node.value().as_element() else {
        return 0.0;
    };
    if let Some(width) = el.style_property("width") {
        if let Some(px) = parse_px(width) {
            return px;
        }
        if let Some(pct) = parse_percent(width) {
            return containing_block_width(doc, node) * pct / 100.0;
        }
    }
    let containing = containing_block_width(doc, node);
    if BLOCK_TAGS.contains(&el.tag()) {
        containing
    } else {
        let text_len = doc
            .text_content(node.id())
            .map(|text| text.trim().chars().count())
            .unwrap_or(0);
        (text_len as f64 * GLYPH_ADVANCE_PX).min(containing)
    }
}

/// Nearest ancestor with an explicit width, else the viewport.
fn containing_block_width(doc: &Document, node: NodeRef<'_, DomNode>) -> f64 {
    let mut current = node.parent();
    while let Some(ancestor) = current {
        if let Some(el) = ancestor.value().as_element() {
            if let Some(width) = el.style_property("width") {
                if let Some(px) = parse_px(width) {
                    return px;
                }
                if let Some(pct) = parse_percent(width) {
                    return containing_block_width(doc, ancestor) * pct / 100.0;
                }
            }
        }
        current = ancestor.parent();
    }
    doc.viewport().width
}

fn parse_px(value: &str) -> Option<f64> {
    value.trim().strip_suffix("px")?.trim().parse().ok()
}

fn parse_percent(value: &str) -> Option<f64> {
    value.trim().strip_suffix('%')?.trim().parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(page: &str) -> Document {
        Document::parse(page, Viewport { width: 1000.0 })
    }

    #[test]
    fn block_elements_fill_the_viewport_by_default() {
        let doc = doc("<body><div>متن</div></body>");
        let div = doc.select_tags(&["div"])[0];
        assert_eq!(measured_width(&doc, div).expect("width"), 1000.0);
    }

    #[test]
    fn explicit_pixel_width_wins() {
        let doc = doc("<body><div style=\"width: 300px\">x</div></body>");
        let div = doc.select_tags(&["div"])[0];
        assert_eq!(measured_width(&doc, div).expect("width"), 300.0);
    }

    #[test]
    fn percent_width_resolves_against_the_containing_block() {
        let doc = doc(
            "<body><div style=\"width: 500px\"><p style=\"width: 50%\">x</p></div></body>",
        );
        let p = doc.select_tags(&["p"])[0];
        assert_eq!(measured_width(&doc, p).expect("width"), 250.0);
    }

    #[test]
    fn inline_elements_shrink_to_content() {
        let doc = doc("<body><div><span>abcde</span></div></body>");
        let span = doc.select_tags(&["span"])[0];
        assert_eq!(measured_width(&doc, span).expect("width"), 40.0);
    }

    #[test]
    fn inline_content_estimate_is_capped_at_the_containing_block() {
        let long = "a".repeat(400);
        let page = format!("<body><div style=\"width: 200px\"><span>{long}</span></div></body>");
        let doc = Document::parse(&page, Viewport { width: 1000.0 });
        let span = doc.select_tags(&["span"])[0];
        assert_eq!(measured_width(&doc, span).expect("width"), 200.0);
    }
}
