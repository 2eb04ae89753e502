use ego_tree::{NodeId, NodeRef, Tree};
use tracing::debug;

use crate::html;
use crate::metrics::Viewport;
use crate::node::{DomNode, Element};
use crate::DomError;

/// Tags serialized without a closing tag.
const VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

/// An owned page document.
///
/// Node identity is stable for the lifetime of the document: `NodeId`s stay
/// valid across attribute and style mutation and across fragment insertion,
/// which is what lets callers memoize per-node decisions.
pub struct Document {
    pub(crate) tree: Tree<DomNode>,
    viewport: Viewport,
}

impl Document {
    /// Parses a full HTML page. Head content, scripts, styles and comments
    /// are dropped; the `html`/`body` ancestry is kept so ancestor walks can
    /// terminate on structural tags.
    pub fn parse(page: &str, viewport: Viewport) -> Self {
        let tree = html::build_document_tree(page);
        Self { tree, viewport }
    }

    pub fn root(&self) -> NodeId {
        self.tree.root().id()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub(crate) fn node_ref(&self, id: NodeId) -> Option<NodeRef<'_, DomNode>> {
        self.tree.get(id)
    }

    pub fn element(&self, id: NodeId) -> Result<&Element, DomError> {
        self.tree
            .get(id)
            .ok_or(DomError::Detached)?
            .value()
            .as_element()
            .ok_or(DomError::NotAnElement)
    }

    fn with_element_mut<R>(
        &mut self,
        id: NodeId,
        apply: impl FnOnce(&mut Element) -> R,
    ) -> Result<R, DomError> {
        let mut node = self.tree.get_mut(id).ok_or(DomError::Detached)?;
        match node.value() {
            DomNode::Element(el) => Ok(apply(el)),
            DomNode::Text(_) => Err(DomError::NotAnElement),
        }
    }

    /// Attribute value, or `None` for missing attributes and non-elements.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).ok().and_then(|el| el.attr(name))
    }

    pub fn set_attr(&mut self, id: NodeId, name: &str, value: &str) -> Result<(), DomError> {
        self.with_element_mut(id, |el| el.set_attr(name, value))
    }

    pub fn remove_attr(&mut self, id: NodeId, name: &str) -> Result<bool, DomError> {
        self.with_element_mut(id, |el| el.remove_attr(name))
    }

    pub fn set_style_property(
        &mut self,
        id: NodeId,
        name: &str,
        value: &str,
    ) -> Result<(), DomError> {
        self.with_element_mut(id, |el| el.set_style_property(name, value))
    }

    pub fn remove_style_property(&mut self, id: NodeId, name: &str) -> Result<bool, DomError> {
        self.with_element_mut(id, |el| el.remove_style_property(name))
    }

    /// Nearest ancestor that is an element.
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        let mut current = self.tree.get(id)?.parent();
        while let Some(node) = current {
            if node.value().as_element().is_some() {
                return Some(node.id());
            }
            current = node.parent();
        }
        None
    }

    /// All elements in document order whose tag is in `tags`.
    pub fn select_tags(&self, tags: &[&str]) -> Vec<NodeId> {
        self.collect_elements(self.tree.root(), false, |el| tags.contains(&el.tag()))
    }

    /// Elements under `scope` (excluding `scope` itself) whose tag is in `tags`.
    pub fn select_tags_within(&self, scope: NodeId, tags: &[&str]) -> Vec<NodeId> {
        match self.tree.get(scope) {
            Some(node) => self.collect_elements(node, true, |el| tags.contains(&el.tag())),
            None => {
                debug!("select on detached node ignored");
                Vec::new()
            }
        }
    }

    /// All elements carrying the given attribute, in document order.
    pub fn elements_with_attr(&self, name: &str) -> Vec<NodeId> {
        self.collect_elements(self.tree.root(), false, |el| el.attr(name).is_some())
    }

    fn collect_elements(
        &self,
        scope: NodeRef<'_, DomNode>,
        skip_scope: bool,
        keep: impl Fn(&Element) -> bool,
    ) -> Vec<NodeId> {
        scope
            .descendants()
            .skip(usize::from(skip_scope))
            .filter_map(|node| {
                let el = node.value().as_element()?;
                keep(el).then(|| node.id())
            })
            .collect()
    }

    /// Concatenated descendant text, in document order. This is the rendered
    /// text content, not markup.
    pub fn text_content(&self, id: NodeId) -> Result<String, DomError> {
        let node = self.tree.get(id).ok_or(DomError::Detached)?;
        let mut out = String::new();
        for descendant in node.descendants() {
            if let DomNode::Text(text) = descendant.value() {
                out.push_str(text);
            }
        }
        Ok(out)
    }

    /// Parses `fragment` and appends its nodes under `parent`. Returns the
    /// ids of the top-level *element* nodes that were inserted; these are
    /// what a mutation observer would report as added nodes.
    pub fn insert_html(&mut self, parent: NodeId, fragment: &str) -> Result<Vec<NodeId>, DomError> {
        self.element(parent)?;
        html::append_fragment(&mut self.tree, parent, fragment)
    }

    /// Serializes the document back to HTML.
    pub fn to_html(&self) -> String {
        let mut out = String::new();
        write_node(&mut out, self.tree.root());
        out
    }
}

fn write_node(out: &mut String, node: NodeRef<'_, DomNode>) {
    match node.value() {
        DomNode::Text(text) => out.push_str(&escape_text(text)),
        DomNode::Element(el) => {
            out.push('<');
            out.push_str(el.tag());
            for (name, value) in el.attrs() {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                out.push_str(&escape_attr(value));
                out.push('"');
            }
            let style = el.style_css_text();
            if !style.is_empty() {
                out.push_str(" style=\"");
                out.push_str(&escape_attr(&style));
                out.push('"');
            }
            out.push('>');
            if VOID_TAGS.contains(&el.tag()) {
                return;
            }
            for child in node.children() {
                write_node(out, child);
            }
            out.push_str("</");
            out.push_str(el.tag());
            out.push('>');
        }
    }
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(page: &str) -> Document {
        Document::parse(page, Viewport::default())
    }

    #[test]
    fn parse_keeps_body_ancestry_and_drops_head() {
        let doc = doc("<html><head><title>t</title></head><body><p>hello</p></body></html>");
        let paragraphs = doc.select_tags(&["p"]);
        assert_eq!(paragraphs.len(), 1);
        let body = doc.parent_element(paragraphs[0]).expect("body parent");
        assert_eq!(doc.element(body).expect("element").tag(), "body");
        assert!(doc.select_tags(&["title"]).is_empty());
    }

    #[test]
    fn text_content_concatenates_descendants() {
        let doc = doc("<div><span>one </span><p>two</p></div>");
        let div = doc.select_tags(&["div"])[0];
        assert_eq!(doc.text_content(div).expect("text"), "one two");
    }

    #[test]
    fn attributes_and_styles_survive_mutation_and_serialization() {
        let mut doc = doc("<div class=\"x\">نص</div>");
        let div = doc.select_tags(&["div"])[0];
        doc.set_attr(div, "data-rtl-applied", "true").expect("set");
        doc.set_style_property(div, "direction", "rtl").expect("set");
        assert_eq!(doc.attr(div, "data-rtl-applied"), Some("true"));
        let html = doc.to_html();
        assert!(html.contains("data-rtl-applied=\"true\""));
        assert!(html.contains("direction: rtl"));
        assert!(doc.remove_attr(div, "data-rtl-applied").expect("remove"));
        assert!(doc.remove_style_property(div, "direction").expect("remove"));
        assert!(!doc.to_html().contains("direction"));
    }

    #[test]
    fn insert_html_reports_top_level_elements() {
        let mut doc = doc("<body><div id=\"feed\"></div></body>");
        let feed = doc.select_tags(&["div"])[0];
        let inserted = doc
            .insert_html(feed, "<div><span>text</span></div><p>more</p>")
            .expect("insert");
        assert_eq!(inserted.len(), 2);
        assert_eq!(doc.element(inserted[0]).expect("el").tag(), "div");
        assert_eq!(doc.element(inserted[1]).expect("el").tag(), "p");
        // inserted subtree is reachable through normal queries
        assert_eq!(doc.select_tags_within(feed, &["span"]).len(), 1);
    }

    #[test]
    fn select_tags_within_excludes_the_scope_itself() {
        let doc = doc("<div><div><p>x</p></div></div>");
        let outer = doc.select_tags(&["div"])[0];
        let inner = doc.select_tags_within(outer, &["div"]);
        assert_eq!(inner.len(), 1);
        assert_ne!(inner[0], outer);
    }

    #[test]
    fn inline_style_attribute_is_parsed_on_load() {
        let doc = doc("<div style=\"width: 40px; color: red\">x</div>");
        let div = doc.select_tags(&["div"])[0];
        let el = doc.element(div).expect("element");
        assert_eq!(el.style_property("width"), Some("40px"));
        assert_eq!(el.style_property("color"), Some("red"));
    }
}
