//! Translation from `scraper`'s parsed tree into the owned document tree.
//!
//! `scraper` (html5ever underneath) is only used at the parse boundary; the
//! rest of the crate works on the owned `ego_tree::Tree<DomNode>` so nodes
//! can be mutated and appended without re-parsing.

use ego_tree::{NodeId, NodeRef, Tree};
use scraper::{Html, Node};
use tracing::debug;

use crate::node::{DomNode, Element};
use crate::DomError;

/// Non-content subtrees skipped entirely during translation.
const SKIPPED_TAGS: &[&str] = &["head", "script", "style", "template", "noscript"];

/// Builds the owned tree for a full page. The root is always an `html`
/// element; html5ever guarantees an `html`/`body` scaffold for documents,
/// and fragment-shaped input is placed under a synthetic root.
pub(crate) fn build_document_tree(page: &str) -> Tree<DomNode> {
    let parsed = Html::parse_document(page);
    let source_root = parsed.tree.root();
    let html_el = source_root
        .children()
        .find(|child| matches!(child.value().as_element(), Some(el) if el.name() == "html"));

    let root_value = match html_el.and_then(|node| node.value().as_element()) {
        Some(el) => translate_element(el),
        None => Element::new("html"),
    };
    let mut tree = Tree::new(DomNode::Element(root_value));
    let root_id = tree.root().id();

    let children: Vec<NodeRef<'_, Node>> = match html_el {
        Some(node) => node.children().collect(),
        None => source_root.children().collect(),
    };
    for child in children {
        append_scraper_subtree(&mut tree, root_id, child);
    }
    tree
}

/// Parses `fragment` and appends its nodes under `parent`. Returns the ids
/// of top-level inserted elements (text runs are appended but not reported).
pub(crate) fn append_fragment(
    tree: &mut Tree<DomNode>,
    parent: NodeId,
    fragment: &str,
) -> Result<Vec<NodeId>, DomError> {
    let parsed = Html::parse_fragment(fragment);
    let root = parsed.tree.root();
    // Depending on the fragment parser version the content sits either
    // directly under the root or under an extra `html` wrapper.
    let only_child = (root.children().count() == 1)
        .then(|| root.children().next())
        .flatten()
        .filter(|node| matches!(node.value().as_element(), Some(el) if el.name() == "html"));
    let content: Vec<NodeRef<'_, Node>> = match only_child {
        Some(wrapper) => wrapper.children().collect(),
        None => root.children().collect(),
    };

    let mut inserted = Vec::new();
    for node in content {
        let is_element = node.value().is_element();
        if let Some(id) = append_scraper_subtree(tree, parent, node) {
            if is_element {
                inserted.push(id);
            }
        }
    }
    Ok(inserted)
}

/// Appends one source node (and its subtree) under `parent`; returns the new
/// id, or `None` when the node was skipped (comments, doctypes, scripts...).
fn append_scraper_subtree(
    tree: &mut Tree<DomNode>,
    parent: NodeId,
    source: NodeRef<'_, Node>,
) -> Option<NodeId> {
    let value = match source.value() {
        Node::Text(text) => DomNode::Text(text.text.to_string()),
        Node::Element(el) => {
            if SKIPPED_TAGS.contains(&el.name()) {
                debug!(tag = el.name(), "skipping non-content subtree");
                return None;
            }
            DomNode::Element(translate_element(el))
        }
        _ => return None,
    };

    let is_element = matches!(value, DomNode::Element(_));
    let new_id = tree.get_mut(parent)?.append(value).id();
    if is_element {
        for child in source.children() {
            append_scraper_subtree(tree, new_id, child);
        }
    }
    Some(new_id)
}

fn translate_element(source: &scraper::node::Element) -> Element {
    let mut el = Element::new(source.name());
    for (name, value) in source.attrs() {
        if name.eq_ignore_ascii_case("style") {
            el.set_style_from_css_text(value);
        } else {
            el.push_attr(name, value);
        }
    }
    el
}
