//! Target selection: which ancestor to style, and which elements to leave
//! alone no matter what their text says.

use harf_dom::{measured_width, Document, NodeId};
use tracing::debug;

/// How far above the matching element the climb may go.
const MAX_CLIMB_LEVELS: usize = 3;

/// Tags that end the climb: chrome and page scaffolding must not inherit
/// directional styling from content below them.
const STRUCTURAL_TAGS: &[&str] = &["nav", "header", "footer", "body", "html"];

/// Class substrings with the same effect as a structural tag.
const STRUCTURAL_CLASSES: &[&str] = &["navbar", "header", "footer", "menu", "toolbar"];

/// Containers preferred over the matching element itself.
const CONTENT_CONTAINERS: &[&str] = &["div", "section", "article", "main", "p"];

/// Substrings (in tag, class or id) marking UI controls.
const UI_KEYWORDS: &[&str] = &["button", "btn", "menu", "nav", "toolbar", "icon", "control"];

/// Elements wider than this fraction of the viewport are treated as layout
/// wrappers and skipped.
const MAX_WIDTH_VIEWPORT_FRACTION: f64 = 0.8;

/// Picks the element that should actually receive directional styling for a
/// candidate containing RTL text.
///
/// Climbs up to three parent levels. A structural parent (tag or class)
/// stops the climb before it is considered; a preferred content container
/// becomes the new best target and the climb continues, so the highest
/// qualifying ancestor within the window wins. Any DOM failure aborts the
/// walk and returns the candidate itself.
pub fn find_styling_target(doc: &Document, candidate: NodeId) -> NodeId {
    let mut best = candidate;
    let mut current = candidate;
    for _ in 0..MAX_CLIMB_LEVELS {
        let Some(parent) = doc.parent_element(current) else {
            break;
        };
        let parent_el = match doc.element(parent) {
            Ok(el) => el,
            Err(error) => {
                debug!(%error, "ancestor walk aborted");
                return candidate;
            }
        };
        let tag = parent_el.tag();
        let class = parent_el.class_attr().to_lowercase();
        if STRUCTURAL_TAGS.contains(&tag)
            || STRUCTURAL_CLASSES.iter().any(|cls| class.contains(cls))
        {
            break;
        }
        if CONTENT_CONTAINERS.contains(&tag) {
            best = parent;
        }
        current = parent;
    }
    best
}

/// Whether a chosen target must be skipped: UI controls by keyword, layout
/// wrappers by width. Measurement failure counts as "avoid".
pub fn should_avoid(doc: &Document, target: NodeId) -> bool {
    let el = match doc.element(target) {
        Ok(el) => el,
        Err(error) => {
            debug!(%error, "unreadable target treated as avoided");
            return true;
        }
    };
    let tag = el.tag().to_string();
    let class = el.class_attr().to_lowercase();
    let id = el.id_attr().unwrap_or_default().to_lowercase();
    if UI_KEYWORDS
        .iter()
        .any(|kw| tag.contains(kw) || class.contains(kw) || id.contains(kw))
    {
        return true;
    }
    match measured_width(doc, target) {
        Ok(width) => width > doc.viewport().width * MAX_WIDTH_VIEWPORT_FRACTION,
        Err(error) => {
            debug!(%error, "unmeasurable target treated as avoided");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use harf_dom::Viewport;

    fn doc(page: &str) -> Document {
        Document::parse(page, Viewport { width: 1000.0 })
    }

    fn first(doc: &Document, tag: &str) -> NodeId {
        doc.select_tags(&[tag])[0]
    }

    #[test]
    fn climbs_to_the_highest_content_container_in_the_window() {
        let doc = doc(
            "<body><article><div><span id=\"hit\">متن عربي طويل</span></div></article></body>",
        );
        let span = first(&doc, "span");
        let target = find_styling_target(&doc, span);
        // div (level 1) and article (level 2) both qualify; article wins.
        assert_eq!(doc.element(target).expect("el").tag(), "article");
    }

    #[test]
    fn climb_stops_at_structural_tags() {
        let doc = doc("<body><nav><div class=\"x\">متن عربي طويل</div></nav></body>");
        let div = first(&doc, "div");
        let target = find_styling_target(&doc, div);
        assert_eq!(target, div, "nav must never be climbed into");
    }

    #[test]
    fn climb_stops_at_structural_classes() {
        let doc = doc(
            "<body><div class=\"page\"><div class=\"site-toolbar\"><p>نص</p></div></div></body>",
        );
        let p = first(&doc, "p");
        let target = find_styling_target(&doc, p);
        assert_eq!(target, p, "a toolbar-classed parent ends the climb");
    }

    #[test]
    fn non_qualifying_tags_are_climbed_through() {
        let doc = doc("<body><div id=\"outer\"><ul><li><span>نص</span></li></ul></div></body>");
        let span = first(&doc, "span");
        let target = find_styling_target(&doc, span);
        // li and ul do not qualify but do not stop the climb; the div is
        // level 3 and qualifies.
        assert_eq!(doc.element(target).expect("el").id_attr(), Some("outer"));
    }

    #[test]
    fn window_is_limited_to_three_levels() {
        let doc = doc(
            "<body><div id=\"far\"><blockquote><ul><li><span>نص</span></li></ul></blockquote></div></body>",
        );
        let span = first(&doc, "span");
        let target = find_styling_target(&doc, span);
        // li, ul, blockquote exhaust the window before the div is reached.
        assert_eq!(target, span);
    }

    #[test]
    fn ui_keywords_are_avoided_in_class_and_id() {
        let doc = doc(
            "<body><div class=\"nav-menu\" style=\"width: 100px\">نص</div>\
             <div id=\"icon-box\" style=\"width: 100px\">نص</div>\
             <div class=\"content\" style=\"width: 100px\">نص</div></body>",
        );
        let divs = doc.select_tags(&["div"]);
        assert!(should_avoid(&doc, divs[0]));
        assert!(should_avoid(&doc, divs[1]));
        assert!(!should_avoid(&doc, divs[2]));
    }

    #[test]
    fn keyword_match_is_case_insensitive() {
        let doc = doc("<body><div class=\"NavBar-Menu\" style=\"width: 10px\">نص</div></body>");
        assert!(should_avoid(&doc, first(&doc, "div")));
    }

    #[test]
    fn oversized_elements_are_avoided() {
        let doc = doc(
            "<body><div style=\"width: 900px\">نص</div>\
             <div style=\"width: 700px\">نص</div></body>",
        );
        let divs = doc.select_tags(&["div"]);
        assert!(should_avoid(&doc, divs[0]), "900 > 80% of 1000");
        assert!(!should_avoid(&doc, divs[1]));
    }
}
