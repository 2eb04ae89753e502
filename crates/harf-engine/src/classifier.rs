//! Script-range text classification.

use harf_dom::{Document, NodeId};
use tracing::debug;

/// Code point ranges treated as RTL script: Arabic, Arabic Supplement,
/// Arabic Extended-A, and both Arabic Presentation Forms blocks.
const RTL_RANGES: &[(u32, u32)] = &[
    (0x0600, 0x06FF),
    (0x0750, 0x077F),
    (0x08A0, 0x08FF),
    (0xFB50, 0xFDFF),
    (0xFE70, 0xFEFF),
];

/// Minimum trimmed length before an element is treated as RTL content.
/// Guards against icons, single glyphs and whitespace-only nodes.
pub const MIN_RTL_TEXT_LEN: usize = 5;

/// True iff the string contains at least one code point in an RTL range.
pub fn has_rtl_text(text: &str) -> bool {
    text.chars().any(|c| {
        let cp = c as u32;
        RTL_RANGES.iter().any(|&(lo, hi)| cp >= lo && cp <= hi)
    })
}

/// Whether an element's rendered text qualifies it as RTL content.
/// Any failure reading the text is treated as "not RTL".
pub fn contains_rtl_text(doc: &Document, id: NodeId) -> bool {
    let text = match doc.text_content(id) {
        Ok(text) => text,
        Err(error) => {
            debug!(%error, "could not read element text");
            return false;
        }
    };
    has_rtl_text(&text) && text.trim().chars().count() >= MIN_RTL_TEXT_LEN
}

#[cfg(test)]
mod tests {
    use super::*;
    use harf_dom::Viewport;

    #[test]
    fn detects_arabic_ranges() {
        assert!(has_rtl_text("مرحبا"));
        assert!(has_rtl_text("latin ﷽ mixed"));
        // Presentation forms
        assert!(has_rtl_text("\u{FB50}"));
        assert!(has_rtl_text("\u{FE70}"));
        // Extended-A and Supplement
        assert!(has_rtl_text("\u{08A0}"));
        assert!(has_rtl_text("\u{0750}"));
    }

    #[test]
    fn rejects_non_rtl_text() {
        assert!(!has_rtl_text(""));
        assert!(!has_rtl_text("plain latin text"));
        assert!(!has_rtl_text("數字和漢字"));
        // Just outside the Arabic block on both sides
        assert!(!has_rtl_text("\u{05FF}\u{0700}"));
    }

    #[test]
    fn element_test_enforces_minimum_length() {
        let doc = Document::parse(
            "<body><p id=\"short\">هل</p><p id=\"long\">مرحبا بكم</p></body>",
            Viewport::default(),
        );
        let paragraphs = doc.select_tags(&["p"]);
        assert_eq!(paragraphs.len(), 2);
        assert!(!contains_rtl_text(&doc, paragraphs[0]), "2 chars is below the minimum");
        assert!(contains_rtl_text(&doc, paragraphs[1]), "9 chars qualifies");
    }

    #[test]
    fn element_test_uses_descendant_text() {
        let doc = Document::parse(
            "<body><div><span>مر</span><span>حبا بكم</span></div></body>",
            Viewport::default(),
        );
        let div = doc.select_tags(&["div"])[0];
        assert!(contains_rtl_text(&doc, div));
    }

    #[test]
    fn whitespace_padding_does_not_satisfy_the_minimum() {
        let doc = Document::parse("<body><p>   هل   </p></body>", Viewport::default());
        let p = doc.select_tags(&["p"])[0];
        assert!(!contains_rtl_text(&doc, p));
    }
}
