/// A node in the owned document tree: an element or a text run.
#[derive(Debug, Clone)]
pub enum DomNode {
    Element(Element),
    Text(String),
}

impl DomNode {
    pub fn as_element(&self) -> Option<&Element> {
        match self {
            DomNode::Element(el) => Some(el),
            DomNode::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            DomNode::Element(el) => Some(el),
            DomNode::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            DomNode::Text(text) => Some(text),
            DomNode::Element(_) => None,
        }
    }
}

/// An element with its attributes and inline style.
///
/// The `style` attribute is kept parsed as an ordered declaration list so
/// individual properties can be set and removed without rewriting the rest;
/// it is re-serialized on output. All other attributes keep document order.
#[derive(Debug, Clone)]
pub struct Element {
    tag: String,
    attrs: Vec<(String, String)>,
    style: Vec<(String, String)>,
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            style: Vec::new(),
        }
    }

    /// Lower-cased tag name.
    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    pub fn set_attr(&mut self, name: &str, value: &str) {
        if let Some(entry) = self.attrs.iter_mut().find(|(n, _)| n == name) {
            entry.1 = value.to_string();
        } else {
            self.attrs.push((name.to_string(), value.to_string()));
        }
    }

    /// Removes an attribute; returns whether it was present.
    pub fn remove_attr(&mut self, name: &str) -> bool {
        let before = self.attrs.len();
        self.attrs.retain(|(n, _)| n != name);
        self.attrs.len() != before
    }

    pub fn attrs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attrs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    /// The raw `class` attribute value, or an empty string.
    pub fn class_attr(&self) -> &str {
        self.attr("class").unwrap_or_default()
    }

    /// The `id` attribute value, if any.
    pub fn id_attr(&self) -> Option<&str> {
        self.attr("id")
    }

    pub fn style_property(&self, name: &str) -> Option<&str> {
        self.style
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    pub fn set_style_property(&mut self, name: &str, value: &str) {
        if let Some(entry) = self
            .style
            .iter_mut()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
        {
            entry.1 = value.to_string();
        } else {
            self.style
                .push((name.to_ascii_lowercase(), value.to_string()));
        }
    }

    /// Deletes the declaration entirely (there is no "prior value" memory).
    pub fn remove_style_property(&mut self, name: &str) -> bool {
        let before = self.style.len();
        self.style.retain(|(n, _)| !n.eq_ignore_ascii_case(name));
        self.style.len() != before
    }

    /// Re-serialized `style` attribute text, empty when no declarations.
    pub fn style_css_text(&self) -> String {
        self.style
            .iter()
            .map(|(n, v)| format!("{}: {}", n, v))
            .collect::<Vec<_>>()
            .join("; ")
    }

    pub(crate) fn set_style_from_css_text(&mut self, css: &str) {
        for declaration in css.split(';') {
            let Some((name, value)) = declaration.split_once(':') else {
                continue;
            };
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                continue;
            }
            self.set_style_property(name, value);
        }
    }

    pub(crate) fn push_attr(&mut self, name: &str, value: &str) {
        self.attrs.push((name.to_string(), value.to_string()));
    }
}
