//! Owned HTML element tree
//!
//! Renderers build [`Element`] values instead of splicing markup strings.
//! All text and attribute values are escaped when the tree is serialised,
//! so nothing in the data file can inject markup into the page. The one
//! exception is [`Node::Raw`], reserved for the page's own stylesheet and
//! bootstrap script.

use std::fmt::Write as _;

/// Elements that never have children or a closing tag.
const VOID_TAGS: &[&str] = &["area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "wbr"];

#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Element(Element),
    Text(String),
    /// Trusted markup emitted verbatim. Never built from page data.
    Raw(String),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    tag: String,
    /// `None` is a boolean attribute (`controls`, `data-reveal`).
    attrs: Vec<(String, Option<String>)>,
    children: Vec<Node>,
}

/// A mount point renderers append into.
///
/// Rendering is append-only: calling a renderer twice on the same container
/// duplicates its content.
pub trait Container {
    fn append(&mut self, element: Element);
}

impl Container for Element {
    fn append(&mut self, element: Element) {
        self.children.push(Node::Element(element));
    }
}

/// Bare list of top-level elements, handy when no parent node is needed.
impl Container for Vec<Element> {
    fn append(&mut self, element: Element) {
        self.push(element);
    }
}

impl Element {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    // -- builders ----------------------------------------------------------

    pub fn attr(mut self, name: &str, value: impl Into<String>) -> Self {
        self.set_attr(name, Some(value.into()));
        self
    }

    pub fn flag(mut self, name: &str) -> Self {
        self.set_attr(name, None);
        self
    }

    pub fn class(self, class: &str) -> Self {
        self.attr("class", class)
    }

    pub fn id(self, id: &str) -> Self {
        self.attr("id", id)
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.children.push(Node::Text(text.into()));
        self
    }

    pub fn raw(mut self, markup: impl Into<String>) -> Self {
        self.children.push(Node::Raw(markup.into()));
        self
    }

    pub fn child(mut self, element: Element) -> Self {
        self.children.push(Node::Element(element));
        self
    }

    pub fn children<I: IntoIterator<Item = Element>>(mut self, elements: I) -> Self {
        self.children.extend(elements.into_iter().map(Node::Element));
        self
    }

    fn set_attr(&mut self, name: &str, value: Option<String>) {
        match self.attrs.iter_mut().find(|(n, _)| n == name) {
            Some(existing) => existing.1 = value,
            None => self.attrs.push((name.to_string(), value)),
        }
    }

    // -- accessors ---------------------------------------------------------

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Attribute value; boolean attributes read as `Some("")`.
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_deref().unwrap_or(""))
    }

    pub fn has_attr(&self, name: &str) -> bool {
        self.attrs.iter().any(|(n, _)| n == name)
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.get_attr("class")
            .map(|c| c.split_whitespace().any(|c| c == class))
            .unwrap_or(false)
    }

    pub fn add_class(&mut self, class: &str) {
        if self.has_class(class) {
            return;
        }
        let joined = match self.get_attr("class") {
            Some(existing) if !existing.is_empty() => format!("{} {}", existing, class),
            _ => class.to_string(),
        };
        self.set_attr("class", Some(joined));
    }

    pub fn nodes(&self) -> &[Node] {
        &self.children
    }

    pub fn child_elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|n| match n {
            Node::Element(e) => Some(e),
            _ => None,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Concatenated text of this subtree, unescaped.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(self, &mut out);
        out
    }

    // -- queries -----------------------------------------------------------

    pub fn find_by_id(&self, id: &str) -> Option<&Element> {
        if self.get_attr("id") == Some(id) {
            return Some(self);
        }
        self.child_elements().find_map(|c| c.find_by_id(id))
    }

    pub fn find_by_id_mut(&mut self, id: &str) -> Option<&mut Element> {
        if self.get_attr("id") == Some(id) {
            return Some(self);
        }
        self.children.iter_mut().find_map(|n| match n {
            Node::Element(e) => e.find_by_id_mut(id),
            _ => None,
        })
    }

    /// Descendants (and self) carrying `name`, in document order.
    pub fn find_all_with_attr(&self, name: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        collect_matching(self, &|e| e.has_attr(name), &mut found);
        found
    }

    /// Descendants (and self) with the given tag, in document order.
    pub fn find_all(&self, tag: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        collect_matching(self, &|e| e.tag == tag, &mut found);
        found
    }

    // -- serialisation -----------------------------------------------------

    pub fn to_html(&self) -> String {
        let mut out = String::new();
        self.write_html(&mut out);
        out
    }

    pub fn write_html(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.tag);
        for (name, value) in &self.attrs {
            out.push(' ');
            out.push_str(name);
            if let Some(value) = value {
                let _ = write!(out, "=\"{}\"", escape_attr(value));
            }
        }
        out.push('>');

        if VOID_TAGS.contains(&self.tag.as_str()) {
            return;
        }

        for node in &self.children {
            match node {
                Node::Element(e) => e.write_html(out),
                Node::Text(t) => out.push_str(&escape_text(t)),
                Node::Raw(r) => out.push_str(r),
            }
        }

        out.push_str("</");
        out.push_str(&self.tag);
        out.push('>');
    }
}

fn collect_matching<'a>(element: &'a Element, matches: &dyn Fn(&Element) -> bool, out: &mut Vec<&'a Element>) {
    if matches(element) {
        out.push(element);
    }
    for child in element.child_elements() {
        collect_matching(child, matches, out);
    }
}

fn collect_text(element: &Element, out: &mut String) {
    for node in &element.children {
        match node {
            Node::Element(e) => collect_text(e, out),
            Node::Text(t) => out.push_str(t),
            Node::Raw(_) => {}
        }
    }
}

/// Escape for element content.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            _ => out.push(c),
        }
    }
    out
}

/// Escape for a double-quoted attribute value.
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==========================================================================
    // ESCAPING TESTS
    // ==========================================================================
    //
    // Data-file strings reach the page only through Text nodes and attribute
    // values. Both must come out inert no matter what they contain.
    // ==========================================================================

    #[test]
    fn test_escape_text() {
        assert_eq!(escape_text("a < b && c > d"), "a &lt; b &amp;&amp; c &gt; d");
        assert_eq!(escape_text("Bob's \"query\""), "Bob's \"query\"");
    }

    #[test]
    fn test_escape_attr() {
        assert_eq!(escape_attr(r#"x" onerror="alert(1)"#), "x&quot; onerror=&quot;alert(1)");
        assert_eq!(escape_attr("it's"), "it&#39;s");
    }

    #[test]
    fn test_script_in_text_is_inert() {
        let p = Element::new("p").text("<script>alert(1)</script>");
        assert_eq!(p.to_html(), "<p>&lt;script&gt;alert(1)&lt;/script&gt;</p>");
        // text_content gives the original string back
        assert_eq!(p.text_content(), "<script>alert(1)</script>");
    }

    // ==========================================================================
    // SERIALISATION TESTS
    // ==========================================================================

    #[test]
    fn test_boolean_and_valued_attributes() {
        let audio = Element::new("audio").flag("controls").attr("preload", "none").attr("src", "");
        assert_eq!(audio.to_html(), r#"<audio controls preload="none" src=""></audio>"#);
    }

    #[test]
    fn test_void_elements_have_no_close_tag() {
        let meta = Element::new("meta").attr("charset", "utf-8");
        assert_eq!(meta.to_html(), r#"<meta charset="utf-8">"#);
    }

    #[test]
    fn test_nested_structure() {
        let div = Element::new("div")
            .class("card")
            .child(Element::new("h3").text("Title"))
            .child(Element::new("p").text("Body"));
        assert_eq!(div.to_html(), r#"<div class="card"><h3>Title</h3><p>Body</p></div>"#);
    }

    #[test]
    fn test_raw_is_verbatim() {
        let style = Element::new("style").raw("a > b { color: red; }");
        assert_eq!(style.to_html(), "<style>a > b { color: red; }</style>");
    }

    // ==========================================================================
    // CLASS & QUERY TESTS
    // ==========================================================================

    #[test]
    fn test_add_class_once() {
        let mut el = Element::new("section").class("panel");
        el.add_class("is-visible");
        el.add_class("is-visible");
        assert_eq!(el.get_attr("class"), Some("panel is-visible"));
        assert!(el.has_class("panel"));
        assert!(el.has_class("is-visible"));

        let mut bare = Element::new("div");
        bare.add_class("is-visible");
        assert_eq!(bare.get_attr("class"), Some("is-visible"));
    }

    #[test]
    fn test_setting_attr_twice_replaces() {
        let el = Element::new("div").class("a").class("b");
        assert_eq!(el.get_attr("class"), Some("b"));
        assert_eq!(el.to_html(), r#"<div class="b"></div>"#);
    }

    #[test]
    fn test_find_by_id_and_append() {
        let mut root = Element::new("main")
            .child(Element::new("section").child(Element::new("div").id("slot")));

        root.find_by_id_mut("slot")
            .unwrap()
            .append(Element::new("p").text("hi"));

        let slot = root.find_by_id("slot").unwrap();
        assert_eq!(slot.child_elements().count(), 1);
        assert!(root.find_by_id("missing").is_none());
    }

    #[test]
    fn test_find_all_with_attr_in_document_order() {
        let root = Element::new("body")
            .child(Element::new("section").id("a").flag("data-reveal"))
            .child(
                Element::new("section")
                    .id("b")
                    .child(Element::new("div").id("c").flag("data-reveal")),
            );

        let ids: Vec<_> = root
            .find_all_with_attr("data-reveal")
            .iter()
            .map(|e| e.get_attr("id").unwrap())
            .collect();
        assert_eq!(ids, vec!["a", "c"]);
    }

    #[test]
    fn test_vec_container() {
        let mut list: Vec<Element> = Vec::new();
        // Inherent Vec::append would shadow the trait method
        Container::append(&mut list, Element::new("p"));
        Container::append(&mut list, Element::new("p"));
        assert_eq!(list.len(), 2);
    }
}
