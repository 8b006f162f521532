// ABOUTME: Node-keyed HTML rewriting: edits are recorded per ego_tree NodeId, then applied while serializing.
// ABOUTME: Supports attribute/class/style edits and html insertion before/after children; prefixes and doctype ids survive.

use std::collections::HashMap;

use ego_tree::{NodeId, NodeRef};
use scraper::node::{Doctype, Element};
use scraper::{ElementRef, Html, Node};

/// Pending changes for one element.
#[derive(Debug, Clone, Default)]
pub struct NodeEdit {
    set_attrs: Vec<(String, String)>,
    add_classes: Vec<String>,
    remove_classes: Vec<String>,
    styles: Vec<(String, String)>,
    prepend_html: String,
    append_html: String,
}

/// Records edits against a parsed document and serializes the document with them applied.
///
/// scraper trees are read-only in practice, so instead of mutating nodes the
/// rewriter keeps a side table keyed by [`NodeId`] and consults it while
/// walking the tree. Inserted markup is written verbatim.
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    edits: HashMap<NodeId, NodeEdit>,
}

impl Rewriter {
    pub fn new() -> Self {
        Self::default()
    }

    fn edit(&mut self, id: NodeId) -> &mut NodeEdit {
        self.edits.entry(id).or_default()
    }

    /// Set (or replace) an attribute.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        let edit = self.edit(id);
        match edit.set_attrs.iter_mut().find(|(n, _)| n == name) {
            Some(slot) => slot.1 = value,
            None => edit.set_attrs.push((name.to_string(), value)),
        }
        self
    }

    /// Add a class unless the element already carries it.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> &mut Self {
        let edit = self.edit(id);
        edit.remove_classes.retain(|c| c != class);
        if !edit.add_classes.iter().any(|c| c == class) {
            edit.add_classes.push(class.to_string());
        }
        self
    }

    /// Drop a class from the element.
    pub fn remove_class(&mut self, id: NodeId, class: &str) -> &mut Self {
        let edit = self.edit(id);
        edit.add_classes.retain(|c| c != class);
        if !edit.remove_classes.iter().any(|c| c == class) {
            edit.remove_classes.push(class.to_string());
        }
        self
    }

    /// Append an inline style declaration; a later call for the same property replaces it.
    pub fn set_style(&mut self, id: NodeId, property: &str, value: impl Into<String>) -> &mut Self {
        let value = value.into();
        let edit = self.edit(id);
        match edit.styles.iter_mut().find(|(p, _)| p == property) {
            Some(slot) => slot.1 = value,
            None => edit.styles.push((property.to_string(), value)),
        }
        self
    }

    /// Insert markup before the element's first child.
    pub fn prepend_html(&mut self, id: NodeId, html: &str) -> &mut Self {
        let edit = self.edit(id);
        edit.prepend_html.insert_str(0, html);
        self
    }

    /// Insert markup after the element's last child.
    pub fn append_html(&mut self, id: NodeId, html: &str) -> &mut Self {
        self.edit(id).append_html.push_str(html);
        self
    }

    /// Serialize a whole document, doctype included.
    pub fn render_document(&self, doc: &Html) -> String {
        let mut out = String::new();
        for child in doc.tree.root().children() {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Serialize the children of a fragment parsed with [`Html::parse_fragment`].
    pub fn render_fragment(&self, fragment: &Html) -> String {
        let mut out = String::new();
        for child in fragment.root_element().children() {
            self.write_node(child, &mut out);
        }
        out
    }

    /// Serialize one element including its own tags.
    pub fn render_element(&self, element: ElementRef<'_>) -> String {
        let mut out = String::new();
        self.write_node(*element, &mut out);
        out
    }

    fn write_node(&self, node: NodeRef<'_, Node>, out: &mut String) {
        match node.value() {
            Node::Doctype(doctype) => write_doctype(doctype, out),
            Node::Text(text) => {
                let raw = node
                    .parent()
                    .and_then(|p| p.value().as_element().map(|el| is_raw_text(el.name())))
                    .unwrap_or(false);
                if raw {
                    out.push_str(text);
                } else {
                    escape_text_into(text, out);
                }
            }
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            Node::Element(el) => {
                let name = el.name();
                let edit = self.edits.get(&node.id());

                out.push('<');
                out.push_str(name);
                for (attr, value) in effective_attrs(el, edit) {
                    out.push(' ');
                    out.push_str(&attr);
                    out.push_str("=\"");
                    escape_attr_into(&value, out);
                    out.push('"');
                }
                out.push('>');

                if is_void_element(name) {
                    return;
                }

                if let Some(edit) = edit {
                    out.push_str(&edit.prepend_html);
                }
                for child in node.children() {
                    self.write_node(child, out);
                }
                if let Some(edit) = edit {
                    out.push_str(&edit.append_html);
                }

                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            Node::Document | Node::Fragment => {
                for child in node.children() {
                    self.write_node(child, out);
                }
            }
            _ => {}
        }
    }
}

fn write_doctype(doctype: &Doctype, out: &mut String) {
    out.push_str("<!DOCTYPE ");
    out.push_str(doctype.name());
    let (public_id, system_id) = (doctype.public_id(), doctype.system_id());
    if !public_id.is_empty() {
        out.push_str(&format!(" PUBLIC \"{}\"", public_id));
        if !system_id.is_empty() {
            out.push_str(&format!(" \"{}\"", system_id));
        }
    } else if !system_id.is_empty() {
        out.push_str(&format!(" SYSTEM \"{}\"", system_id));
    }
    out.push('>');
}

/// Existing attributes with the recorded edit folded in, in source order.
fn effective_attrs(el: &Element, edit: Option<&NodeEdit>) -> Vec<(String, String)> {
    let mut attrs: Vec<(String, String)> = el
        .attrs
        .iter()
        .map(|(name, value)| {
            // Keep prefixes such as `xlink:href` on foreign content.
            let written = match name.prefix {
                Some(ref prefix) => format!("{}:{}", prefix, name.local),
                None => name.local.to_string(),
            };
            (written, value.to_string())
        })
        .collect();

    let Some(edit) = edit else {
        return attrs;
    };

    for (name, value) in &edit.set_attrs {
        upsert(&mut attrs, name, value.clone());
    }

    if !edit.add_classes.is_empty() || !edit.remove_classes.is_empty() {
        let current = attrs
            .iter()
            .find(|(n, _)| n == "class")
            .map(|(_, v)| v.clone())
            .unwrap_or_default();
        let mut classes: Vec<&str> = current
            .split_whitespace()
            .filter(|c| !edit.remove_classes.iter().any(|r| r == *c))
            .collect();
        for class in &edit.add_classes {
            if !classes.contains(&class.as_str()) {
                classes.push(class.as_str());
            }
        }
        let joined = classes.join(" ");
        if joined.is_empty() {
            attrs.retain(|(n, _)| n != "class");
        } else {
            upsert(&mut attrs, "class", joined);
        }
    }

    if !edit.styles.is_empty() {
        let mut style = attrs
            .iter()
            .find(|(n, _)| n == "style")
            .map(|(_, v)| v.trim().to_string())
            .unwrap_or_default();
        for (property, value) in &edit.styles {
            if !style.is_empty() && !style.ends_with(';') {
                style.push(';');
            }
            if !style.is_empty() {
                style.push(' ');
            }
            style.push_str(property);
            style.push_str(": ");
            style.push_str(value);
            style.push(';');
        }
        upsert(&mut attrs, "style", style);
    }

    attrs
}

fn upsert(attrs: &mut Vec<(String, String)>, name: &str, value: String) {
    match attrs.iter_mut().find(|(n, _)| n == name) {
        Some(slot) => slot.1 = value,
        None => attrs.push((name.to_string(), value)),
    }
}

/// Escape text content for output inside an element.
pub fn escape_text(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_text_into(s, &mut out);
    out
}

fn escape_text_into(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

/// Escape an attribute value for output inside double quotes.
pub fn escape_attr(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    escape_attr_into(s, &mut out);
    out
}

fn escape_attr_into(s: &str, out: &mut String) {
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '"' => out.push_str("&quot;"),
            '\u{a0}' => out.push_str("&nbsp;"),
            _ => out.push(c),
        }
    }
}

/// Elements whose text children are emitted without escaping.
fn is_raw_text(tag: &str) -> bool {
    matches!(
        tag,
        "script" | "style" | "xmp" | "iframe" | "noembed" | "noframes" | "plaintext" | "noscript"
    )
}

/// Check if tag is void element
fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}
