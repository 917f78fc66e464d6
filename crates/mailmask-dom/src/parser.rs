//! HTML parser building the arena document, backed by `scraper` (html5ever).

use std::path::Path;

use scraper::{Html, Node};
use tracing::debug;

use mailmask_core::{Attributes, NodeId, Result};

use crate::document::{Document, ElementData, NodeKind};

/// HTML parser producing [`Document`]s.
///
/// Parsing follows the HTML5 tree-construction rules, so malformed markup is
/// repaired rather than rejected. Comments, doctypes and processing
/// instructions are dropped; only elements and text are kept.
#[derive(Debug, Default, Clone, Copy)]
pub struct HtmlParser;

impl HtmlParser {
    /// Create a new parser.
    pub fn new() -> Self {
        Self
    }

    /// Parse a complete HTML document.
    pub fn parse(&self, html: &str) -> Document {
        let parsed = Html::parse_document(html);
        if !parsed.errors.is_empty() {
            debug!("Recovered from {} HTML parse error(s)", parsed.errors.len());
        }

        let mut doc = Document::new();
        copy_tree(&mut doc, NodeId::root(), &parsed, false);
        doc
    }

    /// Read and parse an HTML file.
    pub fn parse_file<P: AsRef<Path>>(&self, path: P) -> Result<Document> {
        let content = std::fs::read_to_string(path)?;
        Ok(self.parse(&content))
    }

    /// Parse an HTML fragment and append it as the last children of `parent`.
    ///
    /// Returns the ids of the top-level nodes inserted, in order. Fragment
    /// content is parsed in a `<body>` context.
    pub fn append_fragment(
        &self,
        doc: &mut Document,
        parent: NodeId,
        html: &str,
    ) -> Result<Vec<NodeId>> {
        doc.check_parent(parent)?;

        let parsed = Html::parse_fragment(html);
        let inserted = copy_tree(doc, parent, &parsed, true);

        debug!(
            "Appended fragment under {}: {} top-level node(s)",
            parent,
            inserted.len()
        );
        Ok(inserted)
    }
}

/// Copy the parsed tree under `parent`, pre-order, so ids follow document order.
///
/// `parent` must accept children; every other node appended to is an element
/// created here. Returns the ids of the top-level nodes created. With `unwrap_html`, a
/// top-level `<html>` element is replaced by its children; scraper wraps
/// fragment content in such a synthetic element.
fn copy_tree(
    doc: &mut Document,
    parent: NodeId,
    parsed: &Html,
    unwrap_html: bool,
) -> Vec<NodeId> {
    let mut inserted = Vec::new();
    let mut stack = Vec::new();

    let top: Vec<_> = parsed.tree.root().children().collect();
    for node in top.into_iter().rev() {
        let is_wrapper =
            unwrap_html && matches!(node.value(), Node::Element(el) if el.name() == "html");
        if is_wrapper {
            let children: Vec<_> = node.children().collect();
            for child in children.into_iter().rev() {
                stack.push((child, parent, true));
            }
        } else {
            stack.push((node, parent, true));
        }
    }

    while let Some((current, into, is_top)) = stack.pop() {
        let created = match current.value() {
            Node::Element(el) => {
                let attrs: Attributes = el.attrs().collect();
                let element = ElementData::new(el.name(), attrs);
                Some(doc.push_child(into, NodeKind::Element(element)))
            }
            Node::Text(text) => {
                let id = doc.push_child(into, NodeKind::Text(String::from(&**text)));
                if is_top {
                    inserted.push(id);
                }
                None
            }
            // Doctypes, comments and processing instructions
            _ => None,
        };

        if let Some(id) = created {
            if is_top {
                inserted.push(id);
            }
            let children: Vec<_> = current.children().collect();
            for child in children.into_iter().rev() {
                stack.push((child, id, false));
            }
        }
    }

    inserted
}
