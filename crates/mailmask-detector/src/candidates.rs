//! Candidate enumeration.
//!
//! Both enumerators walk the descendants of the root (the root itself is
//! never a candidate) in document order.

use mailmask_core::NodeId;
use mailmask_dom::Document;

/// Whether `node` is an `<input>` whose `type` is `email`, any ASCII case.
pub fn is_explicit_email(doc: &Document, node: NodeId) -> bool {
    doc.is_tag(node, "input")
        && doc
            .attr(node, "type")
            .is_some_and(|t| t.eq_ignore_ascii_case("email"))
}

/// Whether `node` is an `<input>` with `type` `text`, empty, or absent.
pub fn is_text_like(doc: &Document, node: NodeId) -> bool {
    doc.is_tag(node, "input")
        && match doc.attr(node, "type") {
            None => true,
            Some(t) => t.is_empty() || t.eq_ignore_ascii_case("text"),
        }
}

/// Inputs declaring `type="email"` under `root`.
pub fn explicit_email_inputs<'a>(
    doc: &'a Document,
    root: NodeId,
) -> impl Iterator<Item = NodeId> + 'a {
    doc.elements_by_tag(root, "input")
        .filter(move |&node| is_explicit_email(doc, node))
}

/// Visible text-like inputs under `root`, to be scored.
pub fn text_input_candidates<'a>(
    doc: &'a Document,
    root: NodeId,
) -> impl Iterator<Item = NodeId> + 'a {
    doc.elements_by_tag(root, "input")
        .filter(move |&node| is_text_like(doc, node) && doc.is_visible(node))
}
