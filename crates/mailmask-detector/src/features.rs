//! Feature extractors over a candidate element.
//!
//! Every extractor is total: missing attributes read as the empty string and
//! a candidate without labels or form owner simply yields `false`.

use lazy_static::lazy_static;
use regex::Regex;

use mailmask_core::NodeId;
use mailmask_dom::Document;

lazy_static! {
    /// Attribute value is exactly "email" or "e-mail", any case.
    pub static ref EMAIL_EXACT: Regex =
        Regex::new(r"(?i)^(email|e-mail)$").expect("valid exact email regex");

    /// Text contains "email" or "e-mail" anywhere, any case.
    pub static ref EMAIL_SUBSTRING: Regex =
        Regex::new(r"(?i)email|e-mail").expect("valid email substring regex");
}

/// Attributes checked for an exact "email" value.
pub const EXACT_MATCH_ATTRS: &[&str] = &["id", "name", "autocomplete"];

/// Attributes checked for an "email" substring.
pub const PLACEHOLDER_ATTRS: &[&str] = &["placeholder", "aria-label"];

/// Count non-overlapping matches of `regex` in `text`; 0 when there is no text.
pub fn count_regex_matches(regex: &Regex, text: Option<&str>) -> usize {
    text.map(|t| regex.find_iter(t).count()).unwrap_or(0)
}

/// Whether any of the named attributes matches `regex`.
pub fn attributes_match(doc: &Document, node: NodeId, attributes: &[&str], regex: &Regex) -> bool {
    attributes
        .iter()
        .any(|name| count_regex_matches(regex, Some(doc.attr_or_empty(node, name))) > 0)
}

/// Whether the text of any label associated with `node` matches `regex`.
///
/// Labels are resolved in two steps. First the standard association (a
/// `for` attribute naming the control's id, or a wrapping `<label>`). Then
/// `<label>` elements inside the control's form whose `for` names the
/// control's `name` attribute, a common authoring mistake seen in the wild.
/// The second step is skipped when the control has no form.
pub fn label_text_matches(doc: &Document, node: NodeId, regex: &Regex) -> bool {
    let text_matches = |label: NodeId| count_regex_matches(regex, Some(&doc.text_content(label))) > 0;

    if doc.labels(node).iter().copied().any(text_matches) {
        return true;
    }

    let name = doc.attr_or_empty(node, "name");
    if name.is_empty() {
        return false;
    }

    match doc.form_owner(node) {
        Some(form) => doc
            .labels_for(name)
            .iter()
            .copied()
            .filter(|&label| doc.is_inclusive_descendant(label, form))
            .any(text_matches),
        None => false,
    }
}
