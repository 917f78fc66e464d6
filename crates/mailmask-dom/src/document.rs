//! Arena document model and tree queries.

use std::collections::HashMap;
use std::sync::OnceLock;

use lazy_static::lazy_static;
use regex::Regex;

use mailmask_core::{Attributes, Error, FieldDescriptor, NodeId, Result};

lazy_static! {
    static ref DISPLAY_NONE: Regex =
        Regex::new(r"(?i)(?:^|;)\s*display\s*:\s*none\b").expect("valid display regex");
    static ref VISIBILITY: Regex =
        Regex::new(r"(?i)(?:^|;)\s*visibility\s*:\s*([a-z-]+)").expect("valid visibility regex");
}

/// Elements whose content is never rendered.
const UNRENDERED_CONTAINERS: &[&str] = &["head", "template", "noscript", "script", "style"];

/// Elements a `<label>` can be associated with.
const LABELABLE: &[&str] = &[
    "button", "input", "meter", "output", "progress", "select", "textarea",
];

/// Element payload: tag name and attributes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag: String,
    /// Attributes in source order
    pub attrs: Attributes,
}

impl ElementData {
    /// Create element data, lowercasing the tag name.
    pub fn new(tag: impl Into<String>, attrs: Attributes) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attrs,
        }
    }

    /// Whether this element has the given tag name.
    pub fn is(&self, tag: &str) -> bool {
        self.tag.eq_ignore_ascii_case(tag)
    }
}

/// Kind of a document node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// The document root
    Document,
    /// An element
    Element(ElementData),
    /// A text node
    Text(String),
}

/// A node in the arena.
#[derive(Debug, Clone)]
struct NodeData {
    kind: NodeKind,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

/// Id and label links, built in one walk and dropped on any mutation.
#[derive(Debug, Clone, Default)]
struct LinkIndex {
    /// First element in document order carrying each `id` value
    first_by_id: HashMap<String, NodeId>,
    /// Labels of each labelable control, in document order
    labels: HashMap<NodeId, Vec<NodeId>>,
    /// `<label>` elements by their `for` value, in document order
    labels_for: HashMap<String, Vec<NodeId>>,
}

/// Parsed HTML document stored as an arena of nodes.
///
/// Node 0 is always the document root. Nodes are never removed; mutations
/// only append, so a `NodeId` stays valid for the lifetime of the document.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<NodeData>,
    links: OnceLock<LinkIndex>,
}

impl Document {
    /// Create an empty document containing only the root node.
    pub fn new() -> Self {
        Self {
            nodes: vec![NodeData {
                kind: NodeKind::Document,
                parent: None,
                children: Vec::new(),
            }],
            links: OnceLock::new(),
        }
    }

    /// Total number of nodes, including the root.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the document has nothing but the root node.
    pub fn is_empty(&self) -> bool {
        self.nodes.len() == 1
    }

    /// Whether a node id belongs to this document.
    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Check that `parent` exists and can hold children.
    pub fn check_parent(&self, parent: NodeId) -> Result<()> {
        match self.kind(parent) {
            Some(NodeKind::Text(_)) => Err(Error::NotAnElement(parent)),
            Some(_) => Ok(()),
            None => Err(Error::ElementNotFound(parent.to_string())),
        }
    }

    /// Append a node under a parent that passed [`Self::check_parent`] or was
    /// just created as an element.
    pub(crate) fn push_child(&mut self, parent: NodeId, kind: NodeKind) -> NodeId {
        self.links.take();
        let id = NodeId::new(self.nodes.len());
        self.nodes.push(NodeData {
            kind,
            parent: Some(parent),
            children: Vec::new(),
        });
        self.nodes[parent.index()].children.push(id);
        id
    }

    /// Node kind, `None` for an unknown id.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.index()).map(|n| &n.kind)
    }

    /// Element payload, `None` for text, the root, or an unknown id.
    pub fn element(&self, id: NodeId) -> Option<&ElementData> {
        match self.kind(id) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    /// Mutable element payload.
    pub fn element_mut(&mut self, id: NodeId) -> Option<&mut ElementData> {
        self.links.take();
        match self.nodes.get_mut(id.index()).map(|n| &mut n.kind) {
            Some(NodeKind::Element(el)) => Some(el),
            _ => None,
        }
    }

    /// Whether the node is an element.
    pub fn is_element(&self, id: NodeId) -> bool {
        self.element(id).is_some()
    }

    /// Whether the node is an element with the given tag name.
    pub fn is_tag(&self, id: NodeId, tag: &str) -> bool {
        self.element(id).map(|el| el.is(tag)).unwrap_or(false)
    }

    /// Lowercase tag name of an element.
    pub fn tag_name(&self, id: NodeId) -> Option<&str> {
        self.element(id).map(|el| el.tag.as_str())
    }

    /// Attribute value, `None` if absent or not an element.
    pub fn attr(&self, id: NodeId, name: &str) -> Option<&str> {
        self.element(id).and_then(|el| el.attrs.get(name))
    }

    /// Attribute value, reading a missing attribute (or a non-element) as `""`.
    pub fn attr_or_empty(&self, id: NodeId, name: &str) -> &str {
        self.attr(id, name).unwrap_or("")
    }

    /// Set an attribute on an element.
    pub fn set_attr(&mut self, id: NodeId, name: &str, value: impl Into<String>) -> Result<()> {
        let el = self.element_mut(id).ok_or(Error::NotAnElement(id))?;
        el.attrs.set(name, value);
        Ok(())
    }

    /// Whether an element's `class` attribute contains the token.
    pub fn has_class(&self, id: NodeId, class: &str) -> bool {
        self.element(id)
            .map(|el| el.attrs.has_class(class))
            .unwrap_or(false)
    }

    /// Append a class token to an element.
    pub fn add_class(&mut self, id: NodeId, class: &str) -> Result<()> {
        let el = self.element_mut(id).ok_or(Error::NotAnElement(id))?;
        el.attrs.add_class(class);
        Ok(())
    }

    /// Parent node, `None` for the root or an unknown id.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.index()).and_then(|n| n.parent)
    }

    /// Children of a node, in document order.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.index())
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    /// Ancestors of a node, nearest first. The node itself is not included.
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            doc: self,
            next: self.parent(id),
        }
    }

    /// All descendants of `root` in document (pre-order) order, excluding `root`.
    pub fn descendants(&self, root: NodeId) -> Descendants<'_> {
        let mut stack: Vec<NodeId> = self.children(root).to_vec();
        stack.reverse();
        Descendants { doc: self, stack }
    }

    /// Descendant elements of `root` with the given tag, in document order.
    pub fn elements_by_tag<'a>(
        &'a self,
        root: NodeId,
        tag: &'a str,
    ) -> impl Iterator<Item = NodeId> + 'a {
        self.descendants(root).filter(move |&id| self.is_tag(id, tag))
    }

    /// Whether `node` is `ancestor` or lies inside it.
    pub fn is_inclusive_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        node == ancestor || self.ancestors(node).any(|a| a == ancestor)
    }

    /// Nearest ancestor element with the given tag (the node itself excluded).
    pub fn closest_ancestor(&self, id: NodeId, tag: &str) -> Option<NodeId> {
        self.ancestors(id).find(|&a| self.is_tag(a, tag))
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, id: NodeId) -> String {
        match self.kind(id) {
            Some(NodeKind::Text(text)) => text.clone(),
            Some(_) => self
                .descendants(id)
                .filter_map(|d| match self.kind(d) {
                    Some(NodeKind::Text(text)) => Some(text.as_str()),
                    _ => None,
                })
                .collect(),
            None => String::new(),
        }
    }

    fn links(&self) -> &LinkIndex {
        self.links.get_or_init(|| self.build_links())
    }

    fn build_links(&self) -> LinkIndex {
        let mut index = LinkIndex::default();
        let mut labels = Vec::new();

        for node in self.descendants(NodeId::root()) {
            let Some(el) = self.element(node) else {
                continue;
            };
            if let Some(id_attr) = el.attrs.get("id").filter(|v| !v.is_empty()) {
                index.first_by_id.entry(id_attr.to_string()).or_insert(node);
            }
            if el.is("label") {
                labels.push(node);
                if let Some(target) = el.attrs.get("for") {
                    index
                        .labels_for
                        .entry(target.to_string())
                        .or_default()
                        .push(node);
                }
            }
        }

        for label in labels {
            let control = match self.attr(label, "for") {
                Some(target) => index.first_by_id.get(target).copied(),
                None => self.descendants(label).find(|&d| self.is_labelable(d)),
            };
            if let Some(control) = control.filter(|&c| self.is_labelable(c)) {
                index.labels.entry(control).or_default().push(label);
            }
        }

        index
    }

    /// First element in document order whose `id` attribute equals `id_attr`.
    pub fn find_by_id(&self, id_attr: &str) -> Option<NodeId> {
        self.links().first_by_id.get(id_attr).copied()
    }

    /// Resolve an element reference: `node_12`, `12`, or `#some-id`.
    pub fn resolve(&self, reference: &str) -> Result<NodeId> {
        let reference = reference.trim();
        if let Some(id_attr) = reference.strip_prefix('#') {
            return self
                .find_by_id(id_attr)
                .ok_or_else(|| Error::ElementNotFound(reference.to_string()));
        }

        let id: NodeId = reference.parse()?;
        if id.is_root() || self.is_element(id) {
            Ok(id)
        } else if self.contains(id) {
            Err(Error::NotAnElement(id))
        } else {
            Err(Error::ElementNotFound(reference.to_string()))
        }
    }

    /// The form an element is associated with.
    ///
    /// An explicit `form` attribute wins and must name a `<form>` by id;
    /// otherwise the nearest ancestor `<form>` is the owner.
    pub fn form_owner(&self, id: NodeId) -> Option<NodeId> {
        let el = self.element(id)?;
        match el.attrs.get("form") {
            Some(form_id) => self
                .find_by_id(form_id)
                .filter(|&form| self.is_tag(form, "form")),
            None => self.closest_ancestor(id, "form"),
        }
    }

    /// Whether an element can be the target of a `<label>`.
    pub fn is_labelable(&self, id: NodeId) -> bool {
        match self.element(id) {
            Some(el) if el.is("input") => !el.attrs.get_or_empty("type").eq_ignore_ascii_case("hidden"),
            Some(el) => LABELABLE.contains(&el.tag.as_str()),
            None => false,
        }
    }

    /// The control a `<label>` is associated with.
    ///
    /// With a `for` attribute, the first element carrying that id (if it is
    /// labelable). Without one, the first labelable descendant.
    pub fn labeled_control(&self, label: NodeId) -> Option<NodeId> {
        let el = self.element(label).filter(|el| el.is("label"))?;
        let control = match el.attrs.get("for") {
            Some(target) => self.find_by_id(target),
            None => self.descendants(label).find(|&d| self.is_labelable(d)),
        };
        control.filter(|&c| self.is_labelable(c))
    }

    /// Labels associated with a control, in document order.
    ///
    /// Only standard associations count here: `for`/`id` linkage and nesting.
    pub fn labels(&self, control: NodeId) -> &[NodeId] {
        self.links()
            .labels
            .get(&control)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// `<label>` elements whose `for` attribute equals `target`, in document
    /// order, whether or not they resolve to a control.
    pub fn labels_for(&self, target: &str) -> &[NodeId] {
        self.links()
            .labels_for
            .get(target)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Whether an element would be rendered.
    ///
    /// Static approximation of a layout-based check: an element is hidden by
    /// the `hidden` attribute or inline `display: none` on itself or any
    /// ancestor, by the nearest inline `visibility` declaration being
    /// `hidden` or `collapse`, by sitting inside a never-rendered container,
    /// or by being an `<input type="hidden">`.
    pub fn is_visible(&self, id: NodeId) -> bool {
        let Some(el) = self.element(id) else {
            return false;
        };

        if el.is("input") && el.attrs.get_or_empty("type").eq_ignore_ascii_case("hidden") {
            return false;
        }

        let mut visibility_decided = false;
        for node in std::iter::once(id).chain(self.ancestors(id)) {
            let Some(el) = self.element(node) else {
                continue;
            };

            if node != id && UNRENDERED_CONTAINERS.contains(&el.tag.as_str()) {
                return false;
            }
            if el.attrs.contains("hidden") {
                return false;
            }

            let style = el.attrs.get_or_empty("style");
            if style.is_empty() {
                continue;
            }
            if DISPLAY_NONE.is_match(style) {
                return false;
            }
            if !visibility_decided {
                if let Some(value) = VISIBILITY.captures(style).and_then(|c| c.get(1)) {
                    visibility_decided = true;
                    let value = value.as_str().to_ascii_lowercase();
                    if value == "hidden" || value == "collapse" {
                        return false;
                    }
                }
            }
        }

        true
    }

    /// Reporting descriptor for an element.
    pub fn descriptor(&self, id: NodeId) -> FieldDescriptor {
        let owned = |name: &str| self.attr(id, name).map(str::to_string);
        FieldDescriptor {
            tag: self.tag_name(id).unwrap_or_default().to_string(),
            id: owned("id"),
            name: owned("name"),
            input_type: owned("type"),
            placeholder: owned("placeholder"),
        }
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over a node's ancestors, nearest first.
pub struct Ancestors<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next?;
        self.next = self.doc.parent(current);
        Some(current)
    }
}

/// Pre-order iterator over a subtree, excluding its root.
pub struct Descendants<'a> {
    doc: &'a Document,
    stack: Vec<NodeId>,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.stack.pop()?;
        self.stack
            .extend(self.doc.children(current).iter().rev().copied());
        Some(current)
    }
}
