//! # mailmask-dom
//!
//! Document model for mailmask.
//!
//! This crate provides:
//! - An arena document of elements and text nodes
//! - HTML parsing (documents and fragments) via html5ever
//! - Tree queries: descendants, ancestors, lookup by id
//! - Form owner and `<label>` association rules
//! - A static visibility predicate
//!
//! ## Architecture
//!
//! This is Layer 1 in the architecture - it depends on mailmask-core and is
//! the document the detector inspects.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod document;
pub mod parser;

// Re-export commonly used types
pub use document::{Ancestors, Descendants, Document, ElementData, NodeKind};
pub use parser::HtmlParser;
