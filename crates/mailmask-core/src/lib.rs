//! # mailmask-core
//!
//! Core types for mailmask.
//!
//! This crate contains all fundamental types with **no internal dependencies**
//! on other mailmask crates. It provides:
//!
//! - Node handles into a parsed document (NodeId)
//! - Element attribute storage with HTML name semantics
//! - Detected field types reported by the email-input detector
//! - Page identifiers and detection pass triggers
//! - Error types
//! - Server configuration
//!
//! ## Architecture
//!
//! This is Layer 0 in the architecture - all other crates depend on this one,
//! but this crate has no dependencies on other mailmask crates.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod attributes;
pub mod config;
pub mod error;
pub mod field;
pub mod node;
pub mod page;

// Re-export commonly used types
pub use attributes::Attributes;
pub use config::{InjectionSettings, ServerConfig, ServerSettings};
pub use error::{Error, Result};
pub use field::{Confidence, DetectedField, DetectionReason, FieldDescriptor, FieldReport};
pub use node::NodeId;
pub use page::{PageId, PageInfo, PassTrigger};
