//! # mailmask-page
//!
//! Page lifecycle management for mailmask.
//!
//! This crate provides:
//! - Page creation from HTML and the script-load detection pass
//! - Page-load and mutation-triggered detection passes
//! - Processed-field marking so no field is reported twice
//! - Page registry management
//!
//! ## Architecture
//!
//! This is Layer 3 in the architecture - it depends on mailmask-core,
//! mailmask-dom and mailmask-detector to drive detection over page lifecycles.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod manager;
pub mod page;

// Re-export commonly used types
pub use manager::{PageManager, PageManagerConfig};
pub use page::Page;
