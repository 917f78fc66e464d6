//! Error types for mailmask.

use thiserror::Error;

use crate::{NodeId, PageId};

/// Main error type for mailmask operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Page not found
    #[error("Page not found: {0}")]
    PageNotFound(PageId),

    /// Element not found by node id or `id` attribute
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Node exists but is not an element
    #[error("Node is not an element: {0}")]
    NotAnElement(NodeId),

    /// Page limit reached
    #[error("Page limit reached (max: {0})")]
    PageLimitReached(usize),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or parameters (generic)
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;
