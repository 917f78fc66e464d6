//! Mailmask MCP Server Library
//!
//! This library contains the MCP protocol layer types and handlers, and the
//! command-line helpers used by the binary. The server binary is in main.rs.

pub mod cli;
pub mod protocol;
pub mod tools;

// Re-export commonly used types
pub use cli::{scan_file, CliArgs};
pub use protocol::MailmaskServer;
pub use tools::*;
