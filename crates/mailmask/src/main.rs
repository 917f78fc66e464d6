//! # Mailmask MCP Server
//!
//! Model Context Protocol server that finds the email inputs of HTML pages.
//!
//! ## Overview
//!
//! This server provides MCP tools for:
//! - Page management (open, list, close)
//! - Detection passes (script load, page load, mutations)
//! - Read-only detection and per-rule score explanations
//!
//! With `--scan <file>` it prints the email inputs of one file and exits.
//!
//! ## Architecture
//!
//! This is Layer 4 - the main MCP server binary that ties together:
//! - mailmask-core: Core types and configuration
//! - mailmask-dom: HTML parsing and document queries
//! - mailmask-detector: Email-input detection
//! - mailmask-page: Page lifecycle

use mailmask::{cli::USAGE, scan_file, CliArgs, MailmaskServer};
use rmcp::{transport::stdio, ServiceExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let args = CliArgs::parse(std::env::args().skip(1))?;
    if args.help {
        println!("{USAGE}");
        return Ok(());
    }

    let config = args.load_config()?;

    // Initialize logging (stderr: stdout carries the MCP transport)
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.server.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(path) = &args.scan {
        tracing::info!("Scanning {}", path.display());
        println!("{}", scan_file(path, &config)?);
        return Ok(());
    }

    if config.server.transport != "stdio" {
        anyhow::bail!(
            "unsupported transport '{}': only stdio is available",
            config.server.transport
        );
    }

    tracing::info!(
        "Mailmask MCP Server v{} starting (max pages: {}, marker class: {})...",
        env!("CARGO_PKG_VERSION"),
        config.server.max_pages,
        config.injection.marker_class
    );

    let server = MailmaskServer::with_config(&config);

    tracing::info!("Server initialized, starting stdio transport...");

    // Serve the MCP server over stdio
    let service = server.serve(stdio()).await.map_err(|e| {
        tracing::error!("Error starting server: {}", e);
        e
    })?;

    tracing::info!("Mailmask MCP Server running on stdio");

    // Wait for the service to complete
    service.waiting().await?;

    tracing::info!("Mailmask MCP Server shutting down");

    Ok(())
}
