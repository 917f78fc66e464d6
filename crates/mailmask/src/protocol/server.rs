//! Mailmask MCP Server Implementation
//!
//! This module implements the MCP server using rmcp 0.9's #[tool_router] pattern.
//! It routes MCP tool calls to the page manager and the detector.

use std::sync::Arc;

use rmcp::{
    handler::server::{router::tool::ToolRouter, wrapper::Parameters},
    model::*,
    tool, tool_handler, tool_router, ErrorData as McpError,
};

use tracing::{debug, error, info, instrument, warn};

use mailmask_core::{Error, PageId, ServerConfig};
use mailmask_page::{Page, PageManager, PageManagerConfig};

use crate::tools::*;

/// Map a library error to a JSON-RPC error.
fn to_mcp_error(e: Error) -> McpError {
    match e {
        Error::PageNotFound(_)
        | Error::ElementNotFound(_)
        | Error::NotAnElement(_)
        | Error::PageLimitReached(_)
        | Error::InvalidInput(_) => McpError::new(
            ErrorCode(-32602), // Invalid params
            e.to_string(),
            None,
        ),
        _ => {
            error!("Internal error: {}", e);
            McpError::new(
                ErrorCode(-32603), // Internal error
                e.to_string(),
                None,
            )
        }
    }
}

/// Run page work (parsing, detection passes) on the blocking pool.
async fn run_blocking<T, F>(task: &'static str, work: F) -> Result<T, McpError>
where
    F: FnOnce() -> mailmask_core::Result<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .map_err(|e| {
            error!("{} task failed: {}", task, e);
            McpError::new(ErrorCode(-32603), format!("{task} task failed: {e}"), None)
        })?
        .map_err(to_mcp_error)
}

/// Serialize a response as pretty JSON text content.
fn json_result<T: serde::Serialize>(response: &T, fallback: String) -> CallToolResult {
    CallToolResult::success(vec![Content::text(
        serde_json::to_string_pretty(response).unwrap_or(fallback),
    )])
}

/// Mailmask MCP Server
///
/// Holds open pages and exposes detection passes via MCP tools.
#[derive(Clone)]
pub struct MailmaskServer {
    /// Open pages
    pages: Arc<PageManager>,
    /// Tool router for handling MCP tool calls
    tool_router: ToolRouter<Self>,
}

#[tool_router]
impl MailmaskServer {
    /// Create a new server with default configuration
    pub fn new() -> Self {
        Self::with_config(&ServerConfig::default())
    }

    /// Create a new server from loaded configuration
    pub fn with_config(config: &ServerConfig) -> Self {
        Self {
            pages: Arc::new(PageManager::with_config(PageManagerConfig::from(config))),
            tool_router: Self::tool_router(),
        }
    }

    /// Get a page by ID (helper method)
    fn get_page(&self, page_id: &str) -> Result<Arc<Page>, McpError> {
        let id: PageId = page_id.parse().map_err(|_| {
            McpError::new(
                ErrorCode(-32602), // Invalid params
                format!("Invalid page ID format: {page_id}"),
                None,
            )
        })?;
        self.pages.get_page(&id).map_err(to_mcp_error)
    }

    /// Open a page and run the script-load pass
    #[tool(
        description = "Open an HTML page and run the initial email-input detection pass. Returns the page id and the fields found."
    )]
    #[instrument(skip_all)]
    async fn page_open(
        &self,
        Parameters(params): Parameters<PageOpenParams>,
    ) -> Result<CallToolResult, McpError> {
        info!(
            "Opening page: url={:?}, {} bytes of HTML",
            params.url,
            params.html.len()
        );

        let pages = Arc::clone(&self.pages);
        let (page, report) =
            run_blocking("Page open", move || pages.open_page(&params.html, params.url)).await?;

        let page_id = page.id().to_string();
        let response = PageOpenResponse {
            page_id: page_id.clone(),
            message: format!(
                "Page opened, {} email input(s) found",
                report.fields.len()
            ),
            report,
        };

        Ok(json_result(&response, page_id))
    }

    /// Run the page-load pass
    #[tool(
        description = "Signal that a page finished loading and run the page-load detection pass. Fields reported earlier are skipped."
    )]
    #[instrument(skip_all)]
    async fn page_loaded(
        &self,
        Parameters(params): Parameters<PageLoadedParams>,
    ) -> Result<CallToolResult, McpError> {
        let page = self.get_page(&params.page_id)?;
        let report = run_blocking("Page load", move || page.loaded()).await?;

        debug!("Page-load pass reported {} field(s)", report.fields.len());
        Ok(json_result(&report, params.page_id))
    }

    /// Insert HTML and run a mutation pass
    #[tool(
        description = "Append an HTML fragment to a page (default under <body>) and run a detection pass scoped to the affected forms."
    )]
    #[instrument(skip_all)]
    async fn page_mutate(
        &self,
        Parameters(params): Parameters<PageMutateParams>,
    ) -> Result<CallToolResult, McpError> {
        let page = self.get_page(&params.page_id)?;
        let PageMutateParams {
            page_id,
            parent_id,
            html,
        } = params;
        let report = run_blocking("Page mutation", move || {
            page.mutate(parent_id.as_deref(), &html)
        })
        .await?;

        debug!(
            "Mutation pass over {} root(s) reported {} field(s)",
            report.roots.len(),
            report.fields.len()
        );
        Ok(json_result(&report, page_id))
    }

    /// Detect email inputs without marking them
    #[tool(
        description = "Detect email inputs in a page or one of its subtrees without marking them as processed."
    )]
    #[instrument(skip_all)]
    async fn email_inputs_detect(
        &self,
        Parameters(params): Parameters<EmailInputsDetectParams>,
    ) -> Result<CallToolResult, McpError> {
        let page = self.get_page(&params.page_id)?;
        let root_id = params.root_id;
        let report = run_blocking("Detection", move || page.detect(root_id.as_deref())).await?;

        Ok(json_result(&report, params.page_id))
    }

    /// Explain the score of one element
    #[tool(
        description = "Show how each heuristic rule contributes to an element's email-input score."
    )]
    #[instrument(skip_all)]
    async fn email_inputs_explain(
        &self,
        Parameters(params): Parameters<EmailInputsExplainParams>,
    ) -> Result<CallToolResult, McpError> {
        let page = self.get_page(&params.page_id)?;
        let element_id = params.element_id.clone();
        let breakdown = run_blocking("Explain", move || page.explain(&element_id)).await?;

        let response = EmailInputsExplainResponse {
            page_id: params.page_id,
            element_id: params.element_id,
            breakdown,
        };
        let fallback = format!("score {:.4}", response.breakdown.score);
        Ok(json_result(&response, fallback))
    }

    /// List open pages
    #[tool(description = "List all open pages")]
    #[instrument(skip_all)]
    async fn page_list(
        &self,
        Parameters(_params): Parameters<PageListParams>,
    ) -> Result<CallToolResult, McpError> {
        let pages = self.pages.list_pages();
        let count = pages.len();
        info!("Found {} open page(s)", count);

        let response = PageListResponse { pages, count };
        Ok(json_result(&response, format!("{count} page(s)")))
    }

    /// Close a page
    #[tool(description = "Close an open page")]
    #[instrument(skip_all)]
    async fn page_close(
        &self,
        Parameters(params): Parameters<PageCloseParams>,
    ) -> Result<CallToolResult, McpError> {
        let id: PageId = params.page_id.parse().map_err(|_| {
            McpError::new(
                ErrorCode(-32602), // Invalid params
                format!("Invalid page ID format: {}", params.page_id),
                None,
            )
        })?;

        self.pages.close_page(&id).map_err(|e| {
            warn!("Failed to close page {}: {}", params.page_id, e);
            to_mcp_error(e)
        })?;

        let response = PageCloseResponse {
            page_id: params.page_id.clone(),
            message: "Page closed".to_string(),
        };
        Ok(json_result(&response, params.page_id))
    }
}

impl Default for MailmaskServer {
    fn default() -> Self {
        Self::new()
    }
}

// Implement the ServerHandler trait to define server capabilities
#[tool_handler]
impl rmcp::ServerHandler for MailmaskServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            instructions: Some(
                "Mailmask MCP Server - Find the email inputs of HTML pages. \
                 Use page_open to load a page (runs the first detection pass), page_loaded and \
                 page_mutate to run later passes, email_inputs_detect for a read-only scan, and \
                 email_inputs_explain to see why an element scored as it did."
                    .into(),
            ),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            ..Default::default()
        }
    }
}
