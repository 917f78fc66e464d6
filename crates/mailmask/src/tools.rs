//! MCP Tool Types
//!
//! This module defines all MCP tool parameter and response types.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use mailmask_core::{FieldReport, PageInfo};
use mailmask_detector::ScoreBreakdown;

// =============================================================================
// Page Lifecycle Tools
// =============================================================================

/// Parameters for page_open
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PageOpenParams {
    /// Full HTML document
    pub html: String,

    /// Source URL, for reference only
    #[serde(default)]
    pub url: Option<String>,
}

/// Response for page_open
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PageOpenResponse {
    /// Unique page identifier
    pub page_id: String,

    /// Fields reported by the script-load pass
    pub report: FieldReport,

    /// Success message
    pub message: String,
}

/// Parameters for page_loaded
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PageLoadedParams {
    /// Page that finished loading
    pub page_id: String,
}

/// Parameters for page_mutate
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PageMutateParams {
    /// Page to modify
    pub page_id: String,

    /// Insertion point: node reference (`node_12`, `12`) or `#id`.
    /// Defaults to `<body>`.
    #[serde(default)]
    pub parent_id: Option<String>,

    /// HTML fragment appended as the last children of the parent
    pub html: String,
}

/// Parameters for page_list
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PageListParams {}

/// Response for page_list
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PageListResponse {
    /// Open pages
    pub pages: Vec<PageInfo>,

    /// Total count
    pub count: usize,
}

/// Parameters for page_close
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PageCloseParams {
    /// Page to close
    pub page_id: String,
}

/// Response for page_close
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct PageCloseResponse {
    /// Page that was closed
    pub page_id: String,

    /// Success message
    pub message: String,
}

// =============================================================================
// Detection Tools
// =============================================================================

/// Parameters for email_inputs_detect
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EmailInputsDetectParams {
    /// Page to scan
    pub page_id: String,

    /// Subtree root: node reference (`node_12`, `12`) or `#id`.
    /// Defaults to the whole document.
    #[serde(default)]
    pub root_id: Option<String>,
}

/// Parameters for email_inputs_explain
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EmailInputsExplainParams {
    /// Page containing the element
    pub page_id: String,

    /// Element to score: node reference (`node_12`, `12`) or `#id`
    pub element_id: String,
}

/// Response for email_inputs_explain
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct EmailInputsExplainResponse {
    /// Page containing the element
    pub page_id: String,

    /// Element as requested
    pub element_id: String,

    /// Per-rule score breakdown
    pub breakdown: ScoreBreakdown,
}
