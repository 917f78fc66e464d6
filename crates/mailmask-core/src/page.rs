//! Page identifiers and detection pass triggers.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an open page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct PageId(Uuid);

impl PageId {
    /// Create a new random page ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for PageId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for PageId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::str::FromStr for PageId {
    type Err = crate::Error;

    fn from_str(s: &str) -> crate::Result<Self> {
        Uuid::parse_str(s)
            .map(Self)
            .map_err(|_| crate::Error::InvalidInput(format!("invalid page id: {s}")))
    }
}

/// What caused a detection pass to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum PassTrigger {
    /// Immediately when the page script is injected
    ScriptLoad,
    /// Once the page has fully loaded
    PageLoad,
    /// After a batch of DOM mutations, scoped to affected form subtrees
    Mutation,
    /// Explicit request that does not mark fields
    Manual,
}

impl std::fmt::Display for PassTrigger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            PassTrigger::ScriptLoad => "script_load",
            PassTrigger::PageLoad => "page_load",
            PassTrigger::Mutation => "mutation",
            PassTrigger::Manual => "manual",
        };
        f.write_str(name)
    }
}

/// Summary of an open page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PageInfo {
    /// Page identifier
    pub page_id: PageId,
    /// Source URL, if the caller supplied one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Number of fields marked as processed so far
    pub processed_fields: usize,
    /// Number of detection passes run on this page
    pub passes: usize,
    /// Whether the page-load pass has already run
    pub loaded: bool,
}
