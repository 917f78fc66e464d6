//! Node handles into a parsed document.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Handle to a node inside a document arena.
///
/// Ids are assigned in document (pre-order) order when the document is
/// parsed, so comparing two ids of the same parse compares document position.
/// Nodes appended later by mutation get larger ids than every existing node.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct NodeId(usize);

impl NodeId {
    /// Create a node id from an arena index.
    pub fn new(index: usize) -> Self {
        Self(index)
    }

    /// The document root node.
    pub fn root() -> Self {
        Self(0)
    }

    /// Arena index of this node.
    pub fn index(&self) -> usize {
        self.0
    }

    /// Whether this is the document root.
    pub fn is_root(&self) -> bool {
        self.0 == 0
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "node_{}", self.0)
    }
}

impl std::str::FromStr for NodeId {
    type Err = crate::Error;

    /// Parse either `node_12` or a bare `12`.
    fn from_str(s: &str) -> crate::Result<Self> {
        let digits = s.trim().strip_prefix("node_").unwrap_or(s.trim());
        digits
            .parse::<usize>()
            .map(Self)
            .map_err(|_| crate::Error::InvalidInput(format!("invalid node id: {s}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root() {
        assert!(NodeId::root().is_root());
        assert!(!NodeId::new(3).is_root());
    }

    #[test]
    fn test_ordering_follows_index() {
        assert!(NodeId::new(1) < NodeId::new(2));
    }

    #[test]
    fn test_display_and_parse() {
        let id = NodeId::new(42);
        assert_eq!(id.to_string(), "node_42");
        assert_eq!("node_42".parse::<NodeId>().unwrap(), id);
        assert_eq!("42".parse::<NodeId>().unwrap(), id);
        assert!("node_x".parse::<NodeId>().is_err());
    }

    #[test]
    fn test_serializes_as_number() {
        let json = serde_json::to_string(&NodeId::new(7)).unwrap();
        assert_eq!(json, "7");
    }
}
