//! Detected field types produced by the email-input detector.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::{NodeId, PageId, PassTrigger};

/// Detection confidence level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    /// Low confidence (<60% certain)
    Low,
    /// Medium confidence (60-90% certain)
    Medium,
    /// High confidence (>90% certain)
    High,
}

impl Confidence {
    /// Bucket a probability in `[0, 1]`.
    pub fn from_probability(probability: f64) -> Self {
        if probability >= 0.9 {
            Confidence::High
        } else if probability >= 0.6 {
            Confidence::Medium
        } else {
            Confidence::Low
        }
    }
}

/// Why a field was reported as an email input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum DetectionReason {
    /// The input declares `type="email"`
    ExplicitType,
    /// The heuristic score exceeded the threshold
    Scored,
}

/// Identifying attributes of a detected field, for reporting.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct FieldDescriptor {
    /// Lowercase tag name
    pub tag: String,
    /// `id` attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `name` attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `type` attribute
    #[serde(skip_serializing_if = "Option::is_none", rename = "type")]
    pub input_type: Option<String>,
    /// `placeholder` attribute
    #[serde(skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
}

/// A form input classified as an email input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DetectedField {
    /// Node handle in the scanned document
    pub node: NodeId,
    /// Why the field was reported
    pub reason: DetectionReason,
    /// Raw heuristic score (absent for explicit `type="email"`)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Confidence bucket
    pub confidence: Confidence,
    /// Identifying attributes
    pub descriptor: FieldDescriptor,
}

impl DetectedField {
    /// Whether the field was found through an explicit `type="email"`.
    pub fn is_explicit(&self) -> bool {
        self.reason == DetectionReason::ExplicitType
    }
}

/// Result of one detection pass over a page.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct FieldReport {
    /// Page identifier
    pub page_id: PageId,
    /// What triggered the pass
    pub trigger: PassTrigger,
    /// Report timestamp (ISO 8601)
    pub timestamp: String,
    /// Subtree roots the pass scanned
    pub roots: Vec<NodeId>,
    /// Newly reported fields
    pub fields: Vec<DetectedField>,
    /// Fields found again but skipped because they were already processed
    pub skipped: usize,
}

impl FieldReport {
    /// Find a reported field by node id.
    pub fn find_field(&self, node: NodeId) -> Option<&DetectedField> {
        self.fields.iter().find(|f| f.node == node)
    }

    /// Node ids of all reported fields, in report order.
    pub fn nodes(&self) -> Vec<NodeId> {
        self.fields.iter().map(|f| f.node).collect()
    }
}
