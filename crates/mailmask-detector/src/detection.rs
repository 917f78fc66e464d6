//! Core detection types and traits.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, trace};

use mailmask_core::{Confidence, DetectedField, DetectionReason, NodeId};
use mailmask_dom::Document;

use crate::candidates::{
    explicit_email_inputs, is_explicit_email, is_text_like, text_input_candidates,
};
use crate::rules::{confidence, is_email_score, RuleEvaluator};

/// Context passed to each detector.
#[derive(Debug, Clone)]
pub struct DetectionContext {
    /// Subtree root being scanned (excluded from results)
    pub root: NodeId,

    /// Nodes already reported by higher-priority detectors
    pub claimed: HashSet<NodeId>,
}

impl DetectionContext {
    /// Create a new detection context for `root`.
    pub fn new(root: NodeId) -> Self {
        Self {
            root,
            claimed: HashSet::new(),
        }
    }

    /// Check if a node was already reported.
    pub fn is_claimed(&self, node: NodeId) -> bool {
        self.claimed.contains(&node)
    }

    /// Claim a node (prevent other detectors from reporting it).
    ///
    /// Returns `false` if it was already claimed.
    pub fn claim(&mut self, node: NodeId) -> bool {
        self.claimed.insert(node)
    }
}

/// Trait for field detectors.
pub trait FieldDetector: Send + Sync {
    /// Detector name for debugging/logging.
    fn name(&self) -> &'static str;

    /// Priority (higher = runs first, wins duplicate nodes).
    fn priority(&self) -> u32;

    /// Detect fields under `context.root`.
    fn detect(&self, doc: &Document, context: &DetectionContext) -> Vec<DetectedField>;

    /// Whether this detector is enabled.
    fn enabled(&self) -> bool {
        true
    }
}

/// Build the report entry for an explicit `type="email"` input.
pub fn explicit_field(doc: &Document, node: NodeId) -> DetectedField {
    DetectedField {
        node,
        reason: DetectionReason::ExplicitType,
        score: None,
        confidence: Confidence::High,
        descriptor: doc.descriptor(node),
    }
}

/// Build the report entry for a scored input.
pub fn scored_field(doc: &Document, node: NodeId, score: f64) -> DetectedField {
    DetectedField {
        node,
        reason: DetectionReason::Scored,
        score: Some(score),
        confidence: confidence(score),
        descriptor: doc.descriptor(node),
    }
}

/// Reports every `<input type="email">`, unconditionally.
#[derive(Debug, Default, Clone, Copy)]
pub struct ExplicitEmailDetector;

impl ExplicitEmailDetector {
    /// Create a new detector.
    pub fn new() -> Self {
        Self
    }
}

impl FieldDetector for ExplicitEmailDetector {
    fn name(&self) -> &'static str {
        "ExplicitEmailDetector"
    }

    fn priority(&self) -> u32 {
        100
    }

    fn detect(&self, doc: &Document, context: &DetectionContext) -> Vec<DetectedField> {
        explicit_email_inputs(doc, context.root)
            .filter(|&node| !context.is_claimed(node))
            .map(|node| explicit_field(doc, node))
            .collect()
    }
}

/// Scores visible text inputs and reports those above the threshold.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScoredEmailDetector {
    evaluator: RuleEvaluator,
}

impl ScoredEmailDetector {
    /// Create a new detector.
    pub fn new() -> Self {
        Self {
            evaluator: RuleEvaluator::new(),
        }
    }
}

impl FieldDetector for ScoredEmailDetector {
    fn name(&self) -> &'static str {
        "ScoredEmailDetector"
    }

    fn priority(&self) -> u32 {
        50
    }

    fn detect(&self, doc: &Document, context: &DetectionContext) -> Vec<DetectedField> {
        text_input_candidates(doc, context.root)
            .filter(|&node| !context.is_claimed(node))
            .filter_map(|node| {
                let score = self.evaluator.score(doc, node);
                trace!("Scored {} at {:.4}", node, score);
                is_email_score(score).then(|| scored_field(doc, node, score))
            })
            .collect()
    }
}

/// Lazy email-input detection over one subtree.
///
/// Explicit `type="email"` inputs come first, then scored text inputs, each
/// in document order. A node is reported at most once. The iterator reads
/// the document as it is when polled; run a new pass after mutations.
#[derive(Debug, Default, Clone, Copy)]
pub struct EmailInputDetector {
    evaluator: RuleEvaluator,
}

impl EmailInputDetector {
    /// Create a new detector.
    pub fn new() -> Self {
        Self {
            evaluator: RuleEvaluator::new(),
        }
    }

    /// Email inputs under `root`, lazily.
    pub fn iter<'a>(
        &self,
        doc: &'a Document,
        root: NodeId,
    ) -> impl Iterator<Item = DetectedField> + 'a {
        let evaluator = self.evaluator;
        let mut seen = HashSet::new();

        let explicit = explicit_email_inputs(doc, root).map(move |node| explicit_field(doc, node));
        let scored = text_input_candidates(doc, root).filter_map(move |node| {
            let score = evaluator.score(doc, node);
            is_email_score(score).then(|| scored_field(doc, node, score))
        });

        explicit
            .chain(scored)
            .filter(move |field| seen.insert(field.node))
    }

    /// Whether `node` itself would be reported (ignoring the root scope).
    pub fn is_email_input(&self, doc: &Document, node: NodeId) -> bool {
        is_explicit_email(doc, node)
            || (is_text_like(doc, node)
                && doc.is_visible(node)
                && is_email_score(self.evaluator.score(doc, node)))
    }
}

/// Detection pipeline that runs detectors in priority order.
pub struct DetectionPipeline {
    detectors: Vec<Arc<dyn FieldDetector>>,
}

impl DetectionPipeline {
    /// Create a new, empty detection pipeline.
    pub fn new() -> Self {
        Self {
            detectors: Vec::new(),
        }
    }

    /// Pipeline with the explicit and scored email detectors.
    pub fn email_inputs() -> Self {
        let mut pipeline = Self::new();
        pipeline.add_detector(Arc::new(ExplicitEmailDetector::new()));
        pipeline.add_detector(Arc::new(ScoredEmailDetector::new()));
        pipeline
    }

    /// Add a detector to the pipeline.
    pub fn add_detector(&mut self, detector: Arc<dyn FieldDetector>) {
        self.detectors.push(detector);
        // Sort by priority (descending)
        self.detectors
            .sort_by_key(|d| std::cmp::Reverse(d.priority()));
    }

    /// Names of the registered detectors, in run order.
    pub fn detector_names(&self) -> Vec<&'static str> {
        self.detectors.iter().map(|d| d.name()).collect()
    }

    /// Run all detectors under `root`.
    pub fn detect(&self, doc: &Document, root: NodeId) -> Vec<DetectedField> {
        self.detect_roots(doc, &[root])
    }

    /// Run all detectors under each root; a node is reported once across roots.
    pub fn detect_roots(&self, doc: &Document, roots: &[NodeId]) -> Vec<DetectedField> {
        let mut fields = Vec::new();
        let mut claimed = HashSet::new();

        for &root in roots {
            let mut context = DetectionContext::new(root);
            context.claimed = std::mem::take(&mut claimed);

            for detector in &self.detectors {
                if !detector.enabled() {
                    continue;
                }

                let found = detector.detect(doc, &context);
                debug!("{} found {} field(s) under {}", detector.name(), found.len(), root);

                for field in found {
                    if context.claim(field.node) {
                        fields.push(field);
                    }
                }
            }

            claimed = context.claimed;
        }

        fields
    }
}

impl Default for DetectionPipeline {
    fn default() -> Self {
        Self::email_inputs()
    }
}
