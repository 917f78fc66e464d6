//! # mailmask-detector
//!
//! Email-input detection engine for mailmask.
//!
//! This crate provides:
//! - Feature extractors over candidate inputs (attribute and label matching)
//! - A weighted rule evaluator with trained weights
//! - Candidate enumeration (explicit `type="email"` and visible text inputs)
//! - A lazy detector entry point and a priority-ordered detection pipeline
//!
//! Detection is synchronous, side-effect free and infallible: malformed or
//! missing attributes read as empty strings and never produce errors.
//!
//! ## Architecture
//!
//! This is Layer 2 in the architecture - it depends on mailmask-core
//! and mailmask-dom to classify form inputs of a parsed document.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod candidates;
pub mod detection;
pub mod features;
pub mod rules;

// Re-export commonly used types
pub use detection::{
    DetectionContext, DetectionPipeline, EmailInputDetector, ExplicitEmailDetector,
    FieldDetector, ScoredEmailDetector,
};
pub use features::{attributes_match, count_regex_matches, label_text_matches};
pub use rules::{Rule, RuleContribution, RuleEvaluator, ScoreBreakdown, BIAS, EMAIL_THRESHOLD};
