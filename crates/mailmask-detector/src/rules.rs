//! Weighted rule evaluator.
//!
//! The score of a candidate is the bias plus the weight of every rule whose
//! feature holds. Weights and bias are trained constants and must not be
//! rounded.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use mailmask_core::{Confidence, NodeId};
use mailmask_dom::Document;

use crate::features::{
    attributes_match, label_text_matches, EMAIL_EXACT, EMAIL_SUBSTRING, EXACT_MATCH_ATTRS,
    PLACEHOLDER_ATTRS,
};

/// Constant term added once to every score.
pub const BIAS: f64 = -3.907843589782715;

/// A candidate is an email input when its score is strictly greater than this.
pub const EMAIL_THRESHOLD: f64 = 0.5;

/// Scoring rules, in evaluation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// `id`, `name` or `autocomplete` is exactly "email"/"e-mail"
    InputAttrsMatchEmailExactly,
    /// `placeholder` or `aria-label` mentions email
    InputPlaceholderMatchesEmail,
    /// An associated label mentions email
    LabelForInputMatchesEmail,
}

impl Rule {
    /// All rules in evaluation order.
    pub const ALL: [Rule; 3] = [
        Rule::InputAttrsMatchEmailExactly,
        Rule::InputPlaceholderMatchesEmail,
        Rule::LabelForInputMatchesEmail,
    ];

    /// Stable rule name used in breakdowns and logs.
    pub fn name(&self) -> &'static str {
        match self {
            Rule::InputAttrsMatchEmailExactly => "inputAttrsMatchEmailExactly",
            Rule::InputPlaceholderMatchesEmail => "inputPlaceholderMatchesEmail",
            Rule::LabelForInputMatchesEmail => "labelForInputMatchesEmail",
        }
    }

    /// Trained weight.
    pub fn weight(&self) -> f64 {
        match self {
            Rule::InputAttrsMatchEmailExactly => 9.416913032531738,
            Rule::InputPlaceholderMatchesEmail => 6.740292072296143,
            Rule::LabelForInputMatchesEmail => 10.197700500488281,
        }
    }

    /// Whether the rule's feature holds for `node`.
    pub fn matches(&self, doc: &Document, node: NodeId) -> bool {
        match self {
            Rule::InputAttrsMatchEmailExactly => {
                attributes_match(doc, node, EXACT_MATCH_ATTRS, &EMAIL_EXACT)
            }
            Rule::InputPlaceholderMatchesEmail => {
                attributes_match(doc, node, PLACEHOLDER_ATTRS, &EMAIL_SUBSTRING)
            }
            Rule::LabelForInputMatchesEmail => label_text_matches(doc, node, &EMAIL_SUBSTRING),
        }
    }
}

/// One rule's part in a score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RuleContribution {
    /// Rule name
    pub rule: String,
    /// Whether the feature held
    pub matched: bool,
    /// Rule weight
    pub weight: f64,
    /// Amount added to the score (`weight` or 0)
    pub contribution: f64,
}

/// Per-rule account of a candidate's score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ScoreBreakdown {
    /// Contributions in rule order
    pub rules: Vec<RuleContribution>,
    /// Bias term
    pub bias: f64,
    /// Raw score (bias plus contributions)
    pub score: f64,
    /// Logistic of the raw score
    pub probability: f64,
    /// Whether the score clears the email threshold
    pub is_email: bool,
}

/// Scores candidates with the fixed rule set.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleEvaluator;

impl RuleEvaluator {
    /// Create an evaluator.
    pub fn new() -> Self {
        Self
    }

    /// Raw score for `node`.
    pub fn score(&self, doc: &Document, node: NodeId) -> f64 {
        Rule::ALL
            .iter()
            .filter(|rule| rule.matches(doc, node))
            .fold(BIAS, |acc, rule| acc + rule.weight())
    }

    /// Score for `node` with each rule's contribution.
    pub fn explain(&self, doc: &Document, node: NodeId) -> ScoreBreakdown {
        let rules: Vec<RuleContribution> = Rule::ALL
            .iter()
            .map(|rule| {
                let matched = rule.matches(doc, node);
                RuleContribution {
                    rule: rule.name().to_string(),
                    matched,
                    weight: rule.weight(),
                    contribution: if matched { rule.weight() } else { 0.0 },
                }
            })
            .collect();

        let score = rules.iter().fold(BIAS, |acc, r| acc + r.contribution);

        ScoreBreakdown {
            rules,
            bias: BIAS,
            score,
            probability: probability(score),
            is_email: is_email_score(score),
        }
    }
}

/// Whether a raw score classifies as an email input.
pub fn is_email_score(score: f64) -> bool {
    score > EMAIL_THRESHOLD
}

/// Logistic of a raw score.
pub fn probability(score: f64) -> f64 {
    1.0 / (1.0 + (-score).exp())
}

/// Confidence bucket for a raw score.
pub fn confidence(score: f64) -> Confidence {
    Confidence::from_probability(probability(score))
}
