//! Likert aggregation: per-dimension averages resolved to interpretation
//! buckets, plus questionnaire-level narratives.

pub mod domain;
pub mod scoring;
pub mod summary;

pub use domain::{
    default_scale, Dimension, Interpretation, LikertAnswers, LikertQuestion, Questionnaire,
    ScaleOption,
};
pub use scoring::{score_likert, DimensionResult, LikertScorer};
pub use summary::{
    AlertSetSummary, DominantDimensionSummary, LeadingPairSummary, Narrative,
    StrengthsAndFocusSummary, SummaryRegistry, SummaryStrategy, TopValuesSummary,
};
