//! Scoring engine for self-assessment questionnaires.
//!
//! Two instrument families are supported: Likert questionnaires, scored as
//! per-dimension averages with interpretation buckets, and multi-axis
//! profile quizzes, classified by a small rule language.

pub mod catalog;
pub mod config;
pub mod engine;
pub mod error;
pub mod service;
pub mod telemetry;

pub use catalog::Catalog;
pub use error::AppError;
pub use service::{scoring_router, ScoringService, ScoringServiceError};
