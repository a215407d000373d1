//! Multi-axis quizzes: option weights summed per axis, then a single
//! profile picked by rule evaluation, priority order and fallback chain.

mod classifier;
pub mod domain;
pub mod rules;

#[cfg(test)]
mod tests;

pub use classifier::{
    classify_profile, Classification, ClassifierError, CompiledRules, Decision,
    ProfileClassifier,
};
pub use domain::{
    AxisOption, AxisQuestion, AxisScores, FallbackStep, ProfileAnswers, ProfileDefinition,
    ProfileQuiz,
};
pub use rules::{BinaryOp, Expr, Rule, RuleError, Value};
