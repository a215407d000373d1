//! Scoring service shared by the HTTP router and the CLI.

pub mod router;
pub mod views;

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::catalog::Catalog;
use crate::engine::likert::{
    DimensionResult, LikertAnswers, LikertScorer, Narrative, Questionnaire, SummaryRegistry,
};
use crate::engine::profile::{
    Classification, ClassifierError, CompiledRules, ProfileAnswers, ProfileClassifier,
    ProfileQuiz,
};

pub use router::scoring_router;

#[derive(Debug, thiserror::Error)]
pub enum ScoringServiceError {
    #[error("unknown questionnaire '{0}'")]
    UnknownQuestionnaire(String),
    #[error("unknown quiz '{0}'")]
    UnknownQuiz(String),
    #[error("answers missing for {} question(s): {}", .missing.len(), .missing.join(", "))]
    IncompleteAnswers { missing: Vec<String> },
    #[error(transparent)]
    Classifier(#[from] ClassifierError),
}

/// Per-dimension results plus the questionnaire-wide narrative.
#[derive(Debug, Clone)]
pub struct AssessmentOutcome<'a> {
    pub questionnaire: &'a Questionnaire,
    pub results: Vec<DimensionResult<'a>>,
    pub summary: Option<Narrative>,
}

/// Service wiring the catalog to the scorers and summary strategies.
#[derive(Debug)]
pub struct ScoringService {
    catalog: Arc<Catalog>,
    summaries: SummaryRegistry,
    rules: HashMap<String, CompiledRules>,
}

impl ScoringService {
    /// Parses every profile quiz's rules once; requests reuse them.
    pub fn new(catalog: Arc<Catalog>, summaries: SummaryRegistry) -> Self {
        let rules = catalog
            .quizzes()
            .iter()
            .map(|quiz| (quiz.id.clone(), CompiledRules::compile(quiz)))
            .collect();
        Self {
            catalog,
            summaries,
            rules,
        }
    }

    /// Service using the narratives registered for the built-in questionnaires.
    pub fn with_standard_summaries(catalog: Arc<Catalog>) -> Self {
        Self::new(catalog, SummaryRegistry::standard())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn questionnaire(&self, slug: &str) -> Result<&Questionnaire, ScoringServiceError> {
        self.catalog
            .assessment(slug)
            .ok_or_else(|| ScoringServiceError::UnknownQuestionnaire(slug.to_string()))
    }

    pub fn quiz(&self, id: &str) -> Result<&ProfileQuiz, ScoringServiceError> {
        self.catalog
            .quiz(id)
            .ok_or_else(|| ScoringServiceError::UnknownQuiz(id.to_string()))
    }

    /// Rules parsed for `quiz_id` when the service was built.
    pub fn compiled_rules(&self, quiz_id: &str) -> Option<&CompiledRules> {
        self.rules.get(quiz_id)
    }

    /// Scores a complete answer set; partial submissions are refused.
    pub fn score_assessment(
        &self,
        slug: &str,
        answers: &LikertAnswers,
    ) -> Result<AssessmentOutcome<'_>, ScoringServiceError> {
        let questionnaire = self.questionnaire(slug)?;
        let missing = questionnaire.missing_answers(answers);
        if !missing.is_empty() {
            return Err(incomplete(missing));
        }

        let results = LikertScorer::new(questionnaire).score(answers);
        let summary = self.summaries.summarize(&questionnaire.slug, &results);
        debug!(
            questionnaire = %questionnaire.slug,
            dimensions = results.len(),
            summarized = summary.is_some(),
            "assessment scored"
        );

        Ok(AssessmentOutcome {
            questionnaire,
            results,
            summary,
        })
    }

    pub fn classify(
        &self,
        quiz_id: &str,
        answers: &ProfileAnswers,
    ) -> Result<Classification<'_>, ScoringServiceError> {
        let quiz = self.quiz(quiz_id)?;
        let missing = quiz.missing_answers(answers);
        if !missing.is_empty() {
            return Err(incomplete(missing));
        }

        let classifier = match self.rules.get(quiz_id) {
            Some(rules) => ProfileClassifier::with_rules(quiz, rules)?,
            None => ProfileClassifier::new(quiz)?,
        };
        Ok(classifier.classify(answers))
    }
}

fn incomplete(missing: Vec<&str>) -> ScoringServiceError {
    ScoringServiceError::IncompleteAnswers {
        missing: missing.into_iter().map(str::to_string).collect(),
    }
}

#[cfg(test)]
mod tests;
