use chrono::{DateTime, Utc};
use serde::Serialize;

use super::AssessmentOutcome;
use crate::engine::likert::{DimensionResult, Narrative, Questionnaire};
use crate::engine::profile::{AxisScores, Classification, Decision, ProfileDefinition, ProfileQuiz};

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentListing {
    pub slug: String,
    pub title: String,
    pub intro: String,
    pub question_count: usize,
    pub dimension_count: usize,
}

impl From<&Questionnaire> for AssessmentListing {
    fn from(questionnaire: &Questionnaire) -> Self {
        Self {
            slug: questionnaire.slug.clone(),
            title: questionnaire.title.clone(),
            intro: questionnaire.intro.clone(),
            question_count: questionnaire.questions.len(),
            dimension_count: questionnaire.dimensions.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct QuizListing {
    pub id: String,
    pub title: String,
    pub question_count: usize,
    pub profile_count: usize,
}

impl From<&ProfileQuiz> for QuizListing {
    fn from(quiz: &ProfileQuiz) -> Self {
        Self {
            id: quiz.id.clone(),
            title: quiz.title.clone(),
            question_count: quiz.questions.len(),
            profile_count: quiz.profiles.len(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogListing {
    pub assessments: Vec<AssessmentListing>,
    pub quizzes: Vec<QuizListing>,
}

#[derive(Debug, Clone, Serialize)]
pub struct DimensionResultView {
    pub dimension_id: String,
    pub dimension_label: String,
    pub average: f64,
    pub interpretation_label: Option<String>,
    pub interpretation_description: Option<String>,
}

impl From<&DimensionResult<'_>> for DimensionResultView {
    fn from(result: &DimensionResult<'_>) -> Self {
        Self {
            dimension_id: result.dimension.id.clone(),
            dimension_label: result.dimension.label.clone(),
            average: result.average,
            interpretation_label: result.interpretation.map(|bucket| bucket.label.clone()),
            interpretation_description: result
                .interpretation
                .map(|bucket| bucket.description.clone()),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct AssessmentScoreView {
    pub slug: String,
    pub title: String,
    pub results: Vec<DimensionResultView>,
    pub summary: Option<Narrative>,
    pub result_note: String,
    pub scored_at: DateTime<Utc>,
}

impl AssessmentScoreView {
    pub fn new(outcome: &AssessmentOutcome<'_>, scored_at: DateTime<Utc>) -> Self {
        Self {
            slug: outcome.questionnaire.slug.clone(),
            title: outcome.questionnaire.title.clone(),
            results: outcome.results.iter().map(DimensionResultView::from).collect(),
            summary: outcome.summary.clone(),
            result_note: outcome.questionnaire.result_note.clone(),
            scored_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ClassificationView {
    pub quiz_id: String,
    pub profile: ProfileDefinition,
    pub scores: AxisScores,
    pub matched: Vec<String>,
    pub decision: Decision,
    pub scored_at: DateTime<Utc>,
}

impl ClassificationView {
    pub fn new(
        quiz_id: &str,
        classification: &Classification<'_>,
        scored_at: DateTime<Utc>,
    ) -> Self {
        Self {
            quiz_id: quiz_id.to_string(),
            profile: classification.profile.clone(),
            scores: classification.scores.clone(),
            matched: classification
                .matched
                .iter()
                .map(|id| (*id).to_string())
                .collect(),
            decision: classification.decision.clone(),
            scored_at,
        }
    }
}
