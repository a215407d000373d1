use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::views::{
    AssessmentListing, AssessmentScoreView, CatalogListing, ClassificationView, QuizListing,
};
use super::{ScoringService, ScoringServiceError};
use crate::engine::likert::LikertAnswers;
use crate::engine::profile::ProfileAnswers;

#[derive(Debug, Deserialize)]
pub struct ScoreRequest {
    pub answers: LikertAnswers,
}

#[derive(Debug, Deserialize)]
pub struct ClassifyRequest {
    pub answers: ProfileAnswers,
}

/// Router builder exposing catalog lookups, scoring and classification.
pub fn scoring_router(service: Arc<ScoringService>) -> Router {
    Router::new()
        .route("/api/v1/catalog", get(catalog_handler))
        .route("/api/v1/assessments", get(assessments_handler))
        .route("/api/v1/assessments/:slug", get(assessment_handler))
        .route("/api/v1/assessments/:slug/score", post(score_handler))
        .route("/api/v1/quizzes", get(quizzes_handler))
        .route("/api/v1/quizzes/:quiz_id", get(quiz_handler))
        .route("/api/v1/quizzes/:quiz_id/classify", post(classify_handler))
        .with_state(service)
}

pub(crate) async fn catalog_handler(State(service): State<Arc<ScoringService>>) -> Response {
    let catalog = service.catalog();
    let listing = CatalogListing {
        assessments: catalog.assessments().iter().map(AssessmentListing::from).collect(),
        quizzes: catalog.quizzes().iter().map(QuizListing::from).collect(),
    };
    (StatusCode::OK, axum::Json(listing)).into_response()
}

pub(crate) async fn assessments_handler(State(service): State<Arc<ScoringService>>) -> Response {
    let listing: Vec<_> = service
        .catalog()
        .assessments()
        .iter()
        .map(AssessmentListing::from)
        .collect();
    (StatusCode::OK, axum::Json(listing)).into_response()
}

pub(crate) async fn assessment_handler(
    State(service): State<Arc<ScoringService>>,
    Path(slug): Path<String>,
) -> Response {
    match service.questionnaire(&slug) {
        Ok(questionnaire) => (StatusCode::OK, axum::Json(questionnaire)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn score_handler(
    State(service): State<Arc<ScoringService>>,
    Path(slug): Path<String>,
    axum::Json(request): axum::Json<ScoreRequest>,
) -> Response {
    match service.score_assessment(&slug, &request.answers) {
        Ok(outcome) => {
            let view = AssessmentScoreView::new(&outcome, Utc::now());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

pub(crate) async fn quizzes_handler(State(service): State<Arc<ScoringService>>) -> Response {
    let listing: Vec<_> = service
        .catalog()
        .quizzes()
        .iter()
        .map(QuizListing::from)
        .collect();
    (StatusCode::OK, axum::Json(listing)).into_response()
}

pub(crate) async fn quiz_handler(
    State(service): State<Arc<ScoringService>>,
    Path(quiz_id): Path<String>,
) -> Response {
    match service.quiz(&quiz_id) {
        Ok(quiz) => (StatusCode::OK, axum::Json(quiz)).into_response(),
        Err(err) => error_response(err),
    }
}

pub(crate) async fn classify_handler(
    State(service): State<Arc<ScoringService>>,
    Path(quiz_id): Path<String>,
    axum::Json(request): axum::Json<ClassifyRequest>,
) -> Response {
    match service.classify(&quiz_id, &request.answers) {
        Ok(classification) => {
            let view = ClassificationView::new(&quiz_id, &classification, Utc::now());
            (StatusCode::OK, axum::Json(view)).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: ScoringServiceError) -> Response {
    match err {
        ScoringServiceError::UnknownQuestionnaire(_) | ScoringServiceError::UnknownQuiz(_) => {
            let payload = json!({
                "error": err.to_string(),
            });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        ScoringServiceError::IncompleteAnswers { ref missing } => {
            let payload = json!({
                "error": err.to_string(),
                "missing": missing,
            });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({
                "error": other.to_string(),
            });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
