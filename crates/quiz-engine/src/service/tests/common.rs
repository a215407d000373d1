use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;

use crate::catalog::Catalog;
use crate::engine::likert::{LikertAnswers, Questionnaire};
use crate::engine::profile::ProfileAnswers;
use crate::service::{scoring_router, ScoringService};

pub(super) fn service() -> ScoringService {
    let catalog = Catalog::builtin().expect("embedded catalog parses");
    ScoringService::with_standard_summaries(Arc::new(catalog))
}

pub(super) fn router() -> axum::Router {
    scoring_router(Arc::new(service()))
}

pub(super) fn uniform_answers(questionnaire: &Questionnaire, value: u8) -> LikertAnswers {
    questionnaire
        .questions
        .iter()
        .map(|question| (question.id.clone(), value))
        .collect()
}

/// Travel quiz answers from a `q1..q9` option string such as `"abaaaaaaa"`.
pub(super) fn travel_answers(options: &str) -> ProfileAnswers {
    options
        .chars()
        .enumerate()
        .map(|(index, option)| (format!("q{}", index + 1), option.to_string()))
        .collect()
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 256 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
