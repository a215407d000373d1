use crate::infra::scoring_service;
use chrono::Utc;
use clap::Args;
use quiz_engine::catalog::answers::{read_likert_answers, read_profile_answers};
use quiz_engine::catalog::validation::validate_catalog;
use quiz_engine::config::AppConfig;
use quiz_engine::engine::profile::Decision;
use quiz_engine::error::AppError;
use quiz_engine::service::views::{AssessmentScoreView, ClassificationView};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// Questionnaire slug, e.g. stress-balance-check
    pub(crate) slug: String,
    /// Answer file (.json object or .csv with question,answer columns)
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Print the result as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ClassifyArgs {
    /// Profile quiz id, e.g. travel-train
    pub(crate) quiz: String,
    /// Answer file (.json object or .csv with question,answer columns)
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Print the result as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct ValidateArgs {
    /// Print the report as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) fn run_score(config: &AppConfig, args: ScoreArgs) -> Result<(), AppError> {
    let service = scoring_service(config)?;
    let answers = read_likert_answers(&args.answers)?;
    let outcome = service.score_assessment(&args.slug, &answers)?;
    let view = AssessmentScoreView::new(&outcome, Utc::now());

    if args.json {
        return print_json(&view);
    }

    println!("{}", view.title);
    for result in &view.results {
        println!(
            "- {}: {:.2} -> {}",
            result.dimension_label,
            result.average,
            result.interpretation_label.as_deref().unwrap_or("(no interpretation)")
        );
        if let Some(description) = &result.interpretation_description {
            println!("  {}", description);
        }
    }
    if let Some(summary) = &view.summary {
        println!("\n{}", summary.title);
        println!("{}", summary.description);
    }
    if !view.result_note.is_empty() {
        println!("\n{}", view.result_note);
    }
    Ok(())
}

pub(crate) fn run_classify(config: &AppConfig, args: ClassifyArgs) -> Result<(), AppError> {
    let service = scoring_service(config)?;
    let answers = read_profile_answers(&args.answers)?;
    let classification = service.classify(&args.quiz, &answers)?;
    let view = ClassificationView::new(&args.quiz, &classification, Utc::now());

    if args.json {
        return print_json(&view);
    }

    println!("{} ({})", view.profile.label, view.profile.id);
    if !view.profile.caption.is_empty() {
        println!("{}", view.profile.caption);
    }
    let how = match &view.decision {
        Decision::Priority => format!("highest priority of {} matched rule(s)", view.matched.len()),
        Decision::FirstMatch => "first matched rule".to_string(),
        Decision::Fallback { axis } => format!("no rule matched; top axis '{axis}'"),
        Decision::Default => "no rule or fallback applied; default profile".to_string(),
    };
    println!("Decision: {how}");
    println!("Axis scores:");
    for (axis, score) in view.scores.iter() {
        println!("  - {axis}: {score}");
    }
    Ok(())
}

/// Prints the consistency report; returns whether the catalog is free of
/// errors.
pub(crate) fn run_validate(config: &AppConfig, args: ValidateArgs) -> Result<bool, AppError> {
    let service = scoring_service(config)?;
    let report = validate_catalog(service.catalog());

    if args.json {
        print_json(&report)?;
        return Ok(!report.has_errors());
    }

    let errors = report.errors().count();
    let warnings = report.warnings().count();
    if report.issues.is_empty() {
        println!("Catalog is consistent.");
    } else {
        println!("Found {errors} error(s) and {warnings} warning(s):");
        for issue in &report.issues {
            println!("- {issue}");
        }
    }

    println!("\nInterpretation buckets");
    for questionnaire in service.catalog().assessments() {
        println!(
            "{} ({}): {} dimension(s), {} bucket(s)",
            questionnaire.title,
            questionnaire.slug,
            questionnaire.dimensions.len(),
            report.total_buckets(&questionnaire.slug)
        );
        for dimension in &questionnaire.dimensions {
            println!("  {}:", dimension.label);
            for bucket in &dimension.interpretations {
                println!("    - {} ({}-{})", bucket.label, bucket.min, bucket.max);
            }
        }
    }

    Ok(errors == 0)
}

pub(crate) fn run_list(config: &AppConfig) -> Result<(), AppError> {
    let service = scoring_service(config)?;
    let catalog = service.catalog();

    println!("Likert questionnaires");
    for questionnaire in catalog.assessments() {
        println!(
            "- {}: {} ({} questions)",
            questionnaire.slug,
            questionnaire.title,
            questionnaire.questions.len()
        );
    }
    println!("\nProfile quizzes");
    for quiz in catalog.quizzes() {
        println!(
            "- {}: {} ({} questions, {} profiles)",
            quiz.id,
            quiz.title,
            quiz.questions.len(),
            quiz.profiles.len()
        );
    }
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<(), AppError> {
    let rendered = serde_json::to_string_pretty(value).map_err(std::io::Error::from)?;
    println!("{rendered}");
    Ok(())
}
