//! Consistency checks over catalog definitions.
//!
//! Likert checks make sure every reachable dimension average maps to exactly
//! one interpretation bucket; profile quiz checks catch rules and references
//! that would silently never fire.

use super::Catalog;
use crate::engine::likert::{Dimension, Interpretation, Questionnaire};
use crate::engine::profile::{ProfileQuiz, Rule};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;

const TOLERANCE: f64 = 1e-9;
/// Headroom past the scale ceiling the last bucket is measured against.
const CEILING_HEADROOM: f64 = 0.1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueSeverity {
    Error,
    Warning,
}

impl IssueSeverity {
    pub fn label(self) -> &'static str {
        match self {
            IssueSeverity::Error => "error",
            IssueSeverity::Warning => "warning",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationIssue {
    /// Questionnaire slug or profile quiz id.
    pub definition: String,
    /// Dimension, question or profile the issue is about.
    pub subject: String,
    pub message: String,
    pub severity: IssueSeverity,
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {}: {}",
            self.severity.label(),
            self.definition,
            self.subject,
            self.message
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketCount {
    pub questionnaire: String,
    pub dimension: String,
    pub buckets: usize,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationReport {
    pub issues: Vec<ValidationIssue>,
    pub bucket_counts: Vec<BucketCount>,
}

impl ValidationReport {
    pub fn errors(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Error)
    }

    pub fn warnings(&self) -> impl Iterator<Item = &ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.severity == IssueSeverity::Warning)
    }

    pub fn has_errors(&self) -> bool {
        self.errors().next().is_some()
    }

    /// Total interpretation buckets across every dimension of `slug`.
    pub fn total_buckets(&self, slug: &str) -> usize {
        self.bucket_counts
            .iter()
            .filter(|count| count.questionnaire == slug)
            .map(|count| count.buckets)
            .sum()
    }
}

struct IssueSink<'a> {
    definition: &'a str,
    issues: Vec<ValidationIssue>,
}

impl<'a> IssueSink<'a> {
    fn new(definition: &'a str) -> Self {
        Self {
            definition,
            issues: Vec::new(),
        }
    }

    fn error(&mut self, subject: &str, message: impl Into<String>) {
        self.push(subject, message.into(), IssueSeverity::Error);
    }

    fn warning(&mut self, subject: &str, message: impl Into<String>) {
        self.push(subject, message.into(), IssueSeverity::Warning);
    }

    fn push(&mut self, subject: &str, message: String, severity: IssueSeverity) {
        self.issues.push(ValidationIssue {
            definition: self.definition.to_string(),
            subject: subject.to_string(),
            message,
            severity,
        });
    }
}

pub fn validate_questionnaire(questionnaire: &Questionnaire) -> Vec<ValidationIssue> {
    let mut sink = IssueSink::new(&questionnaire.slug);
    let floor = f64::from(questionnaire.scale_floor());
    let ceiling = f64::from(questionnaire.scale_ceiling());

    let mut dimension_ids = HashSet::new();
    for dimension in &questionnaire.dimensions {
        if !dimension_ids.insert(dimension.id.as_str()) {
            sink.error(&dimension.id, "dimension declared more than once");
        }
        check_buckets(&mut sink, dimension, floor, ceiling);
    }

    let mut question_ids = HashSet::new();
    let mut per_dimension: HashMap<&str, usize> = HashMap::new();
    for question in &questionnaire.questions {
        if !question_ids.insert(question.id.as_str()) {
            sink.error(&question.id, "question id declared more than once");
        }
        if !dimension_ids.contains(question.dimension.as_str()) {
            sink.error(
                &question.id,
                format!("question references unknown dimension '{}'", question.dimension),
            );
        }
        *per_dimension.entry(question.dimension.as_str()).or_default() += 1;
    }

    for dimension in &questionnaire.dimensions {
        if per_dimension.get(dimension.id.as_str()).copied().unwrap_or(0) == 0 {
            sink.error(&dimension.id, "dimension has no questions");
        }
    }

    sink.issues
}

fn check_buckets(sink: &mut IssueSink<'_>, dimension: &Dimension, floor: f64, ceiling: f64) {
    let subject = dimension.id.as_str();
    if dimension.interpretations.is_empty() {
        sink.error(subject, "dimension has no interpretation buckets");
        return;
    }

    let mut sorted: Vec<&Interpretation> = dimension.interpretations.iter().collect();
    sorted.sort_by(|a, b| a.min.total_cmp(&b.min));

    if (sorted[0].min - floor).abs() > TOLERANCE {
        sink.error(
            subject,
            format!(
                "first bucket starts at {} instead of the scale floor {}",
                sorted[0].min, floor
            ),
        );
    }

    for (index, bucket) in sorted.iter().enumerate() {
        if bucket.min >= bucket.max {
            sink.error(
                subject,
                format!(
                    "bucket '{}' has an empty range ({}-{})",
                    bucket.label, bucket.min, bucket.max
                ),
            );
        }
        match sorted.get(index + 1) {
            Some(next) if (bucket.max - next.min).abs() > TOLERANCE => sink.error(
                subject,
                format!(
                    "buckets are not contiguous: '{}' ({}-{}) is followed by '{}' ({}-{})",
                    bucket.label, bucket.min, bucket.max, next.label, next.min, next.max
                ),
            ),
            Some(_) => {}
            None if bucket.max <= ceiling => sink.error(
                subject,
                format!(
                    "last bucket ends at {} and cannot hold the scale ceiling {}",
                    bucket.max, ceiling
                ),
            ),
            None => {}
        }
    }

    let mut samples: Vec<f64> = Vec::new();
    let mut point = floor;
    while point <= ceiling + TOLERANCE {
        samples.push(point);
        point += 1.0;
    }
    samples.extend(
        sorted
            .iter()
            .map(|bucket| bucket.min)
            .filter(|min| *min >= floor && *min <= ceiling),
    );
    samples.sort_by(f64::total_cmp);
    samples.dedup();

    for score in samples {
        if !dimension
            .interpretations
            .iter()
            .any(|bucket| bucket.contains(score))
        {
            sink.error(subject, format!("score {score} falls outside every bucket"));
        }
    }

    for (index, bucket) in dimension.interpretations.iter().enumerate() {
        let midpoint = (bucket.min + bucket.max.min(ceiling + CEILING_HEADROOM)) / 2.0;
        let resolved = dimension
            .interpretations
            .iter()
            .position(|candidate| candidate.contains(midpoint));
        if resolved != Some(index) {
            let other = resolved
                .map(|position| dimension.interpretations[position].label.as_str())
                .unwrap_or("no bucket");
            sink.error(
                subject,
                format!(
                    "midpoint {midpoint:.2} of '{}' resolves to {other}",
                    bucket.label
                ),
            );
        }
    }
}

pub fn validate_profile_quiz(quiz: &ProfileQuiz) -> Vec<ValidationIssue> {
    let mut sink = IssueSink::new(&quiz.id);

    if quiz.profiles.is_empty() {
        sink.error(&quiz.id, "quiz declares no result profiles");
    }

    let mut known_axes: BTreeSet<&str> = quiz.axes.iter().map(String::as_str).collect();
    let mut question_ids = HashSet::new();
    for question in &quiz.questions {
        if !question_ids.insert(question.id.as_str()) {
            sink.error(&question.id, "question id declared more than once");
        }
        if question.options.is_empty() {
            sink.error(&question.id, "question has no options");
        }
        let mut option_ids = HashSet::new();
        for option in &question.options {
            if !option_ids.insert(option.id.as_str()) {
                sink.error(
                    &question.id,
                    format!("option '{}' declared more than once", option.id),
                );
            }
            known_axes.extend(option.scores.keys().map(String::as_str));
        }
    }

    for profile in &quiz.profiles {
        check_rule(&mut sink, &profile.id, &profile.rule, &known_axes);
    }

    let profile_ids: HashSet<&str> = quiz.profiles.iter().map(|profile| profile.id.as_str()).collect();
    for id in &quiz.priority {
        if !profile_ids.contains(id.as_str()) {
            sink.warning(id, "priority list names an unknown profile");
        }
    }
    for step in &quiz.fallback {
        if !profile_ids.contains(step.profile.as_str()) {
            sink.warning(
                &step.profile,
                "fallback names an unknown profile; the first profile is used instead",
            );
        }
        if !known_axes.contains(step.axis.as_str()) {
            sink.warning(
                &step.profile,
                format!("fallback keyed on unknown axis '{}'", step.axis),
            );
        }
        if let Some(guard) = &step.guard {
            check_rule(&mut sink, &step.profile, guard, &known_axes);
        }
    }

    sink.issues
}

fn check_rule(sink: &mut IssueSink<'_>, subject: &str, source: &str, known_axes: &BTreeSet<&str>) {
    match Rule::parse(source) {
        Ok(rule) => {
            for axis in rule.expr().axes() {
                if !known_axes.contains(axis) {
                    sink.warning(
                        subject,
                        format!("rule '{source}' references unknown axis '{axis}' and never matches"),
                    );
                }
            }
        }
        Err(err) => sink.warning(subject, format!("rule '{source}' does not parse: {err}")),
    }
}

pub fn validate_catalog(catalog: &Catalog) -> ValidationReport {
    let mut report = ValidationReport::default();

    for questionnaire in catalog.assessments() {
        report.issues.extend(validate_questionnaire(questionnaire));
        report
            .bucket_counts
            .extend(questionnaire.dimensions.iter().map(|dimension| BucketCount {
                questionnaire: questionnaire.slug.clone(),
                dimension: dimension.id.clone(),
                buckets: dimension.interpretations.len(),
            }));
    }
    for quiz in catalog.quizzes() {
        report.issues.extend(validate_profile_quiz(quiz));
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::likert::LikertQuestion;
    use crate::engine::profile::FallbackStep;

    fn bucket(min: f64, max: f64, label: &str) -> Interpretation {
        Interpretation {
            min,
            max,
            label: label.to_string(),
            description: String::new(),
        }
    }

    fn questionnaire(buckets: Vec<Interpretation>) -> Questionnaire {
        serde_json::from_value(serde_json::json!({
            "slug": "mini",
            "title": "Mini",
            "questions": [
                { "id": "q1", "prompt": "", "dimension": "FOCUS" }
            ],
            "dimensions": [
                { "id": "FOCUS", "label": "Focus", "description": "", "interpretations": buckets }
            ]
        }))
        .expect("questionnaire parses")
    }

    fn messages(issues: &[ValidationIssue]) -> Vec<&str> {
        issues.iter().map(|issue| issue.message.as_str()).collect()
    }

    #[test]
    fn standard_buckets_pass() {
        let issues = validate_questionnaire(&questionnaire(vec![
            bucket(1.0, 2.6, "low"),
            bucket(2.6, 3.6, "mid"),
            bucket(3.6, 5.1, "high"),
        ]));
        assert!(issues.is_empty(), "unexpected issues: {issues:?}");
    }

    #[test]
    fn gap_between_buckets_is_reported() {
        let issues = validate_questionnaire(&questionnaire(vec![
            bucket(1.0, 2.5, "low"),
            bucket(2.6, 5.1, "high"),
        ]));
        assert!(issues.iter().all(|issue| issue.severity == IssueSeverity::Error));
        assert!(messages(&issues)
            .iter()
            .any(|message| message.contains("not contiguous")));
    }

    #[test]
    fn last_bucket_must_hold_the_ceiling() {
        let issues = validate_questionnaire(&questionnaire(vec![
            bucket(1.0, 3.0, "low"),
            bucket(3.0, 5.0, "high"),
        ]));
        let messages = messages(&issues);
        assert!(messages.iter().any(|message| message.contains("scale ceiling")));
        assert!(messages.iter().any(|message| message.contains("score 5 falls outside")));
    }

    #[test]
    fn first_bucket_must_start_at_the_floor() {
        let issues = validate_questionnaire(&questionnaire(vec![
            bucket(1.5, 3.0, "low"),
            bucket(3.0, 5.1, "high"),
        ]));
        let messages = messages(&issues);
        assert!(messages.iter().any(|message| message.contains("scale floor")));
        assert!(messages.iter().any(|message| message.contains("score 1 falls outside")));
    }

    #[test]
    fn inverted_bucket_is_reported() {
        let issues = validate_questionnaire(&questionnaire(vec![
            bucket(1.0, 3.0, "low"),
            bucket(3.0, 3.0, "empty"),
            bucket(3.0, 5.1, "high"),
        ]));
        assert!(messages(&issues)
            .iter()
            .any(|message| message.contains("'empty' has an empty range")));
    }

    #[test]
    fn dimensions_without_questions_and_orphan_questions_are_errors() {
        let mut questionnaire = questionnaire(vec![bucket(1.0, 5.1, "all")]);
        questionnaire.questions = vec![LikertQuestion {
            id: "q1".to_string(),
            prompt: String::new(),
            dimension: "GHOST".to_string(),
            helper: None,
            reverse: false,
        }];

        let issues = validate_questionnaire(&questionnaire);
        let subjects: Vec<_> = issues.iter().map(|issue| issue.subject.as_str()).collect();
        assert_eq!(subjects, vec!["q1", "FOCUS"]);
    }

    #[test]
    fn profile_quiz_reference_problems_are_warnings() {
        let mut quiz: ProfileQuiz = serde_json::from_value(serde_json::json!({
            "id": "mini-travel",
            "title": "Mini",
            "axes": ["plan", "spont"],
            "questions": [
                { "id": "q1", "text": "", "options": [
                    { "id": "a", "text": "", "scores": { "plan": 1 } },
                    { "id": "b", "text": "", "scores": { "spont": 1 } }
                ]}
            ],
            "profiles": [
                { "id": "planner", "label": "Planner", "rule": "plan >= spont" },
                { "id": "broken", "label": "Broken", "rule": "plan >" },
                { "id": "dreamer", "label": "Dreamer", "rule": "dream > 0" }
            ],
            "priority": ["planner", "ghost"]
        }))
        .expect("quiz parses");
        quiz.fallback = vec![FallbackStep {
            axis: "plan".to_string(),
            guard: None,
            profile: "hermit".to_string(),
        }];

        let issues = validate_profile_quiz(&quiz);
        assert!(issues.iter().all(|issue| issue.severity == IssueSeverity::Warning));
        let subjects: Vec<_> = issues.iter().map(|issue| issue.subject.as_str()).collect();
        assert_eq!(subjects, vec!["broken", "dreamer", "ghost", "hermit"]);
    }

    #[test]
    fn report_counts_buckets_per_dimension() {
        let catalog = Catalog::from_parts(
            vec![questionnaire(vec![
                bucket(1.0, 2.6, "low"),
                bucket(2.6, 3.6, "mid"),
                bucket(3.6, 5.1, "high"),
            ])],
            Vec::new(),
        )
        .expect("catalog");

        let report = validate_catalog(&catalog);
        assert!(!report.has_errors());
        assert_eq!(report.warnings().count(), 0);
        assert_eq!(report.total_buckets("mini"), 3);
        assert_eq!(
            report.bucket_counts,
            vec![BucketCount {
                questionnaire: "mini".to_string(),
                dimension: "FOCUS".to_string(),
                buckets: 3,
            }]
        );
    }
}
