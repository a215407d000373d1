use super::domain::{AxisScores, ProfileAnswers, ProfileDefinition, ProfileQuiz};
use super::rules::Rule;
use serde::Serialize;
use std::borrow::Cow;
use std::fmt;
use tracing::{debug, warn};

/// How the classifier arrived at its profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Decision {
    /// Highest-priority profile among the matched rules.
    Priority,
    /// Rules matched but the priority list named none of them.
    FirstMatch,
    /// No rule matched; a fallback step keyed on a top axis applied.
    Fallback { axis: String },
    /// Nothing applied; the first declared profile.
    Default,
}

#[derive(Debug, Clone, Serialize)]
pub struct Classification<'a> {
    pub profile: &'a ProfileDefinition,
    pub scores: AxisScores,
    pub matched: Vec<&'a str>,
    pub decision: Decision,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClassifierError {
    NoProfiles { quiz: String },
}

impl fmt::Display for ClassifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassifierError::NoProfiles { quiz } => {
                write!(f, "quiz '{quiz}' declares no result profiles")
            }
        }
    }
}

impl std::error::Error for ClassifierError {}

/// Parsed profile rules and fallback guards of one quiz, index-aligned with
/// its profiles and fallback steps. A rule that fails to parse is kept as
/// `None` and never matches.
#[derive(Debug, Clone)]
pub struct CompiledRules {
    quiz: String,
    profiles: Vec<Option<Rule>>,
    guards: Vec<Guard>,
}

#[derive(Debug, Clone)]
enum Guard {
    Always,
    Rule(Rule),
    Malformed,
}

impl CompiledRules {
    /// Parses every rule of `quiz`, logging each malformed one.
    pub fn compile(quiz: &ProfileQuiz) -> Self {
        let profiles = quiz
            .profiles
            .iter()
            .map(|definition| compile(&quiz.id, &definition.id, &definition.rule))
            .collect();

        let guards = quiz
            .fallback
            .iter()
            .map(|step| match step.guard.as_deref() {
                None => Guard::Always,
                Some(guard) => match compile(&quiz.id, &step.profile, guard) {
                    Some(rule) => Guard::Rule(rule),
                    None => Guard::Malformed,
                },
            })
            .collect();

        Self {
            quiz: quiz.id.clone(),
            profiles,
            guards,
        }
    }

    /// Number of profile rules and guards that failed to parse.
    pub fn malformed(&self) -> usize {
        let rules = self.profiles.iter().filter(|rule| rule.is_none()).count();
        let guards = self
            .guards
            .iter()
            .filter(|guard| matches!(guard, Guard::Malformed))
            .count();
        rules + guards
    }

    fn fits(&self, quiz: &ProfileQuiz) -> bool {
        self.quiz == quiz.id
            && self.profiles.len() == quiz.profiles.len()
            && self.guards.len() == quiz.fallback.len()
    }
}

/// Rule-based classifier over a quiz and its parsed rules.
pub struct ProfileClassifier<'a> {
    quiz: &'a ProfileQuiz,
    default_profile: &'a ProfileDefinition,
    rules: Cow<'a, CompiledRules>,
}

impl<'a> ProfileClassifier<'a> {
    /// Parses the quiz's rules and builds a classifier over them.
    pub fn new(quiz: &'a ProfileQuiz) -> Result<Self, ClassifierError> {
        Self::build(quiz, Cow::Owned(CompiledRules::compile(quiz)))
    }

    /// Reuses rules compiled earlier for `quiz`; rules compiled for a
    /// different quiz shape are recompiled.
    pub fn with_rules(
        quiz: &'a ProfileQuiz,
        rules: &'a CompiledRules,
    ) -> Result<Self, ClassifierError> {
        if rules.fits(quiz) {
            Self::build(quiz, Cow::Borrowed(rules))
        } else {
            Self::new(quiz)
        }
    }

    fn build(quiz: &'a ProfileQuiz, rules: Cow<'a, CompiledRules>) -> Result<Self, ClassifierError> {
        let default_profile = quiz.profiles.first().ok_or_else(|| ClassifierError::NoProfiles {
            quiz: quiz.id.clone(),
        })?;

        Ok(Self {
            quiz,
            default_profile,
            rules,
        })
    }

    /// Sums option weights per axis. Declared axes start at zero; answers
    /// that are missing or name an unknown option contribute nothing.
    pub fn accumulate(&self, answers: &ProfileAnswers) -> AxisScores {
        let mut scores = AxisScores::zeroed(self.quiz.axes.iter().cloned());
        for question in &self.quiz.questions {
            let Some(option) = answers
                .get(&question.id)
                .and_then(|selected| question.option(selected))
            else {
                continue;
            };
            for (axis, weight) in &option.scores {
                scores.add(axis, *weight);
            }
        }
        scores
    }

    /// Profiles whose rule holds, in declaration order.
    pub fn matching(&self, scores: &AxisScores) -> Vec<&'a ProfileDefinition> {
        self.quiz
            .profiles
            .iter()
            .zip(&self.rules.profiles)
            .filter(|&(definition, rule)| {
                rule.as_ref().is_some_and(|rule| match rule.evaluate(scores) {
                    Ok(matched) => matched,
                    Err(err) => {
                        warn!(
                            quiz = %self.quiz.id,
                            profile = %definition.id,
                            error = %err,
                            "profile rule failed to evaluate"
                        );
                        false
                    }
                })
            })
            .map(|(definition, _)| definition)
            .collect()
    }

    pub fn classify(&self, answers: &ProfileAnswers) -> Classification<'a> {
        let scores = self.accumulate(answers);
        let matched = self.matching(&scores);

        let (profile, decision) = if matched.is_empty() {
            self.fallback_profile(&scores)
        } else {
            self.prioritised(&matched)
        };

        debug!(
            quiz = %self.quiz.id,
            profile = %profile.id,
            matched = matched.len(),
            ?decision,
            "profile classified"
        );

        Classification {
            profile,
            matched: matched.iter().map(|profile| profile.id.as_str()).collect(),
            scores,
            decision,
        }
    }

    fn prioritised(&self, matched: &[&'a ProfileDefinition]) -> (&'a ProfileDefinition, Decision) {
        let preferred = self.quiz.priority.iter().find_map(|id| {
            matched
                .iter()
                .copied()
                .find(|profile| &profile.id == id)
        });

        match preferred {
            Some(profile) => (profile, Decision::Priority),
            None => (matched[0], Decision::FirstMatch),
        }
    }

    fn fallback_profile(&self, scores: &AxisScores) -> (&'a ProfileDefinition, Decision) {
        let top = scores.top_axes();

        for (step, guard) in self.quiz.fallback.iter().zip(&self.rules.guards) {
            if !top.contains(&step.axis.as_str()) {
                continue;
            }
            let guard_holds = match guard {
                Guard::Always => true,
                Guard::Rule(rule) => rule.matches(scores),
                Guard::Malformed => false,
            };
            if !guard_holds {
                continue;
            }

            let profile = self.quiz.profile(&step.profile).unwrap_or(self.default_profile);
            return (
                profile,
                Decision::Fallback {
                    axis: step.axis.to_string(),
                },
            );
        }

        (self.default_profile, Decision::Default)
    }
}

fn compile(quiz: &str, profile: &str, source: &str) -> Option<Rule> {
    match Rule::parse(source) {
        Ok(rule) => Some(rule),
        Err(err) => {
            warn!(%quiz, %profile, rule = source, error = %err, "ignoring malformed profile rule");
            None
        }
    }
}

/// Classifies `answers` against `quiz`.
pub fn classify_profile<'a>(
    quiz: &'a ProfileQuiz,
    answers: &ProfileAnswers,
) -> Result<Classification<'a>, ClassifierError> {
    Ok(ProfileClassifier::new(quiz)?.classify(answers))
}
