use super::domain::{Dimension, Interpretation, LikertAnswers, Questionnaire};
use serde::Serialize;
use std::collections::HashMap;

/// Average score of one dimension and the bucket it falls into.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DimensionResult<'a> {
    pub dimension: &'a Dimension,
    pub average: f64,
    pub interpretation: Option<&'a Interpretation>,
}

impl DimensionResult<'_> {
    pub fn interpretation_label(&self) -> Option<&str> {
        self.interpretation
            .map(|interpretation| interpretation.label.as_str())
    }
}

#[derive(Debug, Default, Clone, Copy)]
struct Tally {
    sum: u32,
    count: u32,
}

impl Tally {
    fn average(self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            f64::from(self.sum) / f64::from(self.count)
        }
    }
}

/// Stateless scorer bound to one questionnaire definition.
pub struct LikertScorer<'a> {
    questionnaire: &'a Questionnaire,
}

impl<'a> LikertScorer<'a> {
    pub fn new(questionnaire: &'a Questionnaire) -> Self {
        Self { questionnaire }
    }

    /// One result per dimension, in declared dimension order.
    ///
    /// Callers are expected to pass a complete answer set. Unanswered and
    /// off-scale entries are left out of the affected dimension's average.
    pub fn score(&self, answers: &LikertAnswers) -> Vec<DimensionResult<'a>> {
        let questionnaire = self.questionnaire;
        let floor = questionnaire.scale_floor();
        let ceiling = questionnaire.scale_ceiling();

        let mut tallies: HashMap<&str, Tally> = HashMap::new();
        for question in &questionnaire.questions {
            let Some(&value) = answers.get(&question.id) else {
                continue;
            };
            if !questionnaire.accepts(value) {
                continue;
            }

            let tally = tallies.entry(question.dimension.as_str()).or_default();
            tally.sum += u32::from(question.effective_value(value, floor, ceiling));
            tally.count += 1;
        }

        questionnaire
            .dimensions
            .iter()
            .map(|dimension| {
                let average = tallies
                    .get(dimension.id.as_str())
                    .copied()
                    .unwrap_or_default()
                    .average();
                DimensionResult {
                    dimension,
                    average,
                    interpretation: dimension.interpret(average),
                }
            })
            .collect()
    }
}

/// Convenience wrapper around [`LikertScorer::score`].
pub fn score_likert<'a>(
    questionnaire: &'a Questionnaire,
    answers: &LikertAnswers,
) -> Vec<DimensionResult<'a>> {
    LikertScorer::new(questionnaire).score(answers)
}
