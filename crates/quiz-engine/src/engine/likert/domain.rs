use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Selected Likert value per question id.
pub type LikertAnswers = BTreeMap<String, u8>;

/// One selectable point on the answer scale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScaleOption {
    pub value: u8,
    pub label: String,
}

/// The five-point agreement scale shared by every built-in questionnaire.
pub fn default_scale() -> Vec<ScaleOption> {
    [
        (1, "전혀 그렇지 않다"),
        (2, "그렇지 않은 편이다"),
        (3, "보통이다"),
        (4, "대체로 그렇다"),
        (5, "매우 그렇다"),
    ]
    .into_iter()
    .map(|(value, label)| ScaleOption {
        value,
        label: label.to_string(),
    })
    .collect()
}

/// Labeled sub-range `[min, max)` of a dimension's average.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Interpretation {
    pub min: f64,
    pub max: f64,
    pub label: String,
    pub description: String,
}

impl Interpretation {
    pub fn contains(&self, score: f64) -> bool {
        score >= self.min && score < self.max
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    pub id: String,
    pub label: String,
    pub description: String,
    pub interpretations: Vec<Interpretation>,
}

impl Dimension {
    /// First bucket containing `score`, or the last bucket when none does.
    ///
    /// Falling back to the last bucket absorbs scores that land exactly on
    /// (or a hair past) the ceiling of a range list. `None` only for a
    /// dimension without buckets.
    pub fn interpret(&self, score: f64) -> Option<&Interpretation> {
        self.interpretations
            .iter()
            .find(|interpretation| interpretation.contains(score))
            .or_else(|| self.interpretations.last())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LikertQuestion {
    pub id: String,
    pub prompt: String,
    pub dimension: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub helper: Option<String>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub reverse: bool,
}

impl LikertQuestion {
    /// Polarity-corrected value: reverse-keyed items are mirrored across the
    /// scale, so on 1..=5 an answer `v` counts as `6 - v`.
    pub fn effective_value(&self, value: u8, floor: u8, ceiling: u8) -> u16 {
        if self.reverse {
            (u16::from(floor) + u16::from(ceiling)).saturating_sub(u16::from(value))
        } else {
            u16::from(value)
        }
    }
}

/// A Likert questionnaire: questions grouped into scored dimensions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Questionnaire {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub intro: String,
    #[serde(default)]
    pub instructions: String,
    #[serde(default = "default_scale")]
    pub scale: Vec<ScaleOption>,
    pub questions: Vec<LikertQuestion>,
    pub dimensions: Vec<Dimension>,
    #[serde(default)]
    pub result_note: String,
}

impl Questionnaire {
    pub fn scale_floor(&self) -> u8 {
        self.scale.iter().map(|option| option.value).min().unwrap_or(1)
    }

    pub fn scale_ceiling(&self) -> u8 {
        self.scale.iter().map(|option| option.value).max().unwrap_or(5)
    }

    pub fn dimension(&self, id: &str) -> Option<&Dimension> {
        self.dimensions.iter().find(|dimension| dimension.id == id)
    }

    pub fn questions_for<'a>(&'a self, dimension_id: &'a str) -> impl Iterator<Item = &'a LikertQuestion> {
        self.questions
            .iter()
            .filter(move |question| question.dimension == dimension_id)
    }

    /// Whether `value` is a point on this questionnaire's scale.
    pub fn accepts(&self, value: u8) -> bool {
        (self.scale_floor()..=self.scale_ceiling()).contains(&value)
    }

    /// Question ids without an on-scale answer, in declaration order.
    pub fn missing_answers(&self, answers: &LikertAnswers) -> Vec<&str> {
        self.questions
            .iter()
            .filter(|question| {
                !answers
                    .get(&question.id)
                    .is_some_and(|value| self.accepts(*value))
            })
            .map(|question| question.id.as_str())
            .collect()
    }

    pub fn is_complete(&self, answers: &LikertAnswers) -> bool {
        self.missing_answers(answers).is_empty()
    }
}
