use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Selected option id per question id.
pub type ProfileAnswers = BTreeMap<String, String>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisOption {
    pub id: String,
    pub text: String,
    /// Weight added to each named axis when this option is chosen.
    pub scores: BTreeMap<String, f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisQuestion {
    pub id: String,
    pub text: String,
    pub options: Vec<AxisOption>,
}

impl AxisQuestion {
    pub fn option(&self, id: &str) -> Option<&AxisOption> {
        self.options.iter().find(|option| option.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileDefinition {
    pub id: String,
    pub label: String,
    pub rule: String,
    #[serde(default)]
    pub caption: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub characteristics: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_style: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub recommended_destinations: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub travel_tips: Vec<String>,
}

/// One step of the no-match fallback chain: when `axis` is among the
/// highest-scoring axes and `guard` (if any) holds, pick `profile`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FallbackStep {
    pub axis: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guard: Option<String>,
    pub profile: String,
}

/// A multi-axis quiz whose result is a single rule-selected profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileQuiz {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Axes initialised to zero before answers are tallied.
    #[serde(default)]
    pub axes: Vec<String>,
    pub questions: Vec<AxisQuestion>,
    pub profiles: Vec<ProfileDefinition>,
    /// Profile ids, most preferred first, used when several rules match.
    #[serde(default)]
    pub priority: Vec<String>,
    #[serde(default)]
    pub fallback: Vec<FallbackStep>,
    #[serde(default)]
    pub scoring_note: String,
}

impl ProfileQuiz {
    pub fn profile(&self, id: &str) -> Option<&ProfileDefinition> {
        self.profiles.iter().find(|profile| profile.id == id)
    }

    /// Question ids whose answer is absent or names no existing option.
    pub fn missing_answers(&self, answers: &ProfileAnswers) -> Vec<&str> {
        self.questions
            .iter()
            .filter(|question| {
                answers
                    .get(&question.id)
                    .and_then(|option| question.option(option))
                    .is_none()
            })
            .map(|question| question.id.as_str())
            .collect()
    }

    pub fn is_complete(&self, answers: &ProfileAnswers) -> bool {
        self.missing_answers(answers).is_empty()
    }
}

/// Running totals per axis name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AxisScores(BTreeMap<String, f64>);

impl AxisScores {
    /// Every named axis present with a zero score.
    pub fn zeroed<I, S>(axes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        axes.into_iter().map(|axis| (axis.into(), 0.0)).collect()
    }

    pub fn get(&self, axis: &str) -> Option<f64> {
        self.0.get(axis).copied()
    }

    pub fn add(&mut self, axis: &str, weight: f64) {
        match self.0.get_mut(axis) {
            Some(total) => *total += weight,
            None => {
                self.0.insert(axis.to_string(), weight);
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(axis, value)| (axis.as_str(), *value))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn max_value(&self) -> Option<f64> {
        self.0.values().copied().reduce(f64::max)
    }

    /// Axes sharing the maximum score, in name order.
    #[allow(clippy::float_cmp)]
    pub fn top_axes(&self) -> Vec<&str> {
        let Some(max) = self.max_value() else {
            return Vec::new();
        };
        self.iter()
            .filter(|(_, value)| *value == max)
            .map(|(axis, _)| axis)
            .collect()
    }
}

impl FromIterator<(String, f64)> for AxisScores {
    fn from_iter<T: IntoIterator<Item = (String, f64)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}
