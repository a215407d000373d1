//! Questionnaire-wide narratives built on top of per-dimension results.
//!
//! Each questionnaire can register one [`SummaryStrategy`]; questionnaires
//! without a registered strategy get no narrative.

use super::scoring::DimensionResult;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::HashMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Narrative {
    pub title: String,
    pub description: String,
}

pub trait SummaryStrategy: Send + Sync {
    /// Called with a non-empty result list.
    fn summarize(&self, results: &[DimensionResult<'_>]) -> Option<Narrative>;
}

/// Highest average first; equal averages keep declaration order.
fn ranked<'r, 'a>(results: &'r [DimensionResult<'a>]) -> Vec<&'r DimensionResult<'a>> {
    let mut sorted: Vec<_> = results.iter().collect();
    sorted.sort_by(|a, b| b.average.partial_cmp(&a.average).unwrap_or(Ordering::Equal));
    sorted
}

fn join_labels<'r, 'a: 'r>(results: impl IntoIterator<Item = &'r DimensionResult<'a>>) -> String {
    results
        .into_iter()
        .map(|result| result.dimension.label.as_str())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Lists dimensions whose interpretation label is one of the alert labels.
pub struct AlertSetSummary {
    alert_labels: Vec<String>,
}

impl AlertSetSummary {
    pub fn new<I, S>(alert_labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            alert_labels: alert_labels.into_iter().map(Into::into).collect(),
        }
    }

    fn is_alert(&self, result: &DimensionResult<'_>) -> bool {
        result
            .interpretation_label()
            .is_some_and(|label| self.alert_labels.iter().any(|alert| alert == label))
    }
}

impl SummaryStrategy for AlertSetSummary {
    fn summarize(&self, results: &[DimensionResult<'_>]) -> Option<Narrative> {
        let alerts: Vec<_> = results.iter().filter(|result| self.is_alert(result)).collect();
        if alerts.is_empty() {
            return Some(Narrative {
                title: "전반적으로 균형이 양호합니다".to_string(),
                description: "각 영역에서 심각한 경고 신호는 나타나지 않았습니다. 지속적으로 컨디션을 기록하며 루틴을 유지해 보세요.".to_string(),
            });
        }

        Some(Narrative {
            title: "집중 관리가 필요한 영역".to_string(),
            description: format!(
                "{} 영역에서 스트레스 신호가 높게 나타났습니다. 전문 지원이나 휴식 계획을 우선순위에 두는 것을 권장합니다.",
                join_labels(alerts)
            ),
        })
    }
}

/// Reports the two highest-scoring dimensions with their averages.
pub struct TopValuesSummary;

impl SummaryStrategy for TopValuesSummary {
    fn summarize(&self, results: &[DimensionResult<'_>]) -> Option<Narrative> {
        let description = ranked(results)
            .into_iter()
            .take(2)
            .map(|result| format!("{} ({:.1})", result.dimension.label, result.average))
            .collect::<Vec<_>>()
            .join(", ");

        Some(Narrative {
            title: "최우선 커리어 가치".to_string(),
            description,
        })
    }
}

/// Reports the single highest-scoring dimension and its interpretation.
pub struct DominantDimensionSummary;

impl SummaryStrategy for DominantDimensionSummary {
    fn summarize(&self, results: &[DimensionResult<'_>]) -> Option<Narrative> {
        let top = *ranked(results).first()?;
        let detail = top
            .interpretation
            .map(|interpretation| interpretation.description.as_str())
            .unwrap_or_default();

        Some(Narrative {
            title: format!("주요 성향: {}", top.dimension.label),
            description: format!(
                "{detail} 다른 유형 점수와의 차이를 참고하여 관계 전략을 조정해 보세요."
            )
            // `detail` is empty for a dimension without buckets.
            .trim_start()
            .to_string(),
        })
    }
}

/// Reports the leading dimension and the runner-up as a combined style.
pub struct LeadingPairSummary;

impl SummaryStrategy for LeadingPairSummary {
    fn summarize(&self, results: &[DimensionResult<'_>]) -> Option<Narrative> {
        let ranked = ranked(results);
        let top = *ranked.first()?;
        let description = match ranked.get(1) {
            Some(second) => format!(
                "{} 스타일이 가장 강하게 나타났고, {}이(가) 그 뒤를 잇습니다. 팀 상황에 따라 두 스타일을 조합해 보세요.",
                top.dimension.label, second.dimension.label
            ),
            None => format!("{} 스타일이 두드러집니다.", top.dimension.label),
        };

        Some(Narrative {
            title: format!("핵심 리더십 스타일: {}", top.dimension.label),
            description,
        })
    }
}

/// Splits dimensions into strengths and focus areas by fixed thresholds.
pub struct StrengthsAndFocusSummary {
    pub strength_at_least: f64,
    pub focus_at_most: f64,
}

impl Default for StrengthsAndFocusSummary {
    fn default() -> Self {
        Self {
            strength_at_least: 3.6,
            focus_at_most: 2.6,
        }
    }
}

impl SummaryStrategy for StrengthsAndFocusSummary {
    fn summarize(&self, results: &[DimensionResult<'_>]) -> Option<Narrative> {
        let strengths: Vec<_> = results
            .iter()
            .filter(|result| result.average >= self.strength_at_least)
            .collect();
        let focus: Vec<_> = results
            .iter()
            .filter(|result| result.average <= self.focus_at_most)
            .collect();

        let mut parts = Vec::new();
        if !strengths.is_empty() {
            parts.push(format!("강점 영역: {}", join_labels(strengths)));
        }
        if !focus.is_empty() {
            parts.push(format!("보완 필요: {}", join_labels(focus)));
        }

        let description = if parts.is_empty() {
            "모든 영역에서 균형 잡힌 성향이 나타났습니다. 지속 가능한 루틴을 유지해 보세요."
                .to_string()
        } else {
            parts.join(" · ")
        };

        Some(Narrative {
            title: "학습 루틴 요약".to_string(),
            description,
        })
    }
}

/// Questionnaire id → summary strategy.
#[derive(Default)]
pub struct SummaryRegistry {
    strategies: HashMap<String, Box<dyn SummaryStrategy>>,
}

impl SummaryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Strategies for the built-in questionnaires.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        registry.register(
            "stress-balance-check",
            AlertSetSummary::new(["경고", "지원 필요", "과부하"]),
        );
        registry.register("career-values-assessment", TopValuesSummary);
        registry.register("attachment-style-check", DominantDimensionSummary);
        registry.register("leadership-style-diagnosis", LeadingPairSummary);
        registry.register("learning-habits-check", StrengthsAndFocusSummary::default());
        registry
    }

    pub fn register<S>(&mut self, questionnaire: impl Into<String>, strategy: S) -> &mut Self
    where
        S: SummaryStrategy + 'static,
    {
        self.strategies
            .insert(questionnaire.into(), Box::new(strategy));
        self
    }

    pub fn contains(&self, questionnaire: &str) -> bool {
        self.strategies.contains_key(questionnaire)
    }

    pub fn summarize(
        &self,
        questionnaire: &str,
        results: &[DimensionResult<'_>],
    ) -> Option<Narrative> {
        if results.is_empty() {
            return None;
        }
        self.strategies.get(questionnaire)?.summarize(results)
    }
}

impl std::fmt::Debug for SummaryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut ids: Vec<_> = self.strategies.keys().collect();
        ids.sort();
        f.debug_struct("SummaryRegistry")
            .field("questionnaires", &ids)
            .finish()
    }
}
