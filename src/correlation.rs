use tracing::debug;

use crate::models::{CorrelationInsight, DailyLog, InsightType};
use crate::risk::round_to;

/// Below this many logs the engine reports nothing.
pub const MIN_HISTORY: usize = 3;

/// `|r|` must be strictly greater than this to be reported.
pub const SIGNIFICANCE_THRESHOLD: f64 = 0.3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Feature {
    Sleep,
    Mood,
    Coding,
    Stress,
    Water,
    Exercise,
}

impl Feature {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Sleep => "Sleep",
            Self::Mood => "Mood",
            Self::Coding => "Coding",
            Self::Stress => "Stress",
            Self::Water => "Water",
            Self::Exercise => "Exercise",
        }
    }

    fn extract(&self, history: &[DailyLog]) -> Vec<f64> {
        history
            .iter()
            .map(|log| {
                let stats = &log.stats;
                match self {
                    Self::Sleep => stats.sleep_hours,
                    Self::Mood => stats.mood as f64,
                    Self::Coding => stats.coding_hours,
                    Self::Stress => stats.stress_level as f64,
                    Self::Water => stats.water_intake,
                    Self::Exercise => {
                        if stats.did_exercise {
                            1.0
                        } else {
                            0.0
                        }
                    }
                }
            })
            .collect()
    }
}

/// Pairs in evaluation order. Ties in the ranking keep this order.
pub const PAIRS: [(Feature, Feature); 4] = [
    (Feature::Sleep, Feature::Mood),
    (Feature::Coding, Feature::Stress),
    (Feature::Water, Feature::Mood),
    (Feature::Exercise, Feature::Mood),
];

pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Pearson coefficient with population means. Returns 0 for empty or mismatched
/// input and whenever either series has no variance.
pub fn pearson(x: &[f64], y: &[f64]) -> f64 {
    if x.len() != y.len() || x.is_empty() {
        return 0.0;
    }

    let mu_x = mean(x);
    let mu_y = mean(y);

    let mut numerator = 0.0;
    let mut sum_sq_x = 0.0;
    let mut sum_sq_y = 0.0;

    for (xi, yi) in x.iter().zip(y) {
        let dx = xi - mu_x;
        let dy = yi - mu_y;
        numerator += dx * dy;
        sum_sq_x += dx * dx;
        sum_sq_y += dy * dy;
    }

    let denominator = (sum_sq_x * sum_sq_y).sqrt();
    if denominator == 0.0 || !denominator.is_finite() {
        return 0.0;
    }

    (numerator / denominator).clamp(-1.0, 1.0)
}

pub fn is_significant(r: f64) -> bool {
    r.abs() > SIGNIFICANCE_THRESHOLD
}

/// Healthiness of a relationship given which feature moves and in which direction.
pub fn classify(target: Feature, r: f64) -> InsightType {
    match (target, r > 0.0) {
        (Feature::Stress, true) => InsightType::Negative,
        (Feature::Stress, false) => InsightType::Positive,
        (Feature::Mood, true) => InsightType::Positive,
        (Feature::Mood, false) => InsightType::Negative,
        _ => InsightType::Neutral,
    }
}

pub fn analyze_correlations(history: &[DailyLog]) -> Vec<CorrelationInsight> {
    if history.len() < MIN_HISTORY {
        debug!(
            logs = history.len(),
            "not enough history for correlation analysis"
        );
        return Vec::new();
    }

    let mut insights: Vec<CorrelationInsight> = PAIRS
        .iter()
        .filter_map(|(a, b)| {
            let r = pearson(&a.extract(history), &b.extract(history));
            debug!(feature_a = a.label(), feature_b = b.label(), r, "pearson coefficient");

            if !is_significant(r) {
                return None;
            }

            let verb = if r > 0.0 { "increases" } else { "decreases" };
            Some(CorrelationInsight {
                feature_a: a.label().to_string(),
                feature_b: b.label().to_string(),
                coefficient: round_to(r, 2),
                description: format!("{} {} {}", a.label(), verb, b.label()),
                kind: classify(*b, r),
            })
        })
        .collect();

    // sort_by is stable, so equal strengths keep pair order.
    insights.sort_by(|a, b| {
        b.coefficient
            .abs()
            .partial_cmp(&a.coefficient.abs())
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    insights
}
