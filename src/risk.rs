use chrono::NaiveDate;
use tracing::debug;

use crate::models::{DailyStats, PredictionResult, RiskLevel};

pub const MODEL_VERSION: &str = "v2.4.1";
pub const MODEL_TYPE: &str = "LinearRegressor (Regularized)";

pub fn last_trained() -> NaiveDate {
    NaiveDate::from_ymd_opt(2023, 10, 15).unwrap_or_default()
}

pub const MIN_SCORE: f64 = 0.0;
pub const MAX_SCORE: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ModelWeights {
    pub sleep: f64,
    pub coding: f64,
    pub water: f64,
    /// Flat bonus, not scaled by duration.
    pub exercise: f64,
    /// Flat bonus, not scaled by duration.
    pub read: f64,
    pub mood: f64,
    pub stress: f64,
    pub bias: f64,
}

pub const WEIGHTS: ModelWeights = ModelWeights {
    sleep: -0.8,
    coding: 0.5,
    water: -0.3,
    exercise: -1.5,
    read: -0.5,
    mood: -0.4,
    stress: 0.7,
    bias: 6.0,
};

/// Stateless burnout model. Cheap to copy and safe to share between threads.
#[derive(Debug, Clone, Copy, Default)]
pub struct BurnoutPredictor;

impl BurnoutPredictor {
    pub fn new() -> Self {
        Self
    }

    pub fn weights(&self) -> &'static ModelWeights {
        &WEIGHTS
    }

    pub fn predict(&self, stats: &DailyStats) -> PredictionResult {
        predict(stats)
    }
}

/// Unclamped linear combination of the day's inputs.
pub fn raw_score(stats: &DailyStats) -> f64 {
    let w = &WEIGHTS;
    let mut score = w.bias;

    score += stats.sleep_hours * w.sleep;
    score += stats.coding_hours * w.coding;
    score += stats.water_intake * w.water;
    score += stats.mood as f64 * w.mood;
    score += stats.stress_level as f64 * w.stress;

    if stats.did_exercise {
        score += w.exercise;
    }
    if stats.did_read {
        score += w.read;
    }

    score
}

pub fn predict(stats: &DailyStats) -> PredictionResult {
    let raw = raw_score(stats);
    let clamped = if raw.is_nan() {
        MIN_SCORE
    } else {
        raw.clamp(MIN_SCORE, MAX_SCORE)
    };
    let risk_level = risk_level_for(clamped);

    debug!(raw, clamped, %risk_level, "burnout score computed");

    PredictionResult {
        burnout_score: round_to(clamped, 1),
        risk_level,
        contributors: contributors(stats),
    }
}

/// Tier for a clamped score. Bands are checked from the most severe down, so a
/// score sitting exactly on a boundary takes the higher tier.
pub fn risk_level_for(score: f64) -> RiskLevel {
    match score {
        s if s >= 8.0 => RiskLevel::Critical,
        s if s >= 6.0 => RiskLevel::High,
        s if s >= 4.0 => RiskLevel::Moderate,
        _ => RiskLevel::Low,
    }
}

/// Labels for the habits that look unhealthy today, in a fixed check order.
pub fn contributors(stats: &DailyStats) -> Vec<String> {
    let checks = [
        (stats.sleep_hours < 6.0, "Lack of Sleep"),
        (stats.coding_hours > 8.0, "Excessive Coding"),
        (stats.stress_level > 7, "High Stress"),
        (!stats.did_exercise, "No Exercise"),
        (stats.mood < 4, "Low Mood"),
    ];

    checks
        .into_iter()
        .filter(|(hit, _)| *hit)
        .map(|(_, label)| label.to_string())
        .collect()
}

/// Rounds from the exact binary value, so 4.35 (stored as 4.3499...) gives 4.3.
pub(crate) fn round_to(value: f64, decimals: usize) -> f64 {
    format!("{value:.decimals$}").parse().unwrap_or(value)
}
