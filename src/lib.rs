pub mod correlation;
pub mod error;
pub mod gamification;
pub mod history;
pub mod models;
pub mod progress;
pub mod report;
pub mod risk;

pub use error::{CheckInError, HistoryError, ProgressError};
pub use history::History;
pub use models::{
    Badge, CorrelationInsight, DailyLog, DailyStats, InsightType, LeaderboardEntry, LevelInfo,
    PredictionResult, RiskLevel,
};
pub use progress::{save_check_in, CheckInOutcome, UserProgress};
pub use risk::BurnoutPredictor;
