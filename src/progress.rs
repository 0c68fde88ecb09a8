use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::{CheckInError, ProgressError};
use crate::gamification::{
    calculate_daily_points, check_new_badges_at, initial_badges, level_info, newly_unlocked,
};
use crate::history::History;
use crate::models::{Badge, DailyStats, LevelInfo};

/// Accumulated totals for one user. Level data is derived from `total_points`
/// on demand and never stored.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProgress {
    pub total_points: u32,
    pub badges: Vec<Badge>,
    pub streak: u32,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CheckInOutcome {
    pub progress: UserProgress,
    pub points_earned: u32,
    pub unlocked: Vec<String>,
    pub level_before: u32,
    pub level_after: u32,
}

impl CheckInOutcome {
    pub fn leveled_up(&self) -> bool {
        self.level_after > self.level_before
    }
}

impl UserProgress {
    pub fn new() -> Self {
        Self {
            total_points: 0,
            badges: initial_badges(),
            streak: 0,
        }
    }

    pub fn level_info(&self) -> LevelInfo {
        level_info(self.total_points)
    }

    /// Applies one completed check-in and returns the advanced progress. `self`
    /// is left untouched.
    pub fn check_in(&self, stats: &DailyStats, now: DateTime<Utc>) -> CheckInOutcome {
        let points_earned = calculate_daily_points(stats);
        let badges = check_new_badges_at(stats, &self.badges, now);
        let unlocked = newly_unlocked(&self.badges, &badges);

        let progress = UserProgress {
            total_points: self.total_points.saturating_add(points_earned),
            badges,
            streak: self.streak.saturating_add(1),
        };

        CheckInOutcome {
            level_before: self.level_info().level,
            level_after: progress.level_info().level,
            points_earned,
            unlocked,
            progress,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ProgressError> {
        let content = std::fs::read_to_string(path)?;
        let progress = serde_json::from_str(&content)?;
        Ok(progress)
    }

    /// Reads progress from `path`, or starts fresh when the file does not exist yet.
    pub fn load_or_new(path: &Path) -> Result<Self, ProgressError> {
        if !path.exists() {
            info!(path = %path.display(), "no progress file yet, starting fresh");
            return Ok(Self::new());
        }
        Self::load(path)
    }

    pub fn save(&self, path: &Path) -> Result<(), ProgressError> {
        let json = self.to_json()?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn to_json(&self) -> Result<String, ProgressError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Writes a check-in's history and progress as one step. Both files are staged
/// next to their targets first, so a failed write leaves the old pair intact.
pub fn save_check_in(
    history: &History,
    history_path: &Path,
    progress: &UserProgress,
    progress_path: &Path,
) -> Result<(), CheckInError> {
    let mut csv = Vec::new();
    history.write_csv(&mut csv)?;
    let json = progress.to_json()?;

    let progress_staged = staging_path(progress_path);
    let history_staged = staging_path(history_path);

    std::fs::write(&progress_staged, json)?;
    if let Err(err) = std::fs::write(&history_staged, csv) {
        let _ = std::fs::remove_file(&progress_staged);
        return Err(err.into());
    }

    std::fs::rename(&progress_staged, progress_path)?;
    std::fs::rename(&history_staged, history_path)?;
    Ok(())
}

fn staging_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Export shape: stored fields plus the derived level data.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ProgressSnapshot<'a> {
    total_points: u32,
    level: u32,
    #[serde(rename = "currentLevelXP")]
    current_level_xp: u32,
    #[serde(rename = "nextLevelXP")]
    next_level_xp: u32,
    badges: &'a [Badge],
    streak: u32,
}

impl Serialize for UserProgress {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let info = self.level_info();
        ProgressSnapshot {
            total_points: self.total_points,
            level: info.level,
            current_level_xp: info.current_level_xp,
            next_level_xp: info.next_level_xp,
            badges: &self.badges,
            streak: self.streak,
        }
        .serialize(serializer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn stats() -> DailyStats {
        DailyStats {
            sleep_hours: 8.0,
            coding_hours: 6.0,
            water_intake: 2.5,
            mood: 8,
            stress_level: 2,
            did_read: true,
            did_exercise: true,
            note: Some("great day".to_string()),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 2, 14, 20, 0, 0).unwrap()
    }

    #[test]
    fn fresh_progress_starts_at_level_one() {
        let progress = UserProgress::new();
        assert_eq!(progress.total_points, 0);
        assert_eq!(progress.streak, 0);
        assert_eq!(progress.badges.len(), 5);
        assert_eq!(
            progress.level_info(),
            LevelInfo {
                level: 1,
                current_level_xp: 0,
                next_level_xp: 100,
            }
        );
    }

    #[test]
    fn check_in_adds_points_streak_and_badges() {
        let start = UserProgress::new();
        let outcome = start.check_in(&stats(), now());

        assert_eq!(outcome.points_earned, 115);
        assert_eq!(outcome.progress.total_points, 115);
        assert_eq!(outcome.progress.streak, 1);
        assert_eq!(outcome.unlocked.len(), 5);
        assert!(outcome.leveled_up());
        assert_eq!(outcome.level_after, 2);

        // the input is untouched
        assert_eq!(start, UserProgress::new());
    }

    #[test]
    fn second_check_in_unlocks_nothing_new() {
        let first = UserProgress::new().check_in(&stats(), now()).progress;
        let outcome = first.check_in(&stats(), now());
        assert!(outcome.unlocked.is_empty());
        assert_eq!(outcome.progress.total_points, 230);
        assert_eq!(outcome.progress.streak, 2);
        assert!(!outcome.leveled_up());
    }

    #[test]
    fn export_includes_derived_level_fields() {
        let progress = UserProgress::new().check_in(&stats(), now()).progress;
        let json = progress.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["totalPoints"], 115);
        assert_eq!(value["level"], 2);
        assert_eq!(value["currentLevelXP"], 15);
        assert_eq!(value["nextLevelXP"], 200);
        assert_eq!(value["badges"][0]["id"], "first_step");
    }

    #[test]
    fn stale_level_fields_are_rederived_on_import() {
        let json = r#"{
            "totalPoints": 320,
            "level": 1,
            "currentLevelXP": 5,
            "nextLevelXP": 100,
            "badges": [],
            "streak": 4
        }"#;
        let progress: UserProgress = serde_json::from_str(json).unwrap();
        assert_eq!(progress.level_info().level, 3);
        assert_eq!(progress.level_info().current_level_xp, 20);
    }

    #[test]
    fn save_and_load_through_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("progress.json");

        let missing = UserProgress::load_or_new(&path).unwrap();
        assert_eq!(missing, UserProgress::new());

        let progress = missing.check_in(&stats(), now()).progress;
        progress.save(&path).unwrap();
        assert_eq!(UserProgress::load(&path).unwrap(), progress);
    }

    #[test]
    fn check_in_saves_history_and_progress_together() {
        let dir = tempfile::tempdir().unwrap();
        let history_path = dir.path().join("history.csv");
        let progress_path = dir.path().join("progress.json");

        let mut history = History::new();
        history.record(now().date_naive(), stats());
        let progress = UserProgress::new().check_in(&stats(), now()).progress;

        save_check_in(&history, &history_path, &progress, &progress_path).unwrap();

        assert_eq!(History::load_csv(&history_path).unwrap(), history);
        assert_eq!(UserProgress::load(&progress_path).unwrap(), progress);
        assert!(!dir.path().join("history.csv.tmp").exists());
        assert!(!dir.path().join("progress.json.tmp").exists());
    }

    #[test]
    fn failed_progress_write_leaves_history_untouched() {
        let dir = tempfile::tempdir().unwrap();
        let history_path = dir.path().join("history.csv");
        let progress_path = dir.path().join("missing").join("progress.json");

        let mut before = History::new();
        before.record(now().date_naive() - chrono::Duration::days(1), stats());
        before.save_csv(&history_path).unwrap();

        let mut after = before.clone();
        after.record(now().date_naive(), stats());
        let progress = UserProgress::new().check_in(&stats(), now()).progress;

        let err = save_check_in(&after, &history_path, &progress, &progress_path);
        assert!(matches!(err, Err(CheckInError::Io(_))));
        assert_eq!(History::load_csv(&history_path).unwrap(), before);
        assert!(!dir.path().join("history.csv.tmp").exists());
    }
}
