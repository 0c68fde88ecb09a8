use std::io::{Read, Write};
use std::path::Path;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::HistoryError;
use crate::gamification::calculate_daily_points;
use crate::models::{DailyLog, DailyStats};

/// A user's check-ins in submission order, at most one per date.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct History {
    logs: Vec<DailyLog>,
}

#[derive(Debug, Serialize, Deserialize)]
struct CsvRow {
    date: String,
    sleep_hours: f64,
    coding_hours: f64,
    water_intake: f64,
    mood: i32,
    stress_level: i32,
    did_read: bool,
    did_exercise: bool,
    note: Option<String>,
    points_earned: Option<u32>,
}

impl History {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn logs(&self) -> &[DailyLog] {
        &self.logs
    }

    pub fn len(&self) -> usize {
        self.logs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.logs.is_empty()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&DailyLog> {
        self.logs.iter().find(|log| log.date == date)
    }

    /// Stores `log`, replacing an existing entry for the same date in place.
    /// Returns `true` when an entry was replaced.
    pub fn upsert(&mut self, log: DailyLog) -> bool {
        match self.logs.iter_mut().find(|existing| existing.date == log.date) {
            Some(existing) => {
                debug!(date = %log.date, "replacing same-day check-in");
                *existing = log;
                true
            }
            None => {
                self.logs.push(log);
                false
            }
        }
    }

    /// Logs the day's stats with freshly computed points.
    pub fn record(&mut self, date: NaiveDate, stats: DailyStats) -> bool {
        let points_earned = calculate_daily_points(&stats);
        self.upsert(DailyLog {
            date,
            stats,
            points_earned,
        })
    }

    /// Consistency-graph shade for a day: 0 for no check-in, then 1..=4 by points.
    pub fn heatmap_intensity(&self, date: NaiveDate) -> u8 {
        match self.get(date) {
            None => 0,
            Some(log) => match log.points_earned {
                p if p > 80 => 4,
                p if p > 50 => 3,
                p if p > 20 => 2,
                _ => 1,
            },
        }
    }

    /// The most recent entries by date, newest first.
    pub fn recent(&self, limit: usize) -> Vec<&DailyLog> {
        let mut logs: Vec<&DailyLog> = self.logs.iter().collect();
        logs.sort_by(|a, b| b.date.cmp(&a.date));
        logs.truncate(limit);
        logs
    }

    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Self, HistoryError> {
        let mut reader = csv::Reader::from_reader(reader);
        let mut history = History::new();

        for (index, result) in reader.deserialize::<CsvRow>().enumerate() {
            let row = result?;
            let date = NaiveDate::parse_from_str(row.date.trim(), "%Y-%m-%d").map_err(|_| {
                HistoryError::InvalidDate {
                    row: index + 1,
                    value: row.date.clone(),
                }
            })?;

            let stats = DailyStats {
                sleep_hours: row.sleep_hours,
                coding_hours: row.coding_hours,
                water_intake: row.water_intake,
                mood: row.mood,
                stress_level: row.stress_level,
                did_read: row.did_read,
                did_exercise: row.did_exercise,
                note: row.note.filter(|note| !note.trim().is_empty()),
            };
            let points_earned = row
                .points_earned
                .unwrap_or_else(|| calculate_daily_points(&stats));

            history.upsert(DailyLog {
                date,
                stats,
                points_earned,
            });
        }

        Ok(history)
    }

    pub fn load_csv(path: &Path) -> Result<Self, HistoryError> {
        let file = std::fs::File::open(path)?;
        let history = Self::from_csv_reader(file)?;
        info!(path = %path.display(), logs = history.len(), "loaded history");
        Ok(history)
    }

    /// Like [`History::load_csv`], but a missing file is an empty history.
    pub fn load_csv_or_empty(path: &Path) -> Result<Self, HistoryError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        Self::load_csv(path)
    }

    pub fn write_csv<W: Write>(&self, writer: W) -> Result<(), HistoryError> {
        let mut writer = csv::Writer::from_writer(writer);
        for log in &self.logs {
            writer.serialize(CsvRow {
                date: log.date.format("%Y-%m-%d").to_string(),
                sleep_hours: log.stats.sleep_hours,
                coding_hours: log.stats.coding_hours,
                water_intake: log.stats.water_intake,
                mood: log.stats.mood,
                stress_level: log.stats.stress_level,
                did_read: log.stats.did_read,
                did_exercise: log.stats.did_exercise,
                note: log.stats.note.clone(),
                points_earned: Some(log.points_earned),
            })?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn save_csv(&self, path: &Path) -> Result<(), HistoryError> {
        let file = std::fs::File::create(path)?;
        self.write_csv(file)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 1, day).unwrap()
    }

    fn stats(sleep: f64, mood: i32) -> DailyStats {
        DailyStats {
            sleep_hours: sleep,
            coding_hours: 6.0,
            water_intake: 2.0,
            mood,
            stress_level: 4,
            did_read: false,
            did_exercise: false,
            note: None,
        }
    }

    #[test]
    fn same_day_resubmission_replaces_in_place() {
        let mut history = History::new();
        assert!(!history.record(date(1), stats(6.0, 5)));
        assert!(!history.record(date(2), stats(7.0, 6)));
        assert!(history.record(date(1), stats(8.0, 9)));

        assert_eq!(history.len(), 2);
        assert_eq!(history.logs()[0].date, date(1));
        assert_eq!(history.logs()[0].stats.mood, 9);
        assert_eq!(history.logs()[1].date, date(2));
    }

    #[test]
    fn heatmap_intensity_buckets_points() {
        let mut history = History::new();
        for (day, points) in [(1, 10), (2, 21), (3, 51), (4, 81), (5, 80)] {
            history.upsert(DailyLog {
                date: date(day),
                stats: stats(7.0, 7),
                points_earned: points,
            });
        }

        assert_eq!(history.heatmap_intensity(date(1)), 1);
        assert_eq!(history.heatmap_intensity(date(2)), 2);
        assert_eq!(history.heatmap_intensity(date(3)), 3);
        assert_eq!(history.heatmap_intensity(date(4)), 4);
        assert_eq!(history.heatmap_intensity(date(5)), 3);
        assert_eq!(history.heatmap_intensity(date(9)), 0);
    }

    #[test]
    fn csv_import_recomputes_missing_points() {
        let csv = "\
date,sleep_hours,coding_hours,water_intake,mood,stress_level,did_read,did_exercise,note,points_earned
2026-01-01,8,6,2.5,8,2,true,true,felt great,
2026-01-02,5,10,1,3,8,false,false,,12
2026-01-01,4,10,1,3,8,false,false,redo,
";
        let history = History::from_csv_reader(csv.as_bytes()).unwrap();
        assert_eq!(history.len(), 2);

        let first = history.get(date(1)).unwrap();
        assert_eq!(first.stats.note.as_deref(), Some("redo"));
        assert_eq!(first.points_earned, 0);

        let second = history.get(date(2)).unwrap();
        assert_eq!(second.points_earned, 12);
        assert_eq!(second.stats.note, None);
    }

    #[test]
    fn csv_import_rejects_bad_dates() {
        let csv = "\
date,sleep_hours,coding_hours,water_intake,mood,stress_level,did_read,did_exercise,note,points_earned
01/02/2026,8,6,2.5,8,2,true,true,,
";
        let err = History::from_csv_reader(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, HistoryError::InvalidDate { row: 1, .. }));
    }

    #[test]
    fn csv_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.csv");

        let mut history = History::new();
        history.record(date(3), stats(7.5, 8));
        history.record(date(4), DailyStats {
            note: Some("long day, shipped the release".to_string()),
            ..stats(5.0, 4)
        });
        history.save_csv(&path).unwrap();

        assert_eq!(History::load_csv(&path).unwrap(), history);
    }

    #[test]
    fn recent_is_newest_first() {
        let mut history = History::new();
        history.record(date(2), stats(7.0, 7));
        history.record(date(5), stats(7.0, 7));
        history.record(date(1), stats(7.0, 7));

        let recent: Vec<NaiveDate> = history.recent(2).iter().map(|log| log.date).collect();
        assert_eq!(recent, vec![date(5), date(2)]);
    }
}
