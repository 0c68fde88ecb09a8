use std::fmt::Write;

use crate::correlation::{self, MIN_HISTORY};
use crate::history::History;
use crate::models::{InsightType, PredictionResult};
use crate::progress::UserProgress;
use crate::risk;

fn insight_marker(kind: InsightType) -> &'static str {
    match kind {
        InsightType::Positive => "+",
        InsightType::Negative => "-",
        InsightType::Neutral => "~",
    }
}

pub fn build_report(
    history: &History,
    progress: &UserProgress,
    prediction: &PredictionResult,
) -> String {
    let insights = correlation::analyze_correlations(history.logs());
    let level = progress.level_info();

    let mut output = String::new();

    let _ = writeln!(output, "# Daily Habit Report");
    let _ = writeln!(
        output,
        "Burnout model {} ({}, trained {})",
        risk::MODEL_VERSION,
        risk::MODEL_TYPE,
        risk::last_trained()
    );
    let _ = writeln!(output);
    let _ = writeln!(output, "## Burnout Risk");
    let _ = writeln!(
        output,
        "- Score {:.1}/10 ({} risk)",
        prediction.burnout_score, prediction.risk_level
    );

    if prediction.contributors.is_empty() {
        let _ = writeln!(output, "- No warning signs today.");
    } else {
        let _ = writeln!(
            output,
            "- Contributors: {}",
            prediction.contributors.join(", ")
        );
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Progress");
    let _ = writeln!(
        output,
        "- Level {} ({}/{} XP, {:.0}% to next)",
        level.level,
        level.current_level_xp,
        level.next_level_xp,
        level.progress() * 100.0
    );
    let _ = writeln!(output, "- Total points: {}", progress.total_points);
    let _ = writeln!(output, "- Streak: {} check-ins", progress.streak);

    let _ = writeln!(output);
    let _ = writeln!(output, "## Badges");
    for badge in progress.badges.iter() {
        match badge.unlocked_date {
            Some(when) if badge.is_unlocked => {
                let _ = writeln!(
                    output,
                    "- [x] {}: {} (since {})",
                    badge.name,
                    badge.description,
                    when.date_naive()
                );
            }
            _ if badge.is_unlocked => {
                let _ = writeln!(output, "- [x] {}: {}", badge.name, badge.description);
            }
            _ => {
                let _ = writeln!(output, "- [ ] {}: {}", badge.name, badge.description);
            }
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Habit Correlations");

    if history.len() < MIN_HISTORY {
        let _ = writeln!(
            output,
            "Not enough data yet ({} of {} check-ins needed).",
            history.len(),
            MIN_HISTORY
        );
    } else if insights.is_empty() {
        let _ = writeln!(output, "No significant patterns found.");
    } else {
        for insight in insights.iter() {
            let _ = writeln!(
                output,
                "- {} {} (r = {:.2})",
                insight_marker(insight.kind),
                insight.description,
                insight.coefficient
            );
        }
    }

    let _ = writeln!(output);
    let _ = writeln!(output, "## Recent Notes");

    let notes: Vec<_> = history
        .recent(usize::MAX)
        .into_iter()
        .filter_map(|log| log.stats.note.as_deref().map(|note| (log.date, note)))
        .take(5)
        .collect();

    if notes.is_empty() {
        let _ = writeln!(output, "No notes recorded.");
    } else {
        for (date, note) in notes {
            let _ = writeln!(output, "- {}: {}", date, note);
        }
    }

    output
}
