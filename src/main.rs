use std::path::PathBuf;

use anyhow::Context;
use chrono::{Local, NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use habitflow_insights::correlation::analyze_correlations;
use habitflow_insights::gamification::{calculate_daily_points, level_info, mock_leaderboard};
use habitflow_insights::{
    report, risk, save_check_in, BurnoutPredictor, DailyStats, History, UserProgress,
};

#[derive(Parser)]
#[command(name = "habitflow")]
#[command(about = "Burnout prediction and habit insights for daily check-ins", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug, Clone)]
struct StatsArgs {
    /// Hours slept
    #[arg(long, default_value_t = 7.0)]
    sleep: f64,
    /// Hours of focused coding / screen time
    #[arg(long, default_value_t = 6.0)]
    coding: f64,
    /// Liters of water
    #[arg(long, default_value_t = 1.5)]
    water: f64,
    /// Mood from 1 to 10
    #[arg(long, default_value_t = 7, allow_negative_numbers = true)]
    mood: i32,
    /// Stress from 1 to 10
    #[arg(long, default_value_t = 4, allow_negative_numbers = true)]
    stress: i32,
    #[arg(long)]
    read: bool,
    #[arg(long)]
    exercise: bool,
    #[arg(long)]
    note: Option<String>,
}

impl StatsArgs {
    fn into_stats(self) -> DailyStats {
        for (field, value) in [("mood", self.mood), ("stress", self.stress)] {
            if !(1..=10).contains(&value) {
                warn!(field, value, "outside the 1-10 scale, scoring it as given");
            }
        }

        DailyStats {
            sleep_hours: self.sleep,
            coding_hours: self.coding,
            water_intake: self.water,
            mood: self.mood,
            stress_level: self.stress,
            did_read: self.read,
            did_exercise: self.exercise,
            note: self.note,
        }
    }
}

#[derive(Args, Debug, Clone)]
struct HistoryArg {
    /// History CSV file
    #[arg(id = "history", long = "history", env = "HABITFLOW_HISTORY", default_value = "history.csv")]
    path: PathBuf,
}

#[derive(Args, Debug, Clone)]
struct ProgressArg {
    /// Progress JSON file
    #[arg(id = "progress", long = "progress", env = "HABITFLOW_PROGRESS", default_value = "progress.json")]
    path: PathBuf,
}

#[derive(Subcommand)]
enum Commands {
    /// Predict burnout risk for one day
    Predict {
        #[command(flatten)]
        stats: StatsArgs,
        #[arg(long)]
        json: bool,
    },
    /// Points earned for one day
    Points {
        #[command(flatten)]
        stats: StatsArgs,
    },
    /// Level and XP for a point total
    Level {
        #[arg(long)]
        points: u32,
    },
    /// Correlations across the check-in history
    Insights {
        #[command(flatten)]
        history: HistoryArg,
        #[arg(long)]
        json: bool,
    },
    /// Record today's check-in and update progress
    CheckIn {
        #[command(flatten)]
        history: HistoryArg,
        #[command(flatten)]
        progress: ProgressArg,
        /// Check-in date (defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[command(flatten)]
        stats: StatsArgs,
    },
    /// Generate a markdown report
    Report {
        #[command(flatten)]
        history: HistoryArg,
        #[command(flatten)]
        progress: ProgressArg,
        #[command(flatten)]
        stats: StatsArgs,
        #[arg(long, default_value = "report.md")]
        out: PathBuf,
    },
    /// Show where a point total sits among rivals
    Leaderboard {
        #[arg(long)]
        points: u32,
    },
    /// Show burnout model metadata
    Model,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(log_level)),
        )
        .init();

    match cli.command {
        Commands::Predict { stats, json } => {
            let stats = stats.into_stats();
            let result = BurnoutPredictor::new().predict(&stats);

            if json {
                println!("{}", serde_json::to_string_pretty(&result)?);
                return Ok(());
            }

            println!(
                "Burnout score {:.1}/10 ({} risk)",
                result.burnout_score, result.risk_level
            );
            for contributor in result.contributors.iter() {
                println!("- {contributor}");
            }
        }
        Commands::Points { stats } => {
            let points = calculate_daily_points(&stats.into_stats());
            println!("{points} points earned.");
        }
        Commands::Level { points } => {
            let info = level_info(points);
            println!(
                "Level {} ({}/{} XP)",
                info.level, info.current_level_xp, info.next_level_xp
            );
        }
        Commands::Insights {
            history: history_arg,
            json,
        } => {
            let history = History::load_csv(&history_arg.path)
                .with_context(|| format!("failed to load {}", history_arg.path.display()))?;
            let insights = analyze_correlations(history.logs());

            if json {
                println!("{}", serde_json::to_string_pretty(&insights)?);
                return Ok(());
            }

            if insights.is_empty() {
                println!("No significant patterns across {} check-ins.", history.len());
                return Ok(());
            }

            println!("Patterns across {} check-ins:", history.len());
            for insight in insights.iter() {
                println!(
                    "- {} (r = {:.2}, {})",
                    insight.description,
                    insight.coefficient,
                    insight.kind.as_str()
                );
            }
        }
        Commands::CheckIn {
            history: history_arg,
            progress: progress_arg,
            date,
            stats,
        } => {
            let stats = stats.into_stats();
            let date = date.unwrap_or_else(|| Local::now().date_naive());

            let mut history = History::load_csv_or_empty(&history_arg.path)
                .with_context(|| format!("failed to load {}", history_arg.path.display()))?;
            let progress = UserProgress::load_or_new(&progress_arg.path)
                .with_context(|| format!("failed to load {}", progress_arg.path.display()))?;

            if history.record(date, stats.clone()) {
                info!(%date, "replaced earlier check-in for this date");
            }
            let outcome = progress.check_in(&stats, Utc::now());

            save_check_in(
                &history,
                &history_arg.path,
                &outcome.progress,
                &progress_arg.path,
            )
            .with_context(|| {
                format!(
                    "failed to write {} and {}",
                    history_arg.path.display(),
                    progress_arg.path.display()
                )
            })?;

            let prediction = risk::predict(&stats);
            println!(
                "Checked in for {date}: +{} points, burnout {:.1}/10 ({}).",
                outcome.points_earned, prediction.burnout_score, prediction.risk_level
            );
            println!(
                "Total {} points, streak {}.",
                outcome.progress.total_points, outcome.progress.streak
            );
            if outcome.leveled_up() {
                println!("Level up! Now level {}.", outcome.level_after);
            }
            for id in outcome.unlocked.iter() {
                if let Some(badge) = outcome.progress.badges.iter().find(|b| &b.id == id) {
                    println!("Badge unlocked: {}", badge.name);
                }
            }
        }
        Commands::Report {
            history: history_arg,
            progress: progress_arg,
            stats,
            out,
        } => {
            let history = History::load_csv_or_empty(&history_arg.path)
                .with_context(|| format!("failed to load {}", history_arg.path.display()))?;
            let progress = UserProgress::load_or_new(&progress_arg.path)
                .with_context(|| format!("failed to load {}", progress_arg.path.display()))?;
            let prediction = risk::predict(&stats.into_stats());

            let report = report::build_report(&history, &progress, &prediction);
            std::fs::write(&out, report)?;
            println!("Report written to {}.", out.display());
        }
        Commands::Leaderboard { points } => {
            for entry in mock_leaderboard(points) {
                let marker = if entry.is_current_user { "*" } else { " " };
                println!("{marker}{}. {} ({} pts)", entry.rank, entry.username, entry.points);
            }
        }
        Commands::Model => {
            let weights = BurnoutPredictor::new().weights();
            println!(
                "{} {} (trained {})",
                risk::MODEL_TYPE,
                risk::MODEL_VERSION,
                risk::last_trained()
            );
            println!("bias     {:+.1}", weights.bias);
            println!("sleep    {:+.1} per hour", weights.sleep);
            println!("coding   {:+.1} per hour", weights.coding);
            println!("water    {:+.1} per liter", weights.water);
            println!("mood     {:+.1} per point", weights.mood);
            println!("stress   {:+.1} per point", weights.stress);
            println!("exercise {:+.1} flat", weights.exercise);
            println!("read     {:+.1} flat", weights.read);
        }
    }

    Ok(())
}
