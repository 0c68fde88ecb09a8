use chrono::{DateTime, Utc};

use crate::models::{Badge, DailyStats, LeaderboardEntry, LevelInfo};

/// Floor of each level, starting at level 1.
pub const LEVEL_THRESHOLDS: [u32; 11] = [
    0, 100, 300, 600, 1000, 1500, 2100, 2800, 3600, 4500, 5500,
];

/// XP width of every level past the end of [`LEVEL_THRESHOLDS`].
pub const XP_PER_LEVEL_BEYOND_TABLE: u32 = 1000;

/// Points for each healthy habit
pub struct PointRewards;

impl PointRewards {
    pub const RESTFUL_SLEEP: u32 = 20;
    pub const HYDRATED: u32 = 15;
    pub const CODING_BOUNDARY: u32 = 10;
    pub const EXERCISE: u32 = 30;
    pub const READING: u32 = 20;
    pub const GOOD_MOOD: u32 = 10;
    pub const LOW_STRESS: u32 = 10;

    /// Best possible day.
    pub const MAX_DAILY: u32 = Self::RESTFUL_SLEEP
        + Self::HYDRATED
        + Self::CODING_BOUNDARY
        + Self::EXERCISE
        + Self::READING
        + Self::GOOD_MOOD
        + Self::LOW_STRESS;
}

pub fn calculate_daily_points(stats: &DailyStats) -> u32 {
    let rules = [
        (
            (7.0..=9.0).contains(&stats.sleep_hours),
            PointRewards::RESTFUL_SLEEP,
        ),
        (stats.water_intake >= 2.0, PointRewards::HYDRATED),
        (stats.coding_hours <= 8.0, PointRewards::CODING_BOUNDARY),
        (stats.did_exercise, PointRewards::EXERCISE),
        (stats.did_read, PointRewards::READING),
        (stats.mood >= 7, PointRewards::GOOD_MOOD),
        (stats.stress_level <= 4, PointRewards::LOW_STRESS),
    ];

    rules
        .into_iter()
        .filter(|(earned, _)| *earned)
        .map(|(_, points)| points)
        .sum()
}

/// Badges the engine knows how to evaluate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BadgeId {
    FirstStep,
    HydrationHero,
    ZenMaster,
    IronBody,
    Bookworm,
}

impl BadgeId {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::FirstStep => "first_step",
            Self::HydrationHero => "hydration_hero",
            Self::ZenMaster => "zen_master",
            Self::IronBody => "iron_body",
            Self::Bookworm => "bookworm",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "first_step" => Some(Self::FirstStep),
            "hydration_hero" => Some(Self::HydrationHero),
            "zen_master" => Some(Self::ZenMaster),
            "iron_body" => Some(Self::IronBody),
            "bookworm" => Some(Self::Bookworm),
            _ => None,
        }
    }

    pub fn all() -> &'static [BadgeId] {
        &[
            Self::FirstStep,
            Self::HydrationHero,
            Self::ZenMaster,
            Self::IronBody,
            Self::Bookworm,
        ]
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::FirstStep => "First Step",
            Self::HydrationHero => "Hydration Hero",
            Self::ZenMaster => "Zen Master",
            Self::IronBody => "Iron Body",
            Self::Bookworm => "Bookworm",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            Self::FirstStep => "Complete your first daily check-in",
            Self::HydrationHero => "Drink more than 2.5L of water in a day",
            Self::ZenMaster => "Report a stress level below 3",
            Self::IronBody => "Exercise and Sleep > 7 hours",
            Self::Bookworm => "Read a book",
        }
    }

    pub fn icon_prompt(&self) -> &'static str {
        match self {
            Self::FirstStep => "cute baby chick hatching form egg doodle thick outlines",
            Self::HydrationHero => "cute water drop superhero character doodle thick outlines",
            Self::ZenMaster => "cute meditating sloth doodle thick outlines",
            Self::IronBody => "cute dumbbell with a face doodle thick outlines",
            Self::Bookworm => "cute worm wearing glasses reading a book doodle thick outlines",
        }
    }

    /// Unlock condition, judged on a single day's stats.
    pub fn is_earned(&self, stats: &DailyStats) -> bool {
        match self {
            // Any check-in counts.
            Self::FirstStep => true,
            Self::HydrationHero => stats.water_intake >= 2.5,
            Self::ZenMaster => stats.stress_level < 3,
            Self::IronBody => stats.did_exercise && stats.sleep_hours >= 7.0,
            Self::Bookworm => stats.did_read,
        }
    }

    pub fn locked_badge(&self) -> Badge {
        Badge {
            id: self.as_str().to_string(),
            name: self.name().to_string(),
            description: self.description().to_string(),
            icon_prompt: self.icon_prompt().to_string(),
            is_unlocked: false,
            unlocked_date: None,
        }
    }
}

/// The default badge set every new user starts with.
pub fn initial_badges() -> Vec<Badge> {
    BadgeId::all().iter().map(BadgeId::locked_badge).collect()
}

/// Returns a copy of `badges` with every newly earned badge unlocked at `now`.
///
/// Unlocked badges are never touched again, so repeated calls with the same
/// stats keep the original unlock time. Badges with unknown ids stay locked.
pub fn check_new_badges_at(
    stats: &DailyStats,
    badges: &[Badge],
    now: DateTime<Utc>,
) -> Vec<Badge> {
    badges
        .iter()
        .map(|badge| {
            if badge.is_unlocked {
                return badge.clone();
            }

            let earned = BadgeId::parse(&badge.id)
                .map(|id| id.is_earned(stats))
                .unwrap_or(false);

            if earned {
                Badge {
                    is_unlocked: true,
                    unlocked_date: Some(now),
                    ..badge.clone()
                }
            } else {
                badge.clone()
            }
        })
        .collect()
}

pub fn check_new_badges(stats: &DailyStats, badges: &[Badge]) -> Vec<Badge> {
    check_new_badges_at(stats, badges, Utc::now())
}

/// Ids of badges unlocked in `after` that were locked in `before`.
pub fn newly_unlocked(before: &[Badge], after: &[Badge]) -> Vec<String> {
    after
        .iter()
        .filter(|badge| badge.is_unlocked)
        .filter(|badge| {
            !before
                .iter()
                .any(|prev| prev.id == badge.id && prev.is_unlocked)
        })
        .map(|badge| badge.id.clone())
        .collect()
}

pub fn level_info(total_points: u32) -> LevelInfo {
    let index = LEVEL_THRESHOLDS
        .iter()
        .rposition(|&floor| total_points >= floor)
        .unwrap_or(0);

    let floor = LEVEL_THRESHOLDS[index];
    let next = LEVEL_THRESHOLDS
        .get(index + 1)
        .copied()
        .unwrap_or(floor + XP_PER_LEVEL_BEYOND_TABLE);

    LevelInfo {
        level: index as u32 + 1,
        current_level_xp: total_points - floor,
        next_level_xp: next - floor,
    }
}

/// A small, fixed field of rivals placed around the user's score.
pub fn mock_leaderboard(user_points: u32) -> Vec<LeaderboardEntry> {
    let field = [
        ("HabitKing", user_points.saturating_add(450), "cute lion king"),
        ("PixelArtist", user_points.saturating_add(210), "cute pixel cat"),
        ("CodeNinja", user_points.saturating_add(80), "cute ninja"),
        ("You", user_points, "cute tomato character"),
        ("SleepyBear", user_points.saturating_sub(120), "cute sleeping bear"),
    ];

    let mut entries: Vec<LeaderboardEntry> = field
        .into_iter()
        .map(|(username, points, subject)| LeaderboardEntry {
            rank: 0,
            username: username.to_string(),
            points,
            avatar_prompt: format!("{subject} doodle thick outlines"),
            is_current_user: username == "You",
        })
        .collect();

    entries.sort_by(|a, b| b.points.cmp(&a.points));
    for (index, entry) in entries.iter_mut().enumerate() {
        entry.rank = index as u32 + 1;
    }
    entries
}
