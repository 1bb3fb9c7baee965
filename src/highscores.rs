//! Best score and leaderboard display
//!
//! The local best is persisted to LocalStorage; the shared leaderboard comes
//! from the persistence client and is only formatted here.

use crate::persistence::{RankResponse, ScoreRow};
use crate::platform::storage;

/// Highest score reached on this device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BestScore {
    value: u32,
}

impl BestScore {
    /// LocalStorage key
    const STORAGE_KEY: &'static str = "flappy-best";

    pub fn new(value: u32) -> Self {
        Self { value }
    }

    pub fn value(&self) -> u32 {
        self.value
    }

    /// Raise the best if `score` beats it. Returns true if it did.
    pub fn record(&mut self, score: u32) -> bool {
        if score > self.value {
            self.value = score;
            true
        } else {
            false
        }
    }

    /// Load from storage. Missing or garbage values count as 0.
    pub fn load() -> Self {
        let value = storage::get(Self::STORAGE_KEY)
            .and_then(|raw| raw.trim().parse::<f64>().ok())
            .filter(|v| v.is_finite() && *v >= 0.0)
            .map(|v| v.min(u32::MAX as f64) as u32)
            .unwrap_or(0);
        log::info!("Best score: {value}");
        Self { value }
    }

    pub fn save(&self) {
        if storage::set(Self::STORAGE_KEY, &self.value.to_string()) {
            log::info!("Best score saved ({})", self.value);
        }
    }
}

/// One formatted leaderboard line
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaderboardRow {
    /// 1-indexed
    pub rank: usize,
    pub name: String,
    pub score: u32,
    /// Relative age, e.g. "3 days ago"
    pub when: String,
}

/// Format server rows for display, in the order received
pub fn leaderboard_rows(scores: &[ScoreRow], now_ms: f64) -> Vec<LeaderboardRow> {
    scores
        .iter()
        .enumerate()
        .map(|(i, row)| LeaderboardRow {
            rank: i + 1,
            name: if row.name.trim().is_empty() {
                "Player".to_string()
            } else {
                row.name.clone()
            },
            score: row.score,
            when: relative_age(now_ms, row.created_at),
        })
        .collect()
}

/// "#3 of 120", or a hint when the player has no score yet
pub fn format_rank(rank: &RankResponse) -> String {
    match (rank.has_score, rank.rank) {
        (true, Some(r)) => match rank.total_players {
            Some(total) => format!("#{r} of {total}"),
            None => format!("#{r}"),
        },
        _ => "Unranked".to_string(),
    }
}

/// Human-readable age of a timestamp, both in ms since the epoch
pub fn relative_age(now_ms: f64, timestamp_ms: f64) -> String {
    let diff_ms = (now_ms - timestamp_ms).max(0.0);
    let diff_mins = diff_ms / 60_000.0;
    let diff_hours = diff_mins / 60.0;
    let diff_days = diff_hours / 24.0;

    if diff_days >= 1.0 {
        let days = diff_days.floor() as i64;
        if days == 1 {
            "Yesterday".to_string()
        } else if days < 7 {
            format!("{} days ago", days)
        } else if days < 14 {
            "1 week ago".to_string()
        } else {
            format!("{} weeks ago", days / 7)
        }
    } else if diff_hours >= 1.0 {
        let hours = diff_hours.floor() as i64;
        if hours == 1 {
            "1 hour ago".to_string()
        } else {
            format!("{} hours ago", hours)
        }
    } else if diff_mins >= 1.0 {
        let mins = diff_mins.floor() as i64;
        if mins == 1 {
            "1 min ago".to_string()
        } else {
            format!("{} mins ago", mins)
        }
    } else {
        "Just now".to_string()
    }
}
