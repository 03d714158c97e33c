// Per-game stat snapshots and the arithmetic shared by trade analysis and
// the impact evaluator.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// Per-game averages for one player over one stretch of games.
///
/// `fg_pct` is kept on whatever scale the producer used (0-1 from the career
/// CSV, 0-100 from the sample catalog). Callers must not mix the two.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct StatSnapshot {
    pub ppg: f64,
    pub rpg: f64,
    pub apg: f64,
    pub fg_pct: f64,
    pub minutes_per_game: f64,
    pub games_played: u32,
}

impl StatSnapshot {
    /// Copy of this snapshot with every non-finite rate replaced by 0.
    pub fn sanitized(&self) -> Self {
        StatSnapshot {
            ppg: finite_or_zero(self.ppg),
            rpg: finite_or_zero(self.rpg),
            apg: finite_or_zero(self.apg),
            fg_pct: finite_or_zero(self.fg_pct),
            minutes_per_game: finite_or_zero(self.minutes_per_game),
            games_played: self.games_played,
        }
    }

    /// Unweighted mean of points, rebounds and assists.
    pub fn production_average(&self) -> f64 {
        (self.ppg + self.rpg + self.apg) / 3.0
    }
}

// ---------------------------------------------------------------------------
// Arithmetic helpers
// ---------------------------------------------------------------------------

/// Percentage change from `old` to `new`.
///
/// A zero baseline yields 100 when the new value is positive and 0 otherwise,
/// so the result is finite for any finite input.
pub fn percentage_change(old: f64, new: f64) -> f64 {
    if old == 0.0 {
        return if new > 0.0 { 100.0 } else { 0.0 };
    }
    (new - old) / old * 100.0
}

/// Season total divided by games played. Zero or missing games, or a missing
/// total, give 0.
pub fn per_game(total: Option<f64>, games: Option<f64>) -> f64 {
    match (total, games) {
        (Some(total), Some(games)) if games != 0.0 => finite_or_zero(total / games),
        _ => 0.0,
    }
}

pub(crate) fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Round to one decimal place.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

// ---------------------------------------------------------------------------
// Formatting
// ---------------------------------------------------------------------------

/// Format a stat with one decimal, optionally suffixed with `%`.
pub fn format_stat(value: f64, percent: bool) -> String {
    if percent {
        format!("{value:.1}%")
    } else {
        format!("{value:.1}")
    }
}

/// Format a percentage change with an explicit `+` for gains.
pub fn format_change(value: f64) -> String {
    let sign = if value > 0.0 { "+" } else { "" };
    format!("{sign}{value:.1}%")
}

/// Direction of a percentage change once the ±5% noise band is removed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeTrend {
    Up,
    Down,
    Flat,
}

impl ChangeTrend {
    pub fn classify(change: f64) -> Self {
        if change > 5.0 {
            ChangeTrend::Up
        } else if change < -5.0 {
            ChangeTrend::Down
        } else {
            ChangeTrend::Flat
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            ChangeTrend::Up => "▲",
            ChangeTrend::Down => "▼",
            ChangeTrend::Flat => "·",
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
