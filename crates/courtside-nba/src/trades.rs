// Trade detection over career-stats records.
//
// A trade is a team change between two chronologically adjacent season rows
// of the same player. `TOT` rows aggregate a season played for several teams
// and never take part in a comparison.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::ingest::PlayerSeasonRecord;
use crate::stats::{per_game, percentage_change, StatSnapshot};

/// Team abbreviation of the aggregate row in multi-team seasons.
pub const AGGREGATE_TEAM: &str = "TOT";

/// Changes smaller than this (in percent) are not called out in summaries.
const SIGNIFICANT_CHANGE_PCT: f64 = 5.0;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A detected move between two adjacent seasons.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeEvent {
    /// `"{player_id}-{from_season}-{to_season}"`
    pub id: String,
    pub player_id: u64,
    pub player_name: String,
    pub from_season: String,
    pub to_season: String,
    pub from_team: String,
    pub to_team: String,
    pub stats_before: StatSnapshot,
    pub stats_after: StatSnapshot,
}

/// A record that passed the eligibility checks for trade detection.
struct SeasonRow<'a> {
    player_id: u64,
    start_year: i32,
    season: &'a str,
    team: &'a str,
    record: &'a PlayerSeasonRecord,
}

impl<'a> SeasonRow<'a> {
    fn from_record(record: &'a PlayerSeasonRecord) -> Option<Self> {
        Some(SeasonRow {
            player_id: record.person_id?,
            start_year: record.start_year()?,
            season: record.season_id.as_deref()?,
            team: record.team.as_deref()?,
            record,
        })
    }

    fn is_aggregate(&self) -> bool {
        self.team == AGGREGATE_TEAM
    }
}

// ---------------------------------------------------------------------------
// Derivation
// ---------------------------------------------------------------------------

/// Per-game snapshot of one season row. Rates are 0 when games played is
/// zero or missing.
pub fn snapshot_of(record: &PlayerSeasonRecord) -> StatSnapshot {
    let games = record.games_played;
    StatSnapshot {
        ppg: per_game(record.points, games),
        rpg: per_game(record.rebounds, games),
        apg: per_game(record.assists, games),
        fg_pct: record.fg_pct.unwrap_or(0.0),
        minutes_per_game: per_game(record.minutes, games),
        games_played: games.map(|g| g.max(0.0).round() as u32).unwrap_or(0),
    }
}

/// Group records by player, order each player's seasons by start year, and
/// emit a `TradeEvent` for every adjacent pair of non-aggregate rows whose
/// teams differ.
///
/// Players are visited in order of first appearance and each player's events
/// come out in chronological order of the from season. Rows sharing a start
/// year keep their input order.
pub fn derive_trades(records: &[PlayerSeasonRecord]) -> Vec<TradeEvent> {
    let mut groups: Vec<Vec<SeasonRow<'_>>> = Vec::new();
    let mut index: HashMap<u64, usize> = HashMap::new();
    let mut skipped = 0usize;

    for record in records {
        let Some(row) = SeasonRow::from_record(record) else {
            skipped += 1;
            continue;
        };
        let slot = *index.entry(row.player_id).or_insert_with(|| {
            groups.push(Vec::new());
            groups.len() - 1
        });
        groups[slot].push(row);
    }

    if skipped > 0 {
        warn!(
            "{} record(s) lack a player id, season or team and were left out of trade detection",
            skipped
        );
    }

    let mut trades = Vec::new();
    for mut seasons in groups {
        seasons.sort_by_key(|row| row.start_year);

        for pair in seasons.windows(2) {
            let (current, next) = (&pair[0], &pair[1]);
            if current.is_aggregate() || next.is_aggregate() {
                continue;
            }
            if current.team == next.team {
                continue;
            }
            trades.push(TradeEvent {
                id: format!("{}-{}-{}", current.player_id, current.season, next.season),
                player_id: current.player_id,
                player_name: current.record.player.clone().unwrap_or_default(),
                from_season: current.season.to_string(),
                to_season: next.season.to_string(),
                from_team: current.team.to_string(),
                to_team: next.team.to_string(),
                stats_before: snapshot_of(current.record),
                stats_after: snapshot_of(next.record),
            });
        }
    }

    debug!(trades = trades.len(), players = index.len(), "derived trade events");
    trades
}

/// All trades of one player, in the order they appear in `trades`.
pub fn lookup(player_id: u64, trades: &[TradeEvent]) -> Vec<&TradeEvent> {
    trades.iter().filter(|t| t.player_id == player_id).collect()
}

// ---------------------------------------------------------------------------
// Before/after analysis
// ---------------------------------------------------------------------------

/// Percentage change of each stat across a trade.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TradeChanges {
    pub ppg: f64,
    pub rpg: f64,
    pub apg: f64,
    pub fg_pct: f64,
    pub mpg: f64,
}

impl TradeChanges {
    fn labelled(&self) -> [(&'static str, f64); 5] {
        [
            ("scoring", self.ppg),
            ("rebounding", self.rpg),
            ("playmaking", self.apg),
            ("shooting efficiency", self.fg_pct),
            ("playing time", self.mpg),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Impact {
    Positive,
    Negative,
    Neutral,
}

impl Impact {
    pub fn label(&self) -> &'static str {
        match self {
            Impact::Positive => "positive",
            Impact::Negative => "negative",
            Impact::Neutral => "neutral",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TradeAnalysis {
    pub changes: TradeChanges,
    /// Weighted blend: 40% scoring, 20% rebounding, 20% playmaking,
    /// 10% shooting, 10% minutes.
    pub overall_change: f64,
    pub impact: Impact,
    pub summary: String,
}

/// Compare a trade's before and after snapshots.
pub fn analyze_trade(trade: &TradeEvent) -> TradeAnalysis {
    let before = trade.stats_before.sanitized();
    let after = trade.stats_after.sanitized();

    let changes = TradeChanges {
        ppg: percentage_change(before.ppg, after.ppg),
        rpg: percentage_change(before.rpg, after.rpg),
        apg: percentage_change(before.apg, after.apg),
        fg_pct: percentage_change(before.fg_pct, after.fg_pct),
        mpg: percentage_change(before.minutes_per_game, after.minutes_per_game),
    };

    let overall_change = changes.ppg * 0.4
        + changes.rpg * 0.2
        + changes.apg * 0.2
        + changes.fg_pct * 0.1
        + changes.mpg * 0.1;

    let impact = if overall_change > 0.0 {
        Impact::Positive
    } else if overall_change < 0.0 {
        Impact::Negative
    } else {
        Impact::Neutral
    };

    let mut summary = format!(
        "{}'s move from {} to {} had a {} impact on their performance.",
        trade.player_name,
        trade.from_team,
        trade.to_team,
        impact.label()
    );

    // Largest magnitude wins; ties keep declaration order.
    let mut most_significant: Option<(&str, f64)> = None;
    for (stat, change) in changes.labelled() {
        if change.abs() <= SIGNIFICANT_CHANGE_PCT {
            continue;
        }
        if most_significant.map_or(true, |(_, best)| change.abs() > best.abs()) {
            most_significant = Some((stat, change));
        }
    }
    if let Some((stat, change)) = most_significant {
        let direction = if change > 0.0 { "increased" } else { "decreased" };
        summary.push_str(&format!(
            " The most significant change was in {stat}, which {direction} by {:.1}%.",
            change.abs()
        ));
    }

    TradeAnalysis {
        changes,
        overall_change,
        impact,
        summary,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
