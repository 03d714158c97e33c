// Player catalog: the bundled sample players, text search and attribute
// filters.

use std::io::Read;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::stats::StatSnapshot;

const SAMPLE_PLAYERS_JSON: &str = include_str!("../data/sample_players.json");

/// Queries shorter than this (after trimming) match every player.
pub const DEFAULT_MIN_QUERY_LEN: usize = 2;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    #[error("failed to read player catalog {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("invalid player catalog {origin}: {source}")]
    Parse {
        origin: String,
        source: serde_json::Error,
    },
}

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Conference {
    East,
    West,
    #[serde(rename = "N/A")]
    Unaffiliated,
}

impl Conference {
    pub fn label(&self) -> &'static str {
        match self {
            Conference::East => "East",
            Conference::West => "West",
            Conference::Unaffiliated => "N/A",
        }
    }

    /// Case-insensitive inverse of `label`.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "EAST" => Some(Conference::East),
            "WEST" => Some(Conference::West),
            "N/A" => Some(Conference::Unaffiliated),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Position {
    PG,
    SG,
    SF,
    PF,
    C,
    G,
    F,
}

impl Position {
    pub fn label(&self) -> &'static str {
        match self {
            Position::PG => "PG",
            Position::SG => "SG",
            Position::SF => "SF",
            Position::PF => "PF",
            Position::C => "C",
            Position::G => "G",
            Position::F => "F",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        match label.trim().to_ascii_uppercase().as_str() {
            "PG" => Some(Position::PG),
            "SG" => Some(Position::SG),
            "SF" => Some(Position::SF),
            "PF" => Some(Position::PF),
            "C" => Some(Position::C),
            "G" => Some(Position::G),
            "F" => Some(Position::F),
            _ => None,
        }
    }
}

/// Career averages as listed in the catalog. Percentages are on a 0-100
/// scale.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CareerStats {
    pub ppg: f64,
    pub rpg: f64,
    pub apg: f64,
    pub fg_pct: f64,
    pub minutes_per_game: f64,
    pub games_played: u32,
    pub fg3_pct: f64,
    pub ft_pct: f64,
    pub spg: f64,
    pub bpg: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub id: u64,
    pub name: String,
    pub team: String,
    pub conference: Conference,
    pub position: Position,
    pub stats: CareerStats,
}

impl Player {
    /// The subset of career stats the simulators work with.
    pub fn snapshot(&self) -> StatSnapshot {
        StatSnapshot {
            ppg: self.stats.ppg,
            rpg: self.stats.rpg,
            apg: self.stats.apg,
            fg_pct: self.stats.fg_pct,
            minutes_per_game: self.stats.minutes_per_game,
            games_played: self.stats.games_played,
        }
    }

    fn matches_query(&self, needle: &str) -> bool {
        self.name.to_lowercase().contains(needle)
            || self.team.to_lowercase().contains(needle)
            || self.position.label().to_lowercase().contains(needle)
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// The bundled sample catalog.
pub fn sample_players() -> Result<Vec<Player>, CatalogError> {
    serde_json::from_str(SAMPLE_PLAYERS_JSON).map_err(|e| CatalogError::Parse {
        origin: "bundled sample".into(),
        source: e,
    })
}

/// Load a catalog from a JSON file with the same shape as the bundled one.
pub fn load_players(path: &Path) -> Result<Vec<Player>, CatalogError> {
    let file = std::fs::File::open(path).map_err(|e| CatalogError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    load_players_from_reader(file, &path.display().to_string())
}

fn load_players_from_reader<R: Read>(reader: R, origin: &str) -> Result<Vec<Player>, CatalogError> {
    serde_json::from_reader(reader).map_err(|e| CatalogError::Parse {
        origin: origin.to_string(),
        source: e,
    })
}

pub fn find(players: &[Player], id: u64) -> Option<&Player> {
    players.iter().find(|p| p.id == id)
}

// ---------------------------------------------------------------------------
// Search and filters
// ---------------------------------------------------------------------------

/// Case-insensitive substring search over name, team and position.
///
/// A query shorter than `min_len` after trimming matches every player.
pub fn search<'a>(players: &'a [Player], query: &str, min_len: usize) -> Vec<&'a Player> {
    let needle = query.trim().to_lowercase();
    if needle.chars().count() < min_len {
        return players.iter().collect();
    }
    players.iter().filter(|p| p.matches_query(&needle)).collect()
}

/// Career games-played bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GamesPlayedFilter {
    #[default]
    All,
    /// Fewer than 50.
    Below50,
    /// 50 to 70 inclusive.
    #[serde(rename = "50to70")]
    From50To70,
    /// More than 70.
    Above70,
}

impl GamesPlayedFilter {
    pub fn matches(&self, games: u32) -> bool {
        match self {
            GamesPlayedFilter::All => true,
            GamesPlayedFilter::Below50 => games < 50,
            GamesPlayedFilter::From50To70 => (50..=70).contains(&games),
            GamesPlayedFilter::Above70 => games > 70,
        }
    }

    /// Parse the serialized key (`all`, `below50`, `50to70`, `above70`).
    pub fn from_key(key: &str) -> Option<Self> {
        match key.trim().to_ascii_lowercase().as_str() {
            "all" => Some(GamesPlayedFilter::All),
            "below50" => Some(GamesPlayedFilter::Below50),
            "50to70" => Some(GamesPlayedFilter::From50To70),
            "above70" => Some(GamesPlayedFilter::Above70),
            _ => None,
        }
    }
}

/// Attribute filters; `None` means no constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerFilters {
    pub conference: Option<Conference>,
    pub position: Option<Position>,
    pub games_played: GamesPlayedFilter,
}

impl PlayerFilters {
    pub fn matches(&self, player: &Player) -> bool {
        self.conference.map_or(true, |c| player.conference == c)
            && self.position.map_or(true, |p| player.position == p)
            && self.games_played.matches(player.stats.games_played)
    }

    /// Keep the players passing every filter, preserving order.
    pub fn apply<'a>(&self, players: impl IntoIterator<Item = &'a Player>) -> Vec<&'a Player> {
        players.into_iter().filter(|p| self.matches(p)).collect()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
