// Career-stats CSV ingestion.
//
// Parses NBA career-stats exports (one row per player, season and team) into
// typed records. Real exports are noisy, so parsing is tolerant: short rows
// leave trailing columns missing and unreadable numeric cells become `None`
// instead of failing the whole table. The only hard failure is a table with
// no header line.

use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Read;
use tracing::{debug, warn};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum IngestError {
    #[error("table has no header line")]
    MissingHeader,

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to read table: {0}")]
    Io(#[from] std::io::Error),
}

// ---------------------------------------------------------------------------
// Column schema
// ---------------------------------------------------------------------------

/// How the cells of a column are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    /// Non-negative integral identifier.
    Identifier,
    Text,
    Number,
    /// Unknown column: number when the cell reads as one, text otherwise.
    Sniffed,
}

/// A header column, resolved once per table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    PersonId,
    Player,
    SeasonId,
    Team,
    Games,
    Minutes,
    Points,
    Rebounds,
    Assists,
    FgPct,
    Other(String),
}

impl Column {
    pub fn from_header(name: &str) -> Self {
        match name.trim() {
            "PERSON_ID" | "PLAYER_ID" => Column::PersonId,
            "Player" | "PLAYER_NAME" => Column::Player,
            "SEASON_ID" => Column::SeasonId,
            "TEAM_ABBREVIATION" => Column::Team,
            "GP" => Column::Games,
            "MIN" => Column::Minutes,
            "PTS" => Column::Points,
            "REB" => Column::Rebounds,
            "AST" => Column::Assists,
            "FG_PCT" => Column::FgPct,
            other => Column::Other(other.to_string()),
        }
    }

    pub fn kind(&self) -> ColumnKind {
        match self {
            Column::PersonId => ColumnKind::Identifier,
            Column::Player | Column::SeasonId | Column::Team => ColumnKind::Text,
            Column::Games
            | Column::Minutes
            | Column::Points
            | Column::Rebounds
            | Column::Assists
            | Column::FgPct => ColumnKind::Number,
            Column::Other(_) => ColumnKind::Sniffed,
        }
    }
}

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Value of a column outside the known schema.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Number(f64),
    Text(String),
}

impl Cell {
    /// Number when the trimmed cell is non-empty and reads as a finite float,
    /// text otherwise.
    pub fn sniff(raw: &str) -> Self {
        match read_number(raw) {
            Some(n) => Cell::Number(n),
            None => Cell::Text(raw.trim().to_string()),
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self {
            Cell::Number(n) => Some(*n),
            Cell::Text(_) => None,
        }
    }
}

/// One row of a career-stats table: a player's season totals for one team
/// (or the `TOT` aggregate across teams).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PlayerSeasonRecord {
    pub person_id: Option<u64>,
    pub player: Option<String>,
    pub season_id: Option<String>,
    pub team: Option<String>,
    pub games_played: Option<f64>,
    pub minutes: Option<f64>,
    pub points: Option<f64>,
    pub rebounds: Option<f64>,
    pub assists: Option<f64>,
    pub fg_pct: Option<f64>,
    /// Columns outside the schema, keyed by header name.
    pub extra: BTreeMap<String, Cell>,
}

impl PlayerSeasonRecord {
    /// Start year of the season, e.g. 2019 for "2019-20".
    pub fn start_year(&self) -> Option<i32> {
        self.season_id.as_deref().and_then(season_start_year)
    }

    fn set(&mut self, column: &Column, raw: &str) {
        match column {
            Column::PersonId => self.person_id = read_identifier(raw),
            Column::Player => self.player = read_text(raw),
            Column::SeasonId => self.season_id = read_text(raw),
            Column::Team => self.team = read_text(raw),
            Column::Games => self.games_played = read_number(raw),
            Column::Minutes => self.minutes = read_number(raw),
            Column::Points => self.points = read_number(raw),
            Column::Rebounds => self.rebounds = read_number(raw),
            Column::Assists => self.assists = read_number(raw),
            Column::FgPct => self.fg_pct = read_number(raw),
            Column::Other(name) => {
                self.extra.insert(name.clone(), Cell::sniff(raw));
            }
        }
    }
}

/// Start year from the leading four digits of a "YYYY-YY" season id.
pub fn season_start_year(season: &str) -> Option<i32> {
    let head = season.trim().get(..4)?;
    if !head.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    head.parse().ok()
}

// ---------------------------------------------------------------------------
// Cell readers
// ---------------------------------------------------------------------------

fn read_number(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|n| n.is_finite())
}

fn read_identifier(raw: &str) -> Option<u64> {
    let n = read_number(raw)?;
    if n < 0.0 || n.fract() != 0.0 || n > u64::MAX as f64 {
        return None;
    }
    Some(n as u64)
}

fn read_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn is_blank(record: &csv::StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|f| f.trim().is_empty())
}

/// Split one physical line into cells. Each line gets its own reader, so an
/// unterminated quote can only swallow the rest of its own line.
fn split_line(line: &str) -> Result<Option<csv::StringRecord>, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    reader.records().next().transpose()
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Parse a career-stats table held in memory.
///
/// The first non-blank line is the header. Every later non-blank line yields
/// exactly one record, whatever its arity. Quoted cells may not span lines.
pub fn parse(raw: &str) -> Result<Vec<PlayerSeasonRecord>, IngestError> {
    let raw = raw.strip_prefix('\u{feff}').unwrap_or(raw);
    let mut lines = raw
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line))
        .filter(|(_, line)| !line.trim().is_empty());

    let header = loop {
        let Some((_, line)) = lines.next() else {
            return Err(IngestError::MissingHeader);
        };
        match split_line(line)? {
            Some(record) if !is_blank(&record) => break record,
            _ => continue,
        }
    };

    let schema: Vec<Column> = header.iter().map(Column::from_header).collect();
    debug!(columns = schema.len(), "resolved career-stats schema");

    let mut records = Vec::new();
    for (line_no, line) in lines {
        if line.matches('"').count() % 2 == 1 {
            warn!(line = line_no, "unbalanced quote, cells after it are merged");
        }
        let row = match split_line(line) {
            Ok(Some(row)) => row,
            Ok(None) => continue,
            Err(e) => {
                warn!(line = line_no, "skipping unreadable row: {}", e);
                continue;
            }
        };
        if is_blank(&row) {
            continue;
        }
        if row.len() != schema.len() {
            debug!(
                line = line_no,
                "row has {} cells, header has {}",
                row.len(),
                schema.len()
            );
        }

        let mut record = PlayerSeasonRecord::default();
        for (column, raw) in schema.iter().zip(row.iter()) {
            record.set(column, raw);
        }
        records.push(record);
    }

    Ok(records)
}

/// Parse a career-stats table from any reader.
pub fn parse_reader<R: Read>(mut rdr: R) -> Result<Vec<PlayerSeasonRecord>, IngestError> {
    let mut raw = String::new();
    rdr.read_to_string(&mut raw)?;
    parse(&raw)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
