// CSV loading and light cleaning for the three dashboard datasets.
//
// Match dates are parsed day-first and any unparseable value aborts the load.
// Player-name key columns are trimmed. Numeric cells that fail to parse are
// kept as missing rather than rejected.

use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{info, warn};

use crate::records::{BattingRecord, BowlingRecord, MatchRecord, Tables};

// ---------------------------------------------------------------------------
// Public types
// ---------------------------------------------------------------------------

/// Locations of the three input files.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DataPaths {
    pub matches: String,
    pub batting: String,
    pub bowling: String,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("{path} has no `{column}` column")]
    MissingColumn { path: String, column: &'static str },

    #[error("unparseable Date_of_match {value:?} on data row {row} of {path}")]
    Date {
        path: String,
        row: usize,
        value: String,
    },
}

// ---------------------------------------------------------------------------
// Raw CSV rows (private)
// ---------------------------------------------------------------------------

/// Every cell is optional so rows cut short by a flexible reader still
/// deserialize; an absent cell reads the same as an empty one.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawMatch {
    #[serde(default)]
    Date_of_match: Option<String>,
    #[serde(default)]
    Team_1: Option<String>,
    #[serde(default)]
    Team_2: Option<String>,
    #[serde(default)]
    Venue_city: Option<String>,
    #[serde(default)]
    Winning_team: Option<String>,
}

/// Metric columns are optional: a missing column deserializes to `None`, and
/// `csv::invalid_option` turns an unparseable cell into `None` as well.
#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawBatting {
    Batsman: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    Runs: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    Strike_rate: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    Fours: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    Sixes: Option<f64>,
}

#[derive(Debug, Deserialize)]
#[allow(non_snake_case)]
struct RawBowling {
    Bowler: String,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    Wickets: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    Economy: Option<f64>,
    #[serde(default, deserialize_with = "csv::invalid_option")]
    Runs: Option<f64>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Drop NaN and infinities so they chart as zero like any other missing value.
fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

/// Rows shorter than the header are kept; their absent trailing cells
/// deserialize as empty or missing.
fn csv_reader<R: Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new().flexible(true).from_reader(rdr)
}

fn require_columns<R: Read>(
    reader: &mut csv::Reader<R>,
    origin: &str,
    columns: &[&'static str],
) -> Result<(), LoadError> {
    let headers = reader.headers().map_err(|e| LoadError::Csv {
        path: origin.to_string(),
        source: e,
    })?;
    for column in columns {
        if !headers.iter().any(|h| h == *column) {
            return Err(LoadError::MissingColumn {
                path: origin.to_string(),
                column: *column,
            });
        }
    }
    Ok(())
}

/// Parse a match date written day-first.
///
/// Numeric dates may use `-`, `/` or `.` separators with a two- or four-digit
/// year (`19-11-2023`, `19/11/23`). Month names are accepted abbreviated or in
/// full (`19 Nov 2023`, `19-November-2023`). A four-digit leading year is read
/// as ISO `yyyy-mm-dd`.
pub fn parse_match_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    let normalized: String = text
        .chars()
        .map(|c| match c {
            '/' | '.' | ' ' => '-',
            other => other,
        })
        .collect();
    let parts: Vec<&str> = normalized.split('-').filter(|p| !p.is_empty()).collect();
    if parts.len() != 3 {
        return None;
    }
    let canonical = parts.join("-");

    if parts.iter().all(|p| p.chars().all(|c| c.is_ascii_digit())) {
        let fmt = if parts[0].len() == 4 {
            "%Y-%m-%d"
        } else if parts[2].len() == 2 {
            "%d-%m-%y"
        } else {
            "%d-%m-%Y"
        };
        return NaiveDate::parse_from_str(&canonical, fmt).ok();
    }

    // %B parses full or abbreviated names; %b only takes the abbreviation.
    let fmt = if parts[2].len() == 2 { "%d-%B-%y" } else { "%d-%B-%Y" };
    NaiveDate::parse_from_str(&canonical, fmt).ok()
}

// ---------------------------------------------------------------------------
// Reader-based loaders (testable without temp files)
// ---------------------------------------------------------------------------

/// Load match results from any reader. `origin` names the source in errors.
pub fn matches_from_reader<R: Read>(rdr: R, origin: &str) -> Result<Vec<MatchRecord>, LoadError> {
    let mut reader = csv_reader(rdr);
    require_columns(&mut reader, origin, &["Date_of_match", "Team_1", "Team_2"])?;

    let mut matches = Vec::new();
    for (idx, result) in reader.deserialize::<RawMatch>().enumerate() {
        let row = idx + 1;
        let raw = match result {
            Ok(raw) => raw,
            Err(e) => {
                warn!("skipping malformed match row {row} in {origin}: {e}");
                continue;
            }
        };
        let date_text = raw.Date_of_match.unwrap_or_default();
        let date = parse_match_date(&date_text).ok_or_else(|| LoadError::Date {
            path: origin.to_string(),
            row,
            value: date_text.clone(),
        })?;
        matches.push(MatchRecord {
            date,
            team_1: raw.Team_1.unwrap_or_default(),
            team_2: raw.Team_2.unwrap_or_default(),
            venue_city: raw.Venue_city.unwrap_or_default(),
            winning_team: raw.Winning_team.as_deref().and_then(non_empty),
        });
    }
    Ok(matches)
}

/// Load batting statistics from any reader, trimming the `Batsman` column.
pub fn batting_from_reader<R: Read>(rdr: R, origin: &str) -> Result<Vec<BattingRecord>, LoadError> {
    let mut reader = csv_reader(rdr);
    require_columns(&mut reader, origin, &["Batsman"])?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<RawBatting>() {
        match result {
            Ok(raw) => rows.push(BattingRecord {
                batsman: raw.Batsman.trim().to_string(),
                runs: finite(raw.Runs),
                strike_rate: finite(raw.Strike_rate),
                fours: finite(raw.Fours),
                sixes: finite(raw.Sixes),
            }),
            Err(e) => warn!("skipping malformed batting row in {origin}: {e}"),
        }
    }
    Ok(rows)
}

/// Load bowling statistics from any reader, trimming the `Bowler` column.
pub fn bowling_from_reader<R: Read>(rdr: R, origin: &str) -> Result<Vec<BowlingRecord>, LoadError> {
    let mut reader = csv_reader(rdr);
    require_columns(&mut reader, origin, &["Bowler"])?;

    let mut rows = Vec::new();
    for result in reader.deserialize::<RawBowling>() {
        match result {
            Ok(raw) => rows.push(BowlingRecord {
                bowler: raw.Bowler.trim().to_string(),
                wickets: finite(raw.Wickets),
                economy: finite(raw.Economy),
                runs: finite(raw.Runs),
            }),
            Err(e) => warn!("skipping malformed bowling row in {origin}: {e}"),
        }
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Public path-based loaders
// ---------------------------------------------------------------------------

fn open(path: &Path) -> Result<std::fs::File, LoadError> {
    std::fs::File::open(path).map_err(|e| LoadError::Io {
        path: path.display().to_string(),
        source: e,
    })
}

pub fn load_matches(path: &Path) -> Result<Vec<MatchRecord>, LoadError> {
    matches_from_reader(open(path)?, &path.display().to_string())
}

pub fn load_batting(path: &Path) -> Result<Vec<BattingRecord>, LoadError> {
    batting_from_reader(open(path)?, &path.display().to_string())
}

pub fn load_bowling(path: &Path) -> Result<Vec<BowlingRecord>, LoadError> {
    bowling_from_reader(open(path)?, &path.display().to_string())
}

/// Load all three datasets. Any failure is fatal to the caller.
pub fn load_tables(paths: &DataPaths) -> Result<Tables, LoadError> {
    let tables = Tables {
        matches: load_matches(Path::new(&paths.matches))?,
        batting: load_batting(Path::new(&paths.batting))?,
        bowling: load_bowling(Path::new(&paths.bowling))?,
    };

    match tables.year_span() {
        Some((first, last)) => info!(
            "Loaded {} matches ({first}-{last}), {} batting rows, {} bowling rows",
            tables.matches.len(),
            tables.batting.len(),
            tables.bowling.len()
        ),
        None => info!(
            "Loaded 0 matches, {} batting rows, {} bowling rows",
            tables.batting.len(),
            tables.bowling.len()
        ),
    }

    Ok(tables)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
