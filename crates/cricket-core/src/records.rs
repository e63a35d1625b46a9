// In-memory tables for match results, batting and bowling statistics.

use chrono::{Datelike, NaiveDate};

/// One completed (or abandoned) fixture from the match results file.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchRecord {
    pub date: NaiveDate,
    pub team_1: String,
    pub team_2: String,
    pub venue_city: String,
    /// `None` for no-result and abandoned matches.
    pub winning_team: Option<String>,
}

impl MatchRecord {
    /// Calendar year the match was played in. Derived, never stored.
    pub fn year(&self) -> i32 {
        self.date.year()
    }

    /// True when `team` played in this match on either side.
    pub fn involves(&self, team: &str) -> bool {
        self.team_1 == team || self.team_2 == team
    }
}

/// Per-player batting totals. Each metric is `None` when the column is absent
/// from the file or the cell could not be parsed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BattingRecord {
    pub batsman: String,
    pub runs: Option<f64>,
    pub strike_rate: Option<f64>,
    pub fours: Option<f64>,
    pub sixes: Option<f64>,
}

/// Per-player bowling totals.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BowlingRecord {
    pub bowler: String,
    pub wickets: Option<f64>,
    pub economy: Option<f64>,
    pub runs: Option<f64>,
}

/// The three datasets, loaded once at startup and shared read-only.
#[derive(Debug, Clone, Default)]
pub struct Tables {
    pub matches: Vec<MatchRecord>,
    pub batting: Vec<BattingRecord>,
    pub bowling: Vec<BowlingRecord>,
}

impl Tables {
    /// Earliest and latest match year, or `None` for an empty match table.
    pub fn year_span(&self) -> Option<(i32, i32)> {
        let mut years = self.matches.iter().map(MatchRecord::year);
        let first = years.next()?;
        Some(years.fold((first, first), |(lo, hi), y| (lo.min(y), hi.max(y))))
    }
}
