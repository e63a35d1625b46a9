// Match results by host city for a selected team.

use std::sync::Arc;

use super::{Resolver, SelectorId};
use crate::chart::{Figure, Series};
use crate::records::{MatchRecord, Tables};
use crate::selection::team_options;

/// Legend entry for matches without a winner.
pub const NO_RESULT: &str = "No result";

/// Rows where `team` played on either side.
pub fn filter_matches<'a>(matches: &'a [MatchRecord], team: &str) -> Vec<&'a MatchRecord> {
    matches.iter().filter(|m| m.involves(team)).collect()
}

/// Count matches per city, split by winner. Cities and winners keep the order
/// in which they first appear.
pub fn city_counts_by_winner(rows: &[&MatchRecord]) -> Vec<Series> {
    let mut series: Vec<Series> = Vec::new();
    for row in rows {
        let winner = row.winning_team.as_deref().unwrap_or(NO_RESULT);
        let idx = match series.iter().position(|s| s.name == winner) {
            Some(idx) => idx,
            None => {
                series.push(Series {
                    name: winner.to_string(),
                    categories: Vec::new(),
                    counts: Vec::new(),
                });
                series.len() - 1
            }
        };
        let s = &mut series[idx];
        match s.categories.iter().position(|c| *c == row.venue_city) {
            Some(city) => s.counts[city] += 1.0,
            None => {
                s.categories.push(row.venue_city.clone());
                s.counts.push(1.0);
            }
        }
    }
    series
}

pub struct MatchResolver {
    tables: Arc<Tables>,
}

impl MatchResolver {
    pub fn new(tables: Arc<Tables>) -> Self {
        MatchResolver { tables }
    }
}

impl Resolver for MatchResolver {
    fn selector(&self) -> SelectorId {
        SelectorId::Team
    }

    fn options(&self) -> Vec<String> {
        team_options(&self.tables)
    }

    fn resolve(&self, team: &str) -> Figure {
        let rows = filter_matches(&self.tables.matches, team);
        if rows.is_empty() {
            return Figure::placeholder(team);
        }
        Figure::stacked_counts(
            format!("Match Results by City for {team}"),
            "Venue_city",
            "Winning_team",
            city_counts_by_winner(&rows),
        )
    }
}
