// Per-bowler metric chart.

use std::sync::Arc;

use super::{Resolver, SelectorId};
use crate::chart::{Figure, METRIC_AXIS, VALUE_AXIS};
use crate::records::{BowlingRecord, Tables};
use crate::selection::bowler_options;

pub const BOWLING_METRICS: [&str; 3] = ["Wickets", "Economy", "Runs"];

/// First row for `name` after trimming.
pub fn find_bowler<'a>(rows: &'a [BowlingRecord], name: &str) -> Option<&'a BowlingRecord> {
    let name = name.trim();
    rows.iter().find(|r| r.bowler == name)
}

/// Metric values in [`BOWLING_METRICS`] order, missing values as 0.
pub fn bowling_values(record: &BowlingRecord) -> Vec<f64> {
    [record.wickets, record.economy, record.runs]
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect()
}

pub struct BowlingResolver {
    tables: Arc<Tables>,
}

impl BowlingResolver {
    pub fn new(tables: Arc<Tables>) -> Self {
        BowlingResolver { tables }
    }
}

impl Resolver for BowlingResolver {
    fn selector(&self) -> SelectorId {
        SelectorId::Bowler
    }

    fn options(&self) -> Vec<String> {
        bowler_options(&self.tables)
    }

    fn resolve(&self, bowler: &str) -> Figure {
        let bowler = bowler.trim();
        match find_bowler(&self.tables.bowling, bowler) {
            Some(record) => Figure::bar(
                format!("Performance of {bowler}"),
                METRIC_AXIS,
                VALUE_AXIS,
                &BOWLING_METRICS,
                bowling_values(record),
            ),
            None => Figure::placeholder(bowler),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> BowlingResolver {
        BowlingResolver::new(Arc::new(Tables {
            bowling: vec![
                BowlingRecord {
                    bowler: "Mohammed Shami".into(),
                    wickets: Some(24.0),
                    economy: Some(5.26),
                    runs: Some(257.0),
                },
                BowlingRecord {
                    bowler: "Adam Zampa".into(),
                    wickets: Some(23.0),
                    economy: None,
                    runs: None,
                },
            ],
            ..Tables::default()
        }))
    }

    #[test]
    fn known_bowler_gets_three_metrics_in_order() {
        let fig = resolver().resolve("Mohammed Shami");
        assert_eq!(fig.title(), "Performance of Mohammed Shami");
        assert_eq!(fig.labels(), vec!["Wickets", "Economy", "Runs"]);
        assert_eq!(fig.values(), &[24.0, 5.26, 257.0]);
    }

    #[test]
    fn missing_metrics_are_zero() {
        assert_eq!(resolver().resolve("Adam Zampa").values(), &[23.0, 0.0, 0.0]);
    }

    #[test]
    fn trimmed_lookup() {
        let r = resolver();
        assert_eq!(r.resolve(" Adam Zampa  "), r.resolve("Adam Zampa"));
    }

    #[test]
    fn unknown_bowler_gets_placeholder() {
        let fig = resolver().resolve("Shane Warne");
        assert_eq!(fig.title(), "No data for Shane Warne");
        assert_eq!(fig.labels(), vec!["Metric"]);
        assert_eq!(fig.values(), &[0.0]);
    }

    #[test]
    fn options_sorted() {
        assert_eq!(resolver().options(), vec!["Adam Zampa", "Mohammed Shami"]);
    }
}
