// Per-batsman metric chart.

use std::sync::Arc;

use super::{Resolver, SelectorId};
use crate::chart::{Figure, METRIC_AXIS, VALUE_AXIS};
use crate::records::{BattingRecord, Tables};
use crate::selection::batsman_options;

/// Chart metrics, in bar order.
pub const BATTING_METRICS: [&str; 4] = ["Runs", "Strike_rate", "Fours", "Sixes"];

/// First row for `name` after trimming. Duplicate rows beyond the first are
/// ignored.
pub fn find_batsman<'a>(rows: &'a [BattingRecord], name: &str) -> Option<&'a BattingRecord> {
    let name = name.trim();
    rows.iter().find(|r| r.batsman == name)
}

/// Metric values in [`BATTING_METRICS`] order, missing values as 0.
pub fn batting_values(record: &BattingRecord) -> Vec<f64> {
    [record.runs, record.strike_rate, record.fours, record.sixes]
        .into_iter()
        .map(|v| v.unwrap_or(0.0))
        .collect()
}

pub struct BattingResolver {
    tables: Arc<Tables>,
}

impl BattingResolver {
    pub fn new(tables: Arc<Tables>) -> Self {
        BattingResolver { tables }
    }
}

impl Resolver for BattingResolver {
    fn selector(&self) -> SelectorId {
        SelectorId::Batsman
    }

    fn options(&self) -> Vec<String> {
        batsman_options(&self.tables)
    }

    fn resolve(&self, batsman: &str) -> Figure {
        let batsman = batsman.trim();
        match find_batsman(&self.tables.batting, batsman) {
            Some(record) => Figure::bar(
                format!("Performance of {batsman}"),
                METRIC_AXIS,
                VALUE_AXIS,
                &BATTING_METRICS,
                batting_values(record),
            ),
            None => Figure::placeholder(batsman),
        }
    }
}
