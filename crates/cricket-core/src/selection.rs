// Dropdown option sets derived from the key columns.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::records::Tables;
use crate::resolve::SelectorId;

/// Distinct, non-empty values in byte-wise lexicographic order.
pub fn distinct_sorted<'a, I>(values: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    values
        .into_iter()
        .filter(|v| !v.trim().is_empty())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .map(str::to_string)
        .collect()
}

/// Team options come from the first team column only.
pub fn team_options(tables: &Tables) -> Vec<String> {
    distinct_sorted(tables.matches.iter().map(|m| m.team_1.as_str()))
}

pub fn batsman_options(tables: &Tables) -> Vec<String> {
    distinct_sorted(tables.batting.iter().map(|b| b.batsman.as_str()))
}

pub fn bowler_options(tables: &Tables) -> Vec<String> {
    distinct_sorted(tables.bowling.iter().map(|b| b.bowler.as_str()))
}

/// A populated dropdown control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dropdown {
    pub selector: SelectorId,
    pub label: String,
    pub options: Vec<String>,
    /// The first option, or `None` when the key column is empty.
    pub default: Option<String>,
}

impl Dropdown {
    pub fn new(selector: SelectorId, options: Vec<String>) -> Self {
        let default = options.first().cloned();
        Dropdown {
            selector,
            label: selector.label().to_string(),
            options,
            default,
        }
    }
}
