// Selection-to-figure resolvers and the table that routes selection changes
// to them.
//
// Each resolver captures the shared, read-only tables when it is built and is
// a pure function of (tables, selection) from then on. Resolvers never call
// one another, so a selection change maps to exactly one resolver call.

pub mod batting;
pub mod bowling;
pub mod matches;

use std::collections::HashMap;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chart::Figure;
use crate::records::Tables;

pub use batting::BattingResolver;
pub use bowling::BowlingResolver;
pub use matches::MatchResolver;

/// Identity of a dropdown control on the page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SelectorId {
    #[serde(rename = "team-dropdown")]
    Team,
    #[serde(rename = "batsman-dropdown")]
    Batsman,
    #[serde(rename = "bowler-dropdown")]
    Bowler,
}

impl SelectorId {
    /// Page order.
    pub const ALL: [SelectorId; 3] = [SelectorId::Team, SelectorId::Batsman, SelectorId::Bowler];

    /// DOM id of the graph this selector drives.
    pub fn graph(self) -> &'static str {
        match self {
            SelectorId::Team => "matches-graph",
            SelectorId::Batsman => "batting-graph",
            SelectorId::Bowler => "bowling-graph",
        }
    }

    pub fn heading(self) -> &'static str {
        match self {
            SelectorId::Team => "📅 Matches Overview",
            SelectorId::Batsman => "🏏 Batting Stats",
            SelectorId::Bowler => "🎯 Bowling Stats",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SelectorId::Team => "Select Team:",
            SelectorId::Batsman => "Select Batsman:",
            SelectorId::Bowler => "Select Bowler:",
        }
    }
}

/// A resolved figure addressed to its graph.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Panel {
    pub graph: &'static str,
    pub figure: Figure,
}

/// Maps one dropdown's selection to a figure.
pub trait Resolver: Send + Sync {
    fn selector(&self) -> SelectorId;

    /// Dropdown options, sorted and distinct.
    fn options(&self) -> Vec<String>;

    fn resolve(&self, selection: &str) -> Figure;
}

/// Routes selection changes to the resolver registered for each selector.
pub struct Dispatcher {
    resolvers: HashMap<SelectorId, Arc<dyn Resolver>>,
}

impl Dispatcher {
    /// Build the standard table: one resolver per selector, all sharing
    /// `tables`.
    pub fn new(tables: Arc<Tables>) -> Self {
        Dispatcher::from_resolvers(vec![
            Arc::new(MatchResolver::new(Arc::clone(&tables))) as Arc<dyn Resolver>,
            Arc::new(BattingResolver::new(Arc::clone(&tables))),
            Arc::new(BowlingResolver::new(tables)),
        ])
    }

    /// Build a table from arbitrary resolvers. A later resolver for the same
    /// selector replaces an earlier one.
    pub fn from_resolvers(resolvers: Vec<Arc<dyn Resolver>>) -> Self {
        Dispatcher {
            resolvers: resolvers.into_iter().map(|r| (r.selector(), r)).collect(),
        }
    }

    pub fn resolver(&self, selector: SelectorId) -> Option<&Arc<dyn Resolver>> {
        self.resolvers.get(&selector)
    }

    /// Invoke the resolver for `selector` once. `None` if nothing is
    /// registered for it.
    pub fn dispatch(&self, selector: SelectorId, value: &str) -> Option<Panel> {
        let resolver = self.resolvers.get(&selector)?;
        debug!("resolving {:?} = {value:?}", selector);
        Some(Panel {
            graph: selector.graph(),
            figure: resolver.resolve(value),
        })
    }
}
