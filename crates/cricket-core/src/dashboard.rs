// The page model: title, three dropdown sections and their resolvers.

use std::sync::Arc;

use serde::Serialize;

use crate::records::Tables;
use crate::resolve::{Dispatcher, Panel, SelectorId};
use crate::selection::Dropdown;

/// One heading + dropdown + graph block.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub heading: &'static str,
    pub graph: &'static str,
    #[serde(flatten)]
    pub dropdown: Dropdown,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PageLayout {
    pub title: String,
    pub sections: Vec<Section>,
}

/// Everything the server needs to answer a client. Immutable once built and
/// shared across connections.
pub struct Dashboard {
    title: String,
    dispatcher: Dispatcher,
}

impl Dashboard {
    pub fn new(title: impl Into<String>, tables: Arc<Tables>) -> Self {
        Dashboard::with_dispatcher(title, Dispatcher::new(tables))
    }

    pub fn with_dispatcher(title: impl Into<String>, dispatcher: Dispatcher) -> Self {
        Dashboard {
            title: title.into(),
            dispatcher,
        }
    }

    /// Sections in page order, options computed from the current tables.
    pub fn layout(&self) -> PageLayout {
        let sections = SelectorId::ALL
            .into_iter()
            .filter_map(|selector| {
                let resolver = self.dispatcher.resolver(selector)?;
                Some(Section {
                    heading: selector.heading(),
                    graph: selector.graph(),
                    dropdown: Dropdown::new(selector, resolver.options()),
                })
            })
            .collect();
        PageLayout {
            title: self.title.clone(),
            sections,
        }
    }

    /// Figures for each section's default selection. Sections with no
    /// options have no default and are skipped.
    pub fn initial_panels(&self) -> Vec<Panel> {
        self.layout()
            .sections
            .into_iter()
            .filter_map(|s| {
                let default = s.dropdown.default?;
                self.dispatcher.dispatch(s.dropdown.selector, &default)
            })
            .collect()
    }

    pub fn select(&self, selector: SelectorId, value: &str) -> Option<Panel> {
        self.dispatcher.dispatch(selector, value)
    }
}
