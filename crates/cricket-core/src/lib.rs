// Data model and chart logic for the cricket dashboard: CSV loading, dropdown
// options, figure descriptions and the selection resolvers. No networking.

pub mod chart;
pub mod dashboard;
pub mod loader;
pub mod records;
pub mod resolve;
pub mod selection;

pub use dashboard::Dashboard;
pub use records::Tables;
