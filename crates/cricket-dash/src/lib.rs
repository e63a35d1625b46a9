// Library root for the dashboard server: configuration, wire protocol and the
// network server. Exposed so integration tests can drive a real listener.

pub mod config;
pub mod protocol;
pub mod server;
