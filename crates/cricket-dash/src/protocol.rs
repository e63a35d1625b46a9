// WebSocket message types exchanged with the dashboard page.
//
// Every message is a JSON object `{"type": "...", "payload": {...}}` with
// camelCase payload fields.

use cricket_core::dashboard::PageLayout;
use cricket_core::resolve::{Panel, SelectorId};
use cricket_core::Dashboard;
use serde::{Deserialize, Serialize};
use tracing::warn;

// ---------------------------------------------------------------------------
// Page -> server
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ClientMessage {
    /// Sent by the page after (re)connecting. Answered with the layout and
    /// the default figures.
    Hello {
        #[serde(default)]
        payload: HelloPayload,
    },
    /// A dropdown changed value.
    Select { payload: SelectPayload },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelloPayload {
    #[serde(default)]
    pub user_agent: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SelectPayload {
    pub selector: SelectorId,
    pub value: String,
}

// ---------------------------------------------------------------------------
// Server -> page
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ServerMessage {
    Layout { payload: PageLayout },
    Figure { payload: Panel },
    Error { payload: ErrorPayload },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorPayload {
    pub message: String,
}

impl ServerMessage {
    pub fn error(message: impl Into<String>) -> Self {
        ServerMessage::Error {
            payload: ErrorPayload {
                message: message.into(),
            },
        }
    }
}

/// The layout followed by one figure per populated dropdown.
pub fn opening_messages(dashboard: &Dashboard) -> Vec<ServerMessage> {
    let mut out = vec![ServerMessage::Layout {
        payload: dashboard.layout(),
    }];
    out.extend(
        dashboard
            .initial_panels()
            .into_iter()
            .map(|payload| ServerMessage::Figure { payload }),
    );
    out
}

/// Answer one text frame from the page. A `SELECT` produces exactly one
/// figure; malformed input produces an `ERROR` reply instead of closing the
/// connection.
pub fn handle_client_text(dashboard: &Dashboard, text: &str) -> Vec<ServerMessage> {
    let msg: ClientMessage = match serde_json::from_str(text) {
        Ok(m) => m,
        Err(e) => {
            warn!("Failed to parse client message: {e}");
            return vec![ServerMessage::error(format!("invalid message: {e}"))];
        }
    };

    match msg {
        ClientMessage::Hello { .. } => opening_messages(dashboard),
        ClientMessage::Select { payload } => {
            match dashboard.select(payload.selector, &payload.value) {
                Some(panel) => vec![ServerMessage::Figure { payload: panel }],
                None => {
                    warn!("No resolver registered for {:?}", payload.selector);
                    vec![ServerMessage::error(format!(
                        "no chart for selector {:?}",
                        payload.selector
                    ))]
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cricket_core::records::{BattingRecord, Tables};
    use std::sync::Arc;

    fn dashboard() -> Dashboard {
        Dashboard::new(
            "Test Dashboard",
            Arc::new(Tables {
                batting: vec![BattingRecord {
                    batsman: "Kohli".into(),
                    runs: Some(100.0),
                    strike_rate: Some(95.5),
                    fours: Some(10.0),
                    sixes: Some(2.0),
                }],
                ..Tables::default()
            }),
        )
    }

    #[test]
    fn select_deserializes_from_page_json() {
        let json = r#"{"type":"SELECT","payload":{"selector":"batsman-dropdown","value":"Kohli"}}"#;
        let msg: ClientMessage = serde_json::from_str(json).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Select {
                payload: SelectPayload {
                    selector: SelectorId::Batsman,
                    value: "Kohli".into(),
                }
            }
        );
    }

    #[test]
    fn hello_payload_optional() {
        let msg: ClientMessage = serde_json::from_str(r#"{"type":"HELLO"}"#).unwrap();
        assert_eq!(
            msg,
            ClientMessage::Hello {
                payload: HelloPayload::default()
            }
        );

        let msg: ClientMessage =
            serde_json::from_str(r#"{"type":"HELLO","payload":{"userAgent":"Firefox"}}"#).unwrap();
        match msg {
            ClientMessage::Hello { payload } => {
                assert_eq!(payload.user_agent.as_deref(), Some("Firefox"))
            }
            other => panic!("expected Hello, got {other:?}"),
        }
    }

    #[test]
    fn select_yields_exactly_one_figure() {
        let json = r#"{"type":"SELECT","payload":{"selector":"batsman-dropdown","value":" Kohli "}}"#;
        let replies = handle_client_text(&dashboard(), json);
        assert_eq!(replies.len(), 1);

        let value = serde_json::to_value(&replies[0]).unwrap();
        assert_eq!(value["type"], "FIGURE");
        assert_eq!(value["payload"]["graph"], "batting-graph");
        assert_eq!(
            value["payload"]["figure"]["data"][0]["y"],
            serde_json::json!([100.0, 95.5, 10.0, 2.0])
        );
        assert_eq!(
            value["payload"]["figure"]["layout"]["title"]["text"],
            "Performance of Kohli"
        );
    }

    #[test]
    fn unknown_selector_is_an_error_reply() {
        let json = r#"{"type":"SELECT","payload":{"selector":"umpire-dropdown","value":"x"}}"#;
        let replies = handle_client_text(&dashboard(), json);
        assert_eq!(replies.len(), 1);
        assert!(matches!(replies[0], ServerMessage::Error { .. }));
    }

    #[test]
    fn garbage_is_an_error_reply() {
        let replies = handle_client_text(&dashboard(), "not json");
        let value = serde_json::to_value(&replies[0]).unwrap();
        assert_eq!(value["type"], "ERROR");
        assert!(value["payload"]["message"]
            .as_str()
            .unwrap()
            .starts_with("invalid message"));
    }

    #[test]
    fn opening_messages_start_with_layout() {
        let msgs = opening_messages(&dashboard());
        // Layout plus the batting default; no matches or bowlers loaded.
        assert_eq!(msgs.len(), 2);

        let layout = serde_json::to_value(&msgs[0]).unwrap();
        assert_eq!(layout["type"], "LAYOUT");
        assert_eq!(layout["payload"]["title"], "Test Dashboard");
        assert_eq!(layout["payload"]["sections"][1]["default"], "Kohli");
        assert!(layout["payload"]["sections"][0]["default"].is_null());

        let figure = serde_json::to_value(&msgs[1]).unwrap();
        assert_eq!(figure["payload"]["graph"], "batting-graph");
    }

    #[test]
    fn hello_replays_opening_messages() {
        let replies = handle_client_text(&dashboard(), r#"{"type":"HELLO"}"#);
        assert_eq!(replies, opening_messages(&dashboard()));
    }
}
