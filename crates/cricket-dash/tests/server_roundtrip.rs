// Integration tests: real listener, real sockets, shipped data files.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use cricket_core::loader::{self, DataPaths};
use cricket_core::Dashboard;
use cricket_dash::server;
use futures_util::{SinkExt, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;

const TIMEOUT: Duration = Duration::from_secs(5);

fn crate_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
}

fn shipped_paths() -> DataPaths {
    let data = crate_root().join("data");
    DataPaths {
        matches: data.join("matches.csv").display().to_string(),
        batting: data.join("batting_stats.csv").display().to_string(),
        bowling: data.join("bowling_stats.csv").display().to_string(),
    }
}

/// Start a server on an ephemeral port and return its address.
async fn start_server() -> String {
    let tables = loader::load_tables(&shipped_paths()).expect("shipped data should load");
    let dashboard = Arc::new(Dashboard::new("Test Dashboard", Arc::new(tables)));
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    tokio::spawn(server::run(listener, dashboard));
    addr
}

async fn next_json<S>(ws: &mut S) -> serde_json::Value
where
    S: futures_util::Stream<Item = Result<Message, tokio_tungstenite::tungstenite::Error>> + Unpin,
{
    let msg = tokio::time::timeout(TIMEOUT, ws.next())
        .await
        .expect("timed out waiting for message")
        .expect("stream ended")
        .expect("websocket error");
    match msg {
        Message::Text(text) => serde_json::from_str(text.as_str()).unwrap(),
        other => panic!("expected text frame, got {other:?}"),
    }
}

#[tokio::test]
async fn websocket_session_sends_layout_then_answers_selects() {
    let addr = start_server().await;
    let (mut ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}/ws"))
        .await
        .expect("handshake should succeed");

    let layout = next_json(&mut ws).await;
    assert_eq!(layout["type"], "LAYOUT");
    assert_eq!(layout["payload"]["title"], "Test Dashboard");
    let sections = layout["payload"]["sections"].as_array().unwrap();
    assert_eq!(sections.len(), 3);
    assert_eq!(sections[0]["selector"], "team-dropdown");
    assert_eq!(sections[0]["default"], "Australia");
    assert_eq!(sections[1]["default"], "Glenn Maxwell");
    assert_eq!(sections[2]["default"], "Adam Zampa");

    let mut graphs = Vec::new();
    for _ in 0..3 {
        let fig = next_json(&mut ws).await;
        assert_eq!(fig["type"], "FIGURE");
        graphs.push(fig["payload"]["graph"].as_str().unwrap().to_string());
    }
    assert_eq!(graphs, vec!["matches-graph", "batting-graph", "bowling-graph"]);

    let select = r#"{"type":"SELECT","payload":{"selector":"batsman-dropdown","value":"Virat Kohli"}}"#;
    ws.send(Message::Text(select.into())).await.unwrap();
    let fig = next_json(&mut ws).await;
    assert_eq!(fig["payload"]["graph"], "batting-graph");
    assert_eq!(
        fig["payload"]["figure"]["data"][0]["y"],
        serde_json::json!([765.0, 90.31, 68.0, 9.0])
    );

    let select = r#"{"type":"SELECT","payload":{"selector":"team-dropdown","value":"Scotland"}}"#;
    ws.send(Message::Text(select.into())).await.unwrap();
    let fig = next_json(&mut ws).await;
    assert_eq!(fig["payload"]["graph"], "matches-graph");
    assert_eq!(fig["payload"]["figure"]["layout"]["title"]["text"], "No data for Scotland");

    ws.close(None).await.unwrap();
}

#[tokio::test]
async fn concurrent_sessions_are_independent() {
    let addr = start_server().await;
    let url = format!("ws://{addr}/ws");
    let (mut a, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();
    let (mut b, _) = tokio_tungstenite::connect_async(url.as_str()).await.unwrap();

    // Drain layout + three default figures on both.
    for _ in 0..4 {
        next_json(&mut a).await;
        next_json(&mut b).await;
    }

    let select_a = r#"{"type":"SELECT","payload":{"selector":"bowler-dropdown","value":"Mohammed Shami"}}"#;
    let select_b = r#"{"type":"SELECT","payload":{"selector":"bowler-dropdown","value":"Jasprit Bumrah"}}"#;
    a.send(Message::Text(select_a.into())).await.unwrap();
    b.send(Message::Text(select_b.into())).await.unwrap();

    let fig_a = next_json(&mut a).await;
    let fig_b = next_json(&mut b).await;
    assert_eq!(fig_a["payload"]["figure"]["layout"]["title"]["text"], "Performance of Mohammed Shami");
    assert_eq!(fig_b["payload"]["figure"]["layout"]["title"]["text"], "Performance of Jasprit Bumrah");
}

#[tokio::test]
async fn plain_http_get_serves_page() {
    let addr = start_server().await;
    let mut stream = TcpStream::connect(&addr).await.unwrap();
    stream
        .write_all(b"GET / HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();

    let mut body = String::new();
    tokio::time::timeout(TIMEOUT, stream.read_to_string(&mut body))
        .await
        .expect("timed out reading response")
        .unwrap();
    assert!(body.starts_with("HTTP/1.1 200 OK\r\n"));
    assert!(body.contains("<!DOCTYPE html>"));
    assert!(body.contains("new WebSocket"));
}

#[tokio::test]
async fn plain_http_unknown_path_is_404() {
    let addr = start_server().await;
    let mut stream = TcpStream::connect(&addr).await.unwrap();
    stream
        .write_all(b"GET /nope HTTP/1.1\r\nHost: localhost\r\n\r\n")
        .await
        .unwrap();

    let mut body = String::new();
    tokio::time::timeout(TIMEOUT, stream.read_to_string(&mut body))
        .await
        .expect("timed out reading response")
        .unwrap();
    assert!(body.starts_with("HTTP/1.1 404 Not Found\r\n"));
}

/// The shipped defaults point at the shipped data files.
#[test]
fn default_config_references_shipped_data() {
    let text = std::fs::read_to_string(crate_root().join("defaults/dashboard.toml")).unwrap();
    let parsed: toml::Value = toml::from_str(&text).expect("defaults should be valid TOML");
    let paths = &parsed["data_paths"];
    for key in ["matches", "batting", "bowling"] {
        let rel = paths[key].as_str().unwrap();
        assert!(crate_root().join(rel).is_file(), "missing data file {rel}");
    }
}
