// Network server for the dashboard page.
//
// A single TCP port serves both the static page (plain HTTP) and the
// WebSocket endpoint the page talks to. Each connection is handled in its own
// task against the shared, read-only dashboard.

use std::sync::Arc;
use std::time::Duration;

use cricket_core::Dashboard;
use futures_util::{Sink, SinkExt, Stream, StreamExt};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::protocol::{handle_client_text, opening_messages, ServerMessage};

/// The dashboard page.
pub const INDEX_HTML: &str = include_str!("../assets/index.html");

/// Upper bound on the request head we are willing to buffer.
const MAX_REQUEST_HEAD: usize = 8 * 1024;
const SNIFF_ATTEMPTS: u32 = 50;
const SNIFF_INTERVAL: Duration = Duration::from_millis(10);

// ---------------------------------------------------------------------------
// Request sniffing
// ---------------------------------------------------------------------------

/// The parts of an HTTP request head needed for routing.
#[derive(Debug, Clone, PartialEq)]
pub struct RequestHead {
    pub method: String,
    pub path: String,
    /// `Upgrade: websocket` was present.
    pub websocket: bool,
    /// Length of the head in bytes, including the blank line.
    pub len: usize,
}

/// Parse a complete request head from `buf`. Returns `None` until the blank
/// line terminating the head has arrived, or if the request line is invalid.
pub fn parse_request_head(buf: &[u8]) -> Option<RequestHead> {
    let end = buf.windows(4).position(|w| w == b"\r\n\r\n")?;
    let text = String::from_utf8_lossy(&buf[..end]);
    let mut lines = text.split("\r\n");

    let mut request_line = lines.next()?.split_whitespace();
    let method = request_line.next()?.to_string();
    let path = request_line.next()?.to_string();

    let websocket = lines.any(|line| {
        line.split_once(':').is_some_and(|(name, value)| {
            name.trim().eq_ignore_ascii_case("upgrade")
                && value.trim().eq_ignore_ascii_case("websocket")
        })
    });

    Some(RequestHead {
        method,
        path,
        websocket,
        len: end + 4,
    })
}

/// Peek at the socket until a full request head is buffered. The bytes stay
/// in the socket so the WebSocket handshake can read them again.
async fn sniff_request(stream: &TcpStream) -> std::io::Result<Option<RequestHead>> {
    let mut buf = vec![0u8; MAX_REQUEST_HEAD];
    for _ in 0..SNIFF_ATTEMPTS {
        let n = stream.peek(&mut buf).await?;
        if n == 0 {
            return Ok(None);
        }
        if let Some(head) = parse_request_head(&buf[..n]) {
            return Ok(Some(head));
        }
        if n == buf.len() {
            return Ok(None);
        }
        tokio::time::sleep(SNIFF_INTERVAL).await;
    }
    Ok(None)
}

// ---------------------------------------------------------------------------
// Plain HTTP
// ---------------------------------------------------------------------------

fn response(status: &str, content_type: &str, body: &[u8], include_body: bool) -> Vec<u8> {
    let mut out = format!(
        "HTTP/1.1 {status}\r\n\
         Content-Type: {content_type}\r\n\
         Content-Length: {}\r\n\
         Connection: close\r\n",
        body.len()
    );
    if status.starts_with("405") {
        out.push_str("Allow: GET, HEAD\r\n");
    }
    out.push_str("\r\n");

    let mut bytes = out.into_bytes();
    if include_body {
        bytes.extend_from_slice(body);
    }
    bytes
}

/// Build the full HTTP response for a non-WebSocket request.
pub fn http_response(head: &RequestHead) -> Vec<u8> {
    let include_body = match head.method.as_str() {
        "GET" => true,
        "HEAD" => false,
        _ => {
            return response(
                "405 Method Not Allowed",
                "text/plain; charset=utf-8",
                b"method not allowed\n",
                true,
            )
        }
    };

    let path = head.path.split('?').next().unwrap_or("/");
    match path {
        "/" | "/index.html" => response(
            "200 OK",
            "text/html; charset=utf-8",
            INDEX_HTML.as_bytes(),
            include_body,
        ),
        _ => response(
            "404 Not Found",
            "text/plain; charset=utf-8",
            b"not found\n",
            include_body,
        ),
    }
}

async fn serve_http(mut stream: TcpStream, head: RequestHead, addr: &str) -> std::io::Result<()> {
    let mut consumed = vec![0u8; head.len];
    stream.read_exact(&mut consumed).await?;
    debug!("{addr} {} {}", head.method, head.path);
    stream.write_all(&http_response(&head)).await?;
    stream.shutdown().await
}

// ---------------------------------------------------------------------------
// WebSocket session
// ---------------------------------------------------------------------------

async fn send<Si>(sink: &mut Si, msg: &ServerMessage) -> Result<(), Si::Error>
where
    Si: Sink<Message> + Unpin,
{
    match serde_json::to_string(msg) {
        Ok(json) => sink.send(Message::Text(json.into())).await,
        Err(e) => {
            warn!("Failed to serialize server message: {e}");
            Ok(())
        }
    }
}

/// Run one session: answer each text frame from `stream` through `sink`.
///
/// Close frames and stream errors end the session normally; binary, ping and
/// pong frames are ignored. Returns `Err` only when writing to `sink` fails.
/// Generic over the stream and sink so it can be driven from memory in tests.
pub async fn process_message_stream<St, Si, E>(
    mut stream: St,
    sink: &mut Si,
    dashboard: &Dashboard,
    addr: &str,
) -> Result<(), Si::Error>
where
    St: Stream<Item = Result<Message, E>> + Unpin,
    E: std::fmt::Display,
    Si: Sink<Message> + Unpin,
{
    while let Some(msg_result) = stream.next().await {
        match msg_result {
            Ok(Message::Text(text)) => {
                for reply in handle_client_text(dashboard, text.as_str()) {
                    send(sink, &reply).await?;
                }
            }
            Ok(Message::Close(_)) => {
                info!("Client {addr} sent close frame");
                break;
            }
            Err(e) => {
                warn!("WebSocket error from {addr}: {e}");
                break;
            }
            _ => {
                // Binary, Ping, Pong and raw frames carry nothing for us.
            }
        }
    }
    Ok(())
}

async fn serve_websocket(stream: TcpStream, dashboard: Arc<Dashboard>, addr: &str) {
    let ws_stream = match tokio_tungstenite::accept_async(stream).await {
        Ok(ws) => ws,
        Err(e) => {
            warn!("WebSocket handshake failed for {addr}: {e}");
            return;
        }
    };
    info!("WebSocket session opened for {addr}");

    let (mut write, read) = ws_stream.split();
    for msg in opening_messages(&dashboard) {
        if let Err(e) = send(&mut write, &msg).await {
            warn!("Failed to send opening messages to {addr}: {e}");
            return;
        }
    }

    if let Err(e) = process_message_stream(read, &mut write, &dashboard, addr).await {
        warn!("Failed to write to {addr}: {e}");
    }
    info!("WebSocket session closed for {addr}");
}

// ---------------------------------------------------------------------------
// Accept loop
// ---------------------------------------------------------------------------

async fn handle_connection(stream: TcpStream, addr: String, dashboard: Arc<Dashboard>) {
    let head = match sniff_request(&stream).await {
        Ok(Some(head)) => head,
        Ok(None) => {
            debug!("Dropping {addr}: no complete request head");
            return;
        }
        Err(e) => {
            warn!("Failed to read request from {addr}: {e}");
            return;
        }
    };

    if head.websocket {
        serve_websocket(stream, dashboard, &addr).await;
    } else if let Err(e) = serve_http(stream, head, &addr).await {
        warn!("HTTP response to {addr} failed: {e}");
    }
}

/// Bind the listener described by `config`.
pub async fn bind(config: &ServerConfig) -> std::io::Result<TcpListener> {
    TcpListener::bind(config.addr()).await
}

/// Accept connections forever, one task per connection.
pub async fn run(listener: TcpListener, dashboard: Arc<Dashboard>) -> anyhow::Result<()> {
    let local_addr = listener.local_addr()?;
    info!("Dashboard listening on http://{local_addr}");

    loop {
        let (stream, addr) = listener.accept().await?;
        debug!("Accepted TCP connection from {addr}");
        tokio::spawn(handle_connection(stream, addr.to_string(), Arc::clone(&dashboard)));
    }
}
