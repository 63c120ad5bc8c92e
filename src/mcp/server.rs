//! MCP server that reads JSON-RPC 2.0 messages from stdin and writes
//! responses to stdout.
//!
//! Requests are handled by a single worker: a reader task parses lines and
//! hands them over a channel of capacity one, and the worker fully resolves
//! each request and writes its response before taking the next. Responses
//! therefore leave in the order requests arrived.

use std::any::Any;
use std::sync::Arc;

use serde_json::Value;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use crate::config::MetricsConfig;
use crate::errors::{MetricsError, Result};

use super::router::{error_response, Router};
use super::transport::{ErrorCode, JsonRpcRequest, JsonRpcResponse};

/// A line read from the client, parsed as far as it could be.
enum Inbound {
    Request(JsonRpcRequest),
    Rejected(JsonRpcResponse),
}

/// Resolves one parsed request. Runs on the blocking pool.
pub trait RequestHandler: Send + Sync + 'static {
    /// Returns the response, or `None` for notifications.
    fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse>;

    /// Runtime statistics logged at shutdown.
    fn stats_json(&self) -> Value {
        Value::Null
    }
}

impl RequestHandler for Router {
    fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        Router::handle_request(self, request)
    }

    fn stats_json(&self) -> Value {
        Router::stats_json(self)
    }
}

/// The MCP server wrapping a request handler.
pub struct McpServer {
    handler: Arc<dyn RequestHandler>,
}

impl McpServer {
    /// Creates a new MCP server routing requests for the given configuration.
    pub fn new(config: MetricsConfig) -> Self {
        Self::with_handler(Arc::new(Router::new(Arc::new(config))))
    }

    /// Creates a server around any request handler.
    pub fn with_handler(handler: Arc<dyn RequestHandler>) -> Self {
        Self { handler }
    }

    /// Runs the server on stdin/stdout until stdin is closed.
    pub async fn run(&self) -> Result<()> {
        self.serve(tokio::io::stdin(), tokio::io::stdout()).await
    }

    /// Serves newline-delimited JSON-RPC on the given streams until the
    /// reader reaches end of input.
    pub async fn serve<R, W>(&self, reader: R, mut writer: W) -> Result<()>
    where
        R: AsyncRead + Unpin + Send + 'static,
        W: AsyncWrite + Unpin,
    {
        info!("MCP server ready");

        let (tx, mut rx) = mpsc::channel::<Inbound>(1);
        let reader_task = tokio::spawn(read_requests(reader, tx));

        while let Some(inbound) = rx.recv().await {
            let response = match inbound {
                Inbound::Request(request) => self.process(request).await,
                Inbound::Rejected(response) => Some(response),
            };

            if let Some(resp) = response {
                if let Err(e) = write_response(&mut writer, &resp).await {
                    error!(error = %e, "failed to write response");
                    break;
                }
            }
        }

        // The reader may still be parked on input if the loop ended early.
        drop(rx);
        reader_task.abort();
        if let Err(e) = reader_task.await {
            if !e.is_cancelled() {
                warn!(error = %e, "reader task ended abnormally");
            }
        }
        if let Err(e) = writer.shutdown().await {
            debug!(error = %e, "failed to shut down writer");
        }

        info!(stats = %self.handler.stats_json(), "MCP server shutting down");
        Ok(())
    }

    /// Resolves one request on the blocking pool and waits for it.
    ///
    /// A panic inside a handler is reported as a handler failure so the
    /// client still gets a well-formed response.
    async fn process(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        let id = request.id.clone();
        let method = request.method.clone();
        let notification = request.is_notification();
        let handler = Arc::clone(&self.handler);

        match tokio::task::spawn_blocking(move || handler.handle_request(&request)).await {
            Ok(response) => response,
            Err(e) => {
                let message = if e.is_panic() {
                    panic_message(e.into_panic())
                } else {
                    e.to_string()
                };
                error!(method = %method, error = %message, "handler aborted");
                if notification {
                    None
                } else {
                    Some(error_response(id, MetricsError::Handler { message }))
                }
            }
        }
    }
}

/// Reads lines from `reader` and queues them for the worker.
async fn read_requests<R>(reader: R, tx: mpsc::Sender<Inbound>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(reader).lines();

    loop {
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "failed to read input");
                break;
            }
        };

        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        debug!(request = %trimmed, "received request");

        if tx.send(parse_line(trimmed)).await.is_err() {
            break;
        }
    }
}

/// Parses one line into a request, or into the error response it deserves.
fn parse_line(line: &str) -> Inbound {
    let value: Value = match serde_json::from_str(line) {
        Ok(v) => v,
        Err(e) => {
            warn!(error = %e, "invalid JSON");
            return Inbound::Rejected(JsonRpcResponse::error(
                Value::Null,
                ErrorCode::ParseError,
                format!("failed to parse JSON-RPC request: {}", e),
            ));
        }
    };

    let id = value.get("id").cloned().unwrap_or(Value::Null);
    match serde_json::from_value::<JsonRpcRequest>(value) {
        Ok(request) => Inbound::Request(request),
        Err(e) => {
            warn!(error = %e, "invalid JSON-RPC request");
            Inbound::Rejected(JsonRpcResponse::error(
                id,
                ErrorCode::InvalidRequest,
                format!("invalid JSON-RPC request: {}", e),
            ))
        }
    }
}

/// Writes a response as a single line and flushes it.
async fn write_response<W>(writer: &mut W, response: &JsonRpcResponse) -> std::io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let json = serde_json::to_string(response)?;
    debug!(response = %json, "sending response");
    writer.write_all(json.as_bytes()).await?;
    writer.write_all(b"\n").await?;
    writer.flush().await
}

fn panic_message(payload: Box<dyn Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
