//! Request router: maps a parsed JSON-RPC request to its handler and turns
//! every outcome into exactly one well-formed response.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use serde_json::{json, Value};
use tracing::{debug, warn};

use crate::config::MetricsConfig;
use crate::errors::{MetricsError, Result};

use super::handlers::{get_prompt, handle_tool_call, read_resource};
use super::registry::{list_prompts, list_resources, list_tools, PromptName, ResourceUri, ToolName};
use super::transport::{ErrorCode, JsonRpcRequest, JsonRpcResponse};

/// Protocol revision advertised during `initialize`.
pub const PROTOCOL_VERSION: &str = "2024-11-05";

/// Runtime statistics for the router.
pub struct ServerStats {
    started_at: Instant,
    total_requests: AtomicU64,
    tool_calls: AtomicU64,
    errors: AtomicU64,
}

impl ServerStats {
    fn new() -> Self {
        Self {
            started_at: Instant::now(),
            total_requests: AtomicU64::new(0),
            tool_calls: AtomicU64::new(0),
            errors: AtomicU64::new(0),
        }
    }
}

/// Routes requests against an immutable configuration.
pub struct Router {
    config: Arc<MetricsConfig>,
    stats: ServerStats,
}

impl Router {
    /// Creates a router serving the given configuration.
    pub fn new(config: Arc<MetricsConfig>) -> Self {
        Self {
            config,
            stats: ServerStats::new(),
        }
    }

    /// Dispatches a parsed JSON-RPC request to the appropriate handler.
    ///
    /// Returns `None` for notifications.
    pub fn handle_request(&self, request: &JsonRpcRequest) -> Option<JsonRpcResponse> {
        if request.is_notification() || request.method == "initialized" {
            debug!(method = %request.method, "notification received");
            return None;
        }

        self.stats.total_requests.fetch_add(1, Ordering::Relaxed);
        let id = request.id.clone();
        let params = request.params.clone().unwrap_or_else(|| json!({}));

        let response = match self.dispatch(&request.method, &params) {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => error_response(id, e),
        };

        if let Some(ref err) = response.error {
            self.stats.errors.fetch_add(1, Ordering::Relaxed);
            warn!(
                method = %request.method,
                code = err.code,
                message = %err.message,
                "request failed"
            );
        }

        Some(response)
    }

    fn dispatch(&self, method: &str, params: &Value) -> Result<Value> {
        match method {
            "initialize" => Ok(self.handle_initialize()),
            "ping" => Ok(json!({})),
            "resources/list" => Ok(json!({ "resources": list_resources() })),
            "resources/read" => {
                let uri = param_str(params, "uri")?;
                read_resource(&self.config, ResourceUri::parse(uri)?)
            }
            "tools/list" => Ok(json!({ "tools": list_tools() })),
            "tools/call" => {
                let name = param_str(params, "name")?;
                let tool = ToolName::parse(name)?;
                let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));
                self.stats.tool_calls.fetch_add(1, Ordering::Relaxed);
                debug!(tool = name, "calling tool");
                handle_tool_call(&self.config, tool, &arguments)
            }
            "prompts/list" => Ok(json!({ "prompts": list_prompts() })),
            "prompts/get" => {
                let name = param_str(params, "name")?;
                get_prompt(&self.config, PromptName::parse(name)?)
            }
            _ => Err(MetricsError::UnknownMethod {
                method: method.to_string(),
            }),
        }
    }

    /// Handles the `initialize` method, returning server capabilities.
    fn handle_initialize(&self) -> Value {
        json!({
            "protocolVersion": PROTOCOL_VERSION,
            "capabilities": {
                "resources": {},
                "tools": {},
                "prompts": {}
            },
            "serverInfo": {
                "name": "codemetrics",
                "version": env!("CARGO_PKG_VERSION")
            }
        })
    }

    /// Returns the current runtime statistics as a JSON value.
    pub fn stats_json(&self) -> Value {
        json!({
            "uptime_secs": self.stats.started_at.elapsed().as_secs(),
            "total_requests": self.stats.total_requests.load(Ordering::Relaxed),
            "tool_calls": self.stats.tool_calls.load(Ordering::Relaxed),
            "errors": self.stats.errors.load(Ordering::Relaxed),
        })
    }
}

fn param_str<'a>(params: &'a Value, name: &str) -> Result<&'a str> {
    params
        .get(name)
        .and_then(|v| v.as_str())
        .ok_or_else(|| MetricsError::invalid_params(format!("missing '{}' in params", name)))
}

/// Maps an error to its wire code.
pub fn error_code(err: &MetricsError) -> ErrorCode {
    match err {
        MetricsError::InvalidPath { .. } => ErrorCode::InvalidPath,
        MetricsError::FileUnreadable { .. } => ErrorCode::FileUnreadable,
        MetricsError::Scan { .. } => ErrorCode::ScanFailed,
        MetricsError::UnknownMethod { .. }
        | MetricsError::UnknownResource { .. }
        | MetricsError::UnknownTool { .. }
        | MetricsError::UnknownPrompt { .. } => ErrorCode::MethodNotFound,
        MetricsError::InvalidParams { .. } => ErrorCode::InvalidParams,
        MetricsError::Handler { .. }
        | MetricsError::Config { .. }
        | MetricsError::Io(_)
        | MetricsError::Json(_) => ErrorCode::InternalError,
    }
}

/// Re-signals errors outside the typed taxonomy as a handler failure that
/// keeps the original message.
pub fn into_handler_failure(err: MetricsError) -> MetricsError {
    match error_code(&err) {
        ErrorCode::InternalError if !matches!(err, MetricsError::Handler { .. }) => {
            MetricsError::Handler {
                message: err.to_string(),
            }
        }
        _ => err,
    }
}

/// Builds the error response for a failed request.
pub fn error_response(id: Value, err: MetricsError) -> JsonRpcResponse {
    let err = into_handler_failure(err);
    let data = err.identifier().map(|identifier| json!({ "identifier": identifier }));
    JsonRpcResponse::error_with_data(id, error_code(&err), err.to_string(), data)
}
