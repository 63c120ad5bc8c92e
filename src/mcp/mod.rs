//! MCP (Model Context Protocol) server for code metrics.
//!
//! Provides a JSON-RPC 2.0 interface over stdio so that AI assistants can
//! list and read resources, call tools and fetch prompts describing the
//! configured project root.

/// Resource, tool and prompt handlers.
pub mod handlers;

/// Static capability descriptors and identifier parsing.
pub mod registry;

/// Method dispatch and error mapping.
pub mod router;

/// Stdio server loop.
pub mod server;

/// JSON-RPC 2.0 transport types.
pub mod transport;

pub use registry::{CapabilityDescriptor, PromptName, ResourceUri, ToolName};
pub use router::Router;
pub use server::{McpServer, RequestHandler};
pub use transport::{ErrorCode, JsonRpcError, JsonRpcRequest, JsonRpcResponse};
