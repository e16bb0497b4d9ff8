//! chorus-mcp - Model Context Protocol client over stdio
//!
//! A pass-through client for MCP servers: spawn the server process, run
//! the initialize handshake, then forward `tools/list` and `tools/call`
//! requests over the child's stdin/stdout as JSON-RPC 2.0 lines.
//!
//! Unlike the provider dispatcher, every failure here is wrapped in a
//! descriptive [`McpError`] and returned to the caller.

pub mod client;
pub mod protocol;

pub use client::{McpClient, McpError};
pub use protocol::{CallToolResult, JsonRpcRequest, JsonRpcResponse, McpTool, ToolContent};

/// MCP protocol revision this client speaks.
pub const PROTOCOL_VERSION: &str = "2024-11-05";
