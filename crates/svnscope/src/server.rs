//! MCP server implementation for svnscope
//!
//! This module exposes the six router operations to the UI process as MCP
//! tools over stdio. It forwards every call to the router and returns the
//! handler's JSON result as text content.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use rust_mcp_sdk::mcp_server::{
    McpServerOptions, ServerHandler, ToMcpServerHandler, server_runtime,
};
use rust_mcp_sdk::schema::{
    CallToolRequestParams, CallToolResult, Implementation, InitializeResult, ListToolsResult,
    PaginatedRequestParams, ProtocolVersion, RpcError, ServerCapabilities,
    ServerCapabilitiesTools, TextContent, Tool, ToolInputSchema, schema_utils::CallToolError,
};
use rust_mcp_sdk::{McpServer, StdioTransport, TransportOptions};
use serde_json::{Map, Value, json};

use crate::context::AppContext;
use crate::router::{Operation, Router};

/// Convert a JSON object into the properties format expected by ToolInputSchema.
///
/// ToolInputSchema expects `HashMap<String, Map<String, Value>>` for properties,
/// where each key maps to a JSON object describing that property's schema.
fn make_properties(json_obj: Value) -> HashMap<String, Map<String, Value>> {
    let mut properties = HashMap::new();
    if let Value::Object(obj) = json_obj {
        for (key, value) in obj {
            if let Value::Object(inner) = value {
                properties.insert(key, inner);
            }
        }
    }
    properties
}

/// The svnscope MCP server handler
pub struct SvnScopeServer {
    ctx: Arc<AppContext>,
    router: Router,
}

impl SvnScopeServer {
    /// Create a server over a context and a validated router
    #[must_use]
    pub fn new(ctx: AppContext, router: Router) -> Self {
        Self {
            ctx: Arc::new(ctx),
            router,
        }
    }

    /// The application context
    #[must_use]
    pub fn context(&self) -> &AppContext {
        &self.ctx
    }

    /// The operation router
    #[must_use]
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Build the list of available tools, one per operation
    pub fn build_tools() -> Vec<Tool> {
        Operation::ALL.into_iter().map(Self::tool).collect()
    }

    fn tool(op: Operation) -> Tool {
        let (title, description, required, properties): (&str, &str, Vec<String>, Value) =
            match op {
                Operation::SelectDirectory => (
                    "Select Directory",
                    "Open a directory chooser and return the chosen absolute path, \
                     or null when cancelled.",
                    vec![],
                    json!({}),
                ),
                Operation::GetSvnLog => (
                    "Subversion Log",
                    "Fetch verbose svn log entries with changed paths for the last N days \
                     of a working copy, newest first, optionally filtered by author.",
                    vec!["dirPath".into()],
                    json!({
                        "dirPath": {
                            "type": "string",
                            "description": "Working copy directory"
                        },
                        "days": {
                            "type": "integer",
                            "default": 7,
                            "description": "Days of history counted back from today"
                        },
                        "author": {
                            "type": "string",
                            "description": "Case-insensitive author substring (optional)"
                        }
                    }),
                ),
                Operation::ReadFile => (
                    "Read File",
                    "Read a local file as text. Returns an empty string if it cannot be read.",
                    vec!["filePath".into()],
                    json!({
                        "filePath": {
                            "type": "string",
                            "description": "Local file path"
                        }
                    }),
                ),
                Operation::GetSvnFile => (
                    "File At Revision",
                    "Fetch a working copy file as of a revision. Returns an empty string \
                     on any failure.",
                    vec!["filePath".into(), "revision".into()],
                    json!({
                        "filePath": {
                            "type": "string",
                            "description": "File inside a working copy"
                        },
                        "revision": {
                            "type": ["string", "integer"],
                            "description": "Revision number"
                        }
                    }),
                ),
                Operation::WriteFile => (
                    "Write File",
                    "Overwrite a local file with the given text.",
                    vec!["filePath".into(), "content".into()],
                    json!({
                        "filePath": {
                            "type": "string",
                            "description": "Local file path"
                        },
                        "content": {
                            "type": "string",
                            "description": "New file content"
                        }
                    }),
                ),
                Operation::ListFiles => (
                    "List Files",
                    "Recursively list files under a directory, skipping .svn and \
                     node_modules. Returns an empty list on failure.",
                    vec!["dirPath".into()],
                    json!({
                        "dirPath": {
                            "type": "string",
                            "description": "Root directory"
                        }
                    }),
                ),
            };

        Tool {
            name: op.name().into(),
            description: Some(description.into()),
            input_schema: ToolInputSchema::new(required, Some(make_properties(properties)), None),
            annotations: None,
            execution: None,
            icons: vec![],
            meta: None,
            output_schema: None,
            title: Some(title.into()),
        }
    }
}

/// Serve the tools over stdio until the client disconnects
///
/// # Errors
///
/// Returns an error if the transport cannot be created or the server stops
/// abnormally.
pub async fn serve_stdio(server: SvnScopeServer) -> anyhow::Result<()> {
    let server_details = InitializeResult {
        server_info: Implementation {
            name: "svnscope".into(),
            version: env!("CARGO_PKG_VERSION").into(),
            title: Some("svnscope".into()),
            description: Some("Browse Subversion history of a local working copy".into()),
            icons: vec![],
            website_url: None,
        },
        capabilities: ServerCapabilities {
            tools: Some(ServerCapabilitiesTools { list_changed: None }),
            ..Default::default()
        },
        meta: None,
        instructions: Some(
            "Call select-directory to pick a working copy, get-svn-log to list recent \
             commits, then get-svn-file and read-file to compare a file across revisions."
                .into(),
        ),
        protocol_version: ProtocolVersion::V2025_11_25.into(),
    };

    let transport = StdioTransport::new(TransportOptions::default())
        .map_err(|e| anyhow::anyhow!("Failed to create stdio transport: {e}"))?;

    let runtime = server_runtime::create_server(McpServerOptions {
        server_details,
        transport,
        handler: server.to_mcp_server_handler(),
        task_store: None,
        client_task_store: None,
    });

    runtime
        .start()
        .await
        .map_err(|e| anyhow::anyhow!("MCP server stopped: {e}"))
}

/// ServerHandler implementation for the MCP protocol
#[async_trait]
impl ServerHandler for SvnScopeServer {
    /// Handle requests to list available tools
    async fn handle_list_tools_request(
        &self,
        _params: Option<PaginatedRequestParams>,
        _runtime: Arc<dyn McpServer>,
    ) -> Result<ListToolsResult, RpcError> {
        Ok(ListToolsResult {
            tools: Self::build_tools(),
            meta: None,
            next_cursor: None,
        })
    }

    /// Handle requests to call a specific tool
    async fn handle_call_tool_request(
        &self,
        params: CallToolRequestParams,
        _runtime: Arc<dyn McpServer>,
    ) -> Result<CallToolResult, CallToolError> {
        tracing::debug!(tool = %params.name, "Calling tool");

        let Some(handler) = self.router.get(&params.name) else {
            return Err(CallToolError::unknown_tool(&params.name));
        };

        match handler(self.ctx.as_ref(), params.arguments).await {
            Ok(value) => Ok(CallToolResult::text_content(vec![TextContent::new(
                value.to_string(),
                None,
                None,
            )])),
            Err(e) => {
                tracing::warn!(tool = %params.name, error = %e, "Tool call failed");
                Err(CallToolError::new(e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use svnscope_svn::SvnRunner;

    use crate::context::CommandPicker;

    fn create_test_server() -> SvnScopeServer {
        let ctx = AppContext::new(SvnRunner::default(), Box::new(CommandPicker::new("exit 1")));
        SvnScopeServer::new(ctx, Router::new().expect("router"))
    }

    #[test]
    fn test_server_creation() {
        let server = create_test_server();
        assert_eq!(server.router().len(), 6);
        assert_eq!(server.context().runner().program(), "svn");
    }

    #[test]
    fn test_build_tools() {
        let tools = SvnScopeServer::build_tools();
        assert_eq!(tools.len(), 6);

        let tool_names: Vec<&str> = tools.iter().map(|t| t.name.as_str()).collect();
        assert!(tool_names.contains(&"select-directory"));
        assert!(tool_names.contains(&"get-svn-log"));
        assert!(tool_names.contains(&"read-file"));
        assert!(tool_names.contains(&"get-svn-file"));
        assert!(tool_names.contains(&"write-file"));
        assert!(tool_names.contains(&"list-files"));
    }

    #[test]
    fn test_every_tool_is_routed() {
        let server = create_test_server();
        for tool in SvnScopeServer::build_tools() {
            assert!(
                server.router().get(&tool.name).is_some(),
                "Tool {} has no route",
                tool.name
            );
        }
    }

    #[test]
    fn test_tool_schemas_have_properties() {
        let tools = SvnScopeServer::build_tools();
        for tool in tools {
            assert!(
                tool.input_schema.properties.is_some(),
                "Tool {} should have properties",
                tool.name
            );
        }
    }
}
