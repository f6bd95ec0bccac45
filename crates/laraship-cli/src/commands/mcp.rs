//! MCP Server for laraship
//!
//! MCP Protocol (stdio) <-> laraship-build / laraship-docker
//!
//! Each tool is a thin wrapper around the same assembler the CLI uses.

use super::pipeline::{self, Options};
use anyhow::Result;
use laraship_build::HTTP_PORT;
use laraship_core::LarashipConfig;
use rmcp::{
    ErrorData as McpError, ServerHandler, ServiceExt,
    handler::server::{tool::ToolCallContext, tool::ToolRouter, wrapper::Parameters},
    model::{
        CallToolRequestParams, CallToolResult, Content, Implementation, ListToolsResult,
        PaginatedRequestParams, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::{RequestContext, RoleServer},
    tool, tool_router,
    transport::stdio,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// =============================================================================
// CLI entry point
// =============================================================================

/// Execute the MCP server
pub(crate) async fn execute(opts: Options) -> Result<()> {
    let path = opts.path.canonicalize().map_err(|e| {
        anyhow::anyhow!("Project path '{}' not accessible: {e}", opts.path.display())
    })?;

    let server = LarashipMcpServer::new(Options { path, ..opts });
    let service = server.serve(stdio()).await?;
    service.waiting().await?;

    Ok(())
}

// =============================================================================
// MCP Server
// =============================================================================

#[derive(Clone)]
struct LarashipMcpServer {
    opts: Options,
    tool_router: ToolRouter<Self>,
}

impl LarashipMcpServer {
    fn new(opts: Options) -> Self {
        Self {
            opts,
            tool_router: Self::tool_router(),
        }
    }

    fn assembler(&self) -> Result<pipeline::DockerAssembler, McpError> {
        pipeline::assembler(&self.opts)
            .map_err(|e| McpError::internal_error(format!("Failed to prepare build: {e}"), None))
    }
}

// =============================================================================
// ServerHandler impl
// =============================================================================

impl ServerHandler for LarashipMcpServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::V_2025_03_26,
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "laraship".to_string(),
                title: Some("laraship — Laravel container builds".to_string()),
                description: Some(
                    "Build a Laravel runtime image, run artisan commands in it, and serve it."
                        .to_string(),
                ),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "laraship MCP server for Laravel container builds. \
                 Use `config` to see build settings, `build` to assemble the image, \
                 `artisan` to run a command in it, and `serve` to start it on port 8080."
                    .to_string(),
            ),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParams>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tool_router.list_all(),
            next_cursor: None,
            meta: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParams,
        context: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        let tool_ctx = ToolCallContext::new(self, request, context);
        self.tool_router.call(tool_ctx).await
    }
}

// =============================================================================
// Request types
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpConfigRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpBuildRequest {}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpArtisanRequest {
    #[schemars(description = "Arguments for `php artisan`, space separated (e.g. \"migrate --force\")")]
    pub command: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct McpServeRequest {}

// =============================================================================
// Tool implementations — thin wrappers only
// =============================================================================

#[tool_router]
impl LarashipMcpServer {
    #[tool(
        name = "config",
        description = "Show the current laraship.toml configuration as JSON, with defaults applied.",
        annotations(
            read_only_hint = true,
            destructive_hint = false,
            open_world_hint = false
        )
    )]
    async fn config(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpConfigRequest>,
    ) -> Result<CallToolResult, McpError> {
        let config = LarashipConfig::load(&self.opts.path)
            .map_err(|e| McpError::internal_error(format!("Failed to load config: {e}"), None))?;

        let json = serde_json::to_string_pretty(&config).map_err(|e| {
            McpError::internal_error(format!("Failed to serialize config: {e}"), None)
        })?;

        Ok(CallToolResult::success(vec![Content::text(json)]))
    }

    #[tool(
        name = "build",
        description = "Build the runtime image: composer install, npm build, runtime layout, system packages, nginx document root. Returns the image tag. Long-running operation.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = true,
            open_world_hint = true
        )
    )]
    async fn build(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpBuildRequest>,
    ) -> Result<CallToolResult, McpError> {
        let tag = self
            .assembler()?
            .publish()
            .await
            .map_err(|e| McpError::internal_error(format!("{e}"), None))?;

        Ok(CallToolResult::success(vec![Content::text(tag)]))
    }

    #[tool(
        name = "artisan",
        description = "Rebuild the image and run `php artisan <command>` in it. Returns the command's stdout.",
        annotations(
            read_only_hint = false,
            destructive_hint = true,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    async fn artisan(
        &self,
        Parameters(req): Parameters<McpArtisanRequest>,
    ) -> Result<CallToolResult, McpError> {
        let output = self
            .assembler()?
            .artisan(&req.command)
            .await
            .map_err(|e| McpError::internal_error(format!("{e}"), None))?;

        Ok(CallToolResult::success(vec![Content::text(output)]))
    }

    #[tool(
        name = "serve",
        description = "Rebuild the image and start it detached, publishing port 8080. Returns the container id.",
        annotations(
            read_only_hint = false,
            destructive_hint = false,
            idempotent_hint = false,
            open_world_hint = true
        )
    )]
    async fn serve_app(
        &self,
        #[allow(unused_variables)] Parameters(_req): Parameters<McpServeRequest>,
    ) -> Result<CallToolResult, McpError> {
        let service = self
            .assembler()?
            .serve()
            .await
            .map_err(|e| McpError::internal_error(format!("{e}"), None))?;

        Ok(CallToolResult::success(vec![Content::text(format!(
            "Container {} serving on http://localhost:{HTTP_PORT}",
            service.id
        ))]))
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn opts() -> Options {
        Options {
            path: PathBuf::from("."),
            no_cache: false,
            no_frontend: false,
        }
    }

    #[test]
    fn artisan_request_requires_command() {
        let result: Result<McpArtisanRequest, _> = serde_json::from_str("{}");
        assert!(result.is_err());
    }

    #[test]
    fn artisan_request_keeps_command_verbatim() {
        let req: McpArtisanRequest =
            serde_json::from_str(r#"{"command": "migrate  --force"}"#).unwrap();
        assert_eq!(req.command, "migrate  --force");
    }

    #[test]
    fn empty_requests_parse() {
        assert!(serde_json::from_str::<McpBuildRequest>("{}").is_ok());
        assert!(serde_json::from_str::<McpServeRequest>("{}").is_ok());
        assert!(serde_json::from_str::<McpConfigRequest>("{}").is_ok());
    }

    #[test]
    fn server_info_version() {
        let server = LarashipMcpServer::new(opts());
        let info = server.get_info();
        assert_eq!(info.server_info.name, "laraship");
        assert!(!info.server_info.version.is_empty());
    }

    #[test]
    fn tool_router_lists_entry_points() {
        let server = LarashipMcpServer::new(opts());
        let mut names: Vec<String> = server
            .tool_router
            .list_all()
            .into_iter()
            .map(|t| t.name.to_string())
            .collect();
        names.sort();
        assert_eq!(names, vec!["artisan", "build", "config", "serve"]);
    }
}
