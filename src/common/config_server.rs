use crate::common::security::helpers::audit_tool_execution;
use crate::common::security::{audit_logger, config_error_to_mcp, AuditLogger};
use crate::config::{
    resource_uri, ConfigError, ConfigStore, ConfigTree, GetNixConfigRequest, ToolRequest,
    UpdateNixConfigRequest,
};
use crate::prompts;
use rmcp::{
    handler::server::{
        router::{prompt::PromptRouter, tool::ToolRouter},
        wrapper::Parameters,
    },
    model::*,
    prompt, prompt_handler, prompt_router,
    service::RequestContext,
    tool, tool_router, ErrorData as McpError, RoleServer, ServerHandler,
};
use serde_json::json;
use std::sync::Arc;

const RESOURCE_DESCRIPTION: &str = "Nix Configuration File";
const RESOURCE_MIME_TYPE: &str = "text/plain";

/// MCP server exposing one Nix configuration directory.
///
/// Tools, the config manager prompt and one resource per configuration file
/// are all served from the same [`ConfigStore`]. Filesystem work runs on the
/// blocking thread pool.
#[derive(Clone)]
pub struct ConfigServer {
    tool_router: ToolRouter<ConfigServer>,
    prompt_router: PromptRouter<ConfigServer>,
    audit: Arc<AuditLogger>,
    store: Arc<ConfigStore>,
}

#[tool_router]
impl ConfigServer {
    pub fn new(store: ConfigStore) -> Self {
        Self {
            tool_router: Self::tool_router(),
            prompt_router: Self::prompt_router(),
            audit: audit_logger(),
            store: Arc::new(store),
        }
    }

    #[tool(
        description = "Update Nix Config: replace a file in the configuration directory with the given content",
        annotations(destructive_hint = true, idempotent_hint = true)
    )]
    pub async fn update_nix_config(
        &self,
        Parameters(UpdateNixConfigRequest { nix_config, file }): Parameters<UpdateNixConfigRequest>,
    ) -> Result<CallToolResult, McpError> {
        let bytes = nix_config.len();

        audit_tool_execution(
            &self.audit,
            "update_nix_config",
            Some(json!({"file": &file, "content_length": bytes})),
            || async {
                let requested = file.clone();
                let written = self
                    .run_store(move |store| store.write_file(&requested, &nix_config))
                    .await
                    .map_err(|e| self.store_error("file", &file, e))?;

                self.audit
                    .log_config_written(&written.display().to_string(), bytes);
                Ok(CallToolResult::success(vec![Content::text(
                    "Updated Nix Config",
                )]))
            },
        )
        .await
    }

    #[tool(
        description = "Get Nix Config: read a file from the configuration directory (defaults to flake.nix)",
        annotations(read_only_hint = true)
    )]
    pub async fn get_nix_config(
        &self,
        Parameters(GetNixConfigRequest { config_type, file }): Parameters<GetNixConfigRequest>,
    ) -> Result<CallToolResult, McpError> {
        audit_tool_execution(
            &self.audit,
            "get_nix_config",
            Some(json!({"config_type": &config_type, "file": &file})),
            || async {
                let requested = file.clone();
                let content = self
                    .run_store(move |store| store.read_file(&requested))
                    .await
                    .map_err(|e| self.store_error("file", &file, e))?;

                Ok(CallToolResult::success(vec![Content::text(content)]))
            },
        )
        .await
    }
}

impl ConfigServer {
    /// Tool descriptors advertised by `tools/list`.
    pub fn tools(&self) -> Vec<Tool> {
        self.tool_router.list_all()
    }

    /// Validate and run one tool call.
    ///
    /// Never fails: unknown tools, malformed arguments and filesystem errors
    /// all come back as a [`CallToolResult`] with `is_error` set and a
    /// `Failed to update Nix Config: <reason>` message, whichever tool failed.
    pub async fn dispatch_tool(&self, name: &str, arguments: Option<JsonObject>) -> CallToolResult {
        tracing::debug!(tool = name, "dispatching tool call");

        let outcome = match ToolRequest::parse(name, arguments) {
            Ok(ToolRequest::Update(args)) => self.update_nix_config(Parameters(args)).await,
            Ok(ToolRequest::Get(args)) => self.get_nix_config(Parameters(args)).await,
            Err(err) => {
                self.audit
                    .log_tool_invocation(name, None, false, Some(err.to_string()), 0);
                Err(McpError::invalid_params(err.to_string(), None))
            }
        };

        outcome.unwrap_or_else(|err| {
            tracing::warn!(tool = name, error = %err.message, "tool call failed");
            tool_failure(&err)
        })
    }

    /// Fresh snapshot of the configuration directory.
    pub async fn config_tree(&self) -> Result<ConfigTree, ConfigError> {
        self.run_store(|store| store.tree()).await
    }

    /// One resource per file in the current snapshot.
    pub async fn config_resources(&self) -> Result<Vec<Resource>, McpError> {
        let tree = self.config_tree().await.map_err(config_error_to_mcp)?;

        Ok(tree
            .iter()
            .flat_map(|(dir, files)| files.keys().map(move |name| config_resource(dir, name)))
            .collect())
    }

    /// Contents of a `file://` resource inside the configuration directory.
    pub async fn read_config_resource(&self, uri: &str) -> Result<ReadResourceResult, McpError> {
        let requested = uri.to_string();
        match self
            .run_store(move |store| store.read_resource(&requested))
            .await
        {
            Ok(content) => Ok(ReadResourceResult {
                contents: vec![ResourceContents::text(content, uri)],
            }),
            Err(err) => {
                if let ConfigError::OutsideConfigDir(_) = err {
                    self.audit
                        .log_access_denied(uri, "outside configuration directory");
                }
                Err(config_error_to_mcp(err))
            }
        }
    }

    /// The `nix_config_manager` prompt rendered against the live directory.
    pub async fn render_prompt(&self) -> Result<GetPromptResult, McpError> {
        let tree = self.config_tree().await.map_err(config_error_to_mcp)?;
        Ok(prompts::manager_prompt(&tree, self.store.dir().kind()))
    }

    async fn run_store<T, F>(&self, f: F) -> Result<T, ConfigError>
    where
        F: FnOnce(&ConfigStore) -> Result<T, ConfigError> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || f(&store)).await?
    }

    fn store_error(&self, field: &str, value: &str, err: ConfigError) -> McpError {
        match err {
            ConfigError::Validation(ref reason) => {
                self.audit
                    .log_validation_failure(field, value, &reason.to_string());
            }
            ConfigError::OutsideConfigDir(_) => {
                self.audit
                    .log_access_denied(value, "outside configuration directory");
            }
            _ => {}
        }
        config_error_to_mcp(err)
    }
}

fn config_resource(dir: &str, file: &str) -> Resource {
    let mut raw = RawResource::new(resource_uri(dir, file), file.to_string());
    raw.description = Some(RESOURCE_DESCRIPTION.to_string());
    raw.mime_type = Some(RESOURCE_MIME_TYPE.to_string());
    raw.no_annotation()
}

fn tool_failure(err: &McpError) -> CallToolResult {
    CallToolResult::error(vec![Content::text(format!(
        "Failed to update Nix Config: {}",
        err.message
    ))])
}

#[prompt_router]
impl ConfigServer {
    /// Nix Config Manager
    #[prompt(name = "nix_config_manager")]
    async fn nix_config_manager(
        &self,
        Parameters(_args): Parameters<serde_json::Map<String, serde_json::Value>>,
        _ctx: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        self.render_prompt().await
    }
}

#[prompt_handler]
impl ServerHandler for ConfigServer {
    fn get_info(&self) -> ServerInfo {
        let dir = self.store.dir();
        ServerInfo {
            protocol_version: ProtocolVersion::V_2024_11_05,
            capabilities: ServerCapabilities::builder()
                .enable_prompts()
                .enable_resources()
                .enable_tools()
                .build(),
            server_info: Implementation::from_build_env(),
            instructions: Some(format!(
                "This server manages the {} configuration in {}. \
                \n\nEvery configuration file (except flake.lock) is listed as a file:// resource. \
                \n\nTools: \
                - get_nix_config - read a file (relative path, defaults to flake.nix) \
                - update_nix_config - replace a file with new content \
                \n\nUse the nix_config_manager prompt to work in a plan+apply loop: present a plan, \
                and only call update_nix_config after the user replies \"apply\".",
                dir.kind(),
                self.store.root().display()
            )),
        }
    }

    async fn list_tools(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> Result<ListToolsResult, McpError> {
        Ok(ListToolsResult {
            tools: self.tools(),
            next_cursor: None,
        })
    }

    async fn call_tool(
        &self,
        request: CallToolRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<CallToolResult, McpError> {
        Ok(self.dispatch_tool(&request.name, request.arguments).await)
    }

    async fn list_resources(
        &self,
        _request: Option<PaginatedRequestParam>,
        _: RequestContext<RoleServer>,
    ) -> Result<ListResourcesResult, McpError> {
        Ok(ListResourcesResult {
            resources: self.config_resources().await?,
            next_cursor: None,
        })
    }

    async fn read_resource(
        &self,
        ReadResourceRequestParam { uri }: ReadResourceRequestParam,
        _: RequestContext<RoleServer>,
    ) -> Result<ReadResourceResult, McpError> {
        self.read_config_resource(&uri).await
    }
}
