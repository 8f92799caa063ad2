//! Argument types for the configuration tools.
//!
//! The JSON schemas advertised by `tools/list` are derived from these types,
//! including the defaults of [`GetNixConfigRequest`].

use rmcp::model::JsonObject;
use rmcp::schemars;
use thiserror::Error;

/// Default `config_type` for [`GetNixConfigRequest`].
pub const DEFAULT_CONFIG_TYPE: &str = "nix-darwin";

/// Default `file` for [`GetNixConfigRequest`].
pub const DEFAULT_CONFIG_FILE: &str = "flake.nix";

fn default_config_type() -> String {
    DEFAULT_CONFIG_TYPE.to_string()
}

fn default_config_file() -> String {
    DEFAULT_CONFIG_FILE.to_string()
}

/// Parameters for replacing a configuration file.
///
/// Used by [`ConfigServer::update_nix_config`](crate::common::config_server::ConfigServer::update_nix_config).
///
/// # Examples
///
/// ```
/// use alfred::config::types::UpdateNixConfigRequest;
///
/// let args = UpdateNixConfigRequest {
///     nix_config: "{ }".to_string(),
///     file: "home/default.nix".to_string(),
/// };
/// ```
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
pub struct UpdateNixConfigRequest {
    /// Full replacement content for the file
    pub nix_config: String,
    /// File path relative to the configuration directory (e.g., "flake.nix", "home/default.nix")
    pub file: String,
}

/// Parameters for reading a configuration file.
///
/// Used by [`ConfigServer::get_nix_config`](crate::common::config_server::ConfigServer::get_nix_config).
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize, schemars::JsonSchema)]
pub struct GetNixConfigRequest {
    /// Kind of configuration being read (e.g., "nix-darwin", "home-manager")
    #[serde(default = "default_config_type")]
    pub config_type: String,
    /// File path relative to the configuration directory
    #[serde(default = "default_config_file")]
    pub file: String,
}

impl Default for GetNixConfigRequest {
    fn default() -> Self {
        Self {
            config_type: default_config_type(),
            file: default_config_file(),
        }
    }
}

/// Name of the tool that replaces a configuration file.
pub const UPDATE_TOOL: &str = "update_nix_config";

/// Name of the tool that reads a configuration file.
pub const GET_TOOL: &str = "get_nix_config";

/// Errors from turning a raw `tools/call` request into a [`ToolRequest`].
#[derive(Error, Debug)]
pub enum RequestError {
    #[error("unknown tool: {0}")]
    UnknownTool(String),
    #[error("invalid arguments for {tool}: {source}")]
    InvalidArguments {
        tool: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// A validated tool call.
#[derive(Debug, Clone)]
pub enum ToolRequest {
    Update(UpdateNixConfigRequest),
    Get(GetNixConfigRequest),
}

impl ToolRequest {
    /// Validate `arguments` against the schema of the tool called `name`.
    ///
    /// Missing arguments are treated as an empty object, so `get_nix_config`
    /// can be called bare.
    pub fn parse(name: &str, arguments: Option<JsonObject>) -> Result<Self, RequestError> {
        let arguments = serde_json::Value::Object(arguments.unwrap_or_default());
        match name {
            UPDATE_TOOL => serde_json::from_value(arguments)
                .map(ToolRequest::Update)
                .map_err(|source| RequestError::InvalidArguments {
                    tool: UPDATE_TOOL,
                    source,
                }),
            GET_TOOL => serde_json::from_value(arguments)
                .map(ToolRequest::Get)
                .map_err(|source| RequestError::InvalidArguments {
                    tool: GET_TOOL,
                    source,
                }),
            other => Err(RequestError::UnknownTool(other.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_get_request_defaults() {
        let args: GetNixConfigRequest = serde_json::from_value(json!({})).unwrap();
        assert_eq!(args.config_type, "nix-darwin");
        assert_eq!(args.file, "flake.nix");

        let args: GetNixConfigRequest =
            serde_json::from_value(json!({"file": "home.nix"})).unwrap();
        assert_eq!(args.config_type, "nix-darwin");
        assert_eq!(args.file, "home.nix");
    }

    #[test]
    fn test_update_request_requires_fields() {
        assert!(serde_json::from_value::<UpdateNixConfigRequest>(json!({"file": "a.nix"})).is_err());
        assert!(
            serde_json::from_value::<UpdateNixConfigRequest>(json!({"nix_config": "x"})).is_err()
        );
        assert!(serde_json::from_value::<UpdateNixConfigRequest>(
            json!({"file": "a.nix", "nix_config": 3})
        )
        .is_err());

        let args: UpdateNixConfigRequest =
            serde_json::from_value(json!({"file": "a.nix", "nix_config": "x"})).unwrap();
        assert_eq!(args.file, "a.nix");
        assert_eq!(args.nix_config, "x");
    }

    fn object(value: serde_json::Value) -> Option<JsonObject> {
        value.as_object().cloned()
    }

    #[test]
    fn test_parse_tool_requests() {
        let request = ToolRequest::parse(
            "update_nix_config",
            object(json!({"file": "flake.nix", "nix_config": "X"})),
        )
        .unwrap();
        assert!(matches!(request, ToolRequest::Update(ref args) if args.nix_config == "X"));

        let request = ToolRequest::parse("get_nix_config", None).unwrap();
        assert!(matches!(request, ToolRequest::Get(ref args) if args.file == "flake.nix"));
    }

    #[test]
    fn test_parse_rejects_unknown_and_malformed() {
        let err = ToolRequest::parse("delete_nix_config", None).unwrap_err();
        assert!(matches!(err, RequestError::UnknownTool(ref name) if name == "delete_nix_config"));

        let err = ToolRequest::parse("update_nix_config", object(json!({"file": 1}))).unwrap_err();
        assert!(matches!(
            err,
            RequestError::InvalidArguments {
                tool: "update_nix_config",
                ..
            }
        ));
        assert!(err.to_string().starts_with("invalid arguments for update_nix_config"));
    }

    #[test]
    fn test_schemas_describe_fields() {
        let schema = serde_json::to_value(schemars::schema_for!(GetNixConfigRequest)).unwrap();
        assert_eq!(schema["properties"]["file"]["default"], "flake.nix");
        assert_eq!(schema["properties"]["config_type"]["default"], "nix-darwin");

        let schema = serde_json::to_value(schemars::schema_for!(UpdateNixConfigRequest)).unwrap();
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&json!("file")));
        assert!(required.contains(&json!("nix_config")));
    }
}
