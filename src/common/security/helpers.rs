/// Security helper functions for integrating validation and audit logging into tools
use super::{AuditLogger, ValidationError};
use crate::config::ConfigError;
use rmcp::ErrorData as McpError;
use serde_json::json;
use std::time::Instant;

/// Convert ValidationError to McpError
pub fn validation_error_to_mcp(err: ValidationError) -> McpError {
    McpError::invalid_params(
        err.to_string(),
        Some(json!({
            "validation_error": format!("{:?}", err),
        })),
    )
}

/// Convert ConfigError to McpError
pub fn config_error_to_mcp(err: ConfigError) -> McpError {
    match err {
        ConfigError::Validation(e) => validation_error_to_mcp(e),
        ConfigError::NotFound(ref path) => McpError::resource_not_found(
            err.to_string(),
            Some(json!({
                "path": path.display().to_string(),
            })),
        ),
        ConfigError::OutsideConfigDir(ref path) => McpError::invalid_params(
            err.to_string(),
            Some(json!({
                "path": path.display().to_string(),
            })),
        ),
        ConfigError::UnsupportedUri(ref uri) => McpError::invalid_params(
            err.to_string(),
            Some(json!({
                "uri": uri,
            })),
        ),
        ref other if other.is_not_found() => McpError::resource_not_found(other.to_string(), None),
        other => McpError::internal_error(other.to_string(), None),
    }
}

/// Audit tool execution with timing
pub async fn audit_tool_execution<F, Fut, T>(
    audit: &AuditLogger,
    tool_name: &str,
    parameters: Option<serde_json::Value>,
    f: F,
) -> Result<T, McpError>
where
    F: FnOnce() -> Fut,
    Fut: std::future::Future<Output = Result<T, McpError>>,
{
    let start = Instant::now();
    let result = f().await;
    let duration_ms = start.elapsed().as_millis() as u64;

    match &result {
        Ok(_) => {
            audit.log_tool_invocation(tool_name, parameters, true, None, duration_ms);
        }
        Err(e) => {
            audit.log_tool_invocation(
                tool_name,
                parameters,
                false,
                Some(e.message.to_string()),
                duration_ms,
            );
        }
    }

    result
}
