/// Audit logging infrastructure for security events
/// Provides structured logging of tool calls and filesystem access
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{error, info, warn};

/// Security levels for audit events
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum SecurityLevel {
    /// Informational security event (normal operation)
    Info,
    /// Warning - suspicious but allowed
    Warning,
    /// Error - security violation or failure
    Error,
}

/// Audit event types
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "event_type")]
pub enum AuditEvent {
    /// Tool invocation
    ToolInvoked {
        tool_name: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        parameters: Option<serde_json::Value>,
        success: bool,
        #[serde(skip_serializing_if = "Option::is_none")]
        error: Option<String>,
        duration_ms: u64,
    },

    /// Input validation failure
    ValidationFailed {
        field: String,
        value: String,
        reason: String,
    },

    /// A configuration file was replaced on disk
    ConfigWritten { path: String, bytes: usize },

    /// A resource read resolved outside the configuration directory
    AccessDenied { uri: String, reason: String },
}

/// Audit logger implementation
#[derive(Clone)]
pub struct AuditLogger {
    _marker: std::marker::PhantomData<()>,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new() -> Self {
        Self {
            _marker: std::marker::PhantomData,
        }
    }

    /// Log an audit event with security level
    pub fn log(&self, level: SecurityLevel, event: AuditEvent) {
        let event_json = serde_json::to_string(&event)
            .unwrap_or_else(|e| format!("{{\"error\": \"failed to serialize event: {}\"}}", e));

        match level {
            SecurityLevel::Info => {
                info!(
                    security_level = "info",
                    event = %event_json,
                    "Security audit event"
                );
            }
            SecurityLevel::Warning => {
                warn!(
                    security_level = "warning",
                    event = %event_json,
                    "Security audit warning"
                );
            }
            SecurityLevel::Error => {
                error!(
                    security_level = "error",
                    event = %event_json,
                    "Security audit error"
                );
            }
        }
    }

    /// Log tool invocation
    pub fn log_tool_invocation(
        &self,
        tool_name: &str,
        parameters: Option<serde_json::Value>,
        success: bool,
        error: Option<String>,
        duration_ms: u64,
    ) {
        let event = AuditEvent::ToolInvoked {
            tool_name: tool_name.to_string(),
            parameters,
            success,
            error,
            duration_ms,
        };

        let level = if success {
            SecurityLevel::Info
        } else {
            SecurityLevel::Warning
        };

        self.log(level, event);
    }

    /// Log validation failure
    pub fn log_validation_failure(&self, field: &str, value: &str, reason: &str) {
        let event = AuditEvent::ValidationFailed {
            field: field.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        };

        self.log(SecurityLevel::Warning, event);
    }

    /// Log a completed config file write
    pub fn log_config_written(&self, path: &str, bytes: usize) {
        let event = AuditEvent::ConfigWritten {
            path: path.to_string(),
            bytes,
        };

        self.log(SecurityLevel::Info, event);
    }

    /// Log a rejected resource read
    pub fn log_access_denied(&self, uri: &str, reason: &str) {
        let event = AuditEvent::AccessDenied {
            uri: uri.to_string(),
            reason: reason.to_string(),
        };

        self.log(SecurityLevel::Error, event);
    }
}

impl Default for AuditLogger {
    fn default() -> Self {
        Self::new()
    }
}

/// Global audit logger instance
static AUDIT_LOGGER: once_cell::sync::Lazy<Arc<AuditLogger>> =
    once_cell::sync::Lazy::new(|| Arc::new(AuditLogger::new()));

/// Get global audit logger
pub fn audit_logger() -> Arc<AuditLogger> {
    Arc::clone(&AUDIT_LOGGER)
}
