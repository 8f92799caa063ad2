//! Security infrastructure for the alfred server.
//!
//! # Modules
//!
//! - [`audit`] - Security event logging and audit trail management
//! - [`helpers`] - Error conversion and audited tool execution
//! - [`input_validation`] - Validation of file arguments
//!
//! # Security Features
//!
//! ## Input Validation
//!
//! Tool `file` arguments are validated before they touch the filesystem:
//!
//! - **Path Traversal Protection**: Rejects `..` components and absolute paths
//! - **Null Byte Filtering**: Blocks null bytes that could truncate paths
//! - **Length Limits**: Enforces a maximum path length
//!
//! Resource URIs are confined separately by
//! [`ConfigStore::resolve_resource`](crate::config::ConfigStore::resolve_resource).
//!
//! ## Audit Logging
//!
//! Security-relevant events are logged to stderr via `tracing`:
//!
//! - Tool invocations with parameters and timing
//! - Validation failures
//! - Configuration writes
//! - Rejected resource reads
//!
//! # Examples
//!
//! ```no_run
//! use alfred::common::security::{validate_config_file, audit_logger};
//!
//! validate_config_file("home/default.nix").expect("Invalid file");
//!
//! let logger = audit_logger();
//! logger.log_tool_invocation("get_nix_config", None, true, None, 0);
//! ```

pub mod audit;
pub mod helpers;
pub mod input_validation;

pub use audit::{audit_logger, AuditLogger};
pub use helpers::{config_error_to_mcp, validation_error_to_mcp};
pub use input_validation::{validate_config_file, ValidationError};
