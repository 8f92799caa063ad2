//! Common infrastructure module.
//!
//! # Modules
//!
//! - [`config_server`] - Main MCP server implementation
//! - [`security`] - Input validation, audit logging, and error mapping
//!
//! # Architecture
//!
//! ```text
//! ConfigServer
//!   ├── ToolRouter (update_nix_config, get_nix_config)
//!   ├── PromptRouter (nix_config_manager)
//!   ├── ConfigStore (reads, writes and walks the configuration directory)
//!   └── AuditLogger (security event logging)
//! ```

pub mod config_server;
pub mod security;
