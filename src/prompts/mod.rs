//! MCP prompts module.
//!
//! Provides the `nix_config_manager` prompt, which instructs an agent to manage
//! the configuration through a plan+apply loop and embeds a live snapshot of
//! the configuration directory.
//!
//! The prompt is registered on
//! [`ConfigServer`](crate::common::config_server::ConfigServer); this module only
//! renders its text.
//!
//! # Examples
//!
//! ```
//! use alfred::config::{ConfigKind, ConfigTree};
//! use alfred::prompts::render_manager_prompt;
//!
//! let text = render_manager_prompt(&ConfigTree::new(), ConfigKind::NixDarwin);
//! assert!(text.contains("<BEGIN NIX CONFIG>"));
//! ```

pub mod nix_config_manager;

pub use nix_config_manager::{
    manager_prompt, render_manager_prompt, PROMPT_DESCRIPTION, PROMPT_NAME, SAMPLE_CONFIG,
};
