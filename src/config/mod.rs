//! Access to the Nix configuration directory.
//!
//! # Modules
//!
//! - [`paths`] - choosing the configuration directory at start-up
//! - [`store`] - reading, writing and walking files inside it
//! - [`types`] - argument types for the configuration tools
//! - [`error`] - [`ConfigError`]
//!
//! # Examples
//!
//! ```no_run
//! use alfred::config::{ConfigDir, ConfigStore};
//!
//! # fn example() -> anyhow::Result<()> {
//! let store = ConfigStore::new(ConfigDir::resolve()?);
//! let flake = store.read_file("flake.nix")?;
//! store.write_file("flake.nix", &flake)?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod paths;
pub mod store;
pub mod types;

pub use error::ConfigError;
pub use paths::{ConfigDir, ConfigKind};
pub use store::{resource_uri, ConfigFiles, ConfigStore, ConfigTree, LOCK_FILE};
pub use types::{
    GetNixConfigRequest, RequestError, ToolRequest, UpdateNixConfigRequest, GET_TOOL, UPDATE_TOOL,
};
