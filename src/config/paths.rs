//! Selection of the configuration directory.
//!
//! The directory is chosen once at start-up from two candidates under the
//! user's home directory and then passed explicitly to everything that needs
//! it:
//!
//! 1. `~/.config/nix-darwin`
//! 2. `~/.config/home-manager`
//!
//! The first existing candidate wins. When neither exists the home-manager
//! path is kept anyway; filesystem operations against it report not-found.

use anyhow::{Context, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Which kind of Nix configuration the directory holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    NixDarwin,
    HomeManager,
}

impl ConfigKind {
    /// Candidates in the order they are tried.
    pub const CANDIDATES: [ConfigKind; 2] = [ConfigKind::NixDarwin, ConfigKind::HomeManager];

    /// Directory name under `~/.config`.
    pub fn dir_name(self) -> &'static str {
        match self {
            ConfigKind::NixDarwin => "nix-darwin",
            ConfigKind::HomeManager => "home-manager",
        }
    }
}

impl fmt::Display for ConfigKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir_name())
    }
}

/// The configuration directory this server manages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigDir {
    root: PathBuf,
    kind: ConfigKind,
}

impl ConfigDir {
    /// Resolve the configuration directory under the current user's home.
    pub fn resolve() -> Result<Self> {
        let home = dirs::home_dir().context("Could not determine home directory")?;
        Ok(Self::resolve_in(&home))
    }

    /// Resolve the configuration directory under an explicit home directory.
    pub fn resolve_in(home: &Path) -> Self {
        let config_home = home.join(".config");
        for kind in ConfigKind::CANDIDATES {
            let candidate = config_home.join(kind.dir_name());
            if candidate.exists() {
                return Self {
                    root: candidate,
                    kind,
                };
            }
        }

        Self {
            root: config_home.join(ConfigKind::HomeManager.dir_name()),
            kind: ConfigKind::HomeManager,
        }
    }

    /// Use a specific directory, e.g. a temporary one in tests.
    pub fn with_root(root: impl Into<PathBuf>, kind: ConfigKind) -> Self {
        Self {
            root: root.into(),
            kind,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn kind(&self) -> ConfigKind {
        self.kind
    }

    pub fn exists(&self) -> bool {
        self.root.is_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefers_nix_darwin() {
        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(home.path().join(".config/nix-darwin")).unwrap();
        std::fs::create_dir_all(home.path().join(".config/home-manager")).unwrap();

        let dir = ConfigDir::resolve_in(home.path());
        assert_eq!(dir.kind(), ConfigKind::NixDarwin);
        assert_eq!(dir.root(), home.path().join(".config/nix-darwin"));
        assert!(dir.exists());
    }

    #[test]
    fn test_falls_back_to_home_manager() {
        let home = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(home.path().join(".config/home-manager")).unwrap();

        let dir = ConfigDir::resolve_in(home.path());
        assert_eq!(dir.kind(), ConfigKind::HomeManager);
        assert_eq!(dir.root(), home.path().join(".config/home-manager"));
    }

    #[test]
    fn test_missing_candidates_keep_home_manager_path() {
        let home = tempfile::tempdir().unwrap();

        let dir = ConfigDir::resolve_in(home.path());
        assert_eq!(dir.kind(), ConfigKind::HomeManager);
        assert_eq!(dir.root(), home.path().join(".config/home-manager"));
        assert!(!dir.exists());
    }

    #[test]
    fn test_kind_display() {
        assert_eq!(ConfigKind::NixDarwin.to_string(), "nix-darwin");
        assert_eq!(ConfigKind::HomeManager.to_string(), "home-manager");
    }
}
