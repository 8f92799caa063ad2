use crate::common::security::ValidationError;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors from configuration directory access.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The file or directory does not exist.
    #[error("no such file or directory: {}", .0.display())]
    NotFound(PathBuf),
    /// A tool argument failed validation.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// The path resolves outside the configuration directory.
    #[error("path not allowed: {} is outside the configuration directory", .0.display())]
    OutsideConfigDir(PathBuf),
    /// The resource URI does not use the `file://` scheme.
    #[error("unsupported resource uri: {0}")]
    UnsupportedUri(String),
    /// An I/O error other than not-found.
    #[error("failed to {action} {}: {source}", .path.display())]
    Io {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// Directory traversal failed part way.
    #[error("failed to walk configuration directory: {0}")]
    Walk(#[from] walkdir::Error),
    /// The blocking filesystem task panicked or was cancelled.
    #[error("filesystem task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl ConfigError {
    /// Wrap an I/O error, mapping `NotFound` to [`ConfigError::NotFound`].
    pub fn io(action: &'static str, path: &Path, source: std::io::Error) -> Self {
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::NotFound(path.to_path_buf())
        } else {
            ConfigError::Io {
                action,
                path: path.to_path_buf(),
                source,
            }
        }
    }

    pub fn is_not_found(&self) -> bool {
        match self {
            ConfigError::NotFound(_) => true,
            ConfigError::Walk(e) => e
                .io_error()
                .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_io_not_found_is_mapped() {
        let err = ConfigError::io(
            "read",
            Path::new("/cfg/flake.nix"),
            std::io::Error::from(std::io::ErrorKind::NotFound),
        );
        assert!(matches!(err, ConfigError::NotFound(_)));
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "no such file or directory: /cfg/flake.nix");
    }

    #[test]
    fn test_io_other_kinds_are_kept() {
        let err = ConfigError::io(
            "write",
            Path::new("/cfg/flake.nix"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert!(matches!(err, ConfigError::Io { action: "write", .. }));
        assert!(!err.is_not_found());
        assert!(err.to_string().starts_with("failed to write /cfg/flake.nix"));
    }

    #[test]
    fn test_validation_error_is_transparent() {
        let err: ConfigError = ValidationError::Empty {
            field: "file".to_string(),
        }
        .into();
        assert_eq!(err.to_string(), "Field 'file' cannot be empty");
    }
}
