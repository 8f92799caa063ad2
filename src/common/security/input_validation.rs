/// Input validation for config file arguments
/// Keeps tool arguments confined to the configuration directory
use std::path::{Component, Path};

/// Validation error types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    Empty {
        field: String,
    },
    NullByte {
        field: String,
    },
    PathTraversal {
        path: String,
    },
    AbsolutePath {
        path: String,
    },
    TooLong {
        field: String,
        max_length: usize,
        actual: usize,
    },
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValidationError::Empty { field } => {
                write!(f, "Field '{}' cannot be empty", field)
            }
            ValidationError::NullByte { field } => {
                write!(f, "Field '{}' contains a null byte", field)
            }
            ValidationError::PathTraversal { path } => {
                write!(f, "Path contains traversal attempt: '{}'", path)
            }
            ValidationError::AbsolutePath { path } => {
                write!(
                    f,
                    "Path must be relative to the configuration directory: '{}'",
                    path
                )
            }
            ValidationError::TooLong {
                field,
                max_length,
                actual,
            } => {
                write!(
                    f,
                    "Field '{}' too long: {} characters (max: {})",
                    field, actual, max_length
                )
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum length of a config file argument
const MAX_PATH_LEN: usize = 4096;

/// Validate a config file argument (e.g. "flake.nix", "home/default.nix")
///
/// Ensures the file:
/// - Is not empty
/// - Doesn't contain null bytes
/// - Doesn't exceed length limits
/// - Is relative, so it is joined under the configuration directory
/// - Doesn't climb out of the configuration directory with `..`
pub fn validate_config_file(file: &str) -> Result<(), ValidationError> {
    if file.is_empty() {
        return Err(ValidationError::Empty {
            field: "file".to_string(),
        });
    }

    if file.contains('\0') {
        return Err(ValidationError::NullByte {
            field: "file".to_string(),
        });
    }

    if file.len() > MAX_PATH_LEN {
        return Err(ValidationError::TooLong {
            field: "file".to_string(),
            max_length: MAX_PATH_LEN,
            actual: file.len(),
        });
    }

    let path = Path::new(file);
    for component in path.components() {
        match component {
            Component::ParentDir => {
                return Err(ValidationError::PathTraversal {
                    path: file.to_string(),
                });
            }
            Component::RootDir | Component::Prefix(_) => {
                return Err(ValidationError::AbsolutePath {
                    path: file.to_string(),
                });
            }
            Component::CurDir | Component::Normal(_) => {}
        }
    }

    // "." or "./" alone name the directory itself, not a file
    if path.file_name().is_none() {
        return Err(ValidationError::Empty {
            field: "file".to_string(),
        });
    }

    Ok(())
}
