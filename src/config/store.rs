//! Filesystem access to the configuration directory.
//!
//! [`ConfigStore`] owns the resolved [`ConfigDir`] and implements every
//! operation the server performs on it:
//!
//! - [`tree`](ConfigStore::tree) walks the whole directory into a
//!   directory -> file name -> content snapshot, skipping `flake.lock`
//! - [`read_file`](ConfigStore::read_file) / [`write_file`](ConfigStore::write_file)
//!   access one file addressed relative to the directory
//! - [`resolve_resource`](ConfigStore::resolve_resource) maps a `file://` URI
//!   back to a path, refusing anything outside the directory
//!
//! Nothing is cached; every call goes to disk. Writes are staged in a
//! temporary file next to the target and renamed over it, so a failed write
//! never leaves a truncated configuration file behind.

use crate::common::security::validate_config_file;
use crate::config::error::ConfigError;
use crate::config::paths::ConfigDir;
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Component, Path, PathBuf};
use walkdir::WalkDir;

/// Lock files are generated by nix and never exposed.
pub const LOCK_FILE: &str = "flake.lock";

/// URI scheme used for configuration resources.
pub const FILE_SCHEME: &str = "file://";

/// File name -> content for one directory.
pub type ConfigFiles = BTreeMap<String, String>;

/// Directory path -> files directly inside it.
pub type ConfigTree = BTreeMap<String, ConfigFiles>;

/// Build the resource URI for a file listed in a [`ConfigTree`].
pub fn resource_uri(dir: &str, file: &str) -> String {
    format!("{}{}/{}", FILE_SCHEME, dir, file)
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    dir: ConfigDir,
    root: PathBuf,
}

impl ConfigStore {
    pub fn new(dir: ConfigDir) -> Self {
        // Normalise away trailing separators and `.` so walked paths and
        // their parents render identically.
        let root = dir.root().components().collect();
        Self { dir, root }
    }

    pub fn dir(&self) -> &ConfigDir {
        &self.dir
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Snapshot every file under the configuration directory.
    ///
    /// Each visited directory becomes a key, even when it holds no eligible
    /// files. Symlinked files are read when they resolve inside the
    /// directory; symlinked directories are not descended. The first
    /// unreadable or non-UTF-8 file aborts the walk.
    pub fn tree(&self) -> Result<ConfigTree, ConfigError> {
        let root = self.canonical_root()?;
        let mut tree = ConfigTree::new();

        for entry in WalkDir::new(&self.root).sort_by_file_name() {
            let entry = entry.map_err(walk_error)?;
            let path = entry.path();

            if entry.file_type().is_dir() {
                tree.entry(path.display().to_string()).or_default();
                continue;
            }

            // Skips sockets, fifos, dangling links and links to directories
            if !path.is_file() {
                continue;
            }

            let name = entry.file_name().to_string_lossy();
            if name == LOCK_FILE {
                continue;
            }

            if entry.path_is_symlink() {
                let target =
                    fs::canonicalize(path).map_err(|e| ConfigError::io("resolve", path, e))?;
                if !target.starts_with(&root) {
                    tracing::debug!(
                        link = %path.display(),
                        target = %target.display(),
                        "skipping symlink that leaves the configuration directory"
                    );
                    continue;
                }
            }

            let Some(parent) = path.parent() else {
                continue;
            };

            let content =
                fs::read_to_string(path).map_err(|e| ConfigError::io("read", path, e))?;
            tree.entry(parent.display().to_string())
                .or_default()
                .insert(name.into_owned(), content);
        }

        tracing::debug!(
            root = %self.root.display(),
            directories = tree.len(),
            "walked configuration directory"
        );
        Ok(tree)
    }

    /// Join a validated relative file argument onto the directory.
    pub fn config_path(&self, file: &str) -> Result<PathBuf, ConfigError> {
        validate_config_file(file)?;
        Ok(self.root.join(file))
    }

    /// Read one configuration file.
    pub fn read_file(&self, file: &str) -> Result<String, ConfigError> {
        let path = self.confine(&self.config_path(file)?)?;
        fs::read_to_string(&path).map_err(|e| ConfigError::io("read", &path, e))
    }

    /// Replace (or create) one configuration file with `content`.
    ///
    /// Returns the resolved path that was written. If the file is a symlink
    /// its target is replaced and the link is left in place, as long as the
    /// target lies inside the directory. The containing directory must
    /// already exist.
    pub fn write_file(&self, file: &str, content: &str) -> Result<PathBuf, ConfigError> {
        let target = self.confine(&self.config_path(file)?)?;

        let parent = target
            .parent()
            .ok_or_else(|| ConfigError::NotFound(target.clone()))?;
        let previous = fs::metadata(&target).ok();

        let mut staged = tempfile::Builder::new()
            .prefix(".alfred-")
            .suffix(".tmp")
            .tempfile_in(parent)
            .map_err(|e| ConfigError::io("stage", &target, e))?;

        staged
            .write_all(content.as_bytes())
            .map_err(|e| ConfigError::io("write", &target, e))?;
        staged
            .as_file()
            .sync_all()
            .map_err(|e| ConfigError::io("sync", &target, e))?;

        // Temporary files are created owner-only
        let permissions = match previous {
            Some(meta) => Some(meta.permissions()),
            None => default_permissions(),
        };
        if let Some(permissions) = permissions {
            fs::set_permissions(staged.path(), permissions)
                .map_err(|e| ConfigError::io("set permissions on", &target, e))?;
        }

        // Dropping `staged` on any error above removes the temporary file.
        staged
            .persist(&target)
            .map_err(|e| ConfigError::io("replace", &target, e.error))?;

        Ok(target)
    }

    /// Map a `file://` resource URI to a path inside the directory.
    ///
    /// The path is resolved through any symlinks and must stay within the
    /// canonical configuration directory, the same rule the tools follow.
    pub fn resolve_resource(&self, uri: &str) -> Result<PathBuf, ConfigError> {
        let raw = uri
            .strip_prefix(FILE_SCHEME)
            .ok_or_else(|| ConfigError::UnsupportedUri(uri.to_string()))?;
        let requested = Path::new(raw);

        if !requested.is_absolute()
            || requested
                .components()
                .any(|c| matches!(c, Component::ParentDir))
        {
            return Err(ConfigError::OutsideConfigDir(requested.to_path_buf()));
        }

        self.confine(requested)
    }

    /// Read the file behind a `file://` resource URI.
    pub fn read_resource(&self, uri: &str) -> Result<String, ConfigError> {
        let path = self.resolve_resource(uri)?;
        fs::read_to_string(&path).map_err(|e| ConfigError::io("read", &path, e))
    }

    fn canonical_root(&self) -> Result<PathBuf, ConfigError> {
        fs::canonicalize(&self.root).map_err(|e| ConfigError::io("resolve", &self.root, e))
    }

    /// Resolve `path` through symlinks and require it to stay inside the
    /// configuration directory.
    ///
    /// Trailing components that do not exist yet are kept as given, so a
    /// new file can be confined before it is created.
    fn confine(&self, path: &Path) -> Result<PathBuf, ConfigError> {
        let root = self.canonical_root()?;

        let mut existing = path;
        let mut missing = Vec::new();
        let resolved = loop {
            match fs::canonicalize(existing) {
                Ok(resolved) => break resolved,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                    let (Some(parent), Some(name)) = (existing.parent(), existing.file_name())
                    else {
                        return Err(ConfigError::io("resolve", path, e));
                    };
                    missing.push(name);
                    existing = parent;
                }
                Err(e) => return Err(ConfigError::io("resolve", existing, e)),
            }
        };

        let resolved = missing
            .iter()
            .rev()
            .fold(resolved, |acc, name| acc.join(name));
        if !resolved.starts_with(&root) {
            return Err(ConfigError::OutsideConfigDir(resolved));
        }

        Ok(resolved)
    }
}

#[cfg(unix)]
fn default_permissions() -> Option<fs::Permissions> {
    use std::os::unix::fs::PermissionsExt;
    Some(fs::Permissions::from_mode(0o644))
}

#[cfg(not(unix))]
fn default_permissions() -> Option<fs::Permissions> {
    None
}

fn walk_error(err: walkdir::Error) -> ConfigError {
    let not_found = err
        .io_error()
        .is_some_and(|io| io.kind() == std::io::ErrorKind::NotFound);
    if not_found {
        if let Some(path) = err.path() {
            return ConfigError::NotFound(path.to_path_buf());
        }
    }
    ConfigError::Walk(err)
}
