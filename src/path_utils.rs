//! Vault path resolution
//!
//! A vault path may name the file itself or the directory that holds it. In
//! the latter case the default hidden file name is appended:
//! - an existing directory gets `.keychain` appended
//! - a path ending with a separator is treated as a directory even if missing
//! - anything else is used as the file path unchanged

use std::env;
use std::path::{MAIN_SEPARATOR, Path, PathBuf};

use crate::constants::DEFAULT_FILENAME;

/// Resolve a user-supplied vault location to the vault file path
///
/// # Examples
/// ```
/// use rkeychain::resolve_vault_path;
/// use std::path::Path;
/// assert_eq!(
///     resolve_vault_path(Path::new("/nonexistent/vault.kc")),
///     Path::new("/nonexistent/vault.kc")
/// );
/// assert_eq!(
///     resolve_vault_path(Path::new("/nonexistent/dir/")),
///     Path::new("/nonexistent/dir/.keychain")
/// );
/// ```
pub fn resolve_vault_path(path: &Path) -> PathBuf {
    let raw = path.as_os_str().to_string_lossy();
    let names_directory = raw.ends_with('/') || raw.ends_with(MAIN_SEPARATOR);
    if names_directory || path.is_dir() {
        path.join(DEFAULT_FILENAME)
    } else {
        path.to_path_buf()
    }
}

/// Default vault location: `$HOME/.keychain`, or `./.keychain` without a home.
pub fn default_vault_path() -> PathBuf {
    env::var_os("HOME")
        .map_or_else(|| PathBuf::from("."), PathBuf::from)
        .join(DEFAULT_FILENAME)
}
