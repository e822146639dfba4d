//! Generated file management.
//!
//! Generated daemon configuration is written to a temporary file next to the
//! target and renamed over it, so a reader sees either the old or the new
//! content, never a partial write.

use std::fs;
use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::error::{CfgMgrError, CfgMgrResult};

/// Mode given to a generated file that did not exist before.
pub const DEFAULT_FILE_MODE: u32 = 0o644;

/// Replaces `path` with `contents`.
///
/// An existing target keeps its permissions. A new one gets
/// [`DEFAULT_FILE_MODE`].
pub fn write_atomic(path: &Path, contents: &str) -> CfgMgrResult<()> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let permissions = match fs::metadata(path) {
        Ok(meta) => meta.permissions(),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            fs::Permissions::from_mode(DEFAULT_FILE_MODE)
        }
        Err(e) => return Err(CfgMgrError::io(path, e)),
    };

    let mut tmp = NamedTempFile::new_in(dir).map_err(|e| CfgMgrError::io(dir, e))?;
    tmp.write_all(contents.as_bytes())
        .and_then(|_| tmp.as_file().set_permissions(permissions))
        .and_then(|_| tmp.as_file().sync_all())
        .map_err(|e| CfgMgrError::io(tmp.path(), e))?;
    tmp.persist(path)
        .map_err(|e| CfgMgrError::io(path, e.error))?;

    info!(path = %path.display(), bytes = contents.len(), "Wrote configuration file");
    Ok(())
}

/// Deletes `path` if it exists. Returns whether a file was removed.
pub fn remove_if_exists(path: &Path) -> CfgMgrResult<bool> {
    match fs::remove_file(path) {
        Ok(()) => {
            info!(path = %path.display(), "Removed configuration file");
            Ok(true)
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path.display(), "Configuration file already absent");
            Ok(false)
        }
        Err(e) => Err(CfgMgrError::io(path, e)),
    }
}
