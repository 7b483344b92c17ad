//! Private key file persistence.
//!
//! Key material is written to `~/.ssh/<name>_rsa` with mode `0600`. The file
//! is restricted before any key bytes reach it, so there is no window in
//! which another user could read the key.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

use tracing::debug;

use crate::error::{KeyPairError, Result};

/// Owner read/write only.
#[cfg(unix)]
const KEY_FILE_MODE: u32 = 0o600;

/// Write key material to `path`, creating parent directories.
///
/// An existing file at `path` is overwritten.
pub fn write_key_file(path: &Path, material: &str) -> Result<()> {
    let write_failed = |source| KeyPairError::WriteFailed {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(write_failed)?;
    }

    let mut options = OpenOptions::new();
    options.write(true).create(true).truncate(true);

    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(KEY_FILE_MODE);
    }

    let mut file = options.open(path).map_err(write_failed)?;

    // `mode` only applies to newly created files; tighten a pre-existing one
    // before writing into it.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        file.set_permissions(fs::Permissions::from_mode(KEY_FILE_MODE))
            .map_err(write_failed)?;
    }

    file.write_all(material.as_bytes()).map_err(write_failed)?;
    file.sync_all().map_err(write_failed)?;

    debug!(path = %path.display(), "key file written");
    Ok(())
}
