//! Cross-platform filesystem utilities
//!
//! - `atomic_rename`: atomic file replacement (Windows requires explicit delete)
//! - `write_atomic`: write through a sibling temp file, then rename over the target
//! - `get_config_base_dir`: platform-appropriate configuration directory

use std::io;
use std::path::{Path, PathBuf};

/// Cross-platform atomic rename that handles Windows file replacement.
///
/// On Unix, `fs::rename` atomically replaces the target if it exists.
/// On Windows, `fs::rename` fails if the target exists, so the target is
/// deleted first.
pub fn atomic_rename(src: &Path, dst: &Path) -> io::Result<()> {
    #[cfg(windows)]
    {
        if dst.exists() {
            std::fs::remove_file(dst)?;
        }
    }
    std::fs::rename(src, dst)
}

/// Write `contents` to `path` without ever leaving a half-written file behind.
pub fn write_atomic(path: &Path, contents: &[u8]) -> io::Result<()> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "output".to_string());
    let tmp = path.with_file_name(format!(".{}.tmp", file_name));
    std::fs::write(&tmp, contents)?;
    if let Err(e) = atomic_rename(&tmp, path) {
        let _ = std::fs::remove_file(&tmp);
        return Err(e);
    }
    Ok(())
}

/// Get platform-appropriate configuration directory for stubscan.
///
/// - **Windows**: `%APPDATA%\stubscan`
/// - **Unix**: `$XDG_CONFIG_HOME/stubscan` or `~/.config/stubscan`
///
/// Returns `None` when no home directory can be determined.
pub fn get_config_base_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("stubscan"))
}
