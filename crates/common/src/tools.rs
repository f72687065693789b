//! Helpers for the external programs ScoreTrack shells out to.

use std::path::Path;
use std::process::Command;

/// Whether `binary` is an existing file path or resolves on `PATH`.
pub fn command_exists(binary: &str) -> bool {
    if binary.contains('/') {
        return Path::new(binary).is_file();
    }

    Command::new("sh")
        .arg("-c")
        .arg(format!("command -v {binary} >/dev/null 2>&1"))
        .status()
        .map(|status| status.success())
        .unwrap_or(false)
}
