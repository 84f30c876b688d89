//! Install path selection for the pkl evaluator.

use std::path::PathBuf;

use anyhow::{Context, Result};
use dirs::home_dir;

use crate::PKL_BINARY;

/// Directory blade installs the evaluator into, or None if the user's home
/// cannot be resolved. `BLADE_BIN_DIR` overrides.
pub fn try_bin_dir() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("BLADE_BIN_DIR") {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".local").join("bin"))
}

/// Full install path for the evaluator binary, creating the directory if
/// needed. The binary name carries an `.exe` suffix on Windows.
pub fn install_path() -> Result<PathBuf> {
    let bin_dir = try_bin_dir()
        .context("could not determine home directory. Set BLADE_BIN_DIR to override")?;
    std::fs::create_dir_all(&bin_dir)
        .with_context(|| format!("failed to create {}", bin_dir.display()))?;

    let binary = if cfg!(windows) {
        format!("{PKL_BINARY}.exe")
    } else {
        PKL_BINARY.to_string()
    };
    Ok(bin_dir.join(binary))
}
