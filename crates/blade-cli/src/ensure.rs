//! Evaluator presence check and on-demand provisioning.

use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use blade_core::download::InstallTarget;
use blade_core::provision::Provisioner;
use crossterm::style::Stylize;
use tracing::{debug, info};

use crate::{PKL_BINARY, paths};

/// Locate the `pkl` binary, offering to install it when missing.
///
/// Returns the path to a usable evaluator. `yes` skips the confirmation
/// prompt. The prompt and the decision to provision live here; the actual
/// download is `blade-core`'s job.
pub async fn ensure_pkl(yes: bool) -> Result<PathBuf> {
    if let Ok(path) = which::which(PKL_BINARY) {
        debug!(path = %path.display(), "found pkl binary");
        return Ok(path);
    }

    eprintln!(
        "  {} pkl binary not found in PATH",
        "WARNING:".bold().red()
    );

    if !yes && !confirm_install()? {
        bail!("pkl binary not found in PATH. Please install pkl first");
    }

    let target = InstallTarget::executable(paths::install_path()?);

    info!("downloading pkl");
    let installed = Provisioner::new()
        .install(&target)
        .await
        .context("failed to download pkl")?;

    println!("Successfully installed pkl to {}", installed.display());
    Ok(installed)
}

fn confirm_install() -> Result<bool> {
    print!("Would you like to install pkl now? (y/N) ");
    std::io::stdout().flush()?;

    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}
