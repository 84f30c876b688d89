//! Artifact download and installation.
//!
//! One GET per artifact, streamed straight to the destination file, with the
//! permission bits applied last. No temp-file-then-rename dance: an error
//! return means the target must not be treated as installed, and a partial
//! file may remain.

use std::path::PathBuf;

use futures::StreamExt;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::platform::ArtifactUrl;

/// Standard executable mode for installed binaries.
pub const EXECUTABLE_MODE: u32 = 0o755;

/// Errors from fetching and installing an artifact.
#[derive(Debug, Error)]
pub enum DownloadError {
    /// Transport-level failure reaching the artifact host.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The artifact host answered with a non-success status.
    #[error("status code {0}")]
    BadStatus(u16),

    /// Local file creation, write, or permission-setting failure.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Filesystem destination for an installed binary.
///
/// The parent directory must already exist; the path is fully overwritten on
/// each run.
#[derive(Debug, Clone)]
pub struct InstallTarget {
    /// Absolute path the binary is written to.
    pub path: PathBuf,
    /// Permission bits applied after the write (Unix only).
    pub mode: u32,
}

impl InstallTarget {
    /// Target with the standard executable mode.
    pub fn executable(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            mode: EXECUTABLE_MODE,
        }
    }
}

/// Download `url` and install it at `target`.
///
/// The destination is created (or truncated) only after a success status;
/// the body is then streamed to disk and the permission bits applied. If the
/// write fails, no permission-setting is attempted.
///
/// # Errors
///
/// [`DownloadError::BadStatus`] before anything is written,
/// [`DownloadError::Http`] on transport or mid-stream failures,
/// [`DownloadError::Io`] on file creation, write, or chmod failures.
pub async fn fetch_and_install(
    client: &reqwest::Client,
    url: &ArtifactUrl,
    target: &InstallTarget,
) -> Result<(), DownloadError> {
    debug!(%url, path = %target.path.display(), "downloading artifact");

    let response = client
        .get(url.as_str())
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .timeout(crate::REQUEST_TIMEOUT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(DownloadError::BadStatus(status.as_u16()));
    }

    let mut file = File::create(&target.path).await?;
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        file.write_all(&chunk).await?;
    }
    file.flush().await?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(target.mode);
        tokio::fs::set_permissions(&target.path, perms).await?;
    }

    Ok(())
}
