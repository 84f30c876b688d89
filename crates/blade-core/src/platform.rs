//! Release artifact resolution.
//!
//! Maps a host platform to the matching `pkl` release artifact. The mapping
//! is a fixed table and the single place where host identifiers are
//! translated into the upstream artifact naming: `darwin` hosts download
//! `pkl-macos-*` files, `arm64` hosts download `*-aarch64` files, and the
//! Windows artifact carries an `.exe` suffix.

use std::fmt;

use thiserror::Error;

use crate::release::ReleaseVersion;
use crate::runtime::HostRuntime;

/// Default base URL for release artifact downloads.
pub const DOWNLOAD_BASE_URL: &str = "https://github.com/apple/pkl/releases/download";

/// Artifact filenames by `(os, arch)` pair.
///
/// Keys are the canonical identifiers reported by [`HostRuntime`]. Naming
/// exceptions between host identifiers and upstream filenames are encoded
/// here and nowhere else.
const RELEASE_ARTIFACTS: &[((&str, &str), &str)] = &[
    (("darwin", "amd64"), "pkl-macos-amd64"),
    (("darwin", "arm64"), "pkl-macos-aarch64"),
    (("linux", "amd64"), "pkl-linux-amd64"),
    (("linux", "arm64"), "pkl-linux-aarch64"),
    (("windows", "amd64"), "pkl-windows-amd64.exe"),
];

/// A host `(os, arch)` pair, normalized to trimmed lower-case so table
/// lookups are insensitive to how the identifiers were reported.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Platform {
    os: String,
    arch: String,
}

impl Platform {
    /// Create a platform key from raw identifiers.
    pub fn new(os: &str, arch: &str) -> Self {
        Self {
            os: os.trim().to_lowercase(),
            arch: arch.trim().to_lowercase(),
        }
    }

    /// Build the key for the current host as reported by `runtime`.
    pub fn detect<R: HostRuntime>(runtime: &R) -> Self {
        Self::new(runtime.os(), runtime.arch())
    }

    /// Operating system identifier.
    pub fn os(&self) -> &str {
        &self.os
    }

    /// CPU architecture identifier.
    pub fn arch(&self) -> &str {
        &self.arch
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.os, self.arch)
    }
}

/// The host platform has no entry in the artifact table.
///
/// Carries the offending pair verbatim so callers can present an actionable
/// message.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unsupported OS/architecture combination: {os}/{arch}")]
pub struct UnsupportedPlatform {
    /// Operating system identifier that missed the table.
    pub os: String,
    /// Architecture identifier that missed the table.
    pub arch: String,
}

/// A fully-qualified download URL for a release artifact.
///
/// Only [`download_url`] constructs these, so holding one implies the
/// platform was present in the artifact table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactUrl(String);

impl ArtifactUrl {
    /// The URL as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ArtifactUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Resolve the download URL for `version` on `platform`.
///
/// Pure table lookup plus string assembly; no network access.
///
/// # Errors
///
/// Returns [`UnsupportedPlatform`] when the pair is absent from the table.
pub fn download_url(
    base: &str,
    version: &ReleaseVersion,
    platform: &Platform,
) -> Result<ArtifactUrl, UnsupportedPlatform> {
    let key = (platform.os(), platform.arch());
    let filename = RELEASE_ARTIFACTS
        .iter()
        .find(|(entry, _)| (entry.0, entry.1) == key)
        .map(|(_, filename)| *filename)
        .ok_or_else(|| UnsupportedPlatform {
            os: platform.os().to_string(),
            arch: platform.arch().to_string(),
        })?;

    Ok(ArtifactUrl(format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        version,
        filename
    )))
}
