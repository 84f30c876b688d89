//! Core library for blade: provisioning of the external `pkl` evaluator.
//!
//! Blade evaluates its configuration through the `pkl` binary. When that
//! binary is missing from the host, this crate discovers the latest release,
//! maps the host platform to the matching artifact, downloads it, and
//! installs it with executable permissions.
//!
//! The pipeline is strictly sequential and composed from small modules:
//! [`runtime`] reports the host platform, [`platform`] resolves the artifact
//! for it, [`release`] discovers the latest version tag, [`download`] fetches
//! and installs, and [`provision`] orchestrates the whole sequence.

pub mod download;
pub mod platform;
pub mod provision;
pub mod release;
pub mod runtime;

pub use download::{DownloadError, InstallTarget};
pub use platform::{ArtifactUrl, Platform, UnsupportedPlatform};
pub use provision::{ProvisionError, Provisioner};
pub use release::{ReleaseError, ReleaseVersion};
pub use runtime::{HostRuntime, NativeRuntime};

/// User Agent string for outbound requests
pub const USER_AGENT: &str = concat!("blade/", env!("CARGO_PKG_VERSION"));

/// Timeout applied to each outbound request, so a hung remote endpoint
/// cannot block the invoking process indefinitely.
pub const REQUEST_TIMEOUT: std::time::Duration = std::time::Duration::from_secs(10);
