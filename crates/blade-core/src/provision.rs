//! Provisioning orchestration for the `pkl` evaluator.

use std::path::PathBuf;

use thiserror::Error;
use tracing::{debug, info};

use crate::download::{self, DownloadError, InstallTarget};
use crate::platform::{self, Platform, UnsupportedPlatform};
use crate::release::{self, ReleaseError};
use crate::runtime::{HostRuntime, NativeRuntime};

/// A provisioning run failed; the message names the stage that failed.
#[derive(Debug, Error)]
pub enum ProvisionError {
    /// Release discovery against the index failed.
    #[error("failed to get latest version: {0}")]
    Release(#[from] ReleaseError),

    /// The host platform is missing from the artifact table.
    #[error("failed to get download URL: {0}")]
    Resolve(#[from] UnsupportedPlatform),

    /// The artifact fetch or install failed.
    #[error("failed to download binary: {0}")]
    Download(#[from] DownloadError),
}

/// Downloads and installs the `pkl` evaluator.
///
/// The defaults talk to the public release index for the current host.
/// Tests substitute the endpoints and the host runtime:
///
/// ```no_run
/// # use blade_core::{InstallTarget, Provisioner};
/// # async fn demo() -> Result<(), blade_core::ProvisionError> {
/// let installed = Provisioner::new()
///     .install(&InstallTarget::executable("/home/user/.local/bin/pkl"))
///     .await?;
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct Provisioner<R = NativeRuntime> {
    client: reqwest::Client,
    runtime: R,
    release_index_url: String,
    download_base_url: String,
}

impl Provisioner<NativeRuntime> {
    /// Provisioner for the current host with the default endpoints.
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            runtime: NativeRuntime,
            release_index_url: release::RELEASE_INDEX_URL.to_string(),
            download_base_url: platform::DOWNLOAD_BASE_URL.to_string(),
        }
    }
}

impl Default for Provisioner<NativeRuntime> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: HostRuntime> Provisioner<R> {
    /// Substitute the host runtime (a fixed-value adapter in tests).
    pub fn with_runtime<S: HostRuntime>(self, runtime: S) -> Provisioner<S> {
        Provisioner {
            client: self.client,
            runtime,
            release_index_url: self.release_index_url,
            download_base_url: self.download_base_url,
        }
    }

    /// Override the release-index endpoint.
    pub fn with_release_index_url(mut self, url: impl Into<String>) -> Self {
        self.release_index_url = url.into();
        self
    }

    /// Override the artifact download base URL.
    pub fn with_download_base_url(mut self, url: impl Into<String>) -> Self {
        self.download_base_url = url.into();
        self
    }

    /// Install the latest `pkl` release at `target`, returning the installed
    /// path.
    ///
    /// The sequence is strictly linear: version discovery, artifact
    /// resolution, then download-and-install. Any failure is terminal for
    /// this invocation; nothing is retried.
    ///
    /// # Errors
    ///
    /// [`ProvisionError`] naming the stage that failed, wrapping the
    /// component error.
    pub async fn install(&self, target: &InstallTarget) -> Result<PathBuf, ProvisionError> {
        info!(path = %target.path.display(), "starting pkl install");

        let version = release::latest_version(&self.client, &self.release_index_url).await?;
        let host = Platform::detect(&self.runtime);
        let url = platform::download_url(&self.download_base_url, &version, &host)?;

        debug!(%version, %url, "downloading pkl binary");
        download::fetch_and_install(&self.client, &url, target).await?;

        info!(%version, path = %target.path.display(), "installed pkl");
        Ok(target.path.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::Server;
    use tempfile::TempDir;

    struct FixedRuntime {
        os: &'static str,
        arch: &'static str,
    }

    impl HostRuntime for FixedRuntime {
        fn os(&self) -> &str {
            self.os
        }

        fn arch(&self) -> &str {
            self.arch
        }
    }

    fn provisioner(server: &Server, os: &'static str, arch: &'static str) -> Provisioner<FixedRuntime> {
        Provisioner::new()
            .with_runtime(FixedRuntime { os, arch })
            .with_release_index_url(format!("{}/releases/latest", server.url()))
            .with_download_base_url(server.url())
    }

    #[tokio::test]
    async fn installs_the_matching_artifact_for_each_platform() {
        let cases = [
            ("darwin", "amd64", "/0.28.2/pkl-macos-amd64"),
            ("darwin", "arm64", "/0.28.2/pkl-macos-aarch64"),
            ("linux", "amd64", "/0.28.2/pkl-linux-amd64"),
            ("linux", "arm64", "/0.28.2/pkl-linux-aarch64"),
            ("windows", "amd64", "/0.28.2/pkl-windows-amd64.exe"),
        ];

        for (os, arch, artifact_path) in cases {
            let mut server = Server::new_async().await;
            let _index = server
                .mock("GET", "/releases/latest")
                .with_status(200)
                .with_body(r#"{"tag_name": "0.28.2"}"#)
                .create_async()
                .await;
            let artifact = server
                .mock("GET", artifact_path)
                .with_status(200)
                .with_body(vec![0u8; 10])
                .create_async()
                .await;

            let dir = TempDir::new().unwrap();
            let target = InstallTarget::executable(dir.path().join("pkl"));

            let installed = provisioner(&server, os, arch)
                .install(&target)
                .await
                .unwrap_or_else(|e| panic!("{os}/{arch} should install: {e}"));

            assert_eq!(installed, target.path);
            assert_eq!(std::fs::metadata(&installed).unwrap().len(), 10);
            artifact.assert_async().await;
        }
    }

    #[tokio::test]
    async fn index_failure_short_circuits_before_any_download() {
        let mut server = Server::new_async().await;
        let _index = server
            .mock("GET", "/releases/latest")
            .with_status(404)
            .with_body("Not Found")
            .create_async()
            .await;
        // No artifact request may ever reach the server.
        let artifact = server
            .mock("GET", mockito::Matcher::Regex("^/0".into()))
            .expect(0)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let err = provisioner(&server, "linux", "amd64")
            .install(&InstallTarget::executable(dir.path().join("pkl")))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "failed to get latest version: status code 404");
        artifact.assert_async().await;
    }

    #[tokio::test]
    async fn unsupported_platform_carries_the_pair() {
        let mut server = Server::new_async().await;
        let _index = server
            .mock("GET", "/releases/latest")
            .with_status(200)
            .with_body(r#"{"tag_name": "0.28.2"}"#)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let err = provisioner(&server, "unsupported", "unsupported")
            .install(&InstallTarget::executable(dir.path().join("pkl")))
            .await
            .unwrap_err();

        assert_eq!(
            err.to_string(),
            "failed to get download URL: unsupported OS/architecture combination: unsupported/unsupported"
        );
    }

    #[tokio::test]
    async fn download_failure_is_stage_prefixed_exactly() {
        let mut server = Server::new_async().await;
        let _index = server
            .mock("GET", "/releases/latest")
            .with_status(200)
            .with_body(r#"{"tag_name": "0.28.2"}"#)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let target = InstallTarget::executable(dir.path().join("pkl"));

        // Artifact host refuses the connection; the index call still works.
        let err = provisioner(&server, "linux", "amd64")
            .with_download_base_url("http://127.0.0.1:1")
            .install(&target)
            .await
            .unwrap_err();

        let inner = match &err {
            ProvisionError::Download(inner) => inner.to_string(),
            other => panic!("expected download error, got {other:?}"),
        };
        assert_eq!(err.to_string(), format!("failed to download binary: {inner}"));
        assert!(!target.path.exists());
    }

    #[tokio::test]
    async fn bad_artifact_status_preserves_the_code() {
        let mut server = Server::new_async().await;
        let _index = server
            .mock("GET", "/releases/latest")
            .with_status(200)
            .with_body(r#"{"tag_name": "0.28.2"}"#)
            .create_async()
            .await;
        let _artifact = server
            .mock("GET", "/0.28.2/pkl-linux-amd64")
            .with_status(503)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let err = provisioner(&server, "linux", "amd64")
            .install(&InstallTarget::executable(dir.path().join("pkl")))
            .await
            .unwrap_err();

        assert_eq!(err.to_string(), "failed to download binary: status code 503");
    }
}
