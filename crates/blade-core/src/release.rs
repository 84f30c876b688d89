//! Latest-release discovery against the remote release index.

use std::fmt;

use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

/// Default release-index endpoint for the `pkl` evaluator.
pub const RELEASE_INDEX_URL: &str = "https://api.github.com/repos/apple/pkl/releases/latest";

/// Version tag of a published release.
///
/// Opaque: never parsed or ordered, only threaded into artifact names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseVersion(String);

impl ReleaseVersion {
    /// The tag as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for ReleaseVersion {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ReleaseVersion {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for ReleaseVersion {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Errors from the release lookup.
#[derive(Debug, Error)]
pub enum ReleaseError {
    /// Transport-level failure reaching the index (DNS, connect, timeout).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The index answered with a non-success status.
    #[error("status code {0}")]
    BadStatus(u16),

    /// The index body did not decode into a release descriptor.
    #[error("malformed release metadata: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Release descriptor returned by the index; only the tag is used.
#[derive(Debug, Deserialize)]
struct Release {
    tag_name: String,
}

/// Fetch the latest published version tag from the release index.
///
/// One request, no retries; retry policy is a caller concern.
///
/// # Errors
///
/// [`ReleaseError::Http`] on transport failure, [`ReleaseError::BadStatus`]
/// on a non-success status (code preserved), [`ReleaseError::Parse`] on a
/// malformed body.
pub async fn latest_version(
    client: &reqwest::Client,
    index_url: &str,
) -> Result<ReleaseVersion, ReleaseError> {
    debug!(%index_url, "fetching latest release tag");

    let response = client
        .get(index_url)
        .header(reqwest::header::ACCEPT, "application/vnd.github.v3+json")
        .header(reqwest::header::USER_AGENT, crate::USER_AGENT)
        .timeout(crate::REQUEST_TIMEOUT)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        return Err(ReleaseError::BadStatus(status.as_u16()));
    }

    let body = response.text().await?;
    let release: Release = serde_json::from_str(&body)?;

    debug!(tag = %release.tag_name, "resolved latest release");
    Ok(ReleaseVersion(release.tag_name))
}
