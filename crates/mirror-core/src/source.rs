//! Release asset locations

use crate::ArtifactName;

/// Host used when no base URL is configured.
pub const DEFAULT_BASE_URL: &str = "https://github.com";

/// Where the latest release of a repository publishes its assets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReleaseSource {
    base_url: String,
    owner: String,
    repository: String,
}

impl ReleaseSource {
    pub fn new(owner: impl Into<String>, repository: impl Into<String>) -> Self {
        Self::with_base_url(DEFAULT_BASE_URL, owner, repository)
    }

    /// Point at a host other than github.com (GitHub Enterprise, a proxy, a test server).
    pub fn with_base_url(
        base_url: impl Into<String>,
        owner: impl Into<String>,
        repository: impl Into<String>,
    ) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            base_url,
            owner: owner.into(),
            repository: repository.into(),
        }
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn repository(&self) -> &str {
        &self.repository
    }

    /// URL of `artifact` in the latest release.
    pub fn asset_url(&self, artifact: &ArtifactName) -> String {
        format!(
            "{}/{}/{}/releases/latest/download/{}",
            self.base_url, self.owner, self.repository, artifact
        )
    }
}
