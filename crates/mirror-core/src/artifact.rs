//! Artifact names and artifact list parsing

use std::fmt;

/// Name of a release asset.
///
/// Used verbatim both as the remote asset name and as the local file name.
/// Always trimmed and non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ArtifactName(String);

impl ArtifactName {
    /// Trim `raw`; `None` if nothing is left.
    pub fn new(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        (!trimmed.is_empty()).then(|| Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ArtifactName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Split a comma-separated artifact list, trimming entries and dropping empty ones.
///
/// Order is preserved and duplicates are kept.
pub fn parse_artifact_list(csv: &str) -> Vec<ArtifactName> {
    csv.split(',').filter_map(ArtifactName::new).collect()
}
