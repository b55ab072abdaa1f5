use std::fmt;
use std::path::{Path, PathBuf};

use serde::Serialize;

/// Opaque identity of a discovered file. Two candidates with the same file
/// name in different folders are still distinct.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// An image file eligible for a hero slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub name: String,
    pub path: PathBuf,
    pub source: String,
}

impl Candidate {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        path: impl Into<PathBuf>,
        source: impl Into<String>,
    ) -> Self {
        Self {
            id: CandidateId(id.into()),
            name: name.into(),
            path: path.into(),
            source: source.into(),
        }
    }

    /// Builds a candidate whose identity is the full path and whose scoring
    /// name is the file name.
    pub fn from_path(path: &Path, source: &str) -> Self {
        let name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Self::new(path.display().to_string(), name, path, source)
    }
}
