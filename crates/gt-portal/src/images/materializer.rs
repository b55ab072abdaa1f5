use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::candidate::Candidate;
use super::catalog::Slot;

#[derive(Debug, thiserror::Error)]
pub enum MaterializeError {
    #[error("unable to prepare target directory {path}: {source}")]
    TargetDir { path: PathBuf, source: io::Error },
    #[error("unable to copy {from} to {to}: {source}")]
    Copy {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
}

/// Places a chosen candidate where the site expects the slot's file.
pub trait Materializer {
    fn materialize(&self, candidate: &Candidate, slot: &Slot) -> Result<PathBuf, MaterializeError>;

    /// Whether the slot's file is already in place.
    fn is_present(&self, slot: &Slot) -> bool;
}

/// Copies files into a target directory under the slot's name.
#[derive(Debug, Clone)]
pub struct FsMaterializer {
    target_dir: PathBuf,
}

impl FsMaterializer {
    pub fn new(target_dir: impl Into<PathBuf>) -> Self {
        Self {
            target_dir: target_dir.into(),
        }
    }

    pub fn target_dir(&self) -> &Path {
        &self.target_dir
    }

    pub fn target_path(&self, slot: &Slot) -> PathBuf {
        self.target_dir.join(&slot.target_name)
    }

    pub fn ensure_target_dir(&self) -> Result<(), MaterializeError> {
        fs::create_dir_all(&self.target_dir).map_err(|source| MaterializeError::TargetDir {
            path: self.target_dir.clone(),
            source,
        })
    }
}

impl Materializer for FsMaterializer {
    fn materialize(&self, candidate: &Candidate, slot: &Slot) -> Result<PathBuf, MaterializeError> {
        self.ensure_target_dir()?;
        let target = self.target_path(slot);
        fs::copy(&candidate.path, &target).map_err(|source| MaterializeError::Copy {
            from: candidate.path.clone(),
            to: target.clone(),
            source,
        })?;
        Ok(target)
    }

    fn is_present(&self, slot: &Slot) -> bool {
        self.target_path(slot).is_file()
    }
}
