use std::collections::BTreeMap;
use std::path::PathBuf;

use chrono::{DateTime, Local};
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

use super::assigner::{assign, Assignment};
use super::catalog::SlotCatalog;
use super::discovery::{collect_candidates, DirectoryDiscovery};
use super::materializer::Materializer;

/// A slot file that was copied into place during this run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopiedImage {
    pub slot: String,
    pub source_name: String,
    pub source_folder: String,
    pub score: u32,
    pub target: PathBuf,
}

/// A slot whose chosen file could not be copied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CopyFailure {
    pub slot: String,
    pub source_name: String,
    pub error: String,
}

/// Final state of a slot after the run, verified against the target.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SlotStatus {
    pub slot: String,
    pub description: String,
    pub present: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct OrganizeReport {
    pub generated_at: DateTime<Local>,
    pub folders: BTreeMap<String, PathBuf>,
    pub images_per_folder: BTreeMap<String, usize>,
    pub assignment: Assignment,
    pub copied: Vec<CopiedImage>,
    pub failures: Vec<CopyFailure>,
    pub slots: Vec<SlotStatus>,
}

impl OrganizeReport {
    pub fn missing(&self) -> Vec<&str> {
        self.slots
            .iter()
            .filter(|status| !status.present)
            .map(|status| status.slot.as_str())
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.slots.iter().all(|status| status.present)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum OrganizeOutcome {
    /// Discovery found none of the expected source folders.
    NoSourceFolders,
    /// Folders were found but none held an eligible image.
    NoImages { folders: BTreeMap<String, PathBuf> },
    Organized(OrganizeReport),
}

/// Fills the hero slots from downloaded photo folders.
///
/// Discovery, the slot catalog and the copy step are all injected so the
/// organizer can run against fakes; it never fails as a whole once the
/// catalog is built. Copy errors are recorded per slot and the run goes on.
pub struct HeroImageOrganizer<'a, D: ?Sized, M: ?Sized> {
    discovery: &'a D,
    materializer: &'a M,
    catalog: &'a SlotCatalog,
}

impl<'a, D, M> HeroImageOrganizer<'a, D, M>
where
    D: DirectoryDiscovery + ?Sized,
    M: Materializer + ?Sized,
{
    pub fn new(discovery: &'a D, materializer: &'a M, catalog: &'a SlotCatalog) -> Self {
        Self {
            discovery,
            materializer,
            catalog,
        }
    }

    pub fn run<R>(&self, rng: &mut R) -> OrganizeOutcome
    where
        R: Rng + ?Sized,
    {
        let folders = self.discovery.discover();
        if folders.is_empty() {
            warn!("no source folders discovered");
            return OrganizeOutcome::NoSourceFolders;
        }

        let candidates = collect_candidates(&folders);
        let mut images_per_folder: BTreeMap<String, usize> =
            folders.keys().map(|source| (source.clone(), 0)).collect();
        for candidate in &candidates {
            *images_per_folder.entry(candidate.source.clone()).or_default() += 1;
        }
        for (source, count) in &images_per_folder {
            info!(%source, images = count, "source folder scanned");
        }

        if candidates.is_empty() {
            warn!("source folders contain no eligible images");
            return OrganizeOutcome::NoImages { folders };
        }

        let assignment = assign(candidates, self.catalog.slots(), rng);

        let mut copied = Vec::new();
        let mut failures = Vec::new();
        for (slot, outcome) in self.catalog.slots().iter().zip(&assignment.outcomes) {
            let Some(candidate) = outcome.candidate.as_ref() else {
                continue;
            };

            match self.materializer.materialize(candidate, slot) {
                Ok(target) => {
                    info!(slot = %slot.target_name, from = %candidate.name, "hero image copied");
                    copied.push(CopiedImage {
                        slot: slot.target_name.clone(),
                        source_name: candidate.name.clone(),
                        source_folder: candidate.source.clone(),
                        score: outcome.score.unwrap_or_default(),
                        target,
                    });
                }
                Err(err) => {
                    warn!(slot = %slot.target_name, error = %err, "hero image copy failed");
                    failures.push(CopyFailure {
                        slot: slot.target_name.clone(),
                        source_name: candidate.name.clone(),
                        error: err.to_string(),
                    });
                }
            }
        }

        let slots = self
            .catalog
            .slots()
            .iter()
            .map(|slot| SlotStatus {
                slot: slot.target_name.clone(),
                description: slot.description.clone(),
                present: self.materializer.is_present(slot),
            })
            .collect();

        OrganizeOutcome::Organized(OrganizeReport {
            generated_at: Local::now(),
            folders,
            images_per_folder,
            assignment,
            copied,
            failures,
            slots,
        })
    }
}
