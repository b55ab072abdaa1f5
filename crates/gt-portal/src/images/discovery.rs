use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::candidate::Candidate;
use super::picker::list_images;

/// Folder names the organizer looks for in downloaded photo packs.
pub const DEFAULT_SOURCE_KEYWORDS: [&str; 2] = ["paraiba", "cabedelo"];

/// Finds the folders that hold downloaded images, keyed by source name.
pub trait DirectoryDiscovery {
    fn discover(&self) -> BTreeMap<String, PathBuf>;
}

/// Explicitly supplied folders, bypassing any search.
#[derive(Debug, Clone, Default)]
pub struct StaticFolders(pub BTreeMap<String, PathBuf>);

impl DirectoryDiscovery for StaticFolders {
    fn discover(&self) -> BTreeMap<String, PathBuf> {
        self.0.clone()
    }
}

/// Scans the immediate sub-directories of each location for names containing
/// a source keyword. The first match per source wins; a directory matching
/// several keywords fills the earliest of them that is still open.
#[derive(Debug, Clone)]
pub struct LocationScanner {
    locations: Vec<PathBuf>,
    source_keywords: Vec<String>,
}

impl LocationScanner {
    pub fn new<I, S>(locations: Vec<PathBuf>, source_keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            locations,
            source_keywords: source_keywords
                .into_iter()
                .map(|keyword| keyword.into().to_lowercase())
                .collect(),
        }
    }

    pub fn with_default_sources(locations: Vec<PathBuf>) -> Self {
        Self::new(locations, DEFAULT_SOURCE_KEYWORDS)
    }

    pub fn locations(&self) -> &[PathBuf] {
        &self.locations
    }

    fn subdirectories(location: &Path) -> Vec<PathBuf> {
        let entries = match fs::read_dir(location) {
            Ok(entries) => entries,
            Err(err) => {
                debug!(location = %location.display(), error = %err, "search location skipped");
                return Vec::new();
            }
        };

        let mut dirs: Vec<PathBuf> = entries
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.is_dir())
            .collect();
        dirs.sort();
        dirs
    }
}

impl DirectoryDiscovery for LocationScanner {
    fn discover(&self) -> BTreeMap<String, PathBuf> {
        let mut folders = BTreeMap::new();

        for location in &self.locations {
            for dir in Self::subdirectories(location) {
                let Some(name) = dir.file_name().map(|n| n.to_string_lossy().to_lowercase())
                else {
                    continue;
                };

                let open_source = self.source_keywords.iter().find(|keyword| {
                    name.contains(keyword.as_str()) && !folders.contains_key(keyword.as_str())
                });
                if let Some(keyword) = open_source {
                    debug!(source = %keyword, folder = %dir.display(), "source folder found");
                    folders.insert(keyword.clone(), dir);
                }
            }
        }

        folders
    }
}

/// The usual places a manual download ends up: the project itself, its
/// parent, a project-local `Downloads`, and the user's Downloads and Desktop.
pub fn default_search_locations(project_root: &Path) -> Vec<PathBuf> {
    let mut locations = vec![project_root.to_path_buf()];
    if let Some(parent) = project_root.parent() {
        locations.push(parent.to_path_buf());
    }
    locations.push(project_root.join("Downloads"));

    if let Some(home) = home_dir() {
        locations.push(home.join("Downloads"));
        locations.push(home.join("Desktop"));
    }
    locations
}

fn home_dir() -> Option<PathBuf> {
    env::var_os("HOME")
        .or_else(|| env::var_os("USERPROFILE"))
        .filter(|value| !value.is_empty())
        .map(PathBuf::from)
}

/// Flattens the images of every discovered folder into one candidate pool.
/// Sources follow the map's name order, not the order they were discovered in.
pub fn collect_candidates(folders: &BTreeMap<String, PathBuf>) -> Vec<Candidate> {
    folders
        .iter()
        .flat_map(|(source, folder)| {
            list_images(folder)
                .into_iter()
                .map(move |path| Candidate::from_path(&path, source))
        })
        .collect()
}
