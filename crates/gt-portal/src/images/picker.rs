use std::fs;
use std::path::{Path, PathBuf};

use rand::seq::SliceRandom;
use rand::Rng;
use tracing::{debug, warn};

/// Extensions accepted as images, compared case-insensitively.
pub const IMAGE_EXTENSIONS: [&str; 3] = ["jpg", "jpeg", "png"];

pub fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| {
            IMAGE_EXTENSIONS
                .iter()
                .any(|allowed| ext.eq_ignore_ascii_case(allowed))
        })
        .unwrap_or(false)
}

/// Lists the image files directly inside `dir`, sorted by path.
///
/// A missing or unreadable directory yields an empty list.
pub fn list_images(dir: &Path) -> Vec<PathBuf> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) => {
            debug!(dir = %dir.display(), error = %err, "image directory unavailable");
            return Vec::new();
        }
    };

    let mut images: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(entry) => Some(entry.path()),
            Err(err) => {
                warn!(dir = %dir.display(), error = %err, "skipping unreadable entry");
                None
            }
        })
        .filter(|path| path.is_file() && is_image_file(path))
        .collect();
    images.sort();
    images
}

/// Picks one image from `dir` uniformly at random.
pub fn pick_random<R>(dir: &Path, rng: &mut R) -> Option<PathBuf>
where
    R: Rng + ?Sized,
{
    list_images(dir).choose(rng).cloned()
}

/// Random decorative image source for the site pages.
#[derive(Debug, Clone)]
pub struct ImagePicker {
    static_root: PathBuf,
    gallery_dir: PathBuf,
}

impl ImagePicker {
    pub fn new(static_root: impl Into<PathBuf>, gallery_dir: impl Into<PathBuf>) -> Self {
        Self {
            static_root: static_root.into(),
            gallery_dir: gallery_dir.into(),
        }
    }

    pub fn gallery_path(&self) -> PathBuf {
        self.static_root.join(&self.gallery_dir)
    }

    /// Returns the chosen image relative to the static root, `/`-separated,
    /// ready to be appended to the `/static/` URL prefix.
    ///
    /// Files whose path is not valid UTF-8 are never chosen.
    pub fn pick_web_path<R>(&self, rng: &mut R) -> Option<String>
    where
        R: Rng + ?Sized,
    {
        let web_paths: Vec<String> = list_images(&self.gallery_path())
            .iter()
            .filter_map(|path| self.web_path(path))
            .collect();
        web_paths.choose(rng).cloned()
    }

    fn web_path(&self, path: &Path) -> Option<String> {
        let relative = path.strip_prefix(&self.static_root).ok()?;
        let segments = relative
            .components()
            .map(|component| component.as_os_str().to_str())
            .collect::<Option<Vec<&str>>>();
        if segments.is_none() {
            debug!(path = %path.display(), "skipping image with a non UTF-8 name");
        }
        Some(segments?.join("/"))
    }
}
