//! Hero image selection: the random gallery picker used by the site pages and
//! the keyword-driven organizer that fills the required hero files.

pub mod assigner;
pub mod candidate;
pub mod catalog;
pub mod discovery;
pub mod materializer;
pub mod organizer;
pub mod picker;
pub mod scoring;

pub use assigner::{assign, Assignment, SlotOutcome};
pub use candidate::{Candidate, CandidateId};
pub use catalog::{CatalogError, Slot, SlotCatalog};
pub use discovery::{
    collect_candidates, default_search_locations, DirectoryDiscovery, LocationScanner,
    StaticFolders, DEFAULT_SOURCE_KEYWORDS,
};
pub use materializer::{FsMaterializer, MaterializeError, Materializer};
pub use organizer::{
    CopiedImage, CopyFailure, HeroImageOrganizer, OrganizeOutcome, OrganizeReport, SlotStatus,
};
pub use picker::{is_image_file, list_images, pick_random, ImagePicker, IMAGE_EXTENSIONS};
pub use scoring::score;
