//! Gallery content manifest maintenance.
//!
//! The manifest is the `content.json` document served next to the gallery
//! images. Everything here is synchronous and single-pass: load, transform in
//! memory, write back as a whole file.

pub mod config;
pub mod error;
pub mod inspect;
pub mod manifest;
pub mod reconcile;
pub mod rename;

pub use config::{
    default_manifest_path, ConfigError, ReconcileConfig, RenameConfig, ToolConfig,
    DEFAULT_ASSETS_ROOT, MANIFEST_FILE_NAME,
};
pub use error::ManifestError;
pub use inspect::{summarize, ManifestSummary, SpaceListing};
pub use manifest::Manifest;
pub use reconcile::{reconcile, reconcile_file, ImageAction, ReconcileReport, SpaceOutcome};
pub use rename::{
    apply_renames, normalize_file_name, plan_renames, RenameError, RenameOutcome, RenamePlan,
    RenameSummary,
};
