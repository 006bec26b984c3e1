//! Configuration for the reconciliation and rename passes.
//!
//! Every table ships with the values used for the current gallery deployment,
//! and any of them can be replaced from a TOML file. A section present in the
//! file replaces the built-in section field by field; a mapping table present
//! in the file replaces the built-in table as a whole.

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Directory holding the gallery images and `content.json`, relative to the site root.
pub const DEFAULT_ASSETS_ROOT: &str = "public/galerie";
pub const MANIFEST_FILE_NAME: &str = "content.json";

/// `content.json` under the default assets root.
#[must_use]
pub fn default_manifest_path() -> PathBuf {
    Path::new(DEFAULT_ASSETS_ROOT).join(MANIFEST_FILE_NAME)
}

const DEFAULT_URL_PREFIX: &str = "/galerie/";
const DEFAULT_IMAGE: &str = "/logo.png";
const DEFAULT_INLINE_MARKER: &str = "data:image";

const DEFAULT_MAPPING: &[(&str, &str)] = &[
    ("communaute", "espace-communautaire-1.jpg"),
    ("espace-media", "espace-communautaire-2.jpg"),
    ("studio-creatif", "studio.jpg"),
    ("open-zone", "coworking.jpg"),
    ("kiosque-4", "kiosque-vue-ensemble.jpg"),
    ("container-3", "container-pro.jpg"),
    ("green-room", "green-room.jpg"),
    ("espace-beaute", "espace-beaute.jpg"),
    ("salle-focus", "coworking.jpg"),
    ("kiosque-1", "kiosque.jpg"),
    ("container-1", "container-pro.jpg"),
    ("container-2", "container-pro.jpg"),
    ("kiosque-2", "kiosque-2.jpg"),
    ("kiosque-5", "kiosque-2.jpg"),
    ("kiosque-3", "kiosque-3.jpg"),
];

// Names the generic lowercase/hyphen rule would get wrong.
const DEFAULT_RENAME_OVERRIDES: &[(&str, &str)] = &[
    ("epsace comunautaire 2.jpg", "espace-communautaire-2.jpg"),
    ("grenn room.jpg", "green-room.jpg"),
    ("espace beauté.jpg", "espace-beaute.jpg"),
];

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("reading config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("parsing config {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("invalid config {}: {reason}", path.display())]
    Invalid { path: PathBuf, reason: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReconcileConfig {
    /// URL prefix joined with a mapped filename.
    pub url_prefix: String,
    /// Replacement for inline payloads that have no mapping entry.
    pub default_image: String,
    /// Prefix identifying an inline-encoded image payload.
    pub inline_marker: String,
    /// Space id to image filename.
    pub mapping: BTreeMap<String, String>,
}

impl Default for ReconcileConfig {
    fn default() -> Self {
        Self {
            url_prefix: DEFAULT_URL_PREFIX.into(),
            default_image: DEFAULT_IMAGE.into(),
            inline_marker: DEFAULT_INLINE_MARKER.into(),
            mapping: DEFAULT_MAPPING
                .iter()
                .map(|(id, file)| ((*id).to_string(), (*file).to_string()))
                .collect(),
        }
    }
}

impl ReconcileConfig {
    /// Full image URL for a mapped space id.
    #[must_use]
    pub fn target_for(&self, id: &str) -> Option<String> {
        self.mapping
            .get(id)
            .map(|file| format!("{}{file}", self.url_prefix))
    }

    #[must_use]
    pub fn is_inline(&self, image: &str) -> bool {
        image.starts_with(&self.inline_marker)
    }

    fn validate(&self) -> Result<(), String> {
        // An empty marker would classify every plain path as inline.
        if self.inline_marker.is_empty() {
            return Err("reconcile.inline_marker must not be empty".into());
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenameConfig {
    /// Exact source filename to target filename, consulted before the generic rule.
    pub overrides: BTreeMap<String, String>,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            overrides: DEFAULT_RENAME_OVERRIDES
                .iter()
                .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
                .collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolConfig {
    pub reconcile: ReconcileConfig,
    pub rename: RenameConfig,
}

impl ToolConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config
            .reconcile
            .validate()
            .map_err(|reason| ConfigError::Invalid {
                path: path.to_path_buf(),
                reason,
            })?;
        Ok(config)
    }

    pub fn from_toml_str(raw: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(raw)
    }

    /// The effective configuration in the same TOML layout `load` reads.
    pub fn to_toml_string(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Loads `path` when given, otherwise the built-in tables.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
