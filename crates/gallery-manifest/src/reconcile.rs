//! Rewrites each space's `image` reference to a file-backed URL.
//!
//! Per space, in order of precedence:
//! 1. a mapped id gets `url_prefix + filename`, whatever the current value;
//! 2. an unmapped inline payload gets `default_image`;
//! 3. anything else is left as is.
//!
//! No inline payload survives a pass, and a second pass with the same
//! configuration changes nothing.

use std::fmt;
use std::path::Path;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::config::ReconcileConfig;
use crate::error::ManifestError;
use crate::manifest::{json_type_name, Manifest, SPACES_KEY};

const IMAGE_KEY: &str = "image";
const ID_KEY: &str = "id";
const PREVIEW_CHARS: usize = 40;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageAction {
    Mapped { from: Option<String>, to: String },
    Fallback { from: String, to: String },
    Unchanged { image: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpaceOutcome {
    pub id: Option<String>,
    pub action: ImageAction,
}

impl fmt::Display for SpaceOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = self.id.as_deref().unwrap_or("<no id>");
        match &self.action {
            ImageAction::Mapped { to, .. } => write!(f, "Updated space '{id}' image to '{to}'"),
            ImageAction::Fallback { from, to } => write!(
                f,
                "Found inline image for space '{id}' ('{}'). No mapping found, using default '{to}'.",
                preview(from)
            ),
            ImageAction::Unchanged { image } => write!(
                f,
                "Space '{id}' has image '{}' (not inline, no mapping needed).",
                image.as_deref().map(preview).unwrap_or_default()
            ),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReconcileReport {
    pub outcomes: Vec<SpaceOutcome>,
}

impl ReconcileReport {
    /// Spaces whose stored `image` value differs after the pass.
    #[must_use]
    pub fn changed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| match &outcome.action {
                ImageAction::Mapped { from, to } => from.as_deref() != Some(to.as_str()),
                ImageAction::Fallback { .. } => true,
                ImageAction::Unchanged { .. } => false,
            })
            .count()
    }
}

/// Applies the mapping to every space in `manifest`. The shape of `spaces` is
/// checked before anything is modified, so an error leaves the manifest as it was.
pub fn reconcile(
    manifest: &mut Manifest,
    config: &ReconcileConfig,
) -> Result<ReconcileReport, ManifestError> {
    let Some(spaces) = manifest.spaces_mut() else {
        debug!("manifest has no `{SPACES_KEY}` collection");
        return Ok(ReconcileReport::default());
    };
    let spaces = space_records(spaces)?;

    let outcomes = spaces
        .into_iter()
        .map(|space| reconcile_space(space, config))
        .collect();
    Ok(ReconcileReport { outcomes })
}

/// Loads the manifest at `path`, reconciles it and writes it back in place.
pub fn reconcile_file(
    path: &Path,
    config: &ReconcileConfig,
) -> Result<ReconcileReport, ManifestError> {
    let mut manifest = Manifest::load(path)?;
    let report = reconcile(&mut manifest, config)?;
    manifest.save(path)?;
    info!(
        path = %path.display(),
        spaces = report.outcomes.len(),
        changed = report.changed(),
        "manifest reconciled"
    );
    Ok(report)
}

fn space_records(spaces: &mut Value) -> Result<Vec<&mut Map<String, Value>>, ManifestError> {
    let kind = json_type_name(spaces);
    let Value::Array(items) = spaces else {
        return Err(ManifestError::InvalidShape(format!(
            "`{SPACES_KEY}` must be an array, found {kind}"
        )));
    };
    items
        .iter_mut()
        .enumerate()
        .map(|(idx, item)| {
            let kind = json_type_name(item);
            item.as_object_mut().ok_or_else(|| {
                ManifestError::InvalidShape(format!(
                    "`{SPACES_KEY}[{idx}]` must be an object, found {kind}"
                ))
            })
        })
        .collect()
}

fn reconcile_space(space: &mut Map<String, Value>, config: &ReconcileConfig) -> SpaceOutcome {
    let id = space.get(ID_KEY).and_then(Value::as_str).map(str::to_owned);
    let current = space
        .get(IMAGE_KEY)
        .and_then(Value::as_str)
        .map(str::to_owned);

    if let Some(to) = id.as_deref().and_then(|id| config.target_for(id)) {
        space.insert(IMAGE_KEY.into(), Value::String(to.clone()));
        info!(space = id.as_deref().unwrap_or_default(), image = %to, "mapped space image");
        return SpaceOutcome {
            id,
            action: ImageAction::Mapped { from: current, to },
        };
    }

    match current {
        Some(from) if config.is_inline(&from) => {
            let to = config.default_image.clone();
            space.insert(IMAGE_KEY.into(), Value::String(to.clone()));
            warn!(
                space = id.as_deref().unwrap_or_default(),
                image = %to,
                "inline image without mapping, using default"
            );
            SpaceOutcome {
                id,
                action: ImageAction::Fallback { from, to },
            }
        }
        image => SpaceOutcome {
            id,
            action: ImageAction::Unchanged { image },
        },
    }
}

fn preview(image: &str) -> String {
    if image.chars().count() <= PREVIEW_CHARS {
        return image.to_string();
    }
    let head: String = image.chars().take(PREVIEW_CHARS).collect();
    format!("{head}...")
}
