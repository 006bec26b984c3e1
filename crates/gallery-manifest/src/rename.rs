//! Normalizes gallery image filenames to lowercase, hyphenated names.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::{info, warn};

use crate::config::RenameConfig;

#[derive(Debug, Error)]
pub enum RenameError {
    #[error("directory not found: {}", .0.display())]
    DirectoryNotFound(PathBuf),
    #[error("not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    #[error("listing {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenamePlan {
    pub from: String,
    pub to: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameOutcome {
    Renamed(RenamePlan),
    TargetExists(RenamePlan),
    Failed { plan: RenamePlan, error: String },
}

impl fmt::Display for RenameOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Renamed(plan) => write!(f, "Renamed: {} -> {}", plan.from, plan.to),
            Self::TargetExists(plan) => {
                write!(f, "Skipping {} -> {} (Target exists)", plan.from, plan.to)
            }
            Self::Failed { plan, error } => write!(f, "Error renaming {}: {error}", plan.from),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenameSummary {
    pub outcomes: Vec<RenameOutcome>,
}

impl RenameSummary {
    #[must_use]
    pub fn renamed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, RenameOutcome::Renamed(_)))
            .count()
    }

    #[must_use]
    pub fn failed(&self) -> usize {
        self.outcomes
            .iter()
            .filter(|outcome| matches!(outcome, RenameOutcome::Failed { .. }))
            .count()
    }
}

/// Target name for `name`: an exact override if configured, otherwise the
/// name lowercased with spaces turned into hyphens.
#[must_use]
pub fn normalize_file_name(name: &str, config: &RenameConfig) -> String {
    if let Some(target) = config.overrides.get(name) {
        return target.clone();
    }
    name.to_lowercase().replace(' ', "-")
}

/// Lists the regular files in `dir` whose normalized name differs, sorted by
/// current name.
pub fn plan_renames(dir: &Path, config: &RenameConfig) -> Result<Vec<RenamePlan>, RenameError> {
    let io_err = |source: io::Error| RenameError::Io {
        path: dir.to_path_buf(),
        source,
    };
    match fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => return Err(RenameError::NotADirectory(dir.to_path_buf())),
        Err(err) if err.kind() == io::ErrorKind::NotFound => {
            return Err(RenameError::DirectoryNotFound(dir.to_path_buf()))
        }
        Err(err) => return Err(io_err(err)),
    }

    let mut plans = Vec::new();
    for entry in fs::read_dir(dir).map_err(io_err)? {
        let entry = entry.map_err(io_err)?;
        if entry.file_type().map_err(io_err)?.is_dir() {
            continue;
        }
        let Ok(from) = entry.file_name().into_string() else {
            warn!(path = %entry.path().display(), "skipping non UTF-8 file name");
            continue;
        };
        let to = normalize_file_name(&from, config);
        if to != from {
            plans.push(RenamePlan { from, to });
        }
    }
    plans.sort_by(|a, b| a.from.cmp(&b.from));
    Ok(plans)
}

/// Executes `plans` inside `dir`. Existing targets are never overwritten and a
/// failed rename does not stop the remaining ones.
pub fn apply_renames(dir: &Path, plans: Vec<RenamePlan>) -> RenameSummary {
    let outcomes = plans
        .into_iter()
        .map(|plan| {
            let old_path = dir.join(&plan.from);
            let new_path = dir.join(&plan.to);
            if new_path.exists() {
                warn!(from = %plan.from, to = %plan.to, "rename target exists");
                return RenameOutcome::TargetExists(plan);
            }
            match fs::rename(&old_path, &new_path) {
                Ok(()) => {
                    info!(from = %plan.from, to = %plan.to, "renamed image");
                    RenameOutcome::Renamed(plan)
                }
                Err(err) => {
                    warn!(from = %plan.from, error = %err, "rename failed");
                    RenameOutcome::Failed {
                        plan,
                        error: err.to_string(),
                    }
                }
            }
        })
        .collect();
    RenameSummary { outcomes }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generic_rule_lowercases_and_hyphenates() {
        let config = RenameConfig::default();
        assert_eq!(normalize_file_name("Container Pro.jpg", &config), "container-pro.jpg");
        assert_eq!(normalize_file_name("kiosque 2.jpg", &config), "kiosque-2.jpg");
        assert_eq!(normalize_file_name("studio.jpg", &config), "studio.jpg");
    }

    #[test]
    fn vanished_source_is_recorded_and_the_rest_still_run() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("Studio.jpg"), b"jpg").unwrap();
        let plans = vec![
            RenamePlan {
                from: "Kiosque.jpg".into(),
                to: "kiosque.jpg".into(),
            },
            RenamePlan {
                from: "Studio.jpg".into(),
                to: "studio.jpg".into(),
            },
        ];

        let summary = apply_renames(dir.path(), plans);

        assert_eq!(summary.failed(), 1);
        assert_eq!(summary.renamed(), 1);
        assert!(matches!(
            &summary.outcomes[0],
            RenameOutcome::Failed { plan, .. } if plan.from == "Kiosque.jpg"
        ));
        assert!(summary.outcomes[0].to_string().starts_with("Error renaming Kiosque.jpg"));
        assert!(dir.path().join("studio.jpg").exists());
    }

    #[test]
    fn file_in_place_of_directory_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("galerie");
        fs::write(&file, b"").unwrap();

        let err = plan_renames(&file, &RenameConfig::default()).unwrap_err();
        assert!(matches!(err, RenameError::NotADirectory(_)));
    }

    #[test]
    fn overrides_fix_typos_the_generic_rule_keeps() {
        let config = RenameConfig::default();
        assert_eq!(normalize_file_name("grenn room.jpg", &config), "green-room.jpg");
        assert_eq!(
            normalize_file_name("epsace comunautaire 2.jpg", &config),
            "espace-communautaire-2.jpg"
        );
        assert_eq!(normalize_file_name("espace beauté.jpg", &config), "espace-beaute.jpg");
    }
}
