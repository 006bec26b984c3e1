//! Whole-document access to `content.json`.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use serde_json::{Map, Value};
use tempfile::NamedTempFile;

use crate::error::ManifestError;

pub const SPACES_KEY: &str = "spaces";
pub const EVENTS_KEY: &str = "events";

/// Top-level manifest object. Key order and every field this crate does not
/// touch are kept as loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct Manifest {
    root: Map<String, Value>,
}

impl Manifest {
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let raw = match fs::read_to_string(path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                return Err(ManifestError::NotFound(path.to_path_buf()))
            }
            Err(err) => return Err(ManifestError::io(path, err)),
        };
        Self::from_json_str(&raw)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, ManifestError> {
        match serde_json::from_str::<Value>(raw)? {
            Value::Object(root) => Ok(Self { root }),
            other => Err(ManifestError::InvalidShape(format!(
                "top level must be an object, found {}",
                json_type_name(&other)
            ))),
        }
    }

    /// Two-space indented JSON with non-ASCII text written verbatim.
    pub fn to_pretty_string(&self) -> Result<String, ManifestError> {
        Ok(serde_json::to_string_pretty(&self.root)?)
    }

    /// Replaces the file at `path` with this manifest. The document goes to an
    /// anonymous temp file in the same directory and is renamed over `path`
    /// only once fully written; on any error the temp file is removed and the
    /// old manifest is untouched.
    pub fn save(&self, path: &Path) -> Result<(), ManifestError> {
        let encoded = self.to_pretty_string()?;
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let mut tmp = NamedTempFile::new_in(dir).map_err(|err| ManifestError::io(dir, err))?;
        tmp.write_all(encoded.as_bytes())
            .and_then(|()| tmp.as_file().sync_all())
            .map_err(|err| ManifestError::io(tmp.path(), err))?;
        tmp.persist(path)
            .map_err(|err| ManifestError::io(path, err.error))?;
        Ok(())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.root.keys().map(String::as_str)
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    pub fn spaces(&self) -> Option<&Value> {
        self.root.get(SPACES_KEY)
    }

    pub fn events(&self) -> Option<&Value> {
        self.root.get(EVENTS_KEY)
    }

    pub(crate) fn spaces_mut(&mut self) -> Option<&mut Value> {
        self.root.get_mut(SPACES_KEY)
    }

    pub fn into_value(self) -> Value {
        Value::Object(self.root)
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
