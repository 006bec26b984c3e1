//! Read-only summary of a manifest, for debugging content issues.

use std::fmt;

use serde::Serialize;
use serde_json::Value;

use crate::manifest::Manifest;

const EVENT_IMAGE_KEY: &str = "eventImage";
const EVENT_IMAGE_MAX_CHARS: usize = 100;
const EVENT_IMAGE_KEEP_CHARS: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpaceListing {
    pub id: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ManifestSummary {
    pub keys: Vec<String>,
    /// `None` when the manifest has no `spaces` array.
    pub spaces: Option<Vec<SpaceListing>>,
    pub event_count: Option<usize>,
    /// First event with a long `eventImage` shortened.
    pub first_event: Option<Value>,
}

#[must_use]
pub fn summarize(manifest: &Manifest) -> ManifestSummary {
    let spaces = manifest.spaces().and_then(Value::as_array).map(|items| {
        items
            .iter()
            .map(|space| SpaceListing {
                id: string_field(space, "id"),
                name: string_field(space, "name"),
            })
            .collect()
    });
    let events = manifest.events().and_then(Value::as_array);

    ManifestSummary {
        keys: manifest.keys().map(str::to_owned).collect(),
        spaces,
        event_count: events.map(Vec::len),
        first_event: events.and_then(|events| events.first()).map(truncate_event_image),
    }
}

fn string_field(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(str::to_owned)
}

fn truncate_event_image(event: &Value) -> Value {
    let mut event = event.clone();
    if let Some(Value::String(image)) = event.get_mut(EVENT_IMAGE_KEY) {
        if image.chars().count() > EVENT_IMAGE_MAX_CHARS {
            let head: String = image.chars().take(EVENT_IMAGE_KEEP_CHARS).collect();
            *image = format!("{head}...");
        }
    }
    event
}

impl fmt::Display for ManifestSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Keys: {:?}", self.keys)?;
        match &self.spaces {
            Some(spaces) => {
                writeln!(f, "Spaces found:")?;
                for space in spaces {
                    writeln!(
                        f,
                        "ID: {}, Name: {}",
                        space.id.as_deref().unwrap_or("-"),
                        space.name.as_deref().unwrap_or("-")
                    )?;
                }
            }
            None => writeln!(f, "No 'spaces' key found in JSON.")?,
        }
        if let Some(count) = self.event_count {
            writeln!(f, "Number of events: {count}")?;
        }
        if let Some(event) = &self.first_event {
            writeln!(f, "First event: {event}")?;
        }
        Ok(())
    }
}
