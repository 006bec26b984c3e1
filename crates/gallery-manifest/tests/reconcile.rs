use std::collections::BTreeMap;
use std::fs;

use gallery_manifest::{
    reconcile, reconcile_file, ImageAction, Manifest, ManifestError, ReconcileConfig,
};
use serde_json::{json, Value};
use tempfile::tempdir;

fn config_with(mapping: &[(&str, &str)]) -> ReconcileConfig {
    ReconcileConfig {
        mapping: mapping
            .iter()
            .map(|(id, file)| ((*id).to_string(), (*file).to_string()))
            .collect::<BTreeMap<_, _>>(),
        ..ReconcileConfig::default()
    }
}

fn manifest(value: Value) -> Manifest {
    Manifest::from_json_str(&value.to_string()).unwrap()
}

#[test]
fn mapped_inline_payload_is_replaced_with_gallery_path() {
    let mut doc = manifest(json!({
        "spaces": [{"id": "studio-creatif", "image": "data:image/png;base64,AAA"}]
    }));
    let config = config_with(&[("studio-creatif", "studio.jpg")]);

    reconcile(&mut doc, &config).unwrap();

    assert_eq!(
        doc.into_value(),
        json!({"spaces": [{"id": "studio-creatif", "image": "/galerie/studio.jpg"}]})
    );
}

#[test]
fn mapping_wins_over_existing_plain_path() {
    let mut doc = manifest(json!({
        "spaces": [{"id": "kiosque-2", "image": "/galerie/kiosque 2.jpg"}]
    }));
    let config = config_with(&[("kiosque-2", "kiosque-2.jpg")]);

    let report = reconcile(&mut doc, &config).unwrap();

    assert_eq!(doc.spaces().unwrap()[0]["image"], "/galerie/kiosque-2.jpg");
    assert_eq!(
        report.outcomes[0].action,
        ImageAction::Mapped {
            from: Some("/galerie/kiosque 2.jpg".into()),
            to: "/galerie/kiosque-2.jpg".into(),
        }
    );
}

#[test]
fn unmapped_inline_payload_falls_back_to_logo() {
    let mut doc = manifest(json!({
        "spaces": [{"id": "unknown-x", "image": "data:image/jpeg;base64,/9j/4AAQ"}]
    }));

    let report = reconcile(&mut doc, &config_with(&[])).unwrap();

    assert_eq!(doc.spaces().unwrap()[0]["image"], "/logo.png");
    assert!(matches!(
        report.outcomes[0].action,
        ImageAction::Fallback { .. }
    ));
    assert_eq!(report.changed(), 1);
}

#[test]
fn unmapped_plain_path_and_missing_image_are_untouched() {
    let original = json!({
        "spaces": [
            {"id": "salle-x", "image": "/galerie/salle.jpg"},
            {"id": "sans-image", "name": "Sans image"},
            {"name": "no id", "image": 42}
        ]
    });
    let mut doc = manifest(original.clone());

    let report = reconcile(&mut doc, &config_with(&[])).unwrap();

    assert_eq!(doc.into_value(), original);
    assert_eq!(report.outcomes.len(), 3);
    assert_eq!(report.changed(), 0);
    assert_eq!(report.outcomes[2].id, None);
}

#[test]
fn other_fields_and_events_are_preserved() {
    let events = json!([
        {"id": "vernissage", "eventImage": "data:image/png;base64,BBB", "date": "2024-05-01"}
    ]);
    let mut doc = manifest(json!({
        "title": "Galerie",
        "spaces": [{
            "id": "green-room",
            "name": "Green Room",
            "capacity": 12,
            "tags": ["son", "vidéo"],
            "image": "data:image/png;base64,CCC"
        }],
        "events": events.clone()
    }));

    reconcile(&mut doc, &ReconcileConfig::default()).unwrap();

    let space = &doc.spaces().unwrap()[0];
    assert_eq!(space["image"], "/galerie/green-room.jpg");
    assert_eq!(space["name"], "Green Room");
    assert_eq!(space["capacity"], 12);
    assert_eq!(space["tags"], json!(["son", "vidéo"]));
    assert_eq!(doc.events(), Some(&events));
    assert_eq!(doc.get("title"), Some(&json!("Galerie")));
}

#[test]
fn reconciling_twice_matches_reconciling_once() {
    let source = json!({
        "spaces": [
            {"id": "communaute", "image": "data:image/png;base64,AAA"},
            {"id": "mystery", "image": "data:image/png;base64,BBB"},
            {"id": "plain", "image": "/galerie/plain.jpg"}
        ]
    });
    let config = ReconcileConfig::default();

    let mut once = manifest(source.clone());
    reconcile(&mut once, &config).unwrap();
    let mut twice = once.clone();
    let second = reconcile(&mut twice, &config).unwrap();

    assert_eq!(once, twice);
    assert_eq!(second.changed(), 0);
}

#[test]
fn missing_spaces_collection_is_a_no_op() {
    let original = json!({"events": []});
    let mut doc = manifest(original.clone());

    let report = reconcile(&mut doc, &ReconcileConfig::default()).unwrap();

    assert!(report.outcomes.is_empty());
    assert_eq!(doc.into_value(), original);
}

#[test]
fn malformed_space_entry_fails_without_partial_mutation() {
    let original = json!({
        "spaces": [
            {"id": "studio-creatif", "image": "data:image/png;base64,AAA"},
            "not-an-object"
        ]
    });
    let mut doc = manifest(original.clone());

    let err = reconcile(&mut doc, &ReconcileConfig::default()).unwrap_err();

    assert!(matches!(err, ManifestError::InvalidShape(ref msg) if msg.contains("spaces[1]")));
    assert_eq!(doc.into_value(), original);
}

#[test]
fn reconcile_file_rewrites_with_two_space_indent() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("content.json");
    fs::write(
        &path,
        r#"{"spaces":[{"id":"espace-beaute","name":"Espace beauté","image":"data:image/png;base64,AAA"}]}"#,
    )
    .unwrap();

    reconcile_file(&path, &ReconcileConfig::default()).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    let expected = "{\n  \"spaces\": [\n    {\n      \"id\": \"espace-beaute\",\n      \"name\": \"Espace beauté\",\n      \"image\": \"/galerie/espace-beaute.jpg\"\n    }\n  ]\n}";
    assert_eq!(written, expected);
}

#[test]
fn reconcile_file_reports_missing_manifest_without_writing() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("content.json");

    let err = reconcile_file(&path, &ReconcileConfig::default()).unwrap_err();

    assert!(matches!(err, ManifestError::NotFound(_)));
    assert!(!path.exists());
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}

#[test]
fn reconcile_file_leaves_malformed_json_untouched() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("content.json");
    let broken = r#"{"spaces": [{"id": "studio-creatif""#;
    fs::write(&path, broken).unwrap();

    let err = reconcile_file(&path, &ReconcileConfig::default()).unwrap_err();

    assert!(matches!(err, ManifestError::Parse(_)));
    assert_eq!(fs::read_to_string(&path).unwrap(), broken);
}

#[test]
fn reconcile_file_keeps_large_numbers_verbatim() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("content.json");
    fs::write(
        &path,
        r#"{"spaces":[{"id":"studio-creatif","ref":12345678901234567890123,"ratio":0.1,"image":"data:image/png;base64,AAA"}],"events":[{"ticket":98765432109876543210987,"price":12.50}]}"#,
    )
    .unwrap();

    reconcile_file(&path, &ReconcileConfig::default()).unwrap();

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("\"ref\": 12345678901234567890123"));
    assert!(written.contains("\"ratio\": 0.1"));
    assert!(written.contains("\"ticket\": 98765432109876543210987"));
    assert!(written.contains("\"price\": 12.50"));
    assert!(written.contains("\"image\": \"/galerie/studio.jpg\""));
}
