//! Schema lookups and the hints they feed.

use crate::common::RecordingFactory;
use pretty_assertions::assert_eq;
use sqlformula::binding::BindingConfig;
use sqlformula::component::{Props, SqlEditor};
use sqlformula::config::EditorConfig;
use sqlformula::editor::MountPoint;
use sqlformula::schema::{SchemaRegistry, SchemaTable};

#[test]
fn test_builtin_lookup() {
    let registry = SchemaRegistry::builtin();
    assert_eq!(registry.lookup("users"), ["name", "score", "birthDate"]);
    assert_eq!(registry.lookup("score"), ["zooao"]);
    assert!(registry.lookup("missing").is_empty());
}

#[test]
fn test_duplicate_tables_are_rejected() {
    let result = SchemaRegistry::from_tables(vec![
        SchemaTable::new("users", ["name"]),
        SchemaTable::new("users", ["email"]),
    ]);
    assert!(result.is_err());
}

#[test]
fn test_hints_follow_cursor_through_component() {
    let factory = RecordingFactory::new();
    let mut editor = SqlEditor::new(factory.clone(), Props::new(""));
    editor.mount(MountPoint::default()).unwrap();

    let instance = editor.instance_mut().unwrap();
    instance.move_to_end_of("SELECT * FROM us");
    instance.move_to_end_of("SELECT * FROM users u WHERE u.bi");

    let recording = factory.recording.borrow();
    assert_eq!(recording.hint_results[0].list, vec!["users"]);
    assert_eq!(recording.hint_results[1].list, vec!["birthDate"]);
}

#[test]
fn test_custom_registry_drives_hints() {
    let registry = SchemaRegistry::from_tables(vec![SchemaTable::new(
        "invoices",
        ["id", "issued_at", "amount"],
    )])
    .unwrap();
    let factory = RecordingFactory::new();
    let mut editor = SqlEditor::with_config(
        factory.clone(),
        Props::new(""),
        BindingConfig::new(EditorConfig::default(), registry),
    );
    editor.mount(MountPoint::default()).unwrap();

    let instance = editor.instance_mut().unwrap();
    instance.move_to_end_of("SELECT * FROM in");
    instance.move_to_end_of("SELECT invoices.is");

    let recording = factory.recording.borrow();
    assert_eq!(recording.hint_results[0].list, vec!["invoices"]);
    assert_eq!(recording.hint_results[1].list, vec!["issued_at"]);
}
