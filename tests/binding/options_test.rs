//! Creation options handed to the factory.

use crate::common::RecordingFactory;
use pretty_assertions::assert_eq;
use sqlformula::binding::{BindingConfig, EditorBinding};
use sqlformula::config::EditorConfig;
use sqlformula::editor::{CursorContext, EditorOptions, MountPoint};
use sqlformula::schema::{SchemaRegistry, SchemaTable};

fn options_for(config: &BindingConfig, value: &str) -> EditorOptions {
    let factory = RecordingFactory::new();
    let mut binding = EditorBinding::new(factory.clone());
    binding.mount(MountPoint::default(), value, config).unwrap();
    let options = factory.recording.borrow().options[0].clone();
    options
}

#[test]
fn test_default_options() {
    let options = options_for(&BindingConfig::default(), "SELECT 1");
    assert_eq!(options.value, "SELECT 1");
    assert_eq!(options.mode, "text/x-mysql");
    assert_eq!(options.theme, "cobalt");
    assert!(options.indent_with_tabs);
    assert!(options.smart_indent);
    assert!(options.match_brackets);
    assert!(options.line_wrapping);
    assert!(options.autofocus);
    assert_eq!(
        options.extra_keys.get("Tab").map(String::as_str),
        Some("autocomplete")
    );
}

#[test]
fn test_complete_single_is_always_off() {
    let mut config = BindingConfig::default();
    config.editor.hint.complete_single = true;
    let options = options_for(&config, "");
    assert!(!options.hint_options.complete_single);
}

#[test]
fn test_tables_come_from_registry() {
    let registry = SchemaRegistry::from_tables(vec![SchemaTable::new("orders", ["id", "total"])])
        .unwrap();
    let config = BindingConfig::new(EditorConfig::default(), registry);
    let options = options_for(&config, "");

    assert_eq!(options.hint_options.tables.len(), 1);
    assert_eq!(
        options.hint_options.tables.get("orders"),
        Some(&vec!["id".to_string(), "total".to_string()])
    );
}

#[test]
fn test_hint_source_completes_from_registry() {
    let options = options_for(&BindingConfig::default(), "");
    let source = options.hint_options.hint.unwrap();
    let result = source.hints(&CursorContext::at_end("SELECT users.sc"));
    assert_eq!(result.list, vec!["score"]);
}

#[test]
fn test_hint_source_falls_back_to_custom_hints() {
    let options = options_for(&BindingConfig::default(), "");
    let source = options.hint_options.hint.unwrap();
    let result = source.hints(&CursorContext::at_end("SELECT * FROM users LIMIT "));
    assert_eq!(result.list, vec!["custom-hint", "abc"]);
}

#[test]
fn test_unknown_mode_is_rejected_before_construction() {
    let mut config = BindingConfig::default();
    config.editor.mode = "text/x-unknown".to_string();
    let factory = RecordingFactory::new();
    let mut binding = EditorBinding::new(factory.clone());
    assert!(binding.mount(MountPoint::default(), "", &config).is_err());
    assert_eq!(factory.recording.borrow().created(), 0);
}
