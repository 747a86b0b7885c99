//! Host component reacting to props.

use crate::common::{Lifecycle, RecordingFactory};
use pretty_assertions::assert_eq;
use sqlformula::binding::BindingConfig;
use sqlformula::component::{Props, SqlEditor};
use sqlformula::editor::{EditorInstance, MountPoint};

fn mounted(value: &str) -> (RecordingFactory, SqlEditor<RecordingFactory>) {
    let factory = RecordingFactory::new();
    let mut editor = SqlEditor::new(factory.clone(), Props::new(value));
    editor.mount(MountPoint::default()).unwrap();
    (factory, editor)
}

#[test]
fn test_mount_constructs_with_props_value() {
    let (factory, editor) = mounted("SELECT 1");
    assert!(editor.is_mounted());
    assert_eq!(editor.value().as_deref(), Some("SELECT 1"));
    assert_eq!(editor.mount_count(), 1);
    assert_eq!(factory.recording.borrow().options[0].value, "SELECT 1");
}

#[test]
fn test_value_change_rebuilds_once() {
    let (factory, mut editor) = mounted("SELECT 1");
    let first = editor.instance().unwrap().id();

    assert!(editor.update(Props::new("SELECT 2")).unwrap());

    let second = editor.instance().unwrap().id();
    assert_ne!(first, second);
    assert_eq!(editor.value().as_deref(), Some("SELECT 2"));
    assert_eq!(editor.remount_count(), 1);

    let recording = factory.recording.borrow();
    assert_eq!(recording.destroyed(), 1);
    assert_eq!(recording.created(), 2);
    assert_eq!(recording.live(), 1);
    assert_eq!(recording.lifecycle[1], Lifecycle::Destroyed(first));
}

#[test]
fn test_same_value_keeps_instance() {
    let (factory, mut editor) = mounted("SELECT 1");
    let first = editor.instance().unwrap().id();

    assert!(!editor.update(Props::new("SELECT 1")).unwrap());

    assert_eq!(editor.instance().unwrap().id(), first);
    assert_eq!(factory.recording.borrow().created(), 1);
}

#[test]
fn test_edits_do_not_count_as_value_change() {
    let (factory, mut editor) = mounted("SELECT 1");
    editor.instance_mut().unwrap().move_to_end_of("SELECT 1 FROM users");

    assert!(!editor.update(Props::new("SELECT 1")).unwrap());
    assert_eq!(editor.value().as_deref(), Some("SELECT 1 FROM users"));
    assert_eq!(factory.recording.borrow().created(), 1);
}

#[test]
fn test_update_while_unmounted_only_stores_props() {
    let factory = RecordingFactory::new();
    let mut editor = SqlEditor::new(factory.clone(), Props::new("SELECT 1"));

    assert!(!editor.update(Props::new("SELECT 2")).unwrap());
    assert_eq!(factory.recording.borrow().created(), 0);

    editor.mount(MountPoint::default()).unwrap();
    assert_eq!(editor.value().as_deref(), Some("SELECT 2"));
}

#[test]
fn test_unmount_then_remount_fresh() {
    let (factory, mut editor) = mounted("SELECT 1");
    editor.unmount();
    editor.unmount();
    assert!(!editor.is_mounted());
    assert_eq!(editor.value(), None);

    editor.mount(MountPoint::default()).unwrap();
    assert_eq!(editor.mount_count(), 2);
    assert_eq!(factory.recording.borrow().live(), 1);
}

#[test]
fn test_drop_destroys_instance() {
    let (factory, editor) = mounted("SELECT 1");
    drop(editor);
    assert_eq!(factory.recording.borrow().live(), 0);
}

#[test]
fn test_custom_config_reaches_factory() {
    let factory = RecordingFactory::new();
    let mut config = BindingConfig::default();
    config.editor.theme = "blackboard".to_string();
    let mut editor = SqlEditor::with_config(factory.clone(), Props::new(""), config);
    editor.mount(MountPoint::default()).unwrap();

    assert_eq!(factory.recording.borrow().options[0].theme, "blackboard");
}

#[test]
fn test_failed_rebuild_leaves_component_unmounted() {
    let (factory, mut editor) = mounted("SELECT 1");
    *factory.fail_next.borrow_mut() = true;

    let err = editor.update(Props::new("SELECT 2")).unwrap_err();
    assert_eq!(err.category(), "Construction Error");
    assert!(!editor.is_mounted());
    assert_eq!(editor.container(), None);
    assert_eq!(editor.value(), None);
    assert_eq!(factory.recording.borrow().live(), 0);

    editor.mount(MountPoint::default()).unwrap();
    assert_eq!(editor.value().as_deref(), Some("SELECT 2"));
    assert_eq!(factory.recording.borrow().live(), 1);
}
