//! Instance lifecycle through `EditorBinding`.

use crate::common::{Lifecycle, RecordingFactory};
use pretty_assertions::assert_eq;
use sqlformula::binding::{BindingConfig, EditorBinding};
use sqlformula::editor::{EditorInstance, MountPoint};

fn mounted(value: &str) -> (RecordingFactory, EditorBinding<RecordingFactory>) {
    let factory = RecordingFactory::new();
    let mut binding = EditorBinding::new(factory.clone());
    binding
        .mount(MountPoint::default(), value, &BindingConfig::default())
        .unwrap();
    (factory, binding)
}

#[test]
fn test_mount_creates_exactly_one_instance() {
    let (factory, binding) = mounted("SELECT 1");
    let recording = factory.recording.borrow();
    assert_eq!(recording.created(), 1);
    assert_eq!(recording.live(), 1);
    assert_eq!(binding.instance().unwrap().listener_count(), 2);
}

#[test]
fn test_mount_again_releases_previous_instance() {
    let (factory, mut binding) = mounted("SELECT 1");
    binding
        .mount(MountPoint::default(), "SELECT 1", &BindingConfig::default())
        .unwrap();
    let recording = factory.recording.borrow();
    assert_eq!(recording.created(), 2);
    assert_eq!(recording.live(), 1);
}

#[test]
fn test_unmount_releases_listeners_and_instance() {
    let (factory, mut binding) = mounted("SELECT 1");
    let id = binding.handle().unwrap().id();
    binding.unmount();
    assert!(!binding.is_mounted());
    assert_eq!(factory.recording.borrow().lifecycle.last(), Some(&Lifecycle::Destroyed(id)));
    assert_eq!(factory.recording.borrow().live(), 0);
}

#[test]
fn test_double_unmount_is_harmless() {
    let (factory, mut binding) = mounted("");
    binding.unmount();
    binding.unmount();
    assert_eq!(factory.recording.borrow().destroyed(), 1);
}

#[test]
fn test_drop_releases_instance() {
    let (factory, binding) = mounted("SELECT 1");
    drop(binding);
    assert_eq!(factory.recording.borrow().live(), 0);
}

#[test]
fn test_remount_destroys_then_creates() {
    let (factory, mut binding) = mounted("SELECT 1");
    let first = binding.handle().unwrap().id();
    let second = binding.remount("SELECT 2").unwrap().id();
    assert_ne!(first, second);

    let recording = factory.recording.borrow();
    assert_eq!(
        recording.lifecycle,
        vec![
            Lifecycle::Created {
                id: first,
                value: "SELECT 1".to_string()
            },
            Lifecycle::Destroyed(first),
            Lifecycle::Created {
                id: second,
                value: "SELECT 2".to_string()
            },
        ]
    );
}

#[test]
fn test_failed_construction_leaves_nothing_live() {
    let (factory, mut binding) = mounted("SELECT 1");
    *factory.fail_next.borrow_mut() = true;
    let err = binding.remount("SELECT 2").unwrap_err();
    assert_eq!(err.category(), "Construction Error");
    assert!(!binding.is_mounted());
    assert_eq!(factory.recording.borrow().live(), 0);
}

#[test]
fn test_cursor_activity_requests_hints() {
    let (factory, mut binding) = mounted("");
    binding
        .instance_mut()
        .unwrap()
        .move_to_end_of("SELECT * FROM us");

    let recording = factory.recording.borrow();
    assert_eq!(recording.hint_results.len(), 1);
    assert_eq!(recording.hint_results[0].list, vec!["users"]);
}

#[test]
fn test_released_instance_no_longer_requests_hints() {
    let (factory, mut binding) = mounted("");
    binding.instance_mut().unwrap().move_to_end_of("SELECT * FROM co");
    binding.remount("SELECT 2").unwrap();
    assert_eq!(factory.recording.borrow().hint_results.len(), 1);
    assert_eq!(binding.instance().unwrap().listener_count(), 2);
}
