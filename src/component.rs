//! The `SqlEditor` host component.

use crate::binding::{BindingConfig, ChangeObserver, EditorBinding};
use crate::editor::{EditorFactory, MountPoint};
use crate::error::Result;
use tracing::debug;

/// Inputs of the host component.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Props {
    /// Initial document of the editor.
    pub value: String,
}

impl Props {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

/// Embeds an editor configured for SQL with schema-backed hints. The editor
/// lives between [`mount`](Self::mount) and [`unmount`](Self::unmount) (or drop).
pub struct SqlEditor<F: EditorFactory> {
    binding: EditorBinding<F>,
    config: BindingConfig,
    props: Props,
    container: Option<MountPoint>,
    mounts: usize,
    remounts: usize,
}

impl<F: EditorFactory> SqlEditor<F> {
    pub fn new(factory: F, props: Props) -> Self {
        Self::with_config(factory, props, BindingConfig::default())
    }

    pub fn with_config(factory: F, props: Props, config: BindingConfig) -> Self {
        Self {
            binding: EditorBinding::new(factory),
            config,
            props,
            container: None,
            mounts: 0,
            remounts: 0,
        }
    }

    /// Installs a change observer on every instance mounted afterwards.
    pub fn with_change_observer(mut self, observer: ChangeObserver) -> Self {
        self.binding.set_change_observer(observer);
        self
    }

    pub fn props(&self) -> &Props {
        &self.props
    }

    /// Constructs the editor inside `container` with the current props.
    pub fn mount(&mut self, container: MountPoint) -> Result<()> {
        self.binding
            .mount(container, &self.props.value, &self.config)?;
        self.container = Some(container);
        self.mounts += 1;
        Ok(())
    }

    /// Applies new props. The editor is rebuilt only when the value differs
    /// from the one the live instance was constructed with. Returns whether a
    /// rebuild happened.
    pub fn update(&mut self, props: Props) -> Result<bool> {
        let live_value = self.binding.handle().map(|h| h.initial_value().to_string());
        self.props = props;

        match live_value {
            Some(value) if value != self.props.value => {
                debug!("value changed, remounting editor");
                if let Err(e) = self.binding.remount(&self.props.value) {
                    self.container = None;
                    return Err(e);
                }
                self.remounts += 1;
                self.mounts += 1;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    /// Releases the editor. Safe to call repeatedly.
    pub fn unmount(&mut self) {
        self.binding.unmount();
        self.container = None;
    }

    pub fn is_mounted(&self) -> bool {
        self.binding.is_mounted()
    }

    /// Current text of the editor, `None` when unmounted.
    pub fn value(&self) -> Option<String> {
        self.binding.get_value()
    }

    pub fn container(&self) -> Option<MountPoint> {
        self.container
    }

    pub fn binding(&self) -> &EditorBinding<F> {
        &self.binding
    }

    pub fn instance(&self) -> Option<&F::Instance> {
        self.binding.instance()
    }

    pub fn instance_mut(&mut self) -> Option<&mut F::Instance> {
        self.binding.instance_mut()
    }

    /// Number of instances constructed so far.
    pub fn mount_count(&self) -> usize {
        self.mounts
    }

    /// Number of rebuilds caused by value changes.
    pub fn remount_count(&self) -> usize {
        self.remounts
    }
}

impl<F: EditorFactory> Drop for SqlEditor<F> {
    fn drop(&mut self) {
        self.unmount();
    }
}
