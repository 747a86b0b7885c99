//! Lifecycle of the editor instance behind the host component.
//!
//! The binding owns at most one live instance. Options cannot be changed on a
//! live instance, so a new value is applied by destroying the instance and
//! constructing a fresh one.

use crate::config::EditorConfig;
use crate::editor::mode::SqlMode;
use crate::editor::{
    ChangeEvent, EditorEvent, EditorFactory, EditorInstance, EditorOptions, EventKind,
    HintOptions, HintSource, InstanceId, MountPoint, SubscriptionId,
};
use crate::error::{FormulaError, Result};
use crate::provider::HintProvider;
use crate::schema::SchemaRegistry;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, info};

/// Callback notified of every content change of the live instance.
pub type ChangeObserver = Box<dyn FnMut(InstanceId, &ChangeEvent)>;

/// What an instance is constructed from, apart from its value.
#[derive(Debug, Clone)]
pub struct BindingConfig {
    pub editor: EditorConfig,
    pub registry: SchemaRegistry,
}

impl Default for BindingConfig {
    fn default() -> Self {
        Self {
            editor: EditorConfig::default(),
            registry: SchemaRegistry::builtin().clone(),
        }
    }
}

impl BindingConfig {
    pub fn new(editor: EditorConfig, registry: SchemaRegistry) -> Self {
        Self { editor, registry }
    }

    /// Creation options for an instance holding `value`. Single candidates
    /// are never inserted automatically, whatever the configuration says.
    pub fn editor_options(&self, value: &str) -> Result<EditorOptions> {
        let mode = SqlMode::from_mime(&self.editor.mode)?;
        let provider = HintProvider::new(&self.registry, mode);
        let tables = provider.tables().clone();
        let hint: Rc<dyn HintSource> = Rc::new(provider);
        let editor = &self.editor;

        Ok(EditorOptions {
            value: value.to_string(),
            mode: editor.mode.clone(),
            theme: editor.theme.clone(),
            indent_with_tabs: editor.indent_with_tabs,
            indent_unit: editor.indent_unit,
            tab_size: editor.tab_size,
            smart_indent: editor.smart_indent,
            match_brackets: editor.match_brackets,
            line_wrapping: editor.line_wrapping,
            autofocus: editor.autofocus,
            extra_keys: editor.extra_keys.clone(),
            hint_options: HintOptions {
                complete_single: false,
                tables,
                hint: Some(hint),
            },
        })
    }
}

/// A live instance together with its two subscriptions.
#[derive(Debug)]
pub struct EditorHandle<I> {
    instance: I,
    cursor_subscription: SubscriptionId,
    change_subscription: SubscriptionId,
    value: String,
}

impl<I: EditorInstance> EditorHandle<I> {
    pub fn instance(&self) -> &I {
        &self.instance
    }

    pub fn id(&self) -> InstanceId {
        self.instance.id()
    }

    /// The value the instance was constructed with.
    pub fn initial_value(&self) -> &str {
        &self.value
    }

    fn release(mut self) {
        self.instance.off(self.cursor_subscription);
        self.instance.off(self.change_subscription);
        self.instance.destroy();
        debug!(id = %self.instance.id(), "editor instance released");
    }
}

/// Creates, replaces and releases editor instances.
pub struct EditorBinding<F: EditorFactory> {
    factory: F,
    handle: Option<EditorHandle<F::Instance>>,
    last_mount: Option<(MountPoint, BindingConfig)>,
    observer: Option<Rc<RefCell<ChangeObserver>>>,
}

impl<F: EditorFactory> EditorBinding<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory,
            handle: None,
            last_mount: None,
            observer: None,
        }
    }

    /// Adds a callback notified of every change on instances mounted from
    /// now on.
    pub fn with_change_observer(mut self, observer: ChangeObserver) -> Self {
        self.set_change_observer(observer);
        self
    }

    /// Replaces the change observer. The live instance keeps the one it was
    /// mounted with.
    pub fn set_change_observer(&mut self, observer: ChangeObserver) {
        self.observer = Some(Rc::new(RefCell::new(observer)));
    }

    /// Constructs an instance holding `initial_value` against `container`.
    /// A previously live instance is released first.
    pub fn mount(
        &mut self,
        container: MountPoint,
        initial_value: &str,
        config: &BindingConfig,
    ) -> Result<&EditorHandle<F::Instance>> {
        self.unmount();

        let options = config.editor_options(initial_value)?;
        let mut instance = self.factory.create(&container, options)?;

        let cursor_subscription = instance.on(
            EventKind::CursorActivity,
            Box::new(|editor, _| editor.show_hint()),
        );

        let observer = self.observer.clone();
        let change_subscription = instance.on(
            EventKind::Change,
            Box::new(move |editor, event| {
                if let EditorEvent::Change(change) = event {
                    debug!(
                        id = %editor.id(),
                        from = ?change.from,
                        to = ?change.to,
                        inserted = ?change.text,
                        removed = ?change.removed,
                        "editor content changed"
                    );
                    if let Some(observer) = &observer {
                        let mut callback = observer.borrow_mut();
                        (*callback)(editor.id(), change);
                    }
                }
            }),
        );

        info!(id = %instance.id(), mode = %config.editor.mode, "editor mounted");
        self.last_mount = Some((container, config.clone()));
        Ok(self.handle.insert(EditorHandle {
            instance,
            cursor_subscription,
            change_subscription,
            value: initial_value.to_string(),
        }))
    }

    /// Replaces the live instance with one holding `new_value`, reusing the
    /// container and configuration of the last mount. Cursor position and
    /// history are not carried over.
    pub fn remount(&mut self, new_value: &str) -> Result<&EditorHandle<F::Instance>> {
        let (container, config) = self
            .last_mount
            .clone()
            .ok_or_else(|| FormulaError::internal("Editor binding was never mounted"))?;
        self.mount(container, new_value, &config)
    }

    /// Unsubscribes and destroys the live instance. Does nothing if none is live.
    pub fn unmount(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.release();
        }
    }

    /// Current text of the live instance.
    pub fn get_value(&self) -> Option<String> {
        self.handle.as_ref().map(|h| h.instance.value())
    }

    pub fn handle(&self) -> Option<&EditorHandle<F::Instance>> {
        self.handle.as_ref()
    }

    pub fn is_mounted(&self) -> bool {
        self.handle.is_some()
    }

    pub fn instance(&self) -> Option<&F::Instance> {
        self.handle.as_ref().map(|h| &h.instance)
    }

    pub fn instance_mut(&mut self) -> Option<&mut F::Instance> {
        self.handle.as_mut().map(|h| &mut h.instance)
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }
}

impl<F: EditorFactory> Drop for EditorBinding<F> {
    fn drop(&mut self) {
        self.unmount();
    }
}
