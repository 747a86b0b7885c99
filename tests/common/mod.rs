//! Common test utilities: a recording editor factory and a headless runner.

#![allow(dead_code)]

use sqlformula::editor::{
    CursorContext, EditorEvent, EditorFactory, EditorInstance, EditorOptions, EventKind,
    HintResult, InstanceId, Listener, MountPoint, Position, SubscriptionId,
};
use sqlformula::error::{FormulaError, Result};
use std::cell::RefCell;
use std::fmt;
use std::path::PathBuf;
use std::process::Command;
use std::rc::Rc;

/// What happened to instances built by a [`RecordingFactory`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lifecycle {
    Created { id: InstanceId, value: String },
    Destroyed(InstanceId),
}

/// Shared log of everything the factory and its instances saw.
#[derive(Debug, Default)]
pub struct Recording {
    pub options: Vec<EditorOptions>,
    pub lifecycle: Vec<Lifecycle>,
    pub hint_results: Vec<HintResult>,
}

impl Recording {
    pub fn created(&self) -> usize {
        self.lifecycle
            .iter()
            .filter(|e| matches!(e, Lifecycle::Created { .. }))
            .count()
    }

    pub fn destroyed(&self) -> usize {
        self.lifecycle
            .iter()
            .filter(|e| matches!(e, Lifecycle::Destroyed(_)))
            .count()
    }

    /// Instances created and not yet destroyed.
    pub fn live(&self) -> usize {
        self.created() - self.destroyed()
    }
}

/// Factory that records its calls and builds [`FakeEditor`]s.
#[derive(Debug, Clone, Default)]
pub struct RecordingFactory {
    pub recording: Rc<RefCell<Recording>>,
    /// Fail the next `create` call.
    pub fail_next: Rc<RefCell<bool>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EditorFactory for RecordingFactory {
    type Instance = FakeEditor;

    fn create(&mut self, _mount: &MountPoint, options: EditorOptions) -> Result<FakeEditor> {
        if std::mem::take(&mut *self.fail_next.borrow_mut()) {
            return Err(FormulaError::construction("factory refused"));
        }
        let id = InstanceId::next();
        let mut recording = self.recording.borrow_mut();
        recording.lifecycle.push(Lifecycle::Created {
            id,
            value: options.value.clone(),
        });
        recording.options.push(options.clone());

        Ok(FakeEditor {
            id,
            text: options.value.clone(),
            options,
            listeners: Vec::new(),
            next_subscription: 0,
            destroyed: false,
            recording: Rc::clone(&self.recording),
        })
    }
}

/// Minimal editor: a string with the cursor always at its end.
pub struct FakeEditor {
    id: InstanceId,
    text: String,
    options: EditorOptions,
    listeners: Vec<(SubscriptionId, EventKind, Listener)>,
    next_subscription: u64,
    destroyed: bool,
    recording: Rc<RefCell<Recording>>,
}

impl fmt::Debug for FakeEditor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FakeEditor")
            .field("id", &self.id)
            .field("text", &self.text)
            .field("listeners", &self.listeners.len())
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

impl FakeEditor {
    pub fn options(&self) -> &EditorOptions {
        &self.options
    }

    /// Moves the cursor to the end of `text` and fires `cursorActivity`.
    pub fn move_to_end_of(&mut self, text: &str) {
        self.text = text.to_string();
        let cursor = self.cursor();
        self.fire(EditorEvent::CursorActivity { cursor });
    }

    fn fire(&mut self, event: EditorEvent) {
        let mut listeners = std::mem::take(&mut self.listeners);
        for (_, kind, listener) in listeners.iter_mut() {
            if *kind == event.kind() {
                let instance: &mut dyn EditorInstance = &mut *self;
                listener(instance, &event);
            }
        }
        listeners.append(&mut self.listeners);
        self.listeners = listeners;
    }
}

impl EditorInstance for FakeEditor {
    fn id(&self) -> InstanceId {
        self.id
    }

    fn on(&mut self, kind: EventKind, listener: Listener) -> SubscriptionId {
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.listeners.push((id, kind, listener));
        id
    }

    fn off(&mut self, subscription: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _, _)| *id != subscription);
        self.listeners.len() != before
    }

    fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn value(&self) -> String {
        self.text.clone()
    }

    fn cursor(&self) -> Position {
        let line = self.text.lines().count().saturating_sub(1);
        let ch = self.text.lines().last().map_or(0, |l| l.chars().count());
        Position::new(line, ch)
    }

    fn show_hint(&mut self) {
        let Some(source) = self.options.hint_options.hint.clone() else {
            return;
        };
        let result = source.hints(&CursorContext::at_end(&self.text));
        self.recording.borrow_mut().hint_results.push(result);
    }

    fn close_hint(&mut self) {}

    fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.destroyed = true;
        self.recording
            .borrow_mut()
            .lifecycle
            .push(Lifecycle::Destroyed(self.id));
    }

    fn is_destroyed(&self) -> bool {
        self.destroyed
    }
}

/// Path of a config file that does not exist, so runs use the defaults.
pub fn missing_config() -> PathBuf {
    std::env::temp_dir().join("sqlformula-tests-no-such-dir").join("config.toml")
}

/// Runs the sqlformula binary with the given arguments and the default
/// configuration.
pub fn run_sqlformula(args: &[&str]) -> (i32, String, String) {
    let config = missing_config();
    let output = Command::new(env!("CARGO_BIN_EXE_sqlformula"))
        .arg("--config")
        .arg(&config)
        .args(args)
        .env_remove("SQLFORMULA_MODE")
        .env_remove("SQLFORMULA_THEME")
        .output()
        .expect("Failed to execute command");

    let exit_code = output.status.code().unwrap_or(-1);
    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();

    (exit_code, stdout, stderr)
}

/// Runs sqlformula in headless mode.
pub fn run_headless(args: &[&str]) -> (i32, String, String) {
    let mut all = vec!["--headless"];
    all.extend_from_slice(args);
    run_sqlformula(&all)
}
