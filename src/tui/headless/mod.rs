//! Headless mode for scripted testing and automation.
//!
//! Runs the application against an in-memory terminal, executes scripted
//! events and reports the final screen, the editor state and assertion
//! results.

mod events;
mod output;

pub use events::{Assertion, Event, EventParser};
pub use output::{HeadlessOutput, ScreenRenderer};

use crate::binding::BindingConfig;
use crate::cli::{Cli, OutputFormat};
use crate::editor::EditorInstance;
use crate::error::{FormulaError, Result};
use crate::tui::app::App;
use crate::tui::ui;
use ratatui::backend::{Backend, TestBackend};
use ratatui::layout::Rect;
use ratatui::Terminal;
use serde::Serialize;
use std::path::PathBuf;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

/// Configuration for headless mode execution.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    pub width: u16,
    pub height: u16,
    pub output_format: OutputFormat,
    /// Stop at the first failed assertion.
    pub fail_fast: bool,
    /// Where to write the output (stdout when `None`).
    pub output_file: Option<PathBuf>,
}

impl HeadlessConfig {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        let (width, height) = cli.parse_screen_size().map_err(FormulaError::config)?;
        let output_format = cli.parse_output_format().map_err(FormulaError::config)?;

        Ok(Self {
            width,
            height,
            output_format,
            fail_fast: cli.fail_fast,
            output_file: cli.output_file.clone(),
        })
    }
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 24,
            output_format: OutputFormat::Text,
            fail_fast: false,
            output_file: None,
        }
    }
}

/// Result of headless execution.
#[derive(Debug)]
pub struct HeadlessResult {
    pub screen: String,
    pub screen_lines: Vec<String>,
    pub events_executed: usize,
    pub duration: Duration,
    pub assertions_passed: usize,
    pub assertions_failed: usize,
    /// Descriptions of the failed assertions.
    pub failures: Vec<String>,
    pub state: HeadlessState,
    /// Screens captured after each event (frames output only).
    pub frames: Vec<Frame>,
}

/// Snapshot of the application and editor state.
#[derive(Debug, Clone, Default, Serialize, PartialEq, Eq)]
pub struct HeadlessState {
    /// Editor text, or the host value when unmounted.
    pub value: String,
    pub mounted: bool,
    pub instance_id: Option<u64>,
    pub cursor_line: usize,
    pub cursor_ch: usize,
    pub listener_count: usize,
    pub hint_visible: bool,
    pub hint_selected: usize,
    pub hint_count: usize,
    pub hint_items: Vec<String>,
    pub mount_count: usize,
    pub remount_count: usize,
    pub running: bool,
    /// Last error reported by the application.
    pub error: Option<String>,
}

impl HeadlessState {
    pub fn from_app(app: &App) -> Self {
        let mut state = Self {
            value: app.text(),
            mount_count: app.editor.mount_count(),
            remount_count: app.editor.remount_count(),
            running: app.running,
            error: app.status.clone(),
            ..Self::default()
        };
        if let Some(editor) = app.editor.instance() {
            let cursor = editor.cursor();
            let hints = editor.hint_state();
            state.mounted = true;
            state.instance_id = Some(editor.id().get());
            state.cursor_line = cursor.line;
            state.cursor_ch = cursor.ch;
            state.listener_count = editor.listener_count();
            state.hint_visible = hints.visible;
            state.hint_selected = hints.selected;
            state.hint_count = hints.items.len();
            state.hint_items = hints.items.clone();
        }
        state
    }

    /// Looks up a field by name for `assert:state:` checks. `cursor` is
    /// `line:ch`; `hint_items` is comma separated; `hint_selected_item` is the
    /// highlighted candidate.
    pub fn field(&self, name: &str) -> Option<String> {
        match name {
            "cursor" => return Some(format!("{}:{}", self.cursor_line, self.cursor_ch)),
            "hint_items" => return Some(self.hint_items.join(",")),
            "hint_selected_item" => return self.hint_items.get(self.hint_selected).cloned(),
            _ => {}
        }
        let value = serde_json::to_value(self).ok()?;
        match value.get(name)? {
            serde_json::Value::String(s) => Some(s.clone()),
            serde_json::Value::Null => Some("none".to_string()),
            other => Some(other.to_string()),
        }
    }
}

/// A captured frame (screen state after an event).
#[derive(Debug, Clone)]
pub struct Frame {
    /// Frame number (0 = initial state).
    pub number: usize,
    /// Event that produced this frame (None for initial).
    pub event: Option<String>,
    pub screen: String,
}

/// Runs the application in headless mode.
pub struct HeadlessRunner {
    config: HeadlessConfig,
    terminal: Terminal<TestBackend>,
    app: App,
    events: Vec<Event>,
    frames: Vec<Frame>,
    assertions_passed: usize,
    assertions_failed: usize,
    failures: Vec<String>,
}

impl HeadlessRunner {
    pub fn new(config: HeadlessConfig, binding: BindingConfig, value: String) -> Result<Self> {
        let backend = TestBackend::new(config.width, config.height);
        let terminal = Terminal::new(backend).map_err(|e| {
            FormulaError::internal(format!("Failed to create test terminal: {e}"))
        })?;

        Ok(Self {
            config,
            terminal,
            app: App::new(binding, value),
            events: Vec::new(),
            frames: Vec::new(),
            assertions_passed: 0,
            assertions_failed: 0,
            failures: Vec::new(),
        })
    }

    /// Loads events from a string (comma-separated or newline-separated).
    pub fn load_events(&mut self, input: &str) -> Result<()> {
        self.events = EventParser::new().parse_all(input)?;
        Ok(())
    }

    /// Loads events from a script file, or stdin for `-`.
    pub fn load_script(&mut self, path: &str) -> Result<()> {
        let content = if path == "-" {
            use std::io::Read;
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| FormulaError::script(format!("Failed to read stdin: {e}")))?;
            buffer
        } else {
            std::fs::read_to_string(path)
                .map_err(|e| FormulaError::script(format!("Failed to read script file: {e}")))?
        };

        self.load_events(&content)
    }

    /// Mounts the editor, executes the events and returns the result.
    pub fn run(mut self) -> Result<HeadlessResult> {
        let start = Instant::now();
        let area = self.screen_area();
        self.app.mount(area)?;
        self.capture_frame(None)?;

        let events = std::mem::take(&mut self.events);
        let mut events_executed = 0;

        for event in events {
            debug!(%event, "headless event");
            let event_str = event.to_string();
            let mut stop = false;

            match &event {
                Event::Key(chord) => self.app.handle_key(chord.to_event()),
                Event::Type(text) => {
                    for c in text.chars() {
                        self.app.handle_key(crossterm::event::KeyEvent::new(
                            crossterm::event::KeyCode::Char(c),
                            crossterm::event::KeyModifiers::NONE,
                        ));
                    }
                }
                Event::Props(value) => {
                    if let Err(e) = self.app.set_value(value.as_str()) {
                        warn!("Remount failed: {}", e);
                        self.app.status = Some(e.to_string());
                    }
                }
                Event::Mount => {
                    let area = self.screen_area();
                    if let Err(e) = self.app.mount(area) {
                        warn!("Mount failed: {}", e);
                        self.app.status = Some(e.to_string());
                    }
                }
                Event::Unmount => self.app.unmount(),
                Event::Resize(w, h) => {
                    self.terminal
                        .resize(Rect::new(0, 0, *w, *h))
                        .map_err(|e| FormulaError::internal(format!("Resize failed: {e}")))?;
                }
                Event::Assert(assertion) => {
                    self.draw()?;
                    let screen = self.render_screen();
                    let state = HeadlessState::from_app(&self.app);
                    if assertion.check(&screen, &state) {
                        self.assertions_passed += 1;
                    } else {
                        warn!("Assertion failed: {}", event_str);
                        self.assertions_failed += 1;
                        self.failures.push(event_str.clone());
                        stop = self.config.fail_fast;
                    }
                }
            }

            events_executed += 1;
            if self.config.output_format == OutputFormat::Frames {
                self.capture_frame(Some(event_str))?;
            }
            if stop || !self.app.running {
                break;
            }
        }

        self.draw()?;
        let screen = self.render_screen();
        let screen_lines = screen.lines().map(String::from).collect();
        let state = HeadlessState::from_app(&self.app);
        self.app.unmount();

        Ok(HeadlessResult {
            screen,
            screen_lines,
            events_executed,
            duration: start.elapsed(),
            assertions_passed: self.assertions_passed,
            assertions_failed: self.assertions_failed,
            failures: self.failures,
            state,
            frames: self.frames,
        })
    }

    fn screen_area(&self) -> Rect {
        let size = self.terminal.backend().size().unwrap_or_default();
        Rect::new(0, 0, size.width, size.height)
    }

    fn draw(&mut self) -> Result<()> {
        let app = &mut self.app;
        self.terminal
            .draw(|frame| ui::render(frame, app))
            .map_err(|e| FormulaError::internal(format!("Failed to render: {e}")))?;
        Ok(())
    }

    fn render_screen(&self) -> String {
        ScreenRenderer::render(self.terminal.backend().buffer())
    }

    fn capture_frame(&mut self, event: Option<String>) -> Result<()> {
        self.draw()?;
        let screen = self.render_screen();
        let number = self.frames.len();
        self.frames.push(Frame {
            number,
            event,
            screen,
        });
        Ok(())
    }
}

/// Runs headless mode from CLI arguments and returns the process exit code:
/// 1 if any assertion failed, 0 otherwise.
pub fn run_headless(cli: &Cli, binding: BindingConfig, value: String) -> Result<i32> {
    cli.validate_headless().map_err(FormulaError::config)?;

    let config = HeadlessConfig::from_cli(cli)?;
    let mut runner = HeadlessRunner::new(config.clone(), binding, value)?;

    if let Some(events) = &cli.events {
        runner.load_events(events)?;
    } else if let Some(script) = &cli.script {
        runner.load_script(script)?;
    }

    let result = runner.run()?;
    let output = HeadlessOutput::new(config.output_format).format(&result);

    match &config.output_file {
        Some(path) => std::fs::write(path, &output)
            .map_err(|e| FormulaError::internal(format!("Failed to write output file: {e}")))?,
        None => print!("{output}"),
    }

    Ok(if result.assertions_failed > 0 { 1 } else { 0 })
}
