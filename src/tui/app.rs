//! Application state for the TUI.

use super::events::Event;
use super::ui;
use crate::binding::BindingConfig;
use crate::component::{Props, SqlEditor};
use crate::editor::{EditorInstance, MountPoint, TerminalFactory};
use crate::error::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::Rect;
use tracing::{info, warn};

/// Main application state.
pub struct App {
    /// The hosted editor component.
    pub editor: SqlEditor<TerminalFactory>,
    /// Whether the application is still running.
    pub running: bool,
    /// Last error or notice shown in the status bar.
    pub status: Option<String>,
    mode: String,
    theme: String,
}

impl App {
    /// Creates the application. The editor is not mounted yet.
    pub fn new(config: BindingConfig, value: impl Into<String>) -> Self {
        let mode = config.editor.mode.clone();
        let theme = config.editor.theme.clone();
        Self {
            editor: SqlEditor::with_config(TerminalFactory, Props::new(value), config),
            running: true,
            status: None,
            mode,
            theme,
        }
    }

    /// Mounts the editor into its region of a `screen`-sized terminal.
    pub fn mount(&mut self, screen: Rect) -> Result<()> {
        let area = ui::layout(screen).editor;
        self.editor.mount(MountPoint::new(area))?;
        self.status = None;
        Ok(())
    }

    pub fn unmount(&mut self) {
        self.editor.unmount();
    }

    /// Re-renders the host with a new value.
    pub fn set_value(&mut self, value: impl Into<String>) -> Result<bool> {
        self.editor.update(Props::new(value))
    }

    /// Handles a terminal event.
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) => self.handle_key(key),
            Event::Resize(width, height) => {
                info!("Terminal resized to {}x{}", width, height);
            }
            Event::Tick => {}
        }
    }

    /// Ctrl-Q and Ctrl-C quit; every other key goes to the editor.
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        if key.modifiers.contains(KeyModifiers::CONTROL)
            && matches!(key.code, KeyCode::Char('q') | KeyCode::Char('c'))
        {
            self.running = false;
            return;
        }
        match self.editor.instance_mut() {
            Some(editor) => {
                editor.handle_key(key);
            }
            None => warn!("Key {:?} ignored, editor is not mounted", key.code),
        }
    }

    /// Text of the live editor, or the current value when unmounted.
    pub fn text(&self) -> String {
        self.editor
            .value()
            .unwrap_or_else(|| self.editor.props().value.clone())
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn theme(&self) -> &str {
        &self.theme
    }

    /// Status bar text.
    pub fn status_line(&self) -> String {
        if let Some(status) = &self.status {
            return status.clone();
        }
        let Some(editor) = self.editor.instance() else {
            return "editor unmounted | Ctrl-Q quit".to_string();
        };
        let cursor = editor.cursor();
        let hints = editor.hint_state();
        let hint_text = if hints.visible {
            match hints.items.len() {
                1 => " | 1 hint".to_string(),
                n => format!(" | {n} hints"),
            }
        } else {
            String::new()
        };
        format!(
            "Ln {}, Col {}{} | Ctrl-Q quit",
            cursor.line + 1,
            cursor.ch + 1,
            hint_text
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn mounted(value: &str) -> App {
        let mut app = App::new(BindingConfig::default(), value);
        app.mount(Rect::new(0, 0, 80, 24)).unwrap();
        app
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn test_ctrl_q_quits() {
        let mut app = mounted("");
        app.handle_key(KeyEvent::new(KeyCode::Char('q'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[test]
    fn test_keys_reach_editor() {
        let mut app = mounted("");
        for c in "SELECT".chars() {
            app.handle_key(key(KeyCode::Char(c)));
        }
        assert_eq!(app.text(), "SELECT");
        assert_eq!(app.status_line(), "Ln 1, Col 7 | Ctrl-Q quit");
    }

    #[test]
    fn test_text_when_unmounted_is_props_value() {
        let mut app = mounted("SELECT 1");
        app.unmount();
        assert_eq!(app.text(), "SELECT 1");
        assert!(app.status_line().starts_with("editor unmounted"));
    }

    #[test]
    fn test_set_value_remounts() {
        let mut app = mounted("SELECT 1");
        assert!(app.set_value("SELECT 2").unwrap());
        assert_eq!(app.text(), "SELECT 2");
        assert_eq!(app.editor.remount_count(), 1);
    }

    #[test]
    fn test_mount_uses_editor_region() {
        let app = mounted("");
        let container = app.editor.container().unwrap();
        assert_eq!(container.area, ui::layout(Rect::new(0, 0, 80, 24)).editor);
    }
}
