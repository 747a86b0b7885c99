//! Terminal user interface.
//!
//! Runs the editor full screen using ratatui and crossterm. The headless
//! submodule drives the same application from a script instead of a terminal.

pub mod app;
mod events;
pub mod headless;
pub mod ui;
pub mod widgets;

pub use app::App;
pub use events::{Event, EventHandler};

use crate::binding::BindingConfig;
use crate::error::{FormulaError, Result};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Stdout};
use std::panic;
use tracing::{debug, info};

/// The interactive TUI runner.
pub struct Tui {
    terminal: Terminal<CrosstermBackend<Stdout>>,
    event_handler: EventHandler,
}

impl Tui {
    /// Creates a new TUI instance, initializing the terminal.
    pub fn new() -> Result<Self> {
        Ok(Self {
            terminal: Self::setup_terminal()?,
            event_handler: EventHandler::new(),
        })
    }

    fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>> {
        enable_raw_mode()
            .map_err(|e| FormulaError::terminal(format!("Failed to enable raw mode: {e}")))?;

        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen).map_err(|e| {
            FormulaError::terminal(format!("Failed to enter alternate screen: {e}"))
        })?;

        Terminal::new(CrosstermBackend::new(stdout))
            .map_err(|e| FormulaError::terminal(format!("Failed to create terminal: {e}")))
    }

    fn restore_terminal(&mut self) -> Result<()> {
        disable_raw_mode()
            .map_err(|e| FormulaError::terminal(format!("Failed to disable raw mode: {e}")))?;

        execute!(self.terminal.backend_mut(), LeaveAlternateScreen).map_err(|e| {
            FormulaError::terminal(format!("Failed to leave alternate screen: {e}"))
        })?;

        self.terminal
            .show_cursor()
            .map_err(|e| FormulaError::terminal(format!("Failed to show cursor: {e}")))
    }

    /// Runs the event loop until the user quits.
    pub fn run(&mut self, app: &mut App) -> Result<()> {
        let original_hook = panic::take_hook();
        panic::set_hook(Box::new(move |panic_info| {
            let _ = disable_raw_mode();
            let _ = execute!(io::stdout(), LeaveAlternateScreen);
            original_hook(panic_info);
        }));

        let size = self
            .terminal
            .size()
            .map_err(|e| FormulaError::terminal(format!("Failed to read terminal size: {e}")))?;
        app.mount(Rect::new(0, 0, size.width, size.height))?;
        info!("Editor ready");

        while app.running {
            self.terminal
                .draw(|frame| ui::render(frame, app))
                .map_err(|e| FormulaError::terminal(format!("Failed to draw: {e}")))?;

            let event = self.event_handler.next()?;
            if !matches!(event, Event::Tick) {
                debug!(?event, "terminal event");
            }
            app.handle_event(event);
        }

        let _ = panic::take_hook();
        Ok(())
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore_terminal();
    }
}

/// Runs the interactive editor and returns the final text.
pub fn run(config: BindingConfig, value: String) -> Result<String> {
    let mut app = App::new(config, value);
    {
        let mut tui = Tui::new()?;
        tui.run(&mut app)?;
    }
    let text = app.text();
    app.unmount();
    Ok(text)
}
