//! Output formatting for headless mode: text, JSON or frames.

use super::{HeadlessResult, HeadlessState};
use crate::cli::OutputFormat;
use ratatui::buffer::Buffer;
use serde::Serialize;
use unicode_width::UnicodeWidthStr;

/// Renders a ratatui buffer to text.
pub struct ScreenRenderer;

impl ScreenRenderer {
    /// Renders `buffer` line by line with trailing spaces and trailing empty
    /// lines removed. Cells covered by a wide character are skipped.
    pub fn render(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut lines: Vec<String> = (0..area.height)
            .map(|y| {
                let mut line = String::new();
                let mut hidden = 0;
                for x in 0..area.width {
                    let Some(cell) = buffer.cell((area.x + x, area.y + y)) else {
                        continue;
                    };
                    if hidden > 0 {
                        hidden -= 1;
                        continue;
                    }
                    line.push_str(cell.symbol());
                    hidden = cell.symbol().width().saturating_sub(1);
                }
                line.trim_end_matches(' ').to_string()
            })
            .collect();

        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }

        format!("{}\n", lines.join("\n"))
    }
}

#[derive(Debug, Serialize)]
struct JsonOutput<'a> {
    screen: &'a str,
    screen_lines: &'a [String],
    events_executed: usize,
    duration_ms: u64,
    assertions: AssertionSummary<'a>,
    state: &'a HeadlessState,
}

#[derive(Debug, Serialize)]
struct AssertionSummary<'a> {
    passed: usize,
    failed: usize,
    failures: &'a [String],
}

/// Formats headless execution results.
pub struct HeadlessOutput {
    format: OutputFormat,
}

impl HeadlessOutput {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    pub fn format(&self, result: &HeadlessResult) -> String {
        match self.format {
            OutputFormat::Text => self.format_text(result),
            OutputFormat::Json => self.format_json(result),
            OutputFormat::Frames => self.format_frames(result),
        }
    }

    fn assertion_summary(result: &HeadlessResult) -> Option<String> {
        if result.assertions_passed == 0 && result.assertions_failed == 0 {
            return None;
        }
        let mut summary = format!(
            "Assertions: {} passed, {} failed",
            result.assertions_passed, result.assertions_failed
        );
        for failure in &result.failures {
            summary.push_str(&format!("\n  FAILED {failure}"));
        }
        Some(summary)
    }

    fn format_text(&self, result: &HeadlessResult) -> String {
        let assertions = Self::assertion_summary(result)
            .map(|s| format!("\n{s}"))
            .unwrap_or_default();

        format!(
            "{}\nEvents: {} executed in {}ms{}\n",
            result.screen,
            result.events_executed,
            result.duration.as_millis(),
            assertions
        )
    }

    fn format_json(&self, result: &HeadlessResult) -> String {
        let output = JsonOutput {
            screen: &result.screen,
            screen_lines: &result.screen_lines,
            events_executed: result.events_executed,
            duration_ms: result.duration.as_millis() as u64,
            assertions: AssertionSummary {
                passed: result.assertions_passed,
                failed: result.assertions_failed,
                failures: &result.failures,
            },
            state: &result.state,
        };

        serde_json::to_string_pretty(&output)
            .map(|json| format!("{json}\n"))
            .unwrap_or_else(|e| format!("{{\"error\": \"Failed to serialize: {e}\"}}\n"))
    }

    fn format_frames(&self, result: &HeadlessResult) -> String {
        let mut text: String = result
            .frames
            .iter()
            .map(|frame| {
                format!(
                    "=== FRAME {} ({}) ===\n{}\n",
                    frame.number,
                    frame.event.as_deref().unwrap_or("initial"),
                    frame.screen
                )
            })
            .collect();

        text.push_str(&format!(
            "Total: {} frames, {} events executed in {}ms\n",
            result.frames.len(),
            result.events_executed,
            result.duration.as_millis()
        ));
        if let Some(summary) = Self::assertion_summary(result) {
            text.push_str(&summary);
            text.push('\n');
        }
        text
    }
}
