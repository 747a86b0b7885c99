//! Command-line argument parsing for sqlformula.

use crate::config::Overrides;
use crate::error::{FormulaError, Result};
use clap::Parser;
use std::path::PathBuf;

/// How a headless run reports the final editor screen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// The last screen followed by a run summary.
    #[default]
    Text,
    /// Screen, editor state and assertion results as one JSON document.
    Json,
    /// Frame-by-frame output showing the screen after each event.
    Frames,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "frames" => Ok(Self::Frames),
            _ => Err(format!(
                "Unknown output format '{s}' (use text, json or frames)"
            )),
        }
    }
}

/// A terminal SQL editor with schema-aware autocompletion.
#[derive(Parser, Debug)]
#[command(name = "sqlformula")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// TOML file with editor options and schema
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Initial editor content
    #[arg(long, value_name = "TEXT", conflicts_with = "file")]
    pub value: Option<String>,

    /// Read the initial editor content from a file
    #[arg(long, value_name = "PATH")]
    pub file: Option<PathBuf>,

    /// SQL mode (e.g., text/x-mysql, text/x-pgsql)
    #[arg(long, value_name = "MIME", env = "SQLFORMULA_MODE")]
    pub mode: Option<String>,

    /// Color theme (default, cobalt, blackboard)
    #[arg(long, value_name = "NAME", env = "SQLFORMULA_THEME")]
    pub theme: Option<String>,

    /// Print the schema used for hints and exit
    #[arg(long)]
    pub print_schema: bool,

    /// Drive the editor from scripted events against an in-memory screen
    #[arg(long)]
    pub headless: bool,

    /// Comma-separated events to execute in headless mode (e.g., "type:SELECT,key:Tab")
    #[arg(long, value_name = "EVENTS")]
    pub events: Option<String>,

    /// File with one event per line (use "-" for stdin)
    #[arg(long, value_name = "PATH")]
    pub script: Option<String>,

    /// In-memory screen size as WIDTHxHEIGHT
    #[arg(long, value_name = "SIZE", default_value = "80x24")]
    pub size: String,

    /// Report format: text, json or frames
    #[arg(long, value_name = "FORMAT", default_value = "text")]
    pub output: String,

    /// Write the report here instead of stdout
    #[arg(long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,

    /// Stop executing events after the first failed assertion
    #[arg(long)]
    pub fail_fast: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// `--config`, or the per-user default location.
    pub fn config_path(&self) -> PathBuf {
        self.config
            .clone()
            .unwrap_or_else(crate::config::Config::default_path)
    }

    /// Settings that take precedence over the config file.
    pub fn overrides(&self) -> Overrides {
        Overrides {
            mode: self.mode.clone(),
            theme: self.theme.clone(),
        }
    }

    /// Initial editor content from --value or --file, empty otherwise.
    pub fn initial_value(&self) -> Result<String> {
        if let Some(value) = &self.value {
            return Ok(value.clone());
        }
        match &self.file {
            Some(path) => std::fs::read_to_string(path).map_err(|e| {
                FormulaError::config(format!("Failed to read {}: {e}", path.display()))
            }),
            None => Ok(String::new()),
        }
    }

    pub fn is_headless(&self) -> bool {
        self.headless
    }

    pub fn parse_screen_size(&self) -> std::result::Result<(u16, u16), String> {
        parse_size(&self.size)
    }

    pub fn parse_output_format(&self) -> std::result::Result<OutputFormat, String> {
        self.output.parse()
    }

    /// Checks the headless flags before anything is mounted.
    pub fn validate_headless(&self) -> std::result::Result<(), String> {
        if !self.headless {
            return Ok(());
        }

        if self.events.is_none() && self.script.is_none() {
            return Err("--headless requires --events or --script".to_string());
        }

        self.parse_screen_size()?;
        self.parse_output_format()?;

        Ok(())
    }
}

/// Parses `WIDTHxHEIGHT`. Both dimensions must be non-zero.
pub fn parse_size(size: &str) -> std::result::Result<(u16, u16), String> {
    let Some((width, height)) = size.split_once('x') else {
        return Err(format!(
            "Invalid size format: '{size}'. Expected WIDTHxHEIGHT (e.g., 80x24)"
        ));
    };
    let width = width
        .trim()
        .parse::<u16>()
        .map_err(|_| format!("Invalid width: '{width}'"))?;
    let height = height
        .trim()
        .parse::<u16>()
        .map_err(|_| format!("Invalid height: '{height}'"))?;
    if width == 0 || height == 0 {
        return Err(format!("Invalid size: '{size}'. Dimensions must be non-zero"));
    }
    Ok((width, height))
}
