//! Error types for sqlformula.
//!
//! Defines the main error enum used throughout the application.

use thiserror::Error;

/// Main error type for sqlformula operations.
#[derive(Error, Debug)]
pub enum FormulaError {
    /// Configuration errors (invalid config file, duplicate schema tables, etc.)
    #[error("Configuration error: {0}")]
    Config(String),

    /// The editor widget refused its creation options (unknown mode, theme, key or command).
    #[error("Editor construction failed: {0}")]
    Construction(String),

    /// Terminal setup, drawing or event polling failures.
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// Headless event script errors (bad syntax, unreadable file).
    #[error("Script error: {0}")]
    Script(String),

    /// Internal application errors (unexpected states, bugs, etc.)
    #[error("Internal error: {0}")]
    Internal(String),
}

impl FormulaError {
    /// Creates a configuration error with the given message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Creates an editor construction error with the given message.
    pub fn construction(msg: impl Into<String>) -> Self {
        Self::Construction(msg.into())
    }

    /// Creates a terminal error with the given message.
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }

    /// Creates a script error with the given message.
    pub fn script(msg: impl Into<String>) -> Self {
        Self::Script(msg.into())
    }

    /// Creates an internal error with the given message.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Returns the error category as a string for display purposes.
    pub fn category(&self) -> &'static str {
        match self {
            Self::Config(_) => "Configuration Error",
            Self::Construction(_) => "Construction Error",
            Self::Terminal(_) => "Terminal Error",
            Self::Script(_) => "Script Error",
            Self::Internal(_) => "Internal Error",
        }
    }
}

/// Result type alias using FormulaError.
pub type Result<T> = std::result::Result<T, FormulaError>;
