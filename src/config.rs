//! Configuration management for sqlformula.
//!
//! Loads editor options and an optional schema from a TOML file. Command-line
//! flags are applied on top of the file with [`Config::apply_overrides`].

use crate::error::{FormulaError, Result};
use crate::schema::{SchemaRegistry, SchemaTable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct Config {
    /// Options forwarded to the editor at construction.
    #[serde(default)]
    pub editor: EditorConfig,

    /// Table name to column names. The built-in registry is used when absent.
    #[serde(default)]
    pub schema: Option<BTreeMap<String, Vec<String>>>,
}

/// Editor options as written in the `[editor]` table.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct EditorConfig {
    /// SQL mode MIME name.
    pub mode: String,

    /// Palette name.
    pub theme: String,

    pub indent_with_tabs: bool,
    pub indent_unit: usize,
    pub tab_size: usize,
    pub smart_indent: bool,
    pub match_brackets: bool,
    pub line_wrapping: bool,
    pub autofocus: bool,

    /// Key name to command name, e.g. `Tab = "autocomplete"`.
    pub extra_keys: BTreeMap<String, String>,

    pub hint: HintConfig,
}

impl Default for EditorConfig {
    fn default() -> Self {
        let mut extra_keys = BTreeMap::new();
        extra_keys.insert("Tab".to_string(), "autocomplete".to_string());
        Self {
            mode: "text/x-mysql".to_string(),
            theme: "cobalt".to_string(),
            indent_with_tabs: true,
            indent_unit: 2,
            tab_size: 4,
            smart_indent: true,
            match_brackets: true,
            line_wrapping: true,
            autofocus: true,
            extra_keys,
            hint: HintConfig::default(),
        }
    }
}

/// The `[editor.hint]` table.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct HintConfig {
    /// Accepted for compatibility; the editor binding always disables it.
    pub complete_single: bool,
}

/// Values supplied on the command line, each overriding the file.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub mode: Option<String>,
    pub theme: Option<String>,
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("sqlformula")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| FormulaError::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        toml::from_str(content).map_err(|e| {
            FormulaError::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })
    }

    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(mode) = &overrides.mode {
            self.editor.mode = mode.clone();
        }
        if let Some(theme) = &overrides.theme {
            self.editor.theme = theme.clone();
        }
    }

    /// Builds the schema registry: the `[schema]` table if present, else the
    /// built-in one.
    pub fn registry(&self) -> Result<SchemaRegistry> {
        match &self.schema {
            Some(schema) => SchemaRegistry::from_tables(
                schema
                    .iter()
                    .map(|(name, columns)| SchemaTable::new(name.as_str(), columns.iter().cloned()))
                    .collect(),
            ),
            None => Ok(SchemaRegistry::builtin().clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.editor.mode, "text/x-mysql");
        assert_eq!(config.editor.theme, "cobalt");
        assert!(config.editor.indent_with_tabs);
        assert!(config.editor.match_brackets);
        assert!(config.editor.line_wrapping);
        assert!(config.editor.autofocus);
        assert_eq!(
            config.editor.extra_keys.get("Tab").map(String::as_str),
            Some("autocomplete")
        );
        assert!(!config.editor.hint.complete_single);
        assert!(config.schema.is_none());
    }

    #[test]
    fn test_parse_valid_config() {
        let toml = r#"
[editor]
mode = "text/x-pgsql"
theme = "blackboard"
indent_with_tabs = false
indent_unit = 4

[editor.extra_keys]
"Ctrl-Space" = "autocomplete"

[editor.hint]
complete_single = true

[schema]
orders = ["id", "total"]
"#;
        let config: Config = toml::from_str(toml).unwrap();

        assert_eq!(config.editor.mode, "text/x-pgsql");
        assert_eq!(config.editor.theme, "blackboard");
        assert!(!config.editor.indent_with_tabs);
        assert_eq!(config.editor.indent_unit, 4);
        assert!(config.editor.smart_indent);
        assert_eq!(config.editor.extra_keys.len(), 1);
        assert!(config.editor.hint.complete_single);

        let registry = config.registry().unwrap();
        assert_eq!(registry.lookup("orders"), ["id", "total"]);
        assert!(registry.lookup("users").is_empty());
    }

    #[test]
    fn test_missing_schema_uses_builtin() {
        let registry = Config::default().registry().unwrap();
        assert_eq!(registry.lookup("users"), ["name", "score", "birthDate"]);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let mut config: Config = toml::from_str("[editor]\ntheme = \"default\"\n").unwrap();
        config.apply_overrides(&Overrides {
            mode: Some("text/x-sqlite".to_string()),
            theme: None,
        });
        assert_eq!(config.editor.mode, "text/x-sqlite");
        assert_eq!(config.editor.theme, "default");
    }

    #[test]
    fn test_load_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load_from_file(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_load_invalid_file_reports_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[editor]\nindent_unit = \"wide\"").unwrap();
        let err = Config::load_from_file(file.path()).unwrap_err();
        assert_eq!(err.category(), "Configuration Error");
        assert!(err.to_string().contains("Configuration error in"));
    }

    #[test]
    fn test_default_path_ends_with_config_toml() {
        let path = Config::default_path();
        assert!(path.ends_with("sqlformula/config.toml"));
    }
}
