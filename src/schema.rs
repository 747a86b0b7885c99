//! Schema registry used to answer autocomplete queries.
//!
//! A registry maps table names to their ordered column lists. It is built once
//! and never mutated afterwards.

use crate::error::{FormulaError, Result};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::OnceLock;

/// A table known to the autocompleter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaTable {
    /// Table name.
    pub name: String,

    /// Column names in display order.
    pub columns: Vec<String>,
}

impl SchemaTable {
    /// Creates a table from a name and its columns.
    pub fn new<I, S>(name: impl Into<String>, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            name: name.into(),
            columns: columns.into_iter().map(Into::into).collect(),
        }
    }
}

/// Immutable mapping from table name to [`SchemaTable`].
#[derive(Debug, Clone, Default)]
pub struct SchemaRegistry {
    tables: Vec<SchemaTable>,
    index: HashMap<String, usize>,
}

impl SchemaRegistry {
    /// Builds a registry, rejecting duplicate table names.
    pub fn from_tables(tables: Vec<SchemaTable>) -> Result<Self> {
        let mut index = HashMap::with_capacity(tables.len());
        for (position, table) in tables.iter().enumerate() {
            if index.insert(table.name.clone(), position).is_some() {
                return Err(FormulaError::config(format!(
                    "Duplicate table '{}' in schema",
                    table.name
                )));
            }
        }
        Ok(Self { tables, index })
    }

    /// Returns the registry shipped with the editor.
    pub fn builtin() -> &'static SchemaRegistry {
        static BUILTIN: OnceLock<SchemaRegistry> = OnceLock::new();
        BUILTIN.get_or_init(|| Self {
            index: builtin_tables()
                .iter()
                .enumerate()
                .map(|(i, t)| (t.name.clone(), i))
                .collect(),
            tables: builtin_tables(),
        })
    }

    /// Returns the columns of `table`, or an empty slice when it is unknown.
    pub fn lookup(&self, table: &str) -> &[String] {
        self.index
            .get(table)
            .map(|&i| self.tables[i].columns.as_slice())
            .unwrap_or(&[])
    }

    /// Returns true if the registry knows `table`.
    pub fn contains(&self, table: &str) -> bool {
        self.index.contains_key(table)
    }

    /// Table names in registration order.
    pub fn table_names(&self) -> impl Iterator<Item = &str> {
        self.tables.iter().map(|t| t.name.as_str())
    }

    /// All tables in registration order.
    pub fn tables(&self) -> &[SchemaTable] {
        &self.tables
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// Serializes the registry into the `tables` hint option shape.
    pub fn hint_tables(&self) -> BTreeMap<String, Vec<String>> {
        self.tables
            .iter()
            .map(|t| (t.name.clone(), t.columns.clone()))
            .collect()
    }

    /// Formats the registry for `--print-schema`.
    pub fn format_for_display(&self) -> String {
        self.tables
            .iter()
            .map(|t| format!("{} ({})\n", t.name, t.columns.join(", ")))
            .collect()
    }
}

fn builtin_tables() -> Vec<SchemaTable> {
    vec![
        SchemaTable::new("users", ["name", "score", "birthDate"]),
        SchemaTable::new("countries", ["name", "population", "size"]),
        SchemaTable::new("score", ["zooao"]),
    ]
}
