//! sqlformula - a terminal SQL editor with schema-aware autocompletion.
//!
//! The [`component::SqlEditor`] host embeds an editor instance through
//! [`binding::EditorBinding`], which configures it for SQL and wires hints
//! from a [`schema::SchemaRegistry`] via [`provider::HintProvider`].

pub mod binding;
pub mod cli;
pub mod component;
pub mod config;
pub mod editor;
pub mod error;
pub mod logging;
pub mod provider;
pub mod schema;
pub mod tui;
