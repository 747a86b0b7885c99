//! Integration tests for sqlformula.
//!
//! The binding and component suites drive the library against a recording
//! editor factory. The tui suite runs the binary in headless mode.
//!
//! Run with: `cargo test --test integration_tests`

mod binding;
mod common;
mod component;
mod tui;
