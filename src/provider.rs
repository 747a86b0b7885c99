//! Hint source handed to the editor.
//!
//! Candidates come from the built-in SQL completer fed with the schema
//! registry. The `custom` helper is registered once per process and only
//! answers when the completer has nothing to offer.

use crate::editor::sql_hint::{sql_hint, HintTables};
use crate::editor::{
    helper, hint::filter_candidates, mode::SqlMode, register_helper, CursorContext, HelperKind,
    HintResult, HintSource,
};
use crate::schema::SchemaRegistry;
use std::sync::{Arc, Once};
use tracing::trace;

/// Name of the supplementary hint helper.
pub const CUSTOM_HELPER: &str = "custom";

/// Fixed candidates offered by the `custom` helper.
pub const CUSTOM_HINTS: [&str; 2] = ["custom-hint", "abc"];

/// Registers the `custom` hint helper. Only the first call has an effect;
/// the registration is shared by every editor in the process.
pub fn register_custom_hints() {
    static REGISTER: Once = Once::new();
    REGISTER.call_once(|| {
        register_helper(
            HelperKind::Hint,
            CUSTOM_HELPER,
            Arc::new(|ctx: &CursorContext| {
                HintResult::for_word(ctx, filter_candidates(&ctx.word, CUSTOM_HINTS))
            }),
        );
    });
}

/// Schema-backed hint source.
#[derive(Debug, Clone)]
pub struct HintProvider {
    tables: HintTables,
    mode: SqlMode,
}

impl HintProvider {
    pub fn new(registry: &SchemaRegistry, mode: SqlMode) -> Self {
        register_custom_hints();
        Self {
            tables: registry.hint_tables(),
            mode,
        }
    }

    /// Table mapping passed to the completer.
    pub fn tables(&self) -> &HintTables {
        &self.tables
    }

    pub fn mode(&self) -> &SqlMode {
        &self.mode
    }

    /// Computes candidates for `ctx`, falling back to the `custom` helper
    /// when the SQL completer yields nothing.
    pub fn provide_hints(&self, ctx: &CursorContext) -> HintResult {
        let primary = sql_hint(ctx, &self.tables, &self.mode);
        if !primary.is_empty() {
            trace!(word = %ctx.word, count = primary.len(), "sql hints");
            return primary;
        }
        self.provide_named(CUSTOM_HELPER, ctx)
    }

    /// Asks a registered helper directly. Unknown names yield an empty result.
    pub fn provide_named(&self, name: &str, ctx: &CursorContext) -> HintResult {
        match helper(HelperKind::Hint, name) {
            Some(helper) => helper(ctx),
            None => HintResult::empty(ctx),
        }
    }
}

impl HintSource for HintProvider {
    fn hints(&self, ctx: &CursorContext) -> HintResult {
        self.provide_hints(ctx)
    }
}
