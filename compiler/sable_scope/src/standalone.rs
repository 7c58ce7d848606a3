//! Standalone module assembly.
//!
//! Wraps the declarations of one or more exported entry points in a module
//! that runs without the compiler's runtime closure. All entry points share
//! one [`UsedScopeValues`] tracker, so a value referenced from several of
//! them is declared once.
//!
//! Layout (require-style, named exports):
//!
//! ```text
//! "use strict";
//! exports.user = validate0;
//! <declarations of validate0 and its dependencies>
//! exports.info = validate1;
//! <declarations not emitted yet>
//! ```

use sable_code::Code;

use crate::emit::{CodeFallback, UsedScopeValues};
use crate::{ScopeError, ScopeResult, ScopeValueSets, ValueScopeName, ValueStore};

/// Builder of a standalone module over one [`ValueStore`].
#[derive(Debug)]
pub struct StandaloneModule<'s> {
    store: &'s ValueStore,
    default: Option<ValueScopeName>,
    named: Vec<(String, ValueScopeName)>,
}

impl<'s> StandaloneModule<'s> {
    pub fn new(store: &'s ValueStore) -> Self {
        Self {
            store,
            default: None,
            named: Vec::new(),
        }
    }

    /// Export `name` as the module's default export.
    #[must_use]
    pub fn default_export(mut self, name: ValueScopeName) -> Self {
        self.default = Some(name);
        self
    }

    /// Export `name` under `export_name`.
    #[must_use]
    pub fn export(mut self, export_name: impl Into<String>, name: ValueScopeName) -> Self {
        self.named.push((export_name.into(), name));
        self
    }

    /// Render the module.
    ///
    /// Entry points are emitted through [`ValueStore::scope_code`];
    /// `fallback` supplies the code of values that carry none (typically
    /// the entry functions themselves).
    ///
    /// A module has either one default export or named exports, never both.
    pub fn render(&self, mut fallback: Option<&mut CodeFallback<'_>>) -> ScopeResult<Code> {
        let options = self.store.options();
        let n = options.separator();
        let mut used = UsedScopeValues::new();
        let mut code = Code::raw("\"use strict\";");
        code.push_code(&n);

        match (&self.default, self.named.is_empty()) {
            (None, true) => return Err(ScopeError::NoExports),
            (Some(_), false) => return Err(ScopeError::MixedExports),
            (Some(entry), true) => {
                if options.esm {
                    code.push_raw("export const validate = ")
                        .push_name(entry.name())
                        .push_raw(";")
                        .push_code(&n)
                        .push_raw("export default ")
                        .push_name(entry.name())
                        .push_raw(";");
                } else {
                    code.push_raw("module.exports = ")
                        .push_name(entry.name())
                        .push_raw(";")
                        .push_code(&n)
                        .push_raw("module.exports.default = ")
                        .push_name(entry.name())
                        .push_raw(";");
                }
                code.push_code(&n);
                let body = self.entry_code(entry, &mut used, fallback.as_deref_mut())?;
                code.push_code(&body);
            }
            (None, false) => {}
        }

        // Each body ends with the separator, so the next export starts a line.
        for (export_name, entry) in &self.named {
            if !is_identifier(export_name) {
                return Err(ScopeError::InvalidExportName {
                    name: export_name.clone(),
                });
            }
            if options.esm {
                code.push_raw(format!("export const {export_name}"));
            } else {
                code.push_raw(format!("exports.{export_name}"));
            }
            code.push_raw(" = ")
                .push_name(entry.name())
                .push_raw(";")
                .push_code(&n);
            let body = self.entry_code(entry, &mut used, fallback.as_deref_mut())?;
            code.push_code(&body);
        }

        tracing::debug!(
            default = self.default.is_some(),
            named = self.named.len(),
            "rendered standalone module"
        );
        Ok(code)
    }

    fn entry_code(
        &self,
        entry: &ValueScopeName,
        used: &mut UsedScopeValues,
        fallback: Option<&mut CodeFallback<'_>>,
    ) -> ScopeResult<Code> {
        let subset: ScopeValueSets = [entry.clone()].into_iter().collect();
        self.store.scope_code(Some(&subset), Some(used), fallback)
    }
}

/// `[A-Za-z_$][A-Za-z0-9_$]*`
fn is_identifier(s: &str) -> bool {
    let mut chars = s.chars();
    chars
        .next()
        .is_some_and(|c| c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

// Tests
