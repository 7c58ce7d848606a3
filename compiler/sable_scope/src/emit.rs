//! Declaration emission for bound scope values.
//!
//! [`DeclarationEmitter`] turns a selection of bound names into one block
//! of declarations. Prefixes are visited in encounter order and names in
//! insertion order, so a value's generation code only ever sees names that
//! were declared before it.
//!
//! # Re-emission guard
//!
//! Each name is marked [`UsedValueState::Started`] in a
//! [`UsedScopeValues`] tracker before its fragment is produced, and
//! [`UsedValueState::Completed`] after. Names already present in the
//! tracker are skipped. Sharing one tracker across several calls therefore
//! never declares a value twice, and a fallback supplier that recursively
//! emits the dependencies of a value cannot re-enter the value itself.

use rustc_hash::FxHashMap;
use sable_code::{Code, Name};

use crate::{
    CodeOptions, ImportParams, ScopeError, ScopeResult, ScopeValueSets, ValueKind, ValueScopeName,
};

/// Emission state of one name.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum UsedValueState {
    Started,
    Completed,
}

/// Per-prefix emission states, shared across emission calls.
///
/// States only move forward: absent, `Started`, `Completed`.
#[derive(Debug, Default)]
pub struct UsedScopeValues(FxHashMap<String, FxHashMap<ValueScopeName, UsedValueState>>);

impl UsedScopeValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self, name: &ValueScopeName) -> Option<UsedValueState> {
        self.0.get(name.prefix())?.get(name).copied()
    }

    /// Number of tracked names.
    pub fn len(&self) -> usize {
        self.0.values().map(FxHashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn start(&mut self, name: &ValueScopeName) {
        self.0
            .entry(name.prefix().to_owned())
            .or_default()
            .entry(name.clone())
            .or_insert(UsedValueState::Started);
    }

    fn complete(&mut self, name: &ValueScopeName) {
        if let Some(state) = self
            .0
            .get_mut(name.prefix())
            .and_then(|names| names.get_mut(name))
        {
            *state = UsedValueState::Completed;
        }
    }
}

/// Supplies code for inline values that carry none.
///
/// The supplied code is spliced verbatim, without a declaration wrapper,
/// so it may hold several statements (e.g. a function and its helpers).
/// The tracker is handed through so the supplier can emit dependencies of
/// the value with the same re-emission guard.
pub type CodeFallback<'f> =
    dyn FnMut(&ValueScopeName, &mut UsedScopeValues) -> ScopeResult<Option<Code>> + 'f;

/// What a name's declaration is built from.
enum ValueCode {
    Import(ImportParams),
    Code(Code),
    Missing,
}

/// Builds declaration blocks from bound names.
#[derive(Copy, Clone, Debug)]
pub struct DeclarationEmitter {
    options: CodeOptions,
}

impl DeclarationEmitter {
    pub fn new(options: CodeOptions) -> Self {
        Self { options }
    }

    /// Standalone declarations recreating every value in `values`.
    ///
    /// Declaration form per value:
    ///
    /// - import, `esm`: `import {name as n0} from "package.js";`
    /// - import, otherwise: `const n0 = require("package").name;`
    /// - inline with code: `const n0 = <code>;`
    /// - inline without code: whatever `fallback` supplies, verbatim
    ///
    /// Fails on the first value that has none of these, naming it.
    pub fn declarations(
        &self,
        values: &ScopeValueSets,
        used: &mut UsedScopeValues,
        fallback: Option<&mut CodeFallback<'_>>,
    ) -> ScopeResult<Code> {
        self.reduce(
            values,
            |name| {
                let value = name.value().ok_or_else(|| ScopeError::Unregistered {
                    name: name.to_string(),
                })?;
                Ok(match value.kind() {
                    ValueKind::Import(params) if params.is_usable() => {
                        ValueCode::Import(params.clone())
                    }
                    ValueKind::Inline { code: Some(code) } => ValueCode::Code(code.clone()),
                    ValueKind::Import(_) | ValueKind::Inline { code: None } => ValueCode::Missing,
                })
            },
            used,
            fallback,
        )
    }

    /// Declarations binding every name to its slot in the store named
    /// `scope_name`: `const n0 = scope.prefix[index];`.
    pub fn store_refs(&self, scope_name: &Name, values: &ScopeValueSets) -> ScopeResult<Code> {
        self.reduce(
            values,
            |name| {
                let path = name.scope_path().ok_or_else(|| ScopeError::Unregistered {
                    name: name.to_string(),
                })?;
                let mut code = Code::from(scope_name.clone());
                code.push_code(&path.to_code());
                Ok(ValueCode::Code(code))
            },
            &mut UsedScopeValues::new(),
            None,
        )
    }

    fn reduce(
        &self,
        values: &ScopeValueSets,
        value_code: impl Fn(&ValueScopeName) -> ScopeResult<ValueCode>,
        used: &mut UsedScopeValues,
        mut fallback: Option<&mut CodeFallback<'_>>,
    ) -> ScopeResult<Code> {
        let kind = self.options.var_kind().as_str();
        let separator = self.options.separator();
        let mut code = Code::new();
        let mut emitted = 0_usize;
        tracing::trace!(names = values.len(), "emitting scope declarations");

        for (prefix, names) in values.iter() {
            for name in names {
                if let Some(state) = used.state(name) {
                    tracing::trace!(prefix, name = %name, ?state, "skipping used value");
                    continue;
                }
                used.start(name);

                match value_code(name)? {
                    ValueCode::Import(params) => self.import(&mut code, name, &params),
                    ValueCode::Code(value) => {
                        code.push_raw(format!("{kind} "))
                            .push_name(name.name())
                            .push_raw(" = ")
                            .push_code(&value)
                            .push_raw(";");
                    }
                    ValueCode::Missing => {
                        let supplied = match fallback.as_deref_mut() {
                            Some(supply) => supply(name, used)?,
                            None => None,
                        };
                        let Some(supplied) = supplied else {
                            return Err(no_code(name));
                        };
                        code.push_code(&supplied);
                    }
                }
                code.push_code(&separator);

                used.complete(name);
                emitted += 1;
            }
        }

        tracing::debug!(declarations = emitted, "emitted scope declarations");
        Ok(code)
    }

    fn import(&self, code: &mut Code, name: &ValueScopeName, params: &ImportParams) {
        if self.options.esm {
            code.push_raw(format!("import {{{} as ", params.name))
                .push_name(name.name())
                .push_raw("} from ")
                .push_str_literal(&format!("{}.js", params.package))
                .push_raw(";");
        } else {
            code.push_raw(format!("{} ", self.options.var_kind().as_str()))
                .push_name(name.name())
                .push_raw(" = require(")
                .push_str_literal(&params.package)
                .push_raw(format!(").{};", params.name));
        }
    }
}

fn no_code(name: &ValueScopeName) -> ScopeError {
    match name.value() {
        Some(value) => ScopeError::NoCode {
            name: name.to_string(),
            value: Box::new(value.clone()),
        },
        None => ScopeError::Unregistered {
            name: name.to_string(),
        },
    }
}

// Tests

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "tests use unwrap for concise assertions")]
mod tests;
