//! Runtime helpers generated validators may depend on.
//!
//! Helpers are registered like any other value; in standalone output they
//! become imports of the helper module.

use sable_code::Code;

use crate::{ImportParams, Value, ValueRef};

/// A helper shipped in the runtime package.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct RuntimeHelper {
    /// Module path, without file extension.
    pub package: &'static str,
    /// Exported binding.
    pub export: &'static str,
}

/// Deep structural equality of two JSON values.
pub const EQUAL: RuntimeHelper = RuntimeHelper {
    package: "sable/dist/runtime/equal",
    export: "default",
};

/// Every known helper.
pub const HELPERS: &[RuntimeHelper] = &[EQUAL];

impl RuntimeHelper {
    pub fn import_params(&self) -> ImportParams {
        ImportParams::new(self.package, self.export)
    }

    /// Require-style expression loading the helper, e.g.
    /// `require("sable/dist/runtime/equal").default`.
    pub fn code(&self) -> Code {
        let mut code = Code::raw("require(");
        code.push_str_literal(self.package)
            .push_raw(format!(").{}", self.export));
        code
    }

    /// Import value for registering this helper.
    ///
    /// Keyed by package, so registering the helper again under the same
    /// prefix yields the same name even with a different `reference`.
    pub fn value(&self, reference: ValueRef) -> Value {
        Value::import(reference, self.import_params()).with_key(self.package)
    }

    /// Look up a helper by package path.
    pub fn find(package: &str) -> Option<RuntimeHelper> {
        HELPERS.iter().copied().find(|h| h.package == package)
    }
}
