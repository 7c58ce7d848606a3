//! Construction-time configuration.

use sable_code::Code;

/// Variable declaration keyword.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum VarKind {
    Const,
    Let,
    Var,
}

impl VarKind {
    /// Keyword text.
    pub const fn as_str(self) -> &'static str {
        match self {
            VarKind::Const => "const",
            VarKind::Let => "let",
            VarKind::Var => "var",
        }
    }
}

/// Output conventions for emitted declarations.
///
/// # Fields
///
/// * `es5`: declare with `var` instead of `const`.
/// * `esm`: emit `import` statements instead of `require` calls.
/// * `lines`: terminate every declaration with a newline.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CodeOptions {
    pub es5: bool,
    pub esm: bool,
    pub lines: bool,
}

impl CodeOptions {
    /// Set the legacy declaration keyword flag.
    #[must_use]
    pub fn es5(mut self, es5: bool) -> Self {
        self.es5 = es5;
        self
    }

    /// Set the module-style import flag.
    #[must_use]
    pub fn esm(mut self, esm: bool) -> Self {
        self.esm = esm;
        self
    }

    /// Set the newline separator flag.
    #[must_use]
    pub fn lines(mut self, lines: bool) -> Self {
        self.lines = lines;
        self
    }

    /// Keyword used for inline and require-style declarations.
    pub fn var_kind(&self) -> VarKind {
        if self.es5 {
            VarKind::Var
        } else {
            VarKind::Const
        }
    }

    /// Separator appended after each declaration.
    pub fn separator(&self) -> Code {
        if self.lines {
            Code::raw("\n")
        } else {
            Code::new()
        }
    }
}
