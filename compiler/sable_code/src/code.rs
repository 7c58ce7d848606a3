//! Concatenable code fragments.

use std::fmt;

use crate::Name;

/// One piece of a [`Code`] fragment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CodeItem {
    /// Trusted source text, emitted verbatim.
    Raw(String),
    /// An identifier handle.
    Name(Name),
}

/// Ordered fragment of generated code.
///
/// The empty fragment is the neutral element of concatenation. Adjacent
/// raw text is merged on push, so a fragment built from many small pieces
/// stays compact.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct Code {
    items: Vec<CodeItem>,
}

impl Code {
    /// Create an empty fragment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a fragment from trusted source text.
    pub fn raw(text: impl Into<String>) -> Self {
        let mut code = Self::new();
        code.push_raw(text);
        code
    }

    /// Append trusted source text.
    pub fn push_raw(&mut self, text: impl Into<String>) -> &mut Self {
        let text = text.into();
        if text.is_empty() {
            return self;
        }
        if let Some(CodeItem::Raw(last)) = self.items.last_mut() {
            last.push_str(&text);
        } else {
            self.items.push(CodeItem::Raw(text));
        }
        self
    }

    /// Append an identifier.
    pub fn push_name(&mut self, name: &Name) -> &mut Self {
        self.items.push(CodeItem::Name(name.clone()));
        self
    }

    /// Append another fragment.
    pub fn push_code(&mut self, code: &Code) -> &mut Self {
        for item in &code.items {
            match item {
                CodeItem::Raw(text) => {
                    self.push_raw(text.as_str());
                }
                CodeItem::Name(name) => {
                    self.push_name(name);
                }
            }
        }
        self
    }

    /// Append `s` as a double-quoted string literal.
    ///
    /// Uses JSON escaping, and additionally escapes U+2028 and U+2029,
    /// which JSON permits raw but older script grammars treat as line
    /// terminators.
    pub fn push_str_literal(&mut self, s: &str) -> &mut Self {
        let quoted = serde_json::Value::String(s.to_owned())
            .to_string()
            .replace('\u{2028}', "\\u2028")
            .replace('\u{2029}', "\\u2029");
        self.push_raw(quoted)
    }

    /// Returns `true` if nothing has been appended.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Items in order.
    pub fn items(&self) -> &[CodeItem] {
        &self.items
    }

    /// Names embedded in this fragment, in order of appearance.
    pub fn names(&self) -> impl Iterator<Item = &Name> + '_ {
        self.items.iter().filter_map(|item| match item {
            CodeItem::Name(name) => Some(name),
            CodeItem::Raw(_) => None,
        })
    }
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in &self.items {
            match item {
                CodeItem::Raw(text) => f.write_str(text)?,
                CodeItem::Name(name) => write!(f, "{name}")?,
            }
        }
        Ok(())
    }
}

impl fmt::Debug for Code {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Code({:?})", self.to_string())
    }
}

impl From<Name> for Code {
    fn from(name: Name) -> Self {
        Code {
            items: vec![CodeItem::Name(name)],
        }
    }
}

impl From<&str> for Code {
    fn from(text: &str) -> Self {
        Code::raw(text)
    }
}

impl From<String> for Code {
    fn from(text: String) -> Self {
        Code::raw(text)
    }
}

// Tests

#[cfg(test)]
mod tests;
