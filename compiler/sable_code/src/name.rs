//! Identifier handles for generated code.

use std::fmt;
use std::rc::Rc;

/// Identifier embedded in generated code.
///
/// Cheap to clone: the text is shared. Two names compare equal when their
/// text is equal; uniqueness of the text is the job of whoever allocates
/// the name.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Name(Rc<str>);

impl Name {
    /// Create a name from identifier text.
    pub fn new(text: impl Into<Rc<str>>) -> Self {
        Name(text.into())
    }

    /// Identifier text.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Name {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Name({})", self.0)
    }
}

impl From<&str> for Name {
    fn from(text: &str) -> Self {
        Name::new(text)
    }
}

impl AsRef<str> for Name {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
