//! Names that carry their bound value and store address.

use std::cell::OnceCell;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use sable_code::{Code, Name};

use crate::{ScopeError, ScopeResult, Value};

/// Address of a value inside the flat store: `store.{property}[{item_index}]`.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ScopePath {
    pub property: String,
    pub item_index: usize,
}

impl ScopePath {
    /// Member access suffix, e.g. `.pattern[1]`.
    pub fn to_code(&self) -> Code {
        Code::raw(format!(".{}[{}]", self.property, self.item_index))
    }
}

#[derive(Debug)]
struct Binding {
    value: Value,
    path: ScopePath,
}

#[derive(Debug)]
struct ValueScopeNameData {
    name: Name,
    prefix: String,
    binding: OnceCell<Binding>,
}

/// Name allocated by a [`ValueStore`](crate::ValueStore).
///
/// Handles are compared by identity: clones of one handle are equal, two
/// separately allocated handles are not, whatever their text. A handle is
/// bound at most once, so its value and scope path never change after
/// registration.
#[derive(Clone)]
pub struct ValueScopeName(Rc<ValueScopeNameData>);

impl ValueScopeName {
    pub(crate) fn new(prefix: &str, text: String) -> Self {
        ValueScopeName(Rc::new(ValueScopeNameData {
            name: Name::new(text),
            prefix: prefix.to_owned(),
            binding: OnceCell::new(),
        }))
    }

    /// The plain identifier.
    pub fn name(&self) -> &Name {
        &self.0.name
    }

    /// Prefix the name was allocated under.
    pub fn prefix(&self) -> &str {
        &self.0.prefix
    }

    /// Bound value, if registered.
    pub fn value(&self) -> Option<&Value> {
        self.0.binding.get().map(|b| &b.value)
    }

    /// Store address, if registered.
    pub fn scope_path(&self) -> Option<&ScopePath> {
        self.0.binding.get().map(|b| &b.path)
    }

    pub(crate) fn set_value(&self, value: Value, path: ScopePath) -> ScopeResult<()> {
        self.0
            .binding
            .set(Binding { value, path })
            .map_err(|_| ScopeError::AlreadyBound {
                name: self.to_string(),
            })
    }

    /// Returns `true` if both handles are the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &ValueScopeName) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl PartialEq for ValueScopeName {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ValueScopeName {}

impl Hash for ValueScopeName {
    fn hash<H: Hasher>(&self, state: &mut H) {
        Rc::as_ptr(&self.0).hash(state);
    }
}

impl fmt::Display for ValueScopeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0.name, f)
    }
}

impl fmt::Debug for ValueScopeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValueScopeName")
            .field("name", &self.0.name.as_str())
            .field("scope_path", &self.scope_path())
            .finish()
    }
}

impl From<&ValueScopeName> for Name {
    fn from(name: &ValueScopeName) -> Self {
        name.0.name.clone()
    }
}

impl From<ValueScopeName> for Name {
    fn from(name: ValueScopeName) -> Self {
        name.0.name.clone()
    }
}

impl From<&ValueScopeName> for Code {
    fn from(name: &ValueScopeName) -> Self {
        Code::from(name.name().clone())
    }
}
