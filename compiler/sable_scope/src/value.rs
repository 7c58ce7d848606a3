//! Values bound to generated names.
//!
//! A [`Value`] pairs a runtime reference (what the compiled closure reads
//! from the flat store) with what standalone output needs to recreate it:
//! either inline generation code or an import descriptor. The shape is
//! chosen at construction and never inspected structurally afterwards.

use std::any::Any;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::rc::Rc;

use sable_code::Code;

/// Type-erased runtime value.
///
/// Equality and hashing use pointer identity: two structurally equal
/// values allocated separately are different references.
#[derive(Clone)]
pub struct ValueRef(Rc<dyn Any>);

impl ValueRef {
    /// Wrap a runtime value.
    pub fn new<T: Any>(value: T) -> Self {
        ValueRef(Rc::new(value))
    }

    /// Share an already reference-counted value.
    pub fn from_rc(value: Rc<dyn Any>) -> Self {
        ValueRef(value)
    }

    /// Typed read access.
    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.downcast_ref::<T>()
    }

    /// Returns `true` if both handles point at the same allocation.
    #[inline]
    pub fn ptr_eq(&self, other: &ValueRef) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    fn addr(&self) -> *const () {
        Rc::as_ptr(&self.0).cast::<()>()
    }
}

impl PartialEq for ValueRef {
    fn eq(&self, other: &Self) -> bool {
        self.ptr_eq(other)
    }
}

impl Eq for ValueRef {}

impl Hash for ValueRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for ValueRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ValueRef({:p})", self.addr())
    }
}

/// Deduplication key.
///
/// Text keys compare by content, reference keys by identity.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum ValueKey {
    Text(Rc<str>),
    Ref(ValueRef),
}

impl From<&str> for ValueKey {
    fn from(text: &str) -> Self {
        ValueKey::Text(text.into())
    }
}

impl From<String> for ValueKey {
    fn from(text: String) -> Self {
        ValueKey::Text(text.into())
    }
}

impl From<ValueRef> for ValueKey {
    fn from(reference: ValueRef) -> Self {
        ValueKey::Ref(reference)
    }
}

impl From<&ValueRef> for ValueKey {
    fn from(reference: &ValueRef) -> Self {
        ValueKey::Ref(reference.clone())
    }
}

/// External module import descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ImportParams {
    /// Module path, without file extension.
    pub package: String,
    /// Exported binding to import.
    pub name: String,
}

impl ImportParams {
    pub fn new(package: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            name: name.into(),
        }
    }

    /// An import needs both a package and an exported name.
    pub fn is_usable(&self) -> bool {
        !self.package.is_empty() && !self.name.is_empty()
    }
}

/// How standalone output recreates a value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// Declared from generation code. Values without code rely on the
    /// emitter's fallback supplier.
    Inline { code: Option<Code> },
    /// Imported from an external module.
    Import(ImportParams),
}

/// A runtime value registered under a prefix.
#[derive(Clone, Debug)]
pub struct Value {
    reference: Option<ValueRef>,
    key: Option<ValueKey>,
    kind: ValueKind,
}

impl Value {
    /// Inline value without generation code.
    pub fn inline(reference: impl Into<Option<ValueRef>>) -> Self {
        Self {
            reference: reference.into(),
            key: None,
            kind: ValueKind::Inline { code: None },
        }
    }

    /// Import value.
    pub fn import(reference: impl Into<Option<ValueRef>>, params: ImportParams) -> Self {
        Self {
            reference: reference.into(),
            key: None,
            kind: ValueKind::Import(params),
        }
    }

    /// Set an explicit deduplication key.
    #[must_use]
    pub fn with_key(mut self, key: impl Into<ValueKey>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Set the generation code of an inline value.
    ///
    /// Import values keep their import form; the code is ignored.
    #[must_use]
    pub fn with_code(mut self, code: impl Into<Code>) -> Self {
        if let ValueKind::Inline { code: slot } = &mut self.kind {
            *slot = Some(code.into());
        }
        self
    }

    pub fn reference(&self) -> Option<&ValueRef> {
        self.reference.as_ref()
    }

    pub fn key(&self) -> Option<&ValueKey> {
        self.key.as_ref()
    }

    pub fn kind(&self) -> &ValueKind {
        &self.kind
    }

    /// Deduplication key: the explicit key, else the reference identity.
    pub fn dedup_key(&self) -> Option<ValueKey> {
        self.key
            .clone()
            .or_else(|| self.reference.as_ref().map(ValueKey::from))
    }
}
