//! Value binding and the flat runtime store.
//!
//! A [`ValueStore`] allocates [`ValueScopeName`]s and binds them to
//! [`Value`]s. Every first registration of a value appends its runtime
//! reference to a [`ScopeStore`], the flat `prefix -> [reference]` table a
//! compiled closure reads from. Repeated registrations of the same value
//! (same prefix and dedup key) return the existing name and leave the store
//! untouched.
//!
//! # Output modes
//!
//! - **Closure**: [`ValueStore::scope_refs`] binds every name to its store
//!   slot, e.g. `const pattern0 = scope.pattern[0];`.
//! - **Standalone**: [`ValueStore::scope_code`] recreates every value from
//!   its generation code or import, see [`DeclarationEmitter`].

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxBuildHasher;
use sable_code::{Code, Name};

use crate::emit::{CodeFallback, DeclarationEmitter, UsedScopeValues};
use crate::{
    CodeOptions, NameAllocator, ScopeError, ScopeOptions, ScopePath, ScopeResult, Value,
    ValueKey, ValueRef, ValueScopeName,
};

pub(crate) type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
pub(crate) type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// Flat table of runtime references, addressed by `(prefix, index)`.
///
/// Cloning yields another handle to the same table, so the compile unit can
/// keep one handle for the closure builder while the [`ValueStore`] appends
/// through its own.
#[derive(Clone, Default)]
pub struct ScopeStore(Rc<RefCell<FxIndexMap<String, Vec<ValueRef>>>>);

impl ScopeStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reference at `store.{prefix}[index]`.
    pub fn get(&self, prefix: &str, index: usize) -> Option<ValueRef> {
        self.0
            .borrow()
            .get(prefix)
            .and_then(|refs| refs.get(index))
            .cloned()
    }

    /// References under `prefix`, in index order.
    pub fn values(&self, prefix: &str) -> Vec<ValueRef> {
        self.0.borrow().get(prefix).cloned().unwrap_or_default()
    }

    /// Number of references under `prefix`.
    pub fn len(&self, prefix: &str) -> usize {
        self.0.borrow().get(prefix).map_or(0, Vec::len)
    }

    /// Prefixes in first-use order.
    pub fn prefixes(&self) -> Vec<String> {
        self.0.borrow().keys().cloned().collect()
    }

    /// Returns `true` if both handles share one table.
    pub fn ptr_eq(&self, other: &ScopeStore) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Append `reference` under `prefix`, returning its index.
    fn push(&self, prefix: &str, reference: ValueRef) -> usize {
        let mut table = self.0.borrow_mut();
        let refs = table.entry(prefix.to_owned()).or_default();
        refs.push(reference);
        refs.len() - 1
    }
}

impl std::fmt::Debug for ScopeStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let table = self.0.borrow();
        f.debug_map()
            .entries(table.iter().map(|(prefix, refs)| (prefix, refs.len())))
            .finish()
    }
}

/// Ordered selection of names, grouped by prefix.
///
/// Prefixes iterate in first-insertion order, names in insertion order.
#[derive(Clone, Debug, Default)]
pub struct ScopeValueSets(FxIndexMap<String, FxIndexSet<ValueScopeName>>);

impl ScopeValueSets {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `name` under its prefix. Returns `false` if already present.
    pub fn insert(&mut self, name: ValueScopeName) -> bool {
        self.0
            .entry(name.prefix().to_owned())
            .or_default()
            .insert(name)
    }

    pub fn contains(&self, name: &ValueScopeName) -> bool {
        self.0
            .get(name.prefix())
            .is_some_and(|names| names.contains(name))
    }

    /// Total number of names.
    pub fn len(&self) -> usize {
        self.0.values().map(IndexSet::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// `(prefix, names)` groups in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, indexmap::set::Iter<'_, ValueScopeName>)> {
        self.0
            .iter()
            .map(|(prefix, names)| (prefix.as_str(), names.iter()))
    }
}

impl FromIterator<ValueScopeName> for ScopeValueSets {
    fn from_iter<I: IntoIterator<Item = ValueScopeName>>(iter: I) -> Self {
        let mut sets = Self::new();
        for name in iter {
            sets.insert(name);
        }
        sets
    }
}

/// Argument of [`ValueStore::value`]: an allocated name or a prefix.
#[derive(Clone, Debug)]
pub enum ValueNameOrPrefix<'a> {
    Name(ValueScopeName),
    Prefix(&'a str),
}

impl From<ValueScopeName> for ValueNameOrPrefix<'_> {
    fn from(name: ValueScopeName) -> Self {
        ValueNameOrPrefix::Name(name)
    }
}

impl From<&ValueScopeName> for ValueNameOrPrefix<'_> {
    fn from(name: &ValueScopeName) -> Self {
        ValueNameOrPrefix::Name(name.clone())
    }
}

impl<'a> From<&'a str> for ValueNameOrPrefix<'a> {
    fn from(prefix: &'a str) -> Self {
        ValueNameOrPrefix::Prefix(prefix)
    }
}

/// Name allocator that binds names to values.
#[derive(Debug)]
pub struct ValueStore {
    allocator: NameAllocator,
    /// prefix -> dedup key -> name, in registration order.
    values: FxIndexMap<String, FxIndexMap<ValueKey, ValueScopeName>>,
    store: ScopeStore,
    options: CodeOptions,
}

impl ValueStore {
    /// Create a value store appending to `store`.
    pub fn new(store: ScopeStore, scope: ScopeOptions, options: CodeOptions) -> Self {
        Self {
            allocator: NameAllocator::new(scope),
            values: FxIndexMap::default(),
            store,
            options,
        }
    }

    /// Underlying allocator, e.g. to parent a nested scope.
    pub fn allocator(&self) -> &NameAllocator {
        &self.allocator
    }

    pub fn options(&self) -> &CodeOptions {
        &self.options
    }

    /// The flat store shared with the closure builder.
    pub fn get(&self) -> &ScopeStore {
        &self.store
    }

    /// Allocate an unbound name under `prefix`.
    pub fn name(&mut self, prefix: &str) -> ScopeResult<ValueScopeName> {
        let text = self.allocator.new_name(prefix)?;
        Ok(ValueScopeName::new(prefix, text))
    }

    /// Bind `value` to a name, deduplicating by prefix and dedup key.
    ///
    /// Nothing is mutated when this returns an error.
    pub fn value<'a>(
        &mut self,
        name_or_prefix: impl Into<ValueNameOrPrefix<'a>>,
        value: Value,
    ) -> ScopeResult<ValueScopeName> {
        let target = name_or_prefix.into();
        let prefix = match &target {
            ValueNameOrPrefix::Name(name) => name.prefix().to_owned(),
            ValueNameOrPrefix::Prefix(prefix) => (*prefix).to_owned(),
        };
        let Some(reference) = value.reference().cloned() else {
            return Err(ScopeError::MissingRef { prefix });
        };
        let key = value
            .key()
            .cloned()
            .unwrap_or_else(|| ValueKey::Ref(reference.clone()));

        if let Some(existing) = self.get_value(&prefix, &key) {
            tracing::trace!(name = %existing, "value already bound");
            return Ok(existing);
        }

        let name = match target {
            ValueNameOrPrefix::Name(name) => name,
            ValueNameOrPrefix::Prefix(requested) => self.name(requested)?,
        };
        if name.value().is_some() {
            return Err(ScopeError::AlreadyBound {
                name: name.to_string(),
            });
        }

        let item_index = self.store.push(&prefix, reference);
        name.set_value(
            value,
            ScopePath {
                property: prefix.clone(),
                item_index,
            },
        )?;
        tracing::debug!(name = %name, item_index, "bound scope value");
        self.values
            .entry(prefix)
            .or_default()
            .insert(key, name.clone());
        Ok(name)
    }

    /// Look up the name bound to `key` under `prefix`. Never allocates.
    pub fn get_value(&self, prefix: &str, key: &ValueKey) -> Option<ValueScopeName> {
        self.values.get(prefix)?.get(key).cloned()
    }

    /// Every bound name, in registration order.
    pub fn values(&self) -> ScopeValueSets {
        self.values
            .values()
            .flat_map(IndexMap::values)
            .cloned()
            .collect()
    }

    /// Declarations binding each name to its slot in the store named
    /// `scope_name`, e.g. `const pattern0 = scope.pattern[0];`.
    pub fn scope_refs(
        &self,
        scope_name: &Name,
        values: Option<&ScopeValueSets>,
    ) -> ScopeResult<Code> {
        let emitter = DeclarationEmitter::new(self.options);
        match values {
            Some(values) => emitter.store_refs(scope_name, values),
            None => emitter.store_refs(scope_name, &self.values()),
        }
    }

    /// Standalone declarations recreating each value, see
    /// [`DeclarationEmitter::declarations`].
    pub fn scope_code(
        &self,
        values: Option<&ScopeValueSets>,
        used: Option<&mut UsedScopeValues>,
        fallback: Option<&mut CodeFallback<'_>>,
    ) -> ScopeResult<Code> {
        let emitter = DeclarationEmitter::new(self.options);
        let mut local = UsedScopeValues::new();
        let used = used.unwrap_or(&mut local);
        match values {
            Some(values) => emitter.declarations(values, used, fallback),
            None => emitter.declarations(&self.values(), used, fallback),
        }
    }
}

// Tests
