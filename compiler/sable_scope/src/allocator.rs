//! Hierarchical, prefix-based name allocation.
//!
//! A [`NameAllocator`] hands out identifiers of the form `{prefix}{index}`
//! where the index is a per-prefix counter owned by the allocator. Two
//! rules keep nested scopes from stepping on each other:
//!
//! - a scope with an allow-list may only allocate under listed prefixes;
//! - a scope may not allocate under a prefix that any ancestor's
//!   allow-list reserves.
//!
//! Both rules are checked once, when a prefix group is first created.

use std::collections::hash_map::Entry;
use std::rc::Rc;

use rustc_hash::{FxHashMap, FxHashSet};
use sable_code::Name;

use crate::{ScopeError, ScopeResult};

/// Immutable prefix rules of one scope and its ancestors.
///
/// Children hold a shared handle to their parent's frame. The link is only
/// ever read for collision checks.
#[derive(Debug, Default)]
struct ScopeFrame {
    prefixes: Option<FxHashSet<String>>,
    parent: Option<Rc<ScopeFrame>>,
}

impl ScopeFrame {
    fn reserved_by_ancestor(&self, prefix: &str) -> bool {
        let mut ancestor = self.parent.as_deref();
        while let Some(frame) = ancestor {
            if frame
                .prefixes
                .as_ref()
                .is_some_and(|allowed| allowed.contains(prefix))
            {
                return true;
            }
            ancestor = frame.parent.as_deref();
        }
        false
    }

    fn excludes(&self, prefix: &str) -> bool {
        self.prefixes
            .as_ref()
            .is_some_and(|allowed| !allowed.is_empty() && !allowed.contains(prefix))
    }
}

/// Prefix allow-list and parent of a new scope.
#[derive(Clone, Debug, Default)]
pub struct ScopeOptions {
    prefixes: Option<FxHashSet<String>>,
    parent: Option<Rc<ScopeFrame>>,
}

impl ScopeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Restrict allocation to these prefixes, and reserve them from
    /// descendant scopes.
    #[must_use]
    pub fn prefixes<I, S>(mut self, prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prefixes = Some(prefixes.into_iter().map(Into::into).collect());
        self
    }

    /// Nest the new scope inside `parent`.
    #[must_use]
    pub fn parent(mut self, parent: &NameAllocator) -> Self {
        self.parent = Some(Rc::clone(&parent.frame));
        self
    }
}

/// Counter state of one prefix.
#[derive(Debug)]
struct NameGroup {
    index: usize,
}

/// Prefix-based identifier allocator.
#[derive(Debug)]
pub struct NameAllocator {
    names: FxHashMap<String, NameGroup>,
    frame: Rc<ScopeFrame>,
}

impl NameAllocator {
    pub fn new(options: ScopeOptions) -> Self {
        Self {
            names: FxHashMap::default(),
            frame: Rc::new(ScopeFrame {
                prefixes: options.prefixes,
                parent: options.parent,
            }),
        }
    }

    /// Allocate a fresh name under `prefix`.
    pub fn name(&mut self, prefix: &str) -> ScopeResult<Name> {
        self.new_name(prefix).map(Name::new)
    }

    /// Pass `name` through, or allocate under `prefix`.
    pub fn to_name<'a>(
        &mut self,
        name_or_prefix: impl Into<NameOrPrefix<'a>>,
    ) -> ScopeResult<Name> {
        match name_or_prefix.into() {
            NameOrPrefix::Name(name) => Ok(name),
            NameOrPrefix::Prefix(prefix) => self.name(prefix),
        }
    }

    /// Next identifier text under `prefix`.
    pub(crate) fn new_name(&mut self, prefix: &str) -> ScopeResult<String> {
        let group = match self.names.entry(prefix.to_owned()) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                if self.frame.reserved_by_ancestor(prefix) || self.frame.excludes(prefix) {
                    return Err(ScopeError::PrefixNotAllowed {
                        prefix: prefix.to_owned(),
                    });
                }
                tracing::debug!(prefix, "creating name group");
                entry.insert(NameGroup { index: 0 })
            }
        };
        let index = group.index;
        group.index += 1;
        Ok(format!("{prefix}{index}"))
    }
}

impl Default for NameAllocator {
    fn default() -> Self {
        Self::new(ScopeOptions::default())
    }
}

/// Argument of [`NameAllocator::to_name`].
#[derive(Clone, Debug)]
pub enum NameOrPrefix<'a> {
    Name(Name),
    Prefix(&'a str),
}

impl From<Name> for NameOrPrefix<'_> {
    fn from(name: Name) -> Self {
        NameOrPrefix::Name(name)
    }
}

impl<'a> From<&'a str> for NameOrPrefix<'a> {
    fn from(prefix: &'a str) -> Self {
        NameOrPrefix::Prefix(prefix)
    }
}

// Tests
