//! Scope and symbol table for Sable generated code.
//!
//! This crate provides:
//!
//! - **Name allocation** ([`NameAllocator`]): collision-free `{prefix}{n}`
//!   identifiers with parent/child prefix reservation.
//!
//! - **Value binding** ([`ValueStore`], [`ValueScopeName`], [`ScopeStore`]):
//!   binds names to runtime values, deduplicates repeated registrations and
//!   maintains the flat `prefix -> [reference]` store a compiled closure
//!   reads from.
//!
//! - **Declaration emission** ([`DeclarationEmitter`], [`UsedScopeValues`]):
//!   recreates bound values as declarations for standalone output, with a
//!   re-emission guard shared across calls.
//!
//! - **Standalone modules** ([`StandaloneModule`]) and **runtime helpers**
//!   ([`runtime`]) built on top of the above.
//!
//! # Data Flow
//!
//! ```text
//! keyword compiler ──value()──> ValueStore ──name──> generated body
//!                                   │
//!              closure mode ◄───────┴───────► standalone mode
//!          scope_refs(): store[i]         scope_code(): declarations
//! ```
//!
//! Everything is single-threaded: handles are `Rc`-based and the flat store
//! is shared by cloning its handle, never through global state.

mod allocator;
mod emit;
mod error;
mod options;
pub mod runtime;
mod scope_name;
mod standalone;
mod store;
mod value;

pub use allocator::{NameAllocator, NameOrPrefix, ScopeOptions};
pub use emit::{CodeFallback, DeclarationEmitter, UsedScopeValues, UsedValueState};
pub use error::{ScopeError, ScopeResult};
pub use options::{CodeOptions, VarKind};
pub use scope_name::{ScopePath, ValueScopeName};
pub use standalone::StandaloneModule;
pub use store::{ScopeStore, ScopeValueSets, ValueNameOrPrefix, ValueStore};
pub use value::{ImportParams, Value, ValueKey, ValueKind, ValueRef};
