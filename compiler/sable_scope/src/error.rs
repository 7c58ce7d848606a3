//! Errors raised while allocating, binding and emitting scoped values.
//!
//! Every variant is fatal to the compile unit that raised it: callers are
//! expected to abandon the compilation rather than accept partial output.

use thiserror::Error;

use crate::Value;

/// Scope, binding or emission failure.
#[derive(Error, Debug, Clone)]
pub enum ScopeError {
    /// A prefix group was requested that this scope's allow-list excludes,
    /// or that an ancestor's allow-list reserves.
    #[error("prefix \"{prefix}\" is not allowed in this scope")]
    PrefixNotAllowed { prefix: String },

    /// `value()` was called without a runtime reference.
    #[error("reference must be passed in value (prefix \"{prefix}\")")]
    MissingRef { prefix: String },

    /// An explicitly passed name is already bound to another value.
    #[error("name \"{name}\" is already bound to a value")]
    AlreadyBound { name: String },

    /// A name reached emission without ever being registered.
    #[error("name \"{name}\" has no value")]
    Unregistered { name: String },

    /// A bound value has no generation code, no usable import form and no
    /// fallback supplied code for it.
    #[error("\"code\" for {name} not defined")]
    NoCode { name: String, value: Box<Value> },

    /// A standalone module was requested without any export.
    #[error("standalone module needs a default export or at least one named export")]
    NoExports,

    /// A standalone module was given both a default and named exports.
    #[error("standalone module takes either a default export or named exports, not both")]
    MixedExports,

    /// An export name is not a valid identifier.
    #[error("invalid export name \"{name}\"")]
    InvalidExportName { name: String },
}

impl ScopeError {
    /// The identifier the error refers to, if any.
    pub fn name(&self) -> Option<&str> {
        match self {
            ScopeError::AlreadyBound { name }
            | ScopeError::Unregistered { name }
            | ScopeError::NoCode { name, .. }
            | ScopeError::InvalidExportName { name } => Some(name),
            ScopeError::PrefixNotAllowed { .. }
            | ScopeError::MissingRef { .. }
            | ScopeError::NoExports
            | ScopeError::MixedExports => None,
        }
    }
}

/// Result alias for scope operations.
pub type ScopeResult<T> = Result<T, ScopeError>;
