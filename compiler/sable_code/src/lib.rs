//! Generated-code fragments for the Sable schema compiler.
//!
//! This crate provides the two building blocks every code generator in
//! Sable composes:
//!
//! - [`Name`]: an identifier handle embedded in generated code.
//! - [`Code`]: an ordered fragment of raw text, names and quoted string
//!   literals that can be concatenated and rendered.
//!
//! Fragments are never interpreted here. Rendering is plain concatenation,
//! so callers are responsible for emitting syntactically valid output.

mod code;
mod name;

pub use code::{Code, CodeItem};
pub use name::Name;
