//! janus_ast: token kinds and AST definitions for both languages.
//!
//! The AST is a closed set of tagged variants per language, arena-allocated
//! the way the parser builds it: child nodes are arena references, node
//! lists are arena slices, and identifier/literal text is arena-interned
//! `&str`. Every node records the 1-based source line of the first token
//! that produced it.

pub mod cs;
pub mod js;
pub mod syntax_kind;
pub mod types;

pub use syntax_kind::SyntaxKind;
pub use types::{LiteralValue, ModifierFlags};

/// An arena-allocated list of nodes.
pub type NodeList<'a, T> = &'a [T];
