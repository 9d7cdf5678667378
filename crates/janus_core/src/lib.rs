//! janus_core: shared primitives for the janus translator.
//!
//! Currently this is source-position tracking; everything that reports a
//! location (tokens, AST nodes, diagnostics) goes through these types.

pub mod text;

pub use text::{LineCol, Span};

/// The two languages janus translates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    JavaScript,
    CSharp,
}

impl Language {
    /// Short lowercase tag used in CLI flags and log lines.
    pub fn tag(self) -> &'static str {
        match self {
            Language::JavaScript => "js",
            Language::CSharp => "cs",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Language::JavaScript => write!(f, "JavaScript"),
            Language::CSharp => write!(f, "C#"),
        }
    }
}
