//! Token information produced by the lexers.

use janus_ast::SyntaxKind;
use janus_core::{LineCol, Span};

/// A scanned token.
///
/// `text` carries the matched lexeme for identifiers, numeric literals
/// (suffix included), string literals (surrounding quotes included), and
/// unknown bytes; kinds with fixed spelling leave it empty and answer
/// through [`SyntaxKind::text`].
#[derive(Debug, Clone)]
pub struct Token {
    pub kind: SyntaxKind,
    pub text: String,
    pub span: Span,
}

impl Token {
    pub fn new(kind: SyntaxKind, span: Span) -> Self {
        Self {
            kind,
            text: String::new(),
            span,
        }
    }

    pub fn with_text(kind: SyntaxKind, text: String, span: Span) -> Self {
        Self { kind, text, span }
    }

    #[inline]
    pub fn line(&self) -> u32 {
        self.span.line
    }

    #[inline]
    pub fn column(&self) -> u32 {
        self.span.column
    }

    #[inline]
    pub fn line_col(&self) -> LineCol {
        self.span.line_col()
    }

    /// The lexeme: the token's own text, or the kind's fixed spelling.
    pub fn lexeme(&self) -> &str {
        if self.text.is_empty() {
            self.kind.text().unwrap_or("")
        } else {
            &self.text
        }
    }

    #[inline]
    pub fn is_eof(&self) -> bool {
        self.kind == SyntaxKind::EndOfFileToken
    }
}
