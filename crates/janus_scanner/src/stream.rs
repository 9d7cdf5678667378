//! A positional cursor over the token vector.
//!
//! The grammars are LL(1): `peek` looks at the current token only.
//! `peek_ahead(1)` exists for the two places the C# grammar needs a
//! second token: telling a constructor (`Name (`) from a method
//! returning `Name`, and spotting a `[]` array suffix in type position.

use crate::token::Token;
use janus_ast::SyntaxKind;
use janus_core::Span;
use janus_diagnostics::{Diagnostic, DiagnosticKind};

#[derive(Debug)]
pub struct TokenStream {
    tokens: Vec<Token>,
    pos: usize,
}

impl TokenStream {
    /// The token vector must end with EOF, which `tokenize` guarantees.
    pub fn new(tokens: Vec<Token>) -> Self {
        debug_assert!(matches!(
            tokens.last().map(|t| t.kind),
            Some(SyntaxKind::EndOfFileToken)
        ));
        Self { tokens, pos: 0 }
    }

    /// The current token. Saturates at EOF.
    #[inline]
    pub fn peek(&self) -> &Token {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    /// The token `n` past the current one. Saturates at EOF.
    #[inline]
    pub fn peek_ahead(&self, n: usize) -> &Token {
        &self.tokens[(self.pos + n).min(self.tokens.len() - 1)]
    }

    /// Move to the next token; saturates at EOF.
    pub fn advance(&mut self) {
        if self.pos + 1 < self.tokens.len() {
            self.pos += 1;
        }
    }

    /// Whether the current token has the given kind.
    #[inline]
    pub fn matches(&self, kind: SyntaxKind) -> bool {
        self.peek().kind == kind
    }

    /// If the current token matches, return it and advance; otherwise
    /// produce a parse diagnostic carrying `message` at the current
    /// position, leaving the cursor where it is.
    pub fn consume(&mut self, kind: SyntaxKind, message: &str) -> Result<Token, Diagnostic> {
        if self.matches(kind) {
            let token = self.peek().clone();
            self.advance();
            Ok(token)
        } else {
            Err(Diagnostic::error(
                DiagnosticKind::Syntax,
                message,
                self.peek().line_col(),
            ))
        }
    }

    /// Consume the current token when it matches; report whether it did.
    pub fn eat(&mut self, kind: SyntaxKind) -> bool {
        if self.matches(kind) {
            self.advance();
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn at_eof(&self) -> bool {
        self.peek().is_eof()
    }

    /// The cursor index, used by statement lists to guarantee progress
    /// across error recovery.
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Number of non-EOF tokens in the stream.
    pub fn token_count(&self) -> usize {
        self.tokens.len() - 1
    }

    /// Split the current `>>` token into two `>` tokens and consume the
    /// first half. Used when closing nested type-argument lists, where the
    /// longest-match lexer has glued the closers together.
    pub fn split_right_shift(&mut self) {
        let token = self.peek();
        debug_assert_eq!(token.kind, SyntaxKind::GreaterThanGreaterThanToken);
        let span = token.span;
        self.tokens[self.pos] = Token::new(
            SyntaxKind::GreaterThanToken,
            Span::new(span.line, span.column + 1, span.start + 1, span.end),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenize;
    use janus_core::Language;

    #[test]
    fn advance_saturates_at_eof() {
        let mut stream = TokenStream::new(tokenize("x", Language::JavaScript));
        assert_eq!(stream.peek().kind, SyntaxKind::Identifier);
        stream.advance();
        assert!(stream.at_eof());
        stream.advance();
        assert!(stream.at_eof());
    }

    #[test]
    fn consume_mismatch_reports_and_stays() {
        let mut stream = TokenStream::new(tokenize("x", Language::JavaScript));
        let err = stream.consume(SyntaxKind::SemicolonToken, "';' expected.");
        assert!(err.is_err());
        assert_eq!(stream.peek().kind, SyntaxKind::Identifier);
    }

    #[test]
    fn split_right_shift_yields_two_closers() {
        let mut stream = TokenStream::new(tokenize("List<List<int>> x", Language::CSharp));
        while !stream.matches(SyntaxKind::GreaterThanGreaterThanToken) {
            stream.advance();
        }
        stream.split_right_shift();
        assert!(stream.matches(SyntaxKind::GreaterThanToken));
        stream.advance();
        assert_eq!(stream.peek().kind, SyntaxKind::Identifier);
    }
}
