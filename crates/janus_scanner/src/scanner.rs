//! The line-oriented lexer.
//!
//! Each line is scanned with a byte cursor; token positions are the
//! 1-based line, the 1-based column of the first byte, and the byte
//! offsets within the line. The only state carried between lines is
//! whether a `/* … */` comment is still open.

use crate::lexicon::Lexicon;
use crate::token::Token;
use janus_ast::SyntaxKind;
use janus_core::{Language, Span};

/// Tokenize `source` under the given language's lexicon. The returned
/// stream always ends with a single EOF token whose line is just past the
/// last content line.
pub fn tokenize(source: &str, language: Language) -> Vec<Token> {
    let lexicon = Lexicon::for_language(language);
    let mut lexer = Lexer {
        lexicon,
        tokens: Vec::new(),
        in_block_comment: false,
    };

    let mut line_count = 0u32;
    for (index, line) in source.lines().enumerate() {
        line_count = index as u32 + 1;
        lexer.scan_line(line_count, line);
    }

    lexer.tokens.push(Token::new(
        SyntaxKind::EndOfFileToken,
        Span::new(line_count + 1, 1, 0, 0),
    ));
    lexer.tokens
}

struct Lexer {
    lexicon: &'static Lexicon,
    tokens: Vec<Token>,
    in_block_comment: bool,
}

impl Lexer {
    fn scan_line(&mut self, line_no: u32, line: &str) {
        let bytes = line.as_bytes();
        let mut pos = 0usize;

        while pos < bytes.len() {
            if self.in_block_comment {
                match line[pos..].find("*/") {
                    Some(offset) => {
                        pos += offset + 2;
                        self.in_block_comment = false;
                    }
                    None => return,
                }
                continue;
            }

            let rest = &line[pos..];
            let ch = rest.chars().next().unwrap();

            if ch.is_whitespace() {
                pos += ch.len_utf8();
                continue;
            }

            if rest.starts_with("//") {
                return;
            }
            if rest.starts_with("/*") {
                pos += 2;
                self.in_block_comment = true;
                continue;
            }

            if ch == '"' || ch == '\'' || (ch == '`' && self.lexicon.template_strings) {
                pos = self.scan_string(line_no, line, pos, ch);
                continue;
            }
            if ch == '@' && self.lexicon.verbatim_strings && rest[1..].starts_with('"') {
                pos = self.scan_verbatim_string(line_no, line, pos);
                continue;
            }

            if ch.is_ascii_digit() {
                pos = self.scan_number(line_no, line, pos);
                continue;
            }

            if is_identifier_start(ch, self.lexicon.dollar_identifiers) {
                pos = self.scan_identifier_or_keyword(line_no, line, pos);
                continue;
            }

            if let Some((kind, len)) = self.lexicon.match_operator(rest) {
                self.push(Token::new(kind, span_at(line_no, pos, pos + len)));
                pos += len;
                continue;
            }

            // Anything else is an unknown byte; the parser decides what
            // to do with it.
            let len = ch.len_utf8();
            self.push(Token::with_text(
                SyntaxKind::Unknown,
                ch.to_string(),
                span_at(line_no, pos, pos + len),
            ));
            pos += len;
        }
    }

    /// Scan a quoted string from the opening quote. The matched quote is
    /// the only terminator; a backslash carries the next character through
    /// verbatim. An unterminated literal runs to end of line.
    fn scan_string(&mut self, line_no: u32, line: &str, start: usize, quote: char) -> usize {
        let mut chars = line[start..].char_indices().skip(1);
        let mut end = line.len();
        while let Some((offset, ch)) = chars.next() {
            if ch == '\\' {
                chars.next();
                continue;
            }
            if ch == quote {
                end = start + offset + quote.len_utf8();
                break;
            }
        }
        self.push(Token::with_text(
            SyntaxKind::StringLiteral,
            line[start..end].to_string(),
            span_at(line_no, start, end),
        ));
        end
    }

    /// Scan `@"…"` where `""` is a literal quote and backslash is plain.
    fn scan_verbatim_string(&mut self, line_no: u32, line: &str, start: usize) -> usize {
        let mut chars = line[start..].char_indices().skip(2).peekable();
        let mut end = line.len();
        while let Some((offset, ch)) = chars.next() {
            if ch == '"' {
                if matches!(chars.peek(), Some((_, '"'))) {
                    chars.next();
                    continue;
                }
                end = start + offset + 1;
                break;
            }
        }
        self.push(Token::with_text(
            SyntaxKind::StringLiteral,
            line[start..end].to_string(),
            span_at(line_no, start, end),
        ));
        end
    }

    /// Greedy digits-and-dots, plus one trailing suffix character where
    /// the lexicon allows it.
    fn scan_number(&mut self, line_no: u32, line: &str, start: usize) -> usize {
        let mut end = start;
        for (offset, ch) in line[start..].char_indices() {
            if ch.is_ascii_digit() || ch == '.' {
                end = start + offset + 1;
            } else {
                break;
            }
        }
        if self.lexicon.numeric_suffixes {
            if let Some(ch) = line[end..].chars().next() {
                if matches!(ch.to_ascii_lowercase(), 'f' | 'd' | 'm' | 'l') {
                    end += 1;
                }
            }
        }
        self.push(Token::with_text(
            SyntaxKind::NumericLiteral,
            line[start..end].to_string(),
            span_at(line_no, start, end),
        ));
        end
    }

    fn scan_identifier_or_keyword(&mut self, line_no: u32, line: &str, start: usize) -> usize {
        let mut end = start;
        for (offset, ch) in line[start..].char_indices() {
            if is_identifier_part(ch, self.lexicon.dollar_identifiers) {
                end = start + offset + ch.len_utf8();
            } else {
                break;
            }
        }
        let text = &line[start..end];
        match self.lexicon.keyword(text) {
            Some(kind) => self.push(Token::new(kind, span_at(line_no, start, end))),
            None => self.push(Token::with_text(
                SyntaxKind::Identifier,
                text.to_string(),
                span_at(line_no, start, end),
            )),
        }
        end
    }

    #[inline]
    fn push(&mut self, token: Token) {
        self.tokens.push(token);
    }
}

fn span_at(line: u32, start: usize, end: usize) -> Span {
    Span::new(line, start as u32 + 1, start as u32, end as u32)
}

fn is_identifier_start(ch: char, dollar: bool) -> bool {
    ch.is_ascii_alphabetic() || ch == '_' || (dollar && ch == '$')
}

fn is_identifier_part(ch: char, dollar: bool) -> bool {
    ch.is_ascii_alphanumeric() || ch == '_' || (dollar && ch == '$')
}
