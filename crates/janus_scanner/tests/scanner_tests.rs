//! Scanner integration tests.
//!
//! Verifies tokenization for both languages: token kinds, lexemes,
//! positions, and the line-oriented edge cases.

use janus_ast::SyntaxKind;
use janus_core::Language;
use janus_scanner::{tokenize, Token};

/// Helper: tokenize and drop the trailing EOF.
fn scan(source: &str, language: Language) -> Vec<Token> {
    let mut tokens = tokenize(source, language);
    assert_eq!(tokens.last().unwrap().kind, SyntaxKind::EndOfFileToken);
    tokens.pop();
    tokens
}

fn scan_kinds(source: &str, language: Language) -> Vec<SyntaxKind> {
    scan(source, language).into_iter().map(|t| t.kind).collect()
}

// ============================================================================
// Totality and boundaries
// ============================================================================

#[test]
fn empty_source_is_just_eof() {
    let tokens = tokenize("", Language::JavaScript);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, SyntaxKind::EndOfFileToken);
    assert_eq!(tokens[0].line(), 1);
}

#[test]
fn whitespace_and_comments_only() {
    assert!(scan("   \n\t// nothing\n/* still nothing */", Language::JavaScript).is_empty());
}

#[test]
fn eof_line_is_past_last_content_line() {
    let tokens = tokenize("let x = 1;\nlet y = 2;", Language::JavaScript);
    assert_eq!(tokens.last().unwrap().line(), 3);
}

// ============================================================================
// Comments
// ============================================================================

#[test]
fn line_comment_consumes_rest_of_line() {
    let kinds = scan_kinds("let x; // let y;\nlet z;", Language::JavaScript);
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::LetKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::SemicolonToken,
            SyntaxKind::LetKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::SemicolonToken,
        ]
    );
}

#[test]
fn block_comment_spans_lines() {
    let source = "let a; /* first\nsecond\nthird */ let b;";
    let tokens = scan(source, Language::JavaScript);
    let names: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == SyntaxKind::Identifier)
        .map(|t| t.text.as_str())
        .collect();
    assert_eq!(names, vec!["a", "b"]);
    // `b` is found on the closing line.
    assert_eq!(tokens.last().unwrap().line(), 3);
}

#[test]
fn block_comment_within_one_line() {
    let kinds = scan_kinds("1 /* two */ 3", Language::JavaScript);
    assert_eq!(kinds, vec![SyntaxKind::NumericLiteral, SyntaxKind::NumericLiteral]);
}

#[test]
fn unterminated_block_comment_swallows_remainder() {
    let kinds = scan_kinds("let x; /* open\nlet y;", Language::JavaScript);
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::LetKeyword,
            SyntaxKind::Identifier,
            SyntaxKind::SemicolonToken,
        ]
    );
}

// ============================================================================
// String literals
// ============================================================================

#[test]
fn string_lexeme_retains_quotes() {
    let tokens = scan("\"John\"", Language::JavaScript);
    assert_eq!(tokens[0].kind, SyntaxKind::StringLiteral);
    assert_eq!(tokens[0].text, "\"John\"");
}

#[test]
fn single_and_backtick_quotes_in_javascript() {
    let tokens = scan("'a' `b`", Language::JavaScript);
    assert_eq!(tokens[0].text, "'a'");
    assert_eq!(tokens[1].text, "`b`");
}

#[test]
fn backtick_is_unknown_in_csharp() {
    let tokens = scan("`x`", Language::CSharp);
    assert_eq!(tokens[0].kind, SyntaxKind::Unknown);
}

#[test]
fn escaped_quote_passes_through() {
    let tokens = scan(r#""say \"hi\"""#, Language::JavaScript);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].text, r#""say \"hi\"""#);
}

#[test]
fn unterminated_string_runs_to_end_of_line() {
    let tokens = scan("\"open\nnext", Language::JavaScript);
    assert_eq!(tokens[0].kind, SyntaxKind::StringLiteral);
    assert_eq!(tokens[0].text, "\"open");
    assert_eq!(tokens[1].kind, SyntaxKind::Identifier);
    assert_eq!(tokens[1].line(), 2);
}

#[test]
fn verbatim_string_doubles_quotes() {
    let tokens = scan(r#"@"a ""b"" c""#, Language::CSharp);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].kind, SyntaxKind::StringLiteral);
    assert_eq!(tokens[0].text, r#"@"a ""b"" c""#);
}

#[test]
fn verbatim_string_backslash_is_plain() {
    let tokens = scan(r#"@"C:\temp""#, Language::CSharp);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].text, r#"@"C:\temp""#);
}

// ============================================================================
// Numeric literals
// ============================================================================

#[test]
fn integer_and_decimal_literals() {
    let tokens = scan("42 3.14", Language::JavaScript);
    assert_eq!(tokens[0].text, "42");
    assert_eq!(tokens[1].text, "3.14");
}

#[test]
fn csharp_numeric_suffixes_are_kept() {
    for source in ["3.14f", "2.5d", "100m", "7L"] {
        let tokens = scan(source, Language::CSharp);
        assert_eq!(tokens.len(), 1, "source: {}", source);
        assert_eq!(tokens[0].kind, SyntaxKind::NumericLiteral);
        assert_eq!(tokens[0].text, source);
    }
}

#[test]
fn javascript_has_no_numeric_suffixes() {
    let tokens = scan("3f", Language::JavaScript);
    assert_eq!(tokens[0].text, "3");
    assert_eq!(tokens[1].kind, SyntaxKind::Identifier);
}

// ============================================================================
// Identifiers and keywords
// ============================================================================

#[test]
fn keywords_resolve_per_language() {
    assert_eq!(
        scan_kinds("let", Language::JavaScript),
        vec![SyntaxKind::LetKeyword]
    );
    assert_eq!(
        scan_kinds("namespace", Language::CSharp),
        vec![SyntaxKind::NamespaceKeyword]
    );
    assert_eq!(
        scan_kinds("namespace", Language::JavaScript),
        vec![SyntaxKind::Identifier]
    );
    assert_eq!(
        scan_kinds("foreach", Language::JavaScript),
        vec![SyntaxKind::Identifier]
    );
}

#[test]
fn dollar_identifiers_are_javascript_only() {
    let tokens = scan("$value", Language::JavaScript);
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0].text, "$value");

    let tokens = scan("$value", Language::CSharp);
    assert_eq!(tokens[0].kind, SyntaxKind::Unknown);
}

#[test]
fn underscore_identifier() {
    let tokens = scan("_private", Language::CSharp);
    assert_eq!(tokens[0].kind, SyntaxKind::Identifier);
    assert_eq!(tokens[0].text, "_private");
}

// ============================================================================
// Operators
// ============================================================================

#[test]
fn strict_equality_only_in_javascript() {
    assert_eq!(
        scan_kinds("a === b", Language::JavaScript),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::EqualsEqualsEqualsToken,
            SyntaxKind::Identifier,
        ]
    );
}

#[test]
fn csharp_compound_operators() {
    assert_eq!(
        scan_kinds("a ??= b << 2", Language::CSharp),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::QuestionQuestionEqualsToken,
            SyntaxKind::Identifier,
            SyntaxKind::LessThanLessThanToken,
            SyntaxKind::NumericLiteral,
        ]
    );
}

#[test]
fn ampersand_is_unknown_in_javascript() {
    // The JavaScript subset has no bitwise operators; `&&` still lexes.
    assert_eq!(
        scan_kinds("a && b", Language::JavaScript),
        vec![
            SyntaxKind::Identifier,
            SyntaxKind::AmpersandAmpersandToken,
            SyntaxKind::Identifier,
        ]
    );
    assert_eq!(
        scan_kinds("a & b", Language::JavaScript),
        vec![SyntaxKind::Identifier, SyntaxKind::Unknown, SyntaxKind::Identifier]
    );
}

// ============================================================================
// Positions
// ============================================================================

#[test]
fn positions_are_line_oriented() {
    let tokens = scan("let x = 1;\n  x += 2;", Language::JavaScript);
    let x2 = &tokens[5];
    assert_eq!(x2.text, "x");
    assert_eq!(x2.line(), 2);
    assert_eq!(x2.column(), 3);
    assert_eq!((x2.span.start, x2.span.end), (2, 3));
}

#[test]
fn column_is_one_based() {
    let tokens = scan("a", Language::JavaScript);
    assert_eq!(tokens[0].line(), 1);
    assert_eq!(tokens[0].column(), 1);
}
