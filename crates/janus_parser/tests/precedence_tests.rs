//! AST-shape tests for the operator-precedence cascade.
//!
//! These assert on tree shape only, never on parsing strategy: equal
//! precedence associates left, higher precedence binds tighter, and
//! parentheses override both.

use bumpalo::Bump;
use janus_ast::{js, SyntaxKind};
use janus_core::Language;
use janus_metrics::MetricsSink;
use janus_scanner::{tokenize, TokenStream};

/// Helper: parse `source` as a JavaScript expression statement and hand
/// the expression to `f`.
fn with_expr<T>(source: &str, f: impl FnOnce(&js::Expression<'_>) -> T) -> T {
    let arena = Bump::new();
    let mut sink = MetricsSink::new();
    let parser = janus_parser::js::Parser::new(
        &arena,
        TokenStream::new(tokenize(source, Language::JavaScript)),
        &mut sink,
    );
    let program = parser.parse_program();
    assert!(
        !sink.diagnostics.has_errors(),
        "unexpected errors for {:?}: {:?}",
        source,
        sink.diagnostics.diagnostics()
    );
    let js::Statement::Expression(statement) = &program.body[0] else {
        panic!("expected an expression statement for {:?}", source);
    };
    f(statement.expression)
}

fn binary<'e, 'a>(expression: &'e js::Expression<'a>) -> &'e js::BinaryExpression<'a> {
    let js::Expression::Binary(node) = expression else {
        panic!("expected a binary expression");
    };
    node
}

fn number<'e, 'a>(expression: &'e js::Expression<'a>) -> &'e str {
    let js::Expression::Literal(literal) = expression else {
        panic!("expected a literal");
    };
    let janus_ast::LiteralValue::Number(lexeme) = literal.value else {
        panic!("expected a number literal");
    };
    lexeme
}

#[test]
fn multiplication_binds_tighter_than_addition() {
    // 1 + 2 * 3  =>  Add(1, Mul(2, 3))
    with_expr("1 + 2 * 3;", |expression| {
        let add = binary(expression);
        assert_eq!(add.operator, SyntaxKind::PlusToken);
        assert_eq!(number(add.left), "1");
        let mul = binary(add.right);
        assert_eq!(mul.operator, SyntaxKind::AsteriskToken);
        assert_eq!(number(mul.left), "2");
        assert_eq!(number(mul.right), "3");
    });
}

#[test]
fn parentheses_override_precedence() {
    // (1 + 2) * 3  =>  Mul(Add(1, 2), 3)
    with_expr("(1 + 2) * 3;", |expression| {
        let mul = binary(expression);
        assert_eq!(mul.operator, SyntaxKind::AsteriskToken);
        let add = binary(mul.left);
        assert_eq!(add.operator, SyntaxKind::PlusToken);
        assert_eq!(number(add.left), "1");
        assert_eq!(number(add.right), "2");
        assert_eq!(number(mul.right), "3");
    });
}

#[test]
fn equal_precedence_associates_left() {
    // 1 - 2 - 3  =>  Sub(Sub(1, 2), 3)
    with_expr("1 - 2 - 3;", |expression| {
        let outer = binary(expression);
        assert_eq!(number(outer.right), "3");
        let inner = binary(outer.left);
        assert_eq!(number(inner.left), "1");
        assert_eq!(number(inner.right), "2");
    });
}

#[test]
fn logical_layers_sit_below_equality() {
    // a && b == c  =>  And(a, Eq(b, c))
    with_expr("a && b == c;", |expression| {
        let and = binary(expression);
        assert_eq!(and.operator, SyntaxKind::AmpersandAmpersandToken);
        let eq = binary(and.right);
        assert_eq!(eq.operator, SyntaxKind::EqualsEqualsToken);
    });
}

#[test]
fn or_binds_looser_than_and() {
    // a || b && c  =>  Or(a, And(b, c))
    with_expr("a || b && c;", |expression| {
        let or = binary(expression);
        assert_eq!(or.operator, SyntaxKind::BarBarToken);
        let and = binary(or.right);
        assert_eq!(and.operator, SyntaxKind::AmpersandAmpersandToken);
    });
}

#[test]
fn relational_chains_associate_left() {
    // a < b < c  =>  Lt(Lt(a, b), c)
    with_expr("a < b < c;", |expression| {
        let outer = binary(expression);
        assert_eq!(outer.operator, SyntaxKind::LessThanToken);
        let inner = binary(outer.left);
        assert_eq!(inner.operator, SyntaxKind::LessThanToken);
    });
}

#[test]
fn strict_equality_parses_in_javascript() {
    with_expr("a === b;", |expression| {
        assert_eq!(binary(expression).operator, SyntaxKind::EqualsEqualsEqualsToken);
    });
}

#[test]
fn unary_binds_tighter_than_binary() {
    // !a && b  =>  And(Not(a), b)
    with_expr("!a && b;", |expression| {
        let and = binary(expression);
        assert!(matches!(and.left, js::Expression::Unary(_)));
    });
}

#[test]
fn binary_operands_respect_the_precedence_invariant() {
    // Every binary operand is primary, unary, or a strictly
    // tighter-binding binary (same level only via left chains).
    fn check(expression: &js::Expression<'_>) {
        if let js::Expression::Binary(node) = expression {
            let parent =
                janus_parser::binary_operator_precedence(node.operator, Language::JavaScript)
                    .unwrap();
            if let js::Expression::Binary(left) = node.left {
                let child =
                    janus_parser::binary_operator_precedence(left.operator, Language::JavaScript)
                        .unwrap();
                assert!(child >= parent, "left child binds no looser than parent");
            }
            if let js::Expression::Binary(right) = node.right {
                let child =
                    janus_parser::binary_operator_precedence(right.operator, Language::JavaScript)
                        .unwrap();
                assert!(child > parent, "right child binds strictly tighter");
            }
            check(node.left);
            check(node.right);
        }
    }
    with_expr("a + b * c - d % e + f;", check);
    with_expr("a || b && c == d + e * f;", check);
}
