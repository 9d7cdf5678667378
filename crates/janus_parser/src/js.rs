//! The JavaScript recursive-descent parser.

use bumpalo::Bump;
use janus_ast::js::*;
use janus_ast::types::LiteralValue;
use janus_ast::SyntaxKind;
use janus_core::Language;
use janus_diagnostics::{messages, Diagnostic};
use janus_metrics::MetricsSink;
use janus_scanner::{Token, TokenStream};
use std::time::Instant;

use crate::precedence::binary_operator_precedence;
use crate::{alloc_vec_in, decode_string_literal};

/// Tokens that may begin a statement; panic-mode recovery stops here.
fn is_statement_start(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    matches!(
        kind,
        VarKeyword
            | LetKeyword
            | ConstKeyword
            | FunctionKeyword
            | ClassKeyword
            | IfKeyword
            | WhileKeyword
            | ForKeyword
            | SwitchKeyword
            | ReturnKeyword
            | ThrowKeyword
            | BreakKeyword
            | ContinueKeyword
            | TryKeyword
            | OpenBraceToken
    )
}

/// Parses a token stream into a [`Program`], counting nodes and recording
/// diagnostics in the metrics sink as it goes.
pub struct Parser<'a, 'm> {
    arena: &'a Bump,
    tokens: TokenStream,
    metrics: &'m mut MetricsSink,
}

impl<'a, 'm> Parser<'a, 'm> {
    pub fn new(arena: &'a Bump, tokens: TokenStream, metrics: &'m mut MetricsSink) -> Self {
        Self { arena, tokens, metrics }
    }

    pub fn parse_program(mut self) -> Program<'a> {
        let started = Instant::now();
        self.metrics.tokens_processed = self.tokens.token_count() as u64;

        let body = self.parse_statements(false);
        self.note_node();
        let program = Program { line: 1, body };

        self.metrics.parsing_time_ms = started.elapsed().as_secs_f64() * 1000.0;
        program
    }

    // ========================================================================
    // Bookkeeping
    // ========================================================================

    #[inline]
    fn note_node(&mut self) {
        self.metrics.record_node();
    }

    fn intern(&self, text: &str) -> &'a str {
        self.arena.alloc_str(text)
    }

    fn expect(&mut self, kind: SyntaxKind, message: &str) -> Option<Token> {
        match self.tokens.consume(kind, message) {
            Ok(token) => Some(token),
            Err(diagnostic) => {
                self.metrics.add_diagnostic(diagnostic);
                None
            }
        }
    }

    fn error_here(&mut self, template: &janus_diagnostics::DiagnosticMessage, args: &[&str]) {
        let at = self.tokens.peek().line_col();
        self.metrics.add_diagnostic(Diagnostic::new(template, args, at));
    }

    fn make_identifier(&mut self, token: &Token) -> Identifier<'a> {
        self.note_node();
        Identifier {
            line: token.line(),
            name: self.intern(&token.text),
        }
    }

    fn expect_identifier(&mut self, message: &str) -> Option<Identifier<'a>> {
        let token = self.expect(SyntaxKind::Identifier, message)?;
        Some(self.make_identifier(&token))
    }

    fn alloc_expr(&self, expr: Expression<'a>) -> &'a Expression<'a> {
        self.arena.alloc(expr)
    }

    fn alloc_stmt(&self, stmt: Statement<'a>) -> &'a Statement<'a> {
        self.arena.alloc(stmt)
    }

    /// Panic-mode synchronization: skip to `;` (consumed) or a
    /// statement-start token (left in place). EOF always stops.
    fn synchronize(&mut self) {
        self.metrics.record_recovery();
        while !self.tokens.at_eof() {
            if self.tokens.matches(SyntaxKind::SemicolonToken) {
                self.tokens.advance();
                return;
            }
            // A closing brace belongs to the enclosing block; leave it.
            if self.tokens.matches(SyntaxKind::CloseBraceToken)
                || is_statement_start(self.tokens.peek().kind)
            {
                return;
            }
            self.tokens.advance();
        }
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn parse_statements(&mut self, stop_at_brace: bool) -> &'a [Statement<'a>] {
        let mut statements = Vec::new();
        loop {
            if self.tokens.at_eof() {
                break;
            }
            if stop_at_brace && self.tokens.matches(SyntaxKind::CloseBraceToken) {
                break;
            }
            // Stray semicolons separate nothing.
            if self.tokens.eat(SyntaxKind::SemicolonToken) {
                continue;
            }

            let before = self.tokens.position();
            match self.parse_statement() {
                Some(statement) => statements.push(statement),
                None => {
                    self.synchronize();
                    if self.tokens.position() == before && !self.tokens.at_eof() {
                        self.tokens.advance();
                    }
                }
            }
        }
        alloc_vec_in(self.arena, statements)
    }

    fn parse_statement(&mut self) -> Option<Statement<'a>> {
        use SyntaxKind::*;
        match self.tokens.peek().kind {
            VarKeyword | LetKeyword | ConstKeyword => self.parse_variable_statement(),
            FunctionKeyword => self.parse_function_declaration(false),
            AsyncKeyword => {
                self.tokens.advance();
                self.parse_function_declaration(true)
            }
            ClassKeyword => self.parse_class_declaration(),
            IfKeyword => self.parse_if_statement(),
            WhileKeyword => self.parse_while_statement(),
            ForKeyword => self.parse_for_statement(),
            SwitchKeyword => self.parse_switch_statement(),
            ReturnKeyword => self.parse_return_statement(),
            ThrowKeyword => self.parse_throw_statement(),
            BreakKeyword => {
                let token = self.tokens.peek().clone();
                self.tokens.advance();
                self.expect(SemicolonToken, "';' expected.")?;
                self.note_node();
                Some(Statement::Break(BreakStatement { line: token.line() }))
            }
            ContinueKeyword => {
                let token = self.tokens.peek().clone();
                self.tokens.advance();
                self.expect(SemicolonToken, "';' expected.")?;
                self.note_node();
                Some(Statement::Continue(ContinueStatement { line: token.line() }))
            }
            TryKeyword => self.parse_try_statement(),
            OpenBraceToken => self.parse_block().map(Statement::Block),
            _ => self.parse_expression_statement(),
        }
    }

    fn parse_block(&mut self) -> Option<Block<'a>> {
        let open = self.expect(SyntaxKind::OpenBraceToken, "'{' expected.")?;
        let body = self.parse_statements(true);
        self.expect(SyntaxKind::CloseBraceToken, "'}' expected.")?;
        self.note_node();
        Some(Block { line: open.line(), body })
    }

    fn parse_variable_statement(&mut self) -> Option<Statement<'a>> {
        let declaration = self.parse_variable_declaration()?;
        self.expect(SyntaxKind::SemicolonToken, "';' expected.")?;
        Some(Statement::VariableDeclaration(declaration))
    }

    /// The declaration without its terminating `;`, shared with `for`.
    fn parse_variable_declaration(&mut self) -> Option<VariableDeclaration<'a>> {
        let keyword = self.tokens.peek().clone();
        let kind = match keyword.kind {
            SyntaxKind::VarKeyword => VarKind::Var,
            SyntaxKind::LetKeyword => VarKind::Let,
            SyntaxKind::ConstKeyword => VarKind::Const,
            _ => unreachable!("caller checked the declaration keyword"),
        };
        self.tokens.advance();

        let mut declarations = Vec::new();
        loop {
            let id = self.expect_identifier("Variable name expected.")?;
            let init = if self.tokens.eat(SyntaxKind::EqualsToken) {
                Some(self.parse_expression().map(|e| self.alloc_expr(e))?)
            } else {
                None
            };
            if kind == VarKind::Const && init.is_none() {
                self.metrics.add_diagnostic(Diagnostic::new(
                    &messages::CONST_DECLARATION_REQUIRES_INITIALIZER_0,
                    &[id.name],
                    janus_core::LineCol::new(id.line, 1),
                ));
            }
            self.note_node();
            declarations.push(VariableDeclarator { line: id.line, id, init });
            if !self.tokens.eat(SyntaxKind::CommaToken) {
                break;
            }
        }

        self.note_node();
        Some(VariableDeclaration {
            line: keyword.line(),
            kind,
            declarations: alloc_vec_in(self.arena, declarations),
        })
    }

    fn parse_function_declaration(&mut self, is_async: bool) -> Option<Statement<'a>> {
        let keyword = self.expect(SyntaxKind::FunctionKeyword, "'function' expected.")?;
        let id = self.expect_identifier("Function name expected.")?;
        let params = self.parse_parameter_names()?;
        let body = self.parse_block()?;
        self.note_node();
        Some(Statement::FunctionDeclaration(FunctionDeclaration {
            line: keyword.line(),
            id,
            params,
            body,
            is_async,
        }))
    }

    fn parse_parameter_names(&mut self) -> Option<&'a [Identifier<'a>]> {
        self.expect(SyntaxKind::OpenParenToken, "'(' expected.")?;
        let mut params = Vec::new();
        if !self.tokens.matches(SyntaxKind::CloseParenToken) {
            loop {
                params.push(self.expect_identifier("Parameter name expected.")?);
                if !self.tokens.eat(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::CloseParenToken, "')' expected.")?;
        Some(alloc_vec_in(self.arena, params))
    }

    fn parse_class_declaration(&mut self) -> Option<Statement<'a>> {
        let keyword = self.expect(SyntaxKind::ClassKeyword, "'class' expected.")?;
        let id = self.expect_identifier("Class name expected.")?;

        // `extends` is a contextual word in this subset.
        let superclass = if self.tokens.matches(SyntaxKind::Identifier)
            && self.tokens.peek().text == "extends"
        {
            self.tokens.advance();
            Some(self.expect_identifier("Base class name expected.")?)
        } else {
            None
        };

        self.expect(SyntaxKind::OpenBraceToken, "'{' expected.")?;
        let mut members = Vec::new();
        while !self.tokens.matches(SyntaxKind::CloseBraceToken) && !self.tokens.at_eof() {
            if self.tokens.eat(SyntaxKind::SemicolonToken) {
                continue;
            }
            members.push(self.parse_method_definition()?);
        }
        self.expect(SyntaxKind::CloseBraceToken, "'}' expected.")?;

        self.note_node();
        Some(Statement::ClassDeclaration(ClassDeclaration {
            line: keyword.line(),
            id,
            superclass,
            body: alloc_vec_in(self.arena, members),
        }))
    }

    /// `static`, `async`, `get`, and `set` are method names when followed
    /// by `(`, modifier words otherwise; the loop consumes a word first
    /// and only then decides, which keeps the dispatch LL(1).
    fn parse_method_definition(&mut self) -> Option<MethodDefinition<'a>> {
        let mut is_static = false;
        let mut is_async = false;
        let mut kind = MethodKind::Method;
        let mut key = self.parse_member_name()?;

        while !self.tokens.matches(SyntaxKind::OpenParenToken) {
            match key.name {
                "static" if !is_static && !is_async && kind == MethodKind::Method => {
                    is_static = true;
                }
                "async" if !is_async && kind == MethodKind::Method => {
                    is_async = true;
                }
                "get" if kind == MethodKind::Method => kind = MethodKind::Get,
                "set" if kind == MethodKind::Method => kind = MethodKind::Set,
                _ => break,
            }
            key = self.parse_member_name()?;
        }

        if key.name == "constructor" {
            kind = MethodKind::Constructor;
        }
        let params = self.parse_parameter_names()?;
        let body = self.parse_block()?;
        self.note_node();
        Some(MethodDefinition {
            line: key.line,
            kind,
            key,
            params,
            body,
            is_static,
            is_async,
        })
    }

    /// A member name: an identifier, or `async` (the one keyword that can
    /// name or modify a method here).
    fn parse_member_name(&mut self) -> Option<Identifier<'a>> {
        let token = self.tokens.peek().clone();
        match token.kind {
            SyntaxKind::Identifier => {
                self.tokens.advance();
                Some(self.make_identifier(&token))
            }
            SyntaxKind::AsyncKeyword => {
                self.tokens.advance();
                self.note_node();
                Some(Identifier { line: token.line(), name: "async" })
            }
            _ => {
                self.error_here(&messages::IDENTIFIER_EXPECTED, &[]);
                None
            }
        }
    }

    fn parse_if_statement(&mut self) -> Option<Statement<'a>> {
        let keyword = self.expect(SyntaxKind::IfKeyword, "'if' expected.")?;
        self.expect(SyntaxKind::OpenParenToken, "'(' expected.")?;
        let test = self.parse_expression().map(|e| self.alloc_expr(e))?;
        self.expect(SyntaxKind::CloseParenToken, "')' expected.")?;
        let consequent = self.parse_statement().map(|s| self.alloc_stmt(s))?;
        let alternate = if self.tokens.eat(SyntaxKind::ElseKeyword) {
            Some(self.parse_statement().map(|s| self.alloc_stmt(s))?)
        } else {
            None
        };
        self.note_node();
        Some(Statement::If(IfStatement {
            line: keyword.line(),
            test,
            consequent,
            alternate,
        }))
    }

    fn parse_while_statement(&mut self) -> Option<Statement<'a>> {
        let keyword = self.expect(SyntaxKind::WhileKeyword, "'while' expected.")?;
        self.expect(SyntaxKind::OpenParenToken, "'(' expected.")?;
        let test = self.parse_expression().map(|e| self.alloc_expr(e))?;
        self.expect(SyntaxKind::CloseParenToken, "')' expected.")?;
        let body = self.parse_statement().map(|s| self.alloc_stmt(s))?;
        self.note_node();
        Some(Statement::While(WhileStatement {
            line: keyword.line(),
            test,
            body,
        }))
    }

    fn parse_for_statement(&mut self) -> Option<Statement<'a>> {
        use SyntaxKind::*;
        let keyword = self.expect(ForKeyword, "'for' expected.")?;
        self.expect(OpenParenToken, "'(' expected.")?;

        let init = if self.tokens.matches(SemicolonToken) {
            None
        } else if matches!(
            self.tokens.peek().kind,
            VarKeyword | LetKeyword | ConstKeyword
        ) {
            // Either a plain declaration or the `for (… of …)` form.
            let kind_token = self.tokens.peek().clone();
            let kind = match kind_token.kind {
                VarKeyword => VarKind::Var,
                LetKeyword => VarKind::Let,
                _ => VarKind::Const,
            };
            self.tokens.advance();
            let binding = self.expect_identifier("Variable name expected.")?;

            if self.tokens.eat(OfKeyword) {
                let object = self.parse_expression().map(|e| self.alloc_expr(e))?;
                self.expect(CloseParenToken, "')' expected.")?;
                let body = self.parse_statement().map(|s| self.alloc_stmt(s))?;
                self.note_node();
                return Some(Statement::ForOf(ForOfStatement {
                    line: keyword.line(),
                    kind,
                    binding,
                    object,
                    body,
                }));
            }

            let mut declarations = Vec::new();
            let init = if self.tokens.eat(EqualsToken) {
                Some(self.parse_expression().map(|e| self.alloc_expr(e))?)
            } else {
                None
            };
            self.note_node();
            declarations.push(VariableDeclarator {
                line: binding.line,
                id: binding,
                init,
            });
            while self.tokens.eat(CommaToken) {
                let id = self.expect_identifier("Variable name expected.")?;
                let init = if self.tokens.eat(EqualsToken) {
                    Some(self.parse_expression().map(|e| self.alloc_expr(e))?)
                } else {
                    None
                };
                self.note_node();
                declarations.push(VariableDeclarator { line: id.line, id, init });
            }
            self.note_node();
            Some(ForInit::VariableDeclaration(VariableDeclaration {
                line: kind_token.line(),
                kind,
                declarations: alloc_vec_in(self.arena, declarations),
            }))
        } else {
            Some(ForInit::Expression(
                self.parse_expression().map(|e| self.alloc_expr(e))?,
            ))
        };
        self.expect(SemicolonToken, "';' expected.")?;

        let test = if self.tokens.matches(SemicolonToken) {
            None
        } else {
            Some(self.parse_expression().map(|e| self.alloc_expr(e))?)
        };
        self.expect(SemicolonToken, "';' expected.")?;

        let update = if self.tokens.matches(CloseParenToken) {
            None
        } else {
            Some(self.parse_expression().map(|e| self.alloc_expr(e))?)
        };
        self.expect(CloseParenToken, "')' expected.")?;

        let body = self.parse_statement().map(|s| self.alloc_stmt(s))?;
        self.note_node();
        Some(Statement::For(ForStatement {
            line: keyword.line(),
            init,
            test,
            update,
            body,
        }))
    }

    fn parse_switch_statement(&mut self) -> Option<Statement<'a>> {
        use SyntaxKind::*;
        let keyword = self.expect(SwitchKeyword, "'switch' expected.")?;
        self.expect(OpenParenToken, "'(' expected.")?;
        let discriminant = self.parse_expression().map(|e| self.alloc_expr(e))?;
        self.expect(CloseParenToken, "')' expected.")?;
        self.expect(OpenBraceToken, "'{' expected.")?;

        let mut cases = Vec::new();
        while !self.tokens.matches(CloseBraceToken) && !self.tokens.at_eof() {
            let case_line = self.tokens.peek().line();
            let test = if self.tokens.eat(CaseKeyword) {
                Some(self.parse_expression().map(|e| self.alloc_expr(e))?)
            } else if self.tokens.eat(DefaultKeyword) {
                None
            } else {
                self.error_here(&messages::CASE_OR_DEFAULT_EXPECTED, &[]);
                return None;
            };
            self.expect(ColonToken, "':' expected.")?;

            let mut consequent = Vec::new();
            while !matches!(
                self.tokens.peek().kind,
                CaseKeyword | DefaultKeyword | CloseBraceToken | EndOfFileToken
            ) {
                match self.parse_statement() {
                    Some(statement) => consequent.push(statement),
                    None => self.synchronize(),
                }
            }
            self.note_node();
            cases.push(SwitchCase {
                line: case_line,
                test,
                consequent: alloc_vec_in(self.arena, consequent),
            });
        }
        self.expect(CloseBraceToken, "'}' expected.")?;

        self.note_node();
        Some(Statement::Switch(SwitchStatement {
            line: keyword.line(),
            discriminant,
            cases: alloc_vec_in(self.arena, cases),
        }))
    }

    fn parse_return_statement(&mut self) -> Option<Statement<'a>> {
        let keyword = self.expect(SyntaxKind::ReturnKeyword, "'return' expected.")?;
        let argument = if self.tokens.matches(SyntaxKind::SemicolonToken) {
            None
        } else {
            Some(self.parse_expression().map(|e| self.alloc_expr(e))?)
        };
        self.expect(SyntaxKind::SemicolonToken, "';' expected.")?;
        self.note_node();
        Some(Statement::Return(ReturnStatement {
            line: keyword.line(),
            argument,
        }))
    }

    fn parse_throw_statement(&mut self) -> Option<Statement<'a>> {
        let keyword = self.expect(SyntaxKind::ThrowKeyword, "'throw' expected.")?;
        let argument = self.parse_expression().map(|e| self.alloc_expr(e))?;
        self.expect(SyntaxKind::SemicolonToken, "';' expected.")?;
        self.note_node();
        Some(Statement::Throw(ThrowStatement {
            line: keyword.line(),
            argument,
        }))
    }

    fn parse_try_statement(&mut self) -> Option<Statement<'a>> {
        let keyword = self.expect(SyntaxKind::TryKeyword, "'try' expected.")?;
        let block = self.parse_block()?;

        let handler = if self.tokens.eat(SyntaxKind::CatchKeyword) {
            let catch_line = self.tokens.peek().line();
            let param = if self.tokens.eat(SyntaxKind::OpenParenToken) {
                let param = self.expect_identifier("Catch parameter expected.")?;
                self.expect(SyntaxKind::CloseParenToken, "')' expected.")?;
                Some(param)
            } else {
                None
            };
            let body = self.parse_block()?;
            self.note_node();
            Some(CatchClause { line: catch_line, param, body })
        } else {
            None
        };

        let finalizer = if self.tokens.eat(SyntaxKind::FinallyKeyword) {
            Some(self.parse_block()?)
        } else {
            None
        };

        if handler.is_none() && finalizer.is_none() {
            self.error_here(&messages::CATCH_OR_FINALLY_EXPECTED, &[]);
        }
        self.note_node();
        Some(Statement::Try(TryStatement {
            line: keyword.line(),
            block,
            handler,
            finalizer,
        }))
    }

    fn parse_expression_statement(&mut self) -> Option<Statement<'a>> {
        let line = self.tokens.peek().line();
        let expression = self.parse_expression().map(|e| self.alloc_expr(e))?;
        self.expect(SyntaxKind::SemicolonToken, "';' expected.")?;
        self.note_node();
        Some(Statement::Expression(ExpressionStatement { line, expression }))
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn parse_expression(&mut self) -> Option<Expression<'a>> {
        self.parse_assignment_expression()
    }

    fn parse_assignment_expression(&mut self) -> Option<Expression<'a>> {
        let left = self.parse_conditional_expression()?;
        let op = self.tokens.peek().kind;
        if op.is_assignment_operator() {
            self.tokens.advance();
            // Right-associative.
            let value = self.parse_assignment_expression()?;
            let line = left.line();
            self.note_node();
            return Some(Expression::Assignment(AssignmentExpression {
                line,
                operator: op,
                target: self.alloc_expr(left),
                value: self.alloc_expr(value),
            }));
        }
        Some(left)
    }

    fn parse_conditional_expression(&mut self) -> Option<Expression<'a>> {
        let test = self.parse_binary_expression(0)?;
        if self.tokens.eat(SyntaxKind::QuestionToken) {
            let consequent = self.parse_expression()?;
            self.expect(SyntaxKind::ColonToken, "':' expected.")?;
            let alternate = self.parse_conditional_expression()?;
            let line = test.line();
            self.note_node();
            return Some(Expression::Conditional(ConditionalExpression {
                line,
                test: self.alloc_expr(test),
                consequent: self.alloc_expr(consequent),
                alternate: self.alloc_expr(alternate),
            }));
        }
        Some(test)
    }

    /// Precedence-climbing loop over the binary layers. Left-associative:
    /// the right operand requires strictly higher precedence.
    fn parse_binary_expression(&mut self, min_precedence: u8) -> Option<Expression<'a>> {
        let mut left = self.parse_unary_expression()?;
        loop {
            let op = self.tokens.peek().kind;
            let precedence = match binary_operator_precedence(op, Language::JavaScript) {
                Some(p) if (p as u8) >= min_precedence => p,
                _ => break,
            };
            self.tokens.advance();
            let right = self.parse_binary_expression(precedence.next())?;
            let line = left.line();
            self.note_node();
            left = Expression::Binary(BinaryExpression {
                line,
                operator: op,
                left: self.alloc_expr(left),
                right: self.alloc_expr(right),
            });
        }
        Some(left)
    }

    fn parse_unary_expression(&mut self) -> Option<Expression<'a>> {
        use SyntaxKind::*;
        let token = self.tokens.peek().clone();
        match token.kind {
            ExclamationToken | MinusToken | PlusToken | TypeOfKeyword | AwaitKeyword => {
                self.tokens.advance();
                let operand = self.parse_unary_expression()?;
                self.note_node();
                Some(Expression::Unary(UnaryExpression {
                    line: token.line(),
                    operator: token.kind,
                    operand: self.alloc_expr(operand),
                }))
            }
            PlusPlusToken | MinusMinusToken => {
                self.tokens.advance();
                let operand = self.parse_unary_expression()?;
                self.note_node();
                Some(Expression::Update(UpdateExpression {
                    line: token.line(),
                    operator: token.kind,
                    prefix: true,
                    operand: self.alloc_expr(operand),
                }))
            }
            _ => self.parse_postfix_expression(),
        }
    }

    /// Primary plus its postfix chain: member access, calls, indexing,
    /// and the postfix update operators.
    fn parse_postfix_expression(&mut self) -> Option<Expression<'a>> {
        use SyntaxKind::*;
        let mut expr = self.parse_primary_expression()?;
        loop {
            match self.tokens.peek().kind {
                DotToken => {
                    self.tokens.advance();
                    let property = self.expect_identifier("Property name expected.")?;
                    let line = expr.line();
                    self.note_node();
                    expr = Expression::Member(MemberExpression {
                        line,
                        object: self.alloc_expr(expr),
                        property,
                    });
                }
                OpenParenToken => {
                    let arguments = self.parse_arguments()?;
                    let line = expr.line();
                    self.note_node();
                    expr = Expression::Call(CallExpression {
                        line,
                        callee: self.alloc_expr(expr),
                        arguments,
                    });
                }
                OpenBracketToken => {
                    self.tokens.advance();
                    let index = self.parse_expression()?;
                    self.expect(CloseBracketToken, "']' expected.")?;
                    let line = expr.line();
                    self.note_node();
                    expr = Expression::Index(IndexExpression {
                        line,
                        object: self.alloc_expr(expr),
                        index: self.alloc_expr(index),
                    });
                }
                PlusPlusToken | MinusMinusToken => {
                    let op = self.tokens.peek().kind;
                    self.tokens.advance();
                    let line = expr.line();
                    self.note_node();
                    expr = Expression::Update(UpdateExpression {
                        line,
                        operator: op,
                        prefix: false,
                        operand: self.alloc_expr(expr),
                    });
                }
                _ => break,
            }
        }
        Some(expr)
    }

    fn parse_arguments(&mut self) -> Option<&'a [Expression<'a>]> {
        self.expect(SyntaxKind::OpenParenToken, "'(' expected.")?;
        let mut arguments = Vec::new();
        if !self.tokens.matches(SyntaxKind::CloseParenToken) {
            loop {
                arguments.push(self.parse_expression()?);
                if !self.tokens.eat(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::CloseParenToken, "')' expected.")?;
        Some(alloc_vec_in(self.arena, arguments))
    }

    fn parse_primary_expression(&mut self) -> Option<Expression<'a>> {
        use SyntaxKind::*;
        let token = self.tokens.peek().clone();
        match token.kind {
            Identifier => {
                self.tokens.advance();
                Some(Expression::Identifier(self.make_identifier(&token)))
            }
            NumericLiteral => {
                self.tokens.advance();
                self.note_node();
                Some(Expression::Literal(Literal {
                    line: token.line(),
                    value: LiteralValue::Number(self.intern(&token.text)),
                }))
            }
            StringLiteral => {
                self.tokens.advance();
                let decoded = decode_string_literal(&token.text);
                self.note_node();
                Some(Expression::Literal(Literal {
                    line: token.line(),
                    value: LiteralValue::String(self.intern(&decoded)),
                }))
            }
            TrueKeyword | FalseKeyword => {
                self.tokens.advance();
                self.note_node();
                Some(Expression::Literal(Literal {
                    line: token.line(),
                    value: LiteralValue::Boolean(token.kind == TrueKeyword),
                }))
            }
            NullKeyword => {
                self.tokens.advance();
                self.note_node();
                Some(Expression::Literal(Literal {
                    line: token.line(),
                    value: LiteralValue::Null,
                }))
            }
            UndefinedKeyword => {
                self.tokens.advance();
                self.note_node();
                Some(Expression::Identifier(js_ident(token.line(), "undefined")))
            }
            SuperKeyword => {
                self.tokens.advance();
                self.note_node();
                Some(Expression::Identifier(js_ident(token.line(), "super")))
            }
            ThisKeyword => {
                self.tokens.advance();
                self.note_node();
                Some(Expression::This(ThisExpression { line: token.line() }))
            }
            NewKeyword => self.parse_new_expression(),
            OpenParenToken => {
                self.tokens.advance();
                let inner = self.parse_expression()?;
                self.expect(CloseParenToken, "')' expected.")?;
                Some(inner)
            }
            OpenBracketToken => self.parse_array_literal(),
            OpenBraceToken => self.parse_object_literal(),
            Unknown => {
                self.error_here(&messages::UNRECOGNIZED_CHARACTER_0, &[&token.text]);
                self.tokens.advance();
                None
            }
            _ => {
                self.error_here(&messages::EXPRESSION_EXPECTED, &[]);
                None
            }
        }
    }

    fn parse_new_expression(&mut self) -> Option<Expression<'a>> {
        let keyword = self.expect(SyntaxKind::NewKeyword, "'new' expected.")?;
        let mut callee = {
            let id = self.expect_identifier("Constructor name expected.")?;
            Expression::Identifier(id)
        };
        while self.tokens.eat(SyntaxKind::DotToken) {
            let property = self.expect_identifier("Property name expected.")?;
            let line = callee.line();
            self.note_node();
            callee = Expression::Member(MemberExpression {
                line,
                object: self.alloc_expr(callee),
                property,
            });
        }
        let arguments = if self.tokens.matches(SyntaxKind::OpenParenToken) {
            self.parse_arguments()?
        } else {
            &[]
        };
        self.note_node();
        Some(Expression::New(NewExpression {
            line: keyword.line(),
            callee: self.alloc_expr(callee),
            arguments,
        }))
    }

    fn parse_array_literal(&mut self) -> Option<Expression<'a>> {
        let open = self.expect(SyntaxKind::OpenBracketToken, "'[' expected.")?;
        let mut elements = Vec::new();
        if !self.tokens.matches(SyntaxKind::CloseBracketToken) {
            loop {
                elements.push(self.parse_expression()?);
                if !self.tokens.eat(SyntaxKind::CommaToken) {
                    break;
                }
                if self.tokens.matches(SyntaxKind::CloseBracketToken) {
                    break; // trailing comma
                }
            }
        }
        self.expect(SyntaxKind::CloseBracketToken, "']' expected.")?;
        self.note_node();
        Some(Expression::Array(ArrayExpression {
            line: open.line(),
            elements: alloc_vec_in(self.arena, elements),
        }))
    }

    fn parse_object_literal(&mut self) -> Option<Expression<'a>> {
        let open = self.expect(SyntaxKind::OpenBraceToken, "'{' expected.")?;
        let mut properties = Vec::new();
        if !self.tokens.matches(SyntaxKind::CloseBraceToken) {
            loop {
                let key_token = self.tokens.peek().clone();
                let key = match key_token.kind {
                    SyntaxKind::Identifier => {
                        self.tokens.advance();
                        self.intern(&key_token.text)
                    }
                    SyntaxKind::StringLiteral => {
                        self.tokens.advance();
                        self.intern(&decode_string_literal(&key_token.text))
                    }
                    _ => {
                        self.error_here(&messages::IDENTIFIER_EXPECTED, &[]);
                        return None;
                    }
                };
                self.expect(SyntaxKind::ColonToken, "':' expected.")?;
                let value = self.parse_expression()?;
                self.note_node();
                properties.push(Property {
                    line: key_token.line(),
                    key,
                    value: self.alloc_expr(value),
                });
                if !self.tokens.eat(SyntaxKind::CommaToken) {
                    break;
                }
                if self.tokens.matches(SyntaxKind::CloseBraceToken) {
                    break; // trailing comma
                }
            }
        }
        self.expect(SyntaxKind::CloseBraceToken, "'}' expected.")?;
        self.note_node();
        Some(Expression::Object(ObjectExpression {
            line: open.line(),
            properties: alloc_vec_in(self.arena, properties),
        }))
    }
}

fn js_ident(line: u32, name: &'static str) -> Identifier<'static> {
    Identifier { line, name }
}
