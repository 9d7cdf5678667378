//! The C# recursive-descent parser.

use bumpalo::Bump;
use janus_ast::cs::*;
use janus_ast::types::{LiteralValue, ModifierFlags};
use janus_ast::SyntaxKind;
use janus_core::Language;
use janus_diagnostics::{messages, Diagnostic};
use janus_metrics::MetricsSink;
use janus_scanner::{Token, TokenStream};
use std::time::Instant;

use crate::precedence::binary_operator_precedence;
use crate::{alloc_vec_in, decode_string_literal};

/// Tokens that may begin a statement or declaration; panic-mode recovery
/// stops here.
fn is_statement_start(kind: SyntaxKind) -> bool {
    use SyntaxKind::*;
    kind.is_modifier()
        || kind.is_predefined_type()
        || matches!(
            kind,
            UsingKeyword
                | NamespaceKeyword
                | ClassKeyword
                | StructKeyword
                | InterfaceKeyword
                | EnumKeyword
                | VarKeyword
                | IfKeyword
                | WhileKeyword
                | DoKeyword
                | ForKeyword
                | ForeachKeyword
                | SwitchKeyword
                | ReturnKeyword
                | ThrowKeyword
                | BreakKeyword
                | ContinueKeyword
                | TryKeyword
                | OpenBraceToken
        )
}

fn modifier_flag(kind: SyntaxKind) -> ModifierFlags {
    use SyntaxKind::*;
    match kind {
        PublicKeyword => ModifierFlags::PUBLIC,
        PrivateKeyword => ModifierFlags::PRIVATE,
        ProtectedKeyword => ModifierFlags::PROTECTED,
        InternalKeyword => ModifierFlags::INTERNAL,
        StaticKeyword => ModifierFlags::STATIC,
        ReadonlyKeyword => ModifierFlags::READONLY,
        ConstKeyword => ModifierFlags::CONST,
        VirtualKeyword => ModifierFlags::VIRTUAL,
        OverrideKeyword => ModifierFlags::OVERRIDE,
        AbstractKeyword => ModifierFlags::ABSTRACT,
        SealedKeyword => ModifierFlags::SEALED,
        PartialKeyword => ModifierFlags::PARTIAL,
        AsyncKeyword => ModifierFlags::ASYNC,
        _ => ModifierFlags::NONE,
    }
}

/// Parses a token stream into a [`CompilationUnit`], counting nodes and
/// recording diagnostics in the metrics sink as it goes.
pub struct Parser<'a, 'm> {
    arena: &'a Bump,
    tokens: TokenStream,
    metrics: &'m mut MetricsSink,
}

impl<'a, 'm> Parser<'a, 'm> {
    pub fn new(arena: &'a Bump, tokens: TokenStream, metrics: &'m mut MetricsSink) -> Self {
        Self { arena, tokens, metrics }
    }

    pub fn parse_compilation_unit(mut self) -> CompilationUnit<'a> {
        let started = Instant::now();
        self.metrics.tokens_processed = self.tokens.token_count() as u64;

        let mut usings = Vec::new();
        while self.tokens.matches(SyntaxKind::UsingKeyword) {
            match self.parse_using_directive() {
                Some(directive) => usings.push(directive),
                None => self.synchronize(),
            }
        }

        let members = self.parse_statements(false);
        self.note_node();
        let unit = CompilationUnit {
            line: 1,
            usings: alloc_vec_in(self.arena, usings),
            members,
        };

        self.metrics.parsing_time_ms = started.elapsed().as_secs_f64() * 1000.0;
        unit
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
    // Using directives, namespaces, type declarations
    // ========================================================================

    fn parse_using_directive(&mut self) -> Option<UsingDirective<'a>> {
        let keyword = self.expect(SyntaxKind::UsingKeyword, "'using' expected.")?;
        let name = self.parse_qualified_name()?;
        self.expect(SyntaxKind::SemicolonToken, "';' expected.")?;
        self.note_node();
        Some(UsingDirective { line: keyword.line(), name })
    }

    fn parse_qualified_name(&mut self) -> Option<QualifiedName<'a>> {
        let first = self.expect_identifier("Identifier expected.")?;
        let line = first.line;
        let mut parts = vec![first];
        while self.tokens.eat(SyntaxKind::DotToken) {
            parts.push(self.expect_identifier("Identifier expected.")?);
        }
        self.note_node();
        Some(QualifiedName {
            line,
            parts: alloc_vec_in(self.arena, parts),
        })
    }

    fn parse_namespace_declaration(&mut self) -> Option<Statement<'a>> {
        let keyword = self.expect(SyntaxKind::NamespaceKeyword, "'namespace' expected.")?;
        let name = self.parse_qualified_name()?;
        self.expect(SyntaxKind::OpenBraceToken, "'{' expected.")?;
        let members = self.parse_statements(true);
        self.expect(SyntaxKind::CloseBraceToken, "'}' expected.")?;
        self.note_node();
        Some(Statement::Namespace(NamespaceDeclaration {
            line: keyword.line(),
            name,
            members,
        }))
    }

    fn parse_modifiers(&mut self) -> ModifierFlags {
        let mut modifiers = ModifierFlags::NONE;
        while self.tokens.peek().kind.is_modifier() {
            // `const` only acts as a modifier when a type declaration
            // follows; a lone `const` never does in this subset, so the
            // run simply accumulates.
            modifiers |= modifier_flag(self.tokens.peek().kind);
            self.tokens.advance();
        }
        modifiers
    }

    fn parse_type_declaration(&mut self) -> Option<Statement<'a>> {
        use SyntaxKind::*;
        let line = self.tokens.peek().line();
        let modifiers = self.parse_modifiers();
        match self.tokens.peek().kind {
            ClassKeyword => self.parse_class_like(line, modifiers, ClassKeyword),
            StructKeyword => self.parse_class_like(line, modifiers, StructKeyword),
            InterfaceKeyword => self.parse_class_like(line, modifiers, InterfaceKeyword),
            EnumKeyword => self.parse_enum_declaration(line, modifiers),
            _ => {
                self.error_here(&messages::DECLARATION_EXPECTED, &[]);
                None
            }
        }
    }

    /// Classes, structs, and interfaces share the same head grammar:
    /// identifier, type parameters, base list, constraints, member block.
    fn parse_class_like(
        &mut self,
        line: u32,
        modifiers: ModifierFlags,
        keyword: SyntaxKind,
    ) -> Option<Statement<'a>> {
        self.tokens.advance(); // class | struct | interface
        let identifier = self.expect_identifier("Type name expected.")?;
        let type_parameters = self.parse_type_parameters()?;
        let base_types = self.parse_base_list()?;
        let constraints = self.parse_where_clauses()?;

        self.expect(SyntaxKind::OpenBraceToken, "'{' expected.")?;
        let mut members = Vec::new();
        while !self.tokens.matches(SyntaxKind::CloseBraceToken) && !self.tokens.at_eof() {
            if self.tokens.eat(SyntaxKind::SemicolonToken) {
                continue;
            }
            match self.parse_member() {
                Some(member) => members.push(member),
                None => self.synchronize(),
            }
        }
        self.expect(SyntaxKind::CloseBraceToken, "'}' expected.")?;
        self.tokens.eat(SyntaxKind::SemicolonToken);

        let members = alloc_vec_in(self.arena, members);
        self.note_node();
        Some(match keyword {
            SyntaxKind::ClassKeyword => Statement::Class(ClassDeclaration {
                line,
                modifiers,
                identifier,
                type_parameters,
                base_types,
                constraints,
                members,
            }),
            SyntaxKind::StructKeyword => Statement::Struct(StructDeclaration {
                line,
                modifiers,
                identifier,
                type_parameters,
                base_types,
                constraints,
                members,
            }),
            _ => Statement::Interface(InterfaceDeclaration {
                line,
                modifiers,
                identifier,
                type_parameters,
                base_types,
                constraints,
                members,
            }),
        })
    }

    fn parse_enum_declaration(
        &mut self,
        line: u32,
        modifiers: ModifierFlags,
    ) -> Option<Statement<'a>> {
        self.expect(SyntaxKind::EnumKeyword, "'enum' expected.")?;
        let identifier = self.expect_identifier("Enum name expected.")?;
        self.expect(SyntaxKind::OpenBraceToken, "'{' expected.")?;

        let mut members = Vec::new();
        while !self.tokens.matches(SyntaxKind::CloseBraceToken) && !self.tokens.at_eof() {
            let member_id = self.expect_identifier("Enum member expected.")?;
            let value = if self.tokens.eat(SyntaxKind::EqualsToken) {
                Some(self.parse_expression().map(|e| self.alloc_expr(e))?)
            } else {
                None
            };
            self.note_node();
            members.push(EnumMember {
                line: member_id.line,
                identifier: member_id,
                value,
            });
            if !self.tokens.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::CloseBraceToken, "'}' expected.")?;
        self.tokens.eat(SyntaxKind::SemicolonToken);

        self.note_node();
        Some(Statement::Enum(EnumDeclaration {
            line,
            modifiers,
            identifier,
            members: alloc_vec_in(self.arena, members),
        }))
    }

    fn parse_type_parameters(&mut self) -> Option<&'a [TypeParameter<'a>]> {
        if !self.tokens.eat(SyntaxKind::LessThanToken) {
            return Some(&[]);
        }
        let mut parameters = Vec::new();
        loop {
            let identifier = self.expect_identifier("Type parameter expected.")?;
            self.note_node();
            parameters.push(TypeParameter {
                line: identifier.line,
                identifier,
            });
            if !self.tokens.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        self.expect(SyntaxKind::GreaterThanToken, "'>' expected.")?;
        Some(alloc_vec_in(self.arena, parameters))
    }

    fn parse_base_list(&mut self) -> Option<&'a [NamedType<'a>]> {
        if !self.tokens.eat(SyntaxKind::ColonToken) {
            return Some(&[]);
        }
        let mut bases = Vec::new();
        loop {
            bases.push(self.parse_type()?);
            if !self.tokens.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        Some(alloc_vec_in(self.arena, bases))
    }

    fn parse_where_clauses(&mut self) -> Option<&'a [WhereClause<'a>]> {
        let mut clauses = Vec::new();
        while self.tokens.matches(SyntaxKind::WhereKeyword) {
            let keyword = self.tokens.peek().clone();
            self.tokens.advance();
            let parameter = self.expect_identifier("Type parameter expected.")?;
            self.expect(SyntaxKind::ColonToken, "':' expected.")?;
            let mut bounds = Vec::new();
            loop {
                bounds.push(self.parse_type()?);
                if !self.tokens.eat(SyntaxKind::CommaToken) {
                    break;
                }
            }
            self.note_node();
            clauses.push(WhereClause {
                line: keyword.line(),
                parameter,
                bounds: alloc_vec_in(self.arena, bounds),
            });
        }
        Some(alloc_vec_in(self.arena, clauses))
    }

    // ========================================================================
    // Type members
    // ========================================================================

    /// Member dispatch: `event` starts an event; an identifier directly
    /// followed by `(` is a constructor; everything else is a method or
    /// property beginning with a type, told apart by what follows the
    /// member name (`(` vs `{`).
    fn parse_member(&mut self) -> Option<Member<'a>> {
        let line = self.tokens.peek().line();
        let modifiers = self.parse_modifiers();

        if self.tokens.matches(SyntaxKind::EventKeyword) {
            return self.parse_event_declaration(line, modifiers);
        }

        if self.tokens.matches(SyntaxKind::Identifier)
            && self.tokens.peek_ahead(1).kind == SyntaxKind::OpenParenToken
        {
            return self.parse_constructor_declaration(line, modifiers);
        }

        let member_type = self.parse_type()?;
        let identifier = self.expect_identifier("Member name expected.")?;

        if self.tokens.matches(SyntaxKind::OpenBraceToken) {
            return self.parse_property_declaration(line, modifiers, member_type, identifier);
        }
        self.parse_method_declaration(line, modifiers, member_type, identifier)
    }

    fn parse_event_declaration(
        &mut self,
        line: u32,
        modifiers: ModifierFlags,
    ) -> Option<Member<'a>> {
        self.expect(SyntaxKind::EventKeyword, "'event' expected.")?;
        let event_type = self.parse_type()?;
        let identifier = self.expect_identifier("Event name expected.")?;
        self.expect(SyntaxKind::SemicolonToken, "';' expected.")?;
        self.note_node();
        Some(Member::Event(EventDeclaration {
            line,
            modifiers,
            event_type,
            identifier,
        }))
    }

    fn parse_constructor_declaration(
        &mut self,
        line: u32,
        modifiers: ModifierFlags,
    ) -> Option<Member<'a>> {
        let identifier = self.expect_identifier("Constructor name expected.")?;
        let parameters = self.parse_parameters()?;
        let body = self.parse_block()?;
        self.note_node();
        Some(Member::Constructor(ConstructorDeclaration {
            line,
            modifiers,
            identifier,
            parameters,
            body,
        }))
    }

    fn parse_property_declaration(
        &mut self,
        line: u32,
        modifiers: ModifierFlags,
        property_type: NamedType<'a>,
        identifier: Identifier<'a>,
    ) -> Option<Member<'a>> {
        self.expect(SyntaxKind::OpenBraceToken, "'{' expected.")?;
        let mut accessors = Vec::new();
        while !self.tokens.matches(SyntaxKind::CloseBraceToken) && !self.tokens.at_eof() {
            let token = self.tokens.peek().clone();
            let kind = match token.kind {
                SyntaxKind::GetKeyword => AccessorKind::Get,
                SyntaxKind::SetKeyword => AccessorKind::Set,
                _ => {
                    self.error_here(&messages::_0_EXPECTED, &["get' or 'set"]);
                    return None;
                }
            };
            self.tokens.advance();
            let body = if self.tokens.eat(SyntaxKind::SemicolonToken) {
                None
            } else {
                Some(self.parse_block()?)
            };
            self.note_node();
            accessors.push(Accessor {
                line: token.line(),
                kind,
                body,
            });
        }
        self.expect(SyntaxKind::CloseBraceToken, "'}' expected.")?;
        self.note_node();
        Some(Member::Property(PropertyDeclaration {
            line,
            modifiers,
            property_type,
            identifier,
            accessors: alloc_vec_in(self.arena, accessors),
        }))
    }

    fn parse_method_declaration(
        &mut self,
        line: u32,
        modifiers: ModifierFlags,
        return_type: NamedType<'a>,
        identifier: Identifier<'a>,
    ) -> Option<Member<'a>> {
        let type_parameters = self.parse_type_parameters()?;
        let parameters = self.parse_parameters()?;
        let constraints = self.parse_where_clauses()?;
        let body = if self.tokens.eat(SyntaxKind::SemicolonToken) {
            None
        } else {
            Some(self.parse_block()?)
        };
        self.note_node();
        Some(Member::Method(MethodDeclaration {
            line,
            modifiers,
            return_type,
            identifier,
            type_parameters,
            parameters,
            constraints,
            body,
        }))
    }

    fn parse_parameters(&mut self) -> Option<&'a [Parameter<'a>]> {
        self.expect(SyntaxKind::OpenParenToken, "'(' expected.")?;
        let mut parameters = Vec::new();
        if !self.tokens.matches(SyntaxKind::CloseParenToken) {
            loop {
                let line = self.tokens.peek().line();
                let modifier = match self.tokens.peek().kind {
                    SyntaxKind::RefKeyword => {
                        self.tokens.advance();
                        Some(ParameterModifier::Ref)
                    }
                    SyntaxKind::OutKeyword => {
                        self.tokens.advance();
                        Some(ParameterModifier::Out)
                    }
                    SyntaxKind::ParamsKeyword => {
                        self.tokens.advance();
                        Some(ParameterModifier::Params)
                    }
                    _ => None,
                };
                let parameter_type = self.parse_type()?;
                let identifier = self.expect_identifier("Parameter name expected.")?;
                let default_value = if self.tokens.eat(SyntaxKind::EqualsToken) {
                    Some(self.parse_expression().map(|e| self.alloc_expr(e))?)
                } else {
                    None
                };
                self.note_node();
                parameters.push(Parameter {
                    line,
                    modifier,
                    parameter_type,
                    identifier,
                    default_value,
                });
                if !self.tokens.eat(SyntaxKind::CommaToken) {
                    break;
                }
            }
        }
        self.expect(SyntaxKind::CloseParenToken, "')' expected.")?;
        Some(alloc_vec_in(self.arena, parameters))
    }

    // ========================================================================
    // Types
    // ========================================================================

    fn parse_type(&mut self) -> Option<NamedType<'a>> {
        let token = self.tokens.peek().clone();
        let mut named_type = if token.kind.is_predefined_type() {
            self.tokens.advance();
            let text = token.kind.text().unwrap_or_default();
            self.note_node();
            let part = Identifier { line: token.line(), name: text };
            self.note_node();
            let name = QualifiedName {
                line: token.line(),
                parts: alloc_vec_in(self.arena, vec![part]),
            };
            self.note_node();
            NamedType {
                line: token.line(),
                name,
                type_arguments: &[],
                is_array: false,
            }
        } else {
            if !self.tokens.matches(SyntaxKind::Identifier) {
                self.error_here(&messages::TYPE_EXPECTED, &[]);
                return None;
            }
            let name = self.parse_qualified_name()?;
            let type_arguments = self.parse_type_arguments()?;
            self.note_node();
            NamedType {
                line: name.line,
                name,
                type_arguments,
                is_array: false,
            }
        };
        while self.tokens.matches(SyntaxKind::OpenBracketToken)
            && self.tokens.peek_ahead(1).kind == SyntaxKind::CloseBracketToken
        {
            self.tokens.advance();
            self.tokens.advance();
            named_type.is_array = true;
        }
        Some(named_type)
    }

    fn parse_type_arguments(&mut self) -> Option<&'a [NamedType<'a>]> {
        if !self.tokens.eat(SyntaxKind::LessThanToken) {
            return Some(&[]);
        }
        let mut arguments = Vec::new();
        loop {
            arguments.push(self.parse_type()?);
            if !self.tokens.eat(SyntaxKind::CommaToken) {
                break;
            }
        }
        // A nested closer may arrive glued together as `>>`.
        if self.tokens.matches(SyntaxKind::GreaterThanGreaterThanToken) {
            self.tokens.split_right_shift();
        } else {
            self.expect(SyntaxKind::GreaterThanToken, "'>' expected.")?;
        }
        Some(alloc_vec_in(self.arena, arguments))
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
        let kind = self.tokens.peek().kind;
        match kind {
            NamespaceKeyword => self.parse_namespace_declaration(),
            ClassKeyword | StructKeyword | InterfaceKeyword | EnumKeyword => {
                self.parse_type_declaration()
            }
            k if k.is_modifier() => self.parse_type_declaration(),
            VarKeyword => self.parse_var_declaration_statement(),
            k if k.is_predefined_type() && k != VoidKeyword => {
                self.parse_typed_declaration_statement()
            }
            IfKeyword => self.parse_if_statement(),
            WhileKeyword => self.parse_while_statement(),
            DoKeyword => self.parse_do_while_statement(),
            ForKeyword => self.parse_for_statement(),
            ForeachKeyword => self.parse_foreach_statement(),
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

    fn parse_var_declaration_statement(&mut self) -> Option<Statement<'a>> {
        let declaration = self.parse_var_declaration()?;
        self.expect(SyntaxKind::SemicolonToken, "';' expected.")?;
        Some(Statement::LocalDeclaration(declaration))
    }

    /// `var name = init` without its terminating `;`, shared with `for`.
    fn parse_var_declaration(&mut self) -> Option<LocalDeclaration<'a>> {
        let keyword = self.expect(SyntaxKind::VarKeyword, "'var' expected.")?;
        let identifier = self.expect_identifier("Variable name expected.")?;
        let initializer = if self.tokens.eat(SyntaxKind::EqualsToken) {
            Some(self.parse_expression().map(|e| self.alloc_expr(e))?)
        } else {
            None
        };
        self.note_node();
        Some(LocalDeclaration {
            line: keyword.line(),
            declared_type: None,
            identifier,
            initializer,
        })
    }

    /// `int x = 1;` — a local declaration led by a predefined type.
    fn parse_typed_declaration_statement(&mut self) -> Option<Statement<'a>> {
        let line = self.tokens.peek().line();
        let declared_type = self.parse_type()?;
        let identifier = self.expect_identifier("Variable name expected.")?;
        let initializer = if self.tokens.eat(SyntaxKind::EqualsToken) {
            Some(self.parse_expression().map(|e| self.alloc_expr(e))?)
        } else {
            None
        };
        self.expect(SyntaxKind::SemicolonToken, "';' expected.")?;
        self.note_node();
        Some(Statement::LocalDeclaration(LocalDeclaration {
            line,
            declared_type: Some(declared_type),
            identifier,
            initializer,
        }))
    }

    fn parse_if_statement(&mut self) -> Option<Statement<'a>> {
        let keyword = self.expect(SyntaxKind::IfKeyword, "'if' expected.")?;
        self.expect(SyntaxKind::OpenParenToken, "'(' expected.")?;
        let condition = self.parse_expression().map(|e| self.alloc_expr(e))?;
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
            condition,
            consequent,
            alternate,
        }))
    }

    fn parse_while_statement(&mut self) -> Option<Statement<'a>> {
        let keyword = self.expect(SyntaxKind::WhileKeyword, "'while' expected.")?;
        self.expect(SyntaxKind::OpenParenToken, "'(' expected.")?;
        let condition = self.parse_expression().map(|e| self.alloc_expr(e))?;
        self.expect(SyntaxKind::CloseParenToken, "')' expected.")?;
        let body = self.parse_statement().map(|s| self.alloc_stmt(s))?;
        self.note_node();
        Some(Statement::While(WhileStatement {
            line: keyword.line(),
            condition,
            body,
        }))
    }

    fn parse_do_while_statement(&mut self) -> Option<Statement<'a>> {
        let keyword = self.expect(SyntaxKind::DoKeyword, "'do' expected.")?;
        let body = self.parse_statement().map(|s| self.alloc_stmt(s))?;
        self.expect(SyntaxKind::WhileKeyword, "'while' expected.")?;
        self.expect(SyntaxKind::OpenParenToken, "'(' expected.")?;
        let condition = self.parse_expression().map(|e| self.alloc_expr(e))?;
        self.expect(SyntaxKind::CloseParenToken, "')' expected.")?;
        self.expect(SyntaxKind::SemicolonToken, "';' expected.")?;
        self.note_node();
        Some(Statement::DoWhile(DoWhileStatement {
            line: keyword.line(),
            body,
            condition,
        }))
    }

    fn parse_for_statement(&mut self) -> Option<Statement<'a>> {
        use SyntaxKind::*;
        let keyword = self.expect(ForKeyword, "'for' expected.")?;
        self.expect(OpenParenToken, "'(' expected.")?;

        let init = if self.tokens.matches(SemicolonToken) {
            None
        } else if self.tokens.matches(VarKeyword) {
            Some(ForInit::LocalDeclaration(self.parse_var_declaration()?))
        } else if self.tokens.peek().kind.is_predefined_type() {
            let line = self.tokens.peek().line();
            let declared_type = self.parse_type()?;
            let identifier = self.expect_identifier("Variable name expected.")?;
            let initializer = if self.tokens.eat(EqualsToken) {
                Some(self.parse_expression().map(|e| self.alloc_expr(e))?)
            } else {
                None
            };
            self.note_node();
            Some(ForInit::LocalDeclaration(LocalDeclaration {
                line,
                declared_type: Some(declared_type),
                identifier,
                initializer,
            }))
        } else {
            Some(ForInit::Expression(
                self.parse_expression().map(|e| self.alloc_expr(e))?,
            ))
        };
        self.expect(SemicolonToken, "';' expected.")?;

        let condition = if self.tokens.matches(SemicolonToken) {
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
            condition,
            update,
            body,
        }))
    }

    fn parse_foreach_statement(&mut self) -> Option<Statement<'a>> {
        let keyword = self.expect(SyntaxKind::ForeachKeyword, "'foreach' expected.")?;
        self.expect(SyntaxKind::OpenParenToken, "'(' expected.")?;
        let element_type = if self.tokens.eat(SyntaxKind::VarKeyword) {
            None
        } else {
            Some(self.parse_type()?)
        };
        let identifier = self.expect_identifier("Variable name expected.")?;
        self.expect(SyntaxKind::InKeyword, "'in' expected.")?;
        let collection = self.parse_expression().map(|e| self.alloc_expr(e))?;
        self.expect(SyntaxKind::CloseParenToken, "')' expected.")?;
        let body = self.parse_statement().map(|s| self.alloc_stmt(s))?;
        self.note_node();
        Some(Statement::Foreach(ForeachStatement {
            line: keyword.line(),
            element_type,
            identifier,
            collection,
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

        let mut sections = Vec::new();
        while !self.tokens.matches(CloseBraceToken) && !self.tokens.at_eof() {
            let section_line = self.tokens.peek().line();
            let mut labels = Vec::new();
            loop {
                let label_line = self.tokens.peek().line();
                if self.tokens.eat(CaseKeyword) {
                    let value = self.parse_expression().map(|e| self.alloc_expr(e))?;
                    self.expect(ColonToken, "':' expected.")?;
                    self.note_node();
                    labels.push(SwitchLabel { line: label_line, value: Some(value) });
                } else if self.tokens.eat(DefaultKeyword) {
                    self.expect(ColonToken, "':' expected.")?;
                    self.note_node();
                    labels.push(SwitchLabel { line: label_line, value: None });
                } else {
                    break;
                }
            }
            if labels.is_empty() {
                self.error_here(&messages::CASE_OR_DEFAULT_EXPECTED, &[]);
                return None;
            }

            let mut statements = Vec::new();
            while !matches!(
                self.tokens.peek().kind,
                CaseKeyword | DefaultKeyword | CloseBraceToken | EndOfFileToken
            ) {
                match self.parse_statement() {
                    Some(statement) => statements.push(statement),
                    None => self.synchronize(),
                }
            }
            self.note_node();
            sections.push(SwitchSection {
                line: section_line,
                labels: alloc_vec_in(self.arena, labels),
                statements: alloc_vec_in(self.arena, statements),
            });
        }
        self.expect(CloseBraceToken, "'}' expected.")?;

        self.note_node();
        Some(Statement::Switch(SwitchStatement {
            line: keyword.line(),
            discriminant,
            sections: alloc_vec_in(self.arena, sections),
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
        let argument = if self.tokens.matches(SyntaxKind::SemicolonToken) {
            None
        } else {
            Some(self.parse_expression().map(|e| self.alloc_expr(e))?)
        };
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

        let mut catches = Vec::new();
        while self.tokens.matches(SyntaxKind::CatchKeyword) {
            let catch_line = self.tokens.peek().line();
            self.tokens.advance();
            let (exception_type, identifier) = if self.tokens.eat(SyntaxKind::OpenParenToken) {
                let exception_type = self.parse_type()?;
                let identifier = if self.tokens.matches(SyntaxKind::Identifier) {
                    Some(self.expect_identifier("Identifier expected.")?)
                } else {
                    None
                };
                self.expect(SyntaxKind::CloseParenToken, "')' expected.")?;
                (Some(exception_type), identifier)
            } else {
                (None, None)
            };
            let body = self.parse_block()?;
            self.note_node();
            catches.push(CatchClause {
                line: catch_line,
                exception_type,
                identifier,
                body,
            });
        }

        let finally = if self.tokens.eat(SyntaxKind::FinallyKeyword) {
            Some(self.parse_block()?)
        } else {
            None
        };

        if catches.is_empty() && finally.is_none() {
            self.error_here(&messages::CATCH_OR_FINALLY_EXPECTED, &[]);
        }
        self.note_node();
        Some(Statement::Try(TryStatement {
            line: keyword.line(),
            block,
            catches: alloc_vec_in(self.arena, catches),
            finally,
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
        let condition = self.parse_binary_expression(0)?;
        if self.tokens.eat(SyntaxKind::QuestionToken) {
            let consequent = self.parse_expression()?;
            self.expect(SyntaxKind::ColonToken, "':' expected.")?;
            let alternate = self.parse_conditional_expression()?;
            let line = condition.line();
            self.note_node();
            return Some(Expression::Conditional(ConditionalExpression {
                line,
                condition: self.alloc_expr(condition),
                consequent: self.alloc_expr(consequent),
                alternate: self.alloc_expr(alternate),
            }));
        }
        Some(condition)
    }

    /// Precedence-climbing loop over the binary layers. Left-associative:
    /// the right operand requires strictly higher precedence.
    fn parse_binary_expression(&mut self, min_precedence: u8) -> Option<Expression<'a>> {
        let mut left = self.parse_unary_expression()?;
        loop {
            let op = self.tokens.peek().kind;
            let precedence = match binary_operator_precedence(op, Language::CSharp) {
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
            ExclamationToken | MinusToken | PlusToken | TildeToken => {
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

    fn parse_postfix_expression(&mut self) -> Option<Expression<'a>> {
        use SyntaxKind::*;
        let mut expr = self.parse_primary_expression()?;
        loop {
            match self.tokens.peek().kind {
                DotToken => {
                    self.tokens.advance();
                    let member = self.expect_identifier("Member name expected.")?;
                    let line = expr.line();
                    self.note_node();
                    expr = Expression::MemberAccess(MemberAccessExpression {
                        line,
                        object: self.alloc_expr(expr),
                        member,
                    });
                }
                OpenParenToken => {
                    let arguments = self.parse_arguments()?;
                    let line = expr.line();
                    self.note_node();
                    expr = Expression::Invocation(InvocationExpression {
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
                    expr = Expression::ElementAccess(ElementAccessExpression {
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
            ThisKeyword => {
                self.tokens.advance();
                self.note_node();
                Some(Expression::This(ThisExpression { line: token.line() }))
            }
            BaseKeyword => {
                self.tokens.advance();
                self.note_node();
                Some(Expression::Base(BaseExpression { line: token.line() }))
            }
            NewKeyword => self.parse_new_expression(),
            OpenParenToken => {
                self.tokens.advance();
                let inner = self.parse_expression()?;
                self.expect(CloseParenToken, "')' expected.")?;
                Some(inner)
            }
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

    /// `new T(args)`, `new[] { … }`, or `new { Name = value, … }`.
    fn parse_new_expression(&mut self) -> Option<Expression<'a>> {
        use SyntaxKind::*;
        let keyword = self.expect(NewKeyword, "'new' expected.")?;

        if self.tokens.eat(OpenBracketToken) {
            self.expect(CloseBracketToken, "']' expected.")?;
            self.expect(OpenBraceToken, "'{' expected.")?;
            let mut elements = Vec::new();
            if !self.tokens.matches(CloseBraceToken) {
                loop {
                    elements.push(self.parse_expression()?);
                    if !self.tokens.eat(CommaToken) {
                        break;
                    }
                    if self.tokens.matches(CloseBraceToken) {
                        break; // trailing comma
                    }
                }
            }
            self.expect(CloseBraceToken, "'}' expected.")?;
            self.note_node();
            return Some(Expression::ArrayCreation(ArrayCreationExpression {
                line: keyword.line(),
                elements: alloc_vec_in(self.arena, elements),
            }));
        }

        if self.tokens.eat(OpenBraceToken) {
            let mut initializers = Vec::new();
            if !self.tokens.matches(CloseBraceToken) {
                loop {
                    let name = self.expect_identifier("Member name expected.")?;
                    self.expect(EqualsToken, "'=' expected.")?;
                    let value = self.parse_expression()?;
                    self.note_node();
                    initializers.push(AnonymousObjectMember {
                        line: name.line,
                        name: name.name,
                        value: self.alloc_expr(value),
                    });
                    if !self.tokens.eat(CommaToken) {
                        break;
                    }
                    if self.tokens.matches(CloseBraceToken) {
                        break; // trailing comma
                    }
                }
            }
            self.expect(CloseBraceToken, "'}' expected.")?;
            self.note_node();
            return Some(Expression::AnonymousObject(AnonymousObjectExpression {
                line: keyword.line(),
                initializers: alloc_vec_in(self.arena, initializers),
            }));
        }

        let created_type = self.parse_type()?;
        let arguments = if self.tokens.matches(OpenParenToken) {
            self.parse_arguments()?
        } else {
            &[]
        };
        self.note_node();
        Some(Expression::ObjectCreation(ObjectCreationExpression {
            line: keyword.line(),
            created_type,
            arguments,
        }))
    }
}
