//! JavaScript AST → C# AST.

use bumpalo::Bump;
use janus_ast::types::{LiteralValue, ModifierFlags};
use janus_ast::{cs, js, SyntaxKind};
use janus_core::LineCol;
use janus_diagnostics::{messages, Diagnostic};
use janus_metrics::MetricsSink;

/// Maps a parsed JavaScript program onto a C# compilation unit allocated
/// in the target arena.
pub struct JsToCs<'t, 'm> {
    arena: &'t Bump,
    metrics: &'m mut MetricsSink,
}

impl<'t, 'm> JsToCs<'t, 'm> {
    pub fn new(arena: &'t Bump, metrics: &'m mut MetricsSink) -> Self {
        Self { arena, metrics }
    }

    pub fn map_program(&mut self, program: &js::Program<'_>) -> cs::CompilationUnit<'t> {
        let members = program
            .body
            .iter()
            .map(|statement| self.map_statement(statement))
            .collect::<Vec<_>>();
        cs::CompilationUnit {
            line: program.line,
            usings: &[],
            members: self.alloc_list(members),
        }
    }

    // ========================================================================
    // Helpers
    // ========================================================================

    fn alloc_list<T>(&self, items: Vec<T>) -> &'t [T] {
        if items.is_empty() {
            &[]
        } else {
            self.arena.alloc_slice_fill_iter(items)
        }
    }

    fn intern(&self, text: &str) -> &'t str {
        self.arena.alloc_str(text)
    }

    fn warn(&mut self, template: &janus_diagnostics::DiagnosticMessage, args: &[&str], line: u32) {
        self.metrics
            .add_diagnostic(Diagnostic::new(template, args, LineCol::new(line, 1)));
    }

    fn ident(&self, source: &js::Identifier<'_>) -> cs::Identifier<'t> {
        cs::Identifier {
            line: source.line,
            name: self.intern(source.name),
        }
    }

    fn synthetic_ident(&self, line: u32, name: &'static str) -> cs::Identifier<'t> {
        cs::Identifier { line, name }
    }

    fn named_type(&self, line: u32, name: &'static str) -> cs::NamedType<'t> {
        let part = self.synthetic_ident(line, name);
        cs::NamedType {
            line,
            name: cs::QualifiedName {
                line,
                parts: self.alloc_list(vec![part]),
            },
            type_arguments: &[],
            is_array: false,
        }
    }

    fn alloc_expr(&self, expr: cs::Expression<'t>) -> &'t cs::Expression<'t> {
        self.arena.alloc(expr)
    }

    fn alloc_stmt(&self, stmt: cs::Statement<'t>) -> &'t cs::Statement<'t> {
        self.arena.alloc(stmt)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn map_statement(&mut self, statement: &js::Statement<'_>) -> cs::Statement<'t> {
        match statement {
            js::Statement::VariableDeclaration(node) => self.map_variable_declaration(node),
            js::Statement::FunctionDeclaration(node) => {
                cs::Statement::Method(self.map_function(node))
            }
            js::Statement::ClassDeclaration(node) => self.map_class(node),
            js::Statement::Block(node) => cs::Statement::Block(self.map_block(node)),
            js::Statement::If(node) => cs::Statement::If(cs::IfStatement {
                line: node.line,
                condition: self.map_expr_ref(node.test),
                consequent: self.map_stmt_ref(node.consequent),
                alternate: node.alternate.map(|s| self.map_stmt_ref(s)),
            }),
            js::Statement::While(node) => cs::Statement::While(cs::WhileStatement {
                line: node.line,
                condition: self.map_expr_ref(node.test),
                body: self.map_stmt_ref(node.body),
            }),
            js::Statement::For(node) => self.map_for(node),
            js::Statement::ForOf(node) => cs::Statement::Foreach(cs::ForeachStatement {
                line: node.line,
                element_type: None,
                identifier: self.ident(&node.binding),
                collection: self.map_expr_ref(node.object),
                body: self.map_stmt_ref(node.body),
            }),
            js::Statement::Switch(node) => self.map_switch(node),
            js::Statement::Return(node) => cs::Statement::Return(cs::ReturnStatement {
                line: node.line,
                argument: node.argument.map(|e| self.map_expr_ref(e)),
            }),
            js::Statement::Throw(node) => cs::Statement::Throw(cs::ThrowStatement {
                line: node.line,
                argument: Some(self.map_expr_ref(node.argument)),
            }),
            js::Statement::Break(node) => {
                cs::Statement::Break(cs::BreakStatement { line: node.line })
            }
            js::Statement::Continue(node) => {
                cs::Statement::Continue(cs::ContinueStatement { line: node.line })
            }
            js::Statement::Try(node) => self.map_try(node),
            js::Statement::Expression(node) => {
                cs::Statement::Expression(cs::ExpressionStatement {
                    line: node.line,
                    expression: self.map_expr_ref(node.expression),
                })
            }
            js::Statement::Comment(node) => cs::Statement::Comment(cs::CommentStatement {
                line: node.line,
                text: self.intern(node.text),
            }),
        }
    }

    /// The first declarator survives as `var name = init;`; the rest are
    /// dropped with a warning naming them.
    fn map_variable_declaration(&mut self, node: &js::VariableDeclaration<'_>) -> cs::Statement<'t> {
        let first = match node.declarations.first() {
            Some(declarator) => declarator,
            None => {
                self.warn(&messages::UNSUPPORTED_NODE_0, &["an empty declaration"], node.line);
                return cs::Statement::Comment(cs::CommentStatement {
                    line: node.line,
                    text: self.intern("empty variable declaration"),
                });
            }
        };
        if node.declarations.len() > 1 {
            let dropped = node.declarations[1..]
                .iter()
                .map(|d| d.id.name)
                .collect::<Vec<_>>()
                .join(", ");
            self.warn(&messages::EXTRA_DECLARATORS_DROPPED_0, &[&dropped], node.line);
        }
        cs::Statement::LocalDeclaration(cs::LocalDeclaration {
            line: node.line,
            declared_type: None,
            identifier: self.ident(&first.id),
            initializer: first.init.map(|e| self.map_expr_ref(e)),
        })
    }

    fn map_function(&mut self, node: &js::FunctionDeclaration<'_>) -> cs::MethodDeclaration<'t> {
        let mut modifiers = ModifierFlags::PUBLIC | ModifierFlags::STATIC;
        if node.is_async {
            modifiers |= ModifierFlags::ASYNC;
        }
        cs::MethodDeclaration {
            line: node.line,
            modifiers,
            return_type: self.named_type(node.line, "void"),
            identifier: self.ident(&node.id),
            type_parameters: &[],
            parameters: self.map_parameters(node.params),
            constraints: &[],
            body: Some(self.map_block(&node.body)),
        }
    }

    /// Untyped parameters receive the default type `string`.
    fn map_parameters(&mut self, params: &[js::Identifier<'_>]) -> &'t [cs::Parameter<'t>] {
        let mapped = params
            .iter()
            .map(|param| cs::Parameter {
                line: param.line,
                modifier: None,
                parameter_type: self.named_type(param.line, "string"),
                identifier: self.ident(param),
                default_value: None,
            })
            .collect();
        self.alloc_list(mapped)
    }

    fn map_class(&mut self, node: &js::ClassDeclaration<'_>) -> cs::Statement<'t> {
        let base_types = match &node.superclass {
            Some(superclass) => {
                let base = cs::NamedType {
                    line: superclass.line,
                    name: cs::QualifiedName {
                        line: superclass.line,
                        parts: self.alloc_list(vec![self.ident(superclass)]),
                    },
                    type_arguments: &[],
                    is_array: false,
                };
                self.alloc_list(vec![base])
            }
            None => &[],
        };

        let mut members: Vec<cs::Member<'t>> = Vec::new();
        // Accessor pairs merge into one property per name.
        struct PendingProperty<'s, 't> {
            source_name: &'s str,
            identifier: cs::Identifier<'t>,
            line: u32,
            accessors: Vec<cs::Accessor<'t>>,
        }
        let mut properties: Vec<PendingProperty<'_, 't>> = Vec::new();

        for method in node.body {
            match method.kind {
                js::MethodKind::Constructor => {
                    members.push(cs::Member::Constructor(cs::ConstructorDeclaration {
                        line: method.line,
                        modifiers: ModifierFlags::PUBLIC,
                        identifier: self.ident(&node.id),
                        parameters: self.map_parameters(method.params),
                        body: self.map_block(&method.body),
                    }));
                }
                js::MethodKind::Method => {
                    let mut modifiers = ModifierFlags::PUBLIC;
                    if method.is_static {
                        modifiers |= ModifierFlags::STATIC;
                    }
                    if method.is_async {
                        modifiers |= ModifierFlags::ASYNC;
                    }
                    members.push(cs::Member::Method(cs::MethodDeclaration {
                        line: method.line,
                        modifiers,
                        return_type: self.named_type(method.line, "void"),
                        identifier: self.ident(&method.key),
                        type_parameters: &[],
                        parameters: self.map_parameters(method.params),
                        constraints: &[],
                        body: Some(self.map_block(&method.body)),
                    }));
                }
                js::MethodKind::Get | js::MethodKind::Set => {
                    let kind = if method.kind == js::MethodKind::Get {
                        cs::AccessorKind::Get
                    } else {
                        cs::AccessorKind::Set
                    };
                    let accessor = cs::Accessor {
                        line: method.line,
                        kind,
                        body: Some(self.map_block(&method.body)),
                    };
                    match properties
                        .iter_mut()
                        .find(|p| p.source_name == method.key.name)
                    {
                        Some(pending) => pending.accessors.push(accessor),
                        None => properties.push(PendingProperty {
                            source_name: method.key.name,
                            identifier: self.ident(&method.key),
                            line: method.line,
                            accessors: vec![accessor],
                        }),
                    }
                }
            }
        }
        for pending in properties {
            members.push(cs::Member::Property(cs::PropertyDeclaration {
                line: pending.line,
                modifiers: ModifierFlags::PUBLIC,
                property_type: self.named_type(pending.line, "object"),
                identifier: pending.identifier,
                accessors: self.alloc_list(pending.accessors),
            }));
        }

        cs::Statement::Class(cs::ClassDeclaration {
            line: node.line,
            modifiers: ModifierFlags::PUBLIC,
            identifier: self.ident(&node.id),
            type_parameters: &[],
            base_types,
            constraints: &[],
            members: self.alloc_list(members),
        })
    }

    fn map_block(&mut self, node: &js::Block<'_>) -> cs::Block<'t> {
        let body = node
            .body
            .iter()
            .map(|statement| self.map_statement(statement))
            .collect();
        cs::Block {
            line: node.line,
            body: self.alloc_list(body),
        }
    }

    fn map_for(&mut self, node: &js::ForStatement<'_>) -> cs::Statement<'t> {
        let init = node.init.as_ref().map(|init| match init {
            js::ForInit::VariableDeclaration(declaration) => {
                match self.map_variable_declaration(declaration) {
                    cs::Statement::LocalDeclaration(local) => cs::ForInit::LocalDeclaration(local),
                    // The declaration was unrepresentable; degrade to a
                    // null expression initializer.
                    _ => cs::ForInit::Expression(self.alloc_expr(cs::Expression::Literal(
                        cs::Literal {
                            line: declaration.line,
                            value: LiteralValue::Null,
                        },
                    ))),
                }
            }
            js::ForInit::Expression(expression) => {
                cs::ForInit::Expression(self.map_expr_ref(expression))
            }
        });
        cs::Statement::For(cs::ForStatement {
            line: node.line,
            init,
            condition: node.test.map(|e| self.map_expr_ref(e)),
            update: node.update.map(|e| self.map_expr_ref(e)),
            body: self.map_stmt_ref(node.body),
        })
    }

    fn map_switch(&mut self, node: &js::SwitchStatement<'_>) -> cs::Statement<'t> {
        let sections = node
            .cases
            .iter()
            .map(|case| {
                let label = cs::SwitchLabel {
                    line: case.line,
                    value: case.test.map(|e| self.map_expr_ref(e)),
                };
                let statements = case
                    .consequent
                    .iter()
                    .map(|statement| self.map_statement(statement))
                    .collect();
                cs::SwitchSection {
                    line: case.line,
                    labels: self.alloc_list(vec![label]),
                    statements: self.alloc_list(statements),
                }
            })
            .collect();
        cs::Statement::Switch(cs::SwitchStatement {
            line: node.line,
            discriminant: self.map_expr_ref(node.discriminant),
            sections: self.alloc_list(sections),
        })
    }

    fn map_try(&mut self, node: &js::TryStatement<'_>) -> cs::Statement<'t> {
        let catches = match &node.handler {
            Some(handler) => {
                let clause = cs::CatchClause {
                    line: handler.line,
                    exception_type: handler
                        .param
                        .as_ref()
                        .map(|p| self.named_type(p.line, "Exception")),
                    identifier: handler.param.as_ref().map(|p| self.ident(p)),
                    body: self.map_block(&handler.body),
                };
                self.alloc_list(vec![clause])
            }
            None => &[],
        };
        cs::Statement::Try(cs::TryStatement {
            line: node.line,
            block: self.map_block(&node.block),
            catches,
            finally: node.finalizer.as_ref().map(|b| self.map_block(b)),
        })
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn map_expr_ref(&mut self, expression: &js::Expression<'_>) -> &'t cs::Expression<'t> {
        let mapped = self.map_expression(expression);
        self.alloc_expr(mapped)
    }

    fn map_stmt_ref(&mut self, statement: &js::Statement<'_>) -> &'t cs::Statement<'t> {
        let mapped = self.map_statement(statement);
        self.alloc_stmt(mapped)
    }

    fn map_expression(&mut self, expression: &js::Expression<'_>) -> cs::Expression<'t> {
        match expression {
            js::Expression::Assignment(node) => cs::Expression::Assignment(
                cs::AssignmentExpression {
                    line: node.line,
                    operator: node.operator,
                    target: self.map_expr_ref(node.target),
                    value: self.map_expr_ref(node.value),
                },
            ),
            js::Expression::Conditional(node) => cs::Expression::Conditional(
                cs::ConditionalExpression {
                    line: node.line,
                    condition: self.map_expr_ref(node.test),
                    consequent: self.map_expr_ref(node.consequent),
                    alternate: self.map_expr_ref(node.alternate),
                },
            ),
            js::Expression::Binary(node) => self.map_binary(node),
            js::Expression::Unary(node) => cs::Expression::Unary(cs::UnaryExpression {
                line: node.line,
                operator: node.operator,
                operand: self.map_expr_ref(node.operand),
            }),
            js::Expression::Update(node) => cs::Expression::Update(cs::UpdateExpression {
                line: node.line,
                operator: node.operator,
                prefix: node.prefix,
                operand: self.map_expr_ref(node.operand),
            }),
            js::Expression::Call(node) => cs::Expression::Invocation(cs::InvocationExpression {
                line: node.line,
                callee: self.map_expr_ref(node.callee),
                arguments: self.map_expr_list(node.arguments),
            }),
            js::Expression::New(node) => self.map_new(node),
            js::Expression::Member(node) => cs::Expression::MemberAccess(
                cs::MemberAccessExpression {
                    line: node.line,
                    object: self.map_expr_ref(node.object),
                    member: self.ident(&node.property),
                },
            ),
            js::Expression::Index(node) => cs::Expression::ElementAccess(
                cs::ElementAccessExpression {
                    line: node.line,
                    object: self.map_expr_ref(node.object),
                    index: self.map_expr_ref(node.index),
                },
            ),
            js::Expression::Identifier(node) => cs::Expression::Identifier(self.ident(node)),
            js::Expression::Literal(node) => cs::Expression::Literal(cs::Literal {
                line: node.line,
                value: self.map_literal_value(&node.value),
            }),
            js::Expression::Array(node) => cs::Expression::ArrayCreation(
                cs::ArrayCreationExpression {
                    line: node.line,
                    elements: self.map_expr_list(node.elements),
                },
            ),
            js::Expression::Object(node) => {
                let initializers = node
                    .properties
                    .iter()
                    .map(|property| cs::AnonymousObjectMember {
                        line: property.line,
                        name: self.intern(property.key),
                        value: self.map_expr_ref(property.value),
                    })
                    .collect();
                cs::Expression::AnonymousObject(cs::AnonymousObjectExpression {
                    line: node.line,
                    initializers: self.alloc_list(initializers),
                })
            }
            js::Expression::This(node) => {
                cs::Expression::This(cs::ThisExpression { line: node.line })
            }
        }
    }

    /// Operator translation. Strict equality narrows to the non-strict
    /// form, which cannot express reference-strict comparison; other
    /// operators the C# printer can spell pass through unchanged.
    fn map_binary(&mut self, node: &js::BinaryExpression<'_>) -> cs::Expression<'t> {
        let operator = match node.operator {
            SyntaxKind::EqualsEqualsEqualsToken => {
                self.warn(&messages::STRICT_EQUALITY_NARROWED_0, &["==="], node.line);
                SyntaxKind::EqualsEqualsToken
            }
            SyntaxKind::ExclamationEqualsEqualsToken => {
                self.warn(&messages::STRICT_EQUALITY_NARROWED_0, &["!=="], node.line);
                SyntaxKind::ExclamationEqualsToken
            }
            other => other,
        };
        cs::Expression::Binary(cs::BinaryExpression {
            line: node.line,
            operator,
            left: self.map_expr_ref(node.left),
            right: self.map_expr_ref(node.right),
        })
    }

    /// `new Foo.Bar(args)` keeps its dotted constructor path when the
    /// callee is a plain identifier chain; anything else degrades to an
    /// invocation with a diagnostic.
    fn map_new(&mut self, node: &js::NewExpression<'_>) -> cs::Expression<'t> {
        match self.qualified_name_of(node.callee) {
            Some(name) => cs::Expression::ObjectCreation(cs::ObjectCreationExpression {
                line: node.line,
                created_type: cs::NamedType {
                    line: node.line,
                    name,
                    type_arguments: &[],
                    is_array: false,
                },
                arguments: self.map_expr_list(node.arguments),
            }),
            None => {
                self.warn(
                    &messages::UNSUPPORTED_NODE_0,
                    &["a computed constructor expression"],
                    node.line,
                );
                cs::Expression::Invocation(cs::InvocationExpression {
                    line: node.line,
                    callee: self.map_expr_ref(node.callee),
                    arguments: self.map_expr_list(node.arguments),
                })
            }
        }
    }

    fn qualified_name_of(&mut self, expression: &js::Expression<'_>) -> Option<cs::QualifiedName<'t>> {
        let mut parts = Vec::new();
        let mut current = expression;
        loop {
            match current {
                js::Expression::Identifier(identifier) => {
                    parts.push(self.ident(identifier));
                    parts.reverse();
                    let line = parts[0].line;
                    return Some(cs::QualifiedName {
                        line,
                        parts: self.alloc_list(parts),
                    });
                }
                js::Expression::Member(member) => {
                    parts.push(self.ident(&member.property));
                    current = member.object;
                }
                _ => return None,
            }
        }
    }

    fn map_expr_list(&mut self, expressions: &[js::Expression<'_>]) -> &'t [cs::Expression<'t>] {
        let mapped = expressions
            .iter()
            .map(|expression| self.map_expression(expression))
            .collect();
        self.alloc_list(mapped)
    }

    fn map_literal_value(&self, value: &LiteralValue<'_>) -> LiteralValue<'t> {
        match value {
            LiteralValue::String(s) => LiteralValue::String(self.intern(s)),
            LiteralValue::Number(n) => LiteralValue::Number(self.intern(n)),
            LiteralValue::Boolean(b) => LiteralValue::Boolean(*b),
            LiteralValue::Null => LiteralValue::Null,
        }
    }
}
