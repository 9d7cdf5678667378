//! C# AST → JavaScript AST.

use bumpalo::Bump;
use janus_ast::types::LiteralValue;
use janus_ast::{cs, js, SyntaxKind};
use janus_core::LineCol;
use janus_diagnostics::{messages, Diagnostic};
use janus_metrics::MetricsSink;

/// Maps a parsed C# compilation unit onto a JavaScript program allocated
/// in the target arena.
pub struct CsToJs<'t, 'm> {
    arena: &'t Bump,
    metrics: &'m mut MetricsSink,
}

impl<'t, 'm> CsToJs<'t, 'm> {
    pub fn new(arena: &'t Bump, metrics: &'m mut MetricsSink) -> Self {
        Self { arena, metrics }
    }

    pub fn map_unit(&mut self, unit: &cs::CompilationUnit<'_>) -> js::Program<'t> {
        for using in unit.usings {
            let name = dotted(&using.name);
            self.note(&messages::USING_DIRECTIVE_DROPPED_0, &[&name], using.line);
        }

        let mut body = Vec::new();
        self.map_members(unit.members, &mut body);
        js::Program {
            line: unit.line,
            body: self.alloc_list(body),
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

    fn note(&mut self, template: &janus_diagnostics::DiagnosticMessage, args: &[&str], line: u32) {
        self.metrics
            .add_diagnostic(Diagnostic::new(template, args, LineCol::new(line, 1)));
    }

    fn ident(&self, source: &cs::Identifier<'_>) -> js::Identifier<'t> {
        js::Identifier {
            line: source.line,
            name: self.intern(source.name),
        }
    }

    fn alloc_expr(&self, expr: js::Expression<'t>) -> &'t js::Expression<'t> {
        self.arena.alloc(expr)
    }

    fn alloc_stmt(&self, stmt: js::Statement<'t>) -> &'t js::Statement<'t> {
        self.arena.alloc(stmt)
    }

    // ========================================================================
    // Statements
    // ========================================================================

    /// Namespaces flatten into the enclosing body; everything else maps
    /// one-to-one.
    fn map_members(&mut self, members: &[cs::Statement<'_>], out: &mut Vec<js::Statement<'t>>) {
        for member in members {
            if let cs::Statement::Namespace(namespace) = member {
                let name = dotted(&namespace.name);
                self.note(&messages::NAMESPACE_FLATTENED_0, &[&name], namespace.line);
                self.map_members(namespace.members, out);
            } else {
                let mapped = self.map_statement(member);
                out.push(mapped);
            }
        }
    }

    fn map_statement(&mut self, statement: &cs::Statement<'_>) -> js::Statement<'t> {
        match statement {
            cs::Statement::Namespace(node) => {
                // Reached only for a namespace nested in a non-namespace
                // position; flatten it into a block.
                let name = dotted(&node.name);
                self.note(&messages::NAMESPACE_FLATTENED_0, &[&name], node.line);
                let mut body = Vec::new();
                self.map_members(node.members, &mut body);
                js::Statement::Block(js::Block {
                    line: node.line,
                    body: self.alloc_list(body),
                })
            }
            cs::Statement::Class(node) => self.map_class_like(
                node.line,
                &node.identifier,
                node.base_types,
                node.members,
            ),
            cs::Statement::Struct(node) => {
                self.note(
                    &messages::STRUCT_CONVERTED_TO_CLASS_0,
                    &[node.identifier.name],
                    node.line,
                );
                self.map_class_like(node.line, &node.identifier, node.base_types, node.members)
            }
            cs::Statement::Interface(node) => {
                self.note(
                    &messages::INTERFACE_NOT_REPRESENTABLE_0,
                    &[node.identifier.name],
                    node.line,
                );
                js::Statement::Comment(js::CommentStatement {
                    line: node.line,
                    text: self
                        .intern(&format!("interface {} omitted", node.identifier.name)),
                })
            }
            cs::Statement::Enum(node) => self.map_enum(node),
            cs::Statement::Method(node) => self.map_top_level_method(node),
            cs::Statement::LocalDeclaration(node) => self.map_local_declaration(node),
            cs::Statement::Block(node) => js::Statement::Block(self.map_block(node)),
            cs::Statement::If(node) => js::Statement::If(js::IfStatement {
                line: node.line,
                test: self.map_expr_ref(node.condition),
                consequent: self.map_stmt_ref(node.consequent),
                alternate: node.alternate.map(|s| self.map_stmt_ref(s)),
            }),
            cs::Statement::While(node) => js::Statement::While(js::WhileStatement {
                line: node.line,
                test: self.map_expr_ref(node.condition),
                body: self.map_stmt_ref(node.body),
            }),
            cs::Statement::DoWhile(node) => {
                // The JavaScript subset has no body-first loop.
                self.note(&messages::DO_WHILE_LOWERED, &[], node.line);
                js::Statement::While(js::WhileStatement {
                    line: node.line,
                    test: self.map_expr_ref(node.condition),
                    body: self.map_stmt_ref(node.body),
                })
            }
            cs::Statement::For(node) => self.map_for(node),
            cs::Statement::Foreach(node) => js::Statement::ForOf(js::ForOfStatement {
                line: node.line,
                kind: js::VarKind::Let,
                binding: self.ident(&node.identifier),
                object: self.map_expr_ref(node.collection),
                body: self.map_stmt_ref(node.body),
            }),
            cs::Statement::Switch(node) => self.map_switch(node),
            cs::Statement::Return(node) => js::Statement::Return(js::ReturnStatement {
                line: node.line,
                argument: node.argument.map(|e| self.map_expr_ref(e)),
            }),
            cs::Statement::Throw(node) => {
                let argument = match node.argument {
                    Some(expression) => self.map_expr_ref(expression),
                    // A bare rethrow has no operand to carry over.
                    None => self.alloc_expr(js::Expression::Literal(js::Literal {
                        line: node.line,
                        value: LiteralValue::Null,
                    })),
                };
                js::Statement::Throw(js::ThrowStatement {
                    line: node.line,
                    argument,
                })
            }
            cs::Statement::Break(node) => {
                js::Statement::Break(js::BreakStatement { line: node.line })
            }
            cs::Statement::Continue(node) => {
                js::Statement::Continue(js::ContinueStatement { line: node.line })
            }
            cs::Statement::Try(node) => self.map_try(node),
            cs::Statement::Expression(node) => {
                js::Statement::Expression(js::ExpressionStatement {
                    line: node.line,
                    expression: self.map_expr_ref(node.expression),
                })
            }
            cs::Statement::Comment(node) => js::Statement::Comment(js::CommentStatement {
                line: node.line,
                text: self.intern(node.text),
            }),
        }
    }

    /// Modifiers and the return type are dropped; the body and parameter
    /// names carry over.
    fn map_top_level_method(&mut self, node: &cs::MethodDeclaration<'_>) -> js::Statement<'t> {
        self.note(
            &messages::MODIFIERS_DROPPED_0,
            &[node.identifier.name],
            node.line,
        );
        let body = match &node.body {
            Some(block) => self.map_block(block),
            None => js::Block { line: node.line, body: &[] },
        };
        js::Statement::FunctionDeclaration(js::FunctionDeclaration {
            line: node.line,
            id: self.ident(&node.identifier),
            params: self.map_parameter_names(node.parameters),
            body,
            is_async: node.modifiers.contains(janus_ast::ModifierFlags::ASYNC),
        })
    }

    fn map_parameter_names(&mut self, parameters: &[cs::Parameter<'_>]) -> &'t [js::Identifier<'t>] {
        let mapped = parameters
            .iter()
            .map(|parameter| self.ident(&parameter.identifier))
            .collect();
        self.alloc_list(mapped)
    }

    fn map_class_like(
        &mut self,
        line: u32,
        identifier: &cs::Identifier<'_>,
        base_types: &[cs::NamedType<'_>],
        members: &[cs::Member<'_>],
    ) -> js::Statement<'t> {
        let superclass = base_types.first().map(|base| self.ident(base.name.last()));

        let mut body = Vec::new();
        for member in members {
            match member {
                cs::Member::Method(method) => {
                    let method_body = match &method.body {
                        Some(block) => self.map_block(block),
                        None => js::Block { line: method.line, body: &[] },
                    };
                    body.push(js::MethodDefinition {
                        line: method.line,
                        kind: js::MethodKind::Method,
                        key: self.ident(&method.identifier),
                        params: self.map_parameter_names(method.parameters),
                        body: method_body,
                        is_static: method
                            .modifiers
                            .contains(janus_ast::ModifierFlags::STATIC),
                        is_async: method.modifiers.contains(janus_ast::ModifierFlags::ASYNC),
                    });
                }
                cs::Member::Constructor(constructor) => {
                    body.push(js::MethodDefinition {
                        line: constructor.line,
                        kind: js::MethodKind::Constructor,
                        key: js::Identifier {
                            line: constructor.line,
                            name: "constructor",
                        },
                        params: self.map_parameter_names(constructor.parameters),
                        body: self.map_block(&constructor.body),
                        is_static: false,
                        is_async: false,
                    });
                }
                cs::Member::Property(property) => {
                    for accessor in property.accessors {
                        let accessor_body = match &accessor.body {
                            Some(block) => self.map_block(block),
                            None => js::Block { line: accessor.line, body: &[] },
                        };
                        let (kind, params): (js::MethodKind, &'t [js::Identifier<'t>]) =
                            match accessor.kind {
                                cs::AccessorKind::Get => (js::MethodKind::Get, &[]),
                                cs::AccessorKind::Set => {
                                    let value = js::Identifier {
                                        line: accessor.line,
                                        name: "value",
                                    };
                                    (js::MethodKind::Set, self.alloc_list(vec![value]))
                                }
                            };
                        body.push(js::MethodDefinition {
                            line: accessor.line,
                            kind,
                            key: self.ident(&property.identifier),
                            params,
                            body: accessor_body,
                            is_static: false,
                            is_async: false,
                        });
                    }
                }
                cs::Member::Event(event) => {
                    self.note(
                        &messages::EVENT_NOT_REPRESENTABLE_0,
                        &[event.identifier.name],
                        event.line,
                    );
                }
            }
        }

        js::Statement::ClassDeclaration(js::ClassDeclaration {
            line,
            id: self.ident(identifier),
            superclass,
            body: self.alloc_list(body),
        })
    }

    /// `enum Color { Red, Green = 5 }` lowers to
    /// `const Color = { Red: 0, Green: 5 };`.
    fn map_enum(&mut self, node: &cs::EnumDeclaration<'_>) -> js::Statement<'t> {
        let properties = node
            .members
            .iter()
            .enumerate()
            .map(|(index, member)| {
                let value = match member.value {
                    Some(expression) => self.map_expr_ref(expression),
                    None => self.alloc_expr(js::Expression::Literal(js::Literal {
                        line: member.line,
                        value: LiteralValue::Number(self.intern(&index.to_string())),
                    })),
                };
                js::Property {
                    line: member.line,
                    key: self.intern(member.identifier.name),
                    value,
                }
            })
            .collect();
        let object = js::Expression::Object(js::ObjectExpression {
            line: node.line,
            properties: self.alloc_list(properties),
        });
        let declarator = js::VariableDeclarator {
            line: node.line,
            id: self.ident(&node.identifier),
            init: Some(self.alloc_expr(object)),
        };
        js::Statement::VariableDeclaration(js::VariableDeclaration {
            line: node.line,
            kind: js::VarKind::Const,
            declarations: self.alloc_list(vec![declarator]),
        })
    }

    fn map_local_declaration(&mut self, node: &cs::LocalDeclaration<'_>) -> js::Statement<'t> {
        let declarator = js::VariableDeclarator {
            line: node.line,
            id: self.ident(&node.identifier),
            init: node.initializer.map(|e| self.map_expr_ref(e)),
        };
        js::Statement::VariableDeclaration(js::VariableDeclaration {
            line: node.line,
            kind: js::VarKind::Var,
            declarations: self.alloc_list(vec![declarator]),
        })
    }

    fn map_block(&mut self, node: &cs::Block<'_>) -> js::Block<'t> {
        let body = node
            .body
            .iter()
            .map(|statement| self.map_statement(statement))
            .collect();
        js::Block {
            line: node.line,
            body: self.alloc_list(body),
        }
    }

    fn map_for(&mut self, node: &cs::ForStatement<'_>) -> js::Statement<'t> {
        let init = node.init.as_ref().map(|init| match init {
            cs::ForInit::LocalDeclaration(local) => {
                match self.map_local_declaration(local) {
                    js::Statement::VariableDeclaration(declaration) => {
                        js::ForInit::VariableDeclaration(declaration)
                    }
                    _ => unreachable!("local declarations always map to variable declarations"),
                }
            }
            cs::ForInit::Expression(expression) => {
                js::ForInit::Expression(self.map_expr_ref(expression))
            }
        });
        js::Statement::For(js::ForStatement {
            line: node.line,
            init,
            test: node.condition.map(|e| self.map_expr_ref(e)),
            update: node.update.map(|e| self.map_expr_ref(e)),
            body: self.map_stmt_ref(node.body),
        })
    }

    /// Each label becomes its own case; statements attach to a section's
    /// last label so fallthrough order survives.
    fn map_switch(&mut self, node: &cs::SwitchStatement<'_>) -> js::Statement<'t> {
        let mut cases = Vec::new();
        for section in node.sections {
            for (index, label) in section.labels.iter().enumerate() {
                let consequent = if index + 1 == section.labels.len() {
                    let statements = section
                        .statements
                        .iter()
                        .map(|statement| self.map_statement(statement))
                        .collect();
                    self.alloc_list(statements)
                } else {
                    &[]
                };
                cases.push(js::SwitchCase {
                    line: label.line,
                    test: label.value.map(|e| self.map_expr_ref(e)),
                    consequent,
                });
            }
        }
        js::Statement::Switch(js::SwitchStatement {
            line: node.line,
            discriminant: self.map_expr_ref(node.discriminant),
            cases: self.alloc_list(cases),
        })
    }

    fn map_try(&mut self, node: &cs::TryStatement<'_>) -> js::Statement<'t> {
        if node.catches.len() > 1 {
            self.note(&messages::CATCH_CLAUSES_TRUNCATED, &[], node.line);
        }
        let handler = node.catches.first().map(|clause| js::CatchClause {
            line: clause.line,
            param: clause.identifier.as_ref().map(|i| self.ident(i)),
            body: self.map_block(&clause.body),
        });
        js::Statement::Try(js::TryStatement {
            line: node.line,
            block: self.map_block(&node.block),
            handler,
            finalizer: node.finally.as_ref().map(|b| self.map_block(b)),
        })
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn map_expr_ref(&mut self, expression: &cs::Expression<'_>) -> &'t js::Expression<'t> {
        let mapped = self.map_expression(expression);
        self.alloc_expr(mapped)
    }

    fn map_stmt_ref(&mut self, statement: &cs::Statement<'_>) -> &'t js::Statement<'t> {
        let mapped = self.map_statement(statement);
        self.alloc_stmt(mapped)
    }

    fn map_expression(&mut self, expression: &cs::Expression<'_>) -> js::Expression<'t> {
        match expression {
            cs::Expression::Assignment(node) => js::Expression::Assignment(
                js::AssignmentExpression {
                    line: node.line,
                    operator: node.operator,
                    target: self.map_expr_ref(node.target),
                    value: self.map_expr_ref(node.value),
                },
            ),
            cs::Expression::Conditional(node) => js::Expression::Conditional(
                js::ConditionalExpression {
                    line: node.line,
                    test: self.map_expr_ref(node.condition),
                    consequent: self.map_expr_ref(node.consequent),
                    alternate: self.map_expr_ref(node.alternate),
                },
            ),
            cs::Expression::Binary(node) => self.map_binary(node),
            cs::Expression::Unary(node) => js::Expression::Unary(js::UnaryExpression {
                line: node.line,
                operator: node.operator,
                operand: self.map_expr_ref(node.operand),
            }),
            cs::Expression::Update(node) => js::Expression::Update(js::UpdateExpression {
                line: node.line,
                operator: node.operator,
                prefix: node.prefix,
                operand: self.map_expr_ref(node.operand),
            }),
            cs::Expression::Invocation(node) => js::Expression::Call(js::CallExpression {
                line: node.line,
                callee: self.map_expr_ref(node.callee),
                arguments: self.map_expr_list(node.arguments),
            }),
            cs::Expression::MemberAccess(node) => js::Expression::Member(js::MemberExpression {
                line: node.line,
                object: self.map_expr_ref(node.object),
                property: self.ident(&node.member),
            }),
            cs::Expression::ElementAccess(node) => js::Expression::Index(js::IndexExpression {
                line: node.line,
                object: self.map_expr_ref(node.object),
                index: self.map_expr_ref(node.index),
            }),
            cs::Expression::ObjectCreation(node) => self.map_object_creation(node),
            cs::Expression::AnonymousObject(node) => {
                let properties = node
                    .initializers
                    .iter()
                    .map(|initializer| js::Property {
                        line: initializer.line,
                        key: self.intern(initializer.name),
                        value: self.map_expr_ref(initializer.value),
                    })
                    .collect();
                js::Expression::Object(js::ObjectExpression {
                    line: node.line,
                    properties: self.alloc_list(properties),
                })
            }
            cs::Expression::ArrayCreation(node) => js::Expression::Array(js::ArrayExpression {
                line: node.line,
                elements: self.map_expr_list(node.elements),
            }),
            cs::Expression::Identifier(node) => js::Expression::Identifier(self.ident(node)),
            cs::Expression::Literal(node) => self.map_literal(node),
            cs::Expression::This(node) => {
                js::Expression::This(js::ThisExpression { line: node.line })
            }
            cs::Expression::Base(node) => js::Expression::Identifier(js::Identifier {
                line: node.line,
                name: "super",
            }),
        }
    }

    /// Equality is raised to the strict operators: safe for primitives,
    /// a warning because reference comparisons may differ.
    fn map_binary(&mut self, node: &cs::BinaryExpression<'_>) -> js::Expression<'t> {
        let operator = match node.operator {
            SyntaxKind::EqualsEqualsToken => {
                self.note(&messages::EQUALITY_RAISED_0, &["=="], node.line);
                SyntaxKind::EqualsEqualsEqualsToken
            }
            SyntaxKind::ExclamationEqualsToken => {
                self.note(&messages::EQUALITY_RAISED_0, &["!="], node.line);
                SyntaxKind::ExclamationEqualsEqualsToken
            }
            other => other,
        };
        js::Expression::Binary(js::BinaryExpression {
            line: node.line,
            operator,
            left: self.map_expr_ref(node.left),
            right: self.map_expr_ref(node.right),
        })
    }

    /// `new Foo.Bar(args)` — the dotted type path becomes a member chain.
    fn map_object_creation(&mut self, node: &cs::ObjectCreationExpression<'_>) -> js::Expression<'t> {
        let parts = node.created_type.name.parts;
        let mut callee = js::Expression::Identifier(self.ident(&parts[0]));
        for part in &parts[1..] {
            let line = callee.line();
            callee = js::Expression::Member(js::MemberExpression {
                line,
                object: self.alloc_expr(callee),
                property: self.ident(part),
            });
        }
        js::Expression::New(js::NewExpression {
            line: node.line,
            callee: self.alloc_expr(callee),
            arguments: self.map_expr_list(node.arguments),
        })
    }

    fn map_expr_list(&mut self, expressions: &[cs::Expression<'_>]) -> &'t [js::Expression<'t>] {
        let mapped = expressions
            .iter()
            .map(|expression| self.map_expression(expression))
            .collect();
        self.alloc_list(mapped)
    }

    /// Numeric type suffixes do not exist in JavaScript; strip and note.
    fn map_literal(&mut self, node: &cs::Literal<'_>) -> js::Expression<'t> {
        let value = match &node.value {
            LiteralValue::Number(lexeme) => {
                if lexeme
                    .chars()
                    .last()
                    .is_some_and(|c| matches!(c.to_ascii_lowercase(), 'f' | 'd' | 'm' | 'l'))
                {
                    self.note(&messages::NUMERIC_SUFFIX_DROPPED_0, &[lexeme], node.line);
                    LiteralValue::Number(self.intern(&lexeme[..lexeme.len() - 1]))
                } else {
                    LiteralValue::Number(self.intern(lexeme))
                }
            }
            LiteralValue::String(s) => LiteralValue::String(self.intern(s)),
            LiteralValue::Boolean(b) => LiteralValue::Boolean(*b),
            LiteralValue::Null => LiteralValue::Null,
        };
        js::Expression::Literal(js::Literal {
            line: node.line,
            value,
        })
    }
}

/// Render a qualified name as its dotted source form for diagnostics.
fn dotted(name: &cs::QualifiedName<'_>) -> String {
    name.parts
        .iter()
        .map(|part| part.name)
        .collect::<Vec<_>>()
        .join(".")
}
