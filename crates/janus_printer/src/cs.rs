//! The C# printer.

use crate::{write_string_literal, PrinterOptions};
use janus_ast::cs::*;
use janus_ast::types::{LiteralValue, ModifierFlags};
use janus_ast::SyntaxKind;

pub struct CsPrinter {
    output: String,
    indent_level: u32,
    options: PrinterOptions,
}

impl CsPrinter {
    pub fn new() -> Self {
        Self::with_options(PrinterOptions::default())
    }

    pub fn with_options(options: PrinterOptions) -> Self {
        Self {
            output: String::with_capacity(4096),
            indent_level: 0,
            options,
        }
    }

    /// Print a compilation unit. When the members include bare statements
    /// or free-standing methods, they are hosted in `using System; public
    /// class Program { public static void Main(string[] args) { … } }`;
    /// members that are already declarations are never re-wrapped.
    pub fn print_compilation_unit(&mut self, unit: &CompilationUnit<'_>) -> String {
        self.output.clear();

        let needs_wrapper = unit
            .members
            .iter()
            .any(|member| !member.is_type_declaration());

        if needs_wrapper {
            self.write("using System;");
            self.write_newline();
            for using in unit.usings {
                if dotted_text(&using.name) == "System" {
                    continue;
                }
                self.print_using(using);
                self.write_newline();
            }
            self.write_newline();

            self.write("public class Program {");
            self.write_newline();
            self.indent_level += 1;

            self.write_indent();
            self.write("public static void Main(string[] args) {");
            self.write_newline();
            self.indent_level += 1;
            for member in unit.members {
                if member.is_type_declaration() || matches!(member, Statement::Method(_)) {
                    continue;
                }
                self.write_indent();
                self.print_statement(member);
                self.write_newline();
            }
            self.indent_level -= 1;
            self.write_indent();
            self.write("}");
            self.write_newline();

            for member in unit.members {
                if let Statement::Method(method) = member {
                    self.write_indent();
                    self.print_method(method);
                    self.write_newline();
                }
            }

            self.indent_level -= 1;
            self.write("}");
            self.write_newline();

            for member in unit.members {
                if member.is_type_declaration() {
                    self.write_newline();
                    self.print_statement(member);
                    self.write_newline();
                }
            }
        } else {
            for using in unit.usings {
                self.print_using(using);
                self.write_newline();
            }
            if !unit.usings.is_empty() && !unit.members.is_empty() {
                self.write_newline();
            }
            for (i, member) in unit.members.iter().enumerate() {
                if i > 0 {
                    self.write_newline();
                }
                self.print_statement(member);
                self.write_newline();
            }
        }

        if !self.options.trailing_newline {
            while self.output.ends_with(&self.options.new_line) {
                let cut = self.output.len() - self.options.new_line.len();
                self.output.truncate(cut);
            }
        }
        std::mem::take(&mut self.output)
    }

    // ========================================================================
    // Writing helpers
    // ========================================================================

    fn write(&mut self, text: &str) {
        self.output.push_str(text);
    }

    fn write_newline(&mut self) {
        self.output.push_str(&self.options.new_line);
    }

    fn write_indent(&mut self) {
        for _ in 0..self.indent_level {
            self.output.push_str(&self.options.indent_str);
        }
    }

    fn operator_text(kind: SyntaxKind) -> &'static str {
        kind.text().unwrap_or("?")
    }

    fn print_modifiers(&mut self, modifiers: ModifierFlags) {
        for word in modifiers.in_emission_order() {
            self.write(word);
            self.write(" ");
        }
    }

    fn print_using(&mut self, using: &UsingDirective<'_>) {
        self.write("using ");
        self.print_qualified_name(&using.name);
        self.write(";");
    }

    fn print_qualified_name(&mut self, name: &QualifiedName<'_>) {
        for (i, part) in name.parts.iter().enumerate() {
            if i > 0 {
                self.write(".");
            }
            self.write(part.name);
        }
    }

    fn print_type(&mut self, named_type: &NamedType<'_>) {
        self.print_qualified_name(&named_type.name);
        if !named_type.type_arguments.is_empty() {
            self.write("<");
            for (i, argument) in named_type.type_arguments.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.print_type(argument);
            }
            self.write(">");
        }
        if named_type.is_array {
            self.write("[]");
        }
    }

    // ========================================================================
    // Declarations
    // ========================================================================

    fn print_statement(&mut self, statement: &Statement<'_>) {
        match statement {
            Statement::Namespace(n) => self.print_namespace(n),
            Statement::Class(n) => self.print_type_declaration(
                "class",
                n.modifiers,
                &n.identifier,
                n.type_parameters,
                n.base_types,
                n.constraints,
                n.members,
            ),
            Statement::Struct(n) => self.print_type_declaration(
                "struct",
                n.modifiers,
                &n.identifier,
                n.type_parameters,
                n.base_types,
                n.constraints,
                n.members,
            ),
            Statement::Interface(n) => self.print_type_declaration(
                "interface",
                n.modifiers,
                &n.identifier,
                n.type_parameters,
                n.base_types,
                n.constraints,
                n.members,
            ),
            Statement::Enum(n) => self.print_enum(n),
            Statement::Method(n) => self.print_method(n),
            Statement::LocalDeclaration(n) => {
                self.print_local_declaration(n);
                self.write(";");
            }
            Statement::Block(n) => self.print_block(n),
            Statement::If(n) => self.print_if_statement(n),
            Statement::While(n) => {
                self.write("while ");
                self.print_condition_head(n.condition);
                self.write(" ");
                self.print_statement(n.body);
            }
            Statement::DoWhile(n) => {
                self.write("do ");
                self.print_statement(n.body);
                self.write(" while ");
                self.print_condition_head(n.condition);
                self.write(";");
            }
            Statement::For(n) => self.print_for_statement(n),
            Statement::Foreach(n) => self.print_foreach_statement(n),
            Statement::Switch(n) => self.print_switch_statement(n),
            Statement::Return(n) => {
                self.write("return");
                if let Some(argument) = n.argument {
                    self.write(" ");
                    self.print_expression(argument);
                }
                self.write(";");
            }
            Statement::Throw(n) => {
                self.write("throw");
                if let Some(argument) = n.argument {
                    self.write(" ");
                    self.print_expression(argument);
                }
                self.write(";");
            }
            Statement::Break(_) => self.write("break;"),
            Statement::Continue(_) => self.write("continue;"),
            Statement::Try(n) => self.print_try_statement(n),
            Statement::Expression(n) => {
                self.print_expression(n.expression);
                self.write(";");
            }
            Statement::Comment(n) => {
                self.write("// ");
                self.write(n.text);
            }
        }
    }

    fn print_namespace(&mut self, node: &NamespaceDeclaration<'_>) {
        self.write("namespace ");
        self.print_qualified_name(&node.name);
        self.write(" {");
        self.write_newline();
        self.indent_level += 1;
        for (i, member) in node.members.iter().enumerate() {
            if i > 0 {
                self.write_newline();
            }
            self.write_indent();
            self.print_statement(member);
            self.write_newline();
        }
        self.indent_level -= 1;
        self.write_indent();
        self.write("}");
    }

    #[allow(clippy::too_many_arguments)]
    fn print_type_declaration(
        &mut self,
        keyword: &str,
        modifiers: ModifierFlags,
        identifier: &Identifier<'_>,
        type_parameters: &[TypeParameter<'_>],
        base_types: &[NamedType<'_>],
        constraints: &[WhereClause<'_>],
        members: &[Member<'_>],
    ) {
        self.print_modifiers(modifiers);
        self.write(keyword);
        self.write(" ");
        self.write(identifier.name);
        self.print_type_parameters(type_parameters);
        if !base_types.is_empty() {
            self.write(" : ");
            for (i, base) in base_types.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.print_type(base);
            }
        }
        self.print_where_clauses(constraints);
        self.write(" {");
        self.write_newline();
        self.indent_level += 1;
        for (i, member) in members.iter().enumerate() {
            if i > 0 {
                self.write_newline();
            }
            self.write_indent();
            self.print_member(member);
            self.write_newline();
        }
        self.indent_level -= 1;
        self.write_indent();
        self.write("}");
    }

    fn print_type_parameters(&mut self, type_parameters: &[TypeParameter<'_>]) {
        if type_parameters.is_empty() {
            return;
        }
        self.write("<");
        for (i, parameter) in type_parameters.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(parameter.identifier.name);
        }
        self.write(">");
    }

    fn print_where_clauses(&mut self, constraints: &[WhereClause<'_>]) {
        for clause in constraints {
            self.write(" where ");
            self.write(clause.parameter.name);
            self.write(" : ");
            for (i, bound) in clause.bounds.iter().enumerate() {
                if i > 0 {
                    self.write(", ");
                }
                self.print_type(bound);
            }
        }
    }

    fn print_enum(&mut self, node: &EnumDeclaration<'_>) {
        self.print_modifiers(node.modifiers);
        self.write("enum ");
        self.write(node.identifier.name);
        self.write(" {");
        self.write_newline();
        self.indent_level += 1;
        for (i, member) in node.members.iter().enumerate() {
            self.write_indent();
            self.write(member.identifier.name);
            if let Some(value) = member.value {
                self.write(" = ");
                self.print_expression(value);
            }
            if i + 1 < node.members.len() {
                self.write(",");
            }
            self.write_newline();
        }
        self.indent_level -= 1;
        self.write_indent();
        self.write("}");
    }

    fn print_member(&mut self, member: &Member<'_>) {
        match member {
            Member::Method(n) => self.print_method(n),
            Member::Constructor(n) => self.print_constructor(n),
            Member::Property(n) => self.print_property(n),
            Member::Event(n) => {
                self.print_modifiers(n.modifiers);
                self.write("event ");
                self.print_type(&n.event_type);
                self.write(" ");
                self.write(n.identifier.name);
                self.write(";");
            }
        }
    }

    fn print_method(&mut self, node: &MethodDeclaration<'_>) {
        self.print_modifiers(node.modifiers);
        self.print_type(&node.return_type);
        self.write(" ");
        self.write(node.identifier.name);
        self.print_type_parameters(node.type_parameters);
        self.print_parameters(node.parameters);
        self.print_where_clauses(node.constraints);
        match &node.body {
            Some(body) => {
                self.write(" ");
                self.print_block(body);
            }
            None => self.write(";"),
        }
    }

    fn print_constructor(&mut self, node: &ConstructorDeclaration<'_>) {
        self.print_modifiers(node.modifiers);
        self.write(node.identifier.name);
        self.print_parameters(node.parameters);
        self.write(" ");
        self.print_block(&node.body);
    }

    fn print_property(&mut self, node: &PropertyDeclaration<'_>) {
        self.print_modifiers(node.modifiers);
        self.print_type(&node.property_type);
        self.write(" ");
        self.write(node.identifier.name);

        let auto = node.accessors.iter().all(|accessor| accessor.body.is_none());
        if auto {
            self.write(" { ");
            for accessor in node.accessors {
                self.write(accessor.kind.text());
                self.write("; ");
            }
            self.write("}");
            return;
        }

        self.write(" {");
        self.write_newline();
        self.indent_level += 1;
        for accessor in node.accessors {
            self.write_indent();
            self.write(accessor.kind.text());
            match &accessor.body {
                Some(body) => {
                    self.write(" ");
                    self.print_block(body);
                }
                None => self.write(";"),
            }
            self.write_newline();
        }
        self.indent_level -= 1;
        self.write_indent();
        self.write("}");
    }

    fn print_parameters(&mut self, parameters: &[Parameter<'_>]) {
        self.write("(");
        for (i, parameter) in parameters.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            if let Some(modifier) = parameter.modifier {
                self.write(modifier.text());
                self.write(" ");
            }
            self.print_type(&parameter.parameter_type);
            self.write(" ");
            self.write(parameter.identifier.name);
            if let Some(default_value) = parameter.default_value {
                self.write(" = ");
                self.print_expression(default_value);
            }
        }
        self.write(")");
    }

    // ========================================================================
    // Statements
    // ========================================================================

    fn print_local_declaration(&mut self, node: &LocalDeclaration<'_>) {
        match &node.declared_type {
            Some(declared_type) => self.print_type(declared_type),
            None => self.write("var"),
        }
        self.write(" ");
        self.write(node.identifier.name);
        if let Some(initializer) = node.initializer {
            self.write(" = ");
            self.print_expression(initializer);
        }
    }

    fn print_block(&mut self, block: &Block<'_>) {
        if block.body.is_empty() {
            self.write("{ }");
            return;
        }
        self.write("{");
        self.write_newline();
        self.indent_level += 1;
        for statement in block.body {
            self.write_indent();
            self.print_statement(statement);
            self.write_newline();
        }
        self.indent_level -= 1;
        self.write_indent();
        self.write("}");
    }

    /// A statement head such as `if (…)`: a binary condition supplies the
    /// parentheses itself.
    fn print_condition_head(&mut self, condition: &Expression<'_>) {
        if matches!(condition, Expression::Binary(_)) {
            self.print_expression(condition);
        } else {
            self.write("(");
            self.print_expression(condition);
            self.write(")");
        }
    }

    fn print_if_statement(&mut self, node: &IfStatement<'_>) {
        self.write("if ");
        self.print_condition_head(node.condition);
        self.write(" ");
        self.print_statement(node.consequent);
        if let Some(alternate) = node.alternate {
            self.write(" else ");
            self.print_statement(alternate);
        }
    }

    fn print_for_statement(&mut self, node: &ForStatement<'_>) {
        self.write("for (");
        match &node.init {
            Some(ForInit::LocalDeclaration(declaration)) => {
                self.print_local_declaration(declaration)
            }
            Some(ForInit::Expression(expression)) => self.print_expression(expression),
            None => {}
        }
        self.write("; ");
        if let Some(condition) = node.condition {
            self.print_expression(condition);
        }
        self.write("; ");
        if let Some(update) = node.update {
            self.print_expression(update);
        }
        self.write(") ");
        self.print_statement(node.body);
    }

    fn print_foreach_statement(&mut self, node: &ForeachStatement<'_>) {
        self.write("foreach (");
        match &node.element_type {
            Some(element_type) => self.print_type(element_type),
            None => self.write("var"),
        }
        self.write(" ");
        self.write(node.identifier.name);
        self.write(" in ");
        self.print_expression(node.collection);
        self.write(") ");
        self.print_statement(node.body);
    }

    fn print_switch_statement(&mut self, node: &SwitchStatement<'_>) {
        self.write("switch ");
        self.print_condition_head(node.discriminant);
        self.write(" {");
        self.write_newline();
        self.indent_level += 1;
        for section in node.sections {
            for label in section.labels {
                self.write_indent();
                match label.value {
                    Some(value) => {
                        self.write("case ");
                        self.print_expression(value);
                        self.write(":");
                    }
                    None => self.write("default:"),
                }
                self.write_newline();
            }
            self.indent_level += 1;
            for statement in section.statements {
                self.write_indent();
                self.print_statement(statement);
                self.write_newline();
            }
            self.indent_level -= 1;
        }
        self.indent_level -= 1;
        self.write_indent();
        self.write("}");
    }

    fn print_try_statement(&mut self, node: &TryStatement<'_>) {
        self.write("try ");
        self.print_block(&node.block);
        for clause in node.catches {
            self.write(" catch ");
            if let Some(exception_type) = &clause.exception_type {
                self.write("(");
                self.print_type(exception_type);
                if let Some(identifier) = &clause.identifier {
                    self.write(" ");
                    self.write(identifier.name);
                }
                self.write(") ");
            }
            self.print_block(&clause.body);
        }
        if let Some(finally) = &node.finally {
            self.write(" finally ");
            self.print_block(finally);
        }
    }

    // ========================================================================
    // Expressions
    // ========================================================================

    fn print_expression(&mut self, expression: &Expression<'_>) {
        match expression {
            Expression::Assignment(n) => {
                self.print_expression(n.target);
                self.write(" ");
                self.write(Self::operator_text(n.operator));
                self.write(" ");
                self.print_expression(n.value);
            }
            Expression::Conditional(n) => {
                self.print_expression(n.condition);
                self.write(" ? ");
                self.print_expression(n.consequent);
                self.write(" : ");
                self.print_expression(n.alternate);
            }
            Expression::Binary(n) => {
                self.write("(");
                self.print_expression(n.left);
                self.write(" ");
                self.write(Self::operator_text(n.operator));
                self.write(" ");
                self.print_expression(n.right);
                self.write(")");
            }
            Expression::Unary(n) => {
                let op = Self::operator_text(n.operator);
                self.write(op);
                if n.operator.is_keyword() {
                    self.write(" ");
                }
                self.print_expression(n.operand);
            }
            Expression::Update(n) => {
                if n.prefix {
                    self.write(Self::operator_text(n.operator));
                    self.print_expression(n.operand);
                } else {
                    self.print_expression(n.operand);
                    self.write(Self::operator_text(n.operator));
                }
            }
            Expression::Invocation(n) => self.print_invocation(n),
            Expression::MemberAccess(n) => {
                self.print_expression(n.object);
                self.write(".");
                self.write(n.member.name);
            }
            Expression::ElementAccess(n) => {
                self.print_expression(n.object);
                self.write("[");
                self.print_expression(n.index);
                self.write("]");
            }
            Expression::ObjectCreation(n) => {
                self.write("new ");
                self.print_type(&n.created_type);
                self.write("(");
                for (i, argument) in n.arguments.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.print_expression(argument);
                }
                self.write(")");
            }
            Expression::AnonymousObject(n) => {
                self.write("new { ");
                for (i, initializer) in n.initializers.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.write(initializer.name);
                    self.write(" = ");
                    self.print_expression(initializer.value);
                }
                self.write(" }");
            }
            Expression::ArrayCreation(n) => {
                self.write("new[] { ");
                for (i, element) in n.elements.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.print_expression(element);
                }
                self.write(" }");
            }
            Expression::Identifier(n) => self.write(n.name),
            Expression::Literal(n) => self.print_literal(n),
            Expression::This(_) => self.write("this"),
            Expression::Base(_) => self.write("base"),
        }
    }

    /// `console.log(args)` renders as `Console.WriteLine(args)`.
    fn print_invocation(&mut self, node: &InvocationExpression<'_>) {
        if let Expression::MemberAccess(member) = node.callee {
            if let Expression::Identifier(object) = member.object {
                if object.name == "console" && member.member.name == "log" {
                    self.write("Console.WriteLine");
                    self.print_arguments(node.arguments);
                    return;
                }
            }
        }
        self.print_expression(node.callee);
        self.print_arguments(node.arguments);
    }

    fn print_arguments(&mut self, arguments: &[Expression<'_>]) {
        self.write("(");
        for (i, argument) in arguments.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.print_expression(argument);
        }
        self.write(")");
    }

    fn print_literal(&mut self, literal: &Literal<'_>) {
        match &literal.value {
            LiteralValue::String(s) => write_string_literal(&mut self.output, s),
            LiteralValue::Number(n) => self.write(n),
            LiteralValue::Boolean(true) => self.write("true"),
            LiteralValue::Boolean(false) => self.write("false"),
            LiteralValue::Null => self.write("null"),
        }
    }
}

impl Default for CsPrinter {
    fn default() -> Self {
        Self::new()
    }
}

/// Dotted text of a qualified name, for the `using System;` duplicate
/// check.
fn dotted_text(name: &QualifiedName<'_>) -> String {
    name.parts
        .iter()
        .map(|part| part.name)
        .collect::<Vec<_>>()
        .join(".")
}
