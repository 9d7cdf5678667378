//! The JavaScript printer.

use crate::{write_string_literal, PrinterOptions};
use janus_ast::js::*;
use janus_ast::types::LiteralValue;
use janus_ast::SyntaxKind;

pub struct JsPrinter {
    output: String,
    indent_level: u32,
    options: PrinterOptions,
}

impl JsPrinter {
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

    pub fn print_program(&mut self, program: &Program<'_>) -> String {
        self.output.clear();
        for (i, statement) in program.body.iter().enumerate() {
            if i > 0 {
                self.write_newline();
            }
            self.write_indent();
            self.print_statement(statement);
        }
        if self.options.trailing_newline && !self.output.is_empty() {
            self.write_newline();
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

    // ========================================================================
    // Statements
    // ========================================================================

    fn print_statement(&mut self, statement: &Statement<'_>) {
        match statement {
            Statement::VariableDeclaration(n) => {
                self.print_variable_declaration(n);
                self.write(";");
            }
            Statement::FunctionDeclaration(n) => self.print_function_declaration(n),
            Statement::ClassDeclaration(n) => self.print_class_declaration(n),
            Statement::Block(n) => self.print_block(n),
            Statement::If(n) => self.print_if_statement(n),
            Statement::While(n) => {
                self.write("while ");
                self.print_condition_head(n.test);
                self.write(" ");
                self.print_statement_body(n.body);
            }
            Statement::For(n) => self.print_for_statement(n),
            Statement::ForOf(n) => {
                self.write("for (");
                self.write(n.kind.text());
                self.write(" ");
                self.write(n.binding.name);
                self.write(" of ");
                self.print_expression(n.object);
                self.write(") ");
                self.print_statement_body(n.body);
            }
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
                self.write("throw ");
                self.print_expression(n.argument);
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

    fn print_variable_declaration(&mut self, node: &VariableDeclaration<'_>) {
        self.write(node.kind.text());
        self.write(" ");
        for (i, declarator) in node.declarations.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(declarator.id.name);
            if let Some(init) = declarator.init {
                self.write(" = ");
                self.print_expression(init);
            }
        }
    }

    fn print_function_declaration(&mut self, node: &FunctionDeclaration<'_>) {
        if node.is_async {
            self.write("async ");
        }
        self.write("function ");
        self.write(node.id.name);
        self.print_parameter_names(node.params);
        self.write(" ");
        self.print_block(&node.body);
    }

    fn print_parameter_names(&mut self, params: &[Identifier<'_>]) {
        self.write("(");
        for (i, param) in params.iter().enumerate() {
            if i > 0 {
                self.write(", ");
            }
            self.write(param.name);
        }
        self.write(")");
    }

    fn print_class_declaration(&mut self, node: &ClassDeclaration<'_>) {
        self.write("class ");
        self.write(node.id.name);
        if let Some(superclass) = &node.superclass {
            self.write(" extends ");
            self.write(superclass.name);
        }
        self.write(" {");
        self.write_newline();
        self.indent_level += 1;
        for (i, method) in node.body.iter().enumerate() {
            if i > 0 {
                self.write_newline();
            }
            self.write_indent();
            self.print_method_definition(method);
            self.write_newline();
        }
        self.indent_level -= 1;
        self.write_indent();
        self.write("}");
    }

    fn print_method_definition(&mut self, node: &MethodDefinition<'_>) {
        if node.is_static {
            self.write("static ");
        }
        if node.is_async {
            self.write("async ");
        }
        match node.kind {
            MethodKind::Get => self.write("get "),
            MethodKind::Set => self.write("set "),
            MethodKind::Method | MethodKind::Constructor => {}
        }
        self.write(node.key.name);
        self.print_parameter_names(node.params);
        self.write(" ");
        self.print_block(&node.body);
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

    /// Bodies of `if`/`while`/`for` statements: blocks print in place,
    /// anything else prints as the single statement it is.
    fn print_statement_body(&mut self, body: &Statement<'_>) {
        self.print_statement(body);
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
        self.print_condition_head(node.test);
        self.write(" ");
        self.print_statement_body(node.consequent);
        if let Some(alternate) = node.alternate {
            self.write(" else ");
            self.print_statement_body(alternate);
        }
    }

    fn print_for_statement(&mut self, node: &ForStatement<'_>) {
        self.write("for (");
        match &node.init {
            Some(ForInit::VariableDeclaration(declaration)) => {
                self.print_variable_declaration(declaration)
            }
            Some(ForInit::Expression(expression)) => self.print_expression(expression),
            None => {}
        }
        self.write("; ");
        if let Some(test) = node.test {
            self.print_expression(test);
        }
        self.write("; ");
        if let Some(update) = node.update {
            self.print_expression(update);
        }
        self.write(") ");
        self.print_statement_body(node.body);
    }

    fn print_switch_statement(&mut self, node: &SwitchStatement<'_>) {
        self.write("switch ");
        self.print_condition_head(node.discriminant);
        self.write(" {");
        self.write_newline();
        self.indent_level += 1;
        for case in node.cases {
            self.write_indent();
            match case.test {
                Some(test) => {
                    self.write("case ");
                    self.print_expression(test);
                    self.write(":");
                }
                None => self.write("default:"),
            }
            self.write_newline();
            self.indent_level += 1;
            for statement in case.consequent {
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
        if let Some(handler) = &node.handler {
            self.write(" catch ");
            if let Some(param) = &handler.param {
                self.write("(");
                self.write(param.name);
                self.write(") ");
            }
            self.print_block(&handler.body);
        }
        if let Some(finalizer) = &node.finalizer {
            self.write(" finally ");
            self.print_block(finalizer);
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
                self.print_expression(n.test);
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
            Expression::Call(n) => self.print_call(n),
            Expression::New(n) => {
                self.write("new ");
                self.print_expression(n.callee);
                self.print_arguments(n.arguments);
            }
            Expression::Member(n) => {
                self.print_expression(n.object);
                self.write(".");
                self.write(n.property.name);
            }
            Expression::Index(n) => {
                self.print_expression(n.object);
                self.write("[");
                self.print_expression(n.index);
                self.write("]");
            }
            Expression::Identifier(n) => self.write(n.name),
            Expression::Literal(n) => self.print_literal(n),
            Expression::Array(n) => {
                self.write("[");
                for (i, element) in n.elements.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.print_expression(element);
                }
                self.write("]");
            }
            Expression::Object(n) => {
                self.write("{ ");
                for (i, property) in n.properties.iter().enumerate() {
                    if i > 0 {
                        self.write(", ");
                    }
                    self.write(property.key);
                    self.write(": ");
                    self.print_expression(property.value);
                }
                self.write(" }");
            }
            Expression::This(_) => self.write("this"),
        }
    }

    /// `Console.WriteLine(args)` renders as `console.log(args)`.
    fn print_call(&mut self, node: &CallExpression<'_>) {
        if let Expression::Member(member) = node.callee {
            if let Expression::Identifier(object) = member.object {
                if object.name == "Console" && member.property.name == "WriteLine" {
                    self.write("console.log");
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

impl Default for JsPrinter {
    fn default() -> Self {
        Self::new()
    }
}
