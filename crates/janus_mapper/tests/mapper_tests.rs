//! Mapper integration tests.
//!
//! Each test parses real source, maps it across, and asserts on the
//! produced AST and the conversion diagnostics.

use bumpalo::Bump;
use janus_ast::{cs, js, ModifierFlags, SyntaxKind};
use janus_core::Language;
use janus_mapper::{CsToJs, JsToCs};
use janus_metrics::MetricsSink;
use janus_scanner::{tokenize, TokenStream};

/// Helper: parse JavaScript, map to C#, hand the unit and sink to `f`.
fn map_js<T>(source: &str, f: impl FnOnce(&cs::CompilationUnit<'_>, &MetricsSink) -> T) -> T {
    let source_arena = Bump::new();
    let mut sink = MetricsSink::new();
    let parser = janus_parser::js::Parser::new(
        &source_arena,
        TokenStream::new(tokenize(source, Language::JavaScript)),
        &mut sink,
    );
    let program = parser.parse_program();
    assert!(!sink.diagnostics.has_errors(), "parse failed: {:?}", source);

    let target_arena = Bump::new();
    let mut mapper = JsToCs::new(&target_arena, &mut sink);
    let unit = mapper.map_program(&program);
    f(&unit, &sink)
}

/// Helper: parse C#, map to JavaScript, hand the program and sink to `f`.
fn map_cs<T>(source: &str, f: impl FnOnce(&js::Program<'_>, &MetricsSink) -> T) -> T {
    let source_arena = Bump::new();
    let mut sink = MetricsSink::new();
    let parser = janus_parser::cs::Parser::new(
        &source_arena,
        TokenStream::new(tokenize(source, Language::CSharp)),
        &mut sink,
    );
    let unit = parser.parse_compilation_unit();
    assert!(!sink.diagnostics.has_errors(), "parse failed: {:?}", source);

    let target_arena = Bump::new();
    let mut mapper = CsToJs::new(&target_arena, &mut sink);
    let program = mapper.map_unit(&unit);
    f(&program, &sink)
}

fn warning_messages(sink: &MetricsSink) -> Vec<String> {
    sink.diagnostics
        .diagnostics()
        .iter()
        .filter(|d| !d.is_error())
        .map(|d| d.message.clone())
        .collect()
}

// ============================================================================
// JavaScript -> C#
// ============================================================================

#[test]
fn function_becomes_public_static_void_method() {
    map_js("function greet(name) { console.log(name); }", |unit, _| {
        let cs::Statement::Method(method) = &unit.members[0] else {
            panic!("expected a free-standing method");
        };
        assert!(method.modifiers.contains(ModifierFlags::PUBLIC));
        assert!(method.modifiers.contains(ModifierFlags::STATIC));
        assert_eq!(method.return_type.name.last().name, "void");
        // Parameters default to `string`.
        assert_eq!(method.parameters[0].parameter_type.name.last().name, "string");
    });
}

#[test]
fn let_becomes_var_local() {
    map_js("let name = \"John\";", |unit, _| {
        let cs::Statement::LocalDeclaration(local) = &unit.members[0] else {
            panic!("expected a local declaration");
        };
        assert!(local.declared_type.is_none());
        assert_eq!(local.identifier.name, "name");
        assert!(local.initializer.is_some());
    });
}

#[test]
fn multi_declarator_keeps_first_and_warns() {
    map_js("let a = 1, b = 2;", |unit, sink| {
        let cs::Statement::LocalDeclaration(local) = &unit.members[0] else {
            panic!("expected a local declaration");
        };
        assert_eq!(local.identifier.name, "a");
        assert!(warning_messages(sink).iter().any(|m| m.contains("b")));
    });
}

#[test]
fn strict_equality_narrows_with_warning() {
    map_js("let same = a === b;", |unit, sink| {
        let cs::Statement::LocalDeclaration(local) = &unit.members[0] else {
            panic!("expected a local declaration");
        };
        let Some(cs::Expression::Binary(binary)) = local.initializer else {
            panic!("expected a binary initializer");
        };
        assert_eq!(binary.operator, SyntaxKind::EqualsEqualsToken);
        assert!(warning_messages(sink).iter().any(|m| m.contains("===")));
    });
}

#[test]
fn for_of_becomes_foreach() {
    map_js("for (let item of items) { use(item); }", |unit, _| {
        let cs::Statement::Foreach(foreach) = &unit.members[0] else {
            panic!("expected a foreach");
        };
        assert!(foreach.element_type.is_none());
        assert_eq!(foreach.identifier.name, "item");
    });
}

#[test]
fn object_literal_becomes_anonymous_object() {
    map_js("let config = { name: \"x\", size: 3 };", |unit, _| {
        let cs::Statement::LocalDeclaration(local) = &unit.members[0] else {
            panic!("expected a local declaration");
        };
        let Some(cs::Expression::AnonymousObject(object)) = local.initializer else {
            panic!("expected an anonymous object");
        };
        assert_eq!(object.initializers.len(), 2);
        assert_eq!(object.initializers[0].name, "name");
    });
}

#[test]
fn array_literal_becomes_array_creation() {
    map_js("let xs = [1, 2, 3];", |unit, _| {
        let cs::Statement::LocalDeclaration(local) = &unit.members[0] else {
            panic!("expected a local declaration");
        };
        assert!(matches!(
            local.initializer,
            Some(cs::Expression::ArrayCreation(_))
        ));
    });
}

#[test]
fn js_class_maps_to_cs_class() {
    let source = r#"
        class Person {
            constructor(name) {
                this.name = name;
            }
            greet() {
                console.log(this.name);
            }
        }
    "#;
    map_js(source, |unit, _| {
        let cs::Statement::Class(class) = &unit.members[0] else {
            panic!("expected a class");
        };
        assert!(class.modifiers.contains(ModifierFlags::PUBLIC));
        // The constructor takes the class's name.
        let cs::Member::Constructor(constructor) = &class.members[0] else {
            panic!("expected a constructor");
        };
        assert_eq!(constructor.identifier.name, "Person");
        assert!(matches!(class.members[1], cs::Member::Method(_)));
    });
}

#[test]
fn catch_parameter_gains_exception_type() {
    map_js("try { risky(); } catch (e) { log(e); }", |unit, _| {
        let cs::Statement::Try(try_statement) = &unit.members[0] else {
            panic!("expected a try");
        };
        let clause = &try_statement.catches[0];
        assert_eq!(
            clause.exception_type.as_ref().unwrap().name.last().name,
            "Exception"
        );
        assert_eq!(clause.identifier.as_ref().unwrap().name, "e");
    });
}

#[test]
fn mapped_nodes_preserve_source_lines() {
    map_js("let a = 1;\nlet b = 2;\nlet c = 3;", |unit, _| {
        let lines: Vec<u32> = unit.members.iter().map(|m| m.line()).collect();
        assert_eq!(lines, vec![1, 2, 3]);
    });
}

// ============================================================================
// C# -> JavaScript
// ============================================================================

#[test]
fn usings_are_dropped_with_a_note() {
    map_cs("using System;\nConsole.WriteLine(\"Hi\");", |program, sink| {
        assert_eq!(program.body.len(), 1);
        assert!(warning_messages(sink).iter().any(|m| m.contains("System")));
    });
}

#[test]
fn namespace_flattens_into_program() {
    let source = r#"
        namespace Demo {
            public class A {
            }
            public class B {
            }
        }
    "#;
    map_cs(source, |program, sink| {
        assert_eq!(program.body.len(), 2);
        assert!(warning_messages(sink).iter().any(|m| m.contains("Demo")));
    });
}

#[test]
fn equality_raises_with_warning() {
    map_cs("var same = a == b;", |program, sink| {
        let js::Statement::VariableDeclaration(declaration) = &program.body[0] else {
            panic!("expected a declaration");
        };
        let Some(js::Expression::Binary(binary)) = declaration.declarations[0].init else {
            panic!("expected a binary initializer");
        };
        assert_eq!(binary.operator, SyntaxKind::EqualsEqualsEqualsToken);
        assert!(warning_messages(sink).iter().any(|m| m.contains("==")));
    });
}

#[test]
fn method_modifiers_and_return_type_are_dropped() {
    let source = r#"
        public class Greeter {
            public static void Greet(string name) {
                Console.WriteLine(name);
            }
        }
    "#;
    map_cs(source, |program, _| {
        let js::Statement::ClassDeclaration(class) = &program.body[0] else {
            panic!("expected a class");
        };
        let method = &class.body[0];
        assert_eq!(method.kind, js::MethodKind::Method);
        assert!(method.is_static);
        assert_eq!(method.params[0].name, "name");
    });
}

#[test]
fn local_declarations_become_var() {
    map_cs("int total = 10;", |program, _| {
        let js::Statement::VariableDeclaration(declaration) = &program.body[0] else {
            panic!("expected a declaration");
        };
        assert_eq!(declaration.kind, js::VarKind::Var);
        assert_eq!(declaration.declarations.len(), 1);
    });
}

#[test]
fn enum_lowers_to_const_object() {
    map_cs("public enum Color { Red, Green = 5, Blue }", |program, _| {
        let js::Statement::VariableDeclaration(declaration) = &program.body[0] else {
            panic!("expected a declaration");
        };
        assert_eq!(declaration.kind, js::VarKind::Const);
        let Some(js::Expression::Object(object)) = declaration.declarations[0].init else {
            panic!("expected an object literal");
        };
        assert_eq!(object.properties.len(), 3);
        assert_eq!(object.properties[0].key, "Red");
    });
}

#[test]
fn do_while_lowers_to_while_with_warning() {
    map_cs("do { Step(); } while (busy);", |program, sink| {
        assert!(matches!(program.body[0], js::Statement::While(_)));
        assert!(warning_messages(sink)
            .iter()
            .any(|m| m.contains("do/while")));
    });
}

#[test]
fn struct_becomes_class_with_warning() {
    map_cs("public struct Point { public void Reset() { } }", |program, sink| {
        assert!(matches!(program.body[0], js::Statement::ClassDeclaration(_)));
        assert!(warning_messages(sink).iter().any(|m| m.contains("Point")));
    });
}

#[test]
fn interface_becomes_comment_marker() {
    map_cs("public interface IShape { double Area(); }", |program, sink| {
        let js::Statement::Comment(comment) = &program.body[0] else {
            panic!("expected a comment marker");
        };
        assert!(comment.text.contains("IShape"));
        assert!(warning_messages(sink).iter().any(|m| m.contains("IShape")));
    });
}

#[test]
fn numeric_suffix_is_stripped() {
    map_cs("var pi = 3.14f;", |program, sink| {
        let js::Statement::VariableDeclaration(declaration) = &program.body[0] else {
            panic!("expected a declaration");
        };
        let Some(js::Expression::Literal(literal)) = declaration.declarations[0].init else {
            panic!("expected a literal");
        };
        let janus_ast::LiteralValue::Number(lexeme) = literal.value else {
            panic!("expected a number");
        };
        assert_eq!(lexeme, "3.14");
        assert!(warning_messages(sink).iter().any(|m| m.contains("3.14f")));
    });
}

#[test]
fn foreach_becomes_for_of() {
    map_cs("foreach (var item in items) { Use(item); }", |program, _| {
        let js::Statement::ForOf(for_of) = &program.body[0] else {
            panic!("expected a for-of");
        };
        assert_eq!(for_of.binding.name, "item");
    });
}

#[test]
fn extra_catch_clauses_are_truncated() {
    let source = "try { Risky(); } catch (IOException e) { A(); } catch { B(); }";
    map_cs(source, |program, sink| {
        let js::Statement::Try(try_statement) = &program.body[0] else {
            panic!("expected a try");
        };
        assert!(try_statement.handler.is_some());
        assert!(warning_messages(sink)
            .iter()
            .any(|m| m.contains("single catch")));
    });
}
