//! Parser integration tests for both languages.
//!
//! Verifies statement structure, error recovery, and the parse-side
//! metrics counters.

use bumpalo::Bump;
use janus_ast::{cs, js, SyntaxKind};
use janus_core::Language;
use janus_metrics::MetricsSink;
use janus_scanner::{tokenize, TokenStream};

/// Helper: parse JavaScript and hand the program plus sink to `f`.
fn with_js<T>(source: &str, f: impl FnOnce(&js::Program<'_>, &MetricsSink) -> T) -> T {
    let arena = Bump::new();
    let mut sink = MetricsSink::new();
    let parser = janus_parser::js::Parser::new(
        &arena,
        TokenStream::new(tokenize(source, Language::JavaScript)),
        &mut sink,
    );
    let program = parser.parse_program();
    f(&program, &sink)
}

/// Helper: parse C# and hand the compilation unit plus sink to `f`.
fn with_cs<T>(source: &str, f: impl FnOnce(&cs::CompilationUnit<'_>, &MetricsSink) -> T) -> T {
    let arena = Bump::new();
    let mut sink = MetricsSink::new();
    let parser = janus_parser::cs::Parser::new(
        &arena,
        TokenStream::new(tokenize(source, Language::CSharp)),
        &mut sink,
    );
    let unit = parser.parse_compilation_unit();
    f(&unit, &sink)
}

fn assert_js_statement_count(source: &str, expected: usize) {
    with_js(source, |program, sink| {
        assert!(
            !sink.diagnostics.has_errors(),
            "unexpected errors for {:?}: {:?}",
            source,
            sink.diagnostics.diagnostics()
        );
        assert_eq!(program.body.len(), expected, "source: {}", source);
    });
}

fn assert_cs_member_count(source: &str, expected: usize) {
    with_cs(source, |unit, sink| {
        assert!(
            !sink.diagnostics.has_errors(),
            "unexpected errors for {:?}: {:?}",
            source,
            sink.diagnostics.diagnostics()
        );
        assert_eq!(unit.members.len(), expected, "source: {}", source);
    });
}

// ============================================================================
// JavaScript statements
// ============================================================================

#[test]
fn parse_variable_declarations() {
    assert_js_statement_count("let x = 42;", 1);
    assert_js_statement_count("const y = 'hi'; var z = true;", 2);
}

#[test]
fn parse_multi_declarator_statement() {
    with_js("let a = 1, b = 2, c;", |program, _| {
        let js::Statement::VariableDeclaration(declaration) = &program.body[0] else {
            panic!("expected a variable declaration");
        };
        assert_eq!(declaration.declarations.len(), 3);
        assert_eq!(declaration.declarations[2].id.name, "c");
        assert!(declaration.declarations[2].init.is_none());
    });
}

#[test]
fn parse_function_declaration() {
    assert_js_statement_count("function add(a, b) { return a + b; }", 1);
}

#[test]
fn parse_async_function() {
    with_js("async function load() { return 1; }", |program, _| {
        let js::Statement::FunctionDeclaration(function) = &program.body[0] else {
            panic!("expected a function declaration");
        };
        assert!(function.is_async);
    });
}

#[test]
fn parse_class_with_members() {
    let source = r#"
        class Person {
            constructor(name) {
                this.name = name;
            }
            greet() {
                return "Hello, " + this.name;
            }
            static origin() {
                return null;
            }
            get title() {
                return this.name;
            }
        }
    "#;
    with_js(source, |program, sink| {
        assert!(!sink.diagnostics.has_errors());
        let js::Statement::ClassDeclaration(class) = &program.body[0] else {
            panic!("expected a class declaration");
        };
        assert_eq!(class.body.len(), 4);
        assert_eq!(class.body[0].kind, js::MethodKind::Constructor);
        assert_eq!(class.body[1].kind, js::MethodKind::Method);
        assert!(class.body[2].is_static);
        assert_eq!(class.body[3].kind, js::MethodKind::Get);
    });
}

#[test]
fn parse_class_extends() {
    with_js("class Dog extends Animal { }", |program, _| {
        let js::Statement::ClassDeclaration(class) = &program.body[0] else {
            panic!("expected a class declaration");
        };
        assert_eq!(class.superclass.as_ref().unwrap().name, "Animal");
    });
}

#[test]
fn parse_control_flow() {
    assert_js_statement_count("if (x > 0) { x = 1; } else { x = 2; }", 1);
    assert_js_statement_count("while (ok) { step(); }", 1);
    assert_js_statement_count("for (let i = 0; i < 10; i++) { work(i); }", 1);
    assert_js_statement_count("for (let item of items) { use(item); }", 1);
}

#[test]
fn parse_switch_statement() {
    let source = r#"
        switch (day) {
            case 1:
                open();
                break;
            default:
                close();
        }
    "#;
    with_js(source, |program, _| {
        let js::Statement::Switch(switch) = &program.body[0] else {
            panic!("expected a switch statement");
        };
        assert_eq!(switch.cases.len(), 2);
        assert!(switch.cases[0].test.is_some());
        assert!(switch.cases[1].test.is_none());
    });
}

#[test]
fn parse_try_catch_finally() {
    assert_js_statement_count("try { risky(); } catch (e) { log(e); } finally { done(); }", 1);
}

#[test]
fn parse_throw_statement() {
    assert_js_statement_count("throw new Error(\"bad\");", 1);
}

#[test]
fn stray_semicolons_are_skipped() {
    assert_js_statement_count(";;let x = 1;;", 1);
}

// ============================================================================
// JavaScript expressions
// ============================================================================

#[test]
fn parse_call_and_member_chain() {
    with_js("console.log(greeting);", |program, _| {
        let js::Statement::Expression(statement) = &program.body[0] else {
            panic!("expected an expression statement");
        };
        let js::Expression::Call(call) = statement.expression else {
            panic!("expected a call");
        };
        let js::Expression::Member(member) = call.callee else {
            panic!("expected a member callee");
        };
        assert_eq!(member.property.name, "log");
        assert_eq!(call.arguments.len(), 1);
    });
}

#[test]
fn parse_assignment_right_associative() {
    with_js("a = b = 1;", |program, _| {
        let js::Statement::Expression(statement) = &program.body[0] else {
            panic!("expected an expression statement");
        };
        let js::Expression::Assignment(outer) = statement.expression else {
            panic!("expected an assignment");
        };
        assert!(matches!(outer.value, js::Expression::Assignment(_)));
    });
}

#[test]
fn parse_object_and_array_literals() {
    assert_js_statement_count("let config = { name: \"x\", size: 3 };", 1);
    assert_js_statement_count("let xs = [1, 2, 3];", 1);
}

#[test]
fn parse_conditional_expression() {
    assert_js_statement_count("let label = ok ? \"yes\" : \"no\";", 1);
}

// ============================================================================
// Error recovery
// ============================================================================

#[test]
fn recovery_resumes_at_next_statement() {
    with_js("let = 5; let y = 2;", |program, sink| {
        assert!(sink.diagnostics.has_errors());
        assert_eq!(sink.error_recovery_count, 1);
        // The second declaration still parses.
        assert_eq!(program.body.len(), 1);
    });
}

#[test]
fn unmatched_brace_recovers_at_eof() {
    with_js("{", |_, sink| {
        assert_eq!(sink.diagnostics.error_count(), 1);
        assert_eq!(sink.error_recovery_count, 1);
    });
}

#[test]
fn totality_on_garbage_input() {
    with_js("# @ ## ]] )(", |program, sink| {
        // Terminates, yields a root, records errors.
        assert!(program.body.is_empty());
        assert!(sink.diagnostics.has_errors());
    });
}

#[test]
fn const_requires_initializer() {
    with_js("const x;", |_, sink| {
        assert!(sink
            .diagnostics
            .diagnostics()
            .iter()
            .any(|d| d.message.contains("must have an initializer")));
    });
}

// ============================================================================
// Metrics
// ============================================================================

#[test]
fn tokens_processed_counts_non_eof_tokens() {
    with_js("let x = 1;", |_, sink| {
        assert_eq!(sink.tokens_processed, 5);
    });
}

#[test]
fn node_count_is_deterministic() {
    let first = with_js("let x = 1 + 2;", |_, sink| sink.ast_nodes);
    let second = with_js("let x = 1 + 2;", |_, sink| sink.ast_nodes);
    assert!(first > 0);
    assert_eq!(first, second);
}

#[test]
fn clean_parse_has_full_accuracy() {
    with_js("let x = 1;", |_, sink| {
        assert_eq!(sink.syntax_accuracy(), 100.0);
        assert_eq!(sink.error_recovery_count, 0);
    });
}

// ============================================================================
// C# compilation units
// ============================================================================

#[test]
fn parse_using_directives() {
    with_cs("using System;\nusing System.Collections.Generic;\n", |unit, sink| {
        assert!(!sink.diagnostics.has_errors());
        assert_eq!(unit.usings.len(), 2);
        assert_eq!(unit.usings[1].name.parts.len(), 3);
    });
}

#[test]
fn parse_namespace_with_class() {
    let source = r#"
        namespace Demo.App {
            public class Greeter {
                public void Greet() {
                    Console.WriteLine("hi");
                }
            }
        }
    "#;
    with_cs(source, |unit, sink| {
        assert!(!sink.diagnostics.has_errors());
        let cs::Statement::Namespace(namespace) = &unit.members[0] else {
            panic!("expected a namespace");
        };
        assert_eq!(namespace.name.parts.len(), 2);
        assert!(matches!(namespace.members[0], cs::Statement::Class(_)));
    });
}

#[test]
fn constructor_vs_method_dispatch() {
    let source = r#"
        public class Person {
            Person(string name) {
                this.name = name;
            }
            Person Clone() {
                return this;
            }
        }
    "#;
    with_cs(source, |unit, sink| {
        assert!(!sink.diagnostics.has_errors(), "{:?}", sink.diagnostics.diagnostics());
        let cs::Statement::Class(class) = &unit.members[0] else {
            panic!("expected a class");
        };
        assert!(matches!(class.members[0], cs::Member::Constructor(_)));
        // `Person Clone()` returns the identifier-typed `Person`, so it
        // must parse as a method, not a second constructor.
        let cs::Member::Method(method) = &class.members[1] else {
            panic!("expected a method");
        };
        assert_eq!(method.identifier.name, "Clone");
        assert_eq!(method.return_type.name.last().name, "Person");
    });
}

#[test]
fn parse_property_accessors() {
    let source = r#"
        public class Account {
            public string Name { get; set; }
            public int Total {
                get {
                    return 1;
                }
            }
        }
    "#;
    with_cs(source, |unit, sink| {
        assert!(!sink.diagnostics.has_errors());
        let cs::Statement::Class(class) = &unit.members[0] else {
            panic!("expected a class");
        };
        let cs::Member::Property(auto) = &class.members[0] else {
            panic!("expected a property");
        };
        assert_eq!(auto.accessors.len(), 2);
        assert!(auto.accessors.iter().all(|a| a.body.is_none()));
        let cs::Member::Property(bodied) = &class.members[1] else {
            panic!("expected a property");
        };
        assert!(bodied.accessors[0].body.is_some());
    });
}

#[test]
fn parse_event_and_parameter_modifiers() {
    let source = r#"
        public class Channel {
            public event EventHandler Closed;
            public bool TryRead(out string value, ref int count, params string[] rest) {
                return false;
            }
        }
    "#;
    with_cs(source, |unit, sink| {
        assert!(!sink.diagnostics.has_errors(), "{:?}", sink.diagnostics.diagnostics());
        let cs::Statement::Class(class) = &unit.members[0] else {
            panic!("expected a class");
        };
        assert!(matches!(class.members[0], cs::Member::Event(_)));
        let cs::Member::Method(method) = &class.members[1] else {
            panic!("expected a method");
        };
        assert_eq!(method.parameters[0].modifier, Some(cs::ParameterModifier::Out));
        assert_eq!(method.parameters[1].modifier, Some(cs::ParameterModifier::Ref));
        assert_eq!(method.parameters[2].modifier, Some(cs::ParameterModifier::Params));
        assert!(method.parameters[2].parameter_type.is_array);
    });
}

#[test]
fn parse_generic_class_with_constraint() {
    let source = r#"
        public class Repo<T> : Store where T : Entity {
            public void Add(T item) {
            }
        }
    "#;
    with_cs(source, |unit, sink| {
        assert!(!sink.diagnostics.has_errors());
        let cs::Statement::Class(class) = &unit.members[0] else {
            panic!("expected a class");
        };
        assert_eq!(class.type_parameters.len(), 1);
        assert_eq!(class.base_types.len(), 1);
        assert_eq!(class.constraints.len(), 1);
    });
}

#[test]
fn parse_nested_type_arguments() {
    with_cs("var table = new Dictionary<string, List<int>>();", |unit, sink| {
        assert!(!sink.diagnostics.has_errors(), "{:?}", sink.diagnostics.diagnostics());
        let cs::Statement::LocalDeclaration(local) = &unit.members[0] else {
            panic!("expected a local declaration");
        };
        let Some(cs::Expression::ObjectCreation(creation)) = local.initializer else {
            panic!("expected an object creation");
        };
        assert_eq!(creation.created_type.type_arguments.len(), 2);
        assert_eq!(creation.created_type.type_arguments[1].type_arguments.len(), 1);
    });
}

#[test]
fn parse_enum_declaration() {
    with_cs("public enum Color { Red, Green = 5, Blue }", |unit, sink| {
        assert!(!sink.diagnostics.has_errors());
        let cs::Statement::Enum(declaration) = &unit.members[0] else {
            panic!("expected an enum");
        };
        assert_eq!(declaration.members.len(), 3);
        assert!(declaration.members[1].value.is_some());
    });
}

#[test]
fn parse_struct_and_interface() {
    assert_cs_member_count(
        "public struct Point { public int X { get; set; } }\npublic interface IShape { double Area(); }",
        2,
    );
}

// ============================================================================
// C# statements
// ============================================================================

#[test]
fn parse_do_while_and_foreach() {
    assert_cs_member_count("do { Step(); } while (busy);", 1);
    assert_cs_member_count("foreach (var item in items) { Use(item); }", 1);
    assert_cs_member_count("foreach (string name in names) { Use(name); }", 1);
}

#[test]
fn parse_typed_local_declaration() {
    with_cs("int total = 0;", |unit, _| {
        let cs::Statement::LocalDeclaration(local) = &unit.members[0] else {
            panic!("expected a local declaration");
        };
        assert_eq!(local.declared_type.as_ref().unwrap().name.last().name, "int");
    });
}

#[test]
fn parse_switch_sections_with_shared_labels() {
    let source = r#"
        switch (code) {
            case 1:
            case 2:
                Handle();
                break;
            default:
                Ignore();
                break;
        }
    "#;
    with_cs(source, |unit, sink| {
        assert!(!sink.diagnostics.has_errors());
        let cs::Statement::Switch(switch) = &unit.members[0] else {
            panic!("expected a switch");
        };
        assert_eq!(switch.sections.len(), 2);
        assert_eq!(switch.sections[0].labels.len(), 2);
    });
}

#[test]
fn parse_try_with_typed_catch() {
    let source = "try { Risky(); } catch (InvalidOperationException e) { Log(e); } catch { } finally { Done(); }";
    with_cs(source, |unit, sink| {
        assert!(!sink.diagnostics.has_errors());
        let cs::Statement::Try(try_statement) = &unit.members[0] else {
            panic!("expected a try statement");
        };
        assert_eq!(try_statement.catches.len(), 2);
        assert!(try_statement.catches[0].exception_type.is_some());
        assert!(try_statement.catches[1].exception_type.is_none());
        assert!(try_statement.finally.is_some());
    });
}

#[test]
fn parse_bare_statements_at_top_level() {
    assert_cs_member_count("Console.WriteLine(\"Hi\");", 1);
}

#[test]
fn cs_recovery_counts_synchronizations() {
    with_cs("var = 1; var ok = 2;", |unit, sink| {
        assert!(sink.diagnostics.has_errors());
        assert_eq!(sink.error_recovery_count, 1);
        assert_eq!(unit.members.len(), 1);
    });
}
