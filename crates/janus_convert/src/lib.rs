//! janus_convert: the conversion and syntax-check entry points.
//!
//! Four total functions make up the library surface:
//!
//! ```text
//! convert_js_to_cs(&str) -> ConversionResult
//! convert_cs_to_js(&str) -> ConversionResult
//! check_js(&str)         -> CheckResult
//! check_cs(&str)         -> CheckResult
//! ```
//!
//! A request owns everything it allocates: one arena for the source AST,
//! one for the target AST, one metrics sink. Nothing is shared between
//! requests and nothing is thrown across this boundary; all failure detail
//! travels in the result record's diagnostics.

use bumpalo::Bump;
use janus_core::Language;
use janus_metrics::{MetricsReport, MetricsSink};

pub use janus_diagnostics::{Diagnostic, DiagnosticKind, Severity};
use janus_mapper::{CsToJs, JsToCs};
use janus_printer::{CsPrinter, JsPrinter};
use janus_scanner::{tokenize, TokenStream};
use serde::Serialize;
use std::time::Instant;

/// The result record for a conversion request.
#[derive(Debug, Serialize)]
pub struct ConversionResult {
    pub success: bool,
    pub converted_code: String,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    pub rdp_parsing_time_ms: f64,
    pub conversion_time_ms: f64,
    pub ast_nodes: u64,
    pub tokens_processed: u64,
    pub memory_usage_kb: u64,
    pub error_recovery_count: u64,
    pub syntax_accuracy: f64,
    pub semantic_preservation: f64,
}

impl ConversionResult {
    fn from_sink(converted_code: String, sink: &MetricsSink) -> Self {
        let (errors, warnings) = split_diagnostics(sink);
        Self {
            success: errors.is_empty(),
            converted_code,
            errors,
            warnings,
            rdp_parsing_time_ms: sink.parsing_time_ms,
            conversion_time_ms: sink.conversion_time_ms,
            ast_nodes: sink.ast_nodes,
            tokens_processed: sink.tokens_processed,
            memory_usage_kb: sink.memory_usage_kb,
            error_recovery_count: sink.error_recovery_count,
            syntax_accuracy: sink.syntax_accuracy(),
            semantic_preservation: sink.semantic_preservation(),
        }
    }
}

/// The result record for a syntax-check request. No AST is exposed.
#[derive(Debug, Serialize)]
pub struct CheckResult {
    pub success: bool,
    pub errors: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
    #[serde(flatten)]
    pub metrics: MetricsReport,
}

impl CheckResult {
    fn from_sink(sink: &MetricsSink) -> Self {
        let (errors, warnings) = split_diagnostics(sink);
        Self {
            success: errors.is_empty(),
            errors,
            warnings,
            metrics: sink.report(),
        }
    }
}

/// Errors on one side, warnings and informational notes on the other.
fn split_diagnostics(sink: &MetricsSink) -> (Vec<Diagnostic>, Vec<Diagnostic>) {
    let mut errors = Vec::new();
    let mut warnings = Vec::new();
    for diagnostic in sink.diagnostics.diagnostics() {
        if diagnostic.is_error() {
            errors.push(diagnostic.clone());
        } else {
            warnings.push(diagnostic.clone());
        }
    }
    (errors, warnings)
}

fn arena_footprint_kb(arenas: &[&Bump]) -> u64 {
    let bytes: usize = arenas.iter().map(|arena| arena.allocated_bytes()).sum();
    (bytes as u64 + 1023) / 1024
}

/// Translate JavaScript source to C#.
pub fn convert_js_to_cs(source: &str) -> ConversionResult {
    let started = Instant::now();
    let mut sink = MetricsSink::new();

    let tokens = tokenize(source, Language::JavaScript);
    let source_arena = Bump::new();
    let parser = janus_parser::js::Parser::new(
        &source_arena,
        TokenStream::new(tokens),
        &mut sink,
    );
    let program = parser.parse_program();

    let target_arena = Bump::new();
    let mut mapper = JsToCs::new(&target_arena, &mut sink);
    let unit = mapper.map_program(&program);

    let mut printer = CsPrinter::new();
    let converted_code = printer.print_compilation_unit(&unit);

    sink.memory_usage_kb = arena_footprint_kb(&[&source_arena, &target_arena]);
    sink.conversion_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    ConversionResult::from_sink(converted_code, &sink)
}

/// Translate C# source to JavaScript.
pub fn convert_cs_to_js(source: &str) -> ConversionResult {
    let started = Instant::now();
    let mut sink = MetricsSink::new();

    let tokens = tokenize(source, Language::CSharp);
    let source_arena = Bump::new();
    let parser = janus_parser::cs::Parser::new(
        &source_arena,
        TokenStream::new(tokens),
        &mut sink,
    );
    let unit = parser.parse_compilation_unit();

    let target_arena = Bump::new();
    let mut mapper = CsToJs::new(&target_arena, &mut sink);
    let program = mapper.map_unit(&unit);

    let mut printer = JsPrinter::new();
    let converted_code = printer.print_program(&program);

    sink.memory_usage_kb = arena_footprint_kb(&[&source_arena, &target_arena]);
    sink.conversion_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    ConversionResult::from_sink(converted_code, &sink)
}

/// Syntax-check JavaScript source without converting it.
pub fn check_js(source: &str) -> CheckResult {
    let started = Instant::now();
    let mut sink = MetricsSink::new();

    let tokens = tokenize(source, Language::JavaScript);
    let arena = Bump::new();
    let parser = janus_parser::js::Parser::new(&arena, TokenStream::new(tokens), &mut sink);
    let _program = parser.parse_program();

    sink.memory_usage_kb = arena_footprint_kb(&[&arena]);
    sink.conversion_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    CheckResult::from_sink(&sink)
}

/// Syntax-check C# source without converting it.
pub fn check_cs(source: &str) -> CheckResult {
    let started = Instant::now();
    let mut sink = MetricsSink::new();

    let tokens = tokenize(source, Language::CSharp);
    let arena = Bump::new();
    let parser = janus_parser::cs::Parser::new(&arena, TokenStream::new(tokens), &mut sink);
    let _unit = parser.parse_compilation_unit();

    sink.memory_usage_kb = arena_footprint_kb(&[&arena]);
    sink.conversion_time_ms = started.elapsed().as_secs_f64() * 1000.0;
    CheckResult::from_sink(&sink)
}
