//! janus_metrics: the per-request metrics sink.
//!
//! One sink is created per conversion or check request. The lexer and
//! parser write counters into it while they run, the mapper adds its
//! diagnostics, and the request boundary reads the sink exactly once when
//! assembling the result record. The accuracy scores are research
//! instruments, not correctness signals.

use janus_diagnostics::{Diagnostic, DiagnosticCollection};
use serde::Serialize;

/// Counters and timings accumulated during a single request.
#[derive(Debug, Default)]
pub struct MetricsSink {
    /// Wall-clock time spent inside the recursive-descent parser.
    pub parsing_time_ms: f64,
    /// Wall-clock time for the whole conversion (lex through emit).
    pub conversion_time_ms: f64,
    /// AST nodes constructed by the parser.
    pub ast_nodes: u64,
    /// Non-EOF tokens produced by the lexer.
    pub tokens_processed: u64,
    /// Arena footprint of the request, in KiB.
    pub memory_usage_kb: u64,
    /// How many times panic-mode recovery ran.
    pub error_recovery_count: u64,
    /// Diagnostics from every stage, in emission order.
    pub diagnostics: DiagnosticCollection,
}

impl MetricsSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Called by the parser on every node construction.
    #[inline]
    pub fn record_node(&mut self) {
        self.ast_nodes += 1;
    }

    /// Called once per panic-mode synchronization.
    #[inline]
    pub fn record_recovery(&mut self) {
        self.error_recovery_count += 1;
    }

    #[inline]
    pub fn add_diagnostic(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.add(diagnostic);
    }

    /// `max(0, (tokens - errors) / tokens * 100)`; an empty token stream
    /// scores 100.
    pub fn syntax_accuracy(&self) -> f64 {
        if self.tokens_processed == 0 {
            return 100.0;
        }
        let tokens = self.tokens_processed as f64;
        let errors = self.diagnostics.error_count() as f64;
        ((tokens - errors) / tokens * 100.0).max(0.0)
    }

    /// `max(0, 100 - 10*errors - 5*warnings)`.
    pub fn semantic_preservation(&self) -> f64 {
        let errors = self.diagnostics.error_count() as f64;
        let warnings = self.diagnostics.warning_count() as f64;
        (100.0 - 10.0 * errors - 5.0 * warnings).max(0.0)
    }

    /// Snapshot of the derived scores alongside the raw counters.
    pub fn report(&self) -> MetricsReport {
        MetricsReport {
            parsing_time_ms: self.parsing_time_ms,
            conversion_time_ms: self.conversion_time_ms,
            ast_nodes: self.ast_nodes,
            tokens_processed: self.tokens_processed,
            memory_usage_kb: self.memory_usage_kb,
            error_recovery_count: self.error_recovery_count,
            syntax_accuracy: self.syntax_accuracy(),
            semantic_preservation: self.semantic_preservation(),
        }
    }
}

/// The serializable counter snapshot embedded in result records.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct MetricsReport {
    pub parsing_time_ms: f64,
    pub conversion_time_ms: f64,
    pub ast_nodes: u64,
    pub tokens_processed: u64,
    pub memory_usage_kb: u64,
    pub error_recovery_count: u64,
    pub syntax_accuracy: f64,
    pub semantic_preservation: f64,
}
