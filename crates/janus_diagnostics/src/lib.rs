//! janus_diagnostics: diagnostic records and error-reporting infrastructure.
//!
//! Diagnostics are never thrown: the lexer, parsers, and mappers append
//! them to a [`DiagnosticCollection`] carried by the request, and the
//! conversion boundary reads the collection once at the end. Message
//! templates live in the [`messages`] module.

use janus_core::LineCol;
use serde::Serialize;
use std::fmt;

/// How severe a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
        }
    }
}

/// Which stage of the pipeline produced a diagnostic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// Recursive-descent parsing machinery (recovery, totality).
    RdpParsing,
    /// Lexical or grammatical errors in the input.
    Syntax,
    /// Meaning-level problems the front end can see (e.g. `const` without
    /// an initializer).
    Semantic,
    /// A conversion rule lost information or changed semantics.
    ConversionError,
    /// The mapper met a node configuration it cannot express in the
    /// target language.
    AstConversionError,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let tag = match self {
            DiagnosticKind::RdpParsing => "rdp_parsing",
            DiagnosticKind::Syntax => "syntax",
            DiagnosticKind::Semantic => "semantic",
            DiagnosticKind::ConversionError => "conversion_error",
            DiagnosticKind::AstConversionError => "ast_conversion_error",
        };
        write!(f, "{}", tag)
    }
}

/// A message template with a fixed kind and severity. `{0}`, `{1}`, …
/// placeholders are filled by [`format_message`].
#[derive(Debug, Clone, Copy)]
pub struct DiagnosticMessage {
    pub kind: DiagnosticKind,
    pub severity: Severity,
    pub message: &'static str,
}

/// A realized diagnostic with its source location.
#[derive(Debug, Clone, Serialize)]
pub struct Diagnostic {
    #[serde(rename = "type")]
    pub kind: DiagnosticKind,
    pub message: String,
    pub line: u32,
    pub column: u32,
    pub severity: Severity,
}

impl Diagnostic {
    pub fn new(template: &DiagnosticMessage, args: &[&str], at: LineCol) -> Self {
        Self {
            kind: template.kind,
            message: format_message(template.message, args),
            line: at.line,
            column: at.column,
            severity: template.severity,
        }
    }

    /// A diagnostic whose message is already fully formed, e.g. the
    /// `consume` mismatch messages threaded through the parsers.
    pub fn error(kind: DiagnosticKind, message: impl Into<String>, at: LineCol) -> Self {
        Self {
            kind,
            message: message.into(),
            line: at.line,
            column: at.column,
            severity: Severity::Error,
        }
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }

    pub fn is_warning(&self) -> bool {
        self.severity == Severity::Warning
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: {} [{}]: {}",
            self.line, self.column, self.severity, self.kind, self.message
        )
    }
}

/// Replace `{0}`, `{1}`, … in a template with the given arguments.
pub fn format_message(template: &str, args: &[&str]) -> String {
    let mut result = template.to_string();
    for (i, arg) in args.iter().enumerate() {
        result = result.replace(&format!("{{{}}}", i), arg);
    }
    result
}

/// Diagnostics accumulated during a single conversion or check request.
#[derive(Debug, Clone, Default)]
pub struct DiagnosticCollection {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticCollection {
    pub fn new() -> Self {
        Self { diagnostics: Vec::new() }
    }

    pub fn add(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.diagnostics.iter().any(Diagnostic::is_error)
    }

    pub fn error_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_error()).count()
    }

    pub fn warning_count(&self) -> usize {
        self.diagnostics.iter().filter(|d| d.is_warning()).count()
    }

    pub fn errors(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_error())
    }

    pub fn warnings(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(|d| d.is_warning())
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    pub fn into_diagnostics(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn extend(&mut self, other: DiagnosticCollection) {
        self.diagnostics.extend(other.diagnostics);
    }

    /// Sort by source position, errors before warnings at equal positions.
    pub fn sort(&mut self) {
        self.diagnostics.sort_by_key(|d| (d.line, d.column, d.severity as u8));
    }
}

pub mod messages {
    //! Diagnostic message templates, grouped by pipeline stage.

    use super::*;

    macro_rules! diag {
        ($kind:ident, Error, $msg:expr) => {
            DiagnosticMessage {
                kind: DiagnosticKind::$kind,
                severity: Severity::Error,
                message: $msg,
            }
        };
        ($kind:ident, Warning, $msg:expr) => {
            DiagnosticMessage {
                kind: DiagnosticKind::$kind,
                severity: Severity::Warning,
                message: $msg,
            }
        };
        ($kind:ident, Info, $msg:expr) => {
            DiagnosticMessage {
                kind: DiagnosticKind::$kind,
                severity: Severity::Info,
                message: $msg,
            }
        };
    }

    // ========================================================================
    // Syntax errors
    // ========================================================================
    pub const _0_EXPECTED: DiagnosticMessage =
        diag!(Syntax, Error, "'{0}' expected.");
    pub const UNEXPECTED_TOKEN_0: DiagnosticMessage =
        diag!(Syntax, Error, "Unexpected token '{0}'.");
    pub const UNRECOGNIZED_CHARACTER_0: DiagnosticMessage =
        diag!(Syntax, Error, "Unrecognized character '{0}'.");
    pub const EXPRESSION_EXPECTED: DiagnosticMessage =
        diag!(Syntax, Error, "Expression expected.");
    pub const STATEMENT_EXPECTED: DiagnosticMessage =
        diag!(Syntax, Error, "Statement expected.");
    pub const IDENTIFIER_EXPECTED: DiagnosticMessage =
        diag!(Syntax, Error, "Identifier expected.");
    pub const TYPE_EXPECTED: DiagnosticMessage =
        diag!(Syntax, Error, "Type expected.");
    pub const DECLARATION_EXPECTED: DiagnosticMessage =
        diag!(Syntax, Error, "Declaration expected.");
    pub const CASE_OR_DEFAULT_EXPECTED: DiagnosticMessage =
        diag!(Syntax, Error, "'case' or 'default' expected.");
    pub const CATCH_OR_FINALLY_EXPECTED: DiagnosticMessage =
        diag!(Syntax, Error, "'catch' or 'finally' expected.");
    pub const UNTERMINATED_BLOCK_COMMENT: DiagnosticMessage =
        diag!(Syntax, Warning, "Unterminated block comment.");

    // ========================================================================
    // Semantic checks performed by the parser
    // ========================================================================
    pub const CONST_DECLARATION_REQUIRES_INITIALIZER_0: DiagnosticMessage =
        diag!(Semantic, Error, "'const' declaration '{0}' must have an initializer.");

    // ========================================================================
    // Recovery bookkeeping
    // ========================================================================
    pub const SKIPPED_TO_NEXT_STATEMENT: DiagnosticMessage =
        diag!(RdpParsing, Info, "Parsing resumed at the next statement boundary.");

    // ========================================================================
    // Conversion warnings and notes
    // ========================================================================
    pub const STRICT_EQUALITY_NARROWED_0: DiagnosticMessage = diag!(
        ConversionError,
        Warning,
        "'{0}' has no C# equivalent; converted to the non-strict operator."
    );
    pub const EQUALITY_RAISED_0: DiagnosticMessage = diag!(
        ConversionError,
        Warning,
        "'{0}' converted to the strict operator; reference comparisons may differ."
    );
    pub const EXTRA_DECLARATORS_DROPPED_0: DiagnosticMessage = diag!(
        ConversionError,
        Warning,
        "Multi-variable declaration truncated; dropped: {0}."
    );
    pub const USING_DIRECTIVE_DROPPED_0: DiagnosticMessage = diag!(
        ConversionError,
        Info,
        "Using directive '{0}' has no JavaScript equivalent and was dropped."
    );
    pub const NAMESPACE_FLATTENED_0: DiagnosticMessage = diag!(
        ConversionError,
        Info,
        "Namespace '{0}' flattened into the top-level program."
    );
    pub const DO_WHILE_LOWERED: DiagnosticMessage = diag!(
        ConversionError,
        Warning,
        "'do/while' lowered to 'while'; the body no longer runs before the first test."
    );
    pub const STRUCT_CONVERTED_TO_CLASS_0: DiagnosticMessage = diag!(
        ConversionError,
        Warning,
        "Struct '{0}' converted to a class; value-type copy semantics are lost."
    );
    pub const INTERFACE_NOT_REPRESENTABLE_0: DiagnosticMessage = diag!(
        ConversionError,
        Info,
        "Interface '{0}' has no JavaScript equivalent; a placeholder comment was emitted."
    );
    pub const MODIFIERS_DROPPED_0: DiagnosticMessage = diag!(
        ConversionError,
        Info,
        "Declaration modifiers on '{0}' were dropped."
    );
    pub const NUMERIC_SUFFIX_DROPPED_0: DiagnosticMessage = diag!(
        ConversionError,
        Info,
        "Numeric literal suffix dropped from '{0}'."
    );
    pub const EVENT_NOT_REPRESENTABLE_0: DiagnosticMessage = diag!(
        ConversionError,
        Info,
        "Event '{0}' has no JavaScript equivalent and was dropped."
    );
    pub const CATCH_CLAUSES_TRUNCATED: DiagnosticMessage = diag!(
        ConversionError,
        Warning,
        "JavaScript allows a single catch clause; additional clauses were dropped."
    );
    pub const UNSUPPORTED_NODE_0: DiagnosticMessage = diag!(
        AstConversionError,
        Error,
        "Cannot convert {0}; a placeholder comment was emitted."
    );
}
