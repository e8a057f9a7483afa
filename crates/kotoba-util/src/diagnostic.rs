//! Diagnostics: the closed kind/suggestion sets, the `Diagnostic` record,
//! its fluent builder, and a thread-safe collector for the recovering
//! scanner.
//!
//! The collector is `Mutex`-backed rather than the `RefCell`-based
//! single-threaded `Handler` this crate historically used. A single scanner
//! run is still single-producer, but the interface contract promises a
//! thread-safe collector so that a caller driving several scanner instances
//! concurrently (see `kotoba_lex::parallel`) never has to reach for its own
//! synchronization.

use std::fmt;

use parking_lot::Mutex;

use crate::position::SourceRange;

/// Severity of a diagnostic. `Fatal` halts a recovering scan outright;
/// `Error` still yields a best-effort token stream; `Warning` and `Info`
/// are advisory only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Fatal,
    Error,
    Warning,
    Info,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Severity::Fatal => "fatal",
            Severity::Error => "error",
            Severity::Warning => "warning",
            Severity::Info => "info",
        };
        f.write_str(s)
    }
}

/// The closed set of diagnostic kinds the scanner can ever produce.
///
/// This enum is exhaustive by design: every lexical anomaly the scanner can
/// detect maps to exactly one of these variants, and no caller-extensible
/// "Other(String)" escape hatch exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    UnexpectedCharacter,
    InvalidCharacterInContext,
    UnterminatedString,
    UnterminatedCharacterLiteral,
    InvalidEscapeSequence,
    EmptyCharacterLiteral,
    MultipleCharactersInCharacterLiteral,
    UnterminatedComment,
    NestedCommentNotAllowed,
    InvalidNumberFormat,
    InvalidDigitForBase,
    InvalidUnderscorePlacement,
    InvalidScientificNotation,
    InvalidHexBinaryOctalFormat,
    InvalidIdentifier,
    ReservedKeywordUsedAsIdentifier,
    UnterminatedStructure,
    MismatchedDelimiters,
    RecoveredAfterError,
    AssumedMissingToken,
}

impl DiagnosticKind {
    /// A short, stable, human-readable name — used as the diagnostic's
    /// default message stem and in test assertions.
    pub fn as_str(&self) -> &'static str {
        match self {
            DiagnosticKind::UnexpectedCharacter => "unexpected character",
            DiagnosticKind::InvalidCharacterInContext => "invalid character in context",
            DiagnosticKind::UnterminatedString => "unterminated string",
            DiagnosticKind::UnterminatedCharacterLiteral => "unterminated character literal",
            DiagnosticKind::InvalidEscapeSequence => "invalid escape sequence",
            DiagnosticKind::EmptyCharacterLiteral => "empty character literal",
            DiagnosticKind::MultipleCharactersInCharacterLiteral => {
                "multiple characters in character literal"
            }
            DiagnosticKind::UnterminatedComment => "unterminated comment",
            DiagnosticKind::NestedCommentNotAllowed => "nested comment not allowed",
            DiagnosticKind::InvalidNumberFormat => "invalid number format",
            DiagnosticKind::InvalidDigitForBase => "invalid digit for base",
            DiagnosticKind::InvalidUnderscorePlacement => "invalid underscore placement",
            DiagnosticKind::InvalidScientificNotation => "invalid scientific notation",
            DiagnosticKind::InvalidHexBinaryOctalFormat => "invalid hex/binary/octal format",
            DiagnosticKind::InvalidIdentifier => "invalid identifier",
            DiagnosticKind::ReservedKeywordUsedAsIdentifier => {
                "reserved keyword used as identifier"
            }
            DiagnosticKind::UnterminatedStructure => "unterminated structure",
            DiagnosticKind::MismatchedDelimiters => "mismatched delimiters",
            DiagnosticKind::RecoveredAfterError => "recovered after error",
            DiagnosticKind::AssumedMissingToken => "assumed missing token",
        }
    }
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The closed set of recovery suggestions the recovering scanner may attach
/// to a diagnostic. Implementers may attach additional instances of these
/// ten but must never invent new wording (spec's suggestion table is
/// closed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Suggestion {
    RemoveThisCharacter,
    UseLineCommentSyntax,
    AddClosingQuote,
    CompleteTheEscapeSequence,
    UseValidEscapeSequences,
    UseOnlyOneDecimalPoint,
    UseOnlyHexDigits,
    CheckNumberSyntax,
    RemoveInvalidCharacters,
    UseValidIdentifierCharacters,
}

impl Suggestion {
    pub fn as_str(&self) -> &'static str {
        match self {
            Suggestion::RemoveThisCharacter => "Remove this character",
            Suggestion::UseLineCommentSyntax => "Use // for comments",
            Suggestion::AddClosingQuote => "Add closing quote",
            Suggestion::CompleteTheEscapeSequence => "Complete the escape sequence",
            Suggestion::UseValidEscapeSequences => {
                "Use valid escape sequences like \\n, \\t, \\\\"
            }
            Suggestion::UseOnlyOneDecimalPoint => "Use only one decimal point",
            Suggestion::UseOnlyHexDigits => "Use only digits 0-9 and letters A-F",
            Suggestion::CheckNumberSyntax => "Check number syntax",
            Suggestion::RemoveInvalidCharacters => "Remove invalid characters",
            Suggestion::UseValidIdentifierCharacters => {
                "Use valid identifier characters (letters, numbers, underscore)"
            }
        }
    }
}

impl fmt::Display for Suggestion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One lexical diagnostic: what went wrong, where, how severe, and what a
/// caller might do about it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub range: SourceRange,
    pub message: String,
    pub severity: Severity,
    pub suggestions: Vec<Suggestion>,
    pub context: Option<String>,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, range: SourceRange, severity: Severity) -> Self {
        Diagnostic {
            message: kind.as_str().to_string(),
            kind,
            range,
            severity,
            suggestions: Vec::new(),
            context: None,
        }
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} at {}",
            self.severity, self.message, self.range.start
        )
    }
}

impl std::error::Error for Diagnostic {}

/// Fluent construction of a [`Diagnostic`].
#[derive(Debug, Clone)]
pub struct DiagnosticBuilder {
    kind: DiagnosticKind,
    range: SourceRange,
    severity: Severity,
    message: Option<String>,
    suggestions: Vec<Suggestion>,
    context: Option<String>,
}

impl DiagnosticBuilder {
    pub fn new(kind: DiagnosticKind, range: SourceRange, severity: Severity) -> Self {
        DiagnosticBuilder {
            kind,
            range,
            severity,
            message: None,
            suggestions: Vec::new(),
            context: None,
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestions.push(suggestion);
        self
    }

    pub fn context(mut self, context: impl Into<String>) -> Self {
        self.context = Some(context.into());
        self
    }

    pub fn build(self) -> Diagnostic {
        Diagnostic {
            message: self.message.unwrap_or_else(|| self.kind.as_str().to_string()),
            kind: self.kind,
            range: self.range,
            severity: self.severity,
            suggestions: self.suggestions,
            context: self.context,
        }
    }

    /// Builds the diagnostic and pushes it directly into a collector.
    pub fn emit(self, collector: &DiagnosticCollector) {
        collector.push(self.build());
    }
}

/// A thread-safe, append-only diagnostic sink used by the recovering
/// scanner. Single-producer in practice (one scanner run owns one
/// collector), but `Mutex`-backed so callers that fan scanning out across
/// threads (`kotoba_lex::parallel`) never need their own locking.
#[derive(Debug, Default)]
pub struct DiagnosticCollector {
    diagnostics: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticCollector {
    pub fn new() -> Self {
        DiagnosticCollector {
            diagnostics: Mutex::new(Vec::new()),
        }
    }

    pub fn push(&self, diagnostic: Diagnostic) {
        self.diagnostics.lock().push(diagnostic);
    }

    pub fn has_fatal(&self) -> bool {
        self.diagnostics.lock().iter().any(Diagnostic::is_fatal)
    }

    pub fn len(&self) -> usize {
        self.diagnostics.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Takes ownership of the accumulated diagnostics, leaving the
    /// collector empty.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *self.diagnostics.lock())
    }

    /// Clones the accumulated diagnostics without draining them.
    pub fn snapshot(&self) -> Vec<Diagnostic> {
        self.diagnostics.lock().clone()
    }

    pub fn clear(&self) {
        self.diagnostics.lock().clear();
    }
}
