//! The recovering scanning surface (spec §4.3, §6, §7).
//!
//! Never halts on a single error: every anomaly is recorded into a
//! [`DiagnosticCollector`] and the scanner keeps producing the best token
//! stream it can, stopping early only on a `fatal` diagnostic (none of the
//! producers in `scanner/` currently raise one, but the fatal-stop check
//! is still honored for forward compatibility).

use kotoba_util::{Diagnostic, DiagnosticCollector, Severity};

use crate::scanner::{ErrorMode, NextToken, Scanner, ScannerOptions};
use crate::token::Token;

/// `(tokens, diagnostics, warnings)` (spec §3 "Tokenizer result"). Per spec
/// §7, `error`-and-above diagnostics land in `diagnostics`; `warning` and
/// `info` severities land in `warnings`, since a caller inspects severities
/// to decide how to proceed and the two buckets are handled differently.
pub struct TokenizerResult {
    pub tokens: Vec<Token>,
    pub diagnostics: Vec<Diagnostic>,
    pub warnings: Vec<Diagnostic>,
}

impl TokenizerResult {
    pub fn is_successful(&self) -> bool {
        !self.diagnostics.iter().any(Diagnostic::is_fatal)
    }
}

pub fn scan_recovering(normalized_source: &str) -> TokenizerResult {
    scan_recovering_with_options(normalized_source, ScannerOptions::default())
}

pub fn scan_recovering_with_options(normalized_source: &str, options: ScannerOptions) -> TokenizerResult {
    let collector = DiagnosticCollector::new();
    let mut scanner = Scanner::new(normalized_source, options, ErrorMode::Recovering(&collector));
    let mut tokens = Vec::new();

    loop {
        match scanner.next_token() {
            NextToken::Token(tok) => tokens.push(tok),
            NextToken::Eof(tok) => {
                tokens.push(tok);
                break;
            }
            NextToken::StrictError(_) => unreachable!("recovering mode never halts strictly"),
        }
        if scanner.is_fatal() {
            break;
        }
    }

    let mut diagnostics = Vec::new();
    let mut warnings = Vec::new();
    for diag in collector.take() {
        match diag.severity {
            Severity::Fatal | Severity::Error => diagnostics.push(diag),
            Severity::Warning | Severity::Info => warnings.push(diag),
        }
    }

    TokenizerResult { tokens, diagnostics, warnings }
}
