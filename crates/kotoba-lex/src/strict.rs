//! The strict scanning surface (spec §4.2, §6, §7).
//!
//! `scan_strict` fails fast: the first lexical anomaly is returned as a
//! single [`Diagnostic`] and scanning stops. `scan_strict_via_collecting`
//! is the "thin adapter" spec §7 names for legacy callers who only know
//! the strict contract but should be served by the collecting engine.

use kotoba_util::Diagnostic;

use crate::scanner::{ErrorMode, NextToken, Scanner, ScannerOptions};
use crate::token::Token;

/// `scan_strict(normalized_source) -> Result<Vec<Token>, Diagnostic>`
/// (spec §6). On success the vector ends with `Eof` and no diagnostic was
/// ever produced.
pub fn scan_strict(normalized_source: &str) -> Result<Vec<Token>, Diagnostic> {
    scan_strict_with_options(normalized_source, ScannerOptions::default())
}

pub fn scan_strict_with_options(normalized_source: &str, options: ScannerOptions) -> Result<Vec<Token>, Diagnostic> {
    let mut scanner = Scanner::new(normalized_source, options, ErrorMode::Strict);
    let mut tokens = Vec::new();
    loop {
        match scanner.next_token() {
            NextToken::Token(tok) => tokens.push(tok),
            NextToken::Eof(tok) => {
                tokens.push(tok);
                return Ok(tokens);
            }
            NextToken::StrictError(diag) => return Err(diag),
        }
    }
}

/// The thin adapter spec §7 describes: "Legacy callers expecting the
/// strict surface can obtain it by invoking the collecting surface and
/// returning the first diagnostic." Unlike [`scan_strict`] this runs the
/// full recovering scanner and only fails afterward, so it always sees the
/// complete diagnostic set even though it surfaces just the first one.
pub fn scan_strict_via_collecting(normalized_source: &str) -> Result<Vec<Token>, Diagnostic> {
    let result = crate::recovering::scan_recovering(normalized_source);
    match result.diagnostics.into_iter().next() {
        Some(diag) => Err(diag),
        None => Ok(result.tokens),
    }
}

/// `std::error::Error`-compatible wrapper around a lexical [`Diagnostic`],
/// for callers that want `?`-propagation through an error trait object
/// rather than the bare diagnostic record (ambient-stack addition: every
/// teacher crate's fallible public surface exposes a `thiserror` type).
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct ScanError(#[from] pub Diagnostic);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    #[test]
    fn scans_seed_scenario_one() {
        let tokens = scan_strict("整数型 x ← 42").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::IntegerType,
                TokenKind::Identifier,
                TokenKind::Assign,
                TokenKind::IntegerLiteral,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn endif_is_a_single_token_never_end_plus_if() {
        let tokens = scan_strict("if x ≧ 0 then endif").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::If,
                TokenKind::Identifier,
                TokenKind::GreaterEqual,
                TokenKind::IntegerLiteral,
                TokenKind::Then,
                TokenKind::Endif,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn fails_on_unterminated_string_at_opening_quote() {
        let err = scan_strict("\"hello\nworld").unwrap_err();
        assert_eq!(err.kind, kotoba_util::DiagnosticKind::UnterminatedString);
    }

    #[test]
    fn empty_input_yields_single_eof_at_start() {
        let tokens = scan_strict("").unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
        assert_eq!(tokens[0].position(), kotoba_util::SourcePosition::START);
    }

    #[test]
    fn adapter_matches_first_diagnostic_of_collecting_run() {
        let err = scan_strict_via_collecting("\"hello").unwrap_err();
        assert_eq!(err.kind, kotoba_util::DiagnosticKind::UnterminatedString);
    }
}
