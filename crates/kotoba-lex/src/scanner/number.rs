//! Numeric literal producer (spec §4.2.d).
//!
//! A precondition of entry (checked by the caller in `scanner/mod.rs`) is
//! that the current codepoint is an ASCII digit, or `.` followed by an
//! ASCII digit. On a malformed number, recovering mode follows spec §4.3's
//! policy verbatim: "consume the maximal numeric-looking run... and
//! re-emit it as an `Identifier` token" rather than abandoning the
//! producer, so it rewinds to the start and reconsumes under that looser
//! grammar instead of returning `Err`.

use kotoba_util::{Diagnostic, DiagnosticBuilder, DiagnosticKind, Severity, Suggestion, SourceRange};

use super::Scanner;
use crate::classify;
use crate::token::{Token, TokenKind};

/// Characters spec §4.3 considers "numeric-looking" for the recovery run.
fn is_numeric_looking(c: char) -> bool {
    c.is_ascii_hexdigit() || matches!(c, '.' | '_' | 'e' | 'E' | 'x' | 'X' | 'o' | 'O' | 'b' | 'B' | '+' | '-')
}

impl<'a> Scanner<'a> {
    pub(super) fn scan_number(&mut self) -> Result<Token, Diagnostic> {
        let start_snapshot = self.cursor.snapshot();
        let start = self.cursor.position();

        match self.try_scan_number(start) {
            Ok(tok) => Ok(tok),
            Err(diag) => {
                if self.is_strict() {
                    Err(diag)
                } else {
                    self.push_diagnostic(diag);
                    self.cursor.restore(start_snapshot);
                    Ok(self.recover_numeric_looking_run(start))
                }
            }
        }
    }

    fn try_scan_number(&mut self, start: kotoba_util::SourcePosition) -> Result<Token, Diagnostic> {
        if self.cursor.current() == Some('.') {
            return self.scan_leading_dot_decimal(start);
        }
        if self.cursor.current() == Some('0') {
            match self.cursor.peek(1) {
                Some('x') | Some('X') => return self.scan_radix_integer(start, 16, classify::is_hex_digit, "hex"),
                Some('b') | Some('B') => return self.scan_radix_integer(start, 2, classify::is_binary_digit, "binary"),
                Some('o') | Some('O') => return self.scan_radix_integer(start, 8, classify::is_octal_digit, "octal"),
                _ => {}
            }
        }
        self.scan_decimal(start)
    }

    fn scan_leading_dot_decimal(&mut self, start: kotoba_util::SourcePosition) -> Result<Token, Diagnostic> {
        let mut lexeme = String::new();
        lexeme.push(self.cursor.advance().unwrap()); // '.'
        let digits = self.consume_digit_underscore_run(classify::is_decimal_digit);
        if digits.is_empty() || !digits.chars().any(|c| c != '_') {
            return Err(self.invalid_number(start, "a fractional literal needs at least one digit after the decimal point"));
        }
        lexeme.push_str(&digits);
        let range = SourceRange::new(start, self.cursor.position());
        Ok(Token::new(TokenKind::RealLiteral, lexeme, range))
    }

    fn scan_radix_integer(
        &mut self,
        start: kotoba_util::SourcePosition,
        radix_label: u32,
        is_digit: fn(char) -> bool,
        label: &'static str,
    ) -> Result<Token, Diagnostic> {
        let mut lexeme = String::new();
        lexeme.push(self.cursor.advance().unwrap()); // '0'
        lexeme.push(self.cursor.advance().unwrap()); // x/b/o
        let digits = self.consume_digit_underscore_run(is_digit);
        if digits.is_empty() || !digits.chars().any(|c| c != '_') {
            let msg = format!("a {} literal needs at least one digit after the prefix", label);
            return Err(self.invalid_hex_format(start, &msg));
        }
        let _ = radix_label;
        lexeme.push_str(&digits);
        let range = SourceRange::new(start, self.cursor.position());
        Ok(Token::new(TokenKind::IntegerLiteral, lexeme, range))
    }

    fn scan_decimal(&mut self, start: kotoba_util::SourcePosition) -> Result<Token, Diagnostic> {
        let mut lexeme = self.consume_digit_underscore_run(classify::is_decimal_digit);
        if lexeme.is_empty() || !lexeme.chars().any(|c| c != '_') {
            return Err(self.invalid_number(start, "expected at least one digit"));
        }

        let mut is_real = false;

        if self.cursor.current() == Some('.') && self.cursor.peek(1).is_some_and(classify::is_decimal_digit) {
            is_real = true;
            lexeme.push(self.cursor.advance().unwrap());
            let frac = self.consume_digit_underscore_run(classify::is_decimal_digit);
            lexeme.push_str(&frac);
        }

        if matches!(self.cursor.current(), Some('e') | Some('E')) {
            let exp_snapshot = self.cursor.snapshot();
            let mut exp_text = String::new();
            exp_text.push(self.cursor.advance().unwrap());
            if matches!(self.cursor.current(), Some('+') | Some('-')) {
                exp_text.push(self.cursor.advance().unwrap());
            }
            let exp_digits = self.consume_digit_underscore_run(classify::is_decimal_digit);
            if exp_digits.is_empty() || !exp_digits.chars().any(|c| c != '_') {
                let range = SourceRange::new(start, self.cursor.position());
                let diag = DiagnosticBuilder::new(DiagnosticKind::InvalidScientificNotation, range, Severity::Error)
                    .message("scientific notation requires at least one exponent digit")
                    .suggestion(Suggestion::CheckNumberSyntax)
                    .build();
                return Err(diag);
            }
            exp_text.push_str(&exp_digits);
            is_real = true;
            lexeme.push_str(&exp_text);
            let _ = exp_snapshot;
        }

        let kind = if is_real { TokenKind::RealLiteral } else { TokenKind::IntegerLiteral };
        let range = SourceRange::new(start, self.cursor.position());
        Ok(Token::new(kind, lexeme, range))
    }

    /// Consumes `[digit|_]*` while `is_digit` matches; the caller validates
    /// that at least one *actual* digit (not just underscores) was present.
    fn consume_digit_underscore_run(&mut self, is_digit: fn(char) -> bool) -> String {
        let mut out = String::new();
        while let Some(c) = self.cursor.current() {
            if c == '_' || is_digit(c) {
                out.push(self.cursor.advance().unwrap());
            } else {
                break;
            }
        }
        out
    }

    /// Recovery path (spec §4.3): consume the maximal numeric-looking run
    /// from `start` and re-emit it as an `Identifier` so a downstream pass
    /// can still make sense of it.
    fn recover_numeric_looking_run(&mut self, start: kotoba_util::SourcePosition) -> Token {
        let mut lexeme = String::new();
        while let Some(c) = self.cursor.current() {
            if is_numeric_looking(c) {
                lexeme.push(self.cursor.advance().unwrap());
            } else {
                break;
            }
        }
        if lexeme.is_empty() {
            // Always true by construction (entry precondition guarantees at
            // least the leading digit/dot is numeric-looking).
            lexeme.push(self.cursor.advance().unwrap());
        }
        let range = SourceRange::new(start, self.cursor.position());
        Token::new(TokenKind::Identifier, lexeme, range)
    }

    fn invalid_number(&self, start: kotoba_util::SourcePosition, message: &str) -> Diagnostic {
        let range = SourceRange::new(start, self.cursor.position());
        DiagnosticBuilder::new(DiagnosticKind::InvalidNumberFormat, range, Severity::Error)
            .message(message.to_string())
            .suggestion(Suggestion::CheckNumberSyntax)
            .build()
    }

    fn invalid_hex_format(&self, start: kotoba_util::SourcePosition, message: &str) -> Diagnostic {
        let range = SourceRange::new(start, self.cursor.position());
        DiagnosticBuilder::new(DiagnosticKind::InvalidHexBinaryOctalFormat, range, Severity::Error)
            .message(message.to_string())
            .suggestion(Suggestion::UseOnlyHexDigits)
            .build()
    }
}
