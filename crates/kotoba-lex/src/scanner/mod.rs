//! The single scanner engine (`spec.md` §4.2/§4.3).
//!
//! `spec.md` §9 calls out the teacher's historical fast/parsing/enhanced
//! sibling scanners as the anti-pattern to avoid: "the scanner should exist
//! once; specializations... are cfg/option parameters, not sibling types."
//! [`Scanner`] is that one engine; [`ErrorMode`] is the only axis of
//! variation between the strict and recovering surfaces built on top of it
//! in [`crate::strict`] and [`crate::recovering`].
//!
//! Every producer method is self-recovering: in [`ErrorMode::Recovering`]
//! it records its own diagnostic and still returns a best-effort token (or
//! `Ok(None)` for trivia); `Err` only ever escapes a producer in
//! [`ErrorMode::Strict`], where any lexical anomaly halts the scan per
//! spec §4.2's contract.

mod identifier;
mod number;
mod string;

use kotoba_util::{Diagnostic, DiagnosticBuilder, DiagnosticCollector, DiagnosticKind, Severity, Suggestion, SourcePosition, SourceRange};

use crate::cursor::Cursor;
use crate::operator;
use crate::token::{Token, TokenKind};

/// Ambient scanning configuration (`SPEC_FULL.md` §4.2/§4.3 supplement).
#[derive(Debug, Clone, Copy)]
pub struct ScannerOptions {
    /// When set, `Comment`/`Whitespace`/`Newline` tokens are emitted into
    /// the stream instead of being silently consumed (spec §9's "optional
    /// preserve trivia mode" Open Question).
    pub preserve_trivia: bool,
}

impl Default for ScannerOptions {
    fn default() -> Self {
        ScannerOptions { preserve_trivia: false }
    }
}

/// The single axis of variation between the strict and recovering
/// surfaces. Strict mode has no collector: the first diagnostic halts the
/// scan and is returned directly by the caller.
pub enum ErrorMode<'a> {
    Strict,
    Recovering(&'a DiagnosticCollector),
}

pub struct Scanner<'a> {
    cursor: Cursor,
    options: ScannerOptions,
    mode: ErrorMode<'a>,
    fatal: bool,
}

/// Outcome of a single [`Scanner::next_token`] call.
pub enum NextToken {
    Token(Token),
    Eof(Token),
    /// Only ever produced in [`ErrorMode::Strict`].
    StrictError(Diagnostic),
}

enum Trivia {
    None,
    Skipped,
    Token(Token),
}

impl<'a> Scanner<'a> {
    pub fn new(source: &str, options: ScannerOptions, mode: ErrorMode<'a>) -> Self {
        Scanner { cursor: Cursor::new(source), options, mode, fatal: false }
    }

    pub fn is_fatal(&self) -> bool {
        self.fatal
    }

    fn is_strict(&self) -> bool {
        matches!(self.mode, ErrorMode::Strict)
    }

    /// Records a diagnostic against the recovering collector, latching
    /// [`Scanner::is_fatal`] if its severity is fatal (spec §4.3 "Fatal
    /// stop"). Never called in [`ErrorMode::Strict`] — strict diagnostics
    /// are returned directly as [`NextToken::StrictError`] instead.
    fn push_diagnostic(&mut self, diag: Diagnostic) {
        if diag.is_fatal() {
            self.fatal = true;
        }
        if let ErrorMode::Recovering(collector) = &self.mode {
            collector.push(diag);
        }
    }

    fn eof_token(&self) -> Token {
        let pos = self.cursor.position();
        Token::new(TokenKind::Eof, "", SourceRange::point(pos))
    }

    pub fn next_token(&mut self) -> NextToken {
        loop {
            if self.fatal {
                return NextToken::Eof(self.eof_token());
            }

            match self.consume_trivia() {
                Trivia::None => {}
                Trivia::Skipped => continue,
                Trivia::Token(tok) => return NextToken::Token(tok),
            }

            if self.at_comment_start() {
                match self.scan_comment() {
                    Ok(None) => continue,
                    Ok(Some(tok)) => return NextToken::Token(tok),
                    Err(diag) => return NextToken::StrictError(diag),
                }
            }

            if self.cursor.is_at_end() {
                return NextToken::Eof(self.eof_token());
            }

            let c = self.cursor.current().expect("checked not at end");

            if crate::classify::is_ident_start(c) {
                return NextToken::Token(self.scan_identifier_or_keyword());
            }

            if let Some((lexeme, kind)) = operator::match_operator(&self.lookahead(4)) {
                let start = self.cursor.position();
                let text = self.cursor.advance_text(lexeme);
                let range = SourceRange::new(start, self.cursor.position());
                return NextToken::Token(Token::new(kind, text, range));
            }

            if c.is_ascii_digit() || (c == '.' && self.cursor.peek(1).is_some_and(|n| n.is_ascii_digit())) {
                match self.scan_number() {
                    Ok(tok) => return NextToken::Token(tok),
                    Err(diag) => return NextToken::StrictError(diag),
                }
            }

            if let Some(kind) = operator::match_delimiter(c) {
                let start = self.cursor.position();
                self.cursor.advance();
                let range = SourceRange::new(start, self.cursor.position());
                return NextToken::Token(Token::new(kind, c.to_string(), range));
            }

            if c == '"' {
                match self.scan_string_literal() {
                    Ok(tok) => return NextToken::Token(tok),
                    Err(diag) => return NextToken::StrictError(diag),
                }
            }
            if c == '\'' {
                match self.scan_char_literal() {
                    Ok(tok) => return NextToken::Token(tok),
                    Err(diag) => return NextToken::StrictError(diag),
                }
            }

            match self.scan_unexpected_character() {
                Ok(()) => continue,
                Err(diag) => return NextToken::StrictError(diag),
            }
        }
    }

    /// A single character that isn't whitespace, a comment, and doesn't
    /// start any producer (spec §4.2.4, "unexpected character"). Always
    /// consumes exactly one codepoint. In recovering mode this is the only
    /// producer whose policy-table action ("advance one codepoint;
    /// continue") is literally just "consume it and keep going" — already
    /// done by the time the diagnostic is built.
    fn scan_unexpected_character(&mut self) -> Result<(), Diagnostic> {
        let start = self.cursor.position();
        let c = self.cursor.advance().expect("checked not at end");
        let range = SourceRange::new(start, self.cursor.position());
        let diag = DiagnosticBuilder::new(DiagnosticKind::UnexpectedCharacter, range, Severity::Error)
            .message(format!("unexpected character '{}'", c))
            .suggestion(Suggestion::RemoveThisCharacter)
            .build();
        if self.is_strict() {
            Err(diag)
        } else {
            self.push_diagnostic(diag);
            Ok(())
        }
    }

    fn consume_trivia(&mut self) -> Trivia {
        let Some(c) = self.cursor.current() else { return Trivia::None };
        if !crate::classify::is_whitespace(c) {
            return Trivia::None;
        }
        let start = self.cursor.position();
        if c == '\n' {
            let text = self.cursor.advance_text("\n");
            return if self.options.preserve_trivia {
                let range = SourceRange::new(start, self.cursor.position());
                Trivia::Token(Token::new(TokenKind::Newline, text, range))
            } else {
                Trivia::Skipped
            };
        }
        let mut text = String::new();
        while let Some(n) = self.cursor.current() {
            if n == '\n' || !crate::classify::is_whitespace(n) {
                break;
            }
            text.push(self.cursor.advance().unwrap());
        }
        if self.options.preserve_trivia {
            let range = SourceRange::new(start, self.cursor.position());
            Trivia::Token(Token::new(TokenKind::Whitespace, text, range))
        } else {
            Trivia::Skipped
        }
    }

    fn at_comment_start(&self) -> bool {
        self.cursor.current() == Some('/') && matches!(self.cursor.peek(1), Some('/') | Some('*'))
    }

    /// `//` line comments and non-nesting `/* ... */` block comments
    /// (spec §4.2.a; the non-nesting choice for the latter is recorded in
    /// `DESIGN.md`). An unterminated block comment's spec §4.3 recovery
    /// policy — "treat the rest of input as comment content; continue to
    /// EOF" — is exactly what scanning to EOF already does, so recovering
    /// mode just records the diagnostic and keeps the comment it already
    /// built.
    fn scan_comment(&mut self) -> Result<Option<Token>, Diagnostic> {
        let start = self.cursor.position();
        let mut text = String::new();
        text.push(self.cursor.advance().unwrap());

        if self.cursor.current() == Some('/') {
            text.push(self.cursor.advance().unwrap());
            while let Some(c) = self.cursor.current() {
                if c == '\n' {
                    break;
                }
                text.push(self.cursor.advance().unwrap());
            }
            return Ok(self.trivia_token(TokenKind::Comment, start, text));
        }

        // `/*`
        text.push(self.cursor.advance().unwrap());
        let mut closed = false;
        while !self.cursor.is_at_end() {
            if self.cursor.current() == Some('*') && self.cursor.peek(1) == Some('/') {
                text.push(self.cursor.advance().unwrap());
                text.push(self.cursor.advance().unwrap());
                closed = true;
                break;
            }
            text.push(self.cursor.advance().unwrap());
        }

        if closed {
            return Ok(self.trivia_token(TokenKind::Comment, start, text));
        }

        let range = SourceRange::new(start, self.cursor.position());
        let diag = DiagnosticBuilder::new(DiagnosticKind::UnterminatedComment, range, Severity::Error)
            .message("unterminated block comment")
            .suggestion(Suggestion::AddClosingQuote)
            .build();
        if self.is_strict() {
            Err(diag)
        } else {
            self.push_diagnostic(diag);
            Ok(self.trivia_token(TokenKind::Comment, start, text))
        }
    }

    fn trivia_token(&self, kind: TokenKind, start: SourcePosition, text: String) -> Option<Token> {
        if self.options.preserve_trivia {
            let range = SourceRange::new(start, self.cursor.position());
            Some(Token::new(kind, text, range))
        } else {
            None
        }
    }

    /// Up to `max` scalars of lookahead from the current position, for
    /// table lookups (e.g. [`operator::match_operator`]) that expect `&str`.
    fn lookahead(&self, max: usize) -> String {
        let mut out = String::with_capacity(max);
        for i in 0..max {
            match self.cursor.peek(i) {
                Some(c) => out.push(c),
                None => break,
            }
        }
        out
    }
}
