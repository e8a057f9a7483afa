//! String and character literal producer (spec §4.2.f).
//!
//! `"..."` always yields `StringLiteral` regardless of content length;
//! `'...'` yields `CharacterLiteral` only when exactly one scalar survives
//! escape processing — zero or multiple scalars are the "empty character
//! literal" / "multiple characters in character literal" diagnostic kinds.
//! Escapes are shared between both: `\n \t \r \\ \" \'` and `\u{HHH…}`
//! (1–8 hex digits), matching the closed set spec §4.2.f names (no `\x`
//! byte escape and no `\0`, unlike the teacher's lexer).

use kotoba_util::{Diagnostic, DiagnosticBuilder, DiagnosticKind, Severity, Suggestion, SourcePosition, SourceRange};

use super::Scanner;
use crate::classify;
use crate::token::{Token, TokenKind};

impl<'a> Scanner<'a> {
    pub(super) fn scan_string_literal(&mut self) -> Result<Token, Diagnostic> {
        let start = self.cursor.position();
        self.cursor.advance(); // opening '"'
        let mut content = String::new();
        let mut lexeme = String::from("\"");

        loop {
            match self.cursor.current() {
                None => {
                    return self.unterminated(TokenKind::StringLiteral, &lexeme, start, DiagnosticKind::UnterminatedString, "unterminated string literal");
                }
                Some('"') => {
                    lexeme.push(self.cursor.advance().unwrap());
                    break;
                }
                Some('\n') => {
                    return self.unterminated(TokenKind::StringLiteral, &lexeme, start, DiagnosticKind::UnterminatedString, "unterminated string literal (newline before closing quote)");
                }
                Some('\\') => {
                    let escape_start = self.cursor.position();
                    lexeme.push(self.cursor.advance().unwrap());
                    self.scan_escape_into(&mut content, &mut lexeme, escape_start)?;
                }
                Some(c) => {
                    content.push(c);
                    lexeme.push(self.cursor.advance().unwrap());
                }
            }
        }

        let range = SourceRange::new(start, self.cursor.position());
        Ok(Token::new(TokenKind::StringLiteral, lexeme, range))
    }

    pub(super) fn scan_char_literal(&mut self) -> Result<Token, Diagnostic> {
        let start = self.cursor.position();
        self.cursor.advance(); // opening '\''
        let mut content = String::new();
        let mut lexeme = String::from("'");

        loop {
            match self.cursor.current() {
                None => {
                    return self.unterminated(TokenKind::CharacterLiteral, &lexeme, start, DiagnosticKind::UnterminatedCharacterLiteral, "unterminated character literal");
                }
                Some('\'') => {
                    lexeme.push(self.cursor.advance().unwrap());
                    break;
                }
                Some('\n') => {
                    return self.unterminated(TokenKind::CharacterLiteral, &lexeme, start, DiagnosticKind::UnterminatedCharacterLiteral, "unterminated character literal (newline before closing quote)");
                }
                Some('\\') => {
                    let escape_start = self.cursor.position();
                    lexeme.push(self.cursor.advance().unwrap());
                    self.scan_escape_into(&mut content, &mut lexeme, escape_start)?;
                }
                Some(c) => {
                    content.push(c);
                    lexeme.push(self.cursor.advance().unwrap());
                }
            }
        }

        let range = SourceRange::new(start, self.cursor.position());
        let count = content.chars().count();
        if count != 1 {
            let kind = if count == 0 {
                DiagnosticKind::EmptyCharacterLiteral
            } else {
                DiagnosticKind::MultipleCharactersInCharacterLiteral
            };
            let diag = DiagnosticBuilder::new(kind, range, Severity::Error)
                .message(if count == 0 {
                    "a character literal must contain exactly one character".to_string()
                } else {
                    format!("a character literal must contain exactly one character, found {}", count)
                })
                .suggestion(Suggestion::RemoveInvalidCharacters)
                .build();
            if self.is_strict() {
                return Err(diag);
            }
            self.push_diagnostic(diag);
        }
        Ok(Token::new(TokenKind::CharacterLiteral, lexeme, range))
    }

    /// Resolves one `\…` escape, pushing the decoded scalar(s) into
    /// `content` and the raw escape text into `lexeme`. Spec §4.3's policy
    /// for an invalid escape: "keep the offending char literally in the
    /// string's logical content; continue scanning the string" — so
    /// recovering mode never returns `Err` here, only strict mode does.
    fn scan_escape_into(&mut self, content: &mut String, lexeme: &mut String, escape_start: SourcePosition) -> Result<(), Diagnostic> {
        let Some(c) = self.cursor.current() else {
            return self.invalid_escape(content, lexeme, escape_start, "unterminated escape sequence at end of input", None);
        };

        match c {
            'n' => self.accept_escape(content, lexeme, '\n'),
            't' => self.accept_escape(content, lexeme, '\t'),
            'r' => self.accept_escape(content, lexeme, '\r'),
            '\\' => self.accept_escape(content, lexeme, '\\'),
            '"' => self.accept_escape(content, lexeme, '"'),
            '\'' => self.accept_escape(content, lexeme, '\''),
            'u' => {
                let snapshot = self.cursor.snapshot();
                lexeme.push(self.cursor.advance().unwrap()); // 'u'
                if self.cursor.current() != Some('{') {
                    self.cursor.restore(snapshot);
                    return self.invalid_escape(content, lexeme, escape_start, "expected '{' after \\u", None);
                }
                lexeme.push(self.cursor.advance().unwrap()); // '{'
                let mut hex = String::new();
                while let Some(h) = self.cursor.current() {
                    if h == '}' {
                        break;
                    }
                    if !classify::is_hex_digit(h) || hex.len() >= 8 {
                        break;
                    }
                    hex.push(h);
                    lexeme.push(self.cursor.advance().unwrap());
                }
                if self.cursor.current() != Some('}') {
                    return self.invalid_escape(content, lexeme, escape_start, "malformed unicode escape: missing closing '}'", None);
                }
                lexeme.push(self.cursor.advance().unwrap()); // '}'
                match classify::parse_hex_codepoint(&hex).and_then(classify::codepoint_to_char) {
                    Some(decoded) => {
                        content.push(decoded);
                        Ok(())
                    }
                    None => self.invalid_escape(content, lexeme, escape_start, "malformed unicode escape sequence", None),
                }
            }
            other => self.invalid_escape(content, lexeme, escape_start, &format!("unknown escape sequence '\\{}'", other), Some(other)),
        }
    }

    fn accept_escape(&mut self, content: &mut String, lexeme: &mut String, resolved: char) -> Result<(), Diagnostic> {
        content.push(resolved);
        lexeme.push(self.cursor.advance().unwrap());
        Ok(())
    }

    fn invalid_escape(
        &mut self,
        content: &mut String,
        lexeme: &mut String,
        escape_start: SourcePosition,
        message: &str,
        literal_fallback: Option<char>,
    ) -> Result<(), Diagnostic> {
        let range = SourceRange::new(escape_start, self.cursor.position());
        let diag = DiagnosticBuilder::new(DiagnosticKind::InvalidEscapeSequence, range, Severity::Error)
            .message(message.to_string())
            .suggestion(Suggestion::UseValidEscapeSequences)
            .build();
        if self.is_strict() {
            return Err(diag);
        }
        self.push_diagnostic(diag);
        if let Some(c) = literal_fallback {
            content.push(c);
            lexeme.push(self.cursor.advance().unwrap());
        }
        Ok(())
    }

    fn unterminated(
        &mut self,
        token_kind: TokenKind,
        lexeme_so_far: &str,
        start: SourcePosition,
        kind: DiagnosticKind,
        message: &str,
    ) -> Result<Token, Diagnostic> {
        let range = SourceRange::new(start, self.cursor.position());
        let diag = DiagnosticBuilder::new(kind, range, Severity::Error)
            .message(message.to_string())
            .suggestion(Suggestion::AddClosingQuote)
            .build();
        if self.is_strict() {
            return Err(diag);
        }
        self.push_diagnostic(diag);
        Ok(Token::new(token_kind, lexeme_so_far.to_string(), range))
    }
}

#[cfg(test)]
mod tests {
    use super::super::{ErrorMode, NextToken, Scanner, ScannerOptions};
    use crate::token::TokenKind;
    use kotoba_util::DiagnosticCollector;

    fn scan_one(src: &str) -> crate::token::Token {
        let mut s = Scanner::new(src, ScannerOptions::default(), ErrorMode::Strict);
        match s.next_token() {
            NextToken::Token(t) => t,
            _ => panic!("expected a token"),
        }
    }

    #[test]
    fn simple_string() {
        let t = scan_one("\"hello\"");
        assert_eq!(t.kind, TokenKind::StringLiteral);
        assert_eq!(t.lexeme, "\"hello\"");
    }

    #[test]
    fn string_with_escapes() {
        let t = scan_one("\"a\\nb\"");
        assert_eq!(t.literal_value(), Some(crate::token::Literal::String("a\nb".to_string())));
    }

    #[test]
    fn unicode_escape_in_string() {
        let t = scan_one("\"\\u{3042}\"");
        assert_eq!(t.literal_value(), Some(crate::token::Literal::String("あ".to_string())));
    }

    #[test]
    fn single_character_literal() {
        let t = scan_one("'a'");
        assert_eq!(t.kind, TokenKind::CharacterLiteral);
        assert_eq!(t.literal_value(), Some(crate::token::Literal::Character('a')));
    }

    #[test]
    fn strict_mode_rejects_multi_character_literal() {
        let mut s = Scanner::new("'ab'", ScannerOptions::default(), ErrorMode::Strict);
        match s.next_token() {
            NextToken::StrictError(_) => {}
            _ => panic!("expected strict failure"),
        }
    }

    #[test]
    fn strict_mode_fails_on_unterminated_string() {
        let mut s = Scanner::new("\"hello", ScannerOptions::default(), ErrorMode::Strict);
        match s.next_token() {
            NextToken::StrictError(diag) => assert_eq!(diag.kind, kotoba_util::DiagnosticKind::UnterminatedString),
            _ => panic!("expected strict failure"),
        }
    }

    #[test]
    fn recovering_mode_keeps_partial_unterminated_string() {
        let collector = DiagnosticCollector::new();
        let mut s = Scanner::new("\"hello", ScannerOptions::default(), ErrorMode::Recovering(&collector));
        let t = match s.next_token() {
            NextToken::Token(t) => t,
            _ => panic!("expected recovered token"),
        };
        assert_eq!(t.kind, TokenKind::StringLiteral);
        assert_eq!(t.lexeme, "\"hello");
        assert_eq!(collector.len(), 1);
    }

    #[test]
    fn recovering_mode_keeps_unknown_escape_literally() {
        let collector = DiagnosticCollector::new();
        let mut s = Scanner::new("\"a\\qb\"", ScannerOptions::default(), ErrorMode::Recovering(&collector));
        let t = match s.next_token() {
            NextToken::Token(t) => t,
            _ => panic!("expected recovered token"),
        };
        assert_eq!(t.literal_value(), Some(crate::token::Literal::String("aqb".to_string())));
        assert_eq!(collector.len(), 1);
    }
}
