//! Operator and delimiter tables (`spec.md` §4.2/§4.5), longest-match
//! prefix scanned.

use crate::token::TokenKind;

/// Sorted by lexeme length descending so the scanner's prefix scan always
/// matches the longest available operator first (there are no single-byte
/// prefixes of a multi-byte operator in this table, but the ordering is
/// kept explicit rather than relying on table layout).
pub const OPERATORS: &[(&str, TokenKind)] = &[
    ("←", TokenKind::Assign),
    ("≠", TokenKind::NotEqual),
    ("≧", TokenKind::GreaterEqual),
    ("≦", TokenKind::LessEqual),
    ("+", TokenKind::Plus),
    ("-", TokenKind::Minus),
    ("*", TokenKind::Star),
    ("/", TokenKind::Slash),
    ("%", TokenKind::Percent),
    ("=", TokenKind::Equal),
    (">", TokenKind::Greater),
    ("<", TokenKind::Less),
];

pub const DELIMITERS: &[(&str, TokenKind)] = &[
    ("(", TokenKind::LParen),
    (")", TokenKind::RParen),
    ("[", TokenKind::LBracket),
    ("]", TokenKind::RBracket),
    ("{", TokenKind::LBrace),
    ("}", TokenKind::RBrace),
    (",", TokenKind::Comma),
    (".", TokenKind::Dot),
    (";", TokenKind::Semicolon),
    (":", TokenKind::Colon),
];

/// Tries each operator lexeme in table order (already longest-first) and
/// returns the first one whose characters match at the start of `text`.
pub fn match_operator(text: &str) -> Option<(&'static str, TokenKind)> {
    OPERATORS
        .iter()
        .find(|(lexeme, _)| text.starts_with(lexeme))
        .map(|&(lexeme, kind)| (lexeme, kind))
}

pub fn match_delimiter(ch: char) -> Option<TokenKind> {
    let mut buf = [0u8; 4];
    let s = ch.encode_utf8(&mut buf);
    DELIMITERS
        .iter()
        .find(|(lexeme, _)| *lexeme == s as &str)
        .map(|&(_, kind)| kind)
}
