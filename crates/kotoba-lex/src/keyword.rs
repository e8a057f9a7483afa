//! The canonical keyword table (`spec.md` glossary) and its reverse lookup.
//!
//! Lookup happens only *after* the scanner has extracted a complete
//! maximal identifier run (`spec.md` §4.2's "longest-match discipline"),
//! never via prefix matching — this is what keeps `endif` from ever being
//! mismatched as `end` + `if`. The length-descending list exists only
//! because `spec.md` §4.5 asks for it as an alternative representation;
//! the scanner itself uses the `HashMap`.

use std::collections::HashMap;
use std::sync::LazyLock;

use crate::token::TokenKind;

/// `(lexeme, kind)` pairs, in the exact order given by `spec.md`'s
/// glossary "Canonical keyword list".
pub(crate) const KEYWORDS: &[(&str, TokenKind)] = &[
    ("endprocedure", TokenKind::Endprocedure),
    ("endfunction", TokenKind::Endfunction),
    ("procedure", TokenKind::Procedure),
    ("endwhile", TokenKind::Endwhile),
    ("function", TokenKind::Function),
    ("return", TokenKind::Return),
    ("endfor", TokenKind::Endfor),
    ("endif", TokenKind::Endif),
    ("break", TokenKind::Break),
    ("while", TokenKind::While),
    ("false", TokenKind::False),
    ("文字列型", TokenKind::StringType),
    ("レコード", TokenKind::RecordType),
    ("true", TokenKind::True),
    ("then", TokenKind::Then),
    ("else", TokenKind::Else),
    ("elif", TokenKind::Elif),
    ("step", TokenKind::Step),
    ("整数型", TokenKind::IntegerType),
    ("実数型", TokenKind::RealType),
    ("文字型", TokenKind::CharacterType),
    ("論理型", TokenKind::BooleanType),
    ("and", TokenKind::And),
    ("not", TokenKind::Not),
    ("for", TokenKind::For),
    ("配列", TokenKind::ArrayType),
    ("or", TokenKind::Or),
    ("to", TokenKind::To),
    ("in", TokenKind::In),
    ("do", TokenKind::Do),
    ("if", TokenKind::If),
    ("変数", TokenKind::Variable),
    ("定数", TokenKind::Constant),
];

static KEYWORD_MAP: LazyLock<HashMap<&'static str, TokenKind>> =
    LazyLock::new(|| KEYWORDS.iter().copied().collect());

static REVERSE_MAP: LazyLock<HashMap<TokenKind, &'static str>> =
    LazyLock::new(|| KEYWORDS.iter().map(|&(lexeme, kind)| (kind, lexeme)).collect());

/// Looks up a fully-extracted identifier lexeme against the keyword table.
/// `None` means the lexeme is an ordinary identifier.
pub fn lookup(lexeme: &str) -> Option<TokenKind> {
    KEYWORD_MAP.get(lexeme).copied()
}

/// Reverse lookup used by diagnostics that suggest a corrected keyword
/// spelling, and by the round-trip property test
/// (`spec.md` §8: "for every keyword-kind token, lookup(t.lexeme)==t.kind").
pub fn lexeme_for(kind: TokenKind) -> Option<&'static str> {
    REVERSE_MAP.get(&kind).copied()
}

/// The same pairs as [`KEYWORDS`], sorted by lexeme length descending, for
/// prefix-driven matchers (`spec.md` §4.5). The scanner's own matcher
/// extracts the whole identifier first and does not use this ordering; it
/// exists to satisfy the alternate representation the spec names.
pub fn by_length_descending() -> Vec<(&'static str, TokenKind)> {
    let mut pairs: Vec<_> = KEYWORDS.to_vec();
    pairs.sort_by(|a, b| b.0.chars().count().cmp(&a.0.chars().count()));
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endif_is_one_keyword_not_end_plus_if() {
        assert_eq!(lookup("endif"), Some(TokenKind::Endif));
        assert_eq!(lookup("end"), None);
    }

    #[test]
    fn japanese_type_keywords_resolve() {
        assert_eq!(lookup("整数型"), Some(TokenKind::IntegerType));
        assert_eq!(lookup("レコード"), Some(TokenKind::RecordType));
    }

    #[test]
    fn unknown_lexeme_is_not_a_keyword() {
        assert_eq!(lookup("x"), None);
        assert_eq!(lookup("endiff"), None);
    }

    #[test]
    fn reverse_lookup_round_trips_every_keyword() {
        for &(lexeme, kind) in KEYWORDS {
            assert_eq!(lexeme_for(kind), Some(lexeme));
            assert_eq!(lookup(lexeme_for(kind).unwrap()), Some(kind));
        }
    }

    #[test]
    fn length_descending_is_actually_sorted() {
        let pairs = by_length_descending();
        for window in pairs.windows(2) {
            assert!(window[0].0.chars().count() >= window[1].0.chars().count());
        }
    }
}
