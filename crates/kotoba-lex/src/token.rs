//! `TokenKind`, `Token`, and the `Literal` value type.
//!
//! `TokenKind` is a closed, fieldless enum: every production the scanner
//! can match gets exactly one tag, and the matched text always lives in
//! `Token::lexeme`, never inside the variant (`spec.md` §3, reinforced by
//! `SPEC_FULL.md` §3's note that this diverges from the teacher's
//! `Token::Ident(Symbol)`/`Token::Number(u64)` payload-carrying design).

use kotoba_util::SourceRange;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Type keywords
    IntegerType,
    RealType,
    CharacterType,
    StringType,
    BooleanType,
    RecordType,
    ArrayType,

    // Control-flow keywords
    If,
    Then,
    Else,
    Elif,
    Endif,
    While,
    Do,
    Endwhile,
    For,
    To,
    Step,
    In,
    Endfor,
    Function,
    Endfunction,
    Procedure,
    Endprocedure,
    Return,
    Break,

    // Logical keywords
    And,
    Or,
    Not,

    // Boolean literals (keywords that double as literal values)
    True,
    False,

    // Declaration keywords
    Variable,
    Constant,

    // Literals
    IntegerLiteral,
    RealLiteral,
    StringLiteral,
    CharacterLiteral,

    Identifier,

    // Operators
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Assign,     // ←
    Equal,      // =
    NotEqual,   // ≠
    Greater,    // >
    GreaterEqual, // ≧
    Less,       // <
    LessEqual,  // ≦

    // Delimiters
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    Semicolon,
    Colon,

    // Trivia (only emitted when `ScannerOptions::preserve_trivia` is set)
    Comment,
    Whitespace,
    Newline,

    Eof,
}

impl TokenKind {
    pub fn is_trivia(&self) -> bool {
        matches!(self, TokenKind::Comment | TokenKind::Whitespace | TokenKind::Newline)
    }

    pub fn is_keyword(&self) -> bool {
        !matches!(
            self,
            TokenKind::Identifier
                | TokenKind::IntegerLiteral
                | TokenKind::RealLiteral
                | TokenKind::StringLiteral
                | TokenKind::CharacterLiteral
                | TokenKind::Plus
                | TokenKind::Minus
                | TokenKind::Star
                | TokenKind::Slash
                | TokenKind::Percent
                | TokenKind::Assign
                | TokenKind::Equal
                | TokenKind::NotEqual
                | TokenKind::Greater
                | TokenKind::GreaterEqual
                | TokenKind::Less
                | TokenKind::LessEqual
                | TokenKind::LParen
                | TokenKind::RParen
                | TokenKind::LBracket
                | TokenKind::RBracket
                | TokenKind::LBrace
                | TokenKind::RBrace
                | TokenKind::Comma
                | TokenKind::Dot
                | TokenKind::Semicolon
                | TokenKind::Colon
                | TokenKind::Comment
                | TokenKind::Whitespace
                | TokenKind::Newline
                | TokenKind::Eof
        )
    }
}

/// The closed literal-value sum type fixed by `spec.md` §9's design note.
/// Computed on demand from `(kind, lexeme)`, not stored eagerly on every
/// token — most tokens (keywords, delimiters, operators) have no literal
/// value at all.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Integer(i64),
    Real(f64),
    String(String),
    Character(char),
    Boolean(bool),
}

/// `(kind, lexeme, position)` from `spec.md` §3, represented with a full
/// `SourceRange` rather than only a start position so trivia-preserving
/// mode and the incremental re-lexer can recover exact lexeme extents
/// without re-deriving them from the lexeme length.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub range: SourceRange,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, range: SourceRange) -> Self {
        Token {
            kind,
            lexeme: lexeme.into(),
            range,
        }
    }

    /// Start position of the token, satisfying `spec.md`'s
    /// `(kind, lexeme, position)` triple as a view onto the richer struct.
    pub fn position(&self) -> kotoba_util::SourcePosition {
        self.range.start
    }

    pub fn is_eof(&self) -> bool {
        self.kind == TokenKind::Eof
    }

    /// Derives this token's literal value, if it has one. Numeric literals
    /// are parsed from their lexeme (stripping `_` separators and base
    /// prefixes); `true`/`false` keyword tokens also yield a `Boolean`.
    pub fn literal_value(&self) -> Option<Literal> {
        match self.kind {
            TokenKind::IntegerLiteral => parse_integer_lexeme(&self.lexeme).map(Literal::Integer),
            TokenKind::RealLiteral => parse_real_lexeme(&self.lexeme).map(Literal::Real),
            TokenKind::StringLiteral => Some(Literal::String(unquote_string(&self.lexeme))),
            TokenKind::CharacterLiteral => unquote_char(&self.lexeme).map(Literal::Character),
            TokenKind::True => Some(Literal::Boolean(true)),
            TokenKind::False => Some(Literal::Boolean(false)),
            _ => None,
        }
    }
}

fn parse_integer_lexeme(lexeme: &str) -> Option<i64> {
    let cleaned: String = lexeme.chars().filter(|&c| c != '_').collect();
    if let Some(rest) = cleaned.strip_prefix("0x").or_else(|| cleaned.strip_prefix("0X")) {
        i64::from_str_radix(rest, 16).ok()
    } else if let Some(rest) = cleaned.strip_prefix("0b").or_else(|| cleaned.strip_prefix("0B")) {
        i64::from_str_radix(rest, 2).ok()
    } else if let Some(rest) = cleaned.strip_prefix("0o").or_else(|| cleaned.strip_prefix("0O")) {
        i64::from_str_radix(rest, 8).ok()
    } else {
        cleaned.parse().ok()
    }
}

fn parse_real_lexeme(lexeme: &str) -> Option<f64> {
    let cleaned: String = lexeme.chars().filter(|&c| c != '_').collect();
    cleaned.parse().ok()
}

/// Strips the surrounding quotes from a string-literal lexeme and resolves
/// escape sequences, matching the scanner's own escape handling. Lenient
/// for malformed escapes since strings that reach here via the recovering
/// scanner may legitimately contain them (spec §4.3's recovery policy
/// keeps the offending character literally in the string's logical
/// content).
fn unquote_string(lexeme: &str) -> String {
    let inner = lexeme
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(lexeme);
    resolve_escapes(inner)
}

fn unquote_char(lexeme: &str) -> Option<char> {
    let inner = lexeme.strip_prefix('\'').and_then(|s| s.strip_suffix('\''))?;
    resolve_escapes(inner).chars().next()
}

fn resolve_escapes(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('\\') => out.push('\\'),
            Some('"') => out.push('"'),
            Some('\'') => out.push('\''),
            Some('u') if chars.peek() == Some(&'{') => {
                chars.next();
                let mut hex = String::new();
                for c in chars.by_ref() {
                    if c == '}' {
                        break;
                    }
                    hex.push(c);
                }
                if let Some(ch) = crate::classify::parse_hex_codepoint(&hex)
                    .and_then(crate::classify::codepoint_to_char)
                {
                    out.push(ch);
                }
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use kotoba_util::SourcePosition;

    fn range() -> SourceRange {
        SourceRange::point(SourcePosition::START)
    }

    #[test]
    fn integer_literal_parses_decimal() {
        let t = Token::new(TokenKind::IntegerLiteral, "42", range());
        assert_eq!(t.literal_value(), Some(Literal::Integer(42)));
    }

    #[test]
    fn integer_literal_parses_hex_with_underscore() {
        let t = Token::new(TokenKind::IntegerLiteral, "0xFF_AA", range());
        assert_eq!(t.literal_value(), Some(Literal::Integer(0xFFAA)));
    }

    #[test]
    fn real_literal_parses_scientific_notation() {
        let t = Token::new(TokenKind::RealLiteral, "1.5e-3", range());
        assert_eq!(t.literal_value(), Some(Literal::Real(1.5e-3)));
    }

    #[test]
    fn string_literal_unescapes_content() {
        let t = Token::new(TokenKind::StringLiteral, "\"hello\\nworld\"", range());
        assert_eq!(
            t.literal_value(),
            Some(Literal::String("hello\nworld".to_string()))
        );
    }

    #[test]
    fn character_literal_unescapes_single_scalar() {
        let t = Token::new(TokenKind::CharacterLiteral, "'\\n'", range());
        assert_eq!(t.literal_value(), Some(Literal::Character('\n')));
    }

    #[test]
    fn boolean_keywords_have_literal_values() {
        let t = Token::new(TokenKind::True, "true", range());
        assert_eq!(t.literal_value(), Some(Literal::Boolean(true)));
    }

    #[test]
    fn keyword_and_delimiter_tokens_have_no_literal_value() {
        let t = Token::new(TokenKind::If, "if", range());
        assert_eq!(t.literal_value(), None);
    }

    #[test]
    fn is_keyword_excludes_identifiers_and_operators() {
        assert!(TokenKind::If.is_keyword());
        assert!(TokenKind::IntegerType.is_keyword());
        assert!(!TokenKind::Identifier.is_keyword());
        assert!(!TokenKind::Plus.is_keyword());
        assert!(!TokenKind::Eof.is_keyword());
    }
}
