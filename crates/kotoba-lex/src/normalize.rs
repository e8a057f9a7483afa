//! The Unicode normalization front-end (`spec.md` §4.1).
//!
//! Runs exactly once per input before scanning. Never fails: security
//! concerns (bidi overrides, homoglyphs, oversized input) are surfaced via
//! [`NormalizationStats`], never as an error return, per `spec.md` §4.1's
//! "Failure semantics: never fails."

use std::collections::HashMap;
use std::sync::LazyLock;

use unicode_normalization::UnicodeNormalization;

use crate::classify;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationForm {
    Nfc,
    Nfd,
    Nfkc,
    Nfkd,
}

impl Default for NormalizationForm {
    fn default() -> Self {
        NormalizationForm::Nfc
    }
}

#[derive(Debug, Clone, Copy)]
pub struct SecurityConfig {
    pub enable_homoglyph_detection: bool,
    pub prevent_normalization_attacks: bool,
    pub max_normalized_length: usize,
    pub detect_bidi_reordering: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        SecurityConfig {
            enable_homoglyph_detection: true,
            prevent_normalization_attacks: true,
            max_normalized_length: 1_000_000,
            detect_bidi_reordering: true,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NormalizationStats {
    pub fullwidth_conversions: usize,
    pub nfc_rewrites: usize,
    pub nfd_rewrites: usize,
    pub japanese_rewrites: usize,
    pub emoji_rewrites: usize,
    pub math_symbol_rewrites: usize,
    pub bidi_reorderings_removed: usize,
    pub homoglyphs_detected: usize,
    pub security_issues_found: usize,
    pub original_length: usize,
    pub normalized_length: usize,
}

impl NormalizationStats {
    pub fn has_security_concerns(&self) -> bool {
        self.bidi_reorderings_removed > 0
            || self.homoglyphs_detected > 0
            || self.security_issues_found > 0
    }

    fn log_summary(&self) {
        if self.has_security_concerns()
            || self.fullwidth_conversions > 0
            || self.math_symbol_rewrites > 0
        {
            log::debug!(
                "normalization: {}->{} scalars, fullwidth={}, math={}, bidi_removed={}, \
                 homoglyphs={}, security_issues={}",
                self.original_length,
                self.normalized_length,
                self.fullwidth_conversions,
                self.math_symbol_rewrites,
                self.bidi_reorderings_removed,
                self.homoglyphs_detected,
                self.security_issues_found,
            );
        }
    }
}

/// Bidi-override control characters, `spec.md` §4.1 step 2.
const BIDI_OVERRIDE_RANGES: &[(u32, u32)] = &[(0x202A, 0x202E), (0x2066, 0x2069)];

fn is_bidi_override(c: char) -> bool {
    let cp = c as u32;
    BIDI_OVERRIDE_RANGES.iter().any(|&(lo, hi)| cp >= lo && cp <= hi)
}

/// Confusable-to-canonical table, frozen in `SPEC_FULL.md` §4.1: Cyrillic
/// and Greek lookalikes that fold to the ASCII/Latin letter they visually
/// match. Mathematical-alphanumeric lookalikes are intentionally not
/// covered here — NFKC already flattens those during form application.
static HOMOGLYPH_TABLE: LazyLock<HashMap<char, char>> = LazyLock::new(|| {
    let pairs: &[(char, char)] = &[
        // Cyrillic lowercase
        ('а', 'a'), ('е', 'e'), ('о', 'o'), ('р', 'p'), ('с', 'c'), ('у', 'y'), ('х', 'x'),
        // Cyrillic uppercase
        ('А', 'A'), ('В', 'B'), ('Е', 'E'), ('К', 'K'), ('М', 'M'), ('Н', 'H'),
        ('О', 'O'), ('Р', 'P'), ('С', 'C'), ('Т', 'T'), ('Х', 'X'),
        // Greek lowercase
        ('α', 'a'), ('β', 'b'), ('ο', 'o'), ('ν', 'v'), ('ρ', 'p'), ('χ', 'x'), ('υ', 'u'),
        // Greek uppercase
        ('Α', 'A'), ('Β', 'B'), ('Ε', 'E'), ('Ζ', 'Z'), ('Η', 'H'), ('Ι', 'I'), ('Κ', 'K'),
        ('Μ', 'M'), ('Ν', 'N'), ('Ο', 'O'), ('Ρ', 'P'), ('Τ', 'T'), ('Υ', 'Y'), ('Χ', 'X'),
    ];
    pairs.iter().copied().collect()
});

/// Math-symbol-to-spelling table, frozen in `SPEC_FULL.md` §4.1 step 5.
/// These become ordinary identifiers/operators after scanning.
static MATH_SYMBOL_TABLE: LazyLock<HashMap<char, &'static str>> = LazyLock::new(|| {
    [
        ('π', "pi"),
        ('∞', "infinity"),
        ('×', "*"),
        ('÷', "/"),
        ('≈', "~="),
        ('√', "sqrt"),
        ('∑', "sum"),
        ('∏', "product"),
        ('∆', "delta"),
        ('∂', "d"),
    ]
    .into_iter()
    .collect()
});

fn apply_form(source: &str, form: NormalizationForm) -> (String, bool) {
    let normalized = apply_single(source, form);
    let changed = normalized != source;
    (normalized, changed)
}

fn strip_bidi_overrides(source: &str, stats: &mut NormalizationStats) -> String {
    let mut out = String::with_capacity(source.len());
    for c in source.chars() {
        if is_bidi_override(c) {
            stats.bidi_reorderings_removed += 1;
        } else {
            out.push(c);
        }
    }
    out
}

fn replace_homoglyphs(source: &str, stats: &mut NormalizationStats) -> String {
    let mut out = String::with_capacity(source.len());
    for c in source.chars() {
        if let Some(&replacement) = HOMOGLYPH_TABLE.get(&c) {
            out.push(replacement);
            stats.homoglyphs_detected += 1;
        } else {
            out.push(c);
        }
    }
    out
}

fn fold_fullwidth(source: &str, stats: &mut NormalizationStats) -> String {
    let mut out = String::with_capacity(source.len());
    for c in source.chars() {
        let cp = c as u32;
        if (0xFF01..=0xFF5E).contains(&cp) {
            let folded = char::from_u32(cp - 0xFEE0).unwrap_or(c);
            out.push(folded);
            stats.fullwidth_conversions += 1;
        } else {
            out.push(c);
        }
    }
    out
}

fn map_math_symbols(source: &str, stats: &mut NormalizationStats) -> String {
    let mut out = String::with_capacity(source.len());
    for c in source.chars() {
        if let Some(&spelling) = MATH_SYMBOL_TABLE.get(&c) {
            out.push_str(spelling);
            stats.math_symbol_rewrites += 1;
        } else {
            out.push(c);
        }
    }
    out
}

fn apply_single(text: &str, form: NormalizationForm) -> String {
    match form {
        NormalizationForm::Nfc => text.nfc().collect(),
        NormalizationForm::Nfd => text.nfd().collect(),
        NormalizationForm::Nfkc => text.nfkc().collect(),
        NormalizationForm::Nfkd => text.nfkd().collect(),
    }
}

/// Counts Japanese-range identifier codepoints (`spec.md` §4.5's Hiragana/
/// Katakana/CJK ranges) touched by `form` — either a combining
/// dakuten/handakuten sequence recomposed by NFC/NFKC, or a precomposed kana
/// decomposed by NFD/NFKD. Checked with a two-codepoint lookahead window
/// since composition only happens across a base-plus-combining-mark pair,
/// never within a single codepoint.
fn count_japanese_rewrites(source: &str, form: NormalizationForm) -> usize {
    let chars: Vec<char> = source.chars().collect();
    let mut count = 0;
    for i in 0..chars.len() {
        if !classify::in_japanese_ident_range(chars[i]) {
            continue;
        }
        let window: String = if i + 1 < chars.len() {
            [chars[i], chars[i + 1]].iter().collect()
        } else {
            chars[i].to_string()
        };
        if apply_single(&window, form) != window {
            count += 1;
        }
    }
    count
}

/// Strips variation selectors (U+FE00-U+FE0F) that disambiguate emoji
/// presentation, `spec.md` §4.1 step 6; each one removed is an emoji
/// rewrite since these selectors never attach to anything else.
fn strip_variation_selectors(source: &str, stats: &mut NormalizationStats) -> String {
    let mut out = String::with_capacity(source.len());
    for c in source.chars() {
        if (0xFE00..=0xFE0F).contains(&(c as u32)) {
            stats.emoji_rewrites += 1;
        } else {
            out.push(c);
        }
    }
    out
}

/// Runs the full 7-step normalization pipeline described in `spec.md`
/// §4.1 and returns the normalized source alongside collected statistics.
/// Never fails; a length overage under `prevent_normalization_attacks`
/// truncates and records a security issue instead of erroring.
pub fn normalize(source: &str, form: NormalizationForm, security: &SecurityConfig) -> (String, NormalizationStats) {
    let mut stats = NormalizationStats {
        original_length: source.chars().count(),
        ..Default::default()
    };

    stats.japanese_rewrites = count_japanese_rewrites(source, form);

    let (mut text, changed) = apply_form(source, form);
    if changed {
        match form {
            NormalizationForm::Nfd | NormalizationForm::Nfkd => stats.nfd_rewrites += 1,
            NormalizationForm::Nfc | NormalizationForm::Nfkc => stats.nfc_rewrites += 1,
        }
    }

    if security.detect_bidi_reordering {
        text = strip_bidi_overrides(&text, &mut stats);
    }

    if security.enable_homoglyph_detection {
        text = replace_homoglyphs(&text, &mut stats);
    }

    text = fold_fullwidth(&text, &mut stats);
    text = map_math_symbols(&text, &mut stats);
    text = strip_variation_selectors(&text, &mut stats);

    if security.prevent_normalization_attacks {
        let len = text.chars().count();
        if len > security.max_normalized_length {
            text = text.chars().take(security.max_normalized_length).collect();
            stats.security_issues_found += 1;
        }
    }

    stats.normalized_length = text.chars().count();
    stats.log_summary();
    (text, stats)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn idempotent_under_repeated_nfc() {
        let security = SecurityConfig::default();
        let (once, _) = normalize("café ← 1", NormalizationForm::Nfc, &security);
        let (twice, _) = normalize(&once, NormalizationForm::Nfc, &security);
        assert_eq!(once, twice);
    }

    #[test]
    fn strips_bidi_override_characters() {
        let security = SecurityConfig::default();
        let src = format!("a{}b", '\u{202E}');
        let (normalized, stats) = normalize(&src, NormalizationForm::Nfc, &security);
        assert_eq!(normalized, "ab");
        assert_eq!(stats.bidi_reorderings_removed, 1);
        assert!(stats.has_security_concerns());
    }

    #[test]
    fn replaces_cyrillic_homoglyphs() {
        let security = SecurityConfig::default();
        // Cyrillic 'а' (U+0430) looks identical to ASCII 'a'.
        let (normalized, stats) = normalize("\u{0430}bc", NormalizationForm::Nfc, &security);
        assert_eq!(normalized, "abc");
        assert_eq!(stats.homoglyphs_detected, 1);
    }

    #[test]
    fn folds_fullwidth_ascii() {
        let security = SecurityConfig::default();
        let (normalized, stats) = normalize("\u{FF21}", NormalizationForm::Nfc, &security);
        assert_eq!(normalized, "A");
        assert_eq!(stats.fullwidth_conversions, 1);
    }

    #[test]
    fn maps_math_symbols_to_spellings() {
        let security = SecurityConfig::default();
        let (normalized, stats) = normalize("π × 2", NormalizationForm::Nfc, &security);
        assert_eq!(normalized, "pi * 2");
        assert_eq!(stats.math_symbol_rewrites, 2);
    }

    #[test]
    fn strips_variation_selectors() {
        let security = SecurityConfig::default();
        let src = format!("a{}", '\u{FE0F}');
        let (normalized, stats) = normalize(&src, NormalizationForm::Nfc, &security);
        assert_eq!(normalized, "a");
        assert_eq!(stats.emoji_rewrites, 1);
    }

    #[test]
    fn counts_japanese_rewrites_for_decomposed_kana() {
        let security = SecurityConfig::default();
        // か (U+304B) + combining dakuten (U+3099) decomposes from, and NFC
        // recomposes into, the precomposed が (U+304C).
        let decomposed = format!("{}{}", '\u{304B}', '\u{3099}');
        let (_, stats) = normalize(&decomposed, NormalizationForm::Nfc, &security);
        assert!(stats.japanese_rewrites > 0);
    }

    #[test]
    fn truncates_oversized_input_instead_of_failing() {
        let security = SecurityConfig {
            max_normalized_length: 3,
            ..SecurityConfig::default()
        };
        let (normalized, stats) = normalize("abcdef", NormalizationForm::Nfc, &security);
        assert_eq!(normalized, "abc");
        assert_eq!(stats.security_issues_found, 1);
    }

    #[test]
    fn plain_ascii_passes_through_unchanged() {
        let security = SecurityConfig::default();
        let (normalized, stats) = normalize("if x then", NormalizationForm::Nfc, &security);
        assert_eq!(normalized, "if x then");
        assert!(!stats.has_security_concerns());
    }
}
