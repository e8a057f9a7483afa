//! Parallel chunked tokenization (spec §5).
//!
//! Explicitly named in spec §1 as "plumbing built on top of the scanner,"
//! specified only at its interface boundary: partition on line breaks (so a
//! boundary never lands inside a string, comment, or number), scan each
//! chunk independently with the strict scanner, then translate and
//! concatenate. Since every boundary here is chosen at an actual newline,
//! chunks never duplicate text and the "optional overlap window… dropped
//! from the later chunk" spec describes for imperfect boundary selection
//! has nothing to trim; a thread pool of reusable `Scanner` instances is
//! left out per spec §1's framing of pooling as "an allocation-amortization
//! concern, not a correctness concern… left to the implementer."

use rayon::prelude::*;

use kotoba_util::{Diagnostic, PositionTracker, SourcePosition, SourceRange};

use crate::scanner::ScannerOptions;
use crate::strict::scan_strict_with_options;
use crate::token::{Token, TokenKind};

pub fn tokenize_parallel(source: &str, target_chunk_count: usize) -> Result<Vec<Token>, Diagnostic> {
    tokenize_parallel_with_options(source, target_chunk_count, ScannerOptions::default())
}

pub fn tokenize_parallel_with_options(
    source: &str,
    target_chunk_count: usize,
    options: ScannerOptions,
) -> Result<Vec<Token>, Diagnostic> {
    let chars: Vec<char> = source.chars().collect();
    let ranges = choose_chunks(&chars, target_chunk_count.max(1));
    log::trace!("tokenize_parallel: {} chars split into {} chunk(s)", chars.len(), ranges.len());

    let mut bases = Vec::with_capacity(ranges.len());
    let mut tracker = PositionTracker::new();
    for r in &ranges {
        bases.push(tracker.position());
        for &c in &chars[r.clone()] {
            tracker.advance(c);
        }
    }

    let results: Vec<Result<Vec<Token>, Diagnostic>> = ranges
        .par_iter()
        .map(|r| {
            let text: String = chars[r.clone()].iter().collect();
            scan_strict_with_options(&text, options)
        })
        .collect();

    let mut merged = Vec::with_capacity(chars.len() / 4);
    let last_index = ranges.len().saturating_sub(1);
    for (i, result) in results.into_iter().enumerate() {
        let mut tokens = result?;
        if i != last_index {
            if matches!(tokens.last(), Some(t) if t.kind == TokenKind::Eof) {
                tokens.pop();
            }
        }
        let base = bases[i];
        for tok in &mut tokens {
            tok.range = SourceRange::new(translate(tok.range.start, base), translate(tok.range.end, base));
        }
        merged.extend(tokens);
    }
    Ok(merged)
}

/// Splits `chars` into roughly `target_count` pieces, each boundary pushed
/// forward to the next line break (or end of input) so no chunk can split a
/// token.
fn choose_chunks(chars: &[char], target_count: usize) -> Vec<std::ops::Range<usize>> {
    if target_count <= 1 || chars.is_empty() {
        return vec![0..chars.len()];
    }
    let approx = (chars.len() / target_count).max(1);
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let mut end = (start + approx).min(chars.len());
        while end < chars.len() && chars[end - 1] != '\n' {
            end += 1;
        }
        chunks.push(start..end);
        start = end;
    }
    chunks
}

fn translate(pos: SourcePosition, base: SourcePosition) -> SourcePosition {
    if pos.line == 1 {
        SourcePosition::new(base.line, base.column + pos.column - 1, base.offset + pos.offset)
    } else {
        SourcePosition::new(base.line + pos.line - 1, pos.column, base.offset + pos.offset)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strict::scan_strict;

    fn many_lines() -> String {
        (0..40).map(|i| format!("x{} ← {}\n", i, i)).collect()
    }

    #[test]
    fn single_chunk_matches_sequential_scan() {
        let src = many_lines();
        let sequential = scan_strict(&src).unwrap();
        let parallel = tokenize_parallel(&src, 1).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn multi_chunk_matches_sequential_scan() {
        let src = many_lines();
        let sequential = scan_strict(&src).unwrap();
        let parallel = tokenize_parallel(&src, 6).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn chunk_boundaries_never_land_mid_line() {
        let src = many_lines();
        let chars: Vec<char> = src.chars().collect();
        for r in choose_chunks(&chars, 5) {
            if r.end < chars.len() {
                assert_eq!(chars[r.end - 1], '\n');
            }
        }
    }

    #[test]
    fn an_error_in_any_chunk_propagates() {
        let mut src = many_lines();
        src.push_str("\"unterminated\n");
        assert!(tokenize_parallel(&src, 4).is_err());
    }

    #[test]
    fn empty_input_yields_empty_token_list_with_final_eof() {
        let tokens = tokenize_parallel("", 4).unwrap();
        assert_eq!(tokens.len(), 1);
        assert!(tokens[0].is_eof());
    }
}
