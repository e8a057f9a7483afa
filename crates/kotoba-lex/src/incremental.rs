//! The incremental re-lexer (spec §4.4).
//!
//! Implements the six-step algorithm verbatim: compute the affected token
//! range with padding, widen to safe line boundaries in the new source,
//! rescan only that region with the strict scanner, translate its
//! positions, splice it into the untouched prefix/suffix, and report
//! metrics. Position translation here walks the new source from its start
//! up to the reparse region — `O(edit offset)`, not `O(1)` — which is a
//! documented simplification (see `DESIGN.md`); the actual rescanning work
//! the algorithm is sized to stay proportional to stays bounded to the
//! reparse region, which is the property spec §4.4 cares about.

use kotoba_util::{Diagnostic, PositionTracker, SourcePosition, SourceRange};

use crate::scanner::ScannerOptions;
use crate::strict::scan_strict_with_options;
use crate::token::{Token, TokenKind};

/// `edit.range` is a half-open range of Unicode scalar offsets into the
/// *previous* source; `replacement_text` is what replaces it.
#[derive(Debug, Clone)]
pub struct Edit {
    pub range: std::ops::Range<usize>,
    pub replacement_text: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct IncrementalMetrics {
    pub original_token_count: usize,
    pub new_token_count: usize,
    pub characters_rescanned: usize,
    pub tokens_added: usize,
    pub tokens_removed: usize,
    /// `characters_rescanned / new_source.len()`; 1.0 means no better than
    /// a full rescan, values near 0 mean the edit was cheap.
    pub efficiency_ratio: f64,
}

pub struct TokenizeResult {
    pub tokens: Vec<Token>,
    pub affected_range: std::ops::Range<usize>,
    pub reparse_region: SourceRange,
    pub metrics: IncrementalMetrics,
}

pub fn relex_incremental(previous_tokens: &[Token], previous_source: &str, edit: &Edit) -> Result<TokenizeResult, Diagnostic> {
    relex_incremental_with_options(previous_tokens, previous_source, edit, ScannerOptions::default())
}

pub fn relex_incremental_with_options(
    previous_tokens: &[Token],
    previous_source: &str,
    edit: &Edit,
    options: ScannerOptions,
) -> Result<TokenizeResult, Diagnostic> {
    let previous_chars: Vec<char> = previous_source.chars().collect();
    let new_chars = apply_edit(&previous_chars, edit);
    let new_source: String = new_chars.iter().collect();

    let edit_start_pos = position_at(&previous_chars, edit.range.start);
    let edit_end_pos = position_at(&previous_chars, edit.range.end);
    let edit_range_in_old = SourceRange::new(edit_start_pos, edit_end_pos);

    // Step 1: affected token indices, padded by two tokens on each side.
    let touching: Vec<usize> = previous_tokens
        .iter()
        .enumerate()
        .filter(|(_, t)| t.range.touches(&edit_range_in_old))
        .map(|(i, _)| i)
        .collect();
    let (lo, hi) = match (touching.first(), touching.last()) {
        (Some(&lo), Some(&hi)) => (lo, hi),
        _ => {
            // No token overlaps the edit point (e.g. pure insertion between
            // two tokens); anchor on the nearest preceding token.
            let anchor = previous_tokens
                .iter()
                .rposition(|t| t.range.end.offset <= edit.range.start)
                .unwrap_or(0);
            (anchor, anchor)
        }
    };
    let padded_lo = lo.saturating_sub(2);
    let mut affected_end = (hi + 3).min(previous_tokens.len());

    // Step 2: safe-start/safe-end reparse region in the new source.
    let new_edit_end_offset = edit.range.start + edit.replacement_text.chars().count();
    let region_start_offset = line_start_offset(&new_chars, edit.range.start);
    let region_end_offset = line_end_offset(&new_chars, new_edit_end_offset);
    let region_start_pos = position_at(&new_chars, region_start_offset);
    let region_end_pos = position_at(&new_chars, region_end_offset);
    let reparse_region = SourceRange::new(region_start_pos, region_end_pos);
    let region_text: String = new_chars[region_start_offset..region_end_offset].iter().collect();

    log::trace!(
        "relex_incremental: affected_range={}..{}, reparse_region={}..{} ({} chars)",
        padded_lo,
        affected_end,
        region_start_pos,
        region_end_pos,
        region_text.chars().count(),
    );

    // Step 3: rescan just that region with the strict scanner.
    let mut rescanned = scan_strict_with_options(&region_text, options)?;

    // Step 4: translate rescanned positions into new-source coordinates.
    for tok in &mut rescanned {
        tok.range = SourceRange::new(
            translate(tok.range.start, region_start_pos),
            translate(tok.range.end, region_start_pos),
        );
    }

    let reaches_new_eof = region_end_offset >= new_chars.len();
    if reaches_new_eof {
        affected_end = previous_tokens.len();
    } else if let Some(last) = rescanned.last() {
        if last.kind == TokenKind::Eof {
            rescanned.pop();
        }
    }

    // Step 5: splice, shifting the untouched suffix by the edit's net
    // scalar/line delta (the reparse region already re-derived correct
    // positions for everything up to and including the edited line).
    let delta_offset = edit.replacement_text.chars().count() as isize - edit.range.len() as isize;
    let delta_lines = count_newlines(&edit.replacement_text) as isize
        - count_newlines_in_range(&previous_chars, edit.range.clone()) as isize;

    let mut tokens = Vec::with_capacity(padded_lo + rescanned.len() + (previous_tokens.len() - affected_end));
    tokens.extend_from_slice(&previous_tokens[..padded_lo]);
    tokens.extend(rescanned.iter().cloned());
    for tok in &previous_tokens[affected_end..] {
        let mut shifted = tok.clone();
        shifted.range = SourceRange::new(
            shift(tok.range.start, delta_lines, delta_offset),
            shift(tok.range.end, delta_lines, delta_offset),
        );
        tokens.push(shifted);
    }

    // Step 6: metrics.
    let tokens_removed = affected_end - padded_lo;
    let metrics = IncrementalMetrics {
        original_token_count: previous_tokens.len(),
        new_token_count: tokens.len(),
        characters_rescanned: region_text.chars().count(),
        tokens_added: rescanned.len(),
        tokens_removed,
        efficiency_ratio: region_text.chars().count() as f64 / (new_chars.len().max(1) as f64),
    };

    Ok(TokenizeResult { tokens, affected_range: padded_lo..affected_end, reparse_region, metrics })
}

/// Spec §4.4 "Validation hook": re-scans the full new source and samples
/// up to `sample_count` leading tokens to confirm the incremental result
/// is token-for-token equivalent. Never used on the hot `relex_incremental`
/// path; wired into property tests only.
pub struct ValidationResult {
    pub is_valid: bool,
    pub token_count_match: bool,
    pub type_mismatches: usize,
    pub position_mismatches: usize,
    pub sampled_count: usize,
}

pub fn validate_incremental(incremental_result: &TokenizeResult, new_source: &str) -> Result<ValidationResult, Diagnostic> {
    validate_incremental_sampled(incremental_result, new_source, usize::MAX)
}

pub fn validate_incremental_sampled(
    incremental_result: &TokenizeResult,
    new_source: &str,
    sample_count: usize,
) -> Result<ValidationResult, Diagnostic> {
    let full = scan_strict_with_options(new_source, ScannerOptions::default())?;
    let token_count_match = full.len() == incremental_result.tokens.len();
    let n = incremental_result.tokens.len().min(full.len()).min(sample_count);

    let mut type_mismatches = 0;
    let mut position_mismatches = 0;
    for i in 0..n {
        if full[i].kind != incremental_result.tokens[i].kind {
            type_mismatches += 1;
        }
        if full[i].range.start != incremental_result.tokens[i].range.start {
            position_mismatches += 1;
        }
    }

    Ok(ValidationResult {
        is_valid: token_count_match && type_mismatches == 0 && position_mismatches == 0,
        token_count_match,
        type_mismatches,
        position_mismatches,
        sampled_count: n,
    })
}

fn apply_edit(chars: &[char], edit: &Edit) -> Vec<char> {
    let mut out = Vec::with_capacity(chars.len() + edit.replacement_text.len());
    out.extend_from_slice(&chars[..edit.range.start.min(chars.len())]);
    out.extend(edit.replacement_text.chars());
    out.extend_from_slice(&chars[edit.range.end.min(chars.len())..]);
    out
}

fn position_at(chars: &[char], offset: usize) -> SourcePosition {
    let mut tracker = PositionTracker::new();
    for &c in &chars[..offset.min(chars.len())] {
        tracker.advance(c);
    }
    tracker.position()
}

fn line_start_offset(chars: &[char], offset: usize) -> usize {
    let mut i = offset.min(chars.len());
    while i > 0 && chars[i - 1] != '\n' {
        i -= 1;
    }
    i
}

fn line_end_offset(chars: &[char], offset: usize) -> usize {
    let mut i = offset.min(chars.len());
    while i < chars.len() && chars[i] != '\n' {
        i += 1;
    }
    if i < chars.len() {
        i + 1
    } else {
        i
    }
}

fn translate(pos: SourcePosition, base: SourcePosition) -> SourcePosition {
    if pos.line == 1 {
        SourcePosition::new(base.line, base.column + pos.column - 1, base.offset + pos.offset)
    } else {
        SourcePosition::new(base.line + pos.line - 1, pos.column, base.offset + pos.offset)
    }
}

fn shift(pos: SourcePosition, delta_lines: isize, delta_offset: isize) -> SourcePosition {
    SourcePosition::new(
        (pos.line as isize + delta_lines).max(1) as u32,
        pos.column,
        (pos.offset as isize + delta_offset).max(0) as usize,
    )
}

fn count_newlines(text: &str) -> usize {
    text.chars().filter(|&c| c == '\n').count()
}

fn count_newlines_in_range(chars: &[char], range: std::ops::Range<usize>) -> usize {
    chars[range.start.min(chars.len())..range.end.min(chars.len())]
        .iter()
        .filter(|&&c| c == '\n')
        .count()
}
