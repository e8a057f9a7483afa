//! kotoba-lex — the lexical analysis engine for the kotoba pseudocode
//! language.
//!
//! Four pieces form the core, built in dependency order:
//!
//! 1. [`normalize`] — Unicode normalization and line-ending canonicalization
//!    that every other stage assumes has already run.
//! 2. [`scanner`] — the single [`scanner::Scanner`] engine, parameterized by
//!    [`scanner::ErrorMode`] rather than split into strict/recovering
//!    siblings.
//! 3. [`strict`] and [`recovering`] — the two public scanning surfaces built
//!    on the scanner: fail-fast ([`scan_strict`]) and best-effort
//!    ([`scan_recovering`]).
//! 4. [`incremental`] — re-lexing a small edit without rescanning the whole
//!    document.
//!
//! [`stream`] and [`parallel`] are collaborators built on top of the core,
//! not part of it: a pull-based [`stream::TokenStream`] adapter and an
//! optional line-boundary chunked parallel tokenizer.

mod classify;
mod cursor;
mod incremental;
mod keyword;
mod normalize;
mod operator;
mod parallel;
mod recovering;
mod scanner;
mod stream;
mod strict;
mod token;

pub use incremental::{relex_incremental, relex_incremental_with_options, validate_incremental, validate_incremental_sampled, Edit, IncrementalMetrics, TokenizeResult, ValidationResult};
pub use normalize::{normalize, NormalizationForm, NormalizationStats, SecurityConfig};
pub use parallel::{tokenize_parallel, tokenize_parallel_with_options};
pub use recovering::{scan_recovering, scan_recovering_with_options, TokenizerResult};
pub use scanner::{ErrorMode, Scanner, ScannerOptions};
pub use stream::TokenStream;
pub use strict::{scan_strict, scan_strict_via_collecting, scan_strict_with_options, ScanError};
pub use token::{Literal, Token, TokenKind};

pub use kotoba_util::{Diagnostic, DiagnosticKind, Severity, SourcePosition, SourceRange};
