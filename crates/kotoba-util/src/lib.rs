//! kotoba-util - foundation types shared by the kotoba lexical toolchain.
//!
//! This crate carries the parts of the toolchain that have nothing to do
//! with scanning a particular language: interned strings ([`symbol`]),
//! scalar-based source positions ([`position`]), and the diagnostic model
//! ([`diagnostic`]) that both the strict and recovering scanners in
//! `kotoba-lex` build on.
//!
//! Nothing here is specific to the pseudocode language `kotoba-lex`
//! tokenizes; a parser, a formatter, or a second front-end for a different
//! grammar could depend on this crate unchanged.

pub mod diagnostic;
pub mod position;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, DiagnosticCollector, DiagnosticKind, Severity, Suggestion};
pub use position::{PositionTracker, SourcePosition, SourceRange};
pub use symbol::Symbol;
