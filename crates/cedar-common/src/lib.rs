//! Common types and utilities for the cedar compiler front end.
//!
//! This crate provides foundational types used across all cedar crates:
//! - String interning (`Atom`, `Interner`)
//! - Structured diagnostic kinds (`DiagnosticKind`) - location-free; sites
//!   are attached where the symbol graph is in scope
//! - Language-level configuration (`LanguageLevel`)

// String interning for identifier deduplication
pub mod interner;
pub use interner::{Atom, Interner};

// Structured diagnostic kinds - no message formatting, no source locations
pub mod diagnostics;
pub use diagnostics::{DiagnosticKind, DiagnosticSeverity, MismatchKind};

// Language-level gates threaded through relation checks
pub mod language;
pub use language::LanguageLevel;
