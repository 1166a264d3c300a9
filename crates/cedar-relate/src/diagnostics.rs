//! Diagnostic collection for the relation core.
//!
//! Kinds live in `cedar-common`; this module binds them to deferred sites
//! (symbol handles, never source locations - the caller attaches those) and
//! provides the sink abstraction resolution threads through every call.
//! Collection is an explicit output parameter, never shared mutable state:
//! concurrent resolutions each write their own bag and the cache replays a
//! record's stored diagnostics into the caller's sink.

use cedar_common::{DiagnosticKind, DiagnosticSeverity};
use cedar_symbols::{MemberId, TypeId, TypeParamId};

/// Where a diagnostic applies. Location attachment is the caller's job.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DiagSite {
    TypeParam(TypeParamId),
    Member(MemberId),
    Type(TypeId),
}

/// A structured, location-free diagnostic.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub site: DiagSite,
}

impl Diagnostic {
    pub fn severity(self) -> DiagnosticSeverity {
        self.kind.severity()
    }
}

/// Opaque sink accepting `(kind, site)` pairs.
pub trait DiagnosticSink {
    fn add(&mut self, kind: DiagnosticKind, site: DiagSite);

    fn extend(&mut self, diagnostics: &[Diagnostic]) {
        for d in diagnostics {
            self.add(d.kind, d.site);
        }
    }
}

/// Vec-backed sink.
#[derive(Clone, Debug, Default)]
pub struct DiagnosticBag {
    diagnostics: Vec<Diagnostic>,
}

impl DiagnosticBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter()
    }

    pub fn has(&self, kind: DiagnosticKind) -> bool {
        self.diagnostics.iter().any(|d| d.kind == kind)
    }

    /// Count of error-severity diagnostics.
    pub fn error_count(&self) -> usize {
        self.diagnostics
            .iter()
            .filter(|d| d.severity() == DiagnosticSeverity::Error)
            .count()
    }

    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.diagnostics
    }
}

impl DiagnosticSink for DiagnosticBag {
    fn add(&mut self, kind: DiagnosticKind, site: DiagSite) {
        self.diagnostics.push(Diagnostic { kind, site });
    }
}
