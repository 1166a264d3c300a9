//! Type-relation core for the cedar compiler front end.
//!
//! Operates on the read-only symbol graph from `cedar-symbols` and answers
//! the three questions binding and emit ask about generics:
//!
//! - **Bounds**: what are the effective base class, deduced base type,
//!   constraint types, and interface set of a type parameter?
//!   ([`resolve_bounds`])
//! - **Constraints**: does a type argument satisfy its parameter's
//!   declared constraints? ([`check_constraints`])
//! - **Implementation**: which member of a type implements a given
//!   interface member? ([`find_implementation`])
//!
//! All three are pure functions of the graph; results are memoized in a
//! [`ResolutionCache`] with publish-once semantics so concurrent callers
//! observe one answer. Nothing here is fatal: every operation returns a
//! best-effort result and reports problems through a [`DiagnosticSink`],
//! so compilation continues past each one.

// Identity and encompassment relations with comparison modes
pub mod relate;
pub use relate::{is_encompassed_by, is_identical, TypeCompareKind};

// Effective-bounds resolution for type parameters
pub mod bounds;
pub use bounds::{
    deduced_base_type, effective_base_class, effective_interface_set, resolve_bounds, InProgress,
    TypeParamBounds,
};

// Constraint checking for constructed generics
pub mod constraints;
pub use constraints::{check_constraints, CheckContext};

// Interface-member implementation mapping
pub mod implement;
pub use implement::find_implementation;

// Publish-once memoization
pub mod cache;
pub use cache::{
    BoundsRecord, ImplementationRecord, InterfaceMember, InterfaceMemberKey, ResolutionCache,
};

// Structured diagnostics with deferred sites
pub mod diagnostics;
pub use diagnostics::{DiagSite, Diagnostic, DiagnosticBag, DiagnosticSink};

// Depth- and cycle-guarded recursion
pub mod recursion;
pub use recursion::{RecursionGuard, RecursionProfile, RecursionResult};
