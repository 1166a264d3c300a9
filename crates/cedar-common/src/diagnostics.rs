//! Diagnostic kinds for constraint and interface-mapping resolution.
//!
//! Diagnostics in this core are structured data, never formatted strings:
//! resolution reports a [`DiagnosticKind`] against a deferred site (a type
//! parameter or member handle), and the caller attaches source locations and
//! message text. This keeps relation checks cheap in tentative contexts such
//! as overload resolution, where most diagnostics are discarded.
//!
//! Three classes of kinds exist, all recoverable:
//! - structural conflicts in declared constraints
//! - argument-constraint violations at construction sites
//! - interface-mapping ambiguities and near misses

/// How an implicit implementation candidate failed to match an interface
/// member it was named after.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MismatchKind {
    /// Candidate is static where the interface member is not, or vice versa.
    Static,
    /// Candidate is not accessible enough to implement the member.
    Accessibility,
    /// Candidate's return type differs from the interface member's.
    ReturnType,
    /// Candidate setter is `init`-only where the interface setter is not,
    /// or vice versa.
    InitOnly,
    /// Candidate returns by value where the interface member returns by
    /// reference, or the readonly-ness of the reference differs.
    RefKind,
}

/// Structured diagnostic kinds produced by bounds resolution, constraint
/// checking, and interface-implementation mapping.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    // ----- Structural conflicts in declared constraints -----
    /// A type parameter's constraints depend on themselves
    /// (`T where T : C<T>` through another parameter of the same declaration).
    CircularConstraint,
    /// Two constraint types imply unrelated base classes.
    ConflictingBaseConstraints,
    /// A reference-type constraint meets a value-type or unmanaged
    /// constraint folded in from another type parameter.
    ConflictingConstraints,
    /// Bounds inherited by an overriding method parameter simultaneously
    /// require a reference type and a value type, or combine a
    /// nullable-value deduced base with an explicit reference/value flag.
    ConflictingInheritedConstraints,

    // ----- Argument-constraint violations at construction sites -----
    /// Pointer, function-pointer, restricted, or `void` type argument.
    BadTypeArgument,
    /// A static class used as a type argument.
    GenericArgIsStaticClass,
    /// Argument is not a reference type but the parameter requires one.
    RefConstraintNotSatisfied,
    /// Argument is not a non-nullable value type but the parameter
    /// requires one.
    ValConstraintNotSatisfied,
    /// Argument's transitive fields contain a reference type, or need a
    /// language level that is not active.
    UnmanagedConstraintNotSatisfied,
    /// A reference-type argument fails a constraint type.
    ConstraintNotSatisfiedRefType,
    /// A value-type argument fails a constraint type.
    ConstraintNotSatisfiedValType,
    /// A type-parameter argument fails a constraint type.
    ConstraintNotSatisfiedTyVar,
    /// A nullable-value argument fails an interface constraint.
    ConstraintNotSatisfiedNullableInterface,
    /// A nullable-value argument fails the enum-root constraint.
    ConstraintNotSatisfiedNullableEnum,
    /// Argument nullability may violate a not-null constraint. Warning.
    NotNullConstraintMayBeViolated,
    /// Constructor-constrained parameter received an abstract class or a
    /// class without an accessible parameterless constructor.
    NoParameterlessConstructorOrAbstract,
    /// Constructor-constrained parameter received a class whose required
    /// members are not satisfied by its parameterless constructor.
    NewConstraintWithRequiredMembers,
    /// An interface argument declares or inherits a static abstract member
    /// with no default body.
    StaticAbstractMemberNotSatisfied,

    // ----- Interface-mapping ambiguities -----
    /// More than one member of the same type explicitly implements the
    /// same interface member.
    DuplicateExplicitImpl,
    /// Several unrelated interfaces supply default bodies and none is more
    /// specific than all others.
    MostSpecificImplementationNotFound,
    /// A member matched an interface member by name but could not
    /// implement it for the recorded reason.
    ImplementationMismatch(MismatchKind),
}

/// Diagnostic severity, derived from the kind.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DiagnosticSeverity {
    Error,
    Warning,
}

impl DiagnosticKind {
    /// Severity of this kind. Everything is an error except the advisory
    /// not-null nullability check.
    pub fn severity(self) -> DiagnosticSeverity {
        match self {
            Self::NotNullConstraintMayBeViolated => DiagnosticSeverity::Warning,
            _ => DiagnosticSeverity::Error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_null_is_advisory() {
        assert_eq!(
            DiagnosticKind::NotNullConstraintMayBeViolated.severity(),
            DiagnosticSeverity::Warning
        );
        assert_eq!(
            DiagnosticKind::CircularConstraint.severity(),
            DiagnosticSeverity::Error
        );
    }
}
