//! Constraint checking for constructed generic types and methods.
//!
//! `check_constraints` validates one type argument per type parameter
//! against the parameter's declared flags and resolved bounds. Checks for
//! all parameters run independently and every diagnostic is collected, so
//! a caller sees every problem in one pass rather than the first one.
//!
//! The unmanaged constraint requires a recursive scan over the argument's
//! transitive instance fields; that scan is bounded by a
//! [`RecursionGuard`] so malformed cyclic layouts terminate.

use crate::bounds::resolve_bounds;
use crate::cache::ResolutionCache;
use crate::diagnostics::{DiagSite, DiagnosticSink};
use crate::recursion::{RecursionGuard, RecursionProfile, RecursionResult};
use crate::relate::{is_encompassed_by, is_identical, TypeCompareKind};
use cedar_common::{DiagnosticKind, LanguageLevel};
use cedar_symbols::{
    ConstraintFlags, MemberKind, Substitution, SymbolStore, TypeFlags, TypeId, TypeKind,
    TypeParamId,
};
use rustc_hash::FxHashSet;
use tracing::trace;

/// Caller-supplied context for one constraint-check invocation.
#[derive(Clone, Copy, Default)]
pub struct CheckContext<'a> {
    pub language: LanguageLevel,
    /// Constraint types whose original form mentions one of these
    /// parameters are skipped. Used by callers that re-check a partially
    /// inferred construction.
    pub ignore_params: Option<&'a FxHashSet<TypeParamId>>,
}

/// Check `args` against the constraints of `params`, pairwise.
///
/// Returns true only when every pair passes; diagnostics for every failing
/// pair are still collected (no short-circuit).
pub fn check_constraints(
    store: &SymbolStore,
    cache: &ResolutionCache,
    params: &[TypeParamId],
    args: &[TypeId],
    ctx: CheckContext<'_>,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    debug_assert_eq!(params.len(), args.len());
    let substitution = Substitution::from_pairs(params, args);
    let mut satisfied = true;
    for (&param, &arg) in params.iter().zip(args) {
        satisfied &= check_one(store, cache, param, arg, &substitution, ctx, sink);
    }
    satisfied
}

fn check_one(
    store: &SymbolStore,
    cache: &ResolutionCache,
    param: TypeParamId,
    arg: TypeId,
    substitution: &Substitution,
    ctx: CheckContext<'_>,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    let wk = store.well_known();
    let arg_node = store.ty(arg);
    let param_site = DiagSite::TypeParam(param);
    let arg_site = DiagSite::Type(arg);
    trace!(?param, ?arg, "checking constraints");

    // Arguments that can never instantiate a generic.
    match arg_node.kind {
        TypeKind::Pointer | TypeKind::FunctionPointer => {
            sink.add(DiagnosticKind::BadTypeArgument, arg_site);
            return false;
        }
        _ if arg == wk.void_type => {
            sink.add(DiagnosticKind::BadTypeArgument, arg_site);
            return false;
        }
        // Error arguments pass silently; the error was reported where the
        // type came from.
        TypeKind::Error => return true,
        _ => {}
    }
    if arg_node.flags.contains(TypeFlags::STATIC) {
        sink.add(DiagnosticKind::GenericArgIsStaticClass, arg_site);
        return false;
    }

    let flags = store.param(param).flags;
    let mut satisfied = true;

    if flags.contains(ConstraintFlags::REFERENCE_TYPE) && !arg_is_reference(store, cache, arg, sink)
    {
        sink.add(DiagnosticKind::RefConstraintNotSatisfied, param_site);
        satisfied = false;
    }

    // Nullability is advisory only.
    if flags.contains(ConstraintFlags::NOT_NULL)
        && (arg_node.kind == TypeKind::Nullable
            || arg_node.annotation == cedar_symbols::NullableAnnotation::Annotated)
    {
        sink.add(DiagnosticKind::NotNullConstraintMayBeViolated, param_site);
    }

    if flags.contains(ConstraintFlags::UNMANAGED) {
        let mut guard = RecursionGuard::with_profile(RecursionProfile::FieldScan);
        match managed_kind(store, arg, &mut guard) {
            ManagedKind::Unmanaged => {}
            ManagedKind::UnmanagedWithGenerics
                if ctx.language.supports_unmanaged_constructed_types() => {}
            _ => {
                sink.add(DiagnosticKind::UnmanagedConstraintNotSatisfied, param_site);
                satisfied = false;
            }
        }
    }

    if flags.contains(ConstraintFlags::VALUE_TYPE) && !arg_is_value(store, cache, arg, sink) {
        sink.add(DiagnosticKind::ValConstraintNotSatisfied, param_site);
        satisfied = false;
    }

    satisfied &= check_constraint_types(store, cache, param, arg, substitution, ctx, sink);

    if flags.contains(ConstraintFlags::CONSTRUCTOR) {
        satisfied &= check_constructor(store, param, arg, sink);
    }

    // An interface argument may not hide an unimplemented static abstract
    // contract.
    if arg_node.kind == TypeKind::Interface && has_unsatisfied_static_abstract(store, arg) {
        sink.add(DiagnosticKind::StaticAbstractMemberNotSatisfied, arg_site);
        satisfied = false;
    }

    satisfied
}

fn arg_is_reference(
    store: &SymbolStore,
    cache: &ResolutionCache,
    arg: TypeId,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    let node = store.ty(arg);
    match node.kind {
        TypeKind::TypeParameter => {
            let param = node.param.expect("type-parameter node backs a param");
            if store
                .param(param)
                .flags
                .contains(ConstraintFlags::REFERENCE_TYPE)
            {
                return true;
            }
            // A proper class base (anything below the shared roots) forces
            // every satisfying argument to be a reference type.
            let deduced = crate::bounds::deduced_base_type(store, cache, param, sink);
            let wk = store.well_known();
            store.kind(deduced).is_reference()
                && deduced != wk.object
                && deduced != wk.value_root
                && deduced != wk.enum_root
        }
        kind => kind.is_reference(),
    }
}

fn arg_is_value(
    store: &SymbolStore,
    cache: &ResolutionCache,
    arg: TypeId,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    let node = store.ty(arg);
    match node.kind {
        // The nullable wrapper is a value type but never a *non-nullable*
        // one, which is what the value constraint demands.
        TypeKind::Struct | TypeKind::Enum => true,
        TypeKind::TypeParameter => {
            let param = node.param.expect("type-parameter node backs a param");
            if store
                .param(param)
                .flags
                .intersects(ConstraintFlags::VALUE_TYPE | ConstraintFlags::UNMANAGED)
            {
                return true;
            }
            let deduced = crate::bounds::deduced_base_type(store, cache, param, sink);
            let wk = store.well_known();
            deduced == wk.value_root
                || deduced == wk.enum_root
                || store.kind(deduced).is_value() && store.kind(deduced) != TypeKind::Nullable
        }
        _ => false,
    }
}

/// Managed-ness of a type for the unmanaged constraint, worst case last.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord)]
enum ManagedKind {
    Unmanaged,
    /// Unmanaged only because an unmanaged-constrained type parameter
    /// stands in for a field type; acceptance is language-gated.
    UnmanagedWithGenerics,
    Managed,
}

fn managed_kind(
    store: &SymbolStore,
    ty: TypeId,
    guard: &mut RecursionGuard<TypeId>,
) -> ManagedKind {
    let node = store.ty(ty);
    match node.kind {
        TypeKind::Enum | TypeKind::Pointer | TypeKind::FunctionPointer => ManagedKind::Unmanaged,
        TypeKind::Class
        | TypeKind::Interface
        | TypeKind::Delegate
        | TypeKind::Array
        | TypeKind::Dynamic => ManagedKind::Managed,
        TypeKind::Error => ManagedKind::Unmanaged,
        TypeKind::TypeParameter => {
            let param = node.param.expect("type-parameter node backs a param");
            if store.param(param).flags.contains(ConstraintFlags::UNMANAGED) {
                ManagedKind::UnmanagedWithGenerics
            } else {
                ManagedKind::Managed
            }
        }
        TypeKind::Nullable => match node.element {
            Some(underlying) => managed_kind(store, underlying, guard),
            None => ManagedKind::Managed,
        },
        TypeKind::Struct => {
            match guard.enter(ty) {
                RecursionResult::Entered => {}
                // A layout cycle or runaway depth cannot introduce a
                // managed field we have not already seen.
                RecursionResult::Cycle | RecursionResult::DepthExceeded => {
                    return ManagedKind::Unmanaged;
                }
            }
            let mut worst = ManagedKind::Unmanaged;
            for member in store.members_of(ty) {
                let m = store.member(member);
                if m.kind != MemberKind::Field || m.is_static() {
                    continue;
                }
                let field_type = store.member_return_type(member, ty);
                worst = worst.max(managed_kind(store, field_type, guard));
                if worst == ManagedKind::Managed {
                    break;
                }
            }
            guard.leave(ty);
            worst
        }
    }
}

fn check_constraint_types(
    store: &SymbolStore,
    cache: &ResolutionCache,
    param: TypeParamId,
    arg: TypeId,
    substitution: &Substitution,
    ctx: CheckContext<'_>,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    let Some(bounds) = resolve_bounds(store, cache, param, false, sink) else {
        return true;
    };
    let wk = store.well_known();
    let param_site = DiagSite::TypeParam(param);
    let mut checked: Vec<TypeId> = Vec::new();
    let mut satisfied = true;

    for &declared in &bounds.constraint_types {
        if let Some(ignore) = ctx.ignore_params {
            if type_references_param(store, declared, ignore) {
                continue;
            }
        }
        let constraint = substitution.apply(store, declared);
        if store.kind(constraint) == TypeKind::Error || checked.contains(&constraint) {
            continue;
        }
        checked.push(constraint);
        if satisfies_constraint_type(store, cache, arg, constraint, sink) {
            continue;
        }
        // The diagnostic names the argument's own kind, not the
        // parameter's.
        let kind = match store.kind(arg) {
            TypeKind::Nullable => {
                if store.kind(constraint) == TypeKind::Interface {
                    DiagnosticKind::ConstraintNotSatisfiedNullableInterface
                } else if constraint == wk.enum_root {
                    DiagnosticKind::ConstraintNotSatisfiedNullableEnum
                } else {
                    DiagnosticKind::ConstraintNotSatisfiedValType
                }
            }
            TypeKind::TypeParameter => DiagnosticKind::ConstraintNotSatisfiedTyVar,
            k if k.is_value() => DiagnosticKind::ConstraintNotSatisfiedValType,
            _ => DiagnosticKind::ConstraintNotSatisfiedRefType,
        };
        sink.add(kind, param_site);
        satisfied = false;
    }
    satisfied
}

/// Does `arg` satisfy `constraint` via identity, reference conversion,
/// boxing, or (for type-parameter arguments) its own transitive bounds?
fn satisfies_constraint_type(
    store: &SymbolStore,
    cache: &ResolutionCache,
    arg: TypeId,
    constraint: TypeId,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    if is_identical(store, arg, constraint, TypeCompareKind::CLR_SIGNATURE) {
        return true;
    }
    match store.kind(arg) {
        TypeKind::TypeParameter => {
            let param = store.ty(arg).param.expect("type-parameter node backs a param");
            let mut guard = RecursionGuard::with_profile(RecursionProfile::ConstraintSatisfaction);
            type_param_satisfies(store, cache, param, constraint, &mut guard, sink)
        }
        // The nullable wrapper boxes to a null reference, so only identity
        // counts.
        TypeKind::Nullable => false,
        TypeKind::Pointer | TypeKind::FunctionPointer => false,
        _ => is_encompassed_by(store, arg, constraint),
    }
}

fn type_param_satisfies(
    store: &SymbolStore,
    cache: &ResolutionCache,
    param: TypeParamId,
    constraint: TypeId,
    guard: &mut RecursionGuard<TypeParamId>,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    if !guard.enter(param).is_entered() {
        return false;
    }
    let wk = store.well_known();
    let (effective_base, candidates) = match resolve_bounds(store, cache, param, false, sink) {
        Some(bounds) => {
            let mut cs: Vec<TypeId> = bounds.interfaces.clone();
            for &c in &bounds.constraint_types {
                if !cs.contains(&c) {
                    cs.push(c);
                }
            }
            (bounds.effective_base, cs)
        }
        None => (wk.object, Vec::new()),
    };
    let mut satisfied = candidate_satisfies(store, constraint, effective_base);
    if !satisfied {
        for candidate in candidates {
            satisfied = match store.kind(candidate) {
                TypeKind::TypeParameter => {
                    let p = store
                        .ty(candidate)
                        .param
                        .expect("type-parameter node backs a param");
                    type_param_satisfies(store, cache, p, constraint, guard, sink)
                }
                _ => candidate_satisfies(store, constraint, candidate),
            };
            if satisfied {
                break;
            }
        }
    }
    guard.leave(param);
    satisfied
}

fn candidate_satisfies(store: &SymbolStore, constraint: TypeId, candidate: TypeId) -> bool {
    is_identical(store, candidate, constraint, TypeCompareKind::CLR_SIGNATURE)
        || is_encompassed_by(store, candidate, constraint)
}

/// Does `ty` mention any parameter in `ignore` anywhere in its structure?
fn type_references_param(store: &SymbolStore, ty: TypeId, ignore: &FxHashSet<TypeParamId>) -> bool {
    let node = store.ty(ty);
    if node.kind == TypeKind::TypeParameter {
        return node.param.is_some_and(|p| ignore.contains(&p));
    }
    if let Some(element) = node.element {
        if type_references_param(store, element, ignore) {
            return true;
        }
    }
    node.type_args
        .iter()
        .any(|&a| type_references_param(store, a, ignore))
}

fn check_constructor(
    store: &SymbolStore,
    param: TypeParamId,
    arg: TypeId,
    sink: &mut dyn DiagnosticSink,
) -> bool {
    let site = DiagSite::TypeParam(param);
    let node = store.ty(arg);
    match node.kind {
        // Value types are implicitly default-constructible.
        TypeKind::Struct | TypeKind::Enum | TypeKind::Nullable => true,
        TypeKind::TypeParameter => {
            let p = node.param.expect("type-parameter node backs a param");
            let flags = store.param(p).flags;
            if flags.intersects(
                ConstraintFlags::CONSTRUCTOR
                    | ConstraintFlags::VALUE_TYPE
                    | ConstraintFlags::UNMANAGED,
            ) {
                true
            } else {
                sink.add(DiagnosticKind::NoParameterlessConstructorOrAbstract, site);
                false
            }
        }
        TypeKind::Class => {
            if node.flags.contains(TypeFlags::ABSTRACT)
                || !node.flags.contains(TypeFlags::HAS_PARAMETERLESS_CTOR)
            {
                sink.add(DiagnosticKind::NoParameterlessConstructorOrAbstract, site);
                false
            } else if node.flags.contains(TypeFlags::HAS_REQUIRED_MEMBERS)
                && !node.flags.contains(TypeFlags::CTOR_SATISFIES_REQUIRED)
            {
                sink.add(DiagnosticKind::NewConstraintWithRequiredMembers, site);
                false
            } else {
                true
            }
        }
        TypeKind::Interface
        | TypeKind::Delegate
        | TypeKind::Array
        | TypeKind::Dynamic => {
            sink.add(DiagnosticKind::NoParameterlessConstructorOrAbstract, site);
            false
        }
        // Rejected before constraint checks run.
        TypeKind::Pointer | TypeKind::FunctionPointer | TypeKind::Error => true,
    }
}

/// Does `iface` declare or inherit a static abstract member without a
/// default body?
fn has_unsatisfied_static_abstract(store: &SymbolStore, iface: TypeId) -> bool {
    let mut levels = vec![iface];
    levels.extend(store.declared_interface_closure(iface));
    for level in levels {
        for member in store.members_of(level) {
            let m = store.member(member);
            if m.is_static() && m.is_abstract() && !m.has_body() {
                return true;
            }
        }
    }
    false
}
