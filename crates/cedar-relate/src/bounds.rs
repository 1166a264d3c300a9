//! Effective-bounds resolution for type parameters.
//!
//! A type parameter's declared constraints are folded into its effective
//! base class, deduced base type, validated constraint-type list, and
//! interface set. Constraints may reference other type parameters of the
//! same declaration, including cyclically; an immutable cons-list of
//! in-progress parameters detects those cycles and turns them into
//! `CircularConstraint` diagnostics instead of unbounded recursion.
//!
//! Every conflict is recoverable: resolution always produces some bounds
//! (falling back to the previously accepted candidate) so downstream
//! compilation proceeds with best-effort bounds plus diagnostics.

use crate::cache::{BoundsRecord, ResolutionCache};
use crate::diagnostics::{DiagSite, DiagnosticBag, DiagnosticSink};
use crate::relate::is_encompassed_by;
use cedar_common::DiagnosticKind;
use cedar_symbols::{ConstraintFlags, SymbolStore, TypeId, TypeKind, TypeParamId};
use std::sync::Arc;
use tracing::trace;

/// Resolved bounds of a type parameter.
///
/// Invariant: the deduced base type is encompassed by the effective base
/// class. Trivial bounds (object base, nothing else) are represented as the
/// absence of this value, never as a partially populated one.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TypeParamBounds {
    /// Most specific non-interface type every satisfying argument is
    /// assignable to. Never a type parameter.
    pub effective_base: TypeId,
    /// Like the effective base, but preserves a nullable-value wrapper
    /// when the constraint set implies one.
    pub deduced_base: TypeId,
    /// Validated, deduplicated declared constraint types.
    pub constraint_types: Vec<TypeId>,
    /// Deduplicated interface set.
    pub interfaces: Vec<TypeId>,
}

/// Immutable cons-list of type parameters currently being resolved.
///
/// Recursion depth is statically bounded by the number of type parameters
/// in scope, so resolution can never deadlock or overflow through
/// self-referential constraints.
#[derive(Copy, Clone)]
pub struct InProgress<'a>(Option<&'a Link<'a>>);

struct Link<'a> {
    param: TypeParamId,
    rest: InProgress<'a>,
}

impl<'a> InProgress<'a> {
    pub const EMPTY: InProgress<'static> = InProgress(None);

    pub fn contains(self, param: TypeParamId) -> bool {
        let mut current = self.0;
        while let Some(link) = current {
            if link.param == param {
                return true;
            }
            current = link.rest.0;
        }
        false
    }
}

/// Resolve the bounds of `param`, memoized.
///
/// Returns `None` for trivial bounds: callers treat that as "object base,
/// no interfaces, no constraint types". Diagnostics recorded during the
/// first computation are replayed on every subsequent query.
pub fn resolve_bounds(
    store: &SymbolStore,
    cache: &ResolutionCache,
    param: TypeParamId,
    inherited: bool,
    sink: &mut dyn DiagnosticSink,
) -> Option<Arc<TypeParamBounds>> {
    resolve_bounds_guarded(store, cache, param, InProgress::EMPTY, inherited, sink)
}

fn resolve_bounds_guarded(
    store: &SymbolStore,
    cache: &ResolutionCache,
    param: TypeParamId,
    in_progress: InProgress<'_>,
    inherited: bool,
    sink: &mut dyn DiagnosticSink,
) -> Option<Arc<TypeParamBounds>> {
    if let Some(record) = cache.bounds_get(param) {
        sink.extend(&record.diagnostics);
        return record.bounds.clone();
    }

    let link = Link {
        param,
        rest: in_progress,
    };
    let in_progress = InProgress(Some(&link));

    let mut bag = DiagnosticBag::new();
    let bounds = compute_bounds(store, cache, param, in_progress, inherited, &mut bag);
    let winner = cache.bounds_publish(
        param,
        BoundsRecord {
            bounds,
            diagnostics: bag.into_vec(),
        },
    );
    sink.extend(&winner.diagnostics);
    winner.bounds.clone()
}

fn compute_bounds(
    store: &SymbolStore,
    cache: &ResolutionCache,
    param: TypeParamId,
    in_progress: InProgress<'_>,
    inherited: bool,
    bag: &mut DiagnosticBag,
) -> Option<Arc<TypeParamBounds>> {
    let p = store.param(param);
    let wk = store.well_known();
    let site = DiagSite::TypeParam(param);
    trace!(?param, "resolving bounds");

    let value_constrained = p
        .flags
        .intersects(ConstraintFlags::VALUE_TYPE | ConstraintFlags::UNMANAGED);
    let mut effective_base = if value_constrained { wk.value_root } else { wk.object };
    let mut deduced_base = effective_base;
    let mut constraint_types: Vec<TypeId> = Vec::new();
    let mut interfaces: Vec<TypeId> = Vec::new();

    for &constraint in &p.constraint_types {
        match store.kind(constraint) {
            TypeKind::TypeParameter => {
                let other = store
                    .ty(constraint)
                    .param
                    .expect("type-parameter node backs a param");
                let other_node = store.param(other);
                if other_node.owner == p.owner && in_progress.contains(other) {
                    bag.add(DiagnosticKind::CircularConstraint, site);
                    continue;
                }
                push_unique(&mut constraint_types, constraint);
                if p.flags.contains(ConstraintFlags::REFERENCE_TYPE)
                    && other_node
                        .flags
                        .intersects(ConstraintFlags::VALUE_TYPE | ConstraintFlags::UNMANAGED)
                {
                    bag.add(DiagnosticKind::ConflictingConstraints, site);
                }
                // Fresh guard list when crossing into another declaration:
                // its parameters cannot participate in this cycle.
                let nested = if other_node.owner == p.owner {
                    resolve_bounds_guarded(store, cache, other, in_progress, false, bag)
                } else {
                    resolve_bounds_guarded(store, cache, other, InProgress::EMPTY, false, bag)
                };
                if let Some(folded) = nested {
                    for &iface in &folded.interfaces {
                        push_unique(&mut interfaces, iface);
                    }
                    merge_base_candidate(
                        store,
                        bag,
                        site,
                        &mut effective_base,
                        &mut deduced_base,
                        folded.effective_base,
                        folded.deduced_base,
                    );
                }
            }
            TypeKind::Interface => {
                push_unique(&mut constraint_types, constraint);
                push_unique(&mut interfaces, constraint);
            }
            TypeKind::Class | TypeKind::Delegate => {
                push_unique(&mut constraint_types, constraint);
                merge_base_candidate(
                    store,
                    bag,
                    site,
                    &mut effective_base,
                    &mut deduced_base,
                    constraint,
                    constraint,
                );
            }
            TypeKind::Struct => {
                push_unique(&mut constraint_types, constraint);
                merge_base_candidate(
                    store,
                    bag,
                    site,
                    &mut effective_base,
                    &mut deduced_base,
                    wk.value_root,
                    wk.value_root,
                );
            }
            TypeKind::Enum => {
                push_unique(&mut constraint_types, constraint);
                merge_base_candidate(
                    store,
                    bag,
                    site,
                    &mut effective_base,
                    &mut deduced_base,
                    wk.enum_root,
                    wk.enum_root,
                );
            }
            TypeKind::Array => {
                push_unique(&mut constraint_types, constraint);
                merge_base_candidate(
                    store,
                    bag,
                    site,
                    &mut effective_base,
                    &mut deduced_base,
                    wk.array_root,
                    wk.array_root,
                );
            }
            TypeKind::Nullable => {
                // A nullable-struct constraint cycle-checks its underlying
                // type parameter before it is folded.
                if let Some(underlying) = store.ty(constraint).element {
                    if store.kind(underlying) == TypeKind::TypeParameter {
                        let up = store
                            .ty(underlying)
                            .param
                            .expect("type-parameter node backs a param");
                        if store.param(up).owner == p.owner && in_progress.contains(up) {
                            bag.add(DiagnosticKind::CircularConstraint, site);
                            continue;
                        }
                    }
                }
                push_unique(&mut constraint_types, constraint);
                // The deduced base keeps the wrapper; the effective base
                // does not.
                merge_base_candidate(
                    store,
                    bag,
                    site,
                    &mut effective_base,
                    &mut deduced_base,
                    wk.value_root,
                    constraint,
                );
            }
            // Error constraints pass through unchanged.
            TypeKind::Error => push_unique(&mut constraint_types, constraint),
            // Pointer-like constraints were diagnosed where they were
            // declared; dropped here.
            TypeKind::Pointer | TypeKind::FunctionPointer | TypeKind::Dynamic => {}
        }
    }

    // Trivial bounds are represented as absence.
    if constraint_types.is_empty()
        && interfaces.is_empty()
        && effective_base == wk.object
        && deduced_base == wk.object
    {
        return None;
    }

    if inherited {
        validate_inherited(store, &p.flags, deduced_base, bag, site);
    }

    debug_assert!(
        is_encompassed_by(store, deduced_base, effective_base),
        "deduced base must be encompassed by the effective base"
    );

    Some(Arc::new(TypeParamBounds {
        effective_base,
        deduced_base,
        constraint_types,
        interfaces,
    }))
}

fn push_unique(list: &mut Vec<TypeId>, ty: TypeId) {
    if !list.contains(&ty) {
        list.push(ty);
    }
}

/// Merge a classified base-type candidate into the running pair.
///
/// The more encompassed (more specific) candidate wins; unrelated
/// candidates are a conflict and the previously accepted pair stays.
fn merge_base_candidate(
    store: &SymbolStore,
    bag: &mut DiagnosticBag,
    site: DiagSite,
    effective_base: &mut TypeId,
    deduced_base: &mut TypeId,
    candidate_effective: TypeId,
    candidate_deduced: TypeId,
) {
    if store.kind(candidate_deduced) == TypeKind::Error
        || store.kind(*deduced_base) == TypeKind::Error
    {
        return;
    }
    if is_encompassed_by(store, *deduced_base, candidate_deduced) {
        // Current pair is at least as specific; keep it.
    } else if is_encompassed_by(store, candidate_deduced, *deduced_base) {
        *deduced_base = candidate_deduced;
        *effective_base = candidate_effective;
    } else {
        bag.add(DiagnosticKind::ConflictingBaseConstraints, site);
    }
}

/// Extra validation for parameters of overriding generic methods, whose
/// bounds arrive through inheritance rather than their own declaration.
fn validate_inherited(
    store: &SymbolStore,
    flags: &ConstraintFlags,
    deduced_base: TypeId,
    bag: &mut DiagnosticBag,
    site: DiagSite,
) {
    let wk = store.well_known();
    let deduced_kind = store.kind(deduced_base);

    let implies_value = flags.intersects(ConstraintFlags::VALUE_TYPE | ConstraintFlags::UNMANAGED)
        || deduced_base == wk.value_root
        || deduced_base == wk.enum_root
        || matches!(deduced_kind, TypeKind::Struct | TypeKind::Enum);
    let implies_ref = flags.contains(ConstraintFlags::REFERENCE_TYPE)
        || matches!(
            deduced_kind,
            TypeKind::Interface | TypeKind::Delegate | TypeKind::Array
        )
        || (deduced_kind == TypeKind::Class
            && deduced_base != wk.object
            && deduced_base != wk.value_root
            && deduced_base != wk.enum_root);

    if implies_ref && implies_value {
        bag.add(DiagnosticKind::ConflictingInheritedConstraints, site);
    }
    if deduced_kind == TypeKind::Nullable
        && flags.intersects(ConstraintFlags::REFERENCE_TYPE | ConstraintFlags::VALUE_TYPE)
    {
        bag.add(DiagnosticKind::ConflictingInheritedConstraints, site);
    }
}

// ---------------------------------------------------------------------------
// Convenience queries over resolved bounds
// ---------------------------------------------------------------------------

/// Effective base class of `param`; object for trivial bounds.
pub fn effective_base_class(
    store: &SymbolStore,
    cache: &ResolutionCache,
    param: TypeParamId,
    sink: &mut dyn DiagnosticSink,
) -> TypeId {
    resolve_bounds(store, cache, param, false, sink)
        .map(|b| b.effective_base)
        .unwrap_or(store.well_known().object)
}

/// Deduced base type of `param`; object for trivial bounds.
pub fn deduced_base_type(
    store: &SymbolStore,
    cache: &ResolutionCache,
    param: TypeParamId,
    sink: &mut dyn DiagnosticSink,
) -> TypeId {
    resolve_bounds(store, cache, param, false, sink)
        .map(|b| b.deduced_base)
        .unwrap_or(store.well_known().object)
}

/// Interface set of `param`; empty for trivial bounds.
pub fn effective_interface_set(
    store: &SymbolStore,
    cache: &ResolutionCache,
    param: TypeParamId,
    sink: &mut dyn DiagnosticSink,
) -> Vec<TypeId> {
    resolve_bounds(store, cache, param, false, sink)
        .map(|b| b.interfaces.clone())
        .unwrap_or_default()
}
