//! Interface-member implementation mapping.
//!
//! `find_implementation` answers "which member of this type implements
//! that interface member?" by walking the implementing type's base chain
//! derived-to-root. At each level it checks, in order: explicit
//! implementations, emit-time bridge bodies, explicitly implemented
//! accessors of the queried property/event, then implicit name-and-
//! signature matches. Only when the whole chain yields nothing does it
//! fall back to default interface implementations, picking the unique
//! most-specific body across every transitively implemented interface.
//!
//! Results are published at most once per (implementing type, interface
//! member) pair. A lookup under `ignore_default_impls` that reaches the
//! default-implementation stage is provisional: it answers `None` without
//! caching, because a full lookup could still find a default body.

use crate::cache::{ImplementationRecord, InterfaceMember, InterfaceMemberKey, ResolutionCache};
use crate::diagnostics::{DiagSite, DiagnosticBag, DiagnosticSink};
use crate::relate::{is_identical, TypeCompareKind};
use cedar_common::{DiagnosticKind, LanguageLevel, MismatchKind};
use cedar_symbols::{
    Accessibility, MemberFlags, MemberId, Substitution, SymbolStore, TypeFlags, TypeId,
};
use smallvec::SmallVec;
use tracing::trace;

/// Find the member of `implementing` that implements `iface_member`.
///
/// When `ignore_default_impls` is set, the default-implementation stage is
/// skipped and a lookup that would have reached it answers `None` without
/// publishing, so a later full lookup can still supersede it. Callers use
/// this to break the mutual dependency between a property lookup and its
/// accessors' lookups.
pub fn find_implementation(
    store: &SymbolStore,
    cache: &ResolutionCache,
    implementing: TypeId,
    iface_member: InterfaceMember,
    ignore_default_impls: bool,
    language: LanguageLevel,
    sink: &mut dyn DiagnosticSink,
) -> Option<MemberId> {
    let key = InterfaceMemberKey {
        implementing,
        member: iface_member,
    };
    if let Some(record) = cache.impl_get(key) {
        sink.extend(&record.diagnostics);
        return record.member;
    }

    let mut bag = DiagnosticBag::new();
    match compute_implementation(
        store,
        implementing,
        iface_member,
        ignore_default_impls,
        language,
        &mut bag,
    ) {
        Outcome::Final(member) => {
            let winner = cache.impl_publish(
                key,
                ImplementationRecord {
                    member,
                    diagnostics: bag.into_vec(),
                },
            );
            sink.extend(&winner.diagnostics);
            winner.member
        }
        Outcome::Provisional => {
            trace!(?key, "provisional lookup left uncached");
            sink.extend(bag.as_slice());
            None
        }
    }
}

enum Outcome {
    /// Safe to publish.
    Final(Option<MemberId>),
    /// A full lookup could still find a default implementation.
    Provisional,
}

fn compute_implementation(
    store: &SymbolStore,
    implementing: TypeId,
    iface_member: InterfaceMember,
    ignore_default_impls: bool,
    language: LanguageLevel,
    bag: &mut DiagnosticBag,
) -> Outcome {
    let iface = iface_member.containing;
    let decl = store.member(iface_member.member);
    let decl_params = store.member_param_types(iface_member.member, iface);
    let decl_return = store.member_return_type(iface_member.member, iface);
    let site = DiagSite::Member(iface_member.member);
    let mut near_miss: Option<MismatchKind> = None;
    let mut seen_interface = false;

    for level in store.base_chain(implementing) {
        let level_sub = Substitution::for_type(store, level);

        // Explicit implementations at this level.
        let mut explicit: SmallVec<[MemberId; 1]> = SmallVec::new();
        for member in store.members_of(level) {
            let m = store.member(member);
            for &(named_iface, named_member) in &m.explicit_impls {
                let named_iface = level_sub.apply(store, named_iface);
                if named_member == iface_member.member
                    && is_identical(store, named_iface, iface, TypeCompareKind::CLR_SIGNATURE)
                {
                    explicit.push(member);
                }
            }
        }
        match explicit.as_slice() {
            [] => {}
            [only] => return Outcome::Final(Some(*only)),
            _ => {
                bag.add(DiagnosticKind::DuplicateExplicitImpl, site);
                return Outcome::Final(None);
            }
        }

        // Emit-time bridge bodies synthesized at this level.
        for (bridged, body) in store.bridges_of(level) {
            if bridged == iface_member.member {
                return Outcome::Final(Some(body));
            }
        }

        // An explicitly implemented accessor claims the whole
        // property/event: answer its associated member and stop, never
        // falling through to the implicit search.
        if decl.kind.has_accessors() {
            for member in store.members_of(level) {
                let m = store.member(member);
                for &(named_iface, named_member) in &m.explicit_impls {
                    let named_iface = level_sub.apply(store, named_iface);
                    if decl.accessors.contains(&named_member)
                        && is_identical(store, named_iface, iface, TypeCompareKind::CLR_SIGNATURE)
                    {
                        return Outcome::Final(m.associated);
                    }
                }
            }
        }

        // Implicit matching starts at the first level that declares the
        // interface (or a sub-interface of it).
        if !seen_interface {
            seen_interface = store.declared_interface_closure(level).contains(&iface);
        }
        if !seen_interface {
            continue;
        }

        // Source-declared levels compare signatures exactly; metadata
        // levels use the looser CLR mode.
        let mode = if store
            .ty(store.original(level))
            .flags
            .contains(TypeFlags::FROM_METADATA)
        {
            TypeCompareKind::CLR_SIGNATURE
        } else {
            TypeCompareKind::CONSIDER_EVERYTHING
        };

        for member in store.members_of(level) {
            let m = store.member(member);
            if m.name != decl.name || m.kind != decl.kind {
                continue;
            }
            let params = store.member_param_types(member, level);
            if params.len() != decl_params.len()
                || !params
                    .iter()
                    .zip(&decl_params)
                    .all(|(&a, &b)| is_identical(store, a, b, mode))
            {
                continue;
            }

            // Same name and parameter list: either the implementation or
            // the near-miss to report.
            let mismatch = implicit_mismatch(store, &m, &decl, decl_return, member, level, mode, language);
            match mismatch {
                None => return Outcome::Final(Some(member)),
                Some(kind) => {
                    if near_miss.is_none() {
                        near_miss = Some(kind);
                    }
                }
            }
        }
    }

    // Nothing anywhere in the chain; the interface must actually be
    // implemented before default bodies are considered.
    if !store.implements_interface(implementing, iface) {
        return Outcome::Final(None);
    }
    if ignore_default_impls {
        return Outcome::Provisional;
    }

    match most_specific_default(store, implementing, iface_member) {
        DefaultImpl::Found { declaring, body } => {
            if decl.kind.has_accessors()
                && !accessors_tie_back(store, implementing, iface, &decl.accessors, declaring)
            {
                return Outcome::Final(None);
            }
            Outcome::Final(Some(body))
        }
        DefaultImpl::Ambiguous => {
            bag.add(DiagnosticKind::MostSpecificImplementationNotFound, site);
            Outcome::Final(None)
        }
        DefaultImpl::None => {
            if let Some(kind) = near_miss {
                bag.add(DiagnosticKind::ImplementationMismatch(kind), site);
            }
            Outcome::Final(None)
        }
    }
}

/// Why a name-and-parameter match still fails to implement `decl`, if it
/// does.
fn implicit_mismatch(
    store: &SymbolStore,
    candidate: &cedar_symbols::MemberNode,
    decl: &cedar_symbols::MemberNode,
    decl_return: TypeId,
    candidate_id: MemberId,
    level: TypeId,
    mode: TypeCompareKind,
    language: LanguageLevel,
) -> Option<MismatchKind> {
    if candidate.is_static() != decl.is_static() {
        return Some(MismatchKind::Static);
    }
    if candidate.accessibility != Accessibility::Public {
        // Non-public interface members may be implemented at matching
        // accessibility, behind the language gate.
        let allowed = decl.accessibility != Accessibility::Public
            && candidate.accessibility == decl.accessibility
            && language.supports_non_public_implicit_impls();
        if !allowed {
            return Some(MismatchKind::Accessibility);
        }
    }
    let candidate_return = store.member_return_type(candidate_id, level);
    if !is_identical(store, candidate_return, decl_return, mode) {
        return Some(MismatchKind::ReturnType);
    }
    if candidate.ref_kind != decl.ref_kind {
        return Some(MismatchKind::RefKind);
    }
    if candidate.flags.contains(MemberFlags::INIT_ONLY)
        != decl.flags.contains(MemberFlags::INIT_ONLY)
    {
        return Some(MismatchKind::InitOnly);
    }
    None
}

enum DefaultImpl {
    Found { declaring: TypeId, body: MemberId },
    Ambiguous,
    None,
}

#[derive(Copy, Clone, PartialEq, Eq)]
struct DefaultCandidate {
    /// Interface instantiation supplying the body.
    declaring: TypeId,
    body: MemberId,
}

/// The unique most-specific default body for `iface_member` across every
/// interface `implementing` transitively implements.
fn most_specific_default(
    store: &SymbolStore,
    implementing: TypeId,
    iface_member: InterfaceMember,
) -> DefaultImpl {
    let candidates = default_candidates(store, implementing, iface_member);
    // A candidate survives unless some other candidate's declaring
    // interface is strictly more derived.
    let winners: Vec<&DefaultCandidate> = candidates
        .iter()
        .filter(|c| {
            !candidates
                .iter()
                .any(|d| d != *c && store.is_sub_interface_of(d.declaring, c.declaring))
        })
        .collect();
    match winners.as_slice() {
        [] => DefaultImpl::None,
        [only] => DefaultImpl::Found {
            declaring: only.declaring,
            body: only.body,
        },
        _ => DefaultImpl::Ambiguous,
    }
}

fn default_candidates(
    store: &SymbolStore,
    implementing: TypeId,
    iface_member: InterfaceMember,
) -> Vec<DefaultCandidate> {
    let iface = iface_member.containing;
    let decl = store.member(iface_member.member);
    let mut candidates: Vec<DefaultCandidate> = Vec::new();
    for declaring in store.all_interfaces(implementing) {
        if is_identical(store, declaring, iface, TypeCompareKind::CLR_SIGNATURE) {
            // The declaring interface's own body is the least specific
            // candidate.
            if decl.has_body() {
                push_candidate(
                    &mut candidates,
                    DefaultCandidate {
                        declaring,
                        body: iface_member.member,
                    },
                );
            }
            continue;
        }
        let sub = Substitution::for_type(store, declaring);
        for member in store.members_of(declaring) {
            let m = store.member(member);
            if !m.has_body() {
                continue;
            }
            for &(named_iface, named_member) in &m.explicit_impls {
                let named_iface = sub.apply(store, named_iface);
                if named_member == iface_member.member
                    && is_identical(store, named_iface, iface, TypeCompareKind::CLR_SIGNATURE)
                {
                    push_candidate(
                        &mut candidates,
                        DefaultCandidate {
                            declaring,
                            body: member,
                        },
                    );
                }
            }
        }
    }
    candidates
}

fn push_candidate(candidates: &mut Vec<DefaultCandidate>, candidate: DefaultCandidate) {
    if !candidates.contains(&candidate) {
        candidates.push(candidate);
    }
}

/// Every accessor of a defaulted property/event must itself resolve to a
/// default body declared by the same interface, or the property result is
/// discarded.
fn accessors_tie_back(
    store: &SymbolStore,
    implementing: TypeId,
    iface: TypeId,
    accessors: &[MemberId],
    declaring: TypeId,
) -> bool {
    accessors.iter().all(|&accessor| {
        match most_specific_default(
            store,
            implementing,
            InterfaceMember {
                containing: iface,
                member: accessor,
            },
        ) {
            DefaultImpl::Found {
                declaring: accessor_declaring,
                ..
            } => is_identical(
                store,
                accessor_declaring,
                declaring,
                TypeCompareKind::CLR_SIGNATURE,
            ),
            _ => false,
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cedar_symbols::{Accessibility, GraphBuilder, MemberFlags, RefKind};

    fn lookup(
        b: &GraphBuilder,
        cache: &ResolutionCache,
        implementing: TypeId,
        iface: TypeId,
        member: MemberId,
    ) -> (Option<MemberId>, DiagnosticBag) {
        let store = b.store();
        let mut bag = DiagnosticBag::new();
        let found = find_implementation(
            &store,
            cache,
            implementing,
            InterfaceMember {
                containing: iface,
                member,
            },
            false,
            LanguageLevel::default(),
            &mut bag,
        );
        (found, bag)
    }

    #[test]
    fn test_explicit_beats_implicit() {
        let b = GraphBuilder::new();
        let store = b.store();
        let wk = store.well_known();
        let i = b.interface("I");
        let im = b.method(i, "Run", vec![], wk.void_type);
        let c = b.class("C");
        b.add_interface(c, i);
        let implicit = b.method(c, "Run", vec![], wk.void_type);
        let explicit = b.method(c, "I.Run", vec![], wk.void_type);
        b.add_explicit_impl(explicit, i, im);
        let cache = ResolutionCache::new();
        let (found, bag) = lookup(&b, &cache, c, i, im);
        assert_eq!(found, Some(explicit));
        assert_ne!(found, Some(implicit));
        assert!(bag.is_empty());
    }

    #[test]
    fn test_duplicate_explicit_impl() {
        let b = GraphBuilder::new();
        let store = b.store();
        let wk = store.well_known();
        let i = b.interface("I");
        let im = b.method(i, "Run", vec![], wk.void_type);
        let c = b.class("C");
        b.add_interface(c, i);
        let first = b.method(c, "A", vec![], wk.void_type);
        let second = b.method(c, "B", vec![], wk.void_type);
        b.add_explicit_impl(first, i, im);
        b.add_explicit_impl(second, i, im);
        let cache = ResolutionCache::new();
        let (found, bag) = lookup(&b, &cache, c, i, im);
        assert_eq!(found, None);
        assert!(bag.has(DiagnosticKind::DuplicateExplicitImpl));
    }

    #[test]
    fn test_implicit_match_found_on_base() {
        let b = GraphBuilder::new();
        let store = b.store();
        let wk = store.well_known();
        let i = b.interface("I");
        let im = b.method(i, "Run", vec![], wk.void_type);
        let base = b.class("Base");
        let base_run = b.method(base, "Run", vec![], wk.void_type);
        let derived = b.class("Derived");
        b.set_base(derived, base);
        b.add_interface(derived, i);
        let cache = ResolutionCache::new();
        let (found, bag) = lookup(&b, &cache, derived, i, im);
        assert_eq!(found, Some(base_run));
        assert!(bag.is_empty());
    }

    #[test]
    fn test_near_miss_reports_mismatch_kind() {
        let b = GraphBuilder::new();
        let store = b.store();
        let wk = store.well_known();
        let i = b.interface("I");
        let im = b.method(i, "Run", vec![], wk.void_type);
        let c = b.class("C");
        b.add_interface(c, i);
        let almost = b.method(c, "Run", vec![], wk.void_type);
        b.set_member_flags(almost, MemberFlags::STATIC);
        let cache = ResolutionCache::new();
        let (found, bag) = lookup(&b, &cache, c, i, im);
        assert_eq!(found, None);
        assert!(bag.has(DiagnosticKind::ImplementationMismatch(MismatchKind::Static)));
    }

    #[test]
    fn test_private_candidate_is_accessibility_near_miss() {
        let b = GraphBuilder::new();
        let store = b.store();
        let wk = store.well_known();
        let i = b.interface("I");
        let im = b.method(i, "Run", vec![], wk.void_type);
        let c = b.class("C");
        b.add_interface(c, i);
        let hidden = b.method(c, "Run", vec![], wk.void_type);
        b.set_accessibility(hidden, Accessibility::Private);
        let cache = ResolutionCache::new();
        let (found, bag) = lookup(&b, &cache, c, i, im);
        assert_eq!(found, None);
        assert!(bag.has(DiagnosticKind::ImplementationMismatch(
            MismatchKind::Accessibility
        )));
    }

    #[test]
    fn test_return_type_near_miss() {
        let b = GraphBuilder::new();
        let int = b.struct_("int");
        let string = b.class("string");
        let i = b.interface("I");
        let im = b.method(i, "Size", vec![], int);
        let c = b.class("C");
        b.add_interface(c, i);
        let _ = b.method(c, "Size", vec![], string);
        let cache = ResolutionCache::new();
        let (found, bag) = lookup(&b, &cache, c, i, im);
        assert_eq!(found, None);
        assert!(bag.has(DiagnosticKind::ImplementationMismatch(
            MismatchKind::ReturnType
        )));
    }

    #[test]
    fn test_ref_kind_near_miss() {
        let b = GraphBuilder::new();
        let int = b.struct_("int");
        let i = b.interface("I");
        let im = b.method(i, "Current", vec![], int);
        b.set_ref_kind(im, RefKind::Ref);
        let c = b.class("C");
        b.add_interface(c, i);
        let _ = b.method(c, "Current", vec![], int);
        let cache = ResolutionCache::new();
        let (found, bag) = lookup(&b, &cache, c, i, im);
        assert_eq!(found, None);
        assert!(bag.has(DiagnosticKind::ImplementationMismatch(
            MismatchKind::RefKind
        )));
    }

    #[test]
    fn test_init_only_near_miss() {
        let b = GraphBuilder::new();
        let int = b.struct_("int");
        let i = b.interface("I");
        let (_, _, isetter) = b.property(i, "Count", int);
        b.set_member_flags(isetter, MemberFlags::INIT_ONLY);
        let c = b.class("C");
        b.add_interface(c, i);
        let _ = b.property(c, "Count", int);
        let cache = ResolutionCache::new();
        let (found, bag) = lookup(&b, &cache, c, i, isetter);
        assert_eq!(found, None);
        assert!(bag.has(DiagnosticKind::ImplementationMismatch(
            MismatchKind::InitOnly
        )));
    }

    #[test]
    fn test_bridge_body_wins_over_implicit() {
        let b = GraphBuilder::new();
        let store = b.store();
        let wk = store.well_known();
        let i = b.interface("I");
        let im = b.method(i, "Run", vec![], wk.void_type);
        let c = b.class("C");
        b.add_interface(c, i);
        let implicit = b.method(c, "Run", vec![], wk.void_type);
        let bridge = b.method(c, "<bridge>Run", vec![], wk.void_type);
        b.add_bridge(c, im, bridge);
        let cache = ResolutionCache::new();
        let (found, _) = lookup(&b, &cache, c, i, im);
        assert_eq!(found, Some(bridge));
        assert_ne!(found, Some(implicit));
    }

    #[test]
    fn test_explicit_accessor_claims_property() {
        let b = GraphBuilder::new();
        let store = b.store();
        let int = b.struct_("int");
        let i = b.interface("I");
        let (iprop, igetter, _) = b.property(i, "Count", int);
        let c = b.class("C");
        b.add_interface(c, i);
        let (cprop, cgetter, _) = b.property(c, "Backing", int);
        b.add_explicit_impl(cgetter, i, igetter);
        // A matching implicit property must NOT be picked once an
        // accessor was explicitly claimed.
        let _ = b.property(c, "Count", int);
        let cache = ResolutionCache::new();
        let (found, _) = lookup(&b, &cache, c, i, iprop);
        assert_eq!(found, Some(cprop));
        let _ = store;
    }

    #[test]
    fn test_default_property_accessors_follow_declaring_interface() {
        let b = GraphBuilder::new();
        let int = b.struct_("int");
        let i1 = b.interface("I1");
        let (iprop, igetter, isetter) = b.property(i1, "Count", int);
        let i2 = b.interface("I2");
        b.add_interface(i2, i1);
        let (p2, g2, s2) = b.property(i2, "I1.Count", int);
        for (body, decl) in [(p2, iprop), (g2, igetter), (s2, isetter)] {
            b.set_member_flags(body, MemberFlags::HAS_BODY);
            b.add_explicit_impl(body, i1, decl);
        }
        let c = b.class("C");
        b.add_interface(c, i2);
        let cache = ResolutionCache::new();
        let (found, bag) = lookup(&b, &cache, c, i1, iprop);
        assert_eq!(found, Some(p2));
        assert!(bag.is_empty());
    }

    #[test]
    fn test_default_property_discarded_when_accessors_resolve_elsewhere() {
        let b = GraphBuilder::new();
        let store = b.store();
        let wk = store.well_known();
        let int = b.struct_("int");
        let i1 = b.interface("I1");
        let (iprop, igetter, isetter) = b.property(i1, "Count", int);
        // I2 defaults only the property declaration itself.
        let i2 = b.interface("I2");
        b.add_interface(i2, i1);
        let (p2, _, _) = b.property(i2, "I1.Count", int);
        b.set_member_flags(p2, MemberFlags::HAS_BODY);
        b.add_explicit_impl(p2, i1, iprop);
        // I3 defaults the accessors, so they tie to a different interface.
        let i3 = b.interface("I3");
        b.add_interface(i3, i1);
        let g3 = b.method(i3, "I1.get_Count", vec![], int);
        b.set_member_flags(g3, MemberFlags::HAS_BODY);
        b.add_explicit_impl(g3, i1, igetter);
        let s3 = b.method(i3, "I1.set_Count", vec![int], wk.void_type);
        b.set_member_flags(s3, MemberFlags::HAS_BODY);
        b.add_explicit_impl(s3, i1, isetter);
        let c = b.class("C");
        b.add_interface(c, i2);
        b.add_interface(c, i3);
        let cache = ResolutionCache::new();
        let (found, _) = lookup(&b, &cache, c, i1, iprop);
        assert_eq!(found, None);
    }

    #[test]
    fn test_default_impl_most_specific_wins() {
        let b = GraphBuilder::new();
        let store = b.store();
        let wk = store.well_known();
        let i1 = b.interface("I1");
        let im = b.method(i1, "Run", vec![], wk.void_type);
        let i2 = b.interface("I2");
        b.add_interface(i2, i1);
        let i2_body = b.method(i2, "I1.Run", vec![], wk.void_type);
        b.set_member_flags(i2_body, MemberFlags::HAS_BODY);
        b.add_explicit_impl(i2_body, i1, im);
        let c = b.class("C");
        b.add_interface(c, i2);
        let cache = ResolutionCache::new();
        let (found, bag) = lookup(&b, &cache, c, i1, im);
        assert_eq!(found, Some(i2_body));
        assert!(bag.is_empty());
    }

    #[test]
    fn test_default_impl_diamond_is_ambiguous() {
        let b = GraphBuilder::new();
        let store = b.store();
        let wk = store.well_known();
        let root = b.interface("IRoot");
        let im = b.method(root, "Run", vec![], wk.void_type);
        let left = b.interface("ILeft");
        b.add_interface(left, root);
        let left_body = b.method(left, "IRoot.Run", vec![], wk.void_type);
        b.set_member_flags(left_body, MemberFlags::HAS_BODY);
        b.add_explicit_impl(left_body, root, im);
        let right = b.interface("IRight");
        b.add_interface(right, root);
        let right_body = b.method(right, "IRoot.Run", vec![], wk.void_type);
        b.set_member_flags(right_body, MemberFlags::HAS_BODY);
        b.add_explicit_impl(right_body, root, im);
        let c = b.class("C");
        b.add_interface(c, left);
        b.add_interface(c, right);
        let cache = ResolutionCache::new();
        let (found, bag) = lookup(&b, &cache, c, root, im);
        assert_eq!(found, None);
        assert!(bag.has(DiagnosticKind::MostSpecificImplementationNotFound));
    }

    #[test]
    fn test_declaring_interface_own_body_is_fallback() {
        let b = GraphBuilder::new();
        let store = b.store();
        let wk = store.well_known();
        let i = b.interface("I");
        let im = b.method(i, "Run", vec![], wk.void_type);
        b.set_member_flags(im, MemberFlags::HAS_BODY);
        let c = b.class("C");
        b.add_interface(c, i);
        let cache = ResolutionCache::new();
        let (found, bag) = lookup(&b, &cache, c, i, im);
        assert_eq!(found, Some(im));
        assert!(bag.is_empty());
    }

    #[test]
    fn test_ignore_default_impls_is_provisional_and_uncached() {
        let b = GraphBuilder::new();
        let store = b.store();
        let wk = store.well_known();
        let i = b.interface("I");
        let im = b.method(i, "Run", vec![], wk.void_type);
        b.set_member_flags(im, MemberFlags::HAS_BODY);
        let c = b.class("C");
        b.add_interface(c, i);
        let cache = ResolutionCache::new();
        let mut bag = DiagnosticBag::new();
        let member = InterfaceMember {
            containing: i,
            member: im,
        };
        let provisional = find_implementation(
            &store,
            &cache,
            c,
            member,
            true,
            LanguageLevel::default(),
            &mut bag,
        );
        assert_eq!(provisional, None);
        // The provisional answer must not poison a later full lookup.
        let full = find_implementation(
            &store,
            &cache,
            c,
            member,
            false,
            LanguageLevel::default(),
            &mut bag,
        );
        assert_eq!(full, Some(im));
    }

    #[test]
    fn test_unimplemented_interface_answers_none() {
        let b = GraphBuilder::new();
        let store = b.store();
        let wk = store.well_known();
        let i = b.interface("I");
        let im = b.method(i, "Run", vec![], wk.void_type);
        let c = b.class("C");
        let _ = b.method(c, "Run", vec![], wk.void_type);
        let cache = ResolutionCache::new();
        let (found, bag) = lookup(&b, &cache, c, i, im);
        assert_eq!(found, None);
        assert!(bag.is_empty());
    }
}
