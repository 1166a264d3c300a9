//! End-to-end resolution scenarios across bounds, constraints, and
//! interface mapping.

use cedar_common::{DiagnosticKind, LanguageLevel};
use cedar_relate::{
    check_constraints, find_implementation, resolve_bounds, CheckContext, DiagnosticBag,
    InterfaceMember, ResolutionCache,
};
use cedar_symbols::{ConstraintFlags, GraphBuilder, MemberFlags};
use once_cell::sync::Lazy;
use rayon::prelude::*;

static TRACING: Lazy<()> = Lazy::new(|| {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
});

fn init() {
    Lazy::force(&TRACING);
}

#[test]
fn test_self_referential_class_constraint_terminates() {
    init();
    // class C<T> where T : C<T>
    let b = GraphBuilder::new();
    let c = b.class("C");
    let t = b.type_param_for_type(c, "T", ConstraintFlags::empty());
    let store = b.store();
    let instantiation = store.construct(c, vec![store.param_type(t)]);
    b.add_constraint(t, instantiation);
    let cache = ResolutionCache::new();
    let mut bag = DiagnosticBag::new();
    let bounds = resolve_bounds(&store, &cache, t, false, &mut bag).expect("non-trivial");
    assert_eq!(bounds.effective_base, instantiation);
    assert!(bag.is_empty(), "{:?}", bag.as_slice());
}

#[test]
fn test_directly_circular_constraint_is_diagnosed() {
    init();
    let b = GraphBuilder::new();
    let c = b.class("C");
    let t = b.type_param_for_type(c, "T", ConstraintFlags::empty());
    let store = b.store();
    b.add_constraint(t, store.param_type(t));
    let cache = ResolutionCache::new();
    let mut bag = DiagnosticBag::new();
    let _ = resolve_bounds(&store, &cache, t, false, &mut bag);
    assert!(bag.has(DiagnosticKind::CircularConstraint));
}

#[test]
fn test_mutually_constrained_method_params_terminate() {
    init();
    // void M<T, U>() where T : U where U : T
    let b = GraphBuilder::new();
    let c = b.class("C");
    let store = b.store();
    let m = b.method(c, "M", vec![], store.well_known().void_type);
    let t = b.type_param_for_method(m, "T", ConstraintFlags::empty());
    let u = b.type_param_for_method(m, "U", ConstraintFlags::empty());
    b.add_constraint(t, store.param_type(u));
    b.add_constraint(u, store.param_type(t));
    let cache = ResolutionCache::new();
    let mut bag = DiagnosticBag::new();
    let bounds = resolve_bounds(&store, &cache, t, false, &mut bag);
    assert!(bounds.is_some());
    assert!(bag.has(DiagnosticKind::CircularConstraint));
}

#[test]
fn test_bounds_resolution_is_idempotent() {
    init();
    let b = GraphBuilder::new();
    let base = b.class("Base");
    let i = b.interface("I");
    let c = b.class("C");
    let t = b.type_param_for_type(c, "T", ConstraintFlags::empty());
    b.add_constraint(t, base);
    b.add_constraint(t, i);
    let store = b.store();
    let cache = ResolutionCache::new();
    let mut first_bag = DiagnosticBag::new();
    let first = resolve_bounds(&store, &cache, t, false, &mut first_bag);
    let mut second_bag = DiagnosticBag::new();
    let second = resolve_bounds(&store, &cache, t, false, &mut second_bag);
    assert_eq!(first, second);
    assert_eq!(first_bag.as_slice(), second_bag.as_slice());
}

#[test]
fn test_concurrent_resolution_observes_one_answer() {
    init();
    let b = GraphBuilder::new();
    let base = b.class("Base");
    let i1 = b.interface("I1");
    let i2 = b.interface("I2");
    b.add_interface(i2, i1);
    let c = b.class("C");
    let mut params = Vec::new();
    for n in 0..16 {
        let t = b.type_param_for_type(c, &format!("T{n}"), ConstraintFlags::empty());
        b.add_constraint(t, base);
        b.add_constraint(t, i2);
        params.push(t);
    }
    let store = b.store();
    let cache = ResolutionCache::new();

    let results: Vec<_> = (0..64usize)
        .into_par_iter()
        .map(|n| {
            let mut bag = DiagnosticBag::new();
            let param = params[n % params.len()];
            (
                param,
                resolve_bounds(&store, &cache, param, false, &mut bag),
            )
        })
        .collect();
    for (param, bounds) in results {
        let mut bag = DiagnosticBag::new();
        let again = resolve_bounds(&store, &cache, param, false, &mut bag);
        assert_eq!(bounds, again);
        let resolved = again.expect("non-trivial");
        assert_eq!(resolved.effective_base, base);
        assert_eq!(resolved.interfaces, vec![i2]);
    }
}

#[test]
fn test_implementation_lookup_is_idempotent_across_threads() {
    init();
    let b = GraphBuilder::new();
    let store = b.store();
    let wk = store.well_known();
    let i = b.interface("I");
    let im = b.method(i, "Run", vec![], wk.void_type);
    let c = b.class("C");
    b.add_interface(c, i);
    let run = b.method(c, "Run", vec![], wk.void_type);
    let cache = ResolutionCache::new();
    let member = InterfaceMember {
        containing: i,
        member: im,
    };
    let results: Vec<_> = (0..64)
        .into_par_iter()
        .map(|_| {
            let mut bag = DiagnosticBag::new();
            find_implementation(
                &store,
                &cache,
                c,
                member,
                false,
                LanguageLevel::default(),
                &mut bag,
            )
        })
        .collect();
    assert!(results.iter().all(|&r| r == Some(run)));
}

#[test]
fn test_explicit_beats_implicit_beats_default() {
    init();
    let build = |with_explicit: bool, with_implicit: bool| {
        let b = GraphBuilder::new();
        let store = b.store();
        let wk = store.well_known();
        let i = b.interface("I");
        let im = b.method(i, "Run", vec![], wk.void_type);
        b.set_member_flags(im, MemberFlags::HAS_BODY);
        let c = b.class("C");
        b.add_interface(c, i);
        let implicit = with_implicit.then(|| b.method(c, "Run", vec![], wk.void_type));
        let explicit = with_explicit.then(|| {
            let e = b.method(c, "I.Run", vec![], wk.void_type);
            b.add_explicit_impl(e, i, im);
            e
        });
        let mut bag = DiagnosticBag::new();
        let found = find_implementation(
            &store,
            &ResolutionCache::new(),
            c,
            InterfaceMember {
                containing: i,
                member: im,
            },
            false,
            LanguageLevel::default(),
            &mut bag,
        );
        (found, implicit, explicit, im)
    };

    let (found, _, explicit, _) = build(true, true);
    assert_eq!(found, explicit);
    let (found, implicit, _, _) = build(false, true);
    assert_eq!(found, implicit);
    let (found, _, _, default_body) = build(false, false);
    assert_eq!(found, Some(default_body));
}

#[test]
fn test_generic_interface_member_maps_through_substitution() {
    init();
    // interface I<T> { void Handle(T item); }  class C : I<int>
    let b = GraphBuilder::new();
    let store = b.store();
    let wk = store.well_known();
    let i = b.interface("I");
    let ti = b.type_param_for_type(i, "T", ConstraintFlags::empty());
    let im = b.method(i, "Handle", vec![store.param_type(ti)], wk.void_type);
    let int = b.struct_("int");
    let string = b.class("string");
    let i_of_int = store.construct(i, vec![int]);
    let c = b.class("C");
    b.add_interface(c, i_of_int);
    let wrong = b.method(c, "Handle", vec![string], wk.void_type);
    let right = b.method(c, "Handle", vec![int], wk.void_type);
    let cache = ResolutionCache::new();
    let mut bag = DiagnosticBag::new();
    let found = find_implementation(
        &store,
        &cache,
        c,
        InterfaceMember {
            containing: i_of_int,
            member: im,
        },
        false,
        LanguageLevel::default(),
        &mut bag,
    );
    assert_eq!(found, Some(right));
    assert_ne!(found, Some(wrong));
    assert!(bag.is_empty(), "{:?}", bag.as_slice());
}

#[test]
fn test_constraint_round_trip_against_resolved_bounds() {
    init();
    let b = GraphBuilder::new();
    let base = b.class("Base");
    let i = b.interface("I");
    let good = b.class("Good");
    b.set_base(good, base);
    b.add_interface(good, i);
    let missing_iface = b.class("MissingIface");
    b.set_base(missing_iface, base);
    let c = b.class("C");
    let t = b.type_param_for_type(c, "T", ConstraintFlags::empty());
    b.add_constraint(t, base);
    b.add_constraint(t, i);
    let store = b.store();
    let cache = ResolutionCache::new();

    let mut bag = DiagnosticBag::new();
    let bounds = resolve_bounds(&store, &cache, t, false, &mut bag).expect("non-trivial");
    assert_eq!(bounds.effective_base, base);
    assert_eq!(bounds.interfaces, vec![i]);

    let mut bag = DiagnosticBag::new();
    let ok = check_constraints(
        &store,
        &cache,
        &[t],
        &[good],
        CheckContext::default(),
        &mut bag,
    );
    assert!(ok, "{:?}", bag.as_slice());

    let mut bag = DiagnosticBag::new();
    let ok = check_constraints(
        &store,
        &cache,
        &[t],
        &[missing_iface],
        CheckContext::default(),
        &mut bag,
    );
    assert!(!ok);
    assert!(bag.has(DiagnosticKind::ConstraintNotSatisfiedRefType));
}

#[test]
fn test_unmanaged_scan_recurses_through_nested_structs() {
    init();
    let b = GraphBuilder::new();
    let int = b.struct_("int");
    let string = b.class("string");
    let inner_ok = b.struct_("InnerOk");
    b.field(inner_ok, "x", int);
    let inner_bad = b.struct_("InnerBad");
    b.field(inner_bad, "s", string);
    let outer_ok = b.struct_("OuterOk");
    b.field(outer_ok, "inner", inner_ok);
    let outer_bad = b.struct_("OuterBad");
    b.field(outer_bad, "inner", inner_bad);
    let c = b.class("C");
    let t = b.type_param_for_type(c, "T", ConstraintFlags::UNMANAGED);
    let store = b.store();
    let cache = ResolutionCache::new();

    let mut bag = DiagnosticBag::new();
    assert!(check_constraints(
        &store,
        &cache,
        &[t],
        &[outer_ok],
        CheckContext::default(),
        &mut bag,
    ));
    let mut bag = DiagnosticBag::new();
    assert!(!check_constraints(
        &store,
        &cache,
        &[t],
        &[outer_bad],
        CheckContext::default(),
        &mut bag,
    ));
    assert!(bag.has(DiagnosticKind::UnmanagedConstraintNotSatisfied));
}
