//! Pure type relations: identity and encompassment.
//!
//! These are the leaf predicates the rest of the crate is built on.
//! `is_identical` is structural equality under a comparison-mode bitset;
//! `is_encompassed_by` is the one-directional convertibility relation used
//! to order candidate base types by specificity.

use bitflags::bitflags;
use cedar_symbols::{NullableAnnotation, SymbolStore, TypeId, TypeKind};

bitflags! {
    /// Comparison modes threaded through every equality call.
    ///
    /// Passed by value; there is no ambient comparison state.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TypeCompareKind: u8 {
        /// `dynamic` compares equal to `object`.
        const IGNORE_DYNAMIC = 1 << 0;
        /// Tuple element names do not participate in identity.
        const IGNORE_TUPLE_NAMES = 1 << 1;
        /// Reference nullability annotations do not participate.
        const IGNORE_NULLABLE_ANNOTATIONS = 1 << 2;
        /// Custom modifiers and array sizes do not participate.
        const IGNORE_CUSTOM_MODIFIERS = 1 << 3;
    }
}

impl TypeCompareKind {
    /// Strict identity.
    pub const CONSIDER_EVERYTHING: Self = Self::empty();

    /// Every difference the runtime cannot observe is ignored. This is the
    /// mode used when comparing against metadata-loaded signatures.
    pub const CLR_SIGNATURE: Self = Self::all();
}

/// Structural equality of two type nodes under `mode`.
///
/// Constructed types are interned, so the common case is the handle
/// comparison up front; the structural walk only matters once a mode
/// ignores a distinction the intern key preserves.
pub fn is_identical(store: &SymbolStore, a: TypeId, b: TypeId, mode: TypeCompareKind) -> bool {
    if a == b {
        return true;
    }

    let na = store.ty(a);
    let nb = store.ty(b);
    let wk = store.well_known();

    if mode.contains(TypeCompareKind::IGNORE_DYNAMIC) {
        let object_vs_dynamic = (na.kind == TypeKind::Dynamic && b == wk.object)
            || (nb.kind == TypeKind::Dynamic && a == wk.object);
        if object_vs_dynamic {
            return true;
        }
    }

    if na.kind != nb.kind {
        return false;
    }

    if !annotations_match(na.annotation, nb.annotation, mode) {
        return false;
    }

    match na.kind {
        TypeKind::TypeParameter => na.param == nb.param,
        TypeKind::Array | TypeKind::Pointer | TypeKind::Nullable => {
            match (na.element, nb.element) {
                (Some(ea), Some(eb)) => is_identical(store, ea, eb, mode),
                _ => false,
            }
        }
        TypeKind::FunctionPointer => {
            na.type_args.len() == nb.type_args.len()
                && na
                    .type_args
                    .iter()
                    .zip(&nb.type_args)
                    .all(|(&x, &y)| is_identical(store, x, y, mode))
        }
        TypeKind::Class
        | TypeKind::Struct
        | TypeKind::Interface
        | TypeKind::Enum
        | TypeKind::Delegate => {
            if na.original != nb.original {
                return false;
            }
            if !mode.contains(TypeCompareKind::IGNORE_TUPLE_NAMES)
                && na.tuple_names != nb.tuple_names
            {
                return false;
            }
            na.type_args.len() == nb.type_args.len()
                && na
                    .type_args
                    .iter()
                    .zip(&nb.type_args)
                    .all(|(&x, &y)| is_identical(store, x, y, mode))
        }
        // One node each; handle equality above already decided.
        TypeKind::Error | TypeKind::Dynamic => false,
    }
}

fn annotations_match(a: NullableAnnotation, b: NullableAnnotation, mode: TypeCompareKind) -> bool {
    if mode.contains(TypeCompareKind::IGNORE_NULLABLE_ANNOTATIONS) {
        return true;
    }
    // Oblivious matches anything; otherwise annotations must agree.
    a == b || a == NullableAnnotation::Oblivious || b == NullableAnnotation::Oblivious
}

/// True if `a` converts to `b` via identity, implicit reference conversion,
/// or boxing.
///
/// This orders candidate base types by specificity; it is not general
/// assignability. Never called with a type parameter on either side -
/// callers pass the parameter's effective or deduced base instead.
pub fn is_encompassed_by(store: &SymbolStore, a: TypeId, b: TypeId) -> bool {
    debug_assert_ne!(store.kind(a), TypeKind::TypeParameter);
    debug_assert_ne!(store.kind(b), TypeKind::TypeParameter);

    if is_identical(store, a, b, TypeCompareKind::CONSIDER_EVERYTHING) {
        return true;
    }
    // Error types encompass and are encompassed freely so one bad
    // declaration does not cascade.
    if store.kind(a) == TypeKind::Error || store.kind(b) == TypeKind::Error {
        return true;
    }

    match store.kind(a) {
        TypeKind::Pointer | TypeKind::FunctionPointer => false,
        TypeKind::TypeParameter => false,
        _ => {
            let identical =
                |x: TypeId| is_identical(store, x, b, TypeCompareKind::CONSIDER_EVERYTHING);
            store.base_chain(a).into_iter().skip(1).any(identical)
                || store.all_interfaces(a).into_iter().any(identical)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cedar_symbols::GraphBuilder;

    #[test]
    fn test_dynamic_object_identity_is_mode_gated() {
        let b = GraphBuilder::new();
        let store = b.store();
        let wk = store.well_known();
        assert!(!is_identical(
            &store,
            wk.dynamic,
            wk.object,
            TypeCompareKind::CONSIDER_EVERYTHING
        ));
        assert!(is_identical(
            &store,
            wk.dynamic,
            wk.object,
            TypeCompareKind::IGNORE_DYNAMIC
        ));
    }

    #[test]
    fn test_tuple_names_are_mode_gated() {
        let b = GraphBuilder::new();
        let pair = b.struct_("Pair");
        let _t1 = b.type_param_for_type(pair, "T1", Default::default());
        let _t2 = b.type_param_for_type(pair, "T2", Default::default());
        let int = b.struct_("int");
        let store = b.store();

        let x = store.interner.intern("x");
        let y = store.interner.intern("y");
        let a = store.interner.intern("a");
        let named_xy = store.construct_tuple(pair, vec![int, int], vec![x, y]);
        let named_xa = store.construct_tuple(pair, vec![int, int], vec![x, a]);
        assert_ne!(named_xy, named_xa);
        assert!(!is_identical(
            &store,
            named_xy,
            named_xa,
            TypeCompareKind::CONSIDER_EVERYTHING
        ));
        assert!(is_identical(
            &store,
            named_xy,
            named_xa,
            TypeCompareKind::IGNORE_TUPLE_NAMES
        ));
    }

    #[test]
    fn test_encompassed_by_walks_bases_and_interfaces() {
        let b = GraphBuilder::new();
        let i = b.interface("I");
        let base = b.class("Base");
        b.add_interface(base, i);
        let derived = b.class("Derived");
        b.set_base(derived, base);
        let s = b.struct_("S");
        let store = b.store();
        let wk = store.well_known();

        assert!(is_encompassed_by(&store, derived, base));
        assert!(is_encompassed_by(&store, derived, i));
        assert!(is_encompassed_by(&store, derived, wk.object));
        assert!(!is_encompassed_by(&store, base, derived));
        // Boxing: struct converts to its roots.
        assert!(is_encompassed_by(&store, s, wk.value_root));
        assert!(is_encompassed_by(&store, s, wk.object));
        assert!(!is_encompassed_by(&store, s, base));
    }
}
