//! Type substitution.
//!
//! A [`Substitution`] maps type parameters to type arguments and rewrites
//! types recursively through constructed types, arrays, pointers, nullable
//! wrappers, and function-pointer signatures. Constructed results go back
//! through the store's intern table, so substitution preserves the
//! one-id-per-instantiation invariant.

use crate::node::TypeKind;
use crate::store::SymbolStore;
use crate::{TypeId, TypeParamId};
use rustc_hash::FxHashMap;

/// Map from type parameters to type arguments.
#[derive(Clone, Debug, Default)]
pub struct Substitution {
    map: FxHashMap<TypeParamId, TypeId>,
}

impl Substitution {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pairwise map of `params` to `args`.
    pub fn from_pairs(params: &[TypeParamId], args: &[TypeId]) -> Self {
        debug_assert_eq!(params.len(), args.len());
        let mut map = FxHashMap::default();
        for (&p, &a) in params.iter().zip(args) {
            map.insert(p, a);
        }
        Self { map }
    }

    /// The substitution a constructed type applies to its definition.
    /// Identity for definitions and structural types.
    pub fn for_type(store: &SymbolStore, ty: TypeId) -> Self {
        let node = store.ty(ty);
        if node.original == ty || node.type_args.is_empty() {
            return Self::new();
        }
        let def = store.ty(node.original);
        Self::from_pairs(&def.type_params, &node.type_args)
    }

    pub fn is_identity(&self) -> bool {
        self.map.is_empty()
    }

    pub fn insert(&mut self, param: TypeParamId, ty: TypeId) {
        self.map.insert(param, ty);
    }

    pub fn get(&self, param: TypeParamId) -> Option<TypeId> {
        self.map.get(&param).copied()
    }

    /// Rewrite `ty`, replacing mapped type parameters throughout.
    pub fn apply(&self, store: &SymbolStore, ty: TypeId) -> TypeId {
        if self.is_identity() {
            return ty;
        }
        let node = store.ty(ty);
        match node.kind {
            TypeKind::TypeParameter => {
                let param = node.param.expect("type-parameter node backs a param");
                self.get(param).unwrap_or(ty)
            }
            TypeKind::Array => {
                let element = node.element.expect("array has an element");
                let mapped = self.apply(store, element);
                if mapped == element { ty } else { store.array_of(mapped) }
            }
            TypeKind::Pointer => {
                let pointee = node.element.expect("pointer has a pointee");
                let mapped = self.apply(store, pointee);
                if mapped == pointee { ty } else { store.pointer_to(mapped) }
            }
            TypeKind::Nullable => {
                let underlying = node.element.expect("nullable wraps a type");
                let mapped = self.apply(store, underlying);
                if mapped == underlying {
                    ty
                } else {
                    store.nullable_of(mapped)
                }
            }
            TypeKind::FunctionPointer => {
                let mapped: Vec<TypeId> =
                    node.type_args.iter().map(|&t| self.apply(store, t)).collect();
                if mapped == node.type_args {
                    ty
                } else {
                    store.function_pointer(mapped)
                }
            }
            TypeKind::Class
            | TypeKind::Struct
            | TypeKind::Interface
            | TypeKind::Enum
            | TypeKind::Delegate => {
                if node.type_args.is_empty() {
                    return ty;
                }
                let mapped: Vec<TypeId> =
                    node.type_args.iter().map(|&t| self.apply(store, t)).collect();
                if mapped == node.type_args {
                    ty
                } else if let Some(names) = node.tuple_names {
                    store.construct_tuple(node.original, mapped, names)
                } else {
                    store.construct_annotated(node.original, mapped, node.annotation)
                }
            }
            TypeKind::Error | TypeKind::Dynamic => ty,
        }
    }
}
