//! Arena storage and constructed-type interning.
//!
//! `SymbolStore` owns three append-only arenas (types, type parameters,
//! members) plus an intern table for constructed types. Handles are plain
//! indices; nodes never hold references to each other, so the
//! mutually-referential symbol graph needs no ownership cycles.
//!
//! Queries that depend on a substitution map (base type, interface list,
//! member signatures of a constructed type) are answered lazily: a
//! constructed node stores only its original definition and its arguments,
//! and the store substitutes on demand. This keeps construction
//! non-recursive even for self-referential declarations such as
//! `class C<T> : B<C<T>>`.

use crate::node::{NullableAnnotation, TypeFlags, TypeKind, TypeNode, TypeParamNode};
use crate::substitute::Substitution;
use crate::{MemberId, MemberNode, TypeId, TypeParamId};
use cedar_common::{Atom, Interner};
use dashmap::DashMap;
use rustc_hash::FxHashSet;
use std::sync::RwLock;
use tracing::trace;

/// Intern key for structural and constructed type nodes.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
enum ConstructedKey {
    /// Generic instantiation of a named definition, with optional tuple
    /// element names.
    Named(TypeId, Vec<TypeId>, NullableAnnotation, Option<Vec<Atom>>),
    Array(TypeId),
    Pointer(TypeId),
    Nullable(TypeId),
    /// Parameters then return type.
    FunctionPointer(Vec<TypeId>),
    /// A type parameter used as a type.
    Param(TypeParamId, NullableAnnotation),
}

/// Root types every graph shares.
#[derive(Copy, Clone, Debug)]
pub struct WellKnown {
    /// The root object type.
    pub object: TypeId,
    /// Base of all value types.
    pub value_root: TypeId,
    /// Base of all enum types.
    pub enum_root: TypeId,
    /// Base of all array types.
    pub array_root: TypeId,
    /// Base of all delegate types.
    pub delegate_root: TypeId,
    /// The error type; passes through resolution unchanged.
    pub error: TypeId,
    /// The dynamic type; identical to `object` under `IGNORE_DYNAMIC`.
    pub dynamic: TypeId,
    /// The `void` type; never a valid type argument.
    pub void_type: TypeId,
}

/// The symbol graph.
pub struct SymbolStore {
    pub interner: Interner,
    types: RwLock<Vec<TypeNode>>,
    params: RwLock<Vec<TypeParamNode>>,
    members: RwLock<Vec<MemberNode>>,
    constructed: DashMap<ConstructedKey, TypeId>,
    well_known: WellKnown,
}

impl SymbolStore {
    pub fn new() -> Self {
        let mut store = Self {
            interner: Interner::new(),
            types: RwLock::new(Vec::new()),
            params: RwLock::new(Vec::new()),
            members: RwLock::new(Vec::new()),
            constructed: DashMap::new(),
            well_known: WellKnown {
                object: TypeId(0),
                value_root: TypeId(0),
                enum_root: TypeId(0),
                array_root: TypeId(0),
                delegate_root: TypeId(0),
                error: TypeId(0),
                dynamic: TypeId(0),
                void_type: TypeId(0),
            },
        };

        let object = store.alloc_definition(TypeKind::Class, "object");
        let value_root = store.alloc_definition(TypeKind::Class, "ValueType");
        let enum_root = store.alloc_definition(TypeKind::Class, "Enum");
        let array_root = store.alloc_definition(TypeKind::Class, "Array");
        let delegate_root = store.alloc_definition(TypeKind::Class, "Delegate");
        let error = store.alloc_definition(TypeKind::Error, "<error>");
        let dynamic = store.alloc_definition(TypeKind::Dynamic, "dynamic");
        let void_type = store.alloc_definition(TypeKind::Struct, "void");

        store.update_type(value_root, |n| n.base_type = Some(object));
        store.update_type(enum_root, |n| n.base_type = Some(value_root));
        store.update_type(array_root, |n| n.base_type = Some(object));
        store.update_type(delegate_root, |n| n.base_type = Some(object));
        store.update_type(object, |n| n.flags |= TypeFlags::HAS_PARAMETERLESS_CTOR);

        store.well_known = WellKnown {
            object,
            value_root,
            enum_root,
            array_root,
            delegate_root,
            error,
            dynamic,
            void_type,
        };
        store
    }

    pub fn well_known(&self) -> WellKnown {
        self.well_known
    }

    // -----------------------------------------------------------------------
    // Node access
    // -----------------------------------------------------------------------

    pub fn ty(&self, id: TypeId) -> TypeNode {
        let types = self.types.read().unwrap_or_else(|e| e.into_inner());
        types[id.0 as usize].clone()
    }

    pub fn kind(&self, id: TypeId) -> TypeKind {
        let types = self.types.read().unwrap_or_else(|e| e.into_inner());
        types[id.0 as usize].kind
    }

    pub fn original(&self, id: TypeId) -> TypeId {
        let types = self.types.read().unwrap_or_else(|e| e.into_inner());
        types[id.0 as usize].original
    }

    pub fn param(&self, id: TypeParamId) -> TypeParamNode {
        let params = self.params.read().unwrap_or_else(|e| e.into_inner());
        params[id.0 as usize].clone()
    }

    pub fn member(&self, id: MemberId) -> MemberNode {
        let members = self.members.read().unwrap_or_else(|e| e.into_inner());
        members[id.0 as usize].clone()
    }

    pub fn type_name(&self, id: TypeId) -> String {
        self.interner.resolve(self.ty(id).name)
    }

    // -----------------------------------------------------------------------
    // Allocation (used by GraphBuilder)
    // -----------------------------------------------------------------------

    pub(crate) fn alloc_definition(&self, kind: TypeKind, name: &str) -> TypeId {
        let name = self.interner.intern(name);
        let mut types = self.types.write().unwrap_or_else(|e| e.into_inner());
        let id = TypeId(types.len() as u32);
        types.push(TypeNode {
            kind,
            name,
            original: id,
            base_type: None,
            interfaces: Vec::new(),
            type_params: Vec::new(),
            type_args: Vec::new(),
            element: None,
            tuple_names: None,
            members: Vec::new(),
            bridges: Vec::new(),
            flags: TypeFlags::default(),
            annotation: NullableAnnotation::Oblivious,
            param: None,
        });
        id
    }

    pub(crate) fn alloc_param(&self, node: TypeParamNode) -> TypeParamId {
        let mut params = self.params.write().unwrap_or_else(|e| e.into_inner());
        let id = TypeParamId(params.len() as u32);
        params.push(node);
        id
    }

    pub(crate) fn alloc_member(&self, node: MemberNode) -> MemberId {
        let mut members = self.members.write().unwrap_or_else(|e| e.into_inner());
        let id = MemberId(members.len() as u32);
        members.push(node);
        id
    }

    pub(crate) fn update_type(&self, id: TypeId, f: impl FnOnce(&mut TypeNode)) {
        let mut types = self.types.write().unwrap_or_else(|e| e.into_inner());
        f(&mut types[id.0 as usize]);
    }

    pub(crate) fn update_param(&self, id: TypeParamId, f: impl FnOnce(&mut TypeParamNode)) {
        let mut params = self.params.write().unwrap_or_else(|e| e.into_inner());
        f(&mut params[id.0 as usize]);
    }

    pub(crate) fn update_member(&self, id: MemberId, f: impl FnOnce(&mut MemberNode)) {
        let mut members = self.members.write().unwrap_or_else(|e| e.into_inner());
        f(&mut members[id.0 as usize]);
    }

    // -----------------------------------------------------------------------
    // Constructed types (interned)
    // -----------------------------------------------------------------------

    /// Intern a node under `key`, allocating it with `build` at most once.
    fn intern(&self, key: ConstructedKey, build: impl FnOnce(TypeId) -> TypeNode) -> TypeId {
        if let Some(existing) = self.constructed.get(&key) {
            return *existing;
        }
        // The entry shard lock makes the allocation at-most-once per key.
        *self.constructed.entry(key).or_insert_with(|| {
            let mut types = self.types.write().unwrap_or_else(|e| e.into_inner());
            let id = TypeId(types.len() as u32);
            types.push(build(id));
            trace!(?id, "interned constructed type");
            id
        })
    }

    /// Construct a generic instantiation of `definition` with `args`.
    ///
    /// Two calls with equal arguments return the same id, which is what
    /// makes constructed-type identity structural.
    pub fn construct(&self, definition: TypeId, args: Vec<TypeId>) -> TypeId {
        self.construct_annotated(definition, args, NullableAnnotation::Oblivious)
    }

    pub fn construct_annotated(
        &self,
        definition: TypeId,
        args: Vec<TypeId>,
        annotation: NullableAnnotation,
    ) -> TypeId {
        self.construct_full(definition, args, annotation, None)
    }

    /// Construct a tuple instantiation carrying element names.
    pub fn construct_tuple(
        &self,
        definition: TypeId,
        args: Vec<TypeId>,
        names: Vec<Atom>,
    ) -> TypeId {
        self.construct_full(definition, args, NullableAnnotation::Oblivious, Some(names))
    }

    fn construct_full(
        &self,
        definition: TypeId,
        args: Vec<TypeId>,
        annotation: NullableAnnotation,
        tuple_names: Option<Vec<Atom>>,
    ) -> TypeId {
        let def = self.ty(definition);
        debug_assert_eq!(def.original, definition, "construct from the definition");
        debug_assert_eq!(def.type_params.len(), args.len());
        self.intern(
            ConstructedKey::Named(definition, args.clone(), annotation, tuple_names.clone()),
            |_| TypeNode {
                kind: def.kind,
                name: def.name,
                original: definition,
                base_type: None,
                interfaces: Vec::new(),
                type_params: Vec::new(),
                type_args: args,
                element: None,
                tuple_names,
                members: Vec::new(),
                bridges: Vec::new(),
                flags: def.flags,
                annotation,
                param: None,
            },
        )
    }

    pub fn array_of(&self, element: TypeId) -> TypeId {
        let name = self.interner.intern("[]");
        let array_root = self.well_known.array_root;
        self.intern(ConstructedKey::Array(element), |id| TypeNode {
            kind: TypeKind::Array,
            name,
            original: id,
            base_type: Some(array_root),
            interfaces: Vec::new(),
            type_params: Vec::new(),
            type_args: Vec::new(),
            element: Some(element),
            tuple_names: None,
            members: Vec::new(),
            bridges: Vec::new(),
            flags: TypeFlags::default(),
            annotation: NullableAnnotation::Oblivious,
            param: None,
        })
    }

    pub fn pointer_to(&self, pointee: TypeId) -> TypeId {
        let name = self.interner.intern("*");
        self.intern(ConstructedKey::Pointer(pointee), |id| TypeNode {
            kind: TypeKind::Pointer,
            name,
            original: id,
            base_type: None,
            interfaces: Vec::new(),
            type_params: Vec::new(),
            type_args: Vec::new(),
            element: Some(pointee),
            tuple_names: None,
            members: Vec::new(),
            bridges: Vec::new(),
            flags: TypeFlags::default(),
            annotation: NullableAnnotation::Oblivious,
            param: None,
        })
    }

    pub fn nullable_of(&self, underlying: TypeId) -> TypeId {
        let name = self.interner.intern("?");
        let value_root = self.well_known.value_root;
        self.intern(ConstructedKey::Nullable(underlying), |id| TypeNode {
            kind: TypeKind::Nullable,
            name,
            original: id,
            base_type: Some(value_root),
            interfaces: Vec::new(),
            type_params: Vec::new(),
            type_args: Vec::new(),
            element: Some(underlying),
            tuple_names: None,
            members: Vec::new(),
            bridges: Vec::new(),
            flags: TypeFlags::default(),
            annotation: NullableAnnotation::Oblivious,
            param: None,
        })
    }

    /// Function-pointer type; `signature` is parameters then return type.
    pub fn function_pointer(&self, signature: Vec<TypeId>) -> TypeId {
        let name = self.interner.intern("fnptr");
        self.intern(
            ConstructedKey::FunctionPointer(signature.clone()),
            |id| TypeNode {
                kind: TypeKind::FunctionPointer,
                name,
                original: id,
                base_type: None,
                interfaces: Vec::new(),
                type_params: Vec::new(),
                type_args: signature,
                element: None,
                tuple_names: None,
                members: Vec::new(),
                bridges: Vec::new(),
                flags: TypeFlags::default(),
                annotation: NullableAnnotation::Oblivious,
                param: None,
            },
        )
    }

    /// The type-node view of a type parameter.
    pub fn param_type(&self, param: TypeParamId) -> TypeId {
        self.param_type_annotated(param, NullableAnnotation::Oblivious)
    }

    pub fn param_type_annotated(
        &self,
        param: TypeParamId,
        annotation: NullableAnnotation,
    ) -> TypeId {
        let name = self.param(param).name;
        self.intern(ConstructedKey::Param(param, annotation), |id| TypeNode {
            kind: TypeKind::TypeParameter,
            name,
            original: id,
            base_type: None,
            interfaces: Vec::new(),
            type_params: Vec::new(),
            type_args: Vec::new(),
            element: None,
            tuple_names: None,
            members: Vec::new(),
            bridges: Vec::new(),
            flags: TypeFlags::default(),
            annotation,
            param: Some(param),
        })
    }

    // -----------------------------------------------------------------------
    // Substituted queries
    // -----------------------------------------------------------------------

    /// Effective base type of `id`, substituted through its instantiation.
    ///
    /// Classes without a declared base answer `object`; structs, enums,
    /// arrays, and delegates answer their respective roots.
    pub fn base_type(&self, id: TypeId) -> Option<TypeId> {
        let node = self.ty(id);
        let declared = if node.original != id {
            let def = self.ty(node.original);
            let sub = Substitution::for_type(self, id);
            def.base_type.map(|b| sub.apply(self, b))
        } else {
            node.base_type
        };
        if declared.is_some() {
            return declared;
        }
        let wk = self.well_known;
        match node.kind {
            TypeKind::Class | TypeKind::Dynamic => {
                if id == wk.object { None } else { Some(wk.object) }
            }
            TypeKind::Struct | TypeKind::Nullable => Some(wk.value_root),
            TypeKind::Enum => Some(wk.enum_root),
            TypeKind::Array => Some(wk.array_root),
            TypeKind::Delegate => Some(wk.delegate_root),
            TypeKind::Interface
            | TypeKind::Pointer
            | TypeKind::FunctionPointer
            | TypeKind::TypeParameter
            | TypeKind::Error => None,
        }
    }

    /// Declared interface list of `id`, substituted through its
    /// instantiation.
    pub fn interfaces(&self, id: TypeId) -> Vec<TypeId> {
        let node = self.ty(id);
        if node.original != id {
            let def = self.ty(node.original);
            let sub = Substitution::for_type(self, id);
            def.interfaces.iter().map(|&i| sub.apply(self, i)).collect()
        } else {
            node.interfaces
        }
    }

    /// Member list of `id` (members live on the definition).
    pub fn members_of(&self, id: TypeId) -> Vec<MemberId> {
        self.ty(self.original(id)).members
    }

    /// Bridge table of `id` (bridges live on the definition).
    pub fn bridges_of(&self, id: TypeId) -> Vec<(MemberId, MemberId)> {
        self.ty(self.original(id)).bridges
    }

    /// Parameter types of `member` as seen through the instantiation
    /// `containing`.
    pub fn member_param_types(&self, member: MemberId, containing: TypeId) -> Vec<TypeId> {
        let m = self.member(member);
        let sub = Substitution::for_type(self, containing);
        m.params.iter().map(|&p| sub.apply(self, p)).collect()
    }

    /// Return type of `member` as seen through the instantiation
    /// `containing`.
    pub fn member_return_type(&self, member: MemberId, containing: TypeId) -> TypeId {
        let m = self.member(member);
        let sub = Substitution::for_type(self, containing);
        sub.apply(self, m.return_type)
    }

    // -----------------------------------------------------------------------
    // Graph topology
    // -----------------------------------------------------------------------

    /// The base-type chain starting at `id` (inclusive), derived to root.
    ///
    /// Malformed cyclic graphs are cut at the first repeated node.
    pub fn base_chain(&self, id: TypeId) -> Vec<TypeId> {
        let mut chain = Vec::new();
        let mut seen = FxHashSet::default();
        let mut current = Some(id);
        while let Some(ty) = current {
            if !seen.insert(ty) {
                break;
            }
            chain.push(ty);
            current = self.base_type(ty);
        }
        chain
    }

    /// Interfaces declared at `id`'s own level plus their transitive base
    /// interfaces, substituted and deduplicated, in discovery order.
    pub fn declared_interface_closure(&self, id: TypeId) -> Vec<TypeId> {
        let mut closure = Vec::new();
        let mut seen = FxHashSet::default();
        let mut worklist: Vec<TypeId> = self.interfaces(id);
        worklist.reverse();
        while let Some(iface) = worklist.pop() {
            if !seen.insert(iface) {
                continue;
            }
            closure.push(iface);
            let mut bases = self.interfaces(iface);
            bases.reverse();
            worklist.extend(bases);
        }
        closure
    }

    /// Every interface `id` implements, across the whole base chain.
    pub fn all_interfaces(&self, id: TypeId) -> Vec<TypeId> {
        let mut closure = Vec::new();
        let mut seen = FxHashSet::default();
        for level in self.base_chain(id) {
            for iface in self.declared_interface_closure(level) {
                if seen.insert(iface) {
                    closure.push(iface);
                }
            }
        }
        closure
    }

    /// True if interface `sub` transitively extends interface `sup`.
    pub fn is_sub_interface_of(&self, sub: TypeId, sup: TypeId) -> bool {
        sub != sup && self.declared_interface_closure(sub).contains(&sup)
    }

    /// True if `ty` implements `iface` anywhere in its hierarchy.
    pub fn implements_interface(&self, ty: TypeId, iface: TypeId) -> bool {
        self.all_interfaces(ty).contains(&iface)
    }
}

impl Default for SymbolStore {
    fn default() -> Self {
        Self::new()
    }
}
