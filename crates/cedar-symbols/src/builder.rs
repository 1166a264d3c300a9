//! Fluent graph construction.
//!
//! `GraphBuilder` is how embedders (the binder, in a full front end) and
//! tests assemble a symbol graph. It hands out ids immediately and patches
//! declared data in place; queries stay lazy, so declaration order does not
//! matter.

use crate::node::{
    Accessibility, ConstraintFlags, GenericDeclId, MemberFlags, MemberKind, MemberNode, RefKind,
    TypeFlags, TypeKind, TypeParamNode,
};
use crate::store::SymbolStore;
use crate::{MemberId, TypeId, TypeParamId};
use smallvec::SmallVec;
use std::sync::Arc;

pub struct GraphBuilder {
    store: Arc<SymbolStore>,
}

impl GraphBuilder {
    pub fn new() -> Self {
        Self {
            store: Arc::new(SymbolStore::new()),
        }
    }

    /// Shared handle to the store under construction.
    pub fn store(&self) -> Arc<SymbolStore> {
        Arc::clone(&self.store)
    }

    // -----------------------------------------------------------------------
    // Type declarations
    // -----------------------------------------------------------------------

    pub fn class(&self, name: &str) -> TypeId {
        let id = self.store.alloc_definition(TypeKind::Class, name);
        self.store
            .update_type(id, |n| n.flags |= TypeFlags::HAS_PARAMETERLESS_CTOR);
        id
    }

    pub fn struct_(&self, name: &str) -> TypeId {
        self.store.alloc_definition(TypeKind::Struct, name)
    }

    pub fn interface(&self, name: &str) -> TypeId {
        self.store.alloc_definition(TypeKind::Interface, name)
    }

    pub fn enum_(&self, name: &str) -> TypeId {
        self.store.alloc_definition(TypeKind::Enum, name)
    }

    pub fn delegate(&self, name: &str) -> TypeId {
        self.store.alloc_definition(TypeKind::Delegate, name)
    }

    pub fn set_base(&self, ty: TypeId, base: TypeId) {
        self.store.update_type(ty, |n| n.base_type = Some(base));
    }

    pub fn add_interface(&self, ty: TypeId, iface: TypeId) {
        self.store.update_type(ty, |n| n.interfaces.push(iface));
    }

    /// Add flags to a type (ABSTRACT, SEALED, STATIC, FROM_METADATA, ...).
    pub fn mark(&self, ty: TypeId, flags: TypeFlags) {
        self.store.update_type(ty, |n| n.flags |= flags);
    }

    /// Remove flags from a type.
    pub fn unmark(&self, ty: TypeId, flags: TypeFlags) {
        self.store.update_type(ty, |n| n.flags -= flags);
    }

    pub fn set_tuple_names(&self, ty: TypeId, names: &[&str]) {
        let atoms = names.iter().map(|n| self.store.interner.intern(n)).collect();
        self.store.update_type(ty, |n| n.tuple_names = Some(atoms));
    }

    // -----------------------------------------------------------------------
    // Type parameters and constraints
    // -----------------------------------------------------------------------

    pub fn type_param_for_type(
        &self,
        owner: TypeId,
        name: &str,
        flags: ConstraintFlags,
    ) -> TypeParamId {
        let index = self.store.ty(owner).type_params.len() as u16;
        let id = self.store.alloc_param(TypeParamNode {
            name: self.store.interner.intern(name),
            owner: GenericDeclId::Type(owner),
            index,
            flags,
            constraint_types: Vec::new(),
        });
        self.store.update_type(owner, |n| n.type_params.push(id));
        id
    }

    pub fn type_param_for_method(
        &self,
        owner: MemberId,
        name: &str,
        flags: ConstraintFlags,
    ) -> TypeParamId {
        let index = self.store.member(owner).type_params.len() as u16;
        let id = self.store.alloc_param(TypeParamNode {
            name: self.store.interner.intern(name),
            owner: GenericDeclId::Method(owner),
            index,
            flags,
            constraint_types: Vec::new(),
        });
        self.store.update_member(owner, |m| m.type_params.push(id));
        id
    }

    pub fn add_constraint(&self, param: TypeParamId, constraint: TypeId) {
        self.store
            .update_param(param, |p| p.constraint_types.push(constraint));
    }

    pub fn set_constraint_flags(&self, param: TypeParamId, flags: ConstraintFlags) {
        self.store.update_param(param, |p| p.flags |= flags);
    }

    // -----------------------------------------------------------------------
    // Members
    // -----------------------------------------------------------------------

    pub fn method(&self, ty: TypeId, name: &str, params: Vec<TypeId>, ret: TypeId) -> MemberId {
        self.add_member(ty, MemberKind::Method, name, params, ret)
    }

    pub fn field(&self, ty: TypeId, name: &str, field_ty: TypeId) -> MemberId {
        self.add_member(ty, MemberKind::Field, name, Vec::new(), field_ty)
    }

    /// A property with both accessors. Returns `(property, getter, setter)`.
    pub fn property(&self, ty: TypeId, name: &str, prop_ty: TypeId) -> (MemberId, MemberId, MemberId) {
        let wk = self.store.well_known();
        let prop = self.add_member(ty, MemberKind::Property, name, Vec::new(), prop_ty);
        let getter = self.add_member(
            ty,
            MemberKind::Getter,
            &format!("get_{name}"),
            Vec::new(),
            prop_ty,
        );
        let setter = self.add_member(
            ty,
            MemberKind::Setter,
            &format!("set_{name}"),
            vec![prop_ty],
            wk.void_type,
        );
        self.link_accessor(prop, getter);
        self.link_accessor(prop, setter);
        (prop, getter, setter)
    }

    /// An event with add/remove accessors. Returns `(event, adder, remover)`.
    pub fn event(&self, ty: TypeId, name: &str, handler_ty: TypeId) -> (MemberId, MemberId, MemberId) {
        let wk = self.store.well_known();
        let event = self.add_member(ty, MemberKind::Event, name, Vec::new(), handler_ty);
        let adder = self.add_member(
            ty,
            MemberKind::Adder,
            &format!("add_{name}"),
            vec![handler_ty],
            wk.void_type,
        );
        let remover = self.add_member(
            ty,
            MemberKind::Remover,
            &format!("remove_{name}"),
            vec![handler_ty],
            wk.void_type,
        );
        self.link_accessor(event, adder);
        self.link_accessor(event, remover);
        (event, adder, remover)
    }

    fn add_member(
        &self,
        ty: TypeId,
        kind: MemberKind,
        name: &str,
        params: Vec<TypeId>,
        ret: TypeId,
    ) -> MemberId {
        let id = self.store.alloc_member(MemberNode {
            kind,
            name: self.store.interner.intern(name),
            containing: ty,
            accessibility: Accessibility::Public,
            flags: MemberFlags::default(),
            ref_kind: RefKind::Value,
            params,
            return_type: ret,
            type_params: Vec::new(),
            explicit_impls: SmallVec::new(),
            associated: None,
            accessors: SmallVec::new(),
        });
        self.store.update_type(ty, |n| n.members.push(id));
        id
    }

    fn link_accessor(&self, owner: MemberId, accessor: MemberId) {
        self.store.update_member(owner, |m| m.accessors.push(accessor));
        self.store
            .update_member(accessor, |m| m.associated = Some(owner));
    }

    pub fn set_accessibility(&self, member: MemberId, accessibility: Accessibility) {
        self.store
            .update_member(member, |m| m.accessibility = accessibility);
    }

    pub fn set_member_flags(&self, member: MemberId, flags: MemberFlags) {
        self.store.update_member(member, |m| m.flags |= flags);
    }

    pub fn set_ref_kind(&self, member: MemberId, ref_kind: RefKind) {
        self.store.update_member(member, |m| m.ref_kind = ref_kind);
    }

    /// Record that `member` explicitly implements `iface_member` of the
    /// interface instantiation `iface`.
    pub fn add_explicit_impl(&self, member: MemberId, iface: TypeId, iface_member: MemberId) {
        self.store
            .update_member(member, |m| m.explicit_impls.push((iface, iface_member)));
    }

    /// Record an emit-time bridge body for `iface_member` at `ty`'s level.
    pub fn add_bridge(&self, ty: TypeId, iface_member: MemberId, body: MemberId) {
        self.store
            .update_type(ty, |n| n.bridges.push((iface_member, body)));
    }
}

impl Default for GraphBuilder {
    fn default() -> Self {
        Self::new()
    }
}
