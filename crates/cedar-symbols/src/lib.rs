//! Symbol graph for the cedar compiler front end.
//!
//! This crate owns the read-only type graph the relation core operates on:
//!
//! - **Arena storage**: nodes are addressed by stable `u32` newtype handles
//!   (`TypeId`, `TypeParamId`, `MemberId`), never by owning references, so a
//!   mutually-referential graph needs no reference cycles.
//! - **Constructed-type interning**: a generic instantiation is allocated at
//!   most once per `(original definition, type arguments)` key, so two
//!   equivalent instantiations share a `TypeId` and id equality is
//!   structural equality for constructed types.
//! - **Lazy substitution**: constructed types keep their definition's
//!   members and declared lists; base types, interface lists, and member
//!   signatures are substituted on query.
//!
//! Nodes are immutable once a graph is fully built; the relation core's
//! caches key off the handles defined here.

pub mod node;
pub use node::{
    Accessibility, ConstraintFlags, GenericDeclId, MemberFlags, MemberKind, MemberNode,
    NullableAnnotation, RefKind, TypeFlags, TypeKind, TypeNode, TypeParamNode,
};

pub mod store;
pub use store::{SymbolStore, WellKnown};

pub mod substitute;
pub use substitute::Substitution;

pub mod builder;
pub use builder::GraphBuilder;

pub use cedar_common::{Atom, Interner};

/// Handle to a [`TypeNode`] in a [`SymbolStore`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeId(pub u32);

/// Handle to a [`TypeParamNode`] in a [`SymbolStore`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeParamId(pub u32);

/// Handle to a [`MemberNode`] in a [`SymbolStore`].
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MemberId(pub u32);
