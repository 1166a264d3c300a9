//! Node definitions for the symbol graph.
//!
//! A [`TypeNode`] is one node in the type graph; its [`TypeKind`] is a
//! closed enum matched exhaustively everywhere in the relation core.
//! [`TypeParamNode`] carries a type parameter's declared constraints;
//! [`MemberNode`] carries a member's signature and its explicit
//! implementation slots.

use crate::{MemberId, TypeId, TypeParamId};
use bitflags::bitflags;
use cedar_common::Atom;
use smallvec::SmallVec;

/// Kind of a type node. Closed set; no default arm anywhere.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    Array,
    Pointer,
    FunctionPointer,
    TypeParameter,
    Error,
    Dynamic,
    /// Nullable value-type wrapper around its element type.
    Nullable,
}

impl TypeKind {
    /// Reference types for conversion purposes.
    pub fn is_reference(self) -> bool {
        matches!(
            self,
            Self::Class | Self::Interface | Self::Delegate | Self::Array | Self::Dynamic
        )
    }

    /// Value types, including the nullable wrapper.
    pub fn is_value(self) -> bool {
        matches!(self, Self::Struct | Self::Enum | Self::Nullable)
    }
}

bitflags! {
    /// Declaration-level facts about a type node.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct TypeFlags: u16 {
        /// Loaded from metadata rather than declared in source. Signature
        /// comparison against such types uses the loose CLR mode.
        const FROM_METADATA = 1 << 0;
        const ABSTRACT = 1 << 1;
        const SEALED = 1 << 2;
        const STATIC = 1 << 3;
        /// Has an accessible parameterless instance constructor.
        const HAS_PARAMETERLESS_CTOR = 1 << 4;
        /// Declares or inherits required members.
        const HAS_REQUIRED_MEMBERS = 1 << 5;
        /// The parameterless constructor discharges all required-member
        /// obligations itself.
        const CTOR_SATISFIES_REQUIRED = 1 << 6;
    }
}

bitflags! {
    /// Declared constraint-kind flags of a type parameter. Each flag is
    /// independently settable; conflicts are diagnosed during bounds
    /// resolution, not here.
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct ConstraintFlags: u8 {
        const REFERENCE_TYPE = 1 << 0;
        const VALUE_TYPE = 1 << 1;
        const UNMANAGED = 1 << 2;
        const NOT_NULL = 1 << 3;
        const CONSTRUCTOR = 1 << 4;
    }
}

/// Reference-type nullability annotation on a type use.
///
/// `Oblivious` compares equal to anything under the ignore mode and to
/// itself otherwise.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum NullableAnnotation {
    #[default]
    Oblivious,
    Annotated,
    NotAnnotated,
}

/// A node in the type graph.
///
/// Exactly one node per declaration is the original definition
/// (`original == own id`, `type_args` empty); every other node with the
/// same `original` is a substitution of it and is compared through it.
#[derive(Clone, Debug)]
pub struct TypeNode {
    pub kind: TypeKind,
    pub name: Atom,
    /// The unsubstituted declaration this node instantiates; self for
    /// definitions and for structural nodes (arrays, pointers, ...).
    pub original: TypeId,
    /// Declared base type of the definition. Constructed instances answer
    /// base-type queries through substitution, not through this field.
    pub base_type: Option<TypeId>,
    /// Declared interface list of the definition.
    pub interfaces: Vec<TypeId>,
    pub type_params: Vec<TypeParamId>,
    /// Type arguments when this node was constructed from a generic
    /// definition; empty otherwise.
    pub type_args: Vec<TypeId>,
    /// Array element, pointer pointee, or nullable underlying type.
    /// For function pointers, the signature lives in `type_args`
    /// (parameters then return type).
    pub element: Option<TypeId>,
    /// Element names when this instantiation is a named tuple.
    pub tuple_names: Option<Vec<Atom>>,
    pub members: Vec<MemberId>,
    /// Emit-time bridge bodies: interface member -> synthesized body
    /// declared at this level.
    pub bridges: Vec<(MemberId, MemberId)>,
    pub flags: TypeFlags,
    pub annotation: NullableAnnotation,
    /// Backing parameter when `kind == TypeParameter`.
    pub param: Option<TypeParamId>,
}

/// Which generic declaration owns a type parameter.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum GenericDeclId {
    Type(TypeId),
    Method(MemberId),
}

/// A type parameter declaration.
///
/// Declared data only; resolved bounds are computed lazily by the relation
/// core and cached outside this node.
#[derive(Clone, Debug)]
pub struct TypeParamNode {
    pub name: Atom,
    pub owner: GenericDeclId,
    /// Ordinal within the owner's parameter list.
    pub index: u16,
    pub flags: ConstraintFlags,
    /// Declared constraint types, in declaration order. May reference
    /// other type parameters, including cyclically.
    pub constraint_types: Vec<TypeId>,
}

/// Kind of a member node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MemberKind {
    Method,
    Field,
    Property,
    Event,
    Getter,
    Setter,
    Adder,
    Remover,
}

impl MemberKind {
    /// Accessor kinds tie back to an associated property or event.
    pub fn is_accessor(self) -> bool {
        matches!(self, Self::Getter | Self::Setter | Self::Adder | Self::Remover)
    }

    pub fn has_accessors(self) -> bool {
        matches!(self, Self::Property | Self::Event)
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Accessibility {
    Public,
    Internal,
    Protected,
    Private,
}

/// By-value or by-reference returns.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
pub enum RefKind {
    #[default]
    Value,
    Ref,
    RefReadonly,
}

bitflags! {
    #[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Default)]
    pub struct MemberFlags: u16 {
        const STATIC = 1 << 0;
        const ABSTRACT = 1 << 1;
        const VIRTUAL = 1 << 2;
        /// Interface members with a body are default implementations.
        const HAS_BODY = 1 << 3;
        /// `init`-only setter.
        const INIT_ONLY = 1 << 4;
    }
}

/// A member of a type: method, field, property/event, or accessor.
#[derive(Clone, Debug)]
pub struct MemberNode {
    pub kind: MemberKind,
    pub name: Atom,
    pub containing: TypeId,
    pub accessibility: Accessibility,
    pub flags: MemberFlags,
    pub ref_kind: RefKind,
    /// Parameter types in the containing definition's terms.
    pub params: Vec<TypeId>,
    /// Return type; field type for fields, value type for properties.
    pub return_type: TypeId,
    /// Generic method parameters.
    pub type_params: Vec<TypeParamId>,
    /// Interface members this member explicitly implements, with the
    /// interface instantiation each was named through.
    pub explicit_impls: SmallVec<[(TypeId, MemberId); 1]>,
    /// Accessor -> owning property/event.
    pub associated: Option<MemberId>,
    /// Property/event -> accessors.
    pub accessors: SmallVec<[MemberId; 2]>,
}

impl MemberNode {
    pub fn is_static(&self) -> bool {
        self.flags.contains(MemberFlags::STATIC)
    }

    pub fn is_abstract(&self) -> bool {
        self.flags.contains(MemberFlags::ABSTRACT)
    }

    pub fn has_body(&self) -> bool {
        self.flags.contains(MemberFlags::HAS_BODY)
    }
}
