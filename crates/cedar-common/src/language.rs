//! Language-level configuration.
//!
//! A small ordered enum threaded through the two compatibility checks that
//! depend on it. Everything else in the relation core is level-independent.

/// Active language level.
///
/// Levels are ordered; a feature gated at some level is available at every
/// later level.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum LanguageLevel {
    /// Oldest supported surface.
    Legacy,
    /// Adds generic-dependent unmanaged constraints.
    #[default]
    Modern,
    /// Adds implicit implementation of non-public interface members.
    Preview,
}

impl LanguageLevel {
    /// A struct whose unmanaged-ness depends on its generic fields may be
    /// used as an unmanaged-constrained argument.
    pub fn supports_unmanaged_constructed_types(self) -> bool {
        self >= Self::Modern
    }

    /// A non-public interface member may be implemented implicitly by a
    /// member with matching accessibility.
    pub fn supports_non_public_implicit_impls(self) -> bool {
        self >= Self::Preview
    }
}
