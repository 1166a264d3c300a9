//! Publish-once memoization for resolution results.
//!
//! Any number of threads may request bounds or implementation lookups for
//! the same symbol concurrently. The contract is compute-then-publish-once:
//! threads compute redundantly outside the map, the first publish wins, and
//! every thread observes the winning record. Races are safe because each
//! computation is a pure function of immutable graph inputs, so redundant
//! results are equal.
//!
//! Records carry the diagnostics produced during their computation; a cache
//! hit replays them, which is what makes repeated queries byte-identical.

use crate::bounds::TypeParamBounds;
use crate::diagnostics::Diagnostic;
use cedar_symbols::{MemberId, TypeId, TypeParamId};
use dashmap::DashMap;
use std::sync::Arc;
use tracing::trace;

/// A member of an interface instantiation.
///
/// Constructed types are interned, so handle equality on `containing` is
/// structural equality: two equivalent instantiations of a generic
/// interface member collide on the same key.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InterfaceMember {
    /// The interface instantiation declaring the member.
    pub containing: TypeId,
    /// The member, as declared on the interface definition.
    pub member: MemberId,
}

/// Cache key for implementation lookups.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct InterfaceMemberKey {
    pub implementing: TypeId,
    pub member: InterfaceMember,
}

/// Resolved bounds of one type parameter plus the diagnostics produced
/// while resolving them. Immutable once published.
#[derive(Clone, Debug)]
pub struct BoundsRecord {
    /// `None` is the trivial-bounds sentinel: object base, no constraint
    /// types, no interfaces.
    pub bounds: Option<Arc<TypeParamBounds>>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Resolved implementation of one interface member for one implementing
/// type, plus the diagnostics produced while resolving it. Immutable once
/// published.
#[derive(Clone, Debug)]
pub struct ImplementationRecord {
    pub member: Option<MemberId>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Per-compilation memoization for bounds and implementation lookups.
///
/// Sharded maps give per-entry locking; there is no global lock and no
/// entry is ever overwritten.
#[derive(Default)]
pub struct ResolutionCache {
    bounds: DashMap<TypeParamId, Arc<BoundsRecord>>,
    impls: DashMap<InterfaceMemberKey, Arc<ImplementationRecord>>,
}

impl ResolutionCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bounds_get(&self, param: TypeParamId) -> Option<Arc<BoundsRecord>> {
        self.bounds.get(&param).map(|r| Arc::clone(&r))
    }

    /// Publish a bounds record; returns the winning record (which is
    /// `record` unless another thread published first).
    pub fn bounds_publish(&self, param: TypeParamId, record: BoundsRecord) -> Arc<BoundsRecord> {
        let winner = self
            .bounds
            .entry(param)
            .or_insert_with(|| Arc::new(record));
        trace!(?param, "bounds record published");
        Arc::clone(&winner)
    }

    pub fn impl_get(&self, key: InterfaceMemberKey) -> Option<Arc<ImplementationRecord>> {
        self.impls.get(&key).map(|r| Arc::clone(&r))
    }

    /// Publish a final implementation record; first publish wins.
    ///
    /// Provisional answers (lookups under `ignore_default_impls` that did
    /// not reach a final state) must never be passed here.
    pub fn impl_publish(
        &self,
        key: InterfaceMemberKey,
        record: ImplementationRecord,
    ) -> Arc<ImplementationRecord> {
        let winner = self.impls.entry(key).or_insert_with(|| Arc::new(record));
        trace!(?key, "implementation record published");
        Arc::clone(&winner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_publish_wins() {
        let cache = ResolutionCache::new();
        let key = InterfaceMemberKey {
            implementing: TypeId(1),
            member: InterfaceMember {
                containing: TypeId(2),
                member: MemberId(3),
            },
        };
        let first = cache.impl_publish(
            key,
            ImplementationRecord {
                member: Some(MemberId(7)),
                diagnostics: Vec::new(),
            },
        );
        let second = cache.impl_publish(
            key,
            ImplementationRecord {
                member: None,
                diagnostics: Vec::new(),
            },
        );
        assert_eq!(first.member, Some(MemberId(7)));
        assert_eq!(second.member, Some(MemberId(7)));
    }
}
