//! Derived-lookup invalidation for mutable topology containers.

/// A container holding a lookup derived from its contents (the simplex →
/// position index of a filtration, for instance). Mutation must drop the
/// lookup; queries that need it check [`InvalidateCache::has_valid_cache`].
pub trait InvalidateCache {
    /// Drop every derived lookup.
    fn invalidate_cache(&mut self);

    /// `true` while the derived lookup matches the contents.
    fn has_valid_cache(&self) -> bool;
}
