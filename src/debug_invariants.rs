//! Self-checks for filtrations and pairings.
//!
//! The checks walk the whole structure, so they run only in debug builds or
//! with the `strict-invariants` / `check-invariants` features. Callers that
//! want the result unconditionally use [`DebugInvariants::validate_invariants`].

use crate::persistence_error::PersistenceError;

/// `true` when [`debug_invariants!`](crate::debug_invariants) checks are compiled in.
pub const INVARIANTS_ENABLED: bool = cfg!(any(
    debug_assertions,
    feature = "strict-invariants",
    feature = "check-invariants"
));

/// Structural checks on a finished filtration or pairing.
pub trait DebugInvariants {
    /// Panic on a broken invariant when [`INVARIANTS_ENABLED`]; no-op otherwise.
    fn debug_assert_invariants(&self);
    /// Return the first broken invariant, always.
    fn validate_invariants(&self) -> Result<(), PersistenceError>;
}

/// Run a fallible check and panic with the given context when it fails and
/// invariant checking is enabled.
#[macro_export]
macro_rules! debug_invariants {
    ($expr:expr, $($ctx:tt)*) => {
        if $crate::debug_invariants::INVARIANTS_ENABLED {
            if let Err(e) = $expr {
                panic!(concat!("[invariants] ", $($ctx)*, ": {}"), e);
            }
        }
    };
}
