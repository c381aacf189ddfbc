//! `VertexId`: a strong, zero-cost handle for points of the input cloud
//!
//! Every point of the cloud is identified by its 0-based position. Simplices
//! store their vertices as `VertexId`s so a vertex can never be confused with
//! a filtration index, which is also a plain integer.
//!
//! This module provides:
//! - A transparent `VertexId` newtype around `u32` with the same layout as
//!   the raw integer (`Pod`, so vertex slices reinterpret as `&[u32]`).
//! - Conversions to and from `usize` with range checks.
//! - Implementations of common traits (`Debug`, `Display`, ordering,
//!   hashing) so `VertexId` can be used in maps, sets, and printed easily.

use std::fmt;

use crate::persistence_error::PersistenceError;

/// Index of a point in the input cloud.
///
/// Ordering is the numeric order of the index, which is also the
/// lexicographic tie-break used by the filtration.
#[derive(
    Copy,
    Clone,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Default,
    serde::Serialize,
    serde::Deserialize,
    bytemuck::Pod,
    bytemuck::Zeroable,
)]
#[repr(transparent)]
#[serde(transparent)]
pub struct VertexId(u32);

impl VertexId {
    /// Creates a new `VertexId` from a raw index.
    #[inline]
    pub const fn new(raw: u32) -> Self {
        VertexId(raw)
    }

    /// Converts a `usize` point index, failing if it does not fit in `u32`.
    #[inline]
    pub fn from_index(index: usize) -> Result<Self, PersistenceError> {
        u32::try_from(index)
            .map(VertexId)
            .map_err(|_| PersistenceError::VertexOutOfRange {
                vertex: index,
                len: u32::MAX as usize,
            })
    }

    /// Returns the raw `u32` value.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0
    }

    /// Returns the point index as `usize`, ready for slice indexing.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<u32> for VertexId {
    #[inline]
    fn from(raw: u32) -> Self {
        VertexId(raw)
    }
}

impl fmt::Debug for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("VertexId").field(&self.0).finish()
    }
}

/// Prints only the raw index.
impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}



#[cfg(test)]
mod serde_tests {
    use super::*;

    #[test]
    fn json_is_a_bare_integer() {
        let v = VertexId::new(123);
        let s = serde_json::to_string(&v).unwrap();
        assert_eq!(s, "123");
        let v2: VertexId = serde_json::from_str(&s).unwrap();
        assert_eq!(v2, v);
    }

    #[test]
    fn bincode_roundtrip() {
        let v = VertexId::new(456);
        let bytes = bincode::serialize(&v).unwrap();
        let v2: VertexId = bincode::deserialize(&bytes).unwrap();
        assert_eq!(v2, v);
    }
}
