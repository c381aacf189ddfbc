//! PersistenceError: Unified error type for rips-persistence public APIs
//!
//! Every fallible operation in the crate returns this error. Variants are
//! grouped by [`ErrorKind`]: bad caller input, broken filtration
//! invariants, and malformed wire data. None of them are
//! transient, so nothing here is ever retried.

use thiserror::Error;

/// Coarse classification of a [`PersistenceError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller handed in an unusable point set, scale, or simplex.
    InvalidInput,
    /// A filtration ordering or face-closure invariant does not hold.
    InvariantViolation,
    /// The reduction met a face that is not strictly before its coface.
    MalformedFiltration,
    /// A persisted record stream could not be decoded.
    Wire,
}

/// Unified error type for rips-persistence operations.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PersistenceError {
    /// A point cloud must contain at least one point.
    #[error("point cloud is empty")]
    EmptyPointCloud,
    /// Points must have at least one coordinate.
    #[error("points must have at least one coordinate")]
    ZeroDimensionalPoints,
    /// A point's coordinate count differs from the first point's.
    #[error("point {point} has {found} coordinates, expected {expected}")]
    DimensionMismatch {
        point: usize,
        expected: usize,
        found: usize,
    },
    /// A coordinate is NaN, infinite, or not representable as `f64`.
    #[error("point {point} has a non-finite coordinate on axis {axis}")]
    NonFiniteCoordinate { point: usize, axis: usize },
    /// The skeleton scale must be finite and strictly positive.
    #[error("scale must be finite and > 0, got {0}")]
    InvalidScale(f64),
    /// A simplex must be a non-empty set of distinct vertices.
    #[error("invalid simplex: {0}")]
    InvalidSimplex(String),
    /// A vertex index is outside the distance store.
    #[error("vertex {vertex} out of range for {len} points")]
    VertexOutOfRange { vertex: usize, len: usize },
    /// A metric or explicit matrix produced a negative or NaN distance.
    #[error("invalid distance d({i}, {j}) = {value}")]
    InvalidDistance { i: usize, j: usize, value: f64 },
    /// A condensed distance store holds the wrong number of entries for its point count.
    #[error("{points} points need {expected} pairwise distances, found {found}")]
    DistanceCount {
        points: usize,
        expected: usize,
        found: usize,
    },
    /// After sorting, a face occurs at or after its coface.
    #[error("filtration order violated: face at index {face} does not precede simplex at index {simplex}")]
    InvariantViolation { simplex: usize, face: usize },
    /// A face of a filtration simplex is not part of the filtration.
    #[error("simplex at index {simplex} has face {face} missing from the filtration")]
    MissingFace { simplex: usize, face: String },
    /// Index lookups and pairing require a sorted filtration.
    #[error("filtration must be sorted before it is queried or reduced")]
    UnsortedFiltration,
    /// The reduction met a face index not strictly below its coface index.
    #[error("malformed filtration: face index {face} >= coface index {simplex}")]
    MalformedFiltration { simplex: usize, face: usize },
    /// Record stream carries an unknown format version.
    #[error("wire version mismatch: expected {expected}, found {found}")]
    WireVersion { expected: u16, found: u16 },
    /// Record stream is truncated or has trailing bytes.
    #[error("wire length mismatch: expected {expected} bytes, found {found}")]
    WireLength { expected: usize, found: usize },
    /// Record stream header names a record kind we do not know.
    #[error("unknown wire record kind {0}")]
    WireKind(u16),
    /// Too many records for the 32-bit record count.
    #[error("{0} records do not fit a wire count")]
    WireCount(usize),
}

impl PersistenceError {
    /// The failure family this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        use PersistenceError::*;
        match self {
            EmptyPointCloud
            | ZeroDimensionalPoints
            | DimensionMismatch { .. }
            | NonFiniteCoordinate { .. }
            | InvalidScale(_)
            | InvalidSimplex(_)
            | VertexOutOfRange { .. }
            | InvalidDistance { .. }
            | DistanceCount { .. } => ErrorKind::InvalidInput,
            InvariantViolation { .. } | MissingFace { .. } | UnsortedFiltration => {
                ErrorKind::InvariantViolation
            }
            MalformedFiltration { .. } => ErrorKind::MalformedFiltration,
            WireVersion { .. } | WireLength { .. } | WireKind(_) | WireCount(_) => {
                ErrorKind::Wire
            }
        }
    }

    /// `true` when the caller's input was at fault.
    pub fn is_invalid_input(&self) -> bool {
        self.kind() == ErrorKind::InvalidInput
    }
}
