#![cfg_attr(docsrs, feature(doc_cfg))]
//! # rips-persistence
//!
//! rips-persistence computes persistent homology over `Z/2` for finite point
//! clouds. It builds the Vietoris–Rips filtration of the cloud up to a chosen
//! scale and simplex dimension, pairs every simplex with a single incremental
//! boundary reduction, and reports birth/death pairs together with a
//! representative cycle and the chain that bounds it.
//!
//! ## Features
//! - Validated point clouds and pluggable metrics (Euclidean by default, any closure)
//! - Lazy and materialised distance stores
//! - Clique-expansion Rips generation with a lazy simplex iterator
//! - Dynamic persistence with per-simplex cycle and chain tracking
//! - Persistence diagrams, barcodes, feature vectors, and cycle networks
//! - A versioned little-endian wire format for pairs
//!
//! ## Determinism
//!
//! Output depends only on the input: the filtration order is total (value,
//! then dimension, then vertex order), and parallel generation under the
//! `rayon` feature is merged before sorting. Tests fix `SmallRng` seeds.
//!
//! ## Usage
//!
//! ```
//! use rips_persistence::prelude::*;
//!
//! let points = PointCloud::from_rows([[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]])?;
//! let run = compute_persistence(&points, &RipsConfig::new(2, 1.5)?)?;
//! let loop_ = run.diagram.most_persistent(1).expect("square has a loop");
//! assert_eq!(loop_.birth, 1.0);
//! # Ok::<(), rips_persistence::persistence_error::PersistenceError>(())
//! ```
//!
//! Optional Cargo features: `rayon` (parallel distances and generation),
//! `strict-invariants` / `check-invariants` (run invariant checks in release builds).

pub mod algs;
pub mod debug_invariants;
pub mod geometry;
pub mod persistence_error;
pub mod topology;

pub use debug_invariants::DebugInvariants;
pub use persistence_error::PersistenceError;

/// A convenient prelude to import the most-used traits & types:
pub mod prelude {
    pub use crate::algs::chain::Chain;
    pub use crate::algs::diagram::{Bar, PersistenceDiagram, PersistencePair};
    pub use crate::algs::features::{FeatureOptions, FeatureReport, extract_features};
    pub use crate::algs::network::{CycleNetwork, NetworkOptions, NodeTag};
    pub use crate::algs::persistence::{DynamicPersistence, Sign, SimplexState, pair_simplices};
    pub use crate::algs::pipeline::{PersistenceRun, Pipeline, StageTimings, compute_persistence};
    pub use crate::algs::simplex_map::SimplexMap;
    pub use crate::algs::wire::{decode_pairs, encode_pairs};
    pub use crate::debug_invariants::DebugInvariants;
    pub use crate::geometry::distances::{Distances, ExplicitDistances, PairwiseDistances};
    pub use crate::geometry::metric::{Euclidean, Metric};
    pub use crate::geometry::point_cloud::PointCloud;
    pub use crate::persistence_error::{ErrorKind, PersistenceError};
    pub use crate::topology::cache::InvalidateCache;
    pub use crate::topology::filtration::{Filtration, FiltrationEntry};
    pub use crate::topology::rips::{RipsComplex, RipsConfig};
    pub use crate::topology::simplex::Simplex;
    pub use crate::topology::vertex::VertexId;
}
