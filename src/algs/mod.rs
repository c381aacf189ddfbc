//! Re-export public algorithms.

pub mod chain;
pub mod diagram;
pub mod features;
pub mod network;
pub mod persistence;
pub mod pipeline;
pub mod simplex_map;
pub mod wire;

pub use chain::Chain;
pub use diagram::{Bar, PersistenceDiagram, PersistencePair};
pub use features::{FeatureOptions, FeatureReport, extract_features};
pub use network::{CycleNetwork, NetworkOptions, NodeTag};
pub use persistence::{DynamicPersistence, Sign, SimplexState, pair_simplices};
pub use pipeline::{PersistenceRun, Pipeline, StageTimings, compute_persistence};
pub use simplex_map::SimplexMap;
