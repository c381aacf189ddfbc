//! Geometry for rips-persistence.
//!
//! Input point clouds, metrics over their coordinates, and the distance
//! stores the Rips generator reads from.

pub mod distances;
pub mod metric;
pub mod point_cloud;

pub use distances::{Distances, ExplicitDistances, PairwiseDistances};
pub use metric::{Chebyshev, Euclidean, Metric};
pub use point_cloud::PointCloud;
