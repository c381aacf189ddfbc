//! Top-level module for simplicial topology.
//!
//! This module provides the combinatorial side of the crate:
//! - [`VertexId`] and [`Simplex`], the identifiers everything else is keyed by
//! - [`Filtration`], an ordered simplex sequence with face-closure checks
//! - [`RipsComplex`], which expands a distance store into a Rips filtration
//!
//! Most users go through [`RipsComplex::filtration`] and hand the result to
//! [`crate::algs::persistence::pair_simplices`].

pub mod cache;
pub mod filtration;
pub mod rips;
pub mod simplex;
pub mod vertex;

pub use cache::InvalidateCache;
pub use filtration::{Filtration, FiltrationEntry, filtration_order};
pub use rips::{RipsComplex, RipsConfig, RipsSimplices};
pub use simplex::Simplex;
pub use vertex::VertexId;
