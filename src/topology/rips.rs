//! Vietoris–Rips complex generation by clique expansion.
//!
//! [`RipsComplex`] precomputes, for each vertex, the sorted list of
//! higher-indexed vertices within `scale`. A simplex `[v0 < … < vk]` is then
//! extended only by vertices `c > vk` adjacent to every `vi`, so each clique
//! is produced exactly once and every face of an emitted simplex is itself
//! emitted. Enumeration is a depth-first walk driven by an explicit stack, so
//! [`RipsComplex::simplices`] is lazy and allocation is proportional to the
//! current search depth.
//!
//! With the `rayon` feature, [`RipsComplex::generate`] expands the cliques
//! rooted at each vertex in parallel; roots are independent and the results
//! are concatenated.

use std::cmp::Ordering;

use crate::geometry::distances::Distances;
use crate::persistence_error::PersistenceError;
use crate::topology::filtration::Filtration;
use crate::topology::simplex::Simplex;
use crate::topology::vertex::VertexId;

/// Construction parameters for a Rips filtration.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct RipsConfig {
    /// Largest simplex dimension generated (the skeleton dimension).
    pub max_dimension: usize,
    /// Largest edge length admitted; also the largest diameter generated.
    pub skeleton: f64,
}

impl Default for RipsConfig {
    fn default() -> Self {
        Self {
            max_dimension: 2,
            skeleton: 1.7,
        }
    }
}

impl RipsConfig {
    /// Validated configuration.
    ///
    /// # Errors
    /// [`PersistenceError::InvalidScale`] unless `skeleton` is finite and `> 0`.
    pub fn new(max_dimension: usize, skeleton: f64) -> Result<Self, PersistenceError> {
        let cfg = Self {
            max_dimension,
            skeleton,
        };
        cfg.validate()?;
        Ok(cfg)
    }

    /// Generate enough simplices for classes of `homology_dimension` to die.
    pub fn for_homology(homology_dimension: usize, skeleton: f64) -> Result<Self, PersistenceError> {
        Self::new(homology_dimension + 1, skeleton)
    }

    /// Check the scale; dimension needs no check since it is unsigned.
    pub fn validate(&self) -> Result<(), PersistenceError> {
        if self.skeleton.is_finite() && self.skeleton > 0.0 {
            Ok(())
        } else {
            Err(PersistenceError::InvalidScale(self.skeleton))
        }
    }
}

/// A Rips complex over a distance store, truncated at `max_dimension` and `scale`.
#[derive(Clone, Debug)]
pub struct RipsComplex<D> {
    distances: D,
    max_dimension: usize,
    scale: f64,
    /// `upper[v]`: vertices `w > v` with `d(v, w) <= scale`, increasing.
    upper: Vec<Vec<VertexId>>,
}

impl<D: Distances> RipsComplex<D> {
    /// Build the neighbourhood graph at `scale`.
    ///
    /// # Errors
    /// * [`PersistenceError::InvalidScale`] unless `scale` is finite and `> 0`.
    /// * [`PersistenceError::EmptyPointCloud`] if `distances` has no points.
    /// * [`PersistenceError::VertexOutOfRange`] if there are more than `u32::MAX` points.
    pub fn new(distances: D, max_dimension: usize, scale: f64) -> Result<Self, PersistenceError> {
        RipsConfig::new(max_dimension, scale)?;
        let n = distances.len();
        if n == 0 {
            return Err(PersistenceError::EmptyPointCloud);
        }
        VertexId::from_index(n - 1)?;

        let row = |v: usize| -> Vec<VertexId> {
            (v + 1..n)
                .filter(|&w| distances.distance(v, w) <= scale)
                .map(|w| VertexId::new(w as u32))
                .collect()
        };
        #[cfg(feature = "rayon")]
        let upper = {
            use rayon::prelude::*;
            (0..n).into_par_iter().map(row).collect()
        };
        #[cfg(not(feature = "rayon"))]
        let upper = (0..n).map(row).collect();

        Ok(Self {
            distances,
            max_dimension,
            scale,
            upper,
        })
    }

    /// Build from a validated [`RipsConfig`].
    pub fn with_config(distances: D, config: &RipsConfig) -> Result<Self, PersistenceError> {
        Self::new(distances, config.max_dimension, config.skeleton)
    }

    pub fn distances(&self) -> &D {
        &self.distances
    }

    pub fn max_dimension(&self) -> usize {
        self.max_dimension
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.upper.len()
    }

    /// Number of edges (1-simplices) at this scale.
    pub fn edge_count(&self) -> usize {
        self.upper.iter().map(Vec::len).sum()
    }

    /// Diameter of `s`: the Rips filtration value. Zero for a vertex.
    ///
    /// # Panics
    /// Panics if a vertex of `s` is out of range of the distance store.
    pub fn eval(&self, s: &Simplex) -> f64 {
        let vs = s.vertices();
        let mut diameter = 0.0f64;
        for (k, a) in vs.iter().enumerate() {
            for b in &vs[k + 1..] {
                diameter = diameter.max(self.distances.distance(a.index(), b.index()));
            }
        }
        diameter
    }

    /// Filtration comparator: diameter, then dimension, then vertex order.
    pub fn cmp(&self, a: &Simplex, b: &Simplex) -> Ordering {
        self.eval(a)
            .total_cmp(&self.eval(b))
            .then_with(|| a.dimension().cmp(&b.dimension()))
            .then_with(|| a.cmp(b))
    }

    /// `true` if `s` belongs to this complex (every edge within scale).
    pub fn contains(&self, s: &Simplex) -> bool {
        s.dimension() <= self.max_dimension
            && s.vertices().iter().all(|v| v.index() < self.vertex_count())
            && self.eval(s) <= self.scale
    }

    /// Lazily enumerate every simplex with its diameter.
    pub fn simplices(&self) -> RipsSimplices<'_, D> {
        RipsSimplices {
            rips: self,
            stack: Vec::new(),
            next_root: 0,
            end_root: self.vertex_count(),
        }
    }

    /// Lazily enumerate the simplices whose smallest vertex is `v`.
    pub fn simplices_rooted_at(&self, v: VertexId) -> RipsSimplices<'_, D> {
        let root = v.index().min(self.vertex_count());
        RipsSimplices {
            rips: self,
            stack: Vec::new(),
            next_root: root,
            end_root: (root + 1).min(self.vertex_count()),
        }
    }

    /// Append every simplex to `filtration` (unsorted).
    pub fn generate(&self, filtration: &mut Filtration) {
        #[cfg(feature = "rayon")]
        {
            use rayon::prelude::*;
            let parts: Vec<Vec<(Simplex, f64)>> = (0..self.vertex_count())
                .into_par_iter()
                .map(|v| self.simplices_rooted_at(VertexId::new(v as u32)).collect())
                .collect();
            for (s, value) in parts.into_iter().flatten() {
                filtration.append(s, value);
            }
        }
        #[cfg(not(feature = "rayon"))]
        for (s, value) in self.simplices() {
            filtration.append(s, value);
        }
    }

    /// Generate and sort: the complete Rips filtration.
    ///
    /// # Errors
    /// [`PersistenceError::InvariantViolation`] if the sorted order breaks
    /// face closure, which would indicate a generator bug.
    pub fn filtration(&self) -> Result<Filtration, PersistenceError> {
        let mut f = Filtration::new();
        self.generate(&mut f);
        f.sort()?;
        Ok(f)
    }

    fn child_candidates(&self, candidates: &[VertexId], c: VertexId) -> Vec<VertexId> {
        let adj = &self.upper[c.index()];
        let mut out = Vec::with_capacity(candidates.len().min(adj.len()));
        let (mut i, mut j) = (0, 0);
        while i < candidates.len() && j < adj.len() {
            match candidates[i].cmp(&adj[j]) {
                Ordering::Less => i += 1,
                Ordering::Greater => j += 1,
                Ordering::Equal => {
                    out.push(candidates[i]);
                    i += 1;
                    j += 1;
                }
            }
        }
        out
    }

    /// Diameter of `s ∪ {c}` given the diameter of `s`.
    fn extended_diameter(&self, s: &Simplex, diameter: f64, c: VertexId) -> f64 {
        s.vertices()
            .iter()
            .map(|v| self.distances.distance(v.index(), c.index()))
            .fold(diameter, f64::max)
    }
}

struct Frame {
    simplex: Simplex,
    diameter: f64,
    /// Vertices that may extend `simplex`: larger than its last vertex and
    /// adjacent to all of its vertices.
    candidates: Vec<VertexId>,
}

/// Lazy, deterministic depth-first enumeration of a [`RipsComplex`].
///
/// Yields `(simplex, diameter)`. The set of simplices is fixed by the input;
/// the yield order is a pre-order walk from vertex 0 upward.
pub struct RipsSimplices<'r, D> {
    rips: &'r RipsComplex<D>,
    stack: Vec<Frame>,
    next_root: usize,
    end_root: usize,
}

impl<D: Distances> Iterator for RipsSimplices<'_, D> {
    type Item = (Simplex, f64);

    fn next(&mut self) -> Option<Self::Item> {
        if self.stack.is_empty() {
            if self.next_root >= self.end_root {
                return None;
            }
            let v = VertexId::new(self.next_root as u32);
            self.next_root += 1;
            self.stack.push(Frame {
                simplex: Simplex::vertex(v),
                diameter: 0.0,
                candidates: self.rips.upper[v.index()].clone(),
            });
        }

        let Frame {
            simplex,
            diameter,
            candidates,
        } = self.stack.pop()?;

        if simplex.dimension() < self.rips.max_dimension {
            // Reverse so the smallest extension is visited first.
            for (k, &c) in candidates.iter().enumerate().rev() {
                let child_candidates = if simplex.dimension() + 1 < self.rips.max_dimension {
                    self.rips.child_candidates(&candidates[k + 1..], c)
                } else {
                    Vec::new()
                };
                self.stack.push(Frame {
                    diameter: self.rips.extended_diameter(&simplex, diameter, c),
                    simplex: simplex.extended(c),
                    candidates: child_candidates,
                });
            }
        }
        Some((simplex, diameter))
    }
}
