//! Persistence diagrams: birth/death pairs with representatives.
//!
//! A [`PersistenceDiagram`] is the owned, engine-independent output of a
//! reduction. It holds every finite pair and every essential class
//! (`death == None`), including zero-persistence pairs; dropping noise is a
//! consumer decision (see [`crate::algs::features`]).

use std::cmp::Ordering;

use crate::topology::simplex::Simplex;

/// One homology class.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PersistencePair {
    /// Homology dimension (dimension of the birth simplex).
    pub dimension: usize,
    pub birth: f64,
    /// `None` for an essential class.
    pub death: Option<f64>,
    /// Filtration position of the birth simplex.
    pub birth_index: usize,
    /// Filtration position of the death simplex.
    pub death_index: Option<usize>,
    /// Simplices of dimension `dimension` forming a representative cycle.
    pub cycle: Vec<Simplex>,
    /// Simplices of dimension `dimension + 1` whose boundary is `cycle`.
    /// Empty for essential classes.
    pub chain: Vec<Simplex>,
}

impl PersistencePair {
    /// Death value, `+∞` for essential classes.
    #[inline]
    pub fn death_value(&self) -> f64 {
        self.death.unwrap_or(f64::INFINITY)
    }

    /// `death - birth`, `+∞` for essential classes.
    #[inline]
    pub fn persistence(&self) -> f64 {
        self.death_value() - self.birth
    }

    #[inline]
    pub fn is_essential(&self) -> bool {
        self.death.is_none()
    }

    /// Alive at `scale`: born at or before it and not yet dead.
    #[inline]
    pub fn is_alive_at(&self, scale: f64) -> bool {
        self.birth <= scale && scale < self.death_value()
    }

    /// A finite pair missing either representative.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        !self.is_essential() && (self.cycle.is_empty() || self.chain.is_empty())
    }

    /// The `(birth, death, dimension)` bar.
    #[inline]
    pub fn bar(&self) -> Bar {
        Bar {
            birth: self.birth,
            death: self.death_value(),
            dimension: self.dimension,
        }
    }
}

/// A barcode interval. `death` is `+∞` for essential classes.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Bar {
    pub birth: f64,
    pub death: f64,
    pub dimension: usize,
}

impl Bar {
    fn order(a: &Bar, b: &Bar) -> Ordering {
        a.dimension
            .cmp(&b.dimension)
            .then_with(|| a.birth.total_cmp(&b.birth))
            .then_with(|| a.death.total_cmp(&b.death))
    }
}

/// All classes of one filtration.
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PersistenceDiagram {
    pairs: Vec<PersistencePair>,
}

impl PersistenceDiagram {
    /// Wrap pairs; order is kept as given.
    pub fn new(pairs: Vec<PersistencePair>) -> Self {
        Self { pairs }
    }

    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// All classes, finite and essential.
    pub fn pairs(&self) -> &[PersistencePair] {
        &self.pairs
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PersistencePair> {
        self.pairs.iter()
    }

    pub fn finite(&self) -> impl Iterator<Item = &PersistencePair> + '_ {
        self.pairs.iter().filter(|p| !p.is_essential())
    }

    pub fn essential(&self) -> impl Iterator<Item = &PersistencePair> + '_ {
        self.pairs.iter().filter(|p| p.is_essential())
    }

    /// Classes of homology dimension `d`.
    pub fn dimension(&self, d: usize) -> impl Iterator<Item = &PersistencePair> + '_ {
        self.pairs.iter().filter(move |p| p.dimension == d)
    }

    /// Largest homology dimension present.
    pub fn max_dimension(&self) -> Option<usize> {
        self.pairs.iter().map(|p| p.dimension).max()
    }

    /// Bars sorted by dimension, then birth, then death.
    pub fn barcode(&self) -> Vec<Bar> {
        let mut bars: Vec<Bar> = self.pairs.iter().map(PersistencePair::bar).collect();
        bars.sort_by(Bar::order);
        bars
    }

    /// Number of classes alive at `scale`, per dimension (Betti numbers of
    /// the complex truncated at `scale`).
    pub fn betti_at(&self, scale: f64) -> Vec<usize> {
        let mut betti = vec![0; self.max_dimension().map_or(0, |d| d + 1)];
        for p in self.pairs.iter().filter(|p| p.is_alive_at(scale)) {
            betti[p.dimension] += 1;
        }
        betti
    }

    /// Finite pairs with persistence at least `threshold`, as
    /// `((birth, death), cycle)`.
    pub fn persistent_cycles(&self, threshold: f64) -> Vec<((f64, f64), &[Simplex])> {
        self.finite()
            .filter(|p| p.persistence() >= threshold)
            .map(|p| ((p.birth, p.death_value()), p.cycle.as_slice()))
            .collect()
    }

    /// The pair with the largest finite persistence in dimension `d`.
    pub fn most_persistent(&self, d: usize) -> Option<&PersistencePair> {
        self.dimension(d)
            .filter(|p| !p.is_essential())
            .max_by(|a, b| a.persistence().total_cmp(&b.persistence()))
    }
}

impl<'a> IntoIterator for &'a PersistenceDiagram {
    type Item = &'a PersistencePair;
    type IntoIter = std::slice::Iter<'a, PersistencePair>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}
