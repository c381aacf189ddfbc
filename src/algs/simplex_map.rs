//! Simplex map / evaluator: from engine positions back to geometry.
//!
//! The engine speaks in filtration positions. A [`SimplexMap`] turns those
//! handles (and chains of them) into simplices, values, dimensions, and
//! vertex lists for downstream feature extraction. Lookups by position are
//! `O(1)`; lookups by simplex go through the filtration's hash index.

use crate::algs::chain::Chain;
use crate::persistence_error::PersistenceError;
use crate::topology::filtration::Filtration;
use crate::topology::simplex::Simplex;
use crate::topology::vertex::VertexId;

/// Read-only view of a sorted filtration keyed by position.
#[derive(Clone, Copy, Debug)]
pub struct SimplexMap<'f> {
    filtration: &'f Filtration,
}

impl<'f> SimplexMap<'f> {
    pub fn new(filtration: &'f Filtration) -> Self {
        Self { filtration }
    }

    pub fn len(&self) -> usize {
        self.filtration.len()
    }

    pub fn is_empty(&self) -> bool {
        self.filtration.is_empty()
    }

    /// Simplex at `handle`, if in range.
    pub fn get(&self, handle: usize) -> Option<&'f Simplex> {
        self.filtration.get(handle).map(|e| &e.simplex)
    }

    /// Simplex at `handle`.
    ///
    /// # Panics
    /// Panics if `handle` is out of range.
    pub fn simplex(&self, handle: usize) -> &'f Simplex {
        self.filtration.simplex(handle)
    }

    /// Filtration value (diameter for Rips) at `handle`.
    pub fn value(&self, handle: usize) -> f64 {
        self.filtration.value(handle)
    }

    pub fn dimension(&self, handle: usize) -> usize {
        self.simplex(handle).dimension()
    }

    /// Vertices of the simplex at `handle`, increasing.
    pub fn vertices(&self, handle: usize) -> &'f [VertexId] {
        self.simplex(handle).vertices()
    }

    /// Position of `s` in the filtration, if present.
    pub fn handle_of(&self, s: &Simplex) -> Result<Option<usize>, PersistenceError> {
        self.filtration.index_of(s)
    }

    /// Filtration value of `s`, if present.
    pub fn value_of(&self, s: &Simplex) -> Result<Option<f64>, PersistenceError> {
        Ok(self.handle_of(s)?.map(|i| self.value(i)))
    }

    /// Simplices of `chain`, in filtration order.
    pub fn resolve(&self, chain: &Chain) -> Vec<&'f Simplex> {
        chain.iter().map(|i| self.simplex(i)).collect()
    }

    /// Largest value among the simplices of `chain` (0 for the empty chain).
    pub fn chain_value(&self, chain: &Chain) -> f64 {
        chain.iter().map(|i| self.value(i)).fold(0.0, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(vs: &[u32]) -> Simplex {
        Simplex::new(vs.iter().copied()).unwrap()
    }

    fn edge() -> Filtration {
        let mut f = Filtration::new();
        f.append(s(&[0, 1]), 2.5);
        f.append(s(&[1]), 0.0);
        f.append(s(&[0]), 0.0);
        f.sort().unwrap();
        f
    }

    #[test]
    fn lookups_by_handle_and_simplex() {
        let f = edge();
        let map = SimplexMap::new(&f);
        assert_eq!(map.len(), 3);
        assert_eq!(map.simplex(2), &s(&[0, 1]));
        assert_eq!(map.value(2), 2.5);
        assert_eq!(map.dimension(2), 1);
        assert_eq!(map.vertices(2), &[VertexId::new(0), VertexId::new(1)]);
        assert_eq!(map.handle_of(&s(&[1])).unwrap(), Some(1));
        assert_eq!(map.value_of(&s(&[0, 1])).unwrap(), Some(2.5));
        assert_eq!(map.value_of(&s(&[0, 2])).unwrap(), None);
        assert!(map.get(3).is_none());
    }

    #[test]
    fn resolve_chain() {
        let f = edge();
        let map = SimplexMap::new(&f);
        let c = Chain::from_indices([2, 0]);
        assert_eq!(map.resolve(&c), vec![&s(&[0]), &s(&[0, 1])]);
        assert_eq!(map.chain_value(&c), 2.5);
    }
}
