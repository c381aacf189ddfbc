//! Filtrations: totally ordered simplex sequences.
//!
//! A [`Filtration`] collects `(simplex, value)` entries, then [`Filtration::sort`]
//! fixes the order and builds the simplex → index lookup. After sorting every
//! proper face of the simplex at index `i` sits at an index `< i`; this is
//! checked, not assumed, because the reduction is only correct under it.
//!
//! Appending after a sort invalidates the lookup; the filtration must be
//! sorted again before it is queried by simplex or reduced.

use std::cmp::Ordering;

use hashbrown::HashMap;

use crate::debug_invariants::DebugInvariants;
use crate::persistence_error::PersistenceError;
use crate::topology::cache::InvalidateCache;
use crate::topology::simplex::Simplex;

/// One simplex together with its filtration value.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FiltrationEntry {
    pub simplex: Simplex,
    pub value: f64,
}

impl FiltrationEntry {
    #[inline]
    pub fn dimension(&self) -> usize {
        self.simplex.dimension()
    }
}

/// Default total order: value, then dimension, then lexicographic vertices.
///
/// Uses `f64::total_cmp`, so the order is total even for unusual values.
pub fn filtration_order(a: &FiltrationEntry, b: &FiltrationEntry) -> Ordering {
    a.value
        .total_cmp(&b.value)
        .then_with(|| a.dimension().cmp(&b.dimension()))
        .then_with(|| a.simplex.cmp(&b.simplex))
}

/// Ordered sequence of simplices with values.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
pub struct Filtration {
    entries: Vec<FiltrationEntry>,
    #[serde(skip)]
    index: Option<HashMap<Simplex, usize>>,
}

impl Filtration {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(n: usize) -> Self {
        Self {
            entries: Vec::with_capacity(n),
            index: None,
        }
    }

    /// Append `simplex` with filtration `value`. Invalidates the lookup.
    pub fn append(&mut self, simplex: Simplex, value: f64) {
        self.invalidate_cache();
        self.entries.push(FiltrationEntry { simplex, value });
    }

    /// Sort with [`filtration_order`] and validate face closure.
    pub fn sort(&mut self) -> Result<(), PersistenceError> {
        self.sort_by(filtration_order)
    }

    /// Sort with a caller comparator and validate face closure.
    ///
    /// # Errors
    /// * [`PersistenceError::InvalidSimplex`] if a simplex was appended twice.
    /// * [`PersistenceError::MissingFace`] if a face of some simplex was never appended.
    /// * [`PersistenceError::InvariantViolation`] if the comparator places a
    ///   face at or after its coface.
    pub fn sort_by<F>(&mut self, mut cmp: F) -> Result<(), PersistenceError>
    where
        F: FnMut(&FiltrationEntry, &FiltrationEntry) -> Ordering,
    {
        self.entries.sort_by(|a, b| cmp(a, b));

        let mut index = HashMap::with_capacity(self.entries.len());
        for (i, e) in self.entries.iter().enumerate() {
            if index.insert(e.simplex.clone(), i).is_some() {
                return Err(PersistenceError::InvalidSimplex(format!(
                    "{} appended more than once",
                    e.simplex
                )));
            }
        }
        self.index = Some(index);

        if let Err(e) = self.validate_invariants() {
            self.index = None;
            return Err(e);
        }
        if log::log_enabled!(log::Level::Trace) {
            for (dim, count) in self.dimension_counts().iter().enumerate() {
                log::trace!("filtration: {count} simplices of dimension {dim}");
            }
        }
        Ok(())
    }

    /// Adopt `entries` in the given order without checking face closure.
    #[cfg(test)]
    pub(crate) fn with_order_unchecked(entries: Vec<(Simplex, f64)>) -> Self {
        let entries: Vec<FiltrationEntry> = entries
            .into_iter()
            .map(|(simplex, value)| FiltrationEntry { simplex, value })
            .collect();
        let index = entries
            .iter()
            .enumerate()
            .map(|(i, e)| (e.simplex.clone(), i))
            .collect();
        Self {
            entries,
            index: Some(index),
        }
    }

    /// `true` once sorted and not appended to since.
    #[inline]
    pub fn is_sorted(&self) -> bool {
        self.has_valid_cache()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entry at filtration position `i`.
    #[inline]
    pub fn get(&self, i: usize) -> Option<&FiltrationEntry> {
        self.entries.get(i)
    }

    /// Simplex at position `i`.
    ///
    /// # Panics
    /// Panics if `i >= len()`.
    #[inline]
    pub fn simplex(&self, i: usize) -> &Simplex {
        &self.entries[i].simplex
    }

    /// Filtration value at position `i`.
    ///
    /// # Panics
    /// Panics if `i >= len()`.
    #[inline]
    pub fn value(&self, i: usize) -> f64 {
        self.entries[i].value
    }

    pub fn iter(&self) -> std::slice::Iter<'_, FiltrationEntry> {
        self.entries.iter()
    }

    /// Position of `s`, or `None` if it is not in the filtration.
    ///
    /// # Errors
    /// [`PersistenceError::UnsortedFiltration`] if not sorted.
    pub fn index_of(&self, s: &Simplex) -> Result<Option<usize>, PersistenceError> {
        let index = self
            .index
            .as_ref()
            .ok_or(PersistenceError::UnsortedFiltration)?;
        Ok(index.get(s).copied())
    }

    /// Positions of the codimension-one faces of the simplex at `i`, in
    /// [`Simplex::boundary`] order.
    ///
    /// # Errors
    /// * [`PersistenceError::UnsortedFiltration`] if not sorted.
    /// * [`PersistenceError::MissingFace`] if a face is absent.
    pub fn boundary_indices(&self, i: usize) -> Result<Vec<usize>, PersistenceError> {
        let index = self
            .index
            .as_ref()
            .ok_or(PersistenceError::UnsortedFiltration)?;
        self.entries[i]
            .simplex
            .boundary()
            .map(|face| {
                index
                    .get(&face)
                    .copied()
                    .ok_or_else(|| PersistenceError::MissingFace {
                        simplex: i,
                        face: face.to_string(),
                    })
            })
            .collect()
    }

    /// Count of simplices per dimension (`[n0, n1, …]`).
    pub fn dimension_counts(&self) -> Vec<usize> {
        let mut counts = Vec::new();
        for e in &self.entries {
            let d = e.dimension();
            if counts.len() <= d {
                counts.resize(d + 1, 0);
            }
            counts[d] += 1;
        }
        counts
    }

    /// Largest simplex dimension, or `None` if empty.
    pub fn max_dimension(&self) -> Option<usize> {
        self.entries.iter().map(FiltrationEntry::dimension).max()
    }
}

impl InvalidateCache for Filtration {
    #[inline]
    fn invalidate_cache(&mut self) {
        self.index = None;
    }

    #[inline]
    fn has_valid_cache(&self) -> bool {
        self.index.is_some()
    }
}

impl<'a> IntoIterator for &'a Filtration {
    type Item = &'a FiltrationEntry;
    type IntoIter = std::slice::Iter<'a, FiltrationEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

impl DebugInvariants for Filtration {
    fn debug_assert_invariants(&self) {
        crate::debug_invariants!(self.validate_invariants(), "Filtration");
    }

    /// Every codimension-one face is present at a smaller index and has a
    /// value no larger than its coface. Closure under all proper faces
    /// follows by induction on dimension.
    fn validate_invariants(&self) -> Result<(), PersistenceError> {
        for i in 0..self.entries.len() {
            for face in self.boundary_indices(i)? {
                if face >= i || self.entries[face].value > self.entries[i].value {
                    return Err(PersistenceError::InvariantViolation { simplex: i, face });
                }
            }
        }
        Ok(())
    }
}
