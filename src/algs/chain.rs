//! Mod-2 chains over filtration indices.
//!
//! A [`Chain`] is a set of filtration positions kept strictly increasing, so
//! addition over Z/2 is a linear merge (symmetric difference) and the pivot
//! ("lowest" entry in boundary-matrix terms) is the last element.

use std::fmt;

/// Sparse Z/2 chain: strictly increasing filtration indices.
#[derive(Clone, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Chain {
    indices: Vec<usize>,
}

impl Chain {
    /// The zero chain.
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// The chain containing only `i`.
    #[inline]
    pub fn singleton(i: usize) -> Self {
        Self { indices: vec![i] }
    }

    /// Chain from arbitrary indices; pairs of equal indices cancel.
    pub fn from_indices(indices: impl IntoIterator<Item = usize>) -> Self {
        let mut v: Vec<usize> = indices.into_iter().collect();
        v.sort_unstable();
        let mut out: Vec<usize> = Vec::with_capacity(v.len());
        for i in v {
            if out.last() == Some(&i) {
                out.pop();
            } else {
                out.push(i);
            }
        }
        Self { indices: out }
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    /// Largest index (the pivot row of this column), if any.
    #[inline]
    pub fn low(&self) -> Option<usize> {
        self.indices.last().copied()
    }

    #[inline]
    pub fn contains(&self, i: usize) -> bool {
        self.indices.binary_search(&i).is_ok()
    }

    #[inline]
    pub fn as_slice(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    /// `self += other` over Z/2.
    pub fn add_assign(&mut self, other: &Chain) {
        if other.is_empty() {
            return;
        }
        let a = std::mem::take(&mut self.indices);
        let b = &other.indices;
        let mut out = Vec::with_capacity(a.len() + b.len());
        let (mut i, mut j) = (0, 0);
        while i < a.len() && j < b.len() {
            match a[i].cmp(&b[j]) {
                std::cmp::Ordering::Less => {
                    out.push(a[i]);
                    i += 1;
                }
                std::cmp::Ordering::Greater => {
                    out.push(b[j]);
                    j += 1;
                }
                std::cmp::Ordering::Equal => {
                    i += 1;
                    j += 1;
                }
            }
        }
        out.extend_from_slice(&a[i..]);
        out.extend_from_slice(&b[j..]);
        self.indices = out;
    }
}

impl std::ops::AddAssign<&Chain> for Chain {
    #[inline]
    fn add_assign(&mut self, other: &Chain) {
        Chain::add_assign(self, other);
    }
}

impl fmt::Debug for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(&self.indices).finish()
    }
}

impl FromIterator<usize> for Chain {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Chain::from_indices(iter)
    }
}
