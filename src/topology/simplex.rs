//! Simplices as sorted sets of vertex ids.
//!
//! A [`Simplex`] always holds its vertices in strictly increasing order, so
//! equality of simplices is equality of vertex sets and the derived `Ord` is
//! the lexicographic vertex order used as the final filtration tie-break.

use std::fmt;

use itertools::Itertools;

use crate::persistence_error::PersistenceError;
use crate::topology::vertex::VertexId;

/// A non-empty set of distinct vertices; dimension is `len - 1`.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "Vec<VertexId>", into = "Vec<VertexId>")]
pub struct Simplex {
    vertices: Vec<VertexId>,
}

impl Simplex {
    /// Build a simplex from any vertex collection. Order does not matter.
    ///
    /// # Errors
    /// [`PersistenceError::InvalidSimplex`] if `vertices` is empty or repeats a vertex.
    pub fn new<I, V>(vertices: I) -> Result<Self, PersistenceError>
    where
        I: IntoIterator<Item = V>,
        V: Into<VertexId>,
    {
        let mut vertices: Vec<VertexId> = vertices.into_iter().map(Into::into).collect();
        if vertices.is_empty() {
            return Err(PersistenceError::InvalidSimplex("no vertices".into()));
        }
        vertices.sort_unstable();
        if let Some((a, _)) = vertices.iter().tuple_windows().find(|(a, b)| a == b) {
            return Err(PersistenceError::InvalidSimplex(format!(
                "vertex {a} appears more than once"
            )));
        }
        Ok(Self { vertices })
    }

    /// The 0-simplex on `v`.
    #[inline]
    pub fn vertex(v: impl Into<VertexId>) -> Self {
        Self {
            vertices: vec![v.into()],
        }
    }

    /// Extend by a vertex larger than every current vertex.
    #[inline]
    pub(crate) fn extended(&self, v: VertexId) -> Self {
        debug_assert!(self.vertices.last().is_some_and(|&last| last < v));
        let mut vertices = Vec::with_capacity(self.vertices.len() + 1);
        vertices.extend_from_slice(&self.vertices);
        vertices.push(v);
        Self { vertices }
    }

    /// Dimension (number of vertices minus one).
    #[inline]
    pub fn dimension(&self) -> usize {
        self.vertices.len() - 1
    }

    /// Vertices in increasing order.
    #[inline]
    pub fn vertices(&self) -> &[VertexId] {
        &self.vertices
    }

    /// Largest vertex.
    #[inline]
    pub fn last_vertex(&self) -> VertexId {
        self.vertices[self.vertices.len() - 1]
    }

    /// `true` if `v` is one of this simplex's vertices.
    #[inline]
    pub fn contains(&self, v: VertexId) -> bool {
        self.vertices.binary_search(&v).is_ok()
    }

    /// Codimension-one faces, dropping vertex 0 first. Empty for a vertex.
    ///
    /// Over mod-2 coefficients this set is exactly the boundary chain.
    pub fn boundary(&self) -> impl ExactSizeIterator<Item = Simplex> + '_ {
        let n = if self.vertices.len() > 1 {
            self.vertices.len()
        } else {
            0
        };
        (0..n).map(move |skip| {
            let face = self
                .vertices
                .iter()
                .enumerate()
                .filter(|&(i, _)| i != skip)
                .map(|(_, &v)| v)
                .collect();
            Simplex { vertices: face }
        })
    }

    /// `true` if `self` is a proper face of `other`.
    pub fn is_proper_face_of(&self, other: &Simplex) -> bool {
        self.vertices.len() < other.vertices.len()
            && self.vertices.iter().all(|&v| other.contains(v))
    }

    /// Vertices as plain `u32` indices.
    pub fn to_indices(&self) -> Vec<u32> {
        self.vertices.iter().map(|v| v.get()).collect()
    }
}

impl TryFrom<Vec<VertexId>> for Simplex {
    type Error = PersistenceError;

    fn try_from(vertices: Vec<VertexId>) -> Result<Self, Self::Error> {
        Simplex::new(vertices)
    }
}

impl From<Simplex> for Vec<VertexId> {
    fn from(s: Simplex) -> Self {
        s.vertices
    }
}

impl fmt::Debug for Simplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Simplex{}", self)
    }
}

/// Prints the vertex list, e.g. `[0, 3, 5]`.
impl fmt::Display for Simplex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.vertices.iter().join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(vs: &[u32]) -> Simplex {
        Simplex::new(vs.iter().copied()).unwrap()
    }

    #[test]
    fn new_sorts_vertices() {
        let t = s(&[4, 1, 2]);
        assert_eq!(t.to_indices(), vec![1, 2, 4]);
        assert_eq!(t.dimension(), 2);
        assert_eq!(t, s(&[1, 2, 4]));
    }

    #[test]
    fn new_rejects_empty_and_duplicates() {
        assert!(matches!(
            Simplex::new(Vec::<u32>::new()),
            Err(PersistenceError::InvalidSimplex(_))
        ));
        assert!(matches!(
            Simplex::new([1u32, 3, 1]),
            Err(PersistenceError::InvalidSimplex(_))
        ));
    }

    #[test]
    fn boundary_of_triangle_is_three_edges() {
        let faces: Vec<_> = s(&[0, 1, 2]).boundary().collect();
        assert_eq!(faces, vec![s(&[1, 2]), s(&[0, 2]), s(&[0, 1])]);
        assert_eq!(s(&[5]).boundary().count(), 0);
    }

    #[test]
    fn proper_face_relation() {
        assert!(s(&[0, 2]).is_proper_face_of(&s(&[0, 1, 2])));
        assert!(!s(&[0, 1, 2]).is_proper_face_of(&s(&[0, 1, 2])));
        assert!(!s(&[0, 3]).is_proper_face_of(&s(&[0, 1, 2])));
    }

    #[test]
    fn ordering_is_lexicographic() {
        assert!(s(&[0, 1]) < s(&[0, 2]));
        assert!(s(&[0, 1]) < s(&[0, 1, 2]));
        assert!(s(&[0, 5]) < s(&[1]));
    }

    #[test]
    fn extended_appends_larger_vertex() {
        let e = s(&[0, 2]).extended(VertexId::new(7));
        assert_eq!(e.to_indices(), vec![0, 2, 7]);
        assert_eq!(e.last_vertex(), VertexId::new(7));
    }

    #[test]
    fn serde_validates_on_read() {
        let json = serde_json::to_string(&s(&[2, 0])).unwrap();
        assert_eq!(json, "[0,2]");
        let back: Simplex = serde_json::from_str(&json).unwrap();
        assert_eq!(back, s(&[0, 2]));
        assert!(serde_json::from_str::<Simplex>("[1,1]").is_err());
        assert!(serde_json::from_str::<Simplex>("[]").is_err());
    }
}
