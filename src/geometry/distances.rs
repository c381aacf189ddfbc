//! Distance store: pairwise distances over point indices.
//!
//! Two implementations of [`Distances`] are provided:
//! - [`PairwiseDistances`] evaluates the metric on demand from the point
//!   cloud (no storage, `O(dim)` per query).
//! - [`ExplicitDistances`] materialises the strict upper triangle once
//!   (`n(n-1)/2` values, `O(1)` per query). This is what the Rips generator
//!   normally reads.
//!
//! With the `rayon` feature, [`ExplicitDistances::build`] fills rows in
//! parallel; rows are disjoint so the only synchronisation is the final
//! concatenation.

use crate::geometry::metric::{Euclidean, Metric};
use crate::geometry::point_cloud::PointCloud;
use crate::persistence_error::PersistenceError;

/// Symmetric, zero-diagonal distance oracle over `0..len()`.
pub trait Distances: Sync {
    /// Number of points.
    fn len(&self) -> usize;

    /// Distance between points `i` and `j`.
    ///
    /// # Panics
    /// May panic if `i` or `j` is out of range; see [`Distances::try_distance`].
    fn distance(&self, i: usize, j: usize) -> f64;

    /// `true` if there are no points.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Range-checked [`Distances::distance`].
    fn try_distance(&self, i: usize, j: usize) -> Result<f64, PersistenceError> {
        let len = self.len();
        for v in [i, j] {
            if v >= len {
                return Err(PersistenceError::VertexOutOfRange { vertex: v, len });
            }
        }
        Ok(self.distance(i, j))
    }
}

impl<D: Distances + ?Sized> Distances for &D {
    #[inline]
    fn len(&self) -> usize {
        (**self).len()
    }
    #[inline]
    fn distance(&self, i: usize, j: usize) -> f64 {
        (**self).distance(i, j)
    }
}

/// Lazily evaluated distances straight from a point cloud.
#[derive(Clone, Copy, Debug)]
pub struct PairwiseDistances<'a, M = Euclidean> {
    points: &'a PointCloud,
    metric: M,
}

impl<'a> PairwiseDistances<'a, Euclidean> {
    /// Euclidean distances over `points`.
    pub fn euclidean(points: &'a PointCloud) -> Self {
        Self::new(points, Euclidean)
    }
}

impl<'a, M: Metric> PairwiseDistances<'a, M> {
    pub fn new(points: &'a PointCloud, metric: M) -> Self {
        Self { points, metric }
    }

    /// The underlying cloud.
    pub fn points(&self) -> &'a PointCloud {
        self.points
    }
}

impl<M: Metric> Distances for PairwiseDistances<'_, M> {
    #[inline]
    fn len(&self) -> usize {
        self.points.len()
    }

    #[inline]
    fn distance(&self, i: usize, j: usize) -> f64 {
        if i == j {
            return 0.0;
        }
        self.metric.distance(self.points.point(i), self.points.point(j))
    }
}

/// Materialised strict upper triangle of the distance matrix.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawExplicitDistances")]
pub struct ExplicitDistances {
    n: usize,
    /// Row-major strict upper triangle: `(0,1), (0,2), …, (1,2), …`.
    upper: Vec<f64>,
}

#[derive(serde::Deserialize)]
struct RawExplicitDistances {
    n: usize,
    upper: Vec<f64>,
}

impl TryFrom<RawExplicitDistances> for ExplicitDistances {
    type Error = PersistenceError;

    fn try_from(raw: RawExplicitDistances) -> Result<Self, Self::Error> {
        ExplicitDistances::from_condensed(raw.n, raw.upper)
    }
}

impl ExplicitDistances {
    /// Cache every pairwise distance of `source`.
    ///
    /// # Errors
    /// [`PersistenceError::EmptyPointCloud`] if `source` has no points;
    /// [`PersistenceError::InvalidDistance`] if any value is negative or NaN.
    pub fn build<D: Distances>(source: &D) -> Result<Self, PersistenceError> {
        let n = source.len();
        if n == 0 {
            return Err(PersistenceError::EmptyPointCloud);
        }

        let row = |i: usize| -> Vec<f64> { (i + 1..n).map(|j| source.distance(i, j)).collect() };

        #[cfg(feature = "rayon")]
        let rows: Vec<Vec<f64>> = {
            use rayon::prelude::*;
            (0..n).into_par_iter().map(row).collect()
        };
        #[cfg(not(feature = "rayon"))]
        let rows: Vec<Vec<f64>> = (0..n).map(row).collect();

        let mut upper = Vec::with_capacity(n * (n - 1) / 2);
        let mut coincident = 0usize;
        for (i, r) in rows.into_iter().enumerate() {
            for (k, &value) in r.iter().enumerate() {
                if value.is_nan() || value < 0.0 {
                    return Err(PersistenceError::InvalidDistance {
                        i,
                        j: i + 1 + k,
                        value,
                    });
                }
                if value == 0.0 {
                    coincident += 1;
                }
            }
            upper.extend(r);
        }
        if coincident > 0 {
            log::warn!("{coincident} pair(s) of distinct points are at distance 0");
        }
        Ok(Self { n, upper })
    }

    /// One-shot distance store for `points` under `metric`.
    pub fn from_points<M: Metric>(points: &PointCloud, metric: M) -> Result<Self, PersistenceError> {
        Self::build(&PairwiseDistances::new(points, metric))
    }

    /// Adopt a caller-supplied square matrix.
    ///
    /// The matrix must be square with a zero diagonal, non-negative entries,
    /// and symmetric up to a relative tolerance of `1e-9`. The upper
    /// triangle is kept.
    pub fn from_matrix<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, PersistenceError> {
        let n = rows.len();
        if n == 0 {
            return Err(PersistenceError::EmptyPointCloud);
        }
        for (i, r) in rows.iter().enumerate() {
            let r = r.as_ref();
            if r.len() != n {
                return Err(PersistenceError::DimensionMismatch {
                    point: i,
                    expected: n,
                    found: r.len(),
                });
            }
            if r[i] != 0.0 {
                return Err(PersistenceError::InvalidDistance { i, j: i, value: r[i] });
            }
        }
        let mut upper = Vec::with_capacity(n * (n - 1) / 2);
        for i in 0..n {
            for j in i + 1..n {
                let a = rows[i].as_ref()[j];
                let b = rows[j].as_ref()[i];
                if a.is_nan() || a < 0.0 {
                    return Err(PersistenceError::InvalidDistance { i, j, value: a });
                }
                if (a - b).abs() > 1e-9 * a.abs().max(b.abs()).max(1.0) {
                    return Err(PersistenceError::InvalidDistance { i: j, j: i, value: b });
                }
                upper.push(a);
            }
        }
        Ok(Self { n, upper })
    }

    /// Adopt a strict upper triangle laid out row-major, as [`Self::build`] stores it.
    ///
    /// # Errors
    /// * [`PersistenceError::EmptyPointCloud`] if `n == 0`.
    /// * [`PersistenceError::DistanceCount`] unless `upper.len() == n(n-1)/2`.
    /// * [`PersistenceError::InvalidDistance`] for a negative or NaN entry.
    pub fn from_condensed(n: usize, upper: Vec<f64>) -> Result<Self, PersistenceError> {
        if n == 0 {
            return Err(PersistenceError::EmptyPointCloud);
        }
        let expected = n * (n - 1) / 2;
        if upper.len() != expected {
            return Err(PersistenceError::DistanceCount {
                points: n,
                expected,
                found: upper.len(),
            });
        }
        let d = Self { n, upper };
        for i in 0..n {
            for j in i + 1..n {
                let value = d.upper[d.offset(i, j)];
                if value.is_nan() || value < 0.0 {
                    return Err(PersistenceError::InvalidDistance { i, j, value });
                }
            }
        }
        Ok(d)
    }

    #[inline]
    fn offset(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < j && j < self.n);
        i * self.n - i * (i + 1) / 2 + (j - i - 1)
    }

    /// Largest pairwise distance (0 for a single point).
    pub fn max_distance(&self) -> f64 {
        self.upper.iter().copied().fold(0.0, f64::max)
    }

    /// Full row `i`, including the zero diagonal.
    pub fn row(&self, i: usize) -> Vec<f64> {
        (0..self.n).map(|j| self.distance(i, j)).collect()
    }
}

impl Distances for ExplicitDistances {
    #[inline]
    fn len(&self) -> usize {
        self.n
    }

    #[inline]
    fn distance(&self, i: usize, j: usize) -> f64 {
        match i.cmp(&j) {
            std::cmp::Ordering::Equal => 0.0,
            std::cmp::Ordering::Less => self.upper[self.offset(i, j)],
            std::cmp::Ordering::Greater => self.upper[self.offset(j, i)],
        }
    }
}
