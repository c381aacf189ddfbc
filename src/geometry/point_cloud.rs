//! Validated input point clouds.
//!
//! A [`PointCloud`] is an immutable, row-major block of `n × dim` finite
//! coordinates. Construction is the only place input shape is checked, so
//! the distance store and everything after it can index freely.

use num_traits::ToPrimitive;

use crate::persistence_error::PersistenceError;

/// Ordered set of fixed-dimension real points, identified by 0-based index.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(try_from = "RawPointCloud")]
pub struct PointCloud {
    dim: usize,
    coords: Vec<f64>,
}

/// Unchecked serialized form; read back through [`PointCloud::from_flat`].
#[derive(serde::Deserialize)]
struct RawPointCloud {
    dim: usize,
    coords: Vec<f64>,
}

impl TryFrom<RawPointCloud> for PointCloud {
    type Error = PersistenceError;

    fn try_from(raw: RawPointCloud) -> Result<Self, Self::Error> {
        PointCloud::from_flat(raw.dim, raw.coords)
    }
}

impl PointCloud {
    /// Build from rows of any numeric type convertible to `f64`.
    ///
    /// # Errors
    /// * [`PersistenceError::EmptyPointCloud`] if there are no rows.
    /// * [`PersistenceError::ZeroDimensionalPoints`] if the first row is empty.
    /// * [`PersistenceError::DimensionMismatch`] if row lengths differ.
    /// * [`PersistenceError::NonFiniteCoordinate`] for NaN/infinite values.
    pub fn from_rows<R, T>(rows: impl IntoIterator<Item = R>) -> Result<Self, PersistenceError>
    where
        R: AsRef<[T]>,
        T: ToPrimitive,
    {
        let mut dim = None;
        let mut coords = Vec::new();
        for (point, row) in rows.into_iter().enumerate() {
            let row = row.as_ref();
            let expected = *dim.get_or_insert(row.len());
            if expected == 0 {
                return Err(PersistenceError::ZeroDimensionalPoints);
            }
            if row.len() != expected {
                return Err(PersistenceError::DimensionMismatch {
                    point,
                    expected,
                    found: row.len(),
                });
            }
            for (axis, x) in row.iter().enumerate() {
                match x.to_f64() {
                    Some(x) if x.is_finite() => coords.push(x),
                    _ => return Err(PersistenceError::NonFiniteCoordinate { point, axis }),
                }
            }
        }
        match dim {
            None => Err(PersistenceError::EmptyPointCloud),
            Some(dim) => Ok(Self { dim, coords }),
        }
    }

    /// Build from a flat row-major buffer of `dim`-sized points.
    pub fn from_flat(dim: usize, coords: Vec<f64>) -> Result<Self, PersistenceError> {
        if coords.is_empty() {
            return Err(PersistenceError::EmptyPointCloud);
        }
        if dim == 0 {
            return Err(PersistenceError::ZeroDimensionalPoints);
        }
        if coords.len() % dim != 0 {
            return Err(PersistenceError::DimensionMismatch {
                point: coords.len() / dim,
                expected: dim,
                found: coords.len() % dim,
            });
        }
        if let Some(pos) = coords.iter().position(|x| !x.is_finite()) {
            return Err(PersistenceError::NonFiniteCoordinate {
                point: pos / dim,
                axis: pos % dim,
            });
        }
        Ok(Self { dim, coords })
    }

    /// Points set to `true` in a row-major pixel mask, mapped onto the box
    /// `[min_x, max_x] × [min_y, max_y]` with image rows running top to bottom.
    pub fn from_pixel_mask(
        mask: &[Vec<bool>],
        (min_x, min_y): (f64, f64),
        (max_x, max_y): (f64, f64),
    ) -> Result<Self, PersistenceError> {
        let rows = mask.len();
        let cols = mask.first().map_or(0, Vec::len);
        let step = |lo: f64, hi: f64, n: usize, k: usize| {
            if n > 1 {
                lo + (hi - lo) * k as f64 / (n - 1) as f64
            } else {
                lo
            }
        };
        let mut points = Vec::new();
        for (j, row) in mask.iter().enumerate() {
            if row.len() != cols {
                return Err(PersistenceError::DimensionMismatch {
                    point: j,
                    expected: cols,
                    found: row.len(),
                });
            }
            for (i, &on) in row.iter().enumerate() {
                if on {
                    points.push([step(min_x, max_x, cols, i), -step(min_y, max_y, rows, j)]);
                }
            }
        }
        Self::from_rows(points)
    }

    /// Number of points.
    #[inline]
    pub fn len(&self) -> usize {
        self.coords.len() / self.dim
    }

    /// Always `false`; construction rejects empty clouds.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Ambient dimension of every point.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Coordinates of point `i`.
    ///
    /// # Panics
    /// Panics if `i >= len()`.
    #[inline]
    pub fn point(&self, i: usize) -> &[f64] {
        &self.coords[i * self.dim..(i + 1) * self.dim]
    }

    /// Iterator over all points in index order.
    pub fn iter(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.coords.chunks_exact(self.dim)
    }
}
