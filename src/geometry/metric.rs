//! Metrics on point coordinates.

/// A distance function on equal-length coordinate slices.
///
/// Implementations must be symmetric, non-negative, and zero on identical
/// inputs; [`ExplicitDistances`](crate::geometry::distances::ExplicitDistances)
/// rejects negative or NaN results.
pub trait Metric: Sync {
    fn distance(&self, a: &[f64], b: &[f64]) -> f64;
}

/// Standard L2 distance. The default metric.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Euclidean;

impl Metric for Euclidean {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt()
    }
}

/// L∞ distance (maximum coordinate difference).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Chebyshev;

impl Metric for Chebyshev {
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        a.iter()
            .zip(b)
            .map(|(x, y)| (x - y).abs())
            .fold(0.0, f64::max)
    }
}

impl<F> Metric for F
where
    F: Fn(&[f64], &[f64]) -> f64 + Sync,
{
    #[inline]
    fn distance(&self, a: &[f64], b: &[f64]) -> f64 {
        self(a, b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn euclidean_3_4_5() {
        assert_eq!(Euclidean.distance(&[0.0, 0.0], &[3.0, 4.0]), 5.0);
        assert_eq!(Euclidean.distance(&[1.0], &[1.0]), 0.0);
    }

    #[test]
    fn chebyshev_takes_max_axis() {
        assert_eq!(Chebyshev.distance(&[0.0, 0.0], &[3.0, -4.0]), 4.0);
    }

    #[test]
    fn closures_are_metrics() {
        let manhattan =
            |a: &[f64], b: &[f64]| -> f64 { a.iter().zip(b).map(|(x, y)| (x - y).abs()).sum() };
        assert_eq!(manhattan.distance(&[0.0, 0.0], &[3.0, 4.0]), 7.0);
    }
}
