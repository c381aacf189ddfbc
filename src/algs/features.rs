//! Birth/death feature vectors from a persistence diagram.
//!
//! Each finite pair whose persistence clears the noise threshold contributes
//! a `(birth, death - birth)` feature. Pairs are never dropped silently: those
//! below the threshold are counted, and finite pairs missing a cycle or chain
//! representative are listed separately as degenerate whatever their
//! persistence, since a class with no geometric support usually points at a
//! bug upstream.

use crate::algs::diagram::PersistenceDiagram;

/// Knobs for [`extract_features`].
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeatureOptions {
    /// Pairs with `death - birth` below this are treated as noise.
    pub noise_threshold: f64,
    /// Restrict to one homology dimension; `None` keeps all.
    pub dimension: Option<usize>,
}

impl Default for FeatureOptions {
    fn default() -> Self {
        Self {
            noise_threshold: 0.001,
            dimension: None,
        }
    }
}

/// Output of [`extract_features`].
#[derive(Clone, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct FeatureReport {
    /// `(birth, persistence)` per kept pair, in diagram order.
    pub features: Vec<(f64, f64)>,
    /// Finite pairs skipped for persistence below the threshold.
    pub below_noise: usize,
    /// Diagram positions of finite pairs lacking a cycle or chain.
    pub degenerate: Vec<usize>,
}

impl FeatureReport {
    /// Features laid out as `[b0, p0, b1, p1, …]`.
    pub fn flatten(&self) -> Vec<f64> {
        self.features.iter().flat_map(|&(b, p)| [b, p]).collect()
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

/// Extract `(birth, persistence)` features from the finite pairs of `diagram`.
pub fn extract_features(diagram: &PersistenceDiagram, options: &FeatureOptions) -> FeatureReport {
    let mut report = FeatureReport::default();
    for (pos, pair) in diagram.iter().enumerate() {
        if pair.is_essential() || options.dimension.is_some_and(|d| d != pair.dimension) {
            continue;
        }
        if pair.is_degenerate() {
            log::warn!(
                "pair {pos} (dim {}, birth {}, death {}) has no {} representative",
                pair.dimension,
                pair.birth,
                pair.death_value(),
                if pair.cycle.is_empty() { "cycle" } else { "chain" },
            );
            report.degenerate.push(pos);
            continue;
        }
        if pair.persistence() < options.noise_threshold {
            report.below_noise += 1;
            continue;
        }
        report.features.push((pair.birth, pair.persistence()));
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algs::diagram::PersistencePair;
    use crate::topology::simplex::Simplex;

    fn pair(dimension: usize, birth: f64, death: Option<f64>) -> PersistencePair {
        PersistencePair {
            dimension,
            birth,
            death,
            birth_index: 0,
            death_index: death.map(|_| 1),
            cycle: vec![Simplex::vertex(0u32)],
            chain: vec![Simplex::new([0u32, 1]).unwrap()],
        }
    }

    #[test]
    fn noise_and_essential_are_skipped() {
        let diagram = PersistenceDiagram::new(vec![
            pair(0, 0.0, None),
            pair(0, 0.0, Some(0.0005)),
            pair(0, 0.0, Some(0.4)),
            pair(1, 0.5, Some(1.5)),
        ]);
        let report = extract_features(&diagram, &FeatureOptions::default());
        assert_eq!(report.features, vec![(0.0, 0.4), (0.5, 1.0)]);
        assert_eq!(report.below_noise, 1);
        assert!(report.degenerate.is_empty());
        assert_eq!(report.flatten(), vec![0.0, 0.4, 0.5, 1.0]);
    }

    #[test]
    fn dimension_filter() {
        let diagram = PersistenceDiagram::new(vec![
            pair(0, 0.0, Some(0.4)),
            pair(1, 0.5, Some(1.5)),
        ]);
        let opts = FeatureOptions {
            dimension: Some(1),
            ..Default::default()
        };
        assert_eq!(extract_features(&diagram, &opts).features, vec![(0.5, 1.0)]);
    }

    #[test]
    fn degenerate_pairs_are_surfaced() {
        let mut bad = pair(1, 0.2, Some(0.9));
        bad.chain.clear();
        let diagram = PersistenceDiagram::new(vec![pair(0, 0.0, Some(0.3)), bad]);
        let report = extract_features(&diagram, &FeatureOptions::default());
        assert_eq!(report.features.len(), 1);
        assert_eq!(report.degenerate, vec![1]);
    }

    #[test]
    fn degenerate_pairs_below_noise_are_still_surfaced() {
        let mut bad = pair(1, 0.2, Some(0.2));
        bad.cycle.clear();
        let diagram = PersistenceDiagram::new(vec![pair(0, 0.0, Some(0.0)), bad]);
        let report = extract_features(&diagram, &FeatureOptions::default());
        assert!(report.features.is_empty());
        assert_eq!(report.below_noise, 1);
        assert_eq!(report.degenerate, vec![1]);
    }
}
