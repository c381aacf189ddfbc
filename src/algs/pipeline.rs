//! Staged driver: points → distances → Rips filtration → pairing → diagram.
//!
//! Each stage is a separate method returning owned output, so a caller can
//! inspect or stop between stages. Stage durations are accumulated in
//! [`StageTimings`] and logged at `debug` level.

use std::time::{Duration, Instant};

use crate::algs::diagram::PersistenceDiagram;
use crate::algs::persistence::{DynamicPersistence, pair_simplices};
use crate::geometry::distances::{ExplicitDistances, PairwiseDistances};
use crate::geometry::metric::{Euclidean, Metric};
use crate::geometry::point_cloud::PointCloud;
use crate::persistence_error::PersistenceError;
use crate::topology::filtration::Filtration;
use crate::topology::rips::{RipsComplex, RipsConfig};

/// Wall-clock time spent in each stage.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct StageTimings {
    pub distances: Duration,
    pub generation: Duration,
    pub sort: Duration,
    pub pairing: Duration,
    pub diagram: Duration,
}

impl StageTimings {
    pub fn total(&self) -> Duration {
        self.distances + self.generation + self.sort + self.pairing + self.diagram
    }
}

fn timed<T>(stage: &str, slot: &mut Duration, f: impl FnOnce() -> T) -> T {
    let start = Instant::now();
    let out = f();
    let elapsed = start.elapsed();
    *slot += elapsed;
    log::debug!("{stage}: {:.3} ms", elapsed.as_secs_f64() * 1e3);
    out
}

/// Point cloud plus construction parameters, run one stage at a time.
#[derive(Clone, Debug)]
pub struct Pipeline<'p, M = Euclidean> {
    points: &'p PointCloud,
    config: RipsConfig,
    metric: M,
    timings: StageTimings,
}

impl<'p> Pipeline<'p, Euclidean> {
    /// Pipeline with the Euclidean metric.
    pub fn euclidean(points: &'p PointCloud, config: RipsConfig) -> Result<Self, PersistenceError> {
        Self::new(points, config, Euclidean)
    }
}

impl<'p, M: Metric + Clone> Pipeline<'p, M> {
    /// # Errors
    /// [`PersistenceError::InvalidScale`] if `config.skeleton` is not finite and positive.
    pub fn new(points: &'p PointCloud, config: RipsConfig, metric: M) -> Result<Self, PersistenceError> {
        config.validate()?;
        Ok(Self {
            points,
            config,
            metric,
            timings: StageTimings::default(),
        })
    }

    pub fn config(&self) -> &RipsConfig {
        &self.config
    }

    pub fn timings(&self) -> &StageTimings {
        &self.timings
    }

    /// Materialise all pairwise distances.
    pub fn distances(&mut self) -> Result<ExplicitDistances, PersistenceError> {
        let source = PairwiseDistances::new(self.points, self.metric.clone());
        timed("distances", &mut self.timings.distances, || {
            ExplicitDistances::build(&source)
        })
    }

    /// Generate the Rips complex over `distances` and sort it into a filtration.
    pub fn generate(&mut self, distances: &ExplicitDistances) -> Result<Filtration, PersistenceError> {
        let rips = RipsComplex::with_config(distances, &self.config)?;
        let mut filtration = Filtration::with_capacity(rips.vertex_count() + rips.edge_count());
        timed("generation", &mut self.timings.generation, || {
            rips.generate(&mut filtration)
        });
        timed("sort", &mut self.timings.sort, || filtration.sort())?;
        Ok(filtration)
    }

    /// Pair every simplex of `filtration`.
    pub fn pair<'f>(&mut self, filtration: &'f Filtration) -> Result<DynamicPersistence<'f>, PersistenceError> {
        timed("pairing", &mut self.timings.pairing, || pair_simplices(filtration))
    }

    /// All stages in sequence.
    pub fn run(mut self) -> Result<PersistenceRun, PersistenceError> {
        let distances = self.distances()?;
        let filtration = self.generate(&distances)?;
        let diagram = {
            let dp = self.pair(&filtration)?;
            timed("diagram", &mut self.timings.diagram, || dp.diagram())
        };
        log::debug!(
            "{} points, {} simplices, {} classes in {:.3} ms",
            self.points.len(),
            filtration.len(),
            diagram.len(),
            self.timings.total().as_secs_f64() * 1e3
        );
        Ok(PersistenceRun {
            filtration,
            diagram,
            timings: self.timings,
        })
    }
}

/// Owned output of [`Pipeline::run`].
#[derive(Clone, Debug)]
pub struct PersistenceRun {
    pub filtration: Filtration,
    pub diagram: PersistenceDiagram,
    pub timings: StageTimings,
}

impl PersistenceRun {
    /// Re-run the pairing over the stored filtration, e.g. to reach the
    /// per-simplex states or the simplex map.
    pub fn persistence(&self) -> Result<DynamicPersistence<'_>, PersistenceError> {
        pair_simplices(&self.filtration)
    }
}

/// Euclidean persistence of `points` in one call.
pub fn compute_persistence(points: &PointCloud, config: &RipsConfig) -> Result<PersistenceRun, PersistenceError> {
    Pipeline::euclidean(points, *config)?.run()
}
