#![allow(dead_code)]
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rips_persistence::algs::chain::Chain;
use rips_persistence::geometry::point_cloud::PointCloud;
use rips_persistence::topology::filtration::Filtration;
use rips_persistence::topology::simplex::Simplex;

pub fn s(vs: &[u32]) -> Simplex {
    Simplex::new(vs.iter().copied()).unwrap()
}

/// `n` points around the unit circle, each pushed radially by at most `noise`.
pub fn noisy_circle(n: usize, noise: f64, seed: u64) -> PointCloud {
    let mut rng = SmallRng::seed_from_u64(seed);
    let rows: Vec<[f64; 2]> = (0..n)
        .map(|i| {
            let theta = std::f64::consts::TAU * i as f64 / n as f64;
            let r = 1.0 + rng.gen_range(-noise..=noise);
            [r * theta.cos(), r * theta.sin()]
        })
        .collect();
    PointCloud::from_rows(rows).unwrap()
}

/// `per_cluster` points inside a square of side `spread` around each center.
pub fn clusters(centers: &[[f64; 2]], per_cluster: usize, spread: f64, seed: u64) -> PointCloud {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut rows = Vec::with_capacity(centers.len() * per_cluster);
    for c in centers {
        for _ in 0..per_cluster {
            rows.push([
                c[0] + rng.gen_range(-spread..=spread) / 2.0,
                c[1] + rng.gen_range(-spread..=spread) / 2.0,
            ]);
        }
    }
    PointCloud::from_rows(rows).unwrap()
}

/// `n` uniform points in the unit square.
pub fn random_cloud(n: usize, seed: u64) -> PointCloud {
    let mut rng = SmallRng::seed_from_u64(seed);
    let rows: Vec<[f64; 2]> = (0..n).map(|_| [rng.r#gen(), rng.r#gen()]).collect();
    PointCloud::from_rows(rows).unwrap()
}

/// Mod-2 boundary of a chain of filtration positions.
pub fn boundary_of(f: &Filtration, chain: &Chain) -> Chain {
    let mut out = Chain::new();
    for i in chain.iter() {
        out += &Chain::from_indices(f.boundary_indices(i).unwrap());
    }
    out
}
