mod util;

use std::collections::BTreeSet;

use proptest::prelude::*;
use rips_persistence::prelude::*;
use rips_persistence::topology::filtration::filtration_order;
use util::{boundary_of, random_cloud};

/// Every vertex subset of size `<= max_dim + 1` with diameter `<= scale`.
fn brute_force_cliques(d: &ExplicitDistances, max_dim: usize, scale: f64) -> BTreeSet<Vec<u32>> {
    let n = d.len();
    let mut out = BTreeSet::new();
    for mask in 1u32..(1 << n) {
        let vs: Vec<u32> = (0..n as u32).filter(|&v| mask & (1u32 << v) != 0).collect();
        if vs.len() > max_dim + 1 {
            continue;
        }
        let ok = vs.iter().enumerate().all(|(k, &a)| {
            vs[k + 1..]
                .iter()
                .all(|&b| d.distance(a as usize, b as usize) <= scale)
        });
        if ok {
            out.insert(vs);
        }
    }
    out
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn generator_matches_clique_definition(
        n in 1usize..10,
        max_dim in 0usize..4,
        scale in 0.05f64..1.5,
        seed in any::<u64>(),
    ) {
        let points = random_cloud(n, seed);
        let d = ExplicitDistances::from_points(&points, Euclidean).unwrap();
        let rips = RipsComplex::new(&d, max_dim, scale).unwrap();
        let generated: Vec<Vec<u32>> = rips.simplices().map(|(s, _)| s.to_indices()).collect();
        let unique: BTreeSet<Vec<u32>> = generated.iter().cloned().collect();
        prop_assert_eq!(unique.len(), generated.len(), "simplex emitted twice");
        prop_assert_eq!(unique, brute_force_cliques(&d, max_dim, scale));
    }

    #[test]
    fn sorted_filtration_respects_faces(
        n in 1usize..12,
        max_dim in 0usize..4,
        scale in 0.05f64..1.5,
        seed in any::<u64>(),
    ) {
        let points = random_cloud(n, seed);
        let d = ExplicitDistances::from_points(&points, Euclidean).unwrap();
        let rips = RipsComplex::new(&d, max_dim, scale).unwrap();
        let f = rips.filtration().unwrap();
        for i in 0..f.len() {
            prop_assert_eq!(f.value(i), rips.eval(f.simplex(i)));
            for face in f.boundary_indices(i).unwrap() {
                prop_assert!(face < i);
                prop_assert!(f.value(face) <= f.value(i));
            }
        }
        for w in 0..f.len().saturating_sub(1) {
            prop_assert!(filtration_order(f.get(w).unwrap(), f.get(w + 1).unwrap()).is_lt());
        }
    }

    #[test]
    fn pairing_is_a_matching(
        n in 1usize..12,
        max_dim in 0usize..4,
        scale in 0.05f64..1.5,
        seed in any::<u64>(),
    ) {
        let points = random_cloud(n, seed);
        let d = ExplicitDistances::from_points(&points, Euclidean).unwrap();
        let f = RipsComplex::new(&d, max_dim, scale).unwrap().filtration().unwrap();
        let dp = pair_simplices(&f).unwrap();

        let pairs: Vec<_> = dp.pairs().collect();
        let essential = dp.essentials().count();
        prop_assert_eq!(2 * pairs.len() + essential, f.len());

        let mut seen = BTreeSet::new();
        for &(birth, death) in &pairs {
            prop_assert!(birth < death);
            prop_assert!(f.value(birth) <= f.value(death));
            prop_assert_eq!(f.simplex(death).dimension(), f.simplex(birth).dimension() + 1);
            prop_assert_eq!(dp.partner(birth), Some(death));
            prop_assert_eq!(dp.partner(death), Some(birth));
            prop_assert_eq!(dp.sign(birth), Some(Sign::Positive));
            prop_assert_eq!(dp.sign(death), Some(Sign::Negative));
            prop_assert!(seen.insert(birth) && seen.insert(death));
        }
        for e in dp.essentials() {
            prop_assert!(seen.insert(e));
        }

        // Euler characteristic of the complex equals that of its homology.
        let alt = |counts: Vec<usize>| -> i64 {
            counts.iter().enumerate().map(|(k, &c)| if k % 2 == 0 { c as i64 } else { -(c as i64) }).sum()
        };
        prop_assert_eq!(alt(f.dimension_counts()), alt(dp.essential_counts()));
    }

    #[test]
    fn chains_bound_their_cycles(
        n in 2usize..10,
        scale in 0.2f64..1.5,
        seed in any::<u64>(),
    ) {
        let points = random_cloud(n, seed);
        let d = ExplicitDistances::from_points(&points, Euclidean).unwrap();
        let f = RipsComplex::new(&d, 2, scale).unwrap().filtration().unwrap();
        let dp = pair_simplices(&f).unwrap();
        for (birth, death) in dp.pairs() {
            let state = dp.state(death).unwrap();
            let cycle = state.cycle().unwrap();
            let chain = state.chain().unwrap();
            prop_assert_eq!(&boundary_of(&f, chain), cycle);
            prop_assert_eq!(cycle.low(), Some(birth));
            prop_assert!(chain.contains(death));
        }
        for e in dp.essentials() {
            let cycle = dp.state(e).unwrap().cycle().unwrap();
            prop_assert!(cycle.contains(e));
            if f.simplex(e).dimension() > 0 {
                prop_assert!(boundary_of(&f, cycle).is_empty());
            }
        }
    }

    #[test]
    fn pairing_is_deterministic(
        n in 1usize..10,
        scale in 0.05f64..1.5,
        seed in any::<u64>(),
    ) {
        let points = random_cloud(n, seed);
        let cfg = RipsConfig::new(2, scale).unwrap();
        let a = compute_persistence(&points, &cfg).unwrap();
        let b = compute_persistence(&points, &cfg).unwrap();
        prop_assert_eq!(&a.diagram, &b.diagram);
        let pa: Vec<_> = pair_simplices(&a.filtration).unwrap().pairs().collect();
        let pb: Vec<_> = pair_simplices(&b.filtration).unwrap().pairs().collect();
        prop_assert_eq!(pa, pb);
    }
}
