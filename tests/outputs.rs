mod util;

use rips_persistence::algs::wire::{PairRecord, decode_pairs, encode_pairs};
use rips_persistence::prelude::*;
use util::noisy_circle;

fn circle_run() -> PersistenceRun {
    let points = noisy_circle(30, 0.03, 5);
    compute_persistence(&points, &RipsConfig::new(2, 2.5).unwrap()).unwrap()
}

#[test]
fn wire_stream_carries_every_pair() {
    let run = circle_run();
    let bytes = encode_pairs(run.diagram.pairs()).unwrap();
    let back = decode_pairs(&bytes).unwrap();
    assert_eq!(back.len(), run.diagram.len());
    for (rec, pair) in back.iter().zip(run.diagram.pairs()) {
        assert_eq!(*rec, PairRecord::from(pair));
    }
}

#[test]
fn diagram_serializes_with_representatives() {
    let run = circle_run();
    let bytes = bincode::serialize(&run.diagram).unwrap();
    let back: PersistenceDiagram = bincode::deserialize(&bytes).unwrap();
    assert_eq!(back, run.diagram);

    let json = serde_json::to_value(&run.diagram).unwrap();
    let essential = json["pairs"]
        .as_array()
        .unwrap()
        .iter()
        .filter(|p| p["death"].is_null())
        .count();
    assert_eq!(essential, run.diagram.essential().count());
}

#[test]
fn features_skip_noise_and_essentials() {
    let run = circle_run();
    let report = extract_features(&run.diagram, &FeatureOptions::default());
    let finite = run.diagram.finite().count();
    assert_eq!(report.features.len() + report.below_noise + report.degenerate.len(), finite);
    assert!(report.degenerate.is_empty());
    assert!(report.features.iter().all(|&(_, p)| p >= 0.001));

    let h1 = extract_features(
        &run.diagram,
        &FeatureOptions {
            noise_threshold: 1.0,
            dimension: Some(1),
        },
    );
    assert_eq!(h1.len(), 1, "only the circle persists past 1.0");
    assert_eq!(h1.flatten().len(), 2);
}

#[test]
fn simplex_map_reaches_back_to_geometry() {
    let run = circle_run();
    let dp = run.persistence().unwrap();
    let map = dp.make_simplex_map();
    let circle = run.diagram.most_persistent(1).unwrap();
    let death = circle.death_index.unwrap();
    assert_eq!(map.dimension(death), 2);
    assert_eq!(map.value(death), circle.death_value());
    assert_eq!(map.handle_of(map.simplex(death)).unwrap(), Some(death));
    for s in &circle.cycle {
        let v = map.value_of(s).unwrap().unwrap();
        assert!(v <= circle.death_value());
    }
}

#[test]
fn cycle_network_covers_the_circle() {
    let run = circle_run();
    let dp = run.persistence().unwrap();
    let opts = NetworkOptions { noise_threshold: 1.0 };
    let net = CycleNetwork::build(&dp, &opts, None).unwrap();
    let circle = run.diagram.most_persistent(1).unwrap();

    let cycle_vertices: std::collections::BTreeSet<VertexId> = circle
        .cycle
        .iter()
        .flat_map(|s| s.vertices().iter().copied())
        .collect();
    assert_eq!(net.nodes().collect::<std::collections::BTreeSet<_>>(), cycle_vertices);
    assert!(net.nodes().all(|v| net.tag(v) == Some(NodeTag::Dimension(1))));
    assert!(net.edges().all(|(_, _, w)| w > 0.0 && w < 10.0));
}
