//! Scenario tests: the full analysis chain over synthetic telemetry.

use fronthaul_analysis::anomaly::AnomalyParams;
use fronthaul_analysis::propagation::{Direction, NodeRole};
use fronthaul_analysis::{
    analyze_propagation, compute_similarity, detect_anomalies, infer_topology, PropagationParams,
    SimilarityMatrix, SimilarityParams, TopologyParams,
};
use fronthaul_core::config::CutRule;
use fronthaul_core::types::{CellId, CellSeries, GroupId, SignalKind, SimilarityMethod};
use fronthaul_core::SlotTable;
use test_fixtures::{cascade, shared_link};

// ═══════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════

fn threshold(d: f64) -> TopologyParams {
    TopologyParams {
        cut: CutRule::Threshold(d),
        ..Default::default()
    }
}

fn three_cell_matrix() -> SimilarityMatrix {
    SimilarityMatrix::new(
        vec![
            vec![1.0, 0.9, 0.1],
            vec![0.9, 1.0, 0.12],
            vec![0.1, 0.12, 1.0],
        ],
        vec![CellId(0), CellId(1), CellId(2)],
        SimilarityMethod::Correlation,
    )
    .unwrap()
}

// ═══════════════════════════════════════════════════════════════════════════
// SIMILARITY + TOPOLOGY
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn three_cell_matrix_splits_at_any_cut_between_the_pairs() {
    for d in [0.11, 0.3, 0.5, 0.87] {
        let r = infer_topology(&three_cell_matrix(), &threshold(d)).unwrap();
        assert_eq!(r.groups.len(), 2, "cut {d}");
        assert_eq!(r.groups[0].cells, vec![CellId(0), CellId(1)]);
        assert_eq!(r.groups[1].cells, vec![CellId(2)]);
        assert_eq!(r.group_of(CellId(1)), Some(GroupId(1)));
        assert_eq!(r.group_of(CellId(2)), Some(GroupId(2)));
    }
}

#[test]
fn cluster_count_cut_matches_threshold_cut() {
    let params = TopologyParams {
        cut: CutRule::Clusters(2),
        ..Default::default()
    };
    let by_count = infer_topology(&three_cell_matrix(), &params).unwrap();
    let by_distance = infer_topology(&three_cell_matrix(), &threshold(0.5)).unwrap();
    assert_eq!(by_count.groups, by_distance.groups);
}

#[test]
fn identical_and_inverted_signals_hit_the_range_ends() {
    let base: Vec<f64> = (0..50).map(|i| ((i * 7) % 11) as f64).collect();
    let inverted: Vec<f64> = base.iter().map(|v| -v).collect();
    let series = [
        CellSeries::from_values(CellId(1), base.clone()),
        CellSeries::from_values(CellId(2), base),
        CellSeries::from_values(CellId(3), inverted),
    ];
    let m = compute_similarity(&series, &SimilarityParams::default()).unwrap();
    assert!((m.similarity(CellId(1), CellId(2)).unwrap() - 1.0).abs() < 1e-9);
    assert!(m.similarity(CellId(1), CellId(3)).unwrap().abs() < 1e-9);
}

#[test]
fn matrix_serializes_with_string_cell_ids() {
    let json = serde_json::to_value(three_cell_matrix()).unwrap();
    assert_eq!(json["cell_ids"][0], "0");
    assert_eq!(json["method"], "correlation");
    let back: SimilarityMatrix = serde_json::from_value(json).unwrap();
    assert_eq!(back, three_cell_matrix());
}

#[test]
fn asymmetric_external_matrix_is_rejected() {
    let err = SimilarityMatrix::new(
        vec![vec![1.0, 0.5], vec![0.4, 1.0]],
        vec![CellId(0), CellId(1)],
        SimilarityMethod::Correlation,
    );
    assert!(err.is_err());
}

// ═══════════════════════════════════════════════════════════════════════════
// SHARED LINK: 3 cells x 1000 slots
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn shared_link_end_to_end() {
    let scenario = shared_link(42);
    let table = SlotTable::from_records(scenario.records).unwrap();

    let congestion = table.series(SignalKind::Congestion).unwrap();
    let matrix = compute_similarity(&congestion, &SimilarityParams::default()).unwrap();
    assert!(matrix.similarity(CellId(0), CellId(1)).unwrap() > 0.75);
    assert!(matrix.similarity(CellId(0), CellId(2)).unwrap() < 0.65);

    let topology = infer_topology(&matrix, &threshold(0.3)).unwrap();
    assert_eq!(topology.groups.len(), 2);
    assert_eq!(topology.groups[0].cells, vec![scenario.leader, scenario.follower]);
    assert_eq!(topology.groups[1].cells, vec![scenario.independent]);
    let independent = topology.group_of(scenario.independent).unwrap();

    let throughput = table.series(SignalKind::Throughput).unwrap();
    let anomalies = detect_anomalies(&throughput, &AnomalyParams::default());
    assert_eq!(anomalies.total_cells_analyzed, 3);
    assert!(anomalies
        .records
        .iter()
        .all(|r| r.is_anomaly || r.confidence == 0.0));

    let result = analyze_propagation(
        &topology,
        &anomalies.indicators(),
        &PropagationParams::default(),
    )
    .unwrap();
    assert!(!result.involves(independent));
    assert_eq!(
        result.network_graph.node(independent).map(|n| n.role),
        Some(NodeRole::Isolated)
    );

    assert_eq!(result.member_lags.len(), 1);
    let lag = &result.member_lags[0];
    assert_eq!(lag.source_cell, scenario.leader);
    assert_eq!(lag.target_cell, scenario.follower);
    assert!((lag.lag_slots - scenario.lag_slots).abs() <= 1);
    assert_eq!(lag.direction, Direction::Downstream);
    assert!(lag.correlation >= PropagationParams::default().min_correlation);
    assert!((lag.delay_ms - lag.lag_slots as f64 * 0.1).abs() < 1e-9);

    let leader = result
        .leaders
        .iter()
        .find(|l| l.group_id == GroupId(1))
        .unwrap();
    assert_eq!(leader.leader, Some(scenario.leader));
    assert!(leader.simultaneous_slots > 0);
}

#[test]
fn shared_link_is_reproducible() {
    let run = || {
        let table = SlotTable::from_records(shared_link(7).records).unwrap();
        let m = compute_similarity(
            &table.series(SignalKind::Congestion).unwrap(),
            &SimilarityParams::default(),
        )
        .unwrap();
        infer_topology(&m, &TopologyParams::default()).unwrap()
    };
    assert_eq!(run(), run());
}

// ═══════════════════════════════════════════════════════════════════════════
// CASCADE: three groups, A -> B -> C
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn cascade_yields_a_three_group_path() {
    let scenario = cascade(11);
    let table = SlotTable::from_records(scenario.records).unwrap();
    let indicators = table.series(SignalKind::Congestion).unwrap();

    let matrix = compute_similarity(&indicators, &SimilarityParams::default()).unwrap();
    let params = TopologyParams {
        cut: CutRule::Clusters(3),
        ..Default::default()
    };
    let topology = infer_topology(&matrix, &params).unwrap();
    assert_eq!(topology.groups.len(), 3);
    for (group, expected) in topology.groups.iter().zip(&scenario.groups) {
        assert_eq!(group.cells.as_slice(), expected.as_slice());
    }

    let result = analyze_propagation(&topology, &indicators, &PropagationParams::default()).unwrap();
    assert_eq!(result.events.len(), 3);
    let first = &result.events[0];
    assert_eq!(first.event_id, "evt_001");
    assert_eq!(first.source_group, GroupId(1));
    assert_eq!(first.target_group, GroupId(2));
    assert_eq!(first.lag_slots, scenario.hop_lag);
    assert_eq!(first.direction, Direction::Downstream);
    assert!(first.confidence <= 0.95);
    assert!(first.p_value < 0.01);

    assert_eq!(result.propagation_paths.len(), 1);
    let path = &result.propagation_paths[0];
    assert_eq!(path.sequence, vec![GroupId(1), GroupId(2), GroupId(3)]);
    assert!((path.total_delay_ms - 0.6).abs() < 1e-9);

    let role = |g: u32| result.network_graph.node(GroupId(g)).map(|n| n.role);
    assert_eq!(role(1), Some(NodeRole::Source));
    assert_eq!(role(2), Some(NodeRole::Intermediate));
    assert_eq!(role(3), Some(NodeRole::Target));
    assert_eq!(result.network_graph.edges.len(), 3);

    // Members of a group move together.
    assert!(result
        .member_lags
        .iter()
        .all(|m| m.lag_slots == 0 && m.direction == Direction::Simultaneous));
}

#[test]
fn single_group_produces_no_events() {
    let scenario = cascade(3);
    let table = SlotTable::from_records(scenario.records).unwrap();
    let indicators = table.series(SignalKind::Congestion).unwrap();
    let matrix = compute_similarity(&indicators, &SimilarityParams::default()).unwrap();
    let params = TopologyParams {
        cut: CutRule::Clusters(1),
        ..Default::default()
    };
    let topology = infer_topology(&matrix, &params).unwrap();
    let result = analyze_propagation(&topology, &indicators, &PropagationParams::default()).unwrap();
    assert!(result.events.is_empty());
    assert!(result.propagation_paths.is_empty());
    assert_eq!(result.leaders.len(), 1);
}
