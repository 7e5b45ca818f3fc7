//! Batch pipeline tests: full runs, prior results, rejection, and failure.

use fronthaul_analysis::propagation::Direction;
use fronthaul_core::config::TopologyConfig;
use fronthaul_core::errors::{PipelineError, StorageError};
use fronthaul_core::tracing::init_tracing;
use fronthaul_core::types::{CellId, GroupId};
use fronthaul_core::{ErrorClass, FronthaulConfig, FronthaulErrorCode, SlotRecord, SlotTable};
use fronthaul_pipeline::{BatchPipeline, BatchRequest};
use fronthaul_storage::{BatchStatus, ResultRepository, Stage, StageState};
use test_fixtures::{cascade, shared_link};

// ═══════════════════════════════════════════════════════════════════════════
// HELPERS
// ═══════════════════════════════════════════════════════════════════════════

fn config() -> FronthaulConfig {
    FronthaulConfig {
        topology: TopologyConfig {
            distance_threshold: Some(0.3),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn upload(repo: &ResultRepository, records: Vec<SlotRecord>) -> String {
    init_tracing();
    repo.store_upload(SlotTable::from_records(records).unwrap())
}

fn state(batch: &fronthaul_storage::BatchRecord, stage: Stage) -> StageState {
    batch.stage(stage).state
}

// ═══════════════════════════════════════════════════════════════════════════
// FULL RUNS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn shared_link_batch_runs_every_stage() {
    let repo = ResultRepository::new();
    let scenario = shared_link(42);
    let upload_id = upload(&repo, scenario.records);
    let pipeline = BatchPipeline::new(&repo, config());

    let batch = pipeline.execute(BatchRequest::new(upload_id.clone())).unwrap();
    assert_eq!(batch.status, BatchStatus::Completed, "{:?}", batch.error);
    for stage in Stage::ALL {
        assert_eq!(state(&batch, stage), StageState::Completed, "{stage}");
    }
    assert_eq!(batch.result_id(Stage::DataValidation), Some(upload_id.as_str()));
    assert_eq!(batch.last_completed.as_deref(), batch.result_id(Stage::Propagation));

    let topology = repo
        .get_topology(batch.result_id(Stage::Topology).unwrap())
        .unwrap();
    assert_eq!(topology.groups.len(), 2);
    assert_eq!(topology.groups[0].cells, vec![CellId(0), CellId(1)]);
    assert_eq!(topology.groups[1].cells, vec![CellId(2)]);

    let propagation = repo
        .get_propagation(batch.result_id(Stage::Propagation).unwrap())
        .unwrap();
    assert!(!propagation.involves(GroupId(2)));
    assert_eq!(propagation.member_lags.len(), 1);
    let lag = &propagation.member_lags[0];
    assert_eq!(lag.source_cell, CellId(0));
    assert_eq!(lag.target_cell, CellId(1));
    assert!((lag.lag_slots - 5).abs() <= 1);
    assert_eq!(lag.direction, Direction::Downstream);

    let anomalies = repo
        .get_anomaly(batch.result_id(Stage::Anomaly).unwrap())
        .unwrap();
    assert_eq!(anomalies.total_cells_analyzed, 3);

    let peer_fit = repo
        .get_peer_fit(batch.result_id(Stage::PeerFit).unwrap())
        .unwrap();
    assert_eq!(peer_fit.threshold, 0.5);
    assert_eq!(peer_fit.total_cells_analyzed, 3);
    assert_eq!(peer_fit.anomalies_detected, 0);
}

#[test]
fn peer_fit_uses_configured_threshold() {
    let repo = ResultRepository::new();
    let upload_id = upload(&repo, shared_link(42).records);
    let mut strict = config();
    strict.anomaly.peer_fit_threshold = Some(0.95);

    let batch = BatchPipeline::new(&repo, strict)
        .execute(BatchRequest::new(upload_id).without_propagation())
        .unwrap();
    assert_eq!(batch.status, BatchStatus::Completed, "{:?}", batch.error);

    let peer_fit = repo
        .get_peer_fit(batch.result_id(Stage::PeerFit).unwrap())
        .unwrap();
    assert_eq!(peer_fit.threshold, 0.95);
    // Cells 0 and 1 share a link but are well short of 0.95 similar; the
    // singleton group always fits itself.
    let mut flagged: Vec<_> = peer_fit.anomalies.iter().map(|s| s.cell_id).collect();
    flagged.sort();
    assert_eq!(flagged, vec![CellId(0), CellId(1)]);
    assert_eq!(peer_fit.normal_cells.len(), 1);
    assert_eq!(peer_fit.normal_cells[0].cell_id, CellId(2));
}

#[test]
fn throughput_only_table_uses_derived_congestion() {
    let repo = ResultRepository::new();
    let records = shared_link(3)
        .records
        .into_iter()
        .map(|r| SlotRecord {
            congestion_event: None,
            ..r
        })
        .collect();
    let upload_id = upload(&repo, records);
    let pipeline = BatchPipeline::new(&repo, FronthaulConfig::default());

    let batch = pipeline.execute(BatchRequest::new(upload_id)).unwrap();
    assert_eq!(batch.status, BatchStatus::Completed, "{:?}", batch.error);
    let matrix = repo
        .get_similarity(batch.result_id(Stage::Similarity).unwrap())
        .unwrap();
    assert_eq!(matrix.len(), 3);
}

#[test]
fn indicator_table_skips_anomaly_and_uses_congestion() {
    let repo = ResultRepository::new();
    let upload_id = upload(&repo, cascade(5).records);
    let pipeline = BatchPipeline::new(&repo, FronthaulConfig::default());

    let batch = pipeline.execute(BatchRequest::new(upload_id)).unwrap();
    assert_eq!(batch.status, BatchStatus::Completed, "{:?}", batch.error);
    assert_eq!(state(&batch, Stage::Anomaly), StageState::Skipped);
    assert_eq!(state(&batch, Stage::Propagation), StageState::Completed);
}

#[test]
fn propagation_can_be_turned_off() {
    let repo = ResultRepository::new();
    let upload_id = upload(&repo, shared_link(1).records);

    let pipeline = BatchPipeline::new(&repo, config());
    let batch = pipeline
        .execute(BatchRequest::new(upload_id.clone()).without_propagation())
        .unwrap();
    assert_eq!(batch.status, BatchStatus::Completed);
    assert_eq!(state(&batch, Stage::Propagation), StageState::Skipped);

    let mut disabled = config();
    disabled.pipeline.propagation = Some(false);
    let batch = BatchPipeline::new(&repo, disabled)
        .execute(BatchRequest::new(upload_id))
        .unwrap();
    assert_eq!(state(&batch, Stage::Propagation), StageState::Skipped);
}

// ═══════════════════════════════════════════════════════════════════════════
// PRIOR RESULTS
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn prior_similarity_skips_its_stage() {
    let repo = ResultRepository::new();
    let upload_id = upload(&repo, shared_link(9).records);
    let pipeline = BatchPipeline::new(&repo, config());
    let first = pipeline.execute(BatchRequest::new(upload_id.clone())).unwrap();
    let sim_id = first.result_id(Stage::Similarity).unwrap().to_string();

    let second = pipeline
        .execute(BatchRequest::new(upload_id).with_similarity(sim_id.clone()))
        .unwrap();
    assert_eq!(second.status, BatchStatus::Completed);
    assert_eq!(state(&second, Stage::Similarity), StageState::Skipped);
    assert_eq!(second.result_id(Stage::Similarity), Some(sim_id.as_str()));
    assert_eq!(state(&second, Stage::Topology), StageState::Completed);
}

#[test]
fn prior_topology_skips_similarity_and_topology() {
    let repo = ResultRepository::new();
    let upload_id = upload(&repo, shared_link(9).records);
    let pipeline = BatchPipeline::new(&repo, config());
    let first = pipeline.execute(BatchRequest::new(upload_id.clone())).unwrap();
    let topo_id = first.result_id(Stage::Topology).unwrap().to_string();

    let second = pipeline
        .execute(BatchRequest::new(upload_id).with_topology(topo_id.clone()))
        .unwrap();
    assert_eq!(second.status, BatchStatus::Completed);
    assert_eq!(state(&second, Stage::Similarity), StageState::Skipped);
    assert_eq!(state(&second, Stage::Topology), StageState::Skipped);
    assert_eq!(second.result_id(Stage::Topology), Some(topo_id.as_str()));
    assert_eq!(state(&second, Stage::PeerFit), StageState::Skipped);
    assert_eq!(state(&second, Stage::Propagation), StageState::Completed);
}

#[test]
fn prior_topology_with_similarity_still_scores_peer_fit() {
    let repo = ResultRepository::new();
    let upload_id = upload(&repo, shared_link(9).records);
    let pipeline = BatchPipeline::new(&repo, config());
    let first = pipeline.execute(BatchRequest::new(upload_id.clone())).unwrap();
    let sim_id = first.result_id(Stage::Similarity).unwrap().to_string();
    let topo_id = first.result_id(Stage::Topology).unwrap().to_string();

    let second = pipeline
        .execute(
            BatchRequest::new(upload_id)
                .with_similarity(sim_id)
                .with_topology(topo_id),
        )
        .unwrap();
    assert_eq!(second.status, BatchStatus::Completed, "{:?}", second.error);
    assert_eq!(state(&second, Stage::Topology), StageState::Skipped);
    assert_eq!(state(&second, Stage::PeerFit), StageState::Completed);
    let peer_fit = repo
        .get_peer_fit(second.result_id(Stage::PeerFit).unwrap())
        .unwrap();
    assert_eq!(peer_fit.total_cells_analyzed, 3);
}

// ═══════════════════════════════════════════════════════════════════════════
// REJECTION
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn unknown_upload_is_rejected() {
    let repo = ResultRepository::new();
    let pipeline = BatchPipeline::new(&repo, config());
    let err = pipeline.submit(BatchRequest::new("upload_ffffffff")).unwrap_err();
    assert!(matches!(err, PipelineError::Storage(StorageError::NotFound { .. })));
    assert_eq!(err.error_class(), ErrorClass::Rejected);
    assert!(repo.ids_with_prefix("batch_").is_empty());
}

#[test]
fn mistyped_prior_id_is_rejected() {
    let repo = ResultRepository::new();
    let upload_id = upload(&repo, shared_link(2).records);
    let pipeline = BatchPipeline::new(&repo, config());
    let err = pipeline
        .submit(BatchRequest::new(upload_id.clone()).with_similarity(upload_id))
        .unwrap_err();
    assert_eq!(err.error_code(), "KIND_MISMATCH");
    assert_eq!(err.error_class(), ErrorClass::Rejected);
}

#[test]
fn completed_batch_cannot_run_again() {
    let repo = ResultRepository::new();
    let upload_id = upload(&repo, shared_link(2).records);
    let pipeline = BatchPipeline::new(&repo, config());
    let batch_id = pipeline.submit(BatchRequest::new(upload_id)).unwrap();
    assert_eq!(repo.get_batch(&batch_id).unwrap().status, BatchStatus::Pending);

    pipeline.run(&batch_id).unwrap();
    let err = pipeline.run(&batch_id).unwrap_err();
    assert!(matches!(err, PipelineError::InvalidTransition { .. }));
}

// ═══════════════════════════════════════════════════════════════════════════
// FAILURE
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn stage_failure_keeps_earlier_results() {
    let repo = ResultRepository::new();
    let pipeline = BatchPipeline::new(&repo, config());

    // A topology over cells that the second upload does not have.
    let other_upload = upload(&repo, cascade(4).records);
    let other = pipeline
        .execute(BatchRequest::new(other_upload).without_propagation())
        .unwrap();
    let foreign_topology = other.result_id(Stage::Topology).unwrap().to_string();

    let upload_id = upload(&repo, shared_link(4).records);
    let batch = pipeline
        .execute(BatchRequest::new(upload_id).with_topology(foreign_topology))
        .unwrap();

    assert_eq!(batch.status, BatchStatus::Failed);
    assert_eq!(state(&batch, Stage::DataValidation), StageState::Completed);
    assert_eq!(state(&batch, Stage::Anomaly), StageState::Completed);
    assert_eq!(state(&batch, Stage::Propagation), StageState::Failed);
    assert!(batch.error.as_deref().unwrap().starts_with("propagation failed"));
    assert!(batch.stage(Stage::Propagation).error.is_some());

    let last = batch.last_completed.as_deref().unwrap();
    assert_eq!(Some(last), batch.result_id(Stage::Anomaly));
    assert!(repo.get_anomaly(last).is_ok());
}

#[test]
fn parallel_batches_stay_isolated() {
    let repo = ResultRepository::new();
    let uploads: Vec<String> = (0..4)
        .map(|seed| upload(&repo, shared_link(seed).records))
        .collect();

    let batches: Vec<_> = std::thread::scope(|scope| {
        let handles: Vec<_> = uploads
            .iter()
            .map(|id| {
                let repo = &repo;
                scope.spawn(move || {
                    BatchPipeline::new(repo, config())
                        .execute(BatchRequest::new(id.clone()))
                        .unwrap()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (batch, upload_id) in batches.iter().zip(&uploads) {
        assert_eq!(batch.status, BatchStatus::Completed);
        assert_eq!(&batch.upload_id, upload_id);
    }
    assert_eq!(repo.ids_with_prefix("batch_").len(), 4);
    assert_eq!(repo.ids_with_prefix("topology_").len(), 4);
}
