//! BatchPipeline: drives a batch record through its stages.
//!
//! `data_validation` runs first. Anomaly detection then runs on the rayon
//! pool next to similarity -> topology -> peer_fit, and propagation waits
//! for both.
//! Each stage stores its result before reporting completion, so a failure
//! leaves every earlier result retrievable.

use std::sync::Arc;

use tracing::field::Empty;
use tracing::Span;

use fronthaul_analysis::{
    analyze_propagation, compute_similarity, detect_anomalies, infer_topology, score_peer_fit,
    AnomalyParams, AnomalyResult, PropagationParams, SimilarityMatrix, SimilarityParams,
    TopologyParams, TopologyResult,
};
use fronthaul_core::errors::{AnalysisError, PipelineError, StorageError};
use fronthaul_core::tracing::fields;
use fronthaul_core::types::SignalKind;
use fronthaul_core::{FronthaulConfig, SlotTable};
use fronthaul_storage::{BatchRecord, BatchStatus, ResultKind, ResultRepository, Stage, StageState};

use crate::plan::{IndicatorPlan, StagePlan};
use crate::request::BatchRequest;

/// Why a run stopped before finishing.
enum Halt {
    /// A stage failed; the batch record already says so.
    StageFailed,
    /// Bookkeeping on the batch record itself went wrong.
    Error(PipelineError),
}

impl From<PipelineError> for Halt {
    fn from(e: PipelineError) -> Self {
        Self::Error(e)
    }
}

impl From<StorageError> for Halt {
    fn from(e: StorageError) -> Self {
        Self::Error(e.into())
    }
}

/// Runs batches against one repository with one configuration.
pub struct BatchPipeline<'a> {
    repo: &'a ResultRepository,
    config: FronthaulConfig,
}

impl<'a> BatchPipeline<'a> {
    pub fn new(repo: &'a ResultRepository, config: FronthaulConfig) -> Self {
        Self { repo, config }
    }

    pub fn config(&self) -> &FronthaulConfig {
        &self.config
    }

    /// Validate `request` and create a pending batch.
    ///
    /// Unknown or mistyped ids and tables lacking a needed column are
    /// rejected here, before any work starts. Stages replaced by prior
    /// results, or not needed, are marked skipped.
    pub fn submit(&self, request: BatchRequest) -> Result<String, PipelineError> {
        let table = self.repo.get_upload(&request.upload_id)?;
        for (stage, id) in [
            (Stage::Similarity, &request.similarity_id),
            (Stage::Topology, &request.topology_id),
        ] {
            if let Some(id) = id {
                self.repo.expect_kind(id, stage.result_kind())?;
            }
        }

        let propagation = request.propagation && self.config.pipeline.effective_propagation();
        let needs_similarity = request.similarity_id.is_none() && request.topology_id.is_none();
        let plan = StagePlan::resolve(&table, &self.config, needs_similarity, propagation)?;

        let batch_id = ResultRepository::generate_id(ResultKind::Batch.name());
        let mut batch = BatchRecord::new(batch_id.clone(), request.upload_id);
        if request.topology_id.is_some() {
            // Peer-fit needs a matrix; only a supplied one is available here.
            if request.similarity_id.is_none() {
                batch.skip(Stage::PeerFit, None)?;
            }
            batch.skip(Stage::Similarity, request.similarity_id)?;
            batch.skip(Stage::Topology, request.topology_id)?;
        } else if request.similarity_id.is_some() {
            batch.skip(Stage::Similarity, request.similarity_id)?;
        }
        if !plan.anomaly {
            batch.skip(Stage::Anomaly, None)?;
        }
        if !propagation {
            batch.skip(Stage::Propagation, None)?;
        }
        self.repo.store_batch(batch);

        tracing::info!(batch_id = %batch_id, "batch submitted");
        Ok(batch_id)
    }

    /// Run a pending batch to completion or failure.
    ///
    /// A stage failure is not an error here: the returned record has status
    /// `failed`, the failing stage's message, and `last_completed`.
    pub fn run(&self, batch_id: &str) -> Result<BatchRecord, PipelineError> {
        let batch = self.repo.get_batch(batch_id)?;
        if batch.status != BatchStatus::Pending {
            return Err(PipelineError::InvalidTransition {
                batch_id: batch_id.to_string(),
                from: batch.status.to_string(),
                to: "running".to_string(),
            });
        }

        let span = tracing::info_span!("batch", batch_id = Empty);
        span.record(fields::BATCH_ID, batch_id);
        let _entered = span.enter();

        match self.drive(&batch, &span) {
            Ok(()) => {
                self.transition(batch_id, BatchRecord::finish)?;
                tracing::info!("batch completed");
            }
            Err(Halt::StageFailed) => tracing::warn!("batch failed"),
            Err(Halt::Error(e)) => return Err(e),
        }
        Ok(self.repo.get_batch(batch_id)?)
    }

    /// [`submit`](Self::submit) then [`run`](Self::run).
    pub fn execute(&self, request: BatchRequest) -> Result<BatchRecord, PipelineError> {
        let batch_id = self.submit(request)?;
        self.run(&batch_id)
    }

    fn drive(&self, batch: &BatchRecord, parent: &Span) -> Result<(), Halt> {
        let needs_similarity = batch.stage(Stage::Similarity).state == StageState::Pending;
        let needs_propagation = batch.stage(Stage::Propagation).state == StageState::Pending;

        let (table, plan) = self.stage(batch, Stage::DataValidation, parent, |span| {
            let table = self.repo.get_upload(&batch.upload_id)?;
            let plan = StagePlan::resolve(&table, &self.config, needs_similarity, needs_propagation)?;
            span.record(fields::CELL_COUNT, table.cell_ids().len());
            Ok(((table, plan), batch.upload_id.clone()))
        })?;

        let (topology, anomalies) = rayon::join(
            || self.structure(batch, &table, &plan, parent),
            || self.anomalies(batch, &table, &plan, parent),
        );
        let (topology, anomalies) = (topology?, anomalies?);

        let Some(indicator) = plan.indicator else {
            return Ok(());
        };
        self.stage(batch, Stage::Propagation, parent, |span| {
            let indicators = match indicator {
                IndicatorPlan::Anomaly => anomalies
                    .as_ref()
                    .map(|a| a.indicators())
                    .ok_or_else(|| AnalysisError::InvalidParameter {
                        name: "indicator",
                        message: "anomaly results unavailable".to_string(),
                    })?,
                IndicatorPlan::Signal(source) => source.series(&table)?,
            };
            let params = PropagationParams::from(&self.config.propagation);
            let result = analyze_propagation(&topology, &indicators, &params)?;
            span.record(fields::GROUP_COUNT, topology.groups.len());
            Ok(((), self.repo.store_propagation(result)))
        })
    }

    /// Similarity, topology and peer-fit, with prior results standing in
    /// for skipped stages.
    fn structure(
        &self,
        batch: &BatchRecord,
        table: &SlotTable,
        plan: &StagePlan,
        parent: &Span,
    ) -> Result<Arc<TopologyResult>, Halt> {
        let matrix: Option<Arc<SimilarityMatrix>> = match plan.similarity {
            Some(source) => Some(self.stage(batch, Stage::Similarity, parent, |span| {
                let series = source.series(table)?;
                let params = SimilarityParams::from(&self.config.similarity);
                let matrix = compute_similarity(&series, &params)?;
                span.record(fields::CELL_COUNT, matrix.len());
                let result_id = self.repo.store_similarity(matrix);
                Ok((self.repo.get_similarity(&result_id)?, result_id))
            })?),
            None => match batch.result_id(Stage::Similarity) {
                Some(id) => Some(self.repo.get_similarity(id)?),
                None => None,
            },
        };

        let topology = if batch.stage(Stage::Topology).state == StageState::Skipped {
            self.repo.get_topology(prior(batch, Stage::Topology)?)?
        } else {
            let matrix = match &matrix {
                Some(matrix) => matrix,
                None => return Err(missing_prior(batch, Stage::Similarity).into()),
            };
            self.stage(batch, Stage::Topology, parent, |span| {
                let params = TopologyParams::from(&self.config.topology);
                let topology = infer_topology(matrix, &params)?;
                span.record(fields::GROUP_COUNT, topology.groups.len());
                let result_id = self.repo.store_topology(topology);
                Ok((self.repo.get_topology(&result_id)?, result_id))
            })?
        };

        if let (Some(matrix), StageState::Pending) = (&matrix, batch.stage(Stage::PeerFit).state) {
            self.stage(batch, Stage::PeerFit, parent, |span| {
                let threshold = self.config.anomaly.effective_peer_fit_threshold();
                let result = score_peer_fit(matrix, &topology, threshold);
                span.record(fields::CELL_COUNT, result.total_cells_analyzed);
                Ok(((), self.repo.store_peer_fit(result)))
            })?;
        }
        Ok(topology)
    }

    fn anomalies(
        &self,
        batch: &BatchRecord,
        table: &SlotTable,
        plan: &StagePlan,
        parent: &Span,
    ) -> Result<Option<Arc<AnomalyResult>>, Halt> {
        if !plan.anomaly {
            return Ok(None);
        }
        self.stage(batch, Stage::Anomaly, parent, |span| {
            let series = table.series(SignalKind::Throughput)?;
            let result = detect_anomalies(&series, &AnomalyParams::from(&self.config.anomaly));
            span.record(fields::CELL_COUNT, result.total_cells_analyzed);
            let result_id = self.repo.store_anomaly(result);
            Ok((Some(self.repo.get_anomaly(&result_id)?), result_id))
        })
    }

    /// Run `work` as `stage`: begin, then complete with the result id it
    /// returns, or fail with its error.
    fn stage<T>(
        &self,
        batch: &BatchRecord,
        stage: Stage,
        parent: &Span,
        work: impl FnOnce(&Span) -> Result<(T, String), PipelineError>,
    ) -> Result<T, Halt> {
        let span = tracing::info_span!(
            parent: parent,
            "stage",
            stage = Empty,
            result_id = Empty,
            cell_count = Empty,
            group_count = Empty
        );
        span.record(fields::STAGE, stage.name());
        let _entered = span.enter();

        let batch_id = batch.batch_id.as_str();
        self.transition(batch_id, |b| b.begin(stage))?;
        match work(&span) {
            Ok((value, result_id)) => {
                span.record(fields::RESULT_ID, result_id.as_str());
                self.transition(batch_id, |b| b.complete(stage, result_id))?;
                tracing::info!("stage completed");
                Ok(value)
            }
            Err(e) => {
                tracing::warn!(error = %e, "stage failed");
                self.transition(batch_id, |b| b.fail(stage, e.to_string()))?;
                Err(Halt::StageFailed)
            }
        }
    }

    fn transition(
        &self,
        batch_id: &str,
        f: impl FnOnce(&mut BatchRecord) -> Result<(), PipelineError>,
    ) -> Result<(), PipelineError> {
        self.repo.update_batch(batch_id, f)?
    }
}

/// Prior result id recorded on a skipped stage.
fn prior(batch: &BatchRecord, stage: Stage) -> Result<&str, StorageError> {
    batch
        .result_id(stage)
        .ok_or_else(|| missing_prior(batch, stage))
}

fn missing_prior(batch: &BatchRecord, stage: Stage) -> StorageError {
    StorageError::NotFound {
        kind: stage.result_kind().name(),
        id: batch.batch_id.clone(),
    }
}
