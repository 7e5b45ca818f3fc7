//! Persisted batch record and its forward-only state machine.
//!
//! A batch moves `pending -> running(stage) -> completed | failed`. Each
//! stage moves `pending -> running -> completed | failed`, or
//! `pending -> skipped`. A completed batch accepts no further transitions;
//! a failed one only lets stages that were already running finish.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use fronthaul_core::errors::PipelineError;

use crate::repository::ResultKind;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    DataValidation,
    Similarity,
    Topology,
    PeerFit,
    Anomaly,
    Propagation,
}

impl Stage {
    pub const ALL: [Stage; 6] = [
        Self::DataValidation,
        Self::Similarity,
        Self::Topology,
        Self::PeerFit,
        Self::Anomaly,
        Self::Propagation,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::DataValidation => "data_validation",
            Self::Similarity => "similarity",
            Self::Topology => "topology",
            Self::PeerFit => "peer_fit",
            Self::Anomaly => "anomaly",
            Self::Propagation => "propagation",
        }
    }

    /// Kind of result this stage stores.
    pub fn result_kind(self) -> ResultKind {
        match self {
            Self::DataValidation => ResultKind::Upload,
            Self::Similarity => ResultKind::Similarity,
            Self::Topology => ResultKind::Topology,
            Self::PeerFit => ResultKind::PeerFit,
            Self::Anomaly => ResultKind::Anomaly,
            Self::Propagation => ResultKind::Propagation,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StageState {
    Pending,
    Running,
    Completed,
    Skipped,
    Failed,
}

impl StageState {
    pub fn name(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Running => "running",
            Self::Completed => "completed",
            Self::Skipped => "skipped",
            Self::Failed => "failed",
        }
    }

    /// Completed or skipped: the stage's result is available.
    pub fn is_done(self) -> bool {
        matches!(self, Self::Completed | Self::Skipped)
    }
}

impl fmt::Display for StageState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Status of one stage within a batch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StageRecord {
    pub stage: Stage,
    pub state: StageState,
    /// Stored result id, also set for skipped stages fed by a prior result.
    pub result_id: Option<String>,
    pub error: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl StageRecord {
    fn new(stage: Stage) -> Self {
        Self {
            stage,
            state: StageState::Pending,
            result_id: None,
            error: None,
            started_at: None,
            finished_at: None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "stage", rename_all = "snake_case")]
pub enum BatchStatus {
    Pending,
    /// Most recently started stage.
    Running(Stage),
    Completed,
    Failed,
}

impl BatchStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("pending"),
            Self::Running(stage) => write!(f, "running({stage})"),
            Self::Completed => f.write_str("completed"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// One batch run over an uploaded table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchRecord {
    pub batch_id: String,
    pub upload_id: String,
    pub status: BatchStatus,
    pub stages: Vec<StageRecord>,
    /// Result id of the most recently completed stage.
    pub last_completed: Option<String>,
    pub error: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl BatchRecord {
    pub fn new(batch_id: impl Into<String>, upload_id: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            batch_id: batch_id.into(),
            upload_id: upload_id.into(),
            status: BatchStatus::Pending,
            stages: Stage::ALL.iter().map(|&s| StageRecord::new(s)).collect(),
            last_completed: None,
            error: None,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn stage(&self, stage: Stage) -> &StageRecord {
        &self.stages[stage as usize]
    }

    /// Result id recorded for `stage`, if it completed or was skipped with one.
    pub fn result_id(&self, stage: Stage) -> Option<&str> {
        self.stage(stage).result_id.as_deref()
    }

    /// Mark `stage` running.
    pub fn begin(&mut self, stage: Stage) -> Result<(), PipelineError> {
        self.move_stage(stage, StageState::Pending, StageState::Running)?;
        let now = Utc::now();
        self.stages[stage as usize].started_at = Some(now);
        self.status = BatchStatus::Running(stage);
        self.updated_at = now;
        Ok(())
    }

    /// Mark a running `stage` completed with its stored result.
    pub fn complete(
        &mut self,
        stage: Stage,
        result_id: impl Into<String>,
    ) -> Result<(), PipelineError> {
        self.move_stage(stage, StageState::Running, StageState::Completed)?;
        let result_id = result_id.into();
        let now = Utc::now();
        let record = &mut self.stages[stage as usize];
        record.result_id = Some(result_id.clone());
        record.finished_at = Some(now);
        self.last_completed = Some(result_id);
        self.updated_at = now;
        Ok(())
    }

    /// Skip a pending `stage`, optionally recording the prior result that
    /// stands in for it.
    pub fn skip(&mut self, stage: Stage, result_id: Option<String>) -> Result<(), PipelineError> {
        self.move_stage(stage, StageState::Pending, StageState::Skipped)?;
        self.stages[stage as usize].result_id = result_id;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Fail a running `stage` and the batch with it. Results of completed
    /// stages stay recorded; the batch keeps the first failure's message.
    pub fn fail(&mut self, stage: Stage, message: impl Into<String>) -> Result<(), PipelineError> {
        self.move_stage(stage, StageState::Running, StageState::Failed)?;
        let message = message.into();
        let now = Utc::now();
        let record = &mut self.stages[stage as usize];
        record.error = Some(message.clone());
        record.finished_at = Some(now);
        if self.status != BatchStatus::Failed {
            self.error = Some(format!("{stage} failed: {message}"));
            self.status = BatchStatus::Failed;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Complete the batch once every stage is done.
    pub fn finish(&mut self) -> Result<(), PipelineError> {
        let open = self.stages.iter().find(|s| !s.state.is_done());
        if self.status.is_terminal() || open.is_some() {
            return Err(self.invalid(BatchStatus::Completed.to_string()));
        }
        self.status = BatchStatus::Completed;
        self.updated_at = Utc::now();
        Ok(())
    }

    fn move_stage(
        &mut self,
        stage: Stage,
        from: StageState,
        to: StageState,
    ) -> Result<(), PipelineError> {
        let current = self.stages[stage as usize].state;
        // A stage already running when the batch failed may still finish.
        let open = match self.status {
            BatchStatus::Completed => false,
            BatchStatus::Failed => from == StageState::Running,
            BatchStatus::Pending | BatchStatus::Running(_) => true,
        };
        if !open || current != from {
            return Err(self.invalid(format!("{stage}:{to}")));
        }
        self.stages[stage as usize].state = to;
        Ok(())
    }

    fn invalid(&self, to: String) -> PipelineError {
        PipelineError::InvalidTransition {
            batch_id: self.batch_id.clone(),
            from: self.status.to_string(),
            to,
        }
    }
}
