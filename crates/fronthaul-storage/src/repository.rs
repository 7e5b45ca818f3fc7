//! ResultRepository: concurrent id-keyed result store via DashMap.
//!
//! Writes to distinct ids never contend beyond their shard; the last writer
//! wins per id. Results are immutable once stored and handed out as `Arc`s.
//! Batch records are the one mutable entry, updated in place through
//! [`ResultRepository::update_batch`].

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

use fronthaul_analysis::{
    AnomalyResult, PeerFitResult, PropagationResult, SimilarityMatrix, TopologyResult,
};
use fronthaul_core::errors::StorageError;
use fronthaul_core::SlotTable;

use crate::batch::BatchRecord;

/// What an id refers to. The name doubles as the id prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResultKind {
    Upload,
    Similarity,
    Topology,
    PeerFit,
    Anomaly,
    Propagation,
    Batch,
}

impl ResultKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Upload => "upload",
            Self::Similarity => "similarity",
            Self::Topology => "topology",
            Self::PeerFit => "peer_fit",
            Self::Anomaly => "anomaly",
            Self::Propagation => "propagation",
            Self::Batch => "batch",
        }
    }
}

impl fmt::Display for ResultKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A stored value.
#[derive(Debug, Clone)]
pub enum StoredResult {
    Upload(Arc<SlotTable>),
    Similarity(Arc<SimilarityMatrix>),
    Topology(Arc<TopologyResult>),
    PeerFit(Arc<PeerFitResult>),
    Anomaly(Arc<AnomalyResult>),
    Propagation(Arc<PropagationResult>),
    Batch(BatchRecord),
}

impl StoredResult {
    pub fn kind(&self) -> ResultKind {
        match self {
            Self::Upload(_) => ResultKind::Upload,
            Self::Similarity(_) => ResultKind::Similarity,
            Self::Topology(_) => ResultKind::Topology,
            Self::PeerFit(_) => ResultKind::PeerFit,
            Self::Anomaly(_) => ResultKind::Anomaly,
            Self::Propagation(_) => ResultKind::Propagation,
            Self::Batch(_) => ResultKind::Batch,
        }
    }
}

#[derive(Debug, Clone)]
struct Entry {
    created_at: DateTime<Utc>,
    value: StoredResult,
}

/// Thread-safe result repository. Construct one per process and pass it
/// by reference.
#[derive(Debug, Default)]
pub struct ResultRepository {
    entries: DashMap<String, Entry>,
}

impl ResultRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// `<prefix>_<8 hex digits>` from a random UUID.
    pub fn generate_id(prefix: &str) -> String {
        let hex = uuid::Uuid::new_v4().simple().to_string();
        format!("{prefix}_{}", &hex[..8])
    }

    /// Store `value` under `id`, replacing whatever was there.
    pub fn insert(&self, id: impl Into<String>, value: StoredResult) {
        let id = id.into();
        tracing::debug!(result_id = %id, kind = %value.kind(), "result stored");
        self.entries.insert(
            id,
            Entry {
                created_at: Utc::now(),
                value,
            },
        );
    }

    fn store(&self, value: StoredResult) -> String {
        let id = Self::generate_id(value.kind().name());
        self.insert(id.clone(), value);
        id
    }

    pub fn store_upload(&self, table: SlotTable) -> String {
        self.store(StoredResult::Upload(Arc::new(table)))
    }

    pub fn store_similarity(&self, matrix: SimilarityMatrix) -> String {
        self.store(StoredResult::Similarity(Arc::new(matrix)))
    }

    pub fn store_topology(&self, topology: TopologyResult) -> String {
        self.store(StoredResult::Topology(Arc::new(topology)))
    }

    pub fn store_peer_fit(&self, peer_fit: PeerFitResult) -> String {
        self.store(StoredResult::PeerFit(Arc::new(peer_fit)))
    }

    pub fn store_anomaly(&self, anomalies: AnomalyResult) -> String {
        self.store(StoredResult::Anomaly(Arc::new(anomalies)))
    }

    pub fn store_propagation(&self, propagation: PropagationResult) -> String {
        self.store(StoredResult::Propagation(Arc::new(propagation)))
    }

    /// Store a batch record under its own `batch_id`.
    pub fn store_batch(&self, batch: BatchRecord) -> String {
        let id = batch.batch_id.clone();
        self.insert(id.clone(), StoredResult::Batch(batch));
        id
    }

    pub fn get(&self, id: &str) -> Option<StoredResult> {
        self.entries.get(id).map(|e| e.value.clone())
    }

    pub fn kind_of(&self, id: &str) -> Option<ResultKind> {
        self.entries.get(id).map(|e| e.value.kind())
    }

    pub fn created_at(&self, id: &str) -> Option<DateTime<Utc>> {
        self.entries.get(id).map(|e| e.created_at)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.entries.contains_key(id)
    }

    /// Fail unless `id` exists and holds a `kind`.
    pub fn expect_kind(&self, id: &str, kind: ResultKind) -> Result<(), StorageError> {
        match self.kind_of(id) {
            Some(actual) if actual == kind => Ok(()),
            Some(actual) => Err(mismatch(id, kind, actual)),
            None => Err(not_found(id, kind)),
        }
    }

    pub fn get_upload(&self, id: &str) -> Result<Arc<SlotTable>, StorageError> {
        self.typed(id, ResultKind::Upload, |v| match v {
            StoredResult::Upload(t) => Some(Arc::clone(t)),
            _ => None,
        })
    }

    pub fn get_similarity(&self, id: &str) -> Result<Arc<SimilarityMatrix>, StorageError> {
        self.typed(id, ResultKind::Similarity, |v| match v {
            StoredResult::Similarity(m) => Some(Arc::clone(m)),
            _ => None,
        })
    }

    pub fn get_topology(&self, id: &str) -> Result<Arc<TopologyResult>, StorageError> {
        self.typed(id, ResultKind::Topology, |v| match v {
            StoredResult::Topology(t) => Some(Arc::clone(t)),
            _ => None,
        })
    }

    pub fn get_peer_fit(&self, id: &str) -> Result<Arc<PeerFitResult>, StorageError> {
        self.typed(id, ResultKind::PeerFit, |v| match v {
            StoredResult::PeerFit(p) => Some(Arc::clone(p)),
            _ => None,
        })
    }

    pub fn get_anomaly(&self, id: &str) -> Result<Arc<AnomalyResult>, StorageError> {
        self.typed(id, ResultKind::Anomaly, |v| match v {
            StoredResult::Anomaly(a) => Some(Arc::clone(a)),
            _ => None,
        })
    }

    pub fn get_propagation(&self, id: &str) -> Result<Arc<PropagationResult>, StorageError> {
        self.typed(id, ResultKind::Propagation, |v| match v {
            StoredResult::Propagation(p) => Some(Arc::clone(p)),
            _ => None,
        })
    }

    /// Snapshot of a batch record.
    pub fn get_batch(&self, id: &str) -> Result<BatchRecord, StorageError> {
        self.typed(id, ResultKind::Batch, |v| match v {
            StoredResult::Batch(b) => Some(b.clone()),
            _ => None,
        })
    }

    /// Mutate a batch record in place under its shard lock and bump its
    /// `updated_at`.
    pub fn update_batch<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut BatchRecord) -> R,
    ) -> Result<R, StorageError> {
        let mut entry = self
            .entries
            .get_mut(id)
            .ok_or_else(|| not_found(id, ResultKind::Batch))?;
        match &mut entry.value {
            StoredResult::Batch(batch) => {
                let out = f(batch);
                batch.updated_at = Utc::now();
                Ok(out)
            }
            other => Err(mismatch(id, ResultKind::Batch, other.kind())),
        }
    }

    pub fn remove(&self, id: &str) -> Option<StoredResult> {
        self.entries.remove(id).map(|(_, e)| e.value)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ids starting with `prefix`, sorted.
    pub fn ids_with_prefix(&self, prefix: &str) -> Vec<String> {
        let mut ids: Vec<String> = self
            .entries
            .iter()
            .filter(|e| e.key().starts_with(prefix))
            .map(|e| e.key().clone())
            .collect();
        ids.sort();
        ids
    }

    fn typed<T>(
        &self,
        id: &str,
        kind: ResultKind,
        extract: impl FnOnce(&StoredResult) -> Option<T>,
    ) -> Result<T, StorageError> {
        let entry = self.entries.get(id).ok_or_else(|| not_found(id, kind))?;
        extract(&entry.value).ok_or_else(|| mismatch(id, kind, entry.value.kind()))
    }
}

fn not_found(id: &str, kind: ResultKind) -> StorageError {
    StorageError::NotFound {
        kind: kind.name(),
        id: id.to_string(),
    }
}

fn mismatch(id: &str, expected: ResultKind, actual: ResultKind) -> StorageError {
    StorageError::KindMismatch {
        id: id.to_string(),
        expected: expected.name(),
        actual: actual.name(),
    }
}
