//! Batch submission request.

/// What to run over an uploaded table.
///
/// A prior similarity or topology id replaces the stages that would
/// produce it. A prior topology also makes similarity unnecessary.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchRequest {
    pub upload_id: String,
    pub similarity_id: Option<String>,
    pub topology_id: Option<String>,
    /// Run propagation. Also gated by `[pipeline] propagation`.
    pub propagation: bool,
}

impl BatchRequest {
    pub fn new(upload_id: impl Into<String>) -> Self {
        Self {
            upload_id: upload_id.into(),
            similarity_id: None,
            topology_id: None,
            propagation: true,
        }
    }

    pub fn with_similarity(mut self, id: impl Into<String>) -> Self {
        self.similarity_id = Some(id.into());
        self
    }

    pub fn with_topology(mut self, id: impl Into<String>) -> Self {
        self.topology_id = Some(id.into());
        self
    }

    pub fn without_propagation(mut self) -> Self {
        self.propagation = false;
        self
    }
}
