//! Method selectors shared by configuration and the analysis stages.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Which per-slot column a series is extracted from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalKind {
    Throughput,
    Loss,
    Congestion,
}

impl SignalKind {
    /// Column name in the ingestion table.
    pub fn column(&self) -> &'static str {
        match self {
            Self::Throughput => "throughput_slot",
            Self::Loss => "loss_event",
            Self::Congestion => "congestion_event",
        }
    }

    /// Whether the column holds a 0/1 indicator.
    pub fn is_binary(&self) -> bool {
        !matches!(self, Self::Throughput)
    }
}

impl fmt::Display for SignalKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

/// Pairwise similarity method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimilarityMethod {
    /// Pearson correlation scaled from [-1, 1] to [0, 1].
    #[default]
    Correlation,
    /// Cosine similarity on binarized congestion indicators.
    Cosine,
}

impl SimilarityMethod {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Correlation => "correlation",
            Self::Cosine => "cosine",
        }
    }
}

impl fmt::Display for SimilarityMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Clustering strategy for topology inference.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClusteringStrategy {
    /// Agglomerative clustering with average linkage.
    #[default]
    Hierarchical,
    KMeans,
    /// HDBSCAN; noise points become unassigned cells.
    Density,
}

impl ClusteringStrategy {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Hierarchical => "hierarchical",
            Self::KMeans => "k_means",
            Self::Density => "density",
        }
    }
}

impl fmt::Display for ClusteringStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Per-slot anomaly rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AnomalyRuleKind {
    /// Robust z-score below a negative threshold.
    #[default]
    ZScore,
    /// Relative drop below the rolling median above a ratio threshold.
    DropRatio,
}

impl AnomalyRuleKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::ZScore => "z_score",
            Self::DropRatio => "drop_ratio",
        }
    }
}

impl fmt::Display for AnomalyRuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which per-cell indicator feeds propagation analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndicatorSource {
    /// Per-slot anomaly flags from the anomaly stage.
    #[default]
    Anomaly,
    /// The table's `congestion_event` column.
    Congestion,
    /// The table's `loss_event` column.
    Loss,
}

impl IndicatorSource {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Anomaly => "anomaly",
            Self::Congestion => "congestion",
            Self::Loss => "loss",
        }
    }
}

impl fmt::Display for IndicatorSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

macro_rules! impl_from_name {
    ($name:ident { $($variant:ident),+ $(,)? }) => {
        impl std::str::FromStr for $name {
            type Err = crate::errors::InputError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let wanted = s.trim().to_ascii_lowercase();
                [$(Self::$variant),+]
                    .into_iter()
                    .find(|v| v.name() == wanted)
                    .ok_or_else(|| {
                        crate::errors::InputError::Malformed(format!(
                            "unknown {}: {s}",
                            stringify!($name)
                        ))
                    })
            }
        }
    };
}

impl SignalKind {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Throughput => "throughput",
            Self::Loss => "loss",
            Self::Congestion => "congestion",
        }
    }
}

impl_from_name!(SignalKind { Throughput, Loss, Congestion });
impl_from_name!(SimilarityMethod { Correlation, Cosine });
impl_from_name!(ClusteringStrategy { Hierarchical, KMeans, Density });
impl_from_name!(AnomalyRuleKind { ZScore, DropRatio });
impl_from_name!(IndicatorSource { Anomaly, Congestion, Loss });
