//! Which table columns feed which stage.

use fronthaul_analysis::anomaly::derive_congestion;
use fronthaul_core::constants;
use fronthaul_core::errors::InputError;
use fronthaul_core::types::{CellSeries, IndicatorSource, SignalKind};
use fronthaul_core::{FronthaulConfig, SlotTable};

/// Where a per-cell series comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalSource {
    Column(SignalKind),
    /// Congestion flags derived from throughput against its rolling median.
    DerivedCongestion,
}

impl SignalSource {
    pub fn series(self, table: &SlotTable) -> Result<Vec<CellSeries>, InputError> {
        match self {
            Self::Column(kind) => table.series(kind),
            Self::DerivedCongestion => Ok(table
                .series(SignalKind::Throughput)?
                .iter()
                .map(|s| {
                    derive_congestion(
                        s,
                        constants::DEFAULT_CONGESTION_WINDOW,
                        constants::DEFAULT_CONGESTION_RATIO,
                    )
                })
                .collect()),
        }
    }
}

/// Per-cell indicator fed to propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorPlan {
    /// Anomaly flags from the anomaly stage.
    Anomaly,
    Signal(SignalSource),
}

/// Inputs resolved for one table and configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StagePlan {
    /// Similarity input; `None` when the stage is not needed.
    pub similarity: Option<SignalSource>,
    /// The anomaly stage runs only over throughput.
    pub anomaly: bool,
    /// Propagation input; `None` when the stage is not needed.
    pub indicator: Option<IndicatorPlan>,
}

impl StagePlan {
    /// Resolve stage inputs, failing with `MissingColumn` when a needed
    /// stage has nothing to work on.
    pub fn resolve(
        table: &SlotTable,
        config: &FronthaulConfig,
        needs_similarity: bool,
        needs_propagation: bool,
    ) -> Result<Self, InputError> {
        let derive = config.pipeline.effective_derive_congestion();
        let anomaly = table.has(SignalKind::Throughput);

        let similarity = if needs_similarity {
            Some(similarity_source(table, config.similarity.signal, derive)?)
        } else {
            None
        };

        let indicator = if needs_propagation {
            let preferred = config.propagation.effective_indicator();
            match indicator_source(table, preferred, anomaly, derive) {
                Some(plan) => Some(plan),
                None => {
                    return Err(InputError::MissingColumn {
                        column: indicator_column(preferred).to_string(),
                    })
                }
            }
        } else {
            None
        };

        Ok(Self {
            similarity,
            anomaly,
            indicator,
        })
    }
}

fn congestion_source(table: &SlotTable, derive: bool) -> Option<SignalSource> {
    if table.has(SignalKind::Congestion) {
        Some(SignalSource::Column(SignalKind::Congestion))
    } else if derive && table.has(SignalKind::Throughput) {
        Some(SignalSource::DerivedCongestion)
    } else {
        None
    }
}

/// Configured signal, else the first present of congestion, loss,
/// throughput. Throughput is turned into derived congestion when allowed.
fn similarity_source(
    table: &SlotTable,
    configured: Option<SignalKind>,
    derive: bool,
) -> Result<SignalSource, InputError> {
    match configured {
        Some(SignalKind::Congestion) => {
            congestion_source(table, derive).ok_or_else(|| InputError::MissingColumn {
                column: SignalKind::Congestion.column().to_string(),
            })
        }
        Some(kind) => {
            table.require(kind)?;
            Ok(SignalSource::Column(kind))
        }
        None => {
            if let Some(source) = congestion_source(table, derive) {
                Ok(source)
            } else if table.has(SignalKind::Loss) {
                Ok(SignalSource::Column(SignalKind::Loss))
            } else {
                table.require(SignalKind::Throughput)?;
                Ok(SignalSource::Column(SignalKind::Throughput))
            }
        }
    }
}

/// Configured indicator when available, else anomaly, congestion, loss.
fn indicator_source(
    table: &SlotTable,
    preferred: IndicatorSource,
    anomaly: bool,
    derive: bool,
) -> Option<IndicatorPlan> {
    let from_anomaly = anomaly.then_some(IndicatorPlan::Anomaly);
    let from_congestion = congestion_source(table, derive).map(IndicatorPlan::Signal);
    let from_loss = table
        .has(SignalKind::Loss)
        .then_some(IndicatorPlan::Signal(SignalSource::Column(SignalKind::Loss)));

    let first = match preferred {
        IndicatorSource::Anomaly => from_anomaly,
        IndicatorSource::Congestion => from_congestion,
        IndicatorSource::Loss => from_loss,
    };
    first.or(from_anomaly).or(from_congestion).or(from_loss)
}

fn indicator_column(source: IndicatorSource) -> &'static str {
    match source {
        IndicatorSource::Anomaly => SignalKind::Throughput.column(),
        IndicatorSource::Congestion => SignalKind::Congestion.column(),
        IndicatorSource::Loss => SignalKind::Loss.column(),
    }
}
