//! Typed identifiers, signal series, and method selectors.

pub mod collections;
pub mod identifiers;
pub mod methods;
pub mod series;

pub use collections::{BTreeMap, FxHashMap, FxHashSet};
pub use identifiers::{CellId, GroupId, SlotId};
pub use methods::{
    AnomalyRuleKind, ClusteringStrategy, IndicatorSource, SignalKind, SimilarityMethod,
};
pub use series::{align_samples, CellSeries};
