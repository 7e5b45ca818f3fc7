//! Shared constants for the Fronthaul topology engine.

/// Fronthaul version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Default rolling baseline window, in slots.
pub const DEFAULT_WINDOW: usize = 200;

/// Default minimum samples before a rolling baseline is defined.
pub const DEFAULT_MIN_PERIODS: usize = 50;

/// Default robust z-score threshold (a severe drop below baseline).
pub const DEFAULT_Z_THRESHOLD: f64 = -3.5;

/// Default drop-ratio threshold (a 30% throughput collapse).
pub const DEFAULT_DROP_THRESHOLD: f64 = 0.30;

/// Guard added to MAD and baselines before dividing.
pub const DEFAULT_EPSILON: f64 = 1e-6;

/// Default fraction of anomalous slots above which a cell is flagged.
pub const DEFAULT_FLAG_RATE: f64 = 0.25;

/// Default peer-fit confidence below which a cell is anomalous.
pub const DEFAULT_PEER_FIT_THRESHOLD: f64 = 0.5;

/// Default maximum cross-correlation lag, in slots.
pub const DEFAULT_MAX_LAG: usize = 50;

/// Default minimum |correlation| for a propagation event.
pub const DEFAULT_MIN_CORRELATION: f64 = 0.6;

/// Default slot duration in milliseconds.
pub const DEFAULT_SLOT_DURATION_MS: f64 = 0.1;

/// Minimum aligned signal length for lag analysis.
pub const DEFAULT_MIN_SIGNAL_LENGTH: usize = 10;

/// Guard added to the standard deviation when normalizing lag signals.
pub const NORMALIZE_EPSILON: f64 = 1e-8;

/// Default cluster count for k-means when none is configured.
pub const DEFAULT_KMEANS_CLUSTERS: usize = 3;

/// Rolling window used when deriving congestion from throughput.
pub const DEFAULT_CONGESTION_WINDOW: usize = 20;

/// Throughput below this fraction of its rolling median counts as congestion.
pub const DEFAULT_CONGESTION_RATIO: f64 = 0.5;

/// Project configuration file name.
pub const CONFIG_FILE_NAME: &str = "fronthaul.toml";
