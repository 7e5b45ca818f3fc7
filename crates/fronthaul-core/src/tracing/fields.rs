//! Field names shared by spans and events across crates.

pub const BATCH_ID: &str = "batch_id";
pub const STAGE: &str = "stage";
pub const RESULT_ID: &str = "result_id";
pub const CELL_COUNT: &str = "cell_count";
pub const GROUP_COUNT: &str = "group_count";
