//! Run manifest emitted after a join finishes.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::hash::Hash256;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ManifestId(pub Uuid);

/// Counters maintained by the join engine across calls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinStats {
    pub left_rows: u64,
    pub left_null_keys: u64,
    pub right_rows: u64,
    pub right_null_keys: u64,
    pub rows_emitted: u64,
    pub seeks: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinManifest {
    pub id: ManifestId,

    /// Stable hash of the join configuration.
    pub config_hash: Hash256,

    /// Context signature the right side was bound with.
    pub signature: String,

    /// Engine version string for provenance.
    pub engine_version: String,

    pub stats: JoinStats,

    /// `produce_next` calls made by the driver.
    pub polls: u64,

    /// Left segments that ended before end of input.
    pub segments: u64,

    /// Milliseconds since Unix epoch (UTC).
    pub started_ms: u64,
    pub finished_ms: u64,
}

impl JoinManifest {
    pub fn new(config_hash: Hash256, signature: String, started_ms: u64) -> Self {
        Self {
            id: ManifestId(Uuid::new_v4()),
            config_hash,
            signature,
            engine_version: crate::VERSION.to_string(),
            stats: JoinStats::default(),
            polls: 0,
            segments: 0,
            started_ms,
            finished_ms: started_ms,
        }
    }

    pub fn finish(mut self, finished_ms: u64, stats: JoinStats) -> Self {
        self.finished_ms = finished_ms;
        self.stats = stats;
        self
    }
}
