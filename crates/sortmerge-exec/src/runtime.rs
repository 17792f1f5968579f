//! Runtime: poll a `MergeJoin` until end of stream and emit a `JoinManifest`.
//!
//! The engine is synchronous and pull-driven, so the driver is a plain loop.
//! Every joined row goes straight to the sink; nothing is buffered here.

use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::{info, warn};

use sortmerge_core::config::JoinConfig;
use sortmerge_core::hash::hash_serde;
use sortmerge_core::manifest::JoinManifest;
use sortmerge_io::SortedSource;
use sortmerge_operators::{JoinPoll, LeftInput, MergeJoin, OpError};

use crate::metrics;
use crate::sink::RowSink;

#[derive(Debug, Error)]
pub enum ExecError {
    #[error("operator: {0}")]
    Operator(#[from] OpError),
    #[error("io: {0}")]
    Io(#[from] sortmerge_io::Error),
    #[error("invalid job: {0}")]
    Invalid(String),
    #[error("job file: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("hashing error: {0}")]
    Hash(String),
}

/// Drive `engine` over `left` until `EndOfStream`, writing every joined row
/// to `sink`. The right side is closed on every exit path.
pub fn run_join<S, L, K>(
    config: &JoinConfig,
    engine: &mut MergeJoin<S>,
    left: &mut L,
    sink: &mut K,
) -> Result<JoinManifest, ExecError>
where
    S: SortedSource,
    L: LeftInput + ?Sized,
    K: RowSink + ?Sized,
{
    let config_hash = hash_serde(config).map_err(|e| ExecError::Hash(e.to_string()))?;
    let signature = config
        .signature()
        .map_err(|e| ExecError::Hash(e.to_string()))?;
    let mut manifest = JoinManifest::new(config_hash, signature, now_millis());

    let mut polls = 0u64;
    let mut segments = 0u64;
    loop {
        polls += 1;
        match engine.produce_next(left)? {
            JoinPoll::Row(row) => {
                if let Err(e) = sink.write_row(&row) {
                    warn!(error = %e, "sink rejected row, stopping join");
                    engine.close();
                    return Err(e);
                }
            }
            JoinPoll::NeedMore => {}
            JoinPoll::EndOfSegment => segments += 1,
            JoinPoll::EndOfStream => break,
        }
    }
    sink.finish()?;

    manifest.polls = polls;
    manifest.segments = segments;
    let manifest = manifest.finish(now_millis(), engine.stats());
    info!(
        id = %manifest.id.0,
        rows = manifest.stats.rows_emitted,
        left_rows = manifest.stats.left_rows,
        right_rows = manifest.stats.right_rows,
        seeks = manifest.stats.seeks,
        "merge join finished"
    );
    metrics::record_join(&manifest);
    Ok(manifest)
}

fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}
