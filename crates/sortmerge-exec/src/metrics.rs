//! Metrics/tracing hooks.
//!
//! Emits structured tracing events only; wire a subscriber or exporter in
//! the binary layer.

use sortmerge_core::manifest::JoinManifest;

pub fn emit_span(event: &str, key_values: &[(&str, String)]) {
    let span = tracing::trace_span!("sortmerge", event);
    let _enter = span.enter();
    for (k, v) in key_values {
        tracing::trace!(%event, %k, %v, "metric");
    }
}

/// One metric event per join counter.
pub fn record_join(manifest: &JoinManifest) {
    let s = &manifest.stats;
    emit_span(
        "merge_join",
        &[
            ("left_rows", s.left_rows.to_string()),
            ("left_null_keys", s.left_null_keys.to_string()),
            ("right_rows", s.right_rows.to_string()),
            ("right_null_keys", s.right_null_keys.to_string()),
            ("rows_emitted", s.rows_emitted.to_string()),
            ("seeks", s.seeks.to_string()),
            ("polls", manifest.polls.to_string()),
            (
                "elapsed_ms",
                manifest.finished_ms.saturating_sub(manifest.started_ms).to_string(),
            ),
        ],
    );
}
