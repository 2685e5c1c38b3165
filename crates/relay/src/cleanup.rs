//! Post-delivery cleanup of a request/result pair.

use {
    courier_config::StreamsConfig,
    courier_streams::{RecordId, StreamStore},
    tracing::warn,
};

/// Delete the request record and the result record, concurrently.
///
/// Best-effort and idempotent: a failed delete is logged naming both ids and
/// never retried — the worst case is a record that lingers until a restart
/// re-delivers and cleans it up again.
pub async fn remove_pair(
    store: &dyn StreamStore,
    streams: &StreamsConfig,
    request_id: &RecordId,
    result_id: &RecordId,
) {
    let (request, result) = tokio::join!(
        store.delete(&streams.requests, request_id),
        store.delete(&streams.results, result_id),
    );
    if let Err(error) = request {
        warn!(
            %request_id,
            %result_id,
            %error,
            "failed to delete request record during cleanup"
        );
    }
    if let Err(error) = result {
        warn!(
            %request_id,
            %result_id,
            %error,
            "failed to delete result record during cleanup"
        );
    }
}
