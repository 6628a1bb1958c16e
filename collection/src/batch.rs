use crate::client::MetClient;
use crate::metrics_defs::OBJECTS_SKIPPED;
use crate::types::CanonicalObject;
use futures::StreamExt;
use futures::stream;
use shared::counter;

/// Fetches and normalizes every id, at most `fan_out` at a time.
///
/// The result follows the order of `ids`. An id that fails for any reason,
/// timeouts included, is logged and left out; it never fails the batch or
/// cancels the other fetches.
pub async fn resolve_objects(
    client: &MetClient,
    ids: &[u64],
    fan_out: usize,
) -> Vec<CanonicalObject> {
    let objects: Vec<CanonicalObject> = stream::iter(ids.iter().copied())
        .map(|id| async move { (id, client.object(&id.to_string()).await) })
        .buffered(fan_out.max(1))
        .filter_map(|(id, result)| async move {
            match result {
                Ok(object) => Some(object),
                Err(e) => {
                    tracing::warn!(id, reason = e.kind(), "couldn't fetch object, skipping: {e}");
                    counter!(OBJECTS_SKIPPED, "reason" => e.kind()).increment(1);
                    None
                }
            }
        })
        .collect()
        .await;

    if objects.len() < ids.len() {
        tracing::info!(
            requested = ids.len(),
            resolved = objects.len(),
            "resolved object batch with skipped entries"
        );
    }

    objects
}
