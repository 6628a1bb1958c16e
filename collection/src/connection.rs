use crate::client::MetClient;
use crate::config::Pagination;
use crate::errors::{CollectionError, UpstreamError};
use crate::types::Connection;
use serde_json::Value;

impl Pagination {
    /// `min(requested ?? default_limit, max_limit)`. Negative requests clamp to 0.
    pub fn effective_limit(&self, requested: Option<i32>) -> usize {
        let requested = match requested {
            Some(limit) => u32::try_from(limit).unwrap_or(0),
            None => self.default_limit,
        };
        requested.min(self.max_limit) as usize
    }

    /// Defaults to 0. There is no upper bound; negative requests clamp to 0.
    pub fn effective_offset(&self, requested: Option<i32>) -> usize {
        requested
            .and_then(|offset| usize::try_from(offset).ok())
            .unwrap_or(0)
    }
}

/// Fetches the object listing once and returns the requested window of it.
pub async fn build_connection(
    client: &MetClient,
    pagination: &Pagination,
    updated_after: Option<&str>,
    limit: Option<i32>,
    offset: Option<i32>,
) -> Result<Connection, CollectionError> {
    let limit = pagination.effective_limit(limit);
    let offset = pagination.effective_offset(offset);

    let listing = client
        .listing(updated_after)
        .await
        .map_err(CollectionError::Listing)?;

    let connection = window(&listing, offset, limit).map_err(CollectionError::Listing)?;
    tracing::debug!(
        total = connection.total,
        offset,
        limit,
        returned = connection.object_ids.len(),
        "built object connection"
    );

    Ok(connection)
}

/// Slices `objectIDs[offset..offset + limit]` out of a listing document.
///
/// `total` is whatever upstream reports. Upstream answers an empty filter
/// result with `"objectIDs": null`, which reads as an empty list.
pub fn window(listing: &Value, offset: usize, limit: usize) -> Result<Connection, UpstreamError> {
    let decode_error = |message: &str| UpstreamError::Decode {
        url: "objects".into(),
        message: message.into(),
    };

    let total = listing
        .get("total")
        .and_then(Value::as_u64)
        .ok_or_else(|| decode_error("missing or invalid `total`"))?;

    let ids: &[Value] = match listing.get("objectIDs") {
        None | Some(Value::Null) => &[],
        Some(Value::Array(ids)) => ids.as_slice(),
        Some(_) => return Err(decode_error("`objectIDs` is not a list")),
    };

    let object_ids = ids
        .iter()
        .skip(offset)
        .take(limit)
        .filter_map(Value::as_u64)
        .collect();

    Ok(Connection { total, object_ids })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{FakeFetch, listing_url};
    use serde_json::json;
    use std::sync::Arc;

    fn pagination() -> Pagination {
        Pagination::default()
    }

    fn listing(n: u64) -> Value {
        json!({ "total": n, "objectIDs": (1..=n).collect::<Vec<_>>() })
    }

    #[test]
    fn limit_defaults_and_clamps() {
        let p = pagination();
        assert_eq!(p.effective_limit(None), 10);
        assert_eq!(p.effective_limit(Some(5)), 5);
        assert_eq!(p.effective_limit(Some(20)), 20);
        assert_eq!(p.effective_limit(Some(1000)), 20);
        assert_eq!(p.effective_limit(Some(0)), 0);
        assert_eq!(p.effective_limit(Some(-3)), 0);
    }

    #[test]
    fn offset_defaults_and_clamps() {
        let p = pagination();
        assert_eq!(p.effective_offset(None), 0);
        assert_eq!(p.effective_offset(Some(7)), 7);
        assert_eq!(p.effective_offset(Some(-1)), 0);
    }

    #[test]
    fn window_slices_ids() {
        let connection = window(&listing(100), 1, 2).unwrap();
        assert_eq!(
            connection,
            Connection {
                total: 100,
                object_ids: vec![2, 3]
            }
        );
    }

    #[test]
    fn window_beyond_end_is_empty() {
        let connection = window(&listing(5), 5, 10).unwrap();
        assert_eq!(connection.total, 5);
        assert!(connection.object_ids.is_empty());

        let connection = window(&listing(5), 1_000_000, 10).unwrap();
        assert_eq!(connection.total, 5);
        assert!(connection.object_ids.is_empty());
    }

    #[test]
    fn window_partial_tail() {
        let connection = window(&listing(5), 3, 10).unwrap();
        assert_eq!(connection.object_ids, vec![4, 5]);
    }

    #[test]
    fn null_ids_are_empty() {
        let connection = window(&json!({ "total": 0, "objectIDs": null }), 0, 10).unwrap();
        assert_eq!(connection, Connection::default());
    }

    #[test]
    fn malformed_listing() {
        assert!(matches!(
            window(&json!({ "objectIDs": [1] }), 0, 10),
            Err(UpstreamError::Decode { .. })
        ));
        assert!(matches!(
            window(&json!({ "total": 1, "objectIDs": "1" }), 0, 10),
            Err(UpstreamError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn filtered_listing_is_requested_once() {
        let fake = Arc::new(FakeFetch::new().with_json(listing_url(Some("2020-01-01")), listing(30)));
        let client = fake.client();

        let connection = build_connection(&client, &pagination(), Some("2020-01-01"), Some(1000), None)
            .await
            .unwrap();

        assert_eq!(connection.total, 30);
        assert_eq!(connection.object_ids, (1..=20).collect::<Vec<_>>());
        assert_eq!(fake.requests(), vec![listing_url(Some("2020-01-01"))]);
    }

    #[tokio::test]
    async fn default_limit_applies() {
        let fake = Arc::new(FakeFetch::new().with_json(listing_url(None), listing(30)));

        let connection = build_connection(&fake.client(), &pagination(), None, None, None)
            .await
            .unwrap();

        assert_eq!(connection.object_ids, (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn listing_failure_propagates() {
        let fake = Arc::new(FakeFetch::new().with_error(
            listing_url(None),
            UpstreamError::Status {
                url: listing_url(None),
                status: 503,
            },
        ));

        let result = build_connection(&fake.client(), &pagination(), None, None, None).await;

        assert!(matches!(
            result,
            Err(CollectionError::Listing(UpstreamError::Status { status: 503, .. }))
        ));
    }
}
