use crate::cache::CachedFetch;
use crate::config::Config;
use crate::errors::UpstreamError;
use crate::metrics_defs::{UPSTREAM_DURATION, UPSTREAM_REQUESTS};
use crate::normalize::normalize;
use crate::types::{CanonicalObject, RawObject};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use shared::{counter, histogram};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use url::Url;

/// A decoded upstream response body. Shared so cached listings are not copied.
pub type Document = Arc<Value>;

/// Fetch-by-URL capability the collection is built on.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn get(&self, url: &Url) -> Result<Document, UpstreamError>;
}

/// Fetches JSON documents over HTTP.
pub struct HttpFetch {
    client: reqwest::Client,
    timeout: Duration,
}

impl HttpFetch {
    pub fn new(timeout: Duration) -> Self {
        HttpFetch {
            client: reqwest::Client::new(),
            timeout,
        }
    }

    async fn send(&self, url: &Url) -> Result<Document, UpstreamError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| UpstreamError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        match response.status() {
            status if status.is_success() => {
                let body = response
                    .json::<Value>()
                    .await
                    .map_err(|e| UpstreamError::Decode {
                        url: url.to_string(),
                        message: e.to_string(),
                    })?;
                Ok(Arc::new(body))
            }
            StatusCode::NOT_FOUND => Err(UpstreamError::NotFound(url.to_string())),
            status => Err(UpstreamError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            }),
        }
    }
}

#[async_trait]
impl Fetch for HttpFetch {
    /// The timeout covers the whole exchange, including reading the body.
    async fn get(&self, url: &Url) -> Result<Document, UpstreamError> {
        let start = Instant::now();

        let result = timeout(self.timeout, self.send(url))
            .await
            .unwrap_or_else(|_| Err(UpstreamError::Timeout(url.to_string())));

        let outcome = match &result {
            Ok(_) => "ok",
            Err(e) => e.kind(),
        };
        counter!(UPSTREAM_REQUESTS, "outcome" => outcome).increment(1);
        histogram!(UPSTREAM_DURATION).record(start.elapsed().as_secs_f64());
        tracing::debug!(%url, outcome, "upstream request finished");

        result
    }
}

/// Client for the collection API endpoints.
#[derive(Clone)]
pub struct MetClient {
    base_url: Url,
    fetch: Arc<dyn Fetch>,
}

impl MetClient {
    pub fn new(base_url: Url, fetch: Arc<dyn Fetch>) -> Self {
        MetClient { base_url, fetch }
    }

    /// HTTP transport behind the URL-keyed response cache.
    pub fn from_config(config: &Config) -> Self {
        let http = HttpFetch::new(Duration::from_secs(config.upstream.timeout_secs));
        let cached = CachedFetch::new(
            Arc::new(http),
            Duration::from_secs(config.cache.ttl_secs),
            config.cache.max_capacity,
        );

        MetClient::new(config.upstream.base_url.clone(), Arc::new(cached))
    }

    /// `GET objects`, filtered server side when `metadata_date` is given.
    pub fn listing_url(&self, metadata_date: Option<&str>) -> Result<Url, UpstreamError> {
        let mut url = self.endpoint(&["objects"])?;
        if let Some(date) = metadata_date {
            url.query_pairs_mut().append_pair("metadataDate", date);
        }
        Ok(url)
    }

    /// `GET objects/{id}`. The id is not validated, only escaped.
    pub fn object_url(&self, id: &str) -> Result<Url, UpstreamError> {
        self.endpoint(&["objects", id])
    }

    pub async fn listing(&self, metadata_date: Option<&str>) -> Result<Document, UpstreamError> {
        let url = self.listing_url(metadata_date)?;
        self.fetch.get(&url).await
    }

    /// Fetches and normalizes a single object.
    pub async fn object(&self, id: &str) -> Result<CanonicalObject, UpstreamError> {
        let url = self.object_url(id)?;
        let document = self.fetch.get(&url).await?;
        Ok(normalize(RawObject::from(document.as_ref())))
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, UpstreamError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| UpstreamError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutils::{FakeFetch, base_url};
    use axum::Router;
    use axum::extract::Path;
    use axum::http::StatusCode as AxumStatus;
    use axum::response::IntoResponse;
    use axum::routing::get;
    use serde_json::json;
    use tokio::net::TcpListener;

    async fn object_handler(Path(id): Path<String>) -> axum::response::Response {
        match id.as_str() {
            "1" => axum::Json(json!({ "objectID": 1, "title": "Cup", "objectName": "" }))
                .into_response(),
            "broken" => "not json".into_response(),
            "slow" => {
                tokio::time::sleep(Duration::from_secs(2)).await;
                axum::Json(json!({})).into_response()
            }
            "error" => AxumStatus::BAD_GATEWAY.into_response(),
            _ => (AxumStatus::NOT_FOUND, axum::Json(json!({ "message": "Not a valid object" })))
                .into_response(),
        }
    }

    async fn start_test_server() -> Url {
        let app = Router::new()
            .route("/v1/objects/{id}", get(object_handler))
            .route(
                "/v1/objects",
                get(|| async { axum::Json(json!({ "total": 2, "objectIDs": [1, 2] })) }),
            );

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind to address");
        let port = listener.local_addr().unwrap().port();

        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Url::parse(&format!("http://127.0.0.1:{port}/v1/")).unwrap()
    }

    fn http_client(base: Url, timeout: Duration) -> MetClient {
        MetClient::new(base, Arc::new(HttpFetch::new(timeout)))
    }

    #[test]
    fn builds_endpoint_urls() {
        let client = MetClient::new(base_url(), Arc::new(FakeFetch::new()));

        assert_eq!(
            client.listing_url(None).unwrap().as_str(),
            "https://collection.test/public/collection/v1/objects"
        );
        assert_eq!(
            client.listing_url(Some("2020-01-01")).unwrap().as_str(),
            "https://collection.test/public/collection/v1/objects?metadataDate=2020-01-01"
        );
        assert_eq!(
            client.object_url("436535").unwrap().as_str(),
            "https://collection.test/public/collection/v1/objects/436535"
        );
    }

    #[test]
    fn base_url_without_trailing_slash() {
        let base = Url::parse("https://collection.test/v1").unwrap();
        let client = MetClient::new(base, Arc::new(FakeFetch::new()));

        assert_eq!(
            client.object_url("1").unwrap().as_str(),
            "https://collection.test/v1/objects/1"
        );
    }

    #[test]
    fn object_id_is_escaped() {
        let client = MetClient::new(base_url(), Arc::new(FakeFetch::new()));

        assert_eq!(
            client.object_url("1/2?x").unwrap().as_str(),
            "https://collection.test/public/collection/v1/objects/1%2F2%3Fx"
        );
    }

    #[tokio::test]
    async fn http_object_is_normalized() {
        let client = http_client(start_test_server().await, Duration::from_secs(5));

        let object = client.object("1").await.unwrap();
        assert_eq!(object.id, Some(1));
        assert_eq!(object.title.as_deref(), Some("Cup"));
        assert_eq!(object.physical_type, None);

        let listing = client.listing(None).await.unwrap();
        assert_eq!(listing["total"], 2);
    }

    #[tokio::test]
    async fn http_error_mapping() {
        let client = http_client(start_test_server().await, Duration::from_secs(5));

        assert!(matches!(
            client.object("999999").await,
            Err(UpstreamError::NotFound(_))
        ));
        assert!(matches!(
            client.object("error").await,
            Err(UpstreamError::Status { status: 502, .. })
        ));
        assert!(matches!(
            client.object("broken").await,
            Err(UpstreamError::Decode { .. })
        ));
    }

    #[tokio::test]
    async fn http_timeout() {
        let client = http_client(start_test_server().await, Duration::from_millis(100));

        assert!(matches!(
            client.object("slow").await,
            Err(UpstreamError::Timeout(_))
        ));
    }

    #[tokio::test]
    async fn unreachable_upstream_is_transport_error() {
        // Grab a free port, then release it so nothing is listening there.
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
            listener.local_addr().unwrap().port()
        };
        let client = http_client(
            Url::parse(&format!("http://127.0.0.1:{port}/v1/")).unwrap(),
            Duration::from_secs(5),
        );

        assert!(matches!(
            client.object("1").await,
            Err(UpstreamError::Transport { .. })
        ));
    }
}
