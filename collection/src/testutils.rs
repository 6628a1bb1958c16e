use crate::client::{Document, Fetch, MetClient};
use crate::errors::UpstreamError;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use url::Url;

pub const BASE_URL: &str = "https://collection.test/public/collection/v1/";

pub fn base_url() -> Url {
    Url::parse(BASE_URL).unwrap()
}

pub fn object_url(id: u64) -> String {
    format!("{BASE_URL}objects/{id}")
}

pub fn listing_url(metadata_date: Option<&str>) -> String {
    match metadata_date {
        Some(date) => format!("{BASE_URL}objects?metadataDate={date}"),
        None => format!("{BASE_URL}objects"),
    }
}

/// A minimal upstream object record.
pub fn object_record(id: u64) -> Value {
    json!({
        "objectID": id,
        "title": format!("Object {id}"),
        "objectName": "",
        "additionalImages": [],
        "artistDisplayName": "",
        "isPublicDomain": false
    })
}

/// In-memory [`Fetch`] that answers from canned responses and records every
/// URL it is asked for. Unknown URLs answer `NotFound`.
#[derive(Default)]
pub struct FakeFetch {
    responses: HashMap<String, Result<Value, UpstreamError>>,
    delays: HashMap<String, Duration>,
    requests: Mutex<Vec<String>>,
}

impl FakeFetch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_json(mut self, url: impl Into<String>, body: Value) -> Self {
        self.responses.insert(url.into(), Ok(body));
        self
    }

    pub fn with_error(mut self, url: impl Into<String>, error: UpstreamError) -> Self {
        self.responses.insert(url.into(), Err(error));
        self
    }

    pub fn with_delay(mut self, url: impl Into<String>, delay: Duration) -> Self {
        self.delays.insert(url.into(), delay);
        self
    }

    /// Registers a listing and a record for each of `ids`.
    pub fn with_listing(mut self, metadata_date: Option<&str>, ids: &[u64]) -> Self {
        self = self.with_json(
            listing_url(metadata_date),
            json!({ "total": ids.len(), "objectIDs": ids }),
        );
        for id in ids {
            self = self.with_json(object_url(*id), object_record(*id));
        }
        self
    }

    /// URLs requested so far, in request order.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn client(self: &Arc<Self>) -> MetClient {
        MetClient::new(base_url(), self.clone())
    }
}

#[async_trait]
impl Fetch for FakeFetch {
    async fn get(&self, url: &Url) -> Result<Document, UpstreamError> {
        let key = url.as_str().to_owned();
        self.requests.lock().unwrap().push(key.clone());

        if let Some(delay) = self.delays.get(&key) {
            tokio::time::sleep(*delay).await;
        }

        match self.responses.get(&key) {
            Some(Ok(body)) => Ok(Arc::new(body.clone())),
            Some(Err(e)) => Err(e.clone()),
            None => Err(UpstreamError::NotFound(key)),
        }
    }
}
