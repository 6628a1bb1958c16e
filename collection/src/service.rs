use crate::batch::resolve_objects;
use crate::client::MetClient;
use crate::config::{Config, Pagination};
use crate::connection::build_connection;
use crate::errors::CollectionError;
use crate::types::{CanonicalObject, Connection};

/// Entry point for the query layer: single objects, listing windows and
/// batch resolution over one upstream client.
#[derive(Clone)]
pub struct Collection {
    client: MetClient,
    pagination: Pagination,
}

impl Collection {
    pub fn new(client: MetClient, pagination: Pagination) -> Self {
        Collection { client, pagination }
    }

    pub fn from_config(config: &Config) -> Self {
        Collection::new(MetClient::from_config(config), config.pagination.clone())
    }

    /// Any upstream failure, not found included, is returned to the caller.
    pub async fn object(&self, id: &str) -> Result<CanonicalObject, CollectionError> {
        self.client
            .object(id)
            .await
            .map_err(|source| CollectionError::Object {
                id: id.to_owned(),
                source,
            })
    }

    pub async fn connection(
        &self,
        updated_after: Option<&str>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> Result<Connection, CollectionError> {
        build_connection(&self.client, &self.pagination, updated_after, limit, offset).await
    }

    /// Fan-out is capped by `max_limit`, the same cap that bounds a page.
    pub async fn resolve_objects(&self, ids: &[u64]) -> Vec<CanonicalObject> {
        resolve_objects(&self.client, ids, self.pagination.max_limit as usize).await
    }
}
