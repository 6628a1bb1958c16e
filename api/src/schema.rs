use async_graphql::{Context, EmptyMutation, EmptySubscription, ErrorExtensions, ID, Object, Schema};
use collection::Collection;
use collection::types::{CanonicalObject, Connection};

pub type MetSchema = Schema<Query, EmptyMutation, EmptySubscription>;

pub fn build_schema(collection: Collection) -> MetSchema {
    Schema::build(Query, EmptyMutation, EmptySubscription)
        .data(collection)
        .finish()
}

pub struct Query;

#[Object]
impl Query {
    /// Returns any objects with updated data after this date
    async fn all_objects(
        &self,
        ctx: &Context<'_>,
        updated_after: Option<String>,
        limit: Option<i32>,
        offset: Option<i32>,
    ) -> async_graphql::Result<Option<ObjectsConnection>> {
        let connection = ctx
            .data::<Collection>()?
            .connection(updated_after.as_deref(), limit, offset)
            .await
            .map_err(|e| e.extend())?;

        Ok(Some(ObjectsConnection(connection)))
    }

    /// A record for an object, containing all open access data about that
    /// object, including its image if available under Open Access
    async fn object(
        &self,
        ctx: &Context<'_>,
        id: ID,
    ) -> async_graphql::Result<Option<CanonicalObject>> {
        let object = ctx
            .data::<Collection>()?
            .object(&id)
            .await
            .map_err(|e| e.extend())?;

        Ok(Some(object))
    }
}

/// A page of the object listing. Objects are only fetched when selected.
pub struct ObjectsConnection(Connection);

#[Object]
impl ObjectsConnection {
    /// Number of objects upstream reports for the query, not the page size
    async fn total(&self) -> u64 {
        self.0.total
    }

    /// Objects of this page that could be fetched, in listing order
    async fn objects(&self, ctx: &Context<'_>) -> async_graphql::Result<Vec<CanonicalObject>> {
        let collection = ctx.data::<Collection>()?;
        Ok(collection.resolve_objects(&self.0.object_ids).await)
    }
}
