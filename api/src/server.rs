use crate::metrics_defs::{GRAPHQL_DURATION, GRAPHQL_REQUESTS};
use crate::schema::MetSchema;
use async_graphql::http::GraphiQLSource;
use async_graphql_axum::{GraphQLRequest, GraphQLResponse};
use axum::Router;
use axum::extract::State;
use axum::response::{Html, IntoResponse};
use axum::routing::{get, post};
use shared::{counter, histogram};
use std::time::Instant;

pub const GRAPHQL_PATH: &str = "/graphql";

/// GraphQL over HTTP on `/` and `/graphql`, optionally with the explorer on GET.
pub fn router(schema: MetSchema, graphiql: bool) -> Router {
    let endpoint = if graphiql {
        get(graphiql_page).post(graphql_handler)
    } else {
        post(graphql_handler)
    };

    Router::new()
        .route("/", endpoint.clone())
        .route(GRAPHQL_PATH, endpoint)
        .with_state(schema)
}

async fn graphql_handler(State(schema): State<MetSchema>, request: GraphQLRequest) -> GraphQLResponse {
    let start = Instant::now();
    let request = request.into_inner();
    let operation = request.operation_name.clone().unwrap_or_default();

    let response = schema.execute(request).await;

    let status = if response.is_ok() { "ok" } else { "error" };
    counter!(GRAPHQL_REQUESTS, "status" => status).increment(1);
    histogram!(GRAPHQL_DURATION, "status" => status).record(start.elapsed().as_secs_f64());
    if !response.is_ok() {
        tracing::debug!(%operation, errors = response.errors.len(), "graphql request returned errors");
    }

    response.into()
}

async fn graphiql_page() -> impl IntoResponse {
    Html(GraphiQLSource::build().endpoint(GRAPHQL_PATH).finish())
}
