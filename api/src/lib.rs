pub mod config;
pub mod metrics_defs;
pub mod schema;
pub mod server;

use collection::Collection;
use shared::admin_service::AdminService;
use shared::http::run_http_service;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::net::TcpListener;

#[derive(thiserror::Error, Debug)]
pub enum ApiError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Serves GraphQL on the main listener and the probes on the admin listener
/// until either fails.
pub async fn run(config: config::Config, collection: Collection) -> Result<(), ApiError> {
    let ready = Arc::new(AtomicBool::new(false));

    let app = server::router(schema::build_schema(collection), config.graphiql);
    let api_task = serve(&config.listener, app, ready.clone());

    let probe = ready.clone();
    let admin_task = run_http_service(
        &config.admin_listener.host,
        config.admin_listener.port,
        AdminService::<_, ApiError>::new(move || probe.load(Ordering::Relaxed)),
    );

    tokio::try_join!(api_task, admin_task)?;
    Ok(())
}

async fn serve(
    listener: &config::Listener,
    app: axum::Router,
    ready: Arc<AtomicBool>,
) -> Result<(), ApiError> {
    let tcp_listener = TcpListener::bind(listener.address()).await?;
    ready.store(true, Ordering::Relaxed);
    tracing::info!(
        "GraphQL endpoint ready at http://{}{}",
        listener.address(),
        server::GRAPHQL_PATH
    );

    axum::serve(tcp_listener, app).await?;
    Ok(())
}
