//! REST API over [`ClientService`], mounted under `/api`.

mod clients;
mod error;

use axum::{routing::get, Json, Router};
use serde_json::{json, Value};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::service::ClientService;

pub use clients::{CREATED, REMOVED, UPDATED};
pub use error::ApiError;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub fn router(service: ClientService) -> Router {
    let api = Router::new()
        .route("/health", get(health))
        .route("/clients", get(clients::list).post(clients::create))
        .route(
            "/clients/{id}",
            get(clients::get).put(clients::update).delete(clients::delete),
        )
        .with_state(service);

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}

/// Serve the API until the process receives Ctrl-C.
pub async fn serve(service: ClientService, bind_addr: &str) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "client registry API listening");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(async {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::error!(error = %err, "failed to listen for shutdown signal");
            }
        })
        .await?;

    tracing::info!("client registry API stopped");
    Ok(())
}
