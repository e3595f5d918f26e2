//! Thin HTTP boundary over a frozen engine.
//!
//! One endpoint: `GET /api/v1/search?q=<string>` returns the JSON result
//! envelope, or an empty body when the query is empty.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;

use geokey_core::Engine;

#[derive(Debug, Deserialize)]
struct SearchParams {
    #[serde(default)]
    q: String,
}

pub async fn serve(engine: Arc<Engine>, addr: SocketAddr) -> anyhow::Result<()> {
    let app = Router::new()
        .route("/api/v1/search", get(search))
        .with_state(engine);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "serving search api");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn search(
    State(engine): State<Arc<Engine>>,
    Query(params): Query<SearchParams>,
) -> Response {
    if params.q.trim().is_empty() {
        return String::new().into_response();
    }
    Json(engine.search(&params.q)).into_response()
}
