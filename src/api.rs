//! HTTP API for the pricing engine.
//!
//! This module exposes a minimal REST API around the fee calculator
//! using the [`axum`](https://crates.io/crates/axum) framework.  The
//! booking flow posts a single quote request and persists the returned
//! breakdown on the reservation; admin tooling posts batches when it
//! recomputes breakdowns for accounting.  The server uses the same
//! validated configuration and card-profile table as the core engine.

use crate::cards::{load_card_profiles_from_dir, CardProfileTable};
use crate::config::PricingConfig;
use crate::engine::{quote, quote_batch};
use crate::error::PricingError;
use crate::models::{QuoteBatchInput, QuoteBatchResult, QuoteRequest};
use anyhow::Result;
use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::post, Json, Router};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Application state shared across requests.
pub struct AppState {
    pub config: PricingConfig,
    pub profiles: RwLock<CardProfileTable>,
}

/// Build the API router, seeding the card-profile table from built-ins
/// plus any JSON overrides found in `profile_dir`.  Returns the router
/// and a handle to the state.
pub async fn build_router(
    config: PricingConfig,
    profile_dir: Option<PathBuf>,
) -> Result<(Router, Arc<AppState>)> {
    let mut profiles = CardProfileTable::builtin();
    if let Some(dir) = profile_dir {
        let overrides = load_card_profiles_from_dir(&dir)?;
        profiles.apply_overrides(&overrides)?;
    }
    let state = Arc::new(AppState {
        config,
        profiles: RwLock::new(profiles),
    });
    let router = Router::new()
        .route("/api/quote", post(quote_handler))
        .route("/api/quote/batch", post(quote_batch_handler))
        .with_state(state.clone());
    Ok((router, state))
}

/// Handler for POST /api/quote
async fn quote_handler(
    State(app_state): State<Arc<AppState>>,
    Json(request): Json<QuoteRequest>,
) -> impl IntoResponse {
    let profiles = app_state.profiles.read().await;
    let card = profiles.get(request.card_region);
    match quote(request.price_cents, &app_state.config, card) {
        Ok(breakdown) => (StatusCode::OK, Json(breakdown)).into_response(),
        Err(err) => error_response(err),
    }
}

/// Handler for POST /api/quote/batch
async fn quote_batch_handler(
    State(app_state): State<Arc<AppState>>,
    Json(input): Json<QuoteBatchInput>,
) -> impl IntoResponse {
    let profiles = app_state.profiles.read().await;
    match quote_batch(&input.quotes, &app_state.config, &profiles) {
        Ok(quotes) => (StatusCode::OK, Json(QuoteBatchResult { quotes })).into_response(),
        Err(err) => error_response(err),
    }
}

/// Maps a pricing error to a JSON error body.  Every `PricingError` is
/// a rejected input, so the status is 422 across the board.
fn error_response(err: PricingError) -> axum::response::Response {
    let body = Json(serde_json::json!({ "error": err.to_string() }));
    (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
}

/// Launch the API server.  Builds the router with the supplied
/// configuration and blocks until the server terminates.
pub async fn serve(
    addr: &str,
    config: PricingConfig,
    profile_dir: Option<PathBuf>,
) -> Result<()> {
    let (router, _state) = build_router(config, profile_dir).await?;
    println!("Server listening on {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router).await.map_err(|e| e.into())
}
