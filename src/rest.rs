// Copyright 2026 Filmstat Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP REST API for Filmstat.
//!
//! One analysis endpoint plus a health probe, sharing a single reqwest
//! client through [`AppState`].

use crate::analysis;
use crate::error::AnalysisError;
use crate::fetch::HttpClient;
use axum::extract::{Multipart, State};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde_json::Value;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared per-process state: just the HTTP client.
pub struct AppState {
    pub http: HttpClient,
}

/// Build the axum Router with all REST endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/api/", post(handle_analyze))
        .layer(cors)
        .with_state(state)
}

/// Start the REST API server on the given address.
pub async fn start(bind: &str, port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind((bind, port)).await?;
    tracing::info!("REST API listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

#[derive(serde::Serialize)]
struct Health {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// `POST /api/` — analyze the table behind the URL named in the upload.
///
/// Accepts multipart/form-data with a single file field, answers the four
/// fixed questions, and returns them as a JSON array of strings.
async fn handle_analyze(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AnalysisError> {
    let mut upload: Option<axum::body::Bytes> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AnalysisError::Multipart(e.to_string()))?
    {
        let name = field.name().map(ToString::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| AnalysisError::Multipart(e.to_string()))?;

        // Prefer the conventional "file" field but fall back to the first
        // field of an unlabeled upload.
        if name.as_deref() == Some("file") {
            upload = Some(bytes);
            break;
        }
        if upload.is_none() {
            upload = Some(bytes);
        }
    }

    let bytes = upload.ok_or(AnalysisError::MissingUpload)?;
    let content = String::from_utf8(bytes.to_vec())?;
    let url = analysis::extract_url(&content)?.to_string();
    tracing::info!(%url, "analyzing uploaded target");

    let html = state.http.get_text(&url).await?;
    let answers = analysis::analyze(&html)?;

    Ok(Json(Value::Array(
        answers.into_iter().map(Value::String).collect(),
    )))
}
