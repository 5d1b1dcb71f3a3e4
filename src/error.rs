// Copyright 2026 Filmstat Contributors
// SPDX-License-Identifier: Apache-2.0

//! Error taxonomy for the analysis pipeline.
//!
//! Two tiers: the client-caused validation failures (missing URL line,
//! missing qualifying table, missing upload) surface as 400; everything
//! else (network, parse, numeric, lookup, render) surfaces as 500. The
//! response body is always `{"error": <message>}`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;

/// Everything that can go wrong while answering the four questions.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    #[error("URL not found in file")]
    UrlNotFound,

    #[error("Required table not found")]
    TableNotFound,

    #[error("missing file field")]
    MissingUpload,

    #[error("upload is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("failed to read multipart body: {0}")]
    Multipart(String),

    #[error("request to target page failed: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("table has no {0} column")]
    MissingColumn(&'static str),

    #[error("could not parse {column} value {raw:?} as a number")]
    BadNumber {
        column: &'static str,
        raw: String,
    },

    #[error("no film with worldwide gross above {0}")]
    NoQualifyingFilm(u64),

    #[error("correlation between Rank and Peak is undefined: {0}")]
    Degenerate(&'static str),

    #[error("failed to render scatter plot: {0}")]
    Render(String),
}

impl AnalysisError {
    /// HTTP status for this error. Only the validation tier maps to 400.
    pub fn status(&self) -> StatusCode {
        match self {
            AnalysisError::UrlNotFound
            | AnalysisError::TableNotFound
            | AnalysisError::MissingUpload => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AnalysisError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::warn!(error = %self, "analysis request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
