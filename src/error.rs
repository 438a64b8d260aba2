// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::api::dispatch::RouteTableError;
use crate::config::ConfigError;
use crate::db::DatabaseError;

/// Errors that stop the process before it serves traffic.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
    #[error(transparent)]
    Routes(#[from] RouteTableError),
    #[error("invalid bind address {0}")]
    BindAddress(String),
    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "not_found")
    }

    pub fn method_not_allowed() -> Self {
        Self::new(StatusCode::METHOD_NOT_ALLOWED, "method_not_allowed")
    }

    pub fn frontend_not_built() -> Self {
        Self::new(StatusCode::NOT_IMPLEMENTED, "frontend_not_built")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    #[test]
    fn constructors_set_status_and_message() {
        let nf = ApiError::not_found();
        assert_eq!(nf.status, StatusCode::NOT_FOUND);
        assert_eq!(nf.message, "not_found");

        let nb = ApiError::frontend_not_built();
        assert_eq!(nb.status, StatusCode::NOT_IMPLEMENTED);
        assert_eq!(nb.message, "frontend_not_built");

        assert_eq!(ApiError::method_not_allowed().status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn into_response_returns_json_body() {
        let response = ApiError::frontend_not_built().into_response();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);

        let body_bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body = String::from_utf8(body_bytes.to_vec()).unwrap();
        assert_eq!(body, r#"{"error":"frontend_not_built"}"#);
    }
}
