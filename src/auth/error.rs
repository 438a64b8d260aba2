// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token failures and their JSON rendering.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Why a request could not be tied to a verified identity.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    #[error("Authorization header is required")]
    MissingAuthHeader,
    /// Header present but not `Bearer <token>`.
    #[error("Authorization header must use the Bearer scheme")]
    InvalidAuthHeader,
    #[error("Token could not be decoded")]
    MalformedToken,
    #[error("Token signature does not match")]
    InvalidSignature,
    #[error("Token has expired")]
    TokenExpired,
    #[error("Token is not valid yet")]
    TokenNotYetValid,
    /// A refresh token was sent to an endpoint that needs an access token.
    #[error("An access token is required")]
    WrongTokenType,
    #[error("Token service failure: {0}")]
    InternalError(String),
}

#[derive(Serialize)]
struct ErrorPayload<'a> {
    error: String,
    error_code: &'a str,
}

impl AuthError {
    /// Stable machine-readable code sent alongside the message.
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::MissingAuthHeader => "missing_auth_header",
            Self::InvalidAuthHeader => "invalid_auth_header",
            Self::MalformedToken => "malformed_token",
            Self::InvalidSignature => "invalid_signature",
            Self::TokenExpired => "token_expired",
            Self::TokenNotYetValid => "token_not_yet_valid",
            Self::WrongTokenType => "wrong_token_type",
            Self::InternalError(_) => "internal_error",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        if matches!(self, Self::InternalError(_)) {
            StatusCode::INTERNAL_SERVER_ERROR
        } else {
            StatusCode::UNAUTHORIZED
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::ExpiredSignature => Self::TokenExpired,
            ErrorKind::ImmatureSignature => Self::TokenNotYetValid,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            _ => Self::MalformedToken,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let payload = ErrorPayload {
            error: self.to_string(),
            error_code: self.error_code(),
        };
        (self.status_code(), Json(payload)).into_response()
    }
}
