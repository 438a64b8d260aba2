// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Auth feature module. Account handling lives with the module's owners;
//! this crate provides token verification and the identity endpoint.

use axum::{routing::get, Json, Router};

use super::FeatureModule;
use crate::auth::{Auth, AuthenticatedUser};
use crate::state::AppState;

pub const AUTH_PREFIX: &str = "/api/auth";

#[derive(Debug, Clone, Copy)]
pub struct AuthModule;

impl FeatureModule for AuthModule {
    fn name(&self) -> &'static str {
        "auth"
    }

    fn prefix(&self) -> &'static str {
        AUTH_PREFIX
    }

    fn router(&self, _state: &AppState) -> Router<AppState> {
        Router::new().route("/me", get(current_user))
    }
}

/// Get the user identified by the bearer token.
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Auth",
    responses(
        (status = 200, description = "Token is valid", body = AuthenticatedUser),
        (status = 401, description = "Unauthorized - invalid or missing token"),
    )
)]
pub async fn current_user(Auth(user): Auth) -> Json<AuthenticatedUser> {
    Json(user)
}
