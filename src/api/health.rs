// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;
use std::time::Duration;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use tokio_util::task::AbortOnDropHandle;
use tracing::warn;
use utoipa::ToSchema;

use crate::db::{LivenessProbe, ProbeError};
use crate::state::AppState;

/// Upper bound on one database round-trip.
pub const PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DbStatus {
    Up,
    Down,
}

/// Health check response.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub ok: bool,
    pub db: DbStatus,
    /// Failure description, present only when `db` is `down`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Run `probe` on its own task, bounded by `limit`.
///
/// Driver errors, timeouts and panics inside the probe all come back as
/// `ProbeError`. The task is aborted if this future is dropped.
pub async fn probe_database(probe: Arc<dyn LivenessProbe>, limit: Duration) -> Result<(), ProbeError> {
    let task = AbortOnDropHandle::new(tokio::spawn(async move { probe.ping().await }));

    match tokio::time::timeout(limit, task).await {
        Ok(Ok(result)) => result,
        Ok(Err(join_error)) => Err(ProbeError(format!("liveness probe failed: {join_error}"))),
        Err(_) => Err(ProbeError(format!(
            "liveness probe timed out after {}ms",
            limit.as_millis()
        ))),
    }
}

/// Database liveness endpoint.
///
/// Returns 200 when the database answers a ping, 500 otherwise.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Database reachable", body = HealthResponse),
        (status = 500, description = "Database unreachable", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    match probe_database(state.probe.clone(), PROBE_TIMEOUT).await {
        Ok(()) => (
            StatusCode::OK,
            Json(HealthResponse {
                ok: true,
                db: DbStatus::Up,
                error: None,
            }),
        ),
        Err(ProbeError(message)) => {
            warn!(error = %message, "Database liveness probe failed");
            let message = if message.is_empty() {
                "unknown database error".to_string()
            } else {
                message
            };
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(HealthResponse {
                    ok: false,
                    db: DbStatus::Down,
                    error: Some(message),
                }),
            )
        }
    }
}
