// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Frontend delivery: exact static assets first, then the index document so
//! client-side routing can take over.

use std::path::Path;

use axum::{
    extract::Request,
    response::{IntoResponse, Response},
};
use tracing::warn;

use super::files::serve_file;
use crate::assets::{self, Resolved};
use crate::error::ApiError;

pub const INDEX_DOCUMENT: &str = "index.html";

pub async fn serve(frontend_dir: &Path, path: &str, request: Request) -> Response {
    if let Resolved::File(asset) = assets::resolve(frontend_dir, path).await {
        return serve_file(asset, request).await;
    }

    match assets::resolve(frontend_dir, INDEX_DOCUMENT).await {
        Resolved::File(index) => serve_file(index, request).await,
        Resolved::NotFound => {
            warn!(dir = %frontend_dir.display(), "Frontend index document missing");
            ApiError::frontend_not_built().into_response()
        }
    }
}
