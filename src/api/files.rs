// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Inline delivery of files from the upload and certificate directories.

use std::path::Path;

use axum::{
    body::Body,
    extract::Request,
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use crate::assets::{self, FileRef, Resolved};
use crate::error::ApiError;

/// Stream `file` with a content type guessed from its extension.
///
/// `Range` and conditional headers on `request` are honored.
pub async fn serve_file(file: FileRef, request: Request) -> Response {
    match ServeFile::new(file.path()).oneshot(request).await {
        Ok(response) => response.map(Body::new),
        Err(never) => match never {},
    }
}

/// Serve `name` from `root`, or a JSON 404.
pub async fn serve_from(root: &Path, name: &str, request: Request) -> Response {
    match assets::resolve(root, name).await {
        Resolved::File(file) => serve_file(file, request).await,
        Resolved::NotFound => ApiError::not_found().into_response(),
    }
}
