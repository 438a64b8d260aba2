// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Request dispatch with fixed precedence.
//!
//! Every request is classified once, first match wins:
//!
//! 1. a registered feature prefix (any method)
//! 2. `/uploads/<name>`
//! 3. `/certs/<name>`
//! 4. `/health`
//! 5. the SPA fallback for everything else
//!
//! Routes 2-5 are read-only and answer `GET`/`HEAD` only.

use std::sync::Arc;

use axum::{
    extract::{OriginalUri, Request, State},
    http::{header, uri::PathAndQuery, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Router,
};
use tower::ServiceExt;
use tracing::debug;

use super::{files, health, spa};
use crate::error::ApiError;
use crate::features::FeatureModule;
use crate::state::AppState;

pub const UPLOADS_PREFIX: &str = "/uploads";
pub const CERTS_PREFIX: &str = "/certs";
pub const HEALTH_PATH: &str = "/health";

const RESERVED_PREFIXES: [&str; 3] = [UPLOADS_PREFIX, CERTS_PREFIX, HEALTH_PATH];

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum RouteTableError {
    #[error("module {module}: prefix {prefix:?} must start with '/' and must not end with '/'")]
    Invalid { module: &'static str, prefix: String },
    #[error("module {module}: prefix {prefix:?} overlaps reserved route {reserved}")]
    Reserved {
        module: &'static str,
        prefix: String,
        reserved: &'static str,
    },
    #[error("module {module}: prefix {prefix:?} is unreachable behind earlier prefix {shadowed_by:?}")]
    Shadowed {
        module: &'static str,
        prefix: String,
        shadowed_by: String,
    },
}

/// `path` is `prefix` itself or lies beneath it.
fn under_prefix(prefix: &str, path: &str) -> bool {
    path.strip_prefix(prefix)
        .is_some_and(|rest| rest.is_empty() || rest.starts_with('/'))
}

/// One mount point, possibly shared by several modules.
struct Mount {
    prefix: String,
    modules: Vec<&'static str>,
    router: Router,
}

/// Ordered feature registrations, fixed at startup.
pub struct RouteTable {
    mounts: Vec<Mount>,
}

impl RouteTable {
    /// Validate and mount `modules` in registration order.
    ///
    /// Modules registered at the same prefix share one mount whose router is
    /// the merge of theirs, so overlapping sub-routes panic here rather than
    /// at request time.
    pub fn build(modules: &[Box<dyn FeatureModule>], state: &AppState) -> Result<Self, RouteTableError> {
        let mut pending: Vec<(String, Vec<&'static str>, Router<AppState>)> = Vec::new();

        for module in modules {
            let name = module.name();
            let prefix = module.prefix();

            if !prefix.starts_with('/') || prefix.ends_with('/') {
                return Err(RouteTableError::Invalid {
                    module: name,
                    prefix: prefix.to_string(),
                });
            }

            if let Some(reserved) = RESERVED_PREFIXES
                .iter()
                .copied()
                .find(|reserved| under_prefix(prefix, reserved) || under_prefix(reserved, prefix))
            {
                return Err(RouteTableError::Reserved {
                    module: name,
                    prefix: prefix.to_string(),
                    reserved,
                });
            }

            if let Some((_, names, router)) = pending.iter_mut().find(|(p, _, _)| p.as_str() == prefix) {
                names.push(name);
                let merged = std::mem::replace(router, Router::new()).merge(module.router(state));
                *router = merged;
                continue;
            }

            if let Some((earlier, _, _)) = pending.iter().find(|(p, _, _)| under_prefix(p, prefix)) {
                return Err(RouteTableError::Shadowed {
                    module: name,
                    prefix: prefix.to_string(),
                    shadowed_by: earlier.clone(),
                });
            }

            pending.push((prefix.to_string(), vec![name], module.router(state)));
        }

        let mounts = pending
            .into_iter()
            .map(|(prefix, modules, router)| Mount {
                prefix,
                modules,
                router: router
                    .fallback(feature_not_found)
                    .with_state(state.clone()),
            })
            .collect();

        Ok(Self { mounts })
    }

    /// Mounted prefixes in precedence order.
    pub fn prefixes(&self) -> impl Iterator<Item = &str> {
        self.mounts.iter().map(|m| m.prefix.as_str())
    }

    /// Module names registered at `prefix`.
    pub fn modules_at(&self, prefix: &str) -> Option<&[&'static str]> {
        self.mounts
            .iter()
            .find(|m| m.prefix == prefix)
            .map(|m| m.modules.as_slice())
    }

    /// Decide which handler owns `path`.
    pub fn classify(&self, path: &str) -> Route {
        if let Some(index) = self.mounts.iter().position(|m| under_prefix(&m.prefix, path)) {
            return Route::Feature(index);
        }

        if let Some(name) = non_empty_tail(path, UPLOADS_PREFIX) {
            return Route::Upload(name.to_string());
        }
        if let Some(name) = non_empty_tail(path, CERTS_PREFIX) {
            return Route::Cert(name.to_string());
        }
        if path == HEALTH_PATH {
            return Route::Health;
        }

        Route::Spa(path.trim_start_matches('/').to_string())
    }
}

/// The part of `path` after `prefix/`, when there is one.
fn non_empty_tail<'a>(path: &'a str, prefix: &str) -> Option<&'a str> {
    path.strip_prefix(prefix)
        .and_then(|rest| rest.strip_prefix('/'))
        .filter(|name| !name.is_empty())
}

/// Classification of a request path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Index of the owning mount in the route table.
    Feature(usize),
    Upload(String),
    Cert(String),
    Health,
    /// Path relative to the frontend directory; empty for `/`.
    Spa(String),
}

/// Router state for [`dispatch`].
#[derive(Clone)]
pub struct Dispatcher {
    state: AppState,
    table: Arc<RouteTable>,
}

impl Dispatcher {
    pub fn new(state: AppState, table: RouteTable) -> Self {
        Self {
            state,
            table: Arc::new(table),
        }
    }
}

pub async fn dispatch(State(dispatcher): State<Dispatcher>, request: Request) -> Response {
    let route = dispatcher.table.classify(request.uri().path());
    debug!(method = %request.method(), path = %request.uri().path(), ?route, "Dispatching");

    let read_only = matches!(*request.method(), Method::GET | Method::HEAD);
    let config = &dispatcher.state.config;

    match route {
        Route::Feature(index) => forward(&dispatcher.table.mounts[index], request).await,
        _ if !read_only => {
            ([(header::ALLOW, "GET, HEAD")], ApiError::method_not_allowed()).into_response()
        }
        Route::Upload(name) => files::serve_from(&config.upload_dir, &name, request).await,
        Route::Cert(name) => files::serve_from(&config.cert_dir, &name, request).await,
        Route::Health => health::health(State(dispatcher.state.clone()))
            .await
            .into_response(),
        Route::Spa(path) => spa::serve(&config.frontend_dir, &path, request).await,
    }
}

/// Hand the request to a mount with the prefix removed from its path.
async fn forward(mount: &Mount, request: Request) -> Response {
    let Some(request) = strip_prefix(request, &mount.prefix) else {
        return ApiError::new(StatusCode::BAD_REQUEST, "bad_request").into_response();
    };

    match mount.router.clone().oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    }
}

fn strip_prefix(request: Request, prefix: &str) -> Option<Request> {
    let (mut parts, body) = request.into_parts();
    if parts.extensions.get::<OriginalUri>().is_none() {
        let original = OriginalUri(parts.uri.clone());
        parts.extensions.insert(original);
    }

    let rest = parts.uri.path().strip_prefix(prefix)?;
    let rest = if rest.is_empty() { "/" } else { rest };
    let path_and_query = match parts.uri.query() {
        Some(query) => format!("{rest}?{query}"),
        None => rest.to_string(),
    };

    let mut uri = parts.uri.clone().into_parts();
    uri.path_and_query = Some(PathAndQuery::try_from(path_and_query).ok()?);
    parts.uri = Uri::from_parts(uri).ok()?;

    Some(Request::from_parts(parts, body))
}

async fn feature_not_found() -> ApiError {
    ApiError::not_found()
}
