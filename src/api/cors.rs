// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cross-origin policy. Credentials are always allowed, so the wildcard
//! policy echoes the caller's origin instead of sending `*`.

use axum::http::HeaderValue;
use tower_http::cors::{AllowHeaders, AllowMethods, AllowOrigin, CorsLayer};
use tracing::warn;
use url::Url;

use crate::config::CorsPolicy;

pub fn cors_layer(policy: &CorsPolicy) -> CorsLayer {
    let origin = match policy {
        CorsPolicy::Any => AllowOrigin::mirror_request(),
        CorsPolicy::List(origins) => {
            AllowOrigin::list(origins.iter().filter_map(|raw| normalize_origin(raw)))
        }
    };

    CorsLayer::new()
        .allow_origin(origin)
        .allow_credentials(true)
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
}

/// Reduce a configured origin to `scheme://host[:port]` as browsers send it.
pub fn normalize_origin(raw: &str) -> Option<HeaderValue> {
    let origin = match Url::parse(raw) {
        Ok(url) => url.origin(),
        Err(e) => {
            warn!(origin = raw, error = %e, "Ignoring invalid CORS origin");
            return None;
        }
    };

    if !origin.is_tuple() {
        warn!(origin = raw, "Ignoring opaque CORS origin");
        return None;
    }

    HeaderValue::from_str(&origin.ascii_serialization()).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        routing::get,
        Router,
    };
    use tower::ServiceExt;

    #[test]
    fn normalize_strips_path_and_default_port() {
        assert_eq!(normalize_origin("https://a.com/").unwrap(), "https://a.com");
        assert_eq!(normalize_origin("https://a.com:443/app").unwrap(), "https://a.com");
        assert_eq!(
            normalize_origin("http://localhost:5173").unwrap(),
            "http://localhost:5173"
        );
    }

    #[test]
    fn normalize_rejects_garbage() {
        assert!(normalize_origin("not an origin").is_none());
        assert!(normalize_origin("file:///tmp").is_none());
    }

    async fn preflight(policy: CorsPolicy, origin: &str) -> axum::response::Response {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(&policy));

        let request = Request::builder()
            .method(Method::OPTIONS)
            .uri("/")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .body(Body::empty())
            .unwrap();
        app.oneshot(request).await.unwrap()
    }

    #[tokio::test]
    async fn wildcard_echoes_origin_with_credentials() {
        let response = preflight(CorsPolicy::Any, "https://anywhere.dev").await;
        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://anywhere.dev");
        assert_eq!(headers[header::ACCESS_CONTROL_ALLOW_CREDENTIALS], "true");
    }

    #[tokio::test]
    async fn list_allows_only_listed_origins() {
        let policy = CorsPolicy::List(vec!["https://a.com".into(), "https://b.com/".into()]);

        let allowed = preflight(policy.clone(), "https://b.com").await;
        assert_eq!(allowed.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN], "https://b.com");

        let denied = preflight(policy, "https://evil.com").await;
        assert!(denied
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }
}
