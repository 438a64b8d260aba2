// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::Router;
use tower::ServiceBuilder;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use tracing::info;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    auth::AuthenticatedUser,
    features::{self, FeatureModule},
    state::AppState,
};

pub mod cors;
pub mod dispatch;
pub mod files;
pub mod health;
pub mod spa;

use dispatch::{dispatch, Dispatcher, RouteTable, RouteTableError};

/// Build the application router.
///
/// Feature modules are mounted in the order given; everything else is
/// resolved by [`dispatch`]. In debug mode the OpenAPI document and Swagger
/// UI are served ahead of the dispatcher.
pub fn router(state: AppState, modules: &[Box<dyn FeatureModule>]) -> Result<Router, RouteTableError> {
    let table = RouteTable::build(modules, &state)?;
    info!(prefixes = ?table.prefixes().collect::<Vec<_>>(), "Feature modules mounted");

    let debug = state.config.debug;
    let cors = cors::cors_layer(&state.config.cors);

    let mut app = Router::new()
        .fallback(dispatch)
        .with_state(Dispatcher::new(state, table));

    if debug {
        app = app.merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()));
    }

    Ok(app.layer(
        ServiceBuilder::new()
            .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
            .layer(TraceLayer::new_for_http())
            .layer(PropagateRequestIdLayer::x_request_id())
            .layer(CatchPanicLayer::new())
            .layer(cors),
    ))
}

#[derive(OpenApi)]
#[openapi(
    paths(health::health, features::auth::current_user),
    components(schemas(health::HealthResponse, health::DbStatus, AuthenticatedUser)),
    tags(
        (name = "Health", description = "Database liveness"),
        (name = "Auth", description = "Token verification")
    )
)]
struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{get, test_config, test_state};
    use axum::http::StatusCode;
    use tower::ServiceExt;

    #[tokio::test]
    async fn router_builds_with_default_modules() {
        let (state, _temp) = test_state().await;
        let app = router(state, &features::default_modules()).unwrap();
        let _ = app.into_make_service();
    }

    #[tokio::test]
    async fn responses_carry_request_id() {
        let (state, _temp) = test_state().await;
        let app = router(state, &[]).unwrap();

        let response = app.oneshot(get("/uploads/missing.png")).await.unwrap();
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn docs_only_in_debug_mode() {
        let (state, temp) = test_state().await;
        let app = router(state.clone(), &[]).unwrap();
        let response = app.oneshot(get("/api-doc/openapi.json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);

        let mut config = test_config(&temp);
        config.debug = true;
        let debug_state = AppState::new(config, state.db.clone());
        let app = router(debug_state, &[]).unwrap();
        let response = app.oneshot(get("/api-doc/openapi.json")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[test]
    fn openapi_security_requirements_are_declared() {
        let doc = serde_json::to_value(ApiDoc::openapi()).unwrap();
        let declared = doc["components"]["securitySchemes"].as_object();

        for (path, item) in doc["paths"].as_object().unwrap() {
            for (method, operation) in item.as_object().unwrap() {
                let Some(requirements) = operation["security"].as_array() else {
                    continue;
                };
                for name in requirements.iter().flat_map(|r| r.as_object().unwrap().keys()) {
                    assert!(
                        declared.is_some_and(|schemes| schemes.contains_key(name)),
                        "{method} {path} references undeclared scheme {name}"
                    );
                }
            }
        }
    }
}
