use axum::http::{HeaderValue, Method, header};
use axum::{Json, Router, middleware, routing::get};
use serde_json::{Value, json};
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable as _};

use atrium_config::CorsConfig;
use atrium_observability::{logging_middleware, metrics_middleware};

use crate::docs::ApiDoc;
use crate::modules::auth::router::init_auth_router;
use crate::modules::courses::router::init_courses_router;
use crate::modules::doc_viewer::router::init_doc_viewer_router;
use crate::modules::functions::router::init_functions_router;
use crate::modules::organizations::router::init_organizations_router;
use crate::modules::purchases::router::init_purchases_router;
use crate::modules::schedules::router::init_schedules_router;
use crate::modules::users::router::init_users_router;
use crate::state::AppState;

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

fn cors_layer(config: &CorsConfig) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE, header::ACCEPT]);

    if config.allows_any() {
        return layer.allow_origin(Any);
    }

    let allowed_origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    layer.allow_origin(allowed_origins)
}

pub fn init_router(state: AppState) -> Router {
    let cors = cors_layer(&state.cors_config);

    Router::new()
        .route("/health", get(health))
        .route("/api-docs/openapi.json", get(openapi_json))
        .merge(Scalar::with_url("/scalar", ApiDoc::openapi()))
        .nest(
            "/api",
            Router::new()
                .nest("/organizations", init_organizations_router())
                .nest("/users", init_users_router())
                .nest("/auth", init_auth_router())
                .nest("/courses", init_courses_router())
                .nest("/schedules", init_schedules_router())
                .nest("/purchases", init_purchases_router()),
        )
        .nest("/invoke", init_functions_router())
        .nest("/doc", init_doc_viewer_router())
        .with_state(state)
        .layer(cors)
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(logging_middleware))
}
