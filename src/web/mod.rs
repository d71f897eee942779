use axum::{Json, Router, http::Method, middleware as axum_middleware, routing::get};
use sea_orm::DatabaseConnection;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::server::config::ServerConfig;
use crate::web::routes::{admin_routes, employee_routes, record_routes, totals_routes};

pub mod error;
pub mod middleware;
pub mod models;
pub mod routes;

pub use error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub db_pool: DatabaseConnection,
    pub config: Arc<ServerConfig>,
}

async fn health_check_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "Server is healthy" }))
}

pub fn create_axum_router(db_pool: DatabaseConnection, config: Arc<ServerConfig>) -> Router {
    let app_state = Arc::new(AppState { db_pool, config });

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(vec![
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check_handler))
        .nest(
            "/api/users",
            employee_routes::public_router().merge(
                employee_routes::protected_router()
                    .merge(record_routes::router())
                    .merge(totals_routes::router())
                    .route_layer(axum_middleware::from_fn_with_state(
                        app_state.clone(),
                        middleware::auth::auth,
                    )),
            ),
        )
        .nest(
            "/api/admin",
            admin_routes::router()
                .route_layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    middleware::admin::require_admin,
                ))
                .route_layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    middleware::auth::auth,
                )),
        )
        .with_state(app_state)
        .layer(cors)
}
