use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use auth_cell::router::auth_routes;
use role_cell::router::role_routes;
use shared_config::AppConfig;

pub fn create_router(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/", get(|| async { "Clinic session gateway is running!" }))
        .nest("/auth", auth_routes(state.clone()))
        .nest("/roles", role_routes(state))
}
