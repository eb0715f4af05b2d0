use std::sync::Arc;

use axum::{
    Router,
    routing::{get, post},
    middleware,
};

use shared_config::AppConfig;
use shared_utils::extractor::{optional_session_middleware, session_middleware};

use crate::handlers;

pub fn role_routes(state: Arc<AppConfig>) -> Router {
    let public_routes = Router::new()
        .route("/resolve", post(handlers::resolve_user));

    let session_routes = Router::new()
        .route("/me", get(handlers::get_session_role))
        .layer(middleware::from_fn_with_state(state.clone(), session_middleware));

    let access_routes = Router::new()
        .route("/access", post(handlers::check_route_access))
        .layer(middleware::from_fn_with_state(state.clone(), optional_session_middleware));

    Router::new()
        .merge(public_routes)
        .merge(session_routes)
        .merge(access_routes)
        .with_state(state)
}
