use std::sync::Arc;

use axum::{
    Router,
    routing::post,
};

use shared_config::AppConfig;

use crate::handlers;

pub fn auth_routes(state: Arc<AppConfig>) -> Router {
    Router::new()
        .route("/verify", post(handlers::verify_token))
        .route("/adopt", post(handlers::adopt_session))
        .route("/restore", post(handlers::restore_session))
        .route("/logout", post(handlers::logout))
        .with_state(state)
}
