use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, Request},
    middleware::Next,
    response::Response,
};
use tracing::{debug, warn};

use shared_backend::clinic::{BackendError, ClinicBackendClient};
use shared_config::AppConfig;
use shared_models::auth::{OptionalSession, SessionUser};
use shared_models::error::AppError;

use crate::tenant::{tenant_from_headers, TenantInfo};

/// Pulls the session token out of `Authorization: Token <t>` (the backend's
/// scheme) or `Authorization: Bearer <t>`.
pub fn extract_token(headers: &HeaderMap) -> Result<String, AppError> {
    let auth_header = headers
        .get("Authorization")
        .ok_or_else(|| AppError::Auth("Missing authorization header".to_string()))?;

    let auth_value = auth_header
        .to_str()
        .map_err(|_| AppError::Auth("Invalid authorization header format".to_string()))?;

    let token = auth_value
        .strip_prefix("Token ")
        .or_else(|| auth_value.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Auth("Invalid authorization header format".to_string()))?;

    Ok(token.to_string())
}

/// Maps a backend client failure onto the error returned to our caller.
pub fn map_backend_error(err: anyhow::Error) -> AppError {
    match err.downcast_ref::<BackendError>() {
        Some(BackendError::Unauthorized(_)) | Some(BackendError::InvalidHeader(_)) => {
            AppError::Auth("Invalid or expired token".to_string())
        }
        _ => AppError::ExternalService(err.to_string()),
    }
}

/// Verifies the request's token with the clinic backend and returns the
/// session it belongs to.
pub async fn verify_session(
    config: &AppConfig,
    headers: &HeaderMap,
) -> Result<(SessionUser, TenantInfo), AppError> {
    let token = extract_token(headers)?;
    let tenant = tenant_from_headers(headers, &config.domain_base);

    let client = ClinicBackendClient::new(config);
    let verified = client
        .verify_token(&token, tenant.subdomain.as_deref())
        .await
        .map_err(map_backend_error)?;

    let session = SessionUser {
        token,
        user: verified.user_record(),
    };

    debug!(
        "Session verified for user {:?} in tenant {}",
        session.user.as_ref().and_then(|u| u.id),
        tenant.tenant_id
    );

    Ok((session, tenant))
}

// Middleware for routes that need a verified session
pub async fn session_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let (session, tenant) = verify_session(&config, request.headers()).await?;

    request.extensions_mut().insert(session);
    request.extensions_mut().insert(tenant);

    Ok(next.run(request).await)
}

// Middleware for routes that behave differently for anonymous callers: a
// missing or rejected token just leaves the session out.
pub async fn optional_session_middleware(
    State(config): State<Arc<AppConfig>>,
    mut request: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let tenant = tenant_from_headers(request.headers(), &config.domain_base);
    let mut slot = OptionalSession::default();

    if request.headers().contains_key("Authorization") {
        match verify_session(&config, request.headers()).await {
            Ok((session, _)) => {
                slot = OptionalSession(Some(session));
            }
            Err(AppError::Auth(reason)) => {
                debug!("Continuing without session: {}", reason);
            }
            Err(err) => {
                warn!("Session verification failed: {}", err);
                return Err(err);
            }
        }
    }

    request.extensions_mut().insert(slot);
    request.extensions_mut().insert(tenant);

    Ok(next.run(request).await)
}
