use std::sync::Arc;

use axum::{
    extract::{Json, State},
    http::HeaderMap,
};
use chrono::Utc;
use tracing::{debug, info, warn};

use role_cell::{RoleResolver, RoleSummary};
use shared_backend::clinic::ClinicBackendClient;
use shared_config::AppConfig;
use shared_models::auth::{BackendLoginUser, SessionUser, TokenResponse, UserRecord};
use shared_models::error::AppError;
use shared_utils::extractor::{extract_token, map_backend_error, verify_session};
use shared_utils::tenant::tenant_from_headers;

use crate::models::{
    AdoptSessionRequest, LogoutResponse, RestoreSessionRequest, RestoreSessionResponse, SessionResponse,
};

fn summarize(config: &AppConfig, user: &UserRecord) -> RoleSummary {
    RoleSummary::from(RoleResolver::new(config.role_ids.clone()).resolve(Some(user)))
}

pub async fn verify_token(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
) -> Result<Json<TokenResponse>, AppError> {
    debug!("Verifying token");

    // A missing or malformed header is still an error; only the backend's
    // verdict turns into `valid: false`.
    extract_token(&headers)?;

    match verify_session(&config, &headers).await {
        Ok((SessionUser { user: Some(user), .. }, _)) => {
            let role = RoleResolver::new(config.role_ids.clone()).resolve(Some(&user));

            Ok(Json(TokenResponse {
                valid: true,
                user_id: user.id,
                role: Some(role),
            }))
        }
        // A token the backend accepts but cannot tie to a user is not a session.
        Ok(_) => {
            debug!("Token verified without a user record");
            Ok(Json(TokenResponse {
                valid: false,
                user_id: None,
                role: None,
            }))
        }
        Err(AppError::Auth(_)) => Ok(Json(TokenResponse {
            valid: false,
            user_id: None,
            role: None,
        })),
        Err(err) => Err(err),
    }
}

/// Takes over a token obtained at login. The login payload, when given, is
/// mapped into a user record; otherwise the user is fetched from the backend.
pub async fn adopt_session(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
    Json(request): Json<AdoptSessionRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    let token = request.token.trim().to_string();
    if token.is_empty() {
        return Err(AppError::BadRequest("Token is required".to_string()));
    }

    let login_user = request
        .user
        .filter(|value| value.is_object())
        .and_then(|value| serde_json::from_value::<BackendLoginUser>(value).ok());

    let user = match login_user {
        Some(login_user) => {
            debug!("Mapping login payload for user {:?}", login_user.codigo);
            UserRecord::from(login_user)
        }
        None => {
            debug!("No login payload, fetching user from backend");

            let tenant = tenant_from_headers(&headers, &config.domain_base);
            let client = ClinicBackendClient::new(&config);
            let verified = client
                .verify_token(&token, tenant.subdomain.as_deref())
                .await
                .map_err(map_backend_error)?;

            verified
                .user_record()
                .ok_or_else(|| AppError::Auth("Token is not linked to a user".to_string()))?
        }
    };

    let role = summarize(&config, &user);
    info!("Session adopted for user {:?} as {}", user.id, role.role);

    Ok(Json(SessionResponse {
        token,
        user,
        role,
        verified_at: Utc::now(),
    }))
}

/// Re-validates a stored session. The stored record is upgraded if it predates
/// `idtipousuario`; any verification failure means the client must drop it.
pub async fn restore_session(
    State(config): State<Arc<AppConfig>>,
    headers: HeaderMap,
    Json(request): Json<RestoreSessionRequest>,
) -> Result<Json<RestoreSessionResponse>, AppError> {
    let mut user = UserRecord::from_value(&request.user)
        .ok_or_else(|| AppError::BadRequest("Stored session has no user".to_string()))?;

    let migrated = user.migrate_legacy();

    let tenant = tenant_from_headers(&headers, &config.domain_base);
    let client = ClinicBackendClient::new(&config);
    client
        .verify_token(request.token.trim(), tenant.subdomain.as_deref())
        .await
        .map_err(|err| {
            warn!("Stored session rejected: {}", err);
            map_backend_error(err)
        })?;

    let role = summarize(&config, &user);
    debug!("Stored session restored for user {:?} (migrated: {})", user.id, migrated);

    Ok(Json(RestoreSessionResponse {
        user,
        migrated,
        role,
        verified_at: Utc::now(),
    }))
}

/// Best-effort logout: the backend is told when possible, but the caller's
/// session is considered closed either way.
pub async fn logout(State(config): State<Arc<AppConfig>>, headers: HeaderMap) -> Json<LogoutResponse> {
    let backend_notified = match extract_token(&headers) {
        Ok(token) => {
            let tenant = tenant_from_headers(&headers, &config.domain_base);
            let client = ClinicBackendClient::new(&config);

            match client.logout(&token, tenant.subdomain.as_deref()).await {
                Ok(()) => true,
                Err(err) => {
                    warn!("Could not close the session on the backend, continuing: {}", err);
                    false
                }
            }
        }
        Err(_) => false,
    };

    Json(LogoutResponse {
        logged_out: true,
        backend_notified,
    })
}
