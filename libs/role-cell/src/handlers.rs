use std::sync::Arc;

use axum::extract::{Extension, Json, State};
use serde_json::Value;
use tracing::debug;

use shared_config::AppConfig;
use shared_models::auth::{OptionalSession, SessionUser, UserRecord};
use shared_utils::tenant::TenantInfo;

use crate::models::{AccessDecision, AccessPolicy, RoleSummary, SessionRole};
use crate::services::{check_access, RoleResolver};

fn resolver_for(config: &AppConfig) -> RoleResolver {
    RoleResolver::new(config.role_ids.clone())
}

/// Classifies any JSON value as a user record. Never fails: values that are
/// not user records resolve to the unknown role.
pub async fn resolve_user(
    State(config): State<Arc<AppConfig>>,
    Json(body): Json<Value>,
) -> Json<RoleSummary> {
    let user = UserRecord::from_value(&body);
    let role = resolver_for(&config).resolve(user.as_ref());

    debug!("Resolved submitted user record to {}", role);

    Json(RoleSummary::from(role))
}

pub async fn get_session_role(
    State(config): State<Arc<AppConfig>>,
    Extension(session): Extension<SessionUser>,
    Extension(tenant): Extension<TenantInfo>,
) -> Json<SessionRole> {
    let role = resolver_for(&config).resolve(session.user.as_ref());
    let user_id = session.user.as_ref().and_then(|u| u.id);

    debug!("Session role for user {:?} in {}: {}", user_id, tenant.tenant_id, role);

    Json(SessionRole {
        user_id,
        tenant_id: tenant.tenant_id,
        summary: RoleSummary::from(role),
    })
}

pub async fn check_route_access(
    State(config): State<Arc<AppConfig>>,
    Extension(OptionalSession(session)): Extension<OptionalSession>,
    Json(policy): Json<AccessPolicy>,
) -> Json<AccessDecision> {
    let user = session.as_ref().and_then(|s| s.user.as_ref());
    let authenticated = user.is_some();

    Json(check_access(&resolver_for(&config), &policy, authenticated, user))
}
