use tracing::warn;

use shared_models::auth::UserRecord;
use shared_models::role::RoleCategory;

use crate::models::{AccessDecision, AccessPolicy, DENIED_MESSAGE, DENIED_ROUTE, LOGIN_ROUTE};
use crate::services::resolver::RoleResolver;

/// Checks route access for a session.
///
/// Authentication is checked first, then the role categories, then the
/// legacy numeric role ids. The role id compared against `allowed_role_ids`
/// is `tipo_usuario.id`, falling back to `idtipousuario`.
pub fn check_access(
    resolver: &RoleResolver,
    policy: &AccessPolicy,
    authenticated: bool,
    user: Option<&UserRecord>,
) -> AccessDecision {
    if policy.require_auth && !authenticated {
        return AccessDecision::RedirectToLogin {
            redirect_to: LOGIN_ROUTE.to_string(),
            from: policy.path.clone(),
        };
    }

    let user_role = resolver.resolve(user);

    if !policy.allowed_roles.is_empty() && !policy.allowed_roles.contains(&user_role) {
        warn!(
            "Access denied: user with role \"{}\" tried to reach a route restricted to {:?}",
            user_role, policy.allowed_roles
        );

        return denied(policy, user_role, None);
    }

    if !policy.allowed_role_ids.is_empty() {
        let user_role_id = user.and_then(UserRecord::role_id);

        let listed = user_role_id
            .map(|id| policy.allowed_role_ids.contains(&id))
            .unwrap_or(false);

        if !listed {
            warn!(
                "Access denied (legacy ids): user with role id {:?} tried to reach a route restricted to ids {:?}",
                user_role_id, policy.allowed_role_ids
            );

            return denied(policy, user_role, user_role_id);
        }
    }

    AccessDecision::Allowed { user_role }
}

fn denied(policy: &AccessPolicy, user_role: RoleCategory, user_role_id: Option<i64>) -> AccessDecision {
    AccessDecision::Denied {
        redirect_to: DENIED_ROUTE.to_string(),
        error: DENIED_MESSAGE.to_string(),
        required_roles: policy.allowed_roles.clone(),
        required_role_ids: policy.allowed_role_ids.clone(),
        user_role,
        user_role_id,
    }
}
