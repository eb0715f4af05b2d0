use serde::{Deserialize, Serialize};

pub use shared_models::role::{RoleCategory, RoleIdTable};

use crate::services::permissions;

/// Everything the front end needs to gate its UI for one role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoleSummary {
    pub role: RoleCategory,
    pub display_name: String,
    pub landing_route: String,
    pub is_staff: bool,
    pub can_manage_budgets: bool,
    pub can_view_reports: bool,
}

impl From<RoleCategory> for RoleSummary {
    fn from(role: RoleCategory) -> Self {
        Self {
            role,
            display_name: permissions::display_name(role).to_string(),
            landing_route: permissions::landing_route(role).to_string(),
            is_staff: permissions::is_staff(role),
            can_manage_budgets: permissions::can_manage_budgets(role),
            can_view_reports: permissions::can_view_reports(role),
        }
    }
}

fn default_require_auth() -> bool {
    true
}

/// Route protection rules, as attached to a protected front-end route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessPolicy {
    #[serde(default = "default_require_auth")]
    pub require_auth: bool,
    #[serde(default)]
    pub allowed_roles: Vec<RoleCategory>,
    /// Raw role ids; kept for routes that predate role categories.
    #[serde(default)]
    pub allowed_role_ids: Vec<i64>,
    /// Route being entered, echoed back on a login redirect.
    #[serde(default)]
    pub path: Option<String>,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self {
            require_auth: true,
            allowed_roles: Vec::new(),
            allowed_role_ids: Vec::new(),
            path: None,
        }
    }
}

impl AccessPolicy {
    pub fn roles(roles: &[RoleCategory]) -> Self {
        Self {
            allowed_roles: roles.to_vec(),
            ..Self::default()
        }
    }

    pub fn role_ids(ids: &[i64]) -> Self {
        Self {
            allowed_role_ids: ids.to_vec(),
            ..Self::default()
        }
    }

    pub fn public() -> Self {
        Self {
            require_auth: false,
            ..Self::default()
        }
    }

    pub fn with_path(mut self, path: &str) -> Self {
        self.path = Some(path.to_string());
        self
    }
}

pub const LOGIN_ROUTE: &str = "/login";
pub const DENIED_ROUTE: &str = "/dashboard";
pub const DENIED_MESSAGE: &str = "No tienes permisos para acceder a esta página.";

/// Outcome of checking an [`AccessPolicy`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum AccessDecision {
    Allowed {
        user_role: RoleCategory,
    },
    RedirectToLogin {
        redirect_to: String,
        from: Option<String>,
    },
    Denied {
        redirect_to: String,
        error: String,
        required_roles: Vec<RoleCategory>,
        #[serde(skip_serializing_if = "Vec::is_empty", default)]
        required_role_ids: Vec<i64>,
        user_role: RoleCategory,
        #[serde(skip_serializing_if = "Option::is_none", default)]
        user_role_id: Option<i64>,
    },
}

impl AccessDecision {
    pub fn is_allowed(&self) -> bool {
        matches!(self, AccessDecision::Allowed { .. })
    }

    pub fn redirect_to(&self) -> Option<&str> {
        match self {
            AccessDecision::Allowed { .. } => None,
            AccessDecision::RedirectToLogin { redirect_to, .. }
            | AccessDecision::Denied { redirect_to, .. } => Some(redirect_to),
        }
    }
}

/// Role of the caller's own session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionRole {
    pub user_id: Option<i64>,
    pub tenant_id: String,
    #[serde(flatten)]
    pub summary: RoleSummary,
}
