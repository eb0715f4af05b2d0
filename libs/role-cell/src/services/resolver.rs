use tracing::debug;

use shared_models::auth::UserRecord;
use shared_models::role::{RoleCategory, RoleIdTable};

/// Role hints matched against `subtipo`, in priority order.
const SUBTIPO_TOKENS: &[(&str, RoleCategory)] = &[
    ("admin", RoleCategory::Administrator),
    ("odontologo", RoleCategory::Dentist),
    ("recepcionista", RoleCategory::Receptionist),
    ("paciente", RoleCategory::Patient),
];

/// Role names are display strings and may carry the accent.
const ROLE_NAME_TOKENS: &[(&str, RoleCategory)] = &[
    ("admin", RoleCategory::Administrator),
    ("odontologo", RoleCategory::Dentist),
    ("odontólogo", RoleCategory::Dentist),
    ("recepcionista", RoleCategory::Receptionist),
    ("paciente", RoleCategory::Patient),
];

/// Classifies user records into role categories.
///
/// Fields are tried from most to least reliable: `subtipo`, then
/// `tipo_usuario.rol`, then the numeric `idtipousuario` through the
/// configured [`RoleIdTable`]. The first field that yields a category wins;
/// a field that is present but matches nothing falls through to the next.
#[derive(Debug, Clone, Default)]
pub struct RoleResolver {
    role_ids: RoleIdTable,
}

impl RoleResolver {
    pub fn new(role_ids: RoleIdTable) -> Self {
        Self { role_ids }
    }

    pub fn role_ids(&self) -> &RoleIdTable {
        &self.role_ids
    }

    pub fn resolve(&self, user: Option<&UserRecord>) -> RoleCategory {
        let Some(user) = user else {
            return RoleCategory::Unknown;
        };

        if let Some(role) = user.subtipo.as_deref().and_then(match_subtipo) {
            debug!("Role {} resolved from subtipo", role);
            return role;
        }

        if let Some(role) = user.role_name().and_then(match_role_name) {
            debug!("Role {} resolved from tipo_usuario.rol", role);
            return role;
        }

        if let Some(role) = user.idtipousuario.and_then(|id| self.role_ids.lookup(id)) {
            debug!("Role {} resolved from idtipousuario", role);
            return role;
        }

        RoleCategory::Unknown
    }
}

/// Resolves with the id table observed in existing deployments.
pub fn resolve_role(user: Option<&UserRecord>) -> RoleCategory {
    RoleResolver::default().resolve(user)
}

fn match_tokens(text: &str, tokens: &[(&str, RoleCategory)]) -> Option<RoleCategory> {
    let text = text.to_lowercase();
    tokens
        .iter()
        .find(|(token, _)| text.contains(token))
        .map(|(_, role)| *role)
}

fn match_subtipo(subtipo: &str) -> Option<RoleCategory> {
    match_tokens(subtipo, SUBTIPO_TOKENS)
}

fn match_role_name(rol: &str) -> Option<RoleCategory> {
    match_tokens(rol, ROLE_NAME_TOKENS)
}
