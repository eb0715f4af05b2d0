use shared_models::role::RoleCategory;

pub fn is_administrator(role: RoleCategory) -> bool {
    role == RoleCategory::Administrator
}

pub fn is_dentist(role: RoleCategory) -> bool {
    role == RoleCategory::Dentist
}

pub fn is_receptionist(role: RoleCategory) -> bool {
    role == RoleCategory::Receptionist
}

pub fn is_patient(role: RoleCategory) -> bool {
    role == RoleCategory::Patient
}

/// Internal clinic users: administrators and dentists.
pub fn is_staff(role: RoleCategory) -> bool {
    matches!(role, RoleCategory::Administrator | RoleCategory::Dentist)
}

/// Who may create, edit and present budgets (quotes) to patients.
pub fn can_manage_budgets(role: RoleCategory) -> bool {
    is_administrator(role) || is_dentist(role)
}

pub fn can_view_reports(role: RoleCategory) -> bool {
    is_administrator(role)
}

/// Front-end route a user lands on after login.
pub fn landing_route(role: RoleCategory) -> &'static str {
    match role {
        RoleCategory::Administrator | RoleCategory::Dentist | RoleCategory::Receptionist => "/dashboard",
        RoleCategory::Patient => "/dashboard-paciente",
        RoleCategory::Unknown => "/login",
    }
}

pub fn display_name(role: RoleCategory) -> &'static str {
    match role {
        RoleCategory::Administrator => "Administrador",
        RoleCategory::Dentist => "Odontólogo",
        RoleCategory::Receptionist => "Recepcionista",
        RoleCategory::Patient => "Paciente",
        RoleCategory::Unknown => "Desconocido",
    }
}
