use serde_json::json;

use role_cell::{
    can_manage_budgets, can_view_reports, display_name, is_administrator, is_dentist, is_patient,
    is_receptionist, is_staff, landing_route, resolve_role, RoleCategory, RoleSummary,
};
use shared_models::auth::UserRecord;

#[test]
fn test_can_manage_budgets_exhaustive() {
    for role in RoleCategory::ALL {
        let expected = matches!(role, RoleCategory::Administrator | RoleCategory::Dentist);
        assert_eq!(can_manage_budgets(role), expected, "role: {}", role);
    }
}

#[test]
fn test_staff_matches_budget_managers() {
    for role in RoleCategory::ALL {
        assert_eq!(is_staff(role), can_manage_budgets(role), "role: {}", role);
    }
}

#[test]
fn test_only_administrators_view_reports() {
    for role in RoleCategory::ALL {
        assert_eq!(can_view_reports(role), role == RoleCategory::Administrator, "role: {}", role);
    }
}

#[test]
fn test_exactly_one_identity_predicate_holds() {
    for role in RoleCategory::ALL {
        let hits = [
            is_administrator(role),
            is_dentist(role),
            is_receptionist(role),
            is_patient(role),
        ]
        .iter()
        .filter(|hit| **hit)
        .count();

        let expected = if role == RoleCategory::Unknown { 0 } else { 1 };
        assert_eq!(hits, expected, "role: {}", role);
    }
}

#[test]
fn test_landing_routes() {
    assert_eq!(landing_route(RoleCategory::Administrator), "/dashboard");
    assert_eq!(landing_route(RoleCategory::Dentist), "/dashboard");
    assert_eq!(landing_route(RoleCategory::Receptionist), "/dashboard");
    assert_eq!(landing_route(RoleCategory::Patient), "/dashboard-paciente");
    assert_eq!(landing_route(RoleCategory::Unknown), "/login");
}

#[test]
fn test_display_names() {
    assert_eq!(display_name(RoleCategory::Administrator), "Administrador");
    assert_eq!(display_name(RoleCategory::Dentist), "Odontólogo");
    assert_eq!(display_name(RoleCategory::Receptionist), "Recepcionista");
    assert_eq!(display_name(RoleCategory::Patient), "Paciente");
    assert_eq!(display_name(RoleCategory::Unknown), "Desconocido");
}

#[test]
fn test_receptionist_end_to_end() {
    let user = UserRecord::from_value(&json!({ "tipo_usuario": { "rol": "Recepcionista" } }));
    let role = resolve_role(user.as_ref());

    assert_eq!(role, RoleCategory::Receptionist);
    assert!(!can_view_reports(role));
    assert_eq!(landing_route(role), "/dashboard");
    assert_eq!(display_name(role), "Recepcionista");
}

#[test]
fn test_summary_for_unknown() {
    let summary = RoleSummary::from(RoleCategory::Unknown);

    assert_eq!(summary.display_name, "Desconocido");
    assert_eq!(summary.landing_route, "/login");
    assert!(!summary.is_staff);
    assert!(!summary.can_manage_budgets);
    assert!(!summary.can_view_reports);
}

#[test]
fn test_summary_serializes_wire_role_name() {
    let summary = RoleSummary::from(RoleCategory::Dentist);
    let value = serde_json::to_value(&summary).unwrap();

    assert_eq!(value["role"], "odontologo");
    assert_eq!(value["display_name"], "Odontólogo");
    assert_eq!(value["can_manage_budgets"], true);
    assert_eq!(value["can_view_reports"], false);
}
