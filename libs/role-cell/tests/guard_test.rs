use assert_matches::assert_matches;
use serde_json::json;

use role_cell::{check_access, AccessDecision, AccessPolicy, RoleCategory, RoleResolver, DENIED_MESSAGE};
use shared_models::auth::UserRecord;

fn user(value: serde_json::Value) -> Option<UserRecord> {
    UserRecord::from_value(&value)
}

#[test]
fn test_unauthenticated_is_sent_to_login() {
    let policy = AccessPolicy::roles(&[RoleCategory::Patient]).with_path("/mis-presupuestos");

    let decision = check_access(&RoleResolver::default(), &policy, false, None);

    assert_eq!(
        decision,
        AccessDecision::RedirectToLogin {
            redirect_to: "/login".to_string(),
            from: Some("/mis-presupuestos".to_string()),
        }
    );
}

#[test]
fn test_public_route_allows_anonymous() {
    let decision = check_access(&RoleResolver::default(), &AccessPolicy::public(), false, None);

    assert_eq!(decision, AccessDecision::Allowed { user_role: RoleCategory::Unknown });
}

#[test]
fn test_role_allowed() {
    let policy = AccessPolicy::roles(&[RoleCategory::Administrator, RoleCategory::Dentist]);
    let dentist = user(json!({ "subtipo": "odontologo" }));

    let decision = check_access(&RoleResolver::default(), &policy, true, dentist.as_ref());

    assert!(decision.is_allowed());
    assert_eq!(decision.redirect_to(), None);
}

#[test]
fn test_role_denied() {
    let policy = AccessPolicy::roles(&[RoleCategory::Administrator, RoleCategory::Dentist]);
    let patient = user(json!({ "tipo_usuario": { "rol": "Paciente" } }));

    let decision = check_access(&RoleResolver::default(), &policy, true, patient.as_ref());

    assert_matches!(
        decision,
        AccessDecision::Denied { ref redirect_to, ref error, ref required_roles, user_role, user_role_id, .. } => {
            assert_eq!(redirect_to, "/dashboard");
            assert_eq!(error, DENIED_MESSAGE);
            assert_eq!(required_roles, &vec![RoleCategory::Administrator, RoleCategory::Dentist]);
            assert_eq!(user_role, RoleCategory::Patient);
            assert_eq!(user_role_id, None);
        }
    );
}

#[test]
fn test_legacy_ids_use_nested_id_first() {
    let policy = AccessPolicy::role_ids(&[1]);
    let record = user(json!({ "idtipousuario": 4, "tipo_usuario": { "id": 1, "rol": "Paciente" } }));

    let decision = check_access(&RoleResolver::default(), &policy, true, record.as_ref());

    assert!(decision.is_allowed());
}

#[test]
fn test_legacy_ids_denied() {
    let policy = AccessPolicy::role_ids(&[1]);
    let record = user(json!({ "idtipousuario": 3 }));

    let decision = check_access(&RoleResolver::default(), &policy, true, record.as_ref());

    assert_matches!(
        decision,
        AccessDecision::Denied { user_role, user_role_id: Some(3), ref required_role_ids, .. } => {
            assert_eq!(user_role, RoleCategory::Receptionist);
            assert_eq!(required_role_ids, &vec![1]);
        }
    );
}

#[test]
fn test_legacy_ids_without_user_id() {
    let policy = AccessPolicy::role_ids(&[1, 2]);
    let record = user(json!({ "subtipo": "paciente" }));

    let decision = check_access(&RoleResolver::default(), &policy, true, record.as_ref());

    assert_matches!(decision, AccessDecision::Denied { user_role_id: None, .. });
}

#[test]
fn test_roles_checked_before_legacy_ids() {
    let policy = AccessPolicy {
        allowed_roles: vec![RoleCategory::Patient],
        allowed_role_ids: vec![4],
        ..AccessPolicy::default()
    };
    let admin = user(json!({ "subtipo": "admin", "idtipousuario": 4 }));

    let decision = check_access(&RoleResolver::default(), &policy, true, admin.as_ref());

    assert_matches!(decision, AccessDecision::Denied { user_role: RoleCategory::Administrator, user_role_id: None, .. });
}

#[test]
fn test_policy_defaults_from_json() {
    let policy: AccessPolicy = serde_json::from_value(json!({ "allowed_roles": ["paciente"] })).unwrap();

    assert!(policy.require_auth);
    assert_eq!(policy.allowed_roles, vec![RoleCategory::Patient]);
    assert!(policy.allowed_role_ids.is_empty());
}

#[test]
fn test_decision_wire_format() {
    let decision = AccessDecision::Allowed { user_role: RoleCategory::Dentist };
    let value = serde_json::to_value(&decision).unwrap();

    assert_eq!(value, json!({ "decision": "allowed", "user_role": "odontologo" }));
}
