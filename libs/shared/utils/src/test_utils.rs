use std::sync::Arc;

use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_models::auth::UserRecord;

pub const TEST_TOKEN: &str = "9944b09199c62bcf9418ad846dd0e4bbdfc6ee4b";

pub struct TestConfig {
    pub clinic_api_base: String,
    pub domain_base: String,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            clinic_api_base: "http://localhost:8001/api/v1".to_string(),
            domain_base: "dentaabcxy.store".to_string(),
        }
    }
}

impl TestConfig {
    /// Points the backend at a mock server (pass `MockServer::uri()`).
    pub fn with_backend(uri: &str) -> Self {
        Self {
            clinic_api_base: format!("{}/api/v1", uri),
            ..Self::default()
        }
    }

    pub fn to_app_config(&self) -> AppConfig {
        AppConfig {
            clinic_api_base: self.clinic_api_base.clone(),
            domain_base: self.domain_base.clone(),
            ..AppConfig::default()
        }
    }

    pub fn to_arc(&self) -> Arc<AppConfig> {
        Arc::new(self.to_app_config())
    }
}

pub struct TestUser {
    pub id: i64,
    pub email: String,
    pub subtipo: Option<String>,
    pub rol: Option<String>,
    pub idtipousuario: Option<i64>,
}

impl TestUser {
    pub fn new(id: i64, email: &str) -> Self {
        Self {
            id,
            email: email.to_string(),
            subtipo: None,
            rol: None,
            idtipousuario: None,
        }
    }

    pub fn admin(email: &str) -> Self {
        Self::new(1, email).with_subtipo("administrador").with_role("Administrador", 4)
    }

    pub fn dentist(email: &str) -> Self {
        Self::new(2, email).with_subtipo("odontologo").with_role("Odontólogo", 2)
    }

    pub fn receptionist(email: &str) -> Self {
        Self::new(3, email).with_subtipo("recepcionista").with_role("Recepcionista", 3)
    }

    pub fn patient(email: &str) -> Self {
        Self::new(4, email).with_subtipo("paciente").with_role("Paciente", 1)
    }

    pub fn with_subtipo(mut self, subtipo: &str) -> Self {
        self.subtipo = Some(subtipo.to_string());
        self
    }

    pub fn with_role(mut self, rol: &str, id: i64) -> Self {
        self.rol = Some(rol.to_string());
        self.idtipousuario = Some(id);
        self
    }

    pub fn without_subtipo(mut self) -> Self {
        self.subtipo = None;
        self
    }

    /// JSON shaped like the backend's user object.
    pub fn to_json(&self) -> Value {
        let mut user = json!({
            "id": self.id,
            "email": self.email,
            "nombre": "Test",
            "apellido": "User",
        });

        if let Some(subtipo) = &self.subtipo {
            user["subtipo"] = json!(subtipo);
        }
        if let Some(id) = self.idtipousuario {
            user["idtipousuario"] = json!(id);
        }
        if self.rol.is_some() || self.idtipousuario.is_some() {
            user["tipo_usuario"] = json!({
                "id": self.idtipousuario,
                "rol": self.rol,
            });
        }

        user
    }

    pub fn to_user(&self) -> UserRecord {
        UserRecord::from_value(&self.to_json()).unwrap_or_default()
    }
}

pub struct MockBackendResponses;

impl MockBackendResponses {
    pub fn verify_token_response(user: &TestUser) -> Value {
        json!({ "user": user.to_json() })
    }

    pub fn login_user(user: &TestUser) -> Value {
        json!({
            "codigo": user.id,
            "correoelectronico": user.email,
            "nombre": "Test",
            "apellido": "User",
            "idtipousuario": user.idtipousuario,
            "tipo_usuario_nombre": user.rol,
            "subtipo": user.subtipo,
        })
    }

    pub fn invalid_token_response() -> Value {
        json!({ "detail": "Token inválido." })
    }
}
