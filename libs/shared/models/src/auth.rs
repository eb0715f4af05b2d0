use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::role::RoleCategory;

/// Role reference attached to a user by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TipoUsuario {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub rol: Option<String>,
}

/// Cached copy of the authenticated user as the backend describes it.
///
/// Every field is optional and decoding never fails on a JSON object: a field
/// holding the wrong JSON type, an empty string or a zero id is read as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub apellido: Option<String>,
    #[serde(default, deserialize_with = "lenient_id", skip_serializing_if = "Option::is_none")]
    pub idtipousuario: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub tipo_usuario_nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient_text", skip_serializing_if = "Option::is_none")]
    pub subtipo: Option<String>,
    #[serde(default, deserialize_with = "lenient_tipo_usuario", skip_serializing_if = "Option::is_none")]
    pub tipo_usuario: Option<TipoUsuario>,
    /// Fields the gateway does not interpret (`odontologo`, `paciente`,
    /// `recepcionista` profiles and the like), written back untouched.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl UserRecord {
    /// Reads a user record out of arbitrary JSON.
    ///
    /// Anything that is not a JSON object (including `null`) is an absent user.
    pub fn from_value(value: &Value) -> Option<UserRecord> {
        if !value.is_object() {
            return None;
        }
        serde_json::from_value(value.clone()).ok()
    }

    pub fn role_name(&self) -> Option<&str> {
        self.tipo_usuario.as_ref().and_then(|t| t.rol.as_deref())
    }

    /// Id used by legacy id-based route checks: `tipo_usuario.id` first,
    /// then `idtipousuario`.
    pub fn role_id(&self) -> Option<i64> {
        self.tipo_usuario
            .as_ref()
            .and_then(|t| t.id)
            .or(self.idtipousuario)
    }

    /// Upgrades a record stored by older clients, which only carried the role
    /// id inside `tipo_usuario`. Returns whether the record changed.
    pub fn migrate_legacy(&mut self) -> bool {
        if self.idtipousuario.is_some() {
            return false;
        }

        match self.tipo_usuario.as_ref().and_then(|t| t.id) {
            Some(id) => {
                tracing::warn!("Migrating stored user record: idtipousuario taken from tipo_usuario.id");
                self.idtipousuario = Some(id);
                true
            }
            None => false,
        }
    }
}

/// User payload returned by the backend's login endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendLoginUser {
    #[serde(default, deserialize_with = "lenient_id")]
    pub codigo: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub correoelectronico: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub apellido: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    pub idtipousuario: Option<i64>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub tipo_usuario_nombre: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub subtipo: Option<String>,
    #[serde(default, deserialize_with = "lenient_object", skip_serializing_if = "Option::is_none")]
    pub odontologo: Option<Value>,
    #[serde(default, deserialize_with = "lenient_object", skip_serializing_if = "Option::is_none")]
    pub paciente: Option<Value>,
    #[serde(default, deserialize_with = "lenient_object", skip_serializing_if = "Option::is_none")]
    pub recepcionista: Option<Value>,
}

impl From<BackendLoginUser> for UserRecord {
    fn from(user: BackendLoginUser) -> Self {
        let rol = user
            .tipo_usuario_nombre
            .clone()
            .or_else(|| user.subtipo.clone())
            .unwrap_or_else(|| "Usuario".to_string());

        let mut extra = Map::new();
        let profiles = [
            ("odontologo", user.odontologo),
            ("paciente", user.paciente),
            ("recepcionista", user.recepcionista),
        ];
        for (key, profile) in profiles {
            if let Some(profile) = profile {
                extra.insert(key.to_string(), profile);
            }
        }

        UserRecord {
            id: user.codigo,
            email: user.correoelectronico,
            nombre: user.nombre,
            apellido: user.apellido,
            idtipousuario: user.idtipousuario,
            tipo_usuario_nombre: user.tipo_usuario_nombre,
            subtipo: user.subtipo,
            tipo_usuario: Some(TipoUsuario {
                id: user.idtipousuario,
                rol: Some(rol),
            }),
            extra,
        }
    }
}

/// Body of the backend's token verification endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifiedSession {
    #[serde(default)]
    pub user: Option<Value>,
}

impl VerifiedSession {
    pub fn user_record(&self) -> Option<UserRecord> {
        self.user.as_ref().and_then(UserRecord::from_value)
    }
}

/// The authenticated session attached to a request by the session middleware.
#[derive(Debug, Clone)]
pub struct SessionUser {
    pub token: String,
    pub user: Option<UserRecord>,
}

/// Session slot for routes that also serve anonymous callers.
#[derive(Debug, Clone, Default)]
pub struct OptionalSession(pub Option<SessionUser>);

#[derive(Debug, Serialize, Deserialize)]
pub struct TokenResponse {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<RoleCategory>,
}

fn text_of(value: &Value) -> Option<String> {
    value
        .as_str()
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

fn id_of(value: &Value) -> Option<i64> {
    let id = value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|f| f.fract() == 0.0 && *f >= i64::MIN as f64 && *f <= i64::MAX as f64)
            .map(|f| f as i64)
    })?;

    (id != 0).then_some(id)
}

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(text_of(&value))
}

fn lenient_id<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(id_of(&value))
}

fn lenient_object<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value.is_object().then_some(value))
}

fn lenient_tipo_usuario<'de, D>(deserializer: D) -> Result<Option<TipoUsuario>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}
