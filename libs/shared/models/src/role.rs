use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse role classification used to gate clinic UI and endpoints.
///
/// The serde names are the ones the front end already uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoleCategory {
    #[serde(rename = "administrador")]
    Administrator,
    #[serde(rename = "odontologo")]
    Dentist,
    #[serde(rename = "recepcionista")]
    Receptionist,
    #[serde(rename = "paciente")]
    Patient,
    #[serde(rename = "desconocido")]
    Unknown,
}

impl RoleCategory {
    pub const ALL: [RoleCategory; 5] = [
        RoleCategory::Administrator,
        RoleCategory::Dentist,
        RoleCategory::Receptionist,
        RoleCategory::Patient,
        RoleCategory::Unknown,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RoleCategory::Administrator => "administrador",
            RoleCategory::Dentist => "odontologo",
            RoleCategory::Receptionist => "recepcionista",
            RoleCategory::Patient => "paciente",
            RoleCategory::Unknown => "desconocido",
        }
    }
}

impl fmt::Display for RoleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Numeric `idtipousuario` values per role.
///
/// These ids are assigned by the backend database and are not stable across
/// deployments or tenants, so the table is configuration rather than code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoleIdTable {
    pub enabled: bool,
    pub administrator: Vec<i64>,
    pub dentist: Vec<i64>,
    pub receptionist: Vec<i64>,
    pub patient: Vec<i64>,
}

impl Default for RoleIdTable {
    /// Ids observed in the existing deployments: 4 and 189 for administrators.
    fn default() -> Self {
        Self {
            enabled: true,
            administrator: vec![4, 189],
            dentist: vec![2],
            receptionist: vec![3],
            patient: vec![1],
        }
    }
}

impl RoleIdTable {
    /// A table that never matches, turning the numeric tier off.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            administrator: Vec::new(),
            dentist: Vec::new(),
            receptionist: Vec::new(),
            patient: Vec::new(),
        }
    }

    /// Looks an id up in administrator, dentist, receptionist, patient order.
    pub fn lookup(&self, id: i64) -> Option<RoleCategory> {
        if !self.enabled {
            return None;
        }

        if self.administrator.contains(&id) {
            Some(RoleCategory::Administrator)
        } else if self.dentist.contains(&id) {
            Some(RoleCategory::Dentist)
        } else if self.receptionist.contains(&id) {
            Some(RoleCategory::Receptionist)
        } else if self.patient.contains(&id) {
            Some(RoleCategory::Patient)
        } else {
            None
        }
    }
}
