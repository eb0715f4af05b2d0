use std::env;
use std::time::Duration;
use tracing::warn;

use shared_models::role::RoleIdTable;

const DEFAULT_API_BASE: &str = "http://localhost:8001/api/v1";
const DEFAULT_DOMAIN_BASE: &str = "dentaabcxy.store";
const DEFAULT_TIMEOUT_SECS: u64 = 30;
const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub clinic_api_base: String,
    pub clinic_api_timeout: Duration,
    pub domain_base: String,
    pub role_ids: RoleIdTable,
    pub port: u16,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            clinic_api_base: DEFAULT_API_BASE.to_string(),
            clinic_api_timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            domain_base: DEFAULT_DOMAIN_BASE.to_string(),
            role_ids: RoleIdTable::default(),
            port: DEFAULT_PORT,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from any key lookup; `from_env` passes the
    /// process environment.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let clinic_api_base = lookup("CLINIC_API_BASE").unwrap_or_else(|| {
            warn!("CLINIC_API_BASE not set, using default {}", DEFAULT_API_BASE);
            defaults.clinic_api_base.clone()
        });

        let clinic_api_timeout = lookup("CLINIC_API_TIMEOUT_SECS")
            .and_then(|raw| match raw.trim().parse::<u64>() {
                Ok(0) => {
                    warn!("CLINIC_API_TIMEOUT_SECS must be positive, using default");
                    None
                }
                Ok(secs) => Some(Duration::from_secs(secs)),
                Err(_) => {
                    warn!("CLINIC_API_TIMEOUT_SECS is not a number: {}", raw);
                    None
                }
            })
            .unwrap_or(defaults.clinic_api_timeout);

        let domain_base = lookup("CLINIC_DOMAIN_BASE").unwrap_or_else(|| {
            warn!("CLINIC_DOMAIN_BASE not set, using default {}", DEFAULT_DOMAIN_BASE);
            defaults.domain_base.clone()
        });

        let port = lookup("PORT")
            .and_then(|raw| raw.trim().parse::<u16>().ok())
            .unwrap_or(defaults.port);

        let config = Self {
            clinic_api_base,
            clinic_api_timeout,
            domain_base,
            role_ids: role_ids_from_lookup(&lookup, defaults.role_ids),
            port,
        };

        if !config.is_configured() {
            warn!("Application not fully configured - clinic backend URL is empty");
        }

        config
    }

    pub fn is_configured(&self) -> bool {
        !self.clinic_api_base.is_empty()
    }
}

fn role_ids_from_lookup<F>(lookup: &F, defaults: RoleIdTable) -> RoleIdTable
where
    F: Fn(&str) -> Option<String>,
{
    let enabled = match lookup("ROLE_ID_FALLBACK") {
        Some(raw) => !matches!(raw.trim().to_ascii_lowercase().as_str(), "false" | "0" | "off" | "no"),
        None => defaults.enabled,
    };

    if !enabled {
        warn!("Numeric role id fallback disabled");
        return RoleIdTable::disabled();
    }

    RoleIdTable {
        enabled,
        administrator: id_list(lookup, "ROLE_IDS_ADMIN").unwrap_or(defaults.administrator),
        dentist: id_list(lookup, "ROLE_IDS_DENTIST").unwrap_or(defaults.dentist),
        receptionist: id_list(lookup, "ROLE_IDS_RECEPTIONIST").unwrap_or(defaults.receptionist),
        patient: id_list(lookup, "ROLE_IDS_PATIENT").unwrap_or(defaults.patient),
    }
}

fn id_list<F>(lookup: &F, key: &str) -> Option<Vec<i64>>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;

    let ids = raw
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .filter_map(|part| match part.parse::<i64>() {
            Ok(id) => Some(id),
            Err(_) => {
                warn!("Skipping invalid role id '{}' in {}", part, key);
                None
            }
        })
        .collect();

    Some(ids)
}
