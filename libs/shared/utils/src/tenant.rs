use std::net::IpAddr;

use axum::http::{
    header::{AsHeaderName, HOST, ORIGIN},
    HeaderMap,
};
use serde::Serialize;

use shared_backend::clinic::TENANT_HEADER;

const FORWARDED_HOST: &str = "x-forwarded-host";

/// Clinic tenant a request belongs to, derived from the subdomain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TenantInfo {
    pub subdomain: Option<String>,
    pub is_public: bool,
    pub hostname: String,
    pub tenant_id: String,
    pub display_name: String,
}

impl TenantInfo {
    fn new(hostname: &str, subdomain: Option<String>, is_public: bool) -> Self {
        let tenant_id = subdomain.clone().unwrap_or_else(|| "public".to_string());
        let display_name = match &subdomain {
            Some(sub) => format!("Clínica {}", sub),
            None => "Sistema Central".to_string(),
        };

        Self {
            subdomain,
            is_public,
            hostname: hostname.to_string(),
            tenant_id,
            display_name,
        }
    }

    pub fn from_subdomain(hostname: &str, subdomain: &str) -> Self {
        Self::new(hostname, Some(subdomain.to_string()), false)
    }
}

/// Resolves the tenant for a bare hostname (no port).
///
/// `clinica1.localhost` and `clinica1.<base>` name tenant `clinica1`;
/// `localhost`, `<base>` and `www.<base>` are the public site.
pub fn resolve_tenant(hostname: &str, base_domain: &str) -> TenantInfo {
    let hostname = hostname.trim().trim_end_matches('.').to_ascii_lowercase();
    let parts: Vec<&str> = hostname.split('.').collect();

    if hostname.is_empty() || hostname.parse::<IpAddr>().is_ok() {
        return TenantInfo::new(&hostname, None, true);
    }

    if hostname.contains("localhost") {
        if parts.len() > 1 && parts[0] != "localhost" {
            return TenantInfo::new(&hostname, Some(parts[0].to_string()), false);
        }
        return TenantInfo::new(&hostname, None, true);
    }

    let base = base_domain.to_ascii_lowercase();
    if hostname == base || hostname == format!("www.{}", base) {
        return TenantInfo::new(&hostname, None, true);
    }

    if parts.len() > 2 {
        return TenantInfo::new(&hostname, Some(parts[0].to_string()), false);
    }

    TenantInfo::new(&hostname, None, false)
}

/// Tenant for an incoming request. An explicit tenant header wins; otherwise
/// the tenant comes from the host the caller's page was served from.
pub fn tenant_from_headers(headers: &HeaderMap, base_domain: &str) -> TenantInfo {
    let hostname = client_hostname(headers).unwrap_or_default();

    let explicit = headers
        .get(TENANT_HEADER)
        .and_then(|h| h.to_str().ok())
        .map(str::trim)
        .filter(|s| !s.is_empty());

    match explicit {
        Some(subdomain) => TenantInfo::from_subdomain(&hostname, subdomain),
        None => resolve_tenant(&hostname, base_domain),
    }
}

/// Host of the front end the request came from: `Origin`, then
/// `X-Forwarded-Host`, then `Host`. The gateway's own host only names a
/// tenant when nothing else does.
fn client_hostname(headers: &HeaderMap) -> Option<String> {
    let from_origin = header_str(headers, ORIGIN)
        .and_then(|origin| origin.split_once("://"))
        .map(|(_, authority)| authority.split('/').next().unwrap_or(authority));

    let from_forwarded = header_str(headers, FORWARDED_HOST).and_then(|value| value.split(',').next());

    [from_origin, from_forwarded, header_str(headers, HOST)]
        .into_iter()
        .flatten()
        .map(|host| strip_port(host.trim()).to_string())
        .find(|host| !host.is_empty())
}

fn header_str<K: AsHeaderName>(headers: &HeaderMap, name: K) -> Option<&str> {
    headers.get(name).and_then(|h| h.to_str().ok())
}

fn strip_port(host: &str) -> &str {
    // Bracketed IPv6 literals carry colons of their own.
    if let Some(rest) = host.strip_prefix('[') {
        return rest.split(']').next().unwrap_or(rest);
    }
    host.split(':').next().unwrap_or(host)
}
