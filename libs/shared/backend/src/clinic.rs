use anyhow::Result;
use reqwest::{
    header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method,
};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

use shared_config::AppConfig;
use shared_models::auth::VerifiedSession;

pub const TENANT_HEADER: &str = "x-tenant-subdomain";

const VERIFY_TOKEN_PATH: &str = "/auth/verificar-token/";
const LOGOUT_PATH: &str = "/auth/logout/";

#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    #[error("Authentication error: {0}")]
    Unauthorized(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("API error ({status}): {body}")]
    Status { status: u16, body: String },

    #[error("Invalid header value: {0}")]
    InvalidHeader(String),
}

/// Client for the clinic's REST backend, which owns authentication and every
/// piece of business state.
pub struct ClinicBackendClient {
    client: Client,
    base_url: String,
}

impl ClinicBackendClient {
    pub fn new(config: &AppConfig) -> Self {
        let client = Client::builder()
            .timeout(config.clinic_api_timeout)
            .build()
            .unwrap_or_else(|e| {
                warn!("Falling back to default HTTP client: {}", e);
                Client::new()
            });

        Self {
            client,
            base_url: config.clinic_api_base.trim_end_matches('/').to_string(),
        }
    }

    fn get_headers(&self, auth_token: Option<&str>, tenant: Option<&str>) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();

        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(token) = auth_token {
            let value = HeaderValue::from_str(&format!("Token {}", token))
                .map_err(|_| BackendError::InvalidHeader("authorization token".to_string()))?;
            headers.insert(AUTHORIZATION, value);
        }

        if let Some(subdomain) = tenant {
            let value = HeaderValue::from_str(subdomain)
                .map_err(|_| BackendError::InvalidHeader("tenant subdomain".to_string()))?;
            headers.insert(TENANT_HEADER, value);
        }

        Ok(headers)
    }

    pub fn url_for(&self, path: &str) -> String {
        if is_absolute_url(path) {
            return path.to_string();
        }
        format!("{}{}", self.base_url, normalize_path(&self.base_url, path))
    }

    pub async fn request<T>(
        &self,
        method: Method,
        path: &str,
        auth_token: Option<&str>,
        tenant: Option<&str>,
        body: Option<Value>,
    ) -> Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.url_for(path);
        debug!("Making request to {} {}", method, url);

        let headers = self.get_headers(auth_token, tenant)?;

        let mut req = self.client.request(method, &url).headers(headers);

        if let Some(body_data) = body {
            req = req.json(&body_data);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("API error ({}): {}", status, error_text);

            return Err(match status.as_u16() {
                401 | 403 => BackendError::Unauthorized(error_text),
                404 => BackendError::NotFound(error_text),
                code => BackendError::Status { status: code, body: error_text },
            }
            .into());
        }

        // Some endpoints answer with an empty body.
        let bytes = response.bytes().await?;
        let data = if bytes.is_empty() {
            serde_json::from_value(Value::Null)?
        } else {
            serde_json::from_slice(&bytes)?
        };
        Ok(data)
    }

    /// Asks the backend whether `token` is still valid and who it belongs to.
    pub async fn verify_token(&self, token: &str, tenant: Option<&str>) -> Result<VerifiedSession> {
        self.request::<Option<VerifiedSession>>(Method::GET, VERIFY_TOKEN_PATH, Some(token), tenant, None)
            .await
            .map(Option::unwrap_or_default)
    }

    pub async fn logout(&self, token: &str, tenant: Option<&str>) -> Result<()> {
        self.request::<Value>(Method::POST, LOGOUT_PATH, Some(token), tenant, None)
            .await
            .map(|_| ())
    }
}

fn is_absolute_url(path: &str) -> bool {
    let lower = path.to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Makes `path` relative to `base_url`: adds the leading slash and drops a
/// duplicated `/api/` prefix when the base already ends in `/api`.
pub fn normalize_path(base_url: &str, path: &str) -> String {
    let mut url = if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    };

    if base_url.trim_end_matches('/').ends_with("/api") && url.starts_with("/api/") {
        let rest = url["/api/".len()..].trim_start_matches('/');
        url = format!("/{}", rest);
    }

    url
}
