use std::collections::HashSet;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use std::time::{SystemTime, UNIX_EPOCH};

use axum::http::HeaderMap;
use job_portal::config::MediaConfig;
use job_portal::dispatch::{Claims, Dispatcher};
use job_portal::domain::Role;
use job_portal::error::PortalError;
use job_portal::media::MediaStore;
use metrics_exporter_prometheus::PrometheusHandle;

/// Header names the upstream gateway populates after verifying the JWT.
pub(crate) const SUBJECT_HEADER: &str = "x-portal-sub";
pub(crate) const ROLE_HEADER: &str = "x-portal-role";

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
    pub(crate) dispatcher: Arc<Dispatcher>,
}

/// Builds claims from the gateway headers. Both headers must be present
/// and well-formed; the portal core never sees half an identity.
pub(crate) fn claims_from_headers(headers: &HeaderMap) -> Option<Claims> {
    let subject = headers
        .get(SUBJECT_HEADER)?
        .to_str()
        .ok()
        .map(str::trim)
        .filter(|value| !value.is_empty())?
        .to_string();
    let role = headers
        .get(ROLE_HEADER)?
        .to_str()
        .ok()
        .and_then(|value| Role::parse(value.trim()))?;
    Some(Claims { subject, role })
}

/// Development stand-in for the object-store presigner: hands out
/// deterministic URLs under the configured base and tracks existence in
/// memory. Production swaps in a real presigner behind the same trait.
pub(crate) struct LocalMediaStore {
    base_url: String,
    url_ttl_secs: u64,
    objects: Mutex<HashSet<String>>,
}

impl LocalMediaStore {
    pub(crate) fn new(config: &MediaConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            url_ttl_secs: config.url_ttl_secs,
            objects: Mutex::new(HashSet::new()),
        }
    }

    fn expiry(&self) -> u64 {
        let now = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);
        now + self.url_ttl_secs
    }
}

impl MediaStore for LocalMediaStore {
    fn exists(&self, key: &str) -> Result<bool, PortalError> {
        Ok(self
            .objects
            .lock()
            .expect("media mutex poisoned")
            .contains(key))
    }

    fn upload_url(&self, key: &str, content_type: &str) -> Result<String, PortalError> {
        self.objects
            .lock()
            .expect("media mutex poisoned")
            .insert(key.to_string());
        Ok(format!(
            "{}/{key}?contentType={content_type}&expires={}",
            self.base_url,
            self.expiry()
        ))
    }

    fn download_url(&self, key: &str) -> Result<String, PortalError> {
        Ok(format!("{}/{key}?expires={}", self.base_url, self.expiry()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    #[test]
    fn claims_require_both_headers() {
        let mut headers = HeaderMap::new();
        assert!(claims_from_headers(&headers).is_none());

        headers.insert(SUBJECT_HEADER, HeaderValue::from_static("user-1"));
        assert!(claims_from_headers(&headers).is_none());

        headers.insert(ROLE_HEADER, HeaderValue::from_static("COMPANY"));
        let claims = claims_from_headers(&headers).expect("claims parse");
        assert_eq!(claims.subject, "user-1");
        assert_eq!(claims.role, Role::Company);
    }

    #[test]
    fn unknown_roles_invalidate_the_claims() {
        let mut headers = HeaderMap::new();
        headers.insert(SUBJECT_HEADER, HeaderValue::from_static("user-1"));
        headers.insert(ROLE_HEADER, HeaderValue::from_static("SUPERUSER"));
        assert!(claims_from_headers(&headers).is_none());
    }
}
