use std::collections::HashMap;

use serde::de::DeserializeOwned;

use crate::domain::Role;
use crate::error::PortalError;

/// Identity claims extracted by the surrounding transport layer. The core
/// trusts them as already authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Claims {
    pub subject: String,
    pub role: Role,
}

/// One HTTP-style event: everything the dispatcher needs, nothing
/// transport-specific.
#[derive(Debug, Clone, Default)]
pub struct ApiRequest {
    pub method: String,
    pub path: String,
    pub query: HashMap<String, String>,
    pub body: Option<String>,
    pub claims: Option<Claims>,
}

impl ApiRequest {
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn with_query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.insert(key.into(), value.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_claims(mut self, subject: impl Into<String>, role: Role) -> Self {
        self.claims = Some(Claims {
            subject: subject.into(),
            role,
        });
        self
    }

    pub fn query(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str).filter(|v| !v.trim().is_empty())
    }

    /// Query parameter required to be present and non-blank.
    pub fn required_query(&self, key: &str) -> Result<&str, PortalError> {
        self.query(key)
            .ok_or_else(|| PortalError::validation(format!("Query parameter '{key}' is required")))
    }

    /// Integer query parameter; unparsable or missing values fall back.
    pub fn query_u32(&self, key: &str, default: u32) -> u32 {
        self.query(key)
            .and_then(|value| value.parse().ok())
            .unwrap_or(default)
    }

    /// Zero-based page and size with the portal's defaults.
    pub fn page_params(&self) -> (u32, u32) {
        (self.query_u32("page", 0), self.query_u32("size", 20))
    }

    pub fn include_deleted(&self) -> bool {
        self.query("includeDeleted") == Some("true")
    }

    /// Decodes the JSON body, reporting absence and malformed payloads as
    /// client errors.
    pub fn parse_body<T: DeserializeOwned>(&self) -> Result<T, PortalError> {
        let body = self.body.as_deref().unwrap_or("");
        if body.trim().is_empty() {
            return Err(PortalError::validation("Body is required"));
        }
        serde_json::from_str(body).map_err(|_| PortalError::validation("Invalid JSON body"))
    }

    pub fn role(&self) -> Option<Role> {
        self.claims.as_ref().map(|claims| claims.role)
    }

    /// The caller's subject claim, or the uniform refusal when identity is
    /// unavailable.
    pub fn subject(&self) -> Result<&str, PortalError> {
        self.claims
            .as_ref()
            .map(|claims| claims.subject.as_str())
            .filter(|subject| !subject.trim().is_empty())
            .ok_or_else(|| PortalError::Forbidden("Unable to identify caller".to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_helpers_apply_defaults() {
        let request = ApiRequest::new("GET", "/api/joblist")
            .with_query("page", "2")
            .with_query("size", "junk");
        assert_eq!(request.page_params(), (2, 20));
        assert!(!request.include_deleted());
    }

    #[test]
    fn blank_query_values_count_as_absent() {
        let request = ApiRequest::new("GET", "/api/job").with_query("id", "  ");
        assert!(request.query("id").is_none());
        assert!(request.required_query("id").is_err());
    }

    #[test]
    fn subject_requires_claims() {
        let request = ApiRequest::new("GET", "/api/jobapplication");
        match request.subject() {
            Err(PortalError::Forbidden(message)) => {
                assert_eq!(message, "Unable to identify caller");
            }
            other => panic!("expected forbidden, got {other:?}"),
        }
    }
}
