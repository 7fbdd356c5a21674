use uuid::Uuid;

use crate::error::PortalError;

/// Fails unless `value` is a syntactically valid UUID.
pub fn validate_identifier(value: &str, field: &str) -> Result<(), PortalError> {
    if value.trim().is_empty() || Uuid::parse_str(value.trim()).is_err() {
        return Err(PortalError::validation(format!(
            "Field '{field}' must be a valid UUID"
        )));
    }
    Ok(())
}

/// Fails if `value` is empty or whitespace-only.
pub fn validate_required(value: &str, field: &str) -> Result<(), PortalError> {
    if value.trim().is_empty() {
        return Err(PortalError::validation(format!(
            "Field '{field}' is required"
        )));
    }
    Ok(())
}

/// Required check plus a simple `local@domain` shape. Not full RFC 5322.
pub fn validate_email(value: &str) -> Result<(), PortalError> {
    validate_required(value, "email")?;
    if !is_email_shaped(value.trim()) {
        return Err(PortalError::validation(
            "Field 'email' must be a valid email address".to_string(),
        ));
    }
    Ok(())
}

fn is_email_shaped(value: &str) -> bool {
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    let local_ok = !local.is_empty()
        && local
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '_' | '.' | '-'));
    let domain_ok = !domain.is_empty()
        && !domain.contains('@')
        && domain
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '-'));
    local_ok && domain_ok
}

/// Normalizes empty or blank strings to `None` so optional fields persist
/// as true nulls rather than empty strings.
pub fn blank_to_absent(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identifier_accepts_canonical_uuid() {
        assert!(validate_identifier("7f1fbe56-8d2b-4f3a-9a57-2a4f0c9d2f11", "id").is_ok());
    }

    #[test]
    fn identifier_rejects_blank_and_garbage() {
        for bad in ["", "   ", "not-a-uuid", "1234"] {
            match validate_identifier(bad, "id") {
                Err(PortalError::Validation(msg)) => assert!(msg.contains("id")),
                other => panic!("expected validation error for {bad:?}, got {other:?}"),
            }
        }
    }

    #[test]
    fn required_rejects_whitespace() {
        assert!(validate_required("  ", "name").is_err());
        assert!(validate_required("Acme", "name").is_ok());
    }

    #[test]
    fn email_shape_checks() {
        assert!(validate_email("dev+test@example.com").is_ok());
        assert!(validate_email("no-at-sign").is_err());
        assert!(validate_email("two@@example.com").is_err());
        assert!(validate_email("@example.com").is_err());
        assert!(validate_email("user@").is_err());
    }

    #[test]
    fn blank_to_absent_normalizes() {
        assert_eq!(blank_to_absent(Some("  ".to_string())), None);
        assert_eq!(blank_to_absent(None), None);
        assert_eq!(
            blank_to_absent(Some("kept".to_string())),
            Some("kept".to_string())
        );
    }
}
