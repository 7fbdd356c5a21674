//! Object-storage collaborator seam for candidate photos and company logos.
//!
//! The key layout is owned here; implementations only sign whatever key
//! they are handed. Production backs this with a real presigner, local
//! development and tests with the api service's stub.

use crate::error::PortalError;

pub const DEFAULT_IMAGE_CONTENT_TYPE: &str = "image/jpeg";

/// Time-bounded URL provider over an object store.
pub trait MediaStore: Send + Sync {
    fn exists(&self, key: &str) -> Result<bool, PortalError>;
    fn upload_url(&self, key: &str, content_type: &str) -> Result<String, PortalError>;
    fn download_url(&self, key: &str) -> Result<String, PortalError>;
}

/// Storage key for a candidate's profile photo, keyed by the owning user.
pub fn photo_key(user_id: &str) -> String {
    format!("candidates/{user_id}/photo")
}

/// Storage key for a company's logo, keyed by the owning user.
pub fn logo_key(user_id: &str) -> String {
    format!("companies/{user_id}/logo")
}
