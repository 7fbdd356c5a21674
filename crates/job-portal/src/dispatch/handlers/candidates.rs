use serde_json::json;

use crate::dispatch::authz;
use crate::dispatch::request::ApiRequest;
use crate::dispatch::response::ApiResponse;
use crate::domain::{Candidate, EntityStatus, Role};
use crate::error::PortalError;
use crate::media::{self, DEFAULT_IMAGE_CONTENT_TYPE};
use crate::service::Services;

pub(crate) fn put_candidate(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let candidate: Candidate = request.parse_body()?;
    services.candidates.upsert(&candidate)?;
    Ok(ApiResponse::ok(json!({
        "message": "Candidate upserted",
        "candidate": candidate,
    })))
}

/// Lookup by `id` or `userId`. CANDIDATE callers are confined to their own
/// profile; COMPANY and ADMIN read freely.
pub(crate) fn get_candidate(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let candidate = if let Some(user_id) = request.query("userId") {
        if !authz::candidate_self_allowed(request, Some(user_id)) {
            return Err(PortalError::Forbidden(
                "You can only access your own profile".to_string(),
            ));
        }
        services.candidates.find_by_user_id(user_id)?
    } else if let Some(id) = request.query("id") {
        let candidate = services.candidates.find_by_id(id)?;
        if let Some(candidate) = &candidate {
            if !authz::candidate_self_allowed(request, candidate.user_id.as_deref()) {
                return Err(PortalError::Forbidden(
                    "You can only access your own profile".to_string(),
                ));
            }
        }
        candidate
    } else {
        return Err(PortalError::validation(
            "Query parameter 'id' or 'userId' is required",
        ));
    };

    match candidate {
        Some(candidate) => Ok(ApiResponse::ok(candidate)),
        None => Ok(ApiResponse::not_found("Candidate not found")),
    }
}

pub(crate) fn list_candidates(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let (page, size) = request.page_params();
    let listing = if request.include_deleted() {
        services.candidates.list_all(page, size)?
    } else {
        services.candidates.list_active(page, size)?
    };
    Ok(ApiResponse::ok(listing))
}

pub(crate) fn delete_candidate(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let id = request.required_query("id")?;
    match services.candidates.soft_delete(id)? {
        Some(_) => Ok(ApiResponse::ok(json!({
            "message": "Candidate soft-deleted",
            "id": id,
        }))),
        None => Ok(ApiResponse::not_found("Candidate not found")),
    }
}

pub(crate) fn disable_candidate(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    set_candidate_status(services, request, EntityStatus::Disabled, "Candidate disabled")
}

pub(crate) fn enable_candidate(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    set_candidate_status(services, request, EntityStatus::Active, "Candidate enabled")
}

fn set_candidate_status(
    services: &Services,
    request: &ApiRequest,
    status: EntityStatus,
    message: &str,
) -> Result<ApiResponse, PortalError> {
    let id = request.required_query("id")?;
    match services.candidates.set_status(id, status)? {
        Some(_) => Ok(ApiResponse::ok(json!({ "message": message, "id": id }))),
        None => Ok(ApiResponse::not_found("Candidate not found")),
    }
}

pub(crate) fn photo_upload_url(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let subject = request.subject()?;
    let content_type = request
        .query("contentType")
        .unwrap_or(DEFAULT_IMAGE_CONTENT_TYPE);
    let key = media::photo_key(subject);
    let upload_url = services.media.upload_url(&key, content_type)?;
    Ok(ApiResponse::ok(json!({
        "uploadUrl": upload_url,
        "key": key,
    })))
}

/// Candidates fetch their own photo; admins may pass `userId` to inspect
/// any candidate's photo.
pub(crate) fn photo_download_url(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let owner = if request.role() == Some(Role::Admin) {
        request.required_query("userId")?.to_string()
    } else {
        request.subject()?.to_string()
    };
    let key = media::photo_key(&owner);
    if !services.media.exists(&key)? {
        return Ok(ApiResponse::not_found("No photo uploaded"));
    }
    let download_url = services.media.download_url(&key)?;
    Ok(ApiResponse::ok(json!({ "downloadUrl": download_url })))
}
