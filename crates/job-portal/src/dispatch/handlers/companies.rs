use serde_json::json;

use crate::dispatch::request::ApiRequest;
use crate::dispatch::response::ApiResponse;
use crate::domain::Company;
use crate::error::PortalError;
use crate::media::{self, DEFAULT_IMAGE_CONTENT_TYPE};
use crate::service::Services;

pub(crate) fn put_company(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let company: Company = request.parse_body()?;
    services.companies.upsert(&company)?;
    Ok(ApiResponse::ok(json!({
        "message": "Company upserted",
        "company": company,
    })))
}

/// Lookup by `id` (open to any caller) or by `userId` (restricted to the
/// owning caller; profiles are only discoverable by id).
pub(crate) fn get_company(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let company = if let Some(id) = request.query("id") {
        services.companies.find_by_id(id)?
    } else if let Some(user_id) = request.query("userId") {
        let subject = request.subject()?;
        if subject != user_id {
            return Err(PortalError::Forbidden(
                "You can only access your own company profile this way".to_string(),
            ));
        }
        services.companies.find_by_user_id(user_id)?
    } else {
        return Err(PortalError::validation(
            "Query parameter 'id' or 'userId' is required",
        ));
    };

    match company {
        Some(company) => Ok(ApiResponse::ok(company)),
        None => Ok(ApiResponse::not_found("Company not found")),
    }
}

pub(crate) fn list_companies(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let (page, size) = request.page_params();
    let listing = if request.include_deleted() {
        services.companies.list_all(page, size)?
    } else {
        services.companies.list_active(page, size)?
    };
    Ok(ApiResponse::ok(listing))
}

pub(crate) fn delete_company(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let id = request.required_query("id")?;
    match services.companies.soft_delete(id)? {
        Some(_) => Ok(ApiResponse::ok(json!({
            "message": "Company soft-deleted",
            "id": id,
        }))),
        None => Ok(ApiResponse::not_found("Company not found")),
    }
}

/// Disable cascades: the company's OPEN jobs close in the same transaction.
pub(crate) fn disable_company(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let id = request.required_query("id")?;
    match services.company_service.disable(id)? {
        Some(_) => Ok(ApiResponse::ok(json!({
            "message": "Company disabled",
            "id": id,
        }))),
        None => Ok(ApiResponse::not_found("Company not found")),
    }
}

pub(crate) fn enable_company(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let id = request.required_query("id")?;
    match services.company_service.enable(id)? {
        Some(_) => Ok(ApiResponse::ok(json!({
            "message": "Company enabled",
            "id": id,
        }))),
        None => Ok(ApiResponse::not_found("Company not found")),
    }
}

pub(crate) fn logo_upload_url(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let subject = request.subject()?;
    let content_type = request
        .query("contentType")
        .unwrap_or(DEFAULT_IMAGE_CONTENT_TYPE);
    let key = media::logo_key(subject);
    let upload_url = services.media.upload_url(&key, content_type)?;
    Ok(ApiResponse::ok(json!({
        "uploadUrl": upload_url,
        "key": key,
    })))
}

pub(crate) fn logo_download_url(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let subject = request.subject()?;
    let key = media::logo_key(subject);
    if !services.media.exists(&key)? {
        return Ok(ApiResponse::not_found("No logo uploaded"));
    }
    let download_url = services.media.download_url(&key)?;
    Ok(ApiResponse::ok(json!({ "downloadUrl": download_url })))
}
