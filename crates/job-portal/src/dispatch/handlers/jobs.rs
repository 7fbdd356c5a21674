use serde_json::json;

use crate::dispatch::request::ApiRequest;
use crate::dispatch::response::ApiResponse;
use crate::domain::{Job, JobStatus, Role};
use crate::error::PortalError;
use crate::service::Services;

pub(crate) fn put_job(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let job: Job = request.parse_body()?;
    let created = services.job_service.create_job(&job)?;
    Ok(ApiResponse::ok(json!({
        "message": "Job created/updated",
        "job": created,
    })))
}

pub(crate) fn get_job(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let id = request.required_query("id")?;
    match services.jobs.find_by_id(id)? {
        Some(job) => Ok(ApiResponse::ok(job)),
        None => Ok(ApiResponse::not_found("Job not found")),
    }
}

/// Public listing with status/company filters. COMPANY callers always see
/// their own board regardless of the `companyId` parameter; the
/// deleted-rows view is for administrators.
pub(crate) fn list_jobs(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let (page, size) = request.page_params();

    if request.include_deleted() {
        if request.role() != Some(Role::Admin) {
            return Err(PortalError::Forbidden("Admin access required".to_string()));
        }
        return Ok(ApiResponse::ok(services.jobs.list_all(page, size)?));
    }

    let status = match request.query("status") {
        Some(raw) => Some(JobStatus::parse(raw).ok_or_else(|| {
            PortalError::validation("Query parameter 'status' must be one of: OPEN, CLOSED")
        })?),
        None => None,
    };

    let own_company_id;
    let company_id = if request.role() == Some(Role::Company) {
        let subject = request.subject()?;
        let Some(company) = services.companies.find_by_user_id(subject)? else {
            return Ok(ApiResponse::not_found("Company profile not found"));
        };
        own_company_id = company.id;
        Some(own_company_id.as_str())
    } else {
        request.query("companyId")
    };

    let listing = services.jobs.list(page, size, company_id, status)?;
    Ok(ApiResponse::ok(listing))
}

pub(crate) fn delete_job(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let id = request.required_query("id")?;
    match services.jobs.soft_delete(id)? {
        Some(_) => Ok(ApiResponse::ok(json!({
            "message": "Job soft-deleted",
            "id": id,
        }))),
        None => Ok(ApiResponse::not_found("Job not found")),
    }
}
