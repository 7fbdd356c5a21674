use serde_json::json;

use crate::dispatch::authz;
use crate::dispatch::request::ApiRequest;
use crate::dispatch::response::ApiResponse;
use crate::domain::{JobApplication, Role};
use crate::error::PortalError;
use crate::service::Services;

pub(crate) fn apply(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let application: JobApplication = request.parse_body()?;
    let created = services.application_service.apply(&application)?;
    Ok(ApiResponse::created(json!({
        "message": "Application submitted",
        "application": created,
    })))
}

/// An application is visible to its candidate, to the company owning the
/// job, and to administrators.
pub(crate) fn get_application(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let id = request.required_query("id")?;
    let subject = request.subject()?;
    let Some(application) = services.applications.find_by_id(id)? else {
        return Ok(ApiResponse::not_found("Application not found"));
    };

    match request.role() {
        Some(Role::Candidate) => {
            authz::candidate_owns_application(services, subject, &application)?
        }
        Some(Role::Company) => authz::company_owns_application(services, subject, &application)?,
        Some(Role::Admin) => {}
        None => return Err(PortalError::Forbidden("Access denied".to_string())),
    }

    Ok(ApiResponse::ok(application))
}

pub(crate) fn list_applications(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let (page, size) = request.page_params();
    let subject = request.subject()?;

    if let Some(job_id) = request.query("jobId") {
        return list_by_job(services, request, job_id, subject, page, size);
    }
    if let Some(candidate_id) = request.query("candidateId") {
        return list_by_candidate(services, request, candidate_id, subject, page, size);
    }
    // Administrators may take the unfiltered view, soft-deleted rows
    // included; everyone else must scope the listing.
    if request.role() == Some(Role::Admin) {
        return Ok(ApiResponse::ok(services.applications.list_all(page, size)?));
    }
    Err(PortalError::validation(
        "Query parameter 'jobId' or 'candidateId' is required",
    ))
}

fn list_by_job(
    services: &Services,
    request: &ApiRequest,
    job_id: &str,
    subject: &str,
    page: u32,
    size: u32,
) -> Result<ApiResponse, PortalError> {
    match request.role() {
        Some(Role::Admin) => {}
        Some(Role::Company) => {
            let job = services.jobs.find_by_id(job_id)?;
            let company = services.companies.find_by_user_id(subject)?;
            match (job, company) {
                (Some(job), Some(company)) if job.company_id == company.id => {}
                _ => return Err(PortalError::Forbidden("Access denied".to_string())),
            }
        }
        _ => {
            return Err(PortalError::Forbidden(
                "Company access required to list by job".to_string(),
            ))
        }
    }
    Ok(ApiResponse::ok(services.applications.list_by_job(
        job_id, page, size,
    )?))
}

fn list_by_candidate(
    services: &Services,
    request: &ApiRequest,
    candidate_id: &str,
    subject: &str,
    page: u32,
    size: u32,
) -> Result<ApiResponse, PortalError> {
    match request.role() {
        Some(Role::Admin) => {}
        Some(Role::Candidate) => {
            match services.candidates.find_by_user_id(subject)? {
                Some(candidate) if candidate.id == candidate_id => {}
                _ => return Err(PortalError::Forbidden("Access denied".to_string())),
            }
        }
        _ => {
            return Err(PortalError::Forbidden(
                "Candidate access required to list by candidate".to_string(),
            ))
        }
    }
    Ok(ApiResponse::ok(services.applications.list_by_candidate(
        candidate_id,
        page,
        size,
    )?))
}

pub(crate) fn update_status(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let id = request.required_query("id")?;
    let status = request.required_query("status")?;
    match services.application_service.update_status(id, status)? {
        Some(application) => Ok(ApiResponse::ok(json!({
            "message": "Application status updated",
            "application": application,
        }))),
        None => Ok(ApiResponse::not_found("Application not found")),
    }
}

pub(crate) fn delete_application(
    services: &Services,
    request: &ApiRequest,
) -> Result<ApiResponse, PortalError> {
    let id = request.required_query("id")?;
    match services.application_service.soft_delete(id)? {
        Some(_) => Ok(ApiResponse::ok(json!({
            "message": "Application soft-deleted",
            "id": id,
        }))),
        None => Ok(ApiResponse::not_found("Application not found")),
    }
}
