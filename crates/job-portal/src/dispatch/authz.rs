//! The authorization vocabulary: per-route declarative rules evaluated by
//! the dispatcher before a handler runs, plus the row-dependent checks
//! handlers apply once the target row is loaded. All ownership comparisons
//! live here; handlers never compare identity strings themselves.

use crate::domain::{Candidate, Company, Job, JobApplication, Role};
use crate::error::PortalError;
use crate::service::Services;

use super::request::ApiRequest;

/// Role requirement attached to a route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RoleRule {
    Any,
    Admin,
    Candidate,
    Company,
    CandidateOrAdmin,
}

/// Ownership requirement attached to a route, for targets identifiable
/// from the request alone. Checks that need the loaded row are exposed as
/// helper functions below.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum OwnershipRule {
    None,
    /// Body is a Candidate whose `userId` must be the caller.
    CandidateProfileBody,
    /// Body is a Company whose `userId` must be the caller.
    CompanyProfileBody,
    /// Body is a Job whose `companyId` must resolve to the caller's company.
    JobBodyCompany,
    /// Body is a JobApplication whose `candidateId` must resolve to the
    /// caller's candidate profile.
    ApplicationBodyCandidate,
    /// Query `id` names an application whose job must belong to the
    /// caller's company.
    ApplicationStatusJobOwner,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Access {
    pub(crate) role: RoleRule,
    pub(crate) ownership: OwnershipRule,
}

impl Access {
    pub(crate) const fn open() -> Self {
        Self {
            role: RoleRule::Any,
            ownership: OwnershipRule::None,
        }
    }

    pub(crate) const fn role(role: RoleRule) -> Self {
        Self {
            role,
            ownership: OwnershipRule::None,
        }
    }

    pub(crate) const fn owned(role: RoleRule, ownership: OwnershipRule) -> Self {
        Self { role, ownership }
    }
}

pub(crate) fn authorize(
    access: &Access,
    request: &ApiRequest,
    services: &Services,
) -> Result<(), PortalError> {
    check_role(access.role, request)?;
    check_ownership(access.ownership, request, services)
}

fn check_role(rule: RoleRule, request: &ApiRequest) -> Result<(), PortalError> {
    let (allowed, message): (&[Role], &str) = match rule {
        RoleRule::Any => return Ok(()),
        RoleRule::Admin => (&[Role::Admin], "Admin access required"),
        RoleRule::Candidate => (&[Role::Candidate], "Candidate access required"),
        RoleRule::Company => (&[Role::Company], "Company access required"),
        RoleRule::CandidateOrAdmin => {
            (&[Role::Candidate, Role::Admin], "Candidate access required")
        }
    };
    match request.role() {
        Some(role) if allowed.contains(&role) => Ok(()),
        _ => Err(PortalError::Forbidden(message.to_string())),
    }
}

fn check_ownership(
    rule: OwnershipRule,
    request: &ApiRequest,
    services: &Services,
) -> Result<(), PortalError> {
    match rule {
        OwnershipRule::None => Ok(()),
        OwnershipRule::CandidateProfileBody => {
            let candidate: Candidate = request.parse_body()?;
            let subject = request.subject()?;
            if candidate.user_id.as_deref() != Some(subject) {
                return Err(PortalError::Forbidden(
                    "You can only create or update your own candidate profile".to_string(),
                ));
            }
            Ok(())
        }
        OwnershipRule::CompanyProfileBody => {
            let company: Company = request.parse_body()?;
            let subject = request.subject()?;
            if company.user_id.as_deref() != Some(subject) {
                return Err(PortalError::Forbidden(
                    "You can only create or update your own company profile".to_string(),
                ));
            }
            Ok(())
        }
        OwnershipRule::JobBodyCompany => {
            let job: Job = request.parse_body()?;
            let subject = request.subject()?;
            match services.companies.find_by_user_id(subject)? {
                Some(company) if company.id == job.company_id => Ok(()),
                _ => Err(PortalError::Forbidden(
                    "You can only manage jobs for your own company".to_string(),
                )),
            }
        }
        OwnershipRule::ApplicationBodyCandidate => {
            let application: JobApplication = request.parse_body()?;
            let subject = request.subject()?;
            match services.candidates.find_by_user_id(subject)? {
                Some(candidate) if candidate.id == application.candidate_id => Ok(()),
                _ => Err(PortalError::Forbidden(
                    "You can only apply with your own candidate profile".to_string(),
                )),
            }
        }
        OwnershipRule::ApplicationStatusJobOwner => {
            let id = request.required_query("id")?;
            let Some(application) = services.applications.find_by_id(id)? else {
                return Err(PortalError::NotFound("Application not found".to_string()));
            };
            company_owns_application(services, request.subject()?, &application)
        }
    }
}

/// CANDIDATE callers may only touch rows owned by their own user; every
/// other role passes. `owner` is the `userId` on the targeted row.
pub(crate) fn candidate_self_allowed(request: &ApiRequest, owner: Option<&str>) -> bool {
    if request.role() != Some(Role::Candidate) {
        return true;
    }
    let subject = request.claims.as_ref().map(|claims| claims.subject.as_str());
    match (subject, owner) {
        (Some(subject), Some(owner)) => subject == owner,
        _ => false,
    }
}

/// The caller's company must own the job the application targets.
pub(crate) fn company_owns_application(
    services: &Services,
    subject: &str,
    application: &JobApplication,
) -> Result<(), PortalError> {
    let job = services.jobs.find_by_id(&application.job_id)?;
    let company = services.companies.find_by_user_id(subject)?;
    match (job, company) {
        (Some(job), Some(company)) if job.company_id == company.id => Ok(()),
        _ => Err(PortalError::Forbidden("Access denied".to_string())),
    }
}

/// The caller's candidate profile must own the application.
pub(crate) fn candidate_owns_application(
    services: &Services,
    subject: &str,
    application: &JobApplication,
) -> Result<(), PortalError> {
    match services.candidates.find_by_user_id(subject)? {
        Some(candidate) if candidate.id == application.candidate_id => Ok(()),
        _ => Err(PortalError::Forbidden("Access denied".to_string())),
    }
}
