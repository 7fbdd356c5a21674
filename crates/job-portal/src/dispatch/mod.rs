//! Authorization-aware request dispatch.
//!
//! A closed table maps exact (method, path) pairs to handlers; each entry
//! carries a declarative access policy the dispatcher evaluates before the
//! handler body runs. The dispatcher is also the single place where domain
//! errors become response shapes.

mod authz;
pub(crate) mod handlers;
pub mod request;
pub mod response;

pub use request::{ApiRequest, Claims};
pub use response::ApiResponse;

use authz::{Access, OwnershipRule, RoleRule};

use crate::error::PortalError;
use crate::service::Services;

type Handler = fn(&Services, &ApiRequest) -> Result<ApiResponse, PortalError>;

struct Route {
    method: &'static str,
    path: &'static str,
    access: Access,
    handler: Handler,
}

const fn route(
    method: &'static str,
    path: &'static str,
    access: Access,
    handler: Handler,
) -> Route {
    Route {
        method,
        path,
        access,
        handler,
    }
}

/// The closed route table. Everything the portal exposes is listed here;
/// anything else is a 404 before any claim is inspected.
const ROUTES: &[Route] = &[
    // Users
    route("PUT", "/api/user", Access::open(), handlers::users::put_user),
    route("GET", "/api/user", Access::open(), handlers::users::get_user),
    route(
        "GET",
        "/api/userlist",
        Access::role(RoleRule::Admin),
        handlers::users::list_users,
    ),
    route(
        "DELETE",
        "/api/user",
        Access::role(RoleRule::Admin),
        handlers::users::delete_user,
    ),
    // Candidates
    route(
        "PUT",
        "/api/candidate",
        Access::owned(RoleRule::Candidate, OwnershipRule::CandidateProfileBody),
        handlers::candidates::put_candidate,
    ),
    route(
        "GET",
        "/api/candidate",
        Access::open(),
        handlers::candidates::get_candidate,
    ),
    route(
        "GET",
        "/api/candidatelist",
        Access::role(RoleRule::Admin),
        handlers::candidates::list_candidates,
    ),
    route(
        "DELETE",
        "/api/candidate",
        Access::role(RoleRule::Admin),
        handlers::candidates::delete_candidate,
    ),
    route(
        "PUT",
        "/api/candidate/disable",
        Access::role(RoleRule::Admin),
        handlers::candidates::disable_candidate,
    ),
    route(
        "PUT",
        "/api/candidate/enable",
        Access::role(RoleRule::Admin),
        handlers::candidates::enable_candidate,
    ),
    route(
        "GET",
        "/api/candidate/photo/upload-url",
        Access::role(RoleRule::Candidate),
        handlers::candidates::photo_upload_url,
    ),
    route(
        "GET",
        "/api/candidate/photo/download-url",
        Access::role(RoleRule::CandidateOrAdmin),
        handlers::candidates::photo_download_url,
    ),
    // Companies
    route(
        "PUT",
        "/api/company",
        Access::owned(RoleRule::Company, OwnershipRule::CompanyProfileBody),
        handlers::companies::put_company,
    ),
    route(
        "GET",
        "/api/company",
        Access::open(),
        handlers::companies::get_company,
    ),
    route(
        "GET",
        "/api/companylist",
        Access::role(RoleRule::Admin),
        handlers::companies::list_companies,
    ),
    route(
        "DELETE",
        "/api/company",
        Access::role(RoleRule::Admin),
        handlers::companies::delete_company,
    ),
    route(
        "PUT",
        "/api/company/disable",
        Access::role(RoleRule::Admin),
        handlers::companies::disable_company,
    ),
    route(
        "PUT",
        "/api/company/enable",
        Access::role(RoleRule::Admin),
        handlers::companies::enable_company,
    ),
    route(
        "GET",
        "/api/company/logo/upload-url",
        Access::role(RoleRule::Company),
        handlers::companies::logo_upload_url,
    ),
    route(
        "GET",
        "/api/company/logo/download-url",
        Access::role(RoleRule::Company),
        handlers::companies::logo_download_url,
    ),
    // Jobs
    route(
        "PUT",
        "/api/job",
        Access::owned(RoleRule::Company, OwnershipRule::JobBodyCompany),
        handlers::jobs::put_job,
    ),
    route("GET", "/api/job", Access::open(), handlers::jobs::get_job),
    route(
        "GET",
        "/api/joblist",
        Access::open(),
        handlers::jobs::list_jobs,
    ),
    route(
        "DELETE",
        "/api/job",
        Access::role(RoleRule::Admin),
        handlers::jobs::delete_job,
    ),
    // Applications
    route(
        "PUT",
        "/api/jobapplication",
        Access::owned(RoleRule::Candidate, OwnershipRule::ApplicationBodyCandidate),
        handlers::applications::apply,
    ),
    route(
        "GET",
        "/api/jobapplication",
        Access::open(),
        handlers::applications::get_application,
    ),
    route(
        "GET",
        "/api/jobapplicationlist",
        Access::open(),
        handlers::applications::list_applications,
    ),
    route(
        "PUT",
        "/api/jobapplication/status",
        Access::owned(RoleRule::Company, OwnershipRule::ApplicationStatusJobOwner),
        handlers::applications::update_status,
    ),
    route(
        "DELETE",
        "/api/jobapplication",
        Access::role(RoleRule::Admin),
        handlers::applications::delete_application,
    ),
];

/// Stateless router over [`ROUTES`].
pub struct Dispatcher {
    services: Services,
}

impl Dispatcher {
    pub fn new(services: Services) -> Self {
        Self { services }
    }

    pub fn services(&self) -> &Services {
        &self.services
    }

    /// Routes one event to completion. Never returns an error: every
    /// failure is translated into a response here and nowhere else.
    pub fn dispatch(&self, request: &ApiRequest) -> ApiResponse {
        let Some(route) = ROUTES.iter().find(|route| {
            route.method.eq_ignore_ascii_case(&request.method) && route.path == request.path
        }) else {
            return ApiResponse::not_found(format!(
                "Route not found: {} {}",
                request.method, request.path
            ));
        };

        let outcome = authz::authorize(&route.access, request, &self.services)
            .and_then(|()| (route.handler)(&self.services, request));
        match outcome {
            Ok(response) => response,
            Err(err) => ApiResponse::from_error(&err),
        }
    }
}
