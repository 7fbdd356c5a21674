//! Cross-entity business rules composed on top of the repositories.
//!
//! Rules that span tables (the company-disable cascade, job referential
//! checks, the application workflow) run inside store transactions so no
//! partial state ever commits.

pub mod application;
pub mod company;
pub mod job;

use std::sync::Arc;

pub use application::ApplicationService;
pub use company::CompanyService;
pub use job::JobService;

use crate::media::MediaStore;
use crate::repository::{
    ApplicationRepository, CandidateRepository, CompanyRepository, JobRepository, UserRepository,
};
use crate::store::SqlStore;

/// Dependency bundle handed to the dispatcher: one repository per entity
/// plus the services owning the cross-entity rules, all sharing one store.
pub struct Services {
    pub users: UserRepository,
    pub candidates: CandidateRepository,
    pub companies: CompanyRepository,
    pub jobs: JobRepository,
    pub applications: ApplicationRepository,
    pub company_service: CompanyService,
    pub job_service: JobService,
    pub application_service: ApplicationService,
    pub media: Arc<dyn MediaStore>,
}

impl Services {
    pub fn new(store: Arc<SqlStore>, media: Arc<dyn MediaStore>) -> Self {
        Self {
            users: UserRepository::new(store.clone()),
            candidates: CandidateRepository::new(store.clone()),
            companies: CompanyRepository::new(store.clone()),
            jobs: JobRepository::new(store.clone()),
            applications: ApplicationRepository::new(store.clone()),
            company_service: CompanyService::new(store.clone()),
            job_service: JobService::new(store.clone()),
            application_service: ApplicationService::new(store),
            media,
        }
    }
}
