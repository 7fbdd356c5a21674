use std::sync::Arc;

use crate::domain::{EntityStatus, Job};
use crate::error::PortalError;
use crate::repository::{companies, jobs};
use crate::store::SqlStore;
use crate::validation::{validate_identifier, validate_required};

/// Job creation and bulk transitions. Creation enforces application-layer
/// referential integrity against the owning company and captures the
/// company-name snapshot.
pub struct JobService {
    store: Arc<SqlStore>,
}

impl JobService {
    pub fn new(store: Arc<SqlStore>) -> Self {
        Self { store }
    }

    /// Upsert keyed by the supplied job id. The referenced company must be
    /// live and ACTIVE; its current name is snapshotted into the row on
    /// first insert and never refreshed. Updates preserve `applicantCount`
    /// and the owning company (reassignment is not a thing).
    pub fn create_job(&self, job: &Job) -> Result<Job, PortalError> {
        validate_identifier(&job.id, "id")?;
        validate_identifier(&job.company_id, "companyId")?;
        validate_required(&job.title, "title")?;

        self.store.with_tx(|tx| {
            let company = companies::find_by_id_in(tx, &job.company_id)?.ok_or_else(|| {
                PortalError::MissingReference("Company not found or has been deleted".to_string())
            })?;
            if company.status != EntityStatus::Active {
                return Err(PortalError::StateConflict(
                    "Company is not active. Cannot create job.".to_string(),
                ));
            }

            jobs::upsert_in(tx, job, &company.name)?;
            jobs::find_by_id_in(tx, &job.id)?.ok_or_else(|| {
                // The id belongs to a soft-deleted job; deleted ids are
                // never resurrected, so the write is invisible.
                PortalError::NotFound("Job not found".to_string())
            })
        })
    }

    /// Closes every OPEN, non-deleted job of the company. Idempotent; a
    /// fully-closed set is a no-op.
    pub fn close_jobs_by_company(&self, company_id: &str) -> Result<usize, PortalError> {
        validate_identifier(company_id, "companyId")?;
        self.store
            .with_conn(|conn| jobs::close_open_jobs_in(conn, company_id))
    }

    /// Single-statement counter bump; safe under concurrent applications
    /// for the same job.
    pub fn increment_applicant_count(&self, job_id: &str) -> Result<(), PortalError> {
        validate_identifier(job_id, "jobId")?;
        self.store
            .with_conn(|conn| jobs::increment_applicant_count_in(conn, job_id))
    }
}
