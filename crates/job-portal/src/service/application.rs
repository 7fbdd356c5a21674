use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use crate::domain::{ApplicationStatus, EntityStatus, JobApplication, JobStatus};
use crate::error::PortalError;
use crate::repository::{applications, candidates, jobs, ApplicationRepository};
use crate::store::SqlStore;
use crate::validation::{validate_identifier, validate_required};

/// The application workflow: intake with referential checks and duplicate
/// protection, status transitions, and soft deletion.
pub struct ApplicationService {
    store: Arc<SqlStore>,
    repository: ApplicationRepository,
}

impl ApplicationService {
    pub fn new(store: Arc<SqlStore>) -> Self {
        let repository = ApplicationRepository::new(store.clone());
        Self { store, repository }
    }

    /// Submits an application. The candidate must be live and ACTIVE, the
    /// job live and OPEN, and no live application may exist for the same
    /// (job, candidate) pair. The insert, the snapshot capture, and the
    /// applicant-count bump commit in one transaction; the partial unique
    /// index turns any duplicate race into `Duplicate` rather than a
    /// second row.
    pub fn apply(&self, application: &JobApplication) -> Result<JobApplication, PortalError> {
        validate_identifier(&application.id, "id")?;
        validate_identifier(&application.job_id, "jobId")?;
        validate_identifier(&application.candidate_id, "candidateId")?;

        self.store.with_tx(|tx| {
            let candidate =
                candidates::find_by_id_in(tx, &application.candidate_id)?.ok_or_else(|| {
                    PortalError::MissingReference(
                        "Candidate not found or has been deleted".to_string(),
                    )
                })?;
            if candidate.status != EntityStatus::Active {
                return Err(PortalError::StateConflict(
                    "Candidate is disabled. Cannot apply.".to_string(),
                ));
            }

            let job = jobs::find_by_id_in(tx, &application.job_id)?.ok_or_else(|| {
                PortalError::MissingReference("Job not found or has been deleted".to_string())
            })?;
            if job.status != JobStatus::Open {
                return Err(PortalError::StateConflict(
                    "Job is not open for applications".to_string(),
                ));
            }

            if applications::active_pair_exists_in(tx, &application.job_id, &application.candidate_id)?
            {
                return Err(PortalError::Duplicate(
                    "Candidate has already applied for this job".to_string(),
                ));
            }

            applications::insert_in(
                tx,
                &application.id,
                &application.job_id,
                &application.candidate_id,
                &candidate.name,
                &job.title,
                Utc::now(),
            )
            .map_err(|err| match err {
                PortalError::Duplicate(_) => PortalError::Duplicate(
                    "Candidate has already applied for this job".to_string(),
                ),
                other => other,
            })?;
            jobs::increment_applicant_count_in(tx, &application.job_id)?;

            info!(
                application_id = %application.id,
                job_id = %application.job_id,
                "application submitted"
            );
            applications::find_by_id_in(tx, &application.id)?.ok_or_else(|| {
                PortalError::Internal("application row missing after insert".to_string())
            })
        })
    }

    /// Overwrites the workflow status. Any of the four enumerated states
    /// may be set from any other; unlisted values are rejected before any
    /// read. Absent or deleted applications come back as `None`.
    pub fn update_status(
        &self,
        id: &str,
        new_status: &str,
    ) -> Result<Option<JobApplication>, PortalError> {
        validate_identifier(id, "id")?;
        validate_required(new_status, "status")?;
        let status = ApplicationStatus::parse(new_status).ok_or_else(|| {
            PortalError::validation(
                "Invalid status. Must be one of: APPLIED, SHORTLISTED, REJECTED, HIRED",
            )
        })?;
        self.repository.update_status(id, status)
    }

    /// Standard soft delete. The owning job's applicant count is left
    /// alone: the counter reads as "applications ever submitted", and the
    /// duplicate check ignores deleted rows, so the same candidate may
    /// apply again afterwards.
    pub fn soft_delete(&self, id: &str) -> Result<Option<JobApplication>, PortalError> {
        self.repository.soft_delete(id)
    }
}
