use std::sync::Arc;

use tracing::info;

use crate::domain::{Company, EntityStatus};
use crate::error::PortalError;
use crate::repository::{companies, jobs, CompanyRepository};
use crate::store::SqlStore;
use crate::validation::validate_identifier;

/// Company lifecycle beyond plain CRUD: disabling a company also closes its
/// open jobs, and the two transitions commit or fail together.
pub struct CompanyService {
    store: Arc<SqlStore>,
    repository: CompanyRepository,
}

impl CompanyService {
    pub fn new(store: Arc<SqlStore>) -> Self {
        let repository = CompanyRepository::new(store.clone());
        Self { store, repository }
    }

    /// Sets the company DISABLED and closes every OPEN, non-deleted job it
    /// owns, in one transaction. Returns the pre-transition snapshot, or
    /// `None` for a missing/deleted company.
    pub fn disable(&self, id: &str) -> Result<Option<Company>, PortalError> {
        validate_identifier(id, "id")?;
        self.store.with_tx(|tx| {
            let Some(existing) = companies::set_status_in(tx, id, EntityStatus::Disabled)? else {
                return Ok(None);
            };
            let closed = jobs::close_open_jobs_in(tx, id)?;
            info!(company_id = %id, closed_jobs = closed, "company disabled");
            Ok(Some(existing))
        })
    }

    /// Re-enables the company only. Jobs closed by a previous disable stay
    /// closed; reopening is a per-job decision.
    pub fn enable(&self, id: &str) -> Result<Option<Company>, PortalError> {
        self.repository.set_status(id, EntityStatus::Active)
    }
}
