use std::sync::Arc;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};

use super::{decode, page_bounds};
use crate::domain::{ApplicationStatus, JobApplication, Page};
use crate::error::PortalError;
use crate::store::SqlStore;
use crate::validation::validate_identifier;

const COLUMNS: &str = "id, job_id, candidate_id, candidate_name, job_title, status, \
     applied_at, is_deleted, deleted_at";

pub struct ApplicationRepository {
    store: Arc<SqlStore>,
}

impl ApplicationRepository {
    pub fn new(store: Arc<SqlStore>) -> Self {
        Self { store }
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<JobApplication>, PortalError> {
        validate_identifier(id, "id")?;
        self.store.with_conn(|conn| find_by_id_in(conn, id))
    }

    pub fn list_by_job(
        &self,
        job_id: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<JobApplication>, PortalError> {
        validate_identifier(job_id, "jobId")?;
        self.store.with_conn(|conn| {
            let total: u64 = conn.query_row(
                "SELECT COUNT(*) FROM job_applications WHERE job_id = ?1 AND is_deleted = 0",
                params![job_id],
                |row| row.get(0),
            )?;
            let (limit, offset) = page_bounds(page, size);
            let sql = format!(
                "SELECT {COLUMNS} FROM job_applications \
                 WHERE job_id = ?1 AND is_deleted = 0 \
                 ORDER BY applied_at DESC, id LIMIT ?2 OFFSET ?3"
            );
            let mut stmt = conn.prepare(&sql)?;
            let items = stmt
                .query_map(params![job_id, limit, offset], row_to_application)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Page::of(items, page, size, total))
        })
    }

    pub fn list_by_candidate(
        &self,
        candidate_id: &str,
        page: u32,
        size: u32,
    ) -> Result<Page<JobApplication>, PortalError> {
        validate_identifier(candidate_id, "candidateId")?;
        self.store.with_conn(|conn| {
            let total: u64 = conn.query_row(
                "SELECT COUNT(*) FROM job_applications \
                 WHERE candidate_id = ?1 AND is_deleted = 0",
                params![candidate_id],
                |row| row.get(0),
            )?;
            let (limit, offset) = page_bounds(page, size);
            let sql = format!(
                "SELECT {COLUMNS} FROM job_applications \
                 WHERE candidate_id = ?1 AND is_deleted = 0 \
                 ORDER BY applied_at DESC, id LIMIT ?2 OFFSET ?3"
            );
            let mut stmt = conn.prepare(&sql)?;
            let items = stmt
                .query_map(params![candidate_id, limit, offset], row_to_application)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Page::of(items, page, size, total))
        })
    }

    /// Administrative listing including soft-deleted applications.
    pub fn list_all(&self, page: u32, size: u32) -> Result<Page<JobApplication>, PortalError> {
        self.store.with_conn(|conn| {
            let total: u64 =
                conn.query_row("SELECT COUNT(*) FROM job_applications", [], |row| row.get(0))?;
            let (limit, offset) = page_bounds(page, size);
            let sql = format!(
                "SELECT {COLUMNS} FROM job_applications ORDER BY applied_at DESC, id \
                 LIMIT ?1 OFFSET ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let items = stmt
                .query_map(params![limit, offset], row_to_application)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Page::of(items, page, size, total))
        })
    }

    /// Overwrites the workflow status of a live application and returns the
    /// updated row. Status values are validated by the service layer.
    pub fn update_status(
        &self,
        id: &str,
        status: ApplicationStatus,
    ) -> Result<Option<JobApplication>, PortalError> {
        validate_identifier(id, "id")?;
        self.store.with_conn(|conn| {
            if find_by_id_in(conn, id)?.is_none() {
                return Ok(None);
            }
            conn.execute(
                "UPDATE job_applications SET status = ?2 WHERE id = ?1 AND is_deleted = 0",
                params![id, status.as_str()],
            )?;
            find_by_id_in(conn, id)
        })
    }

    pub fn soft_delete(&self, id: &str) -> Result<Option<JobApplication>, PortalError> {
        validate_identifier(id, "id")?;
        self.store.with_conn(|conn| {
            let Some(existing) = find_by_id_in(conn, id)? else {
                return Ok(None);
            };
            conn.execute(
                "UPDATE job_applications SET is_deleted = 1, deleted_at = ?2 \
                 WHERE id = ?1 AND is_deleted = 0",
                params![id, Utc::now()],
            )?;
            Ok(Some(existing))
        })
    }
}

pub(crate) fn find_by_id_in(
    conn: &Connection,
    id: &str,
) -> Result<Option<JobApplication>, PortalError> {
    let sql = format!("SELECT {COLUMNS} FROM job_applications WHERE id = ?1 AND is_deleted = 0");
    match conn.query_row(&sql, params![id], row_to_application) {
        Ok(application) => Ok(Some(application)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Courtesy duplicate probe; the partial unique index remains the authority.
pub(crate) fn active_pair_exists_in(
    conn: &Connection,
    job_id: &str,
    candidate_id: &str,
) -> Result<bool, PortalError> {
    let count: u64 = conn.query_row(
        "SELECT COUNT(*) FROM job_applications \
         WHERE job_id = ?1 AND candidate_id = ?2 AND is_deleted = 0",
        params![job_id, candidate_id],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub(crate) fn insert_in(
    conn: &Connection,
    id: &str,
    job_id: &str,
    candidate_id: &str,
    candidate_name: &str,
    job_title: &str,
    applied_at: DateTime<Utc>,
) -> Result<(), PortalError> {
    conn.execute(
        "INSERT INTO job_applications \
             (id, job_id, candidate_id, candidate_name, job_title, status, applied_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, 'APPLIED', ?6)",
        params![id, job_id, candidate_id, candidate_name, job_title, applied_at],
    )?;
    Ok(())
}

fn row_to_application(row: &Row<'_>) -> rusqlite::Result<JobApplication> {
    Ok(JobApplication {
        id: row.get(0)?,
        job_id: row.get(1)?,
        candidate_id: row.get(2)?,
        candidate_name: row.get(3)?,
        job_title: row.get(4)?,
        status: decode(ApplicationStatus::parse, row.get(5)?, "application status")?,
        applied_at: row.get(6)?,
        is_deleted: row.get(7)?,
        deleted_at: row.get(8)?,
    })
}
