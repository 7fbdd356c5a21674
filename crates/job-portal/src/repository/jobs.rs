use std::sync::Arc;

use chrono::Utc;
use rusqlite::{params, Connection, Row, ToSql};

use super::{decode, page_bounds};
use crate::domain::{Job, JobStatus, Page};
use crate::error::PortalError;
use crate::store::SqlStore;
use crate::validation::{blank_to_absent, validate_identifier};

const COLUMNS: &str = "id, company_id, company_name, title, job_description, \
     required_professional_experience, required_educational_experience, status, \
     applicant_count, is_deleted, deleted_at, created_at, updated_at";

pub struct JobRepository {
    store: Arc<SqlStore>,
}

impl JobRepository {
    pub fn new(store: Arc<SqlStore>) -> Self {
        Self { store }
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Job>, PortalError> {
        validate_identifier(id, "id")?;
        self.store.with_conn(|conn| find_by_id_in(conn, id))
    }

    /// Active listing with optional company and status filters.
    pub fn list(
        &self,
        page: u32,
        size: u32,
        company_id: Option<&str>,
        status: Option<JobStatus>,
    ) -> Result<Page<Job>, PortalError> {
        if let Some(company_id) = company_id {
            validate_identifier(company_id, "companyId")?;
        }

        let mut clauses = vec!["is_deleted = 0".to_string()];
        let mut args: Vec<Box<dyn ToSql>> = Vec::new();
        if let Some(company_id) = company_id {
            args.push(Box::new(company_id.to_string()));
            clauses.push(format!("company_id = ?{}", args.len()));
        }
        if let Some(status) = status {
            args.push(Box::new(status.as_str()));
            clauses.push(format!("status = ?{}", args.len()));
        }
        let where_sql = clauses.join(" AND ");

        self.store.with_conn(|conn| {
            let count_sql = format!("SELECT COUNT(*) FROM jobs WHERE {where_sql}");
            let total: u64 = conn.query_row(
                &count_sql,
                rusqlite::params_from_iter(args.iter().map(|a| a.as_ref())),
                |row| row.get(0),
            )?;

            let (limit, offset) = page_bounds(page, size);
            let sql = format!(
                "SELECT {COLUMNS} FROM jobs WHERE {where_sql} \
                 ORDER BY created_at DESC, id LIMIT ?{} OFFSET ?{}",
                args.len() + 1,
                args.len() + 2
            );
            let mut stmt = conn.prepare(&sql)?;
            let mut all_args: Vec<Box<dyn ToSql>> = args;
            all_args.push(Box::new(limit));
            all_args.push(Box::new(offset));
            let items = stmt
                .query_map(
                    rusqlite::params_from_iter(all_args.iter().map(|a| a.as_ref())),
                    row_to_job,
                )?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Page::of(items, page, size, total))
        })
    }

    pub fn list_all(&self, page: u32, size: u32) -> Result<Page<Job>, PortalError> {
        self.store.with_conn(|conn| {
            let total: u64 = conn.query_row("SELECT COUNT(*) FROM jobs", [], |row| row.get(0))?;
            let (limit, offset) = page_bounds(page, size);
            let sql = format!(
                "SELECT {COLUMNS} FROM jobs ORDER BY created_at DESC, id LIMIT ?1 OFFSET ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let items = stmt
                .query_map(params![limit, offset], row_to_job)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Page::of(items, page, size, total))
        })
    }

    pub fn soft_delete(&self, id: &str) -> Result<Option<Job>, PortalError> {
        validate_identifier(id, "id")?;
        self.store.with_conn(|conn| {
            let Some(existing) = find_by_id_in(conn, id)? else {
                return Ok(None);
            };
            conn.execute(
                "UPDATE jobs SET is_deleted = 1, deleted_at = ?2 WHERE id = ?1 AND is_deleted = 0",
                params![id, Utc::now()],
            )?;
            Ok(Some(existing))
        })
    }
}

/// Insert-or-update keyed by id, run by `JobService` after the company
/// checks. `company_name` is the snapshot chosen at creation; on conflict
/// the snapshot, the owning company, and the applicant counter are all
/// preserved.
pub(crate) fn upsert_in(conn: &Connection, job: &Job, company_name: &str) -> Result<(), PortalError> {
    let now = Utc::now();
    let created_at = job.created_at.unwrap_or(now);
    conn.execute(
        "INSERT INTO jobs (id, company_id, company_name, title, job_description, \
             required_professional_experience, required_educational_experience, \
             status, applicant_count, created_at, updated_at) \
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, 0, ?9, ?10) \
         ON CONFLICT (id) DO UPDATE SET \
             title = excluded.title, job_description = excluded.job_description, \
             required_professional_experience = excluded.required_professional_experience, \
             required_educational_experience = excluded.required_educational_experience, \
             status = excluded.status, updated_at = excluded.updated_at",
        params![
            job.id,
            job.company_id,
            company_name,
            job.title,
            blank_to_absent(job.job_description.clone()),
            blank_to_absent(job.required_professional_experience.clone()),
            blank_to_absent(job.required_educational_experience.clone()),
            job.status.as_str(),
            created_at,
            now,
        ],
    )?;
    Ok(())
}

pub(crate) fn find_by_id_in(conn: &Connection, id: &str) -> Result<Option<Job>, PortalError> {
    let sql = format!("SELECT {COLUMNS} FROM jobs WHERE id = ?1 AND is_deleted = 0");
    match conn.query_row(&sql, params![id], row_to_job) {
        Ok(job) => Ok(Some(job)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Bulk OPEN → CLOSED transition for a company's live jobs. Idempotent.
pub(crate) fn close_open_jobs_in(conn: &Connection, company_id: &str) -> Result<usize, PortalError> {
    let changed = conn.execute(
        "UPDATE jobs SET status = 'CLOSED', updated_at = ?2 \
         WHERE company_id = ?1 AND status = 'OPEN' AND is_deleted = 0",
        params![company_id, Utc::now()],
    )?;
    Ok(changed)
}

/// Single-statement counter bump, atomic under the store's isolation.
pub(crate) fn increment_applicant_count_in(
    conn: &Connection,
    job_id: &str,
) -> Result<(), PortalError> {
    conn.execute(
        "UPDATE jobs SET applicant_count = applicant_count + 1, updated_at = ?2 WHERE id = ?1",
        params![job_id, Utc::now()],
    )?;
    Ok(())
}

fn row_to_job(row: &Row<'_>) -> rusqlite::Result<Job> {
    Ok(Job {
        id: row.get(0)?,
        company_id: row.get(1)?,
        company_name: row.get(2)?,
        title: row.get(3)?,
        job_description: row.get(4)?,
        required_professional_experience: row.get(5)?,
        required_educational_experience: row.get(6)?,
        status: decode(JobStatus::parse, row.get(7)?, "job status")?,
        applicant_count: row.get(8)?,
        is_deleted: row.get(9)?,
        deleted_at: row.get(10)?,
        created_at: row.get(11)?,
        updated_at: row.get(12)?,
    })
}
