use std::sync::Arc;

use chrono::Utc;
use rusqlite::{params, Connection, Row};

use super::{decode, page_bounds};
use crate::domain::{Candidate, EntityStatus, Page};
use crate::error::PortalError;
use crate::store::SqlStore;
use crate::validation::{blank_to_absent, validate_email, validate_identifier, validate_required};

const COLUMNS: &str = "id, user_id, name, email, phone, photo_url, portfolio_url, github_url, \
     linkedin_url, current_company, current_title, working_since, license, patents, \
     certifications, status, is_deleted, deleted_at, created_at, updated_at";

pub struct CandidateRepository {
    store: Arc<SqlStore>,
}

impl CandidateRepository {
    pub fn new(store: Arc<SqlStore>) -> Self {
        Self { store }
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Candidate>, PortalError> {
        validate_identifier(id, "id")?;
        self.store.with_conn(|conn| find_by_id_in(conn, id))
    }

    pub fn find_by_user_id(&self, user_id: &str) -> Result<Option<Candidate>, PortalError> {
        validate_identifier(user_id, "userId")?;
        self.store.with_conn(|conn| find_by_user_id_in(conn, user_id))
    }

    pub fn list_active(&self, page: u32, size: u32) -> Result<Page<Candidate>, PortalError> {
        self.store.with_conn(|conn| {
            let total: u64 = conn.query_row(
                "SELECT COUNT(*) FROM candidates WHERE is_deleted = 0",
                [],
                |row| row.get(0),
            )?;
            let (limit, offset) = page_bounds(page, size);
            let sql = format!(
                "SELECT {COLUMNS} FROM candidates WHERE is_deleted = 0 \
                 ORDER BY created_at DESC, id LIMIT ?1 OFFSET ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let items = stmt
                .query_map(params![limit, offset], row_to_candidate)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Page::of(items, page, size, total))
        })
    }

    /// Administrative listing that also surfaces soft-deleted rows.
    pub fn list_all(&self, page: u32, size: u32) -> Result<Page<Candidate>, PortalError> {
        self.store.with_conn(|conn| {
            let total: u64 =
                conn.query_row("SELECT COUNT(*) FROM candidates", [], |row| row.get(0))?;
            let (limit, offset) = page_bounds(page, size);
            let sql = format!(
                "SELECT {COLUMNS} FROM candidates ORDER BY created_at DESC, id \
                 LIMIT ?1 OFFSET ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let items = stmt
                .query_map(params![limit, offset], row_to_candidate)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Page::of(items, page, size, total))
        })
    }

    /// Insert-or-update keyed by id. Updates are full replaces of the
    /// mutable fields; `userId` and `createdAt` stick with the first insert.
    pub fn upsert(&self, candidate: &Candidate) -> Result<(), PortalError> {
        validate_identifier(&candidate.id, "id")?;
        let user_id = blank_to_absent(candidate.user_id.clone());
        if let Some(user_id) = &user_id {
            validate_identifier(user_id, "userId")?;
        }
        validate_required(&candidate.name, "name")?;
        validate_email(&candidate.email)?;

        let now = Utc::now();
        let created_at = candidate.created_at.unwrap_or(now);
        self.store.with_conn(|conn| {
            conn.execute(
                "INSERT INTO candidates (id, user_id, name, email, phone, photo_url, \
                     portfolio_url, github_url, linkedin_url, current_company, current_title, \
                     working_since, license, patents, certifications, status, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16, ?17, ?18) \
                 ON CONFLICT (id) DO UPDATE SET \
                     name = excluded.name, email = excluded.email, phone = excluded.phone, \
                     photo_url = excluded.photo_url, portfolio_url = excluded.portfolio_url, \
                     github_url = excluded.github_url, linkedin_url = excluded.linkedin_url, \
                     current_company = excluded.current_company, \
                     current_title = excluded.current_title, \
                     working_since = excluded.working_since, license = excluded.license, \
                     patents = excluded.patents, certifications = excluded.certifications, \
                     status = excluded.status, updated_at = excluded.updated_at",
                params![
                    candidate.id,
                    user_id,
                    candidate.name,
                    candidate.email,
                    blank_to_absent(candidate.phone.clone()),
                    blank_to_absent(candidate.photo_url.clone()),
                    blank_to_absent(candidate.portfolio_url.clone()),
                    blank_to_absent(candidate.github_url.clone()),
                    blank_to_absent(candidate.linkedin_url.clone()),
                    blank_to_absent(candidate.current_company.clone()),
                    blank_to_absent(candidate.current_title.clone()),
                    candidate.working_since,
                    blank_to_absent(candidate.license.clone()),
                    blank_to_absent(candidate.patents.clone()),
                    blank_to_absent(candidate.certifications.clone()),
                    candidate.status.as_str(),
                    created_at,
                    now,
                ],
            )?;
            Ok(())
        })
    }

    /// Flags a live row as deleted and returns the pre-deletion snapshot.
    /// Missing or already-deleted rows are an absent no-op.
    pub fn soft_delete(&self, id: &str) -> Result<Option<Candidate>, PortalError> {
        validate_identifier(id, "id")?;
        self.store.with_conn(|conn| {
            let Some(existing) = find_by_id_in(conn, id)? else {
                return Ok(None);
            };
            conn.execute(
                "UPDATE candidates SET is_deleted = 1, deleted_at = ?2 \
                 WHERE id = ?1 AND is_deleted = 0",
                params![id, Utc::now()],
            )?;
            Ok(Some(existing))
        })
    }

    /// Enable/disable transition; returns the pre-transition snapshot.
    pub fn set_status(
        &self,
        id: &str,
        status: EntityStatus,
    ) -> Result<Option<Candidate>, PortalError> {
        validate_identifier(id, "id")?;
        self.store.with_conn(|conn| {
            let Some(existing) = find_by_id_in(conn, id)? else {
                return Ok(None);
            };
            conn.execute(
                "UPDATE candidates SET status = ?2, updated_at = ?3 \
                 WHERE id = ?1 AND is_deleted = 0",
                params![id, status.as_str(), Utc::now()],
            )?;
            Ok(Some(existing))
        })
    }
}

pub(crate) fn find_by_id_in(conn: &Connection, id: &str) -> Result<Option<Candidate>, PortalError> {
    let sql = format!("SELECT {COLUMNS} FROM candidates WHERE id = ?1 AND is_deleted = 0");
    match conn.query_row(&sql, params![id], row_to_candidate) {
        Ok(candidate) => Ok(Some(candidate)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn find_by_user_id_in(
    conn: &Connection,
    user_id: &str,
) -> Result<Option<Candidate>, PortalError> {
    let sql = format!("SELECT {COLUMNS} FROM candidates WHERE user_id = ?1 AND is_deleted = 0");
    match conn.query_row(&sql, params![user_id], row_to_candidate) {
        Ok(candidate) => Ok(Some(candidate)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn row_to_candidate(row: &Row<'_>) -> rusqlite::Result<Candidate> {
    Ok(Candidate {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        email: row.get(3)?,
        phone: row.get(4)?,
        photo_url: row.get(5)?,
        portfolio_url: row.get(6)?,
        github_url: row.get(7)?,
        linkedin_url: row.get(8)?,
        current_company: row.get(9)?,
        current_title: row.get(10)?,
        working_since: row.get(11)?,
        license: row.get(12)?,
        patents: row.get(13)?,
        certifications: row.get(14)?,
        status: decode(EntityStatus::parse, row.get(15)?, "candidate status")?,
        is_deleted: row.get(16)?,
        deleted_at: row.get(17)?,
        created_at: row.get(18)?,
        updated_at: row.get(19)?,
    })
}
