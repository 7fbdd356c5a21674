use std::sync::Arc;

use chrono::Utc;
use rusqlite::{params, Connection, Row};

use super::{decode, page_bounds};
use crate::domain::{Company, EntityStatus, Page};
use crate::error::PortalError;
use crate::store::SqlStore;
use crate::validation::{blank_to_absent, validate_identifier, validate_required};

const COLUMNS: &str = "id, user_id, name, logo_url, details, corporate_website, \
     hr_contact_name, hr_contact_email, legal_contact_name, legal_contact_email, \
     status, is_deleted, deleted_at, created_at, updated_at";

pub struct CompanyRepository {
    store: Arc<SqlStore>,
}

impl CompanyRepository {
    pub fn new(store: Arc<SqlStore>) -> Self {
        Self { store }
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<Company>, PortalError> {
        validate_identifier(id, "id")?;
        self.store.with_conn(|conn| find_by_id_in(conn, id))
    }

    pub fn find_by_user_id(&self, user_id: &str) -> Result<Option<Company>, PortalError> {
        validate_identifier(user_id, "userId")?;
        self.store.with_conn(|conn| find_by_user_id_in(conn, user_id))
    }

    pub fn list_active(&self, page: u32, size: u32) -> Result<Page<Company>, PortalError> {
        self.store.with_conn(|conn| {
            let total: u64 = conn.query_row(
                "SELECT COUNT(*) FROM companies WHERE is_deleted = 0",
                [],
                |row| row.get(0),
            )?;
            let (limit, offset) = page_bounds(page, size);
            let sql = format!(
                "SELECT {COLUMNS} FROM companies WHERE is_deleted = 0 \
                 ORDER BY created_at DESC, id LIMIT ?1 OFFSET ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let items = stmt
                .query_map(params![limit, offset], row_to_company)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Page::of(items, page, size, total))
        })
    }

    pub fn list_all(&self, page: u32, size: u32) -> Result<Page<Company>, PortalError> {
        self.store.with_conn(|conn| {
            let total: u64 =
                conn.query_row("SELECT COUNT(*) FROM companies", [], |row| row.get(0))?;
            let (limit, offset) = page_bounds(page, size);
            let sql = format!(
                "SELECT {COLUMNS} FROM companies ORDER BY created_at DESC, id \
                 LIMIT ?1 OFFSET ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let items = stmt
                .query_map(params![limit, offset], row_to_company)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Page::of(items, page, size, total))
        })
    }

    pub fn upsert(&self, company: &Company) -> Result<(), PortalError> {
        validate_identifier(&company.id, "id")?;
        let user_id = blank_to_absent(company.user_id.clone());
        if let Some(user_id) = &user_id {
            validate_identifier(user_id, "userId")?;
        }
        validate_required(&company.name, "name")?;

        let now = Utc::now();
        let created_at = company.created_at.unwrap_or(now);
        self.store.with_conn(|conn| {
            conn.execute(
                "INSERT INTO companies (id, user_id, name, logo_url, details, \
                     corporate_website, hr_contact_name, hr_contact_email, legal_contact_name, \
                     legal_contact_email, status, created_at, updated_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13) \
                 ON CONFLICT (id) DO UPDATE SET \
                     name = excluded.name, logo_url = excluded.logo_url, \
                     details = excluded.details, \
                     corporate_website = excluded.corporate_website, \
                     hr_contact_name = excluded.hr_contact_name, \
                     hr_contact_email = excluded.hr_contact_email, \
                     legal_contact_name = excluded.legal_contact_name, \
                     legal_contact_email = excluded.legal_contact_email, \
                     status = excluded.status, updated_at = excluded.updated_at",
                params![
                    company.id,
                    user_id,
                    company.name,
                    blank_to_absent(company.logo_url.clone()),
                    blank_to_absent(company.details.clone()),
                    blank_to_absent(company.corporate_website.clone()),
                    blank_to_absent(company.hr_contact_name.clone()),
                    blank_to_absent(company.hr_contact_email.clone()),
                    blank_to_absent(company.legal_contact_name.clone()),
                    blank_to_absent(company.legal_contact_email.clone()),
                    company.status.as_str(),
                    created_at,
                    now,
                ],
            )?;
            Ok(())
        })
    }

    /// Enable/disable transition; returns the pre-transition snapshot.
    pub fn set_status(
        &self,
        id: &str,
        status: EntityStatus,
    ) -> Result<Option<Company>, PortalError> {
        validate_identifier(id, "id")?;
        self.store.with_conn(|conn| set_status_in(conn, id, status))
    }

    pub fn soft_delete(&self, id: &str) -> Result<Option<Company>, PortalError> {
        validate_identifier(id, "id")?;
        self.store.with_conn(|conn| {
            let Some(existing) = find_by_id_in(conn, id)? else {
                return Ok(None);
            };
            conn.execute(
                "UPDATE companies SET is_deleted = 1, deleted_at = ?2 \
                 WHERE id = ?1 AND is_deleted = 0",
                params![id, Utc::now()],
            )?;
            Ok(Some(existing))
        })
    }
}

pub(crate) fn find_by_id_in(conn: &Connection, id: &str) -> Result<Option<Company>, PortalError> {
    let sql = format!("SELECT {COLUMNS} FROM companies WHERE id = ?1 AND is_deleted = 0");
    match conn.query_row(&sql, params![id], row_to_company) {
        Ok(company) => Ok(Some(company)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

pub(crate) fn find_by_user_id_in(
    conn: &Connection,
    user_id: &str,
) -> Result<Option<Company>, PortalError> {
    let sql = format!("SELECT {COLUMNS} FROM companies WHERE user_id = ?1 AND is_deleted = 0");
    match conn.query_row(&sql, params![user_id], row_to_company) {
        Ok(company) => Ok(Some(company)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

/// Status transition without a fresh read, for use inside the disable
/// cascade transaction. Returns the pre-transition snapshot.
pub(crate) fn set_status_in(
    conn: &Connection,
    id: &str,
    status: EntityStatus,
) -> Result<Option<Company>, PortalError> {
    let Some(existing) = find_by_id_in(conn, id)? else {
        return Ok(None);
    };
    conn.execute(
        "UPDATE companies SET status = ?2, updated_at = ?3 WHERE id = ?1 AND is_deleted = 0",
        params![id, status.as_str(), Utc::now()],
    )?;
    Ok(Some(existing))
}

fn row_to_company(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: row.get(0)?,
        user_id: row.get(1)?,
        name: row.get(2)?,
        logo_url: row.get(3)?,
        details: row.get(4)?,
        corporate_website: row.get(5)?,
        hr_contact_name: row.get(6)?,
        hr_contact_email: row.get(7)?,
        legal_contact_name: row.get(8)?,
        legal_contact_email: row.get(9)?,
        status: decode(EntityStatus::parse, row.get(10)?, "company status")?,
        is_deleted: row.get(11)?,
        deleted_at: row.get(12)?,
        created_at: row.get(13)?,
        updated_at: row.get(14)?,
    })
}
