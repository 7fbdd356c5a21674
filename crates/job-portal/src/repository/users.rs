use std::sync::Arc;

use chrono::Utc;
use rusqlite::{params, Row};

use super::{decode, page_bounds};
use crate::domain::{EntityStatus, Page, Role, User};
use crate::error::PortalError;
use crate::store::SqlStore;
use crate::validation::{blank_to_absent, validate_identifier, validate_required};

const COLUMNS: &str =
    "id, username, password_hash, role, linked_entity_id, status, is_deleted, deleted_at, \
     created_at";

pub struct UserRepository {
    store: Arc<SqlStore>,
}

impl UserRepository {
    pub fn new(store: Arc<SqlStore>) -> Self {
        Self { store }
    }

    pub fn find_by_id(&self, id: &str) -> Result<Option<User>, PortalError> {
        validate_identifier(id, "id")?;
        self.store.with_conn(|conn| {
            let sql = format!("SELECT {COLUMNS} FROM users WHERE id = ?1 AND is_deleted = 0");
            match conn.query_row(&sql, params![id], row_to_user) {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(err.into()),
            }
        })
    }

    pub fn find_by_username(&self, username: &str) -> Result<Option<User>, PortalError> {
        validate_required(username, "username")?;
        self.store.with_conn(|conn| {
            let sql = format!("SELECT {COLUMNS} FROM users WHERE username = ?1 AND is_deleted = 0");
            match conn.query_row(&sql, params![username], row_to_user) {
                Ok(user) => Ok(Some(user)),
                Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
                Err(err) => Err(err.into()),
            }
        })
    }

    pub fn list_active(&self, page: u32, size: u32) -> Result<Page<User>, PortalError> {
        self.store.with_conn(|conn| {
            let total: u64 = conn.query_row(
                "SELECT COUNT(*) FROM users WHERE is_deleted = 0",
                [],
                |row| row.get(0),
            )?;
            let (limit, offset) = page_bounds(page, size);
            let sql = format!(
                "SELECT {COLUMNS} FROM users WHERE is_deleted = 0 \
                 ORDER BY created_at DESC, id LIMIT ?1 OFFSET ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let items = stmt
                .query_map(params![limit, offset], row_to_user)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Page::of(items, page, size, total))
        })
    }

    pub fn list_all(&self, page: u32, size: u32) -> Result<Page<User>, PortalError> {
        self.store.with_conn(|conn| {
            let total: u64 = conn.query_row("SELECT COUNT(*) FROM users", [], |row| row.get(0))?;
            let (limit, offset) = page_bounds(page, size);
            let sql = format!(
                "SELECT {COLUMNS} FROM users ORDER BY created_at DESC, id LIMIT ?1 OFFSET ?2"
            );
            let mut stmt = conn.prepare(&sql)?;
            let items = stmt
                .query_map(params![limit, offset], row_to_user)?
                .collect::<Result<Vec<_>, _>>()?;
            Ok(Page::of(items, page, size, total))
        })
    }

    /// Insert-or-update keyed by id; `createdAt` sticks with the first
    /// insert. A username collision with another live user surfaces as
    /// `Duplicate`.
    pub fn upsert(&self, user: &User) -> Result<(), PortalError> {
        validate_identifier(&user.id, "id")?;
        validate_required(&user.username, "username")?;
        let linked_entity_id = blank_to_absent(user.linked_entity_id.clone());
        if let Some(linked) = &linked_entity_id {
            validate_identifier(linked, "linkedEntityId")?;
        }

        let created_at = user.created_at.unwrap_or_else(Utc::now);
        self.store.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users \
                     (id, username, password_hash, role, linked_entity_id, status, created_at) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7) \
                 ON CONFLICT (id) DO UPDATE SET \
                     username = excluded.username, \
                     password_hash = excluded.password_hash, \
                     role = excluded.role, \
                     linked_entity_id = excluded.linked_entity_id, \
                     status = excluded.status",
                params![
                    user.id,
                    user.username,
                    blank_to_absent(user.password_hash.clone()),
                    user.role.as_str(),
                    linked_entity_id,
                    user.status.as_str(),
                    created_at,
                ],
            )?;
            Ok(())
        })
    }

    pub fn soft_delete(&self, id: &str) -> Result<Option<User>, PortalError> {
        validate_identifier(id, "id")?;
        self.store.with_conn(|conn| {
            let sql = format!("SELECT {COLUMNS} FROM users WHERE id = ?1 AND is_deleted = 0");
            let existing = match conn.query_row(&sql, params![id], row_to_user) {
                Ok(user) => user,
                Err(rusqlite::Error::QueryReturnedNoRows) => return Ok(None),
                Err(err) => return Err(err.into()),
            };
            conn.execute(
                "UPDATE users SET is_deleted = 1, deleted_at = ?2 WHERE id = ?1 AND is_deleted = 0",
                params![id, Utc::now()],
            )?;
            Ok(Some(existing))
        })
    }
}

fn row_to_user(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get(0)?,
        username: row.get(1)?,
        password_hash: row.get(2)?,
        role: decode(Role::parse, row.get(3)?, "user role")?,
        linked_entity_id: row.get(4)?,
        status: decode(EntityStatus::parse, row.get(5)?, "user status")?,
        is_deleted: row.get(6)?,
        deleted_at: row.get(7)?,
        created_at: row.get(8)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repository() -> UserRepository {
        UserRepository::new(Arc::new(SqlStore::open_in_memory().expect("store opens")))
    }

    fn user(id: &str, username: &str) -> User {
        User {
            id: id.to_string(),
            username: username.to_string(),
            password_hash: Some("$argon2id$stub".to_string()),
            role: Role::Candidate,
            linked_entity_id: None,
            status: EntityStatus::Active,
            is_deleted: false,
            deleted_at: None,
            created_at: None,
        }
    }

    #[test]
    fn upsert_then_find_round_trips() {
        let repo = repository();
        let id = uuid::Uuid::new_v4().to_string();
        repo.upsert(&user(&id, "dana")).expect("upsert succeeds");

        let stored = repo.find_by_id(&id).expect("find succeeds").expect("present");
        assert_eq!(stored.username, "dana");
        assert_eq!(stored.status, EntityStatus::Active);
        assert!(stored.created_at.is_some());
    }

    #[test]
    fn duplicate_username_is_reported_as_duplicate() {
        let repo = repository();
        repo.upsert(&user(&uuid::Uuid::new_v4().to_string(), "taken"))
            .expect("first upsert succeeds");
        match repo.upsert(&user(&uuid::Uuid::new_v4().to_string(), "taken")) {
            Err(PortalError::Duplicate(_)) => {}
            other => panic!("expected duplicate error, got {other:?}"),
        }
    }

    #[test]
    fn find_by_username_skips_deleted_users() {
        let repo = repository();
        let id = uuid::Uuid::new_v4().to_string();
        repo.upsert(&user(&id, "ghost")).expect("upsert succeeds");
        repo.soft_delete(&id).expect("delete succeeds");
        assert!(repo
            .find_by_username("ghost")
            .expect("lookup succeeds")
            .is_none());
    }
}
