//! SQL-execution collaborator: a rusqlite connection behind a mutex plus
//! the portal schema.
//!
//! Repositories and services never open connections themselves; they borrow
//! one through [`SqlStore::with_conn`] or run multi-statement invariants
//! inside [`SqlStore::with_tx`]. Timestamps are always written from Rust so
//! rows round-trip through chrono without SQL-side formatting.

use std::path::Path;
use std::sync::Mutex;

use rusqlite::{Connection, Transaction};

use crate::error::PortalError;

pub struct SqlStore {
    conn: Mutex<Connection>,
}

impl SqlStore {
    /// Opens (creating if needed) the database file and installs the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, PortalError> {
        let conn = Connection::open(path)?;
        Self::from_connection(conn)
    }

    /// Private in-memory database, used by the test suites and local demos.
    pub fn open_in_memory() -> Result<Self, PortalError> {
        let conn = Connection::open_in_memory()?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, PortalError> {
        let store = Self {
            conn: Mutex::new(conn),
        };
        store.init_schema()?;
        Ok(store)
    }

    fn init_schema(&self) -> Result<(), PortalError> {
        self.with_conn(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
    }

    pub fn with_conn<T>(
        &self,
        f: impl FnOnce(&Connection) -> Result<T, PortalError>,
    ) -> Result<T, PortalError> {
        let guard = self.conn.lock().expect("store mutex poisoned");
        f(&guard)
    }

    /// Runs `f` inside a transaction; commits on `Ok`, rolls back on `Err`.
    pub fn with_tx<T>(
        &self,
        f: impl FnOnce(&Transaction<'_>) -> Result<T, PortalError>,
    ) -> Result<T, PortalError> {
        let mut guard = self.conn.lock().expect("store mutex poisoned");
        let tx = guard.transaction()?;
        let value = f(&tx)?;
        tx.commit()?;
        Ok(value)
    }
}

/// One table per entity; soft delete everywhere; partial unique indexes
/// back the invariants the services rely on (one live application per
/// (job, candidate) pair, one live profile per user).
const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id               TEXT PRIMARY KEY,
    username         TEXT NOT NULL,
    password_hash    TEXT,
    role             TEXT NOT NULL CHECK (role IN ('ADMIN', 'CANDIDATE', 'COMPANY')),
    linked_entity_id TEXT,
    status           TEXT NOT NULL DEFAULT 'ACTIVE' CHECK (status IN ('ACTIVE', 'DISABLED')),
    is_deleted       INTEGER NOT NULL DEFAULT 0,
    deleted_at       TEXT,
    created_at       TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_users_username
    ON users (username) WHERE is_deleted = 0;

CREATE TABLE IF NOT EXISTS candidates (
    id              TEXT PRIMARY KEY,
    user_id         TEXT,
    name            TEXT NOT NULL,
    email           TEXT NOT NULL,
    phone           TEXT,
    photo_url       TEXT,
    portfolio_url   TEXT,
    github_url      TEXT,
    linkedin_url    TEXT,
    current_company TEXT,
    current_title   TEXT,
    working_since   TEXT,
    license         TEXT,
    patents         TEXT,
    certifications  TEXT,
    status          TEXT NOT NULL DEFAULT 'ACTIVE' CHECK (status IN ('ACTIVE', 'DISABLED')),
    is_deleted      INTEGER NOT NULL DEFAULT 0,
    deleted_at      TEXT,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_candidates_user
    ON candidates (user_id) WHERE user_id IS NOT NULL AND is_deleted = 0;

CREATE TABLE IF NOT EXISTS companies (
    id                 TEXT PRIMARY KEY,
    user_id            TEXT,
    name               TEXT NOT NULL,
    logo_url           TEXT,
    details            TEXT,
    corporate_website  TEXT,
    hr_contact_name    TEXT,
    hr_contact_email   TEXT,
    legal_contact_name TEXT,
    legal_contact_email TEXT,
    status             TEXT NOT NULL DEFAULT 'ACTIVE' CHECK (status IN ('ACTIVE', 'DISABLED')),
    is_deleted         INTEGER NOT NULL DEFAULT 0,
    deleted_at         TEXT,
    created_at         TEXT NOT NULL,
    updated_at         TEXT NOT NULL
);

CREATE UNIQUE INDEX IF NOT EXISTS idx_companies_user
    ON companies (user_id) WHERE user_id IS NOT NULL AND is_deleted = 0;

CREATE TABLE IF NOT EXISTS jobs (
    id                                TEXT PRIMARY KEY,
    company_id                        TEXT NOT NULL,
    company_name                      TEXT,
    title                             TEXT NOT NULL,
    job_description                   TEXT,
    required_professional_experience  TEXT,
    required_educational_experience   TEXT,
    status          TEXT NOT NULL DEFAULT 'OPEN' CHECK (status IN ('OPEN', 'CLOSED')),
    applicant_count INTEGER NOT NULL DEFAULT 0,
    is_deleted      INTEGER NOT NULL DEFAULT 0,
    deleted_at      TEXT,
    created_at      TEXT NOT NULL,
    updated_at      TEXT NOT NULL
);

CREATE INDEX IF NOT EXISTS idx_jobs_company ON jobs (company_id);

CREATE TABLE IF NOT EXISTS job_applications (
    id             TEXT PRIMARY KEY,
    job_id         TEXT NOT NULL,
    candidate_id   TEXT NOT NULL,
    candidate_name TEXT,
    job_title      TEXT,
    status         TEXT NOT NULL DEFAULT 'APPLIED'
        CHECK (status IN ('APPLIED', 'SHORTLISTED', 'REJECTED', 'HIRED')),
    applied_at     TEXT NOT NULL,
    is_deleted     INTEGER NOT NULL DEFAULT 0,
    deleted_at     TEXT
);

CREATE INDEX IF NOT EXISTS idx_applications_job ON job_applications (job_id);
CREATE INDEX IF NOT EXISTS idx_applications_candidate ON job_applications (candidate_id);

-- The authority behind the duplicate-application rule: at most one live
-- application per (job, candidate) pair, deleted rows excluded.
CREATE UNIQUE INDEX IF NOT EXISTS idx_applications_active_pair
    ON job_applications (job_id, candidate_id) WHERE is_deleted = 0;
"#;
