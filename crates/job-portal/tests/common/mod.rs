//! Shared fixtures: an in-memory store wired into the full service bundle,
//! a stub media store, and entity builders with sensible defaults.
//!
//! Not every suite touches every fixture.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Duration, TimeZone, Utc};
use uuid::Uuid;

use job_portal::dispatch::Dispatcher;
use job_portal::domain::{
    ApplicationStatus, Candidate, Company, EntityStatus, Job, JobApplication, JobStatus, Role,
    User,
};
use job_portal::error::PortalError;
use job_portal::media::MediaStore;
use job_portal::service::Services;
use job_portal::store::SqlStore;

#[derive(Default)]
pub struct StubMediaStore {
    objects: Mutex<HashSet<String>>,
}

impl StubMediaStore {
    pub fn put_object(&self, key: &str) {
        self.objects
            .lock()
            .expect("media mutex poisoned")
            .insert(key.to_string());
    }
}

impl MediaStore for StubMediaStore {
    fn exists(&self, key: &str) -> Result<bool, PortalError> {
        Ok(self
            .objects
            .lock()
            .expect("media mutex poisoned")
            .contains(key))
    }

    fn upload_url(&self, key: &str, content_type: &str) -> Result<String, PortalError> {
        Ok(format!(
            "https://media.test/upload/{key}?contentType={content_type}"
        ))
    }

    fn download_url(&self, key: &str) -> Result<String, PortalError> {
        Ok(format!("https://media.test/download/{key}"))
    }
}

pub fn services() -> Services {
    services_with_media().0
}

pub fn services_with_media() -> (Services, Arc<StubMediaStore>) {
    let store = Arc::new(SqlStore::open_in_memory().expect("in-memory store opens"));
    let media = Arc::new(StubMediaStore::default());
    (Services::new(store, media.clone()), media)
}

pub fn dispatcher() -> Dispatcher {
    Dispatcher::new(services())
}

pub fn dispatcher_with_media() -> (Dispatcher, Arc<StubMediaStore>) {
    let (services, media) = services_with_media();
    (Dispatcher::new(services), media)
}

pub fn uid() -> String {
    Uuid::new_v4().to_string()
}

/// A stable base instant so listings ordered by creation time are
/// deterministic in tests.
pub fn base_instant() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 6, 1, 9, 0, 0).single().expect("valid instant")
}

pub fn instant_plus(seconds: i64) -> DateTime<Utc> {
    base_instant() + Duration::seconds(seconds)
}

pub fn user(id: &str, username: &str, role: Role) -> User {
    User {
        id: id.to_string(),
        username: username.to_string(),
        password_hash: Some("$argon2id$stub".to_string()),
        role,
        linked_entity_id: None,
        status: EntityStatus::Active,
        is_deleted: false,
        deleted_at: None,
        created_at: None,
    }
}

pub fn candidate(id: &str, user_id: &str) -> Candidate {
    Candidate {
        id: id.to_string(),
        user_id: Some(user_id.to_string()),
        name: "Dana Field".to_string(),
        email: "dana@example.com".to_string(),
        phone: None,
        photo_url: None,
        portfolio_url: None,
        github_url: None,
        linkedin_url: None,
        current_company: None,
        current_title: None,
        working_since: None,
        license: None,
        patents: None,
        certifications: None,
        status: EntityStatus::Active,
        is_deleted: false,
        deleted_at: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn company(id: &str, user_id: &str) -> Company {
    Company {
        id: id.to_string(),
        user_id: Some(user_id.to_string()),
        name: "Initech".to_string(),
        logo_url: None,
        details: None,
        corporate_website: None,
        hr_contact_name: None,
        hr_contact_email: None,
        legal_contact_name: None,
        legal_contact_email: None,
        status: EntityStatus::Active,
        is_deleted: false,
        deleted_at: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn job(id: &str, company_id: &str) -> Job {
    Job {
        id: id.to_string(),
        company_id: company_id.to_string(),
        company_name: None,
        title: "Staff Engineer".to_string(),
        job_description: Some("Build the portal".to_string()),
        required_professional_experience: None,
        required_educational_experience: None,
        status: JobStatus::Open,
        applicant_count: 0,
        is_deleted: false,
        deleted_at: None,
        created_at: None,
        updated_at: None,
    }
}

pub fn application(id: &str, job_id: &str, candidate_id: &str) -> JobApplication {
    JobApplication {
        id: id.to_string(),
        job_id: job_id.to_string(),
        candidate_id: candidate_id.to_string(),
        candidate_name: None,
        job_title: None,
        status: ApplicationStatus::Applied,
        applied_at: None,
        is_deleted: false,
        deleted_at: None,
    }
}
