//! The company disable cascade and the referential rules around job
//! creation.

mod common;

use common::*;
use job_portal::domain::{EntityStatus, JobStatus};
use job_portal::error::PortalError;

#[test]
fn disabling_a_company_closes_exactly_its_open_jobs() {
    let services = services();
    let company_id = uid();
    services
        .companies
        .upsert(&company(&company_id, &uid()))
        .expect("company upsert succeeds");

    let mut open_ids = Vec::new();
    for _ in 0..3 {
        let id = uid();
        services
            .job_service
            .create_job(&job(&id, &company_id))
            .expect("job creation succeeds");
        open_ids.push(id);
    }
    let closed_id = uid();
    let mut closed_job = job(&closed_id, &company_id);
    closed_job.status = JobStatus::Closed;
    services
        .job_service
        .create_job(&closed_job)
        .expect("closed job creation succeeds");

    let snapshot = services
        .company_service
        .disable(&company_id)
        .expect("disable succeeds")
        .expect("company existed");
    assert_eq!(snapshot.status, EntityStatus::Active, "snapshot predates the transition");

    let stored = services
        .companies
        .find_by_id(&company_id)
        .expect("find succeeds")
        .expect("company present");
    assert_eq!(stored.status, EntityStatus::Disabled);

    for id in &open_ids {
        let job = services
            .jobs
            .find_by_id(id)
            .expect("find succeeds")
            .expect("job present");
        assert_eq!(job.status, JobStatus::Closed, "open job {id} was closed");
    }
    let untouched = services
        .jobs
        .find_by_id(&closed_id)
        .expect("find succeeds")
        .expect("job present");
    assert_eq!(untouched.status, JobStatus::Closed);
}

#[test]
fn enabling_a_company_does_not_reopen_its_jobs() {
    let services = services();
    let company_id = uid();
    services
        .companies
        .upsert(&company(&company_id, &uid()))
        .expect("company upsert succeeds");
    let job_id = uid();
    services
        .job_service
        .create_job(&job(&job_id, &company_id))
        .expect("job creation succeeds");

    services
        .company_service
        .disable(&company_id)
        .expect("disable succeeds");
    services
        .company_service
        .enable(&company_id)
        .expect("enable succeeds");

    let stored_company = services
        .companies
        .find_by_id(&company_id)
        .expect("find succeeds")
        .expect("company present");
    assert_eq!(stored_company.status, EntityStatus::Active);

    let stored_job = services
        .jobs
        .find_by_id(&job_id)
        .expect("find succeeds")
        .expect("job present");
    assert_eq!(
        stored_job.status,
        JobStatus::Closed,
        "re-enable is deliberately asymmetric"
    );
}

#[test]
fn disable_of_a_missing_company_is_absent() {
    let services = services();
    assert!(services
        .company_service
        .disable(&uid())
        .expect("call succeeds")
        .is_none());
}

#[test]
fn closing_jobs_is_idempotent() {
    let services = services();
    let company_id = uid();
    services
        .companies
        .upsert(&company(&company_id, &uid()))
        .expect("company upsert succeeds");
    services
        .job_service
        .create_job(&job(&uid(), &company_id))
        .expect("job creation succeeds");

    let first = services
        .job_service
        .close_jobs_by_company(&company_id)
        .expect("close succeeds");
    assert_eq!(first, 1);
    let second = services
        .job_service
        .close_jobs_by_company(&company_id)
        .expect("close succeeds");
    assert_eq!(second, 0, "already-closed set is a no-op");
}

#[test]
fn job_creation_requires_a_live_active_company() {
    let services = services();

    match services.job_service.create_job(&job(&uid(), &uid())) {
        Err(PortalError::MissingReference(_)) => {}
        other => panic!("expected missing-reference error, got {other:?}"),
    }

    let company_id = uid();
    services
        .companies
        .upsert(&company(&company_id, &uid()))
        .expect("company upsert succeeds");
    services
        .company_service
        .disable(&company_id)
        .expect("disable succeeds");
    match services.job_service.create_job(&job(&uid(), &company_id)) {
        Err(PortalError::StateConflict(_)) => {}
        other => panic!("expected state-conflict error, got {other:?}"),
    }

    services
        .company_service
        .enable(&company_id)
        .expect("enable succeeds");
    services
        .companies
        .soft_delete(&company_id)
        .expect("delete succeeds");
    match services.job_service.create_job(&job(&uid(), &company_id)) {
        Err(PortalError::MissingReference(_)) => {}
        other => panic!("expected missing-reference error, got {other:?}"),
    }
}

#[test]
fn company_name_snapshot_is_never_refreshed() {
    let services = services();
    let company_id = uid();
    let user_id = uid();
    let mut owner = company(&company_id, &user_id);
    owner.name = "Initech".to_string();
    services.companies.upsert(&owner).expect("upsert succeeds");

    let job_id = uid();
    let created = services
        .job_service
        .create_job(&job(&job_id, &company_id))
        .expect("job creation succeeds");
    assert_eq!(created.company_name.as_deref(), Some("Initech"));

    owner.name = "Initrode".to_string();
    services.companies.upsert(&owner).expect("rename succeeds");

    let stored = services
        .jobs
        .find_by_id(&job_id)
        .expect("find succeeds")
        .expect("job present");
    assert_eq!(
        stored.company_name.as_deref(),
        Some("Initech"),
        "snapshot taken at creation, never synced"
    );
}

#[test]
fn job_update_preserves_counter_and_owner() {
    let services = services();
    let company_id = uid();
    services
        .companies
        .upsert(&company(&company_id, &uid()))
        .expect("company upsert succeeds");
    let job_id = uid();
    services
        .job_service
        .create_job(&job(&job_id, &company_id))
        .expect("job creation succeeds");
    services
        .job_service
        .increment_applicant_count(&job_id)
        .expect("increment succeeds");

    // Attempt to move the job to another company while retitling it.
    let other_company = uid();
    services
        .companies
        .upsert(&company(&other_company, &uid()))
        .expect("company upsert succeeds");
    let mut update = job(&job_id, &other_company);
    update.title = "Principal Engineer".to_string();
    let updated = services
        .job_service
        .create_job(&update)
        .expect("update succeeds");

    assert_eq!(updated.title, "Principal Engineer");
    assert_eq!(updated.applicant_count, 1, "counter survives updates");
    assert_eq!(
        updated.company_id, company_id,
        "company reassignment is not permitted via update"
    );
}
