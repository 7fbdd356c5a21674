//! The application intake workflow: referential checks, duplicate
//! protection, snapshots, the counter, and status transitions.

mod common;

use common::*;
use job_portal::domain::{ApplicationStatus, JobStatus};
use job_portal::error::PortalError;

struct Board {
    services: job_portal::service::Services,
    company_id: String,
    job_id: String,
    candidate_id: String,
}

fn seeded_board() -> Board {
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
    let candidate_id = uid();
    services
        .candidates
        .upsert(&candidate(&candidate_id, &uid()))
        .expect("candidate upsert succeeds");
    Board {
        services,
        company_id,
        job_id,
        candidate_id,
    }
}

#[test]
fn apply_captures_snapshots_and_bumps_the_counter() {
    let board = seeded_board();
    let app_id = uid();
    let created = board
        .services
        .application_service
        .apply(&application(&app_id, &board.job_id, &board.candidate_id))
        .expect("apply succeeds");

    assert_eq!(created.status, ApplicationStatus::Applied);
    assert_eq!(created.candidate_name.as_deref(), Some("Dana Field"));
    assert_eq!(created.job_title.as_deref(), Some("Staff Engineer"));
    assert!(created.applied_at.is_some());

    let stored_job = board
        .services
        .jobs
        .find_by_id(&board.job_id)
        .expect("find succeeds")
        .expect("job present");
    assert_eq!(stored_job.applicant_count, 1);
}

#[test]
fn a_second_application_for_the_same_pair_is_a_duplicate() {
    let board = seeded_board();
    board
        .services
        .application_service
        .apply(&application(&uid(), &board.job_id, &board.candidate_id))
        .expect("first apply succeeds");

    match board
        .services
        .application_service
        .apply(&application(&uid(), &board.job_id, &board.candidate_id))
    {
        Err(PortalError::Duplicate(message)) => {
            assert!(message.contains("already applied"));
        }
        other => panic!("expected duplicate error, got {other:?}"),
    }

    let stored_job = board
        .services
        .jobs
        .find_by_id(&board.job_id)
        .expect("find succeeds")
        .expect("job present");
    assert_eq!(
        stored_job.applicant_count, 1,
        "failed apply must not touch the counter"
    );
}

#[test]
fn reapplying_after_a_soft_delete_is_allowed_and_counts_again() {
    let board = seeded_board();
    let first = uid();
    board
        .services
        .application_service
        .apply(&application(&first, &board.job_id, &board.candidate_id))
        .expect("first apply succeeds");
    board
        .services
        .application_service
        .soft_delete(&first)
        .expect("delete succeeds");

    board
        .services
        .application_service
        .apply(&application(&uid(), &board.job_id, &board.candidate_id))
        .expect("reapply after delete succeeds; the duplicate check ignores deleted rows");

    let stored_job = board
        .services
        .jobs
        .find_by_id(&board.job_id)
        .expect("find succeeds")
        .expect("job present");
    assert_eq!(
        stored_job.applicant_count, 2,
        "the counter reads as applications ever submitted"
    );
}

#[test]
fn apply_requires_a_live_active_candidate() {
    let board = seeded_board();

    match board
        .services
        .application_service
        .apply(&application(&uid(), &board.job_id, &uid()))
    {
        Err(PortalError::MissingReference(message)) => {
            assert!(message.contains("Candidate"));
        }
        other => panic!("expected missing-reference error, got {other:?}"),
    }

    board
        .services
        .candidates
        .set_status(&board.candidate_id, job_portal::domain::EntityStatus::Disabled)
        .expect("disable succeeds");
    match board
        .services
        .application_service
        .apply(&application(&uid(), &board.job_id, &board.candidate_id))
    {
        Err(PortalError::StateConflict(message)) => {
            assert!(message.contains("disabled"));
        }
        other => panic!("expected state-conflict error, got {other:?}"),
    }
}

#[test]
fn apply_requires_a_live_open_job() {
    let board = seeded_board();

    match board
        .services
        .application_service
        .apply(&application(&uid(), &uid(), &board.candidate_id))
    {
        Err(PortalError::MissingReference(message)) => assert!(message.contains("Job")),
        other => panic!("expected missing-reference error, got {other:?}"),
    }

    board
        .services
        .job_service
        .close_jobs_by_company(&board.company_id)
        .expect("close succeeds");
    match board
        .services
        .application_service
        .apply(&application(&uid(), &board.job_id, &board.candidate_id))
    {
        Err(PortalError::StateConflict(message)) => {
            assert!(message.contains("not open"));
        }
        other => panic!("expected state-conflict error, got {other:?}"),
    }
}

#[test]
fn status_updates_accept_only_the_enumerated_states() {
    let board = seeded_board();
    let app_id = uid();
    board
        .services
        .application_service
        .apply(&application(&app_id, &board.job_id, &board.candidate_id))
        .expect("apply succeeds");

    let hired = board
        .services
        .application_service
        .update_status(&app_id, "HIRED")
        .expect("update succeeds")
        .expect("application present");
    assert_eq!(hired.status, ApplicationStatus::Hired);

    match board
        .services
        .application_service
        .update_status(&app_id, "BOGUS")
    {
        Err(PortalError::Validation(message)) => {
            assert!(message.contains("APPLIED, SHORTLISTED, REJECTED, HIRED"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }

    let stored = board
        .services
        .applications
        .find_by_id(&app_id)
        .expect("find succeeds")
        .expect("application present");
    assert_eq!(
        stored.status,
        ApplicationStatus::Hired,
        "rejected update leaves the stored status unchanged"
    );

    assert!(board
        .services
        .application_service
        .update_status(&uid(), "APPLIED")
        .expect("call succeeds")
        .is_none());
}

#[test]
fn soft_deleting_an_application_keeps_the_counter() {
    let board = seeded_board();
    let app_id = uid();
    board
        .services
        .application_service
        .apply(&application(&app_id, &board.job_id, &board.candidate_id))
        .expect("apply succeeds");
    board
        .services
        .application_service
        .soft_delete(&app_id)
        .expect("delete succeeds");

    let stored_job = board
        .services
        .jobs
        .find_by_id(&board.job_id)
        .expect("find succeeds")
        .expect("job present");
    assert_eq!(stored_job.applicant_count, 1);
}

#[test]
fn listings_scope_by_job_and_candidate() {
    let board = seeded_board();
    let other_candidate = uid();
    board
        .services
        .candidates
        .upsert(&candidate(&other_candidate, &uid()))
        .expect("candidate upsert succeeds");

    board
        .services
        .application_service
        .apply(&application(&uid(), &board.job_id, &board.candidate_id))
        .expect("apply succeeds");
    board
        .services
        .application_service
        .apply(&application(&uid(), &board.job_id, &other_candidate))
        .expect("apply succeeds");

    let by_job = board
        .services
        .applications
        .list_by_job(&board.job_id, 0, 10)
        .expect("listing succeeds");
    assert_eq!(by_job.total, 2);

    let by_candidate = board
        .services
        .applications
        .list_by_candidate(&board.candidate_id, 0, 10)
        .expect("listing succeeds");
    assert_eq!(by_candidate.total, 1);
    assert_eq!(by_candidate.items[0].candidate_id, board.candidate_id);
}

/// The end-to-end scenario from the design brief: post, apply, disable,
/// and watch the later application bounce off the closed job.
#[test]
fn full_board_lifecycle() {
    let board = seeded_board();

    board
        .services
        .application_service
        .apply(&application(&uid(), &board.job_id, &board.candidate_id))
        .expect("first candidate applies");
    assert_eq!(
        board
            .services
            .jobs
            .find_by_id(&board.job_id)
            .expect("find succeeds")
            .expect("job present")
            .applicant_count,
        1
    );

    board
        .services
        .company_service
        .disable(&board.company_id)
        .expect("disable succeeds");
    assert_eq!(
        board
            .services
            .jobs
            .find_by_id(&board.job_id)
            .expect("find succeeds")
            .expect("job present")
            .status,
        JobStatus::Closed
    );

    let second_candidate = uid();
    board
        .services
        .candidates
        .upsert(&candidate(&second_candidate, &uid()))
        .expect("candidate upsert succeeds");
    match board
        .services
        .application_service
        .apply(&application(&uid(), &board.job_id, &second_candidate))
    {
        Err(PortalError::StateConflict(_)) => {}
        other => panic!("expected state-conflict error, got {other:?}"),
    }
}
