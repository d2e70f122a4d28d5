use std::sync::Arc;
use std::thread;

use chrono::Utc;

use super::common::*;

use crate::tracking::domain::{
    AccountId, ApplicationId, ApplicationStatus, InterviewResult, NewAccount, NewApplication,
    NewInterviewRound, Role, RoundType,
};
use crate::tracking::repository::{
    AccountRepository, ApplicationRepository, InterviewRepository, RepositoryError,
};
use crate::tracking::store::InMemoryTrackingStore;

fn new_account(email: &str) -> NewAccount {
    NewAccount {
        email: email.to_string(),
        password_hash: "$argon2id$stub".to_string(),
        role: Role::User,
        created_at: Utc::now(),
    }
}

fn new_application(owner: AccountId) -> NewApplication {
    NewApplication {
        owner,
        company_name: "Acme".to_string(),
        job_role: "Engineer".to_string(),
        status: ApplicationStatus::Applied,
        applied_date: date(2025, 1, 1),
        created_at: Utc::now(),
    }
}

fn new_round(application_id: ApplicationId) -> NewInterviewRound {
    NewInterviewRound {
        application_id,
        round_type: RoundType::Hr,
        interview_date: date(2025, 1, 2),
        notes: None,
        result: InterviewResult::Pending,
    }
}

#[test]
fn email_index_is_unique() {
    let store = InMemoryTrackingStore::new();
    store
        .insert_account(new_account("a@example.com"))
        .expect("first insert");

    assert!(matches!(
        store.insert_account(new_account("a@example.com")),
        Err(RepositoryError::Conflict)
    ));
}

#[test]
fn ids_are_sequential_per_table() {
    let store = InMemoryTrackingStore::new();
    let first = store
        .insert_account(new_account("a@example.com"))
        .expect("insert");
    let second = store
        .insert_account(new_account("b@example.com"))
        .expect("insert");
    let application = store
        .insert_application(new_application(second.id))
        .expect("insert");

    assert_eq!(first.id, AccountId(1));
    assert_eq!(second.id, AccountId(2));
    assert_eq!(application.id, ApplicationId(1));
}

#[test]
fn children_require_existing_parents() {
    let store = InMemoryTrackingStore::new();

    assert!(matches!(
        store.insert_application(new_application(AccountId(1))),
        Err(RepositoryError::NotFound)
    ));
    assert!(matches!(
        store.insert_round(new_round(ApplicationId(1))),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn deleting_an_application_cascades_to_rounds() {
    let store = InMemoryTrackingStore::new();
    let owner = store
        .insert_account(new_account("a@example.com"))
        .expect("insert");
    let kept = store
        .insert_application(new_application(owner.id))
        .expect("insert");
    let dropped = store
        .insert_application(new_application(owner.id))
        .expect("insert");
    let kept_round = store.insert_round(new_round(kept.id)).expect("insert");
    let dropped_round = store.insert_round(new_round(dropped.id)).expect("insert");

    store.delete_application(dropped.id).expect("delete");

    assert!(store
        .fetch_round(dropped_round.id)
        .expect("readable")
        .is_none());
    assert_eq!(
        store.rounds_by_application(kept.id).expect("readable"),
        vec![kept_round]
    );
    assert!(matches!(
        store.delete_application(dropped.id),
        Err(RepositoryError::NotFound)
    ));
}

#[test]
fn round_dates_are_checked_against_the_stored_parent() {
    let store = InMemoryTrackingStore::new();
    let owner = store
        .insert_account(new_account("a@example.com"))
        .expect("insert");
    let application = store
        .insert_application(new_application(owner.id))
        .expect("insert");

    let early = NewInterviewRound {
        interview_date: date(2024, 12, 31),
        ..new_round(application.id)
    };
    let err = store.insert_round(early).expect_err("round before application");
    assert!(matches!(
        err,
        RepositoryError::RoundBeforeApplication { applied_date } if applied_date == date(2025, 1, 1)
    ));

    let mut round = store.insert_round(new_round(application.id)).expect("insert");
    round.interview_date = date(2024, 12, 1);
    assert!(matches!(
        store.update_round(round),
        Err(RepositoryError::RoundBeforeApplication { .. })
    ));
}

#[test]
fn applied_date_cannot_pass_a_stored_round() {
    let store = InMemoryTrackingStore::new();
    let owner = store
        .insert_account(new_account("a@example.com"))
        .expect("insert");
    let mut application = store
        .insert_application(new_application(owner.id))
        .expect("insert");
    store.insert_round(new_round(application.id)).expect("insert");

    application.applied_date = date(2025, 1, 3);
    let err = store
        .update_application(application.clone())
        .expect_err("applied date after round");
    assert!(matches!(
        err,
        RepositoryError::AppliedAfterRound { earliest } if earliest == date(2025, 1, 2)
    ));

    application.applied_date = date(2025, 1, 2);
    store
        .update_application(application)
        .expect("same day as the round is allowed");
}

#[test]
fn racing_round_insert_and_applied_date_move_never_both_win() {
    for _ in 0..200 {
        let store = Arc::new(InMemoryTrackingStore::new());
        let owner = store
            .insert_account(new_account("a@example.com"))
            .expect("insert");
        let application = store
            .insert_application(new_application(owner.id))
            .expect("insert");

        let moved = {
            let store = store.clone();
            let mut application = application.clone();
            application.applied_date = date(2025, 1, 10);
            thread::spawn(move || store.update_application(application).is_ok())
        };
        let added = {
            let store = store.clone();
            let round = NewInterviewRound {
                interview_date: date(2025, 1, 5),
                ..new_round(application.id)
            };
            thread::spawn(move || store.insert_round(round).is_ok())
        };
        let moved = moved.join().expect("update thread");
        let added = added.join().expect("insert thread");

        assert!(moved != added, "exactly one write wins");
        let stored = store
            .fetch_application(application.id)
            .expect("readable")
            .expect("present");
        for round in store.rounds_by_application(application.id).expect("readable") {
            assert!(round.interview_date >= stored.applied_date);
        }
    }
}
