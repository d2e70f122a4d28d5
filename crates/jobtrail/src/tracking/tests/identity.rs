use super::common::*;

use crate::tracking::clock::Clock;
use crate::tracking::domain::{LoginRequest, RegisterRequest, Role};
use crate::tracking::error::TrackingError;
use crate::tracking::repository::AccountRepository;

#[test]
fn register_stores_hashed_credentials_with_user_role() {
    let harness = harness();

    let view = harness
        .identity
        .register(register_request("  Jane.Doe@Example.com "))
        .expect("registration succeeds");

    assert_eq!(view.id.0, 1);
    assert_eq!(view.email, "jane.doe@example.com");
    assert_eq!(view.role, Role::User);

    let stored = harness
        .store
        .find_account_by_email("jane.doe@example.com")
        .expect("store readable")
        .expect("account stored");
    assert_ne!(stored.password_hash, STRONG_PASSWORD);
    assert!(stored.password_hash.starts_with("$argon2id$"));
    assert_eq!(stored.created_at, harness.clock.now());
}

#[test]
fn duplicate_email_conflicts_regardless_of_password() {
    let harness = harness();
    harness.register("dup@example.com");

    let attempts = [
        register_request("dup@example.com"),
        RegisterRequest {
            email: "DUP@example.com".to_string(),
            password: "weak".to_string(),
            confirm_password: "different".to_string(),
        },
        RegisterRequest {
            email: "dup@example.com".to_string(),
            password: "An0ther!Pass".to_string(),
            confirm_password: "An0ther!Pass".to_string(),
        },
    ];

    for attempt in attempts {
        let err = harness
            .identity
            .register(attempt)
            .expect_err("duplicate rejected");
        assert!(matches!(err, TrackingError::Conflict(_)), "got {err:?}");
    }
}

#[test]
fn mismatched_confirmation_fails_before_persistence() {
    let harness = harness();

    let err = harness
        .identity
        .register(RegisterRequest {
            email: "new@example.com".to_string(),
            password: STRONG_PASSWORD.to_string(),
            confirm_password: "Str0ng!Pasz".to_string(),
        })
        .expect_err("mismatch rejected");

    match err {
        TrackingError::Validation(message) => assert_eq!(message, "Passwords do not match"),
        other => panic!("expected validation error, got {other:?}"),
    }
    assert!(harness
        .store
        .find_account_by_email("new@example.com")
        .expect("store readable")
        .is_none());
}

#[test]
fn weak_passwords_are_rejected() {
    let harness = harness();

    for weak in ["short1!", "alllowercase1!", "NoDigits!!", "NoSymbol123", "Bad#Symbol1"] {
        let err = harness
            .identity
            .register(RegisterRequest {
                email: "weak@example.com".to_string(),
                password: weak.to_string(),
                confirm_password: weak.to_string(),
            })
            .expect_err("weak password rejected");
        assert!(matches!(err, TrackingError::Validation(_)), "{weak}: {err:?}");
    }
}

#[test]
fn malformed_email_is_a_validation_error() {
    let harness = harness();

    let err = harness
        .identity
        .register(register_request("not-an-email"))
        .expect_err("invalid email rejected");

    match err {
        TrackingError::Validation(message) => assert_eq!(message, "Email should be valid"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn login_resolves_identity_assertion() {
    let harness = harness();
    let account_id = harness.register("login@example.com");

    let identity = harness
        .identity
        .login(LoginRequest {
            email: "Login@Example.com".to_string(),
            password: STRONG_PASSWORD.to_string(),
        })
        .expect("login succeeds");

    assert_eq!(identity.account_id, account_id);
    assert_eq!(identity.email, "login@example.com");
    assert_eq!(identity.role, Role::User);
}

#[test]
fn login_distinguishes_unknown_account_from_bad_password() {
    let harness = harness();
    harness.register("known@example.com");

    let missing = harness
        .identity
        .login(LoginRequest {
            email: "unknown@example.com".to_string(),
            password: STRONG_PASSWORD.to_string(),
        })
        .expect_err("unknown account");
    assert!(matches!(missing, TrackingError::NotFound(_)));

    let wrong = harness
        .identity
        .login(LoginRequest {
            email: "known@example.com".to_string(),
            password: "Wr0ng!Pass".to_string(),
        })
        .expect_err("wrong password");
    assert!(matches!(wrong, TrackingError::Unauthorized(_)));
}
