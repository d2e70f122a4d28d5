use chrono::{Duration, Utc};

use super::common::*;

use crate::tracking::credentials::{check_password_strength, TokenIssuer};
use crate::tracking::domain::{AccountId, IdentityAssertion, Role};
use crate::tracking::error::TrackingError;

fn identity() -> IdentityAssertion {
    IdentityAssertion {
        account_id: AccountId(7),
        email: "holder@example.com".to_string(),
        role: Role::User,
    }
}

#[test]
fn strength_policy_accepts_each_allowed_symbol() {
    for symbol in ['@', '$', '!', '%', '*', '?', '&'] {
        let password = format!("Abcdef1{symbol}");
        assert!(check_password_strength(&password).is_ok(), "{password}");
    }
}

#[test]
fn strength_policy_reports_unsupported_characters() {
    let err = check_password_strength("Abcdef1! space").expect_err("space rejected");
    match err {
        TrackingError::Validation(message) => assert!(message.contains("unsupported"), "{message}"),
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn hasher_verifies_only_the_hashed_password() {
    let hasher = test_hasher();
    let hash = hasher.hash(STRONG_PASSWORD).expect("hash");

    assert!(hasher.verify(STRONG_PASSWORD, &hash).expect("verify"));
    assert!(!hasher.verify("Str0ng!Pasx", &hash).expect("verify"));
    assert!(matches!(
        hasher.verify(STRONG_PASSWORD, "not-a-phc-string"),
        Err(TrackingError::Credential(_))
    ));
}

#[test]
fn issued_token_resolves_back_to_identity() {
    let issuer = TokenIssuer::new(TOKEN_SECRET, 3600);

    let issued = issuer.issue(&identity()).expect("token issued");
    let resolved = issuer.verify(&issued.token).expect("token verifies");

    assert_eq!(resolved, identity());
    assert!(issued.expires_at > Utc::now() + Duration::minutes(59));
}

#[test]
fn token_signed_with_another_secret_is_unauthorized() {
    let issued = TokenIssuer::new("some-other-secret", 3600)
        .issue(&identity())
        .expect("token issued");

    let err = TokenIssuer::new(TOKEN_SECRET, 3600)
        .verify(&issued.token)
        .expect_err("foreign signature");

    assert!(matches!(err, TrackingError::Unauthorized(_)));
}

#[test]
fn expired_token_is_unauthorized() {
    let issuer = TokenIssuer::new(TOKEN_SECRET, 60);
    let issued = issuer
        .issue_at(&identity(), Utc::now() - Duration::hours(2))
        .expect("token issued");

    let err = issuer.verify(&issued.token).expect_err("expired");

    assert!(matches!(err, TrackingError::Unauthorized(_)));
}

#[test]
fn garbage_token_is_unauthorized() {
    let err = TokenIssuer::new(TOKEN_SECRET, 60)
        .verify("definitely.not.ajwt")
        .expect_err("garbage");

    assert!(matches!(err, TrackingError::Unauthorized(_)));
}
