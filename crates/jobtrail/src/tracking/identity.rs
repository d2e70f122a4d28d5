use std::sync::Arc;

use tracing::{info, warn};
use validator::Validate;

use super::clock::Clock;
use super::credentials::{check_password_strength, CredentialHasher};
use super::domain::{
    AccountView, IdentityAssertion, LoginRequest, NewAccount, RegisterRequest, Role,
};
use super::error::TrackingError;
use super::repository::{AccountRepository, RepositoryError};

/// Registration and credential verification.
pub struct IdentityService<R> {
    repository: Arc<R>,
    hasher: CredentialHasher,
    clock: Arc<dyn Clock>,
}

fn normalize_email(raw: &str) -> String {
    raw.trim().to_ascii_lowercase()
}

impl<R> IdentityService<R>
where
    R: AccountRepository + 'static,
{
    pub fn new(repository: Arc<R>, hasher: CredentialHasher, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            hasher,
            clock,
        }
    }

    /// Create an account with role `USER`.
    ///
    /// An already registered email is a conflict whatever the passwords are; otherwise the
    /// confirmation and strength checks run before anything is written.
    pub fn register(&self, mut request: RegisterRequest) -> Result<AccountView, TrackingError> {
        request.email = normalize_email(&request.email);
        request.validate()?;

        if self
            .repository
            .find_account_by_email(&request.email)?
            .is_some()
        {
            return Err(TrackingError::Conflict(format!(
                "Email {} is already registered",
                request.email
            )));
        }

        if request.password != request.confirm_password {
            return Err(TrackingError::validation("Passwords do not match"));
        }
        check_password_strength(&request.password)?;

        let password_hash = self.hasher.hash(&request.password)?;
        let account = self
            .repository
            .insert_account(NewAccount {
                email: request.email,
                password_hash,
                role: Role::User,
                created_at: self.clock.now(),
            })
            .map_err(|err| match err {
                RepositoryError::Conflict => {
                    TrackingError::Conflict("Email is already registered".to_string())
                }
                other => other.into(),
            })?;

        info!(account_id = %account.id, "account registered");
        Ok(AccountView::from(&account))
    }

    /// Check credentials and resolve the caller's identity.
    pub fn login(&self, mut request: LoginRequest) -> Result<IdentityAssertion, TrackingError> {
        request.email = normalize_email(&request.email);
        request.validate()?;

        let account = self
            .repository
            .find_account_by_email(&request.email)?
            .ok_or_else(|| TrackingError::not_found("User not found"))?;

        if !self.hasher.verify(&request.password, &account.password_hash)? {
            warn!(account_id = %account.id, "login rejected: invalid credentials");
            return Err(TrackingError::unauthorized("Invalid credentials"));
        }

        info!(account_id = %account.id, "login succeeded");
        Ok(IdentityAssertion {
            account_id: account.id,
            email: account.email,
            role: account.role,
        })
    }
}
