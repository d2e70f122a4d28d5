use chrono::NaiveDate;

use super::domain::{
    Account, AccountId, ApplicationId, InterviewId, InterviewRound, JobApplication, NewAccount,
    NewApplication, NewInterviewRound,
};

/// Account storage keyed by id with a unique email index.
pub trait AccountRepository: Send + Sync {
    /// Fails with [`RepositoryError::Conflict`] when the email is already taken.
    fn insert_account(&self, account: NewAccount) -> Result<Account, RepositoryError>;
    fn fetch_account(&self, id: AccountId) -> Result<Option<Account>, RepositoryError>;
    fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError>;
}

pub trait ApplicationRepository: Send + Sync {
    fn insert_application(
        &self,
        application: NewApplication,
    ) -> Result<JobApplication, RepositoryError>;
    /// Fails with [`RepositoryError::AppliedAfterRound`] when the new applied date is later
    /// than one of the application's rounds.
    fn update_application(
        &self,
        application: JobApplication,
    ) -> Result<JobApplication, RepositoryError>;
    fn fetch_application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<JobApplication>, RepositoryError>;
    /// Removes the application together with its interview rounds.
    fn delete_application(&self, id: ApplicationId) -> Result<(), RepositoryError>;
    /// All applications owned by `owner`, in insertion order.
    fn applications_by_owner(
        &self,
        owner: AccountId,
    ) -> Result<Vec<JobApplication>, RepositoryError>;
}

pub trait InterviewRepository: Send + Sync {
    /// Fails with [`RepositoryError::NotFound`] when the parent application is gone and with
    /// [`RepositoryError::RoundBeforeApplication`] when the round predates it. The date check
    /// runs against the parent as stored at write time.
    fn insert_round(&self, round: NewInterviewRound) -> Result<InterviewRound, RepositoryError>;
    /// Same date rule as [`InterviewRepository::insert_round`].
    fn update_round(&self, round: InterviewRound) -> Result<InterviewRound, RepositoryError>;
    fn fetch_round(&self, id: InterviewId) -> Result<Option<InterviewRound>, RepositoryError>;
    fn delete_round(&self, id: InterviewId) -> Result<(), RepositoryError>;
    /// Rounds of one application, in creation order.
    fn rounds_by_application(
        &self,
        application_id: ApplicationId,
    ) -> Result<Vec<InterviewRound>, RepositoryError>;
}

/// Everything the tracking services need from a backing store.
pub trait TrackingStore: AccountRepository + ApplicationRepository + InterviewRepository {}

impl<T> TrackingStore for T where
    T: AccountRepository + ApplicationRepository + InterviewRepository
{
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("interview date is before the application date {applied_date}")]
    RoundBeforeApplication { applied_date: NaiveDate },
    #[error("applied date is after the earliest interview date {earliest}")]
    AppliedAfterRound { earliest: NaiveDate },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
