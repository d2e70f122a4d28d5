use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

use chrono::NaiveDate;

use super::domain::{
    Account, AccountId, ApplicationId, InterviewId, InterviewRound, JobApplication, NewAccount,
    NewApplication, NewInterviewRound,
};
use super::repository::{
    AccountRepository, ApplicationRepository, InterviewRepository, RepositoryError,
};

/// Process-local store. One mutex guards every table so each call is atomic; ids are
/// sequential per table and the `BTreeMap` ordering doubles as insertion order.
#[derive(Debug, Default)]
pub struct InMemoryTrackingStore {
    tables: Mutex<Tables>,
}

#[derive(Debug, Default)]
struct Tables {
    accounts: BTreeMap<AccountId, Account>,
    applications: BTreeMap<ApplicationId, JobApplication>,
    rounds: BTreeMap<InterviewId, InterviewRound>,
    account_sequence: u64,
    application_sequence: u64,
    round_sequence: u64,
}

impl InMemoryTrackingStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Unavailable("store mutex poisoned".to_string()))
    }
}

impl Tables {
    /// Rounds never predate their application.
    fn check_round_date(
        &self,
        application_id: ApplicationId,
        interview_date: NaiveDate,
    ) -> Result<(), RepositoryError> {
        let parent = self
            .applications
            .get(&application_id)
            .ok_or(RepositoryError::NotFound)?;
        if interview_date < parent.applied_date {
            return Err(RepositoryError::RoundBeforeApplication {
                applied_date: parent.applied_date,
            });
        }
        Ok(())
    }

    fn earliest_round(&self, application_id: ApplicationId) -> Option<NaiveDate> {
        self.rounds
            .values()
            .filter(|round| round.application_id == application_id)
            .map(|round| round.interview_date)
            .min()
    }
}

impl AccountRepository for InMemoryTrackingStore {
    fn insert_account(&self, account: NewAccount) -> Result<Account, RepositoryError> {
        let mut tables = self.tables()?;
        if tables
            .accounts
            .values()
            .any(|existing| existing.email == account.email)
        {
            return Err(RepositoryError::Conflict);
        }

        tables.account_sequence += 1;
        let stored = Account {
            id: AccountId(tables.account_sequence),
            email: account.email,
            password_hash: account.password_hash,
            role: account.role,
            created_at: account.created_at,
        };
        tables.accounts.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn fetch_account(&self, id: AccountId) -> Result<Option<Account>, RepositoryError> {
        Ok(self.tables()?.accounts.get(&id).cloned())
    }

    fn find_account_by_email(&self, email: &str) -> Result<Option<Account>, RepositoryError> {
        Ok(self
            .tables()?
            .accounts
            .values()
            .find(|account| account.email == email)
            .cloned())
    }
}

impl ApplicationRepository for InMemoryTrackingStore {
    fn insert_application(
        &self,
        application: NewApplication,
    ) -> Result<JobApplication, RepositoryError> {
        let mut tables = self.tables()?;
        if !tables.accounts.contains_key(&application.owner) {
            return Err(RepositoryError::NotFound);
        }

        tables.application_sequence += 1;
        let stored = JobApplication {
            id: ApplicationId(tables.application_sequence),
            owner: application.owner,
            company_name: application.company_name,
            job_role: application.job_role,
            status: application.status,
            applied_date: application.applied_date,
            created_at: application.created_at,
            updated_at: application.created_at,
        };
        tables.applications.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn update_application(
        &self,
        application: JobApplication,
    ) -> Result<JobApplication, RepositoryError> {
        let mut tables = self.tables()?;
        if let Some(earliest) = tables.earliest_round(application.id) {
            if application.applied_date > earliest {
                return Err(RepositoryError::AppliedAfterRound { earliest });
            }
        }
        match tables.applications.get_mut(&application.id) {
            Some(slot) => {
                *slot = application.clone();
                Ok(application)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_application(
        &self,
        id: ApplicationId,
    ) -> Result<Option<JobApplication>, RepositoryError> {
        Ok(self.tables()?.applications.get(&id).cloned())
    }

    fn delete_application(&self, id: ApplicationId) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        if tables.applications.remove(&id).is_none() {
            return Err(RepositoryError::NotFound);
        }
        tables.rounds.retain(|_, round| round.application_id != id);
        Ok(())
    }

    fn applications_by_owner(
        &self,
        owner: AccountId,
    ) -> Result<Vec<JobApplication>, RepositoryError> {
        Ok(self
            .tables()?
            .applications
            .values()
            .filter(|application| application.owner == owner)
            .cloned()
            .collect())
    }
}

impl InterviewRepository for InMemoryTrackingStore {
    fn insert_round(&self, round: NewInterviewRound) -> Result<InterviewRound, RepositoryError> {
        let mut tables = self.tables()?;
        tables.check_round_date(round.application_id, round.interview_date)?;

        tables.round_sequence += 1;
        let stored = InterviewRound {
            id: InterviewId(tables.round_sequence),
            application_id: round.application_id,
            round_type: round.round_type,
            interview_date: round.interview_date,
            notes: round.notes,
            result: round.result,
        };
        tables.rounds.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn update_round(&self, round: InterviewRound) -> Result<InterviewRound, RepositoryError> {
        let mut tables = self.tables()?;
        if !tables.rounds.contains_key(&round.id) {
            return Err(RepositoryError::NotFound);
        }
        tables.check_round_date(round.application_id, round.interview_date)?;
        match tables.rounds.get_mut(&round.id) {
            Some(slot) => {
                *slot = round.clone();
                Ok(round)
            }
            None => Err(RepositoryError::NotFound),
        }
    }

    fn fetch_round(&self, id: InterviewId) -> Result<Option<InterviewRound>, RepositoryError> {
        Ok(self.tables()?.rounds.get(&id).cloned())
    }

    fn delete_round(&self, id: InterviewId) -> Result<(), RepositoryError> {
        self.tables()?
            .rounds
            .remove(&id)
            .map(|_| ())
            .ok_or(RepositoryError::NotFound)
    }

    fn rounds_by_application(
        &self,
        application_id: ApplicationId,
    ) -> Result<Vec<InterviewRound>, RepositoryError> {
        Ok(self
            .tables()?
            .rounds
            .values()
            .filter(|round| round.application_id == application_id)
            .cloned()
            .collect())
    }
}
