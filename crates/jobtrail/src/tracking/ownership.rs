use tracing::warn;

use super::domain::{AccountId, ApplicationId, JobApplication};
use super::error::TrackingError;
use super::repository::ApplicationRepository;

/// Entities that belong to exactly one account.
pub trait Owned {
    fn owner(&self) -> AccountId;

    fn is_owned_by(&self, account: AccountId) -> bool {
        self.owner() == account
    }
}

impl Owned for JobApplication {
    fn owner(&self) -> AccountId {
        self.owner
    }
}

/// Passes the entity through when `caller` owns it, otherwise yields `Forbidden`.
pub fn ensure_owned<T: Owned>(
    entity: T,
    caller: AccountId,
    action: &str,
) -> Result<T, TrackingError> {
    if entity.is_owned_by(caller) {
        Ok(entity)
    } else {
        warn!(caller = %caller, owner = %entity.owner(), action, "ownership check failed");
        Err(TrackingError::forbidden(format!("Not authorized to {action}")))
    }
}

/// Resolves an application and checks it belongs to `caller`. Interview rounds are authorized
/// through this same path via their parent.
pub fn load_owned_application<R>(
    repository: &R,
    id: ApplicationId,
    caller: AccountId,
    action: &str,
) -> Result<JobApplication, TrackingError>
where
    R: ApplicationRepository + ?Sized,
{
    let application = repository
        .fetch_application(id)?
        .ok_or_else(|| TrackingError::not_found(format!("Job application {id} not found")))?;
    ensure_owned(application, caller, action)
}
