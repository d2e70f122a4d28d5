use std::sync::Arc;

use tracing::debug;

use super::domain::{AccountId, DashboardStats};
use super::error::TrackingError;
use super::repository::TrackingStore;

/// Per-owner status aggregation for the dashboard view.
pub struct DashboardService<R> {
    repository: Arc<R>,
}

impl<R> DashboardService<R>
where
    R: TrackingStore + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    pub fn dashboard(&self, owner: AccountId) -> Result<DashboardStats, TrackingError> {
        if self.repository.fetch_account(owner)?.is_none() {
            return Err(TrackingError::not_found("User not found"));
        }

        let stats = self
            .repository
            .applications_by_owner(owner)?
            .iter()
            .fold(DashboardStats::default(), |mut stats, application| {
                stats.record(application.status);
                stats
            });

        debug!(owner = %owner, total = stats.total_applications, "dashboard computed");
        Ok(stats)
    }
}
