use std::cmp::Reverse;
use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};
use validator::Validate;

use super::clock::Clock;
use super::domain::{
    AccountId, ApplicationId, ApplicationRequest, ApplicationStatus, ApplicationView,
    NewApplication, Page, PageRequest,
};
use super::error::TrackingError;
use super::ownership::load_owned_application;
use super::repository::TrackingStore;

/// Validated application fields ready to be written.
struct ApplicationFields {
    company_name: String,
    job_role: String,
    status: ApplicationStatus,
    applied_date: NaiveDate,
}

/// Ownership-scoped CRUD over job applications.
pub struct ApplicationService<R> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
}

impl<R> ApplicationService<R>
where
    R: TrackingStore + 'static,
{
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self { repository, clock }
    }

    fn validate(
        &self,
        mut request: ApplicationRequest,
    ) -> Result<ApplicationFields, TrackingError> {
        request.company_name = request.company_name.trim().to_string();
        request.job_role = request.job_role.trim().to_string();
        request.validate()?;

        let status = request.status.parse::<ApplicationStatus>()?;
        if request.applied_date > self.clock.today() {
            return Err(TrackingError::validation("Applied date cannot be in the future"));
        }

        Ok(ApplicationFields {
            company_name: request.company_name,
            job_role: request.job_role,
            status,
            applied_date: request.applied_date,
        })
    }

    fn ensure_account(&self, owner: AccountId) -> Result<(), TrackingError> {
        self.repository
            .fetch_account(owner)?
            .map(|_| ())
            .ok_or_else(|| TrackingError::not_found("User not found"))
    }

    pub fn create(
        &self,
        request: ApplicationRequest,
        owner: AccountId,
    ) -> Result<ApplicationView, TrackingError> {
        let fields = self.validate(request)?;
        self.ensure_account(owner)?;

        let stored = self.repository.insert_application(NewApplication {
            owner,
            company_name: fields.company_name,
            job_role: fields.job_role,
            status: fields.status,
            applied_date: fields.applied_date,
            created_at: self.clock.now(),
        })?;

        info!(application_id = %stored.id, owner = %owner, "job application created");
        Ok(ApplicationView::from(&stored))
    }

    /// Newest applied date first; equal dates keep insertion order.
    pub fn list(
        &self,
        owner: AccountId,
        page: PageRequest,
    ) -> Result<Page<ApplicationView>, TrackingError> {
        self.ensure_account(owner)?;

        let mut applications = self.repository.applications_by_owner(owner)?;
        applications.sort_by_key(|application| Reverse(application.applied_date));
        let views = applications.iter().map(ApplicationView::from).collect();

        debug!(owner = %owner, page = page.page, size = page.size, "listing job applications");
        Ok(Page::slice(views, page))
    }

    pub fn get(
        &self,
        id: ApplicationId,
        caller: AccountId,
    ) -> Result<ApplicationView, TrackingError> {
        let application = load_owned_application(
            self.repository.as_ref(),
            id,
            caller,
            "access this application",
        )?;
        Ok(ApplicationView::from(&application))
    }

    /// Replace the editable fields. Owner and id never change; the store refuses an applied
    /// date later than an existing interview round.
    pub fn update(
        &self,
        id: ApplicationId,
        request: ApplicationRequest,
        caller: AccountId,
    ) -> Result<ApplicationView, TrackingError> {
        let mut application = load_owned_application(
            self.repository.as_ref(),
            id,
            caller,
            "update this application",
        )?;
        let fields = self.validate(request)?;

        application.company_name = fields.company_name;
        application.job_role = fields.job_role;
        application.status = fields.status;
        application.applied_date = fields.applied_date;
        application.updated_at = self.clock.now();

        let stored = self.repository.update_application(application)?;
        info!(application_id = %id, status = stored.status.label(), "job application updated");
        Ok(ApplicationView::from(&stored))
    }

    pub fn delete(&self, id: ApplicationId, caller: AccountId) -> Result<(), TrackingError> {
        load_owned_application(
            self.repository.as_ref(),
            id,
            caller,
            "delete this application",
        )?;
        self.repository.delete_application(id)?;
        info!(application_id = %id, "job application deleted");
        Ok(())
    }
}
