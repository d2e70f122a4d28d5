use std::sync::Arc;

use chrono::NaiveDate;
use tracing::{debug, info};
use validator::Validate;

use super::domain::{
    AccountId, ApplicationId, InterviewId, InterviewResult, InterviewRound,
    InterviewRoundRequest, InterviewRoundView, JobApplication, NewInterviewRound, RoundType,
};
use super::error::TrackingError;
use super::ownership::load_owned_application;
use super::repository::TrackingStore;

struct RoundFields {
    round_type: RoundType,
    interview_date: NaiveDate,
    notes: Option<String>,
    result: InterviewResult,
}

/// Interview rounds nested under applications; access follows the parent's owner.
pub struct InterviewService<R> {
    repository: Arc<R>,
}

impl<R> InterviewService<R>
where
    R: TrackingStore + 'static,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }

    /// Field checks only. The date against the parent is enforced by the store when the round
    /// is written.
    fn validate(request: InterviewRoundRequest) -> Result<RoundFields, TrackingError> {
        request.validate()?;

        let round_type = request.round_type.parse::<RoundType>()?;
        let result = request.result.parse::<InterviewResult>()?;

        let notes = request
            .notes
            .map(|notes| notes.trim().to_string())
            .filter(|notes| !notes.is_empty());

        Ok(RoundFields {
            round_type,
            interview_date: request.interview_date,
            notes,
            result,
        })
    }

    /// Resolve round -> parent application -> owner and authorize `caller`.
    fn load_owned_round(
        &self,
        id: InterviewId,
        caller: AccountId,
        action: &str,
    ) -> Result<(InterviewRound, JobApplication), TrackingError> {
        let round = self
            .repository
            .fetch_round(id)?
            .ok_or_else(|| TrackingError::not_found(format!("Interview round {id} not found")))?;
        let parent =
            load_owned_application(self.repository.as_ref(), round.application_id, caller, action)?;
        Ok((round, parent))
    }

    pub fn add(
        &self,
        application_id: ApplicationId,
        request: InterviewRoundRequest,
        caller: AccountId,
    ) -> Result<InterviewRoundView, TrackingError> {
        load_owned_application(
            self.repository.as_ref(),
            application_id,
            caller,
            "add interviews to this application",
        )?;
        let fields = Self::validate(request)?;

        let stored = self.repository.insert_round(NewInterviewRound {
            application_id,
            round_type: fields.round_type,
            interview_date: fields.interview_date,
            notes: fields.notes,
            result: fields.result,
        })?;

        info!(
            interview_id = %stored.id,
            application_id = %application_id,
            round_type = stored.round_type.label(),
            "interview round added"
        );
        Ok(InterviewRoundView::from(&stored))
    }

    pub fn get(
        &self,
        id: InterviewId,
        caller: AccountId,
    ) -> Result<InterviewRoundView, TrackingError> {
        let (round, _) = self.load_owned_round(id, caller, "access this interview")?;
        Ok(InterviewRoundView::from(&round))
    }

    pub fn update(
        &self,
        id: InterviewId,
        request: InterviewRoundRequest,
        caller: AccountId,
    ) -> Result<InterviewRoundView, TrackingError> {
        let (mut round, _) = self.load_owned_round(id, caller, "update this interview")?;
        let fields = Self::validate(request)?;

        round.round_type = fields.round_type;
        round.interview_date = fields.interview_date;
        round.notes = fields.notes;
        round.result = fields.result;

        let stored = self.repository.update_round(round)?;
        info!(interview_id = %id, result = stored.result.label(), "interview round updated");
        Ok(InterviewRoundView::from(&stored))
    }

    pub fn delete(&self, id: InterviewId, caller: AccountId) -> Result<(), TrackingError> {
        self.load_owned_round(id, caller, "delete this interview")?;
        self.repository.delete_round(id)?;
        info!(interview_id = %id, "interview round deleted");
        Ok(())
    }

    /// Rounds of one application in creation order.
    pub fn list_by_application(
        &self,
        application_id: ApplicationId,
        caller: AccountId,
    ) -> Result<Vec<InterviewRoundView>, TrackingError> {
        load_owned_application(
            self.repository.as_ref(),
            application_id,
            caller,
            "access these interviews",
        )?;

        let rounds = self.repository.rounds_by_application(application_id)?;
        debug!(application_id = %application_id, count = rounds.len(), "listing interview rounds");
        Ok(rounds.iter().map(InterviewRoundView::from).collect())
    }
}
