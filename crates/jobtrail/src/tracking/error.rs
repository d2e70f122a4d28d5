use validator::ValidationErrors;

use super::domain::UnknownVariant;
use super::repository::RepositoryError;

/// Failure taxonomy shared by every tracking service.
#[derive(Debug, thiserror::Error)]
pub enum TrackingError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Forbidden(String),
    #[error("{0}")]
    Unauthorized(String),
    #[error("{0}")]
    MethodNotAllowed(String),
    #[error(transparent)]
    Repository(RepositoryError),
    #[error("credential processing failed: {0}")]
    Credential(String),
}

impl TrackingError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::Forbidden(message.into())
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized(message.into())
    }

    /// Category name rendered in error payloads.
    pub const fn category(&self) -> &'static str {
        match self {
            TrackingError::Validation(_) => "Validation Error",
            TrackingError::Conflict(_) => "Conflict",
            TrackingError::NotFound(_) => "Not Found",
            TrackingError::Forbidden(_) => "Forbidden",
            TrackingError::Unauthorized(_) => "Unauthorized",
            TrackingError::MethodNotAllowed(_) => "Method Not Allowed",
            TrackingError::Repository(_) | TrackingError::Credential(_) => {
                "Internal Server Error"
            }
        }
    }
}

impl From<RepositoryError> for TrackingError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::Conflict => Self::Conflict("record already exists".to_string()),
            RepositoryError::NotFound => Self::NotFound("record not found".to_string()),
            RepositoryError::RoundBeforeApplication { applied_date } => Self::Validation(format!(
                "Interview date cannot be before application date ({applied_date})"
            )),
            RepositoryError::AppliedAfterRound { earliest } => Self::Validation(format!(
                "Applied date cannot be after the earliest interview date ({earliest})"
            )),
            unavailable @ RepositoryError::Unavailable(_) => Self::Repository(unavailable),
        }
    }
}

impl From<UnknownVariant> for TrackingError {
    fn from(value: UnknownVariant) -> Self {
        Self::Validation(value.to_string())
    }
}

impl From<ValidationErrors> for TrackingError {
    /// Reports the first failing field in name order so messages are deterministic.
    fn from(errors: ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|left, right| left.0.cmp(&right.0));

        let message = fields
            .into_iter()
            .find_map(|(field, failures)| {
                failures.first().map(|failure| match &failure.message {
                    Some(message) => message.to_string(),
                    None => format!("{field} is invalid ({})", failure.code),
                })
            })
            .unwrap_or_else(|| "request is invalid".to_string());

        Self::Validation(message)
    }
}
