use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Identifier wrapper for registered accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccountId(pub u64);

/// Identifier wrapper for tracked job applications.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ApplicationId(pub u64);

/// Identifier wrapper for interview rounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct InterviewId(pub u64);

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for InterviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raised when a wire value is not a member of its closed enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{field} must be one of {expected}, got '{value}'")]
pub struct UnknownVariant {
    pub field: &'static str,
    pub value: String,
    pub expected: String,
}

impl UnknownVariant {
    fn new(field: &'static str, value: &str, labels: &[&'static str]) -> Self {
        Self {
            field,
            value: value.to_string(),
            expected: labels.join(", "),
        }
    }
}

/// Account role. Only one role exists today; matching stays exhaustive so a new role is a
/// compile error at every consumption site.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    User,
}

impl Role {
    pub const ALL: [Role; 1] = [Role::User];

    pub const fn label(self) -> &'static str {
        match self {
            Role::User => "USER",
        }
    }
}

impl FromStr for Role {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let labels = Role::ALL.map(Role::label);
        Role::ALL
            .into_iter()
            .find(|role| role.label() == raw.trim())
            .ok_or_else(|| UnknownVariant::new("role", raw, &labels))
    }
}

/// Pipeline stage of a job application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ApplicationStatus {
    Applied,
    Interviewing,
    Offered,
    Rejected,
}

impl ApplicationStatus {
    pub const ALL: [ApplicationStatus; 4] = [
        ApplicationStatus::Applied,
        ApplicationStatus::Interviewing,
        ApplicationStatus::Offered,
        ApplicationStatus::Rejected,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            ApplicationStatus::Applied => "APPLIED",
            ApplicationStatus::Interviewing => "INTERVIEWING",
            ApplicationStatus::Offered => "OFFERED",
            ApplicationStatus::Rejected => "REJECTED",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let labels = ApplicationStatus::ALL.map(ApplicationStatus::label);
        ApplicationStatus::ALL
            .into_iter()
            .find(|status| status.label() == raw.trim())
            .ok_or_else(|| UnknownVariant::new("status", raw, &labels))
    }
}

/// Kind of interview conducted in a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RoundType {
    Phone,
    Hr,
    Technical,
    Managerial,
    Onsite,
}

impl RoundType {
    pub const ALL: [RoundType; 5] = [
        RoundType::Phone,
        RoundType::Hr,
        RoundType::Technical,
        RoundType::Managerial,
        RoundType::Onsite,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            RoundType::Phone => "PHONE",
            RoundType::Hr => "HR",
            RoundType::Technical => "TECHNICAL",
            RoundType::Managerial => "MANAGERIAL",
            RoundType::Onsite => "ONSITE",
        }
    }
}

impl FromStr for RoundType {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let labels = RoundType::ALL.map(RoundType::label);
        RoundType::ALL
            .into_iter()
            .find(|round_type| round_type.label() == raw.trim())
            .ok_or_else(|| UnknownVariant::new("roundType", raw, &labels))
    }
}

/// Outcome of an interview round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InterviewResult {
    Pending,
    Passed,
    Failed,
}

impl InterviewResult {
    pub const ALL: [InterviewResult; 3] = [
        InterviewResult::Pending,
        InterviewResult::Passed,
        InterviewResult::Failed,
    ];

    pub const fn label(self) -> &'static str {
        match self {
            InterviewResult::Pending => "PENDING",
            InterviewResult::Passed => "PASSED",
            InterviewResult::Failed => "FAILED",
        }
    }
}

impl FromStr for InterviewResult {
    type Err = UnknownVariant;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let labels = InterviewResult::ALL.map(InterviewResult::label);
        InterviewResult::ALL
            .into_iter()
            .find(|result| result.label() == raw.trim())
            .ok_or_else(|| UnknownVariant::new("result", raw, &labels))
    }
}

/// Stored account with its credential hash.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: AccountId,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Account fields supplied at registration; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// Stored job application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobApplication {
    pub id: ApplicationId,
    pub owner: AccountId,
    pub company_name: String,
    pub job_role: String,
    pub status: ApplicationStatus,
    pub applied_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewApplication {
    pub owner: AccountId,
    pub company_name: String,
    pub job_role: String,
    pub status: ApplicationStatus,
    pub applied_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Stored interview round, owned through its parent application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterviewRound {
    pub id: InterviewId,
    pub application_id: ApplicationId,
    pub round_type: RoundType,
    pub interview_date: NaiveDate,
    pub notes: Option<String>,
    pub result: InterviewResult,
}

#[derive(Debug, Clone)]
pub struct NewInterviewRound {
    pub application_id: ApplicationId,
    pub round_type: RoundType,
    pub interview_date: NaiveDate,
    pub notes: Option<String>,
    pub result: InterviewResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Email should be valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be blank"))]
    pub password: String,
    #[validate(length(min = 1, message = "Confirm password cannot be blank"))]
    pub confirm_password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Email should be valid"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password cannot be blank"))]
    pub password: String,
}

/// Create/replace payload for a job application. Enumerated fields stay strings so unknown
/// values surface as field-level validation errors instead of decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationRequest {
    #[validate(length(
        min = 2,
        max = 150,
        message = "Company name must be between 2 and 150 characters"
    ))]
    pub company_name: String,
    #[validate(length(
        min = 2,
        max = 150,
        message = "Job role must be between 2 and 150 characters"
    ))]
    pub job_role: String,
    pub status: String,
    pub applied_date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRoundRequest {
    pub round_type: String,
    pub interview_date: NaiveDate,
    #[serde(default)]
    #[validate(length(max = 2000, message = "Notes cannot exceed 2000 characters"))]
    pub notes: Option<String>,
    pub result: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountView {
    pub id: AccountId,
    pub email: String,
    pub role: Role,
}

impl From<&Account> for AccountView {
    fn from(account: &Account) -> Self {
        Self {
            id: account.id,
            email: account.email.clone(),
            role: account.role,
        }
    }
}

/// Identity resolved after a successful login or bearer-token verification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IdentityAssertion {
    pub account_id: AccountId,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationView {
    pub id: ApplicationId,
    pub company_name: String,
    pub job_role: String,
    pub status: ApplicationStatus,
    pub applied_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub user_id: AccountId,
}

impl From<&JobApplication> for ApplicationView {
    fn from(application: &JobApplication) -> Self {
        Self {
            id: application.id,
            company_name: application.company_name.clone(),
            job_role: application.job_role.clone(),
            status: application.status,
            applied_date: application.applied_date,
            created_at: application.created_at,
            updated_at: application.updated_at,
            user_id: application.owner,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InterviewRoundView {
    pub id: InterviewId,
    pub round_type: RoundType,
    pub interview_date: NaiveDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub result: InterviewResult,
    pub job_application_id: ApplicationId,
}

impl From<&InterviewRound> for InterviewRoundView {
    fn from(round: &InterviewRound) -> Self {
        Self {
            id: round.id,
            round_type: round.round_type,
            interview_date: round.interview_date,
            notes: round.notes.clone(),
            result: round.result,
            job_application_id: round.application_id,
        }
    }
}

/// Per-owner application counts partitioned by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_applications: u64,
    pub applied_count: u64,
    pub interviewing_count: u64,
    pub offered_count: u64,
    pub rejected_count: u64,
}

impl DashboardStats {
    pub fn record(&mut self, status: ApplicationStatus) {
        self.total_applications += 1;
        match status {
            ApplicationStatus::Applied => self.applied_count += 1,
            ApplicationStatus::Interviewing => self.interviewing_count += 1,
            ApplicationStatus::Offered => self.offered_count += 1,
            ApplicationStatus::Rejected => self.rejected_count += 1,
        }
    }

    pub fn category_sum(&self) -> u64 {
        self.applied_count + self.interviewing_count + self.offered_count + self.rejected_count
    }
}

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const MAX_PAGE_SIZE: usize = 100;

/// Zero-based page selection with a clamped size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub size: usize,
}

impl PageRequest {
    pub fn new(page: Option<usize>, size: Option<usize>) -> Self {
        Self {
            page: page.unwrap_or(0),
            size: size.unwrap_or(DEFAULT_PAGE_SIZE).clamp(1, MAX_PAGE_SIZE),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub content: Vec<T>,
    pub page: usize,
    pub size: usize,
    pub total_elements: usize,
    pub total_pages: usize,
}

impl<T> Page<T> {
    /// Slices an already ordered collection.
    pub fn slice(items: Vec<T>, request: PageRequest) -> Self {
        let total_elements = items.len();
        let total_pages = total_elements.div_ceil(request.size);
        let content = items
            .into_iter()
            .skip(request.page.saturating_mul(request.size))
            .take(request.size)
            .collect();

        Self {
            content,
            page: request.page,
            size: request.size,
            total_elements,
            total_pages,
        }
    }
}
