//! Job application tracking: account identity, per-owner applications, nested interview
//! rounds and the status dashboard, plus the HTTP surface that exposes them.

pub mod applications;
pub mod clock;
pub mod credentials;
pub mod dashboard;
pub mod domain;
pub mod error;
pub mod identity;
pub mod interviews;
pub(crate) mod ownership;
pub mod repository;
pub mod router;
pub mod store;

#[cfg(test)]
mod tests;

pub use applications::ApplicationService;
pub use clock::{Clock, SystemClock};
pub use credentials::{check_password_strength, CredentialHasher, IssuedToken, TokenIssuer};
pub use dashboard::DashboardService;
pub use domain::{
    Account, AccountId, AccountView, ApplicationId, ApplicationRequest, ApplicationStatus,
    ApplicationView, DashboardStats, IdentityAssertion, InterviewId, InterviewResult,
    InterviewRound, InterviewRoundRequest, InterviewRoundView, JobApplication, LoginRequest, Page,
    PageRequest, RegisterRequest, Role, RoundType,
};
pub use error::TrackingError;
pub use identity::IdentityService;
pub use interviews::InterviewService;
pub use repository::{
    AccountRepository, ApplicationRepository, InterviewRepository, RepositoryError, TrackingStore,
};
pub use router::{tracking_router, ErrorPayload, LoginResponse, TrackingServices};
pub use store::InMemoryTrackingStore;
