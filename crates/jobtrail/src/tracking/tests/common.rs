use std::sync::{Arc, Mutex};

use axum::body::Body;
use axum::http::{header, Method, Request};
use axum::response::Response;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use serde_json::Value;

use crate::tracking::applications::ApplicationService;
use crate::tracking::clock::Clock;
use crate::tracking::credentials::{CredentialHasher, TokenIssuer};
use crate::tracking::dashboard::DashboardService;
use crate::tracking::domain::{
    AccountId, ApplicationRequest, InterviewRoundRequest, RegisterRequest,
};
use crate::tracking::identity::IdentityService;
use crate::tracking::interviews::InterviewService;
use crate::tracking::router::TrackingServices;
use crate::tracking::store::InMemoryTrackingStore;

pub(super) const STRONG_PASSWORD: &str = "Str0ng!Pass";
pub(super) const TOKEN_SECRET: &str = "test-signing-secret";

/// Clock pinned to a settable instant.
pub(super) struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub(super) fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub(super) fn advance(&self, by: Duration) {
        let mut guard = self.now.lock().expect("clock mutex poisoned");
        *guard += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().expect("clock mutex poisoned")
    }
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn fixed_clock() -> Arc<FixedClock> {
    let now = Utc
        .with_ymd_and_hms(2025, 6, 15, 12, 0, 0)
        .single()
        .expect("valid instant");
    Arc::new(FixedClock::at(now))
}

/// Cheap argon2 parameters keep the suite fast.
pub(super) fn test_hasher() -> CredentialHasher {
    CredentialHasher::with_cost(1024, 1, 1).expect("valid argon2 parameters")
}

pub(super) struct Harness {
    pub(super) store: Arc<InMemoryTrackingStore>,
    pub(super) clock: Arc<FixedClock>,
    pub(super) identity: IdentityService<InMemoryTrackingStore>,
    pub(super) applications: ApplicationService<InMemoryTrackingStore>,
    pub(super) interviews: InterviewService<InMemoryTrackingStore>,
    pub(super) dashboard: DashboardService<InMemoryTrackingStore>,
}

pub(super) fn harness() -> Harness {
    let store = Arc::new(InMemoryTrackingStore::new());
    let clock = fixed_clock();
    Harness {
        identity: IdentityService::new(store.clone(), test_hasher(), clock.clone()),
        applications: ApplicationService::new(store.clone(), clock.clone()),
        interviews: InterviewService::new(store.clone()),
        dashboard: DashboardService::new(store.clone()),
        store,
        clock,
    }
}

pub(super) fn register_request(email: &str) -> RegisterRequest {
    RegisterRequest {
        email: email.to_string(),
        password: STRONG_PASSWORD.to_string(),
        confirm_password: STRONG_PASSWORD.to_string(),
    }
}

impl Harness {
    pub(super) fn register(&self, email: &str) -> AccountId {
        self.identity
            .register(register_request(email))
            .expect("registration succeeds")
            .id
    }
}

pub(super) fn application_request(
    company: &str,
    status: &str,
    applied_date: NaiveDate,
) -> ApplicationRequest {
    ApplicationRequest {
        company_name: company.to_string(),
        job_role: "Engineer".to_string(),
        status: status.to_string(),
        applied_date,
    }
}

pub(super) fn round_request(
    round_type: &str,
    interview_date: NaiveDate,
    result: &str,
) -> InterviewRoundRequest {
    InterviewRoundRequest {
        round_type: round_type.to_string(),
        interview_date,
        notes: None,
        result: result.to_string(),
    }
}

pub(super) fn test_services() -> TrackingServices<InMemoryTrackingStore> {
    TrackingServices::new(
        Arc::new(InMemoryTrackingStore::new()),
        test_hasher(),
        TokenIssuer::new(TOKEN_SECRET, 3600),
        fixed_clock(),
    )
}

pub(super) fn json_request(
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .expect("request"),
        None => builder.body(Body::empty()).expect("request"),
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
