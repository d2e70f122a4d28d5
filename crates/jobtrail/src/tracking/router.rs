use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRef, FromRequest, FromRequestParts, Path, Query, Request, State},
    http::{header, request::Parts, Method, StatusCode, Uri},
    middleware::{self, Next},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{error, info};

use super::applications::ApplicationService;
use super::clock::Clock;
use super::credentials::{CredentialHasher, TokenIssuer};
use super::dashboard::DashboardService;
use super::domain::{
    AccountId, AccountView, ApplicationId, ApplicationRequest, ApplicationView, DashboardStats,
    IdentityAssertion, InterviewId, InterviewRoundRequest, InterviewRoundView, LoginRequest, Page,
    PageRequest, RegisterRequest, Role,
};
use super::error::TrackingError;
use super::identity::IdentityService;
use super::interviews::InterviewService;
use super::repository::TrackingStore;

/// Shared handles for every tracking handler.
pub struct TrackingServices<R> {
    pub identity: Arc<IdentityService<R>>,
    pub applications: Arc<ApplicationService<R>>,
    pub interviews: Arc<InterviewService<R>>,
    pub dashboard: Arc<DashboardService<R>>,
    pub tokens: Arc<TokenIssuer>,
}

impl<R> Clone for TrackingServices<R> {
    fn clone(&self) -> Self {
        Self {
            identity: self.identity.clone(),
            applications: self.applications.clone(),
            interviews: self.interviews.clone(),
            dashboard: self.dashboard.clone(),
            tokens: self.tokens.clone(),
        }
    }
}

impl<R> TrackingServices<R>
where
    R: TrackingStore + 'static,
{
    pub fn new(
        store: Arc<R>,
        hasher: CredentialHasher,
        tokens: TokenIssuer,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            identity: Arc::new(IdentityService::new(store.clone(), hasher, clock.clone())),
            applications: Arc::new(ApplicationService::new(store.clone(), clock)),
            interviews: Arc::new(InterviewService::new(store.clone())),
            dashboard: Arc::new(DashboardService::new(store)),
            tokens: Arc::new(tokens),
        }
    }
}

impl<R> FromRef<TrackingServices<R>> for Arc<TokenIssuer> {
    fn from_ref(services: &TrackingServices<R>) -> Self {
        services.tokens.clone()
    }
}

/// Router builder exposing the authentication, application, interview and dashboard endpoints.
pub fn tracking_router<R>(services: TrackingServices<R>) -> Router
where
    R: TrackingStore + 'static,
{
    Router::new()
        .route("/api/v1/auth/register", post(register_handler::<R>))
        .route("/api/v1/auth/login", post(login_handler::<R>))
        .route(
            "/api/v1/applications",
            post(create_application_handler::<R>).get(list_applications_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id",
            get(get_application_handler::<R>)
                .put(update_application_handler::<R>)
                .delete(delete_application_handler::<R>),
        )
        .route(
            "/api/v1/applications/:application_id/interviews",
            post(add_interview_handler::<R>).get(list_interviews_handler::<R>),
        )
        .route(
            "/api/v1/interviews/:interview_id",
            get(get_interview_handler::<R>)
                .put(update_interview_handler::<R>)
                .delete(delete_interview_handler::<R>),
        )
        .route("/api/v1/dashboard/stats", get(dashboard_handler::<R>))
        .method_not_allowed_fallback(unsupported_method)
        .fallback(unknown_route)
        .layer(middleware::from_fn(stamp_error_path))
        .with_state(services)
}

/// Structured error body. `path` is filled in by [`stamp_error_path`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub timestamp: DateTime<Utc>,
    pub status: u16,
    pub error: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl TrackingError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            TrackingError::Validation(_) => StatusCode::BAD_REQUEST,
            TrackingError::Conflict(_) => StatusCode::CONFLICT,
            TrackingError::NotFound(_) => StatusCode::NOT_FOUND,
            TrackingError::Forbidden(_) => StatusCode::FORBIDDEN,
            TrackingError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            TrackingError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            TrackingError::Repository(_) | TrackingError::Credential(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for TrackingError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            TrackingError::Repository(_) | TrackingError::Credential(_) => {
                error!(error = %self, "request failed");
                "An internal error occurred".to_string()
            }
            _ => self.to_string(),
        };

        let payload = ErrorPayload {
            timestamp: Utc::now(),
            status: status.as_u16(),
            error: self.category().to_string(),
            message,
            path: None,
        };

        let mut response = (status, Json(payload.clone())).into_response();
        response.extensions_mut().insert(payload);
        response
    }
}

/// Re-renders error payloads with the request path once the handler has finished.
pub(crate) async fn stamp_error_path(request: Request, next: Next) -> Response {
    let path = request.uri().path().to_string();
    let mut response = next.run(request).await;

    match response.extensions_mut().remove::<ErrorPayload>() {
        Some(mut payload) => {
            payload.path = Some(path);
            (response.status(), Json(payload)).into_response()
        }
        None => response,
    }
}

/// JSON body extractor whose rejections use the tracking error payload.
pub struct ApiJson<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for ApiJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = TrackingError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(TrackingError::validation(rejection.body_text())),
        }
    }
}

/// Path parameters; unparsable segments become validation errors.
pub struct ApiPath<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiPath<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = TrackingError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Path::<T>::from_request_parts(parts, state).await {
            Ok(Path(value)) => Ok(Self(value)),
            Err(rejection) => Err(TrackingError::validation(rejection.body_text())),
        }
    }
}

/// Query string extractor with the same rejection shape as [`ApiJson`].
pub struct ApiQuery<T>(pub T);

#[async_trait]
impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = TrackingError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::from_request_parts(parts, state).await {
            Ok(Query(value)) => Ok(Self(value)),
            Err(rejection) => Err(TrackingError::validation(rejection.body_text())),
        }
    }
}

async fn unknown_route(uri: Uri) -> TrackingError {
    TrackingError::not_found(format!("No endpoint at {}", uri.path()))
}

async fn unsupported_method(method: Method, uri: Uri) -> TrackingError {
    TrackingError::MethodNotAllowed(format!("{method} is not supported on {}", uri.path()))
}

/// Caller identity resolved from the `Authorization: Bearer` header.
#[derive(Debug, Clone)]
pub struct AuthenticatedAccount(pub IdentityAssertion);

impl AuthenticatedAccount {
    pub fn account_id(&self) -> AccountId {
        self.0.account_id
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthenticatedAccount
where
    Arc<TokenIssuer>: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = TrackingError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let header_value = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| TrackingError::unauthorized("Missing Authorization header"))?;

        let token = header_value
            .strip_prefix("Bearer ")
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| TrackingError::unauthorized("Authorization must use a Bearer token"))?;

        let tokens = Arc::<TokenIssuer>::from_ref(state);
        tokens.verify(token).map(Self)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub token_type: String,
    pub expires_at: DateTime<Utc>,
    pub user_id: AccountId,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub page: Option<usize>,
    pub size: Option<usize>,
}

pub(crate) async fn register_handler<R>(
    State(services): State<TrackingServices<R>>,
    ApiJson(request): ApiJson<RegisterRequest>,
) -> Result<(StatusCode, Json<AccountView>), TrackingError>
where
    R: TrackingStore + 'static,
{
    let account = services.identity.register(request)?;
    Ok((StatusCode::CREATED, Json(account)))
}

pub(crate) async fn login_handler<R>(
    State(services): State<TrackingServices<R>>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> Result<Json<LoginResponse>, TrackingError>
where
    R: TrackingStore + 'static,
{
    let identity = services.identity.login(request)?;
    let issued = services.tokens.issue(&identity)?;
    info!(
        account_id = %identity.account_id,
        expires_at = %issued.expires_at,
        "bearer token issued"
    );

    Ok(Json(LoginResponse {
        token: issued.token,
        token_type: "Bearer".to_string(),
        expires_at: issued.expires_at,
        user_id: identity.account_id,
        email: identity.email,
        role: identity.role,
    }))
}

pub(crate) async fn create_application_handler<R>(
    State(services): State<TrackingServices<R>>,
    caller: AuthenticatedAccount,
    ApiJson(request): ApiJson<ApplicationRequest>,
) -> Result<(StatusCode, Json<ApplicationView>), TrackingError>
where
    R: TrackingStore + 'static,
{
    let view = services.applications.create(request, caller.account_id())?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub(crate) async fn list_applications_handler<R>(
    State(services): State<TrackingServices<R>>,
    caller: AuthenticatedAccount,
    ApiQuery(params): ApiQuery<PageParams>,
) -> Result<Json<Page<ApplicationView>>, TrackingError>
where
    R: TrackingStore + 'static,
{
    let page = PageRequest::new(params.page, params.size);
    let views = services.applications.list(caller.account_id(), page)?;
    Ok(Json(views))
}

pub(crate) async fn get_application_handler<R>(
    State(services): State<TrackingServices<R>>,
    caller: AuthenticatedAccount,
    ApiPath(application_id): ApiPath<u64>,
) -> Result<Json<ApplicationView>, TrackingError>
where
    R: TrackingStore + 'static,
{
    let view = services
        .applications
        .get(ApplicationId(application_id), caller.account_id())?;
    Ok(Json(view))
}

pub(crate) async fn update_application_handler<R>(
    State(services): State<TrackingServices<R>>,
    caller: AuthenticatedAccount,
    ApiPath(application_id): ApiPath<u64>,
    ApiJson(request): ApiJson<ApplicationRequest>,
) -> Result<Json<ApplicationView>, TrackingError>
where
    R: TrackingStore + 'static,
{
    let view = services.applications.update(
        ApplicationId(application_id),
        request,
        caller.account_id(),
    )?;
    Ok(Json(view))
}

pub(crate) async fn delete_application_handler<R>(
    State(services): State<TrackingServices<R>>,
    caller: AuthenticatedAccount,
    ApiPath(application_id): ApiPath<u64>,
) -> Result<StatusCode, TrackingError>
where
    R: TrackingStore + 'static,
{
    services
        .applications
        .delete(ApplicationId(application_id), caller.account_id())?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn add_interview_handler<R>(
    State(services): State<TrackingServices<R>>,
    caller: AuthenticatedAccount,
    ApiPath(application_id): ApiPath<u64>,
    ApiJson(request): ApiJson<InterviewRoundRequest>,
) -> Result<(StatusCode, Json<InterviewRoundView>), TrackingError>
where
    R: TrackingStore + 'static,
{
    let view = services.interviews.add(
        ApplicationId(application_id),
        request,
        caller.account_id(),
    )?;
    Ok((StatusCode::CREATED, Json(view)))
}

pub(crate) async fn list_interviews_handler<R>(
    State(services): State<TrackingServices<R>>,
    caller: AuthenticatedAccount,
    ApiPath(application_id): ApiPath<u64>,
) -> Result<Json<Vec<InterviewRoundView>>, TrackingError>
where
    R: TrackingStore + 'static,
{
    let views = services
        .interviews
        .list_by_application(ApplicationId(application_id), caller.account_id())?;
    Ok(Json(views))
}

pub(crate) async fn get_interview_handler<R>(
    State(services): State<TrackingServices<R>>,
    caller: AuthenticatedAccount,
    ApiPath(interview_id): ApiPath<u64>,
) -> Result<Json<InterviewRoundView>, TrackingError>
where
    R: TrackingStore + 'static,
{
    let view = services
        .interviews
        .get(InterviewId(interview_id), caller.account_id())?;
    Ok(Json(view))
}

pub(crate) async fn update_interview_handler<R>(
    State(services): State<TrackingServices<R>>,
    caller: AuthenticatedAccount,
    ApiPath(interview_id): ApiPath<u64>,
    ApiJson(request): ApiJson<InterviewRoundRequest>,
) -> Result<Json<InterviewRoundView>, TrackingError>
where
    R: TrackingStore + 'static,
{
    let view = services.interviews.update(
        InterviewId(interview_id),
        request,
        caller.account_id(),
    )?;
    Ok(Json(view))
}

pub(crate) async fn delete_interview_handler<R>(
    State(services): State<TrackingServices<R>>,
    caller: AuthenticatedAccount,
    ApiPath(interview_id): ApiPath<u64>,
) -> Result<StatusCode, TrackingError>
where
    R: TrackingStore + 'static,
{
    services
        .interviews
        .delete(InterviewId(interview_id), caller.account_id())?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn dashboard_handler<R>(
    State(services): State<TrackingServices<R>>,
    caller: AuthenticatedAccount,
) -> Result<Json<DashboardStats>, TrackingError>
where
    R: TrackingStore + 'static,
{
    let stats = services.dashboard.dashboard(caller.account_id())?;
    Ok(Json(stats))
}
