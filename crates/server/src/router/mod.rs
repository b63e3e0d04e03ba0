//! # API Router Configuration
//!
//! Route table for the DevCollab API. Extractor plumbing stays here; the
//! handlers in [`crate::handlers`] take plain values.
//!
//! Layering, outermost first: request id, CORS, security headers, then for
//! `/api` the storage gate and, on everything but register and login, bearer
//! authentication.

use axum::{
    Json,
    Router,
    extract::{
        DefaultBodyLimit,
        Extension,
        Path,
        State as AxumState,
        rejection::{JsonRejection, PathRejection},
    },
    http::StatusCode,
    middleware,
    response::Response,
    routing::{get, post},
};
use error::{AppError, MessageResponse, Result};
use uuid::Uuid;

use crate::{
    AppState,
    dto::{
        auth::{AuthResponse, LoginRequest, RegisterRequest},
        files::{FileResponse, UploadFileRequest},
        messages::{ChatMessageResponse, SendMessageRequest},
        projects::{AddMemberRequest, CreateProjectRequest, ProjectOverviewResponse, ProjectResponse, UpdateProjectRequest},
        tasks::{CreateTaskRequest, TaskResponse, UpdateTaskRequest},
        users::ProfileResponse,
    },
    handlers,
    middleware::{
        auth::{AuthenticatedUser, auth_middleware},
        request_id::request_id_middleware,
        require_db::require_db_middleware,
        security_headers::{CorsConfig, cors_middleware, security_headers_middleware},
    },
};

/// Largest accepted request body: a 3 MiB upload once base64-encoded, plus
/// room for the surrounding JSON.
pub const MAX_REQUEST_BODY_BYTES: usize = 5 * 1024 * 1024;

type JsonBody<T> = std::result::Result<Json<T>, JsonRejection>;
type IdParam = std::result::Result<Path<Uuid>, PathRejection>;

fn body<T>(payload: JsonBody<T>) -> Result<T> {
    payload
        .map(|Json(value)| value)
        .map_err(error::rejection::json_rejection)
}

fn id(param: IdParam) -> Result<Uuid> {
    param
        .map(|Path(value)| value)
        .map_err(error::rejection::path_rejection)
}

/// Creates the `/api` router
pub fn create_router(state: AppState) -> Router {
    let protected_routes = Router::new()
        .route("/api/auth/profile", get(profile_handler))
        .route(
            "/api/projects",
            get(list_projects_handler).post(create_project_handler),
        )
        .route(
            "/api/projects/:id",
            get(get_project_handler)
                .put(update_project_handler)
                .delete(delete_project_handler),
        )
        .route("/api/projects/:id/members", post(add_member_handler))
        .route("/api/projects/:id/overview", get(project_overview_handler))
        .route("/api/tasks", post(create_task_handler))
        .route("/api/tasks/project/:id", get(list_tasks_handler))
        .route(
            "/api/tasks/:id",
            axum::routing::put(update_task_handler).delete(delete_task_handler),
        )
        .route(
            "/api/messages/project/:id",
            get(list_messages_handler).post(send_message_handler),
        )
        .route(
            "/api/files/project/:id",
            get(list_files_handler).post(upload_file_handler),
        )
        .route("/api/files/:id/download", get(download_file_handler))
        .route("/api/files/:id", axum::routing::delete(delete_file_handler))
        .route("/api/analytics/overview", get(overview_analytics_handler))
        .route(
            "/api/analytics/project/:id",
            get(project_analytics_handler),
        )
        .route("/api/users/me/profile", get(my_profile_handler))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    let public_routes = Router::new()
        .route("/api/auth/register", post(register_handler))
        .route("/api/auth/login", post(login_handler));

    public_routes
        .merge(protected_routes)
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_db_middleware,
        ))
        .layer(DefaultBodyLimit::max(MAX_REQUEST_BODY_BYTES))
        .with_state(state)
}

/// Creates the health check router
pub fn create_health_router() -> Router {
    Router::new()
        .route("/health", get(|| async { "OK" }))
        .route(
            "/",
            get(|| async { Json(MessageResponse::new("DevCollab API is running")) }),
        )
}

/// Creates the main application router with CORS origins from the environment
pub fn create_app_router(state: AppState) -> Router { create_app_router_with_cors(state, CorsConfig::from_env()) }

/// Creates the main application router
pub fn create_app_router_with_cors(state: AppState, cors: CorsConfig) -> Router {
    Router::new()
        .merge(create_health_router())
        .merge(create_router(state))
        .fallback(|| async { AppError::not_found("Route not found") })
        .layer(middleware::from_fn(security_headers_middleware))
        .layer(middleware::from_fn(move |req, next| {
            cors_middleware(req, next, cors.clone())
        }))
        .layer(middleware::from_fn(request_id_middleware))
}

async fn register_handler(
    AxumState(state): AxumState<AppState>,
    payload: JsonBody<RegisterRequest>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let response = handlers::auth::register_handler_inner(&state, body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn login_handler(
    AxumState(state): AxumState<AppState>,
    payload: JsonBody<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    Ok(Json(
        handlers::auth::login_handler_inner(&state, body(payload)?).await?,
    ))
}

async fn profile_handler(Extension(user): Extension<AuthenticatedUser>) -> Result<Json<AuthenticatedUser>> {
    handlers::auth::profile_handler_inner(user).await
}

async fn list_projects_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<Vec<ProjectResponse>>> {
    handlers::projects::list_projects_handler(&state, user).await
}

async fn create_project_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: JsonBody<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>)> {
    let project = handlers::projects::create_project_handler(&state, user, body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(project)))
}

async fn get_project_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    project_id: IdParam,
) -> Result<Json<ProjectResponse>> {
    handlers::projects::get_project_handler(&state, user, id(project_id)?).await
}

async fn update_project_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    project_id: IdParam,
    payload: JsonBody<UpdateProjectRequest>,
) -> Result<Json<ProjectResponse>> {
    handlers::projects::update_project_handler(&state, user, id(project_id)?, body(payload)?).await
}

async fn delete_project_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    project_id: IdParam,
) -> Result<Json<MessageResponse>> {
    handlers::projects::delete_project_handler(&state, user, id(project_id)?).await
}

async fn add_member_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    project_id: IdParam,
    payload: JsonBody<AddMemberRequest>,
) -> Result<Json<ProjectResponse>> {
    handlers::projects::add_member_handler(&state, user, id(project_id)?, body(payload)?).await
}

async fn project_overview_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    project_id: IdParam,
) -> Result<Json<ProjectOverviewResponse>> {
    handlers::projects::project_overview_handler(&state, user, id(project_id)?).await
}

async fn list_tasks_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    project_id: IdParam,
) -> Result<Json<Vec<TaskResponse>>> {
    handlers::tasks::list_tasks_handler(&state, user, id(project_id)?).await
}

async fn create_task_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    payload: JsonBody<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>)> {
    let task = handlers::tasks::create_task_handler(&state, user, body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

async fn update_task_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    task_id: IdParam,
    payload: JsonBody<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>> {
    handlers::tasks::update_task_handler(&state, user, id(task_id)?, body(payload)?).await
}

async fn delete_task_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    task_id: IdParam,
) -> Result<Json<MessageResponse>> {
    handlers::tasks::delete_task_handler(&state, user, id(task_id)?).await
}

async fn list_messages_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    project_id: IdParam,
) -> Result<Json<Vec<ChatMessageResponse>>> {
    handlers::messages::list_messages_handler(&state, user, id(project_id)?).await
}

async fn send_message_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    project_id: IdParam,
    payload: JsonBody<SendMessageRequest>,
) -> Result<(StatusCode, Json<ChatMessageResponse>)> {
    let message = handlers::messages::send_message_handler(&state, user, id(project_id)?, body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(message)))
}

async fn list_files_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    project_id: IdParam,
) -> Result<Json<Vec<FileResponse>>> {
    handlers::files::list_files_handler(&state, user, id(project_id)?).await
}

async fn upload_file_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    project_id: IdParam,
    payload: JsonBody<UploadFileRequest>,
) -> Result<(StatusCode, Json<FileResponse>)> {
    let file = handlers::files::upload_file_handler(&state, user, id(project_id)?, body(payload)?).await?;
    Ok((StatusCode::CREATED, Json(file)))
}

async fn download_file_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    file_id: IdParam,
) -> Result<Response> {
    handlers::files::download_file_handler(&state, user, id(file_id)?).await
}

async fn delete_file_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    file_id: IdParam,
) -> Result<Json<MessageResponse>> {
    handlers::files::delete_file_handler(&state, user, id(file_id)?).await
}

async fn project_analytics_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
    project_id: IdParam,
) -> Result<Json<analytics::ProjectAnalytics>> {
    handlers::analytics::project_analytics_handler(&state, user, id(project_id)?).await
}

async fn overview_analytics_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<analytics::PortfolioOverview>> {
    handlers::analytics::overview_analytics_handler(&state, user).await
}

async fn my_profile_handler(
    AxumState(state): AxumState<AppState>,
    Extension(user): Extension<AuthenticatedUser>,
) -> Result<Json<ProfileResponse>> {
    handlers::users::my_profile_handler(&state, user).await
}
