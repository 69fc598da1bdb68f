use axum::{
    extract::{DefaultBodyLimit, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    routing::{get, post},
    Json, Router,
};
use tracing::instrument;

use super::dto::{ListUsersRequest, PublicUser, UserId, UserInput, UserList, UserUpdate};
use crate::{
    error::{ServiceError, ServiceResult},
    extract::{ApiJson, ApiPath, ApiQuery},
    state::AppState,
};

/// Request bodies above this size are rejected.
pub const MAX_BODY_BYTES: usize = 1024 * 1024;

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/:id",
            get(get_user).put(update_user).delete(delete_user),
        )
        .route("/users/:id/block", post(block_user))
        .route("/users/:id/unblock", post(unblock_user))
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
}

#[instrument(skip(state))]
pub async fn list_users(
    State(state): State<AppState>,
    ApiQuery(req): ApiQuery<ListUsersRequest>,
) -> ServiceResult<Json<UserList>> {
    state.users.list_users(req).await.map(Json)
}

#[instrument(skip(state))]
pub async fn get_user(
    State(state): State<AppState>,
    ApiPath(UserId { id }): ApiPath<UserId>,
) -> ServiceResult<Json<PublicUser>> {
    state.users.get_user(id).await.map(Json)
}

#[instrument(skip(state, payload))]
pub async fn create_user(
    State(state): State<AppState>,
    ApiJson(payload): ApiJson<UserInput>,
) -> ServiceResult<(StatusCode, HeaderMap, Json<PublicUser>)> {
    let user = state.users.create_user(payload).await?;

    let mut headers = HeaderMap::new();
    if let Ok(location) = HeaderValue::from_str(&format!("/users/{}", user.id)) {
        headers.insert(header::LOCATION, location);
    }
    Ok((StatusCode::CREATED, headers, Json(user)))
}

#[instrument(skip(state, payload))]
pub async fn update_user(
    State(state): State<AppState>,
    ApiPath(UserId { id }): ApiPath<UserId>,
    ApiJson(mut payload): ApiJson<UserUpdate>,
) -> ServiceResult<Json<PublicUser>> {
    // body id is optional; when given it has to agree with the path
    if payload.id != 0 && payload.id != id {
        return Err(ServiceError::invalid_argument(format!(
            "body id {} does not match path id {}",
            payload.id, id
        )));
    }
    payload.id = id;
    state.users.update_user(payload).await.map(Json)
}

#[instrument(skip(state))]
pub async fn delete_user(
    State(state): State<AppState>,
    ApiPath(UserId { id }): ApiPath<UserId>,
) -> ServiceResult<StatusCode> {
    state.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn block_user(
    State(state): State<AppState>,
    ApiPath(UserId { id }): ApiPath<UserId>,
) -> ServiceResult<StatusCode> {
    state.users.block_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn unblock_user(
    State(state): State<AppState>,
    ApiPath(UserId { id }): ApiPath<UserId>,
) -> ServiceResult<StatusCode> {
    state.users.unblock_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
