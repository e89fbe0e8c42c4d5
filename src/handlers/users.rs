//! User handlers: create, list, update, delete.

use super::parse_id;
use crate::error::{AppError, ErrorBody};
use crate::model::{NewUser, User, UserPatch};
use crate::response::{created, ok, text};
use crate::service::UserService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    post,
    path = "/users",
    tag = "users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created", body = User),
        (status = 422, description = "Malformed body", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<NewUser>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let Json(body) = payload?;
    let user = UserService::create(state.store.as_ref(), &body).await?;
    Ok(created(user))
}

#[utoipa::path(
    get,
    path = "/users",
    tag = "users",
    responses(
        (status = 200, description = "Every user", body = [User]),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn list_users(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let users = UserService::list(state.store.as_ref()).await?;
    Ok(ok(users))
}

#[utoipa::path(
    put,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    request_body = UserPatch,
    responses(
        (status = 200, description = "User after the update", body = User),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody),
        (status = 422, description = "Malformed body", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn update_user(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    payload: Result<Json<UserPatch>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let Json(patch) = payload?;
    let user = UserService::update(state.store.as_ref(), id, &patch).await?;
    Ok(ok(user))
}

#[utoipa::path(
    delete,
    path = "/users/{id}",
    tag = "users",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User deleted", body = String, content_type = "text/plain"),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    UserService::delete(state.store.as_ref(), id, state.user_delete_policy).await?;
    Ok(text("User deleted"))
}
