//! Project handlers, both nested under a user and addressed directly by id.

use super::parse_id;
use crate::error::{AppError, ErrorBody};
use crate::model::{NewProject, Project, ProjectPatch};
use crate::response::{created, ok, text};
use crate::service::ProjectService;
use crate::state::AppState;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    response::IntoResponse,
    Json,
};

#[utoipa::path(
    get,
    path = "/users/{id}/projects",
    tag = "projects",
    params(("id" = String, Path, description = "Owning user id")),
    responses(
        (status = 200, description = "Projects owned by the user, possibly none", body = [Project]),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn list_user_projects(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_id(&user_id)?;
    let projects = ProjectService::list_for_user(state.store.as_ref(), user_id).await?;
    Ok(ok(projects))
}

#[utoipa::path(
    get,
    path = "/users/{id}/projects/{project_id}",
    tag = "projects",
    params(
        ("id" = String, Path, description = "Owning user id"),
        ("project_id" = String, Path, description = "Project id")
    ),
    responses(
        (status = 200, description = "The project", body = Project),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "No project with that id belongs to the user", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn get_user_project(
    State(state): State<AppState>,
    Path((user_id, project_id)): Path<(String, String)>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_id(&user_id)?;
    let project_id = parse_id(&project_id)?;
    let project = ProjectService::get_for_user(state.store.as_ref(), user_id, project_id).await?;
    Ok(ok(project))
}

#[utoipa::path(
    post,
    path = "/users/{id}/projects",
    tag = "projects",
    params(("id" = String, Path, description = "Owning user id")),
    request_body = NewProject,
    responses(
        (status = 201, description = "Project created under the user", body = Project),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "No such user", body = ErrorBody),
        (status = 422, description = "Missing or blank field", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn create_project(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    payload: Result<Json<NewProject>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let user_id = parse_id(&user_id)?;
    let Json(body) = payload?;
    let project = ProjectService::create(state.store.as_ref(), user_id, &body).await?;
    Ok(created(project))
}

#[utoipa::path(
    get,
    path = "/projects/{id}",
    tag = "projects",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "The project", body = Project),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "No such project", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn get_project(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let project = ProjectService::get(state.store.as_ref(), id).await?;
    Ok(ok(project))
}

#[utoipa::path(
    put,
    path = "/projects/{id}",
    tag = "projects",
    params(("id" = String, Path, description = "Project id")),
    request_body = ProjectPatch,
    responses(
        (status = 200, description = "Project after the update", body = Project),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "No such project", body = ErrorBody),
        (status = 422, description = "Malformed body or blank field", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn update_project(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
    payload: Result<Json<ProjectPatch>, JsonRejection>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    let Json(patch) = payload?;
    let project = ProjectService::update(state.store.as_ref(), id, &patch).await?;
    Ok(ok(project))
}

#[utoipa::path(
    delete,
    path = "/projects/{id}",
    tag = "projects",
    params(("id" = String, Path, description = "Project id")),
    responses(
        (status = 200, description = "Project deleted", body = String, content_type = "text/plain"),
        (status = 400, description = "Malformed id", body = ErrorBody),
        (status = 404, description = "No such project", body = ErrorBody),
        (status = 500, description = "Store failure", body = ErrorBody)
    )
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Path(id_str): Path<String>,
) -> Result<impl IntoResponse, AppError> {
    let id = parse_id(&id_str)?;
    ProjectService::delete(state.store.as_ref(), id).await?;
    Ok(text("Project deleted"))
}
