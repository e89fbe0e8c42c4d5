//! OpenAPI document for the REST API, served at `/openapi.json`.
//!
//! Paths are listed relative to the API prefix (`/api` by default); the root liveness
//! route is always served at `/`.

use crate::error::{ErrorBody, ErrorDetail};
use crate::model::{NewProject, NewUser, Project, ProjectPatch, User, UserPatch};
use crate::routes::common::{BuildInfo, ServiceStatus};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Portfolio API",
        description = "CRUD over users and the portfolio projects they own."
    ),
    paths(
        crate::handlers::root,
        crate::routes::common::health,
        crate::routes::common::ready,
        crate::routes::common::version,
        crate::handlers::users::create_user,
        crate::handlers::users::list_users,
        crate::handlers::users::update_user,
        crate::handlers::users::delete_user,
        crate::handlers::projects::list_user_projects,
        crate::handlers::projects::get_user_project,
        crate::handlers::projects::create_project,
        crate::handlers::projects::get_project,
        crate::handlers::projects::update_project,
        crate::handlers::projects::delete_project,
    ),
    components(schemas(
        User,
        NewUser,
        UserPatch,
        Project,
        NewProject,
        ProjectPatch,
        ErrorBody,
        ErrorDetail,
        ServiceStatus,
        BuildInfo
    )),
    tags(
        (name = "users", description = "User records"),
        (name = "projects", description = "Projects and their owning user"),
        (name = "health", description = "Liveness, readiness and build info")
    )
)]
pub struct ApiDoc;
