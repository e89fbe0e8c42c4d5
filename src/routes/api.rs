//! CRUD routes for users and projects.
//!
//! Path parameters are positional, so `/users/:user_id/projects` and `/users/:id/projects`
//! are the same template; it is registered once as `/users/:id/projects`.

use crate::handlers::{
    create_project, create_user, delete_project, delete_user, get_project, get_user_project,
    list_user_projects, list_users, update_project, update_user,
};
use crate::state::AppState;
use axum::{
    routing::{get, post, put},
    Router,
};

pub fn api_routes(state: AppState) -> Router {
    Router::new()
        .route("/users", post(create_user).get(list_users))
        .route("/users/:id", put(update_user).delete(delete_user))
        .route("/users/:id/projects", get(list_user_projects).post(create_project))
        .route("/users/:id/projects/:project_id", get(get_user_project))
        .route(
            "/projects/:id",
            get(get_project).put(update_project).delete(delete_project),
        )
        .with_state(state)
}
