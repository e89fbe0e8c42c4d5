//! HTTP handlers for users and their projects.

pub mod projects;
pub mod users;
pub use projects::*;
pub use users::*;

use crate::error::AppError;
use uuid::Uuid;

pub(crate) fn parse_id(id_str: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(id_str).map_err(|_| AppError::BadRequest(format!("invalid id '{}'", id_str)))
}

/// Liveness text served at `/`.
#[utoipa::path(
    get,
    path = "/",
    tag = "health",
    responses((status = 200, description = "Service is up", body = String, content_type = "text/plain"))
)]
pub async fn root() -> &'static str {
    "This is root!"
}
