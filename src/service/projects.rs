//! Project operations, always addressed either by project id or through the owning user.

use crate::error::AppError;
use crate::model::{NewProject, Project, ProjectPatch};
use crate::service::RequestValidator;
use crate::store::DocumentStore;
use uuid::Uuid;

pub struct ProjectService;

impl ProjectService {
    /// Projects owned by `user_id`. An unknown user is a not-found; a known user with no projects yields an empty list.
    pub async fn list_for_user(store: &dyn DocumentStore, user_id: Uuid) -> Result<Vec<Project>, AppError> {
        if store.find_user(user_id).await?.is_none() {
            return Err(AppError::NotFound("User with the specified ID does not exist".into()));
        }
        Ok(store.list_projects_for_user(user_id).await?)
    }

    pub async fn get_for_user(
        store: &dyn DocumentStore,
        user_id: Uuid,
        project_id: Uuid,
    ) -> Result<Project, AppError> {
        store
            .find_project_for_user(user_id, project_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project with the specified ID does not exist".into()))
    }

    /// Create a project owned by `user_id`, which must name an existing user.
    pub async fn create(
        store: &dyn DocumentStore,
        user_id: Uuid,
        body: &NewProject,
    ) -> Result<Project, AppError> {
        RequestValidator::validate_new_project(body)?;
        let owner = store
            .find_user(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        let project = store.insert_project(owner.id, body).await?;
        tracing::info!(project_id = %project.id, user_id = %owner.id, "project created");
        Ok(project)
    }

    pub async fn get(store: &dyn DocumentStore, id: Uuid) -> Result<Project, AppError> {
        store
            .find_project(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    /// Patch a project. A new `user_id` is taken as given; the owner is not re-checked.
    pub async fn update(
        store: &dyn DocumentStore,
        id: Uuid,
        patch: &ProjectPatch,
    ) -> Result<Project, AppError> {
        RequestValidator::validate_project_patch(patch)?;
        store
            .update_project(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))
    }

    pub async fn delete(store: &dyn DocumentStore, id: Uuid) -> Result<(), AppError> {
        store
            .delete_project(id)
            .await?
            .ok_or_else(|| AppError::NotFound("Project not found".into()))?;
        tracing::info!(project_id = %id, "project deleted");
        Ok(())
    }
}
