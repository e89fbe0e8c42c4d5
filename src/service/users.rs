//! User operations: one store call each, plus the configured delete policy.

use crate::config::UserDeletePolicy;
use crate::error::AppError;
use crate::model::{NewUser, User, UserPatch};
use crate::store::DocumentStore;
use uuid::Uuid;

pub struct UserService;

impl UserService {
    pub async fn create(store: &dyn DocumentStore, body: &NewUser) -> Result<User, AppError> {
        let user = store.insert_user(body).await?;
        tracing::info!(user_id = %user.id, "user created");
        Ok(user)
    }

    pub async fn list(store: &dyn DocumentStore) -> Result<Vec<User>, AppError> {
        Ok(store.list_users().await?)
    }

    pub async fn update(store: &dyn DocumentStore, id: Uuid, patch: &UserPatch) -> Result<User, AppError> {
        store
            .update_user(id, patch)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))
    }

    /// Delete the user. Under [`UserDeletePolicy::Cascade`] the user's projects go too; otherwise they keep a dangling owner.
    pub async fn delete(
        store: &dyn DocumentStore,
        id: Uuid,
        policy: UserDeletePolicy,
    ) -> Result<(), AppError> {
        store
            .delete_user(id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".into()))?;
        match policy {
            UserDeletePolicy::Orphan => {
                tracing::info!(user_id = %id, "user deleted");
            }
            UserDeletePolicy::Cascade => {
                let removed = store.delete_projects_for_user(id).await?;
                tracing::info!(user_id = %id, projects_removed = removed, "user deleted with projects");
            }
        }
        Ok(())
    }
}
