//! Document store holding the `users` and `projects` collections.
//!
//! Handlers never touch a backend directly: they receive an `Arc<dyn DocumentStore>` through
//! [`AppState`](crate::state::AppState). Each method is a single store operation; the only
//! multi-document write is [`DocumentStore::delete_projects_for_user`], used by the cascade policy.

mod memory;
mod postgres;

pub use memory::MemoryStore;
pub use postgres::{ensure_database_exists, PgStore};

use crate::config::{StoreBackend, StoreConfig};
use crate::error::StoreError;
use crate::model::{NewProject, NewUser, Project, ProjectPatch, User, UserPatch};
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert_user(&self, user: &NewUser) -> Result<User, StoreError>;
    async fn insert_users(&self, users: &[NewUser]) -> Result<Vec<User>, StoreError>;
    /// All users in insertion order.
    async fn list_users(&self) -> Result<Vec<User>, StoreError>;
    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;
    /// Merge `patch` into the user and return the post-update record, or `None` if no user has `id`.
    async fn update_user(&self, id: Uuid, patch: &UserPatch) -> Result<Option<User>, StoreError>;
    /// Remove the user and return what was removed. Projects are not touched.
    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, StoreError>;

    async fn insert_project(&self, user_id: Uuid, project: &NewProject) -> Result<Project, StoreError>;
    async fn insert_projects(&self, projects: &[(Uuid, NewProject)]) -> Result<Vec<Project>, StoreError>;
    async fn list_projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, StoreError>;
    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError>;
    async fn find_project_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Option<Project>, StoreError>;
    async fn update_project(&self, id: Uuid, patch: &ProjectPatch) -> Result<Option<Project>, StoreError>;
    async fn delete_project(&self, id: Uuid) -> Result<Option<Project>, StoreError>;
    /// Returns the number of projects removed.
    async fn delete_projects_for_user(&self, user_id: Uuid) -> Result<u64, StoreError>;

    /// Cheap round trip used by the `/ready` route.
    async fn ping(&self) -> Result<(), StoreError>;
    async fn close(&self);
}

/// Open the configured backend. For PostgreSQL the database and collection tables are created if missing.
pub async fn connect(config: &StoreConfig) -> Result<Arc<dyn DocumentStore>, StoreError> {
    match config.backend {
        StoreBackend::Memory => {
            tracing::info!("using in-memory document store");
            Ok(Arc::new(MemoryStore::new()))
        }
        StoreBackend::Postgres => {
            ensure_database_exists(&config.database_url).await?;
            let store = PgStore::connect(config).await?;
            tracing::info!(schema = %config.schema, "connected to postgres document store");
            Ok(Arc::new(store))
        }
    }
}
