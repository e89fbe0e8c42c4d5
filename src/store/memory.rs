//! In-process document store. Same semantics as the PostgreSQL backend; used by tests and `STORE_BACKEND=memory`.

use super::DocumentStore;
use crate::error::StoreError;
use crate::model::{NewProject, NewUser, Project, ProjectPatch, User, UserPatch};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    projects: Vec<Project>,
}

#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collections>, StoreError> {
        self.inner.read().map_err(|_| StoreError::Poisoned)
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collections>, StoreError> {
        self.inner.write().map_err(|_| StoreError::Poisoned)
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    async fn insert_user(&self, user: &NewUser) -> Result<User, StoreError> {
        let user = User::new(Uuid::new_v4(), user, Utc::now());
        self.write()?.users.push(user.clone());
        Ok(user)
    }

    async fn insert_users(&self, users: &[NewUser]) -> Result<Vec<User>, StoreError> {
        let now = Utc::now();
        let created: Vec<User> = users
            .iter()
            .map(|u| User::new(Uuid::new_v4(), u, now))
            .collect();
        self.write()?.users.extend(created.iter().cloned());
        Ok(created)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        Ok(self.read()?.users.clone())
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        Ok(self.read()?.users.iter().find(|u| u.id == id).cloned())
    }

    async fn update_user(&self, id: Uuid, patch: &UserPatch) -> Result<Option<User>, StoreError> {
        let mut guard = self.write()?;
        let Some(user) = guard.users.iter_mut().find(|u| u.id == id) else {
            return Ok(None);
        };
        user.apply(patch, Utc::now());
        Ok(Some(user.clone()))
    }

    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let mut guard = self.write()?;
        let idx = guard.users.iter().position(|u| u.id == id);
        Ok(idx.map(|i| guard.users.remove(i)))
    }

    async fn insert_project(&self, user_id: Uuid, project: &NewProject) -> Result<Project, StoreError> {
        let project = Project::new(Uuid::new_v4(), user_id, project, Utc::now());
        self.write()?.projects.push(project.clone());
        Ok(project)
    }

    async fn insert_projects(&self, projects: &[(Uuid, NewProject)]) -> Result<Vec<Project>, StoreError> {
        let now = Utc::now();
        let created: Vec<Project> = projects
            .iter()
            .map(|(user_id, p)| Project::new(Uuid::new_v4(), *user_id, p, now))
            .collect();
        self.write()?.projects.extend(created.iter().cloned());
        Ok(created)
    }

    async fn list_projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, StoreError> {
        Ok(self
            .read()?
            .projects
            .iter()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(self.read()?.projects.iter().find(|p| p.id == id).cloned())
    }

    async fn find_project_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Option<Project>, StoreError> {
        Ok(self
            .read()?
            .projects
            .iter()
            .find(|p| p.id == id && p.user_id == user_id)
            .cloned())
    }

    async fn update_project(&self, id: Uuid, patch: &ProjectPatch) -> Result<Option<Project>, StoreError> {
        let mut guard = self.write()?;
        let Some(project) = guard.projects.iter_mut().find(|p| p.id == id) else {
            return Ok(None);
        };
        project.apply(patch, Utc::now());
        Ok(Some(project.clone()))
    }

    async fn delete_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let mut guard = self.write()?;
        let idx = guard.projects.iter().position(|p| p.id == id);
        Ok(idx.map(|i| guard.projects.remove(i)))
    }

    async fn delete_projects_for_user(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let mut guard = self.write()?;
        let before = guard.projects.len();
        guard.projects.retain(|p| p.user_id != user_id);
        Ok((before - guard.projects.len()) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        self.read().map(|_| ())
    }

    async fn close(&self) {}
}
