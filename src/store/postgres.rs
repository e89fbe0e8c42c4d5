//! PostgreSQL-backed document store. Each collection is a table of JSONB documents keyed by a
//! store-assigned UUID; `projects` also keeps the owner in a plain indexed column (no foreign key).

use super::DocumentStore;
use crate::config::StoreConfig;
use crate::error::StoreError;
use crate::model::{NewProject, NewUser, Project, ProjectPatch, User, UserPatch};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::{ConnectOptions, PgConnection, PgPool};
use std::str::FromStr;
use uuid::Uuid;

type UserRow = (Uuid, Value, DateTime<Utc>, DateTime<Utc>);
type ProjectRow = (Uuid, Uuid, Value, DateTime<Utc>, DateTime<Utc>);

const USER_COLUMNS: &str = "id, doc, created_at, updated_at";
const PROJECT_COLUMNS: &str = "id, user_id, doc, created_at, updated_at";

pub struct PgStore {
    pool: PgPool,
    users: String,
    projects: String,
}

impl PgStore {
    pub async fn connect(config: &StoreConfig) -> Result<Self, StoreError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.database_url)
            .await?;
        let store = Self::with_pool(pool, &config.schema);
        store.ensure_collections(&config.schema).await?;
        Ok(store)
    }

    /// Wrap an existing pool. `schema` must already be a plain identifier.
    pub fn with_pool(pool: PgPool, schema: &str) -> Self {
        PgStore {
            pool,
            users: format!("{}.users", schema),
            projects: format!("{}.projects", schema),
        }
    }

    /// Create the schema and both collection tables if they do not exist.
    pub async fn ensure_collections(&self, schema: &str) -> Result<(), StoreError> {
        sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", schema))
            .execute(&self.pool)
            .await?;

        let users_ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                seq BIGSERIAL NOT NULL,
                doc JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.users
        );
        sqlx::query(&users_ddl).execute(&self.pool).await?;

        let projects_ddl = format!(
            r#"
            CREATE TABLE IF NOT EXISTS {} (
                id UUID PRIMARY KEY,
                seq BIGSERIAL NOT NULL,
                user_id UUID NOT NULL,
                doc JSONB NOT NULL,
                created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
            )
            "#,
            self.projects
        );
        sqlx::query(&projects_ddl).execute(&self.pool).await?;
        sqlx::query(&format!(
            "CREATE INDEX IF NOT EXISTS projects_user_id_idx ON {} (user_id)",
            self.projects
        ))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    async fn fetch_projects(&self, sql: &str, binds: &[Uuid]) -> Result<Vec<Project>, StoreError> {
        tracing::debug!(sql = %sql, params = ?binds, "query");
        let mut query = sqlx::query_as::<_, ProjectRow>(sql);
        for b in binds {
            query = query.bind(*b);
        }
        let rows = query.fetch_all(&self.pool).await?;
        rows.into_iter().map(project_from_row).collect()
    }

    async fn fetch_project(&self, sql: &str, binds: &[Uuid]) -> Result<Option<Project>, StoreError> {
        tracing::debug!(sql = %sql, params = ?binds, "query");
        let mut query = sqlx::query_as::<_, ProjectRow>(sql);
        for b in binds {
            query = query.bind(*b);
        }
        query
            .fetch_optional(&self.pool)
            .await?
            .map(project_from_row)
            .transpose()
    }

    async fn fetch_user(&self, sql: &str, id: Uuid) -> Result<Option<User>, StoreError> {
        tracing::debug!(sql = %sql, id = %id, "query");
        sqlx::query_as::<_, UserRow>(sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(user_from_row)
            .transpose()
    }
}

fn user_from_row((id, doc, created_at, updated_at): UserRow) -> Result<User, StoreError> {
    Ok(User::from_document(id, doc, created_at, updated_at)?)
}

fn project_from_row((id, user_id, doc, created_at, updated_at): ProjectRow) -> Result<Project, StoreError> {
    Ok(Project::from_document(id, user_id, doc, created_at, updated_at)?)
}

#[async_trait]
impl DocumentStore for PgStore {
    async fn insert_user(&self, user: &NewUser) -> Result<User, StoreError> {
        let sql = format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2) RETURNING {}",
            self.users, USER_COLUMNS
        );
        tracing::debug!(sql = %sql, "query");
        let row: UserRow = sqlx::query_as(&sql)
            .bind(Uuid::new_v4())
            .bind(serde_json::to_value(user)?)
            .fetch_one(&self.pool)
            .await?;
        user_from_row(row)
    }

    async fn insert_users(&self, users: &[NewUser]) -> Result<Vec<User>, StoreError> {
        let sql = format!(
            "INSERT INTO {} (id, doc) VALUES ($1, $2) RETURNING {}",
            self.users, USER_COLUMNS
        );
        tracing::debug!(sql = %sql, count = users.len(), "query (tx)");
        let mut out = Vec::with_capacity(users.len());
        let mut tx = self.pool.begin().await?;
        for user in users {
            let row: UserRow = sqlx::query_as(&sql)
                .bind(Uuid::new_v4())
                .bind(serde_json::to_value(user)?)
                .fetch_one(&mut *tx)
                .await?;
            out.push(user_from_row(row)?);
        }
        tx.commit().await?;
        Ok(out)
    }

    async fn list_users(&self) -> Result<Vec<User>, StoreError> {
        let sql = format!("SELECT {} FROM {} ORDER BY seq", USER_COLUMNS, self.users);
        tracing::debug!(sql = %sql, "query");
        let rows: Vec<UserRow> = sqlx::query_as(&sql).fetch_all(&self.pool).await?;
        rows.into_iter().map(user_from_row).collect()
    }

    async fn find_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", USER_COLUMNS, self.users);
        self.fetch_user(&sql, id).await
    }

    async fn update_user(&self, id: Uuid, patch: &UserPatch) -> Result<Option<User>, StoreError> {
        let sql = format!(
            "UPDATE {} SET doc = doc || $2, updated_at = NOW() WHERE id = $1 RETURNING {}",
            self.users, USER_COLUMNS
        );
        tracing::debug!(sql = %sql, id = %id, "query");
        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .bind(serde_json::to_value(patch)?)
            .fetch_optional(&self.pool)
            .await?
            .map(user_from_row)
            .transpose()
    }

    async fn delete_user(&self, id: Uuid) -> Result<Option<User>, StoreError> {
        let sql = format!("DELETE FROM {} WHERE id = $1 RETURNING {}", self.users, USER_COLUMNS);
        self.fetch_user(&sql, id).await
    }

    async fn insert_project(&self, user_id: Uuid, project: &NewProject) -> Result<Project, StoreError> {
        let sql = format!(
            "INSERT INTO {} (id, user_id, doc) VALUES ($1, $2, $3) RETURNING {}",
            self.projects, PROJECT_COLUMNS
        );
        tracing::debug!(sql = %sql, user_id = %user_id, "query");
        let row: ProjectRow = sqlx::query_as(&sql)
            .bind(Uuid::new_v4())
            .bind(user_id)
            .bind(serde_json::to_value(project)?)
            .fetch_one(&self.pool)
            .await?;
        project_from_row(row)
    }

    async fn insert_projects(&self, projects: &[(Uuid, NewProject)]) -> Result<Vec<Project>, StoreError> {
        let sql = format!(
            "INSERT INTO {} (id, user_id, doc) VALUES ($1, $2, $3) RETURNING {}",
            self.projects, PROJECT_COLUMNS
        );
        tracing::debug!(sql = %sql, count = projects.len(), "query (tx)");
        let mut out = Vec::with_capacity(projects.len());
        let mut tx = self.pool.begin().await?;
        for (user_id, project) in projects {
            let row: ProjectRow = sqlx::query_as(&sql)
                .bind(Uuid::new_v4())
                .bind(*user_id)
                .bind(serde_json::to_value(project)?)
                .fetch_one(&mut *tx)
                .await?;
            out.push(project_from_row(row)?);
        }
        tx.commit().await?;
        Ok(out)
    }

    async fn list_projects_for_user(&self, user_id: Uuid) -> Result<Vec<Project>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE user_id = $1 ORDER BY seq",
            PROJECT_COLUMNS, self.projects
        );
        self.fetch_projects(&sql, &[user_id]).await
    }

    async fn find_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let sql = format!("SELECT {} FROM {} WHERE id = $1", PROJECT_COLUMNS, self.projects);
        self.fetch_project(&sql, &[id]).await
    }

    async fn find_project_for_user(&self, user_id: Uuid, id: Uuid) -> Result<Option<Project>, StoreError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE user_id = $1 AND id = $2",
            PROJECT_COLUMNS, self.projects
        );
        self.fetch_project(&sql, &[user_id, id]).await
    }

    async fn update_project(&self, id: Uuid, patch: &ProjectPatch) -> Result<Option<Project>, StoreError> {
        let sql = format!(
            "UPDATE {} SET doc = doc || $2, user_id = COALESCE($3, user_id), updated_at = NOW() \
             WHERE id = $1 RETURNING {}",
            self.projects, PROJECT_COLUMNS
        );
        tracing::debug!(sql = %sql, id = %id, "query");
        sqlx::query_as::<_, ProjectRow>(&sql)
            .bind(id)
            .bind(patch.document_changes())
            .bind(patch.user_id)
            .fetch_optional(&self.pool)
            .await?
            .map(project_from_row)
            .transpose()
    }

    async fn delete_project(&self, id: Uuid) -> Result<Option<Project>, StoreError> {
        let sql = format!(
            "DELETE FROM {} WHERE id = $1 RETURNING {}",
            self.projects, PROJECT_COLUMNS
        );
        self.fetch_project(&sql, &[id]).await
    }

    async fn delete_projects_for_user(&self, user_id: Uuid) -> Result<u64, StoreError> {
        let sql = format!("DELETE FROM {} WHERE user_id = $1", self.projects);
        tracing::debug!(sql = %sql, user_id = %user_id, "query");
        let result = sqlx::query(&sql).bind(user_id).execute(&self.pool).await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        sqlx::query("SELECT 1").fetch_optional(&self.pool).await?;
        Ok(())
    }

    async fn close(&self) {
        self.pool.close().await;
    }
}

/// Create the database named in `database_url` if it is missing, through an admin session on
/// the `postgres` database. A URL without a database name leaves nothing to create.
pub async fn ensure_database_exists(database_url: &str) -> Result<(), StoreError> {
    let opts = parse_url(database_url)?;
    let Some(db_name) = target_database(&opts) else {
        return Ok(());
    };
    let mut conn: PgConnection = opts.database("postgres").connect().await?;
    let exists: (bool,) = sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
        .bind(&db_name)
        .fetch_one(&mut conn)
        .await?;
    if !exists.0 {
        tracing::info!(database = %db_name, "creating database");
        sqlx::query(&format!("CREATE DATABASE {}", quote_ident(&db_name)))
            .execute(&mut conn)
            .await?;
    }
    Ok(())
}

fn parse_url(database_url: &str) -> Result<PgConnectOptions, StoreError> {
    PgConnectOptions::from_str(database_url).map_err(|e| StoreError::InvalidUrl(e.to_string()))
}

/// The database to create, if any. `postgres` itself always exists.
fn target_database(opts: &PgConnectOptions) -> Option<String> {
    opts.get_database()
        .map(str::trim)
        .filter(|name| !name.is_empty() && *name != "postgres")
        .map(str::to_string)
}

fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}
