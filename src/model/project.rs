use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored project. `user_id` points at the owning user but nothing enforces that the user still exists.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Project {
    #[serde(rename = "_id")]
    pub id: Uuid,
    pub title: String,
    pub image_url: String,
    pub description: String,
    pub github_url: String,
    pub deployed_url: String,
    pub user_id: Uuid,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /users/:id/projects`; also the document persisted in the `projects` collection.
/// The owner comes from the path, so a `user_id` in the body is ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewProject {
    pub title: String,
    pub image_url: String,
    pub description: String,
    pub github_url: String,
    pub deployed_url: String,
}

/// Body of `PUT /projects/:id`. Absent fields are left untouched; `user_id` re-points the project without checking the user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProjectPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deployed_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
}

impl Project {
    pub fn new(id: Uuid, user_id: Uuid, fields: &NewProject, now: DateTime<Utc>) -> Self {
        Project {
            id,
            title: fields.title.clone(),
            image_url: fields.image_url.clone(),
            description: fields.description.clone(),
            github_url: fields.github_url.clone(),
            deployed_url: fields.deployed_url.clone(),
            user_id,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn from_document(
        id: Uuid,
        user_id: Uuid,
        doc: serde_json::Value,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, serde_json::Error> {
        let fields: NewProject = serde_json::from_value(doc)?;
        let mut project = Project::new(id, user_id, &fields, created_at);
        project.updated_at = updated_at;
        Ok(project)
    }

    pub fn apply(&mut self, patch: &ProjectPatch, now: DateTime<Utc>) {
        let text_fields = [
            (&mut self.title, &patch.title),
            (&mut self.image_url, &patch.image_url),
            (&mut self.description, &patch.description),
            (&mut self.github_url, &patch.github_url),
            (&mut self.deployed_url, &patch.deployed_url),
        ];
        for (field, value) in text_fields {
            if let Some(v) = value {
                field.clone_from(v);
            }
        }
        if let Some(user_id) = patch.user_id {
            self.user_id = user_id;
        }
        self.updated_at = now;
    }
}

impl ProjectPatch {
    /// The text fields as a JSON object, ready to merge into a stored document.
    pub fn document_changes(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        let text_fields = [
            ("title", &self.title),
            ("image_url", &self.image_url),
            ("description", &self.description),
            ("github_url", &self.github_url),
            ("deployed_url", &self.deployed_url),
        ];
        for (key, value) in text_fields {
            if let Some(v) = value {
                map.insert(key.to_string(), serde_json::Value::String(v.clone()));
            }
        }
        serde_json::Value::Object(map)
    }
}
