use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// A stored user. None of the name or email fields are required.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct User {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /users`; also the document persisted in the `users` collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct NewUser {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Body of `PUT /users/:id`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    pub fn new(id: Uuid, fields: &NewUser, now: DateTime<Utc>) -> Self {
        User {
            id,
            first_name: fields.first_name.clone(),
            last_name: fields.last_name.clone(),
            email: fields.email.clone(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Rebuild a user from its stored document and bookkeeping columns.
    pub fn from_document(
        id: Uuid,
        doc: serde_json::Value,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, serde_json::Error> {
        let fields: NewUser = serde_json::from_value(doc)?;
        Ok(User {
            id,
            first_name: fields.first_name,
            last_name: fields.last_name,
            email: fields.email,
            created_at,
            updated_at,
        })
    }

    pub fn apply(&mut self, patch: &UserPatch, now: DateTime<Utc>) {
        if let Some(v) = &patch.first_name {
            self.first_name = Some(v.clone());
        }
        if let Some(v) = &patch.last_name {
            self.last_name = Some(v.clone());
        }
        if let Some(v) = &patch.email {
            self.email = Some(v.clone());
        }
        self.updated_at = now;
    }
}
