//! Presence checks for request bodies. Formats (emails, URLs) are deliberately not checked.

use crate::error::AppError;
use crate::model::{NewProject, ProjectPatch};

pub struct RequestValidator;

impl RequestValidator {
    /// All project text fields are required and must not be blank.
    pub fn validate_new_project(body: &NewProject) -> Result<(), AppError> {
        require("title", &body.title)?;
        require("image_url", &body.image_url)?;
        require("description", &body.description)?;
        require("github_url", &body.github_url)?;
        require("deployed_url", &body.deployed_url)
    }

    /// Only the fields present in the patch are checked; a present required field must not be blank.
    pub fn validate_project_patch(body: &ProjectPatch) -> Result<(), AppError> {
        let fields = [
            ("title", &body.title),
            ("image_url", &body.image_url),
            ("description", &body.description),
            ("github_url", &body.github_url),
            ("deployed_url", &body.deployed_url),
        ];
        for (name, value) in fields {
            if let Some(v) = value {
                require(name, v)?;
            }
        }
        Ok(())
    }
}

fn require(field: &str, value: &str) -> Result<(), AppError> {
    if value.trim().is_empty() {
        return Err(AppError::Validation(format!("{} is required", field)));
    }
    Ok(())
}
