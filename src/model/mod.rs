//! Records held in the `users` and `projects` collections, plus the request bodies that create and patch them.

mod project;
mod user;

pub use project::{NewProject, Project, ProjectPatch};
pub use user::{NewUser, User, UserPatch};
