//! Controller logic between the HTTP handlers and the document store.

mod projects;
mod users;
mod validation;
pub use projects::ProjectService;
pub use users::UserService;
pub use validation::RequestValidator;
