//! Portfolio API: REST CRUD over users and the projects they own, backed by a document store.

pub mod config;
pub mod doc;
pub mod error;
pub mod handlers;
pub mod model;
pub mod response;
pub mod routes;
pub mod seed;
pub mod service;
pub mod state;
pub mod store;
pub mod telemetry;

pub use config::{AppConfig, UserDeletePolicy};
pub use error::{AppError, ConfigError, StoreError};
pub use routes::{api_routes, app, common_routes};
pub use state::AppState;
pub use store::{connect, DocumentStore, MemoryStore, PgStore};
