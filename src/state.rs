//! Shared application state for all routes.

use crate::config::UserDeletePolicy;
use crate::store::DocumentStore;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn DocumentStore>,
    pub user_delete_policy: UserDeletePolicy,
}

impl AppState {
    pub fn new(store: Arc<dyn DocumentStore>, user_delete_policy: UserDeletePolicy) -> Self {
        AppState {
            store,
            user_delete_policy,
        }
    }
}
