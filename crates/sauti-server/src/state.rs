//! Application state management

use sauti_core::Narrator;
use std::sync::Arc;

/// Shared application state. The narrator is immutable; every request
/// runs an independent invocation against it.
#[derive(Clone)]
pub struct AppState {
    pub narrator: Arc<Narrator>,
}

impl AppState {
    pub fn new(narrator: Narrator) -> Self {
        Self {
            narrator: Arc::new(narrator),
        }
    }
}
