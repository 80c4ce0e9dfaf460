//! HTTP API for the voice banking dialogue

mod handlers;
mod types;

pub use handlers::create_router;
#[allow(unused_imports)] // Public API re-exports
pub use types::*;

use crate::session::DialogueService;
use std::sync::Arc;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub dialogue: Arc<DialogueService>,
}

impl AppState {
    pub fn new(dialogue: DialogueService) -> Self {
        Self {
            dialogue: Arc::new(dialogue),
        }
    }
}
