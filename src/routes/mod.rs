// Route exports
pub mod groups;
pub mod health;
pub mod help;
pub mod users;

use actix_web::web;
use std::sync::Arc;

use crate::core::Matcher;
use crate::services::Store;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn Store>,
    pub matcher: Matcher,
}

impl AppState {
    pub fn new(store: Arc<dyn Store>, matcher: Matcher) -> Self {
        Self { store, matcher }
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::configure)
            .configure(users::configure)
            .configure(groups::configure)
            .configure(help::configure),
    );
}
