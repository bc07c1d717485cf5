use std::sync::Arc;

use axum::{routing::get, Router};
use planner_core::PlannerConfig;
use planner_schedule::ScheduleEngine;
use planner_users::UserDirectory;

/// Central shared state — passed as Arc<AppState> to all Axum handlers.
pub struct AppState {
    pub config: PlannerConfig,
    pub users: UserDirectory,
    pub schedule: ScheduleEngine,
}

impl AppState {
    pub fn new(config: PlannerConfig, users: UserDirectory, schedule: ScheduleEngine) -> Self {
        Self {
            config,
            users,
            schedule,
        }
    }
}

/// Assemble the full Axum router.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/health", get(crate::http::health::health_handler))
        .route("/", get(crate::http::ui::root_redirect))
        .route("/static/index.html", get(crate::http::ui::ui_handler))
        .route(
            "/api/users",
            get(crate::http::users::list_users).post(crate::http::users::create_user),
        )
        .route(
            "/api/schedule",
            get(crate::http::schedule::read_schedule).put(crate::http::schedule::update_schedule),
        )
        .with_state(state)
        .layer(tower_http::trace::TraceLayer::new_for_http())
}
