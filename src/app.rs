use crate::handlers;
use crate::state::SharedState;
use axum::{
    routing::{get, patch, post, put},
    Router,
};

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", get(handlers::index))
        .route("/toggle/:id", post(handlers::toggle_habit_form))
        .route("/api/state", get(handlers::get_state))
        .route("/api/profile", get(handlers::get_profile))
        .route("/api/analytics", get(handlers::get_analytics))
        .route("/api/habits", post(handlers::add_habit))
        .route("/api/habits/order", put(handlers::reorder_habits))
        .route(
            "/api/habits/:id",
            put(handlers::edit_habit).delete(handlers::delete_habit),
        )
        .route("/api/habits/:id/toggle", post(handlers::toggle_habit))
        .route("/api/profiles", post(handlers::add_profile))
        .route("/api/profiles/active", put(handlers::set_active_profile))
        .route(
            "/api/profiles/:id",
            patch(handlers::update_profile).delete(handlers::delete_profile),
        )
        .with_state(state)
}
