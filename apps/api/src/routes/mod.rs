pub mod health;

use axum::{
    routing::{delete, get, patch, post, put},
    Router,
};

use crate::editor::handlers;
use crate::render::handlers as render_handlers;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        .route(
            "/api/v1/templates",
            get(render_handlers::handle_list_templates),
        )
        // Sessions
        .route("/api/v1/sessions", post(handlers::handle_create_session))
        .route(
            "/api/v1/sessions/:id",
            get(handlers::handle_get_session).delete(handlers::handle_delete_session),
        )
        // Document edits
        .route(
            "/api/v1/sessions/:id/personal-info",
            patch(handlers::handle_update_personal_info),
        )
        .route(
            "/api/v1/sessions/:id/sections",
            post(handlers::handle_add_section),
        )
        .route(
            "/api/v1/sessions/:id/sections/:section_id",
            patch(handlers::handle_rename_section).delete(handlers::handle_remove_section),
        )
        .route(
            "/api/v1/sessions/:id/sections/:section_id/content",
            put(handlers::handle_update_section_content),
        )
        .route(
            "/api/v1/sessions/:id/sections/:section_id/entries",
            post(handlers::handle_add_entry),
        )
        .route(
            "/api/v1/sessions/:id/sections/:section_id/entries/:entry_id",
            put(handlers::handle_update_entry).delete(handlers::handle_remove_entry),
        )
        .route("/api/v1/sessions/:id/skills", post(handlers::handle_add_skill))
        .route(
            "/api/v1/sessions/:id/skills/:skill",
            delete(handlers::handle_remove_skill),
        )
        .route("/api/v1/sessions/:id/reorder", post(handlers::handle_reorder))
        .route("/api/v1/sessions/:id/drag", post(handlers::handle_drag))
        .route(
            "/api/v1/sessions/:id/design",
            put(handlers::handle_update_design),
        )
        // Rendering
        .route(
            "/api/v1/sessions/:id/preview",
            get(render_handlers::handle_preview),
        )
        .route(
            "/api/v1/sessions/:id/export",
            get(render_handlers::handle_export),
        )
        .with_state(state)
}
