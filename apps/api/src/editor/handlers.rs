use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::editor::drag::GestureEvent;
use crate::editor::mutators::{
    add_entry, add_section, add_skill, remove_entry, remove_section, remove_skill,
    rename_section, reorder_sections, update_entry, update_personal_info,
    update_section_content,
};
use crate::editor::session::{DragView, SessionView};
use crate::errors::AppError;
use crate::models::resume::{Entry, SectionContent, SectionKind};
use crate::render::template::DesignUpdate;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct PersonalInfoChange {
    pub field: String,
    pub value: String,
}

#[derive(Deserialize)]
pub struct NewSection {
    pub kind: SectionKind,
    #[serde(default)]
    pub title: String,
}

#[derive(Deserialize)]
pub struct SectionRename {
    pub title: String,
}

#[derive(Deserialize)]
pub struct NewSkill {
    pub skill: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderRequest {
    pub source_index: usize,
    pub target_index: usize,
}

// ────────────────────────────────────────────────────────────────────────────
// Sessions
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let view = state.sessions.create().await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.view(id).await?))
}

/// DELETE /api/v1/sessions/:id
pub async fn handle_delete_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.remove(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ────────────────────────────────────────────────────────────────────────────
// Document edits
// ────────────────────────────────────────────────────────────────────────────

/// PATCH /api/v1/sessions/:id/personal-info
pub async fn handle_update_personal_info(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<PersonalInfoChange>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .apply(id, "update_personal_info", |doc| {
            update_personal_info(doc, &req.field, &req.value)
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/sections
pub async fn handle_add_section(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<NewSection>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let view = state
        .sessions
        .apply(id, "add_section", |doc| Ok(add_section(doc, req.kind, &req.title)))
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// PATCH /api/v1/sessions/:id/sections/:section_id
pub async fn handle_rename_section(
    State(state): State<AppState>,
    Path((id, section_id)): Path<(Uuid, String)>,
    Json(req): Json<SectionRename>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .apply(id, "rename_section", |doc| {
            rename_section(doc, &section_id, &req.title)
        })
        .await?;
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:id/sections/:section_id
pub async fn handle_remove_section(
    State(state): State<AppState>,
    Path((id, section_id)): Path<(Uuid, String)>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .apply(id, "remove_section", |doc| remove_section(doc, &section_id))
        .await?;
    Ok(Json(view))
}

/// PUT /api/v1/sessions/:id/sections/:section_id/content
pub async fn handle_update_section_content(
    State(state): State<AppState>,
    Path((id, section_id)): Path<(Uuid, String)>,
    Json(content): Json<SectionContent>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .apply(id, "update_section_content", |doc| {
            update_section_content(doc, &section_id, content)
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/sections/:section_id/entries
pub async fn handle_add_entry(
    State(state): State<AppState>,
    Path((id, section_id)): Path<(Uuid, String)>,
    Json(entry): Json<Entry>,
) -> Result<(StatusCode, Json<SessionView>), AppError> {
    let view = state
        .sessions
        .apply(id, "add_entry", |doc| add_entry(doc, &section_id, entry))
        .await?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// PUT /api/v1/sessions/:id/sections/:section_id/entries/:entry_id
///
/// The path id wins over any id in the body.
pub async fn handle_update_entry(
    State(state): State<AppState>,
    Path((id, section_id, entry_id)): Path<(Uuid, String, String)>,
    Json(entry): Json<Entry>,
) -> Result<Json<SessionView>, AppError> {
    let entry = entry.with_id(entry_id);
    let view = state
        .sessions
        .apply(id, "update_entry", |doc| update_entry(doc, &section_id, entry))
        .await?;
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:id/sections/:section_id/entries/:entry_id
pub async fn handle_remove_entry(
    State(state): State<AppState>,
    Path((id, section_id, entry_id)): Path<(Uuid, String, String)>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .apply(id, "remove_entry", |doc| {
            remove_entry(doc, &section_id, &entry_id)
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/skills
pub async fn handle_add_skill(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<NewSkill>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .apply(id, "add_skill", |doc| add_skill(doc, &req.skill))
        .await?;
    Ok(Json(view))
}

/// DELETE /api/v1/sessions/:id/skills/:skill
pub async fn handle_remove_skill(
    State(state): State<AppState>,
    Path((id, skill)): Path<(Uuid, String)>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .apply(id, "remove_skill", |doc| remove_skill(doc, &skill))
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/reorder
pub async fn handle_reorder(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(req): Json<ReorderRequest>,
) -> Result<Json<SessionView>, AppError> {
    let view = state
        .sessions
        .apply(id, "reorder_sections", |doc| {
            reorder_sections(doc, req.source_index, req.target_index)
        })
        .await?;
    Ok(Json(view))
}

/// POST /api/v1/sessions/:id/drag
pub async fn handle_drag(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(event): Json<GestureEvent>,
) -> Result<Json<DragView>, AppError> {
    Ok(Json(state.sessions.drag(id, event).await?))
}

/// PUT /api/v1/sessions/:id/design
pub async fn handle_update_design(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(update): Json<DesignUpdate>,
) -> Result<Json<SessionView>, AppError> {
    Ok(Json(state.sessions.set_design(id, &update).await?))
}
