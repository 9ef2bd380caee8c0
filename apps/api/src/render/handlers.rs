use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderName},
    response::{Html, IntoResponse, Response},
    Json,
};
use chrono::Utc;
use serde::Deserialize;
use uuid::Uuid;

use crate::errors::AppError;
use crate::render::export::{export_pdf, ExportError};
use crate::render::preview::render_preview;
use crate::render::template::{Template, TemplateInfo};
use crate::state::AppState;

/// Revision of the document a preview or export was rendered from.
pub const REVISION_HEADER: HeaderName = HeaderName::from_static("x-document-revision");

#[derive(Deserialize)]
pub struct PreviewQuery {
    /// `json` returns the page together with its section trace.
    pub format: Option<String>,
}

/// GET /api/v1/templates
pub async fn handle_list_templates() -> Json<Vec<TemplateInfo>> {
    Json(Template::ALL.iter().map(Template::info).collect())
}

/// GET /api/v1/sessions/:id/preview
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Query(query): Query<PreviewQuery>,
) -> Result<Response, AppError> {
    let snapshot = state.sessions.snapshot(id).await?;
    let preview = render_preview(&snapshot.document, &snapshot.design);
    let revision = [(REVISION_HEADER, snapshot.revision.to_string())];
    if query.format.as_deref() == Some("json") {
        return Ok((revision, Json(preview)).into_response());
    }
    Ok((revision, Html(preview.html)).into_response())
}

/// GET /api/v1/sessions/:id/export
///
/// Renders the snapshot taken when the request arrived; later edits do not
/// leak into the file.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let snapshot = state.sessions.snapshot(id).await?;
    let paper = state.config.export_paper;
    let revision = snapshot.revision;

    let artifact = tokio::task::spawn_blocking(move || {
        export_pdf(&snapshot.document, &snapshot.design, paper, Utc::now())
    })
    .await
    .map_err(|e| ExportError::Task(e.to_string()))??;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        header_safe(&artifact.file_name)
    );
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
            (REVISION_HEADER, revision.to_string()),
        ],
        artifact.bytes,
    )
        .into_response())
}

/// Header values must be visible ASCII; anything else in a name becomes `_`.
fn header_safe(file_name: &str) -> String {
    file_name
        .chars()
        .map(|c| {
            if c.is_ascii_graphic() && c != '"' && c != '\\' {
                c
            } else {
                '_'
            }
        })
        .collect()
}
